// Reserve command: probe ports for the requested names and publish them
use crate::config::Config;
use crate::errors::Result;
use crate::probe::SystemProber;
use crate::reserve::{reserve_all, PortName};
use crate::sink::{OutputFormat, PropertiesFileSink, PropertySink, StreamSink};
use colored::Colorize;
use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, clap::Args)]
pub struct ReserveArgs {
    /// Names to reserve ports for, in order (defaults to `ports` in .portlot.yml)
    pub names: Vec<String>,

    /// Write properties to this file instead of printing them
    #[arg(short, long, conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Print to stdout even when the config names an output file
    #[arg(long)]
    pub stdout: bool,

    /// Keep existing entries in the output file
    #[arg(long, overrides_with = "no_merge")]
    pub merge: bool,

    /// Replace the output file even when the config sets `merge: true`
    #[arg(long, overrides_with = "merge")]
    pub no_merge: bool,

    /// Local address to probe on
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<IpAddr>,

    /// Format used when printing to stdout
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Where the reservation goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    File { path: PathBuf, merge: bool },
    Stdout(OutputFormat),
}

/// Arguments and config resolved into one reservation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub names: Vec<PortName>,
    pub bind_address: IpAddr,
    pub target: Target,
}

impl Plan {
    /// Command-line values win over config values
    pub fn resolve(args: ReserveArgs, config: &Config) -> Result<Self> {
        let names = if args.names.is_empty() {
            config.port_names()?
        } else {
            PortName::parse_all(args.names)?
        };

        let bind_address = args
            .bind
            .or(config.bind_address)
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

        let output = if args.stdout {
            None
        } else {
            args.output.or_else(|| config.output.clone())
        };
        let merge = if args.merge {
            true
        } else if args.no_merge {
            false
        } else {
            config.merge.unwrap_or(false)
        };

        let target = match output {
            Some(path) => Target::File { path, merge },
            None => Target::Stdout(args.format.or(config.format).unwrap_or_default()),
        };

        Ok(Self {
            names,
            bind_address,
            target,
        })
    }
}

pub fn run(args: ReserveArgs) -> Result<()> {
    let config = Config::load_hierarchy(&env::current_dir()?)?;
    let plan = Plan::resolve(args, &config)?;

    if plan.names.is_empty() {
        tracing::info!(
            "No port names given on the command line or in {}",
            crate::config::CONFIG_FILE
        );
    }

    let prober = SystemProber::with_bind_address(plan.bind_address);
    let reservation = reserve_all(&prober, &plan.names)?;

    match plan.target {
        Target::File { path, merge } => {
            let mut sink = PropertiesFileSink::new(path)
                .merge(merge)
                .comment("Ports reserved by portlot");
            sink.accept(&reservation)?;

            eprintln!(
                "{} Reserved {} port(s) in {}",
                "✓".bright_green(),
                reservation.len(),
                sink.path().display().to_string().bright_cyan()
            );
        }
        Target::Stdout(format) => {
            StreamSink::stdout(format).accept(&reservation)?;
        }
    }

    Ok(())
}
