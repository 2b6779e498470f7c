use clap::{CommandFactory, Parser, Subcommand};
use portlot::cli;
use portlot::errors::Result;
use portlot::{logging, suggestions};

#[derive(Parser)]
#[command(name = "portlot")]
#[command(about = "Reserve unused network ports and publish them as properties", long_about = None)]
#[command(version)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reserve a free port for each name
    Reserve(cli::reserve::ReserveArgs),
    /// Manage .portlot.yml
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Create a template config in the current directory
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
    /// Show the effective configuration
    Show,
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Reserve(args) => cli::reserve::run(args)?,
        Commands::Config { command } => match command {
            ConfigCommands::Init { force } => cli::config_cmd::init(force)?,
            ConfigCommands::Show => cli::config_cmd::show()?,
        },
        Commands::Completions { shell } => cli::completions::run(shell, &mut Cli::command())?,
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    logging::init_cli_logger(cli.verbose);

    if let Err(e) = run(cli) {
        suggestions::display_error_with_suggestions(&e);
        std::process::exit(1);
    }
}
