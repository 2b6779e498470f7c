use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the CLI logger. Logs go to stderr, leaving stdout for properties output.
///
/// `RUST_LOG` wins over the verbosity flag when set.
pub fn init_cli_logger(verbose: bool) {
    let default_filter = if verbose {
        "portlot=debug"
    } else {
        "portlot=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A global subscriber may already be installed
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false)
                .without_time()
                .compact(),
        )
        .try_init();
}
