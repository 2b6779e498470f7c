// Library interface for portlot
// Exposes the prober, orchestrator and sinks for use outside the CLI

pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod probe;
pub mod properties;
pub mod reserve;
pub mod sink;
pub mod suggestions;

pub use errors::{PortError, Result};
pub use probe::{Prober, SystemProber};
pub use reserve::{reserve_all, PortName, Reservation};
