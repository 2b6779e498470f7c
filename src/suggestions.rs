// Error suggestion system for better user experience
use crate::errors::PortError;
use colored::Colorize;
use std::io::ErrorKind;

/// Display an error with helpful suggestions
pub fn display_error_with_suggestions(error: &PortError) {
    eprintln!("\n{}: {}", "Error".bright_red().bold(), error);

    match error {
        PortError::PortProbe(io_err) => {
            eprintln!("\n{}:", "Suggestions".bright_yellow());
            match io_err.kind() {
                ErrorKind::AddrNotAvailable => {
                    eprintln!("  • The bind address is not assigned to this host");
                    eprintln!(
                        "  • Probe on the wildcard address: {}",
                        "--bind 0.0.0.0".bright_cyan()
                    );
                }
                ErrorKind::PermissionDenied => {
                    eprintln!("  • A sandbox or firewall is refusing socket creation");
                }
                _ => {
                    eprintln!("  • Check the open file limit: {}", "ulimit -n".bright_cyan());
                    eprintln!("  • The ephemeral port range may be exhausted");
                }
            }
        }

        PortError::SinkWrite { path, .. } => {
            eprintln!("\n{}:", "Suggestions".bright_yellow());
            eprintln!(
                "  • Check that {} is writable",
                path.display().to_string().bright_cyan()
            );
            eprintln!(
                "  • Print to stdout instead by leaving out {}",
                "--output".bright_cyan()
            );
        }

        PortError::InvalidPortName(_) => {
            eprintln!("\n{}:", "Suggestions".bright_yellow());
            eprintln!("  • Port names must not be empty");
            eprintln!(
                "  • Example: {}",
                "portlot reserve http.port rmi.port".bright_cyan()
            );
        }

        PortError::ConfigError(_) => {
            eprintln!("\n{}:", "Suggestions".bright_yellow());
            eprintln!("  • Check {} for syntax errors", ".portlot.yml".bright_cyan());
            eprintln!(
                "  • Regenerate a template: {}",
                "portlot config init --force".bright_cyan()
            );
        }

        _ => {
            // No specific suggestions for this error type
        }
    }

    eprintln!(); // Empty line for better readability
}
