// Config command: create and inspect .portlot.yml
use crate::config::{Config, CONFIG_FILE};
use crate::errors::{PortError, Result};
use colored::Colorize;
use std::env;
use std::fs;
use std::path::Path;

const TEMPLATE_CONFIG: &str = r#"# portlot configuration file
#
# Lists the names that get a free port on every `portlot reserve` run.
# Ports are probed and released again straight away: nothing stops another
# process from taking one before your test fixture binds it.

# Names to reserve, in order
ports:
  - http.port
  - rmi.port

# Write properties here instead of printing them (relative to this file)
# output: target/reserved-ports.properties

# Keep other entries already in the output file
# merge: false

# Local address to probe on (default: 0.0.0.0)
# bind_address: 127.0.0.1

# Stdout format when no output file is set: properties, json or env
# format: properties
"#;

/// Write a template config into `dir`
pub fn init_in(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE);

    if config_path.exists() && !force {
        return Err(PortError::ConfigError(format!(
            "{} already exists. Remove it first, edit it manually or pass --force.",
            CONFIG_FILE
        )));
    }

    fs::write(&config_path, TEMPLATE_CONFIG)?;
    Ok(())
}

/// Initialize a new config file in the current directory
pub fn init(force: bool) -> Result<()> {
    init_in(&env::current_dir()?, force)?;

    println!("{}", "✓ Configuration file created!".bright_green());
    println!("\nCreated: {}", CONFIG_FILE.bright_cyan());
    println!("\nNext steps:");
    println!("  1. List the port names your tests need");
    println!(
        "  2. Reserve them: {}",
        "portlot reserve".bright_cyan()
    );

    Ok(())
}

/// Print the effective configuration after layering user and project files
pub fn show() -> Result<()> {
    let current_dir = env::current_dir()?;
    let config = Config::load_hierarchy(&current_dir)?;

    match Config::find_project_root(&current_dir) {
        Some(root) => println!(
            "{} {}",
            "Project config:".bright_cyan(),
            root.join(CONFIG_FILE).display()
        ),
        None => println!("{}", "No project config found".bright_yellow()),
    }
    if let Some(user) = Config::user_config_path().filter(|p| p.exists()) {
        println!("{} {}", "User config:".bright_cyan(), user.display());
    }
    println!();

    let yaml = serde_yml::to_string(&config)
        .map_err(|e| PortError::ConfigError(format!("Failed to serialize config: {}", e)))?;
    print!("{}", yaml);

    Ok(())
}
