/// Common test utilities for portlot integration tests
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A project directory with its own isolated user config location
#[allow(dead_code)]
pub struct TestProject {
    pub temp_dir: TempDir,
    pub project_path: PathBuf,
    pub config_home: PathBuf,
}

impl TestProject {
    /// Create an empty project directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let project_path = temp_dir.path().join("project");
        std::fs::create_dir(&project_path).expect("Failed to create project directory");

        // Keep the developer's own ~/.config/portlot out of the tests
        let config_home = temp_dir.path().join("config-home");
        std::fs::create_dir(&config_home).expect("Failed to create config home");

        TestProject {
            temp_dir,
            project_path,
            config_home,
        }
    }

    /// Get the project path
    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        &self.project_path
    }

    /// Run portlot in the project directory
    pub fn portlot(&self, args: &[&str]) -> CommandResult {
        self.portlot_in(&self.project_path, args)
    }

    /// Run portlot in some other directory, still with the isolated config home
    pub fn portlot_in(&self, dir: &Path, args: &[&str]) -> CommandResult {
        let output = Command::new(env!("CARGO_BIN_EXE_portlot"))
            .args(args)
            .current_dir(dir)
            .env("XDG_CONFIG_HOME", &self.config_home)
            .env("HOME", self.temp_dir.path())
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to execute portlot command");

        CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            exit_code: output.status.code(),
        }
    }

    /// Create a project config file
    #[allow(dead_code)]
    pub fn create_config(&self, content: &str) {
        std::fs::write(self.project_path.join(".portlot.yml"), content)
            .expect("Failed to write config file");
    }

    /// Create the user-level config file
    #[allow(dead_code)]
    pub fn create_user_config(&self, content: &str) {
        let dir = self.config_home.join("portlot");
        std::fs::create_dir_all(&dir).expect("Failed to create user config dir");
        std::fs::write(dir.join("config.yml"), content).expect("Failed to write user config");
    }

    /// Read a file relative to the project
    #[allow(dead_code)]
    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.project_path.join(relative))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", relative, e))
    }
}

/// Result of running a command
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub exit_code: Option<i32>,
}

impl CommandResult {
    /// Assert the command succeeded
    pub fn assert_success(&self) {
        if !self.success {
            panic!(
                "Command failed:\nstdout: {}\nstderr: {}\nexit code: {:?}",
                self.stdout, self.stderr, self.exit_code
            );
        }
    }

    /// Assert the command failed
    #[allow(dead_code)]
    pub fn assert_failure(&self) {
        if self.success {
            panic!(
                "Command succeeded when it should have failed:\nstdout: {}\nstderr: {}",
                self.stdout, self.stderr
            );
        }
    }

    /// Assert stdout contains text
    #[allow(dead_code)]
    pub fn assert_stdout_contains(&self, text: &str) {
        assert!(
            self.stdout.contains(text),
            "stdout does not contain '{}'\nstdout: {}",
            text,
            self.stdout
        );
    }

    /// Assert stderr contains text
    #[allow(dead_code)]
    pub fn assert_stderr_contains(&self, text: &str) {
        assert!(
            self.stderr.contains(text),
            "stderr does not contain '{}'\nstderr: {}",
            text,
            self.stderr
        );
    }
}

/// Parse `name=port` lines, skipping `#` comments
#[allow(dead_code)]
pub fn parse_ports(text: &str) -> Vec<(String, u16)> {
    text.lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .map(|line| {
            let (name, port) = line
                .split_once('=')
                .unwrap_or_else(|| panic!("Not a property line: {}", line));
            (name.to_string(), port.parse().expect("port should be a number"))
        })
        .collect()
}
