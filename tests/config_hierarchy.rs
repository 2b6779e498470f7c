// Config hierarchy tests: user config layered under project config
use portlot::config::Config;
use serial_test::serial;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Point the user config directory at a temp dir for the duration of a test
struct UserConfigHome {
    _temp_dir: TempDir,
    path: PathBuf,
    previous: Option<String>,
}

impl UserConfigHome {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().to_path_buf();
        let previous = std::env::var("XDG_CONFIG_HOME").ok();
        std::env::set_var("XDG_CONFIG_HOME", &path);
        Self {
            _temp_dir: temp_dir,
            path,
            previous,
        }
    }

    fn write(&self, content: &str) {
        let dir = self.path.join("portlot");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.yml"), content).unwrap();
    }
}

impl Drop for UserConfigHome {
    fn drop(&mut self) {
        match &self.previous {
            Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }
}

fn write_project_config(dir: &Path, content: &str) {
    fs::write(dir.join(".portlot.yml"), content).unwrap();
}

#[test]
#[serial]
#[cfg(target_os = "linux")]
fn test_user_config_alone() {
    let home = UserConfigHome::new();
    home.write("bind_address: 127.0.0.1\nformat: env\n");
    let project = TempDir::new().unwrap();

    let config = Config::load_hierarchy(project.path()).unwrap();
    assert_eq!(config.bind_address, Some("127.0.0.1".parse().unwrap()));
    assert!(config.ports.is_none());
}

#[test]
#[serial]
#[cfg(target_os = "linux")]
fn test_project_overrides_user() {
    let home = UserConfigHome::new();
    home.write("ports: [user.port]\nmerge: true\n");
    let project = TempDir::new().unwrap();
    write_project_config(project.path(), "ports: [http, rmi]\n");

    let config = Config::load_hierarchy(project.path()).unwrap();
    assert_eq!(
        config.ports,
        Some(vec!["http".to_string(), "rmi".to_string()])
    );
    // Values the project leaves out come from the user config
    assert_eq!(config.merge, Some(true));
}

#[test]
#[serial]
#[cfg(target_os = "linux")]
fn test_relative_output_resolves_against_project_root() {
    let _home = UserConfigHome::new();
    let project = TempDir::new().unwrap();
    write_project_config(project.path(), "output: target/ports.properties\n");
    let nested = project.path().join("sub").join("dir");
    fs::create_dir_all(&nested).unwrap();

    let config = Config::load_hierarchy(&nested).unwrap();
    assert_eq!(
        config.output,
        Some(project.path().join("target/ports.properties"))
    );
}

#[test]
#[serial]
#[cfg(target_os = "linux")]
fn test_relative_user_output_resolves_against_user_config_dir() {
    let home = UserConfigHome::new();
    home.write("output: shared/ports.properties\n");
    let project = TempDir::new().unwrap();

    let config = Config::load_hierarchy(project.path()).unwrap();
    assert_eq!(
        config.output,
        Some(home.path.join("portlot").join("shared/ports.properties"))
    );
}

#[test]
#[serial]
#[cfg(target_os = "linux")]
fn test_broken_user_config_is_reported() {
    let home = UserConfigHome::new();
    home.write("ports: [unterminated\n");
    let project = TempDir::new().unwrap();

    let err = Config::load_hierarchy(project.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config"));
}
