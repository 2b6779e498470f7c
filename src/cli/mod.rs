pub mod completions;
pub mod config_cmd;
pub mod reserve;
