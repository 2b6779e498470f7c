use crate::errors::Result;
use clap_complete::Shell;
use std::io;

/// Print shell completions for `cmd` to stdout
///
/// ```bash
/// portlot completions bash > ~/.local/share/bash-completion/completions/portlot
/// ```
pub fn run(shell: Shell, cmd: &mut clap::Command) -> Result<()> {
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, cmd, name, &mut io::stdout());
    Ok(())
}
