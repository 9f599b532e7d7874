//! Shell completion script generation
//!
//! Generates completion scripts for bash, zsh, fish, elvish and PowerShell
//! using clap_complete.

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io::{self, Write};

use crate::cli::Cli;

/// Write the completion script for `shell` to `out`
///
/// ```bash
/// timer completions bash > ~/.bash_completion.d/timer
/// timer completions zsh > ~/.zsh/completions/_timer
/// timer completions fish > ~/.config/fish/completions/timer.fish
/// ```
pub fn write_completions<W: Write>(shell: Shell, out: &mut W) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, out);
}

/// Generate shell completion script to stdout
pub fn generate_completions(shell: Shell) {
    write_completions(shell, &mut io::stdout());
}
