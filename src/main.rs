mod application;
mod domain;
mod infrastructure;
mod presentation;
#[cfg(test)]
mod testing;

use clap::Parser;
use crate::presentation::cli::Cli;
use crate::presentation::console::StdinCommands;

/// Peeper: menu-driven HTTP request sender
///
/// Loads named requests from a YAML file, lists them as a numbered menu and
/// fires the selected one at the configured host and port, logging the
/// status line and body of every response.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let mut commands = StdinCommands::new();

    if let Err(err) = cli.run(&mut commands).await {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
