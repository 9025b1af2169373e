use crate::application::dispatcher::{CommandSource, InputError};
use async_trait::async_trait;
use colored::Colorize;
use std::io::{self, BufRead, BufReader, Write};
use std::thread;
use tokio::sync::mpsc;

const PROMPT: &str = "Select command: ";

/// Reads operator commands from stdin, one per line, after printing a prompt
///
/// Lines are read on a detached OS thread so a pending read never holds up
/// runtime shutdown.
pub struct StdinCommands {
    lines: mpsc::Receiver<io::Result<String>>,
}

impl StdinCommands {
    pub fn new() -> Self {
        Self::from_reader(BufReader::new(io::stdin()))
    }

    pub fn from_reader<R>(reader: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (sender, lines) = mpsc::channel(1);
        thread::spawn(move || {
            for line in reader.lines() {
                let failed = line.is_err();
                if sender.blocking_send(line).is_err() || failed {
                    break;
                }
            }
        });
        Self { lines }
    }
}

impl Default for StdinCommands {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandSource for StdinCommands {
    async fn next_command(&mut self) -> Result<String, InputError> {
        prompt()?;
        match self.lines.recv().await {
            Some(line) => Ok(line?),
            None => Err(InputError::Closed),
        }
    }
}

fn prompt() -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", PROMPT.bold())?;
    stdout.flush()
}
