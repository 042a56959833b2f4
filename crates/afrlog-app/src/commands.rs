//! Line commands
//!
//! One command per stdin line, mapped onto the recorder. `clear` is destructive
//! and needs a `y` on the following line before it runs.

use std::io::{self, Write};
use std::str::FromStr;

use afrlog_core::recorder::SharedRecorder;
use thiserror::Error;

/// Help text printed by `help`
pub const HELP: &str = "\
commands:
  start               begin recording into a new series
  stop                stop recording
  split               start a new series without stopping
  clear               delete all series (asks for confirmation)
  rename <i> <name>   rename series number i (0-based)
  status              show recorder state
  export              print all series as JSON
  help                show this help
  quit                exit";

/// Errors parsing a command line
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("Invalid series index: {0}")]
    InvalidIndex(String),
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Split,
    Clear,
    Rename { index: usize, name: String },
    Status,
    Export,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "start" => Ok(Command::Start),
            "stop" => Ok(Command::Stop),
            "split" => Ok(Command::Split),
            "clear" => Ok(Command::Clear),
            "status" => Ok(Command::Status),
            "export" => Ok(Command::Export),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            "rename" => {
                let (index, name) = match rest.split_once(char::is_whitespace) {
                    Some((index, name)) => (index, name.trim()),
                    None if rest.is_empty() => return Err(CommandError::MissingArgument("index")),
                    None => return Err(CommandError::MissingArgument("name")),
                };
                let index = index
                    .parse()
                    .map_err(|_| CommandError::InvalidIndex(index.to_string()))?;
                Ok(Command::Rename {
                    index,
                    name: name.to_string(),
                })
            }
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Whether the session should keep reading commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}

/// Command session against one recorder
#[derive(Debug)]
pub struct Session {
    recorder: SharedRecorder,
    /// Set after `clear`, until the user answers the confirmation
    awaiting_clear: bool,
}

impl Session {
    /// Create a session
    pub fn new(recorder: SharedRecorder) -> Self {
        Self {
            recorder,
            awaiting_clear: false,
        }
    }

    /// Handle one input line, writing any response to `out`
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Outcome> {
        if std::mem::take(&mut self.awaiting_clear) {
            if matches!(line.trim().to_lowercase().as_str(), "y" | "yes") {
                self.recorder.clear();
                writeln!(out, "cleared")?;
            } else {
                writeln!(out, "clear cancelled")?;
            }
            return Ok(Outcome::Continue);
        }

        if line.trim().is_empty() {
            return Ok(Outcome::Continue);
        }

        match line.parse::<Command>() {
            Ok(command) => self.execute(command, out),
            Err(e) => {
                writeln!(out, "{e} (try 'help')")?;
                Ok(Outcome::Continue)
            }
        }
    }

    fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> io::Result<Outcome> {
        match command {
            Command::Start => match self.recorder.start() {
                Ok(()) => writeln!(out, "recording")?,
                Err(e) => writeln!(out, "{e}")?,
            },
            Command::Stop => {
                self.recorder.stop();
                writeln!(out, "stopped")?;
            }
            Command::Split => {
                let index = self.recorder.split();
                writeln!(out, "new series {index}")?;
            }
            Command::Clear => {
                self.awaiting_clear = true;
                writeln!(out, "Are you sure? [y/N]")?;
            }
            Command::Rename { index, name } => match self.recorder.rename(index, name) {
                Ok(()) => writeln!(out, "renamed series {index}")?,
                Err(e) => writeln!(out, "{e}")?,
            },
            Command::Status => self.write_status(out)?,
            Command::Export => {
                let series = self.recorder.snapshot().series;
                serde_json::to_writer_pretty(&mut *out, &series)?;
                writeln!(out)?;
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Outcome::Quit),
        }
        Ok(Outcome::Continue)
    }

    fn write_status<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let state = self.recorder.snapshot();
        writeln!(
            out,
            "{} | latest {:.2} | {} series",
            if state.running { "recording" } else { "idle" },
            state.latest_value,
            state.series.len()
        )?;
        for (index, series) in state.series.iter().enumerate() {
            writeln!(out, "  [{index}] {} ({} points)", series.name, series.len())?;
        }
        Ok(())
    }
}
