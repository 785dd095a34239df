//! Line console: feeds input lines to a [`Brain`] and prints its queues.
//!
//! After each line the console writes every pending error, then every
//! status message, then every mechanism command, one per line.

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::brain::Brain;
use crate::config::BrainConfig;

/// Why a console session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Quit,
    EndOfInput,
}

pub struct Console {
    brain: Brain,
    config: BrainConfig,
}

impl Console {
    pub fn new(config: BrainConfig) -> Self {
        Self {
            brain: Brain::with_config(&config),
            config,
        }
    }

    pub fn brain(&self) -> &Brain {
        &self.brain
    }

    /// Read lines until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, out: &mut W) -> io::Result<SessionEnd> {
        let mut buf = Vec::new();
        loop {
            if self.config.show_prompt {
                write!(out, "{}", self.config.prompt)?;
                out.flush()?;
            }

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                debug!("end of input");
                return Ok(SessionEnd::EndOfInput);
            }

            // Invalid UTF-8 becomes U+FFFD, which the lexer rejects as a
            // stray character.
            let line = String::from_utf8_lossy(&buf);
            self.step(&line, out)?;
            if self.brain.should_quit() {
                return Ok(SessionEnd::Quit);
            }
        }
    }

    /// Process one line and write everything it produced.
    pub fn step<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<()> {
        self.brain.process_line(line);
        self.flush(out)
    }

    /// Drain the brain's queues in protocol order.
    pub fn flush<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        for err in self.brain.drain_errors() {
            writeln!(out, "{}{err}", self.config.error_prefix)?;
        }
        for status in self.brain.drain_status() {
            writeln!(out, "{status}")?;
        }
        for command in self.brain.drain_commands() {
            writeln!(out, "{command}")?;
        }
        out.flush()
    }
}
