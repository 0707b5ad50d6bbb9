//! Terminal output for the people CLI.

use std::fmt::Display;

use console::{Term, style};
use people_business::LoadState;

/// Terminal output helper for consistent styled output.
pub struct Output {
    term: Term,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper writing to stdout.
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    pub fn error(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("✗").red().bold(), message)),
        );
    }

    pub fn warning(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("⚠").yellow().bold(), message)),
        );
    }

    /// Print a plain message without any prefix.
    pub fn print(&self, message: impl Display) {
        drop(self.term.write_line(&message.to_string()));
    }

    pub fn total(&self, count: usize) {
        drop(self.term.write_line(&format!(
            "\n{}: {}",
            style("Total").bold(),
            style(format!("{count} user(s)")).cyan()
        )));
    }

    /// Print the message of a state that carries no records.
    pub fn state(&self, state: &LoadState) {
        let Some(message) = state.message() else {
            return;
        };
        match state {
            LoadState::Empty => self.warning(message),
            LoadState::HttpError(_) | LoadState::Timeout | LoadState::NetworkError(_) => {
                self.error(message);
            }
            _ => self.print(message),
        }
    }
}
