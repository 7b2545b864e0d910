//! Line-oriented terminal I/O for the interactive menu
//!
//! Generic over reader and writer so the menu can be driven from a script
//! in tests. End of input is surfaced as `None` rather than an error.

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use crate::crypto::SecureString;
use crate::error::{FinanceError, FinanceResult};

pub struct Console<R, W> {
    input: R,
    output: W,
    hide_passwords: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            hide_passwords: false,
        }
    }

    /// Read passwords from the terminal without echo
    pub fn with_hidden_passwords(mut self, hide: bool) -> Self {
        self.hide_passwords = hide;
        self
    }

    /// Print a line
    pub fn say(&mut self, text: impl Display) -> FinanceResult<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// Print text without a trailing newline
    pub fn print(&mut self, text: impl Display) -> FinanceResult<()> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        Ok(())
    }

    /// Show a label and read one trimmed line; `None` at end of input
    ///
    /// A line that is not valid UTF-8 is consumed and reported as invalid
    /// input, so the next prompt starts on a fresh line.
    pub fn prompt(&mut self, label: &str) -> FinanceResult<Option<String>> {
        self.print(label)?;

        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        let line = String::from_utf8(line).map_err(|_| {
            FinanceError::InvalidInput("input is not valid UTF-8 text".into())
        })?;
        Ok(Some(line.trim().to_string()))
    }

    /// Read a password, hidden when attached to a terminal
    pub fn prompt_password(&mut self, label: &str) -> FinanceResult<Option<SecureString>> {
        if !self.hide_passwords {
            return Ok(self.prompt(label)?.map(trimmed_secret));
        }

        self.print(label)?;
        match rpassword::read_password() {
            Ok(password) => Ok(Some(trimmed_secret(password))),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Prompt for a value and parse it; blank input is rejected
    pub fn prompt_parsed<T>(&mut self, label: &str, what: &str) -> FinanceResult<Option<T>>
    where
        T: FromStr,
    {
        let Some(raw) = self.prompt(label)? else {
            return Ok(None);
        };
        parse_field(&raw, what).map(Some)
    }

    /// Prompt for an optional value; blank input yields `Some(None)`
    pub fn prompt_optional<T>(
        &mut self,
        label: &str,
        what: &str,
    ) -> FinanceResult<Option<Option<T>>>
    where
        T: FromStr,
    {
        let Some(raw) = self.prompt(label)? else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(Some(None));
        }
        parse_field(&raw, what).map(|value| Some(Some(value)))
    }

    /// Ask a yes/no question; anything but "y"/"yes" is no
    pub fn confirm(&mut self, question: &str) -> FinanceResult<Option<bool>> {
        Ok(self
            .prompt(&format!("{} (y/n): ", question))?
            .map(|answer| matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes")))
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }
}

/// Hidden and visible password entry must yield the same secret
fn trimmed_secret(raw: String) -> SecureString {
    let raw = SecureString::new(raw);
    SecureString::new(raw.as_str().trim())
}

/// Parse user input, reporting failures as invalid input
pub fn parse_field<T: FromStr>(raw: &str, what: &str) -> FinanceResult<T> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FinanceError::InvalidInput(format!("{} is required", what)));
    }
    raw.parse().map_err(|_| {
        FinanceError::InvalidInput(format!("'{}' is not a valid {}", raw, what))
    })
}
