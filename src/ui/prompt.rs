use std::fmt::Display;
use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use crossterm::style::Stylize;
use thiserror::Error;

/// Raised when stdin closes mid-prompt. The menu loop treats it as "exit".
#[derive(Debug, Error)]
#[error("input closed")]
pub struct EndOfInput;

/// Line-oriented question/answer helper over any reader and writer, so the
/// menu can be driven by a real terminal or by a scripted buffer in tests.
pub struct Prompt<R, W> {
    input: R,
    output: W,
    styled: bool,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W, styled: bool) -> Self {
        Self {
            input,
            output,
            styled,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.output, "{text}").context("failed to write output")
    }

    pub fn heading(&mut self, text: &str) -> Result<()> {
        if self.styled {
            self.say(format!("\n{}", text.bold().cyan()))
        } else {
            self.say(format!("\n{text}"))
        }
    }

    pub fn success(&mut self, text: impl Display) -> Result<()> {
        let line = format!("OK: {text}");
        if self.styled {
            self.say(line.green())
        } else {
            self.say(line)
        }
    }

    pub fn error(&mut self, text: impl Display) -> Result<()> {
        let line = format!("Error: {text}");
        if self.styled {
            self.say(line.red())
        } else {
            self.say(line)
        }
    }

    /// One raw line with the trailing newline removed. `EndOfInput` on EOF.
    pub fn line(&mut self, label: &str) -> Result<String> {
        write!(self.output, "{label}").context("failed to write prompt")?;
        self.output.flush().context("failed to flush prompt")?;

        let mut buf = String::new();
        let read = self
            .input
            .read_line(&mut buf)
            .context("failed to read input")?;
        if read == 0 {
            return Err(EndOfInput.into());
        }
        Ok(buf.trim().to_string())
    }

    /// Ask until the answer is non-empty.
    pub fn required(&mut self, label: &str) -> Result<String> {
        loop {
            let answer = self.line(label)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            self.error("this field is required")?;
        }
    }

    /// Empty answer means "keep the current value".
    pub fn optional(&mut self, label: &str) -> Result<Option<String>> {
        let answer = self.line(label)?;
        Ok((!answer.is_empty()).then_some(answer))
    }

    /// Ask until the answer parses as an integer inside `[min, max]`.
    pub fn number(&mut self, label: &str, min: i64, max: Option<i64>) -> Result<i64> {
        loop {
            let answer = self.line(label)?;
            match (answer.parse::<i64>(), max) {
                (Ok(value), _) if value < min => {
                    self.error(format!("value must be at least {min}"))?
                }
                (Ok(value), Some(max)) if value > max => {
                    self.error(format!("value must be at most {max}"))?
                }
                (Ok(value), _) => return Ok(value),
                (Err(_), _) => self.error("please enter a whole number")?,
            }
        }
    }

    /// Like [`Prompt::number`], but an empty answer keeps `current`.
    pub fn number_or(&mut self, label: &str, current: i64, min: i64, max: i64) -> Result<i64> {
        loop {
            let answer = self.line(&format!("{label} [{current}]: "))?;
            if answer.is_empty() {
                return Ok(current);
            }
            match answer.parse::<i64>() {
                Ok(value) if (min..=max).contains(&value) => return Ok(value),
                _ => self.error(format!("enter a number between {min} and {max}"))?,
            }
        }
    }

    /// Numbered pick list. `Ok(None)` when the list is empty or the user
    /// picks 0.
    pub fn choose<'a, T>(
        &mut self,
        label: &str,
        items: &'a [T],
        render: impl Fn(&T) -> String,
    ) -> Result<Option<&'a T>> {
        if items.is_empty() {
            return Ok(None);
        }
        for (idx, item) in items.iter().enumerate() {
            self.say(format!("  {}. {}", idx + 1, render(item)))?;
        }
        self.say("  0. Cancel")?;

        let max = i64::try_from(items.len()).unwrap_or(i64::MAX);
        let choice = self.number(&format!("{label}: "), 0, Some(max))?;
        Ok(usize::try_from(choice)
            .ok()
            .and_then(|choice| choice.checked_sub(1))
            .and_then(|idx| items.get(idx)))
    }

    pub fn confirm(&mut self, label: &str) -> Result<bool> {
        let answer = self.line(&format!("{label} (yes/no): "))?;
        Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
    }
}
