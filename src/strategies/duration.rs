use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Ways of rendering a number of seconds for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationFormat {
    /// `354s`
    Seconds,
    /// `5m 54s`
    Minutes,
    /// `0h 5m 54s`
    Hours,
    /// `5:54`, or `1:01:01` from one hour up.
    #[default]
    Compact,
}

impl DurationFormat {
    pub const ALL: [DurationFormat; 4] = [
        DurationFormat::Seconds,
        DurationFormat::Minutes,
        DurationFormat::Hours,
        DurationFormat::Compact,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Compact => "compact",
        }
    }

    /// Render `total_seconds`. Negative input is a validation error.
    pub fn format(self, total_seconds: i64) -> Result<String> {
        if total_seconds < 0 {
            return Err(Error::validation("duration", "cannot be negative"));
        }

        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        Ok(match self {
            Self::Seconds => format!("{total_seconds}s"),
            Self::Minutes => format!("{}m {seconds}s", total_seconds / 60),
            Self::Hours => format!("{hours}h {minutes}m {seconds}s"),
            Self::Compact if hours > 0 => format!("{hours}:{minutes:02}:{seconds:02}"),
            Self::Compact => format!("{minutes}:{seconds:02}"),
        })
    }
}

impl fmt::Display for DurationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DurationFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.name() == wanted)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|f| f.name()).collect();
                Error::validation(
                    "duration format",
                    format!("unknown format `{wanted}`; expected one of {}", valid.join(", ")),
                )
            })
    }
}
