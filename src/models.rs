//! Domain models that mirror the SQLite schema. These stay light-weight data
//! holders; the factory builds them and the repositories persist them. Each
//! type also knows how to validate itself so the repositories can refuse bad
//! values before any SQL runs.

use std::fmt;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::error::{Error, Result};

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_PLAYLIST_NAME_LEN: usize = 100;
pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 30;
/// Ten hours.
pub const MAX_DURATION_SECS: i64 = 36_000;

static USERNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid username regex"));
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Field-level checks a value must pass before it is written.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// A track in the catalogue. Immutable identity (`id`, `created_at`), editable
/// metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub id: Uuid,
    pub title: String,
    pub artist: String,
    pub genre: String,
    /// Length in whole seconds, always positive.
    pub duration: i64,
    pub created_at: DateTime<Utc>,
}

impl Song {
    /// `Title - Artist`, used by list views and selection prompts.
    pub fn display_title(&self) -> String {
        if self.artist.trim().is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.title, self.artist)
        }
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.display_title(), self.genre)
    }
}

impl Validate for Song {
    fn validate(&self) -> Result<()> {
        require_text("title", &self.title)?;
        if self.title.chars().count() > MAX_TITLE_LEN {
            return Err(Error::validation(
                "title",
                format!("must be at most {MAX_TITLE_LEN} characters"),
            ));
        }
        require_text("artist", &self.artist)?;
        require_text("genre", &self.genre)?;
        if self.duration <= 0 {
            return Err(Error::validation("duration", "must be at least 1 second"));
        }
        if self.duration > MAX_DURATION_SECS {
            return Err(Error::validation(
                "duration",
                format!("must be at most {MAX_DURATION_SECS} seconds"),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.username, self.email)
    }
}

impl Validate for User {
    fn validate(&self) -> Result<()> {
        require_text("username", &self.username)?;
        let len = self.username.chars().count();
        if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
            return Err(Error::validation(
                "username",
                format!("must be between {MIN_USERNAME_LEN} and {MAX_USERNAME_LEN} characters"),
            ));
        }
        if !USERNAME_PATTERN.is_match(&self.username) {
            return Err(Error::validation(
                "username",
                "may only contain letters, digits, underscores, and hyphens",
            ));
        }
        require_text("email", &self.email)?;
        if !EMAIL_PATTERN.is_match(&self.email) {
            return Err(Error::validation("email", "is not a valid address"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: Uuid,
    pub name: String,
    /// Owning user. The schema cascades playlist deletion from the owner.
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Playlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Validate for Playlist {
    fn validate(&self) -> Result<()> {
        require_text("name", &self.name)?;
        if self.name.chars().count() > MAX_PLAYLIST_NAME_LEN {
            return Err(Error::validation(
                "name",
                format!("must be at most {MAX_PLAYLIST_NAME_LEN} characters"),
            ));
        }
        Ok(())
    }
}

/// A song as it appears inside one playlist: the joined song row plus the
/// association's ordering metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistTrack {
    pub song: Song,
    /// 1-based, contiguous within the playlist.
    pub position: i64,
    pub added_at: DateTime<Utc>,
}

fn require_text(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::validation(field, "cannot be empty"))
    } else {
        Ok(())
    }
}
