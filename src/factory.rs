//! Builders that turn raw user input into validated domain values. Identity
//! and creation time are assigned here, before persistence, so a value read
//! back from the database compares equal to the one that was written.

use chrono::{DateTime, SubsecRound, Utc};
use log::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Playlist, Song, User, Validate};

/// Current time at the precision the database round-trips.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Build a song from raw fields. Text is trimmed; the duration must be a
/// positive number of seconds.
pub fn build_song(title: &str, artist: &str, genre: &str, duration: i64) -> Result<Song> {
    let song = Song {
        id: Uuid::new_v4(),
        title: title.trim().to_string(),
        artist: artist.trim().to_string(),
        genre: genre.trim().to_string(),
        duration,
        created_at: timestamp_now(),
    };
    song.validate()?;
    debug!("built song {} ({})", song.id, song.title);
    Ok(song)
}

/// Build a user. Usernames and emails are stored lowercase so uniqueness does
/// not depend on how the user typed them.
pub fn build_user(username: &str, email: &str) -> Result<User> {
    let user = User {
        id: Uuid::new_v4(),
        username: username.trim().to_lowercase(),
        email: email.trim().to_lowercase(),
        created_at: timestamp_now(),
    };
    user.validate()?;
    debug!("built user {} ({})", user.id, user.username);
    Ok(user)
}

pub fn build_playlist(name: &str, owner_id: Uuid) -> Result<Playlist> {
    let playlist = Playlist {
        id: Uuid::new_v4(),
        name: name.trim().to_string(),
        owner_id,
        created_at: timestamp_now(),
    };
    playlist.validate()?;
    debug!("built playlist {} ({})", playlist.id, playlist.name);
    Ok(playlist)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_song_trims_and_validates() {
        let song = build_song("  Bohemian Rhapsody ", "Queen", "Rock", 354).unwrap();
        assert_eq!(song.title, "Bohemian Rhapsody");
        assert_eq!(song.duration, 354);

        let err = build_song("Silence", "Nobody", "Ambient", 0).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn build_user_normalizes_case() {
        let user = build_user("Alice", "Alice@Example.com").unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "alice@example.com");
    }

    #[test]
    fn build_playlist_rejects_blank_name() {
        assert!(build_playlist("   ", Uuid::new_v4()).unwrap_err().is_validation());
    }

    #[test]
    fn timestamps_have_microsecond_precision() {
        let ts = timestamp_now();
        assert_eq!(ts.timestamp_subsec_nanos() % 1_000, 0);
    }
}
