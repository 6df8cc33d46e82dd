//! Sample library for first runs: a handful of well-known songs, three users,
//! and two playlists owned by the first user.

use log::info;
use uuid::Uuid;

use crate::db::{Database, PlaylistRepository, Repository, SongRepository, UserRepository};
use crate::error::Result;
use crate::factory::{build_playlist, build_song, build_user};

/// (title, artist, genre, seconds)
const SONGS: &[(&str, &str, &str, i64)] = &[
    ("Bohemian Rhapsody", "Queen", "Rock", 354),
    ("Imagine", "John Lennon", "Rock", 183),
    ("Stairway to Heaven", "Led Zeppelin", "Rock", 482),
    ("Hotel California", "Eagles", "Rock", 391),
    ("Let It Be", "The Beatles", "Rock", 243),
    ("Smells Like Teen Spirit", "Nirvana", "Grunge", 301),
    ("One", "Metallica", "Metal", 447),
    ("Black", "Pearl Jam", "Grunge", 368),
];

const USERS: &[(&str, &str)] = &[
    ("alice", "alice@example.com"),
    ("bob", "bob@example.com"),
    ("charlie", "charlie@example.com"),
];

/// Playlist name and indexes into [`SONGS`], in track order.
const PLAYLISTS: &[(&str, &[usize])] = &[
    ("Rock Classics", &[0, 1, 2, 3, 4]),
    ("Heavy Hitters", &[1, 6, 7]),
];

/// Populate the sample library when the database holds no songs and no users.
/// Returns `false` and writes nothing otherwise. The library is written in one
/// transaction, so a failure leaves the database empty.
pub fn seed_if_empty(db: &Database) -> Result<bool> {
    let existing: i64 = db.query_scalar(
        "count library rows",
        "SELECT (SELECT COUNT(*) FROM songs) + (SELECT COUNT(*) FROM users)",
        [],
    )?;
    if existing > 0 {
        info!("database already has data, skipping sample library");
        return Ok(false);
    }

    db.run_in_transaction("seed sample library", || insert_samples(db))?;
    Ok(true)
}

fn insert_samples(db: &Database) -> Result<()> {
    let songs = SongRepository::new(db);
    let song_ids = SONGS
        .iter()
        .map(|&(title, artist, genre, duration)| {
            songs.create(&build_song(title, artist, genre, duration)?)
        })
        .collect::<Result<Vec<Uuid>>>()?;

    let users = UserRepository::new(db);
    let user_ids = USERS
        .iter()
        .map(|&(username, email)| users.create(&build_user(username, email)?))
        .collect::<Result<Vec<Uuid>>>()?;

    let playlists = PlaylistRepository::new(db);
    let owner = user_ids[0];
    for &(name, tracks) in PLAYLISTS {
        let playlist_id = playlists.create(&build_playlist(name, owner)?)?;
        for &idx in tracks {
            playlists.add_track(playlist_id, song_ids[idx])?;
        }
    }

    info!(
        "sample library created: {} songs, {} users, {} playlists",
        song_ids.len(),
        user_ids.len(),
        PLAYLISTS.len()
    );
    Ok(())
}
