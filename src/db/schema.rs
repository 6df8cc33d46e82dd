use log::{info, warn};

use super::connection::{Database, Statement};
use crate::error::Result;

const CREATE_USERS: &str = "CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
)";

const CREATE_SONGS: &str = "CREATE TABLE IF NOT EXISTS songs (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    artist TEXT NOT NULL,
    genre TEXT NOT NULL,
    duration INTEGER NOT NULL CHECK (duration > 0),
    created_at TEXT NOT NULL
)";

const CREATE_PLAYLISTS: &str = "CREATE TABLE IF NOT EXISTS playlists (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    owner_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    FOREIGN KEY(owner_id) REFERENCES users(id) ON DELETE CASCADE
)";

/// A song sits in a playlist at most once, and positions are unique within a
/// playlist.
const CREATE_PLAYLIST_SONGS: &str = "CREATE TABLE IF NOT EXISTS playlist_songs (
    playlist_id TEXT NOT NULL,
    song_id TEXT NOT NULL,
    position INTEGER NOT NULL,
    added_at TEXT NOT NULL,
    PRIMARY KEY (playlist_id, song_id),
    UNIQUE (playlist_id, position),
    FOREIGN KEY(playlist_id) REFERENCES playlists(id) ON DELETE CASCADE,
    FOREIGN KEY(song_id) REFERENCES songs(id) ON DELETE CASCADE
)";

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_playlists_owner_id ON playlists(owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_playlist_songs_playlist_id ON playlist_songs(playlist_id)",
    "CREATE INDEX IF NOT EXISTS idx_playlist_songs_song_id ON playlist_songs(song_id)",
];

/// Closes the gap a deleted link leaves, whether it was removed directly or by
/// a cascade from its song or playlist. Positions are UNIQUE per playlist and
/// SQLite checks that per row, so the shift goes through negative values.
const COMPACT_POSITIONS: &str = "CREATE TRIGGER IF NOT EXISTS trg_playlist_songs_compact
AFTER DELETE ON playlist_songs
BEGIN
    UPDATE playlist_songs SET position = -position
    WHERE playlist_id = OLD.playlist_id AND position > OLD.position;
    UPDATE playlist_songs SET position = -position - 1
    WHERE playlist_id = OLD.playlist_id AND position < 0;
END";

/// Children first so foreign keys never dangle mid-drop.
const TABLES_IN_DROP_ORDER: &[&str] = &["playlist_songs", "playlists", "songs", "users"];

/// Create whatever tables, indexes and triggers are missing. Safe to call on
/// each startup.
pub fn initialize(db: &Database) -> Result<()> {
    let statements: Vec<Statement> = [
        CREATE_USERS,
        CREATE_SONGS,
        CREATE_PLAYLISTS,
        CREATE_PLAYLIST_SONGS,
    ]
    .iter()
    .chain(INDEXES)
    .chain([&COMPACT_POSITIONS])
    .map(|sql| Statement::plain(*sql))
    .collect();

    db.execute_transaction("initialize schema", &statements)?;
    info!("database schema initialized");
    Ok(())
}

/// Drop all four tables and their data. Meant for tests and manual resets.
pub fn drop_all(db: &Database) -> Result<()> {
    let statements: Vec<Statement> = TABLES_IN_DROP_ORDER
        .iter()
        .map(|table| Statement::plain(format!("DROP TABLE IF EXISTS {table}")))
        .collect();

    db.execute_transaction("drop schema", &statements)?;
    warn!("all tables dropped");
    Ok(())
}

/// Names of the user tables currently present, alphabetically.
pub fn table_names(db: &Database) -> Result<Vec<String>> {
    db.execute_query(
        "list tables",
        "SELECT name FROM sqlite_master
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
         ORDER BY name",
        [],
    )?
    .iter()
    .map(|record| record.get("name"))
    .collect()
}

/// Names of the triggers currently present, alphabetically.
pub fn trigger_names(db: &Database) -> Result<Vec<String>> {
    db.execute_query(
        "list triggers",
        "SELECT name FROM sqlite_master WHERE type = 'trigger' ORDER BY name",
        [],
    )?
    .iter()
    .map(|record| record.get("name"))
    .collect()
}

/// Names of the explicitly created indexes, alphabetically.
pub fn index_names(db: &Database) -> Result<Vec<String>> {
    db.execute_query(
        "list indexes",
        "SELECT name FROM sqlite_master
         WHERE type = 'index' AND name LIKE 'idx_%'
         ORDER BY name",
        [],
    )?
    .iter()
    .map(|record| record.get("name"))
    .collect()
}
