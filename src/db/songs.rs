use log::{debug, info};
use rusqlite::params;
use uuid::Uuid;

use super::connection::{Database, Record};
use super::repository::{
    delete_from, exists_in, timestamp_column, uuid_column, validate_for, Repository,
};
use crate::error::Result;
use crate::models::Song;

const TABLE: &str = "songs";

const SONG_COLUMNS: &str = "id, title, artist, genre, duration, created_at";

/// Catalogue access. Artist and genre lookups match the stored text exactly;
/// [`SongRepository::search`] is the forgiving, partial-match variant.
pub struct SongRepository<'db> {
    db: &'db Database,
}

impl<'db> SongRepository<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self { db }
    }

    /// Songs whose artist equals `artist` exactly (case-sensitive), newest
    /// first.
    pub fn read_by_artist(&self, artist: &str) -> Result<Vec<Song>> {
        let songs = self.select_where("read songs by artist", "artist = ?1", artist)?;
        debug!("{} song(s) by {artist}", songs.len());
        Ok(songs)
    }

    /// Songs whose genre equals `genre` exactly (case-sensitive), newest first.
    pub fn read_by_genre(&self, genre: &str) -> Result<Vec<Song>> {
        let songs = self.select_where("read songs by genre", "genre = ?1", genre)?;
        debug!("{} song(s) in genre {genre}", songs.len());
        Ok(songs)
    }

    /// Case-insensitive substring match on title or artist. `%` and `_` in the
    /// term are matched literally.
    pub fn search(&self, term: &str) -> Result<Vec<Song>> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        let pattern = format!("%{}%", escape_like(term));
        let songs = self.select_where(
            "search songs",
            "(title LIKE ?1 ESCAPE '\\' OR artist LIKE ?1 ESCAPE '\\')",
            &pattern,
        )?;
        debug!("search {term:?}: {} hit(s)", songs.len());
        Ok(songs)
    }

    fn select_where(&self, operation: &'static str, condition: &str, arg: &str) -> Result<Vec<Song>> {
        self.db
            .execute_query(
                operation,
                &format!(
                    "SELECT {SONG_COLUMNS} FROM songs
                     WHERE {condition}
                     ORDER BY created_at DESC, rowid DESC"
                ),
                params![arg],
            )?
            .iter()
            .map(song_from_record)
            .collect()
    }
}

impl Repository for SongRepository<'_> {
    type Entity = Song;

    fn create(&self, song: &Song) -> Result<Uuid> {
        validate_for("create song", song)?;

        self.db.execute_update(
            "create song",
            "INSERT INTO songs (id, title, artist, genre, duration, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                song.id.to_string(),
                song.title,
                song.artist,
                song.genre,
                song.duration,
                song.created_at,
            ],
        )?;

        info!("song created: {} - {} by {}", song.id, song.title, song.artist);
        Ok(song.id)
    }

    fn read_by_id(&self, id: Uuid) -> Result<Option<Song>> {
        let records = self.db.execute_query(
            "read song",
            &format!("SELECT {SONG_COLUMNS} FROM songs WHERE id = ?1"),
            params![id.to_string()],
        )?;

        match records.first() {
            Some(record) => song_from_record(record).map(Some),
            None => {
                debug!("song not found: {id}");
                Ok(None)
            }
        }
    }

    fn read_all(&self) -> Result<Vec<Song>> {
        self.db
            .execute_query(
                "read all songs",
                &format!("SELECT {SONG_COLUMNS} FROM songs ORDER BY created_at DESC, rowid DESC"),
                [],
            )?
            .iter()
            .map(song_from_record)
            .collect()
    }

    fn update(&self, song: &Song) -> Result<bool> {
        validate_for("update song", song)?;

        let updated = self.db.execute_update(
            "update song",
            "UPDATE songs SET title = ?1, artist = ?2, genre = ?3, duration = ?4 WHERE id = ?5",
            params![song.title, song.artist, song.genre, song.duration, song.id.to_string()],
        )?;

        if updated > 0 {
            info!("song updated: {}", song.id);
        }
        Ok(updated > 0)
    }

    fn exists(&self, id: Uuid) -> Result<bool> {
        exists_in(self.db, TABLE, id)
    }

    fn delete(&self, id: Uuid) -> Result<bool> {
        delete_from(self.db, TABLE, id)
    }
}

/// Map a row selected with the song column list (possibly joined) onto a
/// [`Song`].
pub(crate) fn song_from_record(record: &Record) -> Result<Song> {
    Ok(Song {
        id: uuid_column(record, "id")?,
        title: record.get("title")?,
        artist: record.get("artist")?,
        genre: record.get("genre")?,
        duration: record.get("duration")?,
        created_at: timestamp_column(record, "created_at")?,
    })
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
