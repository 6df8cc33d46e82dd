use log::{debug, info, warn};
use rusqlite::params;
use uuid::Uuid;

use super::connection::{Database, Record};
use super::repository::{
    delete_from, exists_in, timestamp_column, uuid_column, validate_for, Repository,
};
use super::songs::song_from_record;
use crate::error::Result;
use crate::factory::timestamp_now;
use crate::models::{Playlist, PlaylistTrack};

const TABLE: &str = "playlists";

const PLAYLIST_COLUMNS: &str = "id, name, owner_id, created_at";

/// Playlists and their ordered track lists.
///
/// Tracks occupy positions `1..=n` with no gaps. Adding appends. Unlinking a
/// track, directly or by deleting its song, moves every later track one place
/// forward so the sequence stays dense.
pub struct PlaylistRepository<'db> {
    db: &'db Database,
}

impl<'db> PlaylistRepository<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self { db }
    }

    /// All playlists owned by `owner_id`, newest first.
    pub fn read_by_owner(&self, owner_id: Uuid) -> Result<Vec<Playlist>> {
        let playlists: Vec<Playlist> = self
            .db
            .execute_query(
                "read playlists by owner",
                &format!(
                    "SELECT {PLAYLIST_COLUMNS} FROM playlists
                     WHERE owner_id = ?1
                     ORDER BY created_at DESC, rowid DESC"
                ),
                params![owner_id.to_string()],
            )?
            .iter()
            .map(playlist_from_record)
            .collect::<Result<_>>()?;
        debug!("{} playlist(s) owned by {owner_id}", playlists.len());
        Ok(playlists)
    }

    /// Append a song to the end of a playlist and return its 1-based position.
    ///
    /// Fails with a constraint error when the playlist or song does not exist,
    /// or when the song is already in the playlist.
    pub fn add_track(&self, playlist_id: Uuid, song_id: Uuid) -> Result<i64> {
        let last: i64 = self.db.query_scalar(
            "find last position",
            "SELECT COALESCE(MAX(position), 0) FROM playlist_songs WHERE playlist_id = ?1",
            params![playlist_id.to_string()],
        )?;
        let position = last + 1;

        self.db.execute_update(
            "add track",
            "INSERT INTO playlist_songs (playlist_id, song_id, position, added_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                playlist_id.to_string(),
                song_id.to_string(),
                position,
                timestamp_now(),
            ],
        )?;

        info!("track {song_id} added to playlist {playlist_id} at position {position}");
        Ok(position)
    }

    /// Unlink a song from a playlist. `Ok(false)` when it was not linked.
    /// Later tracks move up one place through the schema's compaction trigger.
    pub fn remove_track(&self, playlist_id: Uuid, song_id: Uuid) -> Result<bool> {
        let removed = self.db.execute_update(
            "remove track",
            "DELETE FROM playlist_songs WHERE playlist_id = ?1 AND song_id = ?2",
            params![playlist_id.to_string(), song_id.to_string()],
        )?;

        if removed == 0 {
            warn!("track {song_id} not in playlist {playlist_id}");
            return Ok(false);
        }
        info!("track {song_id} removed from playlist {playlist_id}");
        Ok(true)
    }

    /// Songs in playlist order. Empty for an unknown playlist.
    pub fn get_tracks(&self, playlist_id: Uuid) -> Result<Vec<PlaylistTrack>> {
        let tracks: Vec<PlaylistTrack> = self
            .db
            .execute_query(
                "read playlist tracks",
                "SELECT s.id AS id, s.title AS title, s.artist AS artist, s.genre AS genre,
                        s.duration AS duration, s.created_at AS created_at,
                        ps.position AS position, ps.added_at AS added_at
                 FROM playlist_songs ps
                 INNER JOIN songs s ON s.id = ps.song_id
                 WHERE ps.playlist_id = ?1
                 ORDER BY ps.position ASC",
                params![playlist_id.to_string()],
            )?
            .iter()
            .map(track_from_record)
            .collect::<Result<_>>()?;
        debug!("{} track(s) in playlist {playlist_id}", tracks.len());
        Ok(tracks)
    }

    /// Sum of song durations in seconds; zero for an empty playlist.
    pub fn get_total_duration(&self, playlist_id: Uuid) -> Result<i64> {
        self.db.query_scalar(
            "total playlist duration",
            "SELECT COALESCE(SUM(s.duration), 0)
             FROM playlist_songs ps
             INNER JOIN songs s ON s.id = ps.song_id
             WHERE ps.playlist_id = ?1",
            params![playlist_id.to_string()],
        )
    }

    pub fn track_count(&self, playlist_id: Uuid) -> Result<i64> {
        self.db.query_scalar(
            "count playlist tracks",
            "SELECT COUNT(*) FROM playlist_songs WHERE playlist_id = ?1",
            params![playlist_id.to_string()],
        )
    }
}

impl Repository for PlaylistRepository<'_> {
    type Entity = Playlist;

    /// Fails with a constraint error when the owner does not exist.
    fn create(&self, playlist: &Playlist) -> Result<Uuid> {
        validate_for("create playlist", playlist)?;

        self.db.execute_update(
            "create playlist",
            "INSERT INTO playlists (id, name, owner_id, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                playlist.id.to_string(),
                playlist.name,
                playlist.owner_id.to_string(),
                playlist.created_at,
            ],
        )?;

        info!(
            "playlist created: {} - {} (owner {})",
            playlist.id, playlist.name, playlist.owner_id
        );
        Ok(playlist.id)
    }

    fn read_by_id(&self, id: Uuid) -> Result<Option<Playlist>> {
        let records = self.db.execute_query(
            "read playlist",
            &format!("SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE id = ?1"),
            params![id.to_string()],
        )?;

        match records.first() {
            Some(record) => playlist_from_record(record).map(Some),
            None => {
                debug!("playlist not found: {id}");
                Ok(None)
            }
        }
    }

    fn read_all(&self) -> Result<Vec<Playlist>> {
        self.db
            .execute_query(
                "read all playlists",
                &format!(
                    "SELECT {PLAYLIST_COLUMNS} FROM playlists ORDER BY created_at DESC, rowid DESC"
                ),
                [],
            )?
            .iter()
            .map(playlist_from_record)
            .collect()
    }

    /// Renames the playlist. Ownership is fixed at creation.
    fn update(&self, playlist: &Playlist) -> Result<bool> {
        validate_for("update playlist", playlist)?;

        let updated = self.db.execute_update(
            "update playlist",
            "UPDATE playlists SET name = ?1 WHERE id = ?2",
            params![playlist.name, playlist.id.to_string()],
        )?;

        if updated > 0 {
            info!("playlist renamed: {} -> {}", playlist.id, playlist.name);
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

fn playlist_from_record(record: &Record) -> Result<Playlist> {
    Ok(Playlist {
        id: uuid_column(record, "id")?,
        name: record.get("name")?,
        owner_id: uuid_column(record, "owner_id")?,
        created_at: timestamp_column(record, "created_at")?,
    })
}

fn track_from_record(record: &Record) -> Result<PlaylistTrack> {
    Ok(PlaylistTrack {
        song: song_from_record(record)?,
        position: record.get("position")?,
        added_at: timestamp_column(record, "added_at")?,
    })
}
