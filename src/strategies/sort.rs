use std::cmp::Ordering;
use std::fmt;

use log::debug;

use crate::models::Song;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Title,
    /// Artist, then title.
    Artist,
    Duration,
    /// Genre, then artist, then title.
    Genre,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Title,
        SortKey::Artist,
        SortKey::Duration,
        SortKey::Genre,
        SortKey::CreatedAt,
    ];

    /// Total order over songs for this key. Text compares case-insensitively.
    pub fn compare(self, a: &Song, b: &Song) -> Ordering {
        match self {
            Self::Title => cmp_text(&a.title, &b.title),
            Self::Artist => cmp_text(&a.artist, &b.artist).then_with(|| cmp_text(&a.title, &b.title)),
            Self::Duration => a.duration.cmp(&b.duration),
            Self::Genre => cmp_text(&a.genre, &b.genre)
                .then_with(|| cmp_text(&a.artist, &b.artist))
                .then_with(|| cmp_text(&a.title, &b.title)),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Title => "title",
            Self::Artist => "artist",
            Self::Duration => "duration",
            Self::Genre => "genre",
            Self::CreatedAt => "date added",
        })
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        })
    }
}

/// Sort in place. Equal keys keep their input order in both directions: the
/// comparator is reversed for descending order, never the output.
pub fn sort_songs(songs: &mut [Song], key: SortKey, order: SortOrder) {
    debug!("sorting {} song(s) by {key} ({order})", songs.len());
    match order {
        SortOrder::Ascending => songs.sort_by(|a, b| key.compare(a, b)),
        SortOrder::Descending => songs.sort_by(|a, b| key.compare(b, a)),
    }
}

/// Sorted copy; the input is left untouched.
pub fn sorted(songs: &[Song], key: SortKey, order: SortOrder) -> Vec<Song> {
    let mut copy = songs.to_vec();
    sort_songs(&mut copy, key, order);
    copy
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}
