use std::fmt;

use log::debug;

use crate::models::Song;

/// One predicate over a song. Text comparisons ignore case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SongFilter {
    /// Genre equals `value`, or contains it when `exact` is false.
    Genre { value: String, exact: bool },
    /// Artist equals `value`, or contains it when `exact` is false.
    Artist { value: String, exact: bool },
    /// Duration in `[min, max]`, both inclusive; a missing bound is open.
    DurationRange { min: Option<i64>, max: Option<i64> },
    TitleContains(String),
}

impl SongFilter {
    pub fn genre(value: impl Into<String>) -> Self {
        Self::Genre {
            value: value.into(),
            exact: true,
        }
    }

    pub fn artist(value: impl Into<String>) -> Self {
        Self::Artist {
            value: value.into(),
            exact: true,
        }
    }

    pub fn duration_between(min: i64, max: i64) -> Self {
        Self::DurationRange {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn title_contains(value: impl Into<String>) -> Self {
        Self::TitleContains(value.into())
    }

    pub fn matches(&self, song: &Song) -> bool {
        match self {
            Self::Genre { value, exact } => text_matches(&song.genre, value, *exact),
            Self::Artist { value, exact } => text_matches(&song.artist, value, *exact),
            Self::DurationRange { min, max } => {
                min.map_or(true, |min| song.duration >= min)
                    && max.map_or(true, |max| song.duration <= max)
            }
            Self::TitleContains(value) => text_matches(&song.title, value, false),
        }
    }

    /// Matching songs in input order.
    pub fn apply(&self, songs: &[Song]) -> Vec<Song> {
        let kept: Vec<Song> = songs.iter().filter(|s| self.matches(s)).cloned().collect();
        debug!("{self} matched {}/{}", kept.len(), songs.len());
        kept
    }
}

impl fmt::Display for SongFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = |exact: bool| if exact { "is" } else { "contains" };
        match self {
            Self::Genre { value, exact } => write!(f, "genre {} '{value}'", mode(*exact)),
            Self::Artist { value, exact } => write!(f, "artist {} '{value}'", mode(*exact)),
            Self::DurationRange { min, max } => {
                let min = min.unwrap_or(0);
                match max {
                    Some(max) => write!(f, "duration {min}s-{max}s"),
                    None => write!(f, "duration >= {min}s"),
                }
            }
            Self::TitleContains(value) => write!(f, "title contains '{value}'"),
        }
    }
}

/// Ordered conjunction of filters. An empty composite keeps everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositeFilter {
    filters: Vec<SongFilter>,
}

impl CompositeFilter {
    pub fn new(filters: Vec<SongFilter>) -> Self {
        Self { filters }
    }

    pub fn with(mut self, filter: SongFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn push(&mut self, filter: SongFilter) {
        self.filters.push(filter);
    }

    pub fn matches(&self, song: &Song) -> bool {
        self.filters.iter().all(|filter| filter.matches(song))
    }

    /// Songs satisfying every filter, in input order.
    pub fn apply(&self, songs: &[Song]) -> Vec<Song> {
        let kept: Vec<Song> = songs.iter().filter(|s| self.matches(s)).cloned().collect();
        debug!("composite [{self}] matched {}/{}", kept.len(), songs.len());
        kept
    }
}

impl fmt::Display for CompositeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.filters.is_empty() {
            return f.write_str("no filters");
        }
        for (idx, filter) in self.filters.iter().enumerate() {
            if idx > 0 {
                f.write_str(" AND ")?;
            }
            write!(f, "{filter}")?;
        }
        Ok(())
    }
}

fn text_matches(field: &str, wanted: &str, exact: bool) -> bool {
    let field = field.to_lowercase();
    let wanted = wanted.trim().to_lowercase();
    if exact {
        field == wanted
    } else {
        field.contains(&wanted)
    }
}
