//! Pure, database-free transformations over in-memory song lists: display
//! formatting for durations, stable sorting, and predicate filtering.

mod duration;
mod filter;
mod sort;

pub use duration::DurationFormat;
pub use filter::{CompositeFilter, SongFilter};
pub use sort::{sort_songs, sorted, SortKey, SortOrder};
