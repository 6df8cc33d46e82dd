use anyhow::Error;

use crate::models::{PlaylistTrack, Song};
use crate::strategies::DurationFormat;

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

/// Durations in the database are always non-negative, so formatting cannot
/// fail here; fall back to raw seconds just in case.
pub(crate) fn duration_text(format: DurationFormat, seconds: i64) -> String {
    format
        .format(seconds)
        .unwrap_or_else(|_| format!("{seconds}s"))
}

pub(crate) fn song_line(song: &Song, format: DurationFormat) -> String {
    format!(
        "{} | {} | {}",
        song.display_title(),
        song.genre,
        duration_text(format, song.duration)
    )
}

pub(crate) fn track_line(track: &PlaylistTrack, format: DurationFormat) -> String {
    format!("{:>3}. {}", track.position, song_line(&track.song, format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::build_song;
    use anyhow::Context;

    #[test]
    fn surface_error_prefers_root_cause() {
        let err = Err::<(), _>(std::io::Error::other("disk full"))
            .context("failed to save")
            .unwrap_err();
        assert_eq!(surface_error(&err), "disk full");
    }

    #[test]
    fn song_line_uses_selected_format() {
        let song = build_song("Imagine", "John Lennon", "Rock", 183).unwrap();
        assert_eq!(
            song_line(&song, DurationFormat::Compact),
            "Imagine - John Lennon | Rock | 3:03"
        );
        assert_eq!(
            song_line(&song, DurationFormat::Seconds),
            "Imagine - John Lennon | Rock | 183s"
        );
    }
}
