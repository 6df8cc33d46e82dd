use std::io::{BufRead, Write};

use anyhow::Result;
use log::{info, warn};

use crate::db::{Database, PlaylistRepository, Repository, SongRepository, UserRepository};
use crate::error::Error;
use crate::factory::{build_playlist, build_song, build_user};
use crate::models::{Playlist, Song, User, MAX_DURATION_SECS};
use crate::strategies::{sorted, CompositeFilter, DurationFormat, SongFilter, SortKey, SortOrder};

use super::helpers::{duration_text, song_line, track_line};
use super::prompt::{EndOfInput, Prompt};

/// Highest option number in [`MENU`].
const LAST_OPTION: i64 = 20;

/// Menu sections in display order. Numbers are what the user types.
const MENU: &[(&str, &[(i64, &str)])] = &[
    (
        "Songs",
        &[
            (1, "Add song"),
            (2, "List songs"),
            (3, "Search songs"),
            (4, "Update song"),
            (5, "Delete song"),
        ],
    ),
    (
        "Users",
        &[
            (6, "Add user"),
            (7, "List users"),
            (8, "Find user"),
            (9, "Update user"),
            (10, "Delete user"),
        ],
    ),
    (
        "Playlists",
        &[
            (11, "Create playlist"),
            (12, "List playlists"),
            (13, "Show playlist"),
            (14, "Rename playlist"),
            (15, "Delete playlist"),
            (16, "Add song to playlist"),
            (17, "Remove song from playlist"),
        ],
    ),
    (
        "Library",
        &[
            (18, "Sort songs"),
            (19, "Filter songs"),
            (20, "Change duration format"),
            (0, "Exit"),
        ],
    ),
];

const SORT_ORDERS: [SortOrder; 2] = [SortOrder::Ascending, SortOrder::Descending];

enum Flow {
    Continue,
    Exit,
}

/// Menu state: the three repositories over one database, the prompt the user
/// talks through, and the current duration display preference.
pub struct App<'db, R, W> {
    songs: SongRepository<'db>,
    users: UserRepository<'db>,
    playlists: PlaylistRepository<'db>,
    prompt: Prompt<R, W>,
    format: DurationFormat,
}

impl<'db, R: BufRead, W: Write> App<'db, R, W> {
    pub fn new(db: &'db Database, prompt: Prompt<R, W>) -> Self {
        Self {
            songs: SongRepository::new(db),
            users: UserRepository::new(db),
            playlists: PlaylistRepository::new(db),
            prompt,
            format: DurationFormat::default(),
        }
    }

    pub fn duration_format(&self) -> DurationFormat {
        self.format
    }

    pub fn into_output(self) -> W {
        self.prompt.into_output()
    }

    /// Show the menu and dispatch choices until the user picks 0 or input
    /// ends. Domain failures are reported and the loop carries on; only
    /// terminal I/O failures end it with an error.
    pub fn run(&mut self) -> Result<()> {
        info!("menu started");
        loop {
            let outcome = self.show_menu().and_then(|_| {
                let choice = self.prompt.number("Select an option: ", 0, Some(LAST_OPTION))?;
                self.dispatch(choice)
            });

            match outcome {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => {
                    self.prompt.say("Goodbye!")?;
                    info!("menu exited");
                    return Ok(());
                }
                Err(err) if err.is::<EndOfInput>() => {
                    info!("input closed, leaving menu");
                    return Ok(());
                }
                Err(err) => self.report(err)?,
            }
        }
    }

    fn report(&mut self, err: anyhow::Error) -> Result<()> {
        match err.downcast_ref::<Error>() {
            Some(domain) => {
                warn!("menu action failed: {domain}");
                self.prompt.error(domain)
            }
            None => Err(err),
        }
    }

    fn show_menu(&mut self) -> Result<()> {
        self.prompt.heading("Playlist Manager")?;
        for (section, entries) in MENU {
            self.prompt.say(format!("{section}:"))?;
            for (number, label) in entries.iter() {
                self.prompt.say(format!("  {number:>2}. {label}"))?;
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, choice: i64) -> Result<Flow> {
        match choice {
            0 => return Ok(Flow::Exit),
            1 => self.add_song()?,
            2 => self.list_songs()?,
            3 => self.search_songs()?,
            4 => self.update_song()?,
            5 => self.delete_song()?,
            6 => self.add_user()?,
            7 => self.list_users()?,
            8 => self.find_user()?,
            9 => self.update_user()?,
            10 => self.delete_user()?,
            11 => self.create_playlist()?,
            12 => self.list_playlists()?,
            13 => self.show_playlist()?,
            14 => self.rename_playlist()?,
            15 => self.delete_playlist()?,
            16 => self.add_track()?,
            17 => self.remove_track()?,
            18 => self.sort_songs()?,
            19 => self.filter_songs()?,
            20 => self.change_format()?,
            other => self.prompt.error(format!("unknown option {other}"))?,
        }
        Ok(Flow::Continue)
    }

    // Songs

    fn add_song(&mut self) -> Result<()> {
        self.prompt.heading("Add song")?;
        let title = self.prompt.required("Title: ")?;
        let artist = self.prompt.required("Artist: ")?;
        let genre = self.prompt.required("Genre: ")?;
        let duration = self
            .prompt
            .number("Duration (seconds): ", 1, Some(MAX_DURATION_SECS))?;

        let song = build_song(&title, &artist, &genre, duration)?;
        self.songs.create(&song)?;
        self.prompt.success(format!("added {}", song.display_title()))
    }

    fn list_songs(&mut self) -> Result<()> {
        self.prompt.heading("All songs")?;
        let songs = self.songs.read_all()?;
        self.print_songs(&songs)
    }

    fn search_songs(&mut self) -> Result<()> {
        self.prompt.heading("Search songs")?;
        let modes = ["by artist (exact)", "by genre (exact)", "by keyword"];
        let Some(mode) = self.prompt.choose("Search", &modes, |m| m.to_string())? else {
            return Ok(());
        };
        let term = self.prompt.required("Search for: ")?;

        let songs = match *mode {
            "by artist (exact)" => self.songs.read_by_artist(&term)?,
            "by genre (exact)" => self.songs.read_by_genre(&term)?,
            _ => self.songs.search(&term)?,
        };
        self.print_songs(&songs)
    }

    fn update_song(&mut self) -> Result<()> {
        self.prompt.heading("Update song")?;
        let Some(song) = self.pick_song()? else {
            return Ok(());
        };
        self.prompt.say("Leave a field blank to keep it.")?;

        let title = self.prompt.optional(&format!("Title [{}]: ", song.title))?;
        let artist = self.prompt.optional(&format!("Artist [{}]: ", song.artist))?;
        let genre = self.prompt.optional(&format!("Genre [{}]: ", song.genre))?;
        let duration = self
            .prompt
            .number_or("Duration (seconds)", song.duration, 1, MAX_DURATION_SECS)?;

        let updated = Song {
            title: title.unwrap_or_else(|| song.title.clone()),
            artist: artist.unwrap_or_else(|| song.artist.clone()),
            genre: genre.unwrap_or_else(|| song.genre.clone()),
            duration,
            ..song
        };
        if self.songs.update(&updated)? {
            self.prompt.success(format!("updated {}", updated.display_title()))
        } else {
            self.prompt.error("song no longer exists")
        }
    }

    fn delete_song(&mut self) -> Result<()> {
        self.prompt.heading("Delete song")?;
        let Some(song) = self.pick_song()? else {
            return Ok(());
        };
        if !self.prompt.confirm(&format!(
            "Delete {} and remove it from every playlist?",
            song.display_title()
        ))? {
            return self.prompt.say("Cancelled.");
        }

        if self.songs.delete(song.id)? {
            self.prompt.success(format!("deleted {}", song.display_title()))
        } else {
            self.prompt.error("song no longer exists")
        }
    }

    // Users

    fn add_user(&mut self) -> Result<()> {
        self.prompt.heading("Add user")?;
        let username = self.prompt.required("Username: ")?;
        let email = self.prompt.required("Email: ")?;

        let user = build_user(&username, &email)?;
        self.users.create(&user)?;
        self.prompt.success(format!("added user {}", user.username))
    }

    fn list_users(&mut self) -> Result<()> {
        self.prompt.heading("All users")?;
        let users = self.users.read_all()?;
        if users.is_empty() {
            return self.prompt.say("No users yet.");
        }
        for user in &users {
            self.prompt.say(format!("  {user}"))?;
        }
        self.prompt.say(format!("{} user(s)", users.len()))
    }

    fn find_user(&mut self) -> Result<()> {
        self.prompt.heading("Find user")?;
        let modes = ["by username", "by email"];
        let Some(mode) = self.prompt.choose("Find", &modes, |m| m.to_string())? else {
            return Ok(());
        };
        let term = self.prompt.required("Search for: ")?.to_lowercase();

        let found = match *mode {
            "by username" => self.users.read_by_username(&term)?,
            _ => self.users.read_by_email(&term)?,
        };
        match found {
            Some(user) => {
                let owned = self.playlists.read_by_owner(user.id)?.len();
                let joined = user.created_at.format("%Y-%m-%d");
                self.prompt
                    .say(format!("  {user} (joined {joined}, {owned} playlist(s))"))
            }
            None => self.prompt.say(format!("No user matches '{term}'.")),
        }
    }

    fn update_user(&mut self) -> Result<()> {
        self.prompt.heading("Update user")?;
        let Some(user) = self.pick_user()? else {
            return Ok(());
        };
        self.prompt.say("Leave a field blank to keep it.")?;

        let username = self.prompt.optional(&format!("Username [{}]: ", user.username))?;
        let email = self.prompt.optional(&format!("Email [{}]: ", user.email))?;

        let updated = User {
            username: username.map_or_else(|| user.username.clone(), |u| u.to_lowercase()),
            email: email.map_or_else(|| user.email.clone(), |e| e.to_lowercase()),
            ..user
        };
        if self.users.update(&updated)? {
            self.prompt.success(format!("updated user {}", updated.username))
        } else {
            self.prompt.error("user no longer exists")
        }
    }

    fn delete_user(&mut self) -> Result<()> {
        self.prompt.heading("Delete user")?;
        let Some(user) = self.pick_user()? else {
            return Ok(());
        };
        if !self.prompt.confirm(&format!(
            "Delete {} and all of their playlists?",
            user.username
        ))? {
            return self.prompt.say("Cancelled.");
        }

        if self.users.delete(user.id)? {
            self.prompt.success(format!("deleted user {}", user.username))
        } else {
            self.prompt.error("user no longer exists")
        }
    }

    // Playlists

    fn create_playlist(&mut self) -> Result<()> {
        self.prompt.heading("Create playlist")?;
        let Some(owner) = self.pick_user()? else {
            return Ok(());
        };
        let name = self.prompt.required("Playlist name: ")?;

        let playlist = build_playlist(&name, owner.id)?;
        self.playlists.create(&playlist)?;
        self.prompt
            .success(format!("created '{}' for {}", playlist.name, owner.username))
    }

    fn list_playlists(&mut self) -> Result<()> {
        self.prompt.heading("All playlists")?;
        let playlists = self.playlists.read_all()?;
        if playlists.is_empty() {
            return self.prompt.say("No playlists yet.");
        }
        for playlist in &playlists {
            let summary = self.playlist_summary(playlist)?;
            self.prompt.say(format!("  {summary}"))?;
        }
        self.prompt.say(format!("{} playlist(s)", playlists.len()))
    }

    fn show_playlist(&mut self) -> Result<()> {
        self.prompt.heading("Show playlist")?;
        let Some(playlist) = self.pick_playlist()? else {
            return Ok(());
        };

        let summary = self.playlist_summary(&playlist)?;
        self.prompt.say(summary)?;
        let tracks = self.playlists.get_tracks(playlist.id)?;
        if tracks.is_empty() {
            return self.prompt.say("  (no songs)");
        }
        for track in &tracks {
            self.prompt.say(format!("  {}", track_line(track, self.format)))?;
        }
        Ok(())
    }

    fn rename_playlist(&mut self) -> Result<()> {
        self.prompt.heading("Rename playlist")?;
        let Some(playlist) = self.pick_playlist()? else {
            return Ok(());
        };
        let name = self.prompt.required(&format!("New name [{}]: ", playlist.name))?;

        let renamed = Playlist { name, ..playlist };
        if self.playlists.update(&renamed)? {
            self.prompt.success(format!("renamed to '{}'", renamed.name))
        } else {
            self.prompt.error("playlist no longer exists")
        }
    }

    fn delete_playlist(&mut self) -> Result<()> {
        self.prompt.heading("Delete playlist")?;
        let Some(playlist) = self.pick_playlist()? else {
            return Ok(());
        };
        if !self
            .prompt
            .confirm(&format!("Delete playlist '{}'?", playlist.name))?
        {
            return self.prompt.say("Cancelled.");
        }

        if self.playlists.delete(playlist.id)? {
            self.prompt.success(format!("deleted '{}'", playlist.name))
        } else {
            self.prompt.error("playlist no longer exists")
        }
    }

    fn add_track(&mut self) -> Result<()> {
        self.prompt.heading("Add song to playlist")?;
        let Some(playlist) = self.pick_playlist()? else {
            return Ok(());
        };
        let Some(song) = self.pick_song()? else {
            return Ok(());
        };

        let position = self.playlists.add_track(playlist.id, song.id)?;
        self.prompt.success(format!(
            "{} is track {position} of '{}'",
            song.display_title(),
            playlist.name
        ))
    }

    fn remove_track(&mut self) -> Result<()> {
        self.prompt.heading("Remove song from playlist")?;
        let Some(playlist) = self.pick_playlist()? else {
            return Ok(());
        };
        let tracks = self.playlists.get_tracks(playlist.id)?;
        if tracks.is_empty() {
            return self.prompt.say("That playlist has no songs.");
        }
        let format = self.format;
        let Some(track) = self
            .prompt
            .choose("Track", &tracks, |t| track_line(t, format))?
        else {
            return Ok(());
        };

        if self.playlists.remove_track(playlist.id, track.song.id)? {
            self.prompt.success(format!(
                "removed {} from '{}'",
                track.song.display_title(),
                playlist.name
            ))
        } else {
            self.prompt.error("song is no longer in that playlist")
        }
    }

    // Library views

    fn sort_songs(&mut self) -> Result<()> {
        self.prompt.heading("Sort songs")?;
        let Some(&key) = self.prompt.choose("Sort by", &SortKey::ALL, |k| k.to_string())? else {
            return Ok(());
        };
        let Some(&order) = self.prompt.choose("Order", &SORT_ORDERS, |o| o.to_string())? else {
            return Ok(());
        };

        let songs = sorted(&self.songs.read_all()?, key, order);
        self.prompt.say(format!("Sorted by {key}, {order}:"))?;
        self.print_songs(&songs)
    }

    fn filter_songs(&mut self) -> Result<()> {
        self.prompt.heading("Filter songs")?;
        let mut filter = CompositeFilter::default();
        loop {
            self.prompt.say(format!("Active: {filter}"))?;
            self.prompt.say("  1. Genre\n  2. Artist\n  3. Duration range\n  4. Title contains\n  0. Apply")?;
            let next = match self.prompt.number("Add filter: ", 0, Some(4))? {
                1 => SongFilter::genre(self.prompt.required("Genre: ")?),
                2 => {
                    let value = self.prompt.required("Artist: ")?;
                    let exact = self.prompt.confirm("Exact match?")?;
                    SongFilter::Artist { value, exact }
                }
                3 => {
                    let min = self.prompt.number("Minimum seconds: ", 0, None)?;
                    let max = self.prompt.number("Maximum seconds: ", min, None)?;
                    SongFilter::duration_between(min, max)
                }
                4 => SongFilter::title_contains(self.prompt.required("Title contains: ")?),
                _ => break,
            };
            filter.push(next);
        }

        let songs = filter.apply(&self.songs.read_all()?);
        self.prompt.say(format!("Songs where {filter}:"))?;
        self.print_songs(&songs)
    }

    fn change_format(&mut self) -> Result<()> {
        self.prompt.heading("Duration format")?;
        self.prompt.say(format!("Current: {}", self.format))?;
        let Some(&format) = self.prompt.choose("Format", &DurationFormat::ALL, |f| {
            format!("{f} (e.g. {})", duration_text(*f, 354))
        })?
        else {
            return Ok(());
        };

        self.format = format;
        info!("duration format set to {format}");
        self.prompt.success(format!("durations now shown as {format}"))
    }

    // Shared pieces

    fn print_songs(&mut self, songs: &[Song]) -> Result<()> {
        if songs.is_empty() {
            return self.prompt.say("No songs found.");
        }
        for (idx, song) in songs.iter().enumerate() {
            self.prompt
                .say(format!("  {:>3}. {}", idx + 1, song_line(song, self.format)))?;
        }
        let total: i64 = songs.iter().map(|s| s.duration).sum();
        self.prompt.say(format!(
            "{} song(s), {} in total",
            songs.len(),
            duration_text(self.format, total)
        ))
    }

    fn playlist_summary(&self, playlist: &Playlist) -> Result<String> {
        let owner = self
            .users
            .read_by_id(playlist.owner_id)?
            .map_or_else(|| "unknown".to_string(), |u| u.username);
        let count = self.playlists.track_count(playlist.id)?;
        let total = self.playlists.get_total_duration(playlist.id)?;
        Ok(format!(
            "{} by {owner}: {count} song(s), {}",
            playlist.name,
            duration_text(self.format, total)
        ))
    }

    fn pick_song(&mut self) -> Result<Option<Song>> {
        let songs = self.songs.read_all()?;
        if songs.is_empty() {
            self.prompt.say("No songs yet.")?;
            return Ok(None);
        }
        let format = self.format;
        Ok(self
            .prompt
            .choose("Song", &songs, |s| song_line(s, format))?
            .cloned())
    }

    fn pick_user(&mut self) -> Result<Option<User>> {
        let users = self.users.read_all()?;
        if users.is_empty() {
            self.prompt.say("No users yet.")?;
            return Ok(None);
        }
        Ok(self
            .prompt
            .choose("User", &users, |u| u.to_string())?
            .cloned())
    }

    fn pick_playlist(&mut self) -> Result<Option<Playlist>> {
        let playlists = self.playlists.read_all()?;
        if playlists.is_empty() {
            self.prompt.say("No playlists yet.")?;
            return Ok(None);
        }
        Ok(self
            .prompt
            .choose("Playlist", &playlists, |p| p.to_string())?
            .cloned())
    }
}
