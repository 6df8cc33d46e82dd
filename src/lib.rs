//! Core library surface for the playlist manager.
//!
//! The binary in `main.rs` only wires these pieces together; tests and any
//! other tooling reuse the same repositories, strategies, and menu.
pub mod config;
pub mod db;
pub mod error;
pub mod factory;
pub mod logging;
pub mod models;
pub mod seed;
pub mod strategies;
pub mod ui;

/// Persistence entry points most callers need.
pub use db::{Database, DbLocation, PlaylistRepository, Repository, SongRepository, UserRepository};

pub use error::{Error, Result};

/// The domain types every layer passes around.
pub use models::{Playlist, PlaylistTrack, Song, User};

/// The interactive menu and its driver.
pub use ui::{run_app, App};
