//! Persistence layer split across logical submodules: the connection owner,
//! the schema bootstrap, the shared repository contract, and one repository
//! per table family.

mod connection;
mod playlists;
mod repository;
pub mod schema;
mod songs;
mod users;

pub use connection::{Database, DbLocation, Record, Statement};
pub use playlists::PlaylistRepository;
pub use repository::Repository;
pub use songs::SongRepository;
pub use users::UserRepository;
