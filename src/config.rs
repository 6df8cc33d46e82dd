//! Command-line configuration. Everything has a default so a bare
//! `playlist-manager` run works from any writable directory.

use std::path::PathBuf;

use clap::Parser;

/// SQLite file created in the working directory unless overridden.
pub const DEFAULT_DB_PATH: &str = "playlist_manager.db";
pub const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "playlist-manager")]
#[command(about = "Interactive playlist manager backed by SQLite")]
#[command(version)]
pub struct Config {
    /// SQLite database file (created if missing)
    #[arg(long, value_name = "PATH", default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,

    /// Directory receiving one timestamped log file per run
    #[arg(long, value_name = "DIR", default_value = DEFAULT_LOG_DIR)]
    pub log_dir: PathBuf,

    /// Log level: trace, debug, info, warn, error, or off
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Insert a small sample library when the database is empty
    #[arg(long)]
    pub seed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_working_directory() {
        let config = Config::try_parse_from(["playlist-manager"]).unwrap();
        assert_eq!(config.db, PathBuf::from(DEFAULT_DB_PATH));
        assert_eq!(config.log_dir, PathBuf::from(DEFAULT_LOG_DIR));
        assert_eq!(config.log_level, "info");
        assert!(!config.seed);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "playlist-manager",
            "--db",
            "/tmp/music.db",
            "--log-level",
            "debug",
            "--seed",
        ])
        .unwrap();
        assert_eq!(config.db, PathBuf::from("/tmp/music.db"));
        assert_eq!(config.log_level, "debug");
        assert!(config.seed);
    }
}
