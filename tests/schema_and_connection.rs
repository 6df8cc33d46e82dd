use playlist_manager::db::schema;
use playlist_manager::factory::{build_song, build_user};
use playlist_manager::{Database, DbLocation, Error, Repository, SongRepository, UserRepository};

const TABLES: [&str; 4] = ["playlist_songs", "playlists", "songs", "users"];
const INDEXES: [&str; 3] = [
    "idx_playlist_songs_playlist_id",
    "idx_playlist_songs_song_id",
    "idx_playlists_owner_id",
];

#[test]
fn initialize_creates_tables_and_indexes() {
    let db = Database::in_memory().unwrap();
    assert!(schema::table_names(&db).unwrap().is_empty());

    schema::initialize(&db).unwrap();
    assert_eq!(schema::table_names(&db).unwrap(), TABLES);
    assert_eq!(schema::index_names(&db).unwrap(), INDEXES);
    assert_eq!(
        schema::trigger_names(&db).unwrap(),
        ["trg_playlist_songs_compact"]
    );
}

#[test]
fn initialize_is_idempotent_and_keeps_data() {
    let db = Database::in_memory().unwrap();
    schema::initialize(&db).unwrap();

    let song = build_song("Imagine", "John Lennon", "Rock", 183).unwrap();
    SongRepository::new(&db).create(&song).unwrap();

    schema::initialize(&db).unwrap();
    schema::initialize(&db).unwrap();
    assert_eq!(schema::table_names(&db).unwrap(), TABLES);
    assert_eq!(schema::trigger_names(&db).unwrap().len(), 1);
    assert_eq!(SongRepository::new(&db).read_all().unwrap(), vec![song]);
}

#[test]
fn drop_all_removes_every_table() {
    let db = Database::in_memory().unwrap();
    schema::initialize(&db).unwrap();
    UserRepository::new(&db)
        .create(&build_user("alice", "alice@example.com").unwrap())
        .unwrap();

    schema::drop_all(&db).unwrap();
    assert!(schema::table_names(&db).unwrap().is_empty());
    assert!(schema::index_names(&db).unwrap().is_empty());
    assert!(schema::trigger_names(&db).unwrap().is_empty());

    let err = UserRepository::new(&db).read_all().unwrap_err();
    assert!(matches!(err, Error::Storage { .. }), "unexpected error: {err}");

    schema::initialize(&db).unwrap();
    assert!(UserRepository::new(&db).read_all().unwrap().is_empty());
}

#[test]
fn foreign_keys_are_enforced() {
    let db = Database::in_memory().unwrap();
    let enabled: i64 = db
        .query_scalar("read pragma", "PRAGMA foreign_keys", [])
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn file_database_persists_across_reconnects() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("playlist_manager.db");

    let mut db = Database::new(DbLocation::File(path.clone()));
    assert!(!db.is_connected());
    db.connect().unwrap();
    db.connect().unwrap();
    assert!(path.exists());

    schema::initialize(&db).unwrap();
    let song = build_song("Bohemian Rhapsody", "Queen", "Rock", 354).unwrap();
    SongRepository::new(&db).create(&song).unwrap();

    db.disconnect().unwrap();
    assert!(!db.is_connected());
    assert!(matches!(
        SongRepository::new(&db).read_all(),
        Err(Error::NotConnected)
    ));

    db.connect().unwrap();
    schema::initialize(&db).unwrap();
    let loaded = SongRepository::new(&db).read_by_id(song.id).unwrap();
    assert_eq!(loaded, Some(song));
    db.disconnect().unwrap();
}

#[test]
fn separate_handles_see_committed_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.db");

    let writer = Database::open(&path).unwrap();
    schema::initialize(&writer).unwrap();
    let user = build_user("bob", "bob@example.com").unwrap();
    UserRepository::new(&writer).create(&user).unwrap();

    let reader = Database::open(&path).unwrap();
    assert_eq!(
        UserRepository::new(&reader).read_by_username("bob").unwrap(),
        Some(user)
    );
}
