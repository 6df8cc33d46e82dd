use playlist_manager::db::schema;
use playlist_manager::factory::build_song;
use playlist_manager::{Database, Error, Repository, Song, SongRepository};
use rusqlite::params;

fn database() -> Database {
    let db = Database::in_memory().unwrap();
    schema::initialize(&db).unwrap();
    db
}

fn song_count(db: &Database) -> i64 {
    db.query_scalar("count songs", "SELECT COUNT(*) FROM songs", [])
        .unwrap()
}

#[test]
fn create_and_read_roundtrip() {
    let db = database();
    let repo = SongRepository::new(&db);

    let song = build_song("Bohemian Rhapsody", "Queen", "Rock", 354).unwrap();
    let id = repo.create(&song).unwrap();
    assert_eq!(id, song.id);

    let loaded = repo.read_by_id(id).unwrap().unwrap();
    assert_eq!(loaded, song);
    assert!(repo.exists(id).unwrap());
}

#[test]
fn special_characters_survive_storage() {
    let db = database();
    let repo = SongRepository::new(&db);

    let song = build_song(
        "Bohemian Rhapsody (Rock Opera) - Remastered [2009]",
        "Queen & Freddie Mercury's 'True' Collection",
        "Rock/Opera",
        354,
    )
    .unwrap();
    repo.create(&song).unwrap();

    let loaded = repo.read_by_id(song.id).unwrap().unwrap();
    assert_eq!(loaded.title, song.title);
    assert_eq!(loaded.artist, song.artist);
    assert_eq!(loaded.genre, "Rock/Opera");
}

#[test]
fn non_positive_duration_is_rejected_without_a_write() {
    let db = database();
    let repo = SongRepository::new(&db);

    for duration in [0, -5] {
        let mut song = build_song("Silence", "Nobody", "Ambient", 1).unwrap();
        song.duration = duration;

        let err = repo.create(&song).unwrap_err();
        assert!(err.is_validation(), "unexpected error: {err}");
    }
    assert!(build_song("Silence", "Nobody", "Ambient", 0).is_err());
    assert_eq!(song_count(&db), 0);
}

#[test]
fn check_constraint_backs_up_validation() {
    let db = database();

    let err = db
        .execute_update(
            "raw insert",
            "INSERT INTO songs (id, title, artist, genre, duration, created_at)
             VALUES ('x', 't', 'a', 'g', 0, '2024-01-01 00:00:00+00:00')",
            [],
        )
        .unwrap_err();
    assert!(matches!(err, Error::Constraint { .. }), "unexpected error: {err}");
    assert_eq!(song_count(&db), 0);
}

#[test]
fn read_missing_song_is_none() {
    let db = database();
    let repo = SongRepository::new(&db);

    let id = uuid::Uuid::new_v4();
    assert!(repo.read_by_id(id).unwrap().is_none());
    assert!(!repo.exists(id).unwrap());
    assert!(!repo.delete(id).unwrap());
}

#[test]
fn read_all_is_newest_first() {
    let db = database();
    let repo = SongRepository::new(&db);

    let titles = ["First", "Second", "Third"];
    for title in titles {
        repo.create(&build_song(title, "Band", "Pop", 100).unwrap())
            .unwrap();
    }

    let loaded: Vec<String> = repo.read_all().unwrap().into_iter().map(|s| s.title).collect();
    assert_eq!(loaded, ["Third", "Second", "First"]);
}

#[test]
fn read_by_artist_and_genre_match_exactly() {
    let db = database();
    let repo = SongRepository::new(&db);

    let songs = [
        ("Bohemian Rhapsody", "Queen", "Rock", 354),
        ("Under Pressure", "Queen", "Rock", 248),
        ("Radio Ga Ga", "Queen", "Pop", 343),
        ("Imagine", "John Lennon", "Rock", 183),
        ("So What", "Miles Davis", "Jazz", 545),
    ];
    for (title, artist, genre, duration) in songs {
        repo.create(&build_song(title, artist, genre, duration).unwrap())
            .unwrap();
    }

    let queen = repo.read_by_artist("Queen").unwrap();
    assert_eq!(queen.len(), 3);
    assert!(queen.iter().all(|s| s.artist == "Queen"));
    assert_eq!(queen[0].title, "Radio Ga Ga");

    assert!(repo.read_by_artist("queen").unwrap().is_empty());
    assert_eq!(repo.read_by_genre("Rock").unwrap().len(), 3);
    assert_eq!(repo.read_by_genre("Jazz").unwrap().len(), 1);
    assert!(repo.read_by_genre("Metal").unwrap().is_empty());
}

#[test]
fn search_matches_title_or_artist_case_insensitively() {
    let db = database();
    let repo = SongRepository::new(&db);

    repo.create(&build_song("Hotel California", "Eagles", "Rock", 391).unwrap())
        .unwrap();
    repo.create(&build_song("100% Pure Love", "Crystal Waters", "House", 240).unwrap())
        .unwrap();
    repo.create(&build_song("California Love", "2Pac", "Hip-Hop", 285).unwrap())
        .unwrap();

    let hits: Vec<String> = repo
        .search("CALIFORNIA")
        .unwrap()
        .into_iter()
        .map(|s| s.title)
        .collect();
    assert_eq!(hits, ["California Love", "Hotel California"]);

    assert_eq!(repo.search("eagles").unwrap().len(), 1);
    assert_eq!(repo.search("100%").unwrap().len(), 1);
    assert_eq!(repo.search("%").unwrap().len(), 1);
    assert!(repo.search("   ").unwrap().is_empty());
}

#[test]
fn update_rewrites_metadata_only() {
    let db = database();
    let repo = SongRepository::new(&db);

    let song = build_song("Yesterdy", "Beatles", "Rock", 120).unwrap();
    repo.create(&song).unwrap();

    let fixed = Song {
        title: "Yesterday".into(),
        artist: "The Beatles".into(),
        duration: 125,
        ..song.clone()
    };
    assert!(repo.update(&fixed).unwrap());

    let loaded = repo.read_by_id(song.id).unwrap().unwrap();
    assert_eq!(loaded, fixed);
    assert_eq!(loaded.created_at, song.created_at);

    let ghost = build_song("Ghost", "Nobody", "Pop", 100).unwrap();
    assert!(!repo.update(&ghost).unwrap());

    let invalid = Song {
        duration: 0,
        ..fixed
    };
    assert!(repo.update(&invalid).unwrap_err().is_validation());
    assert_eq!(repo.read_by_id(song.id).unwrap().unwrap().duration, 125);
}

#[test]
fn unreadable_id_is_invalid_data() {
    let db = database();
    db.execute_update(
        "raw insert",
        "INSERT INTO songs (id, title, artist, genre, duration, created_at)
         VALUES ('not-a-uuid', 't', 'a', 'g', 10, ?1)",
        params![playlist_manager::factory::timestamp_now()],
    )
    .unwrap();

    let err = SongRepository::new(&db).read_all().unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)), "unexpected error: {err}");
}
