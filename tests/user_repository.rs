use playlist_manager::db::schema;
use playlist_manager::factory::{build_playlist, build_song, build_user};
use playlist_manager::{
    Database, Error, PlaylistRepository, Repository, SongRepository, User, UserRepository,
};

fn database() -> Database {
    let db = Database::in_memory().unwrap();
    schema::initialize(&db).unwrap();
    db
}

#[test]
fn create_and_lookup_by_each_key() {
    let db = database();
    let repo = UserRepository::new(&db);

    let user = build_user("alice", "alice@example.com").unwrap();
    repo.create(&user).unwrap();

    assert_eq!(repo.read_by_id(user.id).unwrap().unwrap(), user);
    assert_eq!(repo.read_by_username("alice").unwrap().unwrap(), user);
    assert_eq!(repo.read_by_email("alice@example.com").unwrap().unwrap(), user);
    assert!(repo.read_by_username("bob").unwrap().is_none());
    assert!(repo.read_by_email("bob@example.com").unwrap().is_none());
}

#[test]
fn factory_normalizes_case() {
    let user = build_user("  Alice ", "Alice@Example.COM").unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(user.email, "alice@example.com");
}

#[test]
fn duplicate_username_or_email_is_a_constraint_error() {
    let db = database();
    let repo = UserRepository::new(&db);

    let alice = build_user("alice", "alice@example.com").unwrap();
    repo.create(&alice).unwrap();

    let same_name = build_user("alice", "other@example.com").unwrap();
    let err = repo.create(&same_name).unwrap_err();
    assert!(err.is_constraint_violation(), "unexpected error: {err}");

    let same_email = build_user("alice2", "alice@example.com").unwrap();
    let err = repo.create(&same_email).unwrap_err();
    assert!(matches!(err, Error::Constraint { .. }), "unexpected error: {err}");

    let users = repo.read_all().unwrap();
    assert_eq!(users, vec![alice]);
}

#[test]
fn invalid_users_are_rejected() {
    assert!(build_user("", "a@example.com").unwrap_err().is_validation());
    assert!(build_user("al", "a@example.com").unwrap_err().is_validation());
    assert!(build_user("bad name", "a@example.com").unwrap_err().is_validation());
    assert!(build_user("alice", "not-an-email").unwrap_err().is_validation());
}

#[test]
fn update_cannot_steal_another_users_email() {
    let db = database();
    let repo = UserRepository::new(&db);

    let alice = build_user("alice", "alice@example.com").unwrap();
    let bob = build_user("bob", "bob@example.com").unwrap();
    repo.create(&alice).unwrap();
    repo.create(&bob).unwrap();

    let renamed = User {
        username: "robert".into(),
        ..bob.clone()
    };
    assert!(repo.update(&renamed).unwrap());
    assert_eq!(repo.read_by_id(bob.id).unwrap().unwrap().username, "robert");

    let thief = User {
        email: alice.email.clone(),
        ..renamed.clone()
    };
    assert!(repo.update(&thief).unwrap_err().is_constraint_violation());
    assert_eq!(repo.read_by_id(bob.id).unwrap().unwrap(), renamed);
}

#[test]
fn deleting_a_user_cascades_to_playlists() {
    let db = database();
    let users = UserRepository::new(&db);
    let playlists = PlaylistRepository::new(&db);

    let alice = build_user("alice", "alice@example.com").unwrap();
    let bob = build_user("bob", "bob@example.com").unwrap();
    users.create(&alice).unwrap();
    users.create(&bob).unwrap();

    let mix = build_playlist("Mix", alice.id).unwrap();
    let road = build_playlist("Road", alice.id).unwrap();
    let chill = build_playlist("Chill", bob.id).unwrap();
    for playlist in [&mix, &road, &chill] {
        playlists.create(playlist).unwrap();
    }
    let song = build_song("Imagine", "John Lennon", "Rock", 183).unwrap();
    SongRepository::new(&db).create(&song).unwrap();
    playlists.add_track(mix.id, song.id).unwrap();
    playlists.add_track(chill.id, song.id).unwrap();

    assert!(users.delete(alice.id).unwrap());
    assert!(!users.exists(alice.id).unwrap());
    assert!(playlists.read_by_id(mix.id).unwrap().is_none());
    assert!(playlists.read_by_id(road.id).unwrap().is_none());
    assert!(playlists.get_tracks(mix.id).unwrap().is_empty());
    assert_eq!(playlists.track_count(chill.id).unwrap(), 1);
    assert!(playlists.read_by_owner(alice.id).unwrap().is_empty());
    assert_eq!(playlists.read_all().unwrap(), vec![chill]);

    assert!(!users.delete(alice.id).unwrap());
}
