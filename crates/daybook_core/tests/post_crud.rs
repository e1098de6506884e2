use daybook_core::db::migrations::latest_version;
use daybook_core::db::open_db_in_memory;
use daybook_core::{Post, PostRepository, RepoError, SqlitePostRepository};
use rusqlite::Connection;

#[test]
fn insert_then_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePostRepository::try_new(&conn).unwrap();

    let created = repo.insert_post("first entry").unwrap();

    let loaded = repo.get_post(created.id).unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.content, "first entry");
}

#[test]
fn insert_assigns_strictly_increasing_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePostRepository::try_new(&conn).unwrap();

    let first = repo.insert_post("one").unwrap();
    let second = repo.insert_post("two").unwrap();
    let third = repo.insert_post("three").unwrap();

    assert!(first.id < second.id);
    assert!(second.id < third.id);
}

#[test]
fn empty_and_duplicate_content_are_accepted() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePostRepository::try_new(&conn).unwrap();

    let empty = repo.insert_post("").unwrap();
    let twin_a = repo.insert_post("same words").unwrap();
    let twin_b = repo.insert_post("same words").unwrap();

    assert_eq!(repo.get_post(empty.id).unwrap().content, "");
    assert_ne!(twin_a.id, twin_b.id);
    assert_eq!(repo.list_posts().unwrap().len(), 3);
}

#[test]
fn update_changes_only_the_matching_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePostRepository::try_new(&conn).unwrap();

    let target = repo.insert_post("draft").unwrap();
    let bystander = repo.insert_post("untouched").unwrap();

    let changed = repo.update_post(&target.with_content("final")).unwrap();
    assert_eq!(changed, 1);

    assert_eq!(repo.get_post(target.id).unwrap().content, "final");
    assert_eq!(repo.get_post(bystander.id).unwrap().content, "untouched");
}

#[test]
fn update_missing_id_returns_zero_and_leaves_table_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePostRepository::try_new(&conn).unwrap();

    let existing = repo.insert_post("kept as-is").unwrap();
    let ghost = Post::new(existing.id + 100, "never lands");

    assert_eq!(repo.update_post(&ghost).unwrap(), 0);
    assert_eq!(repo.list_posts().unwrap(), vec![existing]);
}

#[test]
fn delete_removes_exactly_one_row_and_get_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePostRepository::try_new(&conn).unwrap();

    let doomed = repo.insert_post("to remove").unwrap();
    let survivor = repo.insert_post("to keep").unwrap();

    assert_eq!(repo.delete_post(&doomed).unwrap(), 1);

    let err = repo.get_post(doomed.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == doomed.id));
    assert_eq!(repo.list_posts().unwrap(), vec![survivor]);
}

#[test]
fn delete_missing_id_is_a_silent_noop() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePostRepository::try_new(&conn).unwrap();

    let gone = repo.insert_post("short lived").unwrap();
    assert_eq!(repo.delete_post(&gone).unwrap(), 1);
    assert_eq!(repo.delete_post(&gone).unwrap(), 0);
}

#[test]
fn list_orders_descending_by_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePostRepository::try_new(&conn).unwrap();

    for content in ["oldest", "middle", "newest"] {
        repo.insert_post(content).unwrap();
    }

    let posts = repo.list_posts().unwrap();
    assert_eq!(posts.len(), 3);
    assert_eq!(posts[0].content, "newest");
    assert_eq!(posts[2].content, "oldest");
    assert!(posts.windows(2).all(|pair| pair[0].id > pair[1].id));
}

#[test]
fn ids_are_never_reused_after_delete() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePostRepository::try_new(&conn).unwrap();

    repo.insert_post("a").unwrap();
    let newest = repo.insert_post("b").unwrap();
    repo.delete_post(&newest).unwrap();

    let replacement = repo.insert_post("c").unwrap();
    assert!(replacement.id > newest.id);
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqlitePostRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_posts_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqlitePostRepository::try_new(&conn);
    assert!(matches!(result, Err(RepoError::MissingRequiredTable("posts"))));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE posts (id INTEGER PRIMARY KEY AUTOINCREMENT);")
        .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqlitePostRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "posts",
            column: "content"
        })
    ));
}
