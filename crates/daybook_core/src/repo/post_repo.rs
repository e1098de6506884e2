//! Post repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the canonical `posts` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Construction rejects connections whose schema is not migration-ready.
//! - `list_posts` always orders descending by `id` (newest first).
//! - Missing rows are a silent no-op for `update_post`/`delete_post`
//!   (affected-count zero) and a `NotFound` error for `get_post`.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::post::{Post, PostId};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const POSTS_TABLE: &str = "posts";
const REQUIRED_COLUMNS: &[&str] = &["id", "content"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for post persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(PostId),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "post not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is not migrated to {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for post CRUD operations.
pub trait PostRepository {
    /// Persists new content and returns the stored post with its fresh id.
    fn insert_post(&self, content: &str) -> RepoResult<Post>;
    /// Replaces the content of the row matching `post.id`; returns the
    /// affected-row count (zero when the id no longer exists).
    fn update_post(&self, post: &Post) -> RepoResult<usize>;
    /// Removes the row matching `post.id`; returns the affected-row count.
    fn delete_post(&self, post: &Post) -> RepoResult<usize>;
    /// Point lookup failing with `NotFound` when no row matches.
    fn get_post(&self, id: PostId) -> RepoResult<Post>;
    /// Full collection, ordered descending by id.
    fn list_posts(&self) -> RepoResult<Vec<Post>>;
}

/// SQLite-backed post repository.
pub struct SqlitePostRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePostRepository<'conn> {
    /// Wraps a connection after verifying it is schema-ready.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not run.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema does
    ///   not match what this binary expects.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version == 0 || actual_version > expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let table_exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
            );",
            [POSTS_TABLE],
            |row| row.get(0),
        )?;
        if table_exists == 0 {
            return Err(RepoError::MissingRequiredTable(POSTS_TABLE));
        }

        for &column in REQUIRED_COLUMNS {
            let column_exists: i64 = conn.query_row(
                "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2;",
                [POSTS_TABLE, column],
                |row| row.get(0),
            )?;
            if column_exists == 0 {
                return Err(RepoError::MissingRequiredColumn {
                    table: POSTS_TABLE,
                    column,
                });
            }
        }

        Ok(Self { conn })
    }
}

impl PostRepository for SqlitePostRepository<'_> {
    fn insert_post(&self, content: &str) -> RepoResult<Post> {
        self.conn.execute(
            "INSERT INTO posts (content) VALUES (?1);",
            params![content],
        )?;
        Ok(Post::new(self.conn.last_insert_rowid(), content))
    }

    fn update_post(&self, post: &Post) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "UPDATE posts SET content = ?1 WHERE id = ?2;",
            params![post.content.as_str(), post.id],
        )?;
        Ok(changed)
    }

    fn delete_post(&self, post: &Post) -> RepoResult<usize> {
        let changed = self
            .conn
            .execute("DELETE FROM posts WHERE id = ?1;", params![post.id])?;
        Ok(changed)
    }

    fn get_post(&self, id: PostId) -> RepoResult<Post> {
        let post = self
            .conn
            .query_row(
                "SELECT id, content FROM posts WHERE id = ?1;",
                params![id],
                parse_post_row,
            )
            .optional()?;
        post.ok_or(RepoError::NotFound(id))
    }

    fn list_posts(&self) -> RepoResult<Vec<Post>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, content FROM posts ORDER BY id DESC;")?;
        let mut rows = stmt.query([])?;
        let mut posts = Vec::new();

        while let Some(row) = rows.next()? {
            posts.push(parse_post_row(row)?);
        }

        Ok(posts)
    }
}

fn parse_post_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get("id")?,
        content: row.get("content")?,
    })
}
