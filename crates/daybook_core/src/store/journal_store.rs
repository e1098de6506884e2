//! Serialized journal store with a live snapshot feed.
//!
//! # Responsibility
//! - Apply every mutation on one worker thread, strictly in submission
//!   order, so no two operations ever race on a row.
//! - Publish a fresh full-collection snapshot after each committed mutation
//!   that changed at least one row.
//! - Offer both a blocking surface (callers wait for the result) and a
//!   fire-and-forget surface (callers observe completion through the feed).
//!
//! # Invariants
//! - `subscribe` is serialized with mutations, so the seed snapshot can
//!   never interleave with a concurrent write's publication.
//! - No-op mutations (affected-count zero) leave the feed silent.
//! - Dropping the store shuts the worker down and closes every feed.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::feed::{FeedPublisher, FeedSubscription};
use crate::model::post::{Post, PostId};
use crate::repo::post_repo::{PostRepository, RepoError, RepoResult, SqlitePostRepository};
use log::{error, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error surface of the asynchronous store.
#[derive(Debug)]
pub enum StoreError {
    /// Persistence-layer failure, propagated unchanged.
    Repo(RepoError),
    /// The worker has shut down; no further operations are possible.
    Closed,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Closed => write!(f, "journal store is closed"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Closed => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Repo(RepoError::Db(value))
    }
}

enum StoreCommand {
    Insert {
        content: String,
        reply: Option<Sender<StoreResult<Post>>>,
    },
    Update {
        post: Post,
        reply: Option<Sender<StoreResult<usize>>>,
    },
    Delete {
        post: Post,
        reply: Option<Sender<StoreResult<usize>>>,
    },
    Get {
        id: PostId,
        reply: Sender<StoreResult<Post>>,
    },
    Subscribe {
        reply: Sender<StoreResult<FeedSubscription>>,
    },
    Shutdown,
}

/// Durable post storage with a serialized worker and live feed.
pub struct JournalStore {
    commands: Sender<StoreCommand>,
    worker: Option<JoinHandle<()>>,
}

impl JournalStore {
    /// Opens a file-backed store, migrating the schema as needed.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::with_connection(open_db(path)?)
    }

    /// Opens an in-memory store; state is lost on drop.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_connection(open_db_in_memory()?)
    }

    /// Starts the worker over an already-bootstrapped connection.
    ///
    /// # Errors
    /// - Schema-readiness failures from `SqlitePostRepository::try_new`.
    pub fn with_connection(conn: Connection) -> StoreResult<Self> {
        // Validate here, while the error can still reach the caller; the
        // worker re-checks on its own thread before serving commands.
        SqlitePostRepository::try_new(&conn)?;

        let (commands, inbox) = channel();
        let worker = thread::spawn(move || run_worker(conn, inbox));

        Ok(Self {
            commands,
            worker: Some(worker),
        })
    }

    /// Creates a post and waits for its assigned id.
    pub fn insert(&self, content: impl Into<String>) -> StoreResult<Post> {
        let content = content.into();
        self.request(|reply| StoreCommand::Insert {
            content,
            reply: Some(reply),
        })
    }

    /// Replaces the content of the row matching `post.id`.
    ///
    /// Returns the affected-row count; zero signals the id no longer
    /// exists, which is not an error.
    pub fn update(&self, post: &Post) -> StoreResult<usize> {
        let post = post.clone();
        self.request(|reply| StoreCommand::Update {
            post,
            reply: Some(reply),
        })
    }

    /// Removes the row matching `post.id`; no-op when absent.
    pub fn delete(&self, post: &Post) -> StoreResult<()> {
        let post = post.clone();
        self.request(|reply| StoreCommand::Delete {
            post,
            reply: Some(reply),
        })
        .map(|_| ())
    }

    /// Point lookup; fails with `RepoError::NotFound` for missing ids.
    pub fn get(&self, id: PostId) -> StoreResult<Post> {
        self.request(|reply| StoreCommand::Get { id, reply })
    }

    /// Registers a live feed subscription.
    ///
    /// The subscription immediately receives the current snapshot, then one
    /// fresh snapshot per subsequent row-changing mutation.
    pub fn subscribe(&self) -> StoreResult<FeedSubscription> {
        self.request(|reply| StoreCommand::Subscribe { reply })
    }

    /// Queues an insert without waiting for the result.
    pub fn submit_insert(&self, content: impl Into<String>) -> StoreResult<()> {
        self.dispatch(StoreCommand::Insert {
            content: content.into(),
            reply: None,
        })
    }

    /// Queues an update without waiting for the result.
    pub fn submit_update(&self, post: Post) -> StoreResult<()> {
        self.dispatch(StoreCommand::Update { post, reply: None })
    }

    /// Queues a delete without waiting for the result.
    pub fn submit_delete(&self, post: Post) -> StoreResult<()> {
        self.dispatch(StoreCommand::Delete { post, reply: None })
    }

    fn dispatch(&self, command: StoreCommand) -> StoreResult<()> {
        self.commands.send(command).map_err(|_| StoreError::Closed)
    }

    fn request<T>(
        &self,
        make: impl FnOnce(Sender<StoreResult<T>>) -> StoreCommand,
    ) -> StoreResult<T> {
        let (reply_tx, reply_rx) = channel();
        self.dispatch(make(reply_tx))?;
        reply_rx.recv().unwrap_or(Err(StoreError::Closed))
    }
}

impl Drop for JournalStore {
    fn drop(&mut self) {
        let _ = self.commands.send(StoreCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn run_worker(conn: Connection, inbox: Receiver<StoreCommand>) {
    let repo = match SqlitePostRepository::try_new(&conn) {
        Ok(repo) => repo,
        Err(err) => {
            error!("event=store_start module=store status=error error={err}");
            return;
        }
    };
    let mut feed = FeedPublisher::new();

    while let Ok(command) = inbox.recv() {
        match command {
            StoreCommand::Insert { content, reply } => {
                let result = repo.insert_post(&content);
                match &result {
                    Ok(post) => {
                        info!("event=post_insert module=store status=ok id={}", post.id);
                        publish_current(&repo, &mut feed);
                    }
                    Err(err) => {
                        error!("event=post_insert module=store status=error error={err}");
                    }
                }
                send_reply(reply, result);
            }
            StoreCommand::Update { post, reply } => {
                let result = repo.update_post(&post);
                match &result {
                    Ok(0) => {
                        info!("event=post_update module=store status=noop id={}", post.id);
                    }
                    Ok(_) => {
                        info!("event=post_update module=store status=ok id={}", post.id);
                        publish_current(&repo, &mut feed);
                    }
                    Err(err) => {
                        error!(
                            "event=post_update module=store status=error id={} error={err}",
                            post.id
                        );
                    }
                }
                send_reply(reply, result);
            }
            StoreCommand::Delete { post, reply } => {
                let result = repo.delete_post(&post);
                match &result {
                    Ok(0) => {
                        info!("event=post_delete module=store status=noop id={}", post.id);
                    }
                    Ok(_) => {
                        info!("event=post_delete module=store status=ok id={}", post.id);
                        publish_current(&repo, &mut feed);
                    }
                    Err(err) => {
                        error!(
                            "event=post_delete module=store status=error id={} error={err}",
                            post.id
                        );
                    }
                }
                send_reply(reply, result);
            }
            StoreCommand::Get { id, reply } => {
                let _ = reply.send(repo.get_post(id).map_err(StoreError::Repo));
            }
            StoreCommand::Subscribe { reply } => match repo.list_posts() {
                Ok(snapshot) => {
                    info!(
                        "event=feed_subscribe module=store status=ok subscribers={}",
                        feed.subscriber_count() + 1
                    );
                    let _ = reply.send(Ok(feed.subscribe(snapshot)));
                }
                Err(err) => {
                    error!("event=feed_subscribe module=store status=error error={err}");
                    let _ = reply.send(Err(StoreError::Repo(err)));
                }
            },
            StoreCommand::Shutdown => break,
        }
    }

    info!("event=store_shutdown module=store status=ok");
}

fn send_reply<T>(reply: Option<Sender<StoreResult<T>>>, result: RepoResult<T>) {
    if let Some(reply) = reply {
        // A caller that stopped waiting is not an error.
        let _ = reply.send(result.map_err(StoreError::Repo));
    }
}

fn publish_current(repo: &SqlitePostRepository<'_>, feed: &mut FeedPublisher) {
    match repo.list_posts() {
        Ok(snapshot) => feed.publish(&snapshot),
        Err(err) => error!("event=feed_publish module=store status=error error={err}"),
    }
}
