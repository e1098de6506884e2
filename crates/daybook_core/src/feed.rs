//! Live full-collection feed over journal posts.
//!
//! # Responsibility
//! - Deliver a fresh, fully-ordered snapshot of the `posts` table to every
//!   subscriber after each committed row-changing mutation.
//! - Hand each new subscriber the current snapshot immediately, then the
//!   same stream of deltas-as-snapshots every other subscriber sees.
//!
//! # Invariants
//! - Emissions are complete snapshots ordered by `id` descending, never
//!   incremental diffs.
//! - Dropping a subscription cancels it; the publisher prunes the dead
//!   channel on its next publish.

use crate::model::post::Post;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

/// Terminal feed state: the owning store has shut down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedClosed;

impl Display for FeedClosed {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "post feed closed: the journal store has shut down")
    }
}

impl Error for FeedClosed {}

/// Receiving half of the live post feed.
///
/// The sequence is infinite while the store lives; `recv` returns
/// [`FeedClosed`] once the store is gone and all queued snapshots have been
/// consumed.
pub struct FeedSubscription {
    rx: Receiver<Vec<Post>>,
}

impl FeedSubscription {
    /// Blocks until the next snapshot is emitted.
    pub fn recv(&self) -> Result<Vec<Post>, FeedClosed> {
        self.rx.recv().map_err(|_| FeedClosed)
    }

    /// Returns the next queued snapshot without blocking.
    pub fn try_recv(&self) -> Result<Option<Vec<Post>>, FeedClosed> {
        match self.rx.try_recv() {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(FeedClosed),
        }
    }

    /// Drains every queued emission and returns the newest one, if any.
    ///
    /// Pull-style consumers use this to skip intermediate snapshots they
    /// never rendered.
    pub fn latest(&self) -> Result<Option<Vec<Post>>, FeedClosed> {
        let mut newest = None;
        loop {
            match self.try_recv() {
                Ok(Some(snapshot)) => newest = Some(snapshot),
                Ok(None) => return Ok(newest),
                // Queued snapshots drained before the store went away are
                // still current enough to hand out.
                Err(FeedClosed) if newest.is_some() => return Ok(newest),
                Err(FeedClosed) => return Err(FeedClosed),
            }
        }
    }
}

/// Sending half of the feed, owned by the store worker.
pub(crate) struct FeedPublisher {
    subscribers: Vec<Sender<Vec<Post>>>,
}

impl FeedPublisher {
    pub(crate) fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    /// Registers a subscriber and seeds it with the current snapshot.
    pub(crate) fn subscribe(&mut self, snapshot: Vec<Post>) -> FeedSubscription {
        let (tx, rx) = channel();
        // A freshly created channel cannot be disconnected yet.
        let _ = tx.send(snapshot);
        self.subscribers.push(tx);
        FeedSubscription { rx }
    }

    /// Fans the snapshot out to all live subscribers, pruning dead ones.
    pub(crate) fn publish(&mut self, snapshot: &[Post]) {
        self.subscribers
            .retain(|subscriber| subscriber.send(snapshot.to_vec()).is_ok());
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
