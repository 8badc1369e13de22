// ── Reactive card snapshot stream ──
//
// Subscription type for consuming snapshot replacements from the
// CardStore.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::model::Card;

/// A subscription to the card snapshot.
///
/// Provides both point-in-time snapshot access and reactive change
/// notification via the `changed()` method or by converting to a
/// `Stream`.
pub struct CardStream {
    current: Arc<Vec<Arc<Card>>>,
    receiver: watch::Receiver<Arc<Vec<Arc<Card>>>>,
}

impl CardStream {
    pub(crate) fn new(receiver: watch::Receiver<Arc<Vec<Arc<Card>>>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// Get the snapshot captured at creation time.
    pub fn current(&self) -> &Arc<Vec<Arc<Card>>> {
        &self.current
    }

    /// Get the latest snapshot (may have changed since creation).
    pub fn latest(&self) -> Arc<Vec<Arc<Card>>> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next replacement, returning the new snapshot.
    /// Returns `None` if the sender (CardStore) has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<Vec<Arc<Card>>>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> CardWatchStream {
        CardWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields a new snapshot each time the store contents are replaced.
pub struct CardWatchStream {
    inner: WatchStream<Arc<Vec<Arc<Card>>>>,
}

impl Stream for CardWatchStream {
    type Item = Arc<Vec<Arc<Card>>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
