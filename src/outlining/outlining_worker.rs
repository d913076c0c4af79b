use std::sync::Arc;

use tokio::sync::{mpsc::UnboundedReceiver, RwLock};

use super::region_tagger::RegionTagger;
use crate::text::text_buffer::{BufferChanged, TextBuffer, TextSource};

/// Keeps a `RegionTagger` in sync with its buffer.
///
/// Reparses run one at a time on the worker task. Each one is deferred until
/// the runtime is idle and reads the buffer when it runs, so a burst of edits
/// is covered by whichever reparse runs last. Edit history the tagger no
/// longer needs is discarded from the buffer after each reparse.
pub struct OutliningWorker {
    buffer: Arc<RwLock<TextBuffer>>,
    tagger: Arc<RwLock<RegionTagger>>,
    events: UnboundedReceiver<BufferChanged>,
}

impl OutliningWorker {
    pub async fn new(buffer: Arc<RwLock<TextBuffer>>) -> OutliningWorker {
        let mut guard = buffer.write().await;
        let events = guard.subscribe();
        let tagger = Arc::new(RwLock::new(RegionTagger::new(&*guard)));
        drop(guard);
        OutliningWorker {
            buffer,
            tagger,
            events,
        }
    }

    /// Shared handle for tag queries and change subscriptions.
    ///
    /// The worker takes this lock and the buffer lock one at a time, callers may
    /// hold either while waiting for the other.
    pub fn tagger(&self) -> Arc<RwLock<RegionTagger>> {
        Arc::clone(&self.tagger)
    }

    /// Runs until the buffer detaches its listeners
    pub async fn run(mut self) {
        self.reparse_when_idle().await;

        while let Some(event) = self.events.recv().await {
            let current = self.buffer.read().await.version();
            if event.version != current {
                tracing::trace!(
                    event = event.version,
                    current,
                    "Skipping outdated buffer change"
                );
                continue;
            }
            if self.tagger.read().await.snapshot().version() == current {
                // an earlier reparse already saw this version
                continue;
            }
            self.reparse_when_idle().await;
        }

        tracing::debug!("Buffer detached, outlining worker stopped");
    }

    /// Never holds the buffer and the tagger locks at the same time
    async fn reparse_when_idle(&self) {
        tokio::task::yield_now().await;
        let parsed = self.tagger.read().await.snapshot().version();
        let state = self.buffer.read().await.state_since(parsed);
        let version = state.current_snapshot().version();

        self.tagger.write().await.reparse(&state);
        // spans are only ever translated from the last parsed version
        self.buffer.write().await.discard_history_through(version);
    }
}
