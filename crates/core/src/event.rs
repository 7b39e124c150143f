//! Deck events — published after every sequence mutation.
//!
//! The renderer subscribes and re-reads a snapshot when something lands.
//! Each event carries the usage aggregate as it stands after the mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::block::{BlockId, BlockKind};
use crate::usage::UsageAggregate;

/// All deck events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DeckEvent {
    /// A block was synthesized from the palette and appended
    BlockInserted {
        id: BlockId,
        kind: BlockKind,
        token_cost: u32,
        usage: UsageAggregate,
        timestamp: DateTime<Utc>,
    },

    /// A block changed position
    BlockMoved {
        id: BlockId,
        from: usize,
        to: usize,
        usage: UsageAggregate,
        timestamp: DateTime<Utc>,
    },

    BlockRemoved {
        id: BlockId,
        usage: UsageAggregate,
        timestamp: DateTime<Utc>,
    },

    /// Sequence went back to its initial system block
    SequenceReset {
        usage: UsageAggregate,
        timestamp: DateTime<Utc>,
    },

    /// A drag ended without a drop target
    GestureCancelled {
        source_id: String,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based bus for deck events.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DeckEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DeckEvent) {
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DeckEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
