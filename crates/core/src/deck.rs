//! Deck — the owned widget state the input layer dispatches into.
//!
//! Bundles the sequence store, the gesture resolver and the event bus.
//! The renderer never mutates it; it reads a `DeckSnapshot` after each
//! dispatched event (or on a `DeckEvent` notification).

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::block::{BlockId, BlockKind, MessageBlock, SourceTemplate};
use crate::cost::TokenCostSource;
use crate::error::{Error, Result};
use crate::event::{DeckEvent, EventBus};
use crate::gesture::{GestureResolver, GestureState, Outcome};
use crate::settings::DeckSettings;
use crate::store::SequenceStore;
use crate::usage::UsageAggregate;

/// Discrete events delivered by the pointer / gesture layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum InputEvent {
    DragStart {
        source_id: String,
        #[serde(default)]
        is_template: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kind: Option<BlockKind>,
    },
    DragEnd {
        source_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_id: Option<String>,
    },
    /// Pointer lost mid-drag
    Cancel,
    /// Delete button on a placed block
    Remove { id: String },
    Reset,
}

impl InputEvent {
    /// Drag-start for a palette entry.
    pub fn palette(kind: BlockKind) -> Self {
        Self::DragStart {
            source_id: SourceTemplate::palette_id(kind),
            is_template: true,
            kind: Some(kind),
        }
    }

    /// Drag-start for a block already in the sequence.
    pub fn grab(id: &BlockId) -> Self {
        Self::DragStart {
            source_id: id.0.clone(),
            is_template: false,
            kind: None,
        }
    }

    pub fn drop_on(source_id: impl Into<String>, target_id: impl Into<String>) -> Self {
        Self::DragEnd {
            source_id: source_id.into(),
            target_id: Some(target_id.into()),
        }
    }

    pub fn drop_outside(source_id: impl Into<String>) -> Self {
        Self::DragEnd {
            source_id: source_id.into(),
            target_id: None,
        }
    }

    /// Decode a recorded JSON array of events.
    pub fn parse_list(raw: &str) -> Result<Vec<Self>> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Read-only view handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckSnapshot {
    pub blocks: Vec<MessageBlock>,
    pub usage: UsageAggregate,
    pub gesture: GestureState,
    pub templates: Vec<SourceTemplate>,
}

/// Explicit owned state for one context builder widget.
pub struct Deck {
    store: SequenceStore,
    gesture: GestureResolver,
    events: EventBus,
}

impl Deck {
    pub fn new(settings: DeckSettings, cost_source: Box<dyn TokenCostSource>) -> Self {
        Self {
            store: SequenceStore::new(settings, cost_source),
            gesture: GestureResolver::new(),
            events: EventBus::default(),
        }
    }

    /// Apply one input event. Only malformed events are errors; every
    /// well-formed event yields an outcome, possibly `Ignored`.
    pub fn dispatch(&mut self, event: InputEvent) -> Result<Outcome> {
        let outcome = match event {
            InputEvent::DragStart {
                source_id,
                is_template,
                kind,
            } => {
                let dragged_kind = if is_template {
                    let resolved = kind.or_else(|| SourceTemplate::kind_for_id(&source_id));
                    Some(resolved.ok_or_else(|| {
                        Error::InvalidEvent(format!(
                            "template drag {source_id} does not name a block kind"
                        ))
                    })?)
                } else {
                    None
                };
                self.gesture.drag_start(&source_id, dragged_kind)
            }
            InputEvent::DragEnd {
                source_id,
                target_id,
            } => self
                .gesture
                .drag_end(&mut self.store, &source_id, target_id.as_deref()),
            InputEvent::Cancel => self.gesture.cancel(),
            InputEvent::Remove { id } => self.remove(&BlockId(id)),
            InputEvent::Reset => self.reset(),
        };

        self.publish(&outcome);
        Ok(outcome)
    }

    /// Delete a block directly, outside any gesture.
    fn remove(&mut self, id: &BlockId) -> Outcome {
        match self.store.remove(id) {
            Some(block) => Outcome::Removed { block },
            None => Outcome::NoOp,
        }
    }

    fn reset(&mut self) -> Outcome {
        self.store.reset();
        Outcome::Reset
    }

    fn publish(&self, outcome: &Outcome) {
        let usage = self.store.current_usage();
        let timestamp = Utc::now();
        let event = match outcome {
            Outcome::Inserted { block } => DeckEvent::BlockInserted {
                id: block.id().clone(),
                kind: block.kind(),
                token_cost: block.token_cost(),
                usage,
                timestamp,
            },
            Outcome::Moved { id, from, to } => DeckEvent::BlockMoved {
                id: id.clone(),
                from: *from,
                to: *to,
                usage,
                timestamp,
            },
            Outcome::Removed { block } => DeckEvent::BlockRemoved {
                id: block.id().clone(),
                usage,
                timestamp,
            },
            Outcome::Reset => DeckEvent::SequenceReset { usage, timestamp },
            Outcome::Cancelled { source_id } => DeckEvent::GestureCancelled {
                source_id: source_id.clone(),
                timestamp,
            },
            Outcome::Started | Outcome::Ignored | Outcome::NoOp => return,
        };
        self.events.publish(event);
    }

    pub fn snapshot(&self) -> DeckSnapshot {
        DeckSnapshot {
            blocks: self.store.blocks().to_vec(),
            usage: self.store.current_usage(),
            gesture: self.gesture.state().clone(),
            templates: self.store.templates().to_vec(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DeckEvent>> {
        self.events.subscribe()
    }

    pub fn store(&self) -> &SequenceStore {
        &self.store
    }

    /// Direct store access for callers that bypass gestures (keyboard
    /// shortcuts, scripted setups). Bypassed mutations publish no events.
    pub fn store_mut(&mut self) -> &mut SequenceStore {
        &mut self.store
    }

    pub fn gesture(&self) -> &GestureState {
        self.gesture.state()
    }

    pub fn current_usage(&self) -> UsageAggregate {
        self.store.current_usage()
    }
}
