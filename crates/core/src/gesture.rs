//! Gesture resolver — turns a drag-start / drag-end pair into at most one
//! sequence store operation.
//!
//! Two states: idle, or dragging exactly one source. Every drag-end returns
//! the resolver to idle before handing back its outcome.
//!
//! | Origin   | Drop target       | Result                          |
//! |----------|-------------------|---------------------------------|
//! | any      | none              | cancelled, no mutation          |
//! | any      | the source itself | no-op                           |
//! | palette  | anything else     | `insert_new`, always appended   |
//! | existing | another block     | `move_block` to target's index  |

use serde::{Deserialize, Serialize};

use crate::block::{BlockId, BlockKind, MessageBlock};
use crate::store::SequenceStore;

/// Transient view of the in-flight gesture, for the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureState {
    pub active_id: Option<String>,
    /// Only set while a palette template is being dragged
    pub dragged_kind: Option<BlockKind>,
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        self.active_id.is_none()
    }
}

/// What a dispatched event did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// A drag began
    Started,
    /// The event did not apply to the current state
    Ignored,
    /// Drag ended outside any drop target
    Cancelled { source_id: String },
    /// Drag ended but resolved to no change
    NoOp,
    Inserted { block: MessageBlock },
    Moved { id: BlockId, from: usize, to: usize },
    Removed { block: MessageBlock },
    Reset,
}

impl Outcome {
    /// Whether the sequence changed.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::Inserted { .. } | Self::Moved { .. } | Self::Removed { .. } | Self::Reset
        )
    }
}

/// The two-state drag machine. Holds nothing but the in-flight gesture.
#[derive(Debug, Default)]
pub struct GestureResolver {
    state: GestureState,
}

impl GestureResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        !self.state.is_idle()
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Idle → dragging. Pass `dragged_kind` only for palette templates.
    ///
    /// A second drag-start while one is in flight is ignored.
    pub fn drag_start(&mut self, source_id: &str, dragged_kind: Option<BlockKind>) -> Outcome {
        if let Some(active) = &self.state.active_id {
            tracing::warn!(
                %active,
                rejected = source_id,
                "Drag start ignored, a gesture is already in flight"
            );
            return Outcome::Ignored;
        }
        tracing::debug!(source_id, kind = ?dragged_kind, "Drag started");
        self.state = GestureState {
            active_id: Some(source_id.to_string()),
            dragged_kind,
        };
        Outcome::Started
    }

    /// Finish the in-flight gesture, applying at most one store operation.
    pub fn drag_end(
        &mut self,
        store: &mut SequenceStore,
        source_id: &str,
        target_id: Option<&str>,
    ) -> Outcome {
        let GestureState {
            active_id,
            dragged_kind,
        } = std::mem::take(&mut self.state);
        let Some(active_id) = active_id else {
            tracing::warn!(source_id, "Drag end ignored, no gesture in flight");
            return Outcome::Ignored;
        };

        if active_id != source_id {
            tracing::warn!(
                active = %active_id,
                source_id,
                "Drag end does not match the active gesture, discarding it"
            );
            return Outcome::Ignored;
        }

        let Some(target_id) = target_id else {
            tracing::debug!(source_id, "Drag cancelled");
            return Outcome::Cancelled { source_id: active_id };
        };

        if target_id == source_id {
            return Outcome::NoOp;
        }

        match dragged_kind {
            // Drop position is not used; new blocks always go last.
            Some(kind) => Outcome::Inserted {
                block: store.insert_new(kind),
            },
            None => {
                let id = BlockId(active_id);
                let target = BlockId::from(target_id);
                let positions = (store.position(&id), store.position(&target));
                match positions {
                    (Some(from), Some(to)) if store.move_block(&id, &target) => {
                        Outcome::Moved { id, from, to }
                    }
                    _ => Outcome::NoOp,
                }
            }
        }
    }

    /// Drop the in-flight gesture without touching the store.
    pub fn cancel(&mut self) -> Outcome {
        match std::mem::take(&mut self.state).active_id {
            Some(source_id) => {
                tracing::debug!(%source_id, "Drag cancelled");
                Outcome::Cancelled { source_id }
            }
            None => Outcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::ScriptedCost;
    use crate::settings::DeckSettings;
    use crate::store::INITIAL_BLOCK_ID;

    fn store() -> SequenceStore {
        SequenceStore::new(
            DeckSettings::default(),
            Box::new(ScriptedCost::new([10, 11, 12, 13])),
        )
    }

    fn start_palette(resolver: &mut GestureResolver, kind: BlockKind) -> Outcome {
        resolver.drag_start(&format!("palette-{kind}"), Some(kind))
    }

    #[test]
    fn starts_idle() {
        let resolver = GestureResolver::new();
        assert!(!resolver.is_dragging());
        assert!(resolver.state().is_idle());
    }

    #[test]
    fn palette_drag_records_kind() {
        let mut resolver = GestureResolver::new();
        assert_eq!(start_palette(&mut resolver, BlockKind::Assistant), Outcome::Started);
        let state = resolver.state();
        assert_eq!(state.active_id.as_deref(), Some("palette-assistant"));
        assert_eq!(state.dragged_kind, Some(BlockKind::Assistant));
    }

    #[test]
    fn existing_drag_has_no_kind() {
        let mut resolver = GestureResolver::new();
        resolver.drag_start("abc", None);
        let state = resolver.state();
        assert_eq!(state.active_id.as_deref(), Some("abc"));
        assert_eq!(state.dragged_kind, None);
    }

    #[test]
    fn second_drag_start_is_ignored() {
        let mut resolver = GestureResolver::new();
        start_palette(&mut resolver, BlockKind::User);
        assert_eq!(start_palette(&mut resolver, BlockKind::System), Outcome::Ignored);
        assert_eq!(resolver.state().dragged_kind, Some(BlockKind::User));
    }

    #[test]
    fn palette_drop_appends_regardless_of_target() {
        let mut store = store();
        let mut resolver = GestureResolver::new();

        start_palette(&mut resolver, BlockKind::User);
        let outcome = resolver.drag_end(&mut store, "palette-user", Some(INITIAL_BLOCK_ID));

        let Outcome::Inserted { block } = outcome else {
            panic!("expected an insert");
        };
        assert_eq!(block.kind(), BlockKind::User);
        assert_eq!(store.len(), 2);
        assert_eq!(store.blocks()[1].id(), block.id());
        assert!(!resolver.is_dragging());
    }

    #[test]
    fn drop_without_target_cancels() {
        let mut store = store();
        let mut resolver = GestureResolver::new();
        let before = store.current_usage();

        start_palette(&mut resolver, BlockKind::System);
        assert_eq!(
            resolver.drag_end(&mut store, "palette-system", None),
            Outcome::Cancelled {
                source_id: "palette-system".into()
            }
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.current_usage(), before);
        assert!(resolver.state().is_idle());
    }

    #[test]
    fn existing_drop_on_other_block_moves() {
        let mut store = store();
        let mut resolver = GestureResolver::new();
        let user = store.insert_new(BlockKind::User).id().clone();

        resolver.drag_start(user.as_str(), None);
        let outcome = resolver.drag_end(&mut store, user.as_str(), Some(INITIAL_BLOCK_ID));

        assert_eq!(
            outcome,
            Outcome::Moved {
                id: user.clone(),
                from: 1,
                to: 0
            }
        );
        assert_eq!(store.blocks()[0].id(), &user);
    }

    #[test]
    fn existing_drop_on_itself_is_noop() {
        let mut store = store();
        let mut resolver = GestureResolver::new();
        let user = store.insert_new(BlockKind::User).id().clone();

        resolver.drag_start(user.as_str(), None);
        assert_eq!(
            resolver.drag_end(&mut store, user.as_str(), Some(user.as_str())),
            Outcome::NoOp
        );
        assert_eq!(store.blocks()[1].id(), &user);
        assert!(!resolver.is_dragging());
    }

    #[test]
    fn existing_drop_on_removed_target_is_noop() {
        let mut store = store();
        let mut resolver = GestureResolver::new();
        let a = store.insert_new(BlockKind::User).id().clone();
        let b = store.insert_new(BlockKind::User).id().clone();

        resolver.drag_start(a.as_str(), None);
        store.remove(&b);
        assert_eq!(
            resolver.drag_end(&mut store, a.as_str(), Some(b.as_str())),
            Outcome::NoOp
        );
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn drag_end_while_idle_is_ignored() {
        let mut store = store();
        let mut resolver = GestureResolver::new();
        assert_eq!(
            resolver.drag_end(&mut store, "palette-user", Some(INITIAL_BLOCK_ID)),
            Outcome::Ignored
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn mismatched_drag_end_discards_gesture() {
        let mut store = store();
        let mut resolver = GestureResolver::new();
        start_palette(&mut resolver, BlockKind::User);
        assert_eq!(
            resolver.drag_end(&mut store, "palette-system", Some(INITIAL_BLOCK_ID)),
            Outcome::Ignored
        );
        assert_eq!(store.len(), 1);
        assert!(!resolver.is_dragging());
    }

    #[test]
    fn explicit_cancel_returns_to_idle() {
        let mut resolver = GestureResolver::new();
        assert_eq!(resolver.cancel(), Outcome::Ignored);
        start_palette(&mut resolver, BlockKind::User);
        assert_eq!(
            resolver.cancel(),
            Outcome::Cancelled {
                source_id: "palette-user".into()
            }
        );
        assert!(resolver.state().is_idle());
    }

    #[test]
    fn only_store_changes_count_as_mutations() {
        assert!(
            !Outcome::Cancelled {
                source_id: "x".into()
            }
            .is_mutation()
        );
        assert!(!Outcome::NoOp.is_mutation());
        assert!(Outcome::Reset.is_mutation());
    }
}
