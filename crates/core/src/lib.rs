//! # PromptDeck Core
//!
//! State core of the PromptDeck context builder: an ordered sequence of
//! user / assistant / system blocks assembled by drag and drop, with a
//! token usage total that always matches the sequence.
//!
//! ## Layout
//!
//! - [`store`] holds the sequence and recomputes usage on every mutation
//! - [`gesture`] turns drag-start / drag-end into one store operation
//! - [`deck`] owns both and is what the input and render layers talk to
//!
//! Rendering, animation and styling live outside this crate. The renderer
//! reads [`DeckSnapshot`]s and feeds [`InputEvent`]s back in.

pub mod block;
pub mod cost;
pub mod deck;
pub mod error;
pub mod event;
pub mod gesture;
pub mod settings;
pub mod store;
pub mod usage;

// Re-export key types at crate root for ergonomics
pub use block::{BlockId, BlockKind, MessageBlock, SourceTemplate};
pub use cost::{FixedCost, RandomCost, ScriptedCost, TokenCostSource};
pub use deck::{Deck, DeckSnapshot, InputEvent};
pub use error::{Error, Result};
pub use event::{DeckEvent, EventBus};
pub use gesture::{GestureResolver, GestureState, Outcome};
pub use settings::{CostRange, DeckSettings, InitialBlock};
pub use store::{INITIAL_BLOCK_ID, SequenceStore};
pub use usage::{UsageAggregate, UsageLevel};
