//! Sequence store — the ordered list of placed blocks and its usage total.
//!
//! Every mutation recomputes the `UsageAggregate` from the full sequence
//! before returning, so a reader never sees a sequence and a total that
//! disagree. Unknown ids are ignored rather than reported.

use std::collections::HashSet;

use crate::block::{BlockId, BlockKind, MessageBlock, SourceTemplate};
use crate::cost::TokenCostSource;
use crate::settings::DeckSettings;
use crate::usage::UsageAggregate;

/// Id of the block every fresh or reset sequence starts with.
pub const INITIAL_BLOCK_ID: &str = "initial-system";

/// Owns the ordered sequence of message blocks.
pub struct SequenceStore {
    settings: DeckSettings,
    blocks: Vec<MessageBlock>,
    usage: UsageAggregate,
    cost_source: Box<dyn TokenCostSource>,
}

impl SequenceStore {
    /// Create a store seeded with the initial system block.
    pub fn new(settings: DeckSettings, cost_source: Box<dyn TokenCostSource>) -> Self {
        let blocks = vec![initial_block(&settings)];
        let usage = UsageAggregate::compute(&blocks, settings.capacity);
        Self {
            settings,
            blocks,
            usage,
            cost_source,
        }
    }

    // ── Mutations ──

    /// Synthesize a block of `kind` and append it to the end.
    pub fn insert_new(&mut self, kind: BlockKind) -> MessageBlock {
        let content = self
            .settings
            .template(kind)
            .map(|t| t.content.clone())
            .unwrap_or_default();
        let cost = self.cost_source.next_cost(self.settings.cost_range);
        let block = MessageBlock::new(kind, content, cost);

        tracing::debug!(id = %block.id(), %kind, cost, "Appending block");
        self.blocks.push(block.clone());
        self.recompute();
        block
    }

    /// Move `source_id` to the index `target_id` occupies now.
    ///
    /// Returns `false` without touching the sequence when the ids are equal
    /// or either one is missing.
    pub fn move_block(&mut self, source_id: &BlockId, target_id: &BlockId) -> bool {
        if source_id == target_id {
            return false;
        }
        let (Some(from), Some(to)) = (self.position(source_id), self.position(target_id)) else {
            tracing::debug!(%source_id, %target_id, "Move ignored, id not in sequence");
            return false;
        };

        let block = self.blocks.remove(from);
        self.blocks.insert(to, block);
        tracing::debug!(%source_id, from, to, "Moved block");
        self.recompute();
        true
    }

    /// Delete the block with `id`, if present.
    pub fn remove(&mut self, id: &BlockId) -> Option<MessageBlock> {
        let Some(index) = self.position(id) else {
            tracing::debug!(%id, "Remove ignored, id not in sequence");
            return None;
        };
        let removed = self.blocks.remove(index);
        tracing::debug!(%id, index, "Removed block");
        self.recompute();
        Some(removed)
    }

    /// Replace the sequence with the single initial system block.
    pub fn reset(&mut self) {
        self.blocks = vec![initial_block(&self.settings)];
        tracing::debug!("Sequence reset");
        self.recompute();
    }

    fn recompute(&mut self) {
        let was_over = self.usage.is_over_capacity();
        self.usage = UsageAggregate::compute(&self.blocks, self.settings.capacity);
        debug_assert!(self.is_consistent(), "sequence store invariants violated");

        match (was_over, self.usage.is_over_capacity()) {
            (false, true) => tracing::info!(
                total = self.usage.total_tokens,
                capacity = self.usage.capacity,
                "Token budget exceeded"
            ),
            (true, false) => tracing::info!(
                total = self.usage.total_tokens,
                capacity = self.usage.capacity,
                "Back within token budget"
            ),
            _ => {}
        }
    }

    // ── Reads ──

    pub fn current_usage(&self) -> UsageAggregate {
        self.usage
    }

    pub fn blocks(&self) -> &[MessageBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn position(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id() == id)
    }

    pub fn templates(&self) -> &[SourceTemplate] {
        &self.settings.templates
    }

    pub fn template(&self, kind: BlockKind) -> Option<&SourceTemplate> {
        self.settings.template(kind)
    }

    /// Ids are unique and the cached total matches a fresh sum.
    pub fn is_consistent(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.blocks.len());
        let unique = self.blocks.iter().all(|b| seen.insert(b.id()));
        let sum: u64 = self.blocks.iter().map(|b| u64::from(b.token_cost())).sum();
        unique && sum == self.usage.total_tokens
    }
}

fn initial_block(settings: &DeckSettings) -> MessageBlock {
    MessageBlock::with_id(
        BlockId::from(INITIAL_BLOCK_ID),
        BlockKind::System,
        settings.initial_block.content.clone(),
        settings.initial_block.token_cost,
    )
}
