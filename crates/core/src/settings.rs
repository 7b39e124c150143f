//! Fixed constants the deck is built from: capacity, cost range,
//! initial block and palette contents.

use serde::{Deserialize, Serialize};

use crate::block::{BlockKind, SourceTemplate};
use crate::error::{Error, Result};

/// Default token budget used for the usage ratio.
pub const DEFAULT_CAPACITY: u64 = 4096;

/// Inclusive token-cost range for synthesized blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostRange {
    pub min: u32,
    pub max: u32,
}

impl CostRange {
    pub fn new(min: u32, max: u32) -> Result<Self> {
        if min > max {
            return Err(Error::Config {
                message: format!("token cost range min ({min}) exceeds max ({max})"),
            });
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, cost: u32) -> bool {
        (self.min..=self.max).contains(&cost)
    }

    pub fn clamp(&self, cost: u32) -> u32 {
        cost.clamp(self.min, self.max)
    }
}

impl Default for CostRange {
    fn default() -> Self {
        Self { min: 5, max: 24 }
    }
}

/// The single system block a fresh or reset deck starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialBlock {
    pub content: String,
    pub token_cost: u32,
}

impl Default for InitialBlock {
    fn default() -> Self {
        Self {
            content: "You are a helpful AI assistant.".into(),
            token_cost: 7,
        }
    }
}

/// Everything a `SequenceStore` needs besides its cost source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckSettings {
    pub capacity: u64,
    pub cost_range: CostRange,
    pub initial_block: InitialBlock,
    pub templates: Vec<SourceTemplate>,
}

impl DeckSettings {
    /// Build settings, rejecting a zero capacity or a palette that does
    /// not have exactly one template per kind.
    pub fn new(
        capacity: u64,
        cost_range: CostRange,
        initial_block: InitialBlock,
        templates: Vec<SourceTemplate>,
    ) -> Result<Self> {
        let settings = Self {
            capacity,
            cost_range,
            initial_block,
            templates,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::Config {
                message: "capacity must be greater than zero".into(),
            });
        }
        if self.cost_range.min > self.cost_range.max {
            return Err(Error::Config {
                message: "token cost range min exceeds max".into(),
            });
        }
        if self.templates.len() != BlockKind::ALL.len() {
            return Err(Error::Config {
                message: format!(
                    "palette needs exactly {} templates, got {}",
                    BlockKind::ALL.len(),
                    self.templates.len()
                ),
            });
        }
        for kind in BlockKind::ALL {
            if !self.templates.iter().any(|t| t.kind == kind) {
                return Err(Error::Config {
                    message: format!("palette is missing a {kind} template"),
                });
            }
        }
        Ok(())
    }

    /// The template for `kind`. Validated settings always have one.
    pub fn template(&self, kind: BlockKind) -> Option<&SourceTemplate> {
        self.templates.iter().find(|t| t.kind == kind)
    }
}

/// Default palette contents, one per kind.
pub fn default_templates() -> Vec<SourceTemplate> {
    vec![
        SourceTemplate::new(BlockKind::User, "Can you help me understand this code?"),
        SourceTemplate::new(
            BlockKind::Assistant,
            "Sure! Here's a breakdown of what it does.",
        ),
        SourceTemplate::new(BlockKind::System, "Always answer concisely."),
    ]
}

impl Default for DeckSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            cost_range: CostRange::default(),
            initial_block: InitialBlock::default(),
            templates: default_templates(),
        }
    }
}
