//! Message block and palette template types.
//!
//! A `MessageBlock` is one placed unit of the assembled context. Its kind,
//! content and token cost are fixed when it is created; only its position
//! in the sequence ever changes.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::Error;

/// Unique identifier for a placed block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub String);

impl BlockId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of a block. Closed set; a block's kind never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// A turn written by the end user
    User,
    /// A reply from the model
    Assistant,
    /// Instructions framing the conversation
    System,
}

impl BlockKind {
    /// All kinds, in palette order.
    pub const ALL: [BlockKind; 3] = [BlockKind::User, BlockKind::Assistant, BlockKind::System];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            "system" => Ok(Self::System),
            other => Err(Error::UnknownKind(other.to_string())),
        }
    }
}

/// A block currently placed in the sequence.
///
/// Fields are private so the renderer can read but never rewrite a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageBlock {
    id: BlockId,
    kind: BlockKind,
    content: String,
    token_cost: u32,
}

impl MessageBlock {
    /// Create a block with a fresh id.
    pub fn new(kind: BlockKind, content: impl Into<String>, token_cost: u32) -> Self {
        Self::with_id(BlockId::new(), kind, content, token_cost)
    }

    pub(crate) fn with_id(
        id: BlockId,
        kind: BlockKind,
        content: impl Into<String>,
        token_cost: u32,
    ) -> Self {
        Self {
            id,
            kind,
            content: content.into(),
            token_cost,
        }
    }

    pub fn id(&self) -> &BlockId {
        &self.id
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn token_cost(&self) -> u32 {
        self.token_cost
    }
}

/// One palette entry. Never placed itself; used to synthesize new blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTemplate {
    /// Drag-source id the input layer reports for this entry
    pub id: String,
    pub kind: BlockKind,
    pub label: String,
    /// Content given to every block synthesized from this entry
    pub content: String,
}

impl SourceTemplate {
    /// Prefix shared by every palette drag-source id.
    pub const ID_PREFIX: &'static str = "palette-";

    pub fn new(kind: BlockKind, content: impl Into<String>) -> Self {
        let label = match kind {
            BlockKind::User => "User Message",
            BlockKind::Assistant => "Assistant Message",
            BlockKind::System => "System Message",
        };
        Self {
            id: Self::palette_id(kind),
            kind,
            label: label.to_string(),
            content: content.into(),
        }
    }

    /// The drag-source id for the palette entry of `kind`.
    pub fn palette_id(kind: BlockKind) -> String {
        format!("{}{}", Self::ID_PREFIX, kind)
    }

    /// Resolve a palette drag-source id back to its kind.
    pub fn kind_for_id(id: &str) -> Option<BlockKind> {
        id.strip_prefix(Self::ID_PREFIX)
            .and_then(|rest| rest.parse().ok())
    }
}
