use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::position::{Direction, Position};

/// Stable identifier of a layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(String);

impl LayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayerId {
    fn from(value: &str) -> Self {
        LayerId(value.to_string())
    }
}

impl From<String> for LayerId {
    fn from(value: String) -> Self {
        LayerId(value)
    }
}

/// What a caller hands in when creating a layer. `content` is opaque to the
/// workspace.
#[derive(Debug, Clone)]
pub struct LayerDefinition<C> {
    pub id: Option<LayerId>,
    pub title: String,
    pub content: C,
}

impl<C> LayerDefinition<C> {
    pub fn new(title: impl Into<String>, content: C) -> Self {
        Self {
            id: None,
            title: title.into(),
            content,
        }
    }

    pub fn with_id(mut self, id: impl Into<LayerId>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// A navigable panel placed on the grid.
#[derive(Debug, Clone, Serialize)]
pub struct LayerNode<C> {
    pub id: LayerId,
    pub title: String,
    pub content: C,
    pub position: Position,
    pub adjacency: BTreeMap<Direction, LayerId>,
    /// Monotonic creation counter, unique per workspace.
    pub created_seq: u64,
    #[serde(skip)]
    pub created_at: OffsetDateTime,
}

impl<C> LayerNode<C> {
    pub(crate) fn new(
        id: LayerId,
        title: String,
        content: C,
        position: Position,
        created_seq: u64,
    ) -> Self {
        Self {
            id,
            title,
            content,
            position,
            adjacency: BTreeMap::new(),
            created_seq,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn neighbor(&self, direction: Direction) -> Option<&LayerId> {
        self.adjacency.get(&direction)
    }

    pub fn has_neighbor(&self, direction: Direction) -> bool {
        self.adjacency.contains_key(&direction)
    }

    pub fn neighbors(&self) -> impl Iterator<Item = (Direction, &LayerId)> {
        self.adjacency.iter().map(|(direction, id)| (*direction, id))
    }
}
