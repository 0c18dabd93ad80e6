//! Things that can occupy a grid cell.
//!
//! [`Transport`] covers the three production-line roles that take part in a
//! chain. [`GridComponent`] is the closed set of cell contents, including the
//! inert wall/open tiles and the placeholder every cell starts with.

use crate::item::Item;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Identifies a transport by its 1-based column index.
///
/// Column indices are handed out in the order transport tiles appear in a
/// grid description and double as handles into a
/// [`PathNetwork`](crate::path::PathNetwork).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransportId(pub u32);

impl TransportId {
    /// Zero-based slot for arena storage.
    pub fn index(self) -> usize {
        (self.0 as usize).saturating_sub(1)
    }
}

impl fmt::Display for TransportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Role of a transport within a production line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportKind {
    /// Chain origin; emits items.
    Producer,
    /// Chain terminal; consumes items.
    Receiver,
    /// Interior relay.
    Belt,
}

impl TransportKind {
    /// Whether a node of this kind may have a previous link.
    pub fn accepts_previous(self) -> bool {
        matches!(self, TransportKind::Belt | TransportKind::Receiver)
    }

    /// Whether a node of this kind may have a next link.
    pub fn accepts_next(self) -> bool {
        matches!(self, TransportKind::Belt | TransportKind::Producer)
    }

    pub fn name(self) -> &'static str {
        match self {
            TransportKind::Producer => "Producer",
            TransportKind::Receiver => "Receiver",
            TransportKind::Belt => "Belt",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A production-line node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transport {
    Producer { id: TransportId, key: Item },
    Receiver { id: TransportId, key: Item },
    Belt { id: TransportId },
}

impl Transport {
    pub fn producer(id: TransportId, key: Item) -> Self {
        Transport::Producer { id, key }
    }

    pub fn receiver(id: TransportId, key: Item) -> Self {
        Transport::Receiver { id, key }
    }

    pub fn belt(id: TransportId) -> Self {
        Transport::Belt { id }
    }

    pub fn id(&self) -> TransportId {
        match self {
            Transport::Producer { id, .. }
            | Transport::Receiver { id, .. }
            | Transport::Belt { id } => *id,
        }
    }

    pub fn kind(&self) -> TransportKind {
        match self {
            Transport::Producer { .. } => TransportKind::Producer,
            Transport::Receiver { .. } => TransportKind::Receiver,
            Transport::Belt { .. } => TransportKind::Belt,
        }
    }

    /// The item key, for producers and receivers.
    pub fn key(&self) -> Option<&Item> {
        match self {
            Transport::Producer { key, .. } | Transport::Receiver { key, .. } => Some(key),
            Transport::Belt { .. } => None,
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}-{}>", self.kind(), self.id())
    }
}

// ---------------------------------------------------------------------------
// GridComponent
// ---------------------------------------------------------------------------

/// Contents of a single grid cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridComponent {
    Transport(Transport),
    Wall,
    Open,
    /// Placeholder for cells nothing has been placed on.
    #[default]
    Error,
}

impl GridComponent {
    /// Short encoding used when rendering a grid.
    pub fn label(&self) -> &'static str {
        match self {
            GridComponent::Transport(t) => match t.kind() {
                TransportKind::Producer => "p",
                TransportKind::Receiver => "r",
                TransportKind::Belt => "b",
            },
            GridComponent::Wall => "w",
            GridComponent::Open => "o",
            GridComponent::Error => "ERROR",
        }
    }

    pub fn as_transport(&self) -> Option<&Transport> {
        match self {
            GridComponent::Transport(t) => Some(t),
            _ => None,
        }
    }
}

impl From<Transport> for GridComponent {
    fn from(t: Transport) -> Self {
        GridComponent::Transport(t)
    }
}
