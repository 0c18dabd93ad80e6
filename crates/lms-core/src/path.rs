//! Production-line chains.
//!
//! Every [`Transport`] owns exactly one [`Path`], a node in a doubly linked
//! chain. Links are stored as [`TransportId`] handles rather than references;
//! the [`PathNetwork`] arena owns all transports and paths and resolves the
//! handles when walking a chain.
//!
//! Producers are always chain origins and receivers always chain terminals:
//! the mutators on [`Path`] silently drop a previous link on a producer and a
//! next link on a receiver.

use crate::component::{Transport, TransportId, TransportKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors from path network operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("transport {0} is not in the network")]
    UnknownId(TransportId),
    #[error("transport ids must be consecutive: expected {expected}, got {got}")]
    OutOfOrder {
        expected: TransportId,
        got: TransportId,
    },
    #[error("{from_kind} {from} cannot feed {to_kind} {to}")]
    RoleMismatch {
        from: TransportId,
        from_kind: TransportKind,
        to: TransportId,
        to_kind: TransportKind,
    },
}

// ---------------------------------------------------------------------------
// Path
// ---------------------------------------------------------------------------

/// One link in a production chain.
///
/// Equality and hashing consider only the wrapped node: two paths are equal
/// when they belong to the same transport, whatever their links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Path {
    node: TransportId,
    kind: TransportKind,
    previous: Option<TransportId>,
    next: Option<TransportId>,
}

impl Path {
    /// An unlinked path for the given transport.
    pub fn new(node: &Transport) -> Self {
        Self {
            node: node.id(),
            kind: node.kind(),
            previous: None,
            next: None,
        }
    }

    /// A path with explicit links. Links the node's role forbids are dropped.
    pub fn with_links(
        node: &Transport,
        previous: Option<TransportId>,
        next: Option<TransportId>,
    ) -> Self {
        let mut path = Self::new(node);
        path.set_previous(previous);
        path.set_next(next);
        path
    }

    pub fn node(&self) -> TransportId {
        self.node
    }

    pub fn kind(&self) -> TransportKind {
        self.kind
    }

    /// The stored previous link.
    pub fn previous_link(&self) -> Option<TransportId> {
        self.previous
    }

    /// The stored next link.
    pub fn next_link(&self) -> Option<TransportId> {
        self.next
    }

    /// Overwrite the next link. Returns `false` (and changes nothing) on a
    /// receiver.
    pub fn set_next(&mut self, next: Option<TransportId>) -> bool {
        if !self.kind.accepts_next() {
            return false;
        }
        self.next = next;
        true
    }

    /// Overwrite the previous link. Returns `false` (and changes nothing) on
    /// a producer.
    pub fn set_previous(&mut self, previous: Option<TransportId>) -> bool {
        if !self.kind.accepts_previous() {
            return false;
        }
        self.previous = previous;
        true
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl Eq for Path {}

impl Hash for Path {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node.hash(state);
    }
}

// ---------------------------------------------------------------------------
// PathNetwork
// ---------------------------------------------------------------------------

/// Arena of transports and their paths, addressed by [`TransportId`].
///
/// Ids are dense: the n-th inserted transport must carry id `n`. Every link
/// stored in the network points at a transport that exists in it.
///
/// Chain walks are bounded by the number of transports, so a cyclic chain
/// cannot hang a walk; use [`PathNetwork::is_cyclic`] to detect one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathNetwork {
    transports: Vec<Transport>,
    paths: Vec<Path>,
}

impl PathNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Building --

    /// The id the next inserted transport must carry.
    pub fn next_id(&self) -> TransportId {
        TransportId(self.transports.len() as u32 + 1)
    }

    /// Add a transport with a fresh, unlinked path.
    pub fn insert(&mut self, transport: Transport) -> Result<TransportId, PathError> {
        let expected = self.next_id();
        let id = transport.id();
        if id != expected {
            return Err(PathError::OutOfOrder { expected, got: id });
        }
        self.paths.push(Path::new(&transport));
        self.transports.push(transport);
        Ok(id)
    }

    // -- Lookup --

    pub fn transport(&self, id: TransportId) -> Option<&Transport> {
        self.slot(id).map(|i| &self.transports[i])
    }

    pub fn path(&self, id: TransportId) -> Option<&Path> {
        self.slot(id).map(|i| &self.paths[i])
    }

    pub fn contains(&self, id: TransportId) -> bool {
        self.slot(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.transports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transports.is_empty()
    }

    /// All transports with their paths, in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&Transport, &Path)> {
        self.transports.iter().zip(self.paths.iter())
    }

    fn slot(&self, id: TransportId) -> Option<usize> {
        let i = id.index();
        (id.0 >= 1 && i < self.transports.len()).then_some(i)
    }

    fn require(&self, id: TransportId) -> Result<usize, PathError> {
        self.slot(id).ok_or(PathError::UnknownId(id))
    }

    // -- Mutation --

    /// Set the next link of `id`. Returns whether the link was stored; a
    /// receiver keeps its next link absent.
    pub fn set_next(
        &mut self,
        id: TransportId,
        next: Option<TransportId>,
    ) -> Result<bool, PathError> {
        let slot = self.require(id)?;
        if let Some(target) = next {
            self.require(target)?;
        }
        let stored = self.paths[slot].set_next(next);
        if !stored {
            tracing::trace!(%id, ?next, "next link dropped on receiver");
        }
        Ok(stored)
    }

    /// Set the previous link of `id`. Returns whether the link was stored; a
    /// producer keeps its previous link absent.
    pub fn set_previous(
        &mut self,
        id: TransportId,
        previous: Option<TransportId>,
    ) -> Result<bool, PathError> {
        let slot = self.require(id)?;
        if let Some(target) = previous {
            self.require(target)?;
        }
        let stored = self.paths[slot].set_previous(previous);
        if !stored {
            tracing::trace!(%id, ?previous, "previous link dropped on producer");
        }
        Ok(stored)
    }

    /// Link `from -> to` on both sides.
    ///
    /// A transport that `from` used to feed loses its previous link, and one
    /// that used to feed `to` loses its next link, so every stored link stays
    /// paired with its reverse.
    ///
    /// Fails without touching any path when `from` cannot have a next link
    /// or `to` cannot have a previous link.
    pub fn link(&mut self, from: TransportId, to: TransportId) -> Result<(), PathError> {
        let from_slot = self.require(from)?;
        let to_slot = self.require(to)?;
        let from_kind = self.paths[from_slot].kind;
        let to_kind = self.paths[to_slot].kind;
        if !from_kind.accepts_next() || !to_kind.accepts_previous() {
            return Err(PathError::RoleMismatch {
                from,
                from_kind,
                to,
                to_kind,
            });
        }

        if let Some(old) = self.paths[from_slot].next.filter(|old| *old != to) {
            let displaced = &mut self.paths[old.index()];
            if displaced.previous == Some(from) {
                tracing::trace!(%from, %old, "unlinking displaced successor");
                displaced.previous = None;
            }
        }
        if let Some(old) = self.paths[to_slot].previous.filter(|old| *old != from) {
            let displaced = &mut self.paths[old.index()];
            if displaced.next == Some(to) {
                tracing::trace!(%to, %old, "unlinking displaced predecessor");
                displaced.next = None;
            }
        }
        self.paths[from_slot].next = Some(to);
        self.paths[to_slot].previous = Some(from);
        Ok(())
    }

    // -- Traversal --

    /// Follow `step` from `start` until it yields nothing, at most `len()`
    /// times. Returns the last path reached.
    fn walk(&self, start: TransportId, step: impl Fn(&Path) -> Option<TransportId>) -> Option<&Path> {
        let mut current = self.path(start)?;
        for _ in 0..self.paths.len() {
            match step(current).and_then(|id| self.path(id)) {
                Some(path) => current = path,
                None => break,
            }
        }
        Some(current)
    }

    /// First node of the chain through `id`.
    pub fn head(&self, id: TransportId) -> Option<TransportId> {
        self.walk(id, Path::previous_link).map(Path::node)
    }

    /// Last node of the chain through `id`.
    pub fn tail(&self, id: TransportId) -> Option<TransportId> {
        self.walk(id, Path::next_link).map(Path::node)
    }

    /// The node before `id`, or `None` when `id` heads its chain.
    pub fn previous(&self, id: TransportId) -> Option<TransportId> {
        if self.head(id)? == id {
            return None;
        }
        self.path(id)?.previous
    }

    /// The node after `id`, or `None` when `id` ends its chain.
    pub fn next(&self, id: TransportId) -> Option<TransportId> {
        if self.tail(id)? == id {
            return None;
        }
        self.path(id)?.next
    }

    /// Whether following links from `id` in either direction loops.
    pub fn is_cyclic(&self, id: TransportId) -> bool {
        let loops = |step: fn(&Path) -> Option<TransportId>| {
            self.walk(id, step)
                .is_some_and(|end| step(end).is_some())
        };
        loops(Path::previous_link) || loops(Path::next_link)
    }

    /// Visit every transport of the chain through `id`, tail first, ending
    /// at the head.
    ///
    /// Walking backwards lets a tick move each item one step downstream
    /// without meeting an item that already moved in the same pass.
    pub fn apply_all<F>(&self, id: TransportId, mut visit: F)
    where
        F: FnMut(&Transport),
    {
        let Some(mut current) = self.tail(id) else {
            return;
        };
        for _ in 0..self.paths.len() {
            let slot = current.index();
            visit(&self.transports[slot]);
            match self.paths[slot].previous {
                Some(previous) => current = previous,
                None => break,
            }
        }
    }

    /// Ids of the chain through `id`, head to tail.
    pub fn chain(&self, id: TransportId) -> Chain<'_> {
        Chain {
            network: self,
            current: self.head(id),
            remaining: self.paths.len(),
        }
    }

    /// Renders the chain through `id` as `START -> <..> -> ... -> END`.
    pub fn describe(&self, id: TransportId) -> Option<ChainDisplay<'_>> {
        self.contains(id).then_some(ChainDisplay { network: self, id })
    }

    /// The head of every distinct chain, in id order of first appearance.
    pub fn chains(&self) -> Vec<TransportId> {
        let mut seen = BTreeSet::new();
        self.transports
            .iter()
            .filter_map(|t| self.head(t.id()))
            .filter(|head| seen.insert(*head))
            .collect()
    }
}

/// Iterator over one chain, head to tail.
pub struct Chain<'a> {
    network: &'a PathNetwork,
    current: Option<TransportId>,
    remaining: usize,
}

impl Iterator for Chain<'_> {
    type Item = TransportId;

    fn next(&mut self) -> Option<TransportId> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.current?;
        self.remaining -= 1;
        self.current = self.network.path(id).and_then(Path::next_link);
        Some(id)
    }
}

/// Display adapter returned by [`PathNetwork::describe`].
pub struct ChainDisplay<'a> {
    network: &'a PathNetwork,
    id: TransportId,
}

impl fmt::Display for ChainDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("START -> ")?;
        for id in self.network.chain(self.id) {
            if let Some(transport) = self.network.transport(id) {
                write!(f, "{transport} -> ")?;
            }
        }
        f.write_str("END")
    }
}
