//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::component::{Transport, TransportId, TransportKind};
use crate::item::Item;
use crate::path::PathNetwork;

// ===========================================================================
// Item constructors
// ===========================================================================

pub fn item(name: &str) -> Item {
    Item::new(name).expect("test item names are non-empty")
}

pub fn iron() -> Item {
    item("iron")
}

pub fn copper() -> Item {
    item("copper")
}

// ===========================================================================
// Network builders
// ===========================================================================

/// Append a transport of the given kind with the next free id.
pub fn push(network: &mut PathNetwork, kind: TransportKind, key: &Item) -> TransportId {
    let id = network.next_id();
    let transport = match kind {
        TransportKind::Producer => Transport::producer(id, key.clone()),
        TransportKind::Receiver => Transport::receiver(id, key.clone()),
        TransportKind::Belt => Transport::belt(id),
    };
    network.insert(transport).expect("ids come from next_id")
}

/// Build `producer -> belt * belts -> receiver`, all keyed by `key`.
///
/// Returns the network and the ids in chain order.
pub fn build_line(key: &Item, belts: usize) -> (PathNetwork, Vec<TransportId>) {
    let mut network = PathNetwork::new();
    let mut ids = vec![push(&mut network, TransportKind::Producer, key)];
    for _ in 0..belts {
        ids.push(push(&mut network, TransportKind::Belt, key));
    }
    ids.push(push(&mut network, TransportKind::Receiver, key));
    for pair in ids.windows(2) {
        network.link(pair[0], pair[1]).expect("line roles are valid");
    }
    (network, ids)
}

// ===========================================================================
// Grid descriptions
// ===========================================================================

/// A loadable description of a single line `p b ... b r` laid along the
/// top row of a hexagon of radius `belts + 1`, the rest filled with walls.
pub fn line_description(key: &str, belts: usize) -> String {
    let range = belts + 1;
    let mut out = format!("{range}\n_____\n1\n1\n_____\n{key}\n_____\n{key}\n_____\n");
    for i in 0..(2 * range + 1) {
        let width = 2 * range + 1 - i.abs_diff(range);
        let tiles: Vec<&str> = if i == 0 {
            std::iter::once("p")
                .chain(std::iter::repeat_n("b", belts))
                .chain(std::iter::once("r"))
                .collect()
        } else {
            vec!["w"; width]
        };
        out.push_str(&tiles.join(" "));
        out.push('\n');
    }
    out.push_str("_____\n");
    for i in 1..=belts + 1 {
        out.push_str(&format!("{i},{}\n", i + 1));
    }
    out
}
