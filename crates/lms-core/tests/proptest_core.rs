//! Property-based tests for the LMS core model.
//!
//! Uses proptest to generate grids and chain-building sequences, then
//! verifies structural invariants hold.

use lms_core::component::{GridComponent, Transport, TransportId, TransportKind};
use lms_core::coordinate::Coordinate;
use lms_core::grid::GameGrid;
use lms_core::path::PathNetwork;
use lms_core::test_utils::*;
use proptest::prelude::*;
use std::collections::HashSet;

// ===========================================================================
// Generators
// ===========================================================================

fn arb_kind() -> impl Strategy<Value = TransportKind> {
    prop_oneof![
        Just(TransportKind::Producer),
        Just(TransportKind::Receiver),
        Just(TransportKind::Belt),
    ]
}

/// Link operations against a network of up to 12 transports.
#[derive(Debug, Clone)]
enum LinkOp {
    SetNext(u32, u32),
    SetPrevious(u32, u32),
    Link(u32, u32),
}

fn arb_ops(max_ops: usize) -> impl Strategy<Value = Vec<LinkOp>> {
    proptest::collection::vec(
        prop_oneof![
            (1..=12u32, 1..=12u32).prop_map(|(a, b)| LinkOp::SetNext(a, b)),
            (1..=12u32, 1..=12u32).prop_map(|(a, b)| LinkOp::SetPrevious(a, b)),
            (1..=12u32, 1..=12u32).prop_map(|(a, b)| LinkOp::Link(a, b)),
        ],
        0..=max_ops,
    )
}

fn network_of(kinds: &[TransportKind]) -> PathNetwork {
    let mut network = PathNetwork::new();
    for &kind in kinds {
        push(&mut network, kind, &iron());
    }
    network
}

fn apply(network: &mut PathNetwork, ops: &[LinkOp]) {
    for op in ops {
        // Errors (unknown ids, role mismatches) are part of the input space.
        let _ = match *op {
            LinkOp::SetNext(a, b) => network
                .set_next(TransportId(a), Some(TransportId(b)))
                .map(|_| ()),
            LinkOp::SetPrevious(a, b) => network
                .set_previous(TransportId(a), Some(TransportId(b)))
                .map(|_| ()),
            LinkOp::Link(a, b) => network.link(TransportId(a), TransportId(b)),
        };
    }
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Hexagon completeness: one entry per coordinate within range, no others.
    #[test]
    fn hexagon_is_complete(range in 1..=12i64) {
        let grid = GameGrid::new(range).unwrap();
        let cells = grid.grid();
        let r = range as i32;

        let mut expected = HashSet::new();
        for q in -r..=r {
            for rr in -r..=r {
                for s in -r..=r {
                    if q + rr + s == 0 {
                        expected.insert(Coordinate::new(q, rr, s).unwrap());
                    }
                }
            }
        }

        let actual: HashSet<_> = cells.keys().copied().collect();
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(cells.len() as i64, 3 * range * (range + 1) + 1);
    }

    /// Mutating a returned copy never changes later copies.
    #[test]
    fn grid_copy_is_independent(range in 1..=6i64, q in -6..=6i32, r in -6..=6i32) {
        let grid = GameGrid::new(range).unwrap();
        let before = grid.grid();
        let mut copy = grid.grid();
        copy.insert(Coordinate::axial(q, r).unwrap(), GridComponent::Wall);
        copy.remove(&Coordinate::ORIGIN);
        prop_assert_eq!(grid.grid(), before);
    }

    /// Producers never gain a previous link and receivers never gain a next
    /// link, whatever sequence of mutations is applied.
    #[test]
    fn endpoints_stay_closed(
        kinds in proptest::collection::vec(arb_kind(), 1..=12),
        ops in arb_ops(40),
    ) {
        let mut network = network_of(&kinds);
        apply(&mut network, &ops);

        for (transport, path) in network.iter() {
            match transport.kind() {
                TransportKind::Producer => prop_assert_eq!(path.previous_link(), None),
                TransportKind::Receiver => prop_assert_eq!(path.next_link(), None),
                TransportKind::Belt => {}
            }
        }
    }

    /// Walks terminate and stay within the network even on cyclic input.
    #[test]
    fn walks_are_bounded(
        kinds in proptest::collection::vec(arb_kind(), 1..=12),
        ops in arb_ops(40),
    ) {
        let mut network = network_of(&kinds);
        apply(&mut network, &ops);

        for (transport, _) in network.iter() {
            let id = transport.id();
            prop_assert!(network.contains(network.head(id).unwrap()));
            prop_assert!(network.contains(network.tail(id).unwrap()));
            prop_assert!(network.chain(id).count() <= network.len());
            let mut visits = 0;
            network.apply_all(id, |_| visits += 1);
            prop_assert!(visits <= network.len());
        }
    }

    /// In a linear producer-to-receiver line, every node sees the same head
    /// and tail, and traversal covers the whole line tail first.
    #[test]
    fn line_head_and_tail_are_stable(belts in 0..20usize) {
        let (network, ids) = build_line(&copper(), belts);
        let head = ids[0];
        let tail = *ids.last().unwrap();

        for &id in &ids {
            prop_assert_eq!(network.head(id), Some(head));
            prop_assert_eq!(network.tail(id), Some(tail));
            prop_assert!(!network.is_cyclic(id));
        }

        let chain: Vec<_> = network.chain(ids[belts / 2]).collect();
        prop_assert_eq!(&chain, &ids);

        let mut visited = Vec::new();
        network.apply_all(head, |t: &Transport| visited.push(t.id()));
        visited.reverse();
        prop_assert_eq!(visited, ids);
    }
}
