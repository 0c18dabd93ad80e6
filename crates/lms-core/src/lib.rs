//! LMS Core -- the value model of a hexagonal logistics factory.
//!
//! A factory is a hexagonal [`grid::GameGrid`] whose cells hold
//! [`component::GridComponent`]s. Producers emit [`item::Item`]s, belts relay
//! them and receivers consume them; a producer, its belts and a receiver
//! linked end to end form a production line, modelled as a chain of
//! [`path::Path`]s stored in a [`path::PathNetwork`].
//!
//! # Key Types
//!
//! - [`coordinate::Coordinate`] -- Cube coordinate of a hex cell.
//! - [`item::Item`] -- Named token matched between a producer and receiver.
//! - [`component::Transport`] -- Producer, receiver or belt with its column
//!   index ([`component::TransportId`]).
//! - [`path::PathNetwork`] -- Arena of chain links addressed by column index,
//!   with head/tail walks and tail-first traversal.
//! - [`grid::GameGrid`] -- Coordinate-to-component map for a hexagon of a
//!   given range.
//!
//! Building a grid from its text description lives in the `lms-io` crate.

pub mod component;
pub mod coordinate;
pub mod grid;
pub mod item;
pub mod path;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
