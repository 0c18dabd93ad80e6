//! The hexagonal factory floor.
//!
//! A [`GameGrid`] of radius `range` holds one [`GridComponent`] per cell of
//! the hexagon, every cell starting as [`GridComponent::Error`] until
//! something is placed on it. The grid also carries the [`PathNetwork`] of
//! the transports placed on it so chains can be inspected after loading.

use crate::component::GridComponent;
use crate::coordinate::{Coordinate, MAX_RANGE};
use crate::path::PathNetwork;
use std::collections::HashMap;

/// Errors from grid operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("grid range must be between 1 and {MAX_RANGE}, got {0}")]
    InvalidRange(i64),
    #[error("coordinate {coordinate} lies outside a grid of range {range}")]
    OutOfBounds { coordinate: Coordinate, range: u32 },
}

/// A hexagon of cells keyed by cube coordinate.
#[derive(Debug, Clone)]
pub struct GameGrid {
    range: u32,
    cells: HashMap<Coordinate, GridComponent>,
    network: PathNetwork,
}

impl GameGrid {
    /// Create a grid with every cell of the hexagon set to the placeholder.
    pub fn new(range: i64) -> Result<Self, GridError> {
        let range = u32::try_from(range)
            .ok()
            .filter(|r| (1..=MAX_RANGE).contains(r))
            .ok_or(GridError::InvalidRange(range))?;
        let cells = Coordinate::hexagon(range)
            .map(|c| (c, GridComponent::Error))
            .collect();
        Ok(Self {
            range,
            cells,
            network: PathNetwork::new(),
        })
    }

    pub fn range(&self) -> u32 {
        self.range
    }

    /// Number of cells currently stored.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Whether `coordinate` lies inside the hexagon.
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        coordinate.length() <= self.range
    }

    /// An owned copy of the cell map. Changes to the copy do not reach the
    /// grid.
    pub fn grid(&self) -> HashMap<Coordinate, GridComponent> {
        self.cells.clone()
    }

    pub fn get(&self, coordinate: Coordinate) -> Option<&GridComponent> {
        self.cells.get(&coordinate)
    }

    /// Insert or replace the component at `coordinate`, without a bounds
    /// check.
    pub fn set_coordinate(&mut self, coordinate: Coordinate, component: GridComponent) {
        self.cells.insert(coordinate, component);
    }

    /// Like [`GameGrid::set_coordinate`], but refuses coordinates outside the
    /// hexagon.
    pub fn place(
        &mut self,
        coordinate: Coordinate,
        component: GridComponent,
    ) -> Result<(), GridError> {
        if !self.contains(coordinate) {
            return Err(GridError::OutOfBounds {
                coordinate,
                range: self.range,
            });
        }
        self.set_coordinate(coordinate, component);
        Ok(())
    }

    /// Chains of the transports placed on this grid.
    pub fn network(&self) -> &PathNetwork {
        &self.network
    }

    /// Replace the chain network, returning the previous one.
    pub fn attach_network(&mut self, network: PathNetwork) -> PathNetwork {
        std::mem::replace(&mut self.network, network)
    }

    /// Tile labels row by row, top row first, separated by single spaces.
    pub fn render(&self) -> String {
        // The constructor keeps `range` within `MAX_RANGE`.
        let extent = self.range as i32;
        let mut rows = Vec::with_capacity(2 * self.range as usize + 1);
        for r in -extent..=extent {
            let row: Vec<&str> = Coordinate::row(self.range, r)
                .map(|c| self.cells.get(&c).map_or("ERROR", GridComponent::label))
                .collect();
            rows.push(row.join(" "));
        }
        rows.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Transport, TransportId};

    #[test]
    fn rejects_non_positive_range() {
        assert_eq!(GameGrid::new(0).unwrap_err(), GridError::InvalidRange(0));
        assert_eq!(GameGrid::new(-3).unwrap_err(), GridError::InvalidRange(-3));
    }

    #[test]
    fn rejects_ranges_past_the_coordinate_plane() {
        let too_large = i64::from(MAX_RANGE) + 1;
        assert_eq!(
            GameGrid::new(too_large).unwrap_err(),
            GridError::InvalidRange(too_large)
        );
        let wraps = i64::from(u32::MAX);
        assert_eq!(GameGrid::new(wraps).unwrap_err(), GridError::InvalidRange(wraps));
        assert_eq!(
            GameGrid::new(1 << 40).unwrap_err(),
            GridError::InvalidRange(1 << 40)
        );
    }

    #[test]
    fn new_grid_is_full_hexagon_of_placeholders() {
        let grid = GameGrid::new(4).unwrap();
        assert_eq!(grid.range(), 4);
        assert_eq!(grid.cell_count(), 61);
        assert!(grid.grid().values().all(|c| *c == GridComponent::Error));
        assert!(grid.grid().keys().all(|c| c.length() <= 4));
    }

    #[test]
    fn grids_of_same_range_are_equal() {
        let a = GameGrid::new(4).unwrap();
        let b = GameGrid::new(4).unwrap();
        assert_eq!(a.grid(), b.grid());
    }

    #[test]
    fn set_coordinate_replaces_cell() {
        let mut grid = GameGrid::new(6).unwrap();
        let before = grid.grid();
        grid.set_coordinate(Coordinate::ORIGIN, GridComponent::Wall);
        assert_eq!(grid.get(Coordinate::ORIGIN), Some(&GridComponent::Wall));
        assert_ne!(before, grid.grid());
        assert_eq!(grid.cell_count(), before.len());
    }

    #[test]
    fn set_coordinate_does_not_bounds_check() {
        let mut grid = GameGrid::new(1).unwrap();
        grid.set_coordinate(Coordinate::axial(5, 0).unwrap(), GridComponent::Open);
        assert_eq!(grid.cell_count(), 8);
    }

    #[test]
    fn place_rejects_outside_cells() {
        let mut grid = GameGrid::new(2).unwrap();
        let outside = Coordinate::axial(2, 1).unwrap();
        let err = grid.place(outside, GridComponent::Open).unwrap_err();
        assert_eq!(
            err,
            GridError::OutOfBounds {
                coordinate: outside,
                range: 2
            }
        );
        assert_eq!(grid.cell_count(), 19);
        grid.place(Coordinate::axial(2, -1).unwrap(), GridComponent::Open).unwrap();
    }

    #[test]
    fn grid_copy_is_independent() {
        let mut grid = GameGrid::new(2).unwrap();
        let mut copy = grid.grid();
        copy.insert(Coordinate::ORIGIN, GridComponent::Wall);
        copy.clear();
        assert_eq!(grid.get(Coordinate::ORIGIN), Some(&GridComponent::Error));
        assert_eq!(grid.grid().len(), 19);

        grid.set_coordinate(Coordinate::ORIGIN, GridComponent::Open);
        assert!(copy.is_empty());
    }

    #[test]
    fn render_rows() {
        let mut grid = GameGrid::new(1).unwrap();
        grid.set_coordinate(Coordinate::axial(0, -1).unwrap(), GridComponent::Wall);
        grid.set_coordinate(
            Coordinate::ORIGIN,
            Transport::belt(TransportId(1)).into(),
        );
        grid.set_coordinate(Coordinate::axial(0, 1).unwrap(), GridComponent::Open);
        assert_eq!(grid.render(), "w ERROR\nERROR b ERROR\nERROR o");
    }

    #[test]
    fn attach_network_replaces() {
        let mut grid = GameGrid::new(1).unwrap();
        let mut network = PathNetwork::new();
        network.insert(Transport::belt(TransportId(1))).unwrap();
        let old = grid.attach_network(network);
        assert!(old.is_empty());
        assert_eq!(grid.network().len(), 1);
    }
}
