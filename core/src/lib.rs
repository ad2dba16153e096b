#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Mouse Forage simulation.
//!
//! This crate defines the message surface that connects the simulation
//! manager, the authoritative grid world, and pure systems. The manager
//! submits [`Command`] values describing desired mutations, the world executes
//! those commands via its `apply` entry point, and then reports [`Event`]
//! values describing what actually happened. Systems consume immutable views
//! such as [`SenseWindow`] and respond with decisions or new commands.

mod config;

use serde::{Deserialize, Serialize};

pub use config::{ConfigError, SimulationConfig};

/// Number of decimal digits scent contributions are rounded to.
pub const SCENT_PRECISION_DIGITS: i32 = 5;

/// Movement difficulty recorded on freshly placed tiles.
pub const DEFAULT_TILE_DIFFICULTY: u32 = 1;

/// Cardinal movement directions available to the agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
    /// Movement toward increasing column indices.
    East,
}

impl Direction {
    /// Every direction in the canonical candidate order used for random picks.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    x: u32,
    y: u32,
}

impl Position {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the position.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the position.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Reports whether the position lies inside a grid of the provided size.
    #[must_use]
    pub const fn is_within(&self, columns: u32, rows: u32) -> bool {
        self.x < columns && self.y < rows
    }

    /// Returns the neighbouring position in `direction`, if it stays on the grid.
    #[must_use]
    pub fn neighbor(self, direction: Direction, columns: u32, rows: u32) -> Option<Position> {
        let candidate = match direction {
            Direction::North => Position::new(self.x, self.y.checked_sub(1)?),
            Direction::South => Position::new(self.x, self.y.checked_add(1)?),
            Direction::West => Position::new(self.x.checked_sub(1)?, self.y),
            Direction::East => Position::new(self.x.checked_add(1)?, self.y),
        };
        candidate.is_within(columns, rows).then_some(candidate)
    }

    /// Straight-line distance between two positions measured in cells.
    #[must_use]
    pub fn euclidean_distance(self, other: Position) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        dx.hypot(dy)
    }
}

/// Kind of occupant recorded on a tile. Empty cells carry no tile at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// The foraging agent.
    Player,
    /// A food item emitting scent.
    Food,
}

/// Occupied grid tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    /// Cell the tile occupies.
    pub position: Position,
    /// Occupant stored on the tile.
    pub kind: TileKind,
    /// Movement difficulty recorded for the tile.
    pub difficulty: u32,
}

/// Accumulation policy used when several food items contribute to one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScentMode {
    /// Contributions from every food item are summed.
    #[default]
    Stacking,
    /// Each cell keeps the strongest single contribution.
    Max,
}

/// 3×3 block of scent values centred on the agent, indexed `[row][column]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SenseWindow {
    cells: [[f64; 3]; 3],
}

impl SenseWindow {
    /// Wraps raw window values.
    #[must_use]
    pub const fn new(cells: [[f64; 3]; 3]) -> Self {
        Self { cells }
    }

    /// Raw window values, `[row][column]`.
    #[must_use]
    pub const fn cells(&self) -> &[[f64; 3]; 3] {
        &self.cells
    }

    /// Value at the given window row and column.
    #[must_use]
    pub const fn get(&self, row: usize, column: usize) -> f64 {
        self.cells[row][column]
    }

    /// Reports whether every value in the window is exactly zero.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.cells.iter().flatten().all(|value| *value == 0.0)
    }

    /// Reports whether the window holds values no scent field can produce.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        self.cells
            .iter()
            .flatten()
            .any(|value| !value.is_finite() || *value < 0.0)
    }
}

/// Immutable capture of round state at one tick.
///
/// Snapshots own all of their data, so restoring one never aliases live grid
/// state.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Snapshot {
    /// Cell the agent occupied.
    pub agent: Position,
    /// Agent energy at capture time.
    pub energy: i64,
    /// Number of food items eaten this round.
    pub food_eaten: u32,
    /// Round score accumulated so far.
    pub score: u64,
    /// Whether the agent was alive.
    pub alive: bool,
    /// Food positions in placement order.
    pub food: Vec<Position>,
}

/// Read-only description of the agent used by presentation layers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentView {
    /// Cell the agent occupies.
    pub position: Position,
    /// Remaining energy.
    pub energy: i64,
    /// Number of food items eaten this round.
    pub food_eaten: u32,
    /// Round score accumulated so far.
    pub score: u64,
    /// Whether the agent is still alive.
    pub alive: bool,
    /// Scent window sensed on the most recent tick.
    pub window: SenseWindow,
}

/// Everything a presentation layer needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderState {
    /// Number of grid columns.
    pub columns: u32,
    /// Number of grid rows.
    pub rows: u32,
    /// Occupied tiles in placement order, the agent's tile included.
    pub tiles: Vec<Tile>,
    /// State of the agent.
    pub agent: AgentView,
    /// Zero-based round counter.
    pub round: u32,
    /// Whether automatic ticking is suspended.
    pub paused: bool,
}

/// Reasons a tile placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// Every cell of the grid is already occupied.
    GridFull,
}

/// How a round finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// The agent ate the required amount of food.
    Success,
    /// The agent ran out of energy.
    Starved,
}

/// Source of uniformly distributed indices.
///
/// Every random choice in the simulation flows through this trait so tests can
/// script exact tie-breaks and placements.
pub trait RandomSource {
    /// Returns an index drawn uniformly from `0..len`. Callers never pass zero.
    fn pick(&mut self, len: usize) -> usize;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn pick(&mut self, len: usize) -> usize {
        (**self).pick(len)
    }
}

impl<T: RandomSource + ?Sized> RandomSource for Box<T> {
    fn pick(&mut self, len: usize) -> usize {
        (**self).pick(len)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Places a food item, at the requested cell when it is free.
    PlaceFood {
        /// Preferred cell; `None` or an unusable cell draws a random empty one.
        position: Option<Position>,
    },
    /// Moves the agent's tile, at the requested cell when it is free.
    PlaceAgent {
        /// Preferred cell; `None` or an unusable cell draws a random empty one.
        position: Option<Position>,
    },
    /// Places `count` food items when the grid currently holds none.
    ReplenishFood {
        /// Number of food items in one batch.
        count: u32,
    },
    /// Rebuilds the scent field from the current food set.
    RecomputeScent,
    /// Copies the 3×3 window around the agent into its sense buffer.
    SenseScent,
    /// Moves the agent one cell and spends energy.
    StepAgent {
        /// Direction of travel.
        direction: Direction,
        /// Energy spent by the move.
        cost: u32,
    },
    /// Changes the accumulation policy used by subsequent recomputes.
    SetScentMode {
        /// Policy to activate.
        mode: ScentMode,
    },
    /// Clears the grid and spawns a fresh agent for a new round.
    ResetRound,
    /// Replaces live grid and agent state with a captured snapshot.
    Restore {
        /// State to restore.
        snapshot: Snapshot,
    },
}

/// Events reported by the world and the simulation manager.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A food item was placed.
    FoodPlaced {
        /// Cell the food occupies.
        position: Position,
    },
    /// The agent's tile was placed.
    AgentPlaced {
        /// Cell the agent occupies.
        position: Position,
    },
    /// A placement request could not be satisfied.
    PlacementRejected {
        /// Kind of tile requested.
        kind: TileKind,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// The scent field was rebuilt.
    ScentRecomputed {
        /// Number of food items that contributed.
        food_count: usize,
    },
    /// The agent refreshed its local sense window.
    AgentSensed {
        /// Values the agent sensed.
        window: SenseWindow,
    },
    /// The agent attempted a step. `from == to` when the grid edge blocked it.
    AgentStepped {
        /// Direction of travel.
        direction: Direction,
        /// Cell before the step.
        from: Position,
        /// Cell after the step.
        to: Position,
        /// Energy remaining after the step.
        energy: i64,
    },
    /// The agent ate a food item.
    FoodEaten {
        /// Cell the food occupied.
        position: Position,
        /// Food eaten this round including this one.
        food_eaten: u32,
        /// Score after feeding.
        score: u64,
        /// Energy after feeding.
        energy: i64,
    },
    /// The agent's energy dropped below zero.
    AgentStarved {
        /// Cell the agent died on.
        position: Position,
    },
    /// The scent accumulation policy changed.
    ScentModeChanged {
        /// Policy now active.
        mode: ScentMode,
    },
    /// The grid was cleared for a new round.
    RoundReset,
    /// Live state was replaced from a snapshot.
    StateRestored {
        /// Number of food items restored.
        food_count: usize,
    },
    /// A round finished and its score was recorded.
    RoundEnded {
        /// Zero-based index of the finished round.
        round: u32,
        /// How the round finished.
        outcome: RoundOutcome,
        /// Score recorded in the ledger.
        score: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::{Direction, Position, SenseWindow, Snapshot};

    #[test]
    fn neighbor_clamps_at_grid_edges() {
        let corner = Position::new(0, 0);
        assert_eq!(corner.neighbor(Direction::North, 4, 4), None);
        assert_eq!(corner.neighbor(Direction::West, 4, 4), None);
        assert_eq!(
            corner.neighbor(Direction::South, 4, 4),
            Some(Position::new(0, 1))
        );

        let far = Position::new(3, 3);
        assert_eq!(far.neighbor(Direction::East, 4, 4), None);
        assert_eq!(far.neighbor(Direction::South, 4, 4), None);
    }

    #[test]
    fn euclidean_distance_matches_expectation() {
        let origin = Position::new(1, 1);
        let destination = Position::new(4, 5);
        assert!((origin.euclidean_distance(destination) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn window_flags_blank_and_malformed_values() {
        assert!(SenseWindow::default().is_blank());
        assert!(!SenseWindow::default().is_malformed());

        let mut cells = [[0.0; 3]; 3];
        cells[0][1] = f64::NAN;
        let window = SenseWindow::new(cells);
        assert!(window.is_malformed());
        assert!(!window.is_blank());
    }

    #[test]
    fn snapshot_round_trips_through_bincode() {
        let snapshot = Snapshot {
            agent: Position::new(2, 3),
            energy: 57,
            food_eaten: 4,
            score: 311,
            alive: true,
            food: vec![Position::new(0, 0), Position::new(9, 1)],
        };
        let bytes = bincode::serialize(&snapshot).expect("serialize");
        let restored: Snapshot = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, snapshot);
    }
}
