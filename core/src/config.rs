//! Simulation configuration surface.

use serde::Deserialize;
use thiserror::Error;

use crate::{Position, ScentMode};

/// Tunable parameters fixed for the lifetime of a simulation.
///
/// Every field has a default matching the classic ten-by-ten setup, so a
/// configuration file only needs to list the values it changes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of grid columns.
    pub grid_width: u32,
    /// Number of grid rows. Must equal `grid_width`.
    pub grid_height: u32,
    /// Energy cap and starting energy of the agent.
    pub max_energy: u32,
    /// Energy spent per step.
    pub move_cost: u32,
    /// Energy restored by one food item.
    pub food_energy: u32,
    /// Food items required to win a round.
    pub food_per_round: u32,
    /// Food items spawned each time the grid runs out.
    pub food_batch: u32,
    /// Whether a starved agent's round score is forced to zero.
    pub death_penalty: bool,
    /// Maximum snapshots kept per round; `None` uses `max_energy`.
    pub history_capacity: Option<usize>,
    /// Initial scent accumulation policy.
    pub scent_mode: ScentMode,
    /// Whether the decision policy sums full window rows and columns.
    pub diagonal_scent: bool,
    /// Cell the agent spawns on at the start of each round.
    pub agent_start: Position,
    /// Whether a finished round immediately resets into the next one.
    pub auto_restart: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid_width: 10,
            grid_height: 10,
            max_energy: 100,
            move_cost: 1,
            food_energy: 20,
            food_per_round: 20,
            food_batch: 2,
            death_penalty: true,
            history_capacity: None,
            scent_mode: ScentMode::Stacking,
            diagonal_scent: false,
            agent_start: Position::new(0, 0),
            auto_restart: true,
        }
    }
}

impl SimulationConfig {
    /// Number of snapshots the history buffer retains.
    #[must_use]
    pub fn history_capacity(&self) -> usize {
        self.history_capacity
            .unwrap_or_else(|| usize::try_from(self.max_energy).unwrap_or(usize::MAX))
    }

    /// Total number of cells on the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let cells = u64::from(self.grid_width) * u64::from(self.grid_height);
        usize::try_from(cells).unwrap_or(usize::MAX)
    }

    /// Highest score a single round can reach.
    #[must_use]
    pub fn max_round_score(&self) -> u64 {
        u64::from(self.max_energy) * u64::from(self.food_per_round)
    }

    /// Checks the invariants the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.grid_width != self.grid_height {
            return Err(ConfigError::NonSquareGrid {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        if self.max_energy == 0 {
            return Err(ConfigError::ZeroEnergyCap);
        }
        if self.move_cost == 0 {
            return Err(ConfigError::ZeroMoveCost);
        }
        if self.food_batch == 0 {
            return Err(ConfigError::ZeroFoodBatch);
        }
        if self.history_capacity() == 0 {
            return Err(ConfigError::ZeroHistoryCapacity);
        }
        if !self
            .agent_start
            .is_within(self.grid_width, self.grid_height)
        {
            return Err(ConfigError::AgentStartOutOfBounds {
                x: self.agent_start.x(),
                y: self.agent_start.y(),
            });
        }
        Ok(())
    }
}

/// Reasons a [`SimulationConfig`] is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// One of the grid dimensions is zero.
    #[error("grid must have at least one column and one row")]
    EmptyGrid,
    /// The grid is not square.
    #[error("grid must be square, got {width}x{height}")]
    NonSquareGrid {
        /// Configured column count.
        width: u32,
        /// Configured row count.
        height: u32,
    },
    /// The agent could never hold energy.
    #[error("max_energy must be positive")]
    ZeroEnergyCap,
    /// Moving would be free, so the agent could never starve.
    #[error("move_cost must be positive")]
    ZeroMoveCost,
    /// Replenishing would never add food.
    #[error("food_batch must be positive")]
    ZeroFoodBatch,
    /// History could not hold the current tick.
    #[error("history capacity must be positive")]
    ZeroHistoryCapacity,
    /// The spawn cell lies outside the grid.
    #[error("agent start ({x}, {y}) lies outside the grid")]
    AgentStartOutOfBounds {
        /// Configured column.
        x: u32,
        /// Configured row.
        y: u32,
    },
}
