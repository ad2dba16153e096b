#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid state management for Mouse Forage.

mod agent;
mod scent;

use mouse_forage_core::{
    Command, ConfigError, Direction, Event, PlacementError, Position, RandomSource, ScentMode,
    SimulationConfig, Snapshot, Tile, TileKind, DEFAULT_TILE_DIFFICULTY,
};

use crate::agent::Agent;

pub use scent::{round_scent, ScentError, ScentField};

/// Represents the authoritative grid: tiles, scent field, and the agent.
#[derive(Debug)]
pub struct World {
    columns: u32,
    rows: u32,
    agent_start: Position,
    tiles: Vec<Tile>,
    occupancy: OccupancyGrid,
    scent: ScentField,
    scent_mode: ScentMode,
    agent: Agent,
}

impl World {
    /// Creates an empty grid with the agent on its configured start cell.
    ///
    /// Fails when the configuration violates the grid invariants.
    pub fn new(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut world = Self {
            columns: config.grid_width,
            rows: config.grid_height,
            agent_start: config.agent_start,
            tiles: Vec::new(),
            occupancy: OccupancyGrid::new(config),
            scent: ScentField::default(),
            scent_mode: config.scent_mode,
            agent: Agent::new(config.agent_start, config.max_energy, config.food_energy),
        };
        world.clear();
        Ok(world)
    }

    /// Empties the grid and registers a fresh agent tile on the start cell.
    fn clear(&mut self) {
        self.tiles.clear();
        self.occupancy.clear();
        self.agent = self.agent.respawned(self.agent_start);
        self.register_tile(TileKind::Player, self.agent_start);
        let _ = self.rebuild_scent();
    }

    fn register_tile(&mut self, kind: TileKind, position: Position) {
        self.occupancy.occupy(position, kind);
        self.tiles.push(Tile {
            position,
            kind,
            difficulty: DEFAULT_TILE_DIFFICULTY,
        });
    }

    fn remove_tile(&mut self, position: Position) -> Option<TileKind> {
        let index = self.tiles.iter().position(|tile| tile.position == position)?;
        let tile = self.tiles.remove(index);
        self.occupancy.vacate(position);
        Some(tile.kind)
    }

    fn food_positions(&self) -> Vec<Position> {
        self.tiles
            .iter()
            .filter(|tile| tile.kind == TileKind::Food)
            .map(|tile| tile.position)
            .collect()
    }

    fn food_count(&self) -> usize {
        self.tiles
            .iter()
            .filter(|tile| tile.kind == TileKind::Food)
            .count()
    }

    fn has_food_at(&self, position: Position) -> bool {
        self.occupancy.occupant(position) == Some(TileKind::Food)
    }

    /// Chooses where a new tile goes, honouring `requested` when it is usable.
    fn resolve_placement<R>(
        &self,
        requested: Option<Position>,
        rng: &mut R,
    ) -> Result<Position, PlacementError>
    where
        R: RandomSource + ?Sized,
    {
        if self.tiles.len() >= self.occupancy.capacity() {
            return Err(PlacementError::GridFull);
        }

        match requested {
            Some(position) if self.occupancy.is_free(position) => Ok(position),
            _ => self
                .occupancy
                .random_free_cell(self.tiles.len(), rng)
                .ok_or(PlacementError::GridFull),
        }
    }

    fn place_food<R>(
        &mut self,
        requested: Option<Position>,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> bool
    where
        R: RandomSource + ?Sized,
    {
        match self.resolve_placement(requested, rng) {
            Ok(position) => {
                self.register_tile(TileKind::Food, position);
                out_events.push(Event::FoodPlaced { position });
                true
            }
            Err(reason) => {
                out_events.push(Event::PlacementRejected {
                    kind: TileKind::Food,
                    reason,
                });
                false
            }
        }
    }

    fn place_agent<R>(
        &mut self,
        requested: Option<Position>,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) where
        R: RandomSource + ?Sized,
    {
        let current = self.agent.position();
        let _ = self.remove_tile(current);

        let position = match self.resolve_placement(requested, rng) {
            Ok(position) => position,
            Err(reason) => {
                out_events.push(Event::PlacementRejected {
                    kind: TileKind::Player,
                    reason,
                });
                current
            }
        };

        self.register_tile(TileKind::Player, position);
        self.agent.teleport(position);
        out_events.push(Event::AgentPlaced { position });
    }

    fn rebuild_scent(&mut self) -> usize {
        let food = self.food_positions();
        if let Err(error) =
            self.scent
                .rebuild_with(self.columns, self.rows, &food, self.scent_mode)
        {
            panic!("grid holds food the scent field cannot represent: {error}");
        }
        food.len()
    }

    fn recompute_scent(&mut self, out_events: &mut Vec<Event>) {
        let food_count = self.rebuild_scent();
        out_events.push(Event::ScentRecomputed { food_count });
    }

    fn step_agent(&mut self, direction: Direction, cost: u32, out_events: &mut Vec<Event>) {
        if !self.agent.is_alive() {
            return;
        }

        let from = self.agent.position();
        let to = from
            .neighbor(direction, self.columns, self.rows)
            .unwrap_or(from);

        let starved = self.agent.spend_energy(cost);
        out_events.push(Event::AgentStepped {
            direction,
            from,
            to,
            energy: self.agent.energy(),
        });
        if starved {
            out_events.push(Event::AgentStarved { position: to });
        }

        if to == from {
            return;
        }

        let _ = self.remove_tile(from);
        let ate = self.remove_tile(to) == Some(TileKind::Food);
        self.register_tile(TileKind::Player, to);
        self.agent.teleport(to);

        if ate {
            if self.agent.feed() {
                out_events.push(Event::FoodEaten {
                    position: to,
                    food_eaten: self.agent.food_eaten(),
                    score: self.agent.score(),
                    energy: self.agent.energy(),
                });
            }
            self.recompute_scent(out_events);
        }
    }

    fn restore(&mut self, snapshot: &Snapshot) {
        assert!(
            snapshot.food.len() < self.occupancy.capacity(),
            "snapshot holds {} food items but the grid has {} cells",
            snapshot.food.len(),
            self.occupancy.capacity()
        );
        assert!(
            snapshot.agent.is_within(self.columns, self.rows),
            "snapshot agent at ({}, {}) lies outside the {}x{} grid",
            snapshot.agent.x(),
            snapshot.agent.y(),
            self.columns,
            self.rows
        );
        let max_energy = self.agent.max_energy();
        assert!(
            snapshot.energy <= max_energy && (!snapshot.alive || snapshot.energy >= 0),
            "snapshot energy {} is outside 0..={max_energy} for a {} agent",
            snapshot.energy,
            if snapshot.alive { "living" } else { "dead" }
        );

        self.tiles.clear();
        self.occupancy.clear();
        self.agent = self.agent.restored(snapshot);
        self.register_tile(TileKind::Player, snapshot.agent);
        for &position in &snapshot.food {
            assert!(
                self.occupancy.is_free(position),
                "snapshot food at ({}, {}) is off-grid or overlaps another tile",
                position.x(),
                position.y()
            );
            self.register_tile(TileKind::Food, position);
        }
        let _ = self.rebuild_scent();
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Random placements draw from `rng`; every outcome is reported through
/// `out_events`.
pub fn apply<R>(world: &mut World, command: Command, rng: &mut R, out_events: &mut Vec<Event>)
where
    R: RandomSource + ?Sized,
{
    match command {
        Command::PlaceFood { position } => {
            if world.place_food(position, rng, out_events) {
                world.recompute_scent(out_events);
            }
        }
        Command::PlaceAgent { position } => {
            world.place_agent(position, rng, out_events);
        }
        Command::ReplenishFood { count } => {
            if world.food_count() > 0 {
                return;
            }

            let mut placed = false;
            for _ in 0..count {
                if !world.place_food(None, rng, out_events) {
                    break;
                }
                placed = true;
            }
            if placed {
                world.recompute_scent(out_events);
            }
        }
        Command::RecomputeScent => world.recompute_scent(out_events),
        Command::SenseScent => {
            let window = world.scent.window_around(world.agent.position());
            world.agent.sense(window);
            out_events.push(Event::AgentSensed { window });
        }
        Command::StepAgent { direction, cost } => world.step_agent(direction, cost, out_events),
        Command::SetScentMode { mode } => {
            if world.scent_mode != mode {
                world.scent_mode = mode;
                out_events.push(Event::ScentModeChanged { mode });
            }
        }
        Command::ResetRound => {
            world.clear();
            out_events.push(Event::RoundReset);
            out_events.push(Event::AgentPlaced {
                position: world.agent_start,
            });
        }
        Command::Restore { snapshot } => {
            world.restore(&snapshot);
            out_events.push(Event::StateRestored {
                food_count: snapshot.food.len(),
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use mouse_forage_core::{AgentView, Direction, Position, ScentMode, Snapshot, Tile};

    use super::{ScentField, World};

    /// Grid dimensions as `(columns, rows)`.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        (world.columns, world.rows)
    }

    /// Occupied tiles in placement order.
    #[must_use]
    pub fn tiles(world: &World) -> &[Tile] {
        &world.tiles
    }

    /// Positions of every food item in placement order.
    #[must_use]
    pub fn food_positions(world: &World) -> Vec<Position> {
        world.food_positions()
    }

    /// Number of food items on the grid.
    #[must_use]
    pub fn food_count(world: &World) -> usize {
        world.food_count()
    }

    /// Reports whether a food item sits on the provided cell.
    #[must_use]
    pub fn has_food_at(world: &World, position: Position) -> bool {
        world.has_food_at(position)
    }

    /// Captures a read-only view of the agent.
    #[must_use]
    pub fn agent(world: &World) -> AgentView {
        world.agent.view()
    }

    /// Provides read-only access to the current scent field.
    #[must_use]
    pub fn scent_field(world: &World) -> &ScentField {
        &world.scent
    }

    /// Accumulation policy the next recompute will use.
    #[must_use]
    pub fn scent_mode(world: &World) -> ScentMode {
        world.scent_mode
    }

    /// Directions from the agent that lead straight onto a food item.
    ///
    /// Directions are listed in [`Direction::ALL`] order.
    #[must_use]
    pub fn adjacent_food(world: &World) -> Vec<Direction> {
        let origin = world.agent.position();
        Direction::ALL
            .into_iter()
            .filter(|direction| {
                origin
                    .neighbor(*direction, world.columns, world.rows)
                    .is_some_and(|cell| world.has_food_at(cell))
            })
            .collect()
    }

    /// Deep copy of the state needed to rewind to this moment.
    #[must_use]
    pub fn snapshot(world: &World) -> Snapshot {
        let agent = world.agent.view();
        Snapshot {
            agent: agent.position,
            energy: agent.energy,
            food_eaten: agent.food_eaten,
            score: agent.score,
            alive: agent.alive,
            food: world.food_positions(),
        }
    }
}

#[derive(Clone, Debug)]
struct OccupancyGrid {
    columns: u32,
    rows: u32,
    cells: Vec<Option<TileKind>>,
}

impl OccupancyGrid {
    fn new(config: &SimulationConfig) -> Self {
        Self {
            columns: config.grid_width,
            rows: config.grid_height,
            cells: vec![None; config.cell_count()],
        }
    }

    fn clear(&mut self) {
        self.cells.fill(None);
    }

    fn capacity(&self) -> usize {
        self.cells.len()
    }

    fn occupant(&self, cell: Position) -> Option<TileKind> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    /// Off-grid cells are never free.
    fn is_free(&self, cell: Position) -> bool {
        self.index(cell)
            .and_then(|index| self.cells.get(index))
            .is_some_and(Option::is_none)
    }

    fn occupy(&mut self, cell: Position, kind: TileKind) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = Some(kind);
            }
        }
    }

    fn vacate(&mut self, cell: Position) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = None;
            }
        }
    }

    /// Draws a cell uniformly from the free ones.
    ///
    /// Below half occupancy random cells are drawn until a free one turns up;
    /// from half occupancy on, the free cells are counted and one is picked by
    /// index. Both strategies are uniform over the free cells.
    fn random_free_cell<R>(&self, occupied: usize, rng: &mut R) -> Option<Position>
    where
        R: RandomSource + ?Sized,
    {
        let capacity = self.capacity();
        if occupied >= capacity {
            return None;
        }

        if occupied * 2 < capacity {
            let columns = usize::try_from(self.columns).ok()?;
            let rows = usize::try_from(self.rows).ok()?;
            loop {
                let x = u32::try_from(rng.pick(columns)).ok()?;
                let y = u32::try_from(rng.pick(rows)).ok()?;
                let candidate = Position::new(x, y);
                if self.is_free(candidate) {
                    return Some(candidate);
                }
            }
        }

        let free = self.cells.iter().filter(|cell| cell.is_none()).count();
        if free == 0 {
            return None;
        }
        let choice = rng.pick(free);
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .nth(choice)
            .and_then(|(index, _)| self.position_of(index))
    }

    fn position_of(&self, index: usize) -> Option<Position> {
        let width = usize::try_from(self.columns).ok()?;
        if width == 0 {
            return None;
        }
        let x = u32::try_from(index % width).ok()?;
        let y = u32::try_from(index / width).ok()?;
        Some(Position::new(x, y))
    }

    fn index(&self, cell: Position) -> Option<usize> {
        if cell.is_within(self.columns, self.rows) {
            let row = usize::try_from(cell.y()).ok()?;
            let column = usize::try_from(cell.x()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
