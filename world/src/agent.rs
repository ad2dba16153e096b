//! Energy and score bookkeeping for the foraging agent.

use mouse_forage_core::{AgentView, Position, SenseWindow, Snapshot};

/// The single agent owned by the grid.
///
/// Alive agents spend energy on every move and regain it by feeding; once the
/// energy drops below zero the agent is dead for the rest of the round and
/// every action becomes a no-op.
#[derive(Clone, Debug)]
pub(crate) struct Agent {
    position: Position,
    energy: i64,
    max_energy: i64,
    food_energy: i64,
    alive: bool,
    food_eaten: u32,
    score: u64,
    window: SenseWindow,
}

impl Agent {
    pub(crate) fn new(position: Position, max_energy: u32, food_energy: u32) -> Self {
        Self {
            position,
            energy: i64::from(max_energy),
            max_energy: i64::from(max_energy),
            food_energy: i64::from(food_energy),
            alive: true,
            food_eaten: 0,
            score: 0,
            window: SenseWindow::default(),
        }
    }

    /// Fresh agent with full energy, keeping the energy constants.
    pub(crate) fn respawned(&self, position: Position) -> Self {
        Self {
            position,
            energy: self.max_energy,
            max_energy: self.max_energy,
            food_energy: self.food_energy,
            alive: true,
            food_eaten: 0,
            score: 0,
            window: SenseWindow::default(),
        }
    }

    /// Rebuilds an agent from captured state, keeping the energy constants.
    pub(crate) fn restored(&self, snapshot: &Snapshot) -> Self {
        Self {
            position: snapshot.agent,
            energy: snapshot.energy,
            max_energy: self.max_energy,
            food_energy: self.food_energy,
            alive: snapshot.alive,
            food_eaten: snapshot.food_eaten,
            score: snapshot.score,
            window: SenseWindow::default(),
        }
    }

    pub(crate) fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn energy(&self) -> i64 {
        self.energy
    }

    pub(crate) fn max_energy(&self) -> i64 {
        self.max_energy
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.alive
    }

    pub(crate) fn food_eaten(&self) -> u32 {
        self.food_eaten
    }

    pub(crate) fn score(&self) -> u64 {
        self.score
    }

    /// Moves the agent without spending energy.
    pub(crate) fn teleport(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) fn sense(&mut self, window: SenseWindow) {
        self.window = window;
    }

    /// Eats one food item. Score rewards the energy held at the moment of eating.
    ///
    /// Returns `false` when the agent is dead and nothing happened.
    pub(crate) fn feed(&mut self) -> bool {
        if !self.alive {
            return false;
        }

        self.food_eaten += 1;
        self.score += u64::try_from(self.energy).unwrap_or(0);
        self.energy = (self.energy + self.food_energy).min(self.max_energy);
        true
    }

    /// Spends energy, killing the agent when it drops below zero.
    ///
    /// Returns `true` when this call caused the death.
    pub(crate) fn spend_energy(&mut self, cost: u32) -> bool {
        if !self.alive {
            return false;
        }

        self.energy -= i64::from(cost);
        if self.energy < 0 {
            self.alive = false;
            return true;
        }
        false
    }

    pub(crate) fn view(&self) -> AgentView {
        AgentView {
            position: self.position,
            energy: self.energy,
            food_eaten: self.food_eaten,
            score: self.score,
            alive: self.alive,
            window: self.window,
        }
    }
}
