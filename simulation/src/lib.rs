#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick loop, round lifecycle and rewind control for Mouse Forage.
//!
//! [`Simulation`] owns the world together with every system and drives them
//! in a fixed order each tick. Presentation layers call into it and read its
//! state between ticks; they never mutate the world directly.

use mouse_forage_core::{
    Command, ConfigError, Event, RandomSource, RenderState, RoundOutcome, ScentMode,
    SimulationConfig, Snapshot,
};
use mouse_forage_system_analytics::Analytics;
use mouse_forage_system_forager::{Config as ForagerConfig, Forager};
use mouse_forage_system_history::History;
use mouse_forage_world::{self as world, query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, trace, warn};

pub use mouse_forage_system_analytics::{RoundRecord, ScoreReport};

/// Production random source backed by a seeded ChaCha8 stream.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    /// Creates a random source whose stream is fully determined by `seed`.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Running,
    Ended(RoundOutcome),
}

/// Owns the world and orchestrates systems tick by tick.
#[derive(Debug)]
pub struct Simulation<R = SeededRandom> {
    config: SimulationConfig,
    world: World,
    forager: Forager,
    history: History,
    analytics: Analytics,
    rng: R,
    round: u32,
    paused: bool,
    phase: Phase,
    events: Vec<Event>,
}

impl Simulation<SeededRandom> {
    /// Creates a simulation drawing every random choice from a ChaCha8 stream.
    pub fn seeded(config: SimulationConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::new(config, SeededRandom::from_seed(seed))
    }
}

impl<R> Simulation<R>
where
    R: RandomSource,
{
    /// Creates a running simulation with one food item already on the grid.
    ///
    /// The opening state is recorded as the first history snapshot.
    pub fn new(config: SimulationConfig, rng: R) -> Result<Self, ConfigError> {
        let world = World::new(&config)?;
        let mut simulation = Self {
            forager: Forager::new(ForagerConfig::new(config.diagonal_scent)),
            history: History::new(config.history_capacity()),
            analytics: Analytics::new(),
            world,
            rng,
            round: 0,
            paused: false,
            phase: Phase::Running,
            events: Vec::new(),
            config,
        };

        simulation.apply(Command::PlaceFood { position: None });
        simulation.record_snapshot();
        Ok(simulation)
    }

    /// Advances one tick unless paused or waiting for the next round.
    ///
    /// Returns whether the world advanced.
    pub fn tick(&mut self) -> bool {
        if self.paused {
            return false;
        }
        self.advance()
    }

    /// Advances exactly one tick while paused.
    ///
    /// Ignored, returning `false`, while the simulation is running.
    pub fn step_once(&mut self) -> bool {
        if !self.paused {
            return false;
        }
        self.advance()
    }

    /// Restores the state recorded `steps` ticks ago while paused.
    ///
    /// `steps` is clamped to the oldest retained snapshot of the current
    /// round. Returns `false` when running, when the round is over, or when
    /// fewer than two snapshots exist.
    pub fn rewind(&mut self, steps: usize) -> bool {
        if !self.paused || self.is_round_over() {
            return false;
        }

        let Some(snapshot) = self.history.rewind(steps).cloned() else {
            return false;
        };
        self.events.clear();
        self.apply(Command::Restore { snapshot });
        true
    }

    /// Replaces the live grid and agent with `snapshot`.
    ///
    /// The round resumes running and its history restarts from the restored
    /// state.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.events.clear();
        self.apply(Command::Restore {
            snapshot: snapshot.clone(),
        });
        self.phase = Phase::Running;
        self.history.clear();
        self.record_snapshot();
    }

    /// Resets into a fresh round after a round ended without auto restart.
    ///
    /// Returns `false` while the current round is still in progress.
    pub fn start_next_round(&mut self) -> bool {
        if !self.is_round_over() {
            return false;
        }
        self.events.clear();
        self.begin_round();
        true
    }

    /// Switches the scent policy; the next recompute picks it up.
    pub fn set_scent_mode(&mut self, mode: ScentMode) {
        self.apply(Command::SetScentMode { mode });
    }

    /// Suspends automatic ticking.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resumes automatic ticking.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Flips between paused and running.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Reports whether automatic ticking is suspended.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Reports whether the current round ended and awaits [`Self::start_next_round`].
    #[must_use]
    pub fn is_round_over(&self) -> bool {
        matches!(self.phase, Phase::Ended(_))
    }

    /// Outcome of the current round once it has ended.
    #[must_use]
    pub fn round_outcome(&self) -> Option<RoundOutcome> {
        match self.phase {
            Phase::Running => None,
            Phase::Ended(outcome) => Some(outcome),
        }
    }

    /// Zero-based index of the current round.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Scores of every finished round in order.
    #[must_use]
    pub fn round_scores(&self) -> Vec<u64> {
        self.analytics.scores()
    }

    /// Ledger entries of every finished round in order.
    #[must_use]
    pub fn rounds(&self) -> &[RoundRecord] {
        self.analytics.rounds()
    }

    /// Summary statistics over every finished round.
    #[must_use]
    pub fn score_report(&self) -> Option<ScoreReport> {
        self.analytics.report(self.config.max_round_score())
    }

    /// Everything a presentation layer needs to draw the current frame.
    #[must_use]
    pub fn render_state(&self) -> RenderState {
        let (columns, rows) = query::dimensions(&self.world);
        RenderState {
            columns,
            rows,
            tiles: query::tiles(&self.world).to_vec(),
            agent: query::agent(&self.world),
            round: self.round,
            paused: self.paused,
        }
    }

    /// Deep copy of the live state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        query::snapshot(&self.world)
    }

    /// Snapshots recorded during the current round.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Configuration the simulation was built with.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Events produced by the most recent tick or control call.
    #[must_use]
    pub fn last_events(&self) -> &[Event] {
        &self.events
    }

    fn advance(&mut self) -> bool {
        if self.is_round_over() {
            return false;
        }

        self.events.clear();
        self.apply(Command::ReplenishFood {
            count: self.config.food_batch,
        });
        self.apply(Command::RecomputeScent);
        self.apply(Command::SenseScent);

        let adjacent = query::adjacent_food(&self.world);
        let mut commands = Vec::new();
        self.forager.handle(
            &self.events,
            &adjacent,
            self.config.move_cost,
            &mut self.rng,
            &mut commands,
        );
        for command in commands {
            if let Command::StepAgent { direction, .. } = &command {
                trace!(round = self.round, ?direction, ?adjacent, "forager decided");
            }
            self.apply(command);
        }

        match self.evaluate_end_conditions() {
            Some(outcome) => self.end_round(outcome),
            None => self.record_snapshot(),
        }
        true
    }

    fn evaluate_end_conditions(&self) -> Option<RoundOutcome> {
        let agent = query::agent(&self.world);
        if agent.food_eaten >= self.config.food_per_round {
            Some(RoundOutcome::Success)
        } else if !agent.alive {
            Some(RoundOutcome::Starved)
        } else {
            None
        }
    }

    fn end_round(&mut self, outcome: RoundOutcome) {
        let mut score = query::agent(&self.world).score;
        if outcome == RoundOutcome::Starved && self.config.death_penalty {
            score = 0;
        }

        let ended = Event::RoundEnded {
            round: self.round,
            outcome,
            score,
        };
        self.analytics.handle(std::slice::from_ref(&ended));
        self.events.push(ended);
        info!(round = self.round, ?outcome, score, "round ended");

        if self.config.auto_restart {
            self.begin_round();
        } else {
            self.phase = Phase::Ended(outcome);
            self.record_snapshot();
        }
    }

    fn begin_round(&mut self) {
        self.apply(Command::ResetRound);
        self.history.clear();
        self.round += 1;
        self.phase = Phase::Running;
        self.record_snapshot();
    }

    fn record_snapshot(&mut self) {
        self.history.push(query::snapshot(&self.world));
    }

    fn apply(&mut self, command: Command) {
        let first_new = self.events.len();
        world::apply(&mut self.world, command, &mut self.rng, &mut self.events);
        for event in &self.events[first_new..] {
            if let Event::PlacementRejected { kind, reason } = event {
                warn!(?kind, ?reason, "placement rejected");
            }
        }
    }
}
