#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Greedy scent-following decision policy for the foraging agent.
//!
//! The policy never plans ahead: it looks at the 3×3 window the agent sensed
//! this tick, grabs food that is literally next to it, and otherwise walks up
//! the local scent gradient, breaking ties at random.

use mouse_forage_core::{Command, Direction, Event, RandomSource, SenseWindow};

/// Configuration parameters required to construct the forager.
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    diagonal_scent: bool,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// With `diagonal_scent` each direction's magnitude is the sum of the full
    /// window row or column on that side instead of the single edge cell.
    #[must_use]
    pub const fn new(diagonal_scent: bool) -> Self {
        Self { diagonal_scent }
    }
}

/// Pure system that turns sensed scent into movement commands.
#[derive(Debug, Default)]
pub struct Forager {
    diagonal_scent: bool,
}

impl Forager {
    /// Creates a new forager using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            diagonal_scent: config.diagonal_scent,
        }
    }

    /// Consumes world events and emits one step command per sensed window.
    ///
    /// Only the most recent [`Event::AgentSensed`] in `events` is acted upon.
    pub fn handle<R>(
        &self,
        events: &[Event],
        adjacent_food: &[Direction],
        move_cost: u32,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) where
        R: RandomSource + ?Sized,
    {
        let Some(window) = events.iter().rev().find_map(|event| match event {
            Event::AgentSensed { window } => Some(*window),
            _ => None,
        }) else {
            return;
        };

        let direction = self.decide(&window, adjacent_food, rng);
        out.push(Command::StepAgent {
            direction,
            cost: move_cost,
        });
    }

    /// Chooses the next direction of travel.
    ///
    /// `adjacent_food` lists the directions whose neighbouring world tile holds
    /// food; any such direction wins outright. A blank or malformed window
    /// degrades to a random walk. Otherwise the strongest direction wins, with
    /// exact ties broken uniformly at random.
    pub fn decide<R>(
        &self,
        window: &SenseWindow,
        adjacent_food: &[Direction],
        rng: &mut R,
    ) -> Direction
    where
        R: RandomSource + ?Sized,
    {
        if !adjacent_food.is_empty() {
            return adjacent_food[rng.pick(adjacent_food.len())];
        }

        if window.is_blank() || window.is_malformed() {
            return random_direction(rng);
        }

        let magnitudes = self.magnitudes(window);
        let best = magnitudes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let candidates: Vec<Direction> = Direction::ALL
            .into_iter()
            .zip(magnitudes)
            .filter(|(_, magnitude)| *magnitude == best)
            .map(|(direction, _)| direction)
            .collect();

        candidates[rng.pick(candidates.len())]
    }

    /// Directional magnitudes in [`Direction::ALL`] order.
    fn magnitudes(&self, window: &SenseWindow) -> [f64; 4] {
        let cells = window.cells();
        if self.diagonal_scent {
            [
                cells[0].iter().sum(),
                cells[2].iter().sum(),
                cells.iter().map(|row| row[0]).sum(),
                cells.iter().map(|row| row[2]).sum(),
            ]
        } else {
            [cells[0][1], cells[2][1], cells[1][0], cells[1][2]]
        }
    }
}

/// Picks one of the four cardinal directions uniformly at random.
pub fn random_direction<R>(rng: &mut R) -> Direction
where
    R: RandomSource + ?Sized,
{
    Direction::ALL[rng.pick(Direction::ALL.len())]
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    struct Scripted(VecDeque<usize>);

    impl RandomSource for Scripted {
        fn pick(&mut self, len: usize) -> usize {
            self.0.pop_front().expect("script exhausted") % len
        }
    }

    fn scripted(values: &[usize]) -> Scripted {
        Scripted(values.iter().copied().collect())
    }

    fn window_with(north: f64, south: f64, west: f64, east: f64) -> SenseWindow {
        SenseWindow::new([[0.1, north, 0.1], [west, 0.2, east], [0.1, south, 0.1]])
    }

    #[test]
    fn strongest_direction_wins_without_randomness() {
        let forager = Forager::default();
        let mut rng = scripted(&[0]);
        let window = window_with(0.2, 0.5, 0.3, 0.1);
        assert_eq!(forager.decide(&window, &[], &mut rng), Direction::South);
    }

    #[test]
    fn ties_are_broken_among_maximal_directions_only() {
        let forager = Forager::default();
        let window = window_with(0.4, 0.1, 0.4, 0.4);

        let mut rng = scripted(&[0, 1, 2]);
        assert_eq!(forager.decide(&window, &[], &mut rng), Direction::North);
        assert_eq!(forager.decide(&window, &[], &mut rng), Direction::West);
        assert_eq!(forager.decide(&window, &[], &mut rng), Direction::East);
    }

    #[test]
    fn adjacency_override_beats_a_blank_window() {
        let forager = Forager::default();
        for seed in 0..8 {
            let mut rng = scripted(&[seed]);
            let decision = forager.decide(&SenseWindow::default(), &[Direction::North], &mut rng);
            assert_eq!(decision, Direction::North);
        }
    }

    #[test]
    fn adjacency_override_ignores_stronger_gradients() {
        let forager = Forager::default();
        let window = window_with(0.1, 0.9, 0.1, 0.1);
        let mut rng = scripted(&[1]);
        let decision = forager.decide(&window, &[Direction::West, Direction::East], &mut rng);
        assert_eq!(decision, Direction::East);
    }

    #[test]
    fn blank_window_walks_randomly() {
        let forager = Forager::default();
        let mut rng = scripted(&[0, 1, 2, 3]);
        let decisions: Vec<Direction> = (0..4)
            .map(|_| forager.decide(&SenseWindow::default(), &[], &mut rng))
            .collect();
        assert_eq!(decisions, Direction::ALL.to_vec());
    }

    #[test]
    fn malformed_window_degrades_to_random_walk() {
        let forager = Forager::default();
        let window = window_with(f64::NAN, 0.9, 0.1, 0.1);
        let mut rng = scripted(&[3]);
        assert_eq!(forager.decide(&window, &[], &mut rng), Direction::East);
    }

    #[test]
    fn diagonal_mode_sums_full_rows_and_columns() {
        let window = SenseWindow::new([[0.3, 0.1, 0.3], [0.0, 0.0, 0.0], [0.0, 0.4, 0.0]]);

        let mut rng = scripted(&[0]);
        assert_eq!(
            Forager::default().decide(&window, &[], &mut rng),
            Direction::South
        );

        let mut rng = scripted(&[0]);
        assert_eq!(
            Forager::new(Config::new(true)).decide(&window, &[], &mut rng),
            Direction::North
        );
    }

    #[test]
    fn handle_emits_step_for_latest_sensed_window() {
        let forager = Forager::default();
        let mut rng = scripted(&[0]);
        let mut out = Vec::new();
        let events = [
            Event::AgentSensed {
                window: window_with(0.9, 0.1, 0.1, 0.1),
            },
            Event::AgentSensed {
                window: window_with(0.1, 0.1, 0.1, 0.9),
            },
        ];

        forager.handle(&events, &[], 3, &mut rng, &mut out);

        assert_eq!(
            out,
            vec![Command::StepAgent {
                direction: Direction::East,
                cost: 3
            }]
        );
    }

    #[test]
    fn handle_ignores_batches_without_sensing() {
        let forager = Forager::default();
        let mut rng = scripted(&[]);
        let mut out = Vec::new();
        forager.handle(&[Event::RoundReset], &[], 1, &mut rng, &mut out);
        assert!(out.is_empty());
    }
}
