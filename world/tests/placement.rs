use std::collections::{HashMap, HashSet};

use mouse_forage_core::{
    Command, Event, PlacementError, Position, RandomSource, SimulationConfig, Snapshot, TileKind,
};
use mouse_forage_world::{self as world, query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

struct Seeded(ChaCha8Rng);

impl RandomSource for Seeded {
    fn pick(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }
}

fn small_world() -> World {
    World::new(&SimulationConfig {
        grid_width: 6,
        grid_height: 6,
        agent_start: Position::new(2, 3),
        ..SimulationConfig::default()
    })
    .expect("valid config")
}

#[test]
fn random_placement_fills_every_free_cell_exactly_once() {
    for seed in 0..8 {
        let mut world = small_world();
        let mut rng = Seeded(ChaCha8Rng::seed_from_u64(seed));
        let mut placed = HashSet::new();

        for _ in 0..35 {
            let mut events = Vec::new();
            world::apply(
                &mut world,
                Command::PlaceFood { position: None },
                &mut rng,
                &mut events,
            );
            let Some(Event::FoodPlaced { position }) = events.first() else {
                panic!("seed {seed}: expected a placement, got {events:?}");
            };
            assert_ne!(*position, Position::new(2, 3), "food spawned on the agent");
            assert!(position.is_within(6, 6));
            assert!(placed.insert(*position), "seed {seed}: {position:?} reused");
        }

        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::PlaceFood { position: None },
            &mut rng,
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::PlacementRejected {
                kind: TileKind::Food,
                reason: PlacementError::GridFull,
            }]
        );
        assert_eq!(query::food_count(&world), 35);
    }
}

#[test]
fn scent_peaks_on_the_most_recent_food() {
    let mut world = small_world();
    let mut rng = Seeded(ChaCha8Rng::seed_from_u64(1));
    let mut events = Vec::new();
    for position in [Position::new(0, 0), Position::new(1, 0), Position::new(5, 5)] {
        world::apply(
            &mut world,
            Command::PlaceFood {
                position: Some(position),
            },
            &mut rng,
            &mut events,
        );
    }

    let field = query::scent_field(&world);
    assert_eq!(field.value(Position::new(5, 5)), Some(1.0));
    for food in query::food_positions(&world) {
        assert!(field.value(food).is_some_and(|value| value >= 1.0));
    }
    assert!(field.values().iter().all(|value| *value >= 0.0));
}

fn placement_counts(size: u32, food: &[Position], draws: usize) -> HashMap<Position, usize> {
    let mut world = World::new(&SimulationConfig {
        grid_width: size,
        grid_height: size,
        ..SimulationConfig::default()
    })
    .expect("valid config");
    let mut rng = Seeded(ChaCha8Rng::seed_from_u64(99));
    let opening = Snapshot {
        agent: Position::new(0, 0),
        energy: 100,
        food_eaten: 0,
        score: 0,
        alive: true,
        food: food.to_vec(),
    };

    let mut counts = HashMap::new();
    for _ in 0..draws {
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::Restore {
                snapshot: opening.clone(),
            },
            &mut rng,
            &mut events,
        );
        world::apply(
            &mut world,
            Command::PlaceFood { position: None },
            &mut rng,
            &mut events,
        );
        let placed = events.iter().find_map(|event| match event {
            Event::FoodPlaced { position } => Some(*position),
            _ => None,
        });
        *counts
            .entry(placed.expect("a free cell exists"))
            .or_insert(0) += 1;
    }
    counts
}

fn assert_roughly_uniform(counts: &HashMap<Position, usize>, cells: usize, draws: usize) {
    assert_eq!(counts.len(), cells, "some free cell was never drawn");
    let expected = draws / cells;
    for (cell, count) in counts {
        assert!(
            count.abs_diff(expected) <= expected * 15 / 100,
            "{cell:?} drawn {count} times, expected about {expected}"
        );
    }
}

#[test]
fn counting_scan_draws_free_cells_uniformly() {
    let food = [
        Position::new(1, 0),
        Position::new(2, 0),
        Position::new(0, 1),
        Position::new(1, 1),
    ];
    let counts = placement_counts(3, &food, 4_000);

    for occupied in food.iter().chain([&Position::new(0, 0)]) {
        assert!(!counts.contains_key(occupied));
    }
    assert_roughly_uniform(&counts, 4, 4_000);
}

#[test]
fn rejection_sampling_draws_free_cells_uniformly() {
    let counts = placement_counts(4, &[], 15_000);

    assert!(!counts.contains_key(&Position::new(0, 0)));
    assert_roughly_uniform(&counts, 15, 15_000);
}
