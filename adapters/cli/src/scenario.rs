use std::collections::HashSet;

use anyhow::{ensure, Result};
use mouse_forage_core::{Position, SimulationConfig, Snapshot};
use serde::Deserialize;

/// Hand-written starting position loaded from a TOML file.
///
/// ```toml
/// agent = { x = 5, y = 7 }
/// energy = 100
/// food = [{ x = 5, y = 5 }]
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Scenario {
    agent: Position,
    #[serde(default)]
    energy: Option<i64>,
    #[serde(default)]
    food: Vec<Position>,
}

impl Scenario {
    /// Parses a scenario from TOML text.
    pub(crate) fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Checks the scenario against the grid and builds the opening snapshot.
    pub(crate) fn into_snapshot(self, config: &SimulationConfig) -> Result<Snapshot> {
        let columns = config.grid_width;
        let rows = config.grid_height;
        let on_grid = |position: &Position| position.is_within(columns, rows);

        ensure!(
            on_grid(&self.agent),
            "agent ({}, {}) lies outside the {columns}x{rows} grid",
            self.agent.x(),
            self.agent.y()
        );

        let mut seen = HashSet::from([self.agent]);
        for food in &self.food {
            ensure!(
                on_grid(food),
                "food ({}, {}) lies outside the {columns}x{rows} grid",
                food.x(),
                food.y()
            );
            ensure!(
                seen.insert(*food),
                "food ({}, {}) overlaps another tile",
                food.x(),
                food.y()
            );
        }

        let max_energy = i64::from(config.max_energy);
        let energy = self.energy.unwrap_or(max_energy);
        ensure!(
            (0..=max_energy).contains(&energy),
            "energy {energy} must lie within 0..={max_energy}"
        );

        Ok(Snapshot {
            agent: self.agent,
            energy,
            food_eaten: 0,
            score: 0,
            alive: true,
            food: self.food,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scenario_with_default_energy() {
        let scenario = Scenario::parse(
            r#"
            agent = { x = 5, y = 7 }
            food = [{ x = 5, y = 5 }, { x = 0, y = 9 }]
            "#,
        )
        .expect("scenario parses");

        let snapshot = scenario
            .into_snapshot(&SimulationConfig::default())
            .expect("scenario fits the grid");

        assert_eq!(snapshot.agent, Position::new(5, 7));
        assert_eq!(snapshot.energy, 100);
        assert_eq!(
            snapshot.food,
            vec![Position::new(5, 5), Position::new(0, 9)]
        );
        assert!(snapshot.alive);
    }

    #[test]
    fn rejects_food_on_the_agent() {
        let scenario = Scenario::parse(
            r#"
            agent = { x = 1, y = 1 }
            food = [{ x = 1, y = 1 }]
            "#,
        )
        .expect("scenario parses");

        let error = scenario
            .into_snapshot(&SimulationConfig::default())
            .expect_err("overlap must be rejected");
        assert!(error.to_string().contains("overlaps"));
    }

    #[test]
    fn rejects_off_grid_food_and_bad_energy() {
        let config = SimulationConfig::default();

        let off_grid = Scenario::parse("agent = { x = 0, y = 0 }\nfood = [{ x = 10, y = 0 }]")
            .expect("scenario parses");
        assert!(off_grid.into_snapshot(&config).is_err());

        let overfed = Scenario::parse("agent = { x = 0, y = 0 }\nenergy = 101")
            .expect("scenario parses");
        assert!(overfed.into_snapshot(&config).is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Scenario::parse("agent = { x = 0, y = 0 }\nscore = 5").is_err());
    }
}
