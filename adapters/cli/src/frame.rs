use std::fmt::Write as _;

use mouse_forage_core::{RenderState, TileKind};
use mouse_forage_simulation::ScoreReport;

const EMPTY_GLYPH: char = '.';
const FOOD_GLYPH: char = 'F';
const MOUSE_GLYPH: char = 'M';
const DEAD_MOUSE_GLYPH: char = 'X';

/// Draws the grid as text followed by a status line.
pub(crate) fn render(state: &RenderState) -> String {
    let columns = state.columns as usize;
    let mut cells = vec![EMPTY_GLYPH; columns * state.rows as usize];
    for tile in &state.tiles {
        let glyph = match tile.kind {
            TileKind::Food => FOOD_GLYPH,
            TileKind::Player if state.agent.alive => MOUSE_GLYPH,
            TileKind::Player => DEAD_MOUSE_GLYPH,
        };
        let index = tile.position.y() as usize * columns + tile.position.x() as usize;
        if let Some(cell) = cells.get_mut(index) {
            *cell = glyph;
        }
    }

    let mut frame = String::with_capacity(cells.len() * 2 + 64);
    for row in cells.chunks(columns.max(1)) {
        let line: Vec<String> = row.iter().map(char::to_string).collect();
        frame.push_str(&line.join(" "));
        frame.push('\n');
    }
    let _ = write!(
        frame,
        "round {}  score {}  energy {}  food {}{}",
        state.round,
        state.agent.score,
        state.agent.energy,
        state.agent.food_eaten,
        if state.paused { "  [paused]" } else { "" }
    );
    frame
}

/// Summarises finished rounds the way a score board would.
pub(crate) fn score_summary(report: Option<&ScoreReport>) -> String {
    let Some(report) = report else {
        return "no round has finished yet".to_owned();
    };

    let mut summary = String::new();
    let _ = writeln!(summary, "There have been {} round(s).", report.rounds);
    let _ = writeln!(
        summary,
        "The highest possible score is {}",
        report.max_possible
    );
    let _ = writeln!(summary, "The high score of all rounds is {}", report.best);
    let _ = writeln!(summary, "The worst of all rounds is {}", report.worst);
    let _ = writeln!(summary, "The average of all rounds is {:.2}", report.mean);
    let _ = write!(
        summary,
        "Rounds won: {}, rounds starved: {}",
        report.successes, report.starvations
    );
    summary
}
