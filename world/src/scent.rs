//! Scent field builder used by the world crate.

use mouse_forage_core::{Position, ScentMode, SenseWindow, SCENT_PRECISION_DIGITS};
use thiserror::Error;

/// Dense per-cell scent potential derived from every food item on the grid.
///
/// The field is rebuilt from scratch whenever the food set changes. Values are
/// stored in row-major order and every contribution is rounded to
/// [`SCENT_PRECISION_DIGITS`] decimal digits so comparisons stay exact.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScentField {
    columns: u32,
    rows: u32,
    values: Vec<f64>,
}

/// Food sets a scent field refuses to compute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ScentError {
    /// A food item lies outside the field.
    #[error("food at ({x}, {y}) lies outside the {columns}x{rows} field")]
    FoodOutOfBounds {
        /// Column of the offending food item.
        x: u32,
        /// Row of the offending food item.
        y: u32,
        /// Field width.
        columns: u32,
        /// Field height.
        rows: u32,
    },
}

impl ScentField {
    /// Builds a field for the provided food set.
    pub fn compute(
        columns: u32,
        rows: u32,
        food: &[Position],
        mode: ScentMode,
    ) -> Result<Self, ScentError> {
        let mut field = Self::default();
        field.rebuild_with(columns, rows, food, mode)?;
        Ok(field)
    }

    /// Rebuilds the field in place, reusing the existing allocation.
    ///
    /// In [`ScentMode::Stacking`] every source adds its contribution to each
    /// cell except the source's own cell, which is assigned the self-term and
    /// therefore discards whatever earlier sources accumulated there. Later
    /// sources still add on top of it.
    pub fn rebuild_with(
        &mut self,
        columns: u32,
        rows: u32,
        food: &[Position],
        mode: ScentMode,
    ) -> Result<(), ScentError> {
        if let Some(outside) = food.iter().find(|item| !item.is_within(columns, rows)) {
            return Err(ScentError::FoodOutOfBounds {
                x: outside.x(),
                y: outside.y(),
                columns,
                rows,
            });
        }

        let cell_count = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        self.columns = columns;
        self.rows = rows;
        self.values.clear();
        self.values.resize(cell_count, 0.0);

        for &source in food {
            for y in 0..rows {
                for x in 0..columns {
                    let cell = Position::new(x, y);
                    let Some(index) = index(columns, cell) else {
                        continue;
                    };
                    let contribution = round_scent(1.0 / (cell.euclidean_distance(source) + 1.0));
                    let slot = &mut self.values[index];
                    match mode {
                        ScentMode::Stacking if cell == source => *slot = contribution,
                        ScentMode::Stacking => *slot += contribution,
                        ScentMode::Max => *slot = slot.max(contribution),
                    }
                }
            }
        }

        Ok(())
    }

    /// Width of the field in cells.
    #[must_use]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Height of the field in cells.
    #[must_use]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Dense scent values stored in row-major order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Scent captured for the provided cell, if it lies within the field.
    #[must_use]
    pub fn value(&self, cell: Position) -> Option<f64> {
        if !cell.is_within(self.columns, self.rows) {
            return None;
        }
        index(self.columns, cell).and_then(|offset| self.values.get(offset).copied())
    }

    /// Copies the 3×3 neighbourhood around `center`, reading zero off-grid.
    #[must_use]
    pub fn window_around(&self, center: Position) -> SenseWindow {
        let mut cells = [[0.0; 3]; 3];
        for (row, line) in cells.iter_mut().enumerate() {
            for (column, slot) in line.iter_mut().enumerate() {
                let x = i64::from(center.x()) + column as i64 - 1;
                let y = i64::from(center.y()) + row as i64 - 1;
                let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
                    continue;
                };
                *slot = self.value(Position::new(x, y)).unwrap_or(0.0);
            }
        }
        SenseWindow::new(cells)
    }
}

/// Rounds a scent contribution to the fixed field precision.
#[must_use]
pub fn round_scent(value: f64) -> f64 {
    let scale = 10f64.powi(SCENT_PRECISION_DIGITS);
    (value * scale).round() / scale
}

fn index(columns: u32, cell: Position) -> Option<usize> {
    let width = usize::try_from(columns).ok()?;
    let column = usize::try_from(cell.x()).ok()?;
    let row = usize::try_from(cell.y()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}
