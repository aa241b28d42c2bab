//! The cell matrix and its reconciliation against new content.
//!
//! Input rows may be ragged; the grid is always rectangular, padded with
//! empty cells up to the longest row. A position keeps its cell as long as
//! the content handle there is the same `Rc` (or both are `None`). Text is
//! never compared.

use std::rc::Rc;

use tracing::debug;

use super::cell::{CellSettings, TableCell};
use crate::text::{CellContent, TableContent};

/// Cells built and dropped by one reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileStats {
    pub built: usize,
    pub dropped: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CellGrid {
    rows: Vec<Vec<TableCell>>,
    columns: usize,
}

fn same_content(a: &CellContent, b: &CellContent) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

impl CellGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns
    }

    /// No rows or no columns.
    pub fn is_degenerate(&self) -> bool {
        self.rows.is_empty() || self.columns == 0
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.rows.get(row)?.get(col)
    }

    pub fn rows(&self) -> &[Vec<TableCell>] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Vec<TableCell>] {
        &mut self.rows
    }

    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &TableCell)> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, cell)| (r, c, cell)))
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut TableCell)> {
        self.rows
            .iter_mut()
            .enumerate()
            .flat_map(|(r, row)| row.iter_mut().enumerate().map(move |(c, cell)| (r, c, cell)))
    }

    /// Resize to fit `content` and rebuild only the positions whose content
    /// handle changed.
    pub fn reconcile(&mut self, content: &TableContent, settings: &CellSettings) -> ReconcileStats {
        let new_rows = content.len();
        let new_cols = content.iter().map(Vec::len).max().unwrap_or(0);
        let mut stats = ReconcileStats::default();

        if self.rows.len() > new_rows {
            stats.dropped += self.rows.drain(new_rows..).map(|row| row.len()).sum::<usize>();
        }

        for (r, source) in content.iter().enumerate() {
            let at = |c: usize| -> CellContent { source.get(c).cloned().flatten() };

            if r == self.rows.len() {
                self.rows.push(Vec::with_capacity(new_cols));
            }
            let row = &mut self.rows[r];

            if row.len() > new_cols {
                stats.dropped += row.len() - new_cols;
                row.truncate(new_cols);
            }

            for (c, cell) in row.iter_mut().enumerate() {
                let next = at(c);
                if !same_content(cell.content(), &next) {
                    *cell = TableCell::new(next, settings);
                    stats.built += 1;
                    stats.dropped += 1;
                }
            }

            for c in row.len()..new_cols {
                row.push(TableCell::new(at(c), settings));
                stats.built += 1;
            }
        }

        self.columns = new_cols;
        debug!(
            rows = new_rows,
            columns = new_cols,
            built = stats.built,
            dropped = stats.dropped,
            "cell grid reconciled"
        );
        stats
    }

    /// Push shared settings into every cell without rebuilding.
    pub fn apply(&mut self, settings: &CellSettings) {
        for row in &mut self.rows {
            for cell in row {
                cell.apply(settings);
            }
        }
    }
}
