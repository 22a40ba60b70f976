//! Dense output grid shared by all decoders

use serde::Serialize;
use std::collections::HashMap;

use crate::axis::{Axis, Label};
use crate::sixtysix::SparseEntry;
use crate::{Error, Result};

/// Rows keyed by x-axis position, columns keyed by y-axis label
///
/// Cells are stored row-major and default to zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DenseTable {
    pub x_axis: Axis,
    pub y_axis: Axis,
    cells: Vec<f64>,
}

impl DenseTable {
    /// All-zero table over the two axes
    pub fn zeroed(x_axis: Axis, y_axis: Axis) -> Self {
        let cells = vec![0.0; x_axis.len() * y_axis.len()];
        Self {
            x_axis,
            y_axis,
            cells,
        }
    }

    /// Table from explicit row-major cells
    pub fn from_cells(x_axis: Axis, y_axis: Axis, cells: Vec<f64>) -> Result<Self> {
        let expected = x_axis.len() * y_axis.len();
        if cells.len() != expected {
            return Err(Error::CountMismatch {
                what: "cells",
                declared: expected,
                parsed: cells.len(),
            });
        }
        Ok(Self {
            x_axis,
            y_axis,
            cells,
        })
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.x_axis.len()
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.y_axis.len()
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.row_count() && col < self.column_count()).then(|| row * self.column_count() + col)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.index(row, col).map(|i| self.cells[i])
    }

    /// Write one cell; false if the position is outside the grid
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> bool {
        match self.index(row, col) {
            Some(i) => {
                self.cells[i] = value;
                true
            }
            None => false,
        }
    }

    /// Column index of a y-axis label
    pub fn column_of(&self, label: &Label) -> Option<usize> {
        self.y_axis.position(label)
    }

    /// Overwrite cells from sparse entries; columns are resolved by label
    ///
    /// Returns the number of entries whose row or column is not in the table.
    pub fn apply_sparse(&mut self, entries: &[SparseEntry]) -> usize {
        let columns: HashMap<i64, usize> = self
            .y_axis
            .labels
            .iter()
            .enumerate()
            .filter_map(|(i, label)| match label {
                Label::Int(v) => Some((*v, i)),
                _ => None,
            })
            .collect();

        let mut missed = 0;
        for entry in entries {
            let col = columns.get(&i64::from(entry.column)).copied();
            let written = col.is_some_and(|c| self.set(entry.row, c, f64::from(entry.value)));
            if !written {
                missed += 1;
            }
        }
        missed
    }

    /// Cells of one row
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row >= self.row_count() {
            return None;
        }
        let width = self.column_count();
        Some(&self.cells[row * width..(row + 1) * width])
    }

    /// All cells, row-major
    pub fn cells(&self) -> &[f64] {
        &self.cells
    }

    /// Row-major iteration; each call starts again from the first row
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            table: self,
            next: 0,
        }
    }
}

/// One table row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Row<'a> {
    pub label: &'a Label,
    pub values: &'a [f64],
}

/// Iterator over the rows of a [`DenseTable`]
#[derive(Debug, Clone)]
pub struct Rows<'a> {
    table: &'a DenseTable,
    next: usize,
}

impl<'a> Iterator for Rows<'a> {
    type Item = Row<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let table = self.table;
        let values = table.row(self.next)?;
        let label = &table.x_axis.labels[self.next];
        self.next += 1;
        Some(Row { label, values })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.table.row_count().saturating_sub(self.next);
        (left, Some(left))
    }
}

impl ExactSizeIterator for Rows<'_> {}

impl<'a> IntoIterator for &'a DenseTable {
    type Item = Row<'a>;
    type IntoIter = Rows<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> DenseTable {
        let x = Axis::positions("row", 2);
        let y = Axis::new("m/z", vec![Label::from(10u16), Label::from(20u16), Label::from(30u16)]);
        DenseTable::zeroed(x, y)
    }

    #[test]
    fn test_zeroed() {
        let table = small();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 3);
        assert!(table.cells().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_set_and_get() {
        let mut table = small();
        assert!(table.set(1, 2, 4.5));
        assert_eq!(table.get(1, 2), Some(4.5));
        assert!(!table.set(2, 0, 1.0));
        assert_eq!(table.get(0, 3), None);
    }

    #[test]
    fn test_from_cells_checks_length() {
        let x = Axis::positions("row", 2);
        let y = Axis::positions("col", 2);
        assert!(DenseTable::from_cells(x.clone(), y.clone(), vec![1.0, 2.0, 3.0, 4.0]).is_ok());
        assert_eq!(
            DenseTable::from_cells(x, y, vec![1.0]),
            Err(Error::CountMismatch {
                what: "cells",
                declared: 4,
                parsed: 1
            })
        );
    }

    #[test]
    fn test_apply_sparse() {
        let mut table = small();
        let entries = [
            SparseEntry { row: 0, column: 20, value: 7 },
            SparseEntry { row: 1, column: 30, value: 9 },
            SparseEntry { row: 1, column: 99, value: 1 },
        ];
        assert_eq!(table.apply_sparse(&entries), 1);
        assert_eq!(table.row(0).unwrap(), &[0.0, 7.0, 0.0]);
        assert_eq!(table.row(1).unwrap(), &[0.0, 0.0, 9.0]);
    }

    #[test]
    fn test_rows_restartable() {
        let mut table = small();
        table.set(1, 0, 2.0);

        let first: Vec<_> = table.rows().map(|r| r.values.to_vec()).collect();
        let second: Vec<_> = table.rows().map(|r| r.values.to_vec()).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(table.rows().len(), 2);

        let labels: Vec<_> = (&table).into_iter().map(|r| r.label.clone()).collect();
        assert_eq!(labels, vec![Label::Int(0), Label::Int(1)]);
    }

    #[test]
    fn test_serialize() {
        let table = small();
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["y_axis"]["labels"][1], 20);
        assert_eq!(json["cells"].as_array().unwrap().len(), 6);
    }
}
