// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Continuous-value grid produced by interpolation.

use geo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::StageError;

/// Row-major grid of cell values anchored at its lower-left corner.
///
/// Row 0 is the southernmost row. `None` marks cells outside the mask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpolatedSurface {
    pub min_x: f64,
    pub min_y: f64,
    pub cell_size: f64,
    pub cols: usize,
    pub rows: usize,
    pub values: Vec<Option<f64>>,
}

impl InterpolatedSurface {
    /// Empty (all no-data) grid.
    pub fn empty(min_x: f64, min_y: f64, cell_size: f64, cols: usize, rows: usize) -> Self {
        Self {
            min_x,
            min_y,
            cell_size,
            cols,
            rows,
            values: vec![None; cols * rows],
        }
    }

    pub fn cell_center(&self, col: usize, row: usize) -> Point<f64> {
        Point::new(
            self.min_x + (col as f64 + 0.5) * self.cell_size,
            self.min_y + (row as f64 + 0.5) * self.cell_size,
        )
    }

    pub fn value(&self, col: usize, row: usize) -> Option<f64> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.values[row * self.cols + col]
    }

    pub fn set(&mut self, col: usize, row: usize, value: Option<f64>) {
        if col < self.cols && row < self.rows {
            self.values[row * self.cols + col] = value;
        }
    }

    /// Column/row window whose cell centers can fall inside `rect`.
    pub fn window(&self, rect: &Rect<f64>) -> Option<(std::ops::Range<usize>, std::ops::Range<usize>)> {
        if self.cols == 0 || self.rows == 0 {
            return None;
        }
        let to_index = |offset: f64, limit: usize| -> usize {
            if offset <= 0.0 {
                0
            } else {
                (offset.floor() as usize).min(limit)
            }
        };
        let col_start = to_index((rect.min().x - self.min_x) / self.cell_size - 0.5, self.cols);
        let col_end = to_index((rect.max().x - self.min_x) / self.cell_size + 0.5, self.cols - 1) + 1;
        let row_start = to_index((rect.min().y - self.min_y) / self.cell_size - 0.5, self.rows);
        let row_end = to_index((rect.max().y - self.min_y) / self.cell_size + 0.5, self.rows - 1) + 1;
        if col_start >= col_end || row_start >= row_end {
            return None;
        }
        Some((col_start..col_end, row_start..row_end))
    }

    pub fn data_cell_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn save(&self, path: &Path) -> Result<(), StageError> {
        let encoded = serde_json::to_vec(self)?;
        fs::write(path, encoded)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, StageError> {
        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
