//! Fixed-cell uniform grid
//!
//! Maps 2D world space onto `cols × rows` buckets. Each bucket holds plain
//! item handles; the grid never looks at the entities behind them.
//!
//! An item is filed under the cell containing its bounds origin only, even
//! when its rectangle spills into neighbouring cells. Queries compensate by
//! scanning the 3×3 neighbourhood around a cell.

use crate::foundation::math::{Rect, Vec2};

/// Column/row coordinate of a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCoord {
    /// Column index
    pub col: usize,

    /// Row index
    pub row: usize,
}

/// Uniform spatial grid holding one item type
#[derive(Debug, Clone)]
pub struct SpatialGrid<T> {
    cell_size: f32,
    cols: usize,
    rows: usize,
    cells: Vec<Vec<T>>,
    len: usize,
}

impl<T: Copy> SpatialGrid<T> {
    /// Create a grid covering `width × height` with square cells
    ///
    /// `cols = ceil(width / cell_size)` and `rows = ceil(height / cell_size)`,
    /// never less than one so that clamping always has a target cell.
    ///
    /// # Panics
    ///
    /// Panics if `cell_size` is not strictly positive.
    pub fn new(width: f32, height: f32, cell_size: f32) -> Self {
        assert!(cell_size > 0.0, "grid cell size must be positive, got {cell_size}");

        let cols = ((width / cell_size).ceil() as usize).max(1);
        let rows = ((height / cell_size).ceil() as usize).max(1);

        Self {
            cell_size,
            cols,
            rows,
            cells: vec![Vec::new(); cols * rows],
            len: 0,
        }
    }

    /// Empty every cell, keeping their allocations
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
        self.len = 0;
    }

    /// File `item` under the cell containing `bounds.origin`
    pub fn insert(&mut self, item: T, bounds: &Rect) -> CellCoord {
        let coord = self.cell_of(bounds.origin());
        let index = self.index(coord);
        self.cells[index].push(item);
        self.len += 1;
        coord
    }

    /// Cell containing `point`, clamped into the grid
    ///
    /// Points outside the world map to the nearest boundary cell.
    pub fn cell_of(&self, point: Vec2) -> CellCoord {
        CellCoord {
            col: Self::clamp_axis(point.x, self.cell_size, self.cols),
            row: Self::clamp_axis(point.y, self.cell_size, self.rows),
        }
    }

    fn clamp_axis(value: f32, cell_size: f32, count: usize) -> usize {
        let cell = (value / cell_size).floor();
        if cell.is_nan() || cell <= 0.0 {
            0
        } else {
            (cell as usize).min(count - 1)
        }
    }

    /// Items in the cell at `(col, row)`; empty when out of range
    pub fn cell_at(&self, col: isize, row: isize) -> &[T] {
        if col < 0 || row < 0 {
            return &[];
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.cols || row >= self.rows {
            return &[];
        }
        &self.cells[self.index(CellCoord { col, row })]
    }

    /// Iterate the non-empty cells in column-major scan order
    pub fn occupied_cells(&self) -> impl Iterator<Item = (CellCoord, &[T])> + '_ {
        (0..self.cols).flat_map(move |col| {
            (0..self.rows).filter_map(move |row| {
                let coord = CellCoord { col, row };
                let cell = &self.cells[self.index(coord)];
                (!cell.is_empty()).then_some((coord, cell.as_slice()))
            })
        })
    }

    /// Items in the 3×3 block centred on `center`, clipped to the grid
    ///
    /// Neighbour cells are visited column-major (`dx` outer, `dy` inner).
    pub fn neighbourhood(&self, center: CellCoord) -> impl Iterator<Item = &[T]> + '_ {
        let (col, row) = (center.col as isize, center.row as isize);
        (-1..=1).flat_map(move |dx| (-1..=1).map(move |dy| self.cell_at(col + dx, row + dy)))
    }

    const fn index(&self, coord: CellCoord) -> usize {
        coord.row * self.cols + coord.col
    }

    /// Number of columns
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Edge length of a cell in world units
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Total items across all cells
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether every cell is empty
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}
