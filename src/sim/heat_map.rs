//! Dense per-tile scalar field
//!
//! Backing store for distance fields. Cells hold either [`UNREACHABLE`] or a
//! non-negative integer-valued cost in tile steps.

use glam::IVec2;

/// Sentinel cost for cells no wavefront has reached
pub const UNREACHABLE: f32 = f32::MAX;

/// Fixed-size 2D cost grid stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct HeatMap {
    width: i32,
    height: i32,
    cells: Vec<f32>,
}

impl HeatMap {
    /// Create a map with every cell at [`UNREACHABLE`]
    pub fn new(width: i32, height: i32) -> Self {
        let count = (width.max(0) as usize) * (height.max(0) as usize);
        Self {
            width,
            height,
            cells: vec![UNREACHABLE; count],
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether a coordinate lies inside the map
    #[inline]
    pub fn contains(&self, coord: IVec2) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < self.width && coord.y < self.height
    }

    /// Linear index of a coordinate. Callers bounds-check first.
    #[inline]
    pub fn index_of(&self, coord: IVec2) -> usize {
        debug_assert!(self.contains(coord), "heat map access out of range: {coord}");
        (coord.y * self.width + coord.x) as usize
    }

    /// Coordinate of a linear index
    #[inline]
    pub fn coord_of(&self, index: usize) -> IVec2 {
        let i = index as i32;
        IVec2::new(i % self.width, i / self.width)
    }

    #[inline]
    pub fn get(&self, coord: IVec2) -> f32 {
        self.cells[self.index_of(coord)]
    }

    #[inline]
    pub fn set(&mut self, coord: IVec2, value: f32) {
        let index = self.index_of(coord);
        self.cells[index] = value;
    }

    #[inline]
    pub fn get_index(&self, index: usize) -> f32 {
        self.cells[index]
    }

    #[inline]
    pub fn set_index(&mut self, index: usize, value: f32) {
        self.cells[index] = value;
    }

    /// Set every cell to `value`
    pub fn fill(&mut self, value: f32) {
        self.cells.fill(value);
    }

    /// True when the cell holds a finite cost
    #[inline]
    pub fn is_reachable(&self, coord: IVec2) -> bool {
        self.contains(coord) && self.get(coord) != UNREACHABLE
    }

    pub fn cells(&self) -> &[f32] {
        &self.cells
    }
}
