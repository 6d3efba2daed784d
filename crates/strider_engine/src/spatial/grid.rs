//! Uniform-grid spatial index
//!
//! Divides the play area into fixed-size cells. Objects are registered
//! fresh every frame into every cell their bounds overlap, and queries
//! gather candidates from the overlapped cells before applying the exact
//! intersection test. For well-tuned cell sizes this turns the O(n²)
//! all-pairs scan into a near-constant-time lookup.
//!
//! Registration lists are frame-scoped: `clear` must run once per frame
//! before the first `register`.

use crate::physics::bounds::{Bounds, Penetration};
use crate::physics::layers::Layers;
use crate::world::ObjectKey;

/// Upper bound on pooled query-result buffers
const MAX_HIT_BUFFERS: usize = 8;

/// Configuration for grid behavior
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// Cell edge length; roughly 2-4x the typical object size works best
    pub cell_size: f32,

    /// Play-area width covered by the grid
    pub width: f32,

    /// Play-area height covered by the grid
    pub height: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: 100.0,
            width: 800.0,
            height: 450.0,
        }
    }
}

/// A single frame-scoped registration
#[derive(Debug, Clone, Copy)]
struct GridEntry {
    key: ObjectKey,
    bounds: Bounds,
    layers: Layers,
}

/// An object whose bounds intersect the queried box
#[derive(Debug, Clone, Copy)]
pub struct QueryHit {
    /// Key of the registered object
    pub key: ObjectKey,
    /// Penetration depth and minimum-translation axis against the query box
    pub penetration: Penetration,
}

/// Uniform-grid spatial index over the play area
///
/// Coordinates outside the grid extent are clamped to the nearest valid
/// cell, so off-screen objects still register and query correctly.
pub struct SpatialGrid {
    config: GridConfig,
    cols: usize,
    rows: usize,
    /// Per-cell lists of indices into `entries`
    cells: Vec<Vec<u32>>,
    /// All registrations made since the last `clear`
    entries: Vec<GridEntry>,
    /// Candidate de-duplication scratch, reused across queries
    scratch: Vec<u32>,
    /// Free list of result buffers lent out via `acquire_hits`
    hit_buffers: Vec<Vec<QueryHit>>,
}

impl SpatialGrid {
    /// Create a new grid covering the configured play area
    pub fn new(config: GridConfig) -> Self {
        let cols = ((config.width / config.cell_size).ceil() as usize).max(1);
        let rows = ((config.height / config.cell_size).ceil() as usize).max(1);

        Self {
            config,
            cols,
            rows,
            cells: vec![Vec::new(); cols * rows],
            entries: Vec::new(),
            scratch: Vec::new(),
            hit_buffers: Vec::new(),
        }
    }

    /// Number of columns in the grid
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows in the grid
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of registrations since the last `clear`
    pub fn registered_count(&self) -> usize {
        self.entries.len()
    }

    /// Empty every cell's registration list
    ///
    /// Must be called once per frame before any `register`. Capacity is
    /// retained so steady-state frames allocate nothing.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
        self.entries.clear();
    }

    /// Register an object into every cell its bounds overlap
    ///
    /// A box spanning a cell boundary lands in all spanned cells.
    pub fn register(&mut self, key: ObjectKey, bounds: Bounds, layers: Layers) {
        let index = self.entries.len() as u32;
        self.entries.push(GridEntry { key, bounds, layers });

        let (col_start, col_end) = self.col_span(&bounds);
        let (row_start, row_end) = self.row_span(&bounds);

        for row in row_start..=row_end {
            for col in col_start..=col_end {
                self.cells[row * self.cols + col].push(index);
            }
        }
    }

    /// Collect every registered object whose bounds intersect `bounds`
    ///
    /// Candidates are gathered from the overlapped cells, de-duplicated,
    /// filtered by `mask`, then confirmed with the exact AABB test. Hits
    /// are appended to `hits` together with their penetration data.
    pub fn query(&mut self, bounds: &Bounds, mask: Layers, hits: &mut Vec<QueryHit>) {
        self.scratch.clear();

        let (col_start, col_end) = self.col_span(bounds);
        let (row_start, row_end) = self.row_span(bounds);

        for row in row_start..=row_end {
            for col in col_start..=col_end {
                self.scratch.extend_from_slice(&self.cells[row * self.cols + col]);
            }
        }

        // A box spanning multiple cells shows up once per cell
        self.scratch.sort_unstable();
        self.scratch.dedup();

        for &index in &self.scratch {
            let entry = &self.entries[index as usize];
            if !entry.layers.matches(mask) {
                continue;
            }
            if let Some(penetration) = bounds.penetration(&entry.bounds) {
                hits.push(QueryHit { key: entry.key, penetration });
            }
        }
    }

    /// Borrow a result buffer from the grid's pool
    ///
    /// Return it with [`release_hits`](Self::release_hits) after use; this
    /// is a borrow, not a transfer of ownership.
    pub fn acquire_hits(&mut self) -> Vec<QueryHit> {
        self.hit_buffers.pop().unwrap_or_default()
    }

    /// Return a borrowed result buffer to the pool
    pub fn release_hits(&mut self, mut hits: Vec<QueryHit>) {
        hits.clear();
        if self.hit_buffers.len() < MAX_HIT_BUFFERS {
            self.hit_buffers.push(hits);
        }
    }

    /// Column span overlapped by a box, clamped to the grid
    fn col_span(&self, bounds: &Bounds) -> (usize, usize) {
        Self::axis_span(bounds.x, bounds.right(), self.config.cell_size, self.cols)
    }

    /// Row span overlapped by a box, clamped to the grid
    fn row_span(&self, bounds: &Bounds) -> (usize, usize) {
        Self::axis_span(bounds.y, bounds.bottom(), self.config.cell_size, self.rows)
    }

    /// Inclusive cell range covered by the half-open interval [lo, hi)
    fn axis_span(lo: f32, hi: f32, cell_size: f32, count: usize) -> (usize, usize) {
        let clamp = |cell: i64| -> usize { cell.clamp(0, count as i64 - 1) as usize };
        let start = clamp((lo / cell_size).floor() as i64);
        // The far edge is exclusive: a box ending exactly on a cell
        // boundary does not occupy the next cell
        let end = clamp((hi / cell_size).ceil() as i64 - 1);
        (start, end.max(start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn keys(n: usize) -> Vec<ObjectKey> {
        let mut map: SlotMap<ObjectKey, ()> = SlotMap::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    fn grid(cell_size: f32) -> SpatialGrid {
        SpatialGrid::new(GridConfig {
            cell_size,
            width: 800.0,
            height: 600.0,
        })
    }

    #[test]
    fn test_register_and_query_same_cell() {
        let mut grid = grid(100.0);
        let k = keys(1);

        grid.register(k[0], Bounds::new(10.0, 10.0, 20.0, 20.0), Layers::HAZARD);

        let mut hits = Vec::new();
        grid.query(&Bounds::new(0.0, 0.0, 50.0, 50.0), Layers::ALL, &mut hits);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].key, k[0]);
    }

    #[test]
    fn test_distant_cells_are_not_scanned() {
        // Entity box and object box share no cell at cell size 100
        let mut grid = grid(100.0);
        let k = keys(1);

        grid.register(k[0], Bounds::new(200.0, 200.0, 20.0, 20.0), Layers::HAZARD);

        let mut hits = Vec::new();
        grid.query(&Bounds::new(50.0, 50.0, 40.0, 60.0), Layers::ALL, &mut hits);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_boundary_spanning_box_registers_in_all_cells() {
        let mut grid = grid(100.0);
        let k = keys(1);

        // Spans cells (0,0), (1,0), (0,1), (1,1)
        grid.register(k[0], Bounds::new(90.0, 90.0, 20.0, 20.0), Layers::HAZARD);

        for probe in [
            Bounds::new(80.0, 80.0, 15.0, 15.0),
            Bounds::new(101.0, 80.0, 15.0, 15.0),
            Bounds::new(80.0, 101.0, 15.0, 15.0),
            Bounds::new(101.0, 101.0, 15.0, 15.0),
        ] {
            let mut hits = Vec::new();
            grid.query(&probe, Layers::ALL, &mut hits);
            assert_eq!(hits.len(), 1, "probe {probe:?} missed the spanning box");
        }
    }

    #[test]
    fn test_duplicate_candidates_deduplicated() {
        let mut grid = grid(100.0);
        let k = keys(1);

        grid.register(k[0], Bounds::new(50.0, 50.0, 200.0, 200.0), Layers::HAZARD);

        // Query box also spans several cells; the object must appear once
        let mut hits = Vec::new();
        grid.query(&Bounds::new(60.0, 60.0, 180.0, 180.0), Layers::ALL, &mut hits);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_out_of_range_coordinates_clamp() {
        let mut grid = grid(100.0);
        let k = keys(2);

        grid.register(k[0], Bounds::new(-50.0, -50.0, 30.0, 30.0), Layers::HAZARD);
        grid.register(k[1], Bounds::new(5000.0, 5000.0, 30.0, 30.0), Layers::HAZARD);

        let mut hits = Vec::new();
        grid.query(&Bounds::new(-45.0, -45.0, 20.0, 20.0), Layers::ALL, &mut hits);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].key, k[0]);

        hits.clear();
        grid.query(&Bounds::new(4990.0, 4990.0, 40.0, 40.0), Layers::ALL, &mut hits);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].key, k[1]);
    }

    #[test]
    fn test_layer_mask_filters_results() {
        let mut grid = grid(100.0);
        let k = keys(2);

        grid.register(k[0], Bounds::new(10.0, 10.0, 20.0, 20.0), Layers::HAZARD);
        grid.register(k[1], Bounds::new(15.0, 15.0, 20.0, 20.0), Layers::PICKUP);

        let mut hits = Vec::new();
        grid.query(&Bounds::new(0.0, 0.0, 60.0, 60.0), Layers::PICKUP, &mut hits);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].key, k[1]);
    }

    #[test]
    fn test_clear_empties_registrations() {
        let mut grid = grid(100.0);
        let k = keys(1);

        grid.register(k[0], Bounds::new(10.0, 10.0, 20.0, 20.0), Layers::HAZARD);
        grid.clear();
        assert_eq!(grid.registered_count(), 0);

        let mut hits = Vec::new();
        grid.query(&Bounds::new(0.0, 0.0, 100.0, 100.0), Layers::ALL, &mut hits);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_matches_brute_force_scan() {
        // Deterministic pseudo-random placement, multiple cell sizes
        let mut rng_state: u64 = 0x2545_F491_4F6C_DD1D;
        let mut next = move || {
            rng_state ^= rng_state << 13;
            rng_state ^= rng_state >> 7;
            rng_state ^= rng_state << 17;
            rng_state
        };

        for cell_size in [25.0, 64.0, 100.0, 300.0] {
            let mut grid = SpatialGrid::new(GridConfig {
                cell_size,
                width: 800.0,
                height: 600.0,
            });

            let k = keys(60);
            let mut placed = Vec::new();
            for key in &k {
                let x = (next() % 900) as f32 - 50.0;
                let y = (next() % 700) as f32 - 50.0;
                let w = (next() % 80) as f32 + 5.0;
                let h = (next() % 80) as f32 + 5.0;
                let bounds = Bounds::new(x, y, w, h);
                grid.register(*key, bounds, Layers::HAZARD);
                placed.push((*key, bounds));
            }

            let probe = Bounds::new(300.0, 200.0, 120.0, 90.0);

            let mut expected: Vec<ObjectKey> = placed
                .iter()
                .filter(|(_, b)| probe.intersects(b))
                .map(|(key, _)| *key)
                .collect();
            expected.sort_unstable();

            let mut hits = Vec::new();
            grid.query(&probe, Layers::ALL, &mut hits);
            let mut actual: Vec<ObjectKey> = hits.iter().map(|h| h.key).collect();
            actual.sort_unstable();

            assert_eq!(actual, expected, "mismatch at cell size {cell_size}");
        }
    }

    #[test]
    fn test_hit_buffer_pool_round_trip() {
        let mut grid = grid(100.0);
        let k = keys(1);
        grid.register(k[0], Bounds::new(10.0, 10.0, 20.0, 20.0), Layers::HAZARD);

        let mut hits = grid.acquire_hits();
        grid.query(&Bounds::new(0.0, 0.0, 50.0, 50.0), Layers::ALL, &mut hits);
        assert_eq!(hits.len(), 1);
        grid.release_hits(hits);

        // The pooled buffer comes back empty
        let reused = grid.acquire_hits();
        assert!(reused.is_empty());
        grid.release_hits(reused);
    }

    #[test]
    fn test_query_reports_penetration() {
        let mut grid = grid(100.0);
        let k = keys(1);

        grid.register(k[0], Bounds::new(40.0, 48.0, 20.0, 20.0), Layers::HAZARD);

        let mut hits = Vec::new();
        grid.query(&Bounds::new(30.0, 30.0, 20.0, 20.0), Layers::ALL, &mut hits);
        assert_eq!(hits.len(), 1);
        assert!(hits[0].penetration.depth > 0.0);
    }
}
