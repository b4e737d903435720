//! `AgentGridIndex` — the sorted `(cell, agent)` pair index.
//!
//! This is the core neighbour-search structure.  A rebuild produces:
//!
//! 1. a pair list, one entry per (cell, agent) assignment, sorted by cell id
//!    with ties broken by agent index, and
//! 2. a dense per-cell `[start, count)` table over that list, with untouched
//!    cells marked by the [`CellRange::EMPTY`] sentinel.
//!
//! Zero-radius agents land in exactly one cell.  Agents with a positive body
//! radius are stamped into every cell their bounding box overlaps, up to
//! [`MAX_CELLS_PER_AGENT`]; cells beyond the cap are silently dropped in the
//! fixed x→y→z enumeration order.  That truncation is a bounded-cost
//! approximation, not an error — a large body still occupies its nearest
//! cells and stays visible to the scan.

use glam::Vec3;
use shoal_core::{Aabb, AgentId, CellId};

use crate::GridSpec;

/// Per-agent cap on stamped cells for positive-body-radius agents.
pub const MAX_CELLS_PER_AGENT: usize = 8;

/// A contiguous `[start, start+count)` span of the sorted pair list.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellRange {
    pub start: u32,
    pub count: u32,
}

impl CellRange {
    /// Sentinel for a cell no agent touched this step.
    pub const EMPTY: CellRange = CellRange { start: u32::MAX, count: 0 };

    #[inline]
    pub fn is_empty(self) -> bool {
        self.count == 0
    }
}

/// Sorted `(cell, agent)` pair list plus the dense per-cell range table.
///
/// Scratch buffers persist across rebuilds so a steady-state step allocates
/// nothing.
#[derive(Default)]
pub struct AgentGridIndex {
    pairs: Vec<(CellId, AgentId)>,
    ranges: Vec<CellRange>,
    // Rebuild scratch: per-agent pair counts, then their exclusive prefix sum.
    offsets: Vec<u32>,
}

impl AgentGridIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the index from scratch.
    ///
    /// `body_radius(i)` returns agent `i`'s body radius; `0.0` selects the
    /// single-cell fast path.  An empty grid or empty agent set clears the
    /// index and returns immediately.
    pub fn rebuild<F>(&mut self, spec: &GridSpec, positions: &[Vec3], body_radius: F)
    where
        F: Fn(usize) -> f32,
    {
        let cell_count = spec.cell_count();
        self.pairs.clear();
        self.ranges.clear();
        self.ranges.resize(cell_count, CellRange::EMPTY);
        if cell_count == 0 || positions.is_empty() {
            return;
        }

        // ── Pass 1: count pairs per agent, exclusive prefix sum ───────────
        self.offsets.clear();
        self.offsets.resize(positions.len() + 1, 0);
        for (i, &pos) in positions.iter().enumerate() {
            let mut n = 0u32;
            for_each_agent_cell(spec, pos, body_radius(i), |_| n += 1);
            self.offsets[i + 1] = n;
        }
        for i in 1..self.offsets.len() {
            self.offsets[i] += self.offsets[i - 1];
        }
        let total = *self.offsets.last().unwrap() as usize;

        // ── Pass 2: fill, then sort by (cell, agent) ──────────────────────
        self.pairs
            .resize(total, (CellId::INVALID, AgentId::INVALID));
        for (i, &pos) in positions.iter().enumerate() {
            let mut cursor = self.offsets[i] as usize;
            for_each_agent_cell(spec, pos, body_radius(i), |cell| {
                self.pairs[cursor] = (cell, AgentId(i as u32));
                cursor += 1;
            });
        }
        self.pairs.sort_unstable();

        // ── Pass 3: contiguous runs → per-cell ranges ─────────────────────
        let mut run_start = 0usize;
        while run_start < self.pairs.len() {
            let cell = self.pairs[run_start].0;
            let mut run_end = run_start + 1;
            while run_end < self.pairs.len() && self.pairs[run_end].0 == cell {
                run_end += 1;
            }
            self.ranges[cell.index()] = CellRange {
                start: run_start as u32,
                count: (run_end - run_start) as u32,
            };
            run_start = run_end;
        }
    }

    /// Range of the sorted pair list covering `cell`.
    #[inline]
    pub fn range(&self, cell: CellId) -> CellRange {
        self.ranges
            .get(cell.index())
            .copied()
            .unwrap_or(CellRange::EMPTY)
    }

    /// The `(cell, agent)` pairs of one cell, in ascending agent order.
    #[inline]
    pub fn cell_pairs(&self, cell: CellId) -> &[(CellId, AgentId)] {
        let r = self.range(cell);
        if r.is_empty() {
            &[]
        } else {
            &self.pairs[r.start as usize..(r.start + r.count) as usize]
        }
    }

    /// The full sorted pair list.
    #[inline]
    pub fn pairs(&self) -> &[(CellId, AgentId)] {
        &self.pairs
    }

    /// Number of cells at least one agent touches.
    pub fn occupied_cell_count(&self) -> usize {
        self.ranges.iter().filter(|r| !r.is_empty()).count()
    }
}

/// Visit every cell assigned to an agent at `pos` with the given body radius.
///
/// Zero radius → exactly the containing cell.  Positive radius → every cell
/// overlapped by the body's bounding box, in x→y→z order, truncated at
/// [`MAX_CELLS_PER_AGENT`].
fn for_each_agent_cell(spec: &GridSpec, pos: Vec3, radius: f32, mut f: impl FnMut(CellId)) {
    if radius <= 0.0 {
        f(spec.cell_id_of(pos));
        return;
    }
    let (min, max) = spec.coord_range(&Aabb::from_sphere(pos, radius));
    let mut emitted = 0usize;
    'outer: for z in min.z..=max.z {
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                if emitted >= MAX_CELLS_PER_AGENT {
                    break 'outer;
                }
                f(spec.cell_id(glam::IVec3::new(x, y, z)));
                emitted += 1;
            }
        }
    }
}
