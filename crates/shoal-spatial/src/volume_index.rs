//! Per-cell obstacle and attractor lookups, built on the same lattice as the
//! agent index.
//!
//! Obstacles form a multi-valued relation (a cell may be covered by several
//! obstacles), stored CSR-style with the same pair-sort machinery as
//! [`AgentGridIndex`][crate::AgentGridIndex].
//!
//! Attractors resolve to at most one winner per cell per usage class
//! (individual / group), chosen by highest cell priority.  On an exact
//! priority tie the later stamp in scan order wins; the winner is otherwise
//! unspecified and callers must not rely on which one it is.

use shoal_core::{Aabb, CellId};

use crate::agent_index::CellRange;
use crate::GridSpec;

// ── ObstacleGridIndex ─────────────────────────────────────────────────────────

/// Sorted `(cell, obstacle)` pair list plus the per-cell range table.
#[derive(Default)]
pub struct ObstacleGridIndex {
    pairs: Vec<(CellId, u32)>,
    ranges: Vec<CellRange>,
}

impl ObstacleGridIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp each obstacle's broad-phase box into every overlapping cell.
    pub fn rebuild(&mut self, spec: &GridSpec, broad_boxes: &[Aabb]) {
        let cell_count = spec.cell_count();
        self.pairs.clear();
        self.ranges.clear();
        self.ranges.resize(cell_count, CellRange::EMPTY);
        if cell_count == 0 || broad_boxes.is_empty() {
            return;
        }

        for (i, aabb) in broad_boxes.iter().enumerate() {
            let (min, max) = spec.coord_range(aabb);
            spec.for_each_cell_in(min, max, |cell| {
                self.pairs.push((cell, i as u32));
            });
        }
        self.pairs.sort_unstable();

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

    /// Obstacle indices covering `cell`, in ascending order.
    pub fn obstacles_in(&self, cell: CellId) -> impl Iterator<Item = u32> + '_ {
        let r = self
            .ranges
            .get(cell.index())
            .copied()
            .unwrap_or(CellRange::EMPTY);
        let span = if r.is_empty() {
            &[]
        } else {
            &self.pairs[r.start as usize..(r.start + r.count) as usize]
        };
        span.iter().map(|&(_, i)| i)
    }
}

// ── AttractorGridIndex ────────────────────────────────────────────────────────

/// Broad-phase input for one attractor.
#[derive(Copy, Clone, Debug)]
pub struct AttractorStamp {
    /// Bounding box of the attractor volume.
    pub aabb: Aabb,
    /// Overlap tie-breaker: the highest priority claims the cell.
    pub priority: i32,
    /// `true` → group-usage table, `false` → individual-usage table.
    pub group: bool,
}

/// Per-cell winning attractor index, kept independently per usage class.
#[derive(Default)]
pub struct AttractorGridIndex {
    individual: Vec<u32>,
    group: Vec<u32>,
    // Best priority seen so far per cell, per class (rebuild scratch).
    individual_priority: Vec<i32>,
    group_priority: Vec<i32>,
}

/// Sentinel for "no attractor claims this cell".
const NO_WINNER: u32 = u32::MAX;

impl AttractorGridIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-scan all stamps and recompute both winner tables.
    pub fn rebuild(&mut self, spec: &GridSpec, stamps: &[AttractorStamp]) {
        let cell_count = spec.cell_count();
        for table in [&mut self.individual, &mut self.group] {
            table.clear();
            table.resize(cell_count, NO_WINNER);
        }
        for table in [&mut self.individual_priority, &mut self.group_priority] {
            table.clear();
            table.resize(cell_count, i32::MIN);
        }
        if cell_count == 0 {
            return;
        }

        for (i, stamp) in stamps.iter().enumerate() {
            let (winners, priorities) = if stamp.group {
                (&mut self.group, &mut self.group_priority)
            } else {
                (&mut self.individual, &mut self.individual_priority)
            };
            let (min, max) = spec.coord_range(&stamp.aabb);
            spec.for_each_cell_in(min, max, |cell| {
                // `>=` gives last-write-wins on exact priority ties.
                if stamp.priority >= priorities[cell.index()] {
                    priorities[cell.index()] = stamp.priority;
                    winners[cell.index()] = i as u32;
                }
            });
        }
    }

    /// Winning individual-usage attractor for `cell`, if any.
    #[inline]
    pub fn individual_winner(&self, cell: CellId) -> Option<u32> {
        match self.individual.get(cell.index()) {
            Some(&w) if w != NO_WINNER => Some(w),
            _ => None,
        }
    }

    /// Winning group-usage attractor for `cell`, if any.
    #[inline]
    pub fn group_winner(&self, cell: CellId) -> Option<u32> {
        match self.group.get(cell.index()) {
            Some(&w) if w != NO_WINNER => Some(w),
            _ => None,
        }
    }
}
