//! Unit tests for the uniform-grid indexes.

use glam::{IVec3, UVec3, Vec3};
use shoal_core::{Aabb, AgentId, CellId};

use crate::{
    AgentGridIndex, AttractorGridIndex, AttractorStamp, CellRange, GridSpec,
    MAX_CELLS_PER_AGENT, ObstacleGridIndex,
};

fn spec_4x4x4() -> GridSpec {
    GridSpec::new(Vec3::ZERO, 1.0, UVec3::splat(4)).unwrap()
}

fn zero_radius(_: usize) -> f32 {
    0.0
}

#[cfg(test)]
mod grid {
    use super::*;

    #[test]
    fn rejects_bad_cell_size() {
        assert!(GridSpec::new(Vec3::ZERO, 0.0, UVec3::ONE).is_err());
        assert!(GridSpec::new(Vec3::ZERO, -1.0, UVec3::ONE).is_err());
        assert!(GridSpec::new(Vec3::ZERO, f32::NAN, UVec3::ONE).is_err());
    }

    #[test]
    fn cell_id_linearization() {
        let spec = spec_4x4x4();
        assert_eq!(spec.cell_id(IVec3::new(0, 0, 0)), CellId(0));
        assert_eq!(spec.cell_id(IVec3::new(3, 0, 0)), CellId(3));
        assert_eq!(spec.cell_id(IVec3::new(0, 1, 0)), CellId(4));
        assert_eq!(spec.cell_id(IVec3::new(0, 0, 1)), CellId(16));
        assert_eq!(spec.cell_id(IVec3::new(3, 3, 3)), CellId(63));
    }

    #[test]
    fn coords_roundtrip() {
        let spec = spec_4x4x4();
        for id in 0..64 {
            let cell = CellId(id);
            assert_eq!(spec.cell_id(spec.coords_of(cell)), cell);
        }
    }

    #[test]
    fn out_of_range_positions_clamp_to_border() {
        let spec = spec_4x4x4();
        assert_eq!(spec.cell_coords(Vec3::splat(-100.0)), IVec3::ZERO);
        assert_eq!(spec.cell_coords(Vec3::splat(100.0)), IVec3::splat(3));
    }

    #[test]
    fn cell_center_is_inside_cell() {
        let spec = spec_4x4x4();
        let center = spec.cell_center(CellId(21)); // (1, 1, 1)
        assert_eq!(center, Vec3::splat(1.5));
        assert_eq!(spec.cell_id_of(center), CellId(21));
    }
}

#[cfg(test)]
mod agent_index {
    use super::*;

    /// Every agent's assigned cell contains its index exactly once, and the
    /// ranges partition the pair list with no gaps or overlaps.
    #[test]
    fn ranges_partition_pair_list() {
        let spec = spec_4x4x4();
        let positions: Vec<Vec3> = (0..50)
            .map(|i| Vec3::new((i % 4) as f32 + 0.5, ((i / 4) % 4) as f32 + 0.5, 0.5))
            .collect();
        let mut index = AgentGridIndex::new();
        index.rebuild(&spec, &positions, zero_radius);

        // Pair list sorted, one pair per zero-radius agent.
        assert_eq!(index.pairs().len(), positions.len());
        assert!(index.pairs().windows(2).all(|w| w[0] < w[1]));

        // Ranges cover the pair list exactly once, in order.
        let mut covered = 0u32;
        for cell in 0..spec.cell_count() as u32 {
            let r = index.range(CellId(cell));
            if r.is_empty() {
                assert_eq!(r, CellRange::EMPTY);
                continue;
            }
            assert_eq!(r.start, covered, "gap or overlap before cell {cell}");
            covered += r.count;
            for &(c, _) in index.cell_pairs(CellId(cell)) {
                assert_eq!(c, CellId(cell));
            }
        }
        assert_eq!(covered as usize, index.pairs().len());

        // Each agent appears in exactly the cell its position maps to.
        for (i, &pos) in positions.iter().enumerate() {
            let cell = spec.cell_id_of(pos);
            let found = index
                .cell_pairs(cell)
                .iter()
                .filter(|&&(_, a)| a == AgentId(i as u32))
                .count();
            assert_eq!(found, 1, "agent {i} not indexed exactly once");
        }
    }

    #[test]
    fn body_radius_stamps_multiple_cells() {
        let spec = spec_4x4x4();
        // Body overlapping a 2x2x2 block of cells around (1,1,1).
        let positions = vec![Vec3::splat(1.0)];
        let mut index = AgentGridIndex::new();
        index.rebuild(&spec, &positions, |_| 0.5);
        assert_eq!(index.pairs().len(), 8);
        // All eight pairs reference agent 0, in distinct cells.
        let mut cells: Vec<CellId> = index.pairs().iter().map(|&(c, _)| c).collect();
        cells.dedup();
        assert_eq!(cells.len(), 8);
    }

    #[test]
    fn cell_cap_truncates_large_bodies() {
        let spec = spec_4x4x4();
        // Radius covering the whole grid would want 64 cells; cap kicks in.
        let positions = vec![Vec3::splat(2.0)];
        let mut index = AgentGridIndex::new();
        index.rebuild(&spec, &positions, |_| 10.0);
        assert_eq!(index.pairs().len(), MAX_CELLS_PER_AGENT);
    }

    #[test]
    fn rebuild_is_idempotent_and_reusable() {
        let spec = spec_4x4x4();
        let positions = vec![Vec3::splat(0.5), Vec3::splat(3.5)];
        let mut index = AgentGridIndex::new();
        index.rebuild(&spec, &positions, zero_radius);
        let first: Vec<_> = index.pairs().to_vec();
        index.rebuild(&spec, &positions, zero_radius);
        assert_eq!(index.pairs(), &first[..]);
    }

    #[test]
    fn empty_grid_short_circuits() {
        let spec = GridSpec::new(Vec3::ZERO, 1.0, UVec3::ZERO).unwrap();
        let mut index = AgentGridIndex::new();
        index.rebuild(&spec, &[Vec3::ZERO; 10], zero_radius);
        assert!(index.pairs().is_empty());
        assert_eq!(index.range(CellId(0)), CellRange::EMPTY);
    }
}

#[cfg(test)]
mod obstacle_index {
    use super::*;

    #[test]
    fn csr_multi_valued_per_cell() {
        let spec = spec_4x4x4();
        // Two obstacles overlapping the same corner cell.
        let boxes = vec![
            Aabb::from_sphere(Vec3::splat(0.5), 0.3),
            Aabb::from_sphere(Vec3::splat(0.6), 0.3),
            Aabb::from_sphere(Vec3::splat(3.5), 0.3),
        ];
        let mut index = ObstacleGridIndex::new();
        index.rebuild(&spec, &boxes);

        let corner: Vec<u32> = index.obstacles_in(spec.cell_id_of(Vec3::splat(0.5))).collect();
        assert_eq!(corner, vec![0, 1]);
        let far: Vec<u32> = index.obstacles_in(spec.cell_id_of(Vec3::splat(3.5))).collect();
        assert_eq!(far, vec![2]);
        let empty: Vec<u32> = index.obstacles_in(spec.cell_id_of(Vec3::new(2.5, 0.5, 0.5))).collect();
        assert!(empty.is_empty());
    }
}

#[cfg(test)]
mod attractor_index {
    use super::*;

    #[test]
    fn highest_priority_wins_per_class() {
        let spec = spec_4x4x4();
        let cell = spec.cell_id_of(Vec3::splat(0.5));
        let stamps = vec![
            AttractorStamp { aabb: Aabb::from_sphere(Vec3::splat(0.5), 0.2), priority: 1, group: false },
            AttractorStamp { aabb: Aabb::from_sphere(Vec3::splat(0.5), 0.2), priority: 5, group: false },
            AttractorStamp { aabb: Aabb::from_sphere(Vec3::splat(0.5), 0.2), priority: 3, group: true },
        ];
        let mut index = AttractorGridIndex::new();
        index.rebuild(&spec, &stamps);

        assert_eq!(index.individual_winner(cell), Some(1));
        assert_eq!(index.group_winner(cell), Some(2));
        assert_eq!(index.individual_winner(spec.cell_id_of(Vec3::splat(3.5))), None);
    }

    #[test]
    fn equal_priority_last_stamp_wins() {
        // Tie behaviour is documented as unspecified-but-deterministic; this
        // pins the current last-write-wins scan order.
        let spec = spec_4x4x4();
        let cell = spec.cell_id_of(Vec3::splat(0.5));
        let stamps = vec![
            AttractorStamp { aabb: Aabb::from_sphere(Vec3::splat(0.5), 0.2), priority: 2, group: false },
            AttractorStamp { aabb: Aabb::from_sphere(Vec3::splat(0.5), 0.2), priority: 2, group: false },
        ];
        let mut index = AttractorGridIndex::new();
        index.rebuild(&spec, &stamps);
        assert_eq!(index.individual_winner(cell), Some(1));
    }
}
