//! `GridSpec` — uniform 3-D lattice geometry and cell-id arithmetic.

use glam::{IVec3, UVec3, Vec3};
use shoal_core::{Aabb, CellId, ShoalError, ShoalResult};

/// Smallest usable cell edge; smaller authored values clamp up to this.
const MIN_CELL_SIZE: f32 = 1.0e-4;

/// Geometry of the uniform grid shared by every spatial index.
///
/// Cell ids are linearized as `x + y*res.x + z*res.x*res.y`.  Positions
/// outside the lattice clamp to the nearest border cell.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridSpec {
    /// World position of the lattice's minimum corner.
    pub origin: Vec3,
    /// Cell edge length (uniform in all axes).
    pub cell_size: f32,
    /// Cell counts per axis.  Any zero axis yields an empty (0-cell) grid,
    /// which short-circuits rebuilds and queries.
    pub resolution: UVec3,
}

impl GridSpec {
    /// Construct and validate.  Non-positive or non-finite `cell_size` is a
    /// configuration error; a zero resolution is allowed (empty grid).
    pub fn new(origin: Vec3, cell_size: f32, resolution: UVec3) -> ShoalResult<Self> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(ShoalError::Config(format!(
                "grid cell size must be positive and finite, got {cell_size}"
            )));
        }
        Ok(Self {
            origin,
            cell_size: cell_size.max(MIN_CELL_SIZE),
            resolution,
        })
    }

    /// Total number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.resolution.x as usize * self.resolution.y as usize * self.resolution.z as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }

    /// Integer cell coordinates of `pos`, clamped into the lattice.
    ///
    /// Callers must not invoke this on an empty grid (the clamp upper bound
    /// would underflow); every public entry point short-circuits first.
    #[inline]
    pub fn cell_coords(&self, pos: Vec3) -> IVec3 {
        let rel = (pos - self.origin) / self.cell_size;
        IVec3::new(
            (rel.x.floor() as i32).clamp(0, self.resolution.x as i32 - 1),
            (rel.y.floor() as i32).clamp(0, self.resolution.y as i32 - 1),
            (rel.z.floor() as i32).clamp(0, self.resolution.z as i32 - 1),
        )
    }

    /// Linearized id of in-range coordinates.
    #[inline]
    pub fn cell_id(&self, coords: IVec3) -> CellId {
        let res = self.resolution;
        CellId(
            coords.x as u32
                + coords.y as u32 * res.x
                + coords.z as u32 * res.x * res.y,
        )
    }

    /// Cell id of a world position (clamped).
    #[inline]
    pub fn cell_id_of(&self, pos: Vec3) -> CellId {
        self.cell_id(self.cell_coords(pos))
    }

    /// Inverse of [`cell_id`][Self::cell_id].
    #[inline]
    pub fn coords_of(&self, cell: CellId) -> IVec3 {
        let res = self.resolution;
        let plane = res.x * res.y;
        let z = cell.0 / plane;
        let rem = cell.0 % plane;
        IVec3::new((rem % res.x) as i32, (rem / res.x) as i32, z as i32)
    }

    /// World-space center of a cell — the noise field samples here.
    #[inline]
    pub fn cell_center(&self, cell: CellId) -> Vec3 {
        let c = self.coords_of(cell);
        self.origin + (c.as_vec3() + Vec3::splat(0.5)) * self.cell_size
    }

    /// Clamped min/max cell coordinates overlapped by `aabb`.
    #[inline]
    pub fn coord_range(&self, aabb: &Aabb) -> (IVec3, IVec3) {
        (self.cell_coords(aabb.min), self.cell_coords(aabb.max))
    }

    /// Visit the id of every cell in the (inclusive) coordinate box.
    pub fn for_each_cell_in(&self, min: IVec3, max: IVec3, mut f: impl FnMut(CellId)) {
        for z in min.z..=max.z {
            for y in min.y..=max.y {
                for x in min.x..=max.x {
                    f(self.cell_id(IVec3::new(x, y, z)));
                }
            }
        }
    }
}
