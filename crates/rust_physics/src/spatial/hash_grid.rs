//! Uniform spatial hash grid for broad-phase overlap queries
//!
//! Space is cut into cubic cells of `cell_size`. Each object is recorded in
//! every cell its bounding box touches, so a query only visits the cells
//! around the query box instead of every registered object.
//!
//! Cells are keyed by the raw 32-bit hash of their integer coordinate.
//! Two distinct cells may share a hash; that only adds candidates, which the
//! AABB re-check in [`SpatialHashGrid::potential_collisions`] filters out.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::error::PhysicsError;
use crate::foundation::math::{Aabb, Vec3};

/// Integer coordinate of a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCoord {
    /// Cell index along X
    pub x: i32,
    /// Cell index along Y
    pub y: i32,
    /// Cell index along Z
    pub z: i32,
}

impl CellCoord {
    /// Create a cell coordinate
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Bucket key of this cell
    pub fn hash(&self) -> u32 {
        let h = self.x.wrapping_mul(73_856_093)
            ^ self.y.wrapping_mul(19_349_663)
            ^ self.z.wrapping_mul(83_492_791);
        h as u32
    }
}

/// One bucket of the grid
#[derive(Debug, Clone)]
struct Cell<K> {
    ids: Vec<K>,
    dirty: bool,
}

impl<K> Default for Cell<K> {
    fn default() -> Self {
        Self { ids: Vec::new(), dirty: false }
    }
}

/// What the grid remembers about a registered object
#[derive(Debug, Clone)]
struct Membership {
    cells: Vec<u32>,
    bounds: Aabb,
}

/// Spatial hash grid keyed by object id
///
/// The grid does not own the objects; it only stores their ids and the last
/// bounds it was given for each.
#[derive(Debug, Clone)]
pub struct SpatialHashGrid<K> {
    cell_size: f32,
    inv_cell_size: f32,
    cells: HashMap<u32, Cell<K>>,
    members: HashMap<K, Membership>,
}

impl<K> SpatialHashGrid<K>
where
    K: Copy + Eq + Hash,
{
    /// Create an empty grid
    ///
    /// Fails when `cell_size` is not a finite positive number.
    pub fn new(cell_size: f32) -> Result<Self, PhysicsError> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(PhysicsError::InvalidCellSize(cell_size));
        }

        Ok(Self {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            cells: HashMap::new(),
            members: HashMap::new(),
        })
    }

    /// Edge length of a cell
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell containing `point`
    pub fn cell_coord(&self, point: &Vec3) -> CellCoord {
        // `as` saturates out-of-range floats and maps NaN to 0
        CellCoord::new(
            (point.x * self.inv_cell_size).floor() as i32,
            (point.y * self.inv_cell_size).floor() as i32,
            (point.z * self.inv_cell_size).floor() as i32,
        )
    }

    /// Inclusive cell range covered by `bounds`, grown by `margin` cells
    fn cell_range(&self, bounds: &Aabb, margin: i32) -> (CellCoord, CellCoord) {
        let min = self.cell_coord(&bounds.min);
        let max = self.cell_coord(&bounds.max);
        (
            CellCoord::new(
                min.x.saturating_sub(margin),
                min.y.saturating_sub(margin),
                min.z.saturating_sub(margin),
            ),
            CellCoord::new(
                max.x.saturating_add(margin),
                max.y.saturating_add(margin),
                max.z.saturating_add(margin),
            ),
        )
    }

    /// Register `id` in every cell overlapped by `bounds`
    ///
    /// An id that is already present is moved, as with [`Self::update`].
    pub fn add(&mut self, id: K, bounds: Aabb) {
        if self.members.contains_key(&id) {
            self.remove(id);
        }

        let (min, max) = self.cell_range(&bounds, 0);
        let mut occupied = Vec::new();

        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    let key = CellCoord::new(x, y, z).hash();
                    let cell = self.cells.entry(key).or_default();
                    if !cell.ids.contains(&id) {
                        cell.ids.push(id);
                    }
                    cell.dirty = true;
                    if !occupied.contains(&key) {
                        occupied.push(key);
                    }
                }
            }
        }

        self.members.insert(id, Membership { cells: occupied, bounds });
    }

    /// Move `id` to the cells covered by `bounds`
    ///
    /// Stale memberships are dropped before the new ones are recorded, so
    /// calling this repeatedly with the same bounds leaves the grid unchanged.
    pub fn update(&mut self, id: K, bounds: Aabb) {
        self.remove(id);
        self.add(id, bounds);
    }

    /// Forget `id`; returns whether it was registered
    pub fn remove(&mut self, id: K) -> bool {
        let Some(membership) = self.members.remove(&id) else {
            return false;
        };

        for key in membership.cells {
            if let Some(cell) = self.cells.get_mut(&key) {
                cell.ids.retain(|other| *other != id);
                cell.dirty = true;
                if cell.ids.is_empty() {
                    self.cells.remove(&key);
                }
            }
        }
        true
    }

    /// Append to `out` every other object whose bounds overlap `bounds`
    ///
    /// The search covers the cells of `bounds` plus a one-cell margin on each
    /// side. Each candidate is reported once per query, `id` itself is never
    /// reported, and candidates whose recorded bounds do not overlap `bounds`
    /// are rejected. Returns the number of ids appended.
    pub fn potential_collisions(&self, id: K, bounds: &Aabb, out: &mut Vec<K>) -> usize {
        let (min, max) = self.cell_range(bounds, 1);
        let mut seen = HashSet::new();
        let start = out.len();

        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    let Some(cell) = self.cells.get(&CellCoord::new(x, y, z).hash()) else {
                        continue;
                    };

                    for &candidate in &cell.ids {
                        if candidate == id || !seen.insert(candidate) {
                            continue;
                        }

                        let overlaps = self
                            .members
                            .get(&candidate)
                            .is_some_and(|member| member.bounds.intersects(bounds));
                        if overlaps {
                            out.push(candidate);
                        }
                    }
                }
            }
        }

        out.len() - start
    }

    /// Cell hashes currently recorded for `id`
    pub fn cells_of(&self, id: K) -> Option<&[u32]> {
        self.members.get(&id).map(|member| member.cells.as_slice())
    }

    /// Bounds last recorded for `id`
    pub fn bounds_of(&self, id: K) -> Option<&Aabb> {
        self.members.get(&id).map(|member| &member.bounds)
    }

    /// Whether `id` is registered
    pub fn contains(&self, id: K) -> bool {
        self.members.contains_key(&id)
    }

    /// Number of registered objects
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// `true` when no object is registered
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Hashes of cells touched since the last [`Self::clear_dirty`]
    pub fn dirty_cells(&self) -> impl Iterator<Item = u32> + '_ {
        self.cells
            .iter()
            .filter(|(_, cell)| cell.dirty)
            .map(|(key, _)| *key)
    }

    /// Reset every cell's dirty flag
    pub fn clear_dirty(&mut self) {
        for cell in self.cells.values_mut() {
            cell.dirty = false;
        }
    }

    /// Remove every object
    pub fn clear(&mut self) {
        self.cells.clear();
        self.members.clear();
    }
}
