//! Collection type aliases used throughout the crate.
//!
//! The quad arena, traversal sets and face buffers are named here so that the
//! concrete backing types can change in one place.

use rustc_hash::{FxBuildHasher, FxHashSet};
use smallvec::SmallVec;

#[cfg(not(feature = "dense-slotmap"))]
use slotmap::SlotMap;

#[cfg(feature = "dense-slotmap")]
use slotmap::DenseSlotMap;

use crate::geometry::point::Point;

/// Arena backend for quads.
///
/// # Feature Flags
///
/// - **default**: `DenseSlotMap` (via the default `dense-slotmap` feature)
/// - **--no-default-features**: `SlotMap`
///
/// Both hand out generation-checked keys, so a handle to a deleted quad is
/// never mistaken for a live one that reused its slot.
#[cfg(not(feature = "dense-slotmap"))]
pub type StorageMap<K, V> = SlotMap<K, V>;

/// Arena backend for quads (`DenseSlotMap`).
#[cfg(feature = "dense-slotmap")]
pub type StorageMap<K, V> = DenseSlotMap<K, V>;

/// Fast non-cryptographic `HashSet`.
pub type FastHashSet<T> = FxHashSet<T>;

/// Build-hasher behind [`FastHashSet`].
pub type FastBuildHasher = FxBuildHasher;

/// Stack-first vector that spills to the heap past `N` elements.
pub type SmallBuffer<T, const N: usize> = SmallVec<[T; N]>;

/// Vertices bounding one face of the subdivision.
///
/// Bounded faces of a finished triangulation are triangles, so three fit
/// inline; the unbounded face spills to the heap with the whole hull.
pub type FaceVertexBuffer = SmallBuffer<Point, 3>;

/// Creates a [`FastHashSet`] with pre-allocated capacity.
///
/// # Examples
///
/// ```rust
/// use voronoi_quadedge::core::collections::fast_hash_set_with_capacity;
///
/// let set = fast_hash_set_with_capacity::<u64>(64);
/// assert!(set.capacity() >= 64);
/// ```
#[inline]
#[must_use]
pub fn fast_hash_set_with_capacity<T>(capacity: usize) -> FastHashSet<T> {
    FastHashSet::with_capacity_and_hasher(capacity, FastBuildHasher::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_buffer_stays_inline_for_triangles() {
        let mut face = FaceVertexBuffer::new();
        face.push(Point::new([0.0, 0.0]));
        face.push(Point::new([1.0, 0.0]));
        face.push(Point::new([0.0, 1.0]));
        assert!(!face.spilled());
        face.push(Point::new([1.0, 1.0]));
        assert!(face.spilled());
    }

    #[test]
    fn capacity_helper() {
        let set = fast_hash_set_with_capacity::<u64>(50);
        assert!(set.capacity() >= 50);
    }
}
