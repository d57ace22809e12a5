//! `GridBox`: an axis-aligned, half-open box of integer indices.
//!
//! A box is described by an inclusive `begin` corner and an exclusive `end`
//! corner. It is a plain `Copy` value; every operation returns a new box.
//! Operations that can have no geometric result (two disjoint boxes, a slab
//! facing a non-unit direction) return `Option` instead of a degenerate box.

use crate::halo_error::HaloGridError;
use std::fmt;

/// Signed grid coordinate.
pub type Index = i64;

/// Axis-aligned half-open box `[begin, end)` in `N` dimensions.
///
/// # Invariants
/// `begin[i] <= end[i]` on every axis. Boxes with `begin[i] == end[i]` on some
/// axis are valid but empty.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridBox<const N: usize> {
    begin: [Index; N],
    end: [Index; N],
}

impl<const N: usize> GridBox<N> {
    /// Build a box, rejecting `begin[i] > end[i]` and boxes whose extent or
    /// volume does not fit in an [`Index`].
    ///
    /// # Example
    /// ```rust
    /// use halo_grid::geometry::GridBox;
    /// let b = GridBox::new([0, 0], [4, 3]).unwrap();
    /// assert_eq!(b.volume(), 12);
    /// assert!(GridBox::new([2], [1]).is_err());
    /// assert!(GridBox::new([0, 0], [1 << 32, 1 << 32]).is_err());
    /// ```
    pub fn new(begin: [Index; N], end: [Index; N]) -> Result<Self, HaloGridError> {
        if begin.iter().zip(end.iter()).any(|(b, e)| b > e) {
            return Err(HaloGridError::InvalidBox {
                begin: begin.to_vec(),
                end: end.to_vec(),
            });
        }
        if checked_volume(&begin, &end).is_none() {
            return Err(HaloGridError::BoxTooLarge {
                begin: begin.to_vec(),
                end: end.to_vec(),
            });
        }
        Ok(Self { begin, end })
    }

    /// Box starting at `begin` with the given (non-negative) extent.
    pub fn from_extent(begin: [Index; N], extent: [Index; N]) -> Result<Self, HaloGridError> {
        let end = checked_add(begin, extent).ok_or_else(|| HaloGridError::BoxTooLarge {
            begin: begin.to_vec(),
            end: begin.iter().zip(extent.iter()).map(|(b, e)| b.saturating_add(*e)).collect(),
        })?;
        Self::new(begin, end)
    }

    /// Built only from corners already known to be ordered.
    pub(crate) fn from_ordered(begin: [Index; N], end: [Index; N]) -> Self {
        debug_assert!(begin.iter().zip(end.iter()).all(|(b, e)| b <= e));
        Self { begin, end }
    }

    #[inline]
    pub fn begin(&self) -> [Index; N] {
        self.begin
    }

    #[inline]
    pub fn end(&self) -> [Index; N] {
        self.end
    }

    /// Per-axis length `end - begin`.
    pub fn extent(&self) -> [Index; N] {
        sub(self.end, self.begin)
    }

    /// Number of contained points.
    pub fn volume(&self) -> Index {
        flat_size(&self.extent())
    }

    pub fn is_empty(&self) -> bool {
        self.volume() == 0
    }

    /// Half-open containment: a box's own `end` corner is never contained.
    pub fn contains_point(&self, p: &[Index; N]) -> bool {
        (0..N).all(|i| self.begin[i] <= p[i] && p[i] < self.end[i])
    }

    /// `other` lies entirely within `self`.
    pub fn contains_box(&self, other: &GridBox<N>) -> bool {
        (0..N).all(|i| self.begin[i] <= other.begin[i] && other.end[i] <= self.end[i])
    }

    /// Maximal box contained in both, or `None` if the boxes are disjoint.
    ///
    /// Boxes that merely touch yield `Some` empty box; use [`overlap`](Self::overlap)
    /// when only positive-volume results matter.
    pub fn intersection(&self, other: &GridBox<N>) -> Option<GridBox<N>> {
        let mut begin = self.begin;
        let mut end = self.end;
        for i in 0..N {
            begin[i] = begin[i].max(other.begin[i]);
            end[i] = end[i].min(other.end[i]);
            if begin[i] > end[i] {
                return None;
            }
        }
        Some(Self { begin, end })
    }

    /// Intersection restricted to positive volume.
    pub fn overlap(&self, other: &GridBox<N>) -> Option<GridBox<N>> {
        self.intersection(other).filter(|b| !b.is_empty())
    }

    /// Smallest box covering both inputs.
    ///
    /// This is *not* a union: the result generally covers cells belonging to
    /// neither input. See [`merge_adjacent`](Self::merge_adjacent).
    pub fn bounding_box(&self, other: &GridBox<N>) -> GridBox<N> {
        let mut begin = self.begin;
        let mut end = self.end;
        for i in 0..N {
            begin[i] = begin[i].min(other.begin[i]);
            end[i] = end[i].max(other.end[i]);
        }
        Self { begin, end }
    }

    /// Union of two boxes that share a full face.
    ///
    /// Returns `Some` only when the boxes coincide on every axis but one and
    /// touch along that axis, which is exactly when the bounding box equals
    /// the union. Identical boxes do not merge.
    pub fn merge_adjacent(&self, other: &GridBox<N>) -> Option<GridBox<N>> {
        let mut touching_axis = None;
        for i in 0..N {
            let same = self.begin[i] == other.begin[i] && self.end[i] == other.end[i];
            if same {
                continue;
            }
            let touches = self.end[i] == other.begin[i] || other.end[i] == self.begin[i];
            if !touches || touching_axis.is_some() {
                return None;
            }
            touching_axis = Some(i);
        }
        touching_axis.map(|_| self.bounding_box(other))
    }

    /// Shift both corners by `offset`.
    pub fn translate(&self, offset: &[Index; N]) -> GridBox<N> {
        Self {
            begin: add(self.begin, *offset),
            end: add(self.end, *offset),
        }
    }

    /// Grow by `lo` below `begin` and `hi` above `end`.
    ///
    /// Padding is expected to be non-negative; negative values that would
    /// invert an axis collapse it to an empty range instead.
    pub fn expand(&self, lo: &[Index; N], hi: &[Index; N]) -> GridBox<N> {
        let begin = sub(self.begin, *lo);
        let mut end = add(self.end, *hi);
        for i in 0..N {
            end[i] = end[i].max(begin[i]);
        }
        Self { begin, end }
    }

    /// Offset from `self.begin` to `other.begin`.
    pub fn distance(&self, other: &GridBox<N>) -> [Index; N] {
        sub(other.begin, self.begin)
    }

    /// Per-axis face coincidence: `[self.begin == other.end, self.end == other.begin]`.
    pub fn shared_edges(&self, other: &GridBox<N>) -> [[bool; 2]; N] {
        let mut out = [[false; 2]; N];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = [self.begin[i] == other.end[i], self.end[i] == other.begin[i]];
        }
        out
    }

    /// The one-cell-thick layer of this box facing `dir`.
    ///
    /// `dir` must have exactly one non-zero component equal to ±1; the `end - 1`
    /// layer is returned for `+1`, the `begin` layer for `-1`.
    pub fn edge_bounds(&self, dir: &[Index; N]) -> Option<GridBox<N>> {
        let axis = unit_axis(dir)?;
        if self.is_empty() {
            return None;
        }
        let mut begin = self.begin;
        let mut end = self.end;
        if dir[axis] > 0 {
            begin[axis] = end[axis] - 1;
        } else {
            end[axis] = begin[axis] + 1;
        }
        Some(Self { begin, end })
    }

    /// Points of [`edge_bounds`](Self::edge_bounds); empty when there is no slab.
    pub fn edge_indices(&self, dir: &[Index; N]) -> BoxPoints<N> {
        match self.edge_bounds(dir) {
            Some(slab) => slab.points(),
            None => BoxPoints::exhausted(),
        }
    }

    /// Cells of `self` on its `dir` face that touch `other` across that face.
    ///
    /// `None` unless `other` starts exactly where `self` ends along `dir`
    /// (`self.end == other.begin` for `+1`, `self.begin == other.end` for `-1`)
    /// and the two faces share a positive cross-section.
    pub fn shared_edge(&self, other: &GridBox<N>, dir: &[Index; N]) -> Option<GridBox<N>> {
        let axis = unit_axis(dir)?;
        let adjacent = self.shared_edges(other)[axis];
        let sign_ok = if dir[axis] > 0 { adjacent[1] } else { adjacent[0] };
        if !sign_ok {
            return None;
        }
        let mine = self.edge_bounds(dir)?;
        let back = negate(*dir);
        let theirs = other.edge_bounds(&back)?.translate(&back);
        mine.overlap(&theirs)
    }

    /// Row-major (last axis fastest) iterator over contained points.
    pub fn points(&self) -> BoxPoints<N> {
        if self.is_empty() {
            BoxPoints::exhausted()
        } else {
            BoxPoints {
                bbox: *self,
                next: Some(self.begin),
            }
        }
    }
}

impl<const N: usize> fmt::Debug for GridBox<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GridBox({:?}..{:?})", self.begin, self.end)
    }
}

/// Odometer over the points of a box.
#[derive(Clone, Debug)]
pub struct BoxPoints<const N: usize> {
    bbox: GridBox<N>,
    next: Option<[Index; N]>,
}

impl<const N: usize> BoxPoints<N> {
    fn exhausted() -> Self {
        Self {
            bbox: GridBox::from_ordered([0; N], [0; N]),
            next: None,
        }
    }
}

impl<const N: usize> Iterator for BoxPoints<N> {
    type Item = [Index; N];

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let mut idx = current;
        let mut axis = N;
        self.next = loop {
            if axis == 0 {
                break None;
            }
            axis -= 1;
            idx[axis] += 1;
            if idx[axis] < self.bbox.end[axis] {
                break Some(idx);
            }
            idx[axis] = self.bbox.begin[axis];
        };
        Some(current)
    }
}

/// Product of an extent; the element count of a block with that shape.
pub fn flat_size<const N: usize>(extent: &[Index; N]) -> Index {
    extent.iter().product()
}

/// `prod(end - begin)`, or `None` if an extent or the product overflows.
pub(crate) fn checked_volume<const N: usize>(begin: &[Index; N], end: &[Index; N]) -> Option<Index> {
    begin
        .iter()
        .zip(end.iter())
        .try_fold(1 as Index, |acc, (b, e)| acc.checked_mul(e.checked_sub(*b)?))
}

/// Axis of a direction with exactly one ±1 component.
pub(crate) fn unit_axis<const N: usize>(dir: &[Index; N]) -> Option<usize> {
    let mut axis = None;
    for (i, &d) in dir.iter().enumerate() {
        match d {
            0 => {}
            1 | -1 if axis.is_none() => axis = Some(i),
            _ => return None,
        }
    }
    axis
}

pub(crate) fn add<const N: usize>(a: [Index; N], b: [Index; N]) -> [Index; N] {
    std::array::from_fn(|i| a[i] + b[i])
}

pub(crate) fn checked_add<const N: usize>(a: [Index; N], b: [Index; N]) -> Option<[Index; N]> {
    let mut out = a;
    for (o, d) in out.iter_mut().zip(b.iter()) {
        *o = o.checked_add(*d)?;
    }
    Some(out)
}

pub(crate) fn sub<const N: usize>(a: [Index; N], b: [Index; N]) -> [Index; N] {
    std::array::from_fn(|i| a[i] - b[i])
}

pub(crate) fn negate<const N: usize>(a: [Index; N]) -> [Index; N] {
    a.map(|x| -x)
}
