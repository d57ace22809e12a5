//! PaddedLayout: mapping padded local indices to offsets in a flat buffer.
//!
//! A box with halo padding is stored as one contiguous row-major buffer
//! (last axis fastest). The layout converts local multi-indices into flat
//! offsets and splits rectangular sub-regions into contiguous row ranges,
//! which is all the packing and unpacking of halo blocks needs.

use crate::geometry::grid_box::{GridBox, Index, add};
use crate::halo_error::HaloGridError;
use std::ops::Range;

/// Row-major layout of a padded local buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaddedLayout<const N: usize> {
    shape: [usize; N],
    strides: [usize; N],
}

impl<const N: usize> PaddedLayout<N> {
    /// Layout for a buffer of the given padded extent.
    ///
    /// Negative extents are treated as empty axes.
    pub fn new(padded_extent: [Index; N]) -> Self {
        let shape = padded_extent.map(|e| e.max(0) as usize);
        let mut strides = [1usize; N];
        for i in (0..N.saturating_sub(1)).rev() {
            strides[i] = strides[i + 1] * shape[i + 1];
        }
        Self { shape, strides }
    }

    pub fn shape(&self) -> [usize; N] {
        self.shape
    }

    /// Number of elements in the buffer.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Local index space `[0, shape)` as a box.
    pub fn bounds(&self) -> GridBox<N> {
        GridBox::from_ordered([0; N], self.shape.map(|s| s as Index))
    }

    /// Flat offset of a local index.
    ///
    /// # Errors
    /// `IndexOutOfBounds` if any component falls outside `[0, shape)`.
    pub fn offset(&self, idx: &[Index; N]) -> Result<usize, HaloGridError> {
        if !self.bounds().contains_point(idx) {
            return Err(HaloGridError::IndexOutOfBounds {
                index: idx.to_vec(),
                begin: vec![0; N],
                end: self.shape.iter().map(|&s| s as Index).collect(),
            });
        }
        Ok(self.offset_unchecked(idx))
    }

    pub(crate) fn offset_unchecked(&self, idx: &[Index; N]) -> usize {
        (0..N).map(|i| idx[i] as usize * self.strides[i]).sum()
    }

    /// Contiguous flat ranges covering the region `[begin, begin + extent)`,
    /// in row-major order of the region.
    ///
    /// # Errors
    /// `RegionOutOfBounds` unless the region lies inside the buffer.
    pub fn row_ranges(&self, begin: &[Index; N], extent: &[Index; N]) -> Result<Vec<Range<usize>>, HaloGridError> {
        let region = GridBox::new(*begin, add(*begin, *extent))
            .ok()
            .filter(|r| self.bounds().contains_box(r))
            .ok_or_else(|| HaloGridError::RegionOutOfBounds {
                begin: begin.to_vec(),
                extent: extent.to_vec(),
                shape: self.shape.to_vec(),
            })?;
        if region.is_empty() {
            return Ok(Vec::new());
        }
        if N == 0 {
            return Ok(vec![0..1]);
        }
        let row_len = extent[N - 1] as usize;
        let mut rows_end = region.end();
        rows_end[N - 1] = begin[N - 1] + 1;
        Ok(GridBox::from_ordered(*begin, rows_end)
            .points()
            .map(|start| {
                let at = self.offset_unchecked(&start);
                at..at + row_len
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strides_are_row_major() {
        let l = PaddedLayout::new([3, 4, 5]);
        assert_eq!(l.len(), 60);
        assert_eq!(l.offset(&[0, 0, 1]).unwrap(), 1);
        assert_eq!(l.offset(&[0, 1, 0]).unwrap(), 5);
        assert_eq!(l.offset(&[1, 0, 0]).unwrap(), 20);
        assert_eq!(l.offset(&[2, 3, 4]).unwrap(), 59);
        assert!(l.offset(&[3, 0, 0]).is_err());
        assert!(l.offset(&[0, -1, 0]).is_err());
    }

    #[test]
    fn rows_cover_region_in_order() {
        let l = PaddedLayout::new([4, 5]);
        let rows = l.row_ranges(&[1, 2], &[2, 3]).unwrap();
        assert_eq!(rows, vec![7..10, 12..15]);
        assert!(l.row_ranges(&[3, 3], &[2, 1]).is_err());
        assert!(l.row_ranges(&[0, 0], &[0, 3]).unwrap().is_empty());
    }
}
