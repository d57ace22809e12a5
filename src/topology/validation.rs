//! Partition validation helpers.
//!
//! A topology is only accepted when its boxes tile the domain exactly: every
//! box is inside the domain, no two boxes share a cell, and the box volumes
//! add up to the domain volume. For rectangular boxes, disjointness plus
//! matching volume implies full coverage.

use crate::geometry::grid_box::{GridBox, Index};
use crate::halo_error::HaloGridError;
use crate::topology::decomposition::BoxRankPair;
use itertools::Itertools;

/// Check that `boxes` is a legal tiling of `domain`.
pub fn validate_partition<const N: usize>(
    domain: &GridBox<N>,
    boxes: &[BoxRankPair<N>],
) -> Result<(), HaloGridError> {
    for (index, pair) in boxes.iter().enumerate() {
        if !domain.contains_box(&pair.bbox) {
            return Err(HaloGridError::BoxOutsideDomain {
                index,
                begin: pair.bbox.begin().to_vec(),
                end: pair.bbox.end().to_vec(),
            });
        }
    }

    check_disjoint(boxes)?;

    let covered = boxes
        .iter()
        .try_fold(0 as Index, |acc, p| acc.checked_add(p.bbox.volume()))
        .ok_or(HaloGridError::VolumeOverflow)?;
    if covered != domain.volume() {
        return Err(HaloGridError::IncompleteCoverage {
            covered,
            expected: domain.volume(),
        });
    }
    Ok(())
}

/// Sweep along axis 0: only boxes whose axis-0 ranges overlap are compared.
fn check_disjoint<const N: usize>(boxes: &[BoxRankPair<N>]) -> Result<(), HaloGridError> {
    let order: Vec<usize> = (0..boxes.len())
        .sorted_by_key(|&i| (sweep_key(&boxes[i].bbox), i))
        .collect();
    for (pos, &i) in order.iter().enumerate() {
        let a = &boxes[i];
        for &j in &order[pos + 1..] {
            let b = &boxes[j];
            let (first, second) = (i.min(j), i.max(j));
            if a == b {
                return Err(HaloGridError::DuplicateBox { first, second });
            }
            if N > 0 && b.bbox.begin()[0] >= a.bbox.end()[0] && !a.bbox.is_empty() {
                break;
            }
            if a.bbox.overlap(&b.bbox).is_some() {
                return Err(HaloGridError::OverlappingBoxes { first, second });
            }
        }
    }
    Ok(())
}

fn sweep_key<const N: usize>(b: &GridBox<N>) -> Index {
    if N == 0 { 0 } else { b.begin()[0] }
}

/// Padding must be non-negative, and no wider than the domain on periodic axes.
///
/// The padded domain must also stay representable: its volume bounds every
/// padded buffer, and on periodic axes the reach one period beyond it bounds
/// every shifted coordinate.
pub fn validate_padding<const N: usize>(
    domain: &GridBox<N>,
    periodic: &[bool; N],
    begin_padding: &[Index; N],
    end_padding: &[Index; N],
) -> Result<(), HaloGridError> {
    let extent = domain.extent();
    for axis in 0..N {
        for value in [begin_padding[axis], end_padding[axis]] {
            if value < 0 {
                return Err(HaloGridError::NegativePadding { axis, value });
            }
            if periodic[axis] && value > extent[axis] {
                return Err(HaloGridError::PaddingExceedsPeriod {
                    axis,
                    padding: value,
                    extent: extent[axis],
                });
            }
        }
    }

    let mut lo = domain.begin();
    let mut hi = domain.end();
    for axis in 0..N {
        let reach = if periodic[axis] { extent[axis] } else { 0 };
        let padded = lo[axis]
            .checked_sub(begin_padding[axis])
            .zip(hi[axis].checked_add(end_padding[axis]))
            .filter(|&(l, h)| l.checked_sub(reach).is_some() && h.checked_add(reach).is_some());
        let Some((l, h)) = padded else {
            return Err(HaloGridError::CoordinateOverflow { axis });
        };
        lo[axis] = l;
        hi[axis] = h;
    }
    GridBox::new(lo, hi)?;
    Ok(())
}
