//! Periodic translations of a domain.
//!
//! On a periodic axis a box may reach its neighbours across the far edge. We
//! model that by trying every translation of the candidate box by `0`, `+L`
//! or `-L` (the domain extent) on each periodic axis independently. Corner
//! wraps need simultaneous translations on two or more axes, so all
//! `3^p` combinations are produced rather than one axis at a time.

use crate::geometry::grid_box::{GridBox, Index};
use itertools::Itertools;

/// Every translation of `domain` by whole periods on its periodic axes.
///
/// The zero translation always comes first; the order is otherwise fixed
/// (odometer order over periodic axes, `0, +L, -L` per axis).
pub fn periodic_shifts<const N: usize>(domain: &GridBox<N>, periodic: &[bool; N]) -> Vec<[Index; N]> {
    let extent = domain.extent();
    let axes: Vec<usize> = (0..N).filter(|&i| periodic[i]).collect();
    if axes.is_empty() {
        return vec![[0; N]];
    }
    axes.iter()
        .map(|&axis| [0, extent[axis], -extent[axis]])
        .multi_cartesian_product()
        .map(|choice| {
            let mut shift = [0; N];
            for (&axis, offset) in axes.iter().zip(choice) {
                shift[axis] = offset;
            }
            shift
        })
        .collect()
}

/// Map `idx` back into `domain` along periodic axes.
///
/// Returns `None` when `idx` lies outside the domain on a non-periodic axis.
pub fn wrap_index<const N: usize>(
    domain: &GridBox<N>,
    periodic: &[bool; N],
    idx: &[Index; N],
) -> Option<[Index; N]> {
    let begin = domain.begin();
    let end = domain.end();
    let mut out = *idx;
    for i in 0..N {
        if begin[i] <= out[i] && out[i] < end[i] {
            continue;
        }
        let len = end[i] - begin[i];
        if !periodic[i] || len == 0 {
            return None;
        }
        out[i] = begin[i] + (out[i] - begin[i]).rem_euclid(len);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_periodic_axes_gives_identity_only() {
        let d = GridBox::new([0, 0], [4, 3]).unwrap();
        assert_eq!(periodic_shifts(&d, &[false, false]), vec![[0, 0]]);
    }

    #[test]
    fn two_periodic_axes_include_corner_wraps() {
        let d = GridBox::new([0, 0], [4, 3]).unwrap();
        let shifts = periodic_shifts(&d, &[true, true]);
        assert_eq!(shifts.len(), 9);
        assert_eq!(shifts[0], [0, 0]);
        assert!(shifts.contains(&[4, 3]));
        assert!(shifts.contains(&[-4, 3]));
        assert!(shifts.contains(&[-4, -3]));
    }

    #[test]
    fn single_axis_leaves_others_fixed() {
        let d = GridBox::new([0, 0, 0], [2, 5, 7]).unwrap();
        let shifts = periodic_shifts(&d, &[false, true, false]);
        assert_eq!(shifts, vec![[0, 0, 0], [0, 5, 0], [0, -5, 0]]);
    }

    #[test]
    fn wrap_respects_periodicity() {
        let d = GridBox::new([0, 0], [4, 3]).unwrap();
        assert_eq!(wrap_index(&d, &[true, true], &[-1, -1]), Some([3, 2]));
        assert_eq!(wrap_index(&d, &[true, true], &[4, 3]), Some([0, 0]));
        assert_eq!(wrap_index(&d, &[true, false], &[1, 3]), None);
        assert_eq!(wrap_index(&d, &[false, false], &[1, 2]), Some([1, 2]));
    }
}
