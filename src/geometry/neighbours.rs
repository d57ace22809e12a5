//! Fixed tables of neighbour directions on a Cartesian grid.
//!
//! [`Star`] connectivity links a cell to its `2N` face neighbours; [`Full`]
//! connectivity adds edge and corner neighbours for `3^N - 1` in total. The
//! order of each table is stable so that code enumerating neighbours on
//! different ranks visits them identically.

use crate::geometry::grid_box::{GridBox, Index};
use std::marker::PhantomData;

/// A rule producing the direction vectors of a stencil shape.
pub trait Connectivity {
    fn directions<const N: usize>() -> Vec<[Index; N]>;
}

/// Face neighbours only: `+e0, -e0, +e1, -e1, ...`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Star;

/// Face, edge and corner neighbours: every vector of `{-1, 0, 1}^N` except zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct Full;

impl Connectivity for Star {
    fn directions<const N: usize>() -> Vec<[Index; N]> {
        let mut out = Vec::with_capacity(2 * N);
        for axis in 0..N {
            let mut unit = [0; N];
            unit[axis] = 1;
            out.push(unit);
            unit[axis] = -1;
            out.push(unit);
        }
        out
    }
}

impl Connectivity for Full {
    fn directions<const N: usize>() -> Vec<[Index; N]> {
        GridBox::from_ordered([-1; N], [2; N])
            .points()
            .filter(|d| d.iter().any(|&c| c != 0))
            .collect()
    }
}

/// Direction table for `N` dimensions under connectivity `C`.
#[derive(Clone, Debug)]
pub struct Neighbours<const N: usize, C: Connectivity> {
    dirs: Vec<[Index; N]>,
    _conn: PhantomData<C>,
}

impl<const N: usize, C: Connectivity> Default for Neighbours<N, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize, C: Connectivity> Neighbours<N, C> {
    pub fn new() -> Self {
        Self {
            dirs: C::directions::<N>(),
            _conn: PhantomData,
        }
    }

    pub fn directions(&self) -> &[[Index; N]] {
        &self.dirs
    }

    pub fn iter(&self) -> impl Iterator<Item = &[Index; N]> + '_ {
        self.dirs.iter()
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// Position of `dir` in the table, or `None` if it is not a neighbour direction.
    pub fn idx(&self, dir: &[Index; N]) -> Option<usize> {
        self.dirs.iter().position(|d| d == dir)
    }
}
