//! Serializable description of a decomposition.
//!
//! `DecompositionConfig` uses plain vectors so it can be read from JSON (or
//! any serde format) without knowing the dimension up front; the dimension is
//! checked when the config is turned into a [`Topology`].

use serde::{Deserialize, Serialize};

use crate::geometry::grid_box::{GridBox, Index};
use crate::halo_error::HaloGridError;
use crate::topology::{BoxRankPair, Topology};

/// One box of the partition and the rank that owns it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxSpec {
    pub begin: Vec<Index>,
    pub end: Vec<Index>,
    pub rank: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecompositionConfig {
    pub domain_begin: Vec<Index>,
    pub domain_end: Vec<Index>,
    #[serde(default)]
    pub boxes: Vec<BoxSpec>,
    /// Missing entries mean "not periodic".
    #[serde(default)]
    pub periodic: Vec<bool>,
    #[serde(default)]
    pub begin_padding: Vec<Index>,
    #[serde(default)]
    pub end_padding: Vec<Index>,
}

impl DecompositionConfig {
    /// Non-periodic domain with the same halo width on every side and no
    /// boxes yet.
    pub fn with_halo(domain_begin: Vec<Index>, domain_end: Vec<Index>, halo: Index) -> Self {
        let dim = domain_begin.len();
        Self {
            domain_begin,
            domain_end,
            boxes: Vec::new(),
            periodic: vec![false; dim],
            begin_padding: vec![halo; dim],
            end_padding: vec![halo; dim],
        }
    }

    /// Append a box owned by `rank`.
    pub fn push_box(&mut self, begin: Vec<Index>, end: Vec<Index>, rank: usize) -> &mut Self {
        self.boxes.push(BoxSpec { begin, end, rank });
        self
    }

    /// Validate and build the topology.
    ///
    /// # Errors
    /// `DimensionMismatch` if any vector is not `N` long (an empty
    /// `periodic` or padding vector is read as all-false / all-zero), plus
    /// everything [`Topology::new`] rejects.
    pub fn into_topology<const N: usize>(&self) -> Result<Topology<N>, HaloGridError> {
        let domain = GridBox::new(
            fixed::<Index, N>("domain_begin", &self.domain_begin)?,
            fixed::<Index, N>("domain_end", &self.domain_end)?,
        )?;
        let boxes = self
            .boxes
            .iter()
            .map(|entry| {
                let bbox = GridBox::new(
                    fixed::<Index, N>("box begin", &entry.begin)?,
                    fixed::<Index, N>("box end", &entry.end)?,
                )?;
                Ok(BoxRankPair::new(bbox, entry.rank))
            })
            .collect::<Result<Vec<_>, HaloGridError>>()?;
        Topology::new(
            domain,
            boxes,
            fixed_or_default("periodic", &self.periodic)?,
            fixed_or_default("begin_padding", &self.begin_padding)?,
            fixed_or_default("end_padding", &self.end_padding)?,
        )
    }
}

fn fixed<T: Copy, const N: usize>(what: &'static str, v: &[T]) -> Result<[T; N], HaloGridError> {
    <[T; N]>::try_from(v).map_err(|_| HaloGridError::DimensionMismatch {
        what,
        expected: N,
        found: v.len(),
    })
}

fn fixed_or_default<T: Copy + Default, const N: usize>(
    what: &'static str,
    v: &[T],
) -> Result<[T; N], HaloGridError> {
    if v.is_empty() {
        Ok([T::default(); N])
    } else {
        fixed(what, v)
    }
}
