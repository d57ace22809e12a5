//! `Topology`: a validated partition of a global box into ranked subdomains.
//!
//! The topology owns the global domain, the ordered list of `(box, rank)`
//! assignments, per-axis periodicity and the halo padding. It is immutable
//! once built and holds no per-exchange state, so one instance (or one
//! replica per process) can answer every geometric query of an exchange:
//!
//! - which boxes a box needs halo data from ([`Topology::get_neighbours`]),
//! - where the overlaps are ([`Topology::get_intersections`]), including the
//!   disjoint wrap-around overlaps of periodic axes,
//! - and which local buffer ranges to copy ([`Topology::get_transfers`]).
//!
//! # Determinism
//! Every query walks the box list in its fixed order. Ranks that build the
//! same topology therefore enumerate neighbours and transfers identically,
//! which the network channel relies on to match sends with receives.

use crate::debug_invariants::DebugInvariants;
use crate::geometry::grid_box::{GridBox, Index, add, sub};
use crate::geometry::neighbours::{Connectivity, Neighbours};
use crate::halo_error::HaloGridError;
use crate::topology::periodic::{periodic_shifts, wrap_index};
use crate::topology::transfer::{BoxId, TransferInfo};
use crate::topology::validation::{validate_padding, validate_partition};
use std::collections::HashMap;

/// One subdomain assignment: box `bbox` is owned by `rank`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BoxRankPair<const N: usize> {
    pub bbox: GridBox<N>,
    pub rank: usize,
}

impl<const N: usize> BoxRankPair<N> {
    pub fn new(bbox: GridBox<N>, rank: usize) -> Self {
        Self { bbox, rank }
    }
}

/// Validated, immutable domain decomposition with halo configuration.
#[derive(Clone, Debug)]
pub struct Topology<const N: usize> {
    domain: GridBox<N>,
    boxes: Vec<BoxRankPair<N>>,
    periodic: [bool; N],
    begin_padding: [Index; N],
    end_padding: [Index; N],
    /// Translations tried for every overlap query; zero shift first.
    shifts: Vec<[Index; N]>,
    ids: HashMap<BoxRankPair<N>, BoxId>,
}

/// An overlap in the query box's frame plus the translation applied to the
/// other box to produce it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Overlap<const N: usize> {
    region: GridBox<N>,
    shift: [Index; N],
}

impl<const N: usize> Topology<N> {
    /// Build and validate a topology.
    ///
    /// # Errors
    /// - `OverlappingBoxes` / `DuplicateBox` if two boxes share cells,
    /// - `IncompleteCoverage` if the boxes leave part of the domain uncovered,
    /// - `BoxOutsideDomain` if a box reaches past the domain,
    /// - `NegativePadding` / `PaddingExceedsPeriod` for unusable halos.
    ///
    /// # Example
    /// ```rust
    /// use halo_grid::geometry::GridBox;
    /// use halo_grid::topology::{BoxRankPair, Topology};
    /// let domain = GridBox::new([0], [10]).unwrap();
    /// let boxes = vec![
    ///     BoxRankPair::new(GridBox::new([0], [3]).unwrap(), 0),
    ///     BoxRankPair::new(GridBox::new([3], [6]).unwrap(), 1),
    ///     BoxRankPair::new(GridBox::new([6], [10]).unwrap(), 2),
    /// ];
    /// let topo = Topology::with_halo(domain, boxes, [true], 1).unwrap();
    /// assert_eq!(topo.get_neighbours(&topo.boxes()[0]).unwrap().len(), 2);
    /// ```
    pub fn new(
        domain: GridBox<N>,
        boxes: Vec<BoxRankPair<N>>,
        periodic: [bool; N],
        begin_padding: [Index; N],
        end_padding: [Index; N],
    ) -> Result<Self, HaloGridError> {
        validate_padding(&domain, &periodic, &begin_padding, &end_padding)?;
        validate_partition(&domain, &boxes)?;

        let ids = boxes.iter().enumerate().map(|(i, p)| (*p, i)).collect();
        let shifts = periodic_shifts(&domain, &periodic);
        log::debug!(
            "topology: {} boxes over {:?}, periodic {:?}, padding {:?}/{:?}",
            boxes.len(),
            domain,
            periodic,
            begin_padding,
            end_padding
        );
        let topo = Self {
            domain,
            boxes,
            periodic,
            begin_padding,
            end_padding,
            shifts,
            ids,
        };
        crate::debug_invariants!(topo.validate_invariants(), "Topology::new");
        Ok(topo)
    }

    /// Same halo `width` on both sides of every axis.
    pub fn with_halo(
        domain: GridBox<N>,
        boxes: Vec<BoxRankPair<N>>,
        periodic: [bool; N],
        width: Index,
    ) -> Result<Self, HaloGridError> {
        Self::new(domain, boxes, periodic, [width; N], [width; N])
    }

    pub fn domain(&self) -> &GridBox<N> {
        &self.domain
    }

    /// All assignments, in the fixed order shared by every rank.
    pub fn boxes(&self) -> &[BoxRankPair<N>] {
        &self.boxes
    }

    pub fn periodic(&self) -> [bool; N] {
        self.periodic
    }

    pub fn begin_padding(&self) -> [Index; N] {
        self.begin_padding
    }

    pub fn end_padding(&self) -> [Index; N] {
        self.end_padding
    }

    /// One past the highest rank that owns a box.
    pub fn num_ranks(&self) -> usize {
        self.boxes.iter().map(|p| p.rank + 1).max().unwrap_or(0)
    }

    /// Position of `pair` in the box list.
    pub fn box_id(&self, pair: &BoxRankPair<N>) -> Result<BoxId, HaloGridError> {
        self.ids
            .get(pair)
            .copied()
            .ok_or_else(|| HaloGridError::UnknownBox(format!("{:?} on rank {}", pair.bbox, pair.rank)))
    }

    pub fn pair(&self, id: BoxId) -> Result<&BoxRankPair<N>, HaloGridError> {
        self.boxes
            .get(id)
            .ok_or_else(|| HaloGridError::UnknownBox(format!("#{id}")))
    }

    /// Padded buffer extent of a box: `extent + begin_padding + end_padding`.
    pub fn padded_extent(&self, bbox: &GridBox<N>) -> [Index; N] {
        add(add(bbox.extent(), self.begin_padding), self.end_padding)
    }

    /// `bbox` grown by the halo padding.
    pub fn expand(&self, bbox: &GridBox<N>) -> GridBox<N> {
        bbox.expand(&self.begin_padding, &self.end_padding)
    }

    /// Boxes owned by `rank`, in list order.
    pub fn get_boxes(&self, rank: usize) -> Vec<&BoxRankPair<N>> {
        self.boxes.iter().filter(|p| p.rank == rank).collect()
    }

    /// Boxes that `pair` receives halo data from.
    ///
    /// A box is a neighbour when some periodic translation of it overlaps
    /// `pair`'s padded box. `pair` itself appears only through a non-zero
    /// translation (a box wrapping onto itself on a periodic axis).
    pub fn get_neighbours(&self, pair: &BoxRankPair<N>) -> Result<Vec<&BoxRankPair<N>>, HaloGridError> {
        let me = self.box_id(pair)?;
        Ok(self
            .boxes
            .iter()
            .enumerate()
            .filter(|&(other, p)| !self.overlaps_between(me, &pair.bbox, other, &p.bbox).is_empty())
            .map(|(_, p)| p)
            .collect())
    }

    /// Boxes that receive halo data from `pair` (the converse of
    /// [`get_neighbours`](Self::get_neighbours)); the two coincide when the
    /// padding is symmetric.
    pub fn get_receivers(&self, pair: &BoxRankPair<N>) -> Result<Vec<&BoxRankPair<N>>, HaloGridError> {
        let me = self.box_id(pair)?;
        Ok(self
            .boxes
            .iter()
            .enumerate()
            .filter(|&(other, p)| !self.overlaps_between(other, &p.bbox, me, &pair.bbox).is_empty())
            .map(|(_, p)| p)
            .collect())
    }

    /// Positive-volume overlaps of `box1`'s padded box with every periodic
    /// translation of `box2`, in `box1`'s global frame.
    ///
    /// A pair can overlap several times, e.g. directly and across a wrap.
    pub fn get_intersections(
        &self,
        box1: &BoxRankPair<N>,
        box2: &BoxRankPair<N>,
    ) -> Result<Vec<GridBox<N>>, HaloGridError> {
        let id1 = self.box_id(box1)?;
        let id2 = self.box_id(box2)?;
        Ok(self
            .overlaps_between(id1, &box1.bbox, id2, &box2.bbox)
            .into_iter()
            .map(|o| o.region)
            .collect())
    }

    /// Transfers from `sender` into `receiver`'s halo, with local coordinates
    /// offset by `pad`.
    ///
    /// The overlap is found in the receiver's frame; the periodic translation
    /// is undone on the sender side only, so both begins address untranslated
    /// local storage.
    pub fn get_locations(
        &self,
        sender: &BoxRankPair<N>,
        receiver: &BoxRankPair<N>,
        pad: &[Index; N],
    ) -> Result<Vec<TransferInfo<N>>, HaloGridError> {
        let sender_box = self.box_id(sender)?;
        let receiver_box = self.box_id(receiver)?;
        let overlaps = self.overlaps_between(receiver_box, &receiver.bbox, sender_box, &sender.bbox);
        Ok(overlaps
            .into_iter()
            .map(|o| {
                let at = o.region.begin();
                TransferInfo {
                    sender_rank: sender.rank,
                    receiver_rank: receiver.rank,
                    sender_box,
                    receiver_box,
                    sender_begin: add(sub(sub(at, o.shift), sender.bbox.begin()), *pad),
                    receiver_begin: add(sub(at, receiver.bbox.begin()), *pad),
                    extent: o.region.extent(),
                }
            })
            .collect())
    }

    /// [`get_locations`](Self::get_locations) with the topology's own padding.
    pub fn get_transfers(
        &self,
        sender: &BoxRankPair<N>,
        receiver: &BoxRankPair<N>,
    ) -> Result<Vec<TransferInfo<N>>, HaloGridError> {
        self.get_locations(sender, receiver, &self.begin_padding)
    }

    /// Boxes overlapping the part of `pair`'s halo that lies beyond it in
    /// direction `dir` (a face, edge or corner region).
    ///
    /// Across a non-periodic domain boundary this is always empty.
    pub fn get_directional_neighbours(
        &self,
        pair: &BoxRankPair<N>,
        dir: &[Index; N],
    ) -> Result<Vec<&BoxRankPair<N>>, HaloGridError> {
        let me = self.box_id(pair)?;
        let Some(slab) = self.halo_region(&pair.bbox, dir) else {
            return Ok(Vec::new());
        };
        Ok(self
            .boxes
            .iter()
            .enumerate()
            .filter(|&(other, p)| {
                self.shifts.iter().any(|shift| {
                    let trivial = other == me && *shift == [0; N];
                    !trivial && slab.overlap(&p.bbox.translate(shift)).is_some()
                })
            })
            .map(|(_, p)| p)
            .collect())
    }

    /// Directional neighbours for every direction of a connectivity table.
    pub fn neighbour_map<C: Connectivity>(
        &self,
        pair: &BoxRankPair<N>,
        table: &Neighbours<N, C>,
    ) -> Result<Vec<([Index; N], Vec<&BoxRankPair<N>>)>, HaloGridError> {
        table
            .iter()
            .map(|dir| Ok((*dir, self.get_directional_neighbours(pair, dir)?)))
            .collect()
    }

    /// Global index to `pair`'s padded local index.
    pub fn global_to_local(&self, pair: &BoxRankPair<N>, idx: &[Index; N]) -> Result<[Index; N], HaloGridError> {
        let local = add(sub(*idx, pair.bbox.begin()), self.begin_padding);
        if self.in_padded_range(pair, &local) {
            return Ok(local);
        }
        let padded = self.expand(&pair.bbox);
        Err(HaloGridError::IndexOutOfBounds {
            index: idx.to_vec(),
            begin: padded.begin().to_vec(),
            end: padded.end().to_vec(),
        })
    }

    /// Padded local index of `pair` to global index.
    pub fn local_to_global(&self, pair: &BoxRankPair<N>, idx: &[Index; N]) -> Result<[Index; N], HaloGridError> {
        if self.in_padded_range(pair, idx) {
            return Ok(add(sub(*idx, self.begin_padding), pair.bbox.begin()));
        }
        Err(HaloGridError::IndexOutOfBounds {
            index: idx.to_vec(),
            begin: vec![0; N],
            end: self.padded_extent(&pair.bbox).to_vec(),
        })
    }

    /// Fold a global index back into the domain along periodic axes.
    pub fn wrap(&self, idx: &[Index; N]) -> Option<[Index; N]> {
        wrap_index(&self.domain, &self.periodic, idx)
    }

    fn in_padded_range(&self, pair: &BoxRankPair<N>, local: &[Index; N]) -> bool {
        let shape = self.padded_extent(&pair.bbox);
        (0..N).all(|i| 0 <= local[i] && local[i] < shape[i])
    }

    /// Halo cells of `bbox` beyond it along `dir`: outside `bbox` on the
    /// non-zero axes of `dir`, within it on the others.
    fn halo_region(&self, bbox: &GridBox<N>, dir: &[Index; N]) -> Option<GridBox<N>> {
        if dir.iter().all(|&d| d == 0) || dir.iter().any(|&d| d.abs() > 1) {
            return None;
        }
        let mut begin = bbox.begin();
        let mut end = bbox.end();
        for i in 0..N {
            match dir[i] {
                1 => {
                    begin[i] = bbox.end()[i];
                    end[i] = bbox.end()[i] + self.end_padding[i];
                }
                -1 => {
                    begin[i] = bbox.begin()[i] - self.begin_padding[i];
                    end[i] = bbox.begin()[i];
                }
                _ => {}
            }
        }
        GridBox::new(begin, end).ok().filter(|b| !b.is_empty())
    }

    /// Overlaps of `a`'s padded box with every translation of `b`, skipping
    /// `a`'s own interior when `a` and `b` are the same box.
    fn overlaps_between(&self, a_id: BoxId, a: &GridBox<N>, b_id: BoxId, b: &GridBox<N>) -> Vec<Overlap<N>> {
        let padded = self.expand(a);
        self.shifts
            .iter()
            .filter(|shift| !(a_id == b_id && **shift == [0; N]))
            .filter_map(|shift| {
                padded
                    .overlap(&b.translate(shift))
                    .map(|region| Overlap { region, shift: *shift })
            })
            .collect()
    }
}

impl<const N: usize> DebugInvariants for Topology<N> {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "Topology");
    }

    fn validate_invariants(&self) -> Result<(), HaloGridError> {
        validate_padding(&self.domain, &self.periodic, &self.begin_padding, &self.end_padding)?;
        validate_partition(&self.domain, &self.boxes)?;
        if self.ids.len() != self.boxes.len() {
            return Err(HaloGridError::UnknownBox(format!(
                "id table has {} entries for {} boxes",
                self.ids.len(),
                self.boxes.len()
            )));
        }
        Ok(())
    }
}

static_assertions::assert_impl_all!(Topology<3>: Send, Sync, Clone);
