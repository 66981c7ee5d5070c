use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    geometry::{Cuboid, Dimensions, Point},
    id::{BinId, ContainerId, ItemId},
};

/// A box waiting to be packed.
///
/// Items keep their input size forever. Once a session finds room for an item
/// it records a `Placement`, and that placement never changes afterwards.
#[derive(Debug, Clone)]
pub struct Item {
    pub(crate) id: ItemId,
    pub(crate) size: Dimensions,
    pub(crate) placement: Option<Placement>,
}

impl Item {
    pub(crate) fn new(id: ItemId, size: Dimensions) -> Self {
        Self {
            id,
            size,
            placement: None,
        }
    }

    #[inline]
    pub fn id(&self) -> ItemId {
        self.id
    }

    #[inline]
    pub fn size(&self) -> Dimensions {
        self.size
    }

    #[inline]
    pub fn placement(&self) -> Option<&Placement> {
        self.placement.as_ref()
    }

    #[inline]
    pub fn is_placed(&self) -> bool {
        self.placement.is_some()
    }

    /// The region this item occupies, if it has been placed.
    pub fn cuboid(&self) -> Option<Cuboid> {
        self.placement
            .as_ref()
            .map(|placement| Cuboid::new(placement.position, self.size))
    }

    pub(crate) fn volume(&self) -> f64 {
        self.size.volume()
    }
}

/// Where an item ended up.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    pub position: Point,
    pub container: ContainerId,

    /// The bin that was reserved for this item.
    pub bin: BinId,
}

/// The result of trying to place a single item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Placed(ItemId, Placement),

    /// Nothing currently available could hold the item. This is an expected
    /// result, not an error; the session moves on to the next item.
    Unplaced(ItemId),
}

impl Outcome {
    pub fn item(&self) -> ItemId {
        match self {
            Outcome::Placed(id, _) | Outcome::Unplaced(id) => *id,
        }
    }
}

/// Totals from a call to `PackingSession::run`.
#[derive(Debug, Clone, PartialEq)]
pub struct PackSummary {
    pub placed: usize,
    pub unplaced: Vec<ItemId>,
    pub containers: usize,

    /// Packed item volume divided by the total volume of every container.
    pub fill_ratio: f64,
}

/// Everything a consumer needs to draw a single container: its root bin and the
/// items that were packed into it.
#[derive(Debug, Clone)]
pub struct ContainerView<'a> {
    pub id: ContainerId,
    pub root: BinId,
    pub items: Vec<&'a Item>,
}

#[derive(Debug, Error)]
pub enum PackError {
    #[error("Dimensions {dimensions} are degenerate; every extent must be positive and finite")]
    DegenerateDimensions { dimensions: Dimensions },

    #[error("No container with ID {id} exists in this session")]
    UnknownContainer { id: ContainerId },
}
