use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifies a root container. Every bin in a container's subtree carries the
/// same `ContainerId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct ContainerId(u32);

impl ContainerId {
    #[inline]
    pub fn new(id: u32) -> Self {
        ContainerId(id)
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Hands out container IDs for a single packing session, starting at 1.
#[derive(Debug, Clone)]
pub(crate) struct ContainerCounter {
    last_id: u32,
}

impl ContainerCounter {
    pub fn new() -> Self {
        Self { last_id: 0 }
    }

    pub fn next(&mut self) -> ContainerId {
        self.last_id += 1;
        ContainerId(self.last_id)
    }
}

/// Address of a bin inside a `SpaceTree` arena. Stays valid for the lifetime of
/// the tree, even after the bin has been pruned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct BinId(pub(crate) usize);

impl BinId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BinId {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "#{}", self.0)
    }
}

/// Position of an item in the session's input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct ItemId(pub(crate) usize);

impl ItemId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}
