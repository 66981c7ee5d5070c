use crate::{
    geometry::Dimensions,
    id::{BinId, ContainerCounter, ContainerId, ItemId},
    strategy::PlacementStrategy,
    tree::SpaceTree,
    types::{ContainerView, Item, Outcome, PackError, PackSummary},
};

/// Size and limit for containers opened on demand.
#[derive(Debug, Clone, Copy)]
struct Overflow {
    size: Dimensions,
    max_containers: Option<usize>,
}

/// Holds all of the state for a single packing run: the containers, the space
/// tree that tracks their free space, and the items in input order.
///
/// Items are placed strictly in the order they were added. For every item the
/// containers are searched in the order they were opened and the first one
/// the strategy finds room in wins. If none has room and overflow is enabled,
/// a fresh container is opened for the item.
pub struct PackingSession {
    strategy: Box<dyn PlacementStrategy>,
    tree: SpaceTree,
    items: Vec<Item>,

    /// Index of the next item that hasn't been attempted yet.
    cursor: usize,
    containers: ContainerCounter,
    overflow: Option<Overflow>,
}

impl PackingSession {
    pub fn new(strategy: Box<dyn PlacementStrategy>) -> Self {
        log::trace!("Starting new packing session using {}", strategy.name());

        Self {
            strategy,
            tree: SpaceTree::new(),
            items: Vec::new(),
            cursor: 0,
            containers: ContainerCounter::new(),
            overflow: None,
        }
    }

    pub fn add_container(&mut self, size: Dimensions) -> Result<ContainerId, PackError> {
        size.validate()?;

        let id = self.containers.next();
        self.tree.add_root(id, size);

        Ok(id)
    }

    pub fn add_item(&mut self, size: Dimensions) -> Result<ItemId, PackError> {
        size.validate()?;

        let id = ItemId(self.items.len());
        self.items.push(Item::new(id, size));

        Ok(id)
    }

    /// Lets the session open containers of `size` whenever an item doesn't fit
    /// in any open container, until the session holds `max_containers`.
    pub fn set_overflow(
        &mut self,
        size: Dimensions,
        max_containers: Option<usize>,
    ) -> Result<(), PackError> {
        size.validate()?;

        self.overflow = Some(Overflow {
            size,
            max_containers,
        });

        Ok(())
    }

    /// Attempts the next item that hasn't been attempted yet, or returns `None`
    /// when every item has had its turn.
    pub fn place_next(&mut self) -> Option<Outcome> {
        if self.cursor >= self.items.len() {
            return None;
        }

        let id = ItemId(self.cursor);
        self.cursor += 1;

        Some(self.place(id))
    }

    /// Attempts every remaining item in input order.
    pub fn run(&mut self) -> PackSummary {
        let pending = self.items.len() - self.cursor;
        log::trace!("Packing {} items", pending);

        while self.place_next().is_some() {}

        let summary = self.summary();

        log::trace!(
            "Finished packing: {} placed, {} unplaced, {} containers",
            summary.placed,
            summary.unplaced.len(),
            summary.containers
        );

        summary
    }

    pub fn summary(&self) -> PackSummary {
        let placed_volume: f64 = self
            .items
            .iter()
            .filter(|item| item.is_placed())
            .map(Item::volume)
            .sum();

        let container_volume: f64 = self
            .tree
            .roots()
            .iter()
            .map(|&root| self.tree.get(root).geometry().volume())
            .sum();

        let fill_ratio = if container_volume > 0.0 {
            placed_volume / container_volume
        } else {
            0.0
        };

        PackSummary {
            placed: self.items.iter().filter(|item| item.is_placed()).count(),
            unplaced: self.unplaced().collect(),
            containers: self.tree.roots().len(),
            fill_ratio,
        }
    }

    #[inline]
    pub fn tree(&self) -> &SpaceTree {
        &self.tree
    }

    #[inline]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[inline]
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id.0)
    }

    #[inline]
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Every container in the order it was opened, along with its root bin.
    pub fn containers(&self) -> impl Iterator<Item = (ContainerId, BinId)> + '_ {
        self.tree
            .roots()
            .iter()
            .map(move |&root| (self.tree.get(root).container(), root))
    }

    /// Items that have been attempted but didn't fit anywhere.
    pub fn unplaced(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items[..self.cursor]
            .iter()
            .filter(|item| !item.is_placed())
            .map(Item::id)
    }

    pub fn container_view(&self, id: ContainerId) -> Result<ContainerView<'_>, PackError> {
        let root = self
            .tree
            .root_of(id)
            .ok_or(PackError::UnknownContainer { id })?;

        let items = self
            .items
            .iter()
            .filter(|item| {
                item.placement()
                    .map(|placement| placement.container == id)
                    .unwrap_or(false)
            })
            .collect();

        Ok(ContainerView { id, root, items })
    }

    fn place(&mut self, id: ItemId) -> Outcome {
        let size = self.items[id.0].size;

        let bin = match self.find_bin(size) {
            Some(bin) => bin,
            None => {
                log::debug!("Item {} ({}) did not fit in any container", id, size);
                return Outcome::Unplaced(id);
            }
        };

        self.tree.subdivide(bin, size);

        if !self.tree.get(bin).is_root() {
            self.tree.resolve_alternates(bin);
        }

        let placement = self.tree.reserve(bin, &mut self.items[id.0]);

        log::debug!(
            "Placed item {} ({}) in container {} at {}",
            id,
            size,
            placement.container,
            placement.position
        );

        Outcome::Placed(id, placement)
    }

    fn find_bin(&mut self, size: Dimensions) -> Option<BinId> {
        for &root in self.tree.roots() {
            if let Some(bin) = self.strategy.search(&self.tree, root, size) {
                log::trace!("{} found bin {} for {}", self.strategy.name(), bin, size);
                return Some(bin);
            }
        }

        let overflow = self.overflow?;

        if !size.fits_within(&overflow.size) {
            return None;
        }

        if let Some(max) = overflow.max_containers {
            if self.tree.roots().len() >= max {
                log::trace!("Container limit of {} reached", max);
                return None;
            }
        }

        let container = self.containers.next();
        let root = self.tree.add_root(container, overflow.size);

        log::debug!("Opened container {} ({})", container, overflow.size);

        self.strategy.search(&self.tree, root, size)
    }
}
