//! The space tree: an arena of bins that tracks which parts of each container
//! are still free.
//!
//! Placing an item at the minimum corner of a bin leaves up to three slabs of
//! free space, one past the item along each axis. Each slab can be cut in four
//! ways depending on whether it extends over the item's footprint along the
//! other two axes, so subdivision creates all four alternates (kinds `A`
//! through `D`) and defers the choice. The first time an item lands in one of
//! those alternates, its siblings of every other kind are pruned, which leaves
//! one consistent partition of the parent.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    geometry::{Axis, Cuboid, Dimensions, Point, TOLERANCE},
    id::{BinId, ContainerId},
    types::{Item, Placement},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinKind {
    Root,
    A,
    B,
    C,
    D,
}

impl BinKind {
    pub const ALTERNATES: [BinKind; 4] = [BinKind::A, BinKind::B, BinKind::C, BinKind::D];
}

impl fmt::Display for BinKind {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            BinKind::Root => "root",
            BinKind::A => "A",
            BinKind::B => "B",
            BinKind::C => "C",
            BinKind::D => "D",
        };

        formatter.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinState {
    Empty,
    Full,
}

impl fmt::Display for BinState {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BinState::Empty => formatter.write_str("empty"),
            BinState::Full => formatter.write_str("full"),
        }
    }
}

/// A node of the space tree.
#[derive(Debug, Clone)]
pub struct Bin {
    container: ContainerId,
    kind: BinKind,
    state: BinState,
    geometry: Cuboid,
    parent: Option<BinId>,
    children: Vec<BinId>,

    /// The axis group this bin was created for. Roots have none.
    axis: Option<Axis>,
    depth: usize,
    pruned: bool,
}

impl Bin {
    #[inline]
    pub fn container(&self) -> ContainerId {
        self.container
    }

    #[inline]
    pub fn kind(&self) -> BinKind {
        self.kind
    }

    #[inline]
    pub fn state(&self) -> BinState {
        self.state
    }

    #[inline]
    pub fn geometry(&self) -> &Cuboid {
        &self.geometry
    }

    #[inline]
    pub fn parent(&self) -> Option<BinId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[BinId] {
        &self.children
    }

    #[inline]
    pub fn axis(&self) -> Option<Axis> {
        self.axis
    }

    /// Distance from the root; roots are at depth 0.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.kind == BinKind::Root
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.state == BinState::Empty
    }

    /// Whether this bin lost the alternate resolution of its parent. Pruned
    /// bins stay in the arena but can't be reached from any root.
    #[inline]
    pub fn is_pruned(&self) -> bool {
        self.pruned
    }

    /// Whether the bin can currently receive an item.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.is_empty() && !self.pruned
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpaceTree {
    nodes: Vec<Bin>,
    roots: Vec<BinId>,
}

impl SpaceTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new top-level container anchored at the origin.
    pub fn add_root(&mut self, container: ContainerId, size: Dimensions) -> BinId {
        let id = self.push(Bin {
            container,
            kind: BinKind::Root,
            state: BinState::Empty,
            geometry: Cuboid::new(Point::default(), size),
            parent: None,
            children: Vec::new(),
            axis: None,
            depth: 0,
            pruned: false,
        });

        log::trace!("Created root bin {} for container {} ({})", id, container, size);

        self.roots.push(id);
        id
    }

    /// Splits the space left over in `bin` once an item of `size` sits in its
    /// minimum corner.
    ///
    /// Every axis with leftover extent above `TOLERANCE` gets four alternate
    /// children, one per kind, in axis order and then kind order. An item that
    /// fills the bin exactly produces no children.
    ///
    /// Panics if the bin is not available, was already subdivided, or can't
    /// hold the item.
    pub fn subdivide(&mut self, bin: BinId, size: Dimensions) -> Vec<BinId> {
        let parent = self.get(bin);

        assert!(
            parent.is_available(),
            "Cannot subdivide bin {}: it is {} and {}",
            bin,
            parent.state,
            if parent.pruned { "pruned" } else { "live" },
        );
        assert!(
            parent.is_leaf(),
            "Cannot subdivide bin {}: it was already subdivided",
            bin
        );
        assert!(
            size.fits_within(&parent.geometry.size),
            "Cannot subdivide bin {} ({}) around an item of size {}",
            bin,
            parent.geometry.size,
            size
        );

        let container = parent.container;
        let geometry = parent.geometry;
        let depth = parent.depth + 1;

        let mut created = Vec::new();

        for &axis in Axis::ALL.iter() {
            if geometry.size.extent(axis) - size.extent(axis) <= TOLERANCE {
                continue;
            }

            let origin = geometry.origin.offset(axis, size.extent(axis));

            for &kind in BinKind::ALTERNATES.iter() {
                let child = self.push(Bin {
                    container,
                    kind,
                    state: BinState::Empty,
                    geometry: Cuboid::new(origin, alternate_size(axis, kind, geometry.size, size)),
                    parent: Some(bin),
                    children: Vec::new(),
                    axis: Some(axis),
                    depth,
                    pruned: false,
                });

                created.push(child);
            }
        }

        log::trace!(
            "Subdivided bin {} ({}) around {}: {} children",
            bin,
            geometry.size,
            size,
            created.len()
        );

        self.nodes[bin.0].children.extend(created.iter().copied());
        created
    }

    /// Commits the parent of `bin` to `bin`'s kind, pruning every sibling of a
    /// different kind. Returns how many siblings were pruned.
    ///
    /// A parent's children all come from its single subdivision, so afterwards
    /// each axis group of that parent holds exactly one bin. Bins under any
    /// other parent are not touched.
    ///
    /// Panics when called on a root.
    pub fn resolve_alternates(&mut self, bin: BinId) -> usize {
        let node = self.get(bin);
        let kind = node.kind;
        let parent = match node.parent {
            Some(parent) => parent,
            None => panic!("Cannot resolve alternates of root bin {}", bin),
        };

        let siblings = std::mem::take(&mut self.nodes[parent.0].children);
        let (kept, pruned): (Vec<BinId>, Vec<BinId>) = siblings
            .into_iter()
            .partition(|sibling| self.nodes[sibling.0].kind == kind);

        for sibling in &pruned {
            let node = &mut self.nodes[sibling.0];

            debug_assert!(
                node.is_empty() && node.is_leaf(),
                "Pruned bin {} was already in use",
                sibling
            );

            node.pruned = true;
        }

        if !pruned.is_empty() {
            log::trace!(
                "Resolved children of bin {} to kind {}, pruned {}",
                parent,
                kind,
                pruned.len()
            );
        }

        self.nodes[parent.0].children = kept;
        pruned.len()
    }

    /// Marks `bin` as occupied by `item` and records the placement on the item.
    ///
    /// Panics if the bin isn't available or the item was already placed.
    pub fn reserve(&mut self, bin: BinId, item: &mut Item) -> Placement {
        let node = &mut self.nodes[bin.0];

        assert!(
            node.is_available(),
            "Cannot reserve bin {}: it is not available",
            bin
        );
        assert!(
            item.placement.is_none(),
            "Item {} was already placed",
            item.id
        );

        node.state = BinState::Full;

        let placement = Placement {
            position: node.geometry.origin,
            container: node.container,
            bin,
        };
        item.placement = Some(placement);

        placement
    }

    /// Whether an item of `size` fits in `bin`'s geometry. Doesn't consider
    /// whether the bin is free.
    #[inline]
    pub fn fits(&self, bin: BinId, size: Dimensions) -> bool {
        size.fits_within(&self.get(bin).geometry.size)
    }

    /// Looks up a bin. Panics if the ID didn't come from this tree.
    #[inline]
    pub fn get(&self, bin: BinId) -> &Bin {
        &self.nodes[bin.0]
    }

    #[inline]
    pub fn roots(&self) -> &[BinId] {
        &self.roots
    }

    pub fn root_of(&self, container: ContainerId) -> Option<BinId> {
        self.roots
            .iter()
            .copied()
            .find(|&root| self.nodes[root.0].container == container)
    }

    #[inline]
    pub fn children(&self, bin: BinId) -> &[BinId] {
        &self.get(bin).children
    }

    #[inline]
    pub fn parent(&self, bin: BinId) -> Option<BinId> {
        self.get(bin).parent
    }

    #[inline]
    pub fn is_leaf(&self, bin: BinId) -> bool {
        self.get(bin).is_leaf()
    }

    /// Every bin reachable from `root`, parents before children, siblings in
    /// creation order.
    pub fn preorder(&self, root: BinId) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![root],
        }
    }

    /// Leaves under `root` that can still receive an item.
    pub fn empty_leaves(&self, root: BinId) -> impl Iterator<Item = BinId> + '_ {
        self.preorder(root).filter(move |&bin| {
            let node = self.get(bin);
            node.is_available() && node.is_leaf()
        })
    }

    /// Number of bins ever created, pruned ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of bins that haven't been pruned.
    pub fn live_len(&self) -> usize {
        self.nodes.iter().filter(|node| !node.pruned).count()
    }

    /// Renders the subtree under `root` as an indented outline, one bin per
    /// line.
    pub fn display(&self, root: BinId) -> SubtreeDisplay<'_> {
        SubtreeDisplay { tree: self, root }
    }

    fn push(&mut self, bin: Bin) -> BinId {
        let id = BinId(self.nodes.len());
        self.nodes.push(bin);
        id
    }
}

/// Extents of one alternate slab. Along `axis` the slab covers whatever the
/// item left over; along the other two axes each kind picks either the bin's
/// extent or the item's.
fn alternate_size(axis: Axis, kind: BinKind, bin: Dimensions, item: Dimensions) -> Dimensions {
    let rest = bin.extent(axis) - item.extent(axis);

    match axis {
        Axis::Length => {
            let (width, height) = match kind {
                BinKind::A => (bin.width, bin.height),
                BinKind::B => (item.width, bin.height),
                BinKind::C => (bin.width, item.height),
                BinKind::D => (item.width, item.height),
                BinKind::Root => unreachable!("roots are never created by subdivision"),
            };

            Dimensions::new(rest, width, height)
        }
        Axis::Width => {
            let (length, height) = match kind {
                BinKind::A => (item.length, bin.height),
                BinKind::B => (bin.length, bin.height),
                BinKind::C => (item.length, item.height),
                BinKind::D => (bin.length, item.height),
                BinKind::Root => unreachable!("roots are never created by subdivision"),
            };

            Dimensions::new(length, rest, height)
        }
        Axis::Height => {
            let (length, width) = match kind {
                BinKind::A | BinKind::B => (item.length, item.width),
                BinKind::C | BinKind::D => (bin.length, bin.width),
                BinKind::Root => unreachable!("roots are never created by subdivision"),
            };

            Dimensions::new(length, width, rest)
        }
    }
}

pub struct Preorder<'a> {
    tree: &'a SpaceTree,
    stack: Vec<BinId>,
}

impl Iterator for Preorder<'_> {
    type Item = BinId;

    fn next(&mut self) -> Option<BinId> {
        let bin = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(bin).iter().rev().copied());

        Some(bin)
    }
}

pub struct SubtreeDisplay<'a> {
    tree: &'a SpaceTree,
    root: BinId,
}

impl fmt::Display for SubtreeDisplay<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        let base_depth = self.tree.get(self.root).depth;

        for bin in self.tree.preorder(self.root) {
            let node = self.tree.get(bin);
            let indent = (node.depth - base_depth) * 2;

            write!(formatter, "{:indent$}{} {}", "", bin, node.kind, indent = indent)?;

            if let Some(axis) = node.axis {
                write!(formatter, "/{}", axis_name(axis))?;
            }

            writeln!(
                formatter,
                " {} {} @ {}",
                node.state, node.geometry.size, node.geometry.origin
            )?;
        }

        Ok(())
    }
}

fn axis_name(axis: Axis) -> &'static str {
    match axis {
        Axis::Length => "length",
        Axis::Width => "width",
        Axis::Height => "height",
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::id::ItemId;

    fn dims(length: f64, width: f64, height: f64) -> Dimensions {
        Dimensions::new(length, width, height)
    }

    fn tree_with_root(size: Dimensions) -> (SpaceTree, BinId) {
        let mut tree = SpaceTree::new();
        let root = tree.add_root(ContainerId::new(1), size);
        (tree, root)
    }

    fn sizes(tree: &SpaceTree, bins: &[BinId]) -> Vec<Dimensions> {
        bins.iter().map(|&bin| tree.get(bin).geometry.size).collect()
    }

    #[test]
    fn subdivide_creates_twelve_alternates() {
        let (mut tree, root) = tree_with_root(dims(10.0, 10.0, 10.0));
        let children = tree.subdivide(root, dims(4.0, 4.0, 4.0));

        assert_eq!(children.len(), 12);
        assert_eq!(tree.children(root), children.as_slice());

        for &child in &children {
            let node = tree.get(child);
            assert_eq!(node.state(), BinState::Empty);
            assert_eq!(node.container(), ContainerId::new(1));
            assert_eq!(node.parent(), Some(root));
            assert_eq!(node.depth(), 1);
        }

        let length_group = &children[0..4];
        assert_eq!(
            sizes(&tree, length_group),
            vec![
                dims(6.0, 10.0, 10.0),
                dims(6.0, 4.0, 10.0),
                dims(6.0, 10.0, 4.0),
                dims(6.0, 4.0, 4.0),
            ]
        );

        for &child in length_group {
            assert_eq!(tree.get(child).geometry().origin, Point::new(4.0, 0.0, 0.0));
            assert_eq!(tree.get(child).axis(), Some(Axis::Length));
        }

        let kinds: Vec<_> = children.iter().map(|&c| tree.get(c).kind()).collect();
        assert_eq!(&kinds[0..4], &BinKind::ALTERNATES);
        assert_eq!(&kinds[4..8], &BinKind::ALTERNATES);
        assert_eq!(&kinds[8..12], &BinKind::ALTERNATES);

        assert_eq!(
            tree.get(children[4]).geometry().origin,
            Point::new(0.0, 4.0, 0.0)
        );
        assert_eq!(
            tree.get(children[8]).geometry().origin,
            Point::new(0.0, 0.0, 4.0)
        );
    }

    #[test]
    fn exact_fit_produces_no_children() {
        let (mut tree, root) = tree_with_root(dims(10.0, 10.0, 10.0));
        let mut item = Item::new(ItemId(0), dims(10.0, 10.0, 10.0));

        assert!(tree.subdivide(root, item.size()).is_empty());

        let placement = tree.reserve(root, &mut item);

        assert_eq!(tree.get(root).state(), BinState::Full);
        assert_eq!(placement.position, Point::default());
        assert_eq!(placement.container, ContainerId::new(1));
        assert_eq!(item.placement(), Some(&placement));
    }

    #[test]
    fn rounding_leftovers_produce_no_children() {
        let (mut tree, root) = tree_with_root(dims(1.0, 1.0, 1.0));
        let children = tree.subdivide(root, dims(1.0 - 1e-12, 1.0, 1.0));

        assert!(children.is_empty());
    }

    #[test]
    fn only_axes_with_leftover_space_are_split() {
        let (mut tree, root) = tree_with_root(dims(10.0, 10.0, 10.0));
        let children = tree.subdivide(root, dims(10.0, 3.0, 10.0));

        assert_eq!(children.len(), 4);
        for &child in &children {
            assert_eq!(tree.get(child).axis(), Some(Axis::Width));
        }
    }

    #[test]
    fn every_kind_tiles_the_bin() {
        let bin = Cuboid::new(Point::new(1.0, 2.0, 3.0), dims(10.0, 8.0, 6.0));
        let item = dims(3.0, 5.0, 2.0);
        let placed = Cuboid::new(bin.origin, item);

        for &kind in BinKind::ALTERNATES.iter() {
            let mut tree = SpaceTree::new();
            let root = tree.add_root(ContainerId::new(1), bin.size);
            tree.nodes[root.0].geometry = bin;

            let children = tree.subdivide(root, item);
            let first = children
                .iter()
                .copied()
                .find(|&child| tree.get(child).kind() == kind)
                .unwrap();
            tree.resolve_alternates(first);

            let kept: Vec<Cuboid> = tree
                .children(root)
                .iter()
                .map(|&child| *tree.get(child).geometry())
                .collect();
            assert_eq!(kept.len(), 3);

            let total: f64 = kept.iter().map(Cuboid::volume).sum::<f64>() + placed.volume();
            assert!((total - bin.volume()).abs() < 1e-9, "kind {} leaks volume", kind);

            for (index, slab) in kept.iter().enumerate() {
                assert!(bin.contains(slab));
                assert!(!slab.intersects(&placed), "kind {} overlaps the item", kind);

                for other in &kept[index + 1..] {
                    assert!(!slab.intersects(other), "kind {} slabs overlap", kind);
                }
            }
        }
    }

    #[test]
    fn resolving_keeps_one_bin_per_axis_group() {
        let (mut tree, root) = tree_with_root(dims(10.0, 10.0, 10.0));
        let children = tree.subdivide(root, dims(4.0, 4.0, 4.0));

        let chosen = children[6];
        assert_eq!(tree.get(chosen).kind(), BinKind::C);

        let pruned = tree.resolve_alternates(chosen);
        assert_eq!(pruned, 9);

        let kept = tree.children(root);
        assert_eq!(kept, &[children[2], children[6], children[10]]);

        for &child in kept {
            assert_eq!(tree.get(child).kind(), BinKind::C);
        }

        for &child in &children {
            let node = tree.get(child);
            assert_eq!(node.is_pruned(), node.kind() != BinKind::C);
        }

        assert_eq!(tree.preorder(root).count(), 4);
        assert_eq!(tree.live_len(), 4);
        assert_eq!(tree.len(), 13);
    }

    #[test]
    fn resolving_only_touches_the_parents_children() {
        let (mut tree, root) = tree_with_root(dims(10.0, 10.0, 10.0));
        let first = tree.subdivide(root, dims(4.0, 4.0, 4.0));

        let chosen = first[0];
        let grandchildren = tree.subdivide(chosen, dims(2.0, 2.0, 2.0));
        assert_eq!(grandchildren.len(), 12);

        tree.resolve_alternates(chosen);

        assert_eq!(tree.children(chosen), grandchildren.as_slice());
        for &grandchild in &grandchildren {
            assert!(!tree.get(grandchild).is_pruned());
        }

        // The surviving kind-A bins of the width and height groups remain.
        assert_eq!(tree.children(root), &[first[0], first[4], first[8]]);
    }

    #[test]
    fn resolving_twice_is_harmless() {
        let (mut tree, root) = tree_with_root(dims(10.0, 10.0, 10.0));
        let children = tree.subdivide(root, dims(4.0, 4.0, 4.0));

        assert_eq!(tree.resolve_alternates(children[1]), 9);
        assert_eq!(tree.resolve_alternates(children[5]), 0);
        assert_eq!(tree.children(root).len(), 3);
    }

    #[test]
    #[should_panic(expected = "root")]
    fn resolving_a_root_panics() {
        let (mut tree, root) = tree_with_root(dims(10.0, 10.0, 10.0));
        tree.resolve_alternates(root);
    }

    #[test]
    #[should_panic(expected = "not available")]
    fn reserving_twice_panics() {
        let (mut tree, root) = tree_with_root(dims(10.0, 10.0, 10.0));
        let mut first = Item::new(ItemId(0), dims(1.0, 1.0, 1.0));
        let mut second = Item::new(ItemId(1), dims(1.0, 1.0, 1.0));

        tree.reserve(root, &mut first);
        tree.reserve(root, &mut second);
    }

    #[test]
    #[should_panic(expected = "already placed")]
    fn placing_an_item_twice_panics() {
        let (mut tree, root) = tree_with_root(dims(10.0, 10.0, 10.0));
        let children = tree.subdivide(root, dims(5.0, 5.0, 5.0));
        let mut item = Item::new(ItemId(0), dims(5.0, 5.0, 5.0));

        tree.reserve(root, &mut item);
        tree.reserve(children[0], &mut item);
    }

    #[test]
    #[should_panic(expected = "Cannot subdivide")]
    fn subdividing_a_full_bin_panics() {
        let (mut tree, root) = tree_with_root(dims(10.0, 10.0, 10.0));
        let mut item = Item::new(ItemId(0), dims(4.0, 4.0, 4.0));

        tree.reserve(root, &mut item);
        tree.subdivide(root, dims(1.0, 1.0, 1.0));
    }

    #[test]
    #[should_panic(expected = "Cannot subdivide")]
    fn subdividing_around_an_oversized_item_panics() {
        let (mut tree, root) = tree_with_root(dims(10.0, 10.0, 10.0));
        tree.subdivide(root, dims(11.0, 1.0, 1.0));
    }

    #[test]
    fn fits_ignores_state() {
        let (mut tree, root) = tree_with_root(dims(10.0, 10.0, 10.0));
        let mut item = Item::new(ItemId(0), dims(4.0, 4.0, 4.0));
        tree.reserve(root, &mut item);

        assert!(tree.fits(root, dims(10.0, 10.0, 10.0)));
        assert!(!tree.fits(root, dims(11.0, 1.0, 1.0)));
    }

    #[test]
    fn roots_are_found_by_container() {
        let mut tree = SpaceTree::new();
        let first = tree.add_root(ContainerId::new(1), dims(1.0, 1.0, 1.0));
        let second = tree.add_root(ContainerId::new(2), dims(2.0, 2.0, 2.0));

        assert_eq!(tree.roots(), &[first, second]);
        assert_eq!(tree.root_of(ContainerId::new(2)), Some(second));
        assert_eq!(tree.root_of(ContainerId::new(3)), None);
    }

    #[test]
    fn outline() {
        let (mut tree, root) = tree_with_root(dims(10.0, 10.0, 10.0));
        let mut first = Item::new(ItemId(0), dims(4.0, 10.0, 10.0));
        let mut second = Item::new(ItemId(1), dims(6.0, 10.0, 5.0));

        tree.subdivide(root, first.size());
        tree.reserve(root, &mut first);

        let target = tree.children(root)[1];
        tree.subdivide(target, second.size());
        tree.resolve_alternates(target);
        tree.reserve(target, &mut second);

        let outline = tree.display(root).to_string();

        insta::assert_snapshot!(outline.trim_end(), @r###"
        #0 root full 10x10x10 @ (0, 0, 0)
          #2 B/length full 6x10x10 @ (4, 0, 0)
            #5 A/height empty 6x10x5 @ (4, 0, 5)
            #6 B/height empty 6x10x5 @ (4, 0, 5)
            #7 C/height empty 6x10x5 @ (4, 0, 5)
            #8 D/height empty 6x10x5 @ (4, 0, 5)
        "###);
    }
}
