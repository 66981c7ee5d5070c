use std::{collections::VecDeque, fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{geometry::Dimensions, id::BinId, tree::SpaceTree};

/// Decides which free bin under a root receives the next item.
///
/// Implementations must only return bins that are available and large enough
/// for `size`, and must return the same bin every time they're given the same
/// tree and size.
pub trait PlacementStrategy {
    fn name(&self) -> &'static str;

    fn search(&self, tree: &SpaceTree, root: BinId, size: Dimensions) -> Option<BinId>;
}

fn is_candidate(tree: &SpaceTree, bin: BinId, size: Dimensions) -> bool {
    tree.get(bin).is_available() && tree.fits(bin, size)
}

/// Picks the candidate that `better` prefers, walking in preorder so that ties
/// go to whichever bin comes first.
fn best_in_preorder<K, F, B>(
    tree: &SpaceTree,
    root: BinId,
    size: Dimensions,
    key: F,
    better: B,
) -> Option<BinId>
where
    F: Fn(BinId) -> K,
    B: Fn(&K, &K) -> bool,
{
    let mut best: Option<(BinId, K)> = None;

    for bin in tree.preorder(root) {
        if !is_candidate(tree, bin, size) {
            continue;
        }

        let candidate_key = key(bin);
        let replace = match &best {
            Some((_, best_key)) => better(&candidate_key, best_key),
            None => true,
        };

        if replace {
            best = Some((bin, candidate_key));
        }
    }

    best.map(|(bin, _)| bin)
}

/// Depth-first, returning the first bin that fits.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFit;

impl PlacementStrategy for FirstFit {
    fn name(&self) -> &'static str {
        "first-fit"
    }

    fn search(&self, tree: &SpaceTree, root: BinId, size: Dimensions) -> Option<BinId> {
        tree.preorder(root)
            .find(|&bin| is_candidate(tree, bin, size))
    }
}

/// Level by level, returning the shallowest bin that fits.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreadthFirst;

impl PlacementStrategy for BreadthFirst {
    fn name(&self) -> &'static str {
        "breadth-first"
    }

    fn search(&self, tree: &SpaceTree, root: BinId, size: Dimensions) -> Option<BinId> {
        let mut queue = VecDeque::new();
        queue.push_back(root);

        while let Some(bin) = queue.pop_front() {
            if is_candidate(tree, bin, size) {
                return Some(bin);
            }

            queue.extend(tree.children(bin).iter().copied());
        }

        None
    }
}

/// The smallest bin that fits, to keep large regions open for later items.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestFit;

impl PlacementStrategy for BestFit {
    fn name(&self) -> &'static str {
        "best-fit"
    }

    fn search(&self, tree: &SpaceTree, root: BinId, size: Dimensions) -> Option<BinId> {
        best_in_preorder(
            tree,
            root,
            size,
            |bin| tree.get(bin).geometry().volume(),
            |candidate: &f64, best: &f64| candidate < best,
        )
    }
}

/// The largest bin that fits.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorstFit;

impl PlacementStrategy for WorstFit {
    fn name(&self) -> &'static str {
        "worst-fit"
    }

    fn search(&self, tree: &SpaceTree, root: BinId, size: Dimensions) -> Option<BinId> {
        best_in_preorder(
            tree,
            root,
            size,
            |bin| tree.get(bin).geometry().volume(),
            |candidate: &f64, best: &f64| candidate > best,
        )
    }
}

/// The deepest bin that fits.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeepestFirst;

impl PlacementStrategy for DeepestFirst {
    fn name(&self) -> &'static str {
        "deepest-first"
    }

    fn search(&self, tree: &SpaceTree, root: BinId, size: Dimensions) -> Option<BinId> {
        best_in_preorder(
            tree,
            root,
            size,
            |bin| tree.get(bin).depth(),
            |candidate: &usize, best: &usize| candidate > best,
        )
    }
}

/// Names one of the built-in strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum StrategyKind {
    FirstFit,
    BreadthFirst,
    BestFit,
    WorstFit,
    DeepestFirst,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::FirstFit,
        StrategyKind::BreadthFirst,
        StrategyKind::BestFit,
        StrategyKind::WorstFit,
        StrategyKind::DeepestFirst,
    ];

    pub fn strategy(self) -> Box<dyn PlacementStrategy> {
        match self {
            StrategyKind::FirstFit => Box::new(FirstFit),
            StrategyKind::BreadthFirst => Box::new(BreadthFirst),
            StrategyKind::BestFit => Box::new(BestFit),
            StrategyKind::WorstFit => Box::new(WorstFit),
            StrategyKind::DeepestFirst => Box::new(DeepestFirst),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::FirstFit => "first-fit",
            StrategyKind::BreadthFirst => "breadth-first",
            StrategyKind::BestFit => "best-fit",
            StrategyKind::WorstFit => "worst-fit",
            StrategyKind::DeepestFirst => "deepest-first",
        }
    }
}

impl Default for StrategyKind {
    fn default() -> Self {
        StrategyKind::FirstFit
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(value: &str) -> Result<StrategyKind, Self::Err> {
        StrategyKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == value)
            .ok_or_else(|| {
                format!(
                    "Invalid strategy '{}'. Valid options are 'first-fit', 'breadth-first', \
                     'best-fit', 'worst-fit' and 'deepest-first'.",
                    value
                )
            })
    }
}
