//! Spacepack is a small library for packing boxes into 3D containers. It was
//! built to drive Boxtree, a command line tool for planning how a list of boxes
//! fills a set of containers.
//!
//! Free space in each container is tracked by a [`SpaceTree`][SpaceTree]. An
//! item is always placed in the minimum corner of a free bin, and the space it
//! leaves behind becomes new child bins. Which free bin an item goes into is up
//! to a [`PlacementStrategy`][PlacementStrategy]; several are built in and
//! named by [`StrategyKind`][StrategyKind].
//!
//! ## Example
//! ```
//! use spacepack::{Dimensions, PackingSession, StrategyKind};
//!
//! // Pick a strategy and open a container.
//! let mut session = PackingSession::new(StrategyKind::FirstFit.strategy());
//! let container = session.add_container(Dimensions::new(10.0, 10.0, 10.0)).unwrap();
//!
//! // Items are placed in the order they're added.
//! session.add_item(Dimensions::new(4.0, 4.0, 4.0)).unwrap();
//! session.add_item(Dimensions::new(3.0, 3.0, 3.0)).unwrap();
//!
//! let summary = session.run();
//! assert_eq!(summary.placed, 2);
//!
//! // Each container can be inspected on its own.
//! let view = session.container_view(container).unwrap();
//! assert_eq!(view.items.len(), 2);
//! ```
//!
//! [SpaceTree]: struct.SpaceTree.html
//! [PlacementStrategy]: trait.PlacementStrategy.html
//! [StrategyKind]: enum.StrategyKind.html

mod geometry;
mod id;
mod session;
mod strategy;
mod tree;
mod types;

pub use geometry::*;
pub use id::{BinId, ContainerId, ItemId};
pub use session::*;
pub use strategy::*;
pub use tree::*;
pub use types::*;
