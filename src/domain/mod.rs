//! Domain layer: the tree model and the relocation engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod envelope;
pub mod error;
pub mod locate;
pub mod node;
pub mod observer;
pub mod relocate;

pub use envelope::settle;
pub use error::{DomainError, DomainResult};
pub use locate::{locate_one, locate_pair, Found, LocateScope, LocatedPair, Placement};
pub use node::{Node, NodePath, PostOrderIterator, Tree, TreeIterator};
pub use observer::{EventLog, NodeRef, NoopObserver, RelocationEvent, RelocationKind, RelocationObserver};
pub use relocate::{move_node, nest_node, Relocator, Splice};
