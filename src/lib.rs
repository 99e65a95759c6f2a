//! Relocation engine for ordered rooted trees.
//!
//! Moves a node next to another node, or nests it under one, always on a
//! fresh copy of the tree. A refused request leaves the caller's tree as it
//! was and returns it unchanged.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;

pub use domain::{
    locate_one, locate_pair, move_node, nest_node, DomainError, DomainResult, LocateScope, Node, NodePath,
    Placement, Relocator, Tree,
};
