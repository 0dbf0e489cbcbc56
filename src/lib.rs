//! This crate exposes two ordered-key containers built on Binary Search
//! Trees (BSTs) and the plumbing of a benchmarking exercise that compares
//! them.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree stores keys in `Node`s with up to two children,
//! keeping every key in a node's left subtree less than the node's own key
//! and every key in its right subtree greater. Searching therefore takes
//! `O(height)` — which is only `O(lg N)` if the tree stays balanced.
//! Feeding a plain BST its keys in sorted order produces the worst case: a
//! chain of height `N - 1`.
//!
//! ## The two implementations
//!
//! - [`avl`] is a self-balancing (AVL) tree. Each node caches the height
//!   of its subtree; insert and remove rebalance every ancestor of the
//!   touched node with single or double rotations, keeping sibling
//!   subtrees within one level of each other. Height stays `O(lg N)`
//!   regardless of input order.
//! - [`bst`] is the unbalanced baseline: the same ordered-set contract
//!   with no rebalancing, so input order decides its shape.
//!
//! The `ordering` benchmark drives both trees with ascending-sorted and
//! shuffled insertion workloads; [`record`] loads the player data file the
//! exercise indexes and [`command`] interprets line-oriented instructions
//! against the AVL tree.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod avl;
pub mod bst;
pub mod command;
pub mod error;
pub mod record;

pub use error::Error;
