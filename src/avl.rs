//! A self-balancing Binary Search Tree (an AVL tree). Every insert and
//! delete rebalances the ancestors of the touched node on the way back up,
//! so the tree stays within one level of perfectly balanced and lookups are
//! `O(lg N)` no matter how adversarial the insertion order is.
//!
//! Keys are stored as an ordered set: inserting a key that is already
//! present is a silent no-op.
//!
//! # Examples
//!
//! ```
//! use trees::avl::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert!(!tree.contains(&1));
//!
//! tree.insert(1);
//! tree.insert(3);
//! tree.insert(2);
//!
//! assert!(tree.contains(&2));
//! assert_eq!(tree.len(), 3);
//!
//! // In-order traversal yields the keys in ascending order.
//! let keys: Vec<i32> = tree.iter().copied().collect();
//! assert_eq!(keys, [1, 2, 3]);
//!
//! assert!(tree.remove(&2));
//! assert!(!tree.contains(&2));
//! ```

use std::cmp::Ordering;

use crate::error::Error;

/// An owned subtree: either empty or a boxed node that exclusively owns both
/// of its children.
type Link<K> = Option<Box<Node<K>>>;

struct Node<K> {
    key: K,
    left: Link<K>,
    right: Link<K>,
    // Cached height of the subtree rooted here. A node with no children has
    // height 0; an absent subtree has height -1.
    height: i32,
}

impl<K> Node<K> {
    fn new(key: K) -> Box<Self> {
        Box::new(Node {
            key,
            left: None,
            right: None,
            height: 0,
        })
    }

    /// Recomputes this node's cached height from its children's caches.
    /// Must be called after any structural change beneath the node.
    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    fn balance_factor(&self) -> i32 {
        height(&self.left) - height(&self.right)
    }
}

/// Height of a possibly-absent subtree: -1 when empty, else the cached
/// height. Never recomputed by recursion; that would defeat the `O(lg N)`
/// rebalance cost.
fn height<K>(link: &Link<K>) -> i32 {
    link.as_ref().map_or(-1, |node| node.height)
}

/// A self-balancing ordered set of keys.
pub struct Tree<K> {
    root: Link<K>,
    len: usize,
}

impl<K> Default for Tree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Tree<K> {
    /// Generates a new, empty `Tree`.
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Returns how many keys the tree currently holds.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Removes every key from the tree.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// The height of the tree: -1 when empty, 0 for a single key. With the
    /// balance invariant maintained this never exceeds
    /// `1.4405 * lg(n + 2) - 0.3277`.
    pub fn height(&self) -> i32 {
        height(&self.root)
    }

    /// Returns an iterator over the keys in ascending order. Each call
    /// starts a fresh pass over the current tree state; while the iterator
    /// is alive the borrow checker forbids structural mutation.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(&self.root)
    }

    /// Walks the whole tree recomputing every subtree's true height
    /// bottom-up and reports each node whose cached height or balance
    /// factor disagrees. A non-empty result always means a bookkeeping bug
    /// in insert/remove/rotation, never a user-facing error; normal
    /// operations do not call this.
    pub fn check_invariants(&self) -> Vec<Violation<'_, K>> {
        let mut violations = Vec::new();
        check_at(&self.root, &mut violations);
        violations
    }
}

impl<K: Ord> Tree<K> {
    /// Inserts a key. A duplicate key is silently ignored: no error, no
    /// structural change. Callers must not assume `insert` signals whether
    /// the key was new.
    ///
    /// # Examples
    ///
    /// ```
    /// use trees::avl::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(7);
    /// tree.insert(7);
    ///
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K) {
        let mut inserted = false;
        self.root = Some(insert_at(self.root.take(), key, &mut inserted));
        if inserted {
            self.len += 1;
        }
    }

    /// Removes a key, returning `true` if it was present. Removing an
    /// absent key is a no-op, not an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use trees::avl::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(7);
    ///
    /// assert!(tree.remove(&7));
    /// assert!(!tree.remove(&7));
    /// ```
    pub fn remove(&mut self, key: &K) -> bool {
        let mut removed = false;
        self.root = remove_at(self.root.take(), key, &mut removed);
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// Returns `true` if the key is present. Pure descent: no mutation, no
    /// rebalancing.
    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Returns a reference to the stored key equal to `key`, if any. Useful
    /// when keys carry more data than their ordering compares.
    pub fn get(&self, key: &K) -> Option<&K> {
        let mut node = self.root.as_deref();
        while let Some(n) = node {
            match key.cmp(&n.key) {
                Ordering::Less => node = n.left.as_deref(),
                Ordering::Greater => node = n.right.as_deref(),
                Ordering::Equal => return Some(&n.key),
            }
        }
        None
    }

    /// Returns the smallest key, or [`Error::Underflow`] when the tree is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use trees::avl::Tree;
    /// use trees::Error;
    ///
    /// let mut tree = Tree::new();
    /// assert!(matches!(tree.min(), Err(Error::Underflow)));
    ///
    /// tree.insert(7);
    /// assert_eq!(tree.min().unwrap(), &7);
    /// ```
    pub fn min(&self) -> Result<&K, Error> {
        let mut node = self.root.as_deref().ok_or(Error::Underflow)?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Ok(&node.key)
    }

    /// Returns the largest key, or [`Error::Underflow`] when the tree is
    /// empty.
    pub fn max(&self) -> Result<&K, Error> {
        let mut node = self.root.as_deref().ok_or(Error::Underflow)?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Ok(&node.key)
    }
}

impl<'a, K> IntoIterator for &'a Tree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

/// Inserts into the subtree and returns its (possibly new) root. The caller
/// stores the returned root in its own child slot, so ownership threads
/// back up the recursion without parent pointers.
fn insert_at<K: Ord>(link: Link<K>, key: K, inserted: &mut bool) -> Box<Node<K>> {
    let Some(mut node) = link else {
        *inserted = true;
        return Node::new(key);
    };
    match key.cmp(&node.key) {
        Ordering::Less => node.left = Some(insert_at(node.left.take(), key, inserted)),
        Ordering::Greater => node.right = Some(insert_at(node.right.take(), key, inserted)),
        // Duplicate: leave the subtree untouched.
        Ordering::Equal => return node,
    }
    rebalance(node)
}

/// Removes `key` from the subtree and returns its new root. Every ancestor
/// on the return path is rebalanced; a delete can shrink heights at several
/// levels.
fn remove_at<K: Ord>(link: Link<K>, key: &K, removed: &mut bool) -> Link<K> {
    let mut node = link?;
    match key.cmp(&node.key) {
        Ordering::Less => node.left = remove_at(node.left.take(), key, removed),
        Ordering::Greater => node.right = remove_at(node.right.take(), key, removed),
        Ordering::Equal => {
            *removed = true;
            node = match (node.left.take(), node.right.take()) {
                (None, None) => return None,
                (Some(child), None) | (None, Some(child)) => child,
                (Some(left), Some(right)) => {
                    // Two children: promote the smallest key of the right
                    // subtree into this node and delete it down there. The
                    // secondary pass rebalances each level it touched on
                    // its own unwind.
                    let (promoted, new_right) = remove_min(right);
                    node.key = promoted;
                    node.left = Some(left);
                    node.right = new_right;
                    node
                }
            };
        }
    }
    Some(rebalance(node))
}

/// Deletes the leftmost node of the subtree, handing back its key and the
/// subtree's new root. Rebalances every level on the way back up, exactly
/// as a keyed delete descending to the minimum would.
fn remove_min<K>(mut node: Box<Node<K>>) -> (K, Link<K>) {
    match node.left.take() {
        Some(left) => {
            let (min, new_left) = remove_min(left);
            node.left = new_left;
            (min, Some(rebalance(node)))
        }
        None => {
            let node = *node;
            (node.key, node.right)
        }
    }
}

/// Restores the balance invariant at `node`, assuming its subtrees are
/// valid AVL trees and `node` itself is at most one past the allowed
/// imbalance. Returns the new local root. The tie rule (`>=`) favors the
/// single rotation on both sides.
fn rebalance<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    let bf = node.balance_factor();
    if bf > 1 {
        let left = node
            .left
            .as_deref()
            .expect("left-heavy node must have a left child");
        if height(&left.left) >= height(&left.right) {
            rotate_right(node)
        } else {
            rotate_left_right(node)
        }
    } else if bf < -1 {
        let right = node
            .right
            .as_deref()
            .expect("right-heavy node must have a right child");
        if height(&right.right) >= height(&right.left) {
            rotate_left(node)
        } else {
            rotate_right_left(node)
        }
    } else {
        node.update_height();
        node
    }
}

/// Promotes the left child. Corrects a left-left imbalance.
///
/// ```text
///       node            new_root
///      /    \            /    \
///  new_root  z   ->     x     node
///   /  \                      /  \
///  x    y                    y    z
/// ```
///
/// Heights are recomputed child before parent; nothing outside this
/// neighborhood is touched.
fn rotate_right<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    let mut new_root = node.left.take().expect("rotate_right requires a left child");
    node.left = new_root.right.take();
    node.update_height();
    new_root.right = Some(node);
    new_root.update_height();
    new_root
}

/// Promotes the right child. Corrects a right-right imbalance; mirror of
/// [`rotate_right`].
fn rotate_left<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    let mut new_root = node
        .right
        .take()
        .expect("rotate_left requires a right child");
    node.right = new_root.left.take();
    node.update_height();
    new_root.left = Some(node);
    new_root.update_height();
    new_root
}

/// Double rotation for a left-right imbalance: rotate the left child's
/// right subtree up, then rotate the result up.
fn rotate_left_right<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    let left = node
        .left
        .take()
        .expect("rotate_left_right requires a left child");
    node.left = Some(rotate_left(left));
    rotate_right(node)
}

/// Double rotation for a right-left imbalance; mirror of
/// [`rotate_left_right`].
fn rotate_right_left<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    let right = node
        .right
        .take()
        .expect("rotate_right_left requires a right child");
    node.right = Some(rotate_right(right));
    rotate_left(node)
}

/// An in-order (ascending) borrowing iterator over a [`Tree`].
pub struct Iter<'a, K> {
    stack: Vec<&'a Node<K>>,
}

impl<'a, K> Iter<'a, K> {
    fn new(root: &'a Link<K>) -> Self {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left(root);
        iter
    }

    fn push_left(&mut self, mut link: &'a Link<K>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = &node.left;
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let node = self.stack.pop()?;
        self.push_left(&node.right);
        Some(&node.key)
    }
}

/// A single invariant breach found by [`Tree::check_invariants`].
#[derive(Debug, PartialEq, Eq)]
pub struct Violation<'a, K> {
    /// The key stored in the offending node.
    pub key: &'a K,
    /// Which invariant the node breaks.
    pub kind: ViolationKind,
}

/// The ways a node can break the AVL bookkeeping invariants.
#[derive(Debug, PartialEq, Eq)]
pub enum ViolationKind {
    /// The node's cached height disagrees with the height recomputed from
    /// its children.
    StaleHeight {
        /// The height cached in the node.
        stored: i32,
        /// The height recomputed bottom-up.
        computed: i32,
    },
    /// The node's subtrees differ in height by more than one.
    Unbalanced {
        /// `height(left) - height(right)`, computed bottom-up.
        factor: i32,
    },
}

/// Recomputes the subtree's true height bottom-up, collecting violations.
/// The returned height lets the parent frame validate its own cache.
fn check_at<'a, K>(link: &'a Link<K>, violations: &mut Vec<Violation<'a, K>>) -> i32 {
    let Some(node) = link else {
        return -1;
    };
    let left = check_at(&node.left, violations);
    let right = check_at(&node.right, violations);
    let computed = 1 + left.max(right);
    if node.height != computed {
        violations.push(Violation {
            key: &node.key,
            kind: ViolationKind::StaleHeight {
                stored: node.height,
                computed,
            },
        });
    }
    if (left - right).abs() > 1 {
        violations.push(Violation {
            key: &node.key,
            kind: ViolationKind::Unbalanced {
                factor: left - right,
            },
        });
    }
    computed
}
