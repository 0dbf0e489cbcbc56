//! An unbalanced Binary Search Tree with the same ordered-set contract as
//! [`crate::avl`] but no rebalancing. It exists as the baseline the
//! benchmark harness compares the AVL tree against: under randomized
//! insertion it behaves well, under sorted insertion it degenerates into a
//! linked list and every operation becomes `O(N)`.
//!
//! Insert and search descend iteratively so that a degenerate tree costs
//! time, not stack frames. `remove` recurses and should not be fed
//! adversarially deep trees.
//!
//! # Examples
//!
//! ```
//! use trees::bst::Tree;
//!
//! let mut tree = Tree::new();
//!
//! assert!(tree.insert(2));
//! assert!(tree.insert(1));
//! // A duplicate is rejected.
//! assert!(!tree.insert(2));
//!
//! assert!(tree.contains(&1));
//! assert_eq!(tree.len(), 2);
//!
//! let keys: Vec<i32> = tree.iter().copied().collect();
//! assert_eq!(keys, [1, 2]);
//! ```

use std::cmp::Ordering;

type Link<K> = Option<Box<Node<K>>>;

struct Node<K> {
    key: K,
    left: Link<K>,
    right: Link<K>,
}

impl<K> Node<K> {
    fn new(key: K) -> Box<Self> {
        Box::new(Node {
            key,
            left: None,
            right: None,
        })
    }
}

/// An unbalanced ordered set of keys.
pub struct Tree<K> {
    root: Link<K>,
    len: usize,
}

impl<K> Default for Tree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Drop for Tree<K> {
    fn drop(&mut self) {
        self.clear();
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

    /// Removes every key from the tree. Tears the nodes down with an
    /// explicit stack: after a sorted workload the tree is an `N`-deep
    /// chain and the default recursive drop would blow the stack.
    pub fn clear(&mut self) {
        let mut stack = Vec::new();
        stack.extend(self.root.take());
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
        self.len = 0;
    }

    /// Returns an iterator over the keys in ascending order, walking the
    /// tree with an explicit stack.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(&self.root)
    }
}

impl<K: Ord> Tree<K> {
    /// Inserts a key, returning `true` if it was new and `false` for a
    /// duplicate. Descends iteratively; sorted input makes the path `O(N)`
    /// long but never deepens the call stack.
    pub fn insert(&mut self, key: K) -> bool {
        let mut link = &mut self.root;
        while let Some(node) = link {
            match key.cmp(&node.key) {
                Ordering::Less => link = &mut node.left,
                Ordering::Greater => link = &mut node.right,
                Ordering::Equal => return false,
            }
        }
        *link = Some(Node::new(key));
        self.len += 1;
        true
    }

    /// Removes a key, returning `true` if it was present. A node with two
    /// children has its key replaced by the smallest key of its right
    /// subtree, which is then unlinked from down there.
    pub fn remove(&mut self, key: &K) -> bool {
        let mut removed = false;
        self.root = remove_at(self.root.take(), key, &mut removed);
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// Returns `true` if the key is present.
    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Returns a reference to the stored key equal to `key`, if any.
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
}

impl<'a, K> IntoIterator for &'a Tree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

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
                    let (successor, new_right) = remove_min(right);
                    node.key = successor;
                    node.left = Some(left);
                    node.right = new_right;
                    node
                }
            };
        }
    }
    Some(node)
}

/// Unlinks the leftmost node of the subtree, handing back its key and the
/// subtree's new root.
fn remove_min<K>(mut node: Box<Node<K>>) -> (K, Link<K>) {
    match node.left.take() {
        Some(left) => {
            let (min, new_left) = remove_min(left);
            node.left = new_left;
            (min, Some(node))
        }
        None => {
            let node = *node;
            (node.key, node.right)
        }
    }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_reports_whether_the_key_was_new() {
        let mut tree = Tree::new();

        assert!(tree.insert(5));
        assert!(tree.insert(3));
        assert!(!tree.insert(5));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn remove_leaf() {
        let mut tree = Tree::new();
        tree.insert(5);
        tree.insert(3);
        tree.insert(7);

        assert!(tree.remove(&3));
        assert!(!tree.contains(&3));
        assert!(tree.contains(&5));
        assert!(tree.contains(&7));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn remove_node_with_one_child() {
        let mut tree = Tree::new();
        tree.insert(5);
        tree.insert(3);
        tree.insert(2);

        assert!(tree.remove(&3));
        assert!(!tree.contains(&3));
        assert!(tree.contains(&2));
        assert!(tree.contains(&5));
    }

    #[test]
    fn remove_node_with_two_children_promotes_successor() {
        let mut tree = Tree::new();
        for key in [5, 3, 8, 6, 9, 7] {
            tree.insert(key);
        }

        assert!(tree.remove(&8));
        assert!(!tree.contains(&8));
        for key in [3, 5, 6, 7, 9] {
            assert!(tree.contains(&key));
        }
        let keys: Vec<i32> = tree.iter().copied().collect();
        assert_eq!(keys, [3, 5, 6, 7, 9]);
    }

    #[test]
    fn remove_absent_key_is_a_no_op() {
        let mut tree = Tree::new();
        tree.insert(5);

        assert!(!tree.remove(&42));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn iteration_is_in_ascending_order() {
        let mut tree = Tree::new();
        for key in [8, 3, 10, 1, 6, 14, 4, 7, 13] {
            tree.insert(key);
        }

        let keys: Vec<i32> = (&tree).into_iter().copied().collect();
        assert_eq!(keys, [1, 3, 4, 6, 7, 8, 10, 13, 14]);
    }

    #[test]
    fn degenerate_sorted_chain_still_works() {
        // Sorted input is the tree's worst case: a 10_000-deep chain.
        // Insert, search, iteration, and teardown must all survive it.
        let mut tree = Tree::new();
        for key in 0..10_000 {
            assert!(tree.insert(key));
        }

        assert_eq!(tree.len(), 10_000);
        assert!(tree.contains(&0));
        assert!(tree.contains(&9_999));
        assert!(!tree.contains(&10_000));
        assert_eq!(tree.iter().count(), 10_000);

        tree.clear();
        assert!(tree.is_empty());
    }
}

#[cfg(test)]
mod quicktests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::test::quick::Op;

    quickcheck::quickcheck! {
        fn fuzz_matches_btreeset(ops: Vec<Op<i8>>) -> bool {
            let mut tree = Tree::new();
            let mut model = BTreeSet::new();

            for op in &ops {
                match *op {
                    Op::Insert(k) => assert_eq!(tree.insert(k), model.insert(k)),
                    Op::Remove(k) => assert_eq!(tree.remove(&k), model.remove(&k)),
                }
            }

            tree.len() == model.len() && tree.iter().eq(model.iter())
        }
    }
}
