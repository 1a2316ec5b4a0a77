//! Augmented AVL interval tree.
//!
//! Keys are [`Interval`]s in their natural order (start, then end). Each
//! distinct key owns one node holding an ordered payload set; inserting
//! an existing key merges payloads into that node instead of growing the
//! tree.
//!
//! # Augmentation
//! Every node records its subtree height and the earliest start / latest
//! end over its subtree. Both are recomputed from the node's key and its
//! *current* children after every structural change, including both
//! nodes touched by a rotation.
//!
//! # Queries
//! [`IntervalTree::query`] is a containment query: it returns payloads of
//! nodes whose key contains the query interval. It visits every node in
//! pre-order (node, left, right), and of two payloads that compare equal
//! the first one visited is kept. [`IntervalTree::query_pruned`] walks in
//! the same order but skips subtrees whose bounds or key order rule out
//! containment, so it keeps the same payloads.
//!
//! # Storage
//! Nodes live in a `Vec` arena and link by index. Nodes are never removed,
//! so `count()` is the arena length.
//!
//! # Complexity
//! | Operation | Cost |
//! |-----------|------|
//! | `insert` | O(log n) |
//! | `find_exact` | O(log n) |
//! | `query` | O(n) |
//! | `query_pruned` | O(n) worst case, usually far less |

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::NaiveTime;

use crate::models::Interval;

#[derive(Debug, Clone)]
struct Node<T> {
    key: Interval,
    payload: BTreeSet<T>,
    height: u32,
    min_start: NaiveTime,
    max_end: NaiveTime,
    left: Option<usize>,
    right: Option<usize>,
}

impl<T> Node<T> {
    fn leaf(key: Interval, payload: BTreeSet<T>) -> Self {
        Self {
            key,
            payload,
            height: 1,
            min_start: key.start(),
            max_end: key.end(),
            left: None,
            right: None,
        }
    }
}

/// Read-only view of one tree node.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a, T> {
    node: &'a Node<T>,
}

impl<'a, T> NodeRef<'a, T> {
    /// The node's key.
    pub fn interval(&self) -> Interval {
        self.node.key
    }

    /// Payloads stored under this key, in payload order.
    pub fn payload(&self) -> &'a BTreeSet<T> {
        &self.node.payload
    }

    /// Height of the subtree rooted here (a leaf has height 1).
    pub fn height(&self) -> u32 {
        self.node.height
    }

    /// Earliest start in the subtree rooted here.
    pub fn min_start(&self) -> NaiveTime {
        self.node.min_start
    }

    /// Latest end in the subtree rooted here.
    pub fn max_end(&self) -> NaiveTime {
        self.node.max_end
    }
}

/// Self-balancing interval tree mapping each distinct interval to a set
/// of payloads.
///
/// # Example
///
/// ```
/// use u_assign::index::IntervalTree;
/// use u_assign::models::Interval;
///
/// let mut tree = IntervalTree::new();
/// tree.insert(Interval::from_hm(9, 0, 12, 0).unwrap(), "alice");
/// tree.insert(Interval::from_hm(10, 0, 11, 0).unwrap(), "bob");
///
/// let hits = tree.query(&Interval::from_hm(9, 30, 10, 30).unwrap());
/// assert_eq!(hits.into_iter().collect::<Vec<_>>(), vec!["alice"]);
/// ```
#[derive(Debug, Clone)]
pub struct IntervalTree<T> {
    nodes: Vec<Node<T>>,
    root: Option<usize>,
}

impl<T: Ord + Clone> IntervalTree<T> {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Inserts one payload under `interval`.
    pub fn insert(&mut self, interval: Interval, payload: T) {
        self.insert_set(interval, BTreeSet::from([payload]));
    }

    /// Inserts several payloads under `interval`.
    pub fn insert_all(&mut self, interval: Interval, payloads: impl IntoIterator<Item = T>) {
        let mut set = BTreeSet::new();
        for payload in payloads {
            set.insert(payload);
        }
        self.insert_set(interval, set);
    }

    fn insert_set(&mut self, interval: Interval, payload: BTreeSet<T>) {
        let root = self.insert_at(self.root, interval, payload);
        self.root = Some(root);
    }

    /// Inserts below `at` and returns the index of the new subtree root.
    fn insert_at(&mut self, at: Option<usize>, key: Interval, payload: BTreeSet<T>) -> usize {
        let Some(idx) = at else {
            self.nodes.push(Node::leaf(key, payload));
            return self.nodes.len() - 1;
        };

        match key.cmp(&self.nodes[idx].key) {
            Ordering::Equal => {
                // Existing payload wins over an equal newcomer
                for item in payload {
                    self.nodes[idx].payload.insert(item);
                }
                return idx;
            }
            Ordering::Less => {
                let child = self.insert_at(self.nodes[idx].left, key, payload);
                self.nodes[idx].left = Some(child);
            }
            Ordering::Greater => {
                let child = self.insert_at(self.nodes[idx].right, key, payload);
                self.nodes[idx].right = Some(child);
            }
        }

        self.refresh(idx);
        self.rebalance(idx)
    }

    fn height_of(&self, at: Option<usize>) -> u32 {
        at.map_or(0, |idx| self.nodes[idx].height)
    }

    fn balance_of(&self, idx: usize) -> i64 {
        let node = &self.nodes[idx];
        i64::from(self.height_of(node.left)) - i64::from(self.height_of(node.right))
    }

    /// Recomputes height and bounds from the key and current children.
    fn refresh(&mut self, idx: usize) {
        let (left, right) = (self.nodes[idx].left, self.nodes[idx].right);
        let key = self.nodes[idx].key;

        let mut height = 0;
        let mut min_start = key.start();
        let mut max_end = key.end();
        for child in [left, right].into_iter().flatten() {
            let child = &self.nodes[child];
            height = height.max(child.height);
            min_start = min_start.min(child.min_start);
            max_end = max_end.max(child.max_end);
        }

        let node = &mut self.nodes[idx];
        node.height = height + 1;
        node.min_start = min_start;
        node.max_end = max_end;
    }

    fn rebalance(&mut self, idx: usize) -> usize {
        let balance = self.balance_of(idx);
        if balance > 1 {
            if let Some(left) = self.nodes[idx].left {
                if self.balance_of(left) < 0 {
                    let rotated = self.rotate_left(left);
                    self.nodes[idx].left = Some(rotated);
                }
            }
            self.rotate_right(idx)
        } else if balance < -1 {
            if let Some(right) = self.nodes[idx].right {
                if self.balance_of(right) > 0 {
                    let rotated = self.rotate_right(right);
                    self.nodes[idx].right = Some(rotated);
                }
            }
            self.rotate_left(idx)
        } else {
            idx
        }
    }

    fn rotate_right(&mut self, idx: usize) -> usize {
        let Some(pivot) = self.nodes[idx].left else {
            return idx;
        };
        self.nodes[idx].left = self.nodes[pivot].right;
        self.nodes[pivot].right = Some(idx);
        // Demoted node first: the pivot's values depend on it
        self.refresh(idx);
        self.refresh(pivot);
        pivot
    }

    fn rotate_left(&mut self, idx: usize) -> usize {
        let Some(pivot) = self.nodes[idx].right else {
            return idx;
        };
        self.nodes[idx].right = self.nodes[pivot].left;
        self.nodes[pivot].left = Some(idx);
        self.refresh(idx);
        self.refresh(pivot);
        pivot
    }

    /// Finds the node whose key equals `interval`.
    pub fn find_exact(&self, interval: &Interval) -> Option<NodeRef<'_, T>> {
        let mut cursor = self.root;
        while let Some(idx) = cursor {
            let node = &self.nodes[idx];
            cursor = match interval.cmp(&node.key) {
                Ordering::Equal => return Some(NodeRef { node }),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        None
    }

    /// Payloads of every node whose key contains `interval`.
    ///
    /// Visits every node in pre-order (node, left, right); see
    /// [`Self::query_pruned`] for the bounded walk. When two payloads
    /// compare equal, the one reached first is kept.
    pub fn query(&self, interval: &Interval) -> BTreeSet<T> {
        let mut result = BTreeSet::new();
        let mut stack: Vec<usize> = self.root.into_iter().collect();

        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if node.key.contains(interval) {
                result.extend(node.payload.iter().cloned());
            }
            // Right first so the left subtree is popped first
            stack.extend(node.right);
            stack.extend(node.left);
        }

        result
    }

    /// Same result as [`Self::query`], in the same visit order, skipping
    /// subtrees that cannot contain `interval`.
    ///
    /// A subtree is skipped when its earliest start is after the query
    /// start or its latest end is before the query end. The right subtree
    /// is also skipped when this node already starts after the query,
    /// since every key on the right starts no earlier.
    pub fn query_pruned(&self, interval: &Interval) -> BTreeSet<T> {
        let mut result = BTreeSet::new();
        let mut stack: Vec<usize> = self.root.into_iter().collect();

        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if node.min_start > interval.start() || node.max_end < interval.end() {
                continue;
            }
            if node.key.contains(interval) {
                result.extend(node.payload.iter().cloned());
            }
            if node.key.start() <= interval.start() {
                stack.extend(node.right);
            }
            stack.extend(node.left);
        }

        result
    }

    /// Number of distinct interval keys.
    pub fn count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no keys.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Height of the whole tree (0 when empty).
    pub fn height(&self) -> u32 {
        self.height_of(self.root)
    }

    /// The root node, if any.
    pub fn root(&self) -> Option<NodeRef<'_, T>> {
        self.root.map(|idx| NodeRef {
            node: &self.nodes[idx],
        })
    }

    /// All keys in ascending order.
    pub fn keys(&self) -> Vec<Interval> {
        let mut keys = Vec::with_capacity(self.nodes.len());
        let mut stack = Vec::new();
        let mut cursor = self.root;

        loop {
            while let Some(idx) = cursor {
                stack.push(idx);
                cursor = self.nodes[idx].left;
            }
            let Some(idx) = stack.pop() else {
                break;
            };
            keys.push(self.nodes[idx].key);
            cursor = self.nodes[idx].right;
        }

        keys
    }
}

impl<T: Ord + Clone> Default for IntervalTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CandidateKey, EmployeeId};
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn iv(sh: u32, sm: u32, eh: u32, em: u32) -> Interval {
        Interval::from_hm(sh, sm, eh, em).unwrap()
    }

    fn minutes(start: u32, end: u32) -> Interval {
        iv(start / 60, start % 60, end / 60, end % 60)
    }

    /// Checks height, balance, ordering and bounds for every node.
    /// Returns (height, min_start, max_end) of the subtree.
    fn check_subtree<T: Ord + Clone>(
        tree: &IntervalTree<T>,
        at: Option<usize>,
    ) -> Option<(u32, NaiveTime, NaiveTime)> {
        let idx = at?;
        let node = &tree.nodes[idx];
        let left = check_subtree(tree, node.left);
        let right = check_subtree(tree, node.right);

        let lh = left.map_or(0, |l| l.0);
        let rh = right.map_or(0, |r| r.0);
        assert_eq!(node.height, 1 + lh.max(rh), "height at {}", node.key);
        assert!(lh.abs_diff(rh) <= 1, "unbalanced at {}", node.key);

        if let Some(l) = node.left {
            assert!(tree.nodes[l].key < node.key);
        }
        if let Some(r) = node.right {
            assert!(tree.nodes[r].key > node.key);
        }

        let mut min_start = node.key.start();
        let mut max_end = node.key.end();
        for (_, lo, hi) in [left, right].into_iter().flatten() {
            min_start = min_start.min(lo);
            max_end = max_end.max(hi);
        }
        assert_eq!(node.min_start, min_start, "min bound at {}", node.key);
        assert_eq!(node.max_end, max_end, "max bound at {}", node.key);

        Some((node.height, min_start, max_end))
    }

    fn assert_invariants<T: Ord + Clone>(tree: &IntervalTree<T>) {
        check_subtree(tree, tree.root);
        let keys = tree.keys();
        assert_eq!(keys.len(), tree.count());
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_empty_tree() {
        let tree: IntervalTree<u32> = IntervalTree::new();
        assert_eq!(tree.count(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert!(tree.root().is_none());
        assert!(tree.find_exact(&iv(9, 0, 10, 0)).is_none());
        assert!(tree.query(&iv(9, 0, 10, 0)).is_empty());
        assert!(tree.query_pruned(&iv(9, 0, 10, 0)).is_empty());
    }

    #[test]
    fn test_find_exact_after_insert() {
        let mut tree = IntervalTree::new();
        tree.insert(iv(9, 0, 12, 0), 1);
        tree.insert(iv(9, 0, 10, 0), 2);
        tree.insert(iv(13, 0, 14, 0), 3);

        let node = tree.find_exact(&iv(9, 0, 10, 0)).unwrap();
        assert!(node.payload().contains(&2));
        assert_eq!(node.interval(), iv(9, 0, 10, 0));
        assert!(tree.find_exact(&iv(9, 0, 11, 0)).is_none());
        assert!(tree.find_exact(&iv(13, 0, 14, 1)).is_none());
    }

    #[test]
    fn test_duplicate_key_merges() {
        let mut tree = IntervalTree::new();
        tree.insert(iv(9, 0, 12, 0), "alice");
        tree.insert(iv(10, 0, 11, 0), "bob");
        assert_eq!(tree.count(), 2);

        tree.insert(iv(9, 0, 12, 0), "carol");
        tree.insert_all(iv(9, 0, 12, 0), ["dave", "alice"]);
        assert_eq!(tree.count(), 2);

        let node = tree.find_exact(&iv(9, 0, 12, 0)).unwrap();
        let names: Vec<&str> = node.payload().iter().copied().collect();
        assert_eq!(names, vec!["alice", "carol", "dave"]);
        assert_invariants(&tree);
    }

    #[test]
    fn test_query_is_containment_not_overlap() {
        let mut tree = IntervalTree::new();
        tree.insert(iv(9, 0, 12, 0), "alice");
        tree.insert(iv(10, 0, 11, 0), "bob");

        let hits = tree.query(&iv(9, 30, 10, 30));
        assert_eq!(hits.into_iter().collect::<Vec<_>>(), vec!["alice"]);

        let both = tree.query(&iv(10, 15, 10, 45));
        assert_eq!(both.len(), 2);

        assert!(tree.query(&iv(8, 0, 9, 30)).is_empty());
    }

    #[test]
    fn test_query_results_are_payload_ordered() {
        let mut tree = IntervalTree::new();
        tree.insert(iv(8, 0, 18, 0), 30);
        tree.insert(iv(9, 0, 12, 0), 10);
        tree.insert(iv(7, 0, 13, 0), 20);

        let hits: Vec<i32> = tree.query(&iv(9, 0, 10, 0)).into_iter().collect();
        assert_eq!(hits, vec![10, 20, 30]);
        let reversed: Vec<i32> = tree.query(&iv(9, 0, 10, 0)).into_iter().rev().collect();
        assert_eq!(reversed, vec![30, 20, 10]);
    }

    #[test]
    fn test_equal_payloads_keep_left_subtree_first() {
        let key = |priority, id| CandidateKey {
            priority,
            employee: EmployeeId(id),
        };
        let mut tree = IntervalTree::new();
        tree.insert(iv(9, 0, 17, 0), key(1, 3));
        tree.insert(iv(8, 0, 18, 0), key(5, 1));
        tree.insert(iv(9, 30, 12, 0), key(5, 2));

        // Root with one child on each side
        assert_eq!(tree.root().unwrap().interval(), iv(9, 0, 17, 0));
        assert_eq!(tree.height(), 2);

        let query = iv(10, 0, 11, 0);
        for hits in [tree.query(&query), tree.query_pruned(&query)] {
            let ids: Vec<EmployeeId> = hits.iter().map(|k| k.employee).collect();
            assert_eq!(ids, vec![EmployeeId(3), EmployeeId(1)]);
        }
    }

    #[test]
    fn test_ascending_inserts_stay_balanced() {
        let mut tree = IntervalTree::new();
        for i in 0..100u32 {
            tree.insert(minutes(i * 5, i * 5 + 30), i);
            assert_invariants(&tree);
        }
        assert_eq!(tree.count(), 100);
        // AVL bound: height <= 1.44 log2(n + 2)
        assert!(tree.height() <= 10);
    }

    #[test]
    fn test_descending_inserts_stay_balanced() {
        let mut tree = IntervalTree::new();
        for i in (0..100u32).rev() {
            tree.insert(minutes(i * 5, i * 5 + 30), i);
        }
        assert_invariants(&tree);
        assert!(tree.height() <= 10);
    }

    #[test]
    fn test_zigzag_double_rotations() {
        let mut tree = IntervalTree::new();
        // Starts with a left-right double rotation
        for (start, end) in [(600, 700), (400, 500), (500, 550), (800, 900), (900, 950), (850, 870)] {
            tree.insert(minutes(start, end), start);
            assert_invariants(&tree);
        }
        assert_eq!(tree.count(), 6);
        assert_eq!(tree.height(), 3);
    }

    #[test]
    fn test_root_bounds_cover_all_keys() {
        let mut tree = IntervalTree::new();
        tree.insert(iv(12, 0, 13, 0), 1);
        tree.insert(iv(6, 30, 7, 0), 2);
        tree.insert(iv(9, 0, 22, 15), 3);
        tree.insert(iv(10, 0, 11, 0), 4);

        let root = tree.root().unwrap();
        assert_eq!(root.min_start(), iv(6, 30, 7, 0).start());
        assert_eq!(root.max_end(), iv(9, 0, 22, 15).end());
        assert_eq!(root.height(), tree.height());
    }

    #[test]
    fn test_randomized_invariants_and_queries() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut tree = IntervalTree::new();
        let mut reference: Vec<(Interval, u32)> = Vec::new();

        for payload in 0..400u32 {
            // Coarse grid so duplicate keys occur
            let start = rng.random_range(0..48u32) * 15;
            let len = rng.random_range(0..16u32) * 15;
            let key = minutes(start, (start + len).min(23 * 60 + 59));
            tree.insert(key, payload);
            reference.push((key, payload));

            if payload % 50 == 0 {
                assert_invariants(&tree);
            }
        }
        assert_invariants(&tree);

        let mut distinct: Vec<Interval> = reference.iter().map(|(k, _)| *k).collect();
        distinct.sort();
        distinct.dedup();
        assert_eq!(tree.count(), distinct.len());

        for _ in 0..200 {
            let start = rng.random_range(0..40u32) * 15;
            let len = rng.random_range(0..8u32) * 15;
            let query = minutes(start, start + len);

            let expected: BTreeSet<u32> = reference
                .iter()
                .filter(|(k, _)| k.contains(&query))
                .map(|(_, p)| *p)
                .collect();
            assert_eq!(tree.query(&query), expected);
            assert_eq!(tree.query_pruned(&query), expected);
        }
    }
}
