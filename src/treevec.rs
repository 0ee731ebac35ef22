//! A sequence stored in a counted B-tree.
//!
//! Inserting and removing at a position take logarithmic time, and so does
//! [`TreeVec::partition_point`], which walks down the tree instead of
//! bisecting over positions. The beachline keeps its arcs in one of these.
//!
//! Every node other than the root holds between `B / 2` and `B` entries
//! (items in a leaf, children in a branch), and branches cache the number
//! of items below them.

use arrayvec::ArrayVec;

/// A `Vec`-like sequence with logarithmic insertion and removal.
#[derive(Clone, Debug)]
pub struct TreeVec<T, const B: usize> {
    root: Node<T, B>,
}

#[derive(Clone, Debug)]
enum Node<T, const B: usize> {
    Leaf(ArrayVec<T, B>),
    Branch {
        len: usize,
        children: ArrayVec<Box<Node<T, B>>, B>,
    },
}

impl<T, const B: usize> Node<T, B> {
    fn len(&self) -> usize {
        match self {
            Node::Leaf(items) => items.len(),
            Node::Branch { len, .. } => *len,
        }
    }

    // Entries directly in this node: items for a leaf, children for a branch.
    fn slots(&self) -> usize {
        match self {
            Node::Leaf(items) => items.len(),
            Node::Branch { children, .. } => children.len(),
        }
    }

    fn first(&self) -> Option<&T> {
        match self {
            Node::Leaf(items) => items.first(),
            Node::Branch { children, .. } => children.first()?.first(),
        }
    }

    fn get(&self, mut index: usize) -> Option<&T> {
        match self {
            Node::Leaf(items) => items.get(index),
            Node::Branch { children, .. } => {
                for child in children {
                    if index < child.len() {
                        return child.get(index);
                    }
                    index -= child.len();
                }
                None
            }
        }
    }

    // Returns the new right sibling if this node had to split.
    fn insert(&mut self, index: usize, value: T) -> Option<Node<T, B>> {
        match self {
            Node::Leaf(items) => {
                if !items.is_full() {
                    items.insert(index, value);
                    return None;
                }
                let mut right: ArrayVec<T, B> = items.drain(B / 2..).collect();
                if index <= B / 2 {
                    items.insert(index, value);
                } else {
                    right.insert(index - B / 2, value);
                }
                Some(Node::Leaf(right))
            }
            Node::Branch { len, children } => {
                // An index on the boundary between two children goes to the
                // left one, so appending to a child is always possible.
                let mut idx = 0;
                let mut offset = index;
                while idx + 1 < children.len() && offset > children[idx].len() {
                    offset -= children[idx].len();
                    idx += 1;
                }
                *len += 1;

                let split = children[idx].insert(offset, value)?;
                if !children.is_full() {
                    children.insert(idx + 1, Box::new(split));
                    return None;
                }
                let mut right: ArrayVec<_, B> = children.drain(B / 2..).collect();
                if idx < B / 2 {
                    children.insert(idx + 1, Box::new(split));
                } else {
                    right.insert(idx + 1 - B / 2, Box::new(split));
                }
                *len = total_len(children);
                Some(Node::Branch {
                    len: total_len(&right),
                    children: right,
                })
            }
        }
    }

    fn remove(&mut self, mut index: usize) -> T {
        match self {
            Node::Leaf(items) => items.remove(index),
            Node::Branch { len, children } => {
                let mut idx = 0;
                while index >= children[idx].len() {
                    index -= children[idx].len();
                    idx += 1;
                }
                *len -= 1;
                let ret = children[idx].remove(index);
                if children[idx].slots() < B / 2 {
                    refill(children, idx);
                }
                ret
            }
        }
    }

    // Moves entries between `self` and its right sibling until `self` holds
    // `target` of them.
    fn shift(&mut self, right: &mut Node<T, B>, target: usize) {
        match (self, right) {
            (Node::Leaf(left), Node::Leaf(right)) => shift_entries(left, right, target),
            (
                Node::Branch {
                    len: left_len,
                    children: left,
                },
                Node::Branch {
                    len: right_len,
                    children: right,
                },
            ) => {
                shift_entries(left, right, target);
                *left_len = total_len(left);
                *right_len = total_len(right);
            }
            _ => unreachable!("siblings are always at the same height"),
        }
    }

    fn check_invariants(&self, is_root: bool) -> usize {
        if !is_root {
            assert!(self.slots() >= B / 2);
        }
        match self {
            Node::Leaf(_) => 0,
            Node::Branch { len, children } => {
                assert!(!children.is_empty());
                assert_eq!(*len, total_len(children));
                let heights: Vec<_> = children
                    .iter()
                    .map(|child| child.check_invariants(false))
                    .collect();
                assert!(heights.windows(2).all(|w| w[0] == w[1]));
                heights[0] + 1
            }
        }
    }
}

fn total_len<T, const B: usize>(children: &[Box<Node<T, B>>]) -> usize {
    children.iter().map(|c| c.len()).sum()
}

fn shift_entries<U, const B: usize>(
    left: &mut ArrayVec<U, B>,
    right: &mut ArrayVec<U, B>,
    target: usize,
) {
    if left.len() < target {
        let n = target - left.len();
        left.extend(right.drain(..n));
    } else if left.len() > target {
        let mut moved: ArrayVec<U, B> = left.drain(target..).collect();
        moved.extend(right.drain(..));
        *right = moved;
    }
}

// The child at `idx` has fallen below half full. Either merge it with a
// neighbor or even the two out.
fn refill<T, const B: usize>(children: &mut ArrayVec<Box<Node<T, B>>, B>, idx: usize) {
    let right_idx = if idx + 1 < children.len() { idx + 1 } else { idx };
    if right_idx == 0 {
        return;
    }
    let (head, tail) = children.split_at_mut(right_idx);
    let left = &mut head[right_idx - 1];
    let right = &mut tail[0];
    let total = left.slots() + right.slots();
    if total <= B {
        left.shift(right, total);
        children.remove(right_idx);
    } else {
        left.shift(right, total / 2);
    }
}

impl<T, const B: usize> Default for TreeVec<T, B> {
    fn default() -> Self {
        TreeVec {
            root: Node::Leaf(ArrayVec::new()),
        }
    }
}

impl<T, const B: usize> TreeVec<T, B> {
    /// An empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of items.
    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// Is the sequence empty?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The item at `index`, if there is one.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.root.get(index)
    }

    /// Inserts `value` so that it ends up at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) {
        assert!(index <= self.len(), "insertion index {index} out of bounds");
        if let Some(split) = self.root.insert(index, value) {
            let left = std::mem::replace(&mut self.root, Node::Leaf(ArrayVec::new()));
            let mut children = ArrayVec::new();
            children.push(Box::new(left));
            children.push(Box::new(split));
            self.root = Node::Branch {
                len: total_len(&children),
                children,
            };
        }
    }

    /// Removes and returns the item at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> T {
        assert!(index < self.len(), "removal index {index} out of bounds");
        let ret = self.root.remove(index);
        if let Node::Branch { children, .. } = &mut self.root {
            if children.len() == 1 {
                if let Some(only) = children.pop() {
                    self.root = *only;
                }
            }
        }
        ret
    }

    /// The number of leading items satisfying `pred`.
    ///
    /// Like [`slice::partition_point`], this assumes that `pred` holds for
    /// some prefix of the sequence and fails for the rest.
    pub fn partition_point<P>(&self, mut pred: P) -> usize
    where
        P: FnMut(&T) -> bool,
    {
        let mut node = &self.root;
        let mut base = 0;
        loop {
            match node {
                Node::Leaf(items) => return base + items.partition_point(|x| pred(x)),
                Node::Branch { children, .. } => {
                    // The boundary lies in the last child that starts with a
                    // passing item.
                    let k = children.partition_point(|c| c.first().is_some_and(|x| pred(x)));
                    if k == 0 {
                        return base;
                    }
                    base += total_len(&children[..k - 1]);
                    node = &*children[k - 1];
                }
            }
        }
    }

    /// Iterates over the items in order.
    pub fn iter(&self) -> Iter<'_, T, B> {
        let mut ret = Iter {
            stack: Vec::new(),
            leaf: [].iter(),
        };
        ret.descend(&self.root);
        ret
    }

    /// Panics if the tree is malformed.
    pub fn check_invariants(&self) {
        assert!(B >= 4);
        self.root.check_invariants(true);
    }
}

impl<T, const B: usize> FromIterator<T> for TreeVec<T, B> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut ret = TreeVec::new();
        for x in iter {
            ret.insert(ret.len(), x);
        }
        ret
    }
}

impl<T, const B: usize> std::ops::Index<usize> for TreeVec<T, B> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(x) => x,
            None => panic!("index {index} out of bounds (len {})", self.len()),
        }
    }
}

/// In-order iterator over a [`TreeVec`].
pub struct Iter<'a, T, const B: usize> {
    stack: Vec<std::slice::Iter<'a, Box<Node<T, B>>>>,
    leaf: std::slice::Iter<'a, T>,
}

impl<'a, T, const B: usize> Iter<'a, T, B> {
    fn descend(&mut self, mut node: &'a Node<T, B>) {
        loop {
            match node {
                Node::Leaf(items) => {
                    self.leaf = items.iter();
                    return;
                }
                Node::Branch { children, .. } => {
                    let mut rest = children.iter();
                    let Some(first) = rest.next() else {
                        return;
                    };
                    self.stack.push(rest);
                    node = &**first;
                }
            }
        }
    }
}

impl<'a, T, const B: usize> Iterator for Iter<'a, T, B> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            if let Some(x) = self.leaf.next() {
                return Some(x);
            }
            let next = loop {
                let top = self.stack.last_mut()?;
                match top.next() {
                    Some(child) => break child,
                    None => {
                        self.stack.pop();
                    }
                }
            };
            self.descend(next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn insert_get() {
        let mut vec = TreeVec::<i32, 4>::new();
        for i in 0..4 {
            vec.insert(0, i);
        }
        vec.check_invariants();
        assert_eq!(vec.iter().copied().collect::<Vec<_>>(), vec![3, 2, 1, 0]);

        for i in 4..8 {
            vec.insert(0, i);
        }
        vec.check_invariants();
        assert_eq!(vec.len(), 8);
        assert_eq!(vec[0], 7);
        assert_eq!(vec[7], 0);
        assert_eq!(vec.get(8), None);
    }

    #[test]
    fn insert_remove() {
        let mut vec: TreeVec<i32, 4> = (0..40).collect();
        vec.check_invariants();
        assert_eq!(vec.remove(10), 10);
        assert_eq!(vec.remove(0), 0);
        assert_eq!(vec.remove(vec.len() - 1), 39);
        vec.check_invariants();
        assert_eq!(
            vec.iter().copied().collect::<Vec<_>>(),
            (1..10).chain(11..39).collect::<Vec<_>>()
        );
        while !vec.is_empty() {
            vec.remove(vec.len() / 2);
            vec.check_invariants();
        }
        assert_eq!(vec.iter().count(), 0);
    }

    #[test]
    fn partition_point() {
        let vec: TreeVec<i32, 4> = (0..100).map(|x| 2 * x).collect();
        assert_eq!(vec.partition_point(|&x| x < 0), 0);
        assert_eq!(vec.partition_point(|&x| x < 51), 26);
        assert_eq!(vec.partition_point(|&x| x < 52), 26);
        assert_eq!(vec.partition_point(|_| true), 100);
        assert_eq!(TreeVec::<i32, 4>::new().partition_point(|_| true), 0);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(usize, i32),
        Remove(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (any::<usize>(), any::<i32>()).prop_map(|(i, x)| Op::Insert(i, x)),
            any::<usize>().prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn behaves_like_vec(ops in proptest::collection::vec(op(), 0..200)) {
            let mut model = Vec::new();
            let mut vec = TreeVec::<i32, 4>::new();
            for op in ops {
                match op {
                    Op::Insert(i, x) => {
                        let i = i % (model.len() + 1);
                        model.insert(i, x);
                        vec.insert(i, x);
                    }
                    Op::Remove(i) => {
                        if !model.is_empty() {
                            let i = i % model.len();
                            prop_assert_eq!(model.remove(i), vec.remove(i));
                        }
                    }
                }
                vec.check_invariants();
            }
            prop_assert_eq!(vec.iter().copied().collect::<Vec<_>>(), model.clone());

            model.sort();
            let sorted: TreeVec<i32, 4> = model.iter().copied().collect();
            for probe in [-1000, 0, 1000, i32::MIN, i32::MAX] {
                prop_assert_eq!(
                    sorted.partition_point(|&x| x < probe),
                    model.partition_point(|&x| x < probe)
                );
            }
        }
    }
}
