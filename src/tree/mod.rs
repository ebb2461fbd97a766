//! The ordered associative tree: a left-leaning red-black BST.
//!
//! The variant implemented here is the top-down 2-3-4 form: inserts split
//! 4-nodes (two red children) with a color flip on the way down and repair
//! leaning with rotations on the way back up, and deletes carry a red link
//! downward with `move_red_left` / `move_red_right`, fixing up on unwind.
//! Nodes hold only child links and no parent pointers, so ownership is a
//! plain tree of `Box`es.
//!
//! Duplicate keys are allowed (they route right); [`insert_unique`]
//! refuses them with a warning instead.
//!
//! [`insert_unique`]: OrderedTree::insert_unique

use std::cmp::Ordering;
use std::fmt;

use log::warn;

use crate::error::Error;
use crate::policy::Element;

mod render;
mod traverse;

pub use traverse::{Traversal, TreeIter};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Color {
    Red,
    Black,
}

type Link<T> = Option<Box<Node<T>>>;

#[derive(Clone)]
struct Node<T> {
    value: T,
    left: Link<T>,
    right: Link<T>,
    color: Color,
}

impl<T> Node<T> {
    fn new(value: T) -> Self {
        // New nodes join as red links.
        Node { value, left: None, right: None, color: Color::Red }
    }
}

fn is_red<T>(link: &Link<T>) -> bool {
    matches!(link, Some(n) if n.color == Color::Red)
}

/// Red check on a link's left child, for the double-red conditions.
fn left_child_red<T>(link: &Link<T>) -> bool {
    match link {
        Some(n) => is_red(&n.left),
        None => false,
    }
}

fn rotate_left<T>(mut h: Box<Node<T>>) -> Box<Node<T>> {
    let mut x = h.right.take().expect("rotate_left requires a right child");
    h.right = x.left.take();
    x.color = h.color;
    h.color = Color::Red;
    x.left = Some(h);
    x
}

fn rotate_right<T>(mut h: Box<Node<T>>) -> Box<Node<T>> {
    let mut x = h.left.take().expect("rotate_right requires a left child");
    h.left = x.right.take();
    x.color = h.color;
    h.color = Color::Red;
    x.right = Some(h);
    x
}

fn flip_colors<T>(h: &mut Node<T>) {
    fn toggle(c: Color) -> Color {
        match c {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }
    h.color = toggle(h.color);
    if let Some(l) = h.left.as_mut() {
        l.color = toggle(l.color);
    }
    if let Some(r) = h.right.as_mut() {
        r.color = toggle(r.color);
    }
}

fn insert_node<T: Element>(link: Link<T>, value: T) -> Box<Node<T>> {
    let mut h = match link {
        None => return Box::new(Node::new(value)),
        Some(h) => h,
    };

    // Split 4-nodes on the way down.
    if is_red(&h.left) && is_red(&h.right) {
        flip_colors(&mut h);
    }

    if h.value.cmp(&value) == Ordering::Greater {
        h.left = Some(insert_node(h.left.take(), value));
    } else {
        // Duplicates route right.
        h.right = Some(insert_node(h.right.take(), value));
    }

    if is_red(&h.right) {
        h = rotate_left(h);
    }
    if is_red(&h.left) && left_child_red(&h.left) {
        h = rotate_right(h);
    }

    h
}

fn move_red_left<T>(mut h: Box<Node<T>>) -> Box<Node<T>> {
    flip_colors(&mut h);
    if h.right.as_ref().map_or(false, |r| is_red(&r.left)) {
        let right = h.right.take().expect("move_red_left requires a right child");
        h.right = Some(rotate_right(right));
        h = rotate_left(h);
        flip_colors(&mut h);
    }
    h
}

fn move_red_right<T>(mut h: Box<Node<T>>) -> Box<Node<T>> {
    flip_colors(&mut h);
    if left_child_red(&h.left) {
        h = rotate_right(h);
        flip_colors(&mut h);
    }
    h
}

fn fixup<T>(mut h: Box<Node<T>>) -> Box<Node<T>> {
    if is_red(&h.right) {
        h = rotate_left(h);
    }
    if is_red(&h.left) && left_child_red(&h.left) {
        h = rotate_right(h);
    }
    if is_red(&h.left) && is_red(&h.right) {
        flip_colors(&mut h);
    }
    h
}

/// Remove the minimum of the subtree, handing its value out.
fn erase_min_node<T: Element>(mut h: Box<Node<T>>) -> (Link<T>, T) {
    if h.left.is_none() {
        let node = *h;
        return (None, node.value);
    }
    if !is_red(&h.left) && !left_child_red(&h.left) {
        h = move_red_left(h);
    }
    let left = h.left.take().expect("min descent lost its left subtree");
    let (rest, value) = erase_min_node(left);
    h.left = rest;
    (Some(fixup(h)), value)
}

/// Remove the maximum of the subtree, handing its value out.
fn erase_max_node<T: Element>(mut h: Box<Node<T>>) -> (Link<T>, T) {
    if is_red(&h.left) {
        h = rotate_right(h);
    }
    if h.right.is_none() {
        debug_assert!(h.left.is_none(), "max node with a dangling left subtree");
        let node = *h;
        return (None, node.value);
    }
    if !is_red(&h.right) && !h.right.as_ref().map_or(false, |r| is_red(&r.left)) {
        h = move_red_right(h);
    }
    let right = h.right.take().expect("max descent lost its right subtree");
    let (rest, value) = erase_max_node(right);
    h.right = rest;
    (Some(fixup(h)), value)
}

/// Remove one node matching `key`. Callers have already verified membership,
/// which is what lets the descent assume the standard red-availability
/// invariants hold on the side it walks.
fn erase_node<T: Element>(mut h: Box<Node<T>>, key: &T) -> Link<T> {
    if key.cmp(&h.value) == Ordering::Less {
        if !is_red(&h.left) && !left_child_red(&h.left) {
            h = move_red_left(h);
        }
        let left = h.left.take().expect("erase descended into a missing left subtree");
        h.left = erase_node(left, key);
    } else {
        if is_red(&h.left) {
            h = rotate_right(h);
        }
        if key.cmp(&h.value) == Ordering::Equal && h.right.is_none() {
            debug_assert!(h.left.is_none(), "matched leaf with a dangling left subtree");
            // Dropping the box runs the policy destroy on the value.
            return None;
        }
        if !is_red(&h.right) && !h.right.as_ref().map_or(false, |r| is_red(&r.left)) {
            h = move_red_right(h);
        }
        if key.cmp(&h.value) == Ordering::Equal {
            // Replace this value with its in-order successor and erase the
            // successor's node from the right subtree instead.
            let right = h.right.take().expect("matched node lost its right subtree");
            let (rest, successor) = erase_min_node(right);
            h.right = rest;
            h.value = successor;
        } else {
            let right = h.right.take().expect("erase descended into a missing right subtree");
            h.right = erase_node(right, key);
        }
    }
    Some(fixup(h))
}

fn min_node<T>(mut n: &Node<T>) -> &Node<T> {
    while let Some(l) = n.left.as_deref() {
        n = l;
    }
    n
}

fn max_node<T>(mut n: &Node<T>) -> &Node<T> {
    while let Some(r) = n.right.as_deref() {
        n = r;
    }
    n
}

fn node_size<T>(n: &Node<T>) -> usize {
    1 + n.left.as_deref().map_or(0, node_size) + n.right.as_deref().map_or(0, node_size)
}

fn node_height<T>(link: &Link<T>) -> isize {
    match link.as_deref() {
        None => -1,
        Some(n) => 1 + node_height(&n.left).max(node_height(&n.right)),
    }
}

fn node_leaf_count<T>(n: &Node<T>) -> usize {
    match (n.left.as_deref(), n.right.as_deref()) {
        (None, None) => 1,
        (l, r) => l.map_or(0, node_leaf_count) + r.map_or(0, node_leaf_count),
    }
}

/// Ordered collection of `T` under the element policy's total order.
#[derive(Clone)]
pub struct OrderedTree<T: Element> {
    root: Link<T>,
}

impl<T: Element> OrderedTree<T> {
    pub fn new() -> Self {
        OrderedTree { root: None }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Node count, computed by walking the tree.
    pub fn len(&self) -> usize {
        self.root.as_deref().map_or(0, node_size)
    }

    /// Height in edges; −1 for an empty tree.
    pub fn height(&self) -> isize {
        node_height(&self.root)
    }

    /// Count of non-nil leaves.
    pub fn leaf_count(&self) -> usize {
        self.root.as_deref().map_or(0, node_leaf_count)
    }

    /// Byte width of one element, as declared by the policy.
    pub const fn element_width(&self) -> usize {
        T::WIDTH
    }

    /// Insert `value`; duplicates are kept.
    pub fn insert(&mut self, value: T) {
        let root = insert_node(self.root.take(), value);
        self.root = Some(root);
        self.blacken_root();
    }

    /// Insert `value` unless an equal key is already present, in which case
    /// warn and change nothing.
    pub fn insert_unique(&mut self, value: T) {
        if self.find(&value).is_some() {
            warn!("insert_unique: {}", Error::DuplicateKey);
            return;
        }
        self.insert(value);
    }

    /// Iterative lookup; the first (topmost) match for duplicated keys.
    pub fn find(&self, key: &T) -> Option<&T> {
        let mut cur = self.root.as_deref();
        while let Some(n) = cur {
            match key.cmp(&n.value) {
                Ordering::Less => cur = n.left.as_deref(),
                Ordering::Greater => cur = n.right.as_deref(),
                Ordering::Equal => return Some(&n.value),
            }
        }
        None
    }

    pub fn contains(&self, key: &T) -> bool {
        self.find(key).is_some()
    }

    pub fn min(&self) -> Option<&T> {
        self.root.as_deref().map(|n| &min_node(n).value)
    }

    pub fn max(&self) -> Option<&T> {
        self.root.as_deref().map(|n| &max_node(n).value)
    }

    /// Smallest element strictly ordered after `key`'s node: the minimum of
    /// its right subtree when it has one, else the closest ancestor the
    /// descent turned left at. `None` when the key is absent or maximal.
    pub fn successor(&self, key: &T) -> Option<&T> {
        let mut cur = self.root.as_deref();
        let mut candidate = None;
        while let Some(n) = cur {
            match key.cmp(&n.value) {
                Ordering::Less => {
                    candidate = Some(&n.value);
                    cur = n.left.as_deref();
                }
                Ordering::Greater => cur = n.right.as_deref(),
                Ordering::Equal => {
                    return match n.right.as_deref() {
                        Some(r) => Some(&min_node(r).value),
                        None => candidate,
                    };
                }
            }
        }
        None
    }

    /// Mirror of [`successor`](OrderedTree::successor).
    pub fn predecessor(&self, key: &T) -> Option<&T> {
        let mut cur = self.root.as_deref();
        let mut candidate = None;
        while let Some(n) = cur {
            match key.cmp(&n.value) {
                Ordering::Greater => {
                    candidate = Some(&n.value);
                    cur = n.right.as_deref();
                }
                Ordering::Less => cur = n.left.as_deref(),
                Ordering::Equal => {
                    return match n.left.as_deref() {
                        Some(l) => Some(&max_node(l).value),
                        None => candidate,
                    };
                }
            }
        }
        None
    }

    /// Erase one node matching `key`. Returns whether anything was removed.
    pub fn erase(&mut self, key: &T) -> bool {
        if !self.contains(key) {
            return false;
        }
        let mut root = self.root.take().expect("contains() implies a root");
        if !is_red(&root.left) && !is_red(&root.right) {
            root.color = Color::Red;
        }
        self.root = erase_node(root, key);
        self.blacken_root();
        true
    }

    /// Remove and return the minimum element.
    pub fn erase_min(&mut self) -> Option<T> {
        let mut root = self.root.take()?;
        if !is_red(&root.left) && !is_red(&root.right) {
            root.color = Color::Red;
        }
        let (rest, value) = erase_min_node(root);
        self.root = rest;
        self.blacken_root();
        Some(value)
    }

    /// Remove and return the maximum element.
    pub fn erase_max(&mut self) -> Option<T> {
        let mut root = self.root.take()?;
        if !is_red(&root.left) && !is_red(&root.right) {
            root.color = Color::Red;
        }
        let (rest, value) = erase_max_node(root);
        self.root = rest;
        self.blacken_root();
        Some(value)
    }

    /// Drop every node (post-order, through ownership).
    pub fn clear(&mut self) {
        self.root = None;
    }

    fn blacken_root(&mut self) {
        if let Some(r) = self.root.as_mut() {
            r.color = Color::Black;
        }
    }

    /// Validate the red-black shape: black root, no red-red edge, red right
    /// children only inside 4-nodes, uniform black height, sorted in-order.
    /// Panics on violation.
    pub fn check(&self) {
        fn walk<T: Element>(n: &Node<T>) -> usize {
            if n.color == Color::Red {
                assert!(
                    !is_red(&n.left) && !is_red(&n.right),
                    "red node with a red child"
                );
            }
            if is_red(&n.right) {
                assert!(is_red(&n.left), "right-leaning red outside a 4-node");
            }
            let lh = n.left.as_deref().map_or(0, walk);
            let rh = n.right.as_deref().map_or(0, walk);
            assert_eq!(lh, rh, "black height mismatch");
            lh + (n.color == Color::Black) as usize
        }

        if let Some(root) = self.root.as_deref() {
            assert_eq!(root.color, Color::Black, "red root");
            walk(root);
        }

        let mut prev: Option<&T> = None;
        for v in self.iter() {
            if let Some(p) = prev {
                assert!(p.cmp(v) != Ordering::Greater, "in-order regression");
            }
            prev = Some(v);
        }
    }
}

impl<T: Element> Default for OrderedTree<T> {
    fn default() -> Self {
        OrderedTree::new()
    }
}

impl<T: Element> PartialEq for OrderedTree<T> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<T: Element> Eq for OrderedTree<T> {}

impl<T: Element> PartialOrd for OrderedTree<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Element> Ord for OrderedTree<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Element + fmt::Debug> fmt::Debug for OrderedTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Element> FromIterator<T> for OrderedTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = OrderedTree::new();
        for v in iter {
            tree.insert(v);
        }
        tree
    }
}

impl<T: Element> Extend<T> for OrderedTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for v in iter {
            self.insert(v);
        }
    }
}
