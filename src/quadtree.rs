// mlodato, 20261019

use super::agent::Agent;
use super::error::Error;
use super::geom::Bounds;
use super::traits::{Containment, ObjectID};

use cgmath::Point2;
use cgmath::prelude::*;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature="parallel")]
use rayon::prelude::*;

/// Bucket size at which a node subdivides, unless configured otherwise
pub const DEFAULT_CAPACITY: usize = 100;

/// Depth below which nodes never subdivide, unless configured otherwise
pub const DEFAULT_MAX_DEPTH: u32 = 16;

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(0);

/// Identifies a [`Quadtree`](struct.Quadtree.html); held by the agents it indexes
#[cfg_attr(feature="serde", derive(Deserialize, Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TreeId(u64);

impl TreeId {
    fn next() -> Self {
        TreeId(NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// The tree's copy of an indexed agent
#[cfg_attr(feature="serde", derive(Deserialize, Serialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entry<ID> {
    pub id: ID,
    pub position: Point2<f32>
}

#[derive(Clone, Copy, Debug)]
struct Limits {
    capacity: usize,
    max_depth: u32
}

#[derive(Clone, Debug)]
struct Node<ID> {
    bounds: Bounds,
    children: Option<Box<[Node<ID>; 4]>>,
    entries: Vec<Entry<ID>>,
    // entries in this node and every descendant
    len: usize
}

impl<ID> Node<ID>
where
    ID: ObjectID
{
    fn new(bounds: Bounds) -> Self {
        Self{
            bounds,
            children: None,
            entries: Vec::with_capacity(4),
            len: 0
        }
    }

    fn is_subtree_empty(&self) -> bool {
        self.len == 0
    }

    fn subdivide(&mut self) {
        if self.children.is_none() {
            let [tl, tr, bl, br] = self.bounds.quadrants();
            self.children = Some(Box::new([
                Node::new(tl),
                Node::new(tr),
                Node::new(bl),
                Node::new(br)]));
        }
    }

    /// Drops the children if no entry remains anywhere beneath them
    fn try_collapse(&mut self) -> bool {
        let collapse = match &self.children {
            Some(children) => children.iter().all(|child| child.is_subtree_empty()),
            None => false
        };
        if collapse {
            self.children = None;
        }
        collapse
    }

    fn insert(&mut self, entry: Entry<ID>, depth: u32, limits: Limits) -> bool {
        if !self.bounds.contains(entry.position) {
            return false;
        }

        if self.try_collapse() {
            trace!("collapsed empty children of node {:?} at depth {}", self.bounds, depth);
        }

        if self.entries.len() < limits.capacity || depth >= limits.max_depth {
            if self.entries.len() == limits.capacity {
                warn!("node {:?} at max depth {} exceeds capacity {}; agents may be coincident",
                    self.bounds, depth, limits.capacity);
            }
            self.entries.push(entry);
            self.len += 1;
            return true;
        }

        if self.children.is_none() {
            self.subdivide();
            trace!("subdivided node {:?} at depth {}", self.bounds, depth);
        }

        let inserted = match &mut self.children {
            Some(children) => children.iter_mut().any(|child| child.insert(entry, depth + 1, limits)),
            None => false
        };
        if inserted {
            self.len += 1;
        }
        inserted
    }

    fn remove(&mut self, id: ID, position: Point2<f32>) -> bool {
        if !self.bounds.contains(position) {
            return false;
        }

        if let Some(i) = self.entries.iter().position(|entry| entry.id == id) {
            self.entries.remove(i);
            self.len -= 1;
            return true;
        }

        let removed = match &mut self.children {
            Some(children) => children.iter_mut().any(|child| child.remove(id, position)),
            None => false
        };
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// Pre-order walk (bucket, then `tl, tr, bl, br`) over nodes accepted by `filter`
    fn visit<'a, F, V>(&'a self, mut filter: F, mut visitor: V)
    where
        F: FnMut(&Node<ID>) -> bool,
        V: FnMut(&'a Node<ID>)
    {
        let mut stack: SmallVec<[&'a Node<ID>; 32]> = SmallVec::new();
        if filter(self) {
            stack.push(self);
        }
        while let Some(node) = stack.pop() {
            visitor(node);
            if let Some(children) = &node.children {
                stack.extend(children.iter().rev().filter(|child| filter(*child)));
            }
        }
    }

    fn compact(&mut self) -> usize {
        let mut collapsed = match &mut self.children {
            Some(children) => children.iter_mut().map(|child| child.compact()).sum::<usize>(),
            None => 0
        };
        if self.try_collapse() {
            collapsed += 1;
        }
        collapsed
    }

    fn depth(&self) -> u32 {
        match &self.children {
            Some(children) => 1 + children.iter().map(|child| child.depth()).max().unwrap_or(0),
            None => 0
        }
    }
}

/// A spatial index of point agents over a fixed rectangle
///
/// Each node holds a bucket of up to `capacity` agents.  A node which must accept an agent
/// while its bucket is full splits into four quadrants and hands the agent to the first
/// quadrant (top-left, top-right, bottom-left, bottom-right) containing it.  Children which
/// have emptied out are dropped lazily, the next time an agent is inserted through their
/// parent, or all at once by [`compact`](#method.compact).  Every node counts the agents
/// beneath it, so deciding whether to collapse is constant-time.
///
/// Agent ids are unique within a tree; inserting a second agent with an indexed id fails.
///
/// The tree is not synchronized.  Query results are materialized before they are returned,
/// so the tree may be mutated while a result is consumed.
#[derive(Debug)]
pub struct Quadtree<ID>
where
    ID: ObjectID
{
    id: TreeId,
    // agents hold weak references; replacing this releases them
    token: Arc<()>,
    limits: Limits,
    ids: FxHashSet<ID>,
    root: Node<ID>
}

/// Clones get a fresh [`TreeId`](struct.TreeId.html) and index none of the original's agents
///
/// The copy still reports the original's entries from its queries, but can never remove or
/// relocate the agents behind them.
impl<ID> Clone for Quadtree<ID>
where
    ID: ObjectID
{
    fn clone(&self) -> Self {
        Self{
            id: TreeId::next(),
            token: Arc::new(()),
            limits: self.limits,
            ids: self.ids.clone(),
            root: self.root.clone()
        }
    }
}

impl<ID> Quadtree<ID>
where
    ID: ObjectID
{
    /// A tree with the default capacity and depth limit
    pub fn new(bounds: Bounds) -> Result<Self, Error> {
        QuadtreeBuilder::new().build(bounds)
    }

    pub fn id(&self) -> TreeId {
        self.id
    }

    pub fn bounds(&self) -> Bounds {
        self.root.bounds
    }

    pub fn capacity(&self) -> usize {
        self.limits.capacity
    }

    pub fn max_depth(&self) -> u32 {
        self.limits.max_depth
    }

    /// Number of indexed agents
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Index an agent at its current position
    ///
    /// Fails if the position is outside the tree's bounds, if the agent is already indexed
    /// (by this or any other tree), or if another agent with the same id is indexed here.
    pub fn insert(&mut self, agent: &mut Agent<ID>) -> bool {
        if let Some(owner) = agent.owner() {
            debug!("agent {:?} is already indexed by {:?}", agent.id(), owner);
            return false;
        }
        if self.ids.contains(&agent.id()) {
            debug!("another agent with id {:?} is already indexed by {:?}", agent.id(), self.id);
            return false;
        }

        let entry = Entry{id: agent.id(), position: agent.position()};
        if !self.root.insert(entry, 0, self.limits) {
            debug!("agent {:?} at {:?} is outside {:?}", entry.id, entry.position, self.root.bounds);
            return false;
        }

        self.ids.insert(entry.id);
        agent.attach(self.id, &self.token);
        true
    }

    /// Stop indexing an agent; fails if this tree does not index it
    pub fn remove(&mut self, agent: &mut Agent<ID>) -> bool {
        if !agent.is_owned_by(&self.token) {
            debug!("agent {:?} is not indexed by {:?}", agent.id(), self.id);
            return false;
        }

        if !self.root.remove(agent.id(), agent.position()) {
            debug!("agent {:?} was not found at {:?}", agent.id(), agent.position());
            return false;
        }

        self.ids.remove(&agent.id());
        agent.detach();
        true
    }

    /// Move an indexed agent, re-bucketing it
    ///
    /// Nothing changes if the agent is not indexed by this tree or `position` is outside the
    /// tree's bounds.
    pub fn relocate(&mut self, agent: &mut Agent<ID>, position: Point2<f32>) -> bool {
        if !agent.is_owned_by(&self.token) || !self.root.bounds.contains(position) {
            return false;
        }

        if !self.root.remove(agent.id(), agent.position()) {
            debug!("agent {:?} was not found at {:?}", agent.id(), agent.position());
            return false;
        }

        agent.set_position(position);
        if !self.root.insert(Entry{id: agent.id(), position}, 0, self.limits) {
            self.ids.remove(&agent.id());
            agent.detach();
            return false;
        }
        true
    }

    /// Every agent strictly below and right of `query.min`, and at or above and left of `query.max`
    pub fn query(&self, query: Bounds) -> Vec<Entry<ID>> {
        let mut result = Vec::new();
        self.root.visit(
            |node| node.bounds.overlaps_query(query),
            |node| result.extend(node.entries.iter()
                .filter(|entry| query.contains_query(entry.position))));
        result
    }

    /// Every agent within `radius` of `center`
    ///
    /// This filters the result of a query over the enclosing square, so agents on that
    /// square's top or left edge are not reported.
    pub fn query_radius(&self, center: Point2<f32>, radius: f32) -> impl Iterator<Item = Entry<ID>> {
        self.query(Bounds::around(center, radius))
            .into_iter()
            .filter(move |entry| (entry.position - center).magnitude() <= radius)
    }

    /// Run several queries in parallel; each result matches [`query`](#method.query)
    #[cfg(feature="parallel")]
    pub fn par_query_many(&self, queries: &[Bounds]) -> Vec<Vec<Entry<ID>>> {
        queries.par_iter()
            .map(|&query| self.query(query))
            .collect()
    }

    /// Every indexed agent
    ///
    /// This is primarily intended for visualization + debugging
    pub fn contents(&self) -> Vec<Entry<ID>> {
        let mut result = Vec::with_capacity(self.len());
        self.root.visit(|_| true, |node| result.extend(node.entries.iter()));
        result
    }

    /// Collapse every subtree which holds no agents, returning the number of collapses
    pub fn compact(&mut self) -> usize {
        let collapsed = self.root.compact();
        if collapsed > 0 {
            debug!("compaction collapsed {} subtree(s)", collapsed);
        }
        collapsed
    }

    /// Forget every agent and every subdivision
    ///
    /// Agents indexed before the call are released and may move or be inserted again.
    pub fn clear(&mut self) {
        self.root = Node::new(self.root.bounds);
        self.ids.clear();
        self.token = Arc::new(());
    }

    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.root.visit(|_| true, |_| count += 1);
        count
    }

    /// Levels beneath the root; zero for a tree which never subdivided
    pub fn depth(&self) -> u32 {
        self.root.depth()
    }
}

/// A builder for `Quadtree`s
#[derive(Clone, Copy, Debug)]
pub struct QuadtreeBuilder {
    capacity: usize,
    max_depth: u32
}

impl Default for QuadtreeBuilder {
    fn default() -> Self {
        Self{
            capacity: DEFAULT_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH
        }
    }
}

impl QuadtreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Agents held by a node before it subdivides
    pub fn with_capacity(&mut self, capacity: usize) -> &mut Self {
        self.capacity = capacity;
        self
    }

    /// Nodes at this depth accept agents past capacity instead of subdividing
    pub fn with_max_depth(&mut self, depth: u32) -> &mut Self {
        self.max_depth = depth;
        self
    }

    pub fn build<ID>(&self, bounds: Bounds) -> Result<Quadtree<ID>, Error>
    where
        ID: ObjectID
    {
        if !bounds.is_valid() {
            return Err(Error::InvalidBounds);
        }
        if self.capacity == 0 {
            return Err(Error::ZeroCapacity);
        }

        Ok(Quadtree{
            id: TreeId::next(),
            token: Arc::new(()),
            limits: Limits{
                capacity: self.capacity,
                max_depth: self.max_depth
            },
            ids: FxHashSet::default(),
            root: Node::new(bounds)
        })
    }
}
