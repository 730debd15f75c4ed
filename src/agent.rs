use super::error::Error;
use super::quadtree::TreeId;
use super::traits::ObjectID;

use cgmath::{Point2, Vector2};

use std::sync::{Arc, Weak};

/// Non-owning link to the tree indexing an agent
///
/// `token` dies when the tree is dropped or cleared, which releases the agent.
#[derive(Clone, Debug)]
struct Owner {
    tree: TreeId,
    token: Weak<()>
}

/// A point-like object which may be indexed by one [`Quadtree`](struct.Quadtree.html)
///
/// The tree keeps a copy of the agent's id and position; the agent keeps only a weak link to
/// the tree which indexes it.  While indexed, its position may only change through
/// [`Quadtree::relocate`](struct.Quadtree.html#method.relocate), so the tree never holds a
/// stale position.  Dropping or clearing the tree releases the agent.
#[derive(Debug)]
pub struct Agent<ID>
where
    ID: ObjectID
{
    id: ID,
    position: Point2<f32>,
    owner: Option<Owner>
}

/// Clones start out unindexed
impl<ID> Clone for Agent<ID>
where
    ID: ObjectID
{
    fn clone(&self) -> Self {
        Self::new(self.id, self.position)
    }
}

impl<ID> Agent<ID>
where
    ID: ObjectID
{
    pub fn new(id: ID, position: Point2<f32>) -> Self {
        Self{id, position, owner: None}
    }

    pub fn id(&self) -> ID {
        self.id
    }

    pub fn position(&self) -> Point2<f32> {
        self.position
    }

    /// The tree currently indexing this agent
    pub fn owner(&self) -> Option<TreeId> {
        self.owner.as_ref()
            .filter(|owner| owner.token.strong_count() > 0)
            .map(|owner| owner.tree)
    }

    pub fn is_indexed(&self) -> bool {
        self.owner().is_some()
    }

    pub fn move_to(&mut self, position: Point2<f32>) -> Result<(), Error> {
        if self.is_indexed() {
            return Err(Error::AgentIndexed);
        }
        self.position = position;
        Ok(())
    }

    pub fn move_by(&mut self, delta: Vector2<f32>) -> Result<(), Error> {
        let position = self.position + delta;
        self.move_to(position)
    }

    pub(crate) fn attach(&mut self, tree: TreeId, token: &Arc<()>) {
        self.owner = Some(Owner{tree, token: Arc::downgrade(token)});
    }

    pub(crate) fn detach(&mut self) {
        self.owner = None;
    }

    /// Whether the tree holding `token` currently indexes this agent
    pub(crate) fn is_owned_by(&self, token: &Arc<()>) -> bool {
        match &self.owner {
            Some(owner) => owner.token.strong_count() > 0
                && Weak::ptr_eq(&owner.token, &Arc::downgrade(token)),
            None => false
        }
    }

    pub(crate) fn set_position(&mut self, position: Point2<f32>) {
        self.position = position;
    }
}
