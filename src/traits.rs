// mlodato, 20261019

use cgmath::{BaseNum, Vector2};

use std::fmt::Debug;
use std::hash::Hash;
use std::ops::Neg;

/// Identifies an agent inside a [`Quadtree`](struct.Quadtree.html)
///
/// Removal matches bucket entries by this id, so a tree refuses to index two agents with
/// the same id at once.
#[cfg(not(feature="parallel"))]
pub trait ObjectID: Copy + Clone + Hash + Eq + Debug {}

#[cfg(not(feature="parallel"))]
impl<T: Copy + Clone + Hash + Eq + Debug> ObjectID for T {}

#[cfg(feature="parallel")]
pub trait ObjectID: Copy + Clone + Hash + Eq + Send + Sync + Debug {}

#[cfg(feature="parallel")]
impl<T: Copy + Clone + Hash + Eq + Send + Sync + Debug> ObjectID for T {}

pub trait Containment<RHS = Self> {
    fn contains(self, other: RHS) -> bool;
}

/// A quarter turn counter-clockwise, without normalization
pub trait Perpendicular {
    fn perpendicular(self) -> Self;
}

impl<S> Perpendicular for Vector2<S>
where
    S: BaseNum + Neg<Output = S>
{
    fn perpendicular(self) -> Self {
        Vector2::new(-self.y, self.x)
    }
}
