// mlodato, 20261019

//! 2D spatial reasoning for game simulations
//!
//! * [`Polygon`](struct.Polygon.html): convex polygons with transforms and separating
//!   axis collision, yielding a minimum translation to resolve overlap (narrow-phase)
//! * [`Quadtree`](struct.Quadtree.html): an adaptive index of point-like
//!   [`Agent`](struct.Agent.html)s for rectangle and radius queries (broad-phase)
//!
//! The two are independent; a typical caller shortlists nearby shapes with the quadtree and
//! then tests each candidate pair with `Polygon::collision`.
//!
//! Neither structure is synchronized; wrap it in a lock if it must be shared between threads.

extern crate cgmath;
extern crate num_traits;
extern crate rustc_hash;

#[macro_use]
extern crate log;

#[cfg(feature="parallel")]
extern crate rayon;

#[cfg(feature="serde")]
#[macro_use]
extern crate serde;

extern crate smallvec;

mod agent;
mod error;
mod geom;
mod polygon;
mod quadtree;
mod traits;

pub use agent::Agent;
pub use error::Error;
pub use geom::{Bounds, narrow_point, narrow_vector, widen_point, widen_vector};
pub use polygon::{Polygon, Side};
pub use quadtree::{Entry, Quadtree, QuadtreeBuilder, TreeId, DEFAULT_CAPACITY, DEFAULT_MAX_DEPTH};
pub use traits::{Containment, ObjectID, Perpendicular};
