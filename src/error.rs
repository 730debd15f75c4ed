use std::fmt::{Display, Formatter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// A polygon needs at least two points before it has sides to test against
    InvalidPolygon,
    /// Tree bounds must be finite with `min` strictly above and left of `max`
    InvalidBounds,
    ZeroCapacity,
    /// The agent is indexed by a tree; move it with `Quadtree::relocate`
    AgentIndexed
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Error::InvalidPolygon => write!(f, "polygon has fewer than two points"),
            Error::InvalidBounds => write!(f, "bounds are empty, inverted or not finite"),
            Error::ZeroCapacity => write!(f, "quadtree bucket capacity must be at least one"),
            Error::AgentIndexed => write!(f, "agent is indexed by a quadtree and must be relocated through it")
        }
    }
}

impl std::error::Error for Error {}
