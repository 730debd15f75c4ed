use super::traits::Containment;

use cgmath::{Point2, Vector2};
use cgmath::prelude::*;

/// An axis-aligned rectangle
///
/// `min` is the top-left corner and `max` the bottom-right corner; y grows downward, as in
/// screen coordinates.  This is both the region covered by a quadtree node and the shape of
/// a range query.
#[cfg_attr(feature="serde", derive(Deserialize, Serialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds<Point = Point2<f32>> {
    pub min: Point,
    pub max: Point
}

impl<Point> Bounds<Point>
where
    Point: EuclideanSpace + Copy
{
    pub fn new(min: Point, max: Point) -> Self {
        Self{min, max}
    }

    pub fn size(self) -> Point::Diff {
        self.max - self.min
    }
}

impl Bounds<Point2<f32>> {
    /// The square which encloses a circle
    pub fn around(center: Point2<f32>, radius: f32) -> Self {
        Self{
            min: center.add_element_wise(-radius),
            max: center.add_element_wise(radius)
        }
    }

    pub fn center(self) -> Point2<f32> {
        self.min.midpoint(self.max)
    }

    /// Non-empty, non-inverted and finite
    pub fn is_valid(self) -> bool {
        self.min.x.is_finite() && self.min.y.is_finite() &&
        self.max.x.is_finite() && self.max.y.is_finite() &&
        self.min.x < self.max.x &&
        self.min.y < self.max.y
    }

    /// Query containment; excludes the top and left edges, includes the bottom and right edges
    pub fn contains_query(self, point: Point2<f32>) -> bool {
        point.x >  self.min.x &&
        point.y >  self.min.y &&
        point.x <= self.max.x &&
        point.y <= self.max.y
    }

    /// Whether `query` may hold a point accepted by `query.contains_query` which also lies
    /// within `self` (edges inclusive)
    pub fn overlaps_query(self, query: Bounds<Point2<f32>>) -> bool {
        query.min.x <  self.max.x &&
        query.min.y <  self.max.y &&
        query.max.x >= self.min.x &&
        query.max.y >= self.min.y
    }

    /// Strict overlap of two boxes; boxes which only share an edge do not intersect
    pub fn intersects(self, other: Bounds<Point2<f32>>) -> bool {
        self.min.x < other.max.x &&
        self.max.x > other.min.x &&
        self.min.y < other.max.y &&
        self.max.y > other.min.y
    }

    /// Split into four quarters, in order: top-left, top-right, bottom-left, bottom-right
    pub fn quadrants(self) -> [Bounds<Point2<f32>>; 4] {
        let mid = self.center();
        [
            Bounds::new(self.min, mid),
            Bounds::new(Point2::new(mid.x, self.min.y), Point2::new(self.max.x, mid.y)),
            Bounds::new(Point2::new(self.min.x, mid.y), Point2::new(mid.x, self.max.y)),
            Bounds::new(mid, self.max)
        ]
    }

    /// The smallest box enclosing every point, or `None` for an empty iterator
    pub fn enclosing<Iter>(points: Iter) -> Option<Self>
    where
        Iter: IntoIterator<Item = Point2<f32>>
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Bounds::new(first, first), |bounds, point| Bounds{
            min: Point2::new(bounds.min.x.min(point.x), bounds.min.y.min(point.y)),
            max: Point2::new(bounds.max.x.max(point.x), bounds.max.y.max(point.y))
        }))
    }
}

/// Edges inclusive
impl Containment<Point2<f32>> for Bounds<Point2<f32>> {
    fn contains(self, point: Point2<f32>) -> bool {
        point.x >= self.min.x &&
        point.y >= self.min.y &&
        point.x <= self.max.x &&
        point.y <= self.max.y
    }
}

pub fn widen_vector(v: Vector2<f32>) -> Vector2<f64> {
    Vector2::new(f64::from(v.x), f64::from(v.y))
}

pub fn widen_point(p: Point2<f32>) -> Point2<f64> {
    Point2::new(f64::from(p.x), f64::from(p.y))
}

/// Returns `None` if either component is out of `f32` range
pub fn narrow_vector(v: Vector2<f64>) -> Option<Vector2<f32>> {
    Some(Vector2::new(narrow_scalar(v.x)?, narrow_scalar(v.y)?))
}

/// Returns `None` if either component is out of `f32` range
pub fn narrow_point(p: Point2<f64>) -> Option<Point2<f32>> {
    Some(Point2::new(narrow_scalar(p.x)?, narrow_scalar(p.y)?))
}

fn narrow_scalar(x: f64) -> Option<f32> {
    let narrowed: f32 = num_traits::cast(x)?;
    if narrowed.is_infinite() && x.is_finite() {
        None
    } else {
        Some(narrowed)
    }
}
