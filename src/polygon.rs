// mlodato, 20261019

use super::error::Error;
use super::geom::Bounds;
use super::traits::Perpendicular;

use cgmath::{Basis2, Point2, Rad, Vector2};
use cgmath::prelude::*;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

/// One edge of a [`Polygon`](struct.Polygon.html), from `a` to `b`
#[cfg_attr(feature="serde", derive(Deserialize, Serialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Side {
    pub a: Point2<f32>,
    pub b: Point2<f32>
}

impl Side {
    pub fn new(a: Point2<f32>, b: Point2<f32>) -> Self {
        Self{a, b}
    }

    pub fn vector(self) -> Vector2<f32> {
        self.b - self.a
    }

    pub fn middle(self) -> Point2<f32> {
        self.a.midpoint(self.b)
    }

    /// Left of `a -> b` (inward for counter-clockwise winding); its magnitude is the side length
    pub fn normal(self) -> Vector2<f32> {
        self.vector().perpendicular()
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Projection {
    min: f32,
    max: f32
}

impl Projection {
    fn overlaps(self, other: Projection) -> bool {
        self.max > other.min && self.min < other.max
    }

    /// How far `other` must move along the axis to stop overlapping `self`
    fn penetration(self, other: Projection) -> f32 {
        self.max - other.min
    }
}

/// A convex polygon in world space
///
/// Points are kept in counter-clockwise order; nothing checks this, so callers appending
/// points with [`add_point`](#method.add_point) are responsible for the winding.  `location`
/// is the anchor used for rotation and for orienting collision resolution; it need not be the
/// centroid.
#[cfg_attr(feature="serde", derive(Deserialize, Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    location: Point2<f32>,
    rotation: f32,
    points: Vec<Point2<f32>>,
    sides: Vec<Side>
}

impl Polygon {
    pub fn new() -> Self {
        Self::at(Point2::new(0f32, 0f32))
    }

    /// An empty polygon anchored at `location`
    pub fn at(location: Point2<f32>) -> Self {
        Self{
            location,
            rotation: 0f32,
            points: Vec::new(),
            sides: Vec::new()
        }
    }

    /// A square of the given side length centered on the origin
    pub fn make_square(side_length: f32) -> Self {
        let mut square = Self::new();
        square.add_point(Point2::new(-0.5f32, -0.5f32));
        square.add_point(Point2::new( 0.5f32, -0.5f32));
        square.add_point(Point2::new( 0.5f32,  0.5f32));
        square.add_point(Point2::new(-0.5f32,  0.5f32));
        square.scale(side_length);
        square
    }

    pub fn location(&self) -> Point2<f32> {
        self.location
    }

    /// Accumulated rotation in radians
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn points(&self) -> &[Point2<f32>] {
        &self.points
    }

    pub fn sides(&self) -> &[Side] {
        &self.sides
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether there are enough points to form sides; collision requires this
    pub fn is_valid(&self) -> bool {
        self.points.len() > 1
    }

    /// Append a point, given relative to `location`
    pub fn add_point(&mut self, point: Point2<f32>) {
        self.points.push(point + self.location.to_vec());
        self.recalculate_sides();
    }

    pub fn translate(&mut self, delta: Vector2<f32>) {
        self.location = self.location + delta;
        for point in &mut self.points {
            *point = *point + delta;
        }
        self.recalculate_sides();
    }

    /// Translate so that `location` lands on `target`
    pub fn move_to(&mut self, target: Point2<f32>) {
        let delta = target - self.location;
        self.translate(delta);
    }

    /// Rotate about `location`; positive angles turn counter-clockwise in a y-up frame
    pub fn rotate(&mut self, angle: f32) {
        self.rotation += angle;

        let basis: Basis2<f32> = Rotation2::from_angle(Rad(angle));
        let location = self.location;
        for point in &mut self.points {
            *point = location + basis.rotate_vector(*point - location);
        }
        self.recalculate_sides();
    }

    /// Scale every point about the origin (not about `location`)
    pub fn scale(&mut self, factor: f32) {
        for point in &mut self.points {
            *point = *point * factor;
        }
        self.recalculate_sides();
    }

    /// Insert the midpoint of every side, `times + 1` times over
    ///
    /// Each pass doubles the point count of a polygon without repeated points.  Point order
    /// follows side order, so winding is preserved.
    pub fn subdivide(&mut self, times: u32) {
        if !self.is_valid() {
            debug!("subdivide skipped for polygon with {} point(s)", self.points.len());
            return;
        }

        for _ in 0..=times {
            let mut seen: FxHashSet<(u32, u32)> = FxHashSet::default();
            let mut points = Vec::with_capacity(2 * self.sides.len());
            for side in &self.sides {
                for &point in &[side.a, side.middle(), side.b] {
                    if seen.insert(point_key(point)) {
                        points.push(point);
                    }
                }
            }
            self.points = points;
            self.recalculate_sides();
        }

        trace!("subdivided polygon to {} points", self.points.len());
    }

    /// Signed area by the shoelace formula; positive for counter-clockwise winding in a y-up frame
    pub fn area(&self) -> f32 {
        self.sides.iter()
            .map(|side| side.a.x * side.b.y - side.b.x * side.a.y)
            .sum::<f32>() / 2f32
    }

    /// The average of the points
    pub fn centroid(&self) -> Option<Point2<f32>> {
        if self.points.is_empty() {
            None
        } else {
            Some(Point2::centroid(&self.points))
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(self.points.iter().cloned())
    }

    /// Candidate separating axes: one (unnormalized) normal per side
    pub fn axes(&self) -> SmallVec<[Vector2<f32>; 8]> {
        self.sides.iter().map(|side| side.normal()).collect()
    }

    /// Test for overlap using the separating axis theorem
    ///
    /// Returns `Ok(None)` if the polygons are disjoint (touching counts as disjoint), or the
    /// minimum translation which, applied to `other`, moves it out of contact with `self`.
    /// Each axis is oriented from `self.location` toward `other.location` before measuring, so
    /// the translation always pushes `other` away from `self`.  Where the two locations are
    /// level along an axis, the shorter of both directions is used.  Exact for convex polygons
    /// only.
    pub fn collision(&self, other: &Polygon) -> Result<Option<Vector2<f32>>, Error> {
        if !self.is_valid() || !other.is_valid() {
            return Err(Error::InvalidPolygon);
        }

        let offset = other.location - self.location;
        let mut smallest: Option<(Vector2<f32>, f32)> = None;

        for axis in self.axes().into_iter().chain(other.axes()) {
            let length = axis.magnitude();
            if length <= 0f32 {
                continue;
            }

            let unit = axis / length;
            let lhs = self.project(unit);
            let rhs = other.project(unit);
            if !lhs.overlaps(rhs) {
                return Ok(None);
            }

            // pushing `other` along `-unit` needs `rhs.max - lhs.min`
            let along = offset.dot(unit);
            let (unit, penetration) = if along > 0f32 {
                (unit, lhs.penetration(rhs))
            } else if along < 0f32 {
                (-unit, rhs.penetration(lhs))
            } else {
                // anchors level on this axis: take whichever way is shorter
                let forward = lhs.penetration(rhs);
                let backward = rhs.penetration(lhs);
                if forward <= backward { (unit, forward) } else { (-unit, backward) }
            };

            if smallest.map_or(true, |(_, best)| penetration < best) {
                smallest = Some((unit, penetration));
            }
        }

        if smallest.is_none() {
            debug!("no usable separating axes; polygons have no extent");
        }

        Ok(smallest.map(|(unit, penetration)| unit * penetration))
    }

    fn project(&self, axis: Vector2<f32>) -> Projection {
        let first = axis.dot(self.points[0].to_vec());
        self.points[1..].iter()
            .map(|point| axis.dot(point.to_vec()))
            .fold(Projection{min: first, max: first}, |projection, p| Projection{
                min: projection.min.min(p),
                max: projection.max.max(p)
            })
    }

    fn recalculate_sides(&mut self) {
        self.sides.clear();
        if !self.is_valid() {
            return;
        }

        let points = &self.points;
        let n = points.len();
        self.sides.extend((0..n).map(|i| Side::new(points[i], points[(i + 1) % n])));
    }
}

impl Default for Polygon {
    fn default() -> Self {
        Self::new()
    }
}

/// Hashable identity of a point; `-0.0` and `0.0` share a key
fn point_key(point: Point2<f32>) -> (u32, u32) {
    ((point.x + 0f32).to_bits(), (point.y + 0f32).to_bits())
}
