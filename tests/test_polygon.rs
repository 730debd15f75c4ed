extern crate zvxryb_spatial2d as spatial2d;

extern crate cgmath;
extern crate env_logger;
extern crate rand;
extern crate rand_chacha;

use spatial2d::{Error, Polygon};

use cgmath::{Point2, Vector2};
use cgmath::prelude::*;
use rand::prelude::*;

use std::f32::consts::PI;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn square_at(x: f32, y: f32) -> Polygon {
    let mut square = Polygon::make_square(1f32);
    square.translate(Vector2::new(x, y));
    square
}

fn regular(sides: u32, radius: f32, location: Point2<f32>, rotation: f32) -> Polygon {
    let mut polygon = Polygon::at(location);
    for k in 0..sides {
        let theta = 2f32 * PI * k as f32 / sides as f32;
        polygon.add_point(Point2::new(radius * theta.cos(), radius * theta.sin()));
    }
    polygon.rotate(rotation);
    polygon
}

fn random_polygon<R: Rng>(prng: &mut R) -> Polygon {
    let sides = prng.gen_range(3, 9);
    let radius = prng.gen_range(0.5f32, 3f32);
    let location = Point2::new(prng.gen_range(-4f32, 4f32), prng.gen_range(-4f32, 4f32));
    let rotation = prng.gen_range(0f32, 2f32 * PI);
    regular(sides, radius, location, rotation)
}

#[test]
fn disjoint_squares() {
    init_logging();

    let lhs = square_at(0f32, 0f32);
    let rhs = square_at(10f32, 10f32);
    assert_eq!(lhs.collision(&rhs), Ok(None));
    assert_eq!(rhs.collision(&lhs), Ok(None));
}

#[test]
fn touching_squares_do_not_collide() {
    let lhs = square_at(0f32, 0f32);
    let rhs = square_at(1f32, 0f32);
    assert_eq!(lhs.collision(&rhs), Ok(None));
}

#[test]
fn overlapping_squares() {
    init_logging();

    let lhs = square_at(0f32, 0f32);
    let rhs = square_at(0.5f32, 0f32);
    let resolution = lhs.collision(&rhs).unwrap().expect("squares should overlap");
    assert!((resolution.x - 0.5f32).abs() < 1e-5, "{:?}", resolution);
    assert!(resolution.y.abs() < 1e-5, "{:?}", resolution);

    let mut resolved = rhs.clone();
    resolved.translate(resolution);
    assert_eq!(lhs.collision(&resolved), Ok(None));
}

#[test]
fn resolution_scales_with_shape() {
    let lhs = Polygon::make_square(4f32);
    let mut rhs = Polygon::make_square(4f32);
    rhs.translate(Vector2::new(0f32, 3f32));
    let resolution = lhs.collision(&rhs).unwrap().unwrap();
    assert!(resolution.x.abs() < 1e-5);
    assert!((resolution.y - 1f32).abs() < 1e-5, "{:?}", resolution);
}

#[test]
fn rotated_square_overlap() {
    let lhs = square_at(0f32, 0f32);
    let mut rhs = square_at(1.1f32, 0f32);
    assert_eq!(lhs.collision(&rhs), Ok(None));

    // a diamond reaches sqrt(2) / 2 to the left of its center
    rhs.rotate(PI / 4f32);
    let resolution = lhs.collision(&rhs).unwrap().expect("diamond should overlap");
    let expected = 0.5f32 + 0.5f32 * 2f32.sqrt() - 1.1f32;
    assert!((resolution.magnitude() - expected).abs() < 1e-4, "{:?}", resolution);
    assert!(resolution.x > 0f32);
}

#[test]
fn collision_is_symmetric() {
    init_logging();

    let mut prng = rand_chacha::ChaChaRng::seed_from_u64(0);
    let mut overlapping = 0;
    for _ in 0..500 {
        let lhs = random_polygon(&mut prng);
        let rhs = random_polygon(&mut prng);

        match (lhs.collision(&rhs).unwrap(), rhs.collision(&lhs).unwrap()) {
            (None, None) => {},
            (Some(forward), Some(backward)) => {
                overlapping += 1;
                assert!((forward.magnitude() - backward.magnitude()).abs() < 1e-4,
                    "{:?} vs {:?}", forward, backward);
                assert!((forward + backward).magnitude() < 1e-3,
                    "{:?} vs {:?}", forward, backward);
            },
            (forward, backward) => panic!("asymmetric result: {:?} vs {:?}", forward, backward)
        }
    }
    assert!(overlapping > 0);
}

#[test]
fn collision_is_symmetric_for_level_anchors() {
    init_logging();

    // both bottom sides share the y axis, along which the anchors are level
    let mut lhs = Polygon::at(Point2::new(0f32, 0f32));
    lhs.add_point(Point2::new(-1f32, -1f32));
    lhs.add_point(Point2::new( 1f32, -1f32));
    lhs.add_point(Point2::new( 0f32,  1f32));

    let mut rhs = Polygon::at(Point2::new(0.1f32, 0f32));
    rhs.add_point(Point2::new(-1f32, 0.8f32));
    rhs.add_point(Point2::new( 1f32, 0.8f32));
    rhs.add_point(Point2::new( 0f32, 3f32));

    let forward = lhs.collision(&rhs).unwrap().unwrap();
    let backward = rhs.collision(&lhs).unwrap().unwrap();
    assert!((forward - Vector2::new(0f32, 0.2f32)).magnitude() < 1e-5, "{:?}", forward);
    assert!((forward + backward).magnitude() < 1e-5, "{:?} vs {:?}", forward, backward);
}

#[test]
fn resolution_separates() {
    init_logging();

    let mut prng = rand_chacha::ChaChaRng::seed_from_u64(1);
    for _ in 0..500 {
        let lhs = random_polygon(&mut prng);
        let mut rhs = random_polygon(&mut prng);

        if let Some(resolution) = lhs.collision(&rhs).unwrap() {
            let margin = if resolution.magnitude() > 0f32 {
                resolution.normalize() * 1e-3
            } else {
                Vector2::new(0f32, 0f32)
            };
            rhs.translate(resolution * 1.001f32 + margin);
            assert_eq!(lhs.collision(&rhs), Ok(None), "resolution {:?}", resolution);
        }
    }
}

#[test]
fn disjoint_bounds_imply_disjoint_polygons() {
    let mut prng = rand_chacha::ChaChaRng::seed_from_u64(2);
    for _ in 0..500 {
        let lhs = random_polygon(&mut prng);
        let rhs = random_polygon(&mut prng);
        if !lhs.bounds().unwrap().intersects(rhs.bounds().unwrap()) {
            assert_eq!(lhs.collision(&rhs), Ok(None));
        }
    }
}

#[test]
fn subdivide_square_keeps_area() {
    let mut square = Polygon::make_square(1f32);
    square.translate(Vector2::new(3f32, -2f32));
    let area = square.area();
    let location = square.location();

    square.subdivide(0);
    assert_eq!(square.len(), 8);
    assert!((square.area() - area).abs() < 1e-4);
    assert_eq!(square.location(), location);

    square.subdivide(1);
    assert_eq!(square.len(), 32);
    assert!((square.area() - area).abs() < 1e-4);
}

#[test]
fn subdivided_polygon_still_collides() {
    let lhs = square_at(0f32, 0f32);
    let mut rhs = square_at(0.5f32, 0f32);
    rhs.subdivide(1);

    let resolution = lhs.collision(&rhs).unwrap().unwrap();
    assert!((resolution - Vector2::new(0.5f32, 0f32)).magnitude() < 1e-5, "{:?}", resolution);
}

#[test]
fn invalid_polygons_are_rejected() {
    let square = square_at(0f32, 0f32);
    let empty = Polygon::new();
    assert_eq!(square.collision(&empty), Err(Error::InvalidPolygon));
    assert_eq!(empty.collision(&square), Err(Error::InvalidPolygon));
}
