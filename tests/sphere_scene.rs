//! End-to-end renders of a sphere stored in a dense voxel grid.
//!
//! The field is the signed distance `|p| - R`: positive outside the sphere, negative
//! inside, so rays from an outside camera see a positive-to-negative crossing on the
//! near side of the sphere.

use approx::assert_abs_diff_eq;
use sdf_raycast::{
    Raytracer,
    camera::Intrinsics,
    config::RaycastConfig,
    grid::{VoxelField, VoxelGrid},
    image::{FrameBuffers, NO_HIT, NO_HIT_NORMAL, PixelSample},
    pose::Pose,
    raytrace_image,
    types::{Point, Value, Vector},
};

const RADIUS: f64 = 1.0;
const CAMERA_DISTANCE: f64 = 3.0;
const SIZE: usize = 33;

/// 60 voxels of 0.05 per axis spanning [-1.5, 1.5]^3.
fn sphere_grid() -> VoxelGrid {
    VoxelGrid::new(60, 60, 60)
        .with_voxel_size(0.05)
        .expect("valid voxel size")
        .with_min_point(Point::new(-1.5, -1.5, -1.5))
        .fill(&|p: Point| (p.coords.norm() - RADIUS) as Value)
}

fn intrinsics() -> Intrinsics {
    Intrinsics::new(1.0, 1.0, 0.5, 0.5)
}

fn config() -> RaycastConfig {
    RaycastConfig::default()
        .with_resolution(SIZE, SIZE)
        .with_step_size_voxel(0.5)
        .with_epsilon(1e-3)
}

fn centre() -> usize {
    SIZE / 2
}

#[test]
fn centre_pixel_sees_near_side_of_sphere() {
    let grid = sphere_grid();
    let pose = Pose::look_at(
        Point::new(0.0, 0.0, -CAMERA_DISTANCE),
        Point::origin(),
        Vector::y(),
    );
    let raytracer = Raytracer::new(&grid, &pose, &intrinsics(), config()).unwrap();

    let PixelSample::Hit { depth, normal } = raytracer.trace_pixel(centre(), centre()) else {
        panic!("centre ray should hit the sphere");
    };

    assert_abs_diff_eq!(depth as f64, CAMERA_DISTANCE - RADIUS, epsilon = 2e-2);
    // Facing back along the optical axis.
    assert_abs_diff_eq!(normal[0], 0.0, epsilon = 1e-3);
    assert_abs_diff_eq!(normal[1], 0.0, epsilon = 1e-3);
    assert_abs_diff_eq!(normal[2], -1.0, epsilon = 1e-3);
}

#[test]
fn result_does_not_depend_on_viewing_axis() {
    let grid = sphere_grid();
    let pose = Pose::look_at(
        Point::new(CAMERA_DISTANCE, 0.0, 0.0),
        Point::origin(),
        Vector::z(),
    );
    let raytracer = Raytracer::new(&grid, &pose, &intrinsics(), config()).unwrap();
    let sample = raytracer.trace_pixel(centre(), centre());

    assert_abs_diff_eq!(sample.depth() as f64, CAMERA_DISTANCE - RADIUS, epsilon = 2e-2);
    assert_abs_diff_eq!(sample.normal()[2], -1.0, epsilon = 1e-3);
}

#[test]
fn every_pixel_is_a_unit_normal_hit_or_full_sentinel() {
    let grid = sphere_grid();
    let pose = Pose::look_at(
        Point::new(0.0, 0.0, -CAMERA_DISTANCE),
        Point::origin(),
        Vector::y(),
    );
    let buffers = Raytracer::new(&grid, &pose, &intrinsics(), config())
        .unwrap()
        .render();

    let mut hits = 0;
    for ((v, u), &depth) in buffers.depth.indexed_iter() {
        let normal = buffers.normal[[v, u]];
        if depth == NO_HIT {
            assert_eq!(normal, NO_HIT_NORMAL, "pixel ({u}, {v})");
        } else {
            hits += 1;
            assert!(depth.is_finite() && depth > 0.0, "pixel ({u}, {v})");
            let norm = normal.iter().map(|c| c * c).sum::<f32>().sqrt();
            assert_abs_diff_eq!(norm, 1.0, epsilon = 1e-4);
        }
    }

    // The sphere fills the middle of the view; corners miss.
    assert!(hits > 0);
    assert_eq!(buffers.sample(0, 0), PixelSample::Miss);
    assert_eq!(buffers.hit_count(), hits);
}

#[test]
fn rays_past_the_silhouette_miss() {
    let grid = sphere_grid();
    // Looking parallel to the sphere, offset sideways by more than its radius.
    let pose = Pose::look_at(
        Point::new(1.2, 0.0, -CAMERA_DISTANCE),
        Point::new(1.2, 0.0, 0.0),
        Vector::y(),
    );
    let raytracer = Raytracer::new(&grid, &pose, &intrinsics(), config()).unwrap();

    // The ray enters the grid but leaves it without crossing the surface.
    let sample = raytracer.trace_pixel(centre(), centre());
    assert_eq!(sample, PixelSample::Miss);
    assert_eq!(sample.depth(), NO_HIT);
    assert_eq!(sample.normal(), NO_HIT_NORMAL);
}

#[test]
fn camera_inside_the_sphere_sees_nothing() {
    let grid = sphere_grid();
    let pose = Pose::look_at(Point::new(0.0, 0.0, -0.2), Point::origin(), Vector::y());
    let buffers = Raytracer::new(&grid, &pose, &intrinsics(), config())
        .unwrap()
        .render();

    assert_eq!(buffers.hit_count(), 0);
}

#[test]
fn rendering_is_deterministic() {
    let grid = sphere_grid();
    let pose = Pose::look_at(
        Point::new(0.7, -0.4, -CAMERA_DISTANCE),
        Point::origin(),
        Vector::y(),
    );
    let config = config().with_resolution(24, 16);

    let mut first = FrameBuffers::new(24, 16);
    let mut second = FrameBuffers::new(24, 16);
    raytrace_image(&grid, &pose, &intrinsics(), &config, &mut first).unwrap();
    raytrace_image(&grid, &pose, &intrinsics(), &config, &mut second).unwrap();

    assert!(first.hit_count() > 0);
    for (a, b) in first.depth.iter().zip(second.depth.iter()) {
        assert_eq!(a.to_bits(), b.to_bits());
    }
    for (a, b) in first.normal.iter().zip(second.normal.iter()) {
        assert_eq!(a.map(f32::to_bits), b.map(f32::to_bits));
    }
}

#[test]
fn depth_is_measured_along_the_optical_axis() {
    let grid = sphere_grid();
    let pose = Pose::look_at(
        Point::new(0.0, 0.0, -CAMERA_DISTANCE),
        Point::origin(),
        Vector::y(),
    );
    let raytracer = Raytracer::new(&grid, &pose, &intrinsics(), config()).unwrap();

    // An off-centre pixel: the hit point's z offset from the camera equals the depth.
    let (u, v) = (centre() + 4, centre() - 3);
    let PixelSample::Hit { depth, .. } = raytracer.trace_pixel(u, v) else {
        panic!("off-centre ray should hit the sphere");
    };
    let px = intrinsics().denormalize(SIZE, SIZE);
    let ray = pose.transform_vector(&px.ray_direction(u, v));
    let hit = pose.translation + ray * depth as f64;

    assert_abs_diff_eq!(hit.z - pose.translation.z, depth as f64, epsilon = 1e-4);
    assert_abs_diff_eq!(hit.coords.norm(), RADIUS, epsilon = 2e-2);
    assert!(grid.value_at_point(&hit).abs() < 2e-2);
}
