use sdf_raycast::{
    Raytracer,
    camera::Intrinsics,
    config::RaycastConfig,
    grid::VoxelGrid,
    image::PixelSample,
    pose::Pose,
    types::{Point, Value, Vector},
};

const SHADES: &[u8] = b" .:-=+*#%@";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    const RESOLUTION: usize = 64;
    const RADIUS: f64 = 1.0;

    let grid = VoxelGrid::new(RESOLUTION, RESOLUTION, RESOLUTION)
        .with_voxel_size(3.0 / RESOLUTION as f64)?
        .with_min_point(Point::new(-1.5, -1.5, -1.5))
        .fill(&|p: Point| (p.coords.norm() - RADIUS) as Value);

    let (lowest, highest) = grid
        .values()
        .iter()
        .fold((Value::INFINITY, Value::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    log::info!("field samples range from {lowest:.3} to {highest:.3}");

    let pose = Pose::look_at(Point::new(1.5, -1.0, -2.5), Point::origin(), Vector::y());
    log::info!(
        "camera at {:?}, optical axis through {:?}",
        pose.translation,
        pose.transform_point(&Point::new(0.0, 0.0, 1.0))
    );
    let config = RaycastConfig::default().with_resolution(72, 36);
    // Terminal cells are roughly twice as tall as they are wide.
    let intrinsics = Intrinsics::new(0.6, 1.2, 0.5, 0.5);

    let raytracer = Raytracer::new(&grid, &pose, &intrinsics, config)?;
    let buffers = raytracer.render();
    log::info!(
        "{} of {} pixels hit the surface",
        buffers.hit_count(),
        buffers.width() * buffers.height()
    );

    // Shade by how directly each normal faces the camera.
    let light = Vector::new(-0.4, -0.5, -1.0).normalize();
    for v in 0..buffers.height() {
        let line: String = (0..buffers.width())
            .map(|u| match buffers.sample(u, v) {
                PixelSample::Hit { normal, .. } => {
                    let n = Vector::new(normal[0] as f64, normal[1] as f64, normal[2] as f64);
                    let lambert = n.dot(&light).max(0.0);
                    let index = (lambert * (SHADES.len() - 1) as f64).round() as usize;
                    SHADES[index] as char
                }
                PixelSample::Miss => ' ',
            })
            .collect();
        println!("{line}");
    }

    Ok(())
}
