#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    camera::{Intrinsics, PixelIntrinsics},
    config::RaycastConfig,
    error::Result,
    grid::VoxelField,
    image::{FrameBuffers, PixelSample},
    pose::Pose,
    search::ZeroCrossingSearch,
};

/// Renders depth and normal maps of a [`VoxelField`] seen from one camera.
///
/// Every pixel is traced independently by [`trace_pixel`](Raytracer::trace_pixel):
///
/// ```text
/// Per pixel (u, v):
/// 1. ray_direction(u, v)           →  camera-space ray with z = 1
/// 2. pose.transform_vector          →  world-space ray from pose.translation
/// 3. project_ray_to_voxel_point     →  entry length, or Miss
/// 4. ZeroCrossingSearch::search     →  crossing length, or Miss
/// 5. field.gradient at the crossing →  rotated into camera space and normalized
/// ```
pub struct Raytracer<'a, F: VoxelField + ?Sized> {
    field: &'a F,
    pose: Pose,
    intrinsics: PixelIntrinsics,
    config: RaycastConfig,
    search: ZeroCrossingSearch,
}

impl<'a, F: VoxelField + ?Sized> Raytracer<'a, F> {
    /// Prepares a render of `field` from `pose`, denormalizing `intrinsics` to the
    /// resolution in `config`.
    ///
    /// Returns an error if `config` fails [`RaycastConfig::validate`].
    pub fn new(
        field: &'a F,
        pose: &Pose,
        intrinsics: &Intrinsics,
        config: RaycastConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            field,
            pose: *pose,
            intrinsics: intrinsics.denormalize(config.width, config.height),
            config,
            search: config.search(),
        })
    }

    pub fn config(&self) -> &RaycastConfig {
        &self.config
    }

    /// Traces the ray through pixel `(u, v)`.
    ///
    /// A hit carries the crossing length as depth and the field gradient, rotated into
    /// camera space, as a unit normal. Where the gradient vanishes the normal faces
    /// back along the ray instead.
    ///
    /// # Panics
    /// Panics if a hit would be written with a depth of exactly `0.0`.
    pub fn trace_pixel(&self, u: usize, v: usize) -> PixelSample {
        let camera_ray = self.intrinsics.ray_direction(u, v);
        let direction = self.pose.transform_vector(&camera_ray);
        let origin = self.pose.translation;

        let Some(entry) = self.field.project_ray_to_voxel_point(&origin, &direction) else {
            return PixelSample::Miss;
        };
        let Some(length) = self.search.search(self.field, &origin, &direction, entry) else {
            return PixelSample::Miss;
        };

        let depth = length as f32;
        if depth == 0.0 {
            tracing::error!(u, v, "invalid depth value, will exit now");
            panic!("invalid zero depth at ({v}, {u})");
        }

        let point = origin + direction * length;
        let gradient = self
            .pose
            .inverse_transform_vector(&self.field.gradient(&point));
        let normal = gradient
            .try_normalize(0.0)
            .unwrap_or_else(|| -camera_ray.normalize());

        PixelSample::Hit {
            depth,
            normal: [normal.x as f32, normal.y as f32, normal.z as f32],
        }
    }
}

impl<'a, F: VoxelField + Sync + ?Sized> Raytracer<'a, F> {
    /// Allocates new buffers at the configured resolution and renders into them.
    pub fn render(&self) -> FrameBuffers {
        let mut buffers = FrameBuffers::new(self.config.width, self.config.height);
        self.write_rows(&mut buffers);
        buffers
    }

    /// Overwrites every pixel of `buffers` with a hit or the no-hit sentinel.
    ///
    /// Returns [`RaycastError::BufferShapeMismatch`](crate::error::RaycastError::BufferShapeMismatch)
    /// if the buffers are not `height × width`.
    pub fn render_into(&self, buffers: &mut FrameBuffers) -> Result<()> {
        buffers.check_shape(self.config.width, self.config.height)?;
        self.write_rows(buffers);
        Ok(())
    }

    fn write_rows(&self, buffers: &mut FrameBuffers) {
        let _span = tracing::debug_span!(
            "raytrace_image",
            width = self.config.width,
            height = self.config.height
        )
        .entered();

        for (v, row) in self.trace_rows().into_iter().enumerate() {
            for (u, sample) in row.into_iter().enumerate() {
                buffers.write(u, v, sample);
            }
        }

        tracing::debug!(
            hits = buffers.hit_count(),
            pixels = self.config.width * self.config.height,
            "raytraced image"
        );
    }

    /// Traces every pixel, one `Vec` per image row.
    ///
    /// Rows are traced in parallel with Rayon when the `parallel` feature is enabled.
    fn trace_rows(&self) -> Vec<Vec<PixelSample>> {
        let width = self.config.width;
        let row = |v: usize| -> Vec<PixelSample> {
            (0..width).map(|u| self.trace_pixel(u, v)).collect()
        };

        #[cfg(feature = "parallel")]
        let rows = (0..self.config.height).into_par_iter().map(row).collect();
        #[cfg(not(feature = "parallel"))]
        let rows = (0..self.config.height).map(row).collect();

        rows
    }
}

/// Renders `field` from `pose` into caller-owned `buffers`.
///
/// Convenience wrapper around [`Raytracer::new`] and [`Raytracer::render_into`].
pub fn raytrace_image<F: VoxelField + Sync + ?Sized>(
    field: &F,
    pose: &Pose,
    intrinsics: &Intrinsics,
    config: &RaycastConfig,
    buffers: &mut FrameBuffers,
) -> Result<()> {
    Raytracer::new(field, pose, intrinsics, *config)?.render_into(buffers)
}
