pub mod camera;
pub mod config;
pub mod error;
pub mod grid;
pub mod image;
pub mod interp;
pub mod pose;
pub mod raytracer;
pub mod search;
pub mod types;

pub use raytracer::{Raytracer, raytrace_image};
