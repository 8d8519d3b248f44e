//! The tile-to-geometry pipeline: density curve, volume decomposition,
//! material resolution, scene synchronization, and the isometric camera.

pub mod camera;
pub mod density;
pub mod geometry;
pub mod materials;
pub mod scene_sync;

pub use camera::*;
pub use density::*;
pub use geometry::*;
pub use materials::*;
pub use scene_sync::*;
