//! Region data model, snapshot subscription, and the demo region source.

pub mod model;
pub mod procgen;
pub mod subscription;

pub use model::*;
pub use procgen::*;
pub use subscription::*;
