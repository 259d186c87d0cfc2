//! Functions that calculate various geometric properties such as distances, angles etc.
mod simple_geometric;
mod vec3;

pub use simple_geometric::*;
pub use vec3::Vec3;