mod aabb;
mod color;
mod ray;

pub use aabb::AABB;
pub use color::{linear_to_srgb, to_srgba8};
pub use ray::intersect_aabb;
