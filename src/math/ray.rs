use glam::Vec3;

use super::AABB;

/// Slab test returning the parametric entry and exit distances of a ray
/// through a box. The entry distance is clamped to zero when the origin
/// lies inside the box. Returns `None` on a miss or when the box is
/// entirely behind the origin.
pub fn intersect_aabb(ray_origin: Vec3, ray_dir: Vec3, bounds: &AABB) -> Option<(f32, f32)> {
    const EPSILON: f32 = 1e-8;

    // Near-zero direction components are clamped to a large inverse
    let inv_dir = Vec3::new(
        if ray_dir.x.abs() < EPSILON { 1.0 / EPSILON.copysign(ray_dir.x) } else { 1.0 / ray_dir.x },
        if ray_dir.y.abs() < EPSILON { 1.0 / EPSILON.copysign(ray_dir.y) } else { 1.0 / ray_dir.y },
        if ray_dir.z.abs() < EPSILON { 1.0 / EPSILON.copysign(ray_dir.z) } else { 1.0 / ray_dir.z },
    );

    let t_min = (bounds.min - ray_origin) * inv_dir;
    let t_max = (bounds.max - ray_origin) * inv_dir;

    let t1 = t_min.min(t_max);
    let t2 = t_min.max(t_max);

    let t_near = t1.x.max(t1.y).max(t1.z);
    let t_far = t2.x.min(t2.y).min(t2.z);

    if t_near > t_far || t_far < 0.0 {
        return None;
    }

    Some((t_near.max(0.0), t_far))
}
