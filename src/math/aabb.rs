use glam::Vec3;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Length of the min-to-max diagonal
    pub fn diagonal_length(&self) -> f32 {
        self.size().length()
    }

    /// True when the box has no positive extent on some axis
    pub fn is_degenerate(&self) -> bool {
        let size = self.size();
        !(size.x > 0.0 && size.y > 0.0 && size.z > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_new() {
        let min = Vec3::new(0.0, 0.0, 0.0);
        let max = Vec3::new(1.0, 1.0, 1.0);
        let aabb = AABB::new(min, max);
        assert_eq!(aabb.min, min);
        assert_eq!(aabb.max, max);
    }

    #[test]
    fn test_aabb_center() {
        let aabb = AABB::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(aabb.center(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_aabb_center_negative() {
        let aabb = AABB::new(Vec3::new(-2.0, -4.0, -6.0), Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(aabb.center(), Vec3::ZERO);
    }

    #[test]
    fn test_aabb_diagonal_unit_cube() {
        let aabb = AABB::new(Vec3::ZERO, Vec3::ONE);
        assert!((aabb.diagonal_length() - 3.0f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_aabb_degenerate() {
        assert!(AABB::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0)).is_degenerate());
        assert!(AABB::new(Vec3::ONE, Vec3::ZERO).is_degenerate());
        assert!(!AABB::new(Vec3::ZERO, Vec3::ONE).is_degenerate());
    }
}
