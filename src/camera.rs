use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
use log::warn;

use crate::config::CameraConfig;
use crate::math::AABB;

/// Lower bound on the eye-to-target distance, whatever the scene size
pub const MIN_DISTANCE: f32 = 1e-4;

/// A discrete camera manipulation produced by the input layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraCommand {
    Rotate { from: Vec2, to: Vec2 },
    Pan { from: Vec2, to: Vec2 },
    Zoom(f32),
    Reset,
}

/// Snapshot of the camera handed to a renderer once per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub look: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    /// Vertical field of view in radians
    pub fov_y: f32,
}

impl CameraPose {
    pub fn right(&self) -> Vec3 {
        self.look.cross(self.up).normalize()
    }

    /// World-space direction of the primary ray through `ndc`
    pub fn ray_direction(&self, ndc: Vec2) -> Vec3 {
        let half_height = (self.fov_y * 0.5).tan();
        let half_width = half_height * self.aspect;
        (self.look + self.right() * ndc.x * half_width + self.up * ndc.y * half_height).normalize()
    }
}

/// Project a point in normalized device coordinates onto the unit arcball.
///
/// Points inside the unit circle land on the front hemisphere. Points outside
/// are pulled onto the equator.
pub fn screen_to_arcball(p: Vec2) -> Vec3 {
    let p = p.clamp(Vec2::splat(-1.0), Vec2::ONE);
    let dist = p.length_squared();
    if dist <= 1.0 {
        Vec3::new(p.x, p.y, (1.0 - dist).sqrt())
    } else {
        let n = p / dist.sqrt();
        Vec3::new(n.x, n.y, 0.0)
    }
}

/// Incremental rotation for a drag between two screen points.
///
/// The quaternion is `(from x to, from . to)` on the arcball, so its axis is
/// the cross product and its half-angle is the arc between the two points.
/// Identical points give the identity.
pub fn arcball_rotation(from: Vec2, to: Vec2) -> Quat {
    let a = screen_to_arcball(from);
    let b = screen_to_arcball(to);
    let axis = a.cross(b);
    let cos = a.dot(b).clamp(-1.0, 1.0);
    let q = Quat::from_xyzw(axis.x, axis.y, axis.z, cos);
    let len = q.length();
    if len <= f32::EPSILON || !len.is_finite() {
        Quat::IDENTITY
    } else {
        q / len
    }
}

/// Arcball camera orbiting a target derived from the scene bounds.
///
/// World-to-camera is `translation * rotation * center_translation`; the
/// pose vectors are read from its inverse.
#[derive(Debug, Clone)]
pub struct ArcballCamera {
    bounds: AABB,
    config: CameraConfig,
    aspect: f32,
    center_translation: Mat4,
    translation: Mat4,
    rotation: Quat,
}

impl ArcballCamera {
    pub fn new(bounds: AABB, aspect: f32) -> Self {
        Self::with_config(bounds, aspect, CameraConfig::default())
    }

    pub fn with_config(bounds: AABB, aspect: f32, config: CameraConfig) -> Self {
        if bounds.is_degenerate() {
            warn!("Camera bounds {:?}..{:?} are degenerate, using minimum distance", bounds.min, bounds.max);
        }
        let mut camera = Self {
            bounds,
            config,
            aspect: sanitize_aspect(aspect),
            center_translation: Mat4::IDENTITY,
            translation: Mat4::IDENTITY,
            rotation: Quat::IDENTITY,
        };
        camera.reset();
        camera
    }

    /// Restore the pose computed at construction
    pub fn reset(&mut self) {
        self.center_translation = Mat4::from_translation(-self.bounds.center());
        let distance = self.clamp_distance(self.config.distance_factor * self.diagonal());
        self.translation = Mat4::from_translation(Vec3::new(0.0, 0.0, -distance));
        self.rotation = Quat::IDENTITY;
    }

    pub fn rotate(&mut self, from: Vec2, to: Vec2) {
        let increment = arcball_rotation(from, to);
        self.rotation = (increment * self.rotation).normalize();
    }

    /// Move the target so the scene follows the cursor at the target's depth
    pub fn pan(&mut self, from: Vec2, to: Vec2) {
        let delta = to - from;
        let half_height = self.distance() * (self.fov_y() * 0.5).tan();
        let delta_cam = Vec3::new(
            delta.x * half_height * self.aspect,
            delta.y * half_height,
            0.0,
        ) * self.config.pan_speed;
        let delta_world = self.rotation.conjugate() * delta_cam;
        self.center_translation = Mat4::from_translation(delta_world) * self.center_translation;
    }

    /// Positive amounts move the eye toward the target
    pub fn zoom(&mut self, amount: f32) {
        if !amount.is_finite() {
            return;
        }
        let step = amount * self.config.zoom_speed * self.diagonal();
        let distance = self.clamp_distance(self.distance() - step);
        self.translation = Mat4::from_translation(Vec3::new(0.0, 0.0, -distance));
    }

    pub fn update_screen(&mut self, aspect: f32) {
        self.aspect = sanitize_aspect(aspect);
    }

    pub fn apply(&mut self, command: CameraCommand) {
        match command {
            CameraCommand::Rotate { from, to } => self.rotate(from, to),
            CameraCommand::Pan { from, to } => self.pan(from, to),
            CameraCommand::Zoom(amount) => self.zoom(amount),
            CameraCommand::Reset => self.reset(),
        }
    }

    pub fn world_to_camera(&self) -> Mat4 {
        self.translation * Mat4::from_quat(self.rotation) * self.center_translation
    }

    pub fn camera_to_world(&self) -> Mat4 {
        Mat4::from_translation(self.target())
            * Mat4::from_quat(self.rotation.conjugate())
            * Mat4::from_translation(Vec3::new(0.0, 0.0, self.distance()))
    }

    pub fn eye_pos(&self) -> Vec3 {
        self.camera_to_world().w_axis.truncate()
    }

    pub fn look_dir(&self) -> Vec3 {
        (self.camera_to_world() * Vec4::new(0.0, 0.0, -1.0, 0.0))
            .truncate()
            .normalize()
    }

    pub fn up_dir(&self) -> Vec3 {
        (self.camera_to_world() * Vec4::new(0.0, 1.0, 0.0, 0.0))
            .truncate()
            .normalize()
    }

    /// Point the camera orbits and looks at
    pub fn target(&self) -> Vec3 {
        -self.center_translation.w_axis.truncate()
    }

    pub fn distance(&self) -> f32 {
        -self.translation.w_axis.z
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn fov_y(&self) -> f32 {
        self.config.fov_y_degrees.to_radians()
    }

    pub fn bounds(&self) -> &AABB {
        &self.bounds
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn min_distance(&self) -> f32 {
        (self.config.min_distance_fraction * self.diagonal()).max(MIN_DISTANCE)
    }

    /// Farthest the eye may get from the target
    pub fn max_distance(&self) -> f32 {
        (self.config.max_distance_factor * self.diagonal()).max(self.min_distance())
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            eye: self.eye_pos(),
            look: self.look_dir(),
            up: self.up_dir(),
            aspect: self.aspect,
            fov_y: self.fov_y(),
        }
    }

    fn clamp_distance(&self, distance: f32) -> f32 {
        if distance.is_nan() {
            return self.min_distance();
        }
        distance.clamp(self.min_distance(), self.max_distance())
    }

    fn diagonal(&self) -> f32 {
        let diagonal = self.bounds.diagonal_length();
        if diagonal.is_finite() {
            diagonal
        } else {
            0.0
        }
    }
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}
