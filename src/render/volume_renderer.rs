use glam::{Vec2, Vec3, Vec4};

use super::{FrameBuffer, RenderMode, RenderSettings, Renderer};
use crate::camera::CameraPose;
use crate::math::intersect_aabb;
use crate::transfer_function::TransferFunction;
use crate::volume::Volume;

/// Step length, in voxels, at which transfer function opacities are defined
const REFERENCE_STEP: f32 = 1.0;
const TABLE_SIZE: usize = 256;
const BISECTION_STEPS: u32 = 8;
const SHININESS: f32 = 32.0;

/// Radical inverse of `index` in `base`, in `[0, 1)`
pub fn halton(mut index: u32, base: u32) -> f32 {
    let mut result = 0.0;
    let mut f = 1.0;
    let inv_base = 1.0 / base as f32;
    while index > 0 {
        f *= inv_base;
        result += f * (index % base) as f32;
        index /= base;
    }
    result
}

/// Number of march steps covering `[t_near, t_far]`.
///
/// Positions are derived from the index rather than accumulated, so the
/// march ends even when `t + step` rounds back to `t` far from the origin.
fn step_count(t_near: f32, t_far: f32, step: f32) -> u32 {
    let n = ((t_far - t_near) / step).ceil();
    if n.is_finite() && n > 0.0 {
        n as u32
    } else {
        0
    }
}

/// CPU ray caster over a [`Volume`].
pub struct VolumeRenderer {
    volume: Volume,
    transfer_function: TransferFunction,
    table: Vec<Vec4>,
    settings: RenderSettings,
}

impl VolumeRenderer {
    pub fn new(volume: Volume, transfer_function: TransferFunction, settings: RenderSettings) -> Self {
        let table = transfer_function.bake(TABLE_SIZE);
        Self {
            volume,
            transfer_function,
            table,
            settings,
        }
    }

    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    pub fn transfer_function(&self) -> &TransferFunction {
        &self.transfer_function
    }

    pub fn set_transfer_function(&mut self, transfer_function: TransferFunction) {
        self.table = transfer_function.bake(TABLE_SIZE);
        self.transfer_function = transfer_function;
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: RenderSettings) {
        self.settings = settings;
    }

    /// Color of one ray. `w` is the coverage, zero when the ray misses.
    pub fn trace(&self, origin: Vec3, dir: Vec3) -> Vec4 {
        let Some((t_near, t_far)) = intersect_aabb(origin, dir, &self.volume.bounds()) else {
            return self.settings.background.extend(0.0);
        };
        match self.settings.mode {
            RenderMode::Volume => self.march_volume(origin, dir, t_near, t_far),
            RenderMode::Isosurface => self.march_isosurface(origin, dir, t_near, t_far),
        }
    }

    fn world_step(&self) -> f32 {
        self.settings.step_size * self.volume.spacing().min_element()
    }

    fn classify(&self, value: f32) -> Vec4 {
        let t = self.transfer_function.range().normalize(value) * (self.table.len() - 1) as f32;
        let i = (t.floor() as usize).min(self.table.len() - 2);
        self.table[i].lerp(self.table[i + 1], t - i as f32)
    }

    fn headlight(&self, normal: Vec3, light: Vec3) -> f32 {
        let ambient = self.settings.ambient_intensity;
        if normal == Vec3::ZERO {
            return 1.0;
        }
        ambient + (1.0 - ambient) * normal.dot(light).abs()
    }

    fn march_volume(&self, origin: Vec3, dir: Vec3, t_near: f32, t_far: f32) -> Vec4 {
        let step = self.world_step();
        let correction = self.settings.step_size / REFERENCE_STEP;
        let light = -dir;

        let mut color = Vec3::ZERO;
        let mut alpha = 0.0f32;

        for i in 0..step_count(t_near, t_far, step) {
            let t = t_near + (i as f32 + 0.5) * step;
            let p = origin + dir * t;
            let sample = self.classify(self.volume.sample(p));
            if sample.w > 0.0 {
                let a = 1.0 - (1.0 - sample.w.min(1.0)).powf(correction);
                let normal = self.volume.gradient(p).normalize_or_zero();
                let shade = self.headlight(normal, light);
                color += (1.0 - alpha) * a * sample.truncate() * shade;
                alpha += (1.0 - alpha) * a;
                if alpha >= self.settings.termination {
                    break;
                }
            }
        }

        (color + (1.0 - alpha) * self.settings.background).extend(alpha)
    }

    fn march_isosurface(&self, origin: Vec3, dir: Vec3, t_near: f32, t_far: f32) -> Vec4 {
        let iso = self.settings.iso_value;
        let step = self.world_step();
        let field = |t: f32| self.volume.sample(origin + dir * t) - iso;

        let mut prev_t = t_near;
        let mut prev = field(prev_t);

        for i in 0..step_count(t_near, t_far, step) {
            let t = (t_near + (i + 1) as f32 * step).min(t_far);
            let current = field(t);
            if (prev < 0.0) != (current < 0.0) {
                let hit = self.refine_crossing(&field, prev_t, t);
                return self.shade_surface(origin + dir * hit, dir);
            }
            prev_t = t;
            prev = current;
        }

        self.settings.background.extend(0.0)
    }

    fn refine_crossing(&self, field: &impl Fn(f32) -> f32, mut lo: f32, mut hi: f32) -> f32 {
        let lo_inside = field(lo) < 0.0;
        for _ in 0..BISECTION_STEPS {
            let mid = 0.5 * (lo + hi);
            if (field(mid) < 0.0) == lo_inside {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        0.5 * (lo + hi)
    }

    fn shade_surface(&self, p: Vec3, dir: Vec3) -> Vec4 {
        let view = -dir;
        let mut normal = self.volume.gradient(p).normalize_or_zero();
        if normal.dot(view) < 0.0 {
            normal = -normal;
        }

        let base = self.classify(self.settings.iso_value).truncate();
        let ambient = self.settings.ambient_intensity;
        if normal == Vec3::ZERO {
            return base.extend(1.0);
        }
        // headlight: light, view and half vector coincide
        let n_dot_l = normal.dot(view).max(0.0);
        let specular = self.settings.specular * n_dot_l.powf(SHININESS);
        (base * (ambient + (1.0 - ambient) * n_dot_l) + Vec3::splat(specular)).extend(1.0)
    }
}

impl Renderer for VolumeRenderer {
    fn render_frame(&mut self, pose: &CameraPose, framebuffer: &mut FrameBuffer) {
        let sample = framebuffer.frame_count() + 1;
        let jitter = Vec2::new(halton(sample, 2), halton(sample, 3)) - Vec2::splat(0.5);
        let size = Vec2::new(framebuffer.width() as f32, framebuffer.height() as f32);
        let this = &*self;

        framebuffer.accumulate(|x, y| {
            let pixel = (Vec2::new(x as f32, y as f32) + Vec2::splat(0.5) + jitter) / size;
            let ndc = Vec2::new(pixel.x * 2.0 - 1.0, 1.0 - pixel.y * 2.0);
            this.trace(pose.eye, pose.ray_direction(ndc))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer_function::ColorMap;
    use crate::volume::ValueRange;
    use glam::UVec3;

    fn constant_volume(value: f32) -> Volume {
        Volume::new(vec![value; 8 * 8 * 8], UVec3::splat(8)).unwrap()
    }

    fn opaque_white() -> TransferFunction {
        TransferFunction::new(vec![Vec3::ONE], vec![1.0], ValueRange::new(0.0, 1.0))
    }

    #[test]
    fn test_halton_sequence() {
        assert_eq!(halton(0, 2), 0.0);
        assert_eq!(halton(1, 2), 0.5);
        assert_eq!(halton(2, 2), 0.25);
        assert_eq!(halton(3, 2), 0.75);
        assert!((halton(1, 3) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_trace_miss_returns_background() {
        let renderer = VolumeRenderer::new(constant_volume(1.0), opaque_white(), RenderSettings::default());
        let c = renderer.trace(Vec3::new(-10.0, -10.0, -10.0), Vec3::NEG_X);
        assert_eq!(c, Vec4::ZERO);
    }

    #[test]
    fn test_trace_opaque_volume_terminates() {
        let renderer = VolumeRenderer::new(constant_volume(1.0), opaque_white(), RenderSettings::default());
        let c = renderer.trace(Vec3::new(4.0, 4.0, 20.0), Vec3::NEG_Z);
        assert!(c.w >= 0.99);
        assert!(c.x > 0.9);
    }

    #[test]
    fn test_transparent_transfer_function_lets_background_through() {
        let tf = TransferFunction::new(vec![Vec3::ONE], vec![0.0], ValueRange::new(0.0, 1.0));
        let settings = RenderSettings {
            background: Vec3::new(0.0, 0.0, 1.0),
            ..RenderSettings::default()
        };
        let renderer = VolumeRenderer::new(constant_volume(1.0), tf, settings);
        let c = renderer.trace(Vec3::new(4.0, 4.0, 20.0), Vec3::NEG_Z);
        assert_eq!(c, Vec4::new(0.0, 0.0, 1.0, 0.0));
    }

    #[test]
    fn test_smaller_steps_keep_opacity_consistent() {
        let tf = TransferFunction::new(vec![Vec3::ONE], vec![0.05], ValueRange::new(0.0, 1.0));
        let coarse = VolumeRenderer::new(
            constant_volume(1.0),
            tf.clone(),
            RenderSettings { step_size: 1.0, ..RenderSettings::default() },
        );
        let fine = VolumeRenderer::new(
            constant_volume(1.0),
            tf,
            RenderSettings { step_size: 0.25, ..RenderSettings::default() },
        );
        let a = coarse.trace(Vec3::new(4.0, 4.0, 20.0), Vec3::NEG_Z).w;
        let b = fine.trace(Vec3::new(4.0, 4.0, 20.0), Vec3::NEG_Z).w;
        assert!((a - b).abs() < 0.02, "{} vs {}", a, b);
    }

    #[test]
    fn test_isosurface_hits_ramp() {
        let volume = Volume::from_fn(UVec3::splat(16), |p| p.z as f32).unwrap();
        let tf = TransferFunction::from_preset(ColorMap::Grayscale, volume.range());
        let settings = RenderSettings {
            mode: RenderMode::Isosurface,
            iso_value: 7.5,
            ..RenderSettings::default()
        };
        let renderer = VolumeRenderer::new(volume, tf, settings);
        let c = renderer.trace(Vec3::new(8.0, 8.0, 40.0), Vec3::NEG_Z);
        assert_eq!(c.w, 1.0);
        assert!(c.truncate().length() > 0.0);

        let miss = renderer.trace(Vec3::new(8.0, 40.0, 8.0), Vec3::X);
        assert_eq!(miss.w, 0.0);
    }

    #[test]
    fn test_step_count_covers_interval() {
        assert_eq!(step_count(0.0, 8.0, 0.5), 16);
        assert_eq!(step_count(0.0, 8.1, 0.5), 17);
        assert_eq!(step_count(3.0, 3.0, 0.5), 0);
        assert_eq!(step_count(0.0, 1.0, 0.0), 0);
    }

    #[test]
    fn test_far_eye_march_finishes() {
        let origin = Vec3::new(4.0, 4.0, 1.0e9);
        for mode in [RenderMode::Volume, RenderMode::Isosurface] {
            let settings = RenderSettings {
                mode,
                iso_value: 0.5,
                ..RenderSettings::default()
            };
            let renderer = VolumeRenderer::new(constant_volume(1.0), opaque_white(), settings);
            let c = renderer.trace(origin, Vec3::NEG_Z);
            assert!(c.is_finite());
            assert!((0.0..=1.0).contains(&c.w));
        }
    }

    #[test]
    fn test_classify_uses_transfer_function() {
        let tf = TransferFunction::from_preset(ColorMap::Grayscale, ValueRange::new(0.0, 1.0));
        let renderer = VolumeRenderer::new(constant_volume(0.0), tf.clone(), RenderSettings::default());
        assert!((renderer.classify(0.5) - tf.sample(0.5)).length() < 1e-2);
        assert_eq!(renderer.classify(1.0), tf.sample(1.0));
    }
}
