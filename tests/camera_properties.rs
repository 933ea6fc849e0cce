use glam::{Quat, Vec2, Vec3};
use proptest::prelude::*;
use volume_viewer::camera::{arcball_rotation, screen_to_arcball, ArcballCamera, CameraCommand};
use volume_viewer::math::AABB;

fn ndc() -> impl Strategy<Value = Vec2> {
    (-1.0f32..1.0, -1.0f32..1.0).prop_map(|(x, y)| Vec2::new(x, y))
}

/// Points strictly inside the unit circle
fn inside_ndc() -> impl Strategy<Value = Vec2> {
    (0.0f32..0.95, 0.0f32..std::f32::consts::TAU).prop_map(|(r, a)| Vec2::new(r * a.cos(), r * a.sin()))
}

fn bounds() -> impl Strategy<Value = AABB> {
    (
        (-50.0f32..50.0, -50.0f32..50.0, -50.0f32..50.0),
        (0.1f32..100.0, 0.1f32..100.0, 0.1f32..100.0),
    )
        .prop_map(|((x, y, z), (w, h, d))| {
            let min = Vec3::new(x, y, z);
            AABB::new(min, min + Vec3::new(w, h, d))
        })
}

fn command() -> impl Strategy<Value = CameraCommand> {
    prop_oneof![
        (ndc(), ndc()).prop_map(|(from, to)| CameraCommand::Rotate { from, to }),
        (ndc(), ndc()).prop_map(|(from, to)| CameraCommand::Pan { from, to }),
        (-5.0f32..5.0).prop_map(CameraCommand::Zoom),
    ]
}

fn same_rotation(a: Quat, b: Quat, eps: f32) -> bool {
    // q and -q encode the same rotation
    a.dot(b).abs() > 1.0 - eps
}

proptest! {
    #[test]
    fn zero_drag_keeps_pose(bounds in bounds(), p in ndc(), aspect in 0.25f32..4.0) {
        let mut camera = ArcballCamera::new(bounds, aspect);
        let before = camera.pose();
        camera.rotate(p, p);
        let after = camera.pose();
        prop_assert!((after.eye - before.eye).length() <= 1e-4 * (1.0 + before.eye.length()));
        prop_assert!((after.look - before.look).length() < 1e-5);
        prop_assert!((after.up - before.up).length() < 1e-5);
    }

    #[test]
    fn rotation_axis_is_cross_product(from in inside_ndc(), to in inside_ndc()) {
        let a = screen_to_arcball(from);
        let b = screen_to_arcball(to);
        let cross = a.cross(b);
        prop_assume!(cross.length() > 1e-3);

        let q = arcball_rotation(from, to);
        let axis = Vec3::new(q.x, q.y, q.z).normalize();
        prop_assert!((axis - cross.normalize()).length() < 1e-3);

        let half_angle = q.w.clamp(-1.0, 1.0).acos();
        prop_assert!((0.0..=std::f32::consts::PI).contains(&half_angle));
        prop_assert!((half_angle - a.dot(b).clamp(-1.0, 1.0).acos()).abs() < 1e-3);
    }

    #[test]
    fn sequential_drags_compose(a in inside_ndc(), b in inside_ndc(), c in inside_ndc()) {
        let bounds = AABB::new(Vec3::ZERO, Vec3::splat(10.0));
        let mut stepped = ArcballCamera::new(bounds, 1.0);
        stepped.rotate(a, b);
        stepped.rotate(b, c);

        let mut direct = ArcballCamera::new(bounds, 1.0);
        direct.rotate(a, c);

        prop_assert!(same_rotation(stepped.rotation(), direct.rotation(), 1e-4));
        prop_assert!((stepped.look_dir() - direct.look_dir()).length() < 1e-2);
    }

    #[test]
    fn look_dir_points_at_target(
        bounds in bounds(),
        commands in prop::collection::vec(command(), 0..32),
    ) {
        let mut camera = ArcballCamera::new(bounds, 1.0);
        for command in commands {
            camera.apply(command);
        }
        let to_target = (camera.target() - camera.eye_pos()).normalize();
        prop_assert!(to_target.dot(camera.look_dir()) > 1.0 - 1e-3);
        prop_assert!(camera.look_dir().dot(camera.up_dir()).abs() < 1e-3);
    }

    #[test]
    fn zoom_never_collapses(bounds in bounds(), steps in prop::collection::vec(0.0f32..50.0, 1..64)) {
        let mut camera = ArcballCamera::new(bounds, 1.0);
        for amount in steps {
            camera.zoom(amount);
            prop_assert!(camera.distance() >= camera.min_distance());
            prop_assert!(camera.distance() > 0.0);
        }
    }

    #[test]
    fn reads_are_idempotent(bounds in bounds(), from in ndc(), to in ndc()) {
        let mut camera = ArcballCamera::new(bounds, 1.0);
        camera.rotate(from, to);
        prop_assert_eq!(camera.eye_pos(), camera.eye_pos());
        prop_assert_eq!(camera.look_dir(), camera.look_dir());
        prop_assert_eq!(camera.up_dir(), camera.up_dir());
    }
}
