//! Fixed camera and the rotation that animates the cube.

use glam::{Mat4, Vec3};

/// Vertical field of view, in degrees.
pub const FIELD_OF_VIEW_DEG: f32 = 45.0;

/// Near clip plane.
pub const Z_NEAR: f32 = 0.1;

/// Far clip plane.
pub const Z_FAR: f32 = 100.0;

/// Distance from the camera to the cube center, along -Z.
pub const CAMERA_DISTANCE: f32 = 5.0;

/// Y-axis angle as a multiple of the cumulative rotation.
pub const Y_RATIO: f32 = 0.618;

/// X-axis angle as a multiple of the cumulative rotation.
pub const X_RATIO: f32 = -1.618;

/// Cumulative rotation of the cube, in radians about Z.
///
/// The Y and X angles are derived from it with golden-ratio factors so the
/// three axes stay out of phase. The value grows without bound; wrapping it
/// would change the rotation sequence once precision is lost.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct RotationState {
    cumulative: f32,
}

impl RotationState {
    pub const fn new() -> Self {
        Self { cumulative: 0.0 }
    }

    /// Current cumulative rotation.
    pub fn value(self) -> f32 {
        self.cumulative
    }

    /// Adds one frame's delta.
    ///
    /// Deltas must be finite and non-negative. Anything else is logged and
    /// ignored, so the rotation never runs backwards. Returns whether the
    /// delta was accepted.
    pub fn advance(&mut self, delta: f32) -> bool {
        if !delta.is_finite() || delta < 0.0 {
            log::warn!("ignoring rotation delta {delta}: must be finite and non-negative");
            return false;
        }
        self.cumulative += delta;
        true
    }

    pub fn reset(&mut self) {
        self.cumulative = 0.0;
    }

    /// `(z, y, x)` angles for the current value.
    pub fn angles(self) -> (f32, f32, f32) {
        let r = self.cumulative;
        (r, r * Y_RATIO, r * X_RATIO)
    }
}

/// Perspective projection for a surface of the given aspect ratio.
///
/// Right-handed, depth mapped to wgpu's `[0, 1]` range.
pub fn projection_matrix(aspect: f32) -> Mat4 {
    Mat4::perspective_rh(FIELD_OF_VIEW_DEG.to_radians(), aspect, Z_NEAR, Z_FAR)
}

/// Model-view matrix: push the cube out in front of the camera, then rotate
/// about Z, Y and X in that order.
pub fn model_view_matrix(rotation: RotationState) -> Mat4 {
    let (z, y, x) = rotation.angles();
    Mat4::from_translation(Vec3::new(0.0, 0.0, -CAMERA_DISTANCE))
        * Mat4::from_rotation_z(z)
        * Mat4::from_rotation_y(y)
        * Mat4::from_rotation_x(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn rotation_accumulates() {
        let mut r = RotationState::new();
        r.advance(0.25);
        r.advance(0.5);
        assert_eq!(r.value(), 0.75);
        r.reset();
        assert_eq!(r.value(), 0.0);
    }

    #[test]
    fn zero_delta_is_a_no_op() {
        let mut r = RotationState::new();
        r.advance(0.0);
        assert_eq!(r, RotationState::new());
    }

    #[test]
    fn negative_and_non_finite_deltas_are_ignored() {
        let mut r = RotationState::new();
        assert!(r.advance(0.5));
        assert!(!r.advance(-0.25));
        assert!(!r.advance(f32::NAN));
        assert!(!r.advance(f32::INFINITY));
        assert_eq!(r.value(), 0.5);
    }

    #[test]
    fn angles_use_golden_ratios() {
        let mut r = RotationState::new();
        r.advance(2.0);
        let (z, y, x) = r.angles();
        assert_eq!(z, 2.0);
        assert!((y - 1.236).abs() < 1e-6);
        assert!((x + 3.236).abs() < 1e-6);
    }

    #[test]
    fn unrotated_model_view_is_a_translation() {
        let mv = model_view_matrix(RotationState::new());
        let p = mv.transform_point3(Vec3::new(1.0, 1.0, 1.0));
        assert!(approx(p, Vec3::new(1.0, 1.0, -4.0)));
    }

    #[test]
    fn rotations_compose_z_then_y_then_x() {
        let mut r = RotationState::new();
        r.advance(0.7);
        let (z, y, x) = r.angles();

        // Post-multiplication: X acts on the vertex first, Z last.
        let v = Vec3::new(0.3, -0.4, 0.9);
        let by_hand = Mat4::from_rotation_z(z)
            .transform_point3(Mat4::from_rotation_y(y).transform_point3(Mat4::from_rotation_x(x).transform_point3(v)))
            + Vec3::new(0.0, 0.0, -CAMERA_DISTANCE);
        assert!(approx(model_view_matrix(r).transform_point3(v), by_hand));

        let reordered = Mat4::from_translation(Vec3::new(0.0, 0.0, -CAMERA_DISTANCE))
            * Mat4::from_rotation_x(x)
            * Mat4::from_rotation_y(y)
            * Mat4::from_rotation_z(z);
        assert!(!approx(reordered.transform_point3(v), by_hand));
    }

    #[test]
    fn projection_maps_clip_planes_to_unit_depth() {
        let p = projection_matrix(1.0);
        let near = p * Vec4::new(0.0, 0.0, -Z_NEAR, 1.0);
        let far = p * Vec4::new(0.0, 0.0, -Z_FAR, 1.0);
        assert!((near.z / near.w).abs() < 1e-5);
        assert!((far.z / far.w - 1.0).abs() < 1e-5);
    }

    #[test]
    fn projection_tracks_aspect() {
        let square = projection_matrix(1.0);
        let wide = projection_matrix(2.0);
        assert!((square.x_axis.x / wide.x_axis.x - 2.0).abs() < 1e-5);
        assert_eq!(square.y_axis.y, wide.y_axis.y);
    }

    #[test]
    fn cube_fits_in_view() {
        let mvp = projection_matrix(1.0) * model_view_matrix(RotationState::new());
        for corner in crate::geometry::cube_positions() {
            let clip = mvp * Vec3::from(corner).extend(1.0);
            let ndc = clip.truncate() / clip.w;
            assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0);
            assert!((0.0..=1.0).contains(&ndc.z));
        }
    }
}
