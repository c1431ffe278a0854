/// Local-frame transform builders for the crane rig
use nalgebra::{Matrix4, Vector3};

/// Transform builder for the matrices composed onto the model-view stack.
///
/// Rig angles are specified in degrees throughout (slew, camera orbit),
/// so the rotation builders take degrees and convert internally.
pub struct Transform;

impl Transform {
    /// Create a translation matrix
    pub fn translation(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Create a rotation matrix about the X axis (degrees)
    pub fn rotation_x_deg(angle: f32) -> Matrix4<f32> {
        Matrix4::new_rotation(Vector3::new(angle.to_radians(), 0.0, 0.0))
    }

    /// Create a rotation matrix about the Y axis (degrees)
    pub fn rotation_y_deg(angle: f32) -> Matrix4<f32> {
        Matrix4::new_rotation(Vector3::new(0.0, angle.to_radians(), 0.0))
    }

    /// Create a non-uniform scale matrix
    pub fn scaling(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Create a uniform scale matrix
    pub fn uniform_scaling(s: f32) -> Matrix4<f32> {
        Matrix4::new_scaling(s)
    }
}

/// Wrap an angle in degrees into `[0, 360)`.
///
/// Camera orbit angles wrap; the crane's slew accumulates without wrapping.
pub fn wrap_degrees(angle: f32) -> f32 {
    angle.rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_zero_rotation_is_identity() {
        let m = Transform::rotation_y_deg(0.0);
        assert!((m - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_rotation_y_quarter_turn() {
        let m = Transform::rotation_y_deg(90.0);
        let p = m.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((p - Point3::new(0.0, 0.0, -1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_translation_then_scale_composes_in_local_frame() {
        // Scale first, translate second: the translation happens in the
        // scaled frame, which is how the rig stacks its column segments.
        let m = Transform::scaling(2.0, 2.0, 2.0) * Transform::translation(0.0, 3.0, 0.0);
        let p = m.transform_point(&Point3::origin());
        assert!((p - Point3::new(0.0, 6.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert_eq!(wrap_degrees(365.0), 5.0);
        assert_eq!(wrap_degrees(-5.0), 355.0);
    }

    #[test]
    fn test_wrap_degrees_is_modulo_consistent() {
        // +365 then -5 lands where a direct +360 does.
        let stepped = wrap_degrees(wrap_degrees(50.0 + 365.0) - 5.0);
        let direct = wrap_degrees(50.0 + 360.0);
        assert!((stepped - direct).abs() < 1e-6);
    }
}
