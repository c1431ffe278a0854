/// View presets and orbit camera for the crane scene
use nalgebra::{Matrix4, Point3, Vector3};

use crate::transform::{wrap_degrees, Transform};

/// Default orbit azimuth, degrees.
pub const DEFAULT_THETA_DEG: f32 = 50.0;
/// Default orbit elevation, degrees.
pub const DEFAULT_GAMMA_DEG: f32 = 15.0;
/// Distance of every preset eye from the origin.
pub const EYE_DISTANCE: f32 = 200.0;
/// Far bound of the orthographic view volume.
pub const DEPTH_RANGE: f32 = 500.0;

/// Which fixed view the scene is rendered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Orbitable three-quarter view. The only mode that reads [`CameraAngles`].
    Axonometric,
    Front,
    Top,
    Right,
}

/// Orbit angles for the axonometric view, both wrapped to [0, 360).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraAngles {
    pub theta_deg: f32,
    pub gamma_deg: f32,
}

impl Default for CameraAngles {
    fn default() -> Self {
        Self {
            theta_deg: DEFAULT_THETA_DEG,
            gamma_deg: DEFAULT_GAMMA_DEG,
        }
    }
}

impl CameraAngles {
    /// Turn the orbit by the given deltas, wrapping each angle into [0, 360).
    pub fn orbit(&mut self, dtheta_deg: f32, dgamma_deg: f32) -> (f32, f32) {
        self.theta_deg = wrap_degrees(self.theta_deg + dtheta_deg);
        self.gamma_deg = wrap_degrees(self.gamma_deg + dgamma_deg);
        (self.theta_deg, self.gamma_deg)
    }
}

/// Build the view matrix for a mode.
///
/// The fixed views put the eye on an axis at [`EYE_DISTANCE`] looking at the
/// origin. The axonometric view starts from the -X eye and spins the world
/// under it, so the orbit angles read as world yaw and pitch.
pub fn view_matrix(mode: ViewMode, angles: &CameraAngles) -> Matrix4<f32> {
    let origin = Point3::new(0.0, 0.0, 0.0);
    let up_y = Vector3::new(0.0, 1.0, 0.0);
    match mode {
        ViewMode::Front => {
            Matrix4::look_at_rh(&Point3::new(0.0, 0.0, EYE_DISTANCE), &origin, &up_y)
        }
        ViewMode::Top => Matrix4::look_at_rh(
            &Point3::new(0.0, EYE_DISTANCE, 0.0),
            &origin,
            // Y is the viewing axis from above, so "up" on screen is -Z.
            &Vector3::new(0.0, 0.0, -1.0),
        ),
        ViewMode::Right => {
            Matrix4::look_at_rh(&Point3::new(EYE_DISTANCE, 0.0, 0.0), &origin, &up_y)
        }
        ViewMode::Axonometric => {
            let eye = Matrix4::look_at_rh(&Point3::new(-EYE_DISTANCE, 0.0, 0.0), &origin, &up_y);
            eye * Transform::rotation_y_deg(angles.theta_deg)
                * Transform::rotation_x_deg(-angles.gamma_deg)
        }
    }
}

/// Orthographic projection spanning `zoom` world units of height, widened by
/// the viewport aspect ratio. Depth runs from the eye plane to [`DEPTH_RANGE`].
pub fn projection_matrix(aspect: f32, zoom: f32) -> Matrix4<f32> {
    Matrix4::new_orthographic(
        -aspect * zoom,
        aspect * zoom,
        -zoom,
        zoom,
        0.0,
        DEPTH_RANGE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_orbit_wraps() {
        let mut angles = CameraAngles::default();
        angles.orbit(358.0 - DEFAULT_THETA_DEG, 0.0);
        let (theta, _) = angles.orbit(5.0, -30.0);
        assert_relative_eq!(theta, 3.0, epsilon = 1e-4);
        assert_relative_eq!(angles.gamma_deg, wrap_degrees(DEFAULT_GAMMA_DEG - 30.0));
    }

    #[test]
    fn test_front_view_looks_down_negative_z() {
        let view = view_matrix(ViewMode::Front, &CameraAngles::default());
        let p = view.transform_point(&Point3::new(0.0, 0.0, 0.0));
        // The origin sits EYE_DISTANCE in front of the camera.
        assert_relative_eq!(p.z, -EYE_DISTANCE, epsilon = 1e-3);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-3);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_top_view_maps_height_to_depth() {
        let view = view_matrix(ViewMode::Top, &CameraAngles::default());
        let p = view.transform_point(&Point3::new(0.0, 10.0, 0.0));
        assert_relative_eq!(p.z, -(EYE_DISTANCE - 10.0), epsilon = 1e-3);
    }

    #[test]
    fn test_axonometric_depends_on_orbit() {
        let angles_a = CameraAngles::default();
        let angles_b = CameraAngles {
            theta_deg: DEFAULT_THETA_DEG + 90.0,
            ..angles_a
        };
        let a = view_matrix(ViewMode::Axonometric, &angles_a);
        let b = view_matrix(ViewMode::Axonometric, &angles_b);
        assert!((a - b).norm() > 1e-3);
    }

    #[test]
    fn test_projection_centers_origin() {
        let proj = projection_matrix(2.0, 30.0);
        let center = proj.transform_point(&Point3::new(0.0, 0.0, -250.0));
        assert_relative_eq!(center.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(center.y, 0.0, epsilon = 1e-5);
        // Top of the view volume lands on the upper clip bound.
        let top = proj.transform_point(&Point3::new(0.0, 30.0, -250.0));
        assert_relative_eq!(top.y, 1.0, epsilon = 1e-5);
        // Aspect widens x, so the same offset lands halfway along x.
        let side = proj.transform_point(&Point3::new(30.0, 0.0, -250.0));
        assert_relative_eq!(side.x, 0.5, epsilon = 1e-5);
    }
}
