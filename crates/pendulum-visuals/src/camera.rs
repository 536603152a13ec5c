//! The 2D camera mapping scene coordinates onto the screen.

use nalgebra as na;

/// A camera looking at a rectangular 2D scene
/// whose y axis points down, like window pixel coordinates.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    /// Center of the viewed area in scene coordinates.
    pub center: na::Vector2<f32>,
    /// Width and height of the viewed area.
    pub area: na::Vector2<f32>,
}

impl Camera {
    /// Create a camera viewing the scene from (0, 0) to `size`.
    pub fn new_2d(size: (f32, f32)) -> Self {
        let area = na::Vector2::new(size.0, size.1);
        Self {
            center: area / 2.0,
            area,
        }
    }

    pub(crate) fn view_projection_matrix(&self, viewport_size: (u32, u32)) -> na::Matrix4<f32> {
        // orthographic projection with y flipped
        // so that the top of the scene is at the top of the screen
        let mut scale = na::Vector2::new(2.0 / self.area.x, -2.0 / self.area.y);

        // compute a nonuniform scaling
        // that will keep the entire scene in view without stretching
        let vp_aspect = viewport_size.0 as f32 / viewport_size.1.max(1) as f32;
        let area_aspect = self.area.x / self.area.y;
        if vp_aspect >= area_aspect {
            // window is wider in the x direction,
            // so scale to leave space around the horizontal edges
            scale.x *= area_aspect / vp_aspect;
        } else {
            // taller in the y direction,
            // scale to leave space on the top and bottom
            scale.y *= vp_aspect / area_aspect;
        }

        let mut view_proj =
            na::Matrix4::from_diagonal(&na::Vector4::new(scale.x, scale.y, 0.0, 1.0));
        view_proj[(0, 3)] = -scale.x * self.center.x;
        view_proj[(1, 3)] = -scale.y * self.center.y;
        view_proj
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn to_clip(m: &na::Matrix4<f32>, x: f32, y: f32) -> na::Vector2<f32> {
        let p = m * na::Vector4::new(x, y, 0., 1.);
        na::Vector2::new(p.x / p.w, p.y / p.w)
    }

    #[test]
    fn scene_corners_map_to_clip_corners() {
        let cam = Camera::new_2d((400., 400.));
        let m = cam.view_projection_matrix((800, 800));
        assert_relative_eq!(to_clip(&m, 0., 0.), na::Vector2::new(-1., 1.), epsilon = 1e-6);
        assert_relative_eq!(
            to_clip(&m, 400., 400.),
            na::Vector2::new(1., -1.),
            epsilon = 1e-6
        );
        assert_relative_eq!(to_clip(&m, 200., 200.), na::Vector2::zeros(), epsilon = 1e-6);
    }

    #[test]
    fn wide_window_letterboxes() {
        let cam = Camera::new_2d((400., 400.));
        let m = cam.view_projection_matrix((800, 400));
        // full height is used, horizontal extent is halved
        assert_relative_eq!(
            to_clip(&m, 400., 0.),
            na::Vector2::new(0.5, 1.),
            epsilon = 1e-6
        );
        let m_tall = cam.view_projection_matrix((400, 800));
        assert_relative_eq!(
            to_clip(&m_tall, 0., 400.),
            na::Vector2::new(-1., -0.5),
            epsilon = 1e-6
        );
    }
}
