mod resources;
use resources::SharedResources;

pub(crate) mod line;
use line::{LineDrawingMode, LineParams, LinePipeline, LineWidth};

//

use pendulum_core as pc;

use crate::{
    render_window::{ActiveRenderWindow, RenderContext},
    PendulumStyle,
};

pub(crate) struct Renderer {
    line_pl: LinePipeline,
    // some GPU resources are shared between different pipelines
    pub resources: SharedResources,
    // color the frame is cleared to, needed for fading effects
    background: palette::LinSrgb,
}

impl Renderer {
    pub fn new(window: &ActiveRenderWindow, params: &crate::AnimationParams) -> Self {
        let resources = SharedResources::new(window);
        Self {
            line_pl: LinePipeline::new(window, &resources),
            resources,
            background: params.background,
        }
    }

    /// Reset any state accumulated within a frame
    /// to prepare for the next one.
    pub fn end_frame(&mut self) {
        self.line_pl.end_frame();
    }
}

/// The main user interface for drawing graphics.
///
/// Coordinates are given in scene units,
/// with (0, 0) at the top left corner and y growing downward
/// (see [`AnimationParams::scene_size`][crate::AnimationParams::scene_size]).
///
/// See [`Animation`][super::animation::Animation]
/// and the demos for usage.
pub struct Painter<'a, 'ctx: 'a> {
    pub(crate) ctx: &'a mut RenderContext<'ctx>,
    pub(crate) rend: &'a mut Renderer,
}

impl<'a, 'ctx: 'a> Painter<'a, 'ctx> {
    /// Draw a double pendulum:
    /// first the trail from the lower bob through its recorded positions,
    /// then the two rods, then the two bobs on top.
    pub fn pendulum(
        &mut self,
        pendulum: &pc::Pendulum,
        projection: &pc::Projection,
        style: &PendulumStyle,
    ) {
        let frame = pendulum.frame(projection);

        let trail: Vec<pc::Vec2> = pendulum.trail().polyline_from(frame.bob2).collect();
        for (color, band) in style.trail_bands(&trail, self.rend.background) {
            let params = LineParams {
                width: style.trail_width,
                color,
                ..Default::default()
            };
            self.line_strip(params, band);
        }

        self.line_list(style.rod_params(), &frame.rod_segments());
        self.circles(style.bob_color, style.bob_radius, &frame.bobs());
    }

    /// Draw a list of line segments.
    ///
    /// Every two points in `points` define a distinct segment,
    /// with a gap left between them.
    #[inline]
    pub fn line_list(&mut self, params: LineParams, points: &[pc::Vec2]) {
        self.lines(params, LineDrawingMode::List, points);
    }

    /// Draw a strip of line segments.
    ///
    /// Every point in `points` is connected
    /// to both the next and previous one with a line segment.
    #[inline]
    pub fn line_strip(&mut self, params: LineParams, points: &[pc::Vec2]) {
        self.lines(params, LineDrawingMode::Strip, points);
    }

    /// Draw filled circles of the given radius (in scene units)
    /// centered at each of `centers`.
    pub fn circles(&mut self, color: palette::LinSrgb, radius: f32, centers: &[pc::Vec2]) {
        let params = LineParams {
            width: LineWidth::WorldUnits(2. * radius),
            color,
            ..Default::default()
        };
        self.lines(params, LineDrawingMode::Points, centers);
    }

    fn lines(&mut self, params: LineParams, mode: LineDrawingMode, points: &[pc::Vec2]) {
        let points: Vec<[f32; 2]> = points.iter().map(|p| [p.x as f32, p.y as f32]).collect();
        self.rend
            .line_pl
            .draw(&self.rend.resources, self.ctx, params, mode, &points);
    }
}
