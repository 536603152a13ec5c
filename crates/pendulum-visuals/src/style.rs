//! Colors and sizes for drawing pendulums.

use palette::Mix;

use crate::{JoinStyle, LineParams, LineWidth};

/// Parameters to configure the drawing of a pendulum
/// with [`Painter::pendulum`][crate::Painter::pendulum].
#[derive(Clone, Copy, Debug)]
pub struct PendulumStyle {
    /// Fill color of the two bobs.
    /// Default: blue.
    pub bob_color: palette::LinSrgb,
    /// Color of the two rods.
    /// Default: white.
    pub line_color: palette::LinSrgb,
    /// Color of the trail behind the lower bob.
    /// Default: cyan.
    pub trail_color: palette::LinSrgb,
    /// Radius of the bobs in scene units.
    /// Default: 5.
    pub bob_radius: f32,
    /// Width of the rods. Default: 1 screenspace pixel.
    pub rod_width: LineWidth,
    /// Width of the trail. Default: 1 screenspace pixel.
    pub trail_width: LineWidth,
    /// If true, the trail is drawn in bands
    /// blending from `trail_color` at the newest point
    /// toward the background color at the oldest.
    /// Otherwise the whole trail has the same color.
    /// Default: false.
    pub trail_fade: bool,
}

impl Default for PendulumStyle {
    fn default() -> Self {
        Self {
            bob_color: palette::named::BLUE.into(),
            line_color: palette::named::WHITE.into(),
            trail_color: palette::named::CYAN.into(),
            bob_radius: 5.,
            rod_width: LineWidth::ScreenPixels(1.),
            trail_width: LineWidth::ScreenPixels(1.),
            trail_fade: false,
        }
    }
}

/// Number of color bands a fading trail is split into.
pub(crate) const FADE_BANDS: usize = 6;

impl PendulumStyle {
    /// Style the rods are drawn with.
    pub(crate) fn rod_params(&self) -> LineParams {
        LineParams {
            width: self.rod_width,
            color: self.line_color,
            joins: JoinStyle::None,
        }
    }

    /// Split a trail (newest point first) into consecutive strips
    /// and pick a color for each one.
    ///
    /// Without fading this is the whole trail in `trail_color`.
    /// Neighboring bands share their boundary point
    /// so that the strips join up without gaps.
    pub(crate) fn trail_bands<'a, T>(
        &self,
        points: &'a [T],
        background: palette::LinSrgb,
    ) -> Vec<(palette::LinSrgb, &'a [T])> {
        if points.len() < 2 {
            return Vec::new();
        }
        if !self.trail_fade {
            return vec![(self.trail_color, points)];
        }

        let segment_count = points.len() - 1;
        let band_len = segment_count.div_ceil(FADE_BANDS);
        (0..segment_count)
            .step_by(band_len)
            .map(|start| {
                let end = usize::min(start + band_len, segment_count);
                // factor of the band's midpoint along the trail,
                // so the newest band isn't quite at full color
                // and the oldest isn't quite invisible
                let mid = (start + end) as f32 / 2.;
                let factor = mid / segment_count as f32;
                let color = self.trail_color.mix(background, factor);
                (color, &points[start..=end])
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn unfaded_trail_is_one_band() {
        let style = PendulumStyle::default();
        let points: Vec<usize> = (0..60).collect();
        let bands = style.trail_bands(&points, palette::named::BLACK.into());
        assert_eq!(bands.len(), 1);
        assert_eq!(bands[0].0, style.trail_color);
        assert_eq!(bands[0].1.len(), 60);

        assert!(style.trail_bands(&points[..1], palette::named::BLACK.into()).is_empty());
    }

    #[test]
    fn faded_trail_covers_every_segment() {
        let style = PendulumStyle {
            trail_fade: true,
            ..Default::default()
        };
        let background: palette::LinSrgb = palette::named::BLACK.into();

        for len in [2, 3, 7, 60] {
            let points: Vec<usize> = (0..len).collect();
            let bands = style.trail_bands(&points, background);
            assert!(bands.len() <= FADE_BANDS);

            // every band starts where the previous one ended
            assert_eq!(bands[0].1[0], 0);
            for (prev, next) in bands.iter().zip(bands.iter().skip(1)) {
                assert_eq!(prev.1.last(), next.1.first());
            }
            assert_eq!(bands.last().unwrap().1.last(), Some(&(len - 1)));
        }
    }

    #[test]
    fn faded_trail_darkens_with_age() {
        let style = PendulumStyle {
            trail_fade: true,
            ..Default::default()
        };
        let background: palette::LinSrgb = palette::named::BLACK.into();
        let points: Vec<usize> = (0..60).collect();
        let bands = style.trail_bands(&points, background);
        assert_eq!(bands.len(), FADE_BANDS);

        // cyan fading toward black: red stays 0, the rest decreases
        for (newer, older) in bands.iter().zip(bands.iter().skip(1)) {
            assert!(older.0.green < newer.0.green);
            assert!(older.0.blue < newer.0.blue);
        }
        let (newest, _) = bands[0];
        assert_relative_eq!(newest.red, 0.0, epsilon = 1e-6);
        assert!(newest.green > 0.9);
    }
}
