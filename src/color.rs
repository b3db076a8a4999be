use std::fmt;

/// An 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Color of the weakest hit in a result list
    pub const LOW_SCORE: Rgb = Rgb::new(248, 105, 107);
    /// Color of the strongest hit in a result list
    pub const HIGH_SCORE: Rgb = Rgb::new(99, 190, 123);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Wrap `text` in a 24-bit ANSI foreground color
    pub fn paint(&self, text: &str) -> String {
        format!("\x1b[38;2;{};{};{}m{}\x1b[0m", self.r, self.g, self.b, text)
    }
}

/// CSS notation, e.g. `rgb(50, 100, 25)`
impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Map `score` linearly from `[min_score, max_score]` onto `[min_color, max_color]`.
///
/// A zero-width range yields `max_color`. The position is not clamped, so
/// scores outside the range extrapolate and each channel is truncated toward
/// zero. Extrapolated channels then saturate into `0..=255` instead of going
/// past the byte range, e.g. `rgb(255, 255, 255)` where plain truncation would
/// give `rgb(300, 300, 300)`. CSS clamps such values the same way.
pub fn interpolate(
    score: f32,
    min_score: f32,
    max_score: f32,
    min_color: Rgb,
    max_color: Rgb,
) -> Rgb {
    if max_score == min_score {
        return max_color;
    }

    let t = (score - min_score) / (max_score - min_score);
    let channel = |lo: u8, hi: u8| {
        let lo = f32::from(lo);
        (lo + (f32::from(hi) - lo) * t) as u8
    };

    Rgb {
        r: channel(min_color.r, max_color.r),
        g: channel(min_color.g, max_color.g),
        b: channel(min_color.b, max_color.b),
    }
}

/// Color scale spanning the scores of one result list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub min_score: f32,
    pub max_score: f32,
    pub min_color: Rgb,
    pub max_color: Rgb,
}

impl ColorScale {
    /// Build a scale over the observed scores, `None` for an empty list
    pub fn from_scores<I>(scores: I, min_color: Rgb, max_color: Rgb) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let mut iter = scores.into_iter();
        let first = iter.next()?;
        let (min_score, max_score) =
            iter.fold((first, first), |(lo, hi), s| (lo.min(s), hi.max(s)));

        Some(Self {
            min_score,
            max_score,
            min_color,
            max_color,
        })
    }

    pub fn color_for(&self, score: f32) -> Rgb {
        interpolate(score, self.min_score, self.max_score, self.min_color, self.max_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Rgb = Rgb::new(0, 0, 0);
    const WHITE: Rgb = Rgb::new(255, 255, 255);

    #[test]
    fn test_midpoint() {
        let color = interpolate(5.0, 0.0, 10.0, BLACK, Rgb::new(100, 200, 50));
        assert_eq!(color, Rgb::new(50, 100, 25));
    }

    #[test]
    fn test_degenerate_range_returns_max_color() {
        for score in [-3.0, 0.0, 5.0, 42.0] {
            assert_eq!(interpolate(score, 5.0, 5.0, BLACK, WHITE), WHITE);
        }
    }

    #[test]
    fn test_bounds_map_to_endpoint_colors() {
        let lo = Rgb::new(10, 20, 30);
        let hi = Rgb::new(200, 100, 0);
        assert_eq!(interpolate(1.0, 1.0, 3.0, lo, hi), lo);
        assert_eq!(interpolate(3.0, 1.0, 3.0, lo, hi), hi);
    }

    #[test]
    fn test_channels_are_truncated() {
        // 100 / 3 = 33.33.., 200 / 3 = 66.66..
        let color = interpolate(1.0, 0.0, 3.0, BLACK, Rgb::new(100, 200, 0));
        assert_eq!(color, Rgb::new(33, 66, 0));
    }

    #[test]
    fn test_scores_outside_range_extrapolate() {
        let color = interpolate(15.0, 0.0, 10.0, BLACK, Rgb::new(100, 100, 100));
        assert_eq!(color, Rgb::new(150, 150, 150));

        let lo = Rgb::new(100, 100, 100);
        let color = interpolate(-5.0, 0.0, 10.0, lo, Rgb::new(200, 200, 200));
        assert_eq!(color, Rgb::new(50, 50, 50));
    }

    #[test]
    fn test_extrapolation_saturates_channels() {
        // Unclamped this would be rgb(300, 300, 300)
        let color = interpolate(30.0, 0.0, 10.0, BLACK, Rgb::new(100, 100, 100));
        assert_eq!(color, WHITE);
        assert_eq!(color.to_string(), "rgb(255, 255, 255)");

        // Below the range channels stop at zero instead of going negative
        let color = interpolate(-20.0, 0.0, 10.0, Rgb::new(100, 100, 100), WHITE);
        assert_eq!(color, BLACK);
    }

    #[test]
    fn test_css_notation() {
        assert_eq!(Rgb::new(50, 100, 25).to_string(), "rgb(50, 100, 25)");
    }

    #[test]
    fn test_scale_from_scores() {
        let scale =
            ColorScale::from_scores([2.0, 8.0, 4.0], BLACK, Rgb::new(60, 60, 60)).unwrap();
        assert_eq!(scale.min_score, 2.0);
        assert_eq!(scale.max_score, 8.0);
        assert_eq!(scale.color_for(5.0), Rgb::new(30, 30, 30));
        assert_eq!(scale.color_for(8.0), Rgb::new(60, 60, 60));

        assert!(ColorScale::from_scores(Vec::new(), BLACK, WHITE).is_none());
    }

    #[test]
    fn test_scale_single_result_uses_max_color() {
        let scale = ColorScale::from_scores([0.7], Rgb::LOW_SCORE, Rgb::HIGH_SCORE).unwrap();
        assert_eq!(scale.color_for(0.7), Rgb::HIGH_SCORE);
    }
}
