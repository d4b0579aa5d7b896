//! Easing functions for animations

/// Easing curve reshaping a progress value
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    #[default]
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseOutBounce,
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => quadratic(t),
            Easing::EaseOutQuad => 1.0 - quadratic(1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => cubic(t),
            Easing::EaseOutCubic => 1.0 - cubic(1.0 - t),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseOutBounce => ease_out_bounce(t),
        }
    }
}

/// Quadratic ease-in: `t²`
pub fn quadratic(t: f64) -> f64 {
    t * t
}

/// Cubic ease-in: `t³`
pub fn cubic(t: f64) -> f64 {
    t * t * t
}

const BOUNCE_N1: f64 = 7.5625;
const BOUNCE_D1: f64 = 2.75;

/// Bouncing deceleration, built from four parabolic arcs of shrinking height
pub fn ease_out_bounce(t: f64) -> f64 {
    if t < 1.0 / BOUNCE_D1 {
        BOUNCE_N1 * t * t
    } else if t < 2.0 / BOUNCE_D1 {
        let t = t - 1.5 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.75
    } else if t < 2.5 / BOUNCE_D1 {
        let t = t - 2.25 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.984375
    }
}

/// Mirror a progress value: `1 - t`
pub fn backwards(t: f64) -> f64 {
    1.0 - t
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 8] = [
        Easing::Linear,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::EaseOutBounce,
    ];

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_endpoints() {
        for easing in ALL {
            assert!(close(easing.apply(0.0), 0.0), "{easing:?} at 0");
            assert!(close(easing.apply(1.0), 1.0), "{easing:?} at 1");
        }
    }

    #[test]
    fn test_ease_in_curves() {
        assert_eq!(quadratic(0.5), 0.25);
        assert_eq!(cubic(0.5), 0.125);
        assert_eq!(backwards(0.25), 0.75);
    }

    #[test]
    fn test_bounce_is_continuous_at_branch_boundaries() {
        for boundary in [1.0 / BOUNCE_D1, 2.0 / BOUNCE_D1, 2.5 / BOUNCE_D1] {
            let below = ease_out_bounce(boundary - 1e-12);
            let at = ease_out_bounce(boundary);
            assert!((below - at).abs() < 1e-9, "jump at {boundary}: {below} vs {at}");
        }
    }

    #[test]
    fn test_bounce_touches_one_between_arcs() {
        assert!(close(ease_out_bounce(1.0 / BOUNCE_D1), 1.0));
        assert!(close(ease_out_bounce(2.0 / BOUNCE_D1), 1.0));
        assert!(close(ease_out_bounce(1.5 / BOUNCE_D1), 0.75));
    }

    #[test]
    fn test_ease_out_mirrors_ease_in() {
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            assert!(close(Easing::EaseOutQuad.apply(t), 1.0 - quadratic(1.0 - t)));
            assert!(close(Easing::EaseOutCubic.apply(t), 1.0 - cubic(1.0 - t)));
        }
    }
}
