// Easing curves for the smooth scroll backend.
// Pure math, no dependency on the engine.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    QuadOut,
    /// `1 - (1 - t)^3`, the page's default feel.
    #[default]
    CubicOut,
    /// Exponential settle, close to what most smooth-scroll libraries ship.
    ExpoOut,
}

impl Easing {
    /// Map normalized time `t` (clamped to [0, 1]) to eased progress in [0, 1].
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::ExpoOut => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2.0_f32.powf(-10.0 * t)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_fixed() {
        for e in [Easing::Linear, Easing::QuadOut, Easing::CubicOut, Easing::ExpoOut] {
            assert_eq!(e.apply(0.0), 0.0, "{:?}", e);
            assert_eq!(e.apply(1.0), 1.0, "{:?}", e);
        }
    }

    #[test]
    fn out_curves_are_monotonic() {
        for e in [Easing::QuadOut, Easing::CubicOut, Easing::ExpoOut] {
            let mut prev = 0.0;
            for i in 0..=100 {
                let v = e.apply(i as f32 / 100.0);
                assert!(v >= prev, "{:?} dipped at step {}", e, i);
                prev = v;
            }
        }
    }

    #[test]
    fn cubic_out_front_loads_motion() {
        assert!(Easing::CubicOut.apply(0.5) > 0.8);
    }
}
