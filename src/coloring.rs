// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns an `Evaluation` into a color.
//!
//! Escaped points are colored from a gradient using the normalized
//! iteration count, a fractional correction that removes the banding
//! you'd otherwise get from integer escape counts.  Interior points
//! are black, or, for debugging, colored by whichever rule caught
//! them.

use log::warn;

use crate::color::{self, Argb};
use crate::escape::{Discovery, Evaluation};
use crate::gradient::{CatmullRom, Gradient, Interpolation};

/// The smoothed escape value is folded into this many gradient steps
/// before being normalized to [0, 1).
pub const GRADIENT_STEPS: u64 = 100_000;

/// Substituted for any sample whose color can't be resolved.
pub const FALLBACK_COLOR: Argb = color::TRANSPARENT;

/// The fixed colors for interior points when discovery highlighting is
/// on.
pub fn discovery_color(discovery: Discovery) -> Argb {
    match discovery {
        Discovery::MaxIteration | Discovery::Escaped => color::BLACK,
        Discovery::Bulb => color::RED,
        Discovery::Cardioid => color::YELLOW,
        Discovery::Periodicity => color::CORNFLOWER_BLUE,
    }
}

/// Coloring settings, bound to a gradient.
pub struct Coloring<'a, I: Interpolation = CatmullRom> {
    ln_ln_bailout: f64,
    gradient: &'a Gradient<I>,
    show_discovery: bool,
    multiplier: f64,
}

impl<'a, I: Interpolation> Coloring<'a, I> {
    /// `bailout` must be the same threshold the evaluator used.
    /// `multiplier` stretches the smoothed escape value across the
    /// gradient; larger values cycle through it faster.
    pub fn new(
        bailout: f64,
        gradient: &'a Gradient<I>,
        show_discovery: bool,
        multiplier: f64,
    ) -> Self {
        Coloring {
            ln_ln_bailout: bailout.ln().ln(),
            gradient,
            show_discovery,
            multiplier,
        }
    }

    /// The fractional escape correction for an orbit that stopped at
    /// `z`.
    fn normalized_iteration_count(&self, evaluation: &Evaluation) -> f64 {
        let radius = evaluation.z.norm();
        (self.ln_ln_bailout - radius.ln().ln()) / std::f64::consts::LN_2
    }

    /// Where on the gradient an escaped point lands, in [0, 1).
    pub fn gradient_index(&self, evaluation: &Evaluation) -> f64 {
        let position =
            self.normalized_iteration_count(evaluation) + f64::from(evaluation.iterations);
        // NaN from a negative sum truncates to step zero.
        let step = (position.sqrt() * self.multiplier) as u64 % GRADIENT_STEPS;
        step as f64 / GRADIENT_STEPS as f64
    }

    /// The color for one evaluation.  Never fails: a gradient that
    /// can't answer yields `FALLBACK_COLOR` and a warning, so one bad
    /// sample doesn't take the whole image with it.
    pub fn color(&self, evaluation: &Evaluation) -> Argb {
        if evaluation.in_set {
            return if self.show_discovery {
                discovery_color(evaluation.discovery)
            } else {
                color::BLACK
            };
        }

        let index = self.gradient_index(evaluation);
        match self.gradient.color_at(index) {
            Ok(c) => c,
            Err(e) => {
                warn!("could not color sample at gradient index {}: {}", index, e);
                FALLBACK_COLOR
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::evaluate;
    use crate::gradient::{default_palette, GradientAnchor};
    use num::Complex;

    #[test]
    fn interior_is_black_without_discovery() {
        let g = default_palette();
        let coloring = Coloring::new(4.0, &g, false, 1.0);
        let e = evaluate(Complex::new(0.0, 0.0), 100, 4.0);
        assert_eq!(coloring.color(&e), color::BLACK);
        let e = evaluate(Complex::new(-1.0, 0.0), 100, 4.0);
        assert_eq!(coloring.color(&e), color::BLACK);
    }

    #[test]
    fn discovery_colors_interior() {
        let g = default_palette();
        let coloring = Coloring::new(10.0, &g, true, 1.0);
        let cardioid = evaluate(Complex::new(0.0, 0.0), 100, 10.0);
        let bulb = evaluate(Complex::new(-1.0, 0.0), 100, 10.0);
        let period = evaluate(Complex::new(-2.0, 0.0), 10_000, 10.0);
        assert_eq!(coloring.color(&cardioid), color::YELLOW);
        assert_eq!(coloring.color(&bulb), color::RED);
        assert_eq!(coloring.color(&period), color::CORNFLOWER_BLUE);

        // Just outside the cardioid's cusp, with a tiny budget.
        let exhausted = evaluate(Complex::new(0.26, 0.0), 5, 10.0);
        assert_eq!(exhausted.discovery, Discovery::MaxIteration);
        assert_eq!(coloring.color(&exhausted), color::BLACK);
    }

    #[test]
    fn escaped_index_is_in_unit_range() {
        let g = default_palette();
        let coloring = Coloring::new(10.0, &g, false, 5000.0);
        for &(re, im) in &[(2.0, 2.0), (0.5, 0.5), (-0.75, 0.2), (0.3, -0.6)] {
            let e = evaluate(Complex::new(re, im), 1000, 10.0);
            if !e.in_set {
                let idx = coloring.gradient_index(&e);
                assert!(idx >= 0.0 && idx < 1.0, "{} out of range", idx);
            }
        }
    }

    #[test]
    fn escaped_color_comes_from_gradient() {
        let g = default_palette();
        let coloring = Coloring::new(10.0, &g, false, 5000.0);
        let e = evaluate(Complex::new(0.5, 0.5), 1000, 10.0);
        assert!(!e.in_set);
        let idx = coloring.gradient_index(&e);
        assert_eq!(coloring.color(&e), g.color_at(idx).unwrap());
    }

    #[test]
    fn unformed_gradient_falls_back() {
        let mut g = Gradient::new();
        g.add_color(GradientAnchor::new(color::RED, 0.5));
        let coloring = Coloring::new(10.0, &g, false, 5000.0);
        let e = evaluate(Complex::new(2.0, 2.0), 100, 10.0);
        assert_eq!(coloring.color(&e), FALLBACK_COLOR);
    }
}
