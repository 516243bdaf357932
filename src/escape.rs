// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time evaluator.  Takes a point on the complex plane and
//! decides whether it belongs to the Mandelbrot set, and if not, how
//! many iterations it took to leave.
//!
//! Most of the cost of a Mandelbrot image lives in the black heart,
//! where every point runs to the iteration limit.  Two closed-form
//! tests catch the main cardioid and the period-2 bulb before any
//! iteration happens, and two independent periodicity heuristics catch
//! orbits that have settled into a cycle.  The heuristics are kept
//! apart deliberately: which points they classify as interior shows
//! up directly in the rendered image.

use num::Complex;

const D4: f64 = 1.0 / 4.0;
const D16: f64 = D4 / 4.0;

/// How close two orbit points must be, per component, to count as the
/// same point.
pub const PERIODICITY_THRESHOLD: f64 = 1e-17;

/// The iteration at which the tortoise is first placed, and the lag
/// between subsequent comparisons against it.
pub const TORTOISE_LAG: u32 = 10;

/// Starting distance, in iterations, between refreshes of the
/// periodicity checkpoint.
const INITIAL_CHECK_INTERVAL: u32 = 3;

/// After this many checkpoint refreshes the interval doubles.
const REFRESHES_PER_DOUBLING: u32 = 10;

/// Which rule settled the fate of a point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Discovery {
    /// Ran out of iterations without escaping.
    MaxIteration,
    /// Inside the period-2 bulb.
    Bulb,
    /// Inside the main cardioid.
    Cardioid,
    /// The orbit was caught repeating itself.
    Periodicity,
    /// The orbit left the bailout radius.
    Escaped,
}

/// The outcome of evaluating one point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// Iterations performed.  Equal to the limit for interior points
    /// found by the shortcuts or by exhaustion.
    pub iterations: u32,
    /// Where the orbit stopped.  For the cardioid and bulb shortcuts no
    /// orbit is run and this is the starting point itself.
    pub z: Complex<f64>,
    /// True if the point is considered part of the set.
    pub in_set: bool,
    /// Why.
    pub discovery: Discovery,
}

impl Evaluation {
    fn interior(iterations: u32, z: Complex<f64>, discovery: Discovery) -> Self {
        Evaluation {
            iterations,
            z,
            in_set: true,
            discovery,
        }
    }

    fn escaped(iterations: u32, z: Complex<f64>) -> Self {
        Evaluation {
            iterations,
            z,
            in_set: false,
            discovery: Discovery::Escaped,
        }
    }
}

/// True if the point is inside the main cardioid.
#[inline]
pub fn in_cardioid(c: Complex<f64>) -> bool {
    let y2 = c.im * c.im;
    let q = (c.re - D4) * (c.re - D4) + y2;
    q * (q + (c.re - D4)) < D4 * y2
}

/// True if the point is inside the period-2 bulb centered on -1.
#[inline]
pub fn in_period2_bulb(c: Complex<f64>) -> bool {
    (c.re + 1.0) * (c.re + 1.0) + c.im * c.im < D16
}

#[inline]
fn same_point(zx: f64, zy: f64, hx: f64, hy: f64) -> bool {
    (zx - hx).abs() < PERIODICITY_THRESHOLD && (zy - hy).abs() < PERIODICITY_THRESHOLD
}

/// Carries the iteration limit and the bailout threshold so the same
/// settings can be reused for every sample of a render.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Evaluator {
    /// Iterations before a point is assumed to be in the set.
    pub max_iteration: u32,
    /// Squared magnitude beyond which the orbit has escaped.
    pub bailout: f64,
}

impl Evaluator {
    /// Constructor.
    pub fn new(max_iteration: u32, bailout: f64) -> Self {
        Evaluator {
            max_iteration,
            bailout,
        }
    }

    /// Evaluate one point.  Total over its input: every point produces
    /// exactly one result.
    pub fn evaluate(&self, c: Complex<f64>) -> Evaluation {
        evaluate(c, self.max_iteration, self.bailout)
    }
}

/// The fixed-threshold periodicity check.  Remembers one orbit point
/// and replaces it on a schedule that starts every fourth iteration
/// and doubles its spacing after every ten refreshes.
#[derive(Debug)]
struct Checkpoint {
    x: f64,
    y: f64,
    interval: u32,
    counter: u32,
    refreshes: u32,
}

impl Checkpoint {
    fn new() -> Self {
        Checkpoint {
            x: 0.0,
            y: 0.0,
            interval: INITIAL_CHECK_INTERVAL,
            counter: 0,
            refreshes: 0,
        }
    }

    fn matches(&self, zx: f64, zy: f64) -> bool {
        same_point(zx, zy, self.x, self.y)
    }

    /// Called once per iteration.  Remembers the current point if a
    /// refresh is due and reports whether it was.
    fn advance(&mut self, zx: f64, zy: f64) -> bool {
        let refresh = self.counter >= self.interval;
        self.counter += 1;
        if refresh {
            self.counter = 0;
            self.refreshes += 1;
            if self.refreshes >= REFRESHES_PER_DOUBLING {
                self.interval *= 2;
                self.refreshes = 0;
            }
            self.x = zx;
            self.y = zy;
        }
        refresh
    }
}

/// The spaced cycle check.  The tortoise is placed at iteration
/// `TORTOISE_LAG` and never moves; every later multiple of the lag is
/// compared against it, so a cycle is caught once a multiple of its
/// period lines up with a multiple of the lag.
#[derive(Debug, Default)]
struct Tortoise {
    x: f64,
    y: f64,
}

impl Tortoise {
    fn check(&mut self, i: u32, zx: f64, zy: f64) -> bool {
        if i == TORTOISE_LAG {
            self.x = zx;
            self.y = zy;
            false
        } else {
            i > TORTOISE_LAG && i % TORTOISE_LAG == 0 && same_point(zx, zy, self.x, self.y)
        }
    }
}

/// Runs z <- z^2 + c from z = 0 until the orbit escapes, repeats, or
/// the iteration limit is reached.
pub fn evaluate(c: Complex<f64>, max_iteration: u32, bailout: f64) -> Evaluation {
    if in_cardioid(c) {
        return Evaluation::interior(max_iteration, c, Discovery::Cardioid);
    }
    if in_period2_bulb(c) {
        return Evaluation::interior(max_iteration, c, Discovery::Bulb);
    }

    let (px, py) = (c.re, c.im);
    let (mut zx, mut zy) = (0.0_f64, 0.0_f64);
    let (mut zx2, mut zy2) = (0.0_f64, 0.0_f64);
    let mut checkpoint = Checkpoint::new();
    let mut tortoise = Tortoise::default();

    for i in 0..max_iteration {
        zy = 2.0 * zx * zy + py;
        zx = zx2 - zy2 + px;
        zx2 = zx * zx;
        zy2 = zy * zy;

        if zx2 + zy2 > bailout {
            return Evaluation::escaped(i, Complex::new(zx, zy));
        }

        if checkpoint.matches(zx, zy) {
            return Evaluation::interior(i, Complex::new(zx, zy), Discovery::Periodicity);
        }

        if tortoise.check(i, zx, zy) {
            return Evaluation::interior(i, Complex::new(zx, zy), Discovery::Periodicity);
        }

        checkpoint.advance(zx, zy);
    }

    Evaluation::interior(
        max_iteration,
        Complex::new(zx, zy),
        Discovery::MaxIteration,
    )
}
