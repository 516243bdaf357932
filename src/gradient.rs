// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Color gradients over the normalized interval [0, 1].
//!
//! A gradient is a sparse set of anchors, each a color pinned to an
//! index, and an interpolation strategy that fills in everything
//! between them.  Bookkeeping (keeping anchors sorted, knowing whether
//! both ends are pinned, memoizing results) lives in `Gradient`; the
//! strategy only ever sees a sorted, formed slice of anchors.

use std::sync::Mutex;

use fnv::FnvHashMap;
use log::trace;
use num::clamp;

use crate::color::{self, Argb};
use crate::errors::MandelError;

/// Cache keys are the requested index quantized to this many steps, so
/// lookups never depend on exact floating point equality.
const CACHE_RESOLUTION: f64 = 1_000_000_000.0;

/// A color pinned to a position on the gradient.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GradientAnchor {
    /// The color at this position.
    pub color: Argb,
    /// Position in [0, 1].
    pub index: f64,
}

impl GradientAnchor {
    /// An anchor anywhere on the gradient.
    pub fn new(color: Argb, index: f64) -> Self {
        GradientAnchor { color, index }
    }

    /// An anchor at 0.0.
    pub fn first(color: Argb) -> Self {
        GradientAnchor::new(color, 0.0)
    }

    /// An anchor at 1.0.
    pub fn last(color: Argb) -> Self {
        GradientAnchor::new(color, 1.0)
    }
}

/// A way of turning a sorted set of anchors into a color at an
/// arbitrary index.
///
/// Implementations may assume `anchors` is sorted by index, holds at
/// least two entries, starts at 0.0 and ends at 1.0, and that `index`
/// is within [0, 1].
pub trait Interpolation {
    /// The color at `index`.
    fn interpolate(&self, anchors: &[GradientAnchor], index: f64) -> Argb;
}

/// Finds the pair of anchors surrounding `index`, returning the
/// position of the lower one.  The first pair that brackets wins.
fn bracket(anchors: &[GradientAnchor], index: f64) -> usize {
    anchors
        .windows(2)
        .position(|pair| pair[0].index <= index && index <= pair[1].index)
        .unwrap_or_else(|| anchors.len().saturating_sub(2))
}

fn to_channel(value: f64) -> u32 {
    clamp(value as i64, 0, 255) as u32
}

/// Catmull-Rom cubic spline per channel.  The anchors at either end
/// stand in for their own missing neighbor, which flattens the curve
/// at 0.0 and 1.0.
#[derive(Copy, Clone, Debug, Default)]
pub struct CatmullRom;

impl CatmullRom {
    fn cubic(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
        let t2 = t * t;
        let t3 = t2 * t;
        0.5 * ((2.0 * p1)
            + (-p0 + p2) * t
            + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
            + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
    }
}

impl Interpolation for CatmullRom {
    fn interpolate(&self, anchors: &[GradientAnchor], index: f64) -> Argb {
        let last = anchors.len() - 1;
        let i1 = bracket(anchors, index);
        let i0 = i1.saturating_sub(1);
        let i2 = (i1 + 1).min(last);
        let i3 = (i1 + 2).min(last);

        let (x1, x2) = (anchors[i1].index, anchors[i2].index);
        let t = (index - x1) / (x2 - x1);

        let c0 = color::channels(anchors[i0].color);
        let c1 = color::channels(anchors[i1].color);
        let c2 = color::channels(anchors[i2].color);
        let c3 = color::channels(anchors[i3].color);

        let mut out = [0u32; 4];
        for (ch, o) in out.iter_mut().enumerate() {
            *o = to_channel(CatmullRom::cubic(
                f64::from(c0[ch]),
                f64::from(c1[ch]),
                f64::from(c2[ch]),
                f64::from(c3[ch]),
                t,
            ));
        }
        color::to_argb(out[0], out[1], out[2], out[3])
    }
}

/// Straight-line blend between the two bracketing anchors.
#[derive(Copy, Clone, Debug, Default)]
pub struct Linear;

impl Interpolation for Linear {
    fn interpolate(&self, anchors: &[GradientAnchor], index: f64) -> Argb {
        let i1 = bracket(anchors, index);
        let i2 = (i1 + 1).min(anchors.len() - 1);
        let (lo, hi) = (&anchors[i1], &anchors[i2]);
        let t = (index - lo.index) / (hi.index - lo.index);

        let a = color::channels(lo.color);
        let b = color::channels(hi.color);
        let mut out = [0u32; 4];
        for (ch, o) in out.iter_mut().enumerate() {
            let (a, b) = (f64::from(a[ch]), f64::from(b[ch]));
            *o = to_channel(a + (b - a) * t);
        }
        color::to_argb(out[0], out[1], out[2], out[3])
    }
}

/// A sorted set of anchors, an interpolation strategy, and a memo of
/// every color handed out so far.
///
/// `color_at` only needs a shared reference, so a finished gradient
/// can be shared between render threads.  Adding or removing anchors
/// needs `&mut self` and clears the memo.
#[derive(Debug)]
pub struct Gradient<I: Interpolation = CatmullRom> {
    anchors: Vec<GradientAnchor>,
    interpolation: I,
    cache: Mutex<FnvHashMap<u64, Argb>>,
}

impl Gradient<CatmullRom> {
    /// An empty, unformed, Catmull-Rom gradient.
    pub fn new() -> Self {
        Gradient::with_interpolation(CatmullRom)
    }
}

impl Default for Gradient<CatmullRom> {
    fn default() -> Self {
        Gradient::new()
    }
}

impl<I: Interpolation> Gradient<I> {
    /// An empty gradient using the given strategy.
    pub fn with_interpolation(interpolation: I) -> Self {
        Gradient {
            anchors: Vec::new(),
            interpolation,
            cache: Mutex::new(FnvHashMap::default()),
        }
    }

    /// Adds an anchor.  An anchor already at the same index is
    /// replaced.
    pub fn add_color(&mut self, anchor: GradientAnchor) {
        self.anchors.retain(|a| a.index != anchor.index);
        self.anchors.push(anchor);
        self.anchors
            .sort_by(|a, b| a.index.partial_cmp(&b.index).unwrap_or(std::cmp::Ordering::Equal));
        self.clear_cache();
    }

    /// Removes the anchor at the same index as `anchor`.  Returns
    /// whether anything was removed.
    pub fn remove_color(&mut self, anchor: &GradientAnchor) -> bool {
        let before = self.anchors.len();
        self.anchors.retain(|a| a.index != anchor.index);
        self.clear_cache();
        self.anchors.len() != before
    }

    /// The anchors, sorted by index.
    pub fn anchors(&self) -> &[GradientAnchor] {
        &self.anchors
    }

    /// True when both ends of the gradient are pinned.
    pub fn is_formed(&self) -> bool {
        let has = |i: f64| self.anchors.iter().any(|a| a.index == i);
        has(0.0) && has(1.0)
    }

    fn clear_cache(&mut self) {
        trace!("gradient changed, dropping memoized colors");
        match self.cache.get_mut() {
            Ok(cache) => cache.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }

    /// The color at `index`, which must be within [0, 1].
    pub fn color_at(&self, index: f64) -> Result<Argb, MandelError> {
        if !(0.0..=1.0).contains(&index) {
            return Err(MandelError::GradientIndexOutOfRange(index));
        }
        if !self.is_formed() {
            return Err(MandelError::GradientNotFormed);
        }

        let key = (index * CACHE_RESOLUTION).round() as u64;
        let mut cache = match self.cache.lock() {
            Ok(cache) => cache,
            Err(poisoned) => poisoned.into_inner(),
        };
        let interpolation = &self.interpolation;
        let anchors = &self.anchors;
        let color = *cache
            .entry(key)
            .or_insert_with(|| interpolation.interpolate(anchors, index));
        Ok(color)
    }

    /// The color at step `index` of a gradient divided into `length`
    /// steps.
    pub fn color_at_step(&self, index: u32, length: u32) -> Result<Argb, MandelError> {
        self.color_at(f64::from(index) / f64::from(length))
    }

    #[cfg(test)]
    fn cached(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }
}

/// The blue, white and orange palette used for deep zooms.
pub fn default_palette() -> Gradient {
    let mut gradient = Gradient::new();
    gradient.add_color(GradientAnchor::first(color::to_rgb(0, 8, 106)));
    gradient.add_color(GradientAnchor::new(color::to_rgb(55, 139, 218), 0.25));
    gradient.add_color(GradientAnchor::new(color::to_rgb(246, 251, 225), 0.5));
    gradient.add_color(GradientAnchor::new(color::to_rgb(253, 160, 0), 0.75));
    gradient.add_color(GradientAnchor::last(color::to_rgb(0, 8, 106)));
    gradient
}
