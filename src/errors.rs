// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors raised by the renderer.  All of them are caller mistakes
//! caught at construction or call time; none of them is transient, so
//! nothing here is worth retrying.

use failure::Fail;

/// Everything that can go wrong while setting up or driving a render.
#[derive(Debug, Fail, PartialEq)]
pub enum MandelError {
    /// Mapping needs at least two pixels along each axis.
    #[fail(display = "image must be at least 2x2 pixels, got {}x{}", width, height)]
    DegenerateImage {
        /// Requested image width.
        width: usize,
        /// Requested image height.
        height: usize,
    },

    /// The gradient has no anchor at 0.0, or none at 1.0.
    #[fail(display = "gradient not formed: anchors at 0.0 and 1.0 are required")]
    GradientNotFormed,

    /// Gradients are only defined over [0, 1].
    #[fail(display = "illegal gradient index {}", _0)]
    GradientIndexOutOfRange(f64),

    /// Layout squares must be a power of two between 2 and 2^29.
    #[fail(display = "max square size must be a power of two from 2 to 2^29, got {}", _0)]
    IllegalSquareSize(u32),

    /// Supersampling needs at least one sample per axis.
    #[fail(display = "anti-aliasing factor must be at least 1, got {}", _0)]
    IllegalAaFactor(u32),

    /// A pixel buffer did not match the image it claims to hold.
    #[fail(display = "pixel buffer holds {} pixels, expected {}", actual, expected)]
    BufferSize {
        /// width * height
        expected: usize,
        /// What was handed over.
        actual: usize,
    },

    /// A render thread panicked.
    #[fail(display = "a render worker thread panicked")]
    WorkerFailed,
}
