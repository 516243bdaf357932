#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points c on the complex plane for
//! which the orbit of z <- z^2 + c, started at zero, stays bounded.
//! Points outside the set escape to infinity, and how quickly they do
//! so is what gives the familiar images their bands of color.
//!
//! The pipeline, leaf first: `planes` maps pixels onto the plane,
//! `escape` decides the fate of one point, `gradient` and `coloring`
//! turn that into a color, `supersample` averages several samples per
//! pixel, and `layout` orders pixels so an image can be refined
//! progressively.  `render` ties them together into whole images.

pub mod color;
pub mod coloring;
pub mod config;
pub mod errors;
pub mod escape;
pub mod gradient;
pub mod layout;
pub mod planes;
pub mod render;
pub mod supersample;

pub use crate::coloring::Coloring;
pub use crate::config::{RenderConfig, Viewport};
pub use crate::errors::MandelError;
pub use crate::escape::{evaluate, Discovery, Evaluation, Evaluator};
pub use crate::gradient::{
    default_palette, CatmullRom, Gradient, GradientAnchor, Interpolation, Linear,
};
pub use crate::layout::{make_layout, LayoutElement};
pub use crate::planes::{Pixel, PlaneMapper};
pub use crate::render::{Progressive, Renderer};
pub use crate::supersample::supersample;
