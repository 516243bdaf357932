// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0 in
//! the upper-left corner, and a rectangle on the complex plane.
//!
//! Pixel rows count downward while the imaginary axis counts upward,
//! so the mapping flips vertically: row 0 is the top of the image and
//! lands on the largest imaginary value.
use num::Complex;

use crate::errors::MandelError;

/// The plane width at a magnification of one.  Enough to hold the
/// whole set.
pub const UNIT_PLANE_WIDTH: f64 = 4.0;

/// Describes the width and height of an integral plane that is
/// assumed to start at 0,0.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the x, y of a point in a region.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Maps pixels onto the complex plane.  Immutable once built; build a
/// new one for every frame.
///
/// The mapping is edge-inclusive: pixel 0 sits on the minimum of an
/// axis and pixel `dimension - 1` on its maximum, which is why every
/// constructor divides by `dimension - 1` and refuses images smaller
/// than 2x2.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneMapper {
    /// The size of the image being rendered.
    pub integral_plane: IntegralPlane,
    min_x: f64,
    min_y: f64,
    // Length of plane covered by one pixel along each axis.
    x_per_pixel: f64,
    y_per_pixel: f64,
    // height - 1, the last pixel row.
    last_row: f64,
}

fn check_dimensions(width: usize, height: usize) -> Result<(), MandelError> {
    if width < 2 || height < 2 {
        return Err(MandelError::DegenerateImage { width, height });
    }
    Ok(())
}

impl PlaneMapper {
    /// Builds a mapper from the bounds of the complex plane and the
    /// size of the image.
    pub fn from_bounds(
        min_x: f64,
        max_x: f64,
        min_y: f64,
        max_y: f64,
        width: usize,
        height: usize,
    ) -> Result<PlaneMapper, MandelError> {
        check_dimensions(width, height)?;
        let last_column = (width - 1) as f64;
        let last_row = (height - 1) as f64;
        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            min_x,
            min_y,
            x_per_pixel: (max_x - min_x) / last_column,
            y_per_pixel: (max_y - min_y) / last_row,
            last_row,
        })
    }

    /// Builds a mapper centered on `center`, `plane_width` wide.  The
    /// plane height follows from the image's aspect ratio, so pixels
    /// stay square.
    pub fn from_center_width(
        center: Complex<f64>,
        plane_width: f64,
        width: usize,
        height: usize,
    ) -> Result<PlaneMapper, MandelError> {
        check_dimensions(width, height)?;
        let last_column = (width - 1) as f64;
        let last_row = (height - 1) as f64;
        // Steps come straight from the width; rebuilding them from
        // min + width loses most of the mantissa at deep zoom.
        let per_pixel = plane_width / last_column;
        let plane_height = per_pixel * last_row;
        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            min_x: center.re - plane_width / 2.0,
            min_y: center.im - plane_height / 2.0,
            x_per_pixel: per_pixel,
            y_per_pixel: per_pixel,
            last_row,
        })
    }

    /// Builds a mapper centered on `center` at the given
    /// magnification, where a magnification of one is a plane four
    /// units wide.
    pub fn from_magnification(
        center: Complex<f64>,
        magnification: f64,
        width: usize,
        height: usize,
    ) -> Result<PlaneMapper, MandelError> {
        PlaneMapper::from_center_width(center, UNIT_PLANE_WIDTH / magnification, width, height)
    }

    /// The total number of points in the integral grid.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Always false; a degenerate plane can't be built.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Map a (possibly fractional) column to the real axis.
    #[inline]
    pub fn convert_x(&self, px: f64) -> f64 {
        self.min_x + px * self.x_per_pixel
    }

    /// Map a (possibly fractional) row to the imaginary axis.  Row 0
    /// maps to the top of the plane.
    #[inline]
    pub fn convert_y(&self, py: f64) -> f64 {
        self.min_y + (self.last_row - py) * self.y_per_pixel
    }

    /// Given a pixel on the integral cartesian plane, map that to a
    /// point on the complex cartesian plane.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(
            self.convert_x(pixel.0 as f64),
            self.convert_y(pixel.1 as f64),
        )
    }
}
