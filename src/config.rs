// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Render settings.  Once validated, a `RenderConfig` and a
//! `Viewport` are everything needed, besides a gradient, to produce an
//! image.

use num::Complex;

use crate::errors::MandelError;
use crate::planes::PlaneMapper;

/// Which part of the complex plane to render.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Viewport {
    /// Explicit bounds.
    Bounds {
        /// Leftmost real value.
        min_x: f64,
        /// Rightmost real value.
        max_x: f64,
        /// Lowest imaginary value.
        min_y: f64,
        /// Highest imaginary value.
        max_y: f64,
    },
    /// A center and the width of plane to show around it.
    CenterWidth {
        /// Middle of the image.
        center: Complex<f64>,
        /// Width of plane across the image.
        plane_width: f64,
    },
    /// A center and a magnification, where one shows a plane four
    /// units wide.
    Magnification {
        /// Middle of the image.
        center: Complex<f64>,
        /// Zoom relative to the whole set.
        magnification: f64,
    },
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::CenterWidth {
            center: Complex::new(-0.5, 0.0),
            plane_width: 4.0,
        }
    }
}

impl Viewport {
    /// Build the pixel to plane mapping for an image of this size.
    pub fn mapper(&self, width: usize, height: usize) -> Result<PlaneMapper, MandelError> {
        match *self {
            Viewport::Bounds {
                min_x,
                max_x,
                min_y,
                max_y,
            } => PlaneMapper::from_bounds(min_x, max_x, min_y, max_y, width, height),
            Viewport::CenterWidth {
                center,
                plane_width,
            } => PlaneMapper::from_center_width(center, plane_width, width, height),
            Viewport::Magnification {
                center,
                magnification,
            } => PlaneMapper::from_magnification(center, magnification, width, height),
        }
    }

    /// The viewport for frame `frame` of a zoom that starts at this
    /// viewport and shrinks the plane by `zoom_factor` every frame.
    /// Frame zero is the viewport itself.
    pub fn zoomed(&self, zoom_factor: f64, frame: u32) -> Viewport {
        let scale = zoom_factor.powi(frame as i32);
        match *self {
            Viewport::Bounds {
                min_x,
                max_x,
                min_y,
                max_y,
            } => {
                let (cx, cy) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
                let (hw, hh) = ((max_x - min_x) * scale / 2.0, (max_y - min_y) * scale / 2.0);
                Viewport::Bounds {
                    min_x: cx - hw,
                    max_x: cx + hw,
                    min_y: cy - hh,
                    max_y: cy + hh,
                }
            }
            Viewport::CenterWidth {
                center,
                plane_width,
            } => Viewport::CenterWidth {
                center,
                plane_width: plane_width * scale,
            },
            Viewport::Magnification {
                center,
                magnification,
            } => Viewport::Magnification {
                center,
                magnification: magnification / scale,
            },
        }
    }
}

/// Everything about a render except where to look and what colors
/// to use.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// Iterations before a point is assumed to be in the set.
    pub max_iteration: u32,
    /// Squared escape magnitude.
    pub bailout: f64,
    /// Samples per axis per pixel.
    pub aa_factor: u32,
    /// Stretch of the smoothed escape value across the gradient.
    pub multiplier: f64,
    /// Color interior points by how they were found.
    pub show_discovery: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            width: 800,
            height: 600,
            max_iteration: 50_000,
            bailout: 10.0,
            aa_factor: 3,
            multiplier: 5000.0,
            show_discovery: false,
        }
    }
}

impl RenderConfig {
    /// Rejects settings that can't produce an image.
    pub fn validate(&self) -> Result<(), MandelError> {
        if self.width < 2 || self.height < 2 {
            return Err(MandelError::DegenerateImage {
                width: self.width,
                height: self.height,
            });
        }
        if self.aa_factor == 0 {
            return Err(MandelError::IllegalAaFactor(self.aa_factor));
        }
        Ok(())
    }

    /// Pixels in the image.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// True if the image has no pixels.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = RenderConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.len(), 480_000);
    }

    #[test]
    fn bad_configs_are_rejected() {
        let tiny = RenderConfig {
            width: 1,
            ..RenderConfig::default()
        };
        assert!(tiny.validate().is_err());
        let no_samples = RenderConfig {
            aa_factor: 0,
            ..RenderConfig::default()
        };
        assert_eq!(no_samples.validate(), Err(MandelError::IllegalAaFactor(0)));
    }

    #[test]
    fn magnification_and_width_agree() {
        let center = Complex::new(-0.75, 0.1);
        let a = Viewport::Magnification {
            center,
            magnification: 2.0,
        }
        .mapper(101, 51)
        .unwrap();
        let b = Viewport::CenterWidth {
            center,
            plane_width: 2.0,
        }
        .mapper(101, 51)
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zooming_shrinks_the_plane() {
        let v = Viewport::CenterWidth {
            center: Complex::new(0.0, 0.0),
            plane_width: 4.0,
        };
        assert_eq!(v.zoomed(0.5, 0), v);
        assert_eq!(
            v.zoomed(0.5, 2),
            Viewport::CenterWidth {
                center: Complex::new(0.0, 0.0),
                plane_width: 1.0
            }
        );
        let m = Viewport::Magnification {
            center: Complex::new(0.0, 0.0),
            magnification: 1.0,
        };
        assert_eq!(
            m.zoomed(0.5, 1),
            Viewport::Magnification {
                center: Complex::new(0.0, 0.0),
                magnification: 2.0
            }
        );
    }
}
