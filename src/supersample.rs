// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Anti-aliasing by supersampling.  Each output pixel is the
//! channel-wise average of an NxN grid of samples spread evenly across
//! the pixel's cell.

use num::Complex;

use crate::color::{self, Argb};
use crate::coloring::Coloring;
use crate::escape::Evaluator;
use crate::gradient::Interpolation;
use crate::planes::{Pixel, PlaneMapper};

/// Offsets, in pixels, of `aa_factor` samples along one axis.  They
/// sit at the centers of equal slices of the cell, so a factor of one
/// samples the pixel itself.
pub fn sample_offsets(aa_factor: u32) -> Vec<f64> {
    let n = f64::from(aa_factor);
    (0..aa_factor)
        .map(|k| -0.5 + (f64::from(k) + 0.5) / n)
        .collect()
}

/// The color of one pixel sampled on an `aa_factor` x `aa_factor`
/// grid.  An `aa_factor` of zero is treated as one.
pub fn supersample<I: Interpolation>(
    pixel: &Pixel,
    aa_factor: u32,
    plane: &PlaneMapper,
    evaluator: &Evaluator,
    coloring: &Coloring<I>,
) -> Argb {
    let aa_factor = aa_factor.max(1);
    let offsets = sample_offsets(aa_factor);
    let (px, py) = (pixel.0 as f64, pixel.1 as f64);

    let mut sums = [0u64; 4];
    for dx in &offsets {
        for dy in &offsets {
            let c = Complex::new(plane.convert_x(px + dx), plane.convert_y(py + dy));
            let sample = coloring.color(&evaluator.evaluate(c));
            for (sum, ch) in sums.iter_mut().zip(color::channels(sample).iter()) {
                *sum += u64::from(*ch);
            }
        }
    }

    let samples = u64::from(aa_factor) * u64::from(aa_factor);
    color::to_argb(
        (sums[0] / samples) as u32,
        (sums[1] / samples) as u32,
        (sums[2] / samples) as u32,
        (sums[3] / samples) as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradient::default_palette;

    fn setup() -> (PlaneMapper, Evaluator) {
        (
            PlaneMapper::from_bounds(-2.0, 1.0, -1.0, 1.0, 120, 80).unwrap(),
            Evaluator::new(500, 10.0),
        )
    }

    #[test]
    fn offsets_are_centered_in_the_cell() {
        assert_eq!(sample_offsets(1), vec![0.0]);
        assert_eq!(sample_offsets(2), vec![-0.25, 0.25]);
        let three = sample_offsets(3);
        assert_eq!(three.len(), 3);
        assert!(three[1].abs() < 1e-15);
        assert!(three.iter().all(|o| o.abs() < 0.5));
    }

    #[test]
    fn factor_one_is_a_single_sample() {
        let (plane, evaluator) = setup();
        let g = default_palette();
        let coloring = Coloring::new(10.0, &g, false, 50.0);
        for &(x, y) in &[(0, 0), (17, 33), (60, 40), (119, 79)] {
            let pixel = Pixel(x, y);
            let direct = coloring.color(&evaluator.evaluate(plane.pixel_to_point(&pixel)));
            assert_eq!(supersample(&pixel, 1, &plane, &evaluator, &coloring), direct);
        }
    }

    #[test]
    fn uniform_region_averages_to_itself() {
        // Deep inside the cardioid every sample is black.
        let plane = PlaneMapper::from_bounds(-0.1, 0.1, -0.1, 0.1, 10, 10).unwrap();
        let evaluator = Evaluator::new(100, 10.0);
        let g = default_palette();
        let coloring = Coloring::new(10.0, &g, false, 50.0);
        assert_eq!(
            supersample(&Pixel(5, 5), 4, &plane, &evaluator, &coloring),
            color::BLACK
        );
    }

    #[test]
    fn supersampling_is_deterministic() {
        let (plane, evaluator) = setup();
        let g = default_palette();
        let coloring = Coloring::new(10.0, &g, false, 50.0);
        let a = supersample(&Pixel(30, 20), 3, &plane, &evaluator, &coloring);
        let b = supersample(&Pixel(30, 20), 3, &plane, &evaluator, &coloring);
        assert_eq!(a, b);
    }
}
