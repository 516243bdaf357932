// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Progressive layouts.  A layout plan orders every pixel of an image
//! so that a coarse picture appears first and fills in: the first pass
//! visits one pixel per large square, each following pass halves the
//! square size and visits only the pixels not already seen, until the
//! last pass fills single pixels.
//!
//! Painting each visited pixel's color over its whole square gives a
//! blocky preview after any prefix of the plan, and the exact image
//! once the plan is complete.

use log::debug;

use crate::color::{Argb, TRANSPARENT};
use crate::errors::MandelError;

/// The largest square a plan may start from, 2^29.
pub const MAX_SQUARE_SIZE: u32 = 1 << 29;

/// One visited pixel and the square it stands in for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LayoutElement {
    /// Column of the top-left corner.
    pub x: usize,
    /// Row of the top-left corner.
    pub y: usize,
    /// Side length of the square, a power of two.
    pub square_size: u32,
}

/// True for the powers of two from 2 to 2^29.
pub fn is_legal_square_size(size: u32) -> bool {
    size >= 2 && size <= MAX_SQUARE_SIZE && size.is_power_of_two()
}

/// Orders every pixel of a `width` x `height` image from coarsest to
/// finest.  Every pixel appears exactly once.
pub fn make_layout(
    width: usize,
    height: usize,
    max_square_size: u32,
) -> Result<Vec<LayoutElement>, MandelError> {
    if !is_legal_square_size(max_square_size) {
        return Err(MandelError::IllegalSquareSize(max_square_size));
    }

    let mut visited = vec![false; width * height];
    let mut elements = Vec::with_capacity(width * height);
    let mut square_size = max_square_size;

    while square_size >= 1 {
        let step = square_size as usize;
        for y in (0..height).step_by(step) {
            for x in (0..width).step_by(step) {
                let seen = &mut visited[y * width + x];
                if !*seen {
                    *seen = true;
                    elements.push(LayoutElement { x, y, square_size });
                }
            }
        }
        square_size /= 2;
    }

    debug!(
        "layout for {}x{} from squares of {}: {} elements",
        width,
        height,
        max_square_size,
        elements.len()
    );
    Ok(elements)
}

/// Paints the first `render_to` elements of `plan` into a fresh
/// buffer.  Each element's square takes the color found at its top
/// left corner in `pixels` and is clipped to the image.  Pixels no
/// element has reached yet are transparent.
pub fn rasterize(
    pixels: &[Argb],
    width: usize,
    height: usize,
    plan: &[LayoutElement],
    render_to: usize,
) -> Result<Vec<Argb>, MandelError> {
    if pixels.len() != width * height {
        return Err(MandelError::BufferSize {
            expected: width * height,
            actual: pixels.len(),
        });
    }

    let mut image = vec![TRANSPARENT; width * height];
    for element in plan.iter().take(render_to) {
        let rgb = pixels[element.y * width + element.x];
        let size = element.square_size as usize;
        let right = (element.x + size).min(width);
        let bottom = (element.y + size).min(height);
        for row in element.y..bottom {
            let start = row * width;
            for p in &mut image[start + element.x..start + right] {
                *p = rgb;
            }
        }
    }
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn four_by_four_covers_every_pixel_once() {
        let plan = make_layout(4, 4, 4).unwrap();
        assert_eq!(plan.len(), 16);
        assert_eq!(
            plan[0],
            LayoutElement {
                x: 0,
                y: 0,
                square_size: 4
            }
        );
        let seen: HashSet<(usize, usize)> = plan.iter().map(|e| (e.x, e.y)).collect();
        assert_eq!(seen.len(), 16);
        for y in 0..4 {
            for x in 0..4 {
                assert!(seen.contains(&(x, y)));
            }
        }
    }

    #[test]
    fn plans_run_largest_first() {
        let plan = make_layout(4, 4, 4).unwrap();
        let sizes: Vec<u32> = plan.iter().map(|e| e.square_size).collect();
        assert_eq!(sizes[..4], [4, 2, 2, 2]);
        assert!(sizes.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(
            plan[1..4].iter().map(|e| (e.x, e.y)).collect::<Vec<_>>(),
            vec![(2, 0), (0, 2), (2, 2)]
        );
    }

    #[test]
    fn ragged_images_are_covered() {
        let plan = make_layout(7, 5, 8).unwrap();
        assert_eq!(plan.len(), 35);
        let seen: HashSet<(usize, usize)> = plan.iter().map(|e| (e.x, e.y)).collect();
        assert_eq!(seen.len(), 35);
    }

    #[test]
    fn illegal_square_sizes_are_rejected() {
        for &size in &[0, 1, 3, 6, 100, 1 << 30] {
            assert_eq!(
                make_layout(4, 4, size),
                Err(MandelError::IllegalSquareSize(size))
            );
        }
        assert!(make_layout(4, 4, MAX_SQUARE_SIZE).is_ok());
    }

    #[test]
    fn full_rasterization_reproduces_the_image() {
        let (w, h) = (5, 3);
        let pixels: Vec<Argb> = (0..(w * h) as u32).collect();
        let plan = make_layout(w, h, 4).unwrap();
        assert_eq!(rasterize(&pixels, w, h, &plan, plan.len()).unwrap(), pixels);
    }

    #[test]
    fn first_element_floods_its_clipped_square() {
        let (w, h) = (3, 3);
        let pixels: Vec<Argb> = (1..=9).collect();
        let plan = make_layout(w, h, 4).unwrap();
        let preview = rasterize(&pixels, w, h, &plan, 1).unwrap();
        assert!(preview.iter().all(|&p| p == 1));
        let empty = rasterize(&pixels, w, h, &plan, 0).unwrap();
        assert!(empty.iter().all(|&p| p == TRANSPARENT));
    }

    #[test]
    fn rasterize_checks_buffer_size() {
        let plan = make_layout(2, 2, 2).unwrap();
        assert_eq!(
            rasterize(&[0; 3], 2, 2, &plan, 4),
            Err(MandelError::BufferSize {
                expected: 4,
                actual: 3
            })
        );
    }
}
