// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Whole-image rendering.  Every pixel is independent of every other,
//! so an image can be produced in raster order, in progressive layout
//! order, or with rows handed out to several threads, and all three
//! come out identical.

use std::sync::Mutex;

use itertools::iproduct;
use log::debug;

use crate::color::Argb;
use crate::coloring::Coloring;
use crate::config::{RenderConfig, Viewport};
use crate::errors::MandelError;
use crate::escape::Evaluator;
use crate::gradient::{CatmullRom, Gradient, Interpolation};
use crate::layout::{make_layout, rasterize, LayoutElement};
use crate::planes::{Pixel, PlaneMapper};
use crate::supersample::supersample;

/// A validated render: the mapping for one frame, the evaluator and
/// the coloring.  Buffers it produces are row-major, `width * height`
/// long.
pub struct Renderer<'a, I: Interpolation = CatmullRom> {
    config: RenderConfig,
    plane: PlaneMapper,
    evaluator: Evaluator,
    coloring: Coloring<'a, I>,
}

impl<'a, I: Interpolation> Renderer<'a, I> {
    /// Requires the render settings, the part of the plane to look at
    /// and the gradient escaped points are colored from.
    pub fn new(
        config: &RenderConfig,
        viewport: &Viewport,
        gradient: &'a Gradient<I>,
    ) -> Result<Self, MandelError> {
        config.validate()?;
        if !gradient.is_formed() {
            return Err(MandelError::GradientNotFormed);
        }
        let plane = viewport.mapper(config.width, config.height)?;
        Ok(Renderer {
            config: *config,
            plane,
            evaluator: Evaluator::new(config.max_iteration, config.bailout),
            coloring: Coloring::new(
                config.bailout,
                gradient,
                config.show_discovery,
                config.multiplier,
            ),
        })
    }

    /// The settings this renderer was built with.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The final color of one pixel.
    pub fn pixel(&self, pixel: &Pixel) -> Argb {
        supersample(
            pixel,
            self.config.aa_factor,
            &self.plane,
            &self.evaluator,
            &self.coloring,
        )
    }

    /// The main function for single-threaded rendering.
    pub fn render(&self) -> Vec<Argb> {
        debug!(
            "rendering {}x{} at {} iterations, aa {}",
            self.config.width, self.config.height, self.config.max_iteration, self.config.aa_factor
        );
        iproduct!(0..self.config.height, 0..self.config.width)
            .map(|(row, column)| self.pixel(&Pixel(column, row)))
            .collect()
    }
}

impl<'a, I: Interpolation + Sync> Renderer<'a, I> {
    /// A multi-threaded version of `render`.  Threads take whole rows
    /// from a shared queue until none are left.
    pub fn render_threaded(&self, threads: usize) -> Result<Vec<Argb>, MandelError> {
        let width = self.config.width;
        let mut pixels = vec![0 as Argb; self.config.len()];
        debug!("rendering {} rows on {} threads", self.config.height, threads);
        {
            let rows = Mutex::new(pixels.chunks_mut(width).enumerate());
            let rows = &rows;
            crossbeam::scope(|spawner| {
                for _ in 0..threads.max(1) {
                    spawner.spawn(move |_| loop {
                        let next = match rows.lock() {
                            Ok(mut queue) => queue.next(),
                            Err(_) => None,
                        };
                        match next {
                            Some((row, line)) => {
                                for (column, p) in line.iter_mut().enumerate() {
                                    *p = self.pixel(&Pixel(column, row));
                                }
                            }
                            None => break,
                        }
                    });
                }
            })
            .map_err(|_| MandelError::WorkerFailed)?;
        }
        Ok(pixels)
    }
}

/// Renders an image in layout order, a few elements at a time, so a
/// caller can show a coarse preview early and refine it.
pub struct Progressive<'r, 'a, I: Interpolation = CatmullRom> {
    renderer: &'r Renderer<'a, I>,
    plan: Vec<LayoutElement>,
    pixels: Vec<Argb>,
    done: usize,
}

impl<'r, 'a, I: Interpolation> Progressive<'r, 'a, I> {
    /// Plans the image starting from squares `max_square_size` wide.
    pub fn new(renderer: &'r Renderer<'a, I>, max_square_size: u32) -> Result<Self, MandelError> {
        let config = renderer.config();
        let plan = make_layout(config.width, config.height, max_square_size)?;
        Ok(Progressive {
            renderer,
            plan,
            pixels: vec![0; config.len()],
            done: 0,
        })
    }

    /// Computes up to `count` more elements.  Returns how many were
    /// computed.
    pub fn step(&mut self, count: usize) -> usize {
        let width = self.renderer.config().width;
        let end = self.done.saturating_add(count).min(self.plan.len());
        for element in &self.plan[self.done..end] {
            self.pixels[element.y * width + element.x] =
                self.renderer.pixel(&Pixel(element.x, element.y));
        }
        let computed = end - self.done;
        self.done = end;
        computed
    }

    /// Elements computed so far.
    pub fn done(&self) -> usize {
        self.done
    }

    /// True once every pixel has been computed.
    pub fn is_complete(&self) -> bool {
        self.done == self.plan.len()
    }

    /// The image as far as it has been computed, each computed element
    /// filling its square.
    pub fn preview(&self) -> Result<Vec<Argb>, MandelError> {
        let config = self.renderer.config();
        rasterize(&self.pixels, config.width, config.height, &self.plan, self.done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BLACK, TRANSPARENT};
    use crate::gradient::{default_palette, GradientAnchor};

    fn small() -> RenderConfig {
        RenderConfig {
            width: 24,
            height: 16,
            max_iteration: 300,
            aa_factor: 2,
            multiplier: 50.0,
            ..RenderConfig::default()
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let g = default_palette();
        let r = Renderer::new(&small(), &Viewport::default(), &g).unwrap();
        let first = r.render();
        assert_eq!(first.len(), 24 * 16);
        assert_eq!(first, r.render());
    }

    #[test]
    fn threads_agree_with_single() {
        let g = default_palette();
        let r = Renderer::new(&small(), &Viewport::default(), &g).unwrap();
        assert_eq!(r.render_threaded(3).unwrap(), r.render());
        assert_eq!(r.render_threaded(0).unwrap(), r.render());
    }

    #[test]
    fn image_contains_set_and_exterior() {
        let g = default_palette();
        let r = Renderer::new(&small(), &Viewport::default(), &g).unwrap();
        let pixels = r.render();
        assert!(pixels.contains(&BLACK));
        assert!(pixels.iter().any(|&p| p != BLACK));
    }

    #[test]
    fn progressive_converges_to_full_render() {
        let g = default_palette();
        let r = Renderer::new(&small(), &Viewport::default(), &g).unwrap();
        let mut p = Progressive::new(&r, 8).unwrap();
        assert!(p.preview().unwrap().iter().all(|&c| c == TRANSPARENT));
        assert_eq!(p.step(1), 1);
        let coarse = p.preview().unwrap();
        assert!(coarse[..8].iter().all(|&c| c == coarse[0]));
        while !p.is_complete() {
            p.step(50);
        }
        assert_eq!(p.done(), 24 * 16);
        assert_eq!(p.step(10), 0);
        assert_eq!(p.preview().unwrap(), r.render());
    }

    #[test]
    fn progressive_step_clamps_huge_counts() {
        let g = default_palette();
        let config = RenderConfig {
            width: 8,
            height: 8,
            ..small()
        };
        let r = Renderer::new(&config, &Viewport::default(), &g).unwrap();
        let mut p = Progressive::new(&r, 4).unwrap();
        assert_eq!(p.step(1), 1);
        assert_eq!(p.step(usize::MAX), 63);
        assert!(p.is_complete());
        assert_eq!(p.step(usize::MAX), 0);
        assert_eq!(p.preview().unwrap(), r.render());
    }

    #[test]
    fn renderer_rejects_bad_input() {
        let g = default_palette();
        let tiny = RenderConfig {
            height: 1,
            ..small()
        };
        assert!(Renderer::new(&tiny, &Viewport::default(), &g).is_err());

        let mut unformed = Gradient::new();
        unformed.add_color(GradientAnchor::first(BLACK));
        assert_eq!(
            Renderer::new(&small(), &Viewport::default(), &unformed).err(),
            Some(MandelError::GradientNotFormed)
        );

        let r = Renderer::new(&small(), &Viewport::default(), &g).unwrap();
        assert!(Progressive::new(&r, 3).is_err());
    }
}
