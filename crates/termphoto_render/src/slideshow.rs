//! Sequential frame loop: query, render, present, pause.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};

use crate::image_pipeline::loader::FrameSource;
use crate::surface::SurfaceQuery;
use crate::{CellRenderer, Palette, Quantizer, RenderError, ResampleFilter, Resampler};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SlideshowSummary {
    pub rendered: usize,
    /// Frames the source failed to fetch or decode.
    pub skipped_load: usize,
    /// Frames dropped because the surface was empty.
    pub skipped_surface: usize,
    /// Frames dropped for any other render error.
    pub skipped_render: usize,
}

pub struct Slideshow<S, R = ResampleFilter, Q = Palette> {
    renderer: CellRenderer<R, Q>,
    surface: S,
    delay: Duration,
    home_cursor: bool,
}

impl<S: SurfaceQuery, R: Resampler, Q: Quantizer> Slideshow<S, R, Q> {
    pub fn new(renderer: CellRenderer<R, Q>, surface: S) -> Self {
        Self { renderer, surface, delay: Duration::ZERO, home_cursor: false }
    }

    /// Minimum pause between two presented frames. Nothing waits after the
    /// last one.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Start every frame at the top-left corner of the terminal.
    pub fn with_home_cursor(mut self, home_cursor: bool) -> Self {
        self.home_cursor = home_cursor;
        self
    }

    /// Show every frame of `source` on `out`.
    ///
    /// Load and render failures skip the frame. Only a failed write to `out`
    /// stops the loop.
    pub fn show<F, W>(&self, source: &mut F, out: &mut W) -> io::Result<SlideshowSummary>
    where
        F: FrameSource + ?Sized,
        W: Write,
    {
        let mut summary = SlideshowSummary::default();
        let mut pending_delay = false;

        while let Some(loaded) = source.next_frame() {
            let image = match loaded {
                Ok(image) => image,
                Err(err) => {
                    warn!("skipping frame: {err}");
                    summary.skipped_load += 1;
                    continue;
                },
            };

            let surface = self.surface.dimensions();
            let output = match self.renderer.render_image(&image, surface) {
                Ok(output) => output,
                Err(err @ RenderError::EmptySurface { .. }) => {
                    debug!("skipping frame: {err}");
                    summary.skipped_surface += 1;
                    continue;
                },
                Err(err) => {
                    warn!("skipping frame: {err}");
                    summary.skipped_render += 1;
                    continue;
                },
            };

            if pending_delay {
                thread::sleep(self.delay);
            }
            output.frame.present(out, self.home_cursor)?;
            summary.rendered += 1;
            pending_delay = !self.delay.is_zero();
            info!(
                "rendered frame {} ({}x{} cells), {} still queued",
                summary.rendered,
                output.geometry.columns,
                output.geometry.rows,
                source.remaining().map_or_else(|| "unknown".to_owned(), |left| left.to_string())
            );
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::time::Instant;

    use image::DynamicImage;

    use super::*;
    use crate::image_pipeline::loader::{LoadError, StaticFrames};
    use crate::surface::{FixedSurface, SurfaceDimensions};

    /// Shrinks to nothing after the first query, like a terminal being resized away.
    struct ShrinkingSurface {
        queries: Cell<usize>,
    }

    impl SurfaceQuery for ShrinkingSurface {
        fn dimensions(&self) -> SurfaceDimensions {
            let count = self.queries.get();
            self.queries.set(count + 1);
            if count == 0 {
                SurfaceDimensions::new(2, 1)
            } else {
                SurfaceDimensions::EMPTY
            }
        }
    }

    #[test]
    fn load_errors_skip_the_frame_and_continue() {
        let mut source = StaticFrames::new();
        source.push(Err(LoadError::fetch("https://example.invalid/a.jpg", "connection refused")));
        source.push(Ok(DynamicImage::new_rgb8(4, 4)));

        let slideshow =
            Slideshow::new(CellRenderer::default(), FixedSurface(SurfaceDimensions::new(2, 2)));
        let mut out = Vec::new();
        let summary = slideshow.show(&mut source, &mut out).unwrap();

        assert_eq!(
            summary,
            SlideshowSummary { rendered: 1, skipped_load: 1, ..Default::default() }
        );
        assert!(!out.is_empty());
    }

    #[test]
    fn surface_is_queried_for_every_frame() {
        let mut source: StaticFrames =
            [DynamicImage::new_rgb8(4, 4), DynamicImage::new_rgb8(4, 4)].into_iter().collect();
        let surface = ShrinkingSurface { queries: Cell::new(0) };

        let slideshow = Slideshow::new(CellRenderer::default(), &surface);
        let mut out = Vec::new();
        let summary = slideshow.show(&mut source, &mut out).unwrap();

        assert_eq!(surface.queries.get(), 2);
        assert_eq!(summary.rendered, 1);
        assert_eq!(summary.skipped_surface, 1);
        assert_eq!(String::from_utf8(out).unwrap().matches(crate::BLOCK_GLYPH).count(), 2);
    }

    #[test]
    fn empty_images_are_skipped() {
        let mut source: StaticFrames = [DynamicImage::new_rgb8(0, 3)].into_iter().collect();
        let slideshow =
            Slideshow::new(CellRenderer::default(), FixedSurface(SurfaceDimensions::new(2, 2)));
        let summary = slideshow.show(&mut source, &mut Vec::new()).unwrap();
        assert_eq!(summary.skipped_render, 1);
    }

    #[test]
    fn frames_are_spaced_by_the_delay() {
        let mut source: StaticFrames =
            [DynamicImage::new_rgb8(2, 2), DynamicImage::new_rgb8(2, 2)].into_iter().collect();
        let slideshow =
            Slideshow::new(CellRenderer::default(), FixedSurface(SurfaceDimensions::new(1, 1)))
                .with_delay(Duration::from_millis(150));

        let started = Instant::now();
        let summary = slideshow.show(&mut source, &mut Vec::new()).unwrap();

        assert_eq!(summary.rendered, 2);
        assert!(started.elapsed() >= Duration::from_millis(150));
    }

    #[test]
    fn no_pause_after_the_last_rendered_frame() {
        let mut source = StaticFrames::new();
        source.push(Ok(DynamicImage::new_rgb8(2, 2)));
        source.push(Err(LoadError::fetch("https://example.invalid/b.jpg", "connection refused")));
        let slideshow =
            Slideshow::new(CellRenderer::default(), FixedSurface(SurfaceDimensions::new(1, 1)))
                .with_delay(Duration::from_secs(5));

        let started = Instant::now();
        let summary = slideshow.show(&mut source, &mut Vec::new()).unwrap();

        assert_eq!(
            summary,
            SlideshowSummary { rendered: 1, skipped_load: 1, ..Default::default() }
        );
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
