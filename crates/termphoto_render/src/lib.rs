mod cells;
mod image_pipeline;
pub mod slideshow;
pub mod surface;

use image::{DynamicImage, GenericImageView};
use log::debug;

pub use cells::{
    grid::{CellColor, Frame, FrameItem, TerminalCell, BLOCK_GLYPH},
    mapping::FrameRenderer,
    palette::{
        advertises_true_color, GrayscaleRamp, Palette, PaletteMode, Quantizer, GRAYSCALE_BASE,
        GRAYSCALE_STEPS,
    },
};
pub use image_pipeline::{
    loader::{decode_frame, FrameSource, LoadError, LoadResult, StaticFrames},
    resample::{NearestNeighbor, ResampleFilter, Resampler, Rgba16Image},
    resize::{LayoutPolicy, TargetGeometry, DEFAULT_CELL_ASPECT},
};
pub use slideshow::{Slideshow, SlideshowSummary};
pub use surface::{FixedSurface, SurfaceDimensions, SurfaceQuery, TerminalSurface};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("surface has no room to draw ({width}x{height})")]
    EmptySurface { width: u16, height: u16 },
    #[error("image has no pixels")]
    EmptyImage,
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimension { width: i64, height: i64 },
}

#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    pub palette: Palette,
    pub filter: ResampleFilter,
    pub layout: LayoutPolicy,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            palette: Palette::Grayscale(GrayscaleRamp::default()),
            filter: ResampleFilter::default(),
            layout: LayoutPolicy::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RenderOutput {
    pub frame: Frame,
    pub geometry: TargetGeometry,
}

/// Resamples a photo to the surface and maps every pixel to a color cell.
pub struct CellRenderer<R = ResampleFilter, Q = Palette> {
    resampler: R,
    frames: FrameRenderer<Q>,
    layout: LayoutPolicy,
}

impl CellRenderer {
    pub fn from_options(options: RenderOptions) -> Self {
        Self::new(options.filter, options.palette, options.layout)
    }
}

impl Default for CellRenderer {
    fn default() -> Self {
        Self::from_options(RenderOptions::default())
    }
}

impl<R: Resampler, Q: Quantizer> CellRenderer<R, Q> {
    pub fn new(resampler: R, quantizer: Q, layout: LayoutPolicy) -> Self {
        Self { resampler, frames: FrameRenderer::new(quantizer), layout }
    }

    pub fn render_image(
        &self,
        image: &DynamicImage,
        surface: SurfaceDimensions,
    ) -> Result<RenderOutput, RenderError> {
        if !surface.is_renderable() {
            return Err(RenderError::EmptySurface { width: surface.width, height: surface.height });
        }

        let (width, height) = image.dimensions();
        let geometry = self.layout.derive(width, height, surface).ok_or(RenderError::EmptyImage)?;
        debug!(
            "resampling {width}x{height} photo to {}x{} cells",
            geometry.columns, geometry.rows
        );

        let source = image.to_rgba16();
        let grid = self.resampler.resample(
            &source,
            u32::from(geometry.columns),
            u32::from(geometry.rows),
        );
        let frame = self.frames.render(&grid);

        Ok(RenderOutput { frame, geometry })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_surface_is_rejected_before_resampling() {
        let renderer = CellRenderer::default();
        let image = DynamicImage::new_rgb8(4, 4);
        let err = renderer.render_image(&image, SurfaceDimensions::EMPTY).unwrap_err();
        assert!(matches!(err, RenderError::EmptySurface { width: 0, height: 0 }));
    }

    #[test]
    fn empty_image_is_rejected() {
        let renderer = CellRenderer::default();
        let image = DynamicImage::new_rgb8(0, 0);
        let err = renderer.render_image(&image, SurfaceDimensions::new(4, 4)).unwrap_err();
        assert!(matches!(err, RenderError::EmptyImage));
    }

    #[test]
    fn stretch_fills_every_cell() {
        let renderer = CellRenderer::default();
        let image = DynamicImage::new_rgb8(640, 480);
        let output = renderer.render_image(&image, SurfaceDimensions::new(80, 24)).unwrap();
        assert_eq!(output.frame.cells().count(), 80 * 24);
        assert_eq!(output.frame.row_breaks(), 24);
    }
}
