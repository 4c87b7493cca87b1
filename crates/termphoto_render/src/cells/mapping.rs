use crate::image_pipeline::resample::Rgba16Image;

use super::{
    grid::{Frame, TerminalCell},
    palette::Quantizer,
};

/// Turns a resampled pixel grid into a frame of colored cells.
pub struct FrameRenderer<Q> {
    quantizer: Q,
}

impl<Q: Quantizer> FrameRenderer<Q> {
    pub fn new(quantizer: Q) -> Self {
        Self { quantizer }
    }

    /// Emit one cell per pixel in row-major order and a row break after each
    /// row. Grids wider or taller than `u16::MAX` are cropped.
    pub fn render(&self, grid: &Rgba16Image) -> Frame {
        let width = u16::try_from(grid.width()).unwrap_or(u16::MAX);
        let height = u16::try_from(grid.height()).unwrap_or(u16::MAX);
        let mut frame = Frame::with_capacity(width, height);
        if width == 0 || height == 0 {
            return frame;
        }

        for row in grid.rows().take(usize::from(height)) {
            for pixel in row.take(usize::from(width)) {
                frame.push_cell(TerminalCell::new(self.quantizer.quantize(*pixel)));
            }
            frame.end_row();
        }

        frame
    }
}
