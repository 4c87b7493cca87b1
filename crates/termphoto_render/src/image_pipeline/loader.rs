use std::collections::VecDeque;
use std::error::Error as StdError;

use image::DynamicImage;

/// A frame that could not be produced. The slideshow logs it and moves on.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to fetch {label}: {source}")]
    Fetch {
        label: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
    #[error("failed to decode {label}: {source}")]
    Decode {
        label: String,
        #[source]
        source: image::ImageError,
    },
}

impl LoadError {
    pub fn fetch(
        label: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        LoadError::Fetch { label: label.into(), source: source.into() }
    }

    pub fn label(&self) -> &str {
        match self {
            LoadError::Fetch { label, .. } | LoadError::Decode { label, .. } => label,
        }
    }
}

pub type LoadResult = Result<DynamicImage, LoadError>;

/// Sequence of decoded photos feeding the slideshow.
pub trait FrameSource {
    /// Frames still queued, when the source knows.
    fn remaining(&self) -> Option<usize>;
    fn next_frame(&mut self) -> Option<LoadResult>;
}

/// Decode raw bytes in any raster format the `image` crate recognizes.
pub fn decode_frame(label: &str, bytes: &[u8]) -> LoadResult {
    image::load_from_memory(bytes)
        .map_err(|source| LoadError::Decode { label: label.to_owned(), source })
}

/// In-memory source, handy for previews and tests.
#[derive(Debug, Default)]
pub struct StaticFrames {
    frames: VecDeque<LoadResult>,
}

impl StaticFrames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: LoadResult) {
        self.frames.push_back(frame);
    }
}

impl FromIterator<DynamicImage> for StaticFrames {
    fn from_iter<T: IntoIterator<Item = DynamicImage>>(iter: T) -> Self {
        Self { frames: iter.into_iter().map(Ok).collect() }
    }
}

impl FrameSource for StaticFrames {
    fn remaining(&self) -> Option<usize> {
        Some(self.frames.len())
    }

    fn next_frame(&mut self) -> Option<LoadResult> {
        self.frames.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageOutputFormat, RgbImage};

    use super::*;

    #[test]
    fn decodes_png_bytes() {
        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::new(3, 2))
            .write_to(&mut bytes, ImageOutputFormat::Png)
            .unwrap();

        let image = decode_frame("tiny.png", bytes.get_ref()).unwrap();
        assert_eq!((image.width(), image.height()), (3, 2));
    }

    #[test]
    fn garbage_is_a_labelled_decode_error() {
        let err = decode_frame("junk.jpg", b"definitely not a jpeg").unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }));
        assert_eq!(err.label(), "junk.jpg");
        assert!(err.to_string().starts_with("failed to decode junk.jpg"));
    }

    #[test]
    fn static_frames_drain_in_order() {
        let mut source: StaticFrames =
            [DynamicImage::new_rgb8(1, 1), DynamicImage::new_rgb8(2, 2)].into_iter().collect();
        source.push(Err(LoadError::fetch("missing", "404")));

        assert_eq!(source.remaining(), Some(3));
        assert_eq!(source.next_frame().unwrap().unwrap().width(), 1);
        assert_eq!(source.next_frame().unwrap().unwrap().width(), 2);
        assert!(source.next_frame().unwrap().is_err());
        assert!(source.next_frame().is_none());
    }
}
