use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgba};

/// Working representation: every source depth is widened to 16 bits per channel.
pub type Rgba16Image = ImageBuffer<Rgba<u16>, Vec<u16>>;

/// Scales an image to exactly `width × height` pixels.
pub trait Resampler {
    fn resample(&self, source: &Rgba16Image, width: u32, height: u32) -> Rgba16Image;
}

/// Picks the source pixel at `floor(dst · src / dst_size)` on each axis.
#[derive(Clone, Copy, Debug, Default)]
pub struct NearestNeighbor;

impl Resampler for NearestNeighbor {
    fn resample(&self, source: &Rgba16Image, width: u32, height: u32) -> Rgba16Image {
        let (source_width, source_height) = source.dimensions();
        if width == 0 || height == 0 || source_width == 0 || source_height == 0 {
            return Rgba16Image::new(0, 0);
        }

        let columns: Vec<u32> = (0..width).map(|x| scale(x, source_width, width)).collect();
        ImageBuffer::from_fn(width, height, |x, y| {
            let source_y = scale(y, source_height, height);
            *source.get_pixel(columns[x as usize], source_y)
        })
    }
}

fn scale(position: u32, source: u32, target: u32) -> u32 {
    (u64::from(position) * u64::from(source) / u64::from(target)) as u32
}

/// Resampling algorithm selectable from the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResampleFilter {
    #[default]
    Nearest,
    Triangle,
    CatmullRom,
    Lanczos3,
}

impl ResampleFilter {
    fn filter_type(self) -> Option<FilterType> {
        match self {
            ResampleFilter::Nearest => None,
            ResampleFilter::Triangle => Some(FilterType::Triangle),
            ResampleFilter::CatmullRom => Some(FilterType::CatmullRom),
            ResampleFilter::Lanczos3 => Some(FilterType::Lanczos3),
        }
    }
}

impl Resampler for ResampleFilter {
    fn resample(&self, source: &Rgba16Image, width: u32, height: u32) -> Rgba16Image {
        match self.filter_type() {
            None => NearestNeighbor.resample(source, width, height),
            Some(_) if width == 0 || height == 0 || source.width() == 0 || source.height() == 0 => {
                Rgba16Image::new(0, 0)
            },
            Some(filter) => imageops::resize(source, width, height, filter),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn numbered(width: u32, height: u32) -> Rgba16Image {
        ImageBuffer::from_fn(width, height, |x, y| {
            let value = (y * width + x) as u16;
            Rgba([value, value, value, u16::MAX])
        })
    }

    #[rstest]
    #[case(1, 1)]
    #[case(3, 7)]
    #[case(80, 24)]
    #[case(200, 3)]
    fn output_has_exact_dimensions(#[case] width: u32, #[case] height: u32) {
        let source = numbered(13, 9);
        for filter in [ResampleFilter::Nearest, ResampleFilter::Triangle, ResampleFilter::Lanczos3]
        {
            let resized = filter.resample(&source, width, height);
            assert_eq!(resized.dimensions(), (width, height), "{filter:?}");
            assert_eq!(resized.pixels().count(), (width * height) as usize);
        }
    }

    #[rstest]
    #[case(0, 5)]
    #[case(5, 0)]
    #[case(0, 0)]
    fn zero_target_is_empty(#[case] width: u32, #[case] height: u32) {
        let source = numbered(4, 4);
        assert_eq!(NearestNeighbor.resample(&source, width, height).dimensions(), (0, 0));
        let smooth = ResampleFilter::CatmullRom.resample(&source, width, height);
        assert_eq!(smooth.dimensions(), (0, 0));
    }

    #[test]
    fn empty_source_is_empty() {
        let source = Rgba16Image::new(0, 0);
        assert_eq!(NearestNeighbor.resample(&source, 4, 4).dimensions(), (0, 0));
    }

    #[test]
    fn own_size_is_identity() {
        let source = numbered(7, 5);
        assert_eq!(NearestNeighbor.resample(&source, 7, 5), source);
    }

    #[test]
    fn downsampling_truncates_coordinates() {
        let source = numbered(4, 4);
        let resized = NearestNeighbor.resample(&source, 2, 2);
        let picked: Vec<u16> = resized.pixels().map(|pixel| pixel.0[0]).collect();
        // (0,0) (2,0) (0,2) (2,2) in the 4x4 source.
        assert_eq!(picked, vec![0, 2, 8, 10]);
    }

    #[test]
    fn upsampling_repeats_pixels() {
        let source = numbered(2, 1);
        let resized = NearestNeighbor.resample(&source, 4, 2);
        let picked: Vec<u16> = resized.pixels().map(|pixel| pixel.0[0]).collect();
        assert_eq!(picked, vec![0, 0, 1, 1, 0, 0, 1, 1]);
    }
}
