use image::Rgba;

use super::grid::CellColor;

/// First index of the 24-step grayscale ramp in the xterm 256-color table.
pub const GRAYSCALE_BASE: u8 = 232;
/// Number of entries in the xterm grayscale ramp.
pub const GRAYSCALE_STEPS: u8 = 24;

const CUBE_BASE: u8 = 16;
const CHANNEL_RANGE: u32 = u16::MAX as u32 + 1;

/// Maps one normalized 16-bit pixel to a displayable terminal color.
pub trait Quantizer {
    fn quantize(&self, pixel: Rgba<u16>) -> CellColor;
}

/// Palette selection as requested on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaletteMode {
    #[default]
    Auto,
    Grayscale,
    Color256,
    TrueColor,
}

impl PaletteMode {
    /// Resolve `Auto` against the value of `COLORTERM`.
    pub fn resolve(self, colorterm: Option<&str>) -> Palette {
        match self {
            PaletteMode::Auto if advertises_true_color(colorterm) => Palette::TrueColor,
            PaletteMode::Auto | PaletteMode::Grayscale => {
                Palette::Grayscale(GrayscaleRamp::default())
            },
            PaletteMode::Color256 => Palette::ColorCube,
            PaletteMode::TrueColor => Palette::TrueColor,
        }
    }
}

pub fn advertises_true_color(colorterm: Option<&str>) -> bool {
    colorterm.is_some_and(|value| {
        value.eq_ignore_ascii_case("truecolor") || value.eq_ignore_ascii_case("24bit")
    })
}

/// A contiguous band of gray entries in the 256-color table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrayscaleRamp {
    base: u8,
    steps: u8,
}

impl Default for GrayscaleRamp {
    fn default() -> Self {
        Self::new(GRAYSCALE_BASE, GRAYSCALE_STEPS)
    }
}

impl GrayscaleRamp {
    /// Build a ramp, shrinking `steps` so the band never runs past index 255.
    pub fn new(base: u8, steps: u8) -> Self {
        let available = 256 - u16::from(base);
        let steps = u16::from(steps).clamp(1, available) as u8;
        Self { base, steps }
    }

    pub fn base(&self) -> u8 {
        self.base
    }

    pub fn steps(&self) -> u8 {
        self.steps
    }

    /// Last palette index the ramp can produce.
    pub fn last(&self) -> u8 {
        self.base + (self.steps - 1)
    }

    /// Map a 16-bit luminance onto the ramp.
    pub fn index_for_luminance(&self, luminance: u16) -> u8 {
        let steps = u32::from(self.steps);
        let offset = (u32::from(luminance) * steps / CHANNEL_RANGE).min(steps - 1);
        let index = u32::from(self.base) + offset;
        u8::try_from(index).unwrap_or(u8::MAX)
    }
}

impl Quantizer for GrayscaleRamp {
    fn quantize(&self, pixel: Rgba<u16>) -> CellColor {
        let [r, g, b] = premultiplied(pixel);
        let luminance = (u32::from(r) + u32::from(g) + u32::from(b)) / 3;
        CellColor::Indexed(self.index_for_luminance(luminance as u16))
    }
}

/// Resolved palette, fixed for the process lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Palette {
    Grayscale(GrayscaleRamp),
    /// The 6x6x6 color cube at indices 16..=231.
    ColorCube,
    TrueColor,
}

impl Quantizer for Palette {
    fn quantize(&self, pixel: Rgba<u16>) -> CellColor {
        match self {
            Palette::Grayscale(ramp) => ramp.quantize(pixel),
            Palette::ColorCube => {
                let [r, g, b] = premultiplied(pixel).map(|channel| cube_level(to_u8(channel)));
                CellColor::Indexed(CUBE_BASE + 36 * r + 6 * g + b)
            },
            Palette::TrueColor => CellColor::Rgb(premultiplied(pixel).map(to_u8)),
        }
    }
}

fn premultiplied(pixel: Rgba<u16>) -> [u16; 3] {
    let [r, g, b, a] = pixel.0;
    let alpha = u32::from(a);
    [r, g, b].map(|channel| (u32::from(channel) * alpha / u32::from(u16::MAX)) as u16)
}

fn to_u8(channel: u16) -> u8 {
    (channel >> 8) as u8
}

fn cube_level(value: u8) -> u8 {
    (u16::from(value) * 6 / 256) as u8
}
