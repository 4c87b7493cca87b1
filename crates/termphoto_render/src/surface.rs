//! Size of the area frames are drawn into, in character cells.

use std::io::{self, IsTerminal};

use log::{debug, warn};

use crate::RenderError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurfaceDimensions {
    pub width: u16,
    pub height: u16,
}

impl SurfaceDimensions {
    /// Nothing can be drawn; returned when the size is unknown.
    pub const EMPTY: Self = Self { width: 0, height: 0 };

    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Build from signed values, rejecting negatives. Values above `u16::MAX`
    /// are clamped.
    pub fn from_signed(width: i64, height: i64) -> Result<Self, RenderError> {
        if width < 0 || height < 0 {
            return Err(RenderError::InvalidDimension { width, height });
        }

        let clamp = |value: i64| u16::try_from(value).unwrap_or(u16::MAX);
        Ok(Self::new(clamp(width), clamp(height)))
    }

    pub fn is_renderable(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Reports the current drawable size. Consulted before every frame.
pub trait SurfaceQuery {
    fn dimensions(&self) -> SurfaceDimensions;
}

impl<S: SurfaceQuery + ?Sized> SurfaceQuery for &S {
    fn dimensions(&self) -> SurfaceDimensions {
        (**self).dimensions()
    }
}

impl<S: SurfaceQuery + ?Sized> SurfaceQuery for Box<S> {
    fn dimensions(&self) -> SurfaceDimensions {
        (**self).dimensions()
    }
}

/// A surface that never changes size.
#[derive(Clone, Copy, Debug)]
pub struct FixedSurface(pub SurfaceDimensions);

impl SurfaceQuery for FixedSurface {
    fn dimensions(&self) -> SurfaceDimensions {
        self.0
    }
}

/// The live terminal on stdout.
#[derive(Clone, Copy, Debug)]
pub struct TerminalSurface {
    /// Rows kept free at the bottom so the last row break does not scroll.
    reserve_rows: u16,
}

impl TerminalSurface {
    pub fn new(reserve_rows: u16) -> Self {
        Self { reserve_rows }
    }
}

impl SurfaceQuery for TerminalSurface {
    fn dimensions(&self) -> SurfaceDimensions {
        if !io::stdout().is_terminal() {
            debug!("stdout is not a terminal, nothing to draw into");
            return SurfaceDimensions::EMPTY;
        }

        match crossterm::terminal::size() {
            Ok((columns, rows)) => {
                SurfaceDimensions::new(columns, rows.saturating_sub(self.reserve_rows))
            },
            Err(err) => {
                warn!("failed to query terminal size: {err}");
                SurfaceDimensions::EMPTY
            },
        }
    }
}
