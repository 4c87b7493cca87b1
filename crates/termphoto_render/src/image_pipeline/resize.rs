use crate::surface::SurfaceDimensions;

/// Terminal cells are roughly twice as tall as they are wide.
pub const DEFAULT_CELL_ASPECT: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetGeometry {
    pub columns: u16,
    pub rows: u16,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum LayoutPolicy {
    #[default]
    /// Fill the whole surface, ignoring the photo's aspect ratio.
    Stretch,
    /// Keep the photo's aspect ratio inside the surface. `cell_aspect` is the
    /// height of one cell divided by its width.
    Fit { cell_aspect: f32 },
}

impl LayoutPolicy {
    pub fn derive(
        &self,
        source_width: u32,
        source_height: u32,
        surface: SurfaceDimensions,
    ) -> Option<TargetGeometry> {
        if source_width == 0 || source_height == 0 || !surface.is_renderable() {
            return None;
        }

        match *self {
            LayoutPolicy::Stretch => {
                Some(TargetGeometry { columns: surface.width, rows: surface.height })
            },
            LayoutPolicy::Fit { cell_aspect } => {
                let cell_aspect = if cell_aspect.is_finite() {
                    cell_aspect.max(0.1)
                } else {
                    DEFAULT_CELL_ASPECT
                };
                let image_ratio = source_height as f32 / source_width as f32;

                let columns = surface.width;
                let rows = (image_ratio * columns as f32 / cell_aspect).round().max(1.0);
                if rows <= surface.height as f32 {
                    return Some(TargetGeometry { columns, rows: rows as u16 });
                }

                let rows = surface.height;
                let derived_columns = ((rows as f32) * cell_aspect / image_ratio).round() as u16;
                Some(TargetGeometry { columns: derived_columns.clamp(1, surface.width), rows })
            },
        }
    }
}
