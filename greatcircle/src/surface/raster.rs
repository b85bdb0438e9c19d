//! Rasterizes the primitives of a [`MemorySurface`] with tiny-skia.
//!
//! The map is drawn in equirectangular projection at the surface's zoom: the
//! world is `256·2^zoom` pixels wide, the image is as wide as the viewport
//! and half as tall, centered on a chosen point. Polygons are filled with
//! the even-odd rule so the holes of pole-crossing shapes stay empty.

use std::path::Path;

use thiserror::Error;
use tiny_skia::{
    Color, FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform,
};

use super::{MemorySurface, Primitive, Viewport};
use crate::config::{PathStyle, Rgba};
use crate::coord::{km_to_degrees, meters_to_km, LatLng, MAX_LAT, MIN_LAT};

/// World width in pixels at zoom 0.
const TILE_SIZE_PX: f64 = 256.0;

/// Largest image edge we are willing to allocate.
const MAX_IMAGE_EDGE_PX: u32 = 8192;

const BACKGROUND: Rgba = Rgba::new(0xdd, 0xdd, 0xdd, 0xff);
const WORLD: Rgba = Rgba::new(0xff, 0xff, 0xff, 0xff);

/// Errors raised while rasterizing or saving an image.
#[derive(Debug, Error)]
pub enum RasterError {
    /// The requested image is empty or too large.
    #[error("Invalid image size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    Encode(String),

    /// Writing the image failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Maps lat/lng to pixel coordinates.
struct Projection {
    pixels_per_degree: f64,
    origin_x: f64,
    origin_y: f64,
}

impl Projection {
    fn new(zoom: u8, width: u32, height: u32, view_center: LatLng) -> Self {
        let world_px = TILE_SIZE_PX * 2f64.powi(zoom as i32);
        let pixels_per_degree = world_px / 360.0;
        Self {
            pixels_per_degree,
            origin_x: width as f64 / 2.0 - view_center.lng * pixels_per_degree,
            origin_y: height as f64 / 2.0 + view_center.lat * pixels_per_degree,
        }
    }

    fn x(&self, lng: f64) -> f32 {
        (self.origin_x + lng * self.pixels_per_degree) as f32
    }

    fn y(&self, lat: f64) -> f32 {
        (self.origin_y - lat * self.pixels_per_degree) as f32
    }
}

fn paint_for(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

/// Draw every live primitive of a surface.
///
/// # Arguments
///
/// * `surface` - Surface whose primitives are drawn
/// * `view_center` - Point placed at the middle of the image
pub fn rasterize(surface: &MemorySurface, view_center: LatLng) -> Result<Pixmap, RasterError> {
    let width = surface.viewport_width();
    let height = width / 2;
    if width > MAX_IMAGE_EDGE_PX {
        return Err(RasterError::InvalidSize { width, height });
    }
    let mut pixmap =
        Pixmap::new(width, height).ok_or(RasterError::InvalidSize { width, height })?;

    let projection = Projection::new(surface.zoom(), width, height, view_center);

    pixmap.fill(Color::from_rgba8(
        BACKGROUND.r,
        BACKGROUND.g,
        BACKGROUND.b,
        BACKGROUND.a,
    ));
    let top = projection.y(MAX_LAT);
    let bottom = projection.y(MIN_LAT);
    if let Some(world) = Rect::from_ltrb(0.0, top.max(0.0), width as f32, bottom.min(height as f32)) {
        pixmap.fill_rect(world, &paint_for(WORLD), Transform::identity(), None);
    }

    for (_, primitive) in surface.primitives() {
        let path = match primitive {
            Primitive::Circle {
                center, radius_m, ..
            } => {
                let radius_px =
                    km_to_degrees(meters_to_km(*radius_m)) * projection.pixels_per_degree;
                PathBuilder::from_circle(
                    projection.x(center.lng),
                    projection.y(center.lat),
                    radius_px as f32,
                )
            }
            Primitive::Polygon { shape, .. } => {
                let mut builder = PathBuilder::new();
                for ring in shape.rings() {
                    let mut points = ring.iter();
                    if let Some(first) = points.next() {
                        builder.move_to(projection.x(first.lng), projection.y(first.lat));
                        for p in points {
                            builder.line_to(projection.x(p.lng), projection.y(p.lat));
                        }
                        builder.close();
                    }
                }
                builder.finish()
            }
        };

        match path {
            Some(path) => draw_path(&mut pixmap, &path, primitive.style()),
            None => tracing::debug!("Skipping degenerate primitive"),
        }
    }

    Ok(pixmap)
}

fn draw_path(pixmap: &mut Pixmap, path: &tiny_skia::Path, style: &PathStyle) {
    if let Some(fill) = style.fill {
        pixmap.fill_path(
            path,
            &paint_for(fill),
            FillRule::EvenOdd,
            Transform::identity(),
            None,
        );
    }
    let stroke = Stroke {
        width: style.weight,
        ..Stroke::default()
    };
    pixmap.stroke_path(path, &paint_for(style.color), &stroke, Transform::identity(), None);
}

/// Rasterize a surface and write it as a PNG file.
pub fn save_png(
    surface: &MemorySurface,
    view_center: LatLng,
    path: impl AsRef<Path>,
) -> Result<(), RasterError> {
    let pixmap = rasterize(surface, view_center)?;
    let bytes = pixmap
        .encode_png()
        .map_err(|e| RasterError::Encode(e.to_string()))?;
    std::fs::write(path, bytes)?;
    Ok(())
}
