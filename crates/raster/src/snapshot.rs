//! PNG output of a [`Pixmap`].
//!
//! Feature-gated behind `png` (default on) so that embedders that only need
//! the in-memory surface do not pull in the `image` crate.

use particle_field_core::{EngineError, Srgb};
use std::path::Path;

use crate::pixel::Pixmap;

/// Writes the pixmap as a PNG.
///
/// With a `background`, the image is flattened onto it and fully opaque;
/// without one, transparency is kept. Returns `EngineError::InvalidDimensions`
/// for an empty pixmap, or `EngineError::Io` on encode/write failure.
pub fn write_png(pixmap: &Pixmap, background: Option<Srgb>, path: &Path) -> Result<(), EngineError> {
    let (w, h) = (pixmap.width(), pixmap.height());
    if w == 0 || h == 0 {
        return Err(EngineError::InvalidDimensions);
    }
    let rgba = match background {
        Some(bg) => pixmap.flatten(bg),
        None => pixmap.to_rgba8(),
    };
    let img = image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| EngineError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| EngineError::Io(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use particle_field_core::{DVec2, Rgba, Surface};

    #[test]
    fn write_png_round_trip_keeps_transparency() {
        let mut pm = Pixmap::new(16, 8);
        pm.fill_circle(DVec2::new(8.0, 4.0), 2.0, Rgba::new(16, 185, 129, 1.0));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("field.png");

        write_png(&pm, None, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!((img.width(), img.height()), (16, 8));
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_eq!(img.get_pixel(8, 4).0, [16, 185, 129, 255]);
    }

    #[test]
    fn write_png_with_background_is_opaque() {
        let pm = Pixmap::new(4, 4);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bg.png");

        write_png(&pm, Some(Srgb::from_rgb8(10, 10, 15)), &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert!(img.pixels().all(|p| p.0 == [10, 10, 15, 255]));
    }

    #[test]
    fn write_png_rejects_empty_pixmap() {
        let dir = tempfile::tempdir().unwrap();
        let result = write_png(&Pixmap::new(0, 4), None, &dir.path().join("empty.png"));
        assert!(matches!(result, Err(EngineError::InvalidDimensions)));
    }

    #[test]
    fn write_png_reports_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        let result = write_png(&Pixmap::new(2, 2), None, &path);
        assert!(matches!(result, Err(EngineError::Io(_))));
    }
}
