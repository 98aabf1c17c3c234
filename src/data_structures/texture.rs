//! Environment (reflection) textures.
//!
//! The renderer samples an [`EnvironmentMap`] as a cube texture on every
//! reflective material. This crate only decodes and holds the six faces; the
//! upload to the GPU happens on the renderer's side.

use anyhow::*;
use image::{ImageFormat, RgbImage, load_from_memory_with_format};

/// Cube face order: +X, -X, +Y, -Y, +Z, -Z.
pub const FACE_COUNT: usize = 6;

/// Six square RGB faces of a cube reflection map.
#[derive(Clone, Debug)]
pub struct EnvironmentMap {
    pub faces: [RgbImage; FACE_COUNT],
}

impl EnvironmentMap {
    /// Decode one face from encoded image bytes, guessing the format when `format` is `None`.
    pub fn face_from_bytes(bytes: &[u8], label: &str, format: Option<&str>) -> Result<RgbImage> {
        let img = match format.and_then(ImageFormat::from_extension) {
            None => image::load_from_memory(bytes),
            Some(fmt) => load_from_memory_with_format(bytes, fmt),
        }
        .with_context(|| format!("decoding cube face {label}"))?;
        // Cube maps are sampled without alpha
        Ok(img.to_rgb8())
    }

    /// Build a cube map, checking that every face is square and the same size.
    pub fn from_faces(faces: [RgbImage; FACE_COUNT]) -> Result<Self> {
        let size = faces[0].width();
        for (idx, face) in faces.iter().enumerate() {
            ensure!(
                face.width() == size && face.height() == size,
                "cube face {} is {}x{}, expected {}x{}",
                idx,
                face.width(),
                face.height(),
                size,
                size
            );
        }
        ensure!(size > 0, "cube faces are empty");
        Ok(Self { faces })
    }

    /// Edge length of each face in pixels.
    pub fn size(&self) -> u32 {
        self.faces[0].width()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(size: u32) -> RgbImage {
        RgbImage::from_pixel(size, size, image::Rgb([10, 20, 30]))
    }

    #[test]
    fn accepts_six_equal_square_faces() {
        let map = EnvironmentMap::from_faces(std::array::from_fn(|_| face(4))).unwrap();
        assert_eq!(map.size(), 4);
    }

    #[test]
    fn rejects_mismatched_faces() {
        let mut faces: [RgbImage; FACE_COUNT] = std::array::from_fn(|_| face(4));
        faces[3] = face(2);
        assert!(EnvironmentMap::from_faces(faces).is_err());

        let mut faces: [RgbImage; FACE_COUNT] = std::array::from_fn(|_| face(4));
        faces[0] = RgbImage::new(4, 3);
        assert!(EnvironmentMap::from_faces(faces).is_err());
    }
}
