use crate::model::{Item, Rect};
use image::{DynamicImage, RgbaImage};

fn column_opaque(rgba: &RgbaImage, x: u32, rows: std::ops::Range<u32>, threshold: u8) -> bool {
    rows.into_iter().any(|y| rgba.get_pixel(x, y)[3] > threshold)
}

fn row_opaque(rgba: &RgbaImage, y: u32, cols: std::ops::Range<u32>, threshold: u8) -> bool {
    cols.into_iter().any(|x| rgba.get_pixel(x, y)[3] > threshold)
}

/// Bounding box of the pixels whose alpha is above `threshold`, in image coordinates.
///
/// Returns `None` when no pixel passes (fully transparent or zero-sized image).
pub fn alpha_bounds(rgba: &RgbaImage, threshold: u8) -> Option<Rect> {
    let (w, h) = rgba.dimensions();
    let left = (0..w).find(|&x| column_opaque(rgba, x, 0..h, threshold))?;
    // a column passed, so every scan below terminates inside the image
    let right = (left..w)
        .rev()
        .find(|&x| column_opaque(rgba, x, 0..h, threshold))
        .unwrap_or(left);
    let cols = left..right + 1;
    let top = (0..h)
        .find(|&y| row_opaque(rgba, y, cols.clone(), threshold))
        .unwrap_or(0);
    let bottom = (top..h)
        .rev()
        .find(|&y| row_opaque(rgba, y, cols.clone(), threshold))
        .unwrap_or(top);
    Some(Rect::new(left, top, right - left + 1, bottom - top + 1))
}

/// Size of `img` after cropping to its alpha bounding box.
///
/// A fully transparent image keeps its full dimensions.
pub fn trimmed_size(img: &DynamicImage, threshold: u8) -> (u32, u32) {
    let rgba = img.to_rgba8();
    match alpha_bounds(&rgba, threshold) {
        Some(r) => (r.w, r.h),
        None => rgba.dimensions(),
    }
}

/// Builds an [`Item`] measured by the trimmed size of `img`.
pub fn trimmed_item<K>(key: K, img: &DynamicImage, threshold: u8) -> Item<K> {
    let (w, h) = trimmed_size(img, threshold);
    Item::new(key, w as f64, h as f64)
}
