pub mod guillotine;

/// A packer places rectangles onto a single page.
///
/// Implementations must ensure no overlaps and keep the configured margin
/// between items and from the page border.
/// `place` returns `None` if the rectangle cannot be placed on the current page.
pub trait Packer {
    fn can_place(&self, w: u32, h: u32) -> bool;
    fn place(&mut self, w: u32, h: u32) -> Option<(u32, u32)>;
}
