use super::Packer;
use crate::config::{FreeRectChoice, PackerConfig};
use crate::model::Rect;

/// Single-page packer over a list of free rectangles.
///
/// Each placement takes the top-left corner of the chosen free rect, cuts the
/// leftover L-shape into a right and a bottom remainder, then merges free
/// rects that share a full edge.
#[derive(Debug, Clone)]
pub struct GuillotinePacker {
    interior: Rect,
    margin: u32,
    free: Vec<Rect>,
    used: Vec<Rect>,
    choice: FreeRectChoice,
}

impl GuillotinePacker {
    /// A page of `width x height` whose only free rect is the area inside `margin`.
    /// If either side is not larger than `2 * margin` the free list starts empty.
    pub fn new(width: u32, height: u32, margin: u32, choice: FreeRectChoice) -> Self {
        let w = width.saturating_sub(margin.saturating_mul(2));
        let h = height.saturating_sub(margin.saturating_mul(2));
        let interior = Rect::new(margin, margin, w, h);
        let free = if interior.is_empty() {
            Vec::new()
        } else {
            vec![interior]
        };
        Self {
            interior,
            margin,
            free,
            used: Vec::new(),
            choice,
        }
    }

    pub fn from_config(cfg: &PackerConfig) -> Self {
        Self::new(cfg.page_width, cfg.page_height, cfg.margin, cfg.choice)
    }

    pub fn free_rects(&self) -> &[Rect] {
        &self.free
    }

    /// Placed rects in placement order, margin excluded.
    pub fn placed(&self) -> &[Rect] {
        &self.used
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    /// True when no item could ever be placed (page smaller than its margins).
    pub fn is_degenerate(&self) -> bool {
        self.interior.is_empty()
    }

    pub fn used_area(&self) -> u64 {
        self.used.iter().map(Rect::area).sum()
    }

    fn score(&self, fr: &Rect, w: u32, h: u32) -> u64 {
        let leftover_w = fr.w.saturating_sub(w.saturating_add(self.margin)) as u64;
        let leftover_h = fr.h.saturating_sub(h.saturating_add(self.margin)) as u64;
        match self.choice {
            FreeRectChoice::BestAreaFit => leftover_w * leftover_h,
            FreeRectChoice::BestShortSideFit => leftover_w.min(leftover_h),
            FreeRectChoice::BestLongSideFit => leftover_w.max(leftover_h),
        }
    }

    fn choose(&self, w: u32, h: u32) -> Option<usize> {
        let mut best_idx = None;
        let mut best_score = u64::MAX;
        for (i, fr) in self.free.iter().enumerate() {
            if !fr.fits(w, h, self.margin, &self.interior) {
                continue;
            }
            let s = self.score(fr, w, h);
            // strict: the first candidate wins ties
            if best_idx.is_none() || s < best_score {
                best_score = s;
                best_idx = Some(i);
            }
        }
        best_idx
    }

    fn split(&mut self, idx: usize, w: u32, h: u32) -> Rect {
        let fr = self.free.swap_remove(idx);
        let placed = Rect::new(fr.x, fr.y, w, h);

        // The trailing margin is clipped where it was waived at the interior edge.
        let step_w = w.saturating_add(self.margin).min(fr.w);
        let step_h = h.saturating_add(self.margin).min(fr.h);
        let remaining_w = fr.w - step_w;
        let remaining_h = fr.h - step_h;

        if remaining_w > 0 {
            self.free.push(Rect::new(fr.x + step_w, fr.y, remaining_w, step_h));
        }
        if remaining_h > 0 {
            self.free.push(Rect::new(fr.x, fr.y + step_h, fr.w, remaining_h));
        }
        placed
    }

    /// Merges free rects sharing a full edge until a whole pass merges nothing.
    fn merge_free_list(&mut self) {
        let mut merged = true;
        while merged {
            merged = false;
            let mut i = 0;
            while i < self.free.len() {
                let mut j = i + 1;
                while j < self.free.len() {
                    if let Some(m) = self.free[i].merge(&self.free[j]) {
                        self.free[i] = m;
                        self.free.swap_remove(j);
                        merged = true;
                    } else {
                        j += 1;
                    }
                }
                i += 1;
            }
        }
    }
}

impl Packer for GuillotinePacker {
    fn can_place(&self, w: u32, h: u32) -> bool {
        self.choose(w, h).is_some()
    }

    fn place(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        let idx = self.choose(w, h)?;
        let placed = self.split(idx, w, h);
        self.merge_free_list();
        self.used.push(placed);
        Some((placed.x, placed.y))
    }
}
