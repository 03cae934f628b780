use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in page units. `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge (`x + w`).
    pub fn x2(&self) -> u32 {
        self.x.saturating_add(self.w)
    }
    /// Exclusive bottom edge (`y + h`).
    pub fn y2(&self) -> u32 {
        self.y.saturating_add(self.h)
    }
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
    /// True if the interiors of `self` and `other` overlap. Touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.x >= other.x2()
            || other.x >= self.x2()
            || self.y >= other.y2()
            || other.y >= self.y2())
    }
    /// Returns true if `r` is fully inside `self`.
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.x2() <= self.x2() && r.y2() <= self.y2()
    }
    /// Space reserved by a placed item: the rect grown by `margin` to the right and below.
    pub fn footprint(&self, margin: u32) -> Rect {
        Rect::new(
            self.x,
            self.y,
            self.w.saturating_add(margin),
            self.h.saturating_add(margin),
        )
    }

    /// Whether this free rect has room for a `w x h` item plus its trailing `margin`.
    ///
    /// The trailing margin is waived on a side where the free rect is flush with
    /// `interior`, since the page border already keeps that gap.
    pub fn fits(&self, w: u32, h: u32, margin: u32, interior: &Rect) -> bool {
        let need_w = if self.x2() == interior.x2() {
            w
        } else {
            w.saturating_add(margin)
        };
        let need_h = if self.y2() == interior.y2() {
            h
        } else {
            h.saturating_add(margin)
        };
        self.w >= need_w && self.h >= need_h
    }

    /// Merges two free rects that share a full edge.
    ///
    /// Returns `None` unless the rects have the same `x` and width and touch
    /// vertically, or the same `y` and height and touch horizontally.
    pub fn merge(&self, other: &Rect) -> Option<Rect> {
        if self.x == other.x && self.w == other.w {
            if self.y2() == other.y {
                return Some(Rect::new(self.x, self.y, self.w, self.h + other.h));
            }
            if other.y2() == self.y {
                return Some(Rect::new(self.x, other.y, self.w, self.h + other.h));
            }
        }
        if self.y == other.y && self.h == other.h {
            if self.x2() == other.x {
                return Some(Rect::new(self.x, self.y, self.w + other.w, self.h));
            }
            if other.x2() == self.x {
                return Some(Rect::new(other.x, self.y, self.w + other.w, self.h));
            }
        }
        None
    }
}

/// An item to lay out: user key plus natural (unscaled) size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item<K = String> {
    pub key: K,
    pub width: f64,
    pub height: f64,
}

impl<K> Item<K> {
    pub fn new(key: K, width: f64, height: f64) -> Self {
        Self { key, width, height }
    }

    /// Integer size used for packing decisions (truncated toward zero).
    ///
    /// Returns `None` for non-finite or non-positive sizes, for sizes that
    /// truncate to zero, and for sides that do not fit in a `u32`.
    pub fn packing_size(&self) -> Option<(u32, u32)> {
        let in_range = |v: f64| v.is_finite() && (1.0..=u32::MAX as f64).contains(&v);
        if !(in_range(self.width) && in_range(self.height)) {
            return None;
        }
        Some((self.width as u32, self.height as u32))
    }
}

/// A placed item within a page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Placement<K = String> {
    /// User-specified key (e.g., image path).
    pub key: K,
    /// Placed rectangle in page coordinates, integer packing size.
    pub frame: Rect,
    /// Render width (natural width times `scale`).
    pub width: f64,
    /// Render height (natural height times `scale`).
    pub height: f64,
    /// Scale applied to fit the page; `1.0` when placed at natural size.
    pub scale: f64,
}

impl<K> Placement<K> {
    pub fn position(&self) -> (f64, f64) {
        (self.frame.x as f64, self.frame.y as f64)
    }
    pub fn is_scaled(&self) -> bool {
        self.scale != 1.0
    }
    /// `y` of the bottom edge measured from the bottom of the page, for
    /// renderers whose origin is bottom-left.
    pub fn bottom_up_y(&self, page_height: u32) -> f64 {
        page_height as f64 - self.frame.y as f64 - self.height
    }
}

/// A single output page (logical record). `number` is 1-based.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<K = String> {
    pub number: usize,
    pub width: u32,
    pub height: u32,
    pub placements: Vec<Placement<K>>,
}

/// Why an item did not make it onto any page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Size is non-finite, non-positive, or truncates to zero.
    Degenerate,
    /// Scaling to the page collapsed one side to zero.
    ScaledToNothing,
    /// No free space on an empty page even after scaling.
    NoFit,
}

/// What happened to one input item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Placed { page: usize },
    Scaled { page: usize, scale: f64 },
    Dropped { reason: DropReason },
}

/// Per-item outcome; `index` is the item's position in the input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemReport<K = String> {
    pub index: usize,
    pub key: K,
    pub outcome: Outcome,
}

/// Plan-level metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Meta {
    /// Schema version of the JSON plan; current: "1".
    pub schema_version: String,
    pub app: String,
    pub version: String,
    pub page_size: (u32, u32),
    pub margin: u32,
}

/// Placement plan: pages in creation order plus a report for every input item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan<K = String> {
    pub pages: Vec<Page<K>>,
    pub report: Vec<ItemReport<K>>,
    pub meta: Meta,
}

/// Statistics about page usage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlanStats {
    pub num_pages: usize,
    /// Items placed, scaled ones included.
    pub num_placed: usize,
    pub num_scaled: usize,
    pub num_dropped: usize,
    /// Sum of full page areas.
    pub total_page_area: u64,
    /// Sum of placed frame areas.
    pub used_area: u64,
    /// used_area / total_page_area (0.0 to 1.0).
    pub occupancy: f64,
}

impl<K> Plan<K> {
    pub fn stats(&self) -> PlanStats {
        let mut num_placed = 0;
        let mut num_scaled = 0;
        let mut total_page_area = 0u64;
        let mut used_area = 0u64;
        for page in &self.pages {
            total_page_area += page.width as u64 * page.height as u64;
            for p in &page.placements {
                num_placed += 1;
                used_area += p.frame.area();
                if p.is_scaled() {
                    num_scaled += 1;
                }
            }
        }
        let occupancy = if total_page_area > 0 {
            used_area as f64 / total_page_area as f64
        } else {
            0.0
        };
        PlanStats {
            num_pages: self.pages.len(),
            num_placed,
            num_scaled,
            num_dropped: self.dropped().count(),
            total_page_area,
            used_area,
            occupancy,
        }
    }

    /// Reports of items that were not placed.
    pub fn dropped(&self) -> impl Iterator<Item = &ItemReport<K>> {
        self.report
            .iter()
            .filter(|r| matches!(r.outcome, Outcome::Dropped { .. }))
    }

    /// True if every input item was placed somewhere.
    pub fn is_complete(&self) -> bool {
        self.dropped().next().is_none()
    }
}

impl PlanStats {
    pub fn summary(&self) -> String {
        format!(
            "Pages: {}, Placed: {}, Scaled: {}, Dropped: {}, Occupancy: {:.2}%",
            self.num_pages,
            self.num_placed,
            self.num_scaled,
            self.num_dropped,
            self.occupancy * 100.0,
        )
    }

    pub fn wasted_area(&self) -> u64 {
        self.total_page_area.saturating_sub(self.used_area)
    }
}
