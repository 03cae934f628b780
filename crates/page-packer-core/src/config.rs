use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::PackError;

/// Common paper sizes in points (1/72 inch), truncated to whole points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    A3,
    A4,
    A5,
    Letter,
    Legal,
}

impl PageSize {
    /// Portrait `(width, height)` in points.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Self::A3 => (841, 1190),
            Self::A4 => (595, 841),
            Self::A5 => (419, 595),
            Self::Letter => (612, 792),
            Self::Legal => (612, 1008),
        }
    }
}

impl FromStr for PageSize {
    type Err = PackError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a3" => Ok(Self::A3),
            "a4" => Ok(Self::A4),
            "a5" => Ok(Self::A5),
            "letter" => Ok(Self::Letter),
            "legal" => Ok(Self::Legal),
            other => Err(PackError::InvalidConfig(format!("unknown page size: {other}"))),
        }
    }
}

/// Free-rectangle choice heuristics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FreeRectChoice {
    /// Least leftover area `(free.w - w - margin) * (free.h - h - margin)`.
    BestAreaFit,
    /// Smallest of the two leftover sides.
    BestShortSideFit,
    /// Smallest of the larger leftover side.
    BestLongSideFit,
}

impl FromStr for FreeRectChoice {
    type Err = PackError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "baf" | "bestareafit" => Ok(Self::BestAreaFit),
            "bssf" | "bestshortsidefit" => Ok(Self::BestShortSideFit),
            "blsf" | "bestlongsidefit" => Ok(Self::BestLongSideFit),
            other => Err(PackError::InvalidConfig(format!("unknown free-rect choice: {other}"))),
        }
    }
}

/// Orders in which items are fed to the packer. All sorts are stable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    AreaDesc,
    MaxSideDesc,
    HeightDesc,
    WidthDesc,
    None,
}

impl FromStr for SortOrder {
    type Err = PackError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "area_desc" => Ok(Self::AreaDesc),
            "max_side_desc" => Ok(Self::MaxSideDesc),
            "height_desc" => Ok(Self::HeightDesc),
            "width_desc" => Ok(Self::WidthDesc),
            "none" => Ok(Self::None),
            other => Err(PackError::InvalidConfig(format!("unknown sort order: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackerConfig {
    /// Page width in page units.
    pub page_width: u32,
    /// Page height in page units.
    pub page_height: u32,
    /// Gap kept between items and between items and the page edge.
    pub margin: u32,

    #[serde(default = "default_sort_order")]
    pub sort_order: SortOrder,
    #[serde(default = "default_choice")]
    pub choice: FreeRectChoice,
}

impl Default for PackerConfig {
    fn default() -> Self {
        let (page_width, page_height) = PageSize::A4.dimensions();
        Self {
            page_width,
            page_height,
            margin: 20,
            sort_order: default_sort_order(),
            choice: default_choice(),
        }
    }
}

impl PackerConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if:
    /// - A page side is zero
    /// - The margin on both sides would leave no usable space
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.page_width == 0 || self.page_height == 0 {
            return Err(PackError::InvalidDimensions {
                width: self.page_width,
                height: self.page_height,
            });
        }

        let total_margin = self.margin.saturating_mul(2);
        if total_margin >= self.page_width || total_margin >= self.page_height {
            return Err(PackError::MarginTooLarge {
                margin: self.margin,
                width: self.page_width,
                height: self.page_height,
            });
        }

        Ok(())
    }

    /// Usable `(width, height)` inside the page margins.
    pub fn usable_size(&self) -> (u32, u32) {
        let total_margin = self.margin.saturating_mul(2);
        (
            self.page_width.saturating_sub(total_margin),
            self.page_height.saturating_sub(total_margin),
        )
    }
}

fn default_sort_order() -> SortOrder {
    SortOrder::AreaDesc
}
fn default_choice() -> FreeRectChoice {
    FreeRectChoice::BestAreaFit
}

/// Builder for `PackerConfig`.
#[derive(Debug, Default, Clone)]
pub struct PackerConfigBuilder {
    cfg: PackerConfig,
}

impl PackerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PackerConfig::default(),
        }
    }
    pub fn with_page_dimensions(mut self, w: u32, h: u32) -> Self {
        self.cfg.page_width = w;
        self.cfg.page_height = h;
        self
    }
    pub fn page_size(mut self, size: PageSize) -> Self {
        let (w, h) = size.dimensions();
        self.cfg.page_width = w;
        self.cfg.page_height = h;
        self
    }
    pub fn margin(mut self, v: u32) -> Self {
        self.cfg.margin = v;
        self
    }
    pub fn sort_order(mut self, v: SortOrder) -> Self {
        self.cfg.sort_order = v;
        self
    }
    pub fn choice(mut self, v: FreeRectChoice) -> Self {
        self.cfg.choice = v;
        self
    }
    pub fn build(self) -> PackerConfig {
        self.cfg
    }
}

impl PackerConfig {
    /// Create a fluent builder for `PackerConfig`.
    pub fn builder() -> PackerConfigBuilder {
        PackerConfigBuilder::new()
    }
}
