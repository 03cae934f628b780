//! Core library for laying out images onto fixed-size pages.
//!
//! - Packer: guillotine free-rectangle splitting with best-area-fit choice and
//!   merging of edge-sharing free rectangles
//! - Sequencer: `pack_items` sorts items, overflows onto new pages, and scales
//!   down items larger than a page
//! - Output is a serde-serializable `Plan`: pages of placements plus a per-item report.
//! - Trim (feature `image`, on by default): measure an image by its alpha bounding box.
//!
//! Quick example:
//! ```
//! use page_packer_core::{Item, Outcome, pack};
//! let items = vec![Item::new("a", 100.0, 100.0), Item::new("b", 1000.0, 1000.0)];
//! let plan = pack(items, 200, 300, 10)?;
//! assert_eq!(plan.pages.len(), 2);
//! assert!(matches!(plan.report[1].outcome, Outcome::Scaled { .. }));
//! # Ok::<(), page_packer_core::PackError>(())
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod packer;
pub mod pipeline;
#[cfg(feature = "image")]
pub mod trim;

pub use config::*;
pub use error::*;
pub use export::*;
pub use model::*;
pub use packer::*;
pub use pipeline::*;
#[cfg(feature = "image")]
pub use trim::*;

/// Convenience prelude for common types and functions.
/// Importing `page_packer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{
        FreeRectChoice, PackerConfig, PackerConfigBuilder, PageSize, SortOrder,
    };
    pub use crate::export::YAxis;
    pub use crate::model::{
        DropReason, Item, ItemReport, Meta, Outcome, Page, Placement, Plan, PlanStats, Rect,
    };
    pub use crate::packer::{Packer, guillotine::GuillotinePacker};
    pub use crate::{pack, pack_items, pack_layout, to_json_hash, to_json_pages};
}
