use crate::config::{PackerConfig, SortOrder};
use crate::error::Result;
use crate::model::{DropReason, Item, ItemReport, Meta, Outcome, Page, Placement, Plan, Rect};
use crate::packer::{Packer, guillotine::GuillotinePacker};
use tracing::{debug, instrument, warn};

/// An item ready for packing: integer packing size next to the float render size.
struct Prep<K> {
    index: usize,
    key: K,
    width: f64,
    height: f64,
    w: u32,
    h: u32,
}

#[instrument(skip_all)]
/// Lays out `items` onto as many `cfg.page_width x cfg.page_height` pages as needed.
///
/// Notes:
/// - Items are fed in `cfg.sort_order` (largest area first by default); sorting is stable.
/// - An item that does not fit the current page starts a new page. An item that
///   does not fit an empty page is scaled down to the usable area, keeping its
///   aspect ratio.
/// - Every input item gets an entry in `Plan::report`; items that could not be
///   placed are reported as `Outcome::Dropped` instead of failing the call.
/// - Only an invalid page/margin configuration is an error.
pub fn pack_items<K: Clone>(items: Vec<Item<K>>, cfg: &PackerConfig) -> Result<Plan<K>> {
    cfg.validate()?;

    let mut outcomes: Vec<Option<Outcome>> = vec![None; items.len()];
    let keys: Vec<K> = items.iter().map(|it| it.key.clone()).collect();

    let mut prepared: Vec<Prep<K>> = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match item.packing_size() {
            Some((w, h)) => prepared.push(Prep {
                index,
                key: item.key,
                width: item.width,
                height: item.height,
                w,
                h,
            }),
            None => {
                warn!(
                    index,
                    width = item.width,
                    height = item.height,
                    "dropping item with degenerate size"
                );
                outcomes[index] = Some(Outcome::Dropped {
                    reason: DropReason::Degenerate,
                });
            }
        }
    }
    sort_prepared(&mut prepared, cfg.sort_order);

    let mut packer = GuillotinePacker::from_config(cfg);
    let mut current: Vec<Placement<K>> = Vec::new();
    let mut pages: Vec<Page<K>> = Vec::new();

    for item in prepared {
        let mut placed = packer.place(item.w, item.h);
        if placed.is_none() && !packer.is_empty() {
            retire_page(&mut pages, &mut current, cfg);
            packer = GuillotinePacker::from_config(cfg);
            placed = packer.place(item.w, item.h);
        }
        let page = pages.len() + 1;
        let outcome = match placed {
            Some((x, y)) => {
                current.push(Placement {
                    key: item.key.clone(),
                    frame: Rect::new(x, y, item.w, item.h),
                    width: item.width,
                    height: item.height,
                    scale: 1.0,
                });
                Outcome::Placed { page }
            }
            None => place_scaled(&mut packer, &item, cfg, &mut current, page),
        };
        outcomes[item.index] = Some(outcome);
    }
    retire_page(&mut pages, &mut current, cfg);

    let report = keys
        .into_iter()
        .zip(outcomes)
        .enumerate()
        .map(|(index, (key, outcome))| ItemReport {
            index,
            key,
            outcome: outcome.unwrap_or(Outcome::Dropped {
                reason: DropReason::NoFit,
            }),
        })
        .collect();

    Ok(Plan {
        pages,
        report,
        meta: meta_for(cfg),
    })
}

/// Packs `items` with default sorting and free-rect choice.
pub fn pack<K: Clone>(
    items: Vec<Item<K>>,
    page_width: u32,
    page_height: u32,
    margin: u32,
) -> Result<Plan<K>> {
    let cfg = PackerConfig {
        page_width,
        page_height,
        margin,
        ..Default::default()
    };
    pack_items(items, &cfg)
}

/// Packs `(key, width, height)` tuples.
pub fn pack_layout<K: Into<String>>(
    inputs: Vec<(K, f64, f64)>,
    cfg: PackerConfig,
) -> Result<Plan<String>> {
    let items = inputs
        .into_iter()
        .map(|(k, w, h)| Item::new(k.into(), w, h))
        .collect();
    pack_items(items, &cfg)
}

/// Third attempt for an item that did not fit an empty page: shrink it to the
/// usable area and try once more.
fn place_scaled<K: Clone>(
    packer: &mut GuillotinePacker,
    item: &Prep<K>,
    cfg: &PackerConfig,
    current: &mut Vec<Placement<K>>,
    page: usize,
) -> Outcome {
    let (usable_w, usable_h) = cfg.usable_size();
    // natural size, so the render size `width * scale` stays inside the usable area
    let scale = (usable_w as f64 / item.width).min(usable_h as f64 / item.height);
    let scaled_w = (item.w as f64 * scale).floor() as u32;
    let scaled_h = (item.h as f64 * scale).floor() as u32;
    debug!(
        index = item.index,
        w = item.w,
        h = item.h,
        scale,
        scaled_w,
        scaled_h,
        "item larger than page, scaling down"
    );

    if scaled_w == 0 || scaled_h == 0 {
        warn!(index = item.index, scale, "dropping item scaled to nothing");
        return Outcome::Dropped {
            reason: DropReason::ScaledToNothing,
        };
    }

    match packer.place(scaled_w, scaled_h) {
        Some((x, y)) => {
            current.push(Placement {
                key: item.key.clone(),
                frame: Rect::new(x, y, scaled_w, scaled_h),
                width: item.width * scale,
                height: item.height * scale,
                scale,
            });
            Outcome::Scaled { page, scale }
        }
        None => {
            warn!(
                index = item.index,
                scaled_w,
                scaled_h,
                "dropping item that does not fit an empty page"
            );
            Outcome::Dropped {
                reason: DropReason::NoFit,
            }
        }
    }
}

/// Moves the page under construction to `pages` if it holds any placement.
fn retire_page<K>(
    pages: &mut Vec<Page<K>>,
    current: &mut Vec<Placement<K>>,
    cfg: &PackerConfig,
) {
    if current.is_empty() {
        return;
    }
    let number = pages.len() + 1;
    debug!(page = number, placements = current.len(), "page retired");
    pages.push(Page {
        number,
        width: cfg.page_width,
        height: cfg.page_height,
        placements: std::mem::take(current),
    });
}

fn sort_prepared<K>(prepared: &mut [Prep<K>], order: SortOrder) {
    // slice::sort_by is stable; ties keep input order
    match order {
        SortOrder::None => {}
        SortOrder::AreaDesc => {
            prepared.sort_by(|a, b| (b.w as u64 * b.h as u64).cmp(&(a.w as u64 * a.h as u64)))
        }
        SortOrder::MaxSideDesc => prepared.sort_by(|a, b| b.w.max(b.h).cmp(&a.w.max(a.h))),
        SortOrder::HeightDesc => prepared.sort_by(|a, b| b.h.cmp(&a.h)),
        SortOrder::WidthDesc => prepared.sort_by(|a, b| b.w.cmp(&a.w)),
    }
}

fn meta_for(cfg: &PackerConfig) -> Meta {
    Meta {
        schema_version: "1".into(),
        app: "page-packer".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        page_size: (cfg.page_width, cfg.page_height),
        margin: cfg.margin,
    }
}
