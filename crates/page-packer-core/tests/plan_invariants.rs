use std::collections::HashSet;

use page_packer_core::prelude::*;
use rand::{Rng, SeedableRng};

const PAGE_W: u32 = 595;
const PAGE_H: u32 = 841;
const MARGIN: u32 = 20;

fn random_items(seed: u64, count: usize) -> Vec<Item<String>> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            // roughly one in ten items is larger than the page
            let (w, h) = if rng.gen_bool(0.1) {
                (rng.gen_range(600.0..2000.0), rng.gen_range(10.0..2000.0))
            } else {
                (rng.gen_range(10.0..400.0), rng.gen_range(10.0..400.0))
            };
            Item::new(format!("item{i}"), w, h)
        })
        .collect()
}

fn cfg() -> PackerConfig {
    PackerConfig::builder()
        .with_page_dimensions(PAGE_W, PAGE_H)
        .margin(MARGIN)
        .build()
}

#[test]
fn placements_never_overlap_including_margin() {
    let plan = pack_items(random_items(42, 150), &cfg()).expect("pack");
    for page in &plan.pages {
        let ps = &page.placements;
        for i in 0..ps.len() {
            for j in (i + 1)..ps.len() {
                let a = ps[i].frame.footprint(MARGIN);
                let b = ps[j].frame.footprint(MARGIN);
                assert!(
                    !a.intersects(&b),
                    "page {}: {:?} overlaps {:?}",
                    page.number,
                    ps[i].frame,
                    ps[j].frame
                );
            }
        }
    }
}

#[test]
fn placements_stay_inside_margins() {
    let plan = pack_items(random_items(7, 150), &cfg()).expect("pack");
    for page in &plan.pages {
        for p in &page.placements {
            assert!(p.frame.x >= MARGIN && p.frame.y >= MARGIN, "{:?}", p.frame);
            assert!(p.frame.x2() <= PAGE_W - MARGIN, "{:?}", p.frame);
            assert!(p.frame.y2() <= PAGE_H - MARGIN, "{:?}", p.frame);
        }
    }
}

#[test]
fn every_item_is_placed_once_or_reported() {
    let items = random_items(99, 200);
    let n = items.len();
    let plan = pack_items(items, &cfg()).expect("pack");

    let mut seen = HashSet::new();
    for page in &plan.pages {
        assert!(!page.placements.is_empty());
        for p in &page.placements {
            assert!(seen.insert(p.key.clone()), "{} placed twice", p.key);
        }
    }
    assert_eq!(plan.report.len(), n);
    assert!(plan.is_complete());
    assert_eq!(seen.len(), n);

    for r in &plan.report {
        let page = match r.outcome {
            Outcome::Placed { page } | Outcome::Scaled { page, .. } => page,
            Outcome::Dropped { .. } => unreachable!(),
        };
        assert!(
            plan.pages[page - 1].placements.iter().any(|p| p.key == r.key),
            "{} not on page {}",
            r.key,
            page
        );
    }
}

#[test]
fn repeated_runs_are_identical() {
    let a = pack_items(random_items(5, 120), &cfg()).expect("pack");
    let b = pack_items(random_items(5, 120), &cfg()).expect("pack");
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).expect("json"),
        serde_json::to_string(&b).expect("json")
    );
}

#[test]
fn scaled_items_keep_aspect_ratio() {
    let items = random_items(11, 150);
    let natural: Vec<(f64, f64)> = items.iter().map(|it| (it.width, it.height)).collect();
    let plan = pack_items(items, &cfg()).expect("pack");

    let mut scaled = 0;
    for r in &plan.report {
        let Outcome::Scaled { page, scale } = r.outcome else {
            continue;
        };
        scaled += 1;
        assert!(scale < 1.0);
        let p = plan.pages[page - 1]
            .placements
            .iter()
            .find(|p| p.key == r.key)
            .expect("scaled placement");
        let (w, h) = natural[r.index];
        assert!((p.width / p.height - w / h).abs() < 1e-9);
        assert!(p.frame.w as f64 <= p.width && p.width < p.frame.w as f64 + 2.0);
    }
    assert!(scaled > 0);
}

#[test]
fn free_space_stays_consistent_after_each_placement() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(3);
    for choice in [
        FreeRectChoice::BestAreaFit,
        FreeRectChoice::BestShortSideFit,
        FreeRectChoice::BestLongSideFit,
    ] {
        let mut packer = GuillotinePacker::new(PAGE_W, PAGE_H, MARGIN, choice);
        let interior = Rect::new(MARGIN, MARGIN, PAGE_W - 2 * MARGIN, PAGE_H - 2 * MARGIN);
        let mut placed: Vec<Rect> = Vec::new();
        for _ in 0..200 {
            let w = rng.gen_range(5..=150);
            let h = rng.gen_range(5..=150);
            let Some((x, y)) = packer.place(w, h) else {
                continue;
            };
            let r = Rect::new(x, y, w, h);
            for prev in &placed {
                assert!(!prev.footprint(MARGIN).intersects(&r.footprint(MARGIN)));
            }
            placed.push(r);

            let free = packer.free_rects();
            for (i, fr) in free.iter().enumerate() {
                assert!(!fr.is_empty());
                assert!(interior.contains(fr), "{fr:?} outside interior");
                for p in &placed {
                    assert!(!fr.intersects(&p.footprint(MARGIN)), "{fr:?} overlaps {p:?}");
                }
                for other in &free[i + 1..] {
                    assert_eq!(fr.merge(other), None, "{fr:?} and {other:?} still mergeable");
                }
            }
        }
        assert_eq!(packer.placed(), placed.as_slice());
    }
}
