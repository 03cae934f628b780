use crate::model::{Page, Placement, Plan};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Direction of the exported `y` axis.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum YAxis {
    /// Origin at the top-left corner, `y` grows downward (packing coordinates).
    #[default]
    Down,
    /// Origin at the bottom-left corner, `y` grows upward (PDF-style).
    Up,
}

fn placement_value<K: ToString>(p: &Placement<K>, page: &Page<K>, y_axis: YAxis) -> Value {
    let (x, y) = p.position();
    let y = match y_axis {
        YAxis::Down => y,
        YAxis::Up => p.bottom_up_y(page.height),
    };
    json!({
        "key": p.key.to_string(),
        "x": x,
        "y": y,
        "width": p.width,
        "height": p.height,
        "frame": {"x": p.frame.x, "y": p.frame.y, "w": p.frame.w, "h": p.frame.h},
        "scale": p.scale,
    })
}

/// Serialize the plan as `{ pages, report, meta }` (array-of-pages style).
/// Placements keep their placement order within each page.
pub fn to_json_pages<K: ToString + Serialize>(plan: &Plan<K>, y_axis: YAxis) -> Value {
    let pages_val = plan
        .pages
        .iter()
        .map(|page| {
            let placements: Vec<Value> = page
                .placements
                .iter()
                .map(|p| placement_value(p, page, y_axis))
                .collect();
            json!({
                "number": page.number,
                "width": page.width,
                "height": page.height,
                "placements": placements,
            })
        })
        .collect::<Vec<_>>();
    json!({"pages": pages_val, "report": &plan.report, "meta": &plan.meta})
}

/// Flatten placements keyed by item key, with the page number on each entry.
/// Shape: `{ placements: { key: { x, y, width, height, frame, scale, page } }, dropped: [key], meta }`.
pub fn to_json_hash<K: ToString>(plan: &Plan<K>, y_axis: YAxis) -> Value {
    let mut placements = serde_json::Map::new();
    for page in &plan.pages {
        for p in &page.placements {
            let mut v = placement_value(p, page, y_axis);
            if let Some(obj) = v.as_object_mut() {
                obj.remove("key");
                obj.insert("page".into(), json!(page.number));
            }
            placements.insert(p.key.to_string(), v);
        }
    }
    let dropped: Vec<String> = plan.dropped().map(|r| r.key.to_string()).collect();
    json!({ "placements": placements, "dropped": dropped, "meta": &plan.meta })
}
