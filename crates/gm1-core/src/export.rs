use crate::container::Gm1Header;
use crate::model::{ImageList, ListData};
use serde_json::{Value, json};

/// Serialize an image list as `{ type, images, objects?, tiles?, animation? }`.
/// Image and part coordinates are atlas coordinates once the list was packed.
pub fn to_json(list: &ImageList) -> Value {
    let images: Vec<Value> = list
        .images
        .iter()
        .enumerate()
        .map(|(id, img)| {
            json!({"id": id, "x": img.x, "y": img.y, "width": img.width(), "height": img.height()})
        })
        .collect();
    let mut out = json!({ "type": list.type_tag(), "images": images });

    match &list.data {
        ListData::Plain => {}
        ListData::Tiles { objects, .. } => {
            let mut start = 0usize;
            let mut objects_val = Vec::with_capacity(objects.len());
            let mut tiles_val = Vec::new();
            for o in objects {
                objects_val.push(json!({"id": o.id, "tile_start": start, "part_count": o.parts.len()}));
                start += o.parts.len();
                for p in &o.parts {
                    tiles_val.push(json!({
                        "object": o.id,
                        "id": p.id,
                        "x": p.xtile,
                        "y": p.ytile,
                        "rect": {"x": p.rect.x, "y": p.rect.y, "width": p.rect.w, "height": p.rect.h},
                    }));
                }
            }
            out["objects"] = Value::Array(objects_val);
            out["tiles"] = Value::Array(tiles_val);
        }
        ListData::Animation { frames } => {
            out["animation"] = frames
                .iter()
                .map(|f| json!({"id": f.id, "center": {"x": f.center.x, "y": f.center.y}}))
                .collect();
        }
    }
    out
}

/// Render the line-based `.data` tables read by the game engine.
pub fn to_data_text(list: &ImageList) -> String {
    let mut s = String::new();
    s.push_str(&format!("!{}\n", list.type_tag()));
    s.push_str(&format!("[images,{},4,i,i,i,i]\n", list.images.len()));
    s.push_str("#posx,posy,width,height\n");
    for img in &list.images {
        s.push_str(&format!(
            "{},{},{},{}\n",
            img.x,
            img.y,
            img.width(),
            img.height()
        ));
    }
    match &list.data {
        ListData::Plain => {}
        ListData::Tiles { objects, .. } => {
            s.push_str(&format!("[objects,{},2,i,i]\n", objects.len()));
            s.push_str("#tile_start,tiles\n");
            let mut start = 0usize;
            for o in objects {
                s.push_str(&format!("{},{}\n", start, o.parts.len()));
                start += o.parts.len();
            }
            s.push_str(&format!("[tiles,{},6,i,i,i,i,i,i]\n", start));
            s.push_str("#x,y,posx,posy,width,height\n");
            for p in objects.iter().flat_map(|o| &o.parts) {
                s.push_str(&format!(
                    "{},{},{},{},{},{}\n",
                    p.xtile, p.ytile, p.rect.x, p.rect.y, p.rect.w, p.rect.h
                ));
            }
        }
        ListData::Animation { frames } => {
            s.push_str(&format!("[animation,{},2,i,i]\n", frames.len()));
            for f in frames {
                s.push_str(&format!("{},{}\n", f.center.x, f.center.y));
            }
        }
    }
    s
}

/// Every header field under its own name, values untouched.
pub fn header_to_json(header: &Gm1Header) -> Value {
    json!(header)
}
