//! Content Migration - upgrades historically persisted block arrays to
//! the current Block Model.
//!
//! The schema has evolved several times and old records must keep
//! rendering, so this is a pure, total function over arbitrary JSON:
//! it never fails and never mutates its input.

use serde_json::{Map, Value};

use super::blocks::{generate_block_id, Block, BlockBody};

/// Upgrade a raw persisted content array to the current Block Model.
///
/// Rules, in order:
/// - non-array input yields an empty list;
/// - an element with a non-empty `id` passes through verbatim (the id
///   is the marker that the element was written by a current editor,
///   so the rest of its shape is neither re-validated nor re-shaped;
///   typed parsing happens at render time);
/// - everything else gets a fresh id and the known legacy shapes are
///   rewritten (`header` field renames, `glass_card_text` -> `text_card`,
///   `link_list` -> `links`);
/// - unrecognized legacy types are passed through with only an id
///   attached, best effort.
pub fn migrate_old_content(raw: &Value) -> Vec<Block> {
    let Some(items) = raw.as_array() else {
        return Vec::new();
    };
    items.iter().map(migrate_block).collect()
}

fn migrate_block(item: &Value) -> Block {
    let has_id = item
        .get("id")
        .and_then(Value::as_str)
        .map(|s| !s.is_empty())
        .unwrap_or(false);
    if has_id {
        return passthrough_block(item);
    }

    let mut upgraded = item.clone();
    let Some(obj) = upgraded.as_object_mut() else {
        // Scalar garbage in the array; keep it renderable as nothing.
        return Block {
            id: generate_block_id(),
            body: BlockBody::Unknown {
                kind: String::new(),
                data: item.clone(),
            },
        };
    };
    obj.insert("id".to_string(), Value::String(generate_block_id()));

    let kind = obj
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    match kind.as_str() {
        "header" => {
            if let Some(data) = obj.get_mut("data").and_then(Value::as_object_mut) {
                rename_field(data, "avatarUrl", "avatar");
                rename_field(data, "tagline", "title");
            }
        }
        "glass_card_text" => {
            obj.insert("type".to_string(), Value::String("text_card".to_string()));
            if let Some(data) = obj.get_mut("data").and_then(Value::as_object_mut) {
                rename_field(data, "alignment", "align");
            }
        }
        "link_list" => {
            obj.insert("type".to_string(), Value::String("links".to_string()));
        }
        _ => {}
    }

    parse_block(upgraded)
}

/// Carry an id-bearing element without touching its payload. Fields
/// the typed model does not know about must survive the round trip, so
/// the raw `data` rides in the `Unknown` carrier; the exporter
/// typed-parses it when it renders.
fn passthrough_block(item: &Value) -> Block {
    Block {
        id: item
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        body: BlockBody::Unknown {
            kind: item
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            data: item.get("data").cloned().unwrap_or(Value::Null),
        },
    }
}

/// Renames `from` to `to` unless the target key already exists.
fn rename_field(data: &mut Map<String, Value>, from: &str, to: &str) {
    if data.contains_key(to) {
        data.remove(from);
        return;
    }
    if let Some(value) = data.remove(from) {
        data.insert(to.to_string(), value);
    }
}

/// Totality backstop: `Block` deserialization already falls back to the
/// `Unknown` carrier, but non-object elements would still fail, so those
/// degrade to an empty unknown block with a fresh id.
fn parse_block(value: Value) -> Block {
    serde_json::from_value(value).unwrap_or_else(|_| Block {
        id: generate_block_id(),
        body: BlockBody::Unknown {
            kind: String::new(),
            data: Value::Null,
        },
    })
}
