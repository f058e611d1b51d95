//! Block Model - the canonical tagged union for page content.
//!
//! Every visual unit of a landing page is one `Block`: an opaque stable
//! `id` plus a typed payload. Array order is the authoritative display
//! order. Historical records may carry shapes we no longer recognize, so
//! the model keeps an explicit `Unknown` carrier instead of failing.

use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One content unit within a page.
///
/// Wire shape is `{ "id": "...", "type": "...", "data": { ... } }`.
/// Deserialization is total: a payload that does not match any known
/// variant lands in [`BlockBody::Unknown`] with its raw data preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBlock", into = "RawBlock")]
pub struct Block {
    pub id: String,
    pub body: BlockBody,
}

/// Known payload, or a best-effort passthrough for legacy types.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockBody {
    Known(BlockData),
    Unknown { kind: String, data: Value },
}

impl Block {
    pub fn known(id: impl Into<String>, data: BlockData) -> Self {
        Block {
            id: id.into(),
            body: BlockBody::Known(data),
        }
    }

    /// The `type` discriminant as stored on the wire.
    pub fn kind(&self) -> &str {
        match &self.body {
            BlockBody::Known(data) => data.kind(),
            BlockBody::Unknown { kind, .. } => kind,
        }
    }
}

/// The discriminated payload union, keyed by `type` with the fields
/// nested under `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum BlockData {
    Header(HeaderData),
    TextCard(TextCardData),
    Image(ImageData),
    Youtube(YoutubeData),
    Links(LinksData),
    Kindle(KindleData),
    LeadForm(LeadFormData),
    LineCard(LineCardData),
    Faq(FaqData),
    Pricing(PricingData),
    Testimonial(TestimonialData),
}

impl BlockData {
    pub fn kind(&self) -> &'static str {
        match self {
            BlockData::Header(_) => "header",
            BlockData::TextCard(_) => "text_card",
            BlockData::Image(_) => "image",
            BlockData::Youtube(_) => "youtube",
            BlockData::Links(_) => "links",
            BlockData::Kindle(_) => "kindle",
            BlockData::LeadForm(_) => "lead_form",
            BlockData::LineCard(_) => "line_card",
            BlockData::Faq(_) => "faq",
            BlockData::Pricing(_) => "pricing",
            BlockData::Testimonial(_) => "testimonial",
        }
    }
}

/// Profile header: avatar, display name, one-line title.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderData {
    pub avatar: String,
    pub name: String,
    pub title: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
}

/// Free text card. `text` may contain literal newlines, rendered as
/// line breaks by the exporter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextCardData {
    pub title: String,
    pub text: String,
    pub align: TextAlign,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageData {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct YoutubeData {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinksData {
    pub links: Vec<LinkItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinkItem {
    pub label: String,
    pub url: String,
    pub style: String,
}

/// Kindle book promotion card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KindleData {
    pub asin: String,
    pub image_url: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LeadFormData {
    pub title: String,
    pub button_text: String,
}

/// LINE official-account invitation card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineCardData {
    pub title: String,
    pub description: String,
    pub url: String,
    pub button_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FaqData {
    pub items: Vec<FaqItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FaqItem {
    pub id: String,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PricingData {
    pub plans: Vec<PricingPlan>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PricingPlan {
    pub id: String,
    pub title: String,
    pub price: String,
    pub features: Vec<String>,
    pub is_recommended: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestimonialData {
    pub items: Vec<TestimonialItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestimonialItem {
    pub id: String,
    pub name: String,
    pub role: String,
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Per-page settings stored alongside the block list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageSettings {
    pub theme: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gtag_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_pixel_id: Option<String>,
}

/// The slice of a stored page record the exporter needs: public slug,
/// migrated block list, settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageRecord {
    pub slug: String,
    pub content: Vec<Block>,
    pub settings: PageSettings,
}

/// Generate a collision-resistant block id: millisecond timestamp plus
/// a random alphanumeric suffix. Ids carry no ordering guarantee; the
/// enclosing array is the display order.
pub fn generate_block_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();
    format!("blk-{}-{}", millis, suffix)
}

/// Intermediate wire shape. Keeps deserialization total: any object
/// becomes a `Block`, falling back to `Unknown` when the typed parse
/// fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawBlock {
    #[serde(default)]
    id: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    kind: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    data: Value,
}

impl From<RawBlock> for Block {
    fn from(raw: RawBlock) -> Self {
        let tagged = serde_json::json!({ "type": raw.kind, "data": raw.data });
        match serde_json::from_value::<BlockData>(tagged) {
            Ok(data) => Block {
                id: raw.id,
                body: BlockBody::Known(data),
            },
            Err(_) => Block {
                id: raw.id,
                body: BlockBody::Unknown {
                    kind: raw.kind,
                    data: raw.data,
                },
            },
        }
    }
}

impl From<Block> for RawBlock {
    fn from(block: Block) -> Self {
        match block.body {
            BlockBody::Known(data) => {
                let tagged = serde_json::to_value(&data).unwrap_or(Value::Null);
                RawBlock {
                    id: block.id,
                    kind: tagged
                        .get("type")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    data: tagged.get("data").cloned().unwrap_or(Value::Null),
                }
            }
            BlockBody::Unknown { kind, data } => RawBlock {
                id: block.id,
                kind,
                data,
            },
        }
    }
}
