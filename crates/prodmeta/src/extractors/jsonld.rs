// ABOUTME: Reads schema.org Product and Offer nodes from application/ld+json script blocks.
// ABOUTME: Loosely typed JSON is decoded into untagged unions; unknown shapes are ignored per block.

//! Structured-data extraction.
//!
//! Sites embed schema.org markup in very different shapes: a single object,
//! an array of objects, or a `@graph` container. Inside a node, `image`,
//! `offers` and `price` each come in several forms. Each of those is modelled
//! as an untagged enum so that only the recognised shapes are read and anything
//! else decodes to "absent" instead of failing the whole block.

use scraper::Html;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::extractors::fields::all_elements;
use crate::metadata::{Candidate, Field, ProductMetadata};
use crate::price::parse_positive_price;

const LD_JSON_SELECTOR: &str = r#"script[type="application/ld+json"]"#;

const PRODUCT_TYPES: &[&str] = &["Product", "IndividualProduct"];
const OFFER_TYPES: &[&str] = &["Offer", "AggregateOffer"];

/// A JSON-LD price: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PriceValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl PriceValue {
    /// Strictly positive amount, or `None`.
    pub fn amount(&self) -> Option<f64> {
        let value = match self {
            PriceValue::Integer(n) => *n as f64,
            PriceValue::Float(f) => *f,
            PriceValue::Text(s) => parse_positive_price(s).ok()?,
        };
        (value.is_finite() && value > 0.0).then_some(value)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageObject {
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ImageEntry {
    Url(String),
    Object(ImageObject),
}

impl ImageEntry {
    fn url(&self) -> Option<&str> {
        match self {
            ImageEntry::Url(url) => Some(url),
            ImageEntry::Object(obj) => obj.url.as_deref(),
        }
    }
}

/// The `image` property: a URL, a list of URLs or image objects, or one image object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ImageValue {
    Url(String),
    List(Vec<ImageEntry>),
    Object(ImageObject),
}

impl ImageValue {
    /// The image URL, taking only the first entry of a list.
    pub fn url(&self) -> Option<&str> {
        match self {
            ImageValue::Url(url) => Some(url),
            ImageValue::List(entries) => entries.first().and_then(ImageEntry::url),
            ImageValue::Object(obj) => obj.url.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    #[serde(default, deserialize_with = "lenient")]
    pub price: Option<PriceValue>,
    #[serde(default, deserialize_with = "lenient")]
    pub low_price: Option<PriceValue>,
    #[serde(default, deserialize_with = "lenient")]
    pub price_currency: Option<String>,
}

/// The `offers` property: a single offer or a list of them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OffersValue {
    Many(Vec<Value>),
    One(Offer),
}

impl OffersValue {
    /// The offer to read: the object itself, or the first element of a list.
    pub fn first(&self) -> Option<Offer> {
        match self {
            OffersValue::One(offer) => Some(offer.clone()),
            OffersValue::Many(items) => items
                .first()
                .filter(|v| v.is_object())
                .and_then(|v| Offer::deserialize(v).ok()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductNode {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub image: Option<ImageValue>,
    #[serde(default, deserialize_with = "lenient")]
    pub offers: Option<OffersValue>,
}

/// Decodes a property when it has a recognised shape and yields `None` otherwise.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Apply every JSON-LD block in the document to `meta`.
///
/// Blocks that are not valid JSON, or whose top level is neither an object nor
/// an array, are skipped.
pub fn apply_json_ld(doc: &Html, meta: &mut ProductMetadata) {
    for script in all_elements(doc, LD_JSON_SELECTOR) {
        let raw: String = script.text().collect();
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }

        match serde_json::from_str::<Value>(raw) {
            Ok(node @ Value::Object(_)) => visit_node(&node, meta),
            Ok(Value::Array(items)) => {
                for item in items.iter().filter(|v| v.is_object()) {
                    visit_node(item, meta);
                }
            }
            Ok(_) => log::debug!("ignoring JSON-LD block that is neither object nor array"),
            Err(err) => log::debug!("ignoring undecodable JSON-LD block: {}", err),
        }
    }
}

fn visit_node(node: &Value, meta: &mut ProductMetadata) {
    if let Some(graph) = node.get("@graph") {
        if let Some(items) = graph.as_array() {
            for item in items.iter().filter(|v| v.is_object()) {
                visit_node(item, meta);
            }
        }
        return;
    }

    if has_type(node, PRODUCT_TYPES) {
        let product = ProductNode::deserialize(node).unwrap_or_default();
        apply_product(&product, meta);
    }
    if has_type(node, OFFER_TYPES) {
        let offer = Offer::deserialize(node).unwrap_or_default();
        apply_offer(&offer, meta);
    }
}

/// True when `@type` is one of `types`, directly or as a member of an array.
fn has_type(node: &Value, types: &[&str]) -> bool {
    match node.get("@type") {
        Some(Value::String(t)) => types.contains(&t.as_str()),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .any(|t| types.contains(&t)),
        _ => false,
    }
}

fn apply_product(product: &ProductNode, meta: &mut ProductMetadata) {
    if let Some(name) = &product.name {
        meta.fill(Field::Title, name.as_str());
    }
    if let Some(description) = &product.description {
        meta.fill(Field::Description, description.as_str());
    }
    if let Some(url) = product.image.as_ref().and_then(ImageValue::url) {
        meta.fill(Field::ImageUrl, url);
    }
    if !meta.has(Field::Price) {
        if let Some(offer) = product.offers.as_ref().and_then(OffersValue::first) {
            apply_offer(&offer, meta);
        }
    }
}

fn apply_offer(offer: &Offer, meta: &mut ProductMetadata) {
    if meta.has(Field::Price) {
        return;
    }

    let amount = offer
        .price
        .as_ref()
        .and_then(PriceValue::amount)
        .or_else(|| offer.low_price.as_ref().and_then(PriceValue::amount));
    if let Some(amount) = amount {
        meta.fill(Field::Price, Candidate::Amount(amount));
    }

    if let Some(currency) = &offer.price_currency {
        meta.fill(Field::Currency, currency.as_str());
    }
}
