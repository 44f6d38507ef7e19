// ABOUTME: ProductMetadata accumulator plus the Field/Candidate types every extraction strategy writes through.
// ABOUTME: Enforces first-match-wins per field and builds the caller-facing Preview record.

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;
use crate::price::parse_positive_price;
use crate::urls::{extract_asin, is_amazon_url, is_data_url};

/// Currency shown to callers when extraction failed outright.
pub const PREVIEW_FALLBACK_CURRENCY: &str = "MXN";

/// Structured description of a product page.
///
/// Every field is optional in practice: empty strings and `None` mean unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProductMetadata {
    pub title: String,
    pub description: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub currency: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub site_name: String,
}

/// The individually fillable fields of [`ProductMetadata`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Description,
    ImageUrl,
    Price,
    Currency,
    SiteName,
}

/// A value proposed by a strategy for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Candidate {
    /// Raw text; for [`Field::Price`] it goes through the locale price parser.
    Text(String),
    /// An already canonical price.
    Amount(f64),
}

impl From<String> for Candidate {
    fn from(s: String) -> Self {
        Candidate::Text(s)
    }
}

impl From<&str> for Candidate {
    fn from(s: &str) -> Self {
        Candidate::Text(s.to_string())
    }
}

impl ProductMetadata {
    /// Returns true once the field holds a usable value.
    pub fn has(&self, field: Field) -> bool {
        match field {
            Field::Title => !self.title.is_empty(),
            Field::Description => !self.description.is_empty(),
            Field::ImageUrl => !self.image_url.is_empty(),
            Field::Price => self.price.is_some(),
            Field::Currency => !self.currency.is_empty(),
            Field::SiteName => !self.site_name.is_empty(),
        }
    }

    /// Offer a candidate for `field`. Returns true if the field was written.
    ///
    /// Populated fields are never overwritten. Blank text, `data:` image URLs
    /// and prices that are not strictly positive are refused.
    pub fn fill(&mut self, field: Field, candidate: impl Into<Candidate>) -> bool {
        if self.has(field) {
            return false;
        }

        let candidate: Candidate = candidate.into();
        match (field, candidate) {
            (Field::Price, Candidate::Amount(value)) => self.set_price(value),
            (Field::Price, Candidate::Text(raw)) => match parse_positive_price(&raw) {
                Ok(value) => self.set_price(value),
                Err(err) => {
                    log::debug!("price candidate {:?} rejected: {}", raw, err);
                    false
                }
            },
            (field, Candidate::Amount(value)) => {
                log::debug!("numeric candidate {} rejected for {:?}", value, field);
                false
            }
            (field, Candidate::Text(text)) => self.set_text(field, text),
        }
    }

    fn set_price(&mut self, value: f64) -> bool {
        if value.is_finite() && value > 0.0 {
            self.price = Some(value);
            true
        } else {
            false
        }
    }

    fn set_text(&mut self, field: Field, text: String) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Description => &mut self.description,
            Field::ImageUrl => {
                if is_data_url(text) {
                    return false;
                }
                &mut self.image_url
            }
            Field::Currency => &mut self.currency,
            Field::SiteName => &mut self.site_name,
            Field::Price => return false,
        };
        *slot = text.to_string();
        true
    }

    /// Returns true if nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.description.is_empty()
            && self.image_url.is_empty()
            && self.price.is_none()
            && self.currency.is_empty()
            && self.site_name.is_empty()
    }
}

/// The record shown to a user previewing a product link.
///
/// Always carries the URL-derived Amazon facts, even when extraction failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preview {
    pub url: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub price: Option<f64>,
    pub currency: String,
    pub site_name: String,
    pub is_amazon: bool,
    pub amazon_asin: String,
    pub error: Option<String>,
}

impl Preview {
    /// Build a preview from the outcome of one extraction call.
    ///
    /// On error every field is blank, the currency falls back to MXN and the
    /// error text is recorded; no partial metadata is shown.
    pub fn from_outcome(url: &str, outcome: &Result<ProductMetadata, ExtractError>) -> Self {
        let is_amazon = is_amazon_url(url);
        let amazon_asin = extract_asin(url);

        match outcome {
            Ok(meta) => Self {
                url: url.to_string(),
                title: meta.title.clone(),
                description: meta.description.clone(),
                image_url: meta.image_url.clone(),
                price: meta.price,
                currency: meta.currency.clone(),
                site_name: meta.site_name.clone(),
                is_amazon,
                amazon_asin,
                error: None,
            },
            Err(err) => Self {
                url: url.to_string(),
                title: String::new(),
                description: String::new(),
                image_url: String::new(),
                price: None,
                currency: PREVIEW_FALLBACK_CURRENCY.to_string(),
                site_name: String::new(),
                is_amazon,
                amazon_asin,
                error: Some(err.to_string()),
            },
        }
    }
}
