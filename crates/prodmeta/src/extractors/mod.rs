// ABOUTME: Extraction strategies applied to a parsed product page.
// ABOUTME: Generic meta cascade, JSON-LD, site adapters and the generic price fallback.

//! Extraction strategies.
//!
//! Submodules:
//! - `cascade`: declarative `Step` lists and the driver that applies them.
//! - `generic`: Open Graph / Twitter / meta / `<title>` cascade and image scan.
//! - `jsonld`: schema.org Product and Offer nodes.
//! - `sites`: Amazon and MercadoLibre adapters.
//! - `price_fallback`: common price selectors used when nothing else found a price.
//! - `fields`, `compiled`: DOM lookup helpers and the selector cache.

pub mod cascade;
pub mod compiled;
pub mod fields;
pub mod generic;
pub mod jsonld;
pub mod price_fallback;
pub mod sites;
