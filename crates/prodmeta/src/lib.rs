// ABOUTME: Main library entry point for the product metadata extraction engine.
// ABOUTME: Re-exports the public API: Client, ClientBuilder, ProductMetadata, Preview, ExtractError, ErrorCode.

//! Product metadata extraction for e-commerce URLs.
//!
//! Given a product page on Amazon, MercadoLibre or an unknown shop, the
//! [`Client`] fetches the page and derives a title, description, image,
//! price, currency and site name. Strategies run from most to least
//! trustworthy, and a field filled by an earlier strategy is never replaced:
//!
//! 1. Open Graph, Twitter Card and standard meta tags, `<title>`, first product image
//! 2. schema.org JSON-LD
//! 3. site adapters (Amazon, MercadoLibre)
//! 4. generic price selectors, then a currency guess from the domain
//!
//! # Example
//!
//! ```no_run
//! use vista_prodmeta::{Client, ExtractError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ExtractError> {
//!     let client = Client::builder().build()?;
//!     let meta = client.extract("https://www.amazon.com.mx/dp/B0BWK6PXZX").await?;
//!     println!("{} {:?} {}", meta.title, meta.price, meta.currency);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod extractors;
pub mod metadata;
pub mod options;
pub mod policy;
pub mod price;
pub mod resource;
pub mod title;
pub mod urls;

pub use crate::client::Client;
pub use crate::error::{ErrorCode, ExtractError};
pub use crate::extractors::sites::{AdapterRegistry, SiteAdapter};
pub use crate::metadata::{Candidate, Field, Preview, ProductMetadata};
pub use crate::options::{ClientBuilder, Options};
pub use crate::policy::DomainPolicy;
pub use crate::price::{parse_price, PriceError};
pub use crate::urls::{extract_asin, is_amazon_url};
