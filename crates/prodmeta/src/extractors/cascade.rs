// ABOUTME: Declarative per-field extraction steps and the single driver that applies them in order.
// ABOUTME: A step is skipped once its field is populated, so earlier steps always win.

use scraper::Html;

use crate::extractors::fields::{first_attr, first_text, meta_content, meta_name_content};
use crate::metadata::{Candidate, Field, ProductMetadata};

/// How a step looks for its value in the document.
#[derive(Clone, Copy, Debug)]
pub enum Probe {
    /// `meta[property=key]`, then `meta[name=key]`, content attribute.
    Meta(&'static str),
    /// `meta[name=key]` content attribute only.
    MetaName(&'static str),
    /// Text of the first element matching the selector.
    Text(&'static str),
    /// Attribute of the first element matching the selector.
    Attr(&'static str, &'static str),
    /// A fixed value, used for site defaults.
    Const(&'static str),
    /// Arbitrary lookup. Receives the document and the page URL.
    Custom(fn(&Html, &str) -> Option<Candidate>),
}

impl Probe {
    /// Run the probe. `None` means nothing was found.
    pub fn probe(&self, doc: &Html, page_url: &str) -> Option<Candidate> {
        match *self {
            Probe::Meta(key) => meta_content(doc, key).map(Candidate::Text),
            Probe::MetaName(name) => meta_name_content(doc, name).map(Candidate::Text),
            Probe::Text(css) => first_text(doc, css).map(Candidate::Text),
            Probe::Attr(css, attr) => first_attr(doc, css, attr).map(Candidate::Text),
            Probe::Const(value) => Some(Candidate::Text(value.to_string())),
            Probe::Custom(lookup) => lookup(doc, page_url),
        }
    }
}

/// One entry in an ordered extraction cascade.
#[derive(Clone, Copy, Debug)]
pub struct Step {
    pub field: Field,
    pub probe: Probe,
}

impl Step {
    pub const fn new(field: Field, probe: Probe) -> Self {
        Self { field, probe }
    }
}

/// Apply `steps` in order, writing the first acceptable candidate per field.
///
/// A candidate the accumulator refuses (blank, unparseable price, `data:`
/// image) does not stop the cascade; later steps for that field still run.
/// Returns the number of fields written.
pub fn run_cascade(
    doc: &Html,
    page_url: &str,
    steps: &[Step],
    meta: &mut ProductMetadata,
) -> usize {
    let mut filled = 0;
    for step in steps {
        if meta.has(step.field) {
            continue;
        }
        if let Some(candidate) = step.probe.probe(doc, page_url) {
            if meta.fill(step.field, candidate) {
                log::trace!("{:?} filled by {:?}", step.field, step.probe);
                filled += 1;
            }
        }
    }
    filled
}
