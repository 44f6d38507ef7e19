// ABOUTME: Removes a trailing site-name suffix such as " - Amazon.com" from product titles.
// ABOUTME: Applied once, after every strategy has run.

const SEPARATORS: &[&str] = &[" - ", " | ", " – ", " — "];

/// Strip a trailing `<separator> <site name>` segment from `title`.
///
/// Separators are tried in order, each at its rightmost occurrence. A suffix is
/// removed when it equals or contains `site_name`, ignoring case. Either input
/// being empty leaves the title unchanged.
pub fn clean_title(title: &str, site_name: &str) -> String {
    if title.is_empty() || site_name.is_empty() {
        return title.to_string();
    }

    let site = site_name.to_lowercase();
    let mut cleaned = title.to_string();
    for sep in SEPARATORS {
        if let Some(idx) = cleaned.rfind(sep).filter(|&idx| idx > 0) {
            let suffix = cleaned[idx + sep.len()..].trim().to_lowercase();
            if suffix.contains(&site) {
                cleaned = cleaned[..idx].trim().to_string();
            }
        }
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_site_suffix() {
        assert_eq!(clean_title("Widget 3000 - Amazon.com", "Amazon"), "Widget 3000");
        assert_eq!(
            clean_title("Pilas AA | MercadoLibre México", "mercadolibre"),
            "Pilas AA"
        );
        assert_eq!(clean_title("Lámpara LED – Shop", "Shop"), "Lámpara LED");
        assert_eq!(clean_title("Taladro — Home Depot", "Home Depot"), "Taladro");
    }

    #[test]
    fn unrelated_suffix_kept() {
        assert_eq!(
            clean_title("USB-C Cable - 2 Pack", "Amazon"),
            "USB-C Cable - 2 Pack"
        );
    }

    #[test]
    fn no_separator_unchanged() {
        assert_eq!(clean_title("Widget 3000", "Amazon"), "Widget 3000");
    }

    #[test]
    fn empty_inputs_unchanged() {
        assert_eq!(clean_title("", "Amazon"), "");
        assert_eq!(clean_title("Widget - Amazon", ""), "Widget - Amazon");
    }

    #[test]
    fn separator_at_start_is_ignored() {
        assert_eq!(clean_title(" - Amazon", "Amazon"), " - Amazon");
    }

    #[test]
    fn each_separator_applies_once_in_order() {
        assert_eq!(
            clean_title("Widget - Amazon.com | Amazon", "Amazon"),
            "Widget"
        );
    }
}
