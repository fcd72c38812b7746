//! Tenant branding → response headers.
//!
//! Pure and infallible: absent fields simply omit their header. The generated
//! stylesheet lists custom properties in a fixed order so identical branding
//! always yields byte-identical output.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use campus_core::Branding;

use crate::headers::{self, HeaderSet};

/// Build the canonical stylesheet for `branding`, or `None` when no styling
/// field is set.
pub fn generate_stylesheet(branding: &Branding) -> Option<String> {
    let properties = [
        ("--tenant-primary-color", branding.colors.primary.as_deref()),
        ("--tenant-secondary-color", branding.colors.secondary.as_deref()),
        ("--tenant-accent-color", branding.colors.accent.as_deref()),
        ("--tenant-font-family", branding.typography.font_family.as_deref()),
    ];

    let declarations: Vec<String> = properties
        .iter()
        .filter_map(|(name, value)| {
            let value = sanitize_css_value(value.filter(|v| !v.is_empty())?);
            (!value.is_empty()).then(|| format!("  {name}: {value};\n"))
        })
        .collect();

    if declarations.is_empty() {
        return None;
    }

    let mut css = String::from(":root {\n");
    for declaration in declarations {
        css.push_str(&declaration);
    }
    css.push_str("}\n");
    Some(css)
}

/// Headers describing the tenant's branding.
pub fn branding_headers(branding: &Branding) -> HeaderSet {
    let mut set = HeaderSet::new();

    set.insert_opt(headers::PRIMARY_COLOR, branding.colors.primary.as_deref());
    set.insert_opt(headers::SECONDARY_COLOR, branding.colors.secondary.as_deref());
    set.insert_opt(headers::ACCENT_COLOR, branding.colors.accent.as_deref());
    set.insert_opt(headers::FONT_FAMILY, branding.typography.font_family.as_deref());
    set.insert_opt(headers::LOGO, branding.logo_url.as_deref());
    set.insert_opt(headers::FAVICON, branding.favicon_url.as_deref());

    if let Some(css) = generate_stylesheet(branding) {
        set.insert(headers::STYLESHEET, STANDARD.encode(css));
    }
    if let Some(css) = branding.custom_css.as_deref().filter(|v| !v.is_empty()) {
        set.insert(headers::CUSTOM_CSS, STANDARD.encode(css));
    }
    if let Some(js) = branding.custom_js.as_deref().filter(|v| !v.is_empty()) {
        set.insert(headers::CUSTOM_JS, STANDARD.encode(js));
    }

    set
}

// Keeps a configured value from closing the declaration or the rule.
fn sanitize_css_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ';' | '{' | '}' | '<' | '>' | '\n' | '\r'))
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn branding(value: serde_json::Value) -> Branding {
        serde_json::from_value(value).unwrap()
    }

    fn decode(value: &str) -> String {
        String::from_utf8(STANDARD.decode(value).unwrap()).unwrap()
    }

    #[test]
    fn stylesheet_lists_properties_in_fixed_order() {
        let b = branding(json!({
            "typography": { "fontFamily": "Inter, sans-serif" },
            "colors": { "accent": "#ff0000", "primary": "#112233" }
        }));
        assert_eq!(
            generate_stylesheet(&b).unwrap(),
            ":root {\n  --tenant-primary-color: #112233;\n  --tenant-accent-color: #ff0000;\n  --tenant-font-family: Inter, sans-serif;\n}\n"
        );
    }

    #[test]
    fn empty_branding_has_no_headers() {
        assert!(generate_stylesheet(&Branding::default()).is_none());
        assert!(branding_headers(&Branding::default()).is_empty());
    }

    #[test]
    fn values_cannot_escape_the_rule() {
        let b = branding(json!({ "colors": { "primary": "red; } body { display: none" } }));
        let css = generate_stylesheet(&b).unwrap();
        assert_eq!(css.matches('}').count(), 1);
        assert_eq!(css.matches(';').count(), 1);
    }

    #[test]
    fn payloads_are_base64_encoded() {
        let b = branding(json!({
            "colors": { "primary": "#112233" },
            "logoUrl": "https://cdn.test/acme.svg",
            "customCss": ".banner { color: red; }",
            "customJs": "console.log('hi')"
        }));
        let set = branding_headers(&b);
        assert_eq!(set.get(headers::PRIMARY_COLOR), Some("#112233"));
        assert_eq!(set.get(headers::LOGO), Some("https://cdn.test/acme.svg"));
        assert_eq!(decode(set.get(headers::CUSTOM_CSS).unwrap()), ".banner { color: red; }");
        assert_eq!(decode(set.get(headers::CUSTOM_JS).unwrap()), "console.log('hi')");
        assert!(decode(set.get(headers::STYLESHEET).unwrap()).contains("--tenant-primary-color: #112233;"));
        assert!(!set.contains(headers::FAVICON));
    }

    proptest! {
        #[test]
        fn output_is_deterministic(
            primary in proptest::option::of(".{0,12}"),
            font in proptest::option::of(".{0,20}"),
            css in proptest::option::of(".{0,40}"),
        ) {
            let mut b = Branding::default();
            b.colors.primary = primary;
            b.typography.font_family = font;
            b.custom_css = css;
            prop_assert_eq!(branding_headers(&b), branding_headers(&b.clone()));
            prop_assert_eq!(generate_stylesheet(&b), generate_stylesheet(&b));
        }
    }
}
