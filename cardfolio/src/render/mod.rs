//! Card template rendering
//!
//! Combines a template's HTML skeleton with a card's data to produce the
//! HTML shown on the public card page. Templates embed placeholder tokens
//! of the form `{{name}}`; rendering is a flat key/value substitution with
//! one nested group (`social_media_links`), not a templating language.
//!
//! The renderer is a pure function: no I/O, no shared state, no panics.
//! Malformed input degrades to an empty or partially-blanked string so the
//! same code path serves previews of half-filled cards and the published
//! page alike.
//!
//! # Token namespaces
//!
//! - `{{key}}` resolves against top-level scalar card fields.
//! - `{{<provider>_url}}` resolves against entries of the
//!   `social_media_links` group, e.g. `{{linkedin_url}}`.
//!
//! Any token still unresolved after both passes is removed, so template
//! authoring mistakes never leak `{{...}}` markers to visitors.
//!
//! # Example
//!
//! ```rust
//! use cardfolio::render::render;
//! use serde_json::json;
//!
//! let html = render(
//!     "<h1>{{full_name}}</h1><a href=\"{{linkedin_url}}\">in</a>",
//!     &json!({
//!         "full_name": "Ada Lovelace",
//!         "social_media_links": { "linkedin": "https://linkedin.com/in/ada" },
//!     }),
//! );
//! assert_eq!(
//!     html,
//!     "<h1>Ada Lovelace</h1><a href=\"https://linkedin.com/in/ada\">in</a>"
//! );
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Matches any well-formed placeholder token, known or not.
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{[^}]+\}\}").unwrap_or_else(|e| unreachable!("invalid placeholder pattern: {e}"))
});

/// Render a template against card data.
///
/// Substitution happens in three passes, in order:
///
/// 1. every top-level scalar entry `key` replaces all occurrences of
///    `{{key}}` with its string form (`null` becomes the empty string);
/// 2. every `provider` entry inside `social_media_links` replaces all
///    occurrences of `{{<provider>_url}}` with its URL;
/// 3. a final sweep blanks every remaining well-formed token.
///
/// The scalar pass runs first, so a top-level field literally named like a
/// social token (e.g. `linkedin_url`) shadows the social-link entry for the
/// same token.
///
/// Returns the empty string when the template is empty or the data is not a
/// JSON object at all. An empty object is valid data: every token in the
/// template is then blanked by the sweep. Never fails.
#[must_use]
pub fn render(template: &str, data: &Value) -> String {
    let Some(fields) = data.as_object() else {
        return String::new();
    };
    if template.is_empty() {
        return String::new();
    }

    let mut html = template.to_owned();

    for (key, value) in fields {
        if value.is_object() || value.is_array() {
            continue;
        }
        html = html.replace(&token(key), &scalar_text(value));
    }

    if let Some(links) = fields.get("social_media_links").and_then(Value::as_object) {
        for (provider, url) in links {
            html = html.replace(
                &token(&format!("{provider}_url")),
                url.as_str().unwrap_or_default(),
            );
        }
    }

    PLACEHOLDER.replace_all(&html, "").into_owned()
}

/// Literal token text for a field name.
fn token(key: &str) -> String {
    format!("{{{{{key}}}}}")
}

/// String form of a scalar value. `null` renders blank, never as "null".
fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn empty_template_renders_empty() {
        assert_eq!(render("", &json!({"full_name": "Ada"})), "");
    }

    #[test]
    fn absent_data_renders_empty() {
        assert_eq!(render("<p>{{full_name}}</p>", &Value::Null), "");
        assert_eq!(render("<p>{{full_name}}</p>", &json!("not an object")), "");
    }

    #[test]
    fn empty_data_blanks_all_tokens() {
        // An empty object is still data; every well-formed token is deleted
        // and the surrounding markup survives.
        assert_eq!(render("<p>{{full_name}}</p>", &json!({})), "<p></p>");
        assert_eq!(
            render("a {{x}} b {{y}} c", &json!({})),
            "a  b  c"
        );
    }

    #[test]
    fn scalar_substitution() {
        assert_eq!(
            render("Hello {{full_name}}!", &json!({"full_name": "Ada"})),
            "Hello Ada!"
        );
    }

    #[test]
    fn repeated_token_replaced_globally() {
        assert_eq!(render("{{x}} and {{x}}", &json!({"x": "A"})), "A and A");
    }

    #[test]
    fn null_field_renders_blank_not_null() {
        assert_eq!(
            render("logo: '{{logo_url}}'", &json!({"logo_url": null})),
            "logo: ''"
        );
    }

    #[test]
    fn numbers_and_booleans_render_display_form() {
        assert_eq!(
            render("id={{id}} active={{is_active}}", &json!({"id": 7, "is_active": true})),
            "id=7 active=true"
        );
    }

    #[test]
    fn social_link_namespacing() {
        assert_eq!(
            render(
                "<a href='{{linkedin_url}}'>",
                &json!({"social_media_links": {"linkedin": "http://x"}}),
            ),
            "<a href='http://x'>"
        );
    }

    #[test]
    fn missing_social_field_blanked() {
        assert_eq!(
            render("{{twitter_url}}", &json!({"social_media_links": {"linkedin": "http://x"}})),
            ""
        );
    }

    #[test]
    fn null_social_url_renders_blank() {
        assert_eq!(
            render("'{{github_url}}'", &json!({"social_media_links": {"github": null}})),
            "''"
        );
    }

    #[test]
    fn unknown_token_blanked_not_left_literal() {
        assert_eq!(
            render("{{full_name}} {{unknown_field}}", &json!({"full_name": "Bo"})),
            "Bo "
        );
    }

    #[test]
    fn nested_groups_other_than_social_are_skipped() {
        // Only social_media_links has token semantics; other objects must
        // not leak their Debug/JSON form into the output.
        assert_eq!(
            render("{{meta}}{{full_name}}", &json!({"meta": {"a": 1}, "full_name": "Bo"})),
            "Bo"
        );
    }

    #[test]
    fn scalar_field_shadows_social_token() {
        // A literal top-level linkedin_url wins over the social group entry
        // because the scalar pass runs first.
        assert_eq!(
            render(
                "{{linkedin_url}}",
                &json!({
                    "linkedin_url": "http://top-level",
                    "social_media_links": {"linkedin": "http://nested"},
                }),
            ),
            "http://top-level"
        );
    }

    #[test]
    fn unterminated_token_left_as_is() {
        // The sweep only matches well-formed tokens; an unterminated one is
        // plain text as far as the renderer is concerned.
        assert_eq!(
            render("{{unterminated and {{known}}", &json!({"known": "v"})),
            "{{unterminated and v"
        );
    }

    #[test]
    fn rendering_is_referentially_transparent() {
        let template = "<p>{{full_name}} / {{twitter_url}}</p>";
        let data = json!({
            "full_name": "Ada",
            "social_media_links": {"twitter": "http://t"},
        });
        assert_eq!(render(template, &data), render(template, &data));
    }

    proptest! {
        /// No well-formed token ever survives rendering, for arbitrary
        /// templates (including adversarial brace soup) and data.
        #[test]
        fn no_leaked_tokens(
            template in ".{0,200}",
            key in "[a-z_]{1,12}",
            value in ".{0,40}",
        ) {
            let mut fields = serde_json::Map::new();
            fields.insert(key, Value::String(value.clone()));
            let rendered = render(&template, &Value::Object(fields));
            // A substituted value containing brace pairs could form a new
            // token; the guarantee is about tokens from the template.
            if !value.contains('{') && !value.contains('}') {
                prop_assert!(!PLACEHOLDER.is_match(&rendered));
            }
        }

        /// Rendering with a single irrelevant field deletes every
        /// well-formed token and leaves the rest of the template intact.
        #[test]
        fn blanking_matches_regex_deletion(template in "[a-zA-Z{} ]{0,200}") {
            let rendered = render(&template, &json!({"__unused__": 1}));
            if template.is_empty() {
                prop_assert_eq!(rendered, "");
            } else {
                let expected = PLACEHOLDER.replace_all(&template, "").into_owned();
                prop_assert_eq!(rendered, expected);
            }
        }
    }
}
