//! Domain records for cards, templates, users, and analytics
//!
//! Every optional card field is an `Option<String>` so "never set" and "set
//! to the empty string" stay distinct all the way to the renderer, which
//! blanks both the same way.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::render;

/// A registered account.
///
/// The password hash is never serialized out of the service.
#[derive(Debug, Clone)]
pub struct User {
    /// Numeric account id.
    pub id: i64,
    /// Unique display name.
    pub username: String,
    /// Unique login email.
    pub email: String,
    /// Argon2 password hash.
    pub password_hash: String,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

/// A published (or draft) business card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    /// Numeric card id.
    pub id: i64,
    /// Owning account id.
    pub user_id: i64,
    /// Id of the [`CardTemplate`] this card renders with.
    pub template_id: i64,
    /// Unique slug for the public URL.
    pub card_slug: String,
    /// Card holder's name. The only required content field.
    pub full_name: String,
    /// Company name, if any.
    pub company_name: Option<String>,
    /// Job title, if any.
    pub job_title: Option<String>,
    /// Contact phone number.
    pub phone_number: Option<String>,
    /// Contact email shown on the card (distinct from the account email).
    pub email: Option<String>,
    /// Personal or company website.
    pub website_url: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Company logo image URL.
    pub logo_url: Option<String>,
    /// Short business description.
    pub business_description: Option<String>,
    /// Provider name -> profile URL, rendered via `{{<provider>_url}}`.
    pub social_media_links: BTreeMap<String, String>,
    /// Extra CSS injected into the public page.
    pub custom_css: Option<String>,
    /// Inactive cards disappear from the public URL.
    pub is_active: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl Card {
    /// Render this card through a template string.
    ///
    /// The card's serialized form is exactly the renderer's data record:
    /// flat scalar fields plus the `social_media_links` group. Fields that
    /// are `None` serialize as JSON null and render blank.
    #[must_use]
    pub fn render_with(&self, template: &str) -> String {
        let data = serde_json::to_value(self).unwrap_or(Value::Null);
        render::render(template, &data)
    }
}

/// A reusable card template shared across all users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardTemplate {
    /// Numeric template id.
    pub id: i64,
    /// Human-readable template name.
    pub name: String,
    /// HTML skeleton containing `{{name}}` placeholder tokens.
    pub structure_definition: String,
    /// Thumbnail shown in the template picker.
    pub preview_image_url: Option<String>,
}

/// One recorded public-page visit.
#[derive(Debug, Clone, Serialize)]
pub struct VisitRecord {
    /// Visited card.
    pub card_id: i64,
    /// Calendar day of the visit, used for daily grouping.
    pub visit_date: NaiveDate,
    /// SHA-256 of the visitor IP; the raw address is never stored.
    pub visitor_ip_hash: String,
    /// Exact visit time.
    pub timestamp: DateTime<Utc>,
}

/// Daily unique-visitor count for one card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VisitorStat {
    /// Calendar day.
    pub date: NaiveDate,
    /// Distinct visitor IP hashes seen that day.
    pub unique_visitors: usize,
}

/// A message left by a visitor on the public page.
#[derive(Debug, Clone, Serialize)]
pub struct MessageRecord {
    /// Card the message was left on.
    pub card_id: i64,
    /// Sender's name, if given.
    pub sender_name: Option<String>,
    /// Sender's email, if given.
    pub sender_email: Option<String>,
    /// Message body.
    pub message_content: String,
    /// Receipt time, newest-first in listings.
    pub received_at: DateTime<Utc>,
}

/// An appointment request from the public page.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentRecord {
    /// Card the request targets.
    pub card_id: i64,
    /// Requester's name.
    pub requester_name: String,
    /// Requester's email.
    pub requester_email: String,
    /// Free-form proposed time.
    pub proposed_time: String,
    /// Receipt time, newest-first in listings.
    pub created_at: DateTime<Utc>,
}

/// A tracked click on one of the card's links.
#[derive(Debug, Clone, Serialize)]
pub struct LinkClickRecord {
    /// Card the link belongs to.
    pub card_id: i64,
    /// Which link was clicked (e.g. "website", "linkedin").
    pub link_type: String,
    /// The clicked URL.
    pub link_url: String,
    /// Click time, newest-first in listings.
    pub clicked_at: DateTime<Utc>,
}

/// Content fields shared by card create and update payloads.
///
/// On update, `None` means "leave unchanged" while `Some(None)` (an explicit
/// JSON null) clears the field; [`deserialize_explicit_null`] keeps the two
/// apart.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardFields {
    /// Company name.
    #[serde(default, deserialize_with = "deserialize_explicit_null")]
    pub company_name: Option<Option<String>>,
    /// Job title.
    #[serde(default, deserialize_with = "deserialize_explicit_null")]
    pub job_title: Option<Option<String>>,
    /// Phone number.
    #[serde(default, deserialize_with = "deserialize_explicit_null")]
    pub phone_number: Option<Option<String>>,
    /// Contact email.
    #[serde(default, deserialize_with = "deserialize_explicit_null")]
    pub email: Option<Option<String>>,
    /// Website URL.
    #[serde(default, deserialize_with = "deserialize_explicit_null")]
    pub website_url: Option<Option<String>>,
    /// Postal address.
    #[serde(default, deserialize_with = "deserialize_explicit_null")]
    pub address: Option<Option<String>>,
    /// Logo URL.
    #[serde(default, deserialize_with = "deserialize_explicit_null")]
    pub logo_url: Option<Option<String>>,
    /// Business description.
    #[serde(default, deserialize_with = "deserialize_explicit_null")]
    pub business_description: Option<Option<String>>,
    /// Social links replacement (whole-group semantics).
    #[serde(default)]
    pub social_media_links: Option<BTreeMap<String, String>>,
    /// Custom CSS.
    #[serde(default, deserialize_with = "deserialize_explicit_null")]
    pub custom_css: Option<Option<String>>,
    /// Active flag.
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Distinguishes an absent field from an explicit JSON null.
///
/// Serde's stock `Option<Option<T>>` handling collapses null into the outer
/// `None`; wrapping the inner deserialization keeps null as `Some(None)`.
fn deserialize_explicit_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_card() -> Card {
        Card {
            id: 1,
            user_id: 1,
            template_id: 1,
            card_slug: "ada".into(),
            full_name: "Ada Lovelace".into(),
            company_name: Some("Analytical Engines Ltd".into()),
            job_title: Some("Mathematician".into()),
            phone_number: None,
            email: Some("ada@example.com".into()),
            website_url: None,
            address: None,
            logo_url: None,
            business_description: None,
            social_media_links: BTreeMap::from([(
                "linkedin".to_string(),
                "https://linkedin.com/in/ada".to_string(),
            )]),
            custom_css: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn card_renders_its_fields() {
        let card = sample_card();
        let html = card.render_with(
            "<h2>{{full_name}}</h2><p>{{job_title}} at {{company_name}}</p>\
             <a href=\"{{linkedin_url}}\">in</a><span>{{phone_number}}</span>",
        );
        assert!(html.contains("Ada Lovelace"));
        assert!(html.contains("Mathematician at Analytical Engines Ltd"));
        assert!(html.contains("https://linkedin.com/in/ada"));
        // Unset phone renders blank, not "null".
        assert!(html.contains("<span></span>"));
    }

    #[test]
    fn card_fields_distinguish_absent_from_null() {
        let absent: CardFields = serde_json::from_value(json!({})).expect("valid payload");
        assert_eq!(absent.company_name, None);

        let cleared: CardFields =
            serde_json::from_value(json!({"company_name": null})).expect("valid payload");
        assert_eq!(cleared.company_name, Some(None));

        let set: CardFields =
            serde_json::from_value(json!({"company_name": "ACME"})).expect("valid payload");
        assert_eq!(set.company_name, Some(Some("ACME".to_string())));
    }
}
