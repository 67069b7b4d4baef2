//! In-memory persistence for users, cards, templates, and analytics
//!
//! The whole data set lives behind one `parking_lot::RwLock`; every
//! operation takes the lock for its own duration only and nothing is held
//! across an `.await`. Templates are system-owned and seeded at startup.

use std::collections::{BTreeMap, HashSet};

use chrono::Utc;
use parking_lot::RwLock;
use thiserror::Error;

use crate::models::{
    AppointmentRecord, Card, CardFields, CardTemplate, LinkClickRecord, MessageRecord, User,
    VisitRecord, VisitorStat,
};

/// Store-level failures, mapped onto HTTP statuses by the error module.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Another account already uses this email.
    #[error("Email already registered")]
    DuplicateEmail,

    /// Another account already uses this username.
    #[error("Username already taken")]
    DuplicateUsername,

    /// Another card already claims this slug.
    #[error("Card slug already exists")]
    DuplicateSlug,

    /// The referenced template id does not exist.
    #[error("Invalid template_id")]
    UnknownTemplate,

    /// No card with this id.
    #[error("Card not found")]
    CardNotFound,

    /// The card exists but belongs to someone else.
    #[error("Access forbidden: You do not own this card")]
    NotOwner,
}

/// Fields needed to create a card.
#[derive(Debug, Clone)]
pub struct NewCard {
    /// Template to render with; must exist.
    pub template_id: i64,
    /// Public slug; must be unique.
    pub card_slug: String,
    /// Card holder's name.
    pub full_name: String,
    /// Remaining optional content.
    pub fields: CardFields,
}

/// Partial card update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct CardUpdate {
    /// New template, validated against the seeded set.
    pub template_id: Option<i64>,
    /// New slug, re-checked for uniqueness.
    pub card_slug: Option<String>,
    /// New holder name.
    pub full_name: Option<String>,
    /// Optional content changes.
    pub fields: CardFields,
}

#[derive(Debug, Default)]
struct Inner {
    users: Vec<User>,
    next_user_id: i64,
    cards: Vec<Card>,
    next_card_id: i64,
    templates: Vec<CardTemplate>,
    visits: Vec<VisitRecord>,
    messages: Vec<MessageRecord>,
    appointments: Vec<AppointmentRecord>,
    link_clicks: Vec<LinkClickRecord>,
}

/// Process-local store backing the whole service.
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store seeded with the built-in templates.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_user_id: 1,
                next_card_id: 1,
                templates: seed_templates(),
                ..Inner::default()
            }),
        }
    }

    // ---- users ----

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Fails when the email or username is already taken.
    pub fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: String,
    ) -> Result<User, StoreError> {
        let mut inner = self.inner.write();
        if inner.users.iter().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail);
        }
        if inner.users.iter().any(|u| u.username == username) {
            return Err(StoreError::DuplicateUsername);
        }
        let user = User {
            id: inner.next_user_id,
            username: username.to_owned(),
            email: email.to_owned(),
            password_hash,
            created_at: Utc::now(),
        };
        inner.next_user_id += 1;
        inner.users.push(user.clone());
        Ok(user)
    }

    /// Look up an account by login email.
    #[must_use]
    pub fn user_by_email(&self, email: &str) -> Option<User> {
        self.inner.read().users.iter().find(|u| u.email == email).cloned()
    }

    /// Look up an account by id.
    #[must_use]
    pub fn user_by_id(&self, id: i64) -> Option<User> {
        self.inner.read().users.iter().find(|u| u.id == id).cloned()
    }

    // ---- templates ----

    /// The seeded, system-owned template list.
    #[must_use]
    pub fn templates(&self) -> Vec<CardTemplate> {
        self.inner.read().templates.clone()
    }

    /// Look up one template by id.
    #[must_use]
    pub fn template_by_id(&self, id: i64) -> Option<CardTemplate> {
        self.inner.read().templates.iter().find(|t| t.id == id).cloned()
    }

    // ---- cards ----

    /// Create a card for `user_id`.
    ///
    /// # Errors
    ///
    /// Fails on an unknown template id or a slug collision.
    pub fn create_card(&self, user_id: i64, new_card: NewCard) -> Result<Card, StoreError> {
        let mut inner = self.inner.write();
        if !inner.templates.iter().any(|t| t.id == new_card.template_id) {
            return Err(StoreError::UnknownTemplate);
        }
        if inner.cards.iter().any(|c| c.card_slug == new_card.card_slug) {
            return Err(StoreError::DuplicateSlug);
        }
        let now = Utc::now();
        let mut card = Card {
            id: inner.next_card_id,
            user_id,
            template_id: new_card.template_id,
            card_slug: new_card.card_slug,
            full_name: new_card.full_name,
            company_name: None,
            job_title: None,
            phone_number: None,
            email: None,
            website_url: None,
            address: None,
            logo_url: None,
            business_description: None,
            social_media_links: BTreeMap::new(),
            custom_css: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        apply_fields(&mut card, &new_card.fields);
        inner.next_card_id += 1;
        inner.cards.push(card.clone());
        Ok(card)
    }

    /// All cards owned by `user_id`.
    #[must_use]
    pub fn cards_for_user(&self, user_id: i64) -> Vec<Card> {
        self.inner
            .read()
            .cards
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Fetch a card by id, enforcing ownership.
    ///
    /// # Errors
    ///
    /// Fails when the card is missing or owned by a different account.
    pub fn owned_card(&self, card_id: i64, user_id: i64) -> Result<Card, StoreError> {
        let inner = self.inner.read();
        let card = inner
            .cards
            .iter()
            .find(|c| c.id == card_id)
            .ok_or(StoreError::CardNotFound)?;
        if card.user_id != user_id {
            return Err(StoreError::NotOwner);
        }
        Ok(card.clone())
    }

    /// Apply a partial update to an owned card.
    ///
    /// # Errors
    ///
    /// Fails on missing card, foreign ownership, slug collision, or an
    /// unknown template id.
    pub fn update_card(
        &self,
        card_id: i64,
        user_id: i64,
        update: CardUpdate,
    ) -> Result<Card, StoreError> {
        let mut inner = self.inner.write();

        // Existence and ownership come before content validation, so a
        // missing card is a 404 even when the payload also has a bad slug.
        let index = inner
            .cards
            .iter()
            .position(|c| c.id == card_id)
            .ok_or(StoreError::CardNotFound)?;
        if inner.cards[index].user_id != user_id {
            return Err(StoreError::NotOwner);
        }

        if let Some(slug) = &update.card_slug {
            let taken = inner
                .cards
                .iter()
                .any(|c| c.card_slug == *slug && c.id != card_id);
            if taken {
                return Err(StoreError::DuplicateSlug);
            }
        }
        if let Some(template_id) = update.template_id {
            if !inner.templates.iter().any(|t| t.id == template_id) {
                return Err(StoreError::UnknownTemplate);
            }
        }

        let card = &mut inner.cards[index];

        if let Some(template_id) = update.template_id {
            card.template_id = template_id;
        }
        if let Some(slug) = update.card_slug {
            card.card_slug = slug;
        }
        if let Some(full_name) = update.full_name {
            card.full_name = full_name;
        }
        apply_fields(card, &update.fields);
        card.updated_at = Utc::now();
        Ok(card.clone())
    }

    /// Delete an owned card.
    ///
    /// # Errors
    ///
    /// Fails when the card is missing or owned by a different account.
    pub fn delete_card(&self, card_id: i64, user_id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let index = inner
            .cards
            .iter()
            .position(|c| c.id == card_id)
            .ok_or(StoreError::CardNotFound)?;
        if inner.cards[index].user_id != user_id {
            return Err(StoreError::NotOwner);
        }
        inner.cards.remove(index);
        Ok(())
    }

    /// Public lookup: an *active* card by slug.
    #[must_use]
    pub fn active_card_by_slug(&self, slug: &str) -> Option<Card> {
        self.inner
            .read()
            .cards
            .iter()
            .find(|c| c.card_slug == slug && c.is_active)
            .cloned()
    }

    // ---- analytics ----

    /// Record one public-page visit.
    pub fn record_visit(&self, visit: VisitRecord) {
        self.inner.write().visits.push(visit);
    }

    /// Record a visitor message.
    pub fn record_message(&self, message: MessageRecord) {
        self.inner.write().messages.push(message);
    }

    /// Record an appointment request.
    pub fn record_appointment(&self, appointment: AppointmentRecord) {
        self.inner.write().appointments.push(appointment);
    }

    /// Record a link click.
    pub fn record_link_click(&self, click: LinkClickRecord) {
        self.inner.write().link_clicks.push(click);
    }

    /// Daily unique-visitor counts for a card, oldest day first.
    ///
    /// Uniqueness is per day per hashed IP: the same visitor twice in one
    /// day counts once.
    #[must_use]
    pub fn visitor_stats(&self, card_id: i64) -> Vec<VisitorStat> {
        let inner = self.inner.read();
        let mut by_day: BTreeMap<chrono::NaiveDate, HashSet<&str>> = BTreeMap::new();
        for visit in inner.visits.iter().filter(|v| v.card_id == card_id) {
            by_day
                .entry(visit.visit_date)
                .or_default()
                .insert(visit.visitor_ip_hash.as_str());
        }
        by_day
            .into_iter()
            .map(|(date, hashes)| VisitorStat {
                date,
                unique_visitors: hashes.len(),
            })
            .collect()
    }

    /// Messages for a card, newest first.
    #[must_use]
    pub fn messages_for(&self, card_id: i64) -> Vec<MessageRecord> {
        let mut messages: Vec<_> = self
            .inner
            .read()
            .messages
            .iter()
            .filter(|m| m.card_id == card_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| b.received_at.cmp(&a.received_at));
        messages
    }

    /// Appointment requests for a card, newest first.
    #[must_use]
    pub fn appointments_for(&self, card_id: i64) -> Vec<AppointmentRecord> {
        let mut appointments: Vec<_> = self
            .inner
            .read()
            .appointments
            .iter()
            .filter(|a| a.card_id == card_id)
            .cloned()
            .collect();
        appointments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        appointments
    }

    /// Link clicks for a card, newest first.
    #[must_use]
    pub fn link_clicks_for(&self, card_id: i64) -> Vec<LinkClickRecord> {
        let mut clicks: Vec<_> = self
            .inner
            .read()
            .link_clicks
            .iter()
            .filter(|c| c.card_id == card_id)
            .cloned()
            .collect();
        clicks.sort_by(|a, b| b.clicked_at.cmp(&a.clicked_at));
        clicks
    }
}

/// Merge optional content fields into a card.
///
/// `None` leaves the field alone; `Some(None)` clears it; `Some(Some(v))`
/// sets it.
fn apply_fields(card: &mut Card, fields: &CardFields) {
    if let Some(v) = &fields.company_name {
        card.company_name.clone_from(v);
    }
    if let Some(v) = &fields.job_title {
        card.job_title.clone_from(v);
    }
    if let Some(v) = &fields.phone_number {
        card.phone_number.clone_from(v);
    }
    if let Some(v) = &fields.email {
        card.email.clone_from(v);
    }
    if let Some(v) = &fields.website_url {
        card.website_url.clone_from(v);
    }
    if let Some(v) = &fields.address {
        card.address.clone_from(v);
    }
    if let Some(v) = &fields.logo_url {
        card.logo_url.clone_from(v);
    }
    if let Some(v) = &fields.business_description {
        card.business_description.clone_from(v);
    }
    if let Some(links) = &fields.social_media_links {
        card.social_media_links.clone_from(links);
    }
    if let Some(v) = &fields.custom_css {
        card.custom_css.clone_from(v);
    }
    if let Some(active) = fields.is_active {
        card.is_active = active;
    }
}

/// Built-in card templates, shared by every account.
fn seed_templates() -> Vec<CardTemplate> {
    vec![
        CardTemplate {
            id: 1,
            name: "Classic Professional".to_string(),
            structure_definition: r#"
<div style="border: 1px solid #ccc; padding: 20px; width: 400px; font-family: Arial, sans-serif; background-color: #f8f9fa;">
  <div style="display: flex; align-items: center; margin-bottom: 10px;">
    <img src="{{logo_url}}" alt="Logo" style="max-width: 60px; max-height: 60px; margin-right: 15px;" />
    <div>
      <h2 style="margin: 0 0 5px 0; color: #333;">{{full_name}}</h2>
      <p style="margin: 0 0 3px 0; color: #555;">{{job_title}}</p>
      <p style="margin: 0; color: #555;">{{company_name}}</p>
    </div>
  </div>
  <div style="font-size: 0.85em; color: #444;">
    <p style="margin: 3px 0;"><strong>Email:</strong> <a href="mailto:{{email}}">{{email}}</a></p>
    <p style="margin: 3px 0;"><strong>Phone:</strong> {{phone_number}}</p>
    <p style="margin: 3px 0;"><strong>Website:</strong> <a href="{{website_url}}">{{website_url}}</a></p>
    <p style="margin: 3px 0;"><strong>Address:</strong> {{address}}</p>
  </div>
  <div style="margin-top: 10px; font-size: 0.8em;">
    <a href="{{linkedin_url}}" style="margin-right: 8px; color: #0077b5;">LinkedIn</a>
    <a href="{{twitter_url}}" style="margin-right: 8px; color: #1da1f2;">Twitter</a>
    <a href="{{github_url}}" style="color: #333;">GitHub</a>
  </div>
</div>
"#
            .to_string(),
            preview_image_url: Some("http://example.com/preview_template_1.png".to_string()),
        },
        CardTemplate {
            id: 2,
            name: "Modern Minimalist".to_string(),
            structure_definition: r#"
<div style="border: 1px solid #e0e0e0; padding: 25px; width: 400px; font-family: 'Helvetica Neue', Arial, sans-serif; background-color: #ffffff;">
  <div style="text-align: center; margin-bottom: 15px;">
    <img src="{{logo_url}}" alt="Logo" style="max-width: 50px; max-height: 50px; border-radius: 50%;" />
    <h1 style="margin: 0 0 5px 0; color: #2c3e50; font-weight: 300;">{{full_name}}</h1>
    <p style="margin: 0 0 10px 0; color: #7f8c8d;">{{job_title}}</p>
    <p style="margin: 0; color: #95a5a6;">{{company_name}}</p>
  </div>
  <hr style="border: 0; border-top: 1px solid #ecf0f1;" />
  <div style="font-size: 0.8em; color: #7f8c8d; text-align: center;">
    <p style="margin: 4px 0;">{{email}} | {{phone_number}}</p>
    <p style="margin: 4px 0;"><a href="{{website_url}}" style="color: #3498db;">{{website_url}}</a></p>
    <div style="margin-top: 8px;">
      <a href="{{linkedin_url}}" style="margin: 0 5px; color: #3498db;">L</a>
      <a href="{{twitter_url}}" style="margin: 0 5px; color: #3498db;">T</a>
      <a href="{{github_url}}" style="margin: 0 5px; color: #3498db;">G</a>
    </div>
  </div>
</div>
"#
            .to_string(),
            preview_image_url: Some("http://example.com/preview_template_2.png".to_string()),
        },
        CardTemplate {
            id: 3,
            name: "Creative Portfolio".to_string(),
            structure_definition: r#"
<div style="padding: 20px; width: 400px; font-family: Georgia, serif; background: linear-gradient(135deg, #6dd5ed 0%, #2193b0 100%); color: #ffffff; border-radius: 8px;">
  <div style="display: flex; justify-content: space-between; align-items: flex-start;">
    <div>
      <h2 style="margin: 0 0 5px 0; font-weight: bold;">{{full_name}}</h2>
      <p style="margin: 0 0 10px 0; font-style: italic;">{{job_title}}</p>
      <p style="margin: 0;">{{company_name}}</p>
    </div>
    <img src="{{logo_url}}" alt="Logo" style="max-width: 55px; max-height: 55px; border: 2px solid white;" />
  </div>
  <div style="margin-top: 15px; font-size: 0.85em;">
    <p style="margin: 5px 0;"><strong>E:</strong> <a href="mailto:{{email}}" style="color: #ffffff;">{{email}}</a></p>
    <p style="margin: 5px 0;"><strong>P:</strong> {{phone_number}}</p>
    <p style="margin: 5px 0;"><strong>W:</strong> <a href="{{website_url}}" style="color: #ffffff;">{{website_url}}</a></p>
  </div>
  <div style="margin-top: 10px; text-align: right;">
    <a href="{{linkedin_url}}" style="margin-left: 10px; color: #f0f0f0;">LinkedIn</a>
    <a href="{{twitter_url}}" style="margin-left: 10px; color: #f0f0f0;">Twitter</a>
  </div>
  <p style="font-size: 0.75em; margin-top: 10px;">{{business_description}}</p>
</div>
"#
            .to_string(),
            preview_image_url: Some("http://example.com/preview_template_3.png".to_string()),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VisitRecord;
    use chrono::NaiveDate;

    fn new_card(slug: &str) -> NewCard {
        NewCard {
            template_id: 1,
            card_slug: slug.to_string(),
            full_name: "Ada Lovelace".to_string(),
            fields: CardFields::default(),
        }
    }

    fn visit(card_id: i64, day: &str, ip_hash: &str) -> VisitRecord {
        VisitRecord {
            card_id,
            visit_date: day.parse::<NaiveDate>().expect("valid date"),
            visitor_ip_hash: ip_hash.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn duplicate_email_rejected() {
        let store = MemoryStore::new();
        store
            .create_user("ada", "ada@example.com", "hash".into())
            .expect("first registration");
        let err = store
            .create_user("other", "ada@example.com", "hash".into())
            .expect_err("duplicate email");
        assert_eq!(err, StoreError::DuplicateEmail);
    }

    #[test]
    fn duplicate_username_rejected() {
        let store = MemoryStore::new();
        store
            .create_user("ada", "ada@example.com", "hash".into())
            .expect("first registration");
        let err = store
            .create_user("ada", "other@example.com", "hash".into())
            .expect_err("duplicate username");
        assert_eq!(err, StoreError::DuplicateUsername);
    }

    #[test]
    fn card_ids_are_sequential() {
        let store = MemoryStore::new();
        let a = store.create_card(1, new_card("a")).expect("create a");
        let b = store.create_card(1, new_card("b")).expect("create b");
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[test]
    fn slug_collision_rejected() {
        let store = MemoryStore::new();
        store.create_card(1, new_card("ada")).expect("create");
        let err = store.create_card(2, new_card("ada")).expect_err("collision");
        assert_eq!(err, StoreError::DuplicateSlug);
    }

    #[test]
    fn unknown_template_rejected() {
        let store = MemoryStore::new();
        let mut card = new_card("ada");
        card.template_id = 99;
        let err = store.create_card(1, card).expect_err("bad template");
        assert_eq!(err, StoreError::UnknownTemplate);
    }

    #[test]
    fn ownership_enforced_on_fetch() {
        let store = MemoryStore::new();
        let card = store.create_card(1, new_card("ada")).expect("create");
        assert!(matches!(
            store.owned_card(card.id, 2),
            Err(StoreError::NotOwner)
        ));
        assert!(matches!(
            store.owned_card(99, 1),
            Err(StoreError::CardNotFound)
        ));
    }

    #[test]
    fn update_keeps_unmentioned_fields() {
        let store = MemoryStore::new();
        let mut fields = CardFields::default();
        fields.company_name = Some(Some("ACME".into()));
        let card = store
            .create_card(
                1,
                NewCard {
                    fields,
                    ..new_card("ada")
                },
            )
            .expect("create");

        let mut update_fields = CardFields::default();
        update_fields.job_title = Some(Some("Engineer".into()));
        let updated = store
            .update_card(
                card.id,
                1,
                CardUpdate {
                    fields: update_fields,
                    ..CardUpdate::default()
                },
            )
            .expect("update");

        assert_eq!(updated.company_name.as_deref(), Some("ACME"));
        assert_eq!(updated.job_title.as_deref(), Some("Engineer"));
    }

    #[test]
    fn update_clears_explicit_nulls() {
        let store = MemoryStore::new();
        let mut fields = CardFields::default();
        fields.company_name = Some(Some("ACME".into()));
        let card = store
            .create_card(
                1,
                NewCard {
                    fields,
                    ..new_card("ada")
                },
            )
            .expect("create");

        let mut update_fields = CardFields::default();
        update_fields.company_name = Some(None);
        let updated = store
            .update_card(
                card.id,
                1,
                CardUpdate {
                    fields: update_fields,
                    ..CardUpdate::default()
                },
            )
            .expect("update");
        assert_eq!(updated.company_name, None);
    }

    #[test]
    fn slug_change_to_own_slug_allowed() {
        let store = MemoryStore::new();
        let card = store.create_card(1, new_card("ada")).expect("create");
        let updated = store
            .update_card(
                card.id,
                1,
                CardUpdate {
                    card_slug: Some("ada".into()),
                    ..CardUpdate::default()
                },
            )
            .expect("same slug is not a collision");
        assert_eq!(updated.card_slug, "ada");
    }

    #[test]
    fn inactive_cards_hidden_from_public_lookup() {
        let store = MemoryStore::new();
        let card = store.create_card(1, new_card("ada")).expect("create");
        assert!(store.active_card_by_slug("ada").is_some());

        let mut fields = CardFields::default();
        fields.is_active = Some(false);
        store
            .update_card(card.id, 1, CardUpdate { fields, ..CardUpdate::default() })
            .expect("deactivate");
        assert!(store.active_card_by_slug("ada").is_none());
    }

    #[test]
    fn visitor_stats_count_unique_ips_per_day() {
        let store = MemoryStore::new();
        let card = store.create_card(1, new_card("ada")).expect("create");
        store.record_visit(visit(card.id, "2026-08-01", "aaa"));
        store.record_visit(visit(card.id, "2026-08-01", "aaa"));
        store.record_visit(visit(card.id, "2026-08-01", "bbb"));
        store.record_visit(visit(card.id, "2026-08-02", "aaa"));
        store.record_visit(visit(99, "2026-08-01", "zzz"));

        let stats = store.visitor_stats(card.id);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].date, "2026-08-01".parse().expect("date"));
        assert_eq!(stats[0].unique_visitors, 2);
        assert_eq!(stats[1].unique_visitors, 1);
    }

    #[test]
    fn messages_sorted_newest_first() {
        let store = MemoryStore::new();
        let base = Utc::now();
        for (i, body) in ["first", "second"].iter().enumerate() {
            store.record_message(MessageRecord {
                card_id: 1,
                sender_name: None,
                sender_email: None,
                message_content: (*body).to_string(),
                received_at: base + chrono::Duration::seconds(i64::try_from(i).expect("small")),
            });
        }
        let messages = store.messages_for(1);
        assert_eq!(messages[0].message_content, "second");
        assert_eq!(messages[1].message_content, "first");
    }

    #[test]
    fn seeded_templates_present() {
        let store = MemoryStore::new();
        let templates = store.templates();
        assert_eq!(templates.len(), 3);
        assert!(templates[0].structure_definition.contains("{{full_name}}"));
        assert!(store.template_by_id(2).is_some());
        assert!(store.template_by_id(42).is_none());
    }
}
