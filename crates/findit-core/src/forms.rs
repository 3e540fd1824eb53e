// ── Form validation and item submission ──
//
// Client-side validation runs before any network call: an invalid form
// never reaches the server. Messages match what the views display next to
// each field.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use findit_api::{ApiClient, ImageAttachment, Item, ItemPayload, ItemType};

use crate::error::CoreError;

/// Per-field validation messages, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<&'static str, String>,
}

impl FieldErrors {
    /// Record a message for `field`, replacing any earlier one.
    pub fn set(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Combine two error sets; `other` wins on shared fields.
    pub fn merged(mut self, other: FieldErrors) -> FieldErrors {
        self.errors.extend(other.errors);
        self
    }

    fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Minimal shape check for an email address: `x@y.z` with no whitespace.
fn email_looks_valid(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .rsplit_once('.')
        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

// ── Login ───────────────────────────────────────────────────────────

/// Login form fields.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    /// Validate before submission. A failed validation blocks the network
    /// call entirely.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        if self.username.trim().is_empty() {
            errors.set("username", "Username is required");
        }
        if self.password.is_empty() {
            errors.set("password", "Password is required");
        }
        errors.into_result()
    }
}

// ── Register ────────────────────────────────────────────────────────

/// Registration form fields.
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();

        if self.username.trim().is_empty() {
            errors.set("username", "Username is required");
        } else if self.username.trim().len() < 3 {
            errors.set("username", "Username must be at least 3 characters");
        }

        if self.email.trim().is_empty() {
            errors.set("email", "Email is required");
        } else if !email_looks_valid(self.email.trim()) {
            errors.set("email", "Email is invalid");
        }

        if self.password.is_empty() {
            errors.set("password", "Password is required");
        } else if self.password.len() < 6 {
            errors.set("password", "Password must be at least 6 characters");
        }

        if self.password != self.confirm_password {
            errors.set("confirm_password", "Passwords do not match");
        }

        errors.into_result()
    }
}

// ── Item create / edit ──────────────────────────────────────────────

/// Accepted datetime input shapes for `date_occurred`.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d"];

/// A draft of an item being created or edited, holding raw user input.
#[derive(Debug, Clone)]
pub struct ItemDraft {
    pub title: String,
    pub description: String,
    pub item_type: ItemType,
    pub category_id: Option<i64>,
    /// Raw date input (`YYYY-MM-DD` or `YYYY-MM-DDTHH:MM[:SS]`).
    pub date_occurred: String,
    pub location: String,
    pub is_resolved: bool,
    pub image: Option<ImageAttachment>,
}

impl Default for ItemDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            item_type: ItemType::Lost,
            category_id: None,
            date_occurred: String::new(),
            location: String::new(),
            is_resolved: false,
            image: None,
        }
    }
}

impl ItemDraft {
    /// Pre-fill a draft from an existing item, for the edit form.
    pub fn from_item(item: &Item) -> Self {
        Self {
            title: item.title.clone(),
            description: item.description.clone(),
            item_type: item.item_type,
            category_id: item.category.as_ref().map(|c| c.id),
            date_occurred: item.date_occurred.format("%Y-%m-%dT%H:%M").to_string(),
            location: item.location.clone(),
            is_resolved: item.is_resolved,
            image: None,
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();

        if self.title.trim().is_empty() {
            errors.set("title", "Title is required");
        } else if self.title.trim().len() < 3 {
            errors.set("title", "Title must be at least 3 characters");
        }

        if self.description.trim().is_empty() {
            errors.set("description", "Description is required");
        } else if self.description.trim().len() < 10 {
            errors.set("description", "Description must be at least 10 characters");
        }

        if self.category_id.is_none() {
            errors.set("category", "Category is required");
        }

        if self.date_occurred.trim().is_empty() {
            errors.set("date_occurred", "Date is required");
        } else if parse_date(self.date_occurred.trim()).is_none() {
            errors.set("date_occurred", "Invalid date format");
        }

        if self.location.trim().is_empty() {
            errors.set("location", "Location is required");
        }

        errors.into_result()
    }

    /// Convert a validated draft into the wire payload.
    ///
    /// Returns `CoreError::Validation` if the draft was never validated;
    /// callers are expected to run [`validate`](Self::validate) first and
    /// keep the user on the form when it fails.
    fn to_payload(&self) -> Result<ItemPayload, CoreError> {
        let category_id = self.category_id.ok_or_else(|| CoreError::Validation {
            message: "Category is required".into(),
        })?;
        let date = parse_date(self.date_occurred.trim()).ok_or_else(|| CoreError::Validation {
            message: "Invalid date format".into(),
        })?;

        Ok(ItemPayload {
            title: self.title.trim().to_owned(),
            description: self.description.trim().to_owned(),
            item_type: self.item_type,
            category_id,
            date_occurred: date.format("%Y-%m-%dT%H:%M:%S").to_string(),
            location: self.location.trim().to_owned(),
            is_resolved: self.is_resolved,
            image: self.image.clone(),
        })
    }
}

fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    DATE_FORMATS.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(raw, fmt)
            .ok()
            .or_else(|| {
                // Bare dates carry no time component; midnight it is.
                chrono::NaiveDate::parse_from_str(raw, fmt)
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    })
}

/// Submit a draft as a new item. Validates first; on success returns the
/// created item so the caller can navigate to its detail view.
pub async fn submit_create(api: &ApiClient, draft: &ItemDraft) -> Result<Item, CoreError> {
    let payload = draft.to_payload()?;
    Ok(api.create_item(&payload).await?)
}

/// Submit a draft as an update to item `id`.
pub async fn submit_update(api: &ApiClient, id: i64, draft: &ItemDraft) -> Result<(), CoreError> {
    let payload = draft.to_payload()?;
    Ok(api.update_item(id, &payload).await?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn login_requires_both_fields() {
        let errors = LoginForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("username"), Some("Username is required"));
        assert_eq!(errors.get("password"), Some("Password is required"));

        let ok = LoginForm {
            username: "sam".into(),
            password: "hunter22".into(),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn register_collects_all_four_errors() {
        let form = RegisterForm {
            username: "ab".into(),
            email: "bad".into(),
            password: "123".into(),
            confirm_password: "1234".into(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(
            errors.get("username"),
            Some("Username must be at least 3 characters")
        );
        assert_eq!(errors.get("email"), Some("Email is invalid"));
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 6 characters")
        );
        assert_eq!(errors.get("confirm_password"), Some("Passwords do not match"));
    }

    #[test]
    fn register_accepts_a_sound_form() {
        let form = RegisterForm {
            username: "sam".into(),
            email: "sam@example.com".into(),
            password: "hunter22".into(),
            confirm_password: "hunter22".into(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn email_shape_check() {
        assert!(email_looks_valid("a@b.co"));
        assert!(email_looks_valid("first.last@sub.domain.org"));
        assert!(!email_looks_valid("bad"));
        assert!(!email_looks_valid("@b.co"));
        assert!(!email_looks_valid("a@b"));
        assert!(!email_looks_valid("a b@c.d"));
    }

    #[test]
    fn item_draft_minimums() {
        let draft = ItemDraft {
            title: "ab".into(),
            description: "too short".into(),
            category_id: None,
            date_occurred: String::new(),
            location: String::new(),
            ..ItemDraft::default()
        };
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.len(), 5);
        assert_eq!(errors.get("title"), Some("Title must be at least 3 characters"));
        assert_eq!(
            errors.get("description"),
            Some("Description must be at least 10 characters")
        );
        assert_eq!(errors.get("category"), Some("Category is required"));
        assert_eq!(errors.get("date_occurred"), Some("Date is required"));
        assert_eq!(errors.get("location"), Some("Location is required"));
    }

    #[test]
    fn item_draft_accepts_date_and_datetime_inputs() {
        let mut draft = ItemDraft {
            title: "Black wallet".into(),
            description: "Leather, two cards inside".into(),
            category_id: Some(3),
            date_occurred: "2024-06-14".into(),
            location: "Main library".into(),
            ..ItemDraft::default()
        };
        assert!(draft.validate().is_ok());

        draft.date_occurred = "2024-06-14T18:00".into();
        assert!(draft.validate().is_ok());

        draft.date_occurred = "14/06/2024".into();
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.get("date_occurred"), Some("Invalid date format"));
    }

    #[test]
    fn payload_normalizes_the_date() {
        let draft = ItemDraft {
            title: "Black wallet".into(),
            description: "Leather, two cards inside".into(),
            category_id: Some(3),
            date_occurred: "2024-06-14".into(),
            location: "Main library".into(),
            ..ItemDraft::default()
        };
        let payload = draft.to_payload().unwrap();
        assert_eq!(payload.date_occurred, "2024-06-14T00:00:00");
        assert_eq!(payload.category_id, 3);
    }
}
