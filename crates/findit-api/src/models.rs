// Typed entities decoded from FindIt API responses.
//
// Every payload passes through these structs at the client boundary --
// callers never see raw `serde_json::Value`s. The backend serializes
// timestamps as bare ISO-8601 (no offset), so datetime fields go through
// the tolerant `iso_datetime` codec below.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An authenticated account as returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(with = "iso_datetime")]
    pub created_at: DateTime<Utc>,
}

/// Result of the session bootstrap check (`GET /api/auth/check-auth`).
#[derive(Debug, Clone, Deserialize)]
pub struct AuthCheck {
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<UserRecord>,
}

/// A listing category (e.g. "Electronics", "Keys").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Whether an item was lost by its poster or found by them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ItemType {
    Lost,
    Found,
}

/// A lost-and-found listing, exactly as the server returns it.
///
/// `category` is nullable server-side (orphaned rows keep working),
/// and `image_url` is a server-relative path when an image exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub uuid: Uuid,
    pub title: String,
    pub description: String,
    pub item_type: ItemType,
    #[serde(with = "iso_datetime")]
    pub date_posted: DateTime<Utc>,
    #[serde(with = "iso_datetime")]
    pub date_occurred: DateTime<Utc>,
    pub location: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_resolved: bool,
    #[serde(default)]
    pub category: Option<Category>,
    pub user_id: i64,
}

// ── Response envelopes ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct UserEnvelope {
    pub user: UserRecord,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ItemEnvelope {
    pub item: Item,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ItemsEnvelope {
    pub items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoriesEnvelope {
    pub categories: Vec<Category>,
}

/// Error body shape used by every endpoint: `{"error": "..."}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: Option<String>,
}

// ── Datetime codec ──────────────────────────────────────────────────

/// Accepts both RFC 3339 and the backend's naive `isoformat()` strings
/// (no UTC offset); naive values are taken as UTC. Serializes as RFC 3339.
mod iso_datetime {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&dt.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(de)?;
        if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|_| de::Error::custom(format!("unrecognized datetime: {raw:?}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn user_decodes_naive_created_at() {
        let user: UserRecord = serde_json::from_str(
            r#"{"id":1,"username":"sam","email":"sam@example.com","is_admin":false,
                "created_at":"2024-06-15T10:30:00.123456"}"#,
        )
        .unwrap();
        assert_eq!(user.username, "sam");
        assert!(!user.is_admin);
    }

    #[test]
    fn item_decodes_with_null_category_and_image() {
        let item: Item = serde_json::from_str(
            r#"{"id":4,"uuid":"4f9f1f6a-54b2-4b07-9c3b-0f2a4d9f8b11",
                "title":"Black wallet","description":"Leather, two cards inside",
                "item_type":"lost","date_posted":"2024-06-15T10:30:00",
                "date_occurred":"2024-06-14T18:00:00","location":"Main library",
                "image_url":null,"is_resolved":false,"category":null,"user_id":2}"#,
        )
        .unwrap();
        assert_eq!(item.item_type, ItemType::Lost);
        assert!(item.category.is_none());
        assert!(item.image_url.is_none());
    }

    #[test]
    fn item_type_round_trips_as_lowercase() {
        assert_eq!(serde_json::to_string(&ItemType::Found).unwrap(), "\"found\"");
        assert_eq!(ItemType::Lost.to_string(), "lost");
    }
}
