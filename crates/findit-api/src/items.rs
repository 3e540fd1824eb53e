// Item endpoints
//
// Listing (global and owner-scoped), single-item reads, multipart
// create/update, delete, and the category list. Listing results are
// returned verbatim in server order -- no client-side re-sorting.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::filter::FilterSpec;
use crate::models::{CategoriesEnvelope, Category, Item, ItemEnvelope, ItemsEnvelope, ItemType};

/// An image to attach to an item create/update request.
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Fields for a multipart item create/update request.
///
/// `item_type` is only sent on create (the server fixes it afterwards);
/// `is_resolved` is only sent on update.
#[derive(Debug, Clone)]
pub struct ItemPayload {
    pub title: String,
    pub description: String,
    pub item_type: ItemType,
    pub category_id: i64,
    /// ISO-8601 date or datetime string, passed through to the server.
    pub date_occurred: String,
    pub location: String,
    pub is_resolved: bool,
    pub image: Option<ImageAttachment>,
}

impl ItemPayload {
    /// Build the multipart form for this payload.
    fn to_form(&self, include_type: bool, include_resolved: bool) -> reqwest::multipart::Form {
        let mut form = reqwest::multipart::Form::new()
            .text("title", self.title.clone())
            .text("description", self.description.clone())
            .text("category_id", self.category_id.to_string())
            .text("date_occurred", self.date_occurred.clone())
            .text("location", self.location.clone());

        if include_type {
            form = form.text("item_type", self.item_type.to_string());
        }
        if include_resolved {
            form = form.text("is_resolved", self.is_resolved.to_string());
        }
        if let Some(ref image) = self.image {
            form = form.part(
                "image",
                reqwest::multipart::Part::bytes(image.bytes.clone())
                    .file_name(image.filename.clone()),
            );
        }
        form
    }
}

impl ApiClient {
    /// Fetch the global listing, filtered server-side.
    pub async fn list_items(&self, filter: &FilterSpec) -> Result<Vec<Item>, Error> {
        let url = self.api_url("items")?;
        let envelope: ItemsEnvelope = self.get(url, &filter.query_pairs()).await?;
        Ok(envelope.items)
    }

    /// Fetch the current user's own listings (credentialed).
    pub async fn list_my_items(&self, filter: &FilterSpec) -> Result<Vec<Item>, Error> {
        let url = self.api_url("items/mine")?;
        let envelope: ItemsEnvelope = self.get(url, &filter.query_pairs()).await?;
        Ok(envelope.items)
    }

    /// Fetch a single item by id.
    pub async fn get_item(&self, id: i64) -> Result<Item, Error> {
        let url = self.api_url(&format!("items/{id}"))?;
        let envelope: ItemEnvelope = self.get(url, &[]).await?;
        Ok(envelope.item)
    }

    /// Create a new item from a multipart payload (optional image part).
    pub async fn create_item(&self, payload: &ItemPayload) -> Result<Item, Error> {
        let url = self.api_url("items")?;
        debug!(title = %payload.title, "creating item");
        let envelope: ItemEnvelope = self
            .post_multipart(url, payload.to_form(true, false))
            .await?;
        Ok(envelope.item)
    }

    /// Update an existing item from a multipart payload.
    ///
    /// The update endpoint returns an empty body on success, so callers
    /// navigate by the id they already hold.
    pub async fn update_item(&self, id: i64, payload: &ItemPayload) -> Result<(), Error> {
        let url = self.api_url(&format!("items/{id}"))?;
        debug!(id, title = %payload.title, "updating item");
        let _: serde_json::Value = self
            .put_multipart(url, payload.to_form(false, true))
            .await?;
        Ok(())
    }

    /// Remove an item.
    pub async fn delete_item(&self, id: i64) -> Result<(), Error> {
        let url = self.api_url(&format!("items/{id}"))?;
        debug!(id, "deleting item");
        let _: serde_json::Value = self.delete(url).await?;
        Ok(())
    }

    /// Fetch the category list for the filter bar and the item forms.
    pub async fn list_categories(&self) -> Result<Vec<Category>, Error> {
        let url = self.api_url("items/categories")?;
        let envelope: CategoriesEnvelope = self.get(url, &[]).await?;
        Ok(envelope.categories)
    }
}
