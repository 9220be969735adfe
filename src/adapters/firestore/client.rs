use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::{Value, json};
use tracing::{debug, trace};
use url::Url;
use uuid::Uuid;

use super::document::{self, booking_from_document, property_from_document};
use super::value;
use crate::config::types::StoreConfig;
use crate::domain::booking::{Booking, NewBooking};
use crate::domain::property::{Host, NewProperty, Property};
use crate::error::{Result, StayError};
use crate::ports::booking_store::BookingStore;
use crate::ports::property_catalog::PropertyCatalog;

const BOOKINGS: &str = "bookings";
const PROPERTIES: &str = "properties";
/// Firestore's cap on writes in a single commit.
const MAX_COMMIT_WRITES: usize = 500;

/// Firestore over its REST API.
///
/// Most methods are a single HTTP round-trip. Property listing follows page
/// tokens and the host fan-out queries before it commits. Nothing is retried;
/// failures surface as [`StayError`].
pub struct FirestoreClient {
    http: Client,
    base: Url,
    project_id: String,
    database: String,
    api_key: Option<String>,
    auth_token: Option<String>,
    page_size: u32,
}

impl FirestoreClient {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        if config.project_id.trim().is_empty() {
            return Err(StayError::Config(
                "store.project_id is required for the firestore backend".into(),
            ));
        }
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        let base = Url::parse(&config.base_url)?;
        if base.cannot_be_a_base() {
            return Err(StayError::Config(format!(
                "store.base_url '{}' cannot be used as a base URL",
                config.base_url
            )));
        }

        Ok(Self {
            http,
            base,
            project_id: config.project_id.clone(),
            database: config.database.clone(),
            api_key: config.api_key.clone(),
            auth_token: config.auth_token.clone(),
            page_size: config.page_size.max(1),
        })
    }

    /// Resource name of a document, as used inside request bodies.
    fn document_name(&self, collection: &str, id: &str) -> String {
        format!(
            "projects/{}/databases/{}/documents/{collection}/{id}",
            self.project_id, self.database
        )
    }

    /// Apply writes atomically through `documents:commit`.
    async fn commit(&self, writes: Vec<Value>, operation: &str) -> Result<()> {
        let url = self.url(&["documents:commit"])?;
        let req = self
            .request(Method::POST, url)
            .json(&json!({ "writes": writes }));
        self.send(req, operation)
            .await?
            .ok_or_else(|| StayError::Store {
                status: 404,
                message: format!("{operation}: database {} not found", self.database),
            })?;
        Ok(())
    }

    /// `{base}/projects/{p}/databases/{d}/{tail...}` with each segment escaped.
    fn url(&self, tail: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| StayError::Config("store.base_url cannot be a base".into()))?
            .pop_if_empty()
            .extend(["projects", self.project_id.as_str(), "databases", self.database.as_str()])
            .extend(tail);
        Ok(url)
    }

    fn request(&self, method: Method, mut url: Url) -> RequestBuilder {
        if let Some(ref key) = self.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        let mut req = self
            .http
            .request(method, url)
            .header("Accept", "application/json");
        if let Some(ref token) = self.auth_token {
            req = req.bearer_auth(token);
        }
        req
    }

    /// Send a request and decode the JSON body. `Ok(None)` means HTTP 404.
    async fn send(&self, req: RequestBuilder, operation: &str) -> Result<Option<Value>> {
        let response = req.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(operation, status = status.as_u16(), body_len = body.len(), "firestore response");
        trace!(operation, body = %body, "firestore raw response");

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let message = error_message(&body).unwrap_or_else(|| format!("{operation} failed"));
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    StayError::PermissionDenied { message }
                }
                _ => StayError::Store {
                    status: status.as_u16(),
                    message,
                },
            });
        }
        if body.trim().is_empty() {
            return Ok(Some(Value::Null));
        }
        Ok(Some(serde_json::from_str(&body)?))
    }

    /// Equality query on one string field of a collection.
    async fn query_eq(&self, collection: &str, field: &str, equals: &str) -> Result<Vec<Value>> {
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": field },
                        "op": "EQUAL",
                        "value": value::string(equals),
                    }
                }
            }
        });
        let url = self.url(&["documents:runQuery"])?;
        let req = self.request(Method::POST, url).json(&body);
        let rows = self
            .send(req, "runQuery")
            .await?
            .ok_or_else(|| StayError::NotFound {
                collection: collection.into(),
                id: format!("{field} == {equals}"),
            })?;

        // Each row carries a `document` unless it is a bare progress marker
        // with only `readTime`.
        let docs = rows
            .as_array()
            .map(|rows| {
                rows.iter()
                    .filter_map(|row| row.get("document").cloned())
                    .collect()
            })
            .unwrap_or_default();
        Ok(docs)
    }

    async fn query_bookings(&self, field: &str, equals: &str) -> Result<Vec<Booking>> {
        let docs = self.query_eq(BOOKINGS, field, equals).await?;
        debug!(field, equals, count = docs.len(), "bookings query");
        docs.iter().map(booking_from_document).collect()
    }
}

fn error_message(body: &str) -> Option<String> {
    let v: Value = serde_json::from_str(body).ok()?;
    // runQuery wraps errors in a one-element array
    let err = v
        .get("error")
        .or_else(|| v.get(0).and_then(|first| first.get("error")))?;
    err.get("message")?.as_str().map(str::to_string)
}

#[async_trait]
impl BookingStore for FirestoreClient {
    async fn insert_booking(&self, booking: NewBooking) -> Result<String> {
        // Client-side id so the create and the createdAt stamp share one commit.
        let id = Uuid::new_v4().simple().to_string();
        let name = self.document_name(BOOKINGS, &id);
        let write = document::booking_create_write(&name, &booking);
        self.commit(vec![write], "createBooking").await?;
        Ok(id)
    }

    async fn bookings_for_property(&self, property_id: &str) -> Result<Vec<Booking>> {
        self.query_bookings("propertyId", property_id).await
    }

    async fn bookings_for_user(&self, user_id: &str) -> Result<Vec<Booking>> {
        self.query_bookings("userId", user_id).await
    }

    async fn get_booking(&self, id: &str) -> Result<Option<Booking>> {
        let url = self.url(&["documents", BOOKINGS, id])?;
        let req = self.request(Method::GET, url);
        self.send(req, "getDocument")
            .await?
            .map(|doc| booking_from_document(&doc))
            .transpose()
    }

    async fn delete_booking(&self, id: &str) -> Result<()> {
        let url = self.url(&["documents", BOOKINGS, id])?;
        let req = self.request(Method::DELETE, url);
        self.send(req, "deleteDocument").await?;
        Ok(())
    }
}

#[async_trait]
impl PropertyCatalog for FirestoreClient {
    async fn list_properties(&self) -> Result<Vec<Property>> {
        let mut properties = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut url = self.url(&["documents", PROPERTIES])?;
            {
                let mut q = url.query_pairs_mut();
                q.append_pair("pageSize", &self.page_size.to_string());
                if let Some(ref token) = page_token {
                    q.append_pair("pageToken", token);
                }
            }
            let req = self.request(Method::GET, url);
            let Some(page) = self.send(req, "listDocuments").await? else {
                break;
            };
            if let Some(docs) = page.get("documents").and_then(Value::as_array) {
                for doc in docs {
                    properties.push(property_from_document(doc)?);
                }
            }
            page_token = page
                .get("nextPageToken")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
                .map(str::to_string);
            if page_token.is_none() {
                break;
            }
        }
        debug!(count = properties.len(), "properties listed");
        Ok(properties)
    }

    async fn get_property(&self, id: &str) -> Result<Option<Property>> {
        let url = self.url(&["documents", PROPERTIES, id])?;
        let req = self.request(Method::GET, url);
        self.send(req, "getDocument")
            .await?
            .map(|doc| property_from_document(&doc))
            .transpose()
    }

    async fn create_property(&self, host_id: &str, listing: NewProperty) -> Result<String> {
        let url = self.url(&["documents", PROPERTIES])?;
        let body = json!({ "fields": document::property_fields(host_id, &listing) });
        let req = self.request(Method::POST, url).json(&body);
        let created = self
            .send(req, "createDocument")
            .await?
            .ok_or_else(|| StayError::Store {
                status: 404,
                message: format!("database {} not found", self.database),
            })?;
        let name = created
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| StayError::Decode {
                reason: "created document has no name".into(),
            })?;
        Ok(document::document_id(name).to_string())
    }

    async fn update_host_info(&self, host_id: &str, host: &Host) -> Result<Vec<String>> {
        let docs = self.query_eq(PROPERTIES, "hostId", host_id).await?;
        let ids: Vec<String> = docs
            .iter()
            .filter_map(|doc| doc.get("name").and_then(Value::as_str))
            .map(|name| document::document_id(name).to_string())
            .collect();

        for chunk in ids.chunks(MAX_COMMIT_WRITES) {
            let writes = chunk
                .iter()
                .map(|id| document::host_update_write(&self.document_name(PROPERTIES, id), host))
                .collect();
            self.commit(writes, "updateHostInfo").await?;
        }
        debug!(host_id, count = ids.len(), "host info written to properties");
        Ok(ids)
    }
}
