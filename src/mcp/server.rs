use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;
use tokio::sync::RwLock;

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, Implementation, ListResourceTemplatesResult, ListResourcesResult,
        PaginatedRequestParams, ProtocolVersion, RawResource, RawResourceTemplate,
        ReadResourceRequestParams, ReadResourceResult, Resource, ResourceContents,
        ResourceTemplate, ServerCapabilities, ServerInfo,
    },
    schemars,
    service::RequestContext,
    tool, tool_handler, tool_router,
};

use crate::domain::booking::{BookingRequest, Quote};
use crate::domain::property::{
    self, Address, Capacity, Coordinates, Host, NewProperty, Property, PropertyFilter,
};
use crate::domain::stay::StayRange;
use crate::engine::BookingEngine;
use crate::error::StayError;
use crate::ports::property_catalog::PropertyCatalog;

// ---------- Resource Store ----------

/// Text snapshots of fetched data exposed as MCP resources.
/// Keys are URIs like `stays://property/p1`.
#[derive(Clone, Default)]
pub struct ResourceStore {
    entries: Arc<RwLock<HashMap<String, ResourceEntry>>>,
}

#[derive(Clone)]
struct ResourceEntry {
    name: String,
    text: String,
}

impl ResourceStore {
    async fn insert(&self, uri: impl Into<String>, name: impl Into<String>, text: String) {
        self.entries.write().await.insert(
            uri.into(),
            ResourceEntry {
                name: name.into(),
                text,
            },
        );
    }

    async fn remove(&self, uri: &str) {
        self.entries.write().await.remove(uri);
    }

    async fn get(&self, uri: &str) -> Option<ResourceEntry> {
        self.entries.read().await.get(uri).cloned()
    }

    async fn list(&self) -> Vec<(String, String)> {
        let mut all: Vec<_> = self
            .entries
            .read()
            .await
            .iter()
            .map(|(uri, entry)| (uri.clone(), entry.name.clone()))
            .collect();
        all.sort();
        all
    }
}

impl std::fmt::Debug for ResourceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceStore").finish()
    }
}

// ---------- Tool parameter types ----------

#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct ListPropertiesToolParams {
    /// Only return properties whose host is a superhost
    pub superhost_only: Option<bool>,
    /// Only return properties that sleep at least this many guests
    pub min_guests: Option<u32>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct FeaturedToolParams {
    /// Number of properties to return (1-20, default: 4)
    pub limit: Option<u32>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct PropertyToolParams {
    /// Property ID from stays_list_properties
    pub property_id: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct StayToolParams {
    /// Property ID
    pub property_id: String,
    /// Check-in date (YYYY-MM-DD)
    pub check_in: String,
    /// Check-out date (YYYY-MM-DD), must be after check-in
    pub check_out: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CreateBookingToolParams {
    /// ID of the user making the booking
    pub user_id: String,
    /// Property ID
    pub property_id: String,
    /// Check-in date (YYYY-MM-DD)
    pub check_in: String,
    /// Check-out date (YYYY-MM-DD), must be after check-in
    pub check_out: String,
    /// Number of guests, at most the property's guest capacity
    pub guests: u32,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct UserBookingsToolParams {
    /// User ID whose bookings to list
    pub user_id: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CancelBookingToolParams {
    /// Booking ID returned by stays_create_booking or stays_user_bookings
    pub booking_id: String,
}

#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct CreatePropertyToolParams {
    /// ID of the user listing the property
    pub host_id: String,
    /// Listing title
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Nightly price, must be positive
    pub price: f64,
    /// Maximum number of guests (at least 1)
    pub guests: u32,
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    /// Cover image URL
    #[serde(default)]
    pub image: String,
    /// Host display name shown on the listing
    #[serde(default)]
    pub host_name: String,
    #[serde(default)]
    pub host_image: String,
    /// Initial rating (0-5, default: 0)
    pub rating: Option<f64>,
    pub superhost: Option<bool>,
    /// Latitude, requires lng
    pub lat: Option<f64>,
    /// Longitude, requires lat
    pub lng: Option<f64>,
}

impl CreatePropertyToolParams {
    fn into_listing(self) -> crate::error::Result<NewProperty> {
        let coordinates = match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
            (None, None) => None,
            _ => {
                return Err(StayError::InvalidParams {
                    reason: "lat and lng must be given together".into(),
                });
            }
        };
        Ok(NewProperty {
            title: self.title.trim().to_string(),
            description: self.description,
            amenities: self.amenities,
            price: self.price,
            rating: self.rating.unwrap_or_default(),
            superhost: self.superhost.unwrap_or_default(),
            address: Address {
                street: self.street,
                zip_code: self.zip_code,
                city: self.city,
                country: self.country,
            },
            coordinates,
            capacity: Capacity {
                guest: self.guests,
                bedroom: self.bedrooms,
            },
            host: Host::normalized(&self.host_name, &self.host_image),
            image: self.image,
        })
    }
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct UpdateHostInfoToolParams {
    /// ID of the host whose listings to update
    pub host_id: String,
    /// New display name
    pub name: String,
    /// New profile image URL
    #[serde(default)]
    pub image: String,
}

fn failure(context: &str, e: &StayError) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!(
        "{context}: {} ({e})",
        e.user_message()
    ))])
}

fn require_id(value: &str, what: &str) -> crate::error::Result<()> {
    if value.trim().is_empty() {
        return Err(StayError::InvalidParams {
            reason: format!("{what} is required"),
        });
    }
    Ok(())
}

fn property_list_text(properties: &[Property]) -> String {
    if properties.is_empty() {
        return "No properties found.\n".into();
    }
    let mut text = String::new();
    let _ = writeln!(text, "Found {} properties:\n", properties.len());
    for (i, p) in properties.iter().enumerate() {
        let _ = write!(
            text,
            "{}. **{}** (ID: {})\n   {}\n   {:.2}/night | up to {} guests",
            i + 1,
            p.title,
            p.id,
            p.location(),
            p.price,
            p.capacity.guest,
        );
        if p.rating > 0.0 {
            let _ = write!(text, " | Rating: {:.1}", p.rating);
        }
        if p.superhost {
            let _ = write!(text, " | Superhost");
        }
        let _ = writeln!(text, "\n");
    }
    text
}

#[derive(Clone)]
pub struct StaysMcpServer {
    engine: Arc<BookingEngine>,
    catalog: Arc<dyn PropertyCatalog>,
    guarded_reservations: bool,
    tool_router: ToolRouter<Self>,
    resources: ResourceStore,
}

#[tool_router]
impl StaysMcpServer {
    pub fn new(
        engine: Arc<BookingEngine>,
        catalog: Arc<dyn PropertyCatalog>,
        guarded_reservations: bool,
    ) -> Self {
        Self {
            engine,
            catalog,
            guarded_reservations,
            tool_router: Self::tool_router(),
            resources: ResourceStore::default(),
        }
    }

    async fn require_property(&self, id: &str) -> crate::error::Result<Property> {
        require_id(id, "property_id")?;
        self.catalog
            .get_property(id)
            .await?
            .ok_or_else(|| StayError::NotFound {
                collection: "properties".into(),
                id: id.into(),
            })
    }

    /// Check availability and create the booking as two separate store calls.
    async fn check_then_create(
        &self,
        user_id: &str,
        request: &BookingRequest,
        property: &Property,
    ) -> crate::error::Result<String> {
        request.validate(property)?;
        let available = self
            .engine
            .check_availability(&request.property_id, request.check_in, request.check_out)
            .await?;
        if !available {
            return Err(StayError::Unavailable {
                property_id: request.property_id.clone(),
                check_in: request.check_in,
                check_out: request.check_out,
            });
        }
        self.engine.create_booking(user_id, request, property).await
    }

    /// List rental properties with optional filters.
    #[tool(
        name = "stays_list_properties",
        description = "List vacation-rental properties with nightly price, guest capacity, rating and location. Optional filters: superhost_only, min_guests. Use the returned IDs with the other stays_* tools.",
        annotations(read_only_hint = true, open_world_hint = false)
    )]
    async fn stays_list_properties(
        &self,
        Parameters(params): Parameters<ListPropertiesToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let filter = PropertyFilter {
            superhost_only: params.superhost_only.unwrap_or(false),
            min_guests: params.min_guests,
        };
        match self.catalog.list_properties().await {
            Ok(all) => {
                let text = property_list_text(&filter.apply(all));
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Err(e) => Ok(failure("Failed to list properties", &e)),
        }
    }

    /// Highest-rated properties.
    #[tool(
        name = "stays_featured_properties",
        description = "Get the highest-rated properties, best first. Optional limit (1-20, default 4).",
        annotations(read_only_hint = true, open_world_hint = false)
    )]
    async fn stays_featured_properties(
        &self,
        Parameters(params): Parameters<FeaturedToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let limit = params.limit.unwrap_or(4).clamp(1, 20) as usize;
        match self.catalog.list_properties().await {
            Ok(all) => {
                let text = property_list_text(&property::featured(all, limit));
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Err(e) => Ok(failure("Failed to load featured properties", &e)),
        }
    }

    /// Full details of one property.
    #[tool(
        name = "stays_property_details",
        description = "Get full details of a property: description, amenities, nightly price, guest and bedroom capacity, host and location.",
        annotations(read_only_hint = true, open_world_hint = false)
    )]
    async fn stays_property_details(
        &self,
        Parameters(params): Parameters<PropertyToolParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.require_property(&params.property_id).await {
            Ok(property) => {
                let text = property.to_string();
                let uri = format!("stays://property/{}", property.id);
                let name = format!("Property: {}", property.title);
                self.resources.insert(uri, name, text.clone()).await;
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Err(e) => Ok(failure(
                &format!("Failed to get property '{}'", params.property_id),
                &e,
            )),
        }
    }

    /// Whether a property is free for a stay.
    #[tool(
        name = "stays_check_availability",
        description = "Check whether a property is free between check_in and check_out (YYYY-MM-DD). Check-out day is not occupied, so a stay may start on another guest's check-out day.",
        annotations(read_only_hint = true, open_world_hint = false)
    )]
    async fn stays_check_availability(
        &self,
        Parameters(params): Parameters<StayToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            require_id(&params.property_id, "property_id")?;
            let stay = StayRange::parse(&params.check_in, &params.check_out)?;
            let available = self
                .engine
                .check_availability(&params.property_id, stay.check_in, stay.check_out)
                .await?;
            Ok::<_, StayError>((stay, available))
        }
        .await;

        match result {
            Ok((stay, true)) => Ok(CallToolResult::success(vec![Content::text(format!(
                "Property {} is available for {stay} ({} nights).",
                params.property_id,
                stay.nights()
            ))])),
            Ok((stay, false)) => Ok(CallToolResult::success(vec![Content::text(format!(
                "Property {} is NOT available for {stay}. Use stays_booked_dates to see reserved ranges.",
                params.property_id
            ))])),
            Err(e) => Ok(failure("Failed to check availability", &e)),
        }
    }

    /// Reserved date ranges for a property.
    #[tool(
        name = "stays_booked_dates",
        description = "List the date ranges already booked at a property (check-in to check-out). Useful for picking free dates.",
        annotations(read_only_hint = true, open_world_hint = false)
    )]
    async fn stays_booked_dates(
        &self,
        Parameters(params): Parameters<PropertyToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            require_id(&params.property_id, "property_id")?;
            self.engine.booked_date_ranges(&params.property_id).await
        }
        .await;

        match result {
            Ok(mut ranges) => {
                ranges.sort_by_key(|r| r.from);
                let mut text = String::new();
                if ranges.is_empty() {
                    let _ = writeln!(text, "No bookings for property {}.", params.property_id);
                } else {
                    let _ = writeln!(
                        text,
                        "Booked ranges for property {} ({}):",
                        params.property_id,
                        ranges.len()
                    );
                    for r in &ranges {
                        let _ = writeln!(text, "- {} → {}", r.from, r.to);
                    }
                }
                let uri = format!("stays://property/{}/booked", params.property_id);
                let name = format!("Booked dates: property {}", params.property_id);
                self.resources.insert(uri, name, text.clone()).await;
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Err(e) => Ok(failure("Failed to load booked dates", &e)),
        }
    }

    /// Price a stay without booking it.
    #[tool(
        name = "stays_quote",
        description = "Price a stay at a property: number of nights, nightly rate and total. Does not reserve anything.",
        annotations(read_only_hint = true, open_world_hint = false)
    )]
    async fn stays_quote(
        &self,
        Parameters(params): Parameters<StayToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            let stay = StayRange::parse(&params.check_in, &params.check_out)?;
            let property = self.require_property(&params.property_id).await?;
            let request = BookingRequest {
                property_id: property.id.clone(),
                check_in: stay.check_in,
                check_out: stay.check_out,
                guests: 1,
            };
            let quote = BookingEngine::quote(&request, &property)?;
            Ok::<_, StayError>((property, stay, quote))
        }
        .await;

        match result {
            Ok((property, stay, quote)) => Ok(CallToolResult::success(vec![Content::text(
                format!("{} for {stay}: {quote}", property.title),
            )])),
            Err(e) => Ok(failure("Failed to price stay", &e)),
        }
    }

    /// Book a property.
    #[tool(
        name = "stays_create_booking",
        description = "Book a property for a user. Validates the dates and guest count, checks availability, then stores the booking with the nightly price snapshotted. Returns the booking ID.",
        annotations(read_only_hint = false, destructive_hint = false, open_world_hint = false)
    )]
    async fn stays_create_booking(
        &self,
        Parameters(params): Parameters<CreateBookingToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            require_id(&params.user_id, "user_id")?;
            let stay = StayRange::parse(&params.check_in, &params.check_out)?;
            let property = self.require_property(&params.property_id).await?;
            let request = BookingRequest {
                property_id: property.id.clone(),
                check_in: stay.check_in,
                check_out: stay.check_out,
                guests: params.guests,
            };
            let id = if self.guarded_reservations {
                self.engine
                    .reserve(&params.user_id, &request, &property)
                    .await?
            } else {
                self.check_then_create(&params.user_id, &request, &property)
                    .await?
            };
            Ok::<_, StayError>((id, stay, property))
        }
        .await;

        let (id, stay, property) = match result {
            Ok(created) => created,
            Err(e) => return Ok(failure("Booking failed", &e)),
        };

        self.resources
            .remove(&format!("stays://property/{}/booked", property.id))
            .await;
        self.resources
            .remove(&format!("stays://user/{}/bookings", params.user_id))
            .await;

        // The booking is stored; a failed read-back only degrades the confirmation.
        let details = match self.engine.get_booking(&id).await {
            Ok(booking) => booking.to_string(),
            Err(e) => {
                tracing::warn!(
                    booking_id = %id,
                    error = %e,
                    "booking stored but read-back failed"
                );
                format!(
                    "{id} | {} | {stay} | {} guests | {}",
                    property.title,
                    params.guests,
                    Quote::for_stay(&stay, &property)
                )
            }
        };
        Ok(CallToolResult::success(vec![Content::text(format!(
            "Booking confirmed.\n{details}"
        ))]))
    }

    /// A user's bookings, latest first.
    #[tool(
        name = "stays_user_bookings",
        description = "List a user's bookings ordered by check-in date, latest first, with nights, nightly price and total.",
        annotations(read_only_hint = true, open_world_hint = false)
    )]
    async fn stays_user_bookings(
        &self,
        Parameters(params): Parameters<UserBookingsToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            require_id(&params.user_id, "user_id")?;
            self.engine.user_bookings(&params.user_id).await
        }
        .await;

        match result {
            Ok(bookings) => {
                let mut text = String::new();
                if bookings.is_empty() {
                    let _ = writeln!(text, "User {} has no bookings.", params.user_id);
                } else {
                    let _ = writeln!(
                        text,
                        "{} bookings for user {}:\n",
                        bookings.len(),
                        params.user_id
                    );
                    for (i, b) in bookings.iter().enumerate() {
                        let _ = writeln!(text, "{}. {b}", i + 1);
                    }
                }
                let uri = format!("stays://user/{}/bookings", params.user_id);
                let name = format!("Bookings: user {}", params.user_id);
                self.resources.insert(uri, name, text.clone()).await;
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Err(e) => Ok(failure("Failed to load bookings", &e)),
        }
    }

    /// Cancel (delete) a booking.
    #[tool(
        name = "stays_cancel_booking",
        description = "Cancel a booking by ID. The booking is deleted permanently and its dates become available again.",
        annotations(read_only_hint = false, destructive_hint = true, open_world_hint = false)
    )]
    async fn stays_cancel_booking(
        &self,
        Parameters(params): Parameters<CancelBookingToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            require_id(&params.booking_id, "booking_id")?;
            let existing = match self.engine.get_booking(&params.booking_id).await {
                Ok(booking) => Some(booking),
                Err(StayError::NotFound { .. }) => None,
                Err(e) => return Err(e),
            };
            self.engine.cancel_booking(&params.booking_id).await?;
            Ok::<_, StayError>(existing)
        }
        .await;

        match result {
            Ok(existing) => {
                if let Some(booking) = existing {
                    self.resources
                        .remove(&format!("stays://property/{}/booked", booking.property_id))
                        .await;
                    self.resources
                        .remove(&format!("stays://user/{}/bookings", booking.user_id))
                        .await;
                }
                Ok(CallToolResult::success(vec![Content::text(format!(
                    "Booking {} cancelled.",
                    params.booking_id
                ))]))
            }
            Err(e) => Ok(failure("Failed to cancel booking", &e)),
        }
    }

    /// List a new property.
    #[tool(
        name = "stays_create_property",
        description = "List a new property owned by a host. Requires a title, a positive nightly price and room for at least one guest. The host name is stored trimmed and lowercased. Returns the property ID.",
        annotations(read_only_hint = false, destructive_hint = false, open_world_hint = false)
    )]
    async fn stays_create_property(
        &self,
        Parameters(params): Parameters<CreatePropertyToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            require_id(&params.host_id, "host_id")?;
            let host_id = params.host_id.clone();
            let listing = params.into_listing()?;
            listing.validate()?;
            let title = listing.title.clone();
            let id = self.catalog.create_property(&host_id, listing).await?;
            Ok::<_, StayError>((id, title))
        }
        .await;

        match result {
            Ok((id, title)) => Ok(CallToolResult::success(vec![Content::text(format!(
                "Property created: **{title}** (ID: {id})"
            ))])),
            Err(e) => Ok(failure("Failed to create property", &e)),
        }
    }

    /// Rewrite the host card on every property a host owns.
    #[tool(
        name = "stays_update_host_info",
        description = "Update the host name and image shown on every property owned by a host. Returns how many properties were updated.",
        annotations(read_only_hint = false, destructive_hint = false, open_world_hint = false)
    )]
    async fn stays_update_host_info(
        &self,
        Parameters(params): Parameters<UpdateHostInfoToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = async {
            require_id(&params.host_id, "host_id")?;
            require_id(&params.name, "name")?;
            let host = Host::normalized(&params.name, &params.image);
            self.catalog.update_host_info(&params.host_id, &host).await
        }
        .await;

        match result {
            Ok(updated) => {
                for id in &updated {
                    self.resources.remove(&format!("stays://property/{id}")).await;
                }
                Ok(CallToolResult::success(vec![Content::text(format!(
                    "Updated host info on {} properties for host {}.",
                    updated.len(),
                    params.host_id
                ))]))
            }
            Err(e) => Ok(failure("Failed to update host info", &e)),
        }
    }
}

#[tool_handler]
impl ServerHandler for StaysMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Vacation-rental MCP server for browsing properties and managing bookings.\n\
                 \n\
                 ## Catalog\n\
                 - stays_list_properties: all properties, optionally superhost-only or by guest count\n\
                 - stays_featured_properties: highest-rated properties\n\
                 - stays_property_details: description, amenities, capacity, host\n\
                 \n\
                 ## Availability\n\
                 - stays_check_availability: is a property free for given dates\n\
                 - stays_booked_dates: ranges already reserved at a property\n\
                 - stays_quote: nights x nightly rate for a stay\n\
                 \n\
                 ## Bookings\n\
                 - stays_create_booking: book a property for a user\n\
                 - stays_user_bookings: a user's bookings, latest check-in first\n\
                 - stays_cancel_booking: delete a booking\n\
                 \n\
                 ## Hosting\n\
                 - stays_create_property: list a new property for a host\n\
                 - stays_update_host_info: rewrite the host name and image on a host's properties\n\
                 \n\
                 ## Tips\n\
                 - Dates are YYYY-MM-DD. Stays are check-in inclusive, check-out exclusive, so \
                 a new stay may start on the day another one ends.\n\
                 - Prices are snapshotted when a booking is created."
                    .into(),
            ),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        let entries = self.resources.list().await;
        let resources: Vec<Resource> = entries
            .into_iter()
            .map(|(uri, name)| Resource {
                annotations: None,
                raw: RawResource {
                    uri,
                    name,
                    title: None,
                    description: None,
                    mime_type: Some("text/plain".into()),
                    size: None,
                    icons: None,
                    meta: None,
                },
            })
            .collect();
        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
            meta: None,
        })
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        let template = |uri: &str, name: &str, title: &str, description: &str| ResourceTemplate {
            annotations: None,
            raw: RawResourceTemplate {
                uri_template: uri.into(),
                name: name.into(),
                title: Some(title.into()),
                description: Some(description.into()),
                mime_type: Some("text/plain".into()),
                icons: None,
            },
        };
        let templates = vec![
            template(
                "stays://property/{id}",
                "Property",
                "Property details",
                "Full property details (fetched via stays_property_details)",
            ),
            template(
                "stays://property/{id}/booked",
                "Booked Dates",
                "Booked date ranges",
                "Reserved ranges of a property (fetched via stays_booked_dates)",
            ),
            template(
                "stays://user/{id}/bookings",
                "User Bookings",
                "Bookings of a user",
                "A user's bookings (fetched via stays_user_bookings)",
            ),
        ];
        Ok(ListResourceTemplatesResult {
            resource_templates: templates,
            next_cursor: None,
            meta: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        match self.resources.get(&request.uri).await {
            Some(entry) => Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(entry.text, request.uri)],
            }),
            None => Err(McpError::resource_not_found(
                format!("resource not found: {}", request.uri),
                None,
            )),
        }
    }
}
