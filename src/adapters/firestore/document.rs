//! Mapping between Firestore documents and domain records.
//!
//! Decoding is lenient in the same way the web client always was: a missing
//! string is empty, a missing number is zero. Only the stay dates are
//! mandatory on a booking, since overlap checks are meaningless without them.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};

use super::value;
use crate::domain::booking::{Booking, NewBooking};
use crate::domain::property::{Address, Capacity, Coordinates, Host, NewProperty, Property};
use crate::error::{Result, StayError};

/// Last path segment of a document `name`
/// (`projects/p/databases/d/documents/bookings/abc` → `abc`).
pub fn document_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

fn fields(doc: &Value) -> Result<&Map<String, Value>> {
    match doc.get("fields") {
        Some(f) => f.as_object().ok_or_else(|| StayError::Decode {
            reason: "document `fields` is not an object".into(),
        }),
        None => Ok(empty_fields()),
    }
}

fn empty_fields() -> &'static Map<String, Value> {
    static EMPTY: std::sync::OnceLock<Map<String, Value>> = std::sync::OnceLock::new();
    EMPTY.get_or_init(Map::new)
}

fn name(doc: &Value) -> Result<&str> {
    doc.get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| StayError::Decode {
            reason: "document has no `name`".into(),
        })
}

fn str_field(fields: &Map<String, Value>, key: &str) -> String {
    fields.get(key).and_then(value::as_string).unwrap_or_default()
}

fn f64_field(fields: &Map<String, Value>, key: &str) -> f64 {
    fields.get(key).and_then(value::as_f64).unwrap_or_default()
}

fn u32_field(fields: &Map<String, Value>, key: &str) -> u32 {
    fields
        .get(key)
        .and_then(value::as_i64)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or_default()
}

fn string_list(fields: &Map<String, Value>, key: &str) -> Vec<String> {
    fields
        .get(key)
        .and_then(value::as_array)
        .map(|vals| vals.into_iter().filter_map(value::as_string).collect())
        .unwrap_or_default()
}

/// `fields` payload for a new booking document.
pub fn booking_fields(booking: &NewBooking) -> Value {
    let mut f = Map::new();
    f.insert("userId".into(), value::string(&booking.user_id));
    f.insert("propertyId".into(), value::string(&booking.property_id));
    f.insert("propertyTitle".into(), value::string(&booking.property_title));
    f.insert("propertyImage".into(), value::string(&booking.property_image));
    f.insert("checkIn".into(), value::date(booking.check_in));
    f.insert("checkOut".into(), value::date(booking.check_out));
    f.insert("guests".into(), value::integer(i64::from(booking.guests)));
    f.insert("nights".into(), value::integer(booking.nights));
    f.insert("pricePerNight".into(), value::double(booking.price_per_night));
    f.insert("totalPrice".into(), value::double(booking.total_price));
    Value::Object(f)
}

/// A `:commit` write creating booking `name` with `createdAt` stamped by the
/// server. Fails if a document with that name already exists.
pub fn booking_create_write(name: &str, booking: &NewBooking) -> Value {
    json!({
        "update": { "name": name, "fields": booking_fields(booking) },
        "currentDocument": { "exists": false },
        "updateTransforms": [
            { "fieldPath": "createdAt", "setToServerValue": "REQUEST_TIME" }
        ]
    })
}

pub fn host_value(host: &Host) -> Value {
    let mut f = Map::new();
    f.insert("name".into(), value::string(&host.name));
    f.insert("image".into(), value::string(&host.image));
    value::map(f)
}

/// A `:commit` write replacing only the `host` map of an existing property.
pub fn host_update_write(name: &str, host: &Host) -> Value {
    json!({
        "update": { "name": name, "fields": { "host": host_value(host) } },
        "updateMask": { "fieldPaths": ["host"] },
        "currentDocument": { "exists": true }
    })
}

/// `fields` payload for a new property document owned by `host_id`.
pub fn property_fields(host_id: &str, listing: &NewProperty) -> Value {
    let mut address = Map::new();
    address.insert("street".into(), value::string(&listing.address.street));
    address.insert("zipCode".into(), value::string(&listing.address.zip_code));
    address.insert("city".into(), value::string(&listing.address.city));
    address.insert("country".into(), value::string(&listing.address.country));

    let mut capacity = Map::new();
    capacity.insert("guest".into(), value::integer(i64::from(listing.capacity.guest)));
    capacity.insert("bedroom".into(), value::integer(i64::from(listing.capacity.bedroom)));

    let mut f = Map::new();
    f.insert("hostId".into(), value::string(host_id));
    f.insert("title".into(), value::string(&listing.title));
    f.insert("description".into(), value::string(&listing.description));
    f.insert("price".into(), value::double(listing.price));
    f.insert("rating".into(), value::double(listing.rating));
    f.insert("superhost".into(), value::boolean(listing.superhost));
    f.insert("image".into(), value::string(&listing.image));
    f.insert("address".into(), value::map(address));
    f.insert(
        "amenities".into(),
        value::array(listing.amenities.iter().map(|a| value::string(a)).collect()),
    );
    f.insert("capacity".into(), value::map(capacity));
    f.insert("host".into(), host_value(&listing.host));
    if let Some(c) = listing.coordinates {
        let mut coordinates = Map::new();
        coordinates.insert("lat".into(), value::double(c.lat));
        coordinates.insert("lng".into(), value::double(c.lng));
        f.insert("coordinates".into(), value::map(coordinates));
    }
    Value::Object(f)
}

/// Decode a booking document. `createdAt` falls back to the document's
/// server-side `createTime` when the field was never written.
pub fn booking_from_document(doc: &Value) -> Result<Booking> {
    let id = document_id(name(doc)?).to_string();
    let f = fields(doc)?;

    let date = |key: &str| {
        f.get(key)
            .and_then(value::as_date)
            .ok_or_else(|| StayError::Decode {
                reason: format!("booking {id} has no valid `{key}`"),
            })
    };
    let check_in = date("checkIn")?;
    let check_out = date("checkOut")?;

    let created_at = f
        .get("createdAt")
        .and_then(value::as_timestamp)
        .or_else(|| create_time(doc))
        .ok_or_else(|| StayError::Decode {
            reason: format!("booking {id} has no creation time"),
        })?;

    Ok(Booking {
        user_id: str_field(f, "userId"),
        property_id: str_field(f, "propertyId"),
        property_title: str_field(f, "propertyTitle"),
        property_image: str_field(f, "propertyImage"),
        check_in,
        check_out,
        guests: u32_field(f, "guests"),
        nights: f.get("nights").and_then(value::as_i64).unwrap_or_default(),
        price_per_night: f64_field(f, "pricePerNight"),
        total_price: f64_field(f, "totalPrice"),
        created_at,
        id,
    })
}

pub fn create_time(doc: &Value) -> Option<DateTime<Utc>> {
    let raw = doc.get("createTime")?.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

pub fn property_from_document(doc: &Value) -> Result<Property> {
    let id = document_id(name(doc)?).to_string();
    let f = fields(doc)?;

    let nested = |key: &str| f.get(key).and_then(value::as_map).unwrap_or(empty_fields());
    let address = nested("address");
    let capacity = nested("capacity");
    let host = nested("host");

    let coordinates = f.get("coordinates").and_then(value::as_map).and_then(|c| {
        let lat = c.get("lat").and_then(value::as_f64)?;
        let lng = c.get("lng").and_then(value::as_f64)?;
        Some(Coordinates { lat, lng })
    });

    Ok(Property {
        host_id: str_field(f, "hostId"),
        title: str_field(f, "title"),
        description: str_field(f, "description"),
        amenities: string_list(f, "amenities"),
        price: f64_field(f, "price"),
        rating: f64_field(f, "rating"),
        superhost: f.get("superhost").and_then(value::as_bool).unwrap_or(false),
        address: Address {
            street: str_field(address, "street"),
            zip_code: str_field(address, "zipCode"),
            city: str_field(address, "city"),
            country: str_field(address, "country"),
        },
        coordinates,
        capacity: Capacity {
            guest: u32_field(capacity, "guest"),
            bedroom: u32_field(capacity, "bedroom"),
        },
        host: Host {
            name: str_field(host, "name"),
            image: str_field(host, "image"),
        },
        image: str_field(f, "image"),
        images: string_list(f, "images"),
        id,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::test_helpers::d;

    fn booking_doc() -> Value {
        json!({
            "name": "projects/demo/databases/(default)/documents/bookings/abc123",
            "createTime": "2024-05-20T10:00:00.000000Z",
            "fields": {
                "userId": {"stringValue": "u1"},
                "propertyId": {"stringValue": "p1"},
                "propertyTitle": {"stringValue": "Loft"},
                "propertyImage": {"stringValue": "https://img/loft.jpg"},
                "checkIn": {"timestampValue": "2024-06-01T00:00:00Z"},
                "checkOut": {"timestampValue": "2024-06-05T00:00:00Z"},
                "guests": {"integerValue": "2"},
                "nights": {"integerValue": "4"},
                "pricePerNight": {"integerValue": "100"},
                "totalPrice": {"doubleValue": 400.0}
            }
        })
    }

    #[test]
    fn document_id_is_last_segment() {
        assert_eq!(document_id("a/b/bookings/xyz"), "xyz");
        assert_eq!(document_id("xyz"), "xyz");
    }

    #[test]
    fn decodes_booking_and_falls_back_to_create_time() {
        let b = booking_from_document(&booking_doc()).unwrap();
        assert_eq!(b.id, "abc123");
        assert_eq!(b.user_id, "u1");
        assert_eq!(b.check_in, d("2024-06-01"));
        assert_eq!(b.check_out, d("2024-06-05"));
        assert_eq!(b.guests, 2);
        assert_eq!(b.nights, 4);
        assert!((b.price_per_night - 100.0).abs() < f64::EPSILON);
        assert!((b.total_price - 400.0).abs() < f64::EPSILON);
        assert_eq!(b.created_at.to_rfc3339(), "2024-05-20T10:00:00+00:00");
    }

    #[test]
    fn created_at_field_wins_over_create_time() {
        let mut doc = booking_doc();
        doc["fields"]["createdAt"] = json!({"timestampValue": "2024-05-01T08:00:00Z"});
        let b = booking_from_document(&doc).unwrap();
        assert_eq!(b.created_at.to_rfc3339(), "2024-05-01T08:00:00+00:00");
    }

    #[test]
    fn booking_without_dates_is_rejected() {
        let mut doc = booking_doc();
        doc["fields"].as_object_mut().unwrap().remove("checkOut");
        let err = booking_from_document(&doc).unwrap_err();
        assert!(err.to_string().contains("checkOut"));
    }

    #[test]
    fn booking_fields_use_store_field_names() {
        let nb = NewBooking {
            user_id: "u1".into(),
            property_id: "p1".into(),
            property_title: "Loft".into(),
            property_image: String::new(),
            check_in: d("2024-06-01"),
            check_out: d("2024-06-04"),
            guests: 3,
            nights: 3,
            price_per_night: 100.0,
            total_price: 300.0,
        };
        let f = booking_fields(&nb);
        assert_eq!(f["userId"], json!({"stringValue": "u1"}));
        assert_eq!(f["guests"], json!({"integerValue": "3"}));
        assert_eq!(f["checkIn"], json!({"timestampValue": "2024-06-01T00:00:00.000Z"}));
        assert_eq!(f["totalPrice"], json!({"doubleValue": 300.0}));
        assert!(f.get("createdAt").is_none());
    }

    #[test]
    fn decodes_property_leniently() {
        let doc = json!({
            "name": "projects/demo/databases/(default)/documents/properties/p7",
            "fields": {
                "title": {"stringValue": "Cabin"},
                "price": {"integerValue": "80"},
                "superhost": {"booleanValue": true},
                "amenities": {"arrayValue": {"values": [{"stringValue": "Fireplace"}]}},
                "capacity": {"mapValue": {"fields": {"guest": {"integerValue": "4"}}}},
                "address": {"mapValue": {"fields": {"city": {"stringValue": "Bergen"}}}},
                "coordinates": {"mapValue": {"fields": {"lat": {"doubleValue": 60.39}}}}
            }
        });
        let p = property_from_document(&doc).unwrap();
        assert_eq!(p.id, "p7");
        assert_eq!(p.title, "Cabin");
        assert!((p.price - 80.0).abs() < f64::EPSILON);
        assert!(p.superhost);
        assert_eq!(p.amenities, vec!["Fireplace".to_string()]);
        assert_eq!(p.capacity.guest, 4);
        assert_eq!(p.capacity.bedroom, 0);
        assert_eq!(p.address.city, "Bergen");
        assert_eq!(p.address.country, "");
        // lng missing, so coordinates are dropped
        assert!(p.coordinates.is_none());
    }

    #[test]
    fn property_without_fields_gets_defaults() {
        let doc = json!({"name": "x/properties/empty"});
        let p = property_from_document(&doc).unwrap();
        assert_eq!(p.id, "empty");
        assert!(p.title.is_empty());
        assert!(p.images.is_empty());
    }

    #[test]
    fn document_without_name_is_rejected() {
        assert!(property_from_document(&json!({"fields": {}})).is_err());
    }

    #[test]
    fn booking_create_write_stamps_created_at_on_the_server() {
        let nb = NewBooking {
            user_id: "u1".into(),
            property_id: "p1".into(),
            property_title: "Loft".into(),
            property_image: String::new(),
            check_in: d("2024-06-01"),
            check_out: d("2024-06-02"),
            guests: 1,
            nights: 1,
            price_per_night: 90.0,
            total_price: 90.0,
        };
        let name = "projects/demo/databases/(default)/documents/bookings/b1";
        let write = booking_create_write(name, &nb);
        assert_eq!(write["currentDocument"], json!({"exists": false}));
        assert_eq!(
            write["updateTransforms"],
            json!([{"fieldPath": "createdAt", "setToServerValue": "REQUEST_TIME"}])
        );
        assert_eq!(write["update"]["fields"]["propertyId"], json!({"stringValue": "p1"}));
    }

    #[test]
    fn property_fields_round_trip_through_decoder() {
        let listing = NewProperty {
            title: "Dune Cottage".into(),
            price: 140.0,
            rating: 4.2,
            amenities: vec!["WiFi".into(), "Sauna".into()],
            address: Address {
                city: "Sylt".into(),
                zip_code: "25980".into(),
                ..Default::default()
            },
            capacity: Capacity { guest: 3, bedroom: 2 },
            coordinates: Some(Coordinates { lat: 54.9, lng: 8.3 }),
            host: Host::normalized("Rita", "https://img.example/rita.png"),
            ..Default::default()
        };
        let doc = json!({
            "name": "projects/demo/databases/(default)/documents/properties/new1",
            "fields": property_fields("host-9", &listing),
        });
        let decoded = property_from_document(&doc).unwrap();
        assert_eq!(decoded, listing.into_property("new1".into(), "host-9"));
    }

    #[test]
    fn host_update_write_masks_host_only() {
        let write = host_update_write("x/properties/p1", &Host::normalized("Rita", ""));
        assert_eq!(write["updateMask"], json!({"fieldPaths": ["host"]}));
        assert_eq!(
            write["update"]["fields"]["host"]["mapValue"]["fields"]["name"],
            json!({"stringValue": "rita"})
        );
    }
}
