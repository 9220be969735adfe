use serde::{Deserialize, Serialize};

use crate::error::{Result, StayError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capacity {
    #[serde(default)]
    pub guest: u32,
    #[serde(default)]
    pub bedroom: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Host {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
}

impl Host {
    /// Host card as written onto a host's properties: the name is trimmed
    /// and lowercased.
    pub fn normalized(name: &str, image: &str) -> Self {
        Self {
            name: name.trim().to_lowercase(),
            image: image.to_string(),
        }
    }
}

/// A rentable property as stored in the `properties` collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    #[serde(default)]
    pub host_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    /// Nightly rate.
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub superhost: bool,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub capacity: Capacity,
    #[serde(default)]
    pub host: Host,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// A listing submitted by a host, before the store assigns an id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProperty {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub price: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub superhost: bool,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub capacity: Capacity,
    #[serde(default)]
    pub host: Host,
    #[serde(default)]
    pub image: String,
}

impl NewProperty {
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| {
            Err(StayError::InvalidParams {
                reason: reason.into(),
            })
        };
        if self.title.trim().is_empty() {
            return invalid("title is required");
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return invalid("price must be a positive number");
        }
        if !(0.0..=5.0).contains(&self.rating) {
            return invalid("rating must be between 0 and 5");
        }
        if self.capacity.guest == 0 {
            return invalid("capacity must allow at least 1 guest");
        }
        if let Some(c) = self.coordinates
            && (!(-90.0..=90.0).contains(&c.lat) || !(-180.0..=180.0).contains(&c.lng))
        {
            return invalid("coordinates are out of range");
        }
        Ok(())
    }

    pub fn into_property(self, id: String, host_id: &str) -> Property {
        Property {
            id,
            host_id: host_id.to_string(),
            title: self.title,
            description: self.description,
            amenities: self.amenities,
            price: self.price,
            rating: self.rating,
            superhost: self.superhost,
            address: self.address,
            coordinates: self.coordinates,
            capacity: self.capacity,
            host: self.host,
            image: self.image,
            images: Vec::new(),
        }
    }
}

/// Catalog filters offered by the property list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropertyFilter {
    pub superhost_only: bool,
    pub min_guests: Option<u32>,
}

impl PropertyFilter {
    pub fn matches(&self, property: &Property) -> bool {
        if self.superhost_only && !property.superhost {
            return false;
        }
        if let Some(min) = self.min_guests
            && property.capacity.guest < min
        {
            return false;
        }
        true
    }

    pub fn apply(&self, properties: Vec<Property>) -> Vec<Property> {
        properties.into_iter().filter(|p| self.matches(p)).collect()
    }
}

/// Top `limit` properties by rating, best first.
pub fn featured(mut properties: Vec<Property>, limit: usize) -> Vec<Property> {
    properties.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    properties.truncate(limit);
    properties
}

impl Property {
    pub fn location(&self) -> String {
        match (self.address.city.is_empty(), self.address.country.is_empty()) {
            (false, false) => format!("{}, {}", self.address.city, self.address.country),
            (false, true) => self.address.city.clone(),
            (true, false) => self.address.country.clone(),
            (true, true) => String::new(),
        }
    }
}

impl std::fmt::Display for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "# {}", self.title)?;
        writeln!(f, "ID: {}", self.id)?;
        let location = self.location();
        if !location.is_empty() {
            writeln!(f, "Location: {location}")?;
        }
        write!(f, "Price: {:.2}/night", self.price)?;
        if self.rating > 0.0 {
            write!(f, " | Rating: {:.1}", self.rating)?;
        }
        if self.superhost {
            write!(f, " | Superhost")?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "Capacity: {} guests, {} bedrooms",
            self.capacity.guest, self.capacity.bedroom
        )?;
        if !self.host.name.is_empty() {
            writeln!(f, "Host: {}", self.host.name)?;
        }
        if !self.description.is_empty() {
            writeln!(f, "\n{}", self.description)?;
        }
        if !self.amenities.is_empty() {
            writeln!(f, "\nAmenities: {}", self.amenities.join(", "))?;
        }
        if let Some(c) = self.coordinates {
            writeln!(f, "Coordinates: {:.5}, {:.5}", c.lat, c.lng)?;
        }
        Ok(())
    }
}
