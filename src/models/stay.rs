use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// A property listed on the platform, owned by exactly one user.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Stay {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub contact: Option<Value>,
    /// Open key/value map, e.g. {"wifi": true, "laundry": true}.
    pub facilities: Value,
    /// Ordered photo URIs.
    pub photos: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewStay {
    pub owner_id: i64,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub facilities: Value,
    pub photos: Vec<String>,
}

/// Partial stay update: present overwrites, absent leaves untouched.
#[derive(Debug, Clone, Default)]
pub struct StayChanges {
    pub name: Option<String>,
    pub address: Option<String>,
    pub contact: Option<Value>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl StayChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.address.is_none()
            && self.contact.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
    }

    pub fn apply(self, stay: &mut Stay) {
        if let Some(name) = self.name {
            stay.name = name;
        }
        if let Some(address) = self.address {
            stay.address = address;
        }
        if let Some(contact) = self.contact {
            stay.contact = Some(contact);
        }
        if let Some(latitude) = self.latitude {
            stay.latitude = latitude;
        }
        if let Some(longitude) = self.longitude {
            stay.longitude = longitude;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_update_preserves_untouched_fields() {
        let mut stay = Stay {
            id: 1,
            owner_id: 2,
            name: "Sunrise Hostel".into(),
            address: "Hyderabad, Telangana".into(),
            latitude: 17.385,
            longitude: 78.4867,
            contact: None,
            facilities: json!({"wifi": true}),
            photos: vec!["a.jpg".into(), "b.jpg".into()],
            created_at: Utc::now(),
        };
        let changes = StayChanges {
            address: Some("Pune, Maharashtra".into()),
            ..Default::default()
        };
        assert!(!changes.is_empty());
        changes.apply(&mut stay);
        assert_eq!(stay.address, "Pune, Maharashtra");
        assert_eq!(stay.name, "Sunrise Hostel");
        assert_eq!(stay.photos, vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn empty_changes_detected() {
        assert!(StayChanges::default().is_empty());
    }
}
