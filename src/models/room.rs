use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "room_type", rename_all = "UPPERCASE")]
pub enum RoomType {
    Single,
    Double,
    Triple,
    More,
    Delux,
}

impl Default for RoomType {
    fn default() -> Self {
        RoomType::Triple
    }
}

/// A bookable room belonging to exactly one stay.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StayRoom {
    pub id: i64,
    pub stay_id: i64,
    pub room_type: RoomType,
    pub capacity: i32,
    pub price: Decimal,
    pub facilities: Value,
    pub photos: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewRoom {
    pub stay_id: i64,
    pub room_type: RoomType,
    pub capacity: i32,
    pub price: Decimal,
    pub facilities: Value,
    pub photos: Vec<String>,
}

/// Partial room update: present overwrites, absent leaves untouched.
#[derive(Debug, Clone, Default)]
pub struct RoomChanges {
    pub room_type: Option<RoomType>,
    pub capacity: Option<i32>,
    pub price: Option<Decimal>,
    pub facilities: Option<Value>,
    pub photos: Option<Vec<String>>,
}

impl RoomChanges {
    pub fn is_empty(&self) -> bool {
        self.room_type.is_none()
            && self.capacity.is_none()
            && self.price.is_none()
            && self.facilities.is_none()
            && self.photos.is_none()
    }

    pub fn apply(self, room: &mut StayRoom) {
        if let Some(room_type) = self.room_type {
            room.room_type = room_type;
        }
        if let Some(capacity) = self.capacity {
            room.capacity = capacity;
        }
        if let Some(price) = self.price {
            room.price = price;
        }
        if let Some(facilities) = self.facilities {
            room.facilities = facilities;
        }
        if let Some(photos) = self.photos {
            room.photos = photos;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn room_type_wire_names_are_uppercase() {
        assert_eq!(serde_json::to_value(RoomType::Delux).unwrap(), json!("DELUX"));
        let parsed: RoomType = serde_json::from_value(json!("SINGLE")).unwrap();
        assert_eq!(parsed, RoomType::Single);
    }

    #[test]
    fn price_update_leaves_capacity_alone() {
        let mut room = StayRoom {
            id: 1,
            stay_id: 1,
            room_type: RoomType::Double,
            capacity: 2,
            price: Decimal::from(5000),
            facilities: json!({}),
            photos: vec![],
            created_at: Utc::now(),
        };
        RoomChanges {
            price: Some(Decimal::from(5500)),
            ..Default::default()
        }
        .apply(&mut room);
        assert_eq!(room.price, Decimal::from(5500));
        assert_eq!(room.capacity, 2);
        assert_eq!(room.room_type, RoomType::Double);
    }
}
