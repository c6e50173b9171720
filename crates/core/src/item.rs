//! The item record and its partial-update form.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::geo::GeoFields;
use crate::id::ItemId;

/// A persisted item: user-supplied fields plus derived location fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub postcode: String,
    pub users: Vec<String>,
    pub start_date: DateTime<FixedOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub geo: GeoFields,
}

/// A validated create request, before an id and location are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub postcode: String,
    pub users: Vec<String>,
    pub start_date: DateTime<FixedOffset>,
    pub title: Option<String>,
}

impl Item {
    pub fn create(id: ItemId, new: NewItem, geo: GeoFields) -> Self {
        Self {
            id,
            name: new.name,
            postcode: new.postcode,
            users: new.users,
            start_date: new.start_date,
            title: new.title,
            geo,
        }
    }

    /// Merge `changes` into this record, field by field.
    pub fn apply(&mut self, changes: &ItemChanges) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(postcode) = &changes.postcode {
            self.postcode = postcode.clone();
        }
        if let Some(users) = &changes.users {
            self.users = users.clone();
        }
        if let Some(start_date) = changes.start_date {
            self.start_date = start_date;
        }
        if let Some(title) = &changes.title {
            self.title = Some(title.clone());
        }
        if let Some(geo) = changes.geo {
            self.geo = geo;
        }
    }
}

/// A validated partial update.
///
/// Serializes to exactly the fields that are set, using the same names as
/// [`Item`], so document stores can merge it directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub geo: Option<GeoFields>,
}

impl ItemChanges {
    /// Whether this update moves the item to a different postcode than `current`.
    pub fn changes_postcode(&self, current: &Item) -> bool {
        self.postcode
            .as_deref()
            .is_some_and(|postcode| postcode != current.postcode)
    }

    pub fn with_geo(mut self, geo: GeoFields) -> Self {
        self.geo = Some(geo);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{Coordinates, Direction};

    fn sample_item() -> Item {
        Item::create(
            ItemId::new(),
            NewItem {
                name: "Test Item".to_string(),
                postcode: "10001".to_string(),
                users: vec!["John Doe".to_string()],
                start_date: DateTime::parse_from_rfc3339("2030-03-26T00:00:00Z").unwrap(),
                title: None,
            },
            GeoFields::derive(Coordinates::new(40.7506, -73.9972)),
        )
    }

    #[test]
    fn serializes_with_camel_case_and_flattened_geo() {
        let json = serde_json::to_value(sample_item()).unwrap();
        assert!(json["startDate"].as_str().unwrap().starts_with("2030-03-26T00:00:00"));
        assert_eq!(json["directionFromNY"], "NE");
        assert!(json.get("geo").is_none());
        assert!(json.get("title").is_none());
    }

    #[test]
    fn survives_a_json_round_trip() {
        let item = sample_item();
        let back: Item = serde_json::from_value(serde_json::to_value(&item).unwrap()).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn apply_touches_only_the_named_fields() {
        let mut item = sample_item();
        let before = item.clone();

        item.apply(&ItemChanges {
            name: Some("Renamed".to_string()),
            ..Default::default()
        });

        assert_eq!(item.name, "Renamed");
        assert_eq!(item.geo, before.geo);
        assert_eq!(item.postcode, before.postcode);
        assert_eq!(item.users, before.users);
    }

    #[test]
    fn apply_replaces_all_geo_fields_together() {
        let mut item = sample_item();
        let geo = GeoFields::derive(Coordinates::new(34.0522, -118.2437));

        item.apply(&ItemChanges::default().with_geo(geo));

        assert_eq!(item.geo, geo);
        assert_eq!(item.geo.direction_from_ny, Direction::SouthWest);
    }

    #[test]
    fn changes_serialize_only_set_fields() {
        let changes = ItemChanges {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&changes).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "Renamed" }));

        let json = serde_json::to_value(
            changes.with_geo(GeoFields::derive(Coordinates::new(42.0, -73.0))),
        )
        .unwrap();
        assert_eq!(json["directionFromNY"], "NE");
        assert!(json.get("postcode").is_none());
    }

    #[test]
    fn same_postcode_is_not_a_change() {
        let item = sample_item();
        let same = ItemChanges {
            postcode: Some("10001".to_string()),
            ..Default::default()
        };
        let moved = ItemChanges {
            postcode: Some("90012".to_string()),
            ..Default::default()
        };
        assert!(!same.changes_postcode(&item));
        assert!(moved.changes_postcode(&item));
        assert!(!ItemChanges::default().changes_postcode(&item));
    }
}
