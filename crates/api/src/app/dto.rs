use serde::{Deserialize, Serialize};

use geoitems_core::{Item, ItemDraft, ItemPatch};

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /items`. Fields are optional here so that a missing field
/// is reported by validation rather than as a malformed body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub name: Option<String>,
    pub postcode: Option<String>,
    pub start_date: Option<String>,
    pub users: Option<Vec<String>>,
    pub title: Option<String>,
}

impl From<CreateItemRequest> for ItemDraft {
    fn from(req: CreateItemRequest) -> Self {
        ItemDraft {
            name: req.name,
            postcode: req.postcode,
            start_date: req.start_date,
            users: req.users,
            title: req.title,
        }
    }
}

/// Body of `PATCH /items/{id}`; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub postcode: Option<String>,
    pub start_date: Option<String>,
    pub users: Option<Vec<String>>,
    pub title: Option<String>,
}

impl From<UpdateItemRequest> for ItemPatch {
    fn from(req: UpdateItemRequest) -> Self {
        ItemPatch {
            name: req.name,
            postcode: req.postcode,
            start_date: req.start_date,
            users: req.users,
            title: req.title,
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub items: Vec<Item>,
}
