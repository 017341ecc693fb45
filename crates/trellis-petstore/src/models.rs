//! Resources exposed by the pet store and their schemas.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use trellis_openapi::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    #[default]
    Available,
    Pending,
    Sold,
}

impl ToSchema for PetStatus {
    fn schema_name() -> Option<Cow<'static, str>> {
        Some("PetStatus".into())
    }

    fn schema() -> Value {
        json!({ "type": "string", "enum": ["available", "pending", "sold"] })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub status: PetStatus,
}

impl ToSchema for Pet {
    fn schema_name() -> Option<Cow<'static, str>> {
        Some("Pet".into())
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "required": ["id", "name", "status"],
            "properties": {
                "id": u64::schema(),
                "name": String::schema(),
                "tag": String::schema(),
                "status": PetStatus::schema(),
            }
        })
    }
}

/// Body of `POST /pets` and `PUT /pets/{petId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPet {
    pub name: String,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub status: PetStatus,
}

impl ToSchema for NewPet {
    fn schema_name() -> Option<Cow<'static, str>> {
        Some("NewPet".into())
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "required": ["name"],
            "properties": {
                "name": String::schema(),
                "tag": String::schema(),
                "status": PetStatus::schema(),
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub pet_id: u64,
    pub quantity: u32,
    pub complete: bool,
}

impl ToSchema for Order {
    fn schema_name() -> Option<Cow<'static, str>> {
        Some("Order".into())
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "required": ["id", "pet_id", "quantity", "complete"],
            "properties": {
                "id": u64::schema(),
                "pet_id": u64::schema(),
                "quantity": u32::schema(),
                "complete": bool::schema(),
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub pet_id: u64,
    #[serde(default = "one")]
    pub quantity: u32,
}

fn one() -> u32 {
    1
}

impl ToSchema for NewOrder {
    fn schema_name() -> Option<Cow<'static, str>> {
        Some("NewOrder".into())
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "required": ["pet_id"],
            "properties": {
                "pet_id": u64::schema(),
                "quantity": u32::schema(),
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub email: String,
}

impl ToSchema for User {
    fn schema_name() -> Option<Cow<'static, str>> {
        Some("User".into())
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "required": ["username", "email"],
            "properties": {
                "username": String::schema(),
                "email": String::schema(),
            }
        })
    }
}
