//! Pet store request handlers.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use trellis_axum::ProblemDetails;

use crate::models::{NewOrder, NewPet, Order, Pet, User};
use crate::state::AppState;

/// GET /pets - List all pets
pub async fn list_pets(State(state): State<AppState>) -> Json<Vec<Pet>> {
    Json(state.list_pets())
}

/// POST /pets - Add a pet
pub async fn add_pet(
    State(state): State<AppState>,
    Json(input): Json<NewPet>,
) -> Result<(StatusCode, Json<Pet>), ProblemDetails> {
    if input.name.trim().is_empty() {
        return Err(ProblemDetails::bad_request("pet name must not be empty"));
    }
    Ok((StatusCode::CREATED, Json(state.add_pet(input))))
}

/// GET /pets/:petId - Get pet by ID
pub async fn get_pet(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Pet>, ProblemDetails> {
    state
        .get_pet(id)
        .map(Json)
        .ok_or_else(|| ProblemDetails::not_found(format!("Pet {} not found", id)))
}

/// PUT /pets/:petId - Replace a pet
pub async fn update_pet(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(input): Json<NewPet>,
) -> Result<Json<Pet>, ProblemDetails> {
    state
        .update_pet(id, input)
        .map(Json)
        .ok_or_else(|| ProblemDetails::not_found(format!("Pet {} not found", id)))
}

/// DELETE /pets/:petId - Delete a pet
pub async fn delete_pet(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ProblemDetails> {
    state
        .remove_pet(id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| ProblemDetails::not_found(format!("Pet {} not found", id)))
}

/// POST /store/orders - Place an order for a pet
pub async fn place_order(
    State(state): State<AppState>,
    Json(input): Json<NewOrder>,
) -> Result<(StatusCode, Json<Order>), ProblemDetails> {
    let pet_id = input.pet_id;
    state
        .place_order(input)
        .map(|order| (StatusCode::CREATED, Json(order)))
        .ok_or_else(|| ProblemDetails::conflict(format!("Pet {} is not available", pet_id)))
}

/// GET /store/orders/:orderId - Get order by ID
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Order>, ProblemDetails> {
    state
        .get_order(id)
        .map(Json)
        .ok_or_else(|| ProblemDetails::not_found(format!("Order {} not found", id)))
}

/// GET /store/inventory - Pet counts by status
pub async fn inventory(State(state): State<AppState>) -> Json<BTreeMap<String, u64>> {
    Json(state.inventory())
}

/// POST /users - Register a user
pub async fn create_user(
    State(state): State<AppState>,
    Json(user): Json<User>,
) -> Result<(StatusCode, Json<User>), ProblemDetails> {
    if !state.add_user(user.clone()) {
        return Err(ProblemDetails::conflict(format!(
            "User '{}' already exists",
            user.username
        )));
    }
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /users/:username - Get user by name
pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<User>, ProblemDetails> {
    state
        .get_user(&username)
        .map(Json)
        .ok_or_else(|| ProblemDetails::not_found(format!("User '{}' not found", username)))
}

/// GET /internal/health - Liveness check, not documented
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "pets": state.pet_count(),
    }))
}
