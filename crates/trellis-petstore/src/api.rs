//! The pet store route tree.

use std::collections::BTreeMap;

use axum::Router;
use trellis::{ApiRouter, GroupConfig, RouteConfig};
use trellis_axum::{handler, ApiRouterExt, AxumHost};
use trellis_openapi::{SecurityRequirement, SecurityScheme, SpecConfig};

use crate::handlers;
use crate::models::{NewOrder, NewPet, Order, Pet, User};
use crate::state::AppState;

/// Document settings used when no config file is given.
pub fn default_config() -> SpecConfig {
    SpecConfig::new()
        .with_title("Petstore")
        .with_version(env!("CARGO_PKG_VERSION"))
        .with_description("A sample pet store served from a trellis route tree.")
        .with_tag("pet", Some("Everything about your pets"))
        .with_tag("store", Some("Access to pet store orders"))
        .with_tag("user", Some("Operations about users"))
        .with_security_scheme(
            "petstore_auth",
            SecurityScheme::OAuth2 {
                flows: serde_json::json!({
                    "implicit": {
                        "authorizationUrl": "https://petstore.example.com/oauth/authorize",
                        "scopes": {
                            "read:pets": "read your pets",
                            "write:pets": "modify pets in your account"
                        }
                    }
                }),
                description: None,
            },
        )
        .with_security_scheme("api_key", SecurityScheme::api_key_header("X-API-Key"))
}

/// Declare every pet store route.
pub fn build_api(config: SpecConfig) -> ApiRouter<AxumHost<AppState>> {
    let api = ApiRouter::from_config(AxumHost::new(), config);

    let pets = api.group("/pets").with(
        GroupConfig::new()
            .with_tag("pet")
            .with_security(SecurityRequirement::with_scopes(
                "petstore_auth",
                ["read:pets"],
            )),
    );
    pets.get("", handler(handlers::list_pets)).with(
        RouteConfig::new()
            .with_operation_id("listPets")
            .with_summary("List all pets")
            .with_response::<Vec<Pet>>(200),
    );
    pets.post("", handler(handlers::add_pet)).with(
        RouteConfig::new()
            .with_operation_id("addPet")
            .with_summary("Add a new pet to the store")
            .with_security(SecurityRequirement::with_scopes(
                "petstore_auth",
                ["write:pets"],
            ))
            .with_request::<NewPet>()
            .with_response::<Pet>(201)
            .with_response::<ProblemBody>(400),
    );
    pets.get("/:petId", handler(handlers::get_pet)).with(
        RouteConfig::new()
            .with_operation_id("getPetById")
            .with_summary("Find pet by ID")
            .with_response::<Pet>(200)
            .with_response::<ProblemBody>(404),
    );
    pets.put("/:petId", handler(handlers::update_pet)).with(
        RouteConfig::new()
            .with_operation_id("updatePet")
            .with_request::<NewPet>()
            .with_response::<Pet>(200)
            .with_response::<ProblemBody>(404),
    );
    pets.delete("/:petId", handler(handlers::delete_pet)).with(
        RouteConfig::new()
            .with_operation_id("deletePet")
            .with_empty_response(204)
            .with_response_description("Pet deleted")
            .with_response::<ProblemBody>(404),
    );

    let store = api
        .group("/store")
        .with(GroupConfig::new().with_tag("store").with_security("api_key"));
    store.post("/orders", handler(handlers::place_order)).with(
        RouteConfig::new()
            .with_operation_id("placeOrder")
            .with_request::<NewOrder>()
            .with_response::<Order>(201)
            .with_response::<ProblemBody>(409),
    );
    store.get("/orders/:orderId", handler(handlers::get_order)).with(
        RouteConfig::new()
            .with_operation_id("getOrderById")
            .with_response::<Order>(200)
            .with_response::<ProblemBody>(404),
    );
    store.get("/inventory", handler(handlers::inventory)).with(
        RouteConfig::new()
            .with_operation_id("getInventory")
            .with_summary("Pet counts by status")
            .with_response::<BTreeMap<String, u64>>(200),
    );

    let users = api.group("/users").with(GroupConfig::new().with_tag("user"));
    users.post("", handler(handlers::create_user)).with(
        RouteConfig::new()
            .with_operation_id("createUser")
            .with_request::<User>()
            .with_response::<User>(201)
            .with_response::<ProblemBody>(409),
    );
    users.get("/:username", handler(handlers::get_user)).with(
        RouteConfig::new()
            .with_operation_id("getUserByName")
            .with_response::<User>(200)
            .with_response::<ProblemBody>(404),
    );

    let internal = api
        .group("/internal")
        .with(GroupConfig::new().with_hidden(true));
    internal.get("/health", handler(handlers::health));

    api
}

/// Build the pet store and turn it into a ready-to-serve router.
pub fn app(config: SpecConfig, state: AppState) -> Result<Router, trellis::Error> {
    Ok(build_api(config).into_axum()?.with_state(state))
}

/// Schema for the `application/problem+json` error bodies handlers return.
struct ProblemBody;

impl trellis_openapi::ToSchema for ProblemBody {
    fn schema_name() -> Option<std::borrow::Cow<'static, str>> {
        Some("ProblemDetails".into())
    }

    fn schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "required": ["type", "title", "status"],
            "properties": {
                "type": { "type": "string" },
                "title": { "type": "string" },
                "status": { "type": "integer" },
                "detail": { "type": "string" },
                "instance": { "type": "string" },
            }
        })
    }
}

