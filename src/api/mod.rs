// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{DetailResponse, RegistryError, RegistryErrorResponse, StatusResponse, TokenResponse},
    state::AppState,
};

pub mod health;
pub mod token;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/auth", get(token::auth))
        .route("/get-token", get(token::get_token))
        .route("/validate", get(token::validate))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

struct BasicSecurity;

impl Modify for BasicSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "basic",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Basic).build()),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        token::auth,
        token::get_token,
        token::validate,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            TokenResponse,
            StatusResponse,
            DetailResponse,
            RegistryError,
            RegistryErrorResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&BasicSecurity),
    tags(
        (name = "Token", description = "Registry token issuance and validation"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
