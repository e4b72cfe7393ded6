use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "TradeDesk API",
        version = "0.1.0",
        description = r#"
# TradeDesk API

Back-office REST API for a commodities trading marketing site.

## Features

- **RFQ**: step-gated validation and submission of requests for quotation
- **Shipments**: registry of client shipments with tracking identifiers
- **Trading Steps**: seven-stage process tracker per shipment
- **Products**: public commodity catalog with admin maintenance
- **Tracking**: anonymous shipment lookup by display id and client name

## Authentication

Back-office endpoints require a JWT access token obtained from
`POST /auth/login`. Include it in the Authorization header:

```
Authorization: Bearer <your-jwt-token>
```

Public endpoints (catalog reads, RFQ, tracking) need no token.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "rfq", description = "RFQ validation and submission"),
        (name = "shipments", description = "Shipment registry"),
        (name = "trading-steps", description = "Trading process tracker"),
        (name = "process", description = "Static process metadata"),
        (name = "products", description = "Commodity catalog"),
        (name = "tracking", description = "Anonymous shipment tracking"),
        (name = "auth", description = "Token issuance")
    ),
    paths(
        // RFQ
        crate::handlers::rfq::validate_rfq,
        crate::handlers::rfq::submit_rfq,

        // Shipments
        crate::handlers::shipments::create_shipment,
        crate::handlers::shipments::list_shipments,
        crate::handlers::shipments::get_shipment,
        crate::handlers::shipments::delete_shipment,
        crate::handlers::shipments::set_notifications,

        // Trading steps
        crate::handlers::trading_steps::list_step_templates,
        crate::handlers::trading_steps::list_steps,
        crate::handlers::trading_steps::add_step,
        crate::handlers::trading_steps::update_step,
        crate::handlers::trading_steps::toggle_action,
        crate::handlers::trading_steps::complete_step,

        // Products
        crate::handlers::products::list_products,
        crate::handlers::products::get_product,
        crate::handlers::products::create_product,
        crate::handlers::products::delete_product,

        // Tracking
        crate::handlers::tracking::track_shipment,

        // Auth
        crate::auth::login_handler,
        crate::auth::refresh_handler,
    ),
    components(
        schemas(
            // Common types
            crate::ApiResponse<serde_json::Value>,

            // RFQ types
            crate::services::rfq::RfqForm,
            crate::handlers::rfq::ValidateRfqRequest,
            crate::handlers::rfq::ValidationOutcome,
            crate::handlers::rfq::RfqReceipt,

            // Shipment types
            crate::services::shipments::NewShipment,
            crate::handlers::shipments::ShipmentSummary,
            crate::handlers::shipments::NotificationsRequest,

            // Trading step types
            crate::steps::StepTemplate,
            crate::entities::trading_step::StepStatus,
            crate::services::trading_steps::StepEdit,
            crate::handlers::trading_steps::StepDetail,
            crate::handlers::trading_steps::AddStepRequest,
            crate::handlers::trading_steps::ToggleActionRequest,

            // Product types
            crate::services::products::NewProduct,
            crate::handlers::products::ProductSummary,

            // Tracking types
            crate::handlers::tracking::TrackRequest,
            crate::handlers::tracking::TrackedShipment,
            crate::handlers::tracking::TrackingView,

            // Auth types
            crate::auth::LoginRequest,
            crate::auth::RefreshRequest,
            crate::auth::TokenPair,

            // Error types
            crate::errors::ErrorResponse
        )
    ),
    modifiers(&BearerAuth)
)]
pub struct ApiDocV1;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
