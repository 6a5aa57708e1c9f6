use anyhow::Context;
use storage::Database;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;
mod routes;
mod state;

use config::Config;
use features::{account, comments, fields, suggestions, traffic};
use middleware::auth::AdminPolicy;
use state::{AppState, TrafficSettings};

#[derive(OpenApi)]
#[openapi(
    paths(
        fields::handlers::list_fields,
        fields::handlers::nearby_fields,
        fields::handlers::field_markers,
        fields::handlers::get_field,
        fields::handlers::get_field_detailed,
        fields::handlers::create_field,
        fields::handlers::update_field,
        fields::handlers::delete_field,
        traffic::handlers::get_field_traffic,
        traffic::handlers::list_field_reports,
        traffic::handlers::submit_report,
        comments::handlers::list_comments,
        comments::handlers::post_comment,
        suggestions::handlers::create_suggestion,
        suggestions::handlers::list_suggestions,
        suggestions::handlers::approve_suggestion,
        suggestions::handlers::reject_suggestion,
        suggestions::handlers::delete_suggestion,
        account::handlers::get_profile,
        account::handlers::get_activity,
    ),
    components(
        schemas(
            storage::dto::field::CreateFieldRequest,
            storage::dto::field::UpdateFieldRequest,
            storage::dto::field::FieldResponse,
            storage::dto::field::FieldListEntry,
            storage::dto::field::NearbyFieldEntry,
            storage::dto::field::FieldMarker,
            storage::dto::field::FieldDetailResponse,
            storage::dto::field::TrafficBadge,
            storage::dto::traffic::ConsensusResponse,
            storage::dto::traffic::AnomalyResponse,
            storage::dto::traffic::TrafficReportResponse,
            storage::dto::traffic::SubmitReportRequest,
            storage::dto::traffic::SubmitReportResponse,
            storage::dto::comment::CommentResponse,
            storage::dto::comment::CreateCommentRequest,
            storage::dto::suggestion::SuggestionResponse,
            storage::dto::suggestion::CreateSuggestionRequest,
            storage::dto::suggestion::SuggestionApprovalResponse,
            storage::dto::account::UserProfileResponse,
            storage::dto::account::UserActivityResponse,
            storage::dto::account::FavoriteField,
            storage::models::UserStats,
            storage::dto::common::PaginationMeta,
            storage::models::ConsensusLevel,
            storage::models::MarkerColor,
            storage::models::SuggestionStatus,
            storage::services::comment_category::CommentCategory,
            storage::services::consensus::CacheStatus,
        )
    ),
    tags(
        (name = "fields", description = "Field lookup, nearby search and map markers"),
        (name = "traffic", description = "Crowd reports and their consensus"),
        (name = "comments", description = "Field comments"),
        (name = "suggestions", description = "User field suggestions"),
        (name = "account", description = "Signed-in user"),
        (name = "admin", description = "Field curation and suggestion review"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "gateway_identity",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Header(
                        utoipa::openapi::security::ApiKeyValue::new(
                            middleware::auth::USER_ID_HEADER,
                        ),
                    ),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting Pitchside API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!(
        window = config.traffic_window.size(),
        recent_reports = config.recent_reports_limit,
        nearby = config.nearby_limit,
        "Configuration loaded successfully"
    );

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let admins = AdminPolicy::from_comma_separated(&config.admin_emails);
    if admins.admin_count() == 0 {
        tracing::warn!("ADMIN_EMAILS is empty, admin routes will reject every caller");
    }

    let state = AppState {
        db,
        admins,
        traffic: TrafficSettings::from(&config),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    let app = routes::api_routes(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    axum::serve(listener, app).await?;

    Ok(())
}
