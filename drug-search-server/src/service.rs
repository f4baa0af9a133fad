use axum::{
    Router,
    extract::State,
    http::{HeaderValue, Request, StatusCode},
    middleware::{Next, from_fn},
    response::{Json, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Instrument, error, info};
use uuid::Uuid;

use crate::{
    config::{GeneratorConfig, ServerConfig},
    generator::{GeminiGenerator, GenericInfoGenerator, OpenRouterGenerator},
    index::{DrugIndex, PineconeIndex, describe_drug},
    models::{ErrorResponse, HealthResponse, SearchRequest, SearchResponse},
};

pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<Json<T>, ApiError>;

fn bad_request_error(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
            details: None,
        }),
    )
}

fn internal_error(message: &str, details: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: message.to_string(),
            details: Some(details.to_string()),
        }),
    )
}

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<dyn DrugIndex>,
    pub generator: Arc<dyn GenericInfoGenerator>,
}

pub async fn create_app(config: &ServerConfig) -> anyhow::Result<Router> {
    let app_state = create_app_state(config).await?;
    Ok(build_router(app_state))
}

async fn create_app_state(config: &ServerConfig) -> anyhow::Result<AppState> {
    let index: Arc<dyn DrugIndex> = Arc::new(PineconeIndex::connect(&config.pinecone).await?);

    let generator: Arc<dyn GenericInfoGenerator> = match &config.generator {
        GeneratorConfig::Gemini { api_url, api_key } => {
            info!("Generating generic info with Gemini endpoint {}", api_url);
            Arc::new(GeminiGenerator::new(api_url.clone(), api_key.clone()))
        }
        GeneratorConfig::OpenRouter { api_key, model } => {
            info!("Generating generic info with OpenRouter model {}", model);
            Arc::new(OpenRouterGenerator::new(api_key, model))
        }
    };

    Ok(AppState { index, generator })
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/search", post(search))
        .layer(from_fn(correlation_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Tag every request with a correlation id and run it inside a span carrying that id
async fn correlation_id_middleware(mut request: Request<axum::body::Body>, next: Next) -> Response {
    let correlation_id = Uuid::new_v4().to_string();
    let header_value = HeaderValue::from_str(&correlation_id).ok();

    if let Some(value) = &header_value {
        request
            .headers_mut()
            .insert(CORRELATION_ID_HEADER, value.clone());
    }

    let span = tracing::info_span!("http_request", correlation_id = %correlation_id);
    let mut response = next.run(request).instrument(span).await;

    if let Some(value) = header_value {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }
    response
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "Drug Search Service",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Looks up brand drugs and returns generic drug information",
        "endpoints": {
            "POST /search": "Look up a brand drug ({\"brand_drug\": string})",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> ApiResult<SearchResponse> {
    let brand_drug = validate_brand_drug(&request.brand_drug)?;
    info!("Searching drug information for: {}", brand_drug);

    let raw_info = describe_drug(state.index.as_ref(), &brand_drug)
        .await
        .map_err(|e| {
            error!("Drug index lookup failed for {}: {}", brand_drug, e);
            internal_error("Failed to query drug index", &e.to_string())
        })?;

    let generic_info = state
        .generator
        .generate(&brand_drug, &raw_info)
        .await
        .map_err(|e| {
            error!("Generic info generation failed for {}: {}", brand_drug, e);
            internal_error("Failed to generate generic drug information", &e.to_string())
        })?;

    Ok(Json(SearchResponse {
        brand_drug,
        generic_info,
        raw_info,
    }))
}

fn validate_brand_drug(brand_drug: &str) -> Result<String, ApiError> {
    let brand_drug = brand_drug.trim();
    if brand_drug.is_empty() {
        return Err(bad_request_error("No brand drug provided"));
    }
    Ok(brand_drug.to_string())
}
