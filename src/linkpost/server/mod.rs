// SPDX-License-Identifier: MIT

mod error;
pub mod request;

pub use error::ApiError;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::adk::error::{LinkpostError, ValidationError};
use crate::linkpost::analytics::mock_analytics;
use crate::linkpost::content::ContentGenerator;
use crate::linkpost::scheduler::PostScheduler;
use crate::linkpost::templates::TemplateStore;
use request::{AnalyticsQuery, GenerateRequest, PostType, ScheduleRequest};

/// Shared, read-only collaborators of every handler
#[derive(Clone)]
pub struct AppState {
    pub content: Arc<ContentGenerator>,
    pub templates: Arc<TemplateStore>,
    pub scheduler: Arc<PostScheduler>,
}

impl AppState {
    pub fn new(content: Arc<ContentGenerator>, templates: TemplateStore) -> Self {
        Self {
            content,
            templates: Arc::new(templates),
            scheduler: Arc::new(PostScheduler::new()),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/generate", post(generate))
        .route("/templates", get(list_templates))
        .route("/schedule", post(schedule))
        .route("/analytics", get(analytics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(state: AppState, addr: SocketAddr) -> Result<(), LinkpostError> {
    let app = router(state);

    log::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn generate(
    State(state): State<AppState>,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<Value>, ApiError> {
    let post_type = payload.post_type()?;
    log::info!("Generate request: {:?} '{}'", post_type, payload.topic);

    match post_type {
        PostType::Text => {
            let brief = payload.brief()?;
            let text = state.content.text_post(&brief).await;
            Ok(Json(json!({
                "post": text.post,
                "hooks": text.hooks,
                "hashtags": text.hashtags,
                "success": true
            })))
        }
        PostType::Carousel => {
            let topic = payload.topic.trim();
            if topic.is_empty() {
                return Err(ValidationError::MissingTopic.into());
            }
            let slides = state.content.carousel(topic, payload.slides()).await;
            Ok(Json(json!({ "slides": slides, "success": true })))
        }
        PostType::Template => {
            let name = payload.template_name.trim();
            if name.is_empty() {
                return Err(ValidationError::MissingField("Template name").into());
            }
            let template = state
                .templates
                .get(name)
                .ok_or_else(|| ValidationError::UnknownTemplate(name.to_string()))?;
            Ok(Json(json!({ "template": template, "success": true })))
        }
    }
}

async fn list_templates(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "templates": state.templates.names(), "success": true }))
}

async fn schedule(
    State(state): State<AppState>,
    Json(payload): Json<ScheduleRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.post.trim().is_empty() || payload.time.trim().is_empty() {
        return Err(ValidationError::MissingField("Post content and time").into());
    }

    let outcome = state
        .scheduler
        .schedule(&payload.post, &payload.time, &payload.timezone)
        .await?;
    Ok(Json(json!({ "result": outcome.message(), "success": true })))
}

async fn analytics(Query(query): Query<AnalyticsQuery>) -> Result<Json<Value>, ApiError> {
    let filename = query.filename.trim();
    if filename.is_empty() {
        return Err(ValidationError::MissingField("Filename").into());
    }

    let data = mock_analytics(filename, &mut rand::thread_rng());
    Ok(Json(json!({ "data": data, "success": true })))
}
