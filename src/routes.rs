use pdf_text_prep::{AnalyzeOptions, DocumentAnalyzer};
use serde::Serialize;
use worker::{Context, Env, Request, Response, Result, RouteContext, Router};

use crate::classifier;
use crate::config::{AppConfig, allowed_origin_from_lookup, cors_for_origin, env_lookup};
use crate::error::ApiError;
use crate::models::{Classification, HealthResponse};
use crate::upload;

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
}

pub async fn handle(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    let config = match AppConfig::from_env(&env) {
        Ok(config) => config,
        Err(error) => {
            worker::console_error!("invalid configuration: {error}");
            let cors = cors_for_origin(&allowed_origin_from_lookup(env_lookup(&env)));
            return error.into_response()?.with_cors(&cors);
        }
    };
    let cors = config.cors();

    let response = Router::with_data(AppState { config })
        .get("/health", health_route)
        .options("/upload", preflight_route)
        .post_async("/upload", upload_route)
        .run(req, env)
        .await?;
    response.with_cors(&cors)
}

fn health_route(_req: Request, _ctx: RouteContext<AppState>) -> Result<Response> {
    json_response(&HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn preflight_route(_req: Request, _ctx: RouteContext<AppState>) -> Result<Response> {
    Response::empty()
}

async fn upload_route(mut req: Request, ctx: RouteContext<AppState>) -> Result<Response> {
    match upload_response(&mut req, &ctx.data.config).await {
        Ok(classification) => json_response(&classification),
        Err(error) => {
            worker::console_error!("upload failed: {error}");
            error.into_response()
        }
    }
}

async fn upload_response(req: &mut Request, config: &AppConfig) -> Result<Classification, ApiError> {
    let document = upload::read_upload(req).await?;
    if document.declared_type_mismatch() {
        worker::console_warn!(
            "declared content type {:?} does not match detected {}",
            document.declared_content_type(),
            document.detected_type().label()
        );
    }

    let analyzer = DocumentAnalyzer::new(AnalyzeOptions::default());
    let analyzed = analyzer.analyze_document(&document)?;
    worker::console_log!(
        "analysis completed: pages={}, chars={}",
        analyzed.metadata.page_count,
        analyzed.text.chars().count()
    );

    classifier::classify(config, &document, &analyzed).await
}

fn json_response<T>(payload: &T) -> Result<Response>
where
    T: Serialize,
{
    let mut response = Response::from_json(payload)?;
    response.headers_mut().set("Cache-Control", "no-store")?;
    Ok(response)
}
