//! HTTP路由handlers

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, Query, State},
    http::{header, Request, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use bytes::Bytes;
use chrono::Local;
use cloakgate_core::api::{
    collect, decide, ExchangeRecord, RawRequest, RecordKind, RenderDecision,
};
use regex::Regex;

use crate::http::{
    models::{HealthResponse, HttpServerError, LogsQuery, LogsResponse},
    state::AppState,
};

/// 创建所有路由
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(gate_handler))
        .route("/download", get(download_handler))
        .route("/logs", get(logs_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// GET / - 着陆页网关：采集信号、请求分类服务、按判定结果响应
async fn gate_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request<Body>,
) -> Response {
    // 更新统计
    {
        let mut stats = state.stats.write().unwrap();
        stats.increment_request("/");
    }

    // 采集请求信号并记录
    let raw = build_raw_request(addr, &req);
    let signals = collect(&raw);
    state.audit.record_request(&signals);

    // 单次调用分类服务（超时即放行，不重试）
    let outcome = state.classifier.classify(&signals).await;
    state.audit.record_exchange(&ExchangeRecord::from_outcome(
        &outcome,
        state.classifier.endpoint(),
        &signals.client_ip,
    ));

    render_decision(&state, decide(&outcome)).await
}

/// 把axum请求转换为core的框架无关视图
fn build_raw_request(addr: SocketAddr, req: &Request<Body>) -> RawRequest {
    RawRequest {
        remote_addr: Some(addr.ip()),
        method: req.method().to_string(),
        uri: req.uri().to_string(),
        query: req.uri().query().unwrap_or_default().to_string(),
        headers: req
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect(),
    }
}

/// Page served when the permitted variant has no explicit target and the
/// configured landing file cannot be read.
const FALLBACK_LANDING: &str =
    "<!DOCTYPE html><html><head><title>Welcome</title></head><body>Welcome.</body></html>";

/// 按网关判定结果产生响应
async fn render_decision(state: &AppState, decision: RenderDecision) -> Response {
    match decision {
        // 终止渲染，直接输出固定文案
        RenderDecision::Abort(message) => (StatusCode::OK, message).into_response(),
        RenderDecision::RenderRestricted(target) => Redirect::temporary(&target).into_response(),
        RenderDecision::RenderPermitted(Some(target)) => {
            Redirect::temporary(&target).into_response()
        }
        // 默认变体：返回内置着陆页
        RenderDecision::RenderPermitted(None) => {
            match tokio::fs::read_to_string(&state.config.server.landing_page).await {
                Ok(page) => Html(page).into_response(),
                Err(e) => {
                    tracing::warn!(
                        target: "cloakgate.http",
                        path = %state.config.server.landing_page,
                        error = %e,
                        "landing page read failed, serving fallback"
                    );
                    Html(FALLBACK_LANDING.to_string()).into_response()
                }
            }
        }
    }
}

/// GET /download - 无条件静态文件响应（仅做存在性/可读性检查）
async fn download_handler(State(state): State<AppState>) -> Result<Response, HttpServerError> {
    // 更新统计
    {
        let mut stats = state.stats.write().unwrap();
        stats.increment_request("/download");
    }

    let cfg = &state.config.download;
    let bytes = match tokio::fs::read(&cfg.file_path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            let mut stats = state.stats.write().unwrap();
            stats.increment_error();
            return Err(match e.kind() {
                std::io::ErrorKind::NotFound => {
                    HttpServerError::NotFound(format!("File not found: {}", cfg.file_path))
                }
                std::io::ErrorKind::PermissionDenied => {
                    HttpServerError::Forbidden(format!("File not readable: {}", cfg.file_path))
                }
                _ => HttpServerError::Internal(e.to_string()),
            });
        }
    };

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_LENGTH, bytes.len().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", cfg.file_name),
            ),
            (header::CACHE_CONTROL, "must-revalidate".to_string()),
        ],
        Bytes::from(bytes),
    )
        .into_response())
}

/// GET /logs - 只读日志查看：按类型与日期选择当天文件，逐行解析
async fn logs_handler(
    State(state): State<AppState>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<LogsResponse>, HttpServerError> {
    // 更新统计
    {
        let mut stats = state.stats.write().unwrap();
        stats.increment_request("/logs");
    }

    let kind = match query.log_type.as_str() {
        "requests" => RecordKind::Request,
        "api_responses" => RecordKind::Exchange,
        other => {
            return Err(HttpServerError::InvalidRequest(format!(
                "unknown log type: {other}"
            )))
        }
    };

    let date = match query.date {
        Some(date) => {
            // 校验日期格式，防止拼出任意文件名
            if chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_err() {
                return Err(HttpServerError::InvalidRequest(format!(
                    "invalid date: {date}"
                )));
            }
            date
        }
        None => Local::now().date_naive().format("%Y-%m-%d").to_string(),
    };

    let available_dates = available_dates(state.audit.dir(), kind)?;
    let entries = read_entries(state.audit.dir(), kind, &date);

    Ok(Json(LogsResponse {
        log_type: query.log_type,
        date,
        available_dates,
        entries,
    }))
}

/// 列出该类型现有日志文件的日期，倒序
fn available_dates(
    dir: &std::path::Path,
    kind: RecordKind,
) -> Result<Vec<String>, HttpServerError> {
    let pattern = format!(r"^{}_(\d{{4}}-\d{{2}}-\d{{2}})\.log$", kind.file_prefix());
    let re = Regex::new(&pattern).map_err(|e| HttpServerError::Internal(e.to_string()))?;

    let mut dates = Vec::new();
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Ok(dates),
    };
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if let Some(captures) = re.captures(name) {
            dates.push(captures[1].to_string());
        }
    }
    dates.sort();
    dates.reverse();
    Ok(dates)
}

/// 逐行读取选中的日志文件；文件可能正被追加，非完整JSON的行原样返回
fn read_entries(dir: &std::path::Path, kind: RecordKind, date: &str) -> Vec<serde_json::Value> {
    let path = dir.join(format!("{}_{date}.log", kind.file_prefix()));
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    content
        .lines()
        .map(|line| {
            serde_json::from_str(line).unwrap_or_else(|_| serde_json::json!({ "raw": line }))
        })
        .collect()
}

/// GET /health - 健康检查
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let (uptime_seconds, requests_handled) = {
        let mut stats = state.stats.write().unwrap();
        stats.increment_request("/health");
        (stats.uptime_seconds(), stats.requests_total)
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        session_id: state.session_id.clone(),
        uptime_seconds,
        requests_handled,
        timestamp: Local::now().to_rfc3339(),
    })
}
