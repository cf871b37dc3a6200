//! Visit tracking endpoints
//!
//! - `POST /visites`：公开的追踪 beacon，无需认证
//! - `GET /visites/stats`：聚合统计，由 stats_auth 中间件保护

use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info};

use crate::analytics::{aggregate, detect_browser, detect_device, detect_os};
use crate::repository::{NewVisit, Repository, VISIT_QUERY_LIMIT};
use crate::utils::ip::extract_client_ip;

/// 落库前 User-Agent 截断长度
const MAX_USER_AGENT_LEN: usize = 500;

/// 默认统计窗口（天）
const DEFAULT_STATS_DAYS: u32 = 30;

/// 统计窗口上限（十年）。超出上限的值按无效处理，退回默认值，
/// 同时避免超大时长撑爆 chrono 的时间运算范围
const MAX_STATS_DAYS: u32 = 3650;

/// 追踪事件载荷，除 page 外全部可选
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisitPayload {
    pub page: String,
    pub referrer: String,
    pub user_agent: Option<String>,
    pub language: String,
    pub screen_width: Option<i32>,
    pub screen_height: Option<i32>,
    pub session_id: String,
    pub duration: i32,
    pub lcp: Option<f64>,
    pub fcp: Option<f64>,
    pub cls: Option<f64>,
    pub ttfb: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    /// 窗口天数；解析失败、非正数或超出上限时退回默认值，不报错
    pub days: Option<String>,
}

pub struct VisitService;

impl VisitService {
    /// POST /visites — 记录一次页面访问或离开事件
    pub async fn create(
        req: HttpRequest,
        body: web::Bytes,
        repository: web::Data<Arc<dyn Repository>>,
    ) -> impl Responder {
        // sendBeacon 不保证 Content-Type，手动解析 body；
        // 同时兼容 { data: {...} } 包装和裸对象两种形态
        let payload = match Self::parse_payload(&body) {
            Ok(payload) => payload,
            Err(message) => {
                debug!("Visit rejected: {}", message);
                return HttpResponse::BadRequest().json(json!({ "error": message }));
            }
        };

        if payload.page.trim().is_empty() {
            debug!("Visit rejected: empty page");
            return HttpResponse::BadRequest()
                .json(json!({ "error": "Le champ \"page\" est requis" }));
        }

        // 客户端 IP 仅用于日志（以及将来可能的地理定位），不落库
        if let Some(ip) = extract_client_ip(&req) {
            debug!("Visit from {} on {}", ip, payload.page);
        }

        // UA 优先取载荷中的值（sendBeacon 场景），否则取请求头
        let user_agent = payload
            .user_agent
            .filter(|ua| !ua.is_empty())
            .or_else(|| {
                req.headers()
                    .get("User-Agent")
                    .and_then(|h| h.to_str().ok())
                    .map(String::from)
            })
            .unwrap_or_default();
        let user_agent = truncate_chars(&user_agent, MAX_USER_AGENT_LEN);

        let new_visit = NewVisit {
            page: payload.page,
            referrer: payload.referrer,
            language: payload.language,
            screen_width: payload.screen_width,
            screen_height: payload.screen_height,
            device: detect_device(&user_agent).as_str().to_string(),
            browser: detect_browser(&user_agent).as_str().to_string(),
            os: detect_os(&user_agent).as_str().to_string(),
            session_id: payload.session_id,
            duration: payload.duration.max(0),
            lcp: payload.lcp,
            fcp: payload.fcp,
            cls: payload.cls,
            ttfb: payload.ttfb,
            user_agent,
        };

        match repository.append_visit(new_visit).await {
            Ok(id) => HttpResponse::Created().json(json!({ "data": { "id": id } })),
            Err(e) => {
                error!("Failed to persist visit: {}", e);
                HttpResponse::InternalServerError().json(json!({ "error": "Internal error" }))
            }
        }
    }

    /// GET /visites/stats?days=N — 聚合统计
    pub async fn stats(
        query: web::Query<StatsQuery>,
        repository: web::Data<Arc<dyn Repository>>,
    ) -> impl Responder {
        let days = query
            .days
            .as_deref()
            .and_then(|d| d.parse::<u32>().ok())
            .filter(|d| (1..=MAX_STATS_DAYS).contains(d))
            .unwrap_or(DEFAULT_STATS_DAYS);

        let cutoff = chrono::Utc::now() - chrono::Duration::days(i64::from(days));

        let visits = match repository.visits_since(cutoff, VISIT_QUERY_LIMIT).await {
            Ok(visits) => visits,
            Err(e) => {
                error!("Failed to load visits for stats: {}", e);
                return HttpResponse::InternalServerError()
                    .json(json!({ "error": "Internal error" }));
            }
        };

        info!("Stats computed over {} visits ({} days)", visits.len(), days);

        let stats = aggregate(&visits, days);
        HttpResponse::Ok().json(json!({ "data": stats }))
    }

    fn parse_payload(body: &[u8]) -> Result<VisitPayload, &'static str> {
        let value: serde_json::Value =
            serde_json::from_slice(body).map_err(|_| "Corps JSON invalide")?;

        // Strapi 时代的客户端发 { data: {...} }，新 tracker 发裸对象
        let record = match value.get("data") {
            Some(data) if data.is_object() => data.clone(),
            _ => value,
        };

        serde_json::from_value(record).map_err(|_| "Corps JSON invalide")
    }
}

/// 按字符截断，避免切在 UTF-8 编码中间
fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
