use actix_web::middleware::Next;
use actix_web::{
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web, Error, HttpResponse,
};
use tracing::{debug, info};

use crate::config::Config;

pub struct AuthMiddleware;

impl AuthMiddleware {
    /// Admin API 身份验证中间件（作品管理、收件箱）
    ///
    /// token 与配置中的 ADMIN_TOKEN 比对；token 为空视为 Admin API 禁用，
    /// 返回 404 隐藏端点。
    pub async fn admin_auth(
        req: ServiceRequest,
        next: Next<BoxBody>,
    ) -> Result<ServiceResponse<BoxBody>, Error> {
        if req.method() == actix_web::http::Method::OPTIONS {
            // 对于 OPTIONS 请求，直接返回 204 No Content
            return Ok(req.into_response(HttpResponse::NoContent().finish()));
        }

        let admin_token = req
            .app_data::<web::Data<Config>>()
            .map(|config| config.admin_token.clone())
            .unwrap_or_default();

        // 如果 token 为空，认为 Admin API 被禁用
        if admin_token.is_empty() {
            return Ok(req.into_response(
                HttpResponse::NotFound()
                    .insert_header(("Content-Type", "text/html; charset=utf-8"))
                    .body("Not Found"),
            ));
        }

        // 检查 Authorization header
        if let Some(auth_header) = req.headers().get("Authorization") {
            if let Some(auth_bytes) = auth_header.as_bytes().strip_prefix(b"Bearer ") {
                if auth_bytes == admin_token.as_bytes() {
                    debug!("Admin API authentication succeeded");
                    return next.call(req).await;
                }
            }
        }

        info!("Admin API authentication failed: token mismatch or missing Authorization header");
        Ok(req.into_response(
            HttpResponse::Unauthorized()
                .append_header(("Content-Type", "application/json; charset=utf-8"))
                .json(serde_json::json!({
                    "error": "Unauthorized: Invalid or missing token"
                })),
        ))
    }

    /// 统计端点的认证中间件
    ///
    /// 只检查 Authorization header 是否存在，不校验内容，
    /// 与线上仪表盘的历史契约保持一致。
    pub async fn stats_auth(
        req: ServiceRequest,
        next: Next<BoxBody>,
    ) -> Result<ServiceResponse<BoxBody>, Error> {
        if req.method() == actix_web::http::Method::OPTIONS {
            return Ok(req.into_response(HttpResponse::NoContent().finish()));
        }

        if req.headers().get("Authorization").is_none() {
            info!("Stats endpoint rejected: missing Authorization header");
            return Ok(req.into_response(
                HttpResponse::Unauthorized()
                    .append_header(("Content-Type", "application/json; charset=utf-8"))
                    .json(serde_json::json!({
                        "error": "Token requis"
                    })),
            ));
        }

        next.call(req).await
    }
}
