//! IP 地址处理工具
//!
//! 追踪端点只把客户端 IP 用于日志与可能的地理定位，不落库。
//! 提取顺序：X-Forwarded-For 第一项 → X-Real-IP → 连接对端地址。

use actix_web::HttpRequest;

/// 从 HttpRequest 提取真实客户端 IP
pub fn extract_client_ip(req: &HttpRequest) -> Option<String> {
    extract_forwarded_ip_from_headers(req.headers())
        .or_else(|| req.connection_info().peer_addr().map(String::from))
}

/// 从 HeaderMap 提取转发的 IP（X-Forwarded-For 或 X-Real-IP）
pub fn extract_forwarded_ip_from_headers(
    headers: &actix_web::http::header::HeaderMap,
) -> Option<String> {
    // 优先 X-Forwarded-For（取第一个，即原始客户端 IP）
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            // 其次 X-Real-IP
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(String::from)
        })
}
