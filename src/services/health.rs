use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use tracing::{error, trace};

use crate::repository::Repository;

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        repository: web::Data<Arc<dyn Repository>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        // 检查存储健康状况
        let storage_status =
            match tokio::time::timeout(Duration::from_secs(5), repository.list_projects()).await {
                Ok(Ok(projects)) => {
                    trace!(
                        "Repository health check passed, {} projects found",
                        projects.len()
                    );
                    json!({
                        "status": "healthy",
                        "projects_count": projects.len(),
                        "backend": repository.backend_name()
                    })
                }
                Ok(Err(e)) => {
                    error!("Repository health check failed: {}", e);
                    json!({
                        "status": "unhealthy",
                        "error": e.code(),
                        "backend": repository.backend_name()
                    })
                }
                Err(_) => {
                    error!("Repository health check timeout");
                    json!({
                        "status": "unhealthy",
                        "error": "timeout",
                        "backend": repository.backend_name()
                    })
                }
            };

        let now = chrono::Utc::now();
        let uptime_seconds = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;

        let is_healthy = storage_status["status"] == "healthy";

        let health_response = json!({
            "status": if is_healthy { "healthy" } else { "unhealthy" },
            "timestamp": now.to_rfc3339(),
            "uptime": uptime_seconds,
            "checks": {
                "repository": storage_status,
            },
            "response_time_ms": start_time.elapsed().as_millis()
        });

        let response_status = if is_healthy {
            actix_web::http::StatusCode::OK
        } else {
            actix_web::http::StatusCode::SERVICE_UNAVAILABLE
        };

        HttpResponse::build(response_status)
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(health_response)
    }
}
