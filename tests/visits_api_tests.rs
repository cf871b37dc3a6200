//! Visit tracking API tests
//!
//! Full-stack tests for POST /visites and GET /visites/stats using the
//! file backend on a temporary directory.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::middleware::from_fn;
use actix_web::test::{self, TestRequest};
use actix_web::{web, App};
use tempfile::TempDir;

use vitrine::middleware::AuthMiddleware;
use vitrine::repository::backends::file::FileRepository;
use vitrine::repository::{NewVisit, Repository, VISIT_QUERY_LIMIT};
use vitrine::services::VisitService;

const CHROME_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

fn create_temp_repository() -> (Arc<dyn Repository>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let repository =
        FileRepository::new(temp_dir.path()).expect("Failed to create file repository");
    (Arc::new(repository) as Arc<dyn Repository>, temp_dir)
}

fn test_visit(page: &str, session: &str) -> NewVisit {
    NewVisit {
        page: page.to_string(),
        session_id: session.to_string(),
        device: "desktop".to_string(),
        browser: "Chrome".to_string(),
        os: "Windows".to_string(),
        ..Default::default()
    }
}

// =============================================================================
// POST /visites
// =============================================================================

#[actix_rt::test]
async fn test_create_visit_returns_201() {
    let (repository, _dir) = create_temp_repository();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(repository.clone()))
            .route("/visites", web::post().to(VisitService::create)),
    )
    .await;

    let req = TestRequest::post()
        .uri("/visites")
        .insert_header(("User-Agent", CHROME_UA))
        .set_payload(r#"{"page":"/projets","sessionId":"s1","duration":42}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["id"], 1);

    // 落库的记录应带服务端识别结果
    let visits = repository
        .visits_since(chrono::Utc::now() - chrono::Duration::days(1), 10)
        .await
        .unwrap();
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0].page, "/projets");
    assert_eq!(visits[0].device, "desktop");
    assert_eq!(visits[0].browser, "Chrome");
    assert_eq!(visits[0].os, "Windows");
    assert_eq!(visits[0].duration, 42);
}

#[actix_rt::test]
async fn test_create_visit_accepts_wrapped_body() {
    let (repository, _dir) = create_temp_repository();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(repository.clone()))
            .route("/visites", web::post().to(VisitService::create)),
    )
    .await;

    let req = TestRequest::post()
        .uri("/visites")
        .set_payload(r#"{"data":{"page":"/","sessionId":"s1","lcp":1500.0}}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);

    let visits = repository
        .visits_since(chrono::Utc::now() - chrono::Duration::days(1), 10)
        .await
        .unwrap();
    assert_eq!(visits[0].lcp, Some(1500.0));
}

#[actix_rt::test]
async fn test_create_visit_missing_page_is_rejected() {
    let (repository, _dir) = create_temp_repository();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(repository.clone()))
            .route("/visites", web::post().to(VisitService::create)),
    )
    .await;

    let req = TestRequest::post()
        .uri("/visites")
        .set_payload(r#"{"sessionId":"s1"}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // 无效请求不应落库
    let visits = repository
        .visits_since(chrono::Utc::now() - chrono::Duration::days(1), 10)
        .await
        .unwrap();
    assert!(visits.is_empty());
}

#[actix_rt::test]
async fn test_create_visit_invalid_json_is_rejected() {
    let (repository, _dir) = create_temp_repository();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(repository))
            .route("/visites", web::post().to(VisitService::create)),
    )
    .await;

    let req = TestRequest::post()
        .uri("/visites")
        .set_payload("not json at all")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_create_visit_negative_duration_clamped() {
    let (repository, _dir) = create_temp_repository();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(repository.clone()))
            .route("/visites", web::post().to(VisitService::create)),
    )
    .await;

    let req = TestRequest::post()
        .uri("/visites")
        .set_payload(r#"{"page":"/","sessionId":"s1","duration":-5}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let visits = repository
        .visits_since(chrono::Utc::now() - chrono::Duration::days(1), 10)
        .await
        .unwrap();
    assert_eq!(visits[0].duration, 0);
}

// =============================================================================
// GET /visites/stats
// =============================================================================

macro_rules! stats_app {
    ($repository:expr) => {
        test::init_service(
            App::new().app_data(web::Data::new($repository)).service(
                web::resource("/visites/stats")
                    .wrap(from_fn(AuthMiddleware::stats_auth))
                    .route(web::get().to(VisitService::stats)),
            ),
        )
        .await
    };
}

#[actix_rt::test]
async fn test_stats_requires_authorization_header() {
    let (repository, _dir) = create_temp_repository();
    let app = stats_app!(repository);

    let req = TestRequest::get().uri("/visites/stats").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Token requis");
}

#[actix_rt::test]
async fn test_stats_aggregates_visits() {
    let (repository, _dir) = create_temp_repository();

    repository.append_visit(test_visit("/", "s1")).await.unwrap();
    repository.append_visit(test_visit("/", "s1")).await.unwrap();
    repository
        .append_visit(test_visit("/projets", "s2"))
        .await
        .unwrap();

    let app = stats_app!(repository);

    let req = TestRequest::get()
        .uri("/visites/stats?days=7")
        .insert_header(("Authorization", "Bearer whatever"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let stats = &body["data"];
    assert_eq!(stats["totalVisites"], 3);
    assert_eq!(stats["sessionsUniques"], 2);
    assert_eq!(stats["jours"], 7);
    // 页面计数降序，(page, count) 序列化为二元数组
    assert_eq!(stats["parPage"][0][0], "/");
    assert_eq!(stats["parPage"][0][1], 2);
}

#[actix_rt::test]
async fn test_stats_invalid_days_falls_back_to_default() {
    let (repository, _dir) = create_temp_repository();
    let app = stats_app!(repository);

    let req = TestRequest::get()
        .uri("/visites/stats?days=abc")
        .insert_header(("Authorization", "Bearer whatever"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["jours"], 30);
}

#[actix_rt::test]
async fn test_stats_out_of_range_days_falls_back_to_default() {
    let (repository, _dir) = create_temp_repository();
    repository.append_visit(test_visit("/", "s1")).await.unwrap();
    let app = stats_app!(repository);

    // 超出 i64 毫秒范围的天数也必须正常响应，而不是中断请求
    for days in ["200000000000", "-3", "0", "99999"] {
        let req = TestRequest::get()
            .uri(&format!("/visites/stats?days={}", days))
            .insert_header(("Authorization", "Bearer whatever"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "days={}", days);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["jours"], 30, "days={}", days);
        assert_eq!(body["data"]["totalVisites"], 1, "days={}", days);
    }
}

#[actix_rt::test]
async fn test_stats_respects_query_limit_constant() {
    // 常量守护：聚合读取的上限不应被悄悄改小
    assert_eq!(VISIT_QUERY_LIMIT, 10_000);
}
