use actix_cors::Cors;
use actix_web::{middleware::from_fn, web, App, HttpServer};
use clap::Parser;
use tracing::info;

use vitrine::config::{Args, Config};
use vitrine::middleware::AuthMiddleware;
use vitrine::repository::RepositoryFactory;
use vitrine::services::{
    AppStartTime, ContactService, HealthService, ProjectService, VisitService,
};
use vitrine::system;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 记录程序启动时间
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    let args = Args::parse();

    // 加载 .env（--env-file 可指定路径）
    match &args.env_file {
        Some(path) => {
            dotenvy::from_path(path).ok();
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }

    let config = Config::load(&args);

    // 日志：guard 需要存活到进程结束
    let _log_guard = system::init_logging(&config);

    // 初始化存储后端
    let repository = RepositoryFactory::create(&config)
        .await
        .expect("Failed to create repository");
    info!("Using storage backend: {}", repository.backend_name());

    // 检查 Admin API 是否启用
    if config.admin_token.is_empty() {
        info!("Admin API is disabled (ADMIN_TOKEN not set)");
    } else {
        info!("Admin API available at: /admin");
    }

    let bind_address = config.bind_address();
    info!("Starting server at http://{}", bind_address);

    let server_config = config.clone();

    // Start the HTTP server
    HttpServer::new(move || {
        let config = server_config.clone();

        // 公开的追踪 beacon 需要跨域；配置了白名单则只放行白名单
        let cors = if config.allowed_origins.is_empty() {
            Cors::default()
                .allow_any_origin()
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
                .allow_any_header()
                .max_age(3600)
        } else {
            let mut cors = Cors::default()
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
                .allow_any_header()
                .max_age(3600);
            for origin in &config.allowed_origins {
                cors = cors.allowed_origin(origin);
            }
            cors
        };

        App::new()
            .app_data(web::Data::new(repository.clone()))
            .app_data(web::Data::new(config))
            .app_data(web::Data::new(app_start_time.clone()))
            .wrap(cors)
            // 访问追踪
            .route("/visites", web::post().to(VisitService::create))
            .service(
                web::resource("/visites/stats")
                    .wrap(from_fn(AuthMiddleware::stats_auth))
                    .route(web::get().to(VisitService::stats)),
            )
            // 作品集（公开读取）
            .route("/projets", web::get().to(ProjectService::list))
            .route("/projets/{id}", web::get().to(ProjectService::get))
            // 联系表单
            .route("/contact", web::post().to(ContactService::create))
            // Admin API
            .service(
                web::scope("/admin")
                    .wrap(from_fn(AuthMiddleware::admin_auth))
                    .route("/projets", web::post().to(ProjectService::create))
                    .route("/projets/{id}", web::put().to(ProjectService::update))
                    .route("/projets/{id}", web::delete().to(ProjectService::delete))
                    .route("/contact", web::get().to(ContactService::list))
                    .route("/contact/{id}", web::delete().to(ContactService::delete)),
            )
            // 健康检查
            .route("/health", web::get().to(HealthService::health_check))
    })
    .bind(bind_address)?
    .run()
    .await
}
