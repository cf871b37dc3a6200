//! Project gallery endpoints
//!
//! 列表与详情公开；创建 / 更新 / 删除走 /admin 前缀，由 admin_auth 保护。

use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use tracing::{error, info};

use crate::errors::VitrineError;
use crate::repository::{NewProject, Repository};

pub struct ProjectService;

impl ProjectService {
    /// GET /projets
    pub async fn list(repository: web::Data<Arc<dyn Repository>>) -> impl Responder {
        match repository.list_projects().await {
            Ok(projects) => HttpResponse::Ok().json(json!({ "data": projects })),
            Err(e) => {
                error!("Failed to list projects: {}", e);
                HttpResponse::InternalServerError().json(json!({ "error": "Internal error" }))
            }
        }
    }

    /// GET /projets/{id}
    pub async fn get(
        path: web::Path<i64>,
        repository: web::Data<Arc<dyn Repository>>,
    ) -> impl Responder {
        let id = path.into_inner();

        match repository.get_project(id).await {
            Ok(Some(project)) => HttpResponse::Ok().json(json!({ "data": project })),
            Ok(None) => HttpResponse::NotFound().json(json!({ "error": "Projet introuvable" })),
            Err(e) => {
                error!("Failed to get project {}: {}", id, e);
                HttpResponse::InternalServerError().json(json!({ "error": "Internal error" }))
            }
        }
    }

    /// POST /admin/projets
    pub async fn create(
        payload: web::Json<NewProject>,
        repository: web::Data<Arc<dyn Repository>>,
    ) -> impl Responder {
        let payload = payload.into_inner();

        if payload.title.trim().is_empty() {
            return HttpResponse::BadRequest()
                .json(json!({ "error": "Le champ \"title\" est requis" }));
        }

        match repository.insert_project(payload).await {
            Ok(project) => {
                info!("Admin API: project {} created", project.id);
                HttpResponse::Created().json(json!({ "data": project }))
            }
            Err(e) => {
                error!("Failed to create project: {}", e);
                HttpResponse::InternalServerError().json(json!({ "error": "Internal error" }))
            }
        }
    }

    /// PUT /admin/projets/{id}
    pub async fn update(
        path: web::Path<i64>,
        payload: web::Json<NewProject>,
        repository: web::Data<Arc<dyn Repository>>,
    ) -> impl Responder {
        let id = path.into_inner();
        let payload = payload.into_inner();

        if payload.title.trim().is_empty() {
            return HttpResponse::BadRequest()
                .json(json!({ "error": "Le champ \"title\" est requis" }));
        }

        match repository.update_project(id, payload).await {
            Ok(project) => HttpResponse::Ok().json(json!({ "data": project })),
            Err(VitrineError::NotFound(_)) => {
                HttpResponse::NotFound().json(json!({ "error": "Projet introuvable" }))
            }
            Err(e) => {
                error!("Failed to update project {}: {}", id, e);
                HttpResponse::InternalServerError().json(json!({ "error": "Internal error" }))
            }
        }
    }

    /// DELETE /admin/projets/{id}
    pub async fn delete(
        path: web::Path<i64>,
        repository: web::Data<Arc<dyn Repository>>,
    ) -> impl Responder {
        let id = path.into_inner();

        match repository.remove_project(id).await {
            Ok(()) => HttpResponse::NoContent().finish(),
            Err(VitrineError::NotFound(_)) => {
                HttpResponse::NotFound().json(json!({ "error": "Projet introuvable" }))
            }
            Err(e) => {
                error!("Failed to delete project {}: {}", id, e);
                HttpResponse::InternalServerError().json(json!({ "error": "Internal error" }))
            }
        }
    }
}
