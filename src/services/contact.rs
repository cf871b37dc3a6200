//! Contact form endpoints
//!
//! 表单提交公开；收件箱读取与删除走 /admin 前缀。

use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use tracing::{error, info};

use crate::errors::VitrineError;
use crate::repository::{NewMessage, Repository};

pub struct ContactService;

impl ContactService {
    /// POST /contact
    pub async fn create(
        payload: web::Json<NewMessage>,
        repository: web::Data<Arc<dyn Repository>>,
    ) -> impl Responder {
        let payload = payload.into_inner();

        if let Some(message) = validate_message(&payload) {
            return HttpResponse::BadRequest().json(json!({ "error": message }));
        }

        match repository.append_message(payload).await {
            Ok(id) => {
                info!("Contact message {} received", id);
                HttpResponse::Created().json(json!({ "data": { "id": id } }))
            }
            Err(e) => {
                error!("Failed to store contact message: {}", e);
                HttpResponse::InternalServerError().json(json!({ "error": "Internal error" }))
            }
        }
    }

    /// GET /admin/contact
    pub async fn list(repository: web::Data<Arc<dyn Repository>>) -> impl Responder {
        match repository.list_messages().await {
            Ok(messages) => HttpResponse::Ok().json(json!({ "data": messages })),
            Err(e) => {
                error!("Failed to list contact messages: {}", e);
                HttpResponse::InternalServerError().json(json!({ "error": "Internal error" }))
            }
        }
    }

    /// DELETE /admin/contact/{id}
    pub async fn delete(
        path: web::Path<i64>,
        repository: web::Data<Arc<dyn Repository>>,
    ) -> impl Responder {
        let id = path.into_inner();

        match repository.remove_message(id).await {
            Ok(()) => HttpResponse::NoContent().finish(),
            Err(VitrineError::NotFound(_)) => {
                HttpResponse::NotFound().json(json!({ "error": "Message introuvable" }))
            }
            Err(e) => {
                error!("Failed to delete contact message {}: {}", id, e);
                HttpResponse::InternalServerError().json(json!({ "error": "Internal error" }))
            }
        }
    }
}

fn validate_message(payload: &NewMessage) -> Option<&'static str> {
    if payload.name.trim().is_empty() {
        return Some("Le champ \"name\" est requis");
    }
    if payload.email.trim().is_empty() || !payload.email.contains('@') {
        return Some("Adresse email invalide");
    }
    if payload.message.trim().is_empty() {
        return Some("Le champ \"message\" est requis");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> NewMessage {
        NewMessage {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            message: "Bonjour !".to_string(),
        }
    }

    #[test]
    fn test_valid_message_passes() {
        assert_eq!(validate_message(&message()), None);
    }

    #[test]
    fn test_missing_fields_rejected() {
        let mut m = message();
        m.name = "  ".to_string();
        assert!(validate_message(&m).is_some());

        let mut m = message();
        m.message = String::new();
        assert!(validate_message(&m).is_some());
    }

    #[test]
    fn test_email_must_contain_at() {
        let mut m = message();
        m.email = "not-an-email".to_string();
        assert_eq!(validate_message(&m), Some("Adresse email invalide"));
    }
}
