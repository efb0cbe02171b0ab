//! Routes of the stand-in EJAT API.
//!
//! Every resource shares the same generic handlers. Only `/health_check`
//! and `/auth/login` are reachable without a bearer token.

use actix_multipart::Multipart;
use actix_web::{
    HttpRequest, HttpResponse, Responder, ResponseError, body::BoxBody,
    delete, dev::HttpServiceFactory, get, http::StatusCode, http::header,
    patch, post, web,
};
use futures::StreamExt;
use payloads::{requests, responses};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use uuid::Uuid;

use crate::store::{Store, StoreError};
use crate::telemetry::log_error;

pub fn api_services() -> impl HttpServiceFactory {
    web::scope("/api")
        .service(health_check)
        .service(login)
        .service(report_summary)
        .service(list_records)
        .service(list_related_records)
        .service(get_record)
        .service(create_record)
        .service(update_record)
        .service(delete_record)
}

/// Shared state: the record store, issued session tokens and the one
/// account that can sign in.
pub struct AppState {
    store: Mutex<Store>,
    sessions: Mutex<HashSet<String>>,
    admin_email: String,
    admin_password: SecretString,
    admin: payloads::User,
}

impl AppState {
    pub fn new(admin_email: String, admin_password: SecretString) -> Self {
        let admin = payloads::User {
            id: payloads::UserId(Uuid::new_v4()),
            name: "Platform Administrator".into(),
            email: admin_email.clone(),
            role: payloads::Role::SuperAdmin,
            created_at: jiff::Timestamp::now(),
        };
        let mut store = Store::new();
        match serde_json::to_value(&admin) {
            Ok(record) => {
                if let Err(e) = store.insert("users", record) {
                    log_error(e);
                }
            }
            Err(e) => log_error(e),
        }

        Self {
            store: Mutex::new(store),
            sessions: Mutex::new(HashSet::new()),
            admin_email,
            admin_password,
            admin,
        }
    }

    pub fn store(&self) -> Result<MutexGuard<'_, Store>, APIError> {
        self.store
            .lock()
            .map_err(|_| anyhow::anyhow!("store lock poisoned").into())
    }

    fn sessions(&self) -> Result<MutexGuard<'_, HashSet<String>>, APIError> {
        self.sessions
            .lock()
            .map_err(|_| anyhow::anyhow!("session lock poisoned").into())
    }

    /// Invalidate every issued token, as if all sessions expired.
    pub fn revoke_sessions(&self) -> Result<(), APIError> {
        self.sessions()?.clear();
        Ok(())
    }

    fn authorize(&self, req: &HttpRequest) -> Result<(), APIError> {
        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(APIError::AuthError)?;
        if !self.sessions()?.contains(token) {
            return Err(APIError::AuthError);
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum APIError {
    #[error("Unauthorized")]
    AuthError,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unprocessable(String),
    #[error("Something went wrong")]
    UnexpectedError(#[from] anyhow::Error),
}

impl ResponseError for APIError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::AuthError => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        if let Self::UnexpectedError(e) = self {
            tracing::error!("{e:#}");
        }
        HttpResponse::build(self.status_code())
            .json(json!({ "message": self.to_string() }))
    }
}

impl From<StoreError> for APIError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UnknownResource(_) | StoreError::RecordNotFound => {
                APIError::NotFound(e.to_string())
            }
            StoreError::NameRequired | StoreError::DuplicateName => {
                APIError::Unprocessable(e.to_string())
            }
            StoreError::NotAnObject | StoreError::IdentifierInBody => {
                APIError::BadRequest(e.to_string())
            }
        }
    }
}

fn bad_request(e: impl std::fmt::Display) -> APIError {
    APIError::BadRequest(e.to_string())
}

fn single(data: impl serde::Serialize) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "data": data, "success": true }))
}

/// Tests slow a response down with `?delay_ms=` to control arrival order.
async fn simulate_latency(query: &HashMap<String, String>) {
    if let Some(ms) = query.get("delay_ms").and_then(|ms| ms.parse::<u64>().ok()) {
        actix_web::rt::time::sleep(Duration::from_millis(ms)).await;
    }
}

/// `by-media-channel` filters on `mediaChannelId`.
fn relation_field(relation: &str) -> Option<String> {
    let target = relation.strip_prefix("by-")?;
    if target.is_empty() {
        return None;
    }
    let mut field = String::new();
    for (i, word) in target.split('-').enumerate() {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            if i == 0 {
                field.push(first);
            } else {
                field.extend(first.to_uppercase());
            }
            field.push_str(chars.as_str());
        }
    }
    field.push_str("Id");
    Some(field)
}

#[get("/health_check")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("healthy")
}

#[post("/auth/login")]
pub async fn login(
    state: web::Data<AppState>,
    details: web::Json<requests::LoginCredentials>,
) -> Result<HttpResponse, APIError> {
    let valid = details.email.eq_ignore_ascii_case(&state.admin_email)
        && details.password == state.admin_password.expose_secret();
    if !valid {
        tracing::info!(email = %details.email, "rejected login");
        return Err(APIError::AuthError);
    }

    let token = Uuid::new_v4().to_string();
    state.sessions()?.insert(token.clone());
    Ok(single(responses::Session {
        token,
        user: state.admin.clone(),
    }))
}

#[get("/reports/summary")]
pub async fn report_summary(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, APIError> {
    state.authorize(&req)?;
    let summary = state.store()?.summary();
    Ok(single(summary))
}

#[get("/{resource}")]
pub async fn list_records(
    req: HttpRequest,
    state: web::Data<AppState>,
    resource: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, APIError> {
    state.authorize(&req)?;
    simulate_latency(&query).await;
    let page = state.store()?.list(&resource, &query)?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/{resource}/{relation}/{id}")]
pub async fn list_related_records(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<(String, String, String)>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, APIError> {
    state.authorize(&req)?;
    let (resource, relation, id) = path.into_inner();
    let field = relation_field(&relation).ok_or_else(|| {
        APIError::NotFound(format!("Unknown relation `{relation}`"))
    })?;
    let mut query = query.into_inner();
    simulate_latency(&query).await;
    query.insert(field, id);
    let page = state.store()?.list(&resource, &query)?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/{resource}/{id}")]
pub async fn get_record(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, APIError> {
    state.authorize(&req)?;
    simulate_latency(&query).await;
    let (resource, id) = path.into_inner();
    let record = state.store()?.get(&resource, &id)?;
    Ok(single(record))
}

#[post("/{resource}")]
pub async fn create_record(
    req: HttpRequest,
    state: web::Data<AppState>,
    resource: web::Path<String>,
    payload: web::Payload,
) -> Result<HttpResponse, APIError> {
    state.authorize(&req)?;
    let is_multipart = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"));

    let body = if is_multipart {
        read_multipart(&req, payload).await?
    } else {
        read_json(payload).await?
    };
    let record = state.store()?.insert(&resource, body)?;
    tracing::debug!(resource = %resource, "created record");
    Ok(single(record))
}

#[patch("/{resource}/{id}")]
pub async fn update_record(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    body: web::Json<Value>,
) -> Result<HttpResponse, APIError> {
    state.authorize(&req)?;
    let (resource, id) = path.into_inner();
    let record = state.store()?.patch(&resource, &id, body.into_inner())?;
    Ok(single(record))
}

#[delete("/{resource}/{id}")]
pub async fn delete_record(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, APIError> {
    state.authorize(&req)?;
    let (resource, id) = path.into_inner();
    state.store()?.delete(&resource, &id)?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

async fn read_json(mut payload: web::Payload) -> Result<Value, APIError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        body.extend_from_slice(&chunk.map_err(bad_request)?);
    }
    serde_json::from_slice(&body).map_err(bad_request)
}

/// Text parts become string fields; file parts are recorded by name and
/// size only.
async fn read_multipart(
    req: &HttpRequest,
    payload: web::Payload,
) -> Result<Value, APIError> {
    let mut multipart = Multipart::new(req.headers(), payload);
    let mut record = Map::new();

    while let Some(field) = multipart.next().await {
        let mut field = field.map_err(bad_request)?;
        let Some(disposition) = field.content_disposition().cloned() else {
            continue;
        };
        let Some(name) = disposition.get_name().map(str::to_string) else {
            continue;
        };

        let mut bytes = web::BytesMut::new();
        while let Some(chunk) = field.next().await {
            bytes.extend_from_slice(&chunk.map_err(bad_request)?);
        }

        let value = match disposition.get_filename() {
            Some(file_name) => json!({
                "fileName": file_name,
                "size": bytes.len(),
            }),
            None => Value::String(String::from_utf8_lossy(&bytes).into_owned()),
        };
        record.insert(name, value);
    }

    Ok(Value::Object(record))
}

#[cfg(test)]
mod tests {
    use super::{AppState, relation_field};
    use secrecy::SecretString;
    use std::collections::HashMap;

    #[test]
    fn new_state_holds_the_admin_user() {
        let state = AppState::new("admin@ejat.test".into(), SecretString::from("pw"));
        let store = state.store().unwrap();
        let users = store.list("users", &HashMap::new()).unwrap();
        assert_eq!(users.total, 1);
        assert_eq!(users.data[0]["email"], "admin@ejat.test");
    }

    #[test]
    fn relation_names_map_to_foreign_keys() {
        assert_eq!(relation_field("by-category").as_deref(), Some("categoryId"));
        assert_eq!(
            relation_field("by-media-channel").as_deref(),
            Some("mediaChannelId")
        );
        assert_eq!(relation_field("by-"), None);
        assert_eq!(relation_field("archived"), None);
    }
}
