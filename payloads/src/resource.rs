//! Generic CRUD client for one REST resource.
//!
//! A [`Resource`] is bound to a base path such as `/categories`. Every read
//! returns a [`PendingRequest`] so the caller can abandon it; writes are
//! plain futures.

use std::{fmt, future::Future, marker::PhantomData};

use futures::{
    FutureExt,
    future::{AbortHandle, Abortable, Aborted, LocalBoxFuture},
};
use reqwest::multipart::{Form, Part};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::api_client::{APIClient, ClientError, ok_body, ok_empty, ok_single};
use crate::requests::ListParams;
use crate::responses::{Paginated, Single};

pub const DEFAULT_ID_FIELD: &str = "id";

/// Cooperative cancellation for one in-flight request.
///
/// Cancelling drops the underlying transport future, which aborts the fetch,
/// and makes the request resolve to [`ClientError::Canceled`].
#[derive(Debug, Clone)]
pub struct CancelHandle(AbortHandle);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.abort();
    }

    pub fn is_canceled(&self) -> bool {
        self.0.is_aborted()
    }
}

/// A started read and the handle that cancels it.
pub struct PendingRequest<R> {
    pub request: LocalBoxFuture<'static, Result<R, ClientError>>,
    pub cancel: CancelHandle,
}

impl<R: 'static> PendingRequest<R> {
    pub fn new(
        future: impl Future<Output = Result<R, ClientError>> + 'static,
    ) -> Self {
        let (handle, registration) = AbortHandle::new_pair();
        let request = Abortable::new(future, registration)
            .map(|result| match result {
                Ok(inner) => inner,
                Err(Aborted) => Err(ClientError::Canceled),
            })
            .boxed_local();
        Self {
            request,
            cancel: CancelHandle(handle),
        }
    }
}

impl<R> fmt::Debug for PendingRequest<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRequest")
            .field("cancel", &self.cancel)
            .finish_non_exhaustive()
    }
}

/// A file attached to a create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub field: String,
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

/// Operations on one REST resource whose entities decode as `T`.
pub struct Resource<T> {
    client: APIClient,
    base_path: String,
    id_field: String,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            base_path: self.base_path.clone(),
            id_field: self.id_field.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T> PartialEq for Resource<T> {
    fn eq(&self, other: &Self) -> bool {
        self.base_path == other.base_path
            && self.id_field == other.id_field
            && self.client.address == other.client.address
    }
}

impl<T> fmt::Debug for Resource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("base_path", &self.base_path)
            .field("id_field", &self.id_field)
            .finish_non_exhaustive()
    }
}

impl<T: DeserializeOwned + 'static> Resource<T> {
    pub fn new(client: APIClient, base_path: impl Into<String>) -> Self {
        Self {
            client,
            base_path: base_path.into(),
            id_field: DEFAULT_ID_FIELD.to_string(),
            _entity: PhantomData,
        }
    }

    /// Use a different identifier field for [`Resource::update`].
    pub fn with_id_field(mut self, id_field: impl Into<String>) -> Self {
        self.id_field = id_field.into();
        self
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn client(&self) -> &APIClient {
        &self.client
    }

    fn path(&self, extended_path: &str) -> String {
        format!("{}{extended_path}", self.base_path)
    }

    fn item_path(&self, extended_path: &str, id: &dyn fmt::Display) -> String {
        format!("{}{extended_path}/{id}", self.base_path)
    }

    /// GET one page of the resource. Params are not validated here.
    pub fn list(
        &self,
        params: &ListParams,
        extended_path: &str,
    ) -> PendingRequest<Paginated<T>> {
        self.pending_page(self.path(extended_path), params.to_query())
    }

    /// GET one page of the entries belonging to another entity, at
    /// `base + extended_path + "/" + id`.
    pub fn list_by_item(
        &self,
        id: impl fmt::Display,
        params: &ListParams,
        extended_path: &str,
    ) -> PendingRequest<Paginated<T>> {
        self.pending_page(self.item_path(extended_path, &id), params.to_query())
    }

    pub fn show(
        &self,
        id: impl fmt::Display,
        extended_path: &str,
    ) -> PendingRequest<Single<T>> {
        self.pending_single(self.item_path(extended_path, &id))
    }

    /// GET a non-paginated payload such as a report.
    pub fn fetch(&self, extended_path: &str) -> PendingRequest<Single<T>> {
        self.pending_single(self.path(extended_path))
    }

    pub async fn create<P: Serialize + ?Sized>(
        &self,
        payload: &P,
        extended_path: &str,
    ) -> Result<Single<T>, ClientError> {
        let response =
            self.client.post(&self.path(extended_path), payload).await?;
        ok_single(response).await
    }

    /// POST as multipart when there are files, JSON otherwise.
    pub async fn create_with_files<P: Serialize + ?Sized>(
        &self,
        payload: &P,
        files: Vec<Upload>,
        extended_path: &str,
    ) -> Result<Single<T>, ClientError> {
        if files.is_empty() {
            return self.create(payload, extended_path).await;
        }
        let form = multipart_form(payload, files)?;
        let response = self
            .client
            .post_multipart(&self.path(extended_path), form)
            .await?;
        ok_single(response).await
    }

    /// PATCH an entity. The identifier is taken out of the payload and sent
    /// only as the last path segment.
    pub async fn update<P: Serialize + ?Sized>(
        &self,
        payload: &P,
        extended_path: &str,
    ) -> Result<Single<T>, ClientError> {
        let (id, body) = split_identifier(payload, &self.id_field)?;
        let path = self.item_path(extended_path, &id);
        let response = self.client.patch(&path, &body).await?;
        ok_single(response).await
    }

    pub async fn delete(
        &self,
        id: impl fmt::Display,
        extended_path: &str,
    ) -> Result<(), ClientError> {
        let path = self.item_path(extended_path, &id);
        let response = self.client.delete(&path).await?;
        ok_empty(response).await
    }

    fn pending_page(
        &self,
        path: String,
        query: Vec<(String, String)>,
    ) -> PendingRequest<Paginated<T>> {
        let client = self.client.clone();
        PendingRequest::new(async move {
            let response = client.get(&path, &query).await?;
            ok_body(response).await
        })
    }

    fn pending_single(&self, path: String) -> PendingRequest<Single<T>> {
        let client = self.client.clone();
        PendingRequest::new(async move {
            let response = client.get(&path, &[]).await?;
            ok_single(response).await
        })
    }
}

/// Serialize `payload` and remove its identifier field, returning the
/// identifier as a path segment and the remaining body.
pub fn split_identifier<P: Serialize + ?Sized>(
    payload: &P,
    id_field: &str,
) -> Result<(String, Map<String, Value>), ClientError> {
    let missing = || ClientError::MissingIdentifier(id_field.to_string());
    let Value::Object(mut body) = serde_json::to_value(payload)? else {
        return Err(missing());
    };
    let id = match body.remove(id_field) {
        Some(Value::String(id)) if !id.is_empty() => id,
        Some(Value::Number(id)) => id.to_string(),
        _ => return Err(missing()),
    };
    Ok((id, body))
}

/// Scalar fields become text parts; nested values are sent as JSON text.
fn multipart_form<P: Serialize + ?Sized>(
    payload: &P,
    files: Vec<Upload>,
) -> Result<Form, ClientError> {
    let mut form = Form::new();
    if let Value::Object(fields) = serde_json::to_value(payload)? {
        for (name, value) in fields {
            let text = match value {
                Value::Null => continue,
                Value::String(text) => text,
                other => other.to_string(),
            };
            form = form.text(name, text);
        }
    }
    for upload in files {
        let mut part = Part::bytes(upload.bytes).file_name(upload.file_name);
        if let Some(mime) = upload.mime {
            part = part
                .mime_str(&mime)
                .map_err(|_| ClientError::InvalidMime(mime.clone()))?;
        }
        form = form.part(upload.field, part);
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requests::UpdateCategory;
    use crate::{CategoryId, ClientConfig};
    use futures::executor::block_on;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn identifier_moves_out_of_the_body() {
        let id = CategoryId(Uuid::new_v4());
        let payload = UpdateCategory {
            id,
            name: "Investigative".into(),
            description: None,
        };

        let (path_id, body) = split_identifier(&payload, "id").unwrap();

        assert_eq!(path_id, id.to_string());
        assert!(!body.contains_key("id"));
        assert_eq!(body.get("name"), Some(&json!("Investigative")));
    }

    #[test]
    fn numeric_and_custom_identifiers() {
        let payload = json!({ "slug_id": 42, "name": "Radio" });

        let (path_id, body) = split_identifier(&payload, "slug_id").unwrap();

        assert_eq!(path_id, "42");
        assert_eq!(body.len(), 1);
    }

    #[test]
    fn missing_identifier_is_an_error() {
        let payload = json!({ "name": "Radio" });
        let error = split_identifier(&payload, "id").unwrap_err();
        assert!(matches!(error, ClientError::MissingIdentifier(field) if field == "id"));

        let payload = json!({ "id": null });
        assert!(split_identifier(&payload, "id").is_err());
    }

    #[test]
    fn malformed_upload_type_is_rejected_before_sending() {
        let logo = Upload {
            field: "logo".into(),
            file_name: "logo.png".into(),
            mime: Some("image".into()),
            bytes: vec![1],
        };
        let result = multipart_form(&json!({ "name": "Radio" }), vec![logo]);
        assert!(matches!(result, Err(ClientError::InvalidMime(mime)) if mime == "image"));

        let logo = Upload {
            field: "logo".into(),
            file_name: "logo.png".into(),
            mime: Some("image/png".into()),
            bytes: vec![1],
        };
        assert!(multipart_form(&json!({ "name": "Radio" }), vec![logo]).is_ok());
    }

    #[test]
    fn canceled_request_resolves_to_canceled() {
        let pending = PendingRequest::new(futures::future::pending::<
            Result<u32, ClientError>,
        >());
        pending.cancel.cancel();

        assert!(pending.cancel.is_canceled());
        let result = block_on(pending.request);
        assert!(matches!(result, Err(ClientError::Canceled)));
    }

    #[test]
    fn uncanceled_request_passes_through() {
        let pending = PendingRequest::new(async { Ok::<_, ClientError>(7) });
        assert_eq!(block_on(pending.request).unwrap(), 7);
    }

    #[test]
    fn resource_paths() {
        let client = APIClient::new(&ClientConfig::new("http://localhost"));
        let resource = Resource::<crate::Category>::new(client, "/categories");

        assert_eq!(resource.path(""), "/categories");
        assert_eq!(resource.path("/archived"), "/categories/archived");
        assert_eq!(resource.item_path("/by-award", &"a1"), "/categories/by-award/a1");
    }
}
