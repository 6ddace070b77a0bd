//! `reqwest`-backed implementation of `NotesApi`.
//!
//! # Responsibility
//! - Map each service operation onto its REST route and JSON body.
//! - Translate transport errors and status codes into `ApiError`.
//!
//! # Invariants
//! - Note ids are always encoded as a single path segment.
//! - Empty filter values are never sent as query parameters.

use crate::client::{ApiError, ApiResult, NotesApi};
use crate::config::ClientConfig;
use crate::model::note::{NewNote, Note, NoteFilter, NoteId, NoteUpdate};
use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

/// HTTP client for the notes service.
#[derive(Debug, Clone)]
pub struct HttpNotesClient {
    http: Client,
    base_url: Url,
}

impl HttpNotesClient {
    /// Builds a client from validated configuration.
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| ApiError::Transport(err.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> ApiResult<RequestBuilder> {
        let url = self.url(segments)?;
        debug!("event=api_request module=client method={method} path={}", url.path());
        Ok(self.http.request(method, url))
    }
}

#[async_trait]
impl NotesApi for HttpNotesClient {
    async fn list_notes(&self, filter: &NoteFilter) -> ApiResult<Vec<Note>> {
        let request = self
            .request(Method::GET, &["notes"])?
            .query(&filter.query_pairs());
        let response = send(request).await?;
        decode(ensure_success(response, None)?).await
    }

    async fn get_note(&self, id: &NoteId) -> ApiResult<Note> {
        let request = self.request(Method::GET, &["notes", id.as_str()])?;
        let response = send(request).await?;
        decode(ensure_success(response, Some(id))?).await
    }

    async fn create_note(&self, note: &NewNote) -> ApiResult<Note> {
        let request = self.request(Method::POST, &["notes"])?.json(note);
        let response = send(request).await?;
        decode(ensure_success(response, None)?).await
    }

    async fn update_note(&self, id: &NoteId, update: &NoteUpdate) -> ApiResult<Note> {
        let request = self
            .request(Method::PUT, &["notes", id.as_str()])?
            .json(update);
        let response = send(request).await?;
        decode(ensure_success(response, Some(id))?).await
    }

    async fn delete_note(&self, id: &NoteId) -> ApiResult<()> {
        let request = self.request(Method::DELETE, &["notes", id.as_str()])?;
        let response = send(request).await?;
        ensure_success(response, Some(id))?;
        Ok(())
    }

    async fn list_tags(&self) -> ApiResult<Vec<String>> {
        let request = self.request(Method::GET, &["tags"])?;
        let response = send(request).await?;
        decode(ensure_success(response, None)?).await
    }
}

async fn send(request: RequestBuilder) -> ApiResult<Response> {
    request
        .send()
        .await
        .map_err(|err| ApiError::Transport(err.to_string()))
}

fn ensure_success(response: Response, target: Option<&NoteId>) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match (status, target) {
        (StatusCode::NOT_FOUND, Some(id)) => Err(ApiError::NotFound(id.clone())),
        _ => Err(ApiError::Status {
            status: status.as_u16(),
        }),
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let body = response
        .text()
        .await
        .map_err(|err| ApiError::Transport(err.to_string()))?;
    serde_json::from_str(&body).map_err(|err| ApiError::Decode(err.to_string()))
}
