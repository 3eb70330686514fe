//! REST template store.
//!
//! | Operation | Request |
//! |---|---|
//! | list   | `GET    {base}/{collection}` |
//! | get    | `GET    {base}/{collection}/{id}` |
//! | create | `POST   {base}/{collection}` with the record as JSON |
//! | delete | `DELETE {base}/{collection}/{id}` |
//!
//! List responses may be a bare array or wrapped as `{ "data": [...] }`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::TemplateId;

use super::record::TemplateRecord;
use super::store::TemplateStore;

pub const DEFAULT_COLLECTION: &str = "invoice-templates";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("invoice-designer/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody {
    Bare(Vec<TemplateRecord>),
    Envelope { data: Vec<TemplateRecord> },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordBody {
    Bare(TemplateRecord),
    Envelope { data: TemplateRecord },
}

#[derive(Debug, Clone)]
pub struct HttpTemplateStore {
    client: Client,
    collection_url: Url,
    token: Option<String>,
}

impl HttpTemplateStore {
    /// Build a store for `collection` under `base_url`.
    pub fn new(
        base_url: &str,
        collection: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let mut collection_url = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("invalid store url {base_url:?}: {e}")))?;
        collection_url
            .path_segments_mut()
            .map_err(|_| AppError::Config(format!("store url {base_url:?} cannot be a base")))?
            .pop_if_empty()
            .push(collection);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Transport(format!("HTTP client error: {e}")))?;

        Ok(Self {
            client,
            collection_url,
            token,
        })
    }

    pub fn collection_url(&self) -> &Url {
        &self.collection_url
    }

    fn item_url(&self, id: &TemplateId) -> Url {
        let mut url = self.collection_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id.as_str());
        }
        url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, AppError> {
        self.authorize(request)
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("template store unreachable: {e}")))
    }
}

/// Map a non-success response to an error, reading its body as the message.
async fn check(response: Response, id: Option<&TemplateId>) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        if let Some(id) = id {
            return Err(AppError::NotFound(format!("template {id} not found")));
        }
    }
    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body
    };
    Err(AppError::Storage {
        status: status.as_u16(),
        message,
    })
}

async fn read_json<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T, AppError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::Transport(format!("cannot read store response: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::Transport(format!("unexpected store response: {e}")))
}

#[async_trait]
impl TemplateStore for HttpTemplateStore {
    async fn list(&self) -> Result<Vec<TemplateRecord>, AppError> {
        let response = self.send(self.client.get(self.collection_url.clone())).await?;
        let body: ListBody = read_json(check(response, None).await?).await?;
        Ok(match body {
            ListBody::Bare(records) | ListBody::Envelope { data: records } => records,
        })
    }

    async fn get(&self, id: &TemplateId) -> Result<TemplateRecord, AppError> {
        let response = self.send(self.client.get(self.item_url(id))).await?;
        let body: RecordBody = read_json(check(response, Some(id)).await?).await?;
        Ok(match body {
            RecordBody::Bare(record) | RecordBody::Envelope { data: record } => record,
        })
    }

    async fn create(&self, record: &TemplateRecord) -> Result<TemplateRecord, AppError> {
        let request = self.client.post(self.collection_url.clone()).json(record);
        let response = self.send(request).await?;
        let body: RecordBody = read_json(check(response, None).await?).await?;
        let stored = match body {
            RecordBody::Bare(stored) | RecordBody::Envelope { data: stored } => stored,
        };
        tracing::info!(id = ?stored.id, url = %self.collection_url, "template created");
        Ok(stored)
    }

    async fn delete(&self, id: &TemplateId) -> Result<(), AppError> {
        let response = self.send(self.client.delete(self.item_url(id))).await?;
        check(response, Some(id)).await?;
        Ok(())
    }
}
