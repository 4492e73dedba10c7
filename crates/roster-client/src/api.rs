// Remote record store as seen by the client.
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};
use roster_common::{DeleteResponse, Person, PersonFields};
use serde::de::DeserializeOwned;

#[async_trait]
pub trait PeopleApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Person>>;
    async fn get(&self, id: i64) -> Result<Person>;
    async fn create(&self, fields: &PersonFields) -> Result<Person>;
    async fn update(&self, id: i64, fields: &PersonFields) -> Result<Person>;
    /// Number of removed records; 0 when the id was already gone.
    async fn delete(&self, id: i64) -> Result<u64>;
}

#[derive(Debug, Clone)]
pub struct HttpPeopleApi {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpPeopleApi {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl PeopleApi for HttpPeopleApi {
    async fn list(&self) -> Result<Vec<Person>> {
        let response = self.client.get(self.config.people_url()).send().await?;
        read_json(response, None).await
    }

    async fn get(&self, id: i64) -> Result<Person> {
        let response = self.client.get(self.config.person_url(id)).send().await?;
        read_json(response, Some(id)).await
    }

    async fn create(&self, fields: &PersonFields) -> Result<Person> {
        let response = self
            .client
            .post(self.config.people_url())
            .json(fields)
            .send()
            .await?;
        read_json(response, None).await
    }

    async fn update(&self, id: i64, fields: &PersonFields) -> Result<Person> {
        let response = self
            .client
            .put(self.config.person_url(id))
            .json(fields)
            .send()
            .await?;
        read_json(response, Some(id)).await
    }

    async fn delete(&self, id: i64) -> Result<u64> {
        let response = self
            .client
            .delete(self.config.person_url(id))
            .send()
            .await?;
        let body: DeleteResponse = read_json(response, Some(id)).await?;
        Ok(body.deleted)
    }
}

/// Check status and content type before decoding. A 404 on a single-record
/// call means the record is gone; anywhere else it is just a bad status.
async fn read_json<T: DeserializeOwned>(response: Response, id: Option<i64>) -> Result<T> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND
        && let Some(id) = id
    {
        return Err(ClientError::NotFound(id));
    }
    if !status.is_success() {
        return Err(ClientError::UnexpectedStatus(status.as_u16()));
    }
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if !content_type.starts_with("application/json") {
        return Err(ClientError::NotJson(content_type));
    }
    Ok(response.json().await?)
}
