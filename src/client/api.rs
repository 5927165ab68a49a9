use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::client::config::ClientConfig;
use crate::client::error::ClientError;
use crate::client::photo::Photo;
use crate::features::analysis::dtos::AnalyzeImageResponseDto;
use crate::features::sightings::dtos::{
    CreateSightingDto, CreateSightingResponseDto, SightingDetailResponseDto, SightingDto,
    SightingListResponseDto,
};
use crate::features::uploads::dtos::UploadResponseDto;
use crate::shared::types::ErrorResponse;

/// The server endpoints the workflow and views depend on
#[async_trait]
pub trait ReportBackend: Send + Sync {
    async fn upload_image(
        &self,
        photo: &Photo,
        owner_id: Option<&str>,
    ) -> Result<UploadResponseDto, ClientError>;

    async fn analyze_image(&self, photo: &Photo) -> Result<AnalyzeImageResponseDto, ClientError>;

    async fn create_sighting(
        &self,
        dto: &CreateSightingDto,
    ) -> Result<CreateSightingResponseDto, ClientError>;

    async fn list_sightings(&self) -> Result<Vec<SightingDto>, ClientError>;

    /// `None` when the server has no record with this id
    async fn get_sighting(&self, id: Uuid) -> Result<Option<SightingDto>, ClientError>;
}

/// HTTP client for the GaiGi API
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(config.http_timeout).build()?;
        Ok(Self::with_client(client, &config.api_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn image_part(photo: &Photo) -> Result<Part, ClientError> {
        Part::bytes(photo.data.clone())
            .file_name(photo.file_name.clone())
            .mime_str(&photo.content_type)
            .map_err(ClientError::from)
    }

    /// Decode a success body, or turn `{ error }` into `ClientError::Status`
    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ReportBackend for ApiClient {
    async fn upload_image(
        &self,
        photo: &Photo,
        owner_id: Option<&str>,
    ) -> Result<UploadResponseDto, ClientError> {
        let mut form = Form::new().part("image", Self::image_part(photo)?);
        if let Some(owner_id) = owner_id {
            form = form.text("ownerId", owner_id.to_string());
        }

        tracing::debug!("Uploading {} ({} bytes)", photo.file_name, photo.data.len());
        let response = self
            .client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn analyze_image(&self, photo: &Photo) -> Result<AnalyzeImageResponseDto, ClientError> {
        let form = Form::new().part("image", Self::image_part(photo)?);
        let response = self
            .client
            .post(self.url("/analyze-image"))
            .multipart(form)
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn create_sighting(
        &self,
        dto: &CreateSightingDto,
    ) -> Result<CreateSightingResponseDto, ClientError> {
        let response = self
            .client
            .post(self.url("/sightings"))
            .json(dto)
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn list_sightings(&self) -> Result<Vec<SightingDto>, ClientError> {
        let response = self.client.get(self.url("/sightings")).send().await?;
        let list: SightingListResponseDto = Self::parse(response).await?;
        Ok(list.sightings)
    }

    async fn get_sighting(&self, id: Uuid) -> Result<Option<SightingDto>, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/sightings/{}", id)))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let detail: SightingDetailResponseDto = Self::parse(response).await?;
        Ok(Some(detail.sighting))
    }
}
