//! App Store Connect API client
//!
//! REST over HTTPS in the JSON:API shape: write bodies are
//! `{"data": {"type", "attributes", "relationships"}}` envelopes and
//! responses come back in the same envelope. Every request mints a fresh
//! bearer token via [`ConnectTokenIssuer`]. No call is retried; a non-2xx
//! status aborts the whole run.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::{AppStoreConfig, HttpConfig};
use crate::domain::{AppVersion, Build, Submission};
use crate::error::PromoteError;
use crate::infrastructure::connect_token::ConnectTokenIssuer;

const BASE_URL: &str = "https://api.appstoreconnect.apple.com/v1";

/// Release type attached on update: the version waits for a manual release
/// after review approval instead of going live automatically.
const RELEASE_TYPE: &str = "AFTER_APPROVAL";

/// Build-distribution operations the promotion pipeline needs.
///
/// The trait exists so the service layer can run against an in-memory
/// double; [`AppStoreClient`] is the production implementation.
#[async_trait]
pub trait BuildDistributor: Send + Sync {
    /// List all builds uploaded for the app.
    async fn list_builds(&self) -> Result<Vec<Build>, PromoteError>;

    /// Create a new version record attached to a build.
    async fn create_version(
        &self,
        build_id: &str,
        version_string: &str,
    ) -> Result<AppVersion, PromoteError>;

    /// Patch release notes (and the release-type policy) onto a version.
    async fn update_version(
        &self,
        version_id: &str,
        release_notes: &str,
    ) -> Result<AppVersion, PromoteError>;

    /// Submit a version for review.
    async fn submit_for_review(&self, version_id: &str) -> Result<Submission, PromoteError>;
}

/// App Store Connect client for one app.
pub struct AppStoreClient {
    http: Client,
    base_url: String,
    tokens: ConnectTokenIssuer,
    app_id: String,
}

impl AppStoreClient {
    /// Build a client. Fails with a credential error if the signing key
    /// cannot be parsed, so bad key material surfaces before any network
    /// call.
    pub fn new(config: &AppStoreConfig, http: HttpConfig) -> Result<Self, PromoteError> {
        let tokens = ConnectTokenIssuer::new(config)?;
        let client = Client::builder()
            .timeout(http.timeout)
            .connect_timeout(http.connect_timeout)
            .build()?;

        Ok(Self {
            http: client,
            base_url: BASE_URL.to_string(),
            tokens,
            app_id: config.app_id.clone(),
        })
    }

    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<reqwest::Response, PromoteError> {
        let token = self.tokens.issue()?;
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("{} {}", method, url);

        let mut request = self
            .http
            .request(method, &url)
            .bearer_auth(&token)
            .header("Content-Type", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status == StatusCode::CONFLICT {
                return Err(PromoteError::Conflict {
                    endpoint: endpoint.to_string(),
                    message: body,
                });
            }
            return Err(PromoteError::Http {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
                body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl BuildDistributor for AppStoreClient {
    async fn list_builds(&self) -> Result<Vec<Build>, PromoteError> {
        let endpoint = format!("/apps/{}/builds", self.app_id);
        let response = self.request(Method::GET, &endpoint, None).await?;
        let document: BuildsDocument = response.json().await?;

        if document.data.is_empty() {
            return Err(PromoteError::NotFound {
                what: format!("builds for app {}", self.app_id),
            });
        }

        Ok(document.data.into_iter().map(Build::from).collect())
    }

    async fn create_version(
        &self,
        build_id: &str,
        version_string: &str,
    ) -> Result<AppVersion, PromoteError> {
        let payload = create_version_payload(&self.app_id, build_id, version_string);
        let response = self
            .request(Method::POST, "/appStoreVersions", Some(&payload))
            .await?;
        let document: VersionDocument = response.json().await?;
        Ok(document.into())
    }

    async fn update_version(
        &self,
        version_id: &str,
        release_notes: &str,
    ) -> Result<AppVersion, PromoteError> {
        let payload = update_version_payload(version_id, release_notes);
        let endpoint = format!("/appStoreVersions/{}", version_id);
        let response = self
            .request(Method::PATCH, &endpoint, Some(&payload))
            .await?;
        let document: VersionDocument = response.json().await?;
        Ok(document.into())
    }

    async fn submit_for_review(&self, version_id: &str) -> Result<Submission, PromoteError> {
        let payload = submission_payload(version_id);
        let response = self
            .request(Method::POST, "/appStoreVersionSubmissions", Some(&payload))
            .await?;
        let document: SubmissionDocument = response.json().await?;

        Ok(Submission {
            id: document.data.id,
            version_id: version_id.to_string(),
        })
    }
}

fn create_version_payload(app_id: &str, build_id: &str, version_string: &str) -> Value {
    json!({
        "data": {
            "type": "appStoreVersions",
            "attributes": {
                "platform": "IOS",
                "versionString": version_string
            },
            "relationships": {
                "app": {"data": {"type": "apps", "id": app_id}},
                "build": {"data": {"type": "builds", "id": build_id}}
            }
        }
    })
}

fn update_version_payload(version_id: &str, release_notes: &str) -> Value {
    json!({
        "data": {
            "type": "appStoreVersions",
            "id": version_id,
            "attributes": {
                "releaseNotes": release_notes,
                "releaseType": RELEASE_TYPE
            }
        }
    })
}

fn submission_payload(version_id: &str) -> Value {
    json!({
        "data": {
            "type": "appStoreVersionSubmissions",
            "relationships": {
                "appStoreVersion": {
                    "data": {
                        "type": "appStoreVersions",
                        "id": version_id
                    }
                }
            }
        }
    })
}

/// Builds collection response
#[derive(Debug, Deserialize)]
struct BuildsDocument {
    data: Vec<BuildResource>,
}

#[derive(Debug, Deserialize)]
struct BuildResource {
    id: String,
    attributes: BuildAttributes,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildAttributes {
    version: String,
    uploaded_date: DateTime<Utc>,
    build_number: Option<String>,
}

impl From<BuildResource> for Build {
    fn from(resource: BuildResource) -> Self {
        Build {
            id: resource.id,
            version: resource.attributes.version,
            uploaded_at: resource.attributes.uploaded_date,
            build_number: resource.attributes.build_number,
        }
    }
}

/// Single version response (create and update share the shape)
#[derive(Debug, Deserialize)]
struct VersionDocument {
    data: VersionResource,
}

#[derive(Debug, Deserialize)]
struct VersionResource {
    id: String,
    #[serde(default)]
    attributes: VersionAttributes,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionAttributes {
    version_string: Option<String>,
    release_notes: Option<String>,
    release_type: Option<String>,
}

impl From<VersionDocument> for AppVersion {
    fn from(document: VersionDocument) -> Self {
        AppVersion {
            id: document.data.id,
            version_string: document.data.attributes.version_string,
            release_notes: document.data.attributes.release_notes,
            release_type: document.data.attributes.release_type,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SubmissionDocument {
    data: SubmissionResource,
}

#[derive(Debug, Deserialize)]
struct SubmissionResource {
    id: String,
}
