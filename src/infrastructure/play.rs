//! Google Play Android Publisher client
//!
//! The publishing API is transactional: changes are staged inside an edit
//! and nothing is live until the edit commits. [`EditSession`] models the
//! draft as an owned value whose `commit` and `abort` consume it, so a
//! session cannot be used after it ends either way.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{HttpConfig, PlayConfig};
use crate::error::PromoteError;
use crate::infrastructure::google_auth::{self, ServiceAccountKey};

const BASE_URL: &str = "https://androidpublisher.googleapis.com/androidpublisher/v3";

pub const INTERNAL_TRACK: &str = "internal";
pub const PRODUCTION_TRACK: &str = "production";

/// Track promotion as the pipeline needs it.
#[async_trait]
pub trait ReleasePromoter: Send + Sync {
    /// Copy the current internal release into the production track and
    /// commit. Returns the promoted version code.
    async fn promote_internal_to_production(
        &self,
        release_notes: &str,
    ) -> Result<String, PromoteError>;
}

/// A track's release list as the publishing API reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track: Option<String>,
    #[serde(default)]
    pub releases: Vec<TrackRelease>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRelease {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub version_codes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub release_notes: Vec<LocalizedText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizedText {
    pub language: String,
    pub text: String,
}

/// Promotion source: the LAST release's LAST version code.
///
/// This mirrors list order as the vendor returns it, not a documented
/// "highest version" contract. Confirm against current vendor ordering
/// before reusing it elsewhere.
pub fn promotion_source(track: &Track) -> Option<&str> {
    track
        .releases
        .last()?
        .version_codes
        .last()
        .map(String::as_str)
}

/// The single-release production track body: overwrites the track's prior
/// release set rather than merging into it.
pub fn production_rollout(version_code: &str, release_notes: &str) -> Track {
    Track {
        track: None,
        releases: vec![TrackRelease {
            version_codes: vec![version_code.to_string()],
            status: Some("completed".to_string()),
            release_notes: vec![LocalizedText {
                language: "en-US".to_string(),
                text: release_notes.to_string(),
            }],
            name: None,
        }],
    }
}

#[derive(Debug, Deserialize)]
struct EditDocument {
    id: String,
}

/// Play publishing client for one package.
pub struct PlayClient {
    http: Client,
    base_url: String,
    package_name: String,
    key: ServiceAccountKey,
}

impl PlayClient {
    /// Build a client. The service-account key is parsed here so malformed
    /// material fails before any vendor call; the token exchange itself is
    /// deferred to the promotion.
    pub fn new(config: &PlayConfig, http: HttpConfig) -> Result<Self, PromoteError> {
        let key = ServiceAccountKey::from_json(&config.service_account_json)?;
        let client = Client::builder()
            .timeout(http.timeout)
            .connect_timeout(http.connect_timeout)
            .build()?;

        Ok(Self {
            http: client,
            base_url: BASE_URL.to_string(),
            package_name: config.package_name.clone(),
            key,
        })
    }

    /// Open an edit. The access token and all staged changes are scoped to
    /// the returned session.
    pub async fn open_edit(&self, access_token: String) -> Result<EditSession<'_>, PromoteError> {
        let url = format!(
            "{}/applications/{}/edits",
            self.base_url, self.package_name
        );
        let response = self
            .http
            .post(&url)
            .bearer_auth(&access_token)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let document: EditDocument = Self::parse(response, "edits.insert").await?;
        let session = EditSession {
            client: self,
            edit_id: document.id,
            access_token,
        };
        debug!("Opened Play edit {}", session.id());
        Ok(session)
    }

    async fn parse<T: DeserializeOwned>(
        response: reqwest::Response,
        endpoint: &str,
    ) -> Result<T, PromoteError> {
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
        Ok(response.json().await?)
    }

    async fn stage_production(
        &self,
        edit: &EditSession<'_>,
        release_notes: &str,
    ) -> Result<String, PromoteError> {
        let internal = edit.get_track(INTERNAL_TRACK).await?;
        let version_code = promotion_source(&internal)
            .ok_or_else(|| PromoteError::NotFound {
                what: format!("releases on the {} track", INTERNAL_TRACK),
            })?
            .to_string();
        info!("Promotion source: version code {}", version_code);

        let body = production_rollout(&version_code, release_notes);
        edit.update_track(PRODUCTION_TRACK, &body).await?;
        Ok(version_code)
    }
}

#[async_trait]
impl ReleasePromoter for PlayClient {
    async fn promote_internal_to_production(
        &self,
        release_notes: &str,
    ) -> Result<String, PromoteError> {
        // Lazy exchange: the token endpoint is not touched until the
        // pipeline actually reaches the Play half.
        let token = google_auth::fetch_access_token(&self.http, &self.key).await?;
        info!("Authenticated to the Play publishing API");

        let edit = self.open_edit(token).await?;

        match self.stage_production(&edit, release_notes).await {
            Ok(version_code) => {
                let edit_id = edit.commit().await?;
                info!("Committed Play edit {}", edit_id);
                Ok(version_code)
            }
            Err(e) => {
                // Discard the draft so the vendor side holds no open edit.
                if let Err(abort_err) = edit.abort().await {
                    warn!("Failed to discard Play edit: {}", abort_err);
                }
                Err(e)
            }
        }
    }
}

/// An open edit on the publishing API. The session owns the access token
/// minted for the run. Staged changes are not live until
/// [`commit`](Self::commit); dropping the session without committing
/// leaves the draft to expire on the vendor side, so failure paths should
/// call [`abort`](Self::abort).
pub struct EditSession<'a> {
    client: &'a PlayClient,
    edit_id: String,
    access_token: String,
}

impl EditSession<'_> {
    pub fn id(&self) -> &str {
        &self.edit_id
    }

    fn track_url(&self, track: &str) -> String {
        format!(
            "{}/applications/{}/edits/{}/tracks/{}",
            self.client.base_url, self.client.package_name, self.edit_id, track
        )
    }

    /// Read a track's current release list.
    pub async fn get_track(&self, track: &str) -> Result<Track, PromoteError> {
        let response = self
            .client
            .http
            .get(self.track_url(track))
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        PlayClient::parse(response, &format!("edits.tracks.get({})", track)).await
    }

    /// Replace a track's release list with the given body.
    pub async fn update_track(&self, track: &str, body: &Track) -> Result<Track, PromoteError> {
        let response = self
            .client
            .http
            .put(self.track_url(track))
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await?;
        PlayClient::parse(response, &format!("edits.tracks.update({})", track)).await
    }

    /// Finalize all staged changes atomically on the vendor side. Returns
    /// the committed edit id.
    pub async fn commit(self) -> Result<String, PromoteError> {
        let url = format!(
            "{}/applications/{}/edits/{}:commit",
            self.client.base_url, self.client.package_name, self.edit_id
        );
        let response = self
            .client
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let document: EditDocument = PlayClient::parse(response, "edits.commit").await?;
        Ok(document.id)
    }

    /// Discard the draft without publishing anything.
    pub async fn abort(self) -> Result<(), PromoteError> {
        let url = format!(
            "{}/applications/{}/edits/{}",
            self.client.base_url, self.client.package_name, self.edit_id
        );
        let response = self
            .client
            .http
            .delete(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PromoteError::Http {
                status: status.as_u16(),
                endpoint: "edits.delete".to_string(),
                body,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    use super::*;
    use crate::infrastructure::google_auth::TEST_RSA_KEY;

    fn release(codes: &[&str]) -> TrackRelease {
        TrackRelease {
            version_codes: codes.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_promotion_source_takes_last_release_last_code() {
        let track = Track {
            track: Some("internal".to_string()),
            releases: vec![release(&["A", "B"])],
        };
        assert_eq!(promotion_source(&track), Some("B"));

        let track = Track {
            track: None,
            releases: vec![release(&["A"]), release(&["B", "C"])],
        };
        assert_eq!(promotion_source(&track), Some("C"));
    }

    #[test]
    fn test_promotion_source_empty_track() {
        let track = Track {
            track: None,
            releases: vec![],
        };
        assert_eq!(promotion_source(&track), None);
    }

    #[test]
    fn test_promotion_source_release_without_codes() {
        let track = Track {
            track: None,
            releases: vec![release(&["A"]), release(&[])],
        };
        // The tail release wins even when it carries no codes.
        assert_eq!(promotion_source(&track), None);
    }

    #[test]
    fn test_production_rollout_body_shape() {
        let body = production_rollout("B", "Bug fixes");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "releases": [
                    {
                        "versionCodes": ["B"],
                        "status": "completed",
                        "releaseNotes": [
                            {"language": "en-US", "text": "Bug fixes"}
                        ]
                    }
                ]
            })
        );
    }

    #[test]
    fn test_track_parses_vendor_shape() {
        let raw = r#"{
            "track": "internal",
            "releases": [
                {
                    "name": "12 (1.4.0)",
                    "versionCodes": ["12345", "12346"],
                    "status": "completed",
                    "releaseNotes": [{"language": "en-US", "text": "Internal build"}]
                }
            ]
        }"#;

        let track: Track = serde_json::from_str(raw).unwrap();
        assert_eq!(track.track.as_deref(), Some("internal"));
        assert_eq!(promotion_source(&track), Some("12346"));
    }

    struct ScriptedVendor {
        base_url: String,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedVendor {
        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    /// Canned vendor on an ephemeral port, one request per connection,
    /// logged as "METHOD /path". The production-track update response is
    /// the scripted variable; every other route answers the happy path.
    async fn scripted_vendor(production_update: (&'static str, &'static str)) -> ScriptedVendor {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let raw = read_request(&mut socket).await;
                let mut parts = raw.split_whitespace();
                let method = parts.next().unwrap_or("").to_string();
                let path = parts.next().unwrap_or("").to_string();
                log.lock().unwrap().push(format!("{} {}", method, path));

                let (status, body) = if path.ends_with("/token") {
                    ("200 OK", r#"{"access_token":"vendor-token","expires_in":3599}"#)
                } else if path.ends_with(":commit") {
                    ("200 OK", r#"{"id":"edit-1"}"#)
                } else if method == "POST" && path.ends_with("/edits") {
                    ("200 OK", r#"{"id":"edit-1"}"#)
                } else if path.ends_with("/tracks/internal") {
                    (
                        "200 OK",
                        r#"{"track":"internal","releases":[{"versionCodes":["12345"],"status":"completed"}]}"#,
                    )
                } else if path.ends_with("/tracks/production") {
                    production_update
                } else {
                    ("200 OK", "{}")
                };
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });

        ScriptedVendor { base_url, requests }
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = match socket.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => n,
            };
            data.extend_from_slice(&buf[..n]);
            if let Some(head_end) = data.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&data[..head_end]).to_string();
                let mut content_length = 0;
                for line in head.lines() {
                    if let Some((name, value)) = line.split_once(':') {
                        if name.eq_ignore_ascii_case("content-length") {
                            content_length = value.trim().parse().unwrap_or(0);
                        }
                    }
                }
                if data.len() >= head_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&data).to_string()
    }

    fn client_for(vendor: &ScriptedVendor) -> PlayClient {
        let key_json = json!({
            "type": "service_account",
            "client_email": "publisher@project.iam.gserviceaccount.com",
            "private_key": TEST_RSA_KEY,
            "token_uri": format!("{}/token", vendor.base_url),
        })
        .to_string();
        let config = PlayConfig {
            service_account_json: key_json,
            package_name: "com.example.app".to_string(),
        };

        let mut client = PlayClient::new(&config, HttpConfig::default()).unwrap();
        client.base_url = vendor.base_url.clone();
        client
    }

    #[tokio::test]
    async fn test_token_exchange_waits_for_the_promotion() {
        let vendor = scripted_vendor((
            "200 OK",
            r#"{"track":"production","releases":[{"versionCodes":["12345"],"status":"completed"}]}"#,
        ))
        .await;
        let client = client_for(&vendor);
        // Building the client performs no vendor traffic.
        assert!(vendor.requests().is_empty());

        let version_code = client
            .promote_internal_to_production("Bug fixes")
            .await
            .unwrap();

        assert_eq!(version_code, "12345");
        assert_eq!(
            vendor.requests(),
            vec![
                "POST /token",
                "POST /applications/com.example.app/edits",
                "GET /applications/com.example.app/edits/edit-1/tracks/internal",
                "PUT /applications/com.example.app/edits/edit-1/tracks/production",
                "POST /applications/com.example.app/edits/edit-1:commit",
            ]
        );
    }

    #[tokio::test]
    async fn test_stage_failure_discards_the_edit() {
        let vendor =
            scripted_vendor(("500 Internal Server Error", r#"{"error":"backend"}"#)).await;
        let client = client_for(&vendor);

        let err = client
            .promote_internal_to_production("Bug fixes")
            .await
            .unwrap_err();
        assert!(matches!(err, PromoteError::Http { status: 500, .. }));

        let requests = vendor.requests();
        assert_eq!(
            requests.last().map(String::as_str),
            Some("DELETE /applications/com.example.app/edits/edit-1")
        );
        assert!(!requests.iter().any(|r| r.contains(":commit")));
    }

    #[tokio::test]
    async fn test_conflicting_track_update_is_a_conflict() {
        let vendor = scripted_vendor(("409 Conflict", r#"{"error":"duplicate rollout"}"#)).await;
        let client = client_for(&vendor);

        let err = client
            .promote_internal_to_production("Bug fixes")
            .await
            .unwrap_err();
        match err {
            PromoteError::Conflict { endpoint, message } => {
                assert_eq!(endpoint, "edits.tracks.update(production)");
                assert!(message.contains("duplicate rollout"));
            }
            other => panic!("expected a conflict, got {}", other),
        }
    }
}
