//! HttpSubmissionClient -- concrete [`SubmissionClient`] over the companion
//! REST API.
//!
//! - create: `POST {base_url}/api/companion`
//! - update: `PATCH {base_url}/api/companion/{id}`
//!
//! Both send the draft as a JSON body. Any 2xx response is success and the
//! response body is never inspected.

use std::time::Duration;

use reqwest::Url;
use tracing::{debug, warn};

use buddy_core::submission::{SubmissionClient, SubmissionTarget};
use buddy_types::companion::{CompanionDraft, CompanionId};
use buddy_types::config::ClientConfig;
use buddy_types::error::SubmissionError;

/// REST client for companion create/update.
pub struct HttpSubmissionClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpSubmissionClient {
    /// Build a client from configuration.
    ///
    /// Fails if `base_url` is not an absolute http(s) URL or the underlying
    /// HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, SubmissionError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| SubmissionError::InvalidConfig(format!("base_url: {e}")))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(SubmissionError::InvalidConfig(format!(
                "base_url must be an http(s) URL, got '{}'",
                config.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| SubmissionError::InvalidConfig(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Resolve the endpoint for a submission target.
    ///
    /// The companion id is pushed as a single, percent-encoded path segment.
    pub fn endpoint(&self, target: &SubmissionTarget<'_>) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so segments are always available.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["api", "companion"]);
            if let SubmissionTarget::Update(id) = target {
                segments.push(id.as_str());
            }
        }
        url
    }
}

impl SubmissionClient for HttpSubmissionClient {
    async fn send(
        &self,
        draft: &CompanionDraft,
        existing: Option<&CompanionId>,
    ) -> Result<(), SubmissionError> {
        let target = SubmissionTarget::for_existing(existing);
        let url = self.endpoint(&target);

        let request = match &target {
            SubmissionTarget::Create => self.client.post(url.clone()),
            SubmissionTarget::Update(_) => self.client.patch(url.clone()),
        };
        debug!(?target, %url, "Sending companion request");

        let response = request.json(draft).send().await.map_err(|e| {
            warn!(%url, error = %e, "Companion request failed to send");
            SubmissionError::Transport(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(%url, status = status.as_u16(), "Companion request accepted");
            Ok(())
        } else {
            warn!(%url, status = status.as_u16(), "Companion request rejected");
            Err(SubmissionError::Status(status.as_u16()))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::Router;
    use axum::extract::State;
    use axum::http::{Method, StatusCode, Uri};

    use super::*;

    #[derive(Debug, Clone)]
    struct Recorded {
        method: Method,
        path: String,
        body: serde_json::Value,
    }

    #[derive(Clone)]
    struct Backend {
        log: Arc<Mutex<Vec<Recorded>>>,
        status: StatusCode,
    }

    async fn record(
        State(backend): State<Backend>,
        method: Method,
        uri: Uri,
        body: String,
    ) -> StatusCode {
        let body = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
        backend.log.lock().unwrap().push(Recorded {
            method,
            path: uri.path().to_string(),
            body,
        });
        backend.status
    }

    /// Spawn an in-process backend answering every request with `status`.
    async fn spawn_backend(status: StatusCode) -> (String, Arc<Mutex<Vec<Recorded>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new().fallback(record).with_state(Backend {
            log: Arc::clone(&log),
            status,
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), log)
    }

    fn client_for(base_url: &str) -> HttpSubmissionClient {
        HttpSubmissionClient::new(&ClientConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
            ..ClientConfig::default()
        })
        .unwrap()
    }

    fn sample_draft() -> CompanionDraft {
        CompanionDraft {
            name: "Ada Lovelace".to_string(),
            description: "Mathematician".to_string(),
            instructions: "i".repeat(200),
            seed: "s".repeat(200),
            src: "https://img.example/ada.png".to_string(),
            category_id: "cat_science".to_string(),
        }
    }

    #[test]
    fn test_endpoint_create_and_update() {
        let client = client_for("http://localhost:3000");
        let id = CompanionId::new("cmp_42");
        assert_eq!(
            client.endpoint(&SubmissionTarget::Create).as_str(),
            "http://localhost:3000/api/companion"
        );
        assert_eq!(
            client.endpoint(&SubmissionTarget::Update(&id)).as_str(),
            "http://localhost:3000/api/companion/cmp_42"
        );
    }

    #[test]
    fn test_endpoint_respects_base_path_and_trailing_slash() {
        let client = client_for("https://example.com/buddy/");
        assert_eq!(
            client.endpoint(&SubmissionTarget::Create).as_str(),
            "https://example.com/buddy/api/companion"
        );
    }

    #[test]
    fn test_endpoint_encodes_id_as_one_segment() {
        let client = client_for("http://localhost:3000");
        let id = CompanionId::new("a/b c");
        assert_eq!(
            client.endpoint(&SubmissionTarget::Update(&id)).as_str(),
            "http://localhost:3000/api/companion/a%2Fb%20c"
        );
    }

    #[test]
    fn test_new_rejects_non_http_base_url() {
        let config = ClientConfig {
            base_url: "mailto:someone@example.com".to_string(),
            ..ClientConfig::default()
        };
        assert!(matches!(
            HttpSubmissionClient::new(&config),
            Err(SubmissionError::InvalidConfig(_))
        ));

        let config = ClientConfig {
            base_url: "not a url".to_string(),
            ..ClientConfig::default()
        };
        assert!(HttpSubmissionClient::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_create_posts_draft_body() {
        let (base_url, log) = spawn_backend(StatusCode::OK).await;
        let client = client_for(&base_url);

        client.send(&sample_draft(), None).await.unwrap();

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].method, Method::POST);
        assert_eq!(log[0].path, "/api/companion");
        assert_eq!(log[0].body["name"], "Ada Lovelace");
        assert_eq!(log[0].body["categoryId"], "cat_science");
        assert!(log[0].body.get("id").is_none());
    }

    #[tokio::test]
    async fn test_update_patches_by_id() {
        let (base_url, log) = spawn_backend(StatusCode::NO_CONTENT).await;
        let client = client_for(&base_url);
        let id = CompanionId::new("cmp_42");

        client.send(&sample_draft(), Some(&id)).await.unwrap();

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].method, Method::PATCH);
        assert_eq!(log[0].path, "/api/companion/cmp_42");
        assert_eq!(log[0].body["seed"].as_str().unwrap().len(), 200);
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let (base_url, log) = spawn_backend(StatusCode::UNAUTHORIZED).await;
        let client = client_for(&base_url);

        let err = client.send(&sample_draft(), None).await.unwrap_err();

        assert!(matches!(err, SubmissionError::Status(401)));
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = client_for(&format!("http://{addr}"));

        let err = client.send(&sample_draft(), None).await.unwrap_err();

        assert!(matches!(err, SubmissionError::Transport(_)));
    }
}
