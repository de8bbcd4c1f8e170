//! Remote rendering service client.
//!
//! Talks JSON-over-HTTP to a browser service that owns the actual
//! rendering engine. One `RemoteDocument` wraps one service session; all
//! document operations are session-scoped requests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DocumentError, DocumentResult};
use crate::traits::{Document, ElementHandle};

/// Browser viewport requested for every session.
const VIEWPORT: (u32, u32) = (1920, 1080);

/// User agent requested for every session.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Serialize)]
struct SessionRequest {
    viewport_width: u32,
    viewport_height: u32,
    user_agent: String,
    headless: bool,
}

#[derive(Deserialize)]
struct SessionResponse {
    id: String,
}

#[derive(Serialize)]
struct NavigateRequest<'a> {
    url: &'a str,
    timeout_ms: u64,
}

#[derive(Deserialize)]
struct NavigateResponse {
    ready: bool,
}

#[derive(Serialize)]
struct EvaluateRequest<'a> {
    script: &'a str,
}

#[derive(Deserialize)]
struct EvaluateResponse {
    #[serde(default)]
    value: Value,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Serialize)]
struct LocateRequest<'a> {
    selector: &'a str,
    timeout_ms: u64,
}

#[derive(Deserialize)]
struct LocateResponse {
    found: bool,
    #[serde(default)]
    element_id: Option<String>,
}

#[derive(Serialize)]
struct ElementRequest<'a> {
    element_id: &'a str,
}

#[derive(Deserialize)]
struct TextResponse {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct TitleResponse {
    #[serde(default)]
    title: String,
}

/// One session against a remote rendering service.
pub struct RemoteDocument {
    client: Client,
    base_url: String,
    session_id: String,
}

impl RemoteDocument {
    /// Open a session against the service at `base_url`.
    pub async fn connect(base_url: impl Into<String>) -> DocumentResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        url::Url::parse(&base_url).map_err(|e| DocumentError::Transport(Box::new(e)))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| DocumentError::Transport(Box::new(e)))?;

        let request = SessionRequest {
            viewport_width: VIEWPORT.0,
            viewport_height: VIEWPORT.1,
            user_agent: USER_AGENT.to_string(),
            headless: true,
        };
        let response: SessionResponse = post_json(&client, &format!("{base_url}/session"), &request).await?;

        tracing::debug!(session_id = %response.id, "browser session opened");
        Ok(Self {
            client,
            base_url,
            session_id: response.id,
        })
    }

    /// Open a session using the `BROWSER_SERVICE_URL` environment variable.
    pub async fn from_env() -> DocumentResult<Self> {
        let base_url = std::env::var("BROWSER_SERVICE_URL").map_err(|_| {
            DocumentError::Transport(Box::new(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "BROWSER_SERVICE_URL environment variable not set",
            )))
        })?;
        Self::connect(base_url).await
    }

    fn endpoint(&self, op: &str) -> String {
        format!("{}/session/{}/{op}", self.base_url, self.session_id)
    }
}

async fn post_json<T: Serialize, R: for<'de> Deserialize<'de>>(
    client: &Client,
    url: &str,
    body: &T,
) -> DocumentResult<R> {
    let response = client
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|e| DocumentError::Transport(Box::new(e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        return Err(DocumentError::Transport(Box::new(std::io::Error::other(
            format!("browser service error: {status} - {text}"),
        ))));
    }

    response
        .json()
        .await
        .map_err(|e| DocumentError::Transport(Box::new(e)))
}

async fn get_json<R: for<'de> Deserialize<'de>>(client: &Client, url: &str) -> DocumentResult<R> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| DocumentError::Transport(Box::new(e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        return Err(DocumentError::Transport(Box::new(std::io::Error::other(
            format!("browser service error: {status} - {text}"),
        ))));
    }

    response
        .json()
        .await
        .map_err(|e| DocumentError::Transport(Box::new(e)))
}

#[async_trait]
impl Document for RemoteDocument {
    async fn navigate(&self, url: &str, timeout: Duration) -> DocumentResult<()> {
        let request = NavigateRequest {
            url,
            timeout_ms: timeout.as_millis() as u64,
        };
        let response: NavigateResponse =
            post_json(&self.client, &self.endpoint("navigate"), &request).await?;

        if response.ready {
            Ok(())
        } else {
            Err(DocumentError::Navigation {
                url: url.to_string(),
            })
        }
    }

    async fn evaluate(&self, script: &str) -> DocumentResult<Value> {
        let request = EvaluateRequest { script };
        let response: EvaluateResponse =
            post_json(&self.client, &self.endpoint("evaluate"), &request).await?;

        match response.error {
            Some(reason) => Err(DocumentError::Eval { reason }),
            None => Ok(response.value),
        }
    }

    async fn locate_and_wait(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> DocumentResult<ElementHandle> {
        let request = LocateRequest {
            selector,
            timeout_ms: timeout.as_millis() as u64,
        };
        let response: LocateResponse =
            post_json(&self.client, &self.endpoint("locate"), &request).await?;

        match (response.found, response.element_id) {
            (true, Some(id)) => Ok(ElementHandle::new(selector, id)),
            _ => Err(DocumentError::NotFound {
                selector: selector.to_string(),
            }),
        }
    }

    async fn click(&self, element: &ElementHandle) -> DocumentResult<()> {
        let request = ElementRequest {
            element_id: &element.id,
        };
        let _: Value = post_json(&self.client, &self.endpoint("click"), &request).await?;
        Ok(())
    }

    async fn text_content(&self, element: &ElementHandle) -> DocumentResult<String> {
        let request = ElementRequest {
            element_id: &element.id,
        };
        let response: TextResponse =
            post_json(&self.client, &self.endpoint("text"), &request).await?;
        Ok(response.text)
    }

    async fn content(&self) -> DocumentResult<String> {
        let response: ContentResponse = get_json(&self.client, &self.endpoint("content")).await?;
        Ok(response.content)
    }

    async fn title(&self) -> DocumentResult<String> {
        let response: TitleResponse = get_json(&self.client, &self.endpoint("title")).await?;
        Ok(response.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_request_serializes_browser_settings() {
        let request = SessionRequest {
            viewport_width: VIEWPORT.0,
            viewport_height: VIEWPORT.1,
            user_agent: USER_AGENT.to_string(),
            headless: true,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["viewport_width"], 1920);
        assert_eq!(json["viewport_height"], 1080);
        assert_eq!(json["headless"], true);
    }

    #[tokio::test]
    async fn unreachable_service_is_a_transport_error() {
        let result = RemoteDocument::connect("http://127.0.0.1:1").await;
        assert!(matches!(result, Err(DocumentError::Transport(_))));
    }
}
