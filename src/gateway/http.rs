//! HTTP client for the agent's API

use reqwest::{Client, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

use super::messages::{InitData, PidBody};
use super::{AgentControl, ProfileStore};
use crate::error::{GatewayError, GatewayResult};
use crate::macros::{PresetId, PresetWire, ProfileWire};

pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

impl HttpGateway {
    pub fn new(base_url: &str, timeout: Duration) -> GatewayResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| GatewayError::Transport(format!("invalid base URL {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::Transport(format!("unusable base URL: {base_url}")));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// Append path segments to the base URL, escaping each one
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> GatewayResult<T> {
        debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        let bytes = check_status(response).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn post_json<B: Serialize + ?Sized>(&self, url: Url, body: &B) -> GatewayResult<()> {
        debug!(%url, "POST");
        let response = self.client.post(url).json(body).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> GatewayResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let path = response.url().path().to_string();
    let text = response.text().await.unwrap_or_default();
    match status {
        StatusCode::NOT_FOUND => Err(GatewayError::NotFound(path)),
        StatusCode::BAD_REQUEST | StatusCode::SERVICE_UNAVAILABLE => {
            Err(GatewayError::Rejected(format!("{status}: {}", text.trim())))
        }
        _ => Err(GatewayError::Transport(format!("{status} from {path}: {}", text.trim()))),
    }
}

impl ProfileStore for HttpGateway {
    async fn get_profile(&self, name: &str) -> GatewayResult<Option<ProfileWire>> {
        match self.get_json::<Option<ProfileWire>>(self.endpoint(&["profile", name])).await {
            Err(GatewayError::NotFound(_)) => Ok(None),
            other => other,
        }
    }

    async fn save_profile(&self, name: &str, body: &ProfileWire) -> GatewayResult<()> {
        self.post_json(self.endpoint(&["profile", name]), body).await?;
        info!(profile = %name, "Profile saved");
        Ok(())
    }

    async fn list_profiles(&self) -> GatewayResult<Vec<ProfileWire>> {
        let listed: Option<Vec<ProfileWire>> = self.get_json(self.endpoint(&["profiles"])).await?;
        Ok(listed.unwrap_or_default())
    }

    async fn list_presets(&self) -> GatewayResult<Vec<PresetWire>> {
        let listed: Option<Vec<PresetWire>> = self.get_json(self.endpoint(&["presets"])).await?;
        Ok(listed.unwrap_or_default())
    }

    async fn save_preset(&self, id: PresetId, body: &PresetWire) -> GatewayResult<()> {
        let id_segment = id.to_string();
        self.post_json(self.endpoint(&["preset", &id_segment]), body).await?;
        info!(preset_id = %id, name = %body.name, "Preset saved");
        Ok(())
    }
}

impl AgentControl for HttpGateway {
    async fn start(&self, profile_name: &str, pid: u32) -> GatewayResult<()> {
        self.post_json(self.endpoint(&["start", profile_name]), &PidBody { pid }).await?;
        info!(profile = %profile_name, pid, "Macro loop started");
        Ok(())
    }

    async fn stop(&self, pid: u32) -> GatewayResult<()> {
        self.post_json(self.endpoint(&["stop"]), &PidBody { pid }).await?;
        info!(pid, "Macro loop stopped");
        Ok(())
    }

    async fn pause(&self, pid: u32) -> GatewayResult<()> {
        self.post_json(self.endpoint(&["pause"]), &PidBody { pid }).await?;
        info!(pid, "Macro loop pause toggled");
        Ok(())
    }

    async fn init(&self) -> GatewayResult<InitData> {
        self.get_json(self.endpoint(&["init"])).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(base: &str) -> HttpGateway {
        HttpGateway::new(base, Duration::from_millis(100)).unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let g = gateway("http://localhost:8088/api");
        assert_eq!(g.endpoint(&["init"]).as_str(), "http://localhost:8088/api/init");
        assert_eq!(
            g.endpoint(&["preset", "1718000000000"]).as_str(),
            "http://localhost:8088/api/preset/1718000000000"
        );
    }

    #[test]
    fn test_endpoint_trailing_slash_and_escaping() {
        let g = gateway("http://localhost:8088/api/");
        assert_eq!(
            g.endpoint(&["profile", "my farm/2"]).as_str(),
            "http://localhost:8088/api/profile/my%20farm%2F2"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpGateway::new("not a url", Duration::from_secs(1)),
            Err(GatewayError::Transport(_))
        ));
        assert!(HttpGateway::new("mailto:someone@example.com", Duration::from_secs(1)).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_agent_is_transport_error() {
        // Port 9 (discard) on localhost is closed in test environments
        let g = gateway("http://127.0.0.1:9/api");
        assert!(matches!(g.init().await, Err(GatewayError::Transport(_))));
    }
}
