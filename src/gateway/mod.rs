//! Persistence gateway: where profiles and presets live and how the agent is driven
//!
//! Two seams: [`ProfileStore`] for profile/preset CRUD and [`AgentControl`]
//! for start/stop of the macro loop. The file backend only stores data;
//! the HTTP backend talks to the running agent and implements both.

use std::time::Duration;

use crate::config::{Backend, Config};
use crate::error::{GatewayError, GatewayResult};
use crate::macros::{PresetId, PresetWire, ProfileWire};

mod file;
mod http;
mod messages;

pub use file::FileGateway;
pub use http::HttpGateway;
pub use messages::{InitData, PidBody};

#[allow(async_fn_in_trait)]
pub trait ProfileStore {
    /// `Ok(None)` when the profile doesn't exist
    async fn get_profile(&self, name: &str) -> GatewayResult<Option<ProfileWire>>;

    async fn save_profile(&self, name: &str, body: &ProfileWire) -> GatewayResult<()>;

    async fn list_profiles(&self) -> GatewayResult<Vec<ProfileWire>>;

    async fn list_presets(&self) -> GatewayResult<Vec<PresetWire>>;

    async fn save_preset(&self, id: PresetId, body: &PresetWire) -> GatewayResult<()>;
}

#[allow(async_fn_in_trait)]
pub trait AgentControl {
    async fn start(&self, profile_name: &str, pid: u32) -> GatewayResult<()>;

    async fn stop(&self, pid: u32) -> GatewayResult<()>;

    /// Toggle the pause state of a running loop
    async fn pause(&self, pid: u32) -> GatewayResult<()>;

    async fn init(&self) -> GatewayResult<InitData>;
}

/// Backend chosen from configuration
pub enum Gateway {
    File(FileGateway),
    Http(HttpGateway),
}

impl Gateway {
    pub fn from_config(config: &Config, backend: Backend) -> GatewayResult<Self> {
        match backend {
            Backend::File => Ok(Gateway::File(FileGateway::new(config.storage.data_dir.clone()))),
            Backend::Http => Ok(Gateway::Http(HttpGateway::new(
                &config.api.base_url,
                Duration::from_millis(config.api.timeout_ms),
            )?)),
        }
    }
}

impl ProfileStore for Gateway {
    async fn get_profile(&self, name: &str) -> GatewayResult<Option<ProfileWire>> {
        match self {
            Gateway::File(g) => g.get_profile(name).await,
            Gateway::Http(g) => g.get_profile(name).await,
        }
    }

    async fn save_profile(&self, name: &str, body: &ProfileWire) -> GatewayResult<()> {
        match self {
            Gateway::File(g) => g.save_profile(name, body).await,
            Gateway::Http(g) => g.save_profile(name, body).await,
        }
    }

    async fn list_profiles(&self) -> GatewayResult<Vec<ProfileWire>> {
        match self {
            Gateway::File(g) => g.list_profiles().await,
            Gateway::Http(g) => g.list_profiles().await,
        }
    }

    async fn list_presets(&self) -> GatewayResult<Vec<PresetWire>> {
        match self {
            Gateway::File(g) => g.list_presets().await,
            Gateway::Http(g) => g.list_presets().await,
        }
    }

    async fn save_preset(&self, id: PresetId, body: &PresetWire) -> GatewayResult<()> {
        match self {
            Gateway::File(g) => g.save_preset(id, body).await,
            Gateway::Http(g) => g.save_preset(id, body).await,
        }
    }
}

impl AgentControl for Gateway {
    async fn start(&self, profile_name: &str, pid: u32) -> GatewayResult<()> {
        match self {
            Gateway::File(_) => Err(GatewayError::Unsupported("start")),
            Gateway::Http(g) => g.start(profile_name, pid).await,
        }
    }

    async fn stop(&self, pid: u32) -> GatewayResult<()> {
        match self {
            Gateway::File(_) => Err(GatewayError::Unsupported("stop")),
            Gateway::Http(g) => g.stop(pid).await,
        }
    }

    async fn pause(&self, pid: u32) -> GatewayResult<()> {
        match self {
            Gateway::File(_) => Err(GatewayError::Unsupported("pause")),
            Gateway::Http(g) => g.pause(pid).await,
        }
    }

    async fn init(&self) -> GatewayResult<InitData> {
        match self {
            Gateway::File(_) => Err(GatewayError::Unsupported("init")),
            Gateway::Http(g) => g.init().await,
        }
    }
}
