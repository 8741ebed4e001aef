//! Message bodies exchanged with the agent besides profiles and presets

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Session bootstrap returned by the agent
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct InitData {
    /// pid → whether a macro loop is running for it
    #[serde(rename = "runningMacrosState", default, deserialize_with = "null_as_default")]
    pub running_state: BTreeMap<u32, bool>,

    #[serde(rename = "profilesList", default, deserialize_with = "null_as_default")]
    pub profiles_list: Vec<String>,

    /// pid → game window title
    #[serde(rename = "PidsData", default, deserialize_with = "null_as_default")]
    pub pids_data: BTreeMap<u32, String>,
}

impl InitData {
    pub fn is_running(&self, pid: u32) -> bool {
        self.running_state.get(&pid).copied().unwrap_or(false)
    }
}

/// Body of start/stop/pause requests
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PidBody {
    pub pid: u32,
}

/// Go encodes nil maps and slices as `null`
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
