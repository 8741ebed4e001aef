//! Application-wide constants
//!
//! Magic numbers and string literals shared across the crate, grouped by concern.

/// Config file location
pub mod config {
    /// Directory under the platform config dir
    pub const APP_DIR: &str = "macros-manager";

    /// Config file name
    pub const FILENAME: &str = "config.json";

    /// Subdirectory of the platform data dir holding the file-backed store
    pub const DATA_DIR: &str = "var";
}

/// Macro editing defaults
pub mod macros {
    /// Number of action slots every preset carries
    pub const DEFAULT_SLOT_COUNT: usize = 20;

    /// Name given to presets created without one
    pub const DEFAULT_PRESET_NAME: &str = "New";

    /// Number of party member HP fields exposed to conditions
    pub const PARTY_SIZE: u8 = 8;
}

/// Agent HTTP API
pub mod api {
    /// Base URL of the agent's HTTP API
    pub const DEFAULT_BASE_URL: &str = "http://localhost:8088/api";

    /// Request timeout in milliseconds
    pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;
}

/// Log stream
pub mod logs {
    /// Lines kept in the log history window
    pub const HISTORY_LIMIT: usize = 200;

    /// Default address of the agent's log socket
    pub const DEFAULT_ADDRESS: &str = "127.0.0.1:8089";
}

/// File-backed store layout
pub mod storage {
    /// Profiles subdirectory
    pub const PROFILES_DIR: &str = "profiles";

    /// Presets subdirectory
    pub const PRESETS_DIR: &str = "presets";

    /// Extension of stored documents
    pub const EXTENSION: &str = "json";
}

/// Input event constants (from evdev)
pub mod input {
    /// Key press event value
    pub const KEY_PRESS: i32 = 1;
}

/// Input device paths
pub mod paths {
    /// Directory holding evdev device nodes
    pub const DEV_INPUT: &str = "/dev/input";
}

/// Permission hints for evdev access
pub mod permissions {
    /// Group granting read access to input devices
    pub const INPUT_GROUP: &str = "input";

    /// Command to join the input group
    pub const ADD_TO_INPUT_GROUP: &str = "sudo usermod -aG input $USER";
}

/// Bounds applied to loaded configuration
pub mod validation {
    /// Smallest usable slot count
    pub const MIN_SLOT_COUNT: usize = 1;

    /// Largest slot count accepted from config
    pub const MAX_SLOT_COUNT: usize = 100;

    /// Largest log history window
    pub const MAX_HISTORY_LIMIT: usize = 10_000;

    /// Shortest request timeout in milliseconds
    pub const MIN_TIMEOUT_MS: u64 = 100;
}
