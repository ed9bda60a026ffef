#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::profile::{ApiVariant, PRODUCTION_BASE_URL, TEST_BASE_URL};
use crate::utils::error::Result;
use crate::utils::validation::{validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const MAX_TIMEOUT_SECONDS: u64 = 300;

/// 客戶端選項，建立後不可變更
///
/// - `test_mode`：預設 `false`，切換到測試環境的主機
/// - `timeout_seconds`：預設 10 秒，套用到每個請求
/// - `variant`：預設 [`ApiVariant::Shipment`]
/// - `base_url`：覆寫正式/測試主機（例如本地模擬伺服器）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    pub test_mode: bool,
    pub timeout_seconds: u64,
    pub variant: ApiVariant,
    pub base_url: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            test_mode: false,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            variant: ApiVariant::default(),
            base_url: None,
        }
    }
}

impl ClientOptions {
    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    pub fn with_timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn with_variant(mut self, variant: ApiVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// 依覆寫值或 `test_mode` 決定主機
    pub fn base_url(&self) -> &str {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/'),
            None if self.test_mode => TEST_BASE_URL,
            None => PRODUCTION_BASE_URL,
        }
    }
}

impl Validate for ClientOptions {
    fn validate(&self) -> Result<()> {
        validate_range("timeout_seconds", self.timeout_seconds, 1, MAX_TIMEOUT_SECONDS)?;
        if let Some(base_url) = &self.base_url {
            validate_url("base_url", base_url)?;
        }
        Ok(())
    }
}
