use crate::config::ClientOptions;
use crate::domain::model::Credentials;
use crate::domain::profile::ApiVariant;
use crate::utils::error::{Result, ShipmentError};
use crate::utils::validation::{validate_non_empty_string, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub client: ClientConfig,
    pub labels: Option<LabelsConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    pub client_key: String,
    pub email: String,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    pub test_mode: Option<bool>,
    pub timeout_seconds: Option<u64>,
    pub variant: Option<ApiVariant>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelsConfig {
    pub output_path: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ShipmentError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ShipmentError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DPD_PASSWORD})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ShipmentError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn credentials(&self) -> Credentials {
        let credentials = Credentials::new(
            self.credentials.client_key.clone(),
            self.credentials.email.clone(),
        );
        match &self.credentials.password {
            Some(password) => credentials.with_password(password.clone()),
            None => credentials,
        }
    }

    pub fn client_options(&self) -> ClientOptions {
        let defaults = ClientOptions::default();
        ClientOptions {
            test_mode: self.client.test_mode.unwrap_or(defaults.test_mode),
            timeout_seconds: self
                .client
                .timeout_seconds
                .unwrap_or(defaults.timeout_seconds),
            variant: self.client.variant.unwrap_or(defaults.variant),
            base_url: self.client.base_url.clone(),
        }
    }

    /// 標籤合併輸出路徑
    pub fn label_output_path(&self) -> Option<&str> {
        self.labels.as_ref().and_then(|l| l.output_path.as_deref())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("credentials.client_key", &self.credentials.client_key)?;
        validate_non_empty_string("credentials.email", &self.credentials.email)?;

        // 未被替換的 ${VAR} 代表環境變數沒有設定
        for (field, value) in [
            ("credentials.client_key", Some(&self.credentials.client_key)),
            ("credentials.email", Some(&self.credentials.email)),
            ("credentials.password", self.credentials.password.as_ref()),
        ] {
            if let Some(value) = value {
                if value.contains("${") {
                    return Err(ShipmentError::InvalidConfigValueError {
                        field: field.to_string(),
                        value: value.clone(),
                        reason: "Environment variable is not set".to_string(),
                    });
                }
            }
        }

        self.client_options().validate()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
