use crate::config::toml_config::TomlConfig;
use crate::config::ClientOptions;
use crate::domain::model::Credentials;
use crate::domain::profile::ApiVariant;
use crate::utils::error::{Result, ShipmentError};
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "dpd-shipment")]
#[command(about = "Create DPD shipments, list parcelshops and merge shipping labels")]
pub struct CliConfig {
    #[arg(long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "DPD_CLIENT_KEY")]
    pub client_key: Option<String>,

    #[arg(long, env = "DPD_EMAIL")]
    pub email: Option<String>,

    #[arg(long, env = "DPD_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[arg(long, help = "Use the sandbox endpoint")]
    pub test_mode: bool,

    #[arg(long, help = "Request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, help = "API variant: shipment or shipment_label")]
    pub variant: Option<ApiVariant>,

    #[arg(long, help = "Override the endpoint base URL")]
    pub base_url: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create a shipment from a JSON payload file
    Send {
        #[arg(long)]
        payload: PathBuf,
    },
    /// List all parcelshops
    Parcelshops,
    /// Download a single label and verify it is a PDF
    Label {
        url: String,
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Merge several labels (URLs or base64 payloads) into one PDF
    MergeLabels {
        #[arg(required = true)]
        sources: Vec<String>,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

/// 合併命令列參數與 TOML 檔案後的最終設定
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub credentials: Credentials,
    pub options: ClientOptions,
    pub label_output_path: Option<String>,
}

/// 標籤命令的設定：不需要憑證，只取逾時與輸出路徑
#[derive(Debug, Clone)]
pub struct LabelSettings {
    pub options: ClientOptions,
    pub output_path: Option<String>,
}

impl CliConfig {
    /// 命令列參數優先於設定檔
    pub fn resolve(&self) -> Result<ResolvedSettings> {
        let file_config = self.load_file()?;

        let (mut credentials, mut options, label_output_path) = match &file_config {
            Some(config) => (
                Some(config.credentials()),
                config.client_options(),
                config.label_output_path().map(str::to_string),
            ),
            None => (None, ClientOptions::default(), None),
        };

        if let (Some(client_key), Some(email)) = (&self.client_key, &self.email) {
            credentials = Some(Credentials::new(client_key.clone(), email.clone()));
        }
        let mut credentials = credentials.ok_or_else(|| ShipmentError::ConfigError {
            message: "Credentials are required: pass --client-key and --email or --config"
                .to_string(),
        })?;
        if let Some(password) = &self.password {
            credentials = credentials.with_password(password.clone());
        }

        if self.test_mode {
            options.test_mode = true;
        }
        if let Some(timeout) = self.timeout {
            options.timeout_seconds = timeout;
        }
        if let Some(variant) = self.variant {
            options.variant = variant;
        }
        if let Some(base_url) = &self.base_url {
            options.base_url = Some(base_url.clone());
        }

        Ok(ResolvedSettings {
            credentials,
            options,
            label_output_path,
        })
    }

    /// 標籤命令的設定；設定檔讀取或解析失敗時回傳錯誤，`--timeout` 優先於設定檔
    pub fn label_settings(&self) -> Result<LabelSettings> {
        let file_config = self.load_file()?;

        let (mut options, output_path) = match &file_config {
            Some(config) => (
                config.client_options(),
                config.label_output_path().map(str::to_string),
            ),
            None => (ClientOptions::default(), None),
        };
        if let Some(timeout) = self.timeout {
            options.timeout_seconds = timeout;
        }
        options.validate()?;

        Ok(LabelSettings {
            options,
            output_path,
        })
    }

    fn load_file(&self) -> Result<Option<TomlConfig>> {
        match &self.config {
            Some(path) => {
                tracing::debug!("📄 Loading configuration from {}", path.display());
                Ok(Some(TomlConfig::from_file(path)?))
            }
            None => Ok(None),
        }
    }
}

impl Validate for ResolvedSettings {
    fn validate(&self) -> Result<()> {
        crate::utils::validation::validate_non_empty_string(
            "client_key",
            &self.credentials.client_key,
        )?;
        crate::utils::validation::validate_non_empty_string("email", &self.credentials.email)?;
        self.options.validate()
    }
}
