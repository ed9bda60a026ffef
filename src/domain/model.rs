use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

/// JSON-RPC 協定版本
pub const JSONRPC_VERSION: &str = "2.0";

/// 每個請求固定使用的 RPC id
pub const RPC_ID: u32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, Value>,
}

impl Record {
    pub fn from_map(map: serde_json::Map<String, Value>) -> Self {
        Self {
            data: map.into_iter().collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}

/// 提供者的取件點記錄，欄位依提供者原樣保留
pub type ParcelshopRecord = Record;

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_key: String,
    pub email: String,
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(client_key: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            client_key: client_key.into(),
            email: email.into(),
            password: None,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// 每次呼叫都重新產生，不快取
    pub fn security_token(&self) -> SecurityToken {
        SecurityToken {
            client_key: self.client_key.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

// 避免密碼出現在 debug 日誌
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_key", &self.client_key)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityToken {
    #[serde(rename = "ClientKey")]
    pub client_key: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Password", skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl SecurityToken {
    /// 注入到 `params.DPDSecurity` 的區塊
    pub fn to_security_block(&self) -> Value {
        json!({ "SecurityToken": self })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcEnvelope {
    pub id: u32,
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Map<String, Value>,
}

impl RpcEnvelope {
    pub fn new(method: &str, params: serde_json::Map<String, Value>) -> Self {
        Self {
            id: RPC_ID,
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.to_string(),
            params,
        }
    }
}

/// `send` 的統一回傳結構：完整記錄加上可選的標籤參照
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentResult {
    pub record: Record,
    pub label: Option<String>,
}

impl ShipmentResult {
    pub fn from_record(record: Record) -> Self {
        let label = record.get_str("label").map(str::to_string);
        Self { record, label }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelSource {
    Url(String),
    /// base64 編碼的標籤內容
    Inline(String),
}

impl LabelSource {
    pub fn parse(source: &str) -> Self {
        let trimmed = source.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::Inline(trimmed.to_string())
        }
    }

    /// 日誌與錯誤訊息用的簡短名稱，內嵌內容不整段輸出
    pub fn describe(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::Inline(payload) => format!("inline payload ({} chars)", payload.len()),
        }
    }
}

impl From<&str> for LabelSource {
    fn from(source: &str) -> Self {
        Self::parse(source)
    }
}

impl From<String> for LabelSource {
    fn from(source: String) -> Self {
        Self::parse(&source)
    }
}

/// 已驗證為 PDF 的標籤內容
#[derive(Debug, Clone)]
pub struct LabelDocument {
    pub source: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct MergedLabelOutput {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub merged_sources: Vec<String>,
    pub skipped: Vec<String>,
}

impl MergedLabelOutput {
    pub fn is_empty(&self) -> bool {
        self.page_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_security_token_block_shape() {
        let token = Credentials::new("key-1", "shipper@example.com")
            .with_password("secret")
            .security_token();

        let block = token.to_security_block();
        assert_eq!(block["SecurityToken"]["ClientKey"], "key-1");
        assert_eq!(block["SecurityToken"]["Email"], "shipper@example.com");
        assert_eq!(block["SecurityToken"]["Password"], "secret");
    }

    #[test]
    fn test_security_token_without_password() {
        let block = Credentials::new("key-1", "shipper@example.com")
            .security_token()
            .to_security_block();

        assert!(block["SecurityToken"].get("Password").is_none());
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("key-1", "a@b.c").with_password("secret");
        let printed = format!("{:?}", creds);
        assert!(!printed.contains("secret"));
        assert!(printed.contains("***"));
    }

    #[test]
    fn test_label_source_parse() {
        assert_eq!(
            LabelSource::parse(" https://labels.example.com/1.pdf "),
            LabelSource::Url("https://labels.example.com/1.pdf".to_string())
        );
        assert!(matches!(LabelSource::parse("JVBERi0xLjU="), LabelSource::Inline(_)));
    }

    #[test]
    fn test_shipment_result_projects_label() {
        let mut record = Record::default();
        record
            .data
            .insert("label".to_string(), Value::String("https://labels/1".to_string()));
        record.data.insert("mpsid".to_string(), Value::from("MPS1"));

        let result = ShipmentResult::from_record(record);
        assert_eq!(result.label(), Some("https://labels/1"));
        assert_eq!(result.record.get_str("mpsid"), Some("MPS1"));
    }
}
