use crate::utils::error::Result;
use serde_json::Value;
use std::time::Duration;

/// 同步 HTTP 傳輸層。每次呼叫阻塞到完成或逾時為止。
///
/// 實作應把連線失敗、逾時與非 2xx 狀態都回報為
/// [`ShipmentError::Transport`](crate::utils::error::ShipmentError::Transport)，
/// 並且不做任何重試。
pub trait Transport: Send + Sync {
    /// 以 JSON 為 body 發送 POST，回傳原始回應內容
    fn post_json(&self, url: &str, body: &Value, timeout: Duration) -> Result<Vec<u8>>;

    /// 發送 GET，回傳原始回應內容
    fn get_bytes(&self, url: &str, timeout: Duration) -> Result<Vec<u8>>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post_json(&self, url: &str, body: &Value, timeout: Duration) -> Result<Vec<u8>> {
        (**self).post_json(url, body, timeout)
    }

    fn get_bytes(&self, url: &str, timeout: Duration) -> Result<Vec<u8>> {
        (**self).get_bytes(url, timeout)
    }
}
