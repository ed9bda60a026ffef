use crate::domain::model::Record;
use crate::utils::error::{Result, ShipmentError};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Default, Deserialize)]
struct RawResponse {
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    result: Option<RawResult>,
}

#[derive(Debug, Default, Deserialize)]
struct RawResult {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    parcelshops: Option<Value>,
}

/// 供應商回應解析一次後的結果
///
/// 回應外層固定是 `{ "result": { "result": ... } }`，內層可能是記錄陣列、
/// 單一記錄或 `"OK"` 之類的狀態字串，各自放進對應的欄位。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedResponse {
    /// 最外層的 `error` 物件（或字串）
    pub error_object: Option<Value>,
    /// `result.result` 為陣列時的每筆記錄
    pub result_list: Option<Vec<Map<String, Value>>>,
    /// `result.result` 為單一物件時的記錄
    pub result_record: Option<Map<String, Value>>,
    /// `result.result` 為字串時的狀態，例如 `"OK"`
    pub result_status: Option<String>,
    pub parcelshops: Option<Value>,
}

impl NormalizedResponse {
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| ShipmentError::MalformedResponse {
                message: format!("response body is not valid JSON: {}", e),
            })?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(ShipmentError::MalformedResponse {
                message: format!("expected a JSON object, got {}", value),
            });
        }

        let raw: RawResponse =
            serde_json::from_value(value).map_err(|e| ShipmentError::MalformedResponse {
                message: e.to_string(),
            })?;

        let mut normalized = Self {
            error_object: raw.error.filter(|e| !e.is_null()),
            ..Self::default()
        };

        let Some(result) = raw.result else {
            return Ok(normalized);
        };
        normalized.parcelshops = result.parcelshops.filter(|p| !p.is_null());

        match result.result {
            Some(Value::Array(items)) => {
                // 保留原本的索引位置，非物件項目視為格式錯誤
                let list = items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| match item {
                        Value::Object(map) => Ok(map),
                        other => Err(ShipmentError::MalformedResponse {
                            message: format!("result item {} is not an object: {}", index, other),
                        }),
                    })
                    .collect::<Result<Vec<_>>>()?;
                normalized.result_list = Some(list);
            }
            Some(Value::Object(map)) => normalized.result_record = Some(map),
            Some(Value::String(status)) => normalized.result_status = Some(status),
            Some(Value::Bool(flag)) => normalized.result_status = Some(flag.to_string()),
            _ => {}
        }

        Ok(normalized)
    }

    /// 最外層 `error` 的可讀訊息
    pub fn error_message(&self) -> Option<String> {
        let error = self.error_object.as_ref()?;
        let message = match error {
            Value::Object(map) => map
                .get("message")
                .map(message_text)
                .unwrap_or_else(|| error.to_string()),
            other => message_text(other),
        };
        Some(message)
    }

    /// 第一筆結果 `success == false` 時回傳其訊息；否則回傳 `None`
    ///
    /// 陣列結果只看第一筆，後面的項目不影響成敗。缺少 `success` 欄位視為成功。
    pub fn failure_messages(&self) -> Option<Vec<String>> {
        let item = match (&self.result_list, &self.result_record) {
            (Some(list), _) => list.first()?,
            (None, Some(record)) => record,
            (None, None) => return None,
        };

        is_failure(item).then(|| extract_messages(item))
    }

    /// 依結果形狀取出成功記錄；偏好的形狀不存在時退回另一種
    pub fn success_record(&self, prefer_list: bool) -> Option<Record> {
        let first = self.result_list.as_ref().and_then(|list| list.first());
        let record = self.result_record.as_ref();
        let chosen = if prefer_list {
            first.or(record)
        } else {
            record.or(first)
        };
        chosen.cloned().map(Record::from_map)
    }

    /// `result.parcelshops`，去除可能存在的 `parcelshop` 包裝層
    pub fn parcelshop_records(&self) -> Vec<Record> {
        let Some(parcelshops) = &self.parcelshops else {
            return Vec::new();
        };

        let unwrapped = match parcelshops {
            Value::Object(map) if map.contains_key("parcelshop") => &map["parcelshop"],
            other => other,
        };

        match unwrapped {
            Value::Array(items) => items
                .iter()
                .filter_map(|item| item.as_object().cloned().map(Record::from_map))
                .collect(),
            Value::Object(map) => vec![Record::from_map(map.clone())],
            _ => Vec::new(),
        }
    }
}

fn is_failure(item: &Map<String, Value>) -> bool {
    matches!(item.get("success"), Some(Value::Bool(false)))
}

fn extract_messages(item: &Map<String, Value>) -> Vec<String> {
    match item.get("messages") {
        Some(Value::Array(messages)) => messages.iter().map(message_text).collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(single) => vec![message_text(single)],
    }
}

/// 訊息若有 `.value` 欄位則取其值，否則取訊息本身
pub fn message_text(message: &Value) -> String {
    match message {
        Value::String(text) => text.clone(),
        Value::Object(map) => match map.get("value") {
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
            None => message.to_string(),
        },
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize(value: Value) -> NormalizedResponse {
        NormalizedResponse::from_value(value).unwrap()
    }

    #[test]
    fn test_list_result() {
        let response = normalize(json!({
            "id": 1,
            "jsonrpc": "2.0",
            "result": {"result": [{"success": true, "mpsid": "M1"}]}
        }));

        assert!(response.error_object.is_none());
        assert_eq!(response.result_list.as_ref().map(Vec::len), Some(1));
        assert!(response.failure_messages().is_none());
        let record = response.success_record(true).unwrap();
        assert_eq!(record.get_str("mpsid"), Some("M1"));
    }

    #[test]
    fn test_record_result_without_success_flag() {
        let response = normalize(json!({"result": {"result": {"label": "https://l/1"}}}));

        assert!(response.result_record.is_some());
        // 缺少 success 欄位視為成功（刻意保留的寬鬆行為）
        assert!(response.failure_messages().is_none());
        let record = response.success_record(false).unwrap();
        assert_eq!(record.get_str("label"), Some("https://l/1"));
    }

    #[test]
    fn test_failure_messages_mixed_forms() {
        let response = normalize(json!({
            "result": {"result": [{
                "success": false,
                "messages": ["A", {"value": "X", "code": 12}]
            }]}
        }));

        assert_eq!(
            response.failure_messages(),
            Some(vec!["A".to_string(), "X".to_string()])
        );
    }

    #[test]
    fn test_failure_only_checks_first_item() {
        let response = normalize(json!({
            "result": {"result": [
                {"success": true, "mpsid": "MPS1"},
                {"success": false, "messages": ["later"]}
            ]}
        }));

        assert!(response.failure_messages().is_none());
        let record = response.success_record(true).unwrap();
        assert_eq!(record.get_str("mpsid"), Some("MPS1"));

        let response = normalize(json!({
            "result": {"result": [
                {"success": false, "messages": ["first"]},
                {"success": false, "messages": ["second"]}
            ]}
        }));
        assert_eq!(response.failure_messages(), Some(vec!["first".to_string()]));
    }

    #[test]
    fn test_non_object_result_item_is_malformed() {
        let result = NormalizedResponse::from_value(json!({
            "result": {"result": ["oops", {"success": true, "mpsid": "MPS2"}]}
        }));
        assert!(matches!(result, Err(ShipmentError::MalformedResponse { .. })));

        let result = NormalizedResponse::from_value(json!({
            "result": {"result": [{"success": true}, 3]}
        }));
        assert!(matches!(result, Err(ShipmentError::MalformedResponse { .. })));
    }

    #[test]
    fn test_failure_single_message_object() {
        let response = normalize(json!({
            "result": {"result": {"success": false, "messages": {"value": "Bad zip"}}}
        }));

        assert_eq!(response.failure_messages(), Some(vec!["Bad zip".to_string()]));
    }

    #[test]
    fn test_failure_without_messages() {
        let response = normalize(json!({"result": {"result": [{"success": false}]}}));
        assert_eq!(response.failure_messages(), Some(Vec::new()));
    }

    #[test]
    fn test_error_object_message() {
        let response = normalize(json!({"error": {"code": -32601, "message": "Method not found"}}));
        assert_eq!(response.error_message().as_deref(), Some("Method not found"));

        let response = normalize(json!({"error": "Access denied"}));
        assert_eq!(response.error_message().as_deref(), Some("Access denied"));

        let response = normalize(json!({"error": null, "result": {"result": "OK"}}));
        assert!(response.error_message().is_none());
        assert_eq!(response.result_status.as_deref(), Some("OK"));
    }

    #[test]
    fn test_parcelshop_wrapper_is_flattened() {
        let shops = json!([{"id": 1}, {"id": 2}]);
        let direct = normalize(json!({"result": {"result": "OK", "parcelshops": shops}}));
        let wrapped = normalize(json!({
            "result": {"result": "OK", "parcelshops": {"parcelshop": shops}}
        }));

        assert_eq!(direct.parcelshop_records().len(), 2);
        assert_eq!(direct.parcelshop_records(), wrapped.parcelshop_records());
    }

    #[test]
    fn test_single_wrapped_parcelshop() {
        let response = normalize(json!({
            "result": {"result": "OK", "parcelshops": {"parcelshop": {"id": 7}}}
        }));

        let records = response.parcelshop_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("id"), Some(&json!(7)));
    }

    #[test]
    fn test_malformed_bodies() {
        assert!(matches!(
            NormalizedResponse::from_slice(b"<html>"),
            Err(ShipmentError::MalformedResponse { .. })
        ));
        assert!(matches!(
            NormalizedResponse::from_slice(b"[1,2]"),
            Err(ShipmentError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_message_text() {
        assert_eq!(message_text(&json!("plain")), "plain");
        assert_eq!(message_text(&json!({"value": "V"})), "V");
        assert_eq!(message_text(&json!({"other": 1})), "{\"other\":1}");
        assert_eq!(message_text(&json!(42)), "42");
    }
}
