use crate::adapters::http::HttpTransport;
use crate::config::ClientOptions;
use crate::core::labels::LabelMerger;
use crate::core::response::NormalizedResponse;
use crate::domain::model::{
    Credentials, LabelDocument, ParcelshopRecord, RpcEnvelope, ShipmentResult,
};
use crate::domain::ports::Transport;
use crate::domain::profile::{EndpointProfile, ResultShape};
use crate::utils::error::{Result, ShipmentError};
use crate::utils::validation::Validate;
use serde::Serialize;
use serde_json::{Map, Value};

pub const PARCELSHOP_OK: &str = "OK";
pub const PARCELSHOP_ERROR: &str = "Unable to retrieve parcelshops.";

/// 出貨 API 客戶端
///
/// 只持有不可變的憑證與選項，每次呼叫都重新組裝 RPC 信封與安全權杖。
pub struct ShipmentClient<T: Transport = HttpTransport> {
    credentials: Credentials,
    options: ClientOptions,
    transport: T,
}

impl ShipmentClient<HttpTransport> {
    pub fn new(
        client_key: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self> {
        let credentials = Credentials::new(client_key, email).with_password(password);
        Self::with_transport(credentials, options, HttpTransport::new()?)
    }
}

impl<T: Transport> ShipmentClient<T> {
    pub fn with_transport(credentials: Credentials, options: ClientOptions, transport: T) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            credentials,
            options,
            transport,
        })
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn profile(&self) -> &'static EndpointProfile {
        self.options.variant.profile()
    }

    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.options.base_url(), path)
    }

    /// 組裝 RPC 信封，並注入 `DPDSecurity`
    pub fn build_envelope(&self, method: &str, mut params: Map<String, Value>) -> RpcEnvelope {
        params.insert(
            "DPDSecurity".to_string(),
            self.credentials.security_token().to_security_block(),
        );
        RpcEnvelope::new(method, params)
    }

    fn call(&self, path: &str, envelope: &RpcEnvelope) -> Result<NormalizedResponse> {
        let url = self.endpoint_url(path);
        let body = serde_json::to_value(envelope)?;

        tracing::debug!("📡 Calling {} at {}", envelope.method, url);
        let response = self
            .transport
            .post_json(&url, &body, self.options.timeout())
            .map_err(|e| {
                tracing::error!("❌ {} call to {} failed: {}", envelope.method, url, e);
                e
            })?;
        tracing::debug!("📡 {} returned {} bytes", envelope.method, response.len());

        NormalizedResponse::from_slice(&response)
    }

    /// 建立出貨單
    pub fn send<S: Serialize>(&self, shipment: &S) -> Result<ShipmentResult> {
        let profile = self.profile();

        let mut params = Map::new();
        params.insert("shipment".to_string(), serde_json::to_value(shipment)?);
        let envelope = self.build_envelope(profile.create_method, params);

        let response = self.call(profile.shipment_path, &envelope)?;

        if let Some(message) = response.error_message() {
            tracing::warn!("⚠️ Provider returned an error: {}", message);
            return Err(ShipmentError::api(message));
        }

        if let Some(messages) = response.failure_messages() {
            tracing::warn!("⚠️ Shipment rejected: {:?}", messages);
            return Err(ShipmentError::rejected(messages));
        }

        let record = response
            .success_record(profile.result_shape == ResultShape::List)
            .ok_or_else(|| ShipmentError::MalformedResponse {
                message: "response contains no result record".to_string(),
            })?;

        let result = ShipmentResult::from_record(record);
        tracing::info!(
            "✅ Shipment created{}",
            result
                .label()
                .map(|label| format!(" (label: {})", label))
                .unwrap_or_default()
        );
        Ok(result)
    }

    /// 取得所有取件點
    pub fn get_parcelshops(&self) -> Result<Vec<ParcelshopRecord>> {
        let profile = self.profile();
        let envelope = self.build_envelope(profile.parcelshop_method, Map::new());

        let response = self.call(profile.parcelshop_path, &envelope)?;

        if response.result_status.as_deref() != Some(PARCELSHOP_OK) {
            tracing::warn!(
                "⚠️ Parcelshop listing failed (result: {:?})",
                response.result_status
            );
            return Err(ShipmentError::api(PARCELSHOP_ERROR));
        }

        let parcelshops = response.parcelshop_records();
        tracing::info!("✅ Retrieved {} parcelshops", parcelshops.len());
        Ok(parcelshops)
    }

    /// 下載單一標籤；取得失敗或內容不是 PDF 都會回傳錯誤
    pub fn generate_label(&self, url: &str) -> Result<LabelDocument> {
        LabelMerger::with_transport(&self.transport, self.options.timeout()).fetch_label(url)
    }
}
