pub mod client;
pub mod labels;
pub mod response;

pub use crate::domain::model::{
    Credentials, LabelDocument, LabelSource, MergedLabelOutput, ParcelshopRecord, Record,
    RpcEnvelope, SecurityToken, ShipmentResult,
};
pub use crate::domain::ports::Transport;
pub use crate::utils::error::Result;
