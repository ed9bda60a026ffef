pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::adapters::http::HttpTransport;
pub use crate::config::ClientOptions;
pub use crate::core::{client::ShipmentClient, labels::LabelMerger, response::NormalizedResponse};
pub use crate::domain::model::{
    Credentials, LabelDocument, LabelSource, MergedLabelOutput, ParcelshopRecord, Record,
    ShipmentResult,
};
pub use crate::domain::ports::Transport;
pub use crate::domain::profile::{ApiVariant, EndpointProfile};
pub use crate::utils::error::{ErrorKind, Result, ShipmentError};
