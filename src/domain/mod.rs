// Domain layer: request/response models, endpoint profiles and the transport port.

pub mod model;
pub mod ports;
pub mod profile;
