//! Payload models of the three FIWARE NGSI dialects
//! and the conversions required to move entities between brokers.

pub mod at_context;
pub mod dialect;
pub mod geojson;
pub mod json_ld;
pub mod json_v1;
pub mod json_v2;
pub mod urn;

pub use dialect::Dialect;
pub use dialect::NgsiType;

/// An entity, as a JSON object whose members keep their order
pub type Entity = serde_json::Map<String, serde_json::Value>;
