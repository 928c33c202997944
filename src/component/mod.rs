// src/component/mod.rs
mod geo_id;
mod component_request;

pub use geo_id::GeoID;
pub use component_request::ComponentRequest;
