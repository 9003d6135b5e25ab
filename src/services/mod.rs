pub mod cache;
pub mod geocode;

pub use cache::MemoCache;
pub use geocode::{Boundary, BoundaryResolver, BoundingBox, Geometry, HttpClient, ReqwestClient};
