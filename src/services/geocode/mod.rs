pub mod http;
pub mod nominatim;
pub mod resolver;

pub use http::{HttpClient, ReqwestClient};
pub use nominatim::{Boundary, BoundingBox, Geometry};
pub use resolver::BoundaryResolver;
