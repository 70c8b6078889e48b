//! HTTP protocol layer
//!
//! Request inspection and response building, kept apart from the
//! site logic that decides what to serve.

pub mod cache;
pub mod mime;
pub mod request;
pub mod response;

pub use cache::CachePolicy;
pub use request::RequestPaths;
pub use response::{
    build_304_response, build_404_response, build_405_response, build_413_response,
    build_500_response, build_file_response, build_health_response, build_options_response,
    build_page_response,
};
