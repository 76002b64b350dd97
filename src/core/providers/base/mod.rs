//! Base components shared by all deployers

pub mod http;
pub mod probe;

pub use http::{ClientConfig, build_http_client};
pub use probe::{TestRequest, test_request};
