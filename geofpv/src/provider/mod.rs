//! Transport for the external building-data service.

mod http;

pub use http::{HttpClient, ProviderError, ReqwestClient, DEFAULT_TIMEOUT_SECS};

#[cfg(test)]
pub use http::tests::MockHttpClient;
