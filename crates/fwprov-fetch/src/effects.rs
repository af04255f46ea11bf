mod http;
mod resolver;

pub use http::{BoxStream, HttpClient, HttpResponse};
pub use resolver::Resolver;

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
