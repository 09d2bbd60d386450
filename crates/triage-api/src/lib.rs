pub mod client;
pub mod protocol;

pub use client::ApiClient;
pub use protocol::ClassifyResponse;
