pub mod classifier;
mod default;
pub mod error;
pub mod platform_extractor;
pub mod platforms;
pub mod signals;

pub use default::{ClientOptions, ProxyConfig, create_client, default_client};
