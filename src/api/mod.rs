pub mod client;
pub mod types;
pub mod utils;

pub use client::{HttpTransport, Transport};
pub use types::*;
