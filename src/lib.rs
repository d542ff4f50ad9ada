//! Session core for the Summit summarize/chat service.
//!
//! A [`SessionController`] keeps one conversation and one token usage bucket
//! per [`Mode`], builds the request for each submission, sends it through a
//! [`Transport`] and folds the normalized reply back into its state.

pub mod api;
pub mod config;
pub mod conversation;
pub mod error;
pub mod error_ext;
pub mod mode;
pub mod request_builder;
pub mod response_handler;
pub mod session;
pub mod usage;

pub use api::{HttpTransport, SummitRequest, Transport, WireMessage};
pub use config::{SessionConfig, SummitConfig};
pub use conversation::{ConversationStore, Message, ResponseMetadata, Role};
pub use error::{ErrorKind, Result, SummitError};
pub use mode::Mode;
pub use session::{SessionController, SessionState};
pub use usage::{UsageAccumulator, UsageDelta, UsageTotals};
