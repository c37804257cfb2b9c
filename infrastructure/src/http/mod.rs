//! HTTP adapter for the inference server
//!
//! Implements the [`ChatGateway`](campus_chat_application::ChatGateway) port
//! with `reqwest`.

pub mod error;
pub mod gateway;

pub use error::HttpError;
pub use gateway::{HttpChatGateway, ServerEndpoint};
