//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod monitor_status;
pub mod send_message;
pub mod stream_session;

#[cfg(test)]
pub(crate) mod test_support;
