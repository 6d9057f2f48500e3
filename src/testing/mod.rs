//! Testing module
//!
//! Test doubles shared by unit and integration tests.

pub mod mock_api;

pub use mock_api::{MockApiServer, MockReply, RecordedRequest};
