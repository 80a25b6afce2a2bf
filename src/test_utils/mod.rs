//! Helpers shared by unit and integration tests.
//!
//! Compiled for unit tests and, through the `test-util` feature, for the
//! integration tests under `tests/`.

pub mod collecting_appender;
pub mod mock_server;

pub use collecting_appender::CollectingAppender;
pub use mock_server::{
    ACCEPTED_BODY, CapturedRequest, spawn_mock_server, spawn_status_server, unused_address,
};
