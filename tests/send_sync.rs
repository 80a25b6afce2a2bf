//! Send/Sync guarantees for core types.

use rest_log_appender::{ForwarderBuilder, ForwarderConfig, LogEvent, LogForwarder};
use rstest::rstest;
use static_assertions::assert_impl_all;

#[rstest]
fn builders_are_send_sync() {
    assert_impl_all!(ForwarderBuilder: Send, Sync);
    assert_impl_all!(ForwarderConfig: Send, Sync);
}

#[rstest]
fn components_are_send_sync() {
    assert_impl_all!(LogForwarder: Send, Sync);
    assert_impl_all!(LogEvent: Send, Sync);
}
