#![allow(dead_code)]

pub use dirpoll_test_utils::builders;
pub use dirpoll_test_utils::recording_action;
pub use dirpoll_test_utils::{init_tracing, next_cycle, with_timeout};
