#![allow(dead_code)]

pub use shellevent_test_utils::builders;
pub use shellevent_test_utils::collecting_sink::CollectingSink;
pub use shellevent_test_utils::{init_tracing, with_timeout};

/// `n` bytes of a single repeated, non-whitespace character.
pub fn filler(n: usize, ch: char) -> String {
    std::iter::repeat_n(ch, n).collect()
}
