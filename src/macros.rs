//! Helper macros used across the crate.

/// Lazily compile a [`Regex`](regex::Regex) with a custom panic message.
///
/// Patterns are literals, so a failure to compile is a programming error.
///
/// # Examples
///
/// ```
/// use std::sync::LazyLock;
///
/// use regex::Regex;
/// static UID: LazyLock<Regex> = pybreakpoints::lazy_regex!(r"^[a-f0-9]{8}$", "uid regex");
/// assert!(UID.is_match("0badc0de"));
/// ```
#[macro_export]
macro_rules! lazy_regex {
    ($pattern:expr, $msg:expr $(,)?) => {
        ::std::sync::LazyLock::new(|| ::regex::Regex::new($pattern).expect($msg))
    };
}
