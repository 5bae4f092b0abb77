use super::{Error, ErrorKind};

pub const UNCLOSED_TAG: &str = "unclosed tag";
pub const UNEXPECTED_CLOSE: &str = "unexpected closing tag";
pub const UNCLOSED_SECTION: &str = "unclosed section";
pub const MISMATCHED_SECTION: &str = "mismatched section tags";
pub const MALFORMED_STRING: &str = "malformed string";
pub const INVALID_IDENTIFIER: &str = "invalid identifier";
pub const MISSING_VARIABLE: &str = "cannot find variable in context";
pub const INVALID_HELPER: &str = "invalid helper";
pub const MISSING_TEMPLATE: &str = "missing template";

/// Return an [`Error`] explaining that the write operation failed.
///
/// This is likely caused by a failure during a `write!` macro operation.
pub fn error_write() -> Error {
    Error::build(ErrorKind::Render, "write failure")
        .with_help("failed to write result of render, are you low on memory?")
}

/// Return an [`Error`] describing a template that no [`Loader`][crate::Loader]
/// was able to resolve.
pub fn error_missing_template(name: &str) -> Error {
    Error::build(ErrorKind::NotFound, MISSING_TEMPLATE).with_help(format!(
        "template `{name}` was not found, is it visible to the assigned loader?"
    ))
}

/// Return an [`Error`] describing a partial inclusion chain that exceeded
/// the recursion limit.
pub fn error_partial_depth(name: &str, limit: usize) -> Error {
    Error::build(ErrorKind::Render, "partial recursion limit").with_help(format!(
        "including partial `{name}` exceeds the maximum depth of `{limit}`, \
        do your partials include each other in a cycle?"
    ))
}
