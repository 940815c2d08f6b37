pub(crate) const REPEAT_MARKER: &str = " ...";
pub(crate) const OPTIONAL_OPEN: &str = "[";
pub(crate) const OPTIONAL_CLOSE: &str = "]";
