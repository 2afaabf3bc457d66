//! Error for string-tagged enums.

/// A string did not name any variant of a tagged enum.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value:?}")]
pub struct UnknownTag {
    /// What kind of tag was being parsed (e.g. "role").
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl UnknownTag {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}
