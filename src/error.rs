use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("XML parsing error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("Malformed SVG: {0}")]
    Malformed(String),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Unsupported SVG: {0}")]
    Structural(String),

    #[error("Input too large: {0}")]
    ResourceLimit(String),

    #[error("Code generation failed: {0}")]
    Generation(String),

    #[error("Conversion cancelled")]
    Cancelled,
}

/// Broad classification of a [`ConvertError`], for callers that only need to
/// tell "not valid markup" from "valid but unsupported" from "too large".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Structural,
    ResourceLimit,
    Generation,
    Cancelled,
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::XmlParse(_) | Self::Malformed(_) | Self::Utf8(_) => ErrorKind::Parse,
            Self::Structural(_) => ErrorKind::Structural,
            Self::ResourceLimit(_) => ErrorKind::ResourceLimit,
            Self::Generation(_) => ErrorKind::Generation,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }
}

impl From<minijinja::Error> for ConvertError {
    fn from(err: minijinja::Error) -> Self {
        Self::Generation(err.to_string())
    }
}
