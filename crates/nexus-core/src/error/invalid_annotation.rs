use super::Error;

/// Error when a field annotation does not follow
/// `<column-name> <column-type> [options]`.
#[derive(Debug)]
pub(super) struct InvalidAnnotation {
    source: Box<str>,
    message: Box<str>,
}

impl std::error::Error for InvalidAnnotation {}

impl core::fmt::Display for InvalidAnnotation {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid annotation `{}`: {}", self.source, self.message)
    }
}

impl Error {
    pub fn invalid_annotation(source: impl Into<String>, message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidAnnotation(InvalidAnnotation {
            source: source.into().into(),
            message: message.into().into(),
        }))
    }

    pub fn is_invalid_annotation(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::InvalidAnnotation(_)))
    }
}
