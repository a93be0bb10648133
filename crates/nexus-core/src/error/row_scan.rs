use super::Error;

/// Error when a scanned row value cannot be placed into its receiver.
#[derive(Debug)]
pub(super) struct RowScan {
    column: Box<str>,
    message: Box<str>,
}

impl std::error::Error for RowScan {}

impl core::fmt::Display for RowScan {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "row scan failed: column `{}`: {}", self.column, self.message)
    }
}

impl Error {
    pub fn row_scan(column: impl Into<String>, message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::RowScan(RowScan {
            column: column.into().into(),
            message: message.into().into(),
        }))
    }

    pub fn is_row_scan(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::RowScan(_)))
    }
}
