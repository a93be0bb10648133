use super::Error;

/// Error when a statement is issued through a transaction that has already
/// been committed or rolled back.
#[derive(Debug)]
pub(super) struct TransactionClosed;

impl std::error::Error for TransactionClosed {}

impl core::fmt::Display for TransactionClosed {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("transaction already closed")
    }
}

impl Error {
    pub fn transaction_closed() -> Error {
        Error::from(super::ErrorKind::TransactionClosed(TransactionClosed))
    }

    pub fn is_transaction_closed(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::TransactionClosed(_)))
    }
}
