use busdesk_core::EntryId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("no entry with id {0} in the draft")]
    UnknownEntry(EntryId),

    #[error("{collection} index {index} out of range (len {len})")]
    IndexOutOfRange {
        collection: &'static str,
        index: usize,
        len: usize,
    },
}
