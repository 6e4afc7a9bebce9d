//! Error shared by the repository ports backed by the record store.

use super::define_port_error;

define_port_error! {
    /// Failures raised by repository adapters.
    pub enum StorePersistenceError {
        /// Reading or writing the backing file failed.
        Io { message: String } => "record store i/o failed: {message}",
        /// The persisted document could not be parsed or holds invalid records.
        Malformed { message: String } => "record store document is malformed: {message}",
        /// The store could not be reached, for example because its lock was
        /// poisoned or a blocking task was cancelled.
        Unavailable { message: String } => "record store unavailable: {message}",
    }
}
