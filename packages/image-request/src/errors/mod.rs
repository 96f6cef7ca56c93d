pub mod types;

pub use types::{ErrorBody, RequestError, StorageError};
