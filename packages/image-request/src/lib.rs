pub mod config;
pub mod constants;
pub mod descriptor;
pub mod errors;
pub mod interpreter;
pub mod request;
pub mod resolve;
pub mod storage;

// 公開API
pub use config::{InterpreterConfig, SourceBuckets};
pub use descriptor::{DescriptorBuilder, ImageRequest, normalize_quality_key};
pub use errors::{ErrorBody, RequestError, StorageError};
pub use interpreter::ImageRequestInterpreter;
pub use request::{ImageRequestEvent, RequestType, classify};
pub use resolve::{Edits, resolve_bucket, resolve_edits, resolve_key, resolve_output_format};
pub use storage::{
    InMemoryStore, ObjectStore, OriginalImage, StorageProxyClient, StoredObject, fetch_original,
};
