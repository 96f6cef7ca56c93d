pub mod bucket;
pub mod edits;
pub mod format;
pub mod key;

pub use bucket::resolve_bucket;
pub use edits::{Edits, resolve_edits};
pub use format::resolve_output_format;
pub use key::resolve_key;
