pub mod event;
pub mod kind;

pub use event::ImageRequestEvent;
pub use kind::{RequestType, classify};
