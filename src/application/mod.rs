//! Application layer: drag sessions and services
//!
//! This layer drives the domain engine and depends on I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod services;
pub mod session;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use session::{DragItem, DragListener, DragSession, HoverAction, NoopListener, TreeOptions};
