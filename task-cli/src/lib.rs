//! Personal task tracker backed by a single JSON file.
pub mod config;
pub mod error;
pub mod service;
pub mod store;
pub mod task;

pub use error::TaskError;
pub use service::TaskService;
pub use store::TaskStore;
pub use task::{Status, StatusFilter, Task};
