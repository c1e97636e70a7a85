pub mod atomic;
pub mod lock;
pub mod paths;
pub mod terminal;

pub use lock::StorageLock;
pub use paths::{default_storage_dir, resolve_storage_dir};
pub use terminal::sanitize_for_terminal;
