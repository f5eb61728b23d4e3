pub mod config;
pub mod engine;
pub mod error;
pub mod identity;
pub mod pretty;
pub mod session;
pub mod session_file;
pub mod transport;

pub use session::{SessionUpdate, TableSession, UiLog};
