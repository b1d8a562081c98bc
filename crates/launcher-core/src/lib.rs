//! System Launcher core
//!
//! File-system back ends, lifecycle components and the `Core` context object
//! that the RPC server delegates to.

pub mod components;
pub mod context;
pub mod error;
pub mod fs;
pub mod git;
pub mod models;
pub mod storage;

pub use components::ComponentKind;
pub use context::Core;
pub use error::{Error, Result};
pub use fs::{FileSystem, FsKind};
