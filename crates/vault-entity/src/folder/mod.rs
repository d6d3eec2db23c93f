//! Folder resources.

pub mod model;

pub use model::{AccessibleFolder, Folder, FolderPayload, NewFolder};
