//! Folder operations.

pub mod service;

pub use service::{CreateFolderRequest, CreatedFolder, FolderService, UpdateFolderRequest};
