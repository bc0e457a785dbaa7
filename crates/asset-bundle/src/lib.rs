//! Framestage Asset Bundles
//!
//! A bundle is a read-only store of named resources grouped under virtual
//! roots (for example `images/00001-capture.jpg`). This crate provides:
//! - **[`AssetBundle`]:** the `list` / `open` contract every bundle implements
//! - **[`DirBundle`]:** a bundle backed by a directory on disk
//! - **[`MemoryBundle`]:** a bundle backed by in-memory (or `include_bytes!`) data
//! - **[`enumerate`]:** the resource enumerator used by the staging copier

pub mod bundle;
pub mod dir;
pub mod enumerate;
pub mod memory;

pub use bundle::*;
pub use dir::DirBundle;
pub use enumerate::enumerate;
pub use memory::MemoryBundle;
