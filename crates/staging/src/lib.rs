//! Framestage Staging
//!
//! Materializes bundled assets into a writable directory that the encoder
//! can read:
//!
//! ```text
//! bundle:images ──enumerate──► [a.png, b.png, ...]
//!                                   │
//!                                   ▼
//! <external root>/<public subdir>/images/{a.png, b.png, ...}
//! ```
//!
//! - **Layout:** the staging directory is a pure function of the storage
//!   root, public subdirectory, and resource directory names.
//! - **Copier:** per-entry failures are recorded and skipped over; only a
//!   staging directory that cannot be created aborts the batch.

pub mod copier;
pub mod error;
pub mod layout;
pub mod report;

pub use copier::*;
pub use error::*;
pub use layout::*;
pub use report::*;
