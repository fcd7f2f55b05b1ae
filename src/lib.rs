//! hostsnap — one-shot host resource snapshot.
//!
//! Collects OS identity, CPU count and load, memory/swap usage, and
//! mounted-drive capacity into a single immutable [`model::SystemSnapshot`].
//!
//! Provides:
//! - `collector` — platform readers and the snapshot assembler
//! - `model` — the snapshot data model
//! - `units` — unit normalization (kB/pages/bytes → MB/GB, percentages)
//! - `render` — plain-text presenter
//!
//! On Linux the collectors read `/proc` pseudo-files through the
//! [`collector::FileSystem`] seam, so everything is testable against
//! in-memory fixtures. On Windows the `collector::win` module wraps the
//! structured system queries.

pub mod collector;
pub mod model;
pub mod render;
pub mod units;
