pub mod branch;
pub mod combine;
pub mod compose;
pub mod config;
pub mod error;
pub mod scan;
pub mod tags;

pub use branch::{Branch, TaggedFile, TerminalBranch, Termination};
pub use combine::combine;
pub use compose::{Composed, compose, discontinuity_warnings, tag_spans};
pub use config::{BracketStyle, Config, ExtensionMode};
pub use error::{AppError, Result};
pub use scan::{Group, scan_groups};
pub use tags::{extract_tags, strip_tags};
