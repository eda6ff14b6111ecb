//! Jitterscope Log Model
//!
//! Defines the events an animation engine writes to its log and turns raw
//! log lines back into them:
//! - **Events:** animation changes, jitter suppressions, drift warnings
//! - **Extraction:** single-pass line classification with animation context
//!   carried forward from line to line
//!
//! Log bytes that are not valid UTF-8 are decoded lossily; a scan never
//! aborts on encoding.

pub mod event;
pub mod extract;

pub use event::*;
pub use extract::*;
