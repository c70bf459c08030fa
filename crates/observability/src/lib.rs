//! Process-wide structured logging.
//!
//! Every binary calls [`init`] once before doing anything else; libraries
//! only emit `tracing` events and never install a subscriber themselves.

pub mod tracing;

pub use tracing::DEFAULT_FILTER;

/// Install the JSON subscriber. Returns `false` if one was already installed.
pub fn init() -> bool {
    tracing::init()
}
