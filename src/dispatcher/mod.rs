//! Line-oriented command dispatcher.
//!
//! Parses textual commands (`read 0 1`, `report -s 0`, `briefcase A`, ...),
//! runs them against an engine and renders the replies. Malformed commands
//! and out-of-range indices are reported as `error: ...` replies and never
//! end the session.

mod command;
mod handler;

pub use command::Command;
pub use handler::{Dispatcher, Reply, HELP};
