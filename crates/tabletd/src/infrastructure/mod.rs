//! Infrastructure layer: settings, report replay, and pointer sinks.

pub mod pointer;
pub mod replay;
pub mod settings;
