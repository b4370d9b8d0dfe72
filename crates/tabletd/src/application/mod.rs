//! Application layer: device session lifecycle.

pub mod session;
