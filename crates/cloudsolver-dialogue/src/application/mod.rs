//! Dialogue runtime: the session, its typed-text effect, question timer and
//! event sinks.

pub mod effect;
pub mod session;
pub mod sink;
pub mod timer;
