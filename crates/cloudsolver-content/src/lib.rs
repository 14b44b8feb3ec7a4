//! Cloud Solver — Content.
//!
//! Static game content: the NPC roster with its dialogue pools and hint
//! phrasing, and the question bank behind the question provider port.
//! Built-in content is embedded YAML; alternative content can be loaded from
//! any YAML string and is validated on load.

pub mod application;
pub mod domain;
