//! Domain model for game content.

pub mod npc;
pub mod questions;
pub mod roster;
