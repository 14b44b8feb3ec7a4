//! Domain model for scoring.

pub mod calculator;
pub mod question;
pub mod score;
pub mod submission;
