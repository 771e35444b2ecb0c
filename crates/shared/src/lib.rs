//! Types shared between the handicap client core and its front ends.

pub mod domain;
pub mod error;
pub mod protocol;
