//! fundlens-cli library - maintenance commands
//!
//! Recomputes the denormalized cumulative fields stored on donor and think
//! tank entities after bulk imports.

pub mod cumulate;
