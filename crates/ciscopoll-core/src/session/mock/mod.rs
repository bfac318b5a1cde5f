//! Scripted sessions and captured device output for tests.

pub mod outputs;
mod scripted;

pub use scripted::ScriptedSession;
