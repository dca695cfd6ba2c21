//! Tasks domain module.
//!
//! A task is one interpretation/translation assignment: where it happens,
//! which language pair it covers and when it starts.

pub mod task;

pub use task::Task;
