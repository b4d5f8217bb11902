//! `sync` composes the connection and credential state machines into a single pass
mod scheduler;
pub(crate) mod tasks;

pub use scheduler::Scheduler;

pub mod types;
