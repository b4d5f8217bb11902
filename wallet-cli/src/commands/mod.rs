pub mod connection;
pub mod credential;
pub mod handler;
pub mod sync;
