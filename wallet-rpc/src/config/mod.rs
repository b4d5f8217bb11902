mod database;
pub use database::{Database, WalletDb};

mod app;
pub use app::App;

mod agent;
pub use agent::Agent;

mod sync;
pub use sync::SyncOptions;

mod config;
pub use config::Config;

mod parser;
pub use parser::Parser;
