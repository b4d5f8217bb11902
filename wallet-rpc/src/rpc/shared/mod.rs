pub mod call;
pub mod db;
pub mod endpoint;
pub mod method;
