pub mod codec;
pub mod errors;
pub mod filter;
pub mod handlers;
pub mod manager;
pub mod models;
pub mod notify;
pub mod ports;
pub mod store;
