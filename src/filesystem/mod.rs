pub mod clipboard;
pub mod memory;
pub mod secure;
pub mod store;
