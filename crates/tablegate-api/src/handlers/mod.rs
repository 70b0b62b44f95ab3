pub mod file_relay;
pub mod proxy;
