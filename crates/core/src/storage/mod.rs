pub mod backup;
pub mod encryption;
pub mod format;
pub mod gateway;
pub mod kv;
