pub mod key_version;
pub mod send;
