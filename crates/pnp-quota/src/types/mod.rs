mod address;
mod key_version;
mod request;

pub use address::*;
pub use key_version::*;
pub use request::*;
