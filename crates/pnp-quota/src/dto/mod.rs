pub mod envelope;
pub mod error;
pub mod http;
pub mod quota;

///
/// PRELUDE
///

pub mod prelude {
    pub use derive_more::Display;
    pub use serde::{Deserialize, Serialize};
}
