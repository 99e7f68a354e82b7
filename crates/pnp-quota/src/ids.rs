//!
//! Endpoint identifiers for the combiner and the signer nodes it fans out to.
//!

use derive_more::Display;

///
/// CombinerEndpoint
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum CombinerEndpoint {
    #[display("/quotaStatus")]
    PnpQuota,
}

impl CombinerEndpoint {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::PnpQuota => "/quotaStatus",
        }
    }

    /// Signer endpoint that serves the per-node half of this combiner call.
    #[must_use]
    pub const fn signer_endpoint(self) -> SignerEndpoint {
        match self {
            Self::PnpQuota => SignerEndpoint::PnpQuota,
        }
    }
}

///
/// SignerEndpoint
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum SignerEndpoint {
    #[display("/quotaStatus")]
    PnpQuota,
}

impl SignerEndpoint {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::PnpQuota => "/quotaStatus",
        }
    }
}

///
/// TESTS
///
