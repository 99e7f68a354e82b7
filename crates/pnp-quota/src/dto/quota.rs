use crate::dto::prelude::*;

///
/// QuotaRequestBody
///
/// Body of an inbound quota status request. Fields outside this shape are
/// tolerated and ignored.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaRequestBody {
    pub account: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_method: Option<String>,

    #[serde(default, rename = "sessionID", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

///
/// QuotaStatus
///
/// Caller usage and allowance as combined from the signer nodes.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaStatus {
    pub performed_query_count: u64,
    pub total_quota: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

///
/// TESTS
///
