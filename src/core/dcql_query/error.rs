use serde_json::Value as Json;
use thiserror::Error;

use super::DcqlCredentialQueryId;

/// Errors raised while building or executing a DCQL query.
///
/// Claims that cannot be resolved or whose value is not accepted are not
/// errors, they only exclude a credential or claim set from the result.
#[derive(Debug, Error)]
pub enum DcqlError {
    /// The verifier's request is not a well-formed DCQL query.
    #[error("malformed DCQL query: {0}")]
    MalformedRequest(String),

    /// No credential satisfies a Credential Query while no Credential Set
    /// Queries are present.
    #[error("no matches for credential query with id {0}")]
    NoMatchForQuery(DcqlCredentialQueryId),

    /// None of the options of a required Credential Set Query is satisfied.
    #[error(
        "no credentials match required credential set query with purpose {}",
        describe_purpose(.purpose)
    )]
    UnsatisfiedRequiredSet { purpose: Json },

    /// The credential store failed to enumerate or look up credentials.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl DcqlError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRequest(message.into())
    }
}

fn describe_purpose(purpose: &Json) -> String {
    match purpose {
        Json::String(s) => s.clone(),
        other => other.to_string(),
    }
}
