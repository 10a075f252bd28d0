use serde::Serialize;
use serde_json::Value as Json;

use super::path::ClaimsPathPointer;
use crate::utils::{to_human_readable_string, NonEmptyVec};

pub type DcqlClaimId = String;

/// A Claims Query object.
///
/// See: <https://openid.net/specs/openid-4-verifiable-presentations-1_0.html#section-6.3>
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DcqlClaim {
    /// REQUIRED if `claim_sets` is present in the Credential Query; OPTIONAL otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<DcqlClaimId>,
    /// REQUIRED. The claims path pointer to the claim within the Credential.
    path: ClaimsPathPointer,
    /// OPTIONAL. The accepted values of the claim, any value is accepted if absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    values: Option<NonEmptyVec<Json>>,
    /// OPTIONAL (ISO mdoc specific). Equivalent to `IntentToRetain` in ISO/IEC 18013-5.
    #[serde(skip_serializing_if = "Option::is_none")]
    intent_to_retain: Option<bool>,
}

impl DcqlClaim {
    pub fn new(path: ClaimsPathPointer) -> Self {
        Self {
            id: None,
            path,
            values: None,
            intent_to_retain: None,
        }
    }

    pub fn set_id(mut self, id: impl Into<DcqlClaimId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn set_values(mut self, values: NonEmptyVec<Json>) -> Self {
        self.values = Some(values);
        self
    }

    pub fn set_intent_to_retain(mut self, intent_to_retain: bool) -> Self {
        self.intent_to_retain = Some(intent_to_retain);
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn path(&self) -> &ClaimsPathPointer {
        &self.path
    }

    pub fn values(&self) -> Option<&NonEmptyVec<Json>> {
        self.values.as_ref()
    }

    pub fn intent_to_retain(&self) -> Option<bool> {
        self.intent_to_retain
    }

    /// A label for the claim suitable for showing to the holder, e.g.
    /// `Family Name` for `["org.iso.18013.5.1", "family_name"]`.
    pub fn display_name(&self) -> String {
        match self.path.claim_name() {
            Some(name) => to_human_readable_string(name),
            None => self.path.to_string(),
        }
    }
}
