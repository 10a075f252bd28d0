//! Holder-side view of stored credentials.
//!
//! A [`Credential`] is what the credential store hands to the query engine:
//! an identifier, an optional display name and the decoded claims, whose
//! shape depends on the credential format.

use std::collections::BTreeMap;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use ciborium::Value as Cbor;
use serde_json::{Map, Value as Json};
use uuid::Uuid;

use super::credential_format::ClaimFormatDesignation;

pub type CredentialId = String;

/// An issued credential as known to the holder.
#[derive(Debug, Clone, PartialEq)]
pub struct Credential {
    id: CredentialId,
    display_name: Option<String>,
    claims: CredentialClaims,
}

impl Credential {
    /// Creates a credential with a random identifier.
    pub fn new(claims: impl Into<CredentialClaims>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), claims)
    }

    pub fn with_id(id: impl Into<CredentialId>, claims: impl Into<CredentialClaims>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            claims: claims.into(),
        }
    }

    pub fn set_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn claims(&self) -> &CredentialClaims {
        &self.claims
    }

    pub fn format(&self) -> ClaimFormatDesignation {
        match &self.claims {
            CredentialClaims::MsoMdoc(_) => ClaimFormatDesignation::MsoMDoc,
            CredentialClaims::SdJwtVc(_) => ClaimFormatDesignation::DcSdJwt,
        }
    }
}

/// The decoded claims of a credential, one variant per supported format.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialClaims {
    MsoMdoc(MdocClaims),
    SdJwtVc(SdJwtVcClaims),
}

impl From<MdocClaims> for CredentialClaims {
    fn from(value: MdocClaims) -> Self {
        Self::MsoMdoc(value)
    }
}

impl From<SdJwtVcClaims> for CredentialClaims {
    fn from(value: SdJwtVcClaims) -> Self {
        Self::SdJwtVc(value)
    }
}

/// Data elements of an ISO mdoc, grouped by namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct MdocClaims {
    doc_type: String,
    namespaces: BTreeMap<String, BTreeMap<String, Cbor>>,
}

impl MdocClaims {
    pub fn new(doc_type: impl Into<String>) -> Self {
        Self {
            doc_type: doc_type.into(),
            namespaces: BTreeMap::new(),
        }
    }

    pub fn add_element(
        mut self,
        namespace: impl Into<String>,
        element_identifier: impl Into<String>,
        value: impl Into<Cbor>,
    ) -> Self {
        self.namespaces
            .entry(namespace.into())
            .or_default()
            .insert(element_identifier.into(), value.into());
        self
    }

    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    pub fn namespaces(&self) -> &BTreeMap<String, BTreeMap<String, Cbor>> {
        &self.namespaces
    }

    pub fn element(&self, namespace: &str, element_identifier: &str) -> Option<&Cbor> {
        self.namespaces.get(namespace)?.get(element_identifier)
    }
}

/// Disclosable claims of an SD-JWT VC, as a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct SdJwtVcClaims {
    vct: String,
    claims: Map<String, Json>,
}

impl SdJwtVcClaims {
    pub fn new(vct: impl Into<String>, claims: Map<String, Json>) -> Self {
        Self {
            vct: vct.into(),
            claims,
        }
    }

    pub fn add_claim(mut self, name: impl Into<String>, value: impl Into<Json>) -> Self {
        self.claims.insert(name.into(), value.into());
        self
    }

    pub fn vct(&self) -> &str {
        &self.vct
    }

    pub fn claims(&self) -> &Map<String, Json> {
        &self.claims
    }
}

/// A value resolved from a credential for a requested claim, kept in the
/// credential's native encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimValue {
    Mdoc(Cbor),
    Json(Json),
}

impl ClaimValue {
    pub fn to_json(&self) -> Json {
        match self {
            Self::Mdoc(value) => cbor_to_json(value),
            Self::Json(value) => value.clone(),
        }
    }
}

/// Converts a CBOR data item into its JSON equivalent.
///
/// Byte strings become unpadded base64url strings and tags are dropped in
/// favour of the tagged item, so a `full-date` (tag 1004) compares equal to
/// its JSON string form.
pub fn cbor_to_json(value: &Cbor) -> Json {
    match value {
        Cbor::Null => Json::Null,
        Cbor::Bool(b) => Json::Bool(*b),
        Cbor::Text(s) => Json::String(s.clone()),
        Cbor::Integer(i) => {
            let i = i128::from(*i);
            if let Ok(u) = u64::try_from(i) {
                Json::from(u)
            } else if let Ok(s) = i64::try_from(i) {
                Json::from(s)
            } else {
                Json::String(i.to_string())
            }
        }
        Cbor::Float(f) => serde_json::Number::from_f64(*f)
            .map(Json::Number)
            .unwrap_or(Json::Null),
        Cbor::Bytes(bytes) => Json::String(URL_SAFE_NO_PAD.encode(bytes)),
        Cbor::Tag(_, inner) => cbor_to_json(inner),
        Cbor::Array(items) => Json::Array(items.iter().map(cbor_to_json).collect()),
        Cbor::Map(entries) => Json::Object(
            entries
                .iter()
                .map(|(key, value)| {
                    let key = match key {
                        Cbor::Text(s) => s.clone(),
                        other => cbor_to_json(other).to_string(),
                    };
                    (key, cbor_to_json(value))
                })
                .collect(),
        ),
        _ => Json::Null,
    }
}
