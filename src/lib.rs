//! This library evaluates [DCQL] queries, the query language of [OID4VP 1.0],
//! against the credentials held by a wallet.
//!
//! [DCQL]: <https://openid.net/specs/openid-4-verifiable-presentations-1_0.html#section-6>
//! [OID4VP 1.0]: <https://openid.net/specs/openid-4-verifiable-presentations-1_0.html>
//!
//! # Wallet Usage
//!
//! Credentials are provided to the query engine by implementing the
//! [`CredentialStore`] trait, or by using the in-memory [`MemoryCredentialStore`]:
//!
//! ```ignore
//! use openid4vp_dcql::core::credential::{Credential, MdocClaims};
//! use openid4vp_dcql::core::dcql_query::DcqlQuery;
//! use openid4vp_dcql::wallet::MemoryCredentialStore;
//! use serde_json::json;
//!
//! let store = MemoryCredentialStore::new([Credential::new(
//!     MdocClaims::new("org.iso.18013.5.1.mDL")
//!         .add_element("org.iso.18013.5.1", "given_name", "Erika")
//!         .add_element("org.iso.18013.5.1", "age_over_18", true),
//! )])?;
//!
//! // Parse the `dcql_query` parameter of the authorization request.
//! let query = DcqlQuery::from_json(json!({
//!     "credentials": [{
//!         "id": "mdl",
//!         "format": "mso_mdoc",
//!         "meta": { "doctype_value": "org.iso.18013.5.1.mDL" },
//!         "claims": [
//!             { "path": ["org.iso.18013.5.1", "given_name"] },
//!             { "path": ["org.iso.18013.5.1", "age_over_18"], "values": [true] }
//!         ]
//!     }]
//! }))?;
//!
//! // Find the credentials satisfying the query.
//! for response in query.execute(&store).await? {
//!     for candidate in response.matches() {
//!         // Ask the user which credential to present.
//!         show_consent_prompt(response.credential_query().id(), candidate);
//!     }
//! }
//! ```
//!
//! [`CredentialStore`]: crate::wallet::CredentialStore
//! [`MemoryCredentialStore`]: crate::wallet::MemoryCredentialStore
//!
//! # Query Evaluation
//!
//! 1. *Request parsing*: the request is validated and converted into a
//!    [`DcqlQuery`]. Structural problems are reported as
//!    [`DcqlError::MalformedRequest`].
//! 2. *Credential Queries*: each Credential Query is evaluated in order. Every
//!    stored credential of the requested format and type is a candidate, and a
//!    candidate matches when all requested claims (or the claims of the first
//!    satisfied claim set) resolve and have an accepted value.
//! 3. *Credential Sets*: when the query declares credential sets, each set
//!    selects the first of its options whose Credential Queries all matched.
//!    Unsatisfied required sets fail the evaluation, unsatisfied optional sets
//!    are skipped.
//!
//! [`DcqlQuery`]: crate::core::dcql_query::DcqlQuery
//! [`DcqlError::MalformedRequest`]: crate::core::dcql_query::DcqlError::MalformedRequest
//!
//! # Credential Formats
//!
//! Claims can be requested from the following credential formats:
//! - **mso_mdoc** (`mso_mdoc`): ISO/IEC 18013-5 mobile documents (mDL, etc.),
//!   claims are addressed by namespace and data element identifier.
//! - **SD-JWT VC** (`dc+sd-jwt`): IETF SD-JWT Verifiable Credentials, claims
//!   are addressed by a claims path pointer.
//!
//! Queries for other formats are accepted but never match. Format identifiers
//! are defined in the [`core::credential_format`] module.
//!
//! [`core::credential_format`]: crate::core::credential_format

pub mod config;
pub mod core;
pub mod utils;
pub mod wallet;
