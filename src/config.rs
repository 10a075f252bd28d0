use serde::Deserialize;

/// Options applied while building a [`DcqlQuery`](crate::core::dcql_query::DcqlQuery)
/// from a verifier request.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Accept `vc+sd-jwt` as an alias of `dc+sd-jwt` in the `format` of a
    /// Credential Query.
    ///
    /// Defaults to `true` when the `maximize_interoperability` feature is enabled.
    pub accept_legacy_sd_jwt_format: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            accept_legacy_sd_jwt_format: cfg!(feature = "maximize_interoperability"),
        }
    }
}
