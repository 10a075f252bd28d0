use core::fmt;
use std::{borrow::Cow, str::FromStr};

use serde::{Deserialize, Serialize};

const FORMAT_MSO_MDOC: &str = "mso_mdoc";
const FORMAT_DC_SD_JWT: &str = "dc+sd-jwt";
/// Media type used for SD-JWT VCs before the `dc+sd-jwt` rename.
pub(crate) const FORMAT_VC_SD_JWT_LEGACY: &str = "vc+sd-jwt";

/// The credential format requested by a DCQL Credential Query.
///
/// Only [`MsoMDoc`](Self::MsoMDoc) and [`DcSdJwt`](Self::DcSdJwt) can be matched
/// against stored credentials, any other designation parses into
/// [`Other`](Self::Other) and never matches.
///
/// See: [OID4VP 1.0 Appendix B](https://openid.net/specs/openid-4-verifiable-presentations-1_0.html#appendix-B)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClaimFormatDesignation {
    /// ISO/IEC 18013-5 mobile documents, claims addressed by `[namespace, element]`.
    MsoMDoc,
    /// IETF SD-JWT VC, claims addressed by a claims path pointer into a JSON tree.
    DcSdJwt,
    Other(String),
}

impl ClaimFormatDesignation {
    fn from_name(name: Cow<str>) -> Self {
        match name.as_ref() {
            FORMAT_MSO_MDOC => Self::MsoMDoc,
            FORMAT_DC_SD_JWT => Self::DcSdJwt,
            _ => Self::Other(name.into_owned()),
        }
    }

    /// Like the [`From<&str>`] conversion, but also maps the legacy `vc+sd-jwt`
    /// designation to [`DcSdJwt`](Self::DcSdJwt).
    pub fn from_name_lenient(name: &str) -> Self {
        match name {
            FORMAT_VC_SD_JWT_LEGACY => Self::DcSdJwt,
            _ => name.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::MsoMDoc => FORMAT_MSO_MDOC,
            Self::DcSdJwt => FORMAT_DC_SD_JWT,
            Self::Other(other) => other,
        }
    }

    fn into_name(self) -> Cow<'static, str> {
        match self {
            Self::MsoMDoc => Cow::Borrowed(FORMAT_MSO_MDOC),
            Self::DcSdJwt => Cow::Borrowed(FORMAT_DC_SD_JWT),
            Self::Other(other) => Cow::Owned(other),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<&str> for ClaimFormatDesignation {
    fn from(s: &str) -> Self {
        Self::from_name(Cow::Borrowed(s))
    }
}

impl From<String> for ClaimFormatDesignation {
    fn from(value: String) -> Self {
        Self::from_name(Cow::Owned(value))
    }
}

impl FromStr for ClaimFormatDesignation {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.into())
    }
}

impl From<ClaimFormatDesignation> for String {
    fn from(format: ClaimFormatDesignation) -> Self {
        format.into_name().into_owned()
    }
}

impl fmt::Display for ClaimFormatDesignation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name().fmt(f)
    }
}

impl Serialize for ClaimFormatDesignation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.name().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ClaimFormatDesignation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Into::into)
    }
}
