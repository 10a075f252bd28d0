use std::fmt;

use ciborium::Value as Cbor;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use thiserror::Error;

use crate::{core::credential::MdocClaims, utils::NonEmptyVec};

/// One component of a claims path pointer.
///
/// See: [OID4VP 1.0 §7](https://openid.net/specs/openid-4-verifiable-presentations-1_0.html#section-7)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PathElement {
    /// Selects the value of an object key.
    Key(String),
    /// Selects an array element.
    Index(usize),
    /// Selects every element of an array. Encoded as `null`.
    Wildcard,
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => key.fmt(f),
            Self::Index(index) => index.fmt(f),
            Self::Wildcard => f.write_str("*"),
        }
    }
}

/// A non-empty claims path pointer, e.g. `["address", "street_address"]` or
/// `["org.iso.18013.5.1", "given_name"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ClaimsPathPointer(NonEmptyVec<PathElement>);

impl ClaimsPathPointer {
    pub fn new(elements: NonEmptyVec<PathElement>) -> Self {
        Self(elements)
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.0
    }

    /// Returns `(namespace, element identifier)` if this pointer has the shape
    /// required for mdoc data elements.
    pub fn namespace_and_element(&self) -> Option<(&str, &str)> {
        match self.elements() {
            [PathElement::Key(namespace), PathElement::Key(element)] => {
                Some((namespace.as_str(), element.as_str()))
            }
            _ => None,
        }
    }

    /// The last key of the path, the claim name for most credential formats.
    pub fn claim_name(&self) -> Option<&str> {
        self.elements().iter().rev().find_map(|element| match element {
            PathElement::Key(key) => Some(key.as_str()),
            _ => None,
        })
    }
}

impl TryFrom<Vec<PathElement>> for ClaimsPathPointer {
    type Error = crate::utils::EmptyVecError;

    fn try_from(value: Vec<PathElement>) -> Result<Self, Self::Error> {
        NonEmptyVec::try_from(value).map(Self)
    }
}

impl fmt::Display for ClaimsPathPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.elements().iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            element.fmt(f)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("mdoc claims are addressed by exactly [namespace, element identifier]")]
    NotMdocPath,
    #[error("claims path pointer must start with a claim name")]
    MissingRootKey,
    #[error("key `{0}` not found")]
    KeyNotFound(String),
    #[error("cannot select key `{0}` from a value that is not an object")]
    NotAnObject(String),
    #[error("index {0} is out of bounds")]
    IndexOutOfBounds(usize),
    #[error("cannot select index {0} from a value that is not an array")]
    NotAnArray(usize),
    #[error("cannot select all elements of a value that is not an array")]
    WildcardOnNonArray,
}

/// Resolves a path against mdoc data elements.
///
/// Mdoc claims have no nested structure, so anything other than a
/// `[namespace, element]` pointer is not found.
pub fn resolve_mdoc<'a>(
    claims: &'a MdocClaims,
    path: &ClaimsPathPointer,
) -> Result<&'a Cbor, PathError> {
    let (namespace, element) = path.namespace_and_element().ok_or(PathError::NotMdocPath)?;
    claims
        .element(namespace, element)
        .ok_or_else(|| PathError::KeyNotFound(format!("{namespace}/{element}")))
}

/// Resolves a path against a JSON claims object.
///
/// A wildcard maps the rest of the path over every array element and
/// collects the results, so `["degrees", null, "type"]` yields the `type` of
/// each degree. Any element failing to resolve fails the whole pointer.
pub fn resolve_json(
    claims: &Map<String, Json>,
    path: &ClaimsPathPointer,
) -> Result<Json, PathError> {
    let (root, rest) = match path.elements() {
        [PathElement::Key(root), rest @ ..] => (root, rest),
        _ => return Err(PathError::MissingRootKey),
    };
    let value = claims
        .get(root)
        .ok_or_else(|| PathError::KeyNotFound(root.clone()))?;
    select(value, rest)
}

fn select(current: &Json, path: &[PathElement]) -> Result<Json, PathError> {
    let Some((head, rest)) = path.split_first() else {
        return Ok(current.clone());
    };

    match head {
        PathElement::Key(key) => match current {
            Json::Object(map) => {
                let next = map
                    .get(key)
                    .ok_or_else(|| PathError::KeyNotFound(key.clone()))?;
                select(next, rest)
            }
            Json::Array(_) | Json::String(_) | Json::Number(_) | Json::Bool(_) | Json::Null => {
                Err(PathError::NotAnObject(key.clone()))
            }
        },
        PathElement::Index(index) => match current {
            Json::Array(items) => {
                let next = items
                    .get(*index)
                    .ok_or(PathError::IndexOutOfBounds(*index))?;
                select(next, rest)
            }
            Json::Object(_) | Json::String(_) | Json::Number(_) | Json::Bool(_) | Json::Null => {
                Err(PathError::NotAnArray(*index))
            }
        },
        PathElement::Wildcard => match current {
            Json::Array(items) => items
                .iter()
                .map(|item| select(item, rest))
                .collect::<Result<Vec<_>, _>>()
                .map(Json::Array),
            Json::Object(_) | Json::String(_) | Json::Number(_) | Json::Bool(_) | Json::Null => {
                Err(PathError::WildcardOnNonArray)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn pointer(value: Json) -> ClaimsPathPointer {
        serde_json::from_value(value).unwrap()
    }

    fn pid_erika() -> Map<String, Json> {
        let Json::Object(claims) = json!({
            "given_name": "Erika",
            "family_name": "Mustermann",
            "address": {
                "country": "US",
                "state": "CA",
                "postal_code": 90210,
                "street_address": "Sample Street 123",
                "house_number": 123
            },
            "nationalities": ["German", "American"],
            "degrees": [
                {
                    "type": "Bachelor of Science",
                    "university": "University of Betelgeuse"
                },
                {
                    "type": "Master of Science",
                    "university": "University of Betelgeuse"
                }
            ]
        }) else {
            unreachable!()
        };
        claims
    }

    fn mdl_erika() -> MdocClaims {
        MdocClaims::new("org.iso.18013.5.1.mDL")
            .add_element("org.iso.18013.5.1", "given_name", "Erika")
            .add_element("org.iso.18013.5.1", "family_name", "Mustermann")
    }

    #[test]
    fn deserialize_path_elements() {
        let path = pointer(json!(["degrees", null, "type", 0]));
        assert_eq!(
            path.elements(),
            &[
                PathElement::Key("degrees".into()),
                PathElement::Wildcard,
                PathElement::Key("type".into()),
                PathElement::Index(0),
            ]
        );
        assert_eq!(path.to_string(), "degrees.*.type.0");
        assert_eq!(path.claim_name(), Some("type"));
        assert_eq!(serde_json::to_value(&path).unwrap(), json!(["degrees", null, "type", 0]));

        assert!(serde_json::from_value::<ClaimsPathPointer>(json!([])).is_err());
        assert!(serde_json::from_value::<ClaimsPathPointer>(json!(["a", -1])).is_err());
        assert!(serde_json::from_value::<ClaimsPathPointer>(json!(["a", true])).is_err());
        assert!(serde_json::from_value::<ClaimsPathPointer>(json!(["a", 1.5])).is_err());
    }

    #[test]
    fn pointers_are_hashable() {
        use std::collections::HashSet;

        let paths: HashSet<ClaimsPathPointer> = [
            json!(["address", "country"]),
            json!(["degrees", null, "type"]),
            json!(["address", "country"]),
        ]
        .into_iter()
        .map(pointer)
        .collect();
        assert_eq!(paths.len(), 2);
        assert!(paths.contains(&pointer(json!(["degrees", null, "type"]))));
    }

    #[test]
    fn mdoc_resolution() {
        let mdl = mdl_erika();
        assert_eq!(
            resolve_mdoc(&mdl, &pointer(json!(["org.iso.18013.5.1", "given_name"]))),
            Ok(&Cbor::Text("Erika".into()))
        );
        assert_eq!(
            resolve_mdoc(&mdl, &pointer(json!(["org.iso.18013.5.1", "birth_date"]))),
            Err(PathError::KeyNotFound("org.iso.18013.5.1/birth_date".into()))
        );
    }

    #[test]
    fn mdoc_resolution_is_total_for_other_shapes() {
        let mdl = mdl_erika();
        for path in [
            json!(["org.iso.18013.5.1"]),
            json!(["org.iso.18013.5.1", "given_name", "x"]),
            json!(["org.iso.18013.5.1", 0]),
            json!([null, "given_name"]),
        ] {
            assert_eq!(
                resolve_mdoc(&mdl, &pointer(path)),
                Err(PathError::NotMdocPath)
            );
        }
    }

    #[test]
    fn json_resolution() {
        let pid = pid_erika();
        let resolve = |path: Json| resolve_json(&pid, &pointer(path));

        assert_eq!(resolve(json!(["given_name"])), Ok(json!("Erika")));
        assert_eq!(
            resolve(json!(["does-not-exist"])),
            Err(PathError::KeyNotFound("does-not-exist".into()))
        );
        assert_eq!(resolve(json!(["address", "country"])), Ok(json!("US")));
        assert_eq!(resolve(json!(["address", "house_number"])), Ok(json!(123)));
        assert_eq!(
            resolve(json!(["address", "does-not-exist"])),
            Err(PathError::KeyNotFound("does-not-exist".into()))
        );
        assert_eq!(resolve(json!(["address"])), Ok(pid["address"].clone()));
        assert_eq!(resolve(json!(["nationalities", 1])), Ok(json!("American")));
        assert_eq!(
            resolve(json!(["nationalities", 2])),
            Err(PathError::IndexOutOfBounds(2))
        );
        assert_eq!(
            resolve(json!(["nationalities", null])),
            Ok(json!(["German", "American"]))
        );
    }

    #[test]
    fn wildcard_projects_every_element() {
        let pid = pid_erika();
        assert_eq!(
            resolve_json(&pid, &pointer(json!(["degrees", null, "type"]))),
            Ok(json!(["Bachelor of Science", "Master of Science"]))
        );
        assert_eq!(
            resolve_json(&pid, &pointer(json!(["degrees", null, "grade"]))),
            Err(PathError::KeyNotFound("grade".into()))
        );
    }

    #[test]
    fn malformed_descent_is_an_error_value() {
        let pid = pid_erika();
        let resolve = |path: Json| resolve_json(&pid, &pointer(path));

        assert_eq!(
            resolve(json!(["given_name", "first"])),
            Err(PathError::NotAnObject("first".into()))
        );
        assert_eq!(
            resolve(json!(["degrees", "type"])),
            Err(PathError::NotAnObject("type".into()))
        );
        assert_eq!(resolve(json!(["address", 0])), Err(PathError::NotAnArray(0)));
        assert_eq!(
            resolve(json!(["address", null])),
            Err(PathError::WildcardOnNonArray)
        );
        assert_eq!(resolve(json!([0])), Err(PathError::MissingRootKey));
        assert_eq!(resolve(json!([null])), Err(PathError::MissingRootKey));
    }
}
