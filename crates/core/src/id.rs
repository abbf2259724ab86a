//! Strongly-typed string identifiers.
//!
//! Identifiers are persisted as plain JSON strings, so every id type is a
//! transparent newtype over `String`.

/// Declare a string-backed identifier newtype.
///
/// The generated type is `serde(transparent)`, displays as the inner string and
/// rejects blank input in `FromStr`.
#[macro_export]
macro_rules! string_id {
    ($(#[$meta:meta])* $vis:vis struct $t:ident, $name:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(transparent)]
        $vis struct $t(String);

        impl $t {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $t {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl ::core::str::FromStr for $t {
            type Err = $crate::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err($crate::DomainError::invalid_id(format!("{}: empty", $name)));
                }
                Ok(Self(trimmed.to_string()))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use core::str::FromStr;

    string_id!(struct SampleId, "SampleId");

    #[test]
    fn parse_trims_and_rejects_blank() {
        assert_eq!(SampleId::from_str(" 7 ").unwrap().as_str(), "7");
        assert!(SampleId::from_str("   ").is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = SampleId::from("42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"42\"");
    }
}
