//!
//! # Enum-String Mapping Module
//!
//! Defines the [enumstr] macro and paired [EnumStr] trait,
//! mapping fieldless enums to and from a set of strings.
//! Each variant has one canonical string, plus any number of accepted aliases.
//! Parameter files use these strings directly, so the generated enums
//! (de)serialize through them rather than through their Rust variant names.
//!
//! ```rust
//! use xbar21utils::{enumstr, EnumStr};
//!
//! enumstr!(
//!     /// # Which face of the substrate
//!     Face {
//!         Front: "front" | "top",
//!         Back: "back" | "bottom",
//!     }
//! );
//! assert_eq!(Face::Back.to_str(), "back");
//! assert_eq!(Face::from_str("bottom"), Some(Face::Back));
//! ```
//!

///
/// # String-Enumeration Trait
///
/// * `to_str(&self) -> &'static str` converts the enum to its canonical string.
/// * `from_str(&str) -> Option<Self>` accepts canonical strings and aliases alike.
///
pub trait EnumStr: std::marker::Sized {
    fn to_str(&self) -> &'static str;
    fn from_str(txt: &str) -> Option<Self>;
    /// Every accepted string, canonical values first
    fn accepted() -> &'static [&'static str];
}

///
/// # Enum-String Pairing Macro
///
/// Creates a fieldless `enum` which:
/// * Implements [EnumStr] over its canonical strings and aliases
/// * Implements [std::fmt::Display], writing the canonical string
/// * Implements `serde::{Serialize, Deserialize}` through those strings
///
/// Invoking crates must depend on `serde`.
///
#[macro_export]
macro_rules! enumstr {
    (   $(#[$meta: meta])*
        $enum_name: ident {
        $( $variant: ident : $strval: literal $(| $alias: literal)* ),* $(,)?
    }) => {
        $(#[$meta])*
        #[allow(dead_code)]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $enum_name {
            $( #[doc=$strval]
                $variant ),*
        }
        impl $crate::EnumStr for $enum_name {
            fn to_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $strval),*,
                }
            }
            /// Case-sensitive.
            fn from_str(txt: &str) -> Option<Self> {
                match txt {
                    $( $strval $(| $alias)* => Some(Self::$variant)),*,
                    _ => None,
                }
            }
            fn accepted() -> &'static [&'static str] {
                &[$( $strval ),* $($(, $alias)*)*]
            }
        }
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                write!(f, "{}", <Self as $crate::EnumStr>::to_str(self))
            }
        }
        impl ::serde::Serialize for $enum_name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(<Self as $crate::EnumStr>::to_str(self))
            }
        }
        impl<'de> ::serde::Deserialize<'de> for $enum_name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let txt = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                match <Self as $crate::EnumStr>::from_str(&txt) {
                    Some(v) => Ok(v),
                    None => Err(<D::Error as ::serde::de::Error>::custom(format!(
                        "invalid {} `{}`, expected one of {:?}",
                        stringify!($enum_name),
                        txt,
                        <Self as $crate::EnumStr>::accepted(),
                    ))),
                }
            }
        }
    }
}

#[cfg(test)]
pub mod tests {
    use crate::{EnumStr, SerializationFormat};

    enumstr!(
        /// # Bar Orientations
        BarAxis {
            Vertical: "vertical" | "v",
            Horizontal: "horizontal" | "h" | "x",
        }
    );

    #[test]
    fn test_enumstr() {
        assert_eq!(BarAxis::Vertical.to_str(), "vertical");
        assert_eq!(BarAxis::Horizontal.to_string(), "horizontal");

        assert_eq!(BarAxis::from_str("vertical"), Some(BarAxis::Vertical));
        assert_eq!(BarAxis::from_str("x"), Some(BarAxis::Horizontal));
        assert_eq!(BarAxis::from_str("H"), None);
        assert_eq!(
            BarAxis::accepted(),
            &["vertical", "horizontal", "v", "h", "x"]
        );
    }
    #[test]
    fn test_enumstr_serde() -> Result<(), crate::ser::Error> {
        let fmt = SerializationFormat::Json;
        let axis: BarAxis = fmt.from_str("\"v\"")?;
        assert_eq!(axis, BarAxis::Vertical);
        assert_eq!(fmt.to_string(&axis)?, "\"vertical\"");
        assert!(fmt.from_str::<BarAxis>("\"diagonal\"").is_err());
        Ok(())
    }
}
