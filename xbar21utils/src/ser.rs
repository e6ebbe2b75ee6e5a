//!
//! # Serialization & Deserialization Utilities
//!
//! Parameter files for the generator arrive as JSON, YAML, or TOML.
//! [SerializationFormat] reads and writes each, and sorts out which one a file uses
//! from its extension.
//!

// Std-Lib
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

// Crates.io
use serde::de::DeserializeOwned;
use serde::Serialize;
use textwrap::dedent;

/// # Enumerated First-Class-Supported Serialization Formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializationFormat {
    Json,
    Yaml,
    Toml,
}
impl SerializationFormat {
    /// Infer the format from the extension of `fname`.
    /// Returns `None` for missing or unrecognized extensions.
    pub fn from_path(fname: impl AsRef<Path>) -> Option<Self> {
        let ext = fname.as_ref().extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
    /// Convert any [serde::Serialize] data to a serialized string
    pub fn to_string(&self, data: &impl Serialize) -> Result<String, Error> {
        match *self {
            Self::Json => Ok(serde_json::to_string_pretty(data)?),
            Self::Yaml => Ok(serde_yaml::to_string(data)?),
            Self::Toml => Ok(toml::to_string(data)?),
        }
    }
    /// Parse string `s`.
    /// Leading indentation common to all lines is removed first,
    /// so inline test-fixtures can be written indented.
    pub fn from_str<T: DeserializeOwned>(&self, s: &str) -> Result<T, Error> {
        let s = dedent(s);
        match *self {
            Self::Json => Ok(serde_json::from_str(&s)?),
            Self::Yaml => Ok(serde_yaml::from_str(&s)?),
            Self::Toml => Ok(toml::from_str(&s)?),
        }
    }
    /// Save `data` to file `fname`
    pub fn save(&self, data: &impl Serialize, fname: impl AsRef<Path>) -> Result<(), Error> {
        let mut file = BufWriter::new(std::fs::File::create(fname)?);
        let s = self.to_string(data)?;
        file.write_all(s.as_bytes())?;
        file.flush()?;
        Ok(())
    }
    /// Load from file at path `fname`
    pub fn open<T: DeserializeOwned>(&self, fname: impl AsRef<Path>) -> Result<T, Error> {
        let file = std::fs::File::open(&fname)?;
        let mut file = BufReader::new(file);
        let rv: T = match *self {
            Self::Json => serde_json::from_reader(file)?,
            Self::Yaml => serde_yaml::from_reader(file)?,
            Self::Toml => {
                // No reader-based TOML parsing; go through a string
                let mut s = String::new();
                file.read_to_string(&mut s)?;
                toml::from_str(&s)?
            }
        };
        Ok(rv)
    }
}

/// Serialization to & from file trait
///
/// Fully default-implemented, allowing empty implementations
/// for types that implement [serde] serialization and deserialization.
///
pub trait SerdeFile: Serialize + DeserializeOwned {
    /// Save in `fmt`-format to file `fname`
    fn save(&self, fmt: SerializationFormat, fname: impl AsRef<Path>) -> Result<(), Error> {
        fmt.save(self, fname)
    }
    /// Open from `fmt`-format file `fname`
    fn open(fname: impl AsRef<Path>, fmt: SerializationFormat) -> Result<Self, Error> {
        fmt.open(fname)
    }
    /// Open from file `fname`, inferring its format from its extension
    fn open_any(fname: impl AsRef<Path>) -> Result<Self, Error> {
        let fname = fname.as_ref();
        match SerializationFormat::from_path(fname) {
            Some(fmt) => fmt.open(fname),
            None => Err(Error::msg(format!(
                "Unsupported parameter-file extension: {:?}",
                fname
            ))),
        }
    }
}

/// Wrapper over other errors
#[derive(Debug)]
pub struct Error(Box<dyn std::error::Error + Send + Sync>);
impl Error {
    /// Create an [Error] from a string message
    pub fn msg(s: impl Into<String>) -> Self {
        Self(s.into().into())
    }
}
impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}
impl std::error::Error for Error {}
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self(Box::new(e))
    }
}
impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Self(Box::new(e))
    }
}
impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Self(Box::new(e))
    }
}
impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self(Box::new(e))
    }
}
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self(Box::new(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Pitches {
        bar: f64,
        pad: f64,
    }

    #[test]
    fn format_from_path() {
        use SerializationFormat::*;
        assert_eq!(SerializationFormat::from_path("a/b.json"), Some(Json));
        assert_eq!(SerializationFormat::from_path("params.YML"), Some(Yaml));
        assert_eq!(SerializationFormat::from_path("params.toml"), Some(Toml));
        assert_eq!(SerializationFormat::from_path("params.txt"), None);
        assert_eq!(SerializationFormat::from_path("params"), None);
    }
    #[test]
    fn parse_indented_yaml() -> Result<(), Error> {
        let p: Pitches = SerializationFormat::Yaml.from_str(
            r#"
            bar: 100.0
            pad: 250.0
            "#,
        )?;
        assert_eq!(p, Pitches { bar: 100.0, pad: 250.0 });
        Ok(())
    }
    #[test]
    fn each_format_reads_its_own_output() -> Result<(), Error> {
        let p = Pitches { bar: 1.5, pad: 3.0 };
        for fmt in [
            SerializationFormat::Json,
            SerializationFormat::Yaml,
            SerializationFormat::Toml,
        ] {
            let s = fmt.to_string(&p)?;
            let q: Pitches = fmt.from_str(&s)?;
            assert_eq!(p, q);
        }
        Ok(())
    }
}
