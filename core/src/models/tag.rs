use std::fmt;

use serde::{Deserialize, Serialize};

/// Declares a small, open, string-backed identifier type.
///
/// Print types, paper kinds and ink channels are all "open enums": the
/// engine never hard-codes the full set of values, it only compares tags
/// for equality and uses them as map keys. New tags require no code change.
macro_rules! tag_type {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::new(raw)
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self::new(raw)
            }
        }
    };
}

tag_type!(PrintType, "A category of print job, e.g. `bw`, `color`, `glossy`.");
tag_type!(PaperKind, "A physical sheet inventory bucket, e.g. `A4`, `Glossy`.");
tag_type!(InkChannel, "A colorant tank on a printer, e.g. `black`, `C`, `M`, `Y`.");

impl PrintType {
    pub const BW: &'static str = "bw";
    pub const COLOR: &'static str = "color";
    pub const GLOSSY: &'static str = "glossy";
    pub const THICK: &'static str = "thick";
    pub const POSTERSIZE: &'static str = "postersize";
}

impl InkChannel {
    pub const BLACK: &'static str = "black";
    pub const CYAN: &'static str = "C";
    pub const MAGENTA: &'static str = "M";
    pub const YELLOW: &'static str = "Y";
}
