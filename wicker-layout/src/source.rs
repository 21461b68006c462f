use std::fmt::{Display, Formatter};

use serde::de::{Error, SeqAccess, Visitor};
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A point in the driver program, recorded in persisted layout metadata so a
/// schema mismatch can be traced back to the declaration that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    module: String,
    function: String,
    file: String,
    line: u32,
}

impl SourceLocation {
    /// Build a source location from its four components.
    pub fn new(
        module: impl Into<String>,
        function: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            module: module.into(),
            function: function.into(),
            file: file.into(),
            line,
        }
    }

    /// The declaring module path.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// The declaring function.
    pub fn function(&self) -> &str {
        &self.function
    }

    /// The source file.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// The line within [`SourceLocation::file`].
    pub fn line(&self) -> u32 {
        self.line
    }
}

impl Display for SourceLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}::{} ({}:{})",
            self.module, self.function, self.file, self.line
        )
    }
}

// The wire shape is a fixed 4-element sequence, written field by field and
// reconstructed positionally through the 4-argument constructor, not a keyed
// map: the type has no neutral empty value to patch fields into.
impl Serialize for SourceLocation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut tuple = serializer.serialize_tuple(4)?;
        tuple.serialize_element(&self.module)?;
        tuple.serialize_element(&self.function)?;
        tuple.serialize_element(&self.file)?;
        tuple.serialize_element(&self.line)?;
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for SourceLocation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SourceLocationVisitor;

        impl<'v> Visitor<'v> for SourceLocationVisitor {
            type Value = SourceLocation;

            fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
                write!(formatter, "a (module, function, file, line) tuple")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'v>,
            {
                let module: String = seq
                    .next_element()?
                    .ok_or_else(|| Error::invalid_length(0, &self))?;
                let function: String = seq
                    .next_element()?
                    .ok_or_else(|| Error::invalid_length(1, &self))?;
                let file: String = seq
                    .next_element()?
                    .ok_or_else(|| Error::invalid_length(2, &self))?;
                let line: u32 = seq
                    .next_element()?
                    .ok_or_else(|| Error::invalid_length(3, &self))?;
                Ok(SourceLocation::new(module, function, file, line))
            }
        }

        deserializer.deserialize_tuple(4, SourceLocationVisitor)
    }
}
