//! Serde support for type-erased parse errors.

use crate::error::{display, Kind, ParseError};

/// The serialized form of a [ParseError].
///
/// Serialization keeps the observable behavior of the error (name, kind,
/// title, notes, annotation) but erases the concrete type.
#[derive(Clone, Debug, ::serde::Serialize, ::serde::Deserialize)]
struct SerializableError {
    name: String,
    kind: Kind,
    title: String,
    notes: Vec<display::Note>,
    source_annotation: String,
}

impl ParseError for SerializableError {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> Kind {
        self.kind
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn notes(&self) -> Vec<display::Note> {
        self.notes.clone()
    }

    fn source_annotation(&self) -> String {
        self.source_annotation.clone()
    }
}

#[allow(clippy::borrowed_box)] // this exact function signature is required by serde.
pub(super) fn serialize_error<S>(
    value: &Box<dyn ParseError>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: ::serde::Serializer,
{
    use ::serde::Serialize;
    let serializable_error = SerializableError {
        name: value.name().into(),
        kind: value.kind(),
        title: value.title(),
        notes: value.notes(),
        source_annotation: value.source_annotation(),
    };
    serializable_error.serialize(serializer)
}

pub(super) fn deserialize_error<'de, D>(deserializer: D) -> Result<Box<dyn ParseError>, D::Error>
where
    D: ::serde::Deserializer<'de>,
{
    use ::serde::Deserialize;
    let serializable_error = SerializableError::deserialize(deserializer)?;
    Ok(Box::new(serializable_error))
}
