//! The parsed source map handed to the builder.

/// The fields of a V3 source map the reverse index is built from.
///
/// Callers parse the JSON themselves; with the `serde` feature this type
/// deserializes directly from a source map object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SourceMapInput {
    /// Declared format version. Only 3 is accepted when present.
    #[cfg_attr(feature = "serde", serde(default))]
    pub version: Option<u32>,
    /// Name of the generated file.
    #[cfg_attr(feature = "serde", serde(default))]
    pub file: Option<String>,
    /// Delta-encoded mappings, `;` per generated line and `,` per segment.
    #[cfg_attr(feature = "serde", serde(default))]
    pub mappings: String,
    /// Original source file names, indexed from 0.
    #[cfg_attr(feature = "serde", serde(default))]
    pub sources: Vec<String>,
    /// Symbolic names, indexed from 0.
    #[cfg_attr(feature = "serde", serde(default))]
    pub names: Vec<String>,
}

impl SourceMapInput {
    /// Creates an input from its mapping string and tables.
    pub fn new<S, N>(mappings: impl Into<String>, sources: S, names: N) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        N: IntoIterator,
        N::Item: Into<String>,
    {
        Self {
            version: Some(3),
            file: None,
            mappings: mappings.into(),
            sources: sources.into_iter().map(Into::into).collect(),
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_source_map() {
        let json = r#"{
            "version": 3,
            "file": "out.js",
            "sourceRoot": "",
            "sources": ["a.ts", "b.ts?v=1"],
            "sourcesContent": [null, null],
            "names": ["main"],
            "mappings": "AAAAA;ACAA"
        }"#;
        let input: SourceMapInput = serde_json::from_str(json).unwrap();
        assert_eq!(
            input,
            SourceMapInput {
                version: Some(3),
                file: Some("out.js".to_string()),
                mappings: "AAAAA;ACAA".to_string(),
                sources: vec!["a.ts".to_string(), "b.ts?v=1".to_string()],
                names: vec!["main".to_string()],
            }
        );
    }

    #[test]
    fn test_deserialize_defaults() {
        let input: SourceMapInput = serde_json::from_str(r#"{"mappings": ""}"#).unwrap();
        assert_eq!(input, SourceMapInput::default());
    }
}
