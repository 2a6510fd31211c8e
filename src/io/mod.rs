//! TOML input for diagram construction.
//!
//! A diagram input document lists entries, an optional composition target
//! and optional construction settings:
//!
//! ```toml
//! [[entry]]
//! phase_type = "Solid"
//! formula = "MnO2"
//! energy = -4.8
//!
//! [[entry]]
//! phase_type = "Ion"
//! formula = "Mn[2+]"
//! energy = -2.3
//! concentration = 1e-4
//!
//! [[target]]
//! formula = "MnO2"
//! weight = 1.0
//!
//! [config]
//! max_combinations = 100000
//! ```
//!
//! Phase tags are kept as written and validated when the diagram is built.

pub mod error;

use crate::diagram::{self, CompositionTarget, DiagramConfig, TargetComponent};
use crate::model::diagram::PourbaixDiagram;
use crate::model::entry::EntryRecord;
use error::Error;
use serde::Deserialize;
use std::io::Read;

/// Parsed contents of a diagram input document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiagramInput {
    #[serde(rename = "entry", default)]
    pub entries: Vec<EntryRecord>,
    #[serde(rename = "target", default)]
    pub target: Vec<TargetComponent>,
    #[serde(default)]
    pub config: DiagramConfig,
}

impl DiagramInput {
    pub fn composition_target(&self) -> CompositionTarget {
        CompositionTarget::from(self.target.clone())
    }

    /// Runs the diagram pipeline over the document's entries.
    pub fn build(&self) -> Result<PourbaixDiagram, diagram::Error> {
        diagram::build_diagram_from_records(
            &self.entries,
            &self.composition_target(),
            &self.config,
        )
    }
}

/// Parses a diagram input document from a string.
pub fn from_toml_str(text: &str) -> Result<DiagramInput, Error> {
    toml::from_str(text).map_err(|e| Error::from_toml(text, e))
}

/// Reads a diagram input document.
pub fn read_input<R: Read>(mut reader: R) -> Result<DiagramInput, Error> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    from_toml_str(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANGANESE: &str = r#"
[[entry]]
phase_type = "Solid"
formula = "Mn"
energy = 0.0

[[entry]]
phase_type = "Solid"
formula = "MnO2"
energy = -4.8
id = "mp-510408"

[[entry]]
phase_type = "Ion"
formula = "Mn[2+]"
energy = -2.3
concentration = 1e-4
correction = 0.05

[config]
vertical_tolerance = 1e-9
"#;

    #[test]
    fn reads_entries_and_config() {
        let input = read_input(MANGANESE.as_bytes()).unwrap();
        assert_eq!(input.entries.len(), 3);
        assert!(input.target.is_empty());
        assert_eq!(input.config.vertical_tolerance, 1e-9);
        assert_eq!(input.config.lower_hull_tolerance, 0.0);

        let ion = &input.entries[2];
        assert_eq!(ion.phase_type, "Ion");
        assert_eq!(ion.concentration, Some(1e-4));
        assert_eq!(ion.correction, 0.05);
        assert_eq!(input.entries[1].id.as_deref(), Some("mp-510408"));
    }

    #[test]
    fn builds_single_element_diagram() {
        let diagram = from_toml_str(MANGANESE).unwrap().build().unwrap();
        assert_eq!(diagram.facets(), &[[0, 1, 2]]);
        assert_eq!(diagram.unprocessed_entries().len(), 3);
    }

    #[test]
    fn reads_target_tables() {
        let text = r#"
[[target]]
formula = "MnO2"
weight = 1.0

[[target]]
formula = "Mn2O3"
weight = 1.0
"#;
        let input = from_toml_str(text).unwrap();
        let target = input.composition_target();
        assert_eq!(target.len(), 2);
        assert_eq!(target.components()[1].formula, "Mn2O3");
    }

    #[test]
    fn config_section_is_optional() {
        let input = from_toml_str("").unwrap();
        assert!(input.entries.is_empty());
        assert_eq!(input.config, DiagramConfig::default());
    }

    #[test]
    fn parse_errors_report_line() {
        let text = "[[entry]]\nphase_type = \"Solid\"\nformula = \"Mn\"\nenergy = \"zero\"\n";
        match from_toml_str(text) {
            Err(Error::Parse { line, .. }) => assert_eq!(line, 4),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn unknown_sections_are_rejected() {
        assert!(matches!(
            from_toml_str("[settings]\nx = 1\n"),
            Err(Error::Parse { .. })
        ));
    }
}
