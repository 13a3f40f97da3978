//! Declarative pipeline description, loadable from JSON or TOML.

use crate::error::PipelineError;
use crate::ops::{make_filter, make_ignore_blank, make_map, make_reduce, make_serialize};
use crate::pipeline::Pipeline;
use serde::{Deserialize, Serialize};

/// Options of a line-oriented pjs run.
///
/// Stages are built in a fixed order regardless of field order:
/// ignore-blank, filter, map, reduce, serialize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Predicate snippet.
    pub filter: Option<String>,
    /// Mapping snippet.
    pub map: Option<String>,
    /// Builtin name or fold-step snippet.
    pub reduce: Option<String>,
    /// Snippets must reference the current line as `$`.
    pub explicit: bool,
    /// Drop every blank line, not only the trailing one.
    pub ignore_blanks: bool,
    /// Serialize output records as JSON documents.
    pub json: bool,
    /// Frame the JSON documents as one streamed array. Implies `json`.
    pub json_array: bool,
    /// Coerce the last expression stage's output to text lines.
    pub text: bool,
}

impl PipelineConfig {
    pub fn from_json(s: &str) -> Result<Self, PipelineError> {
        serde_json::from_str(s).map_err(|e| PipelineError::Config(e.to_string()))
    }

    fn serialize(&self) -> bool {
        self.json || self.json_array
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.text && self.serialize() {
            return Err(PipelineError::Config(
                "text output cannot be combined with json output".to_string(),
            ));
        }
        for (name, code) in [("filter", &self.filter), ("map", &self.map), ("reduce", &self.reduce)] {
            if code.as_deref().is_some_and(|c| c.trim().is_empty()) {
                return Err(PipelineError::Config(format!("{} expression is empty", name)));
            }
        }
        Ok(())
    }

    /// Compiles every snippet and assembles the stages.
    pub fn build(&self) -> Result<Pipeline, PipelineError> {
        self.validate()?;
        let last = if self.reduce.is_some() {
            "reduce"
        } else if self.map.is_some() {
            "map"
        } else {
            "filter"
        };
        let text_for = |stage: &str| self.text && stage == last;

        let mut pipeline = Pipeline::new().with_stage(make_ignore_blank(self.ignore_blanks));
        if let Some(code) = &self.filter {
            pipeline = pipeline.with_stage(make_filter(code, text_for("filter"), self.explicit)?);
        }
        if let Some(code) = &self.map {
            pipeline = pipeline.with_stage(make_map(code, text_for("map"), self.explicit)?);
        }
        if let Some(code) = &self.reduce {
            pipeline = pipeline.with_stage(make_reduce(code, text_for("reduce"))?);
        }
        if self.serialize() {
            pipeline = pipeline.with_stage(make_serialize(self.json_array));
        }
        log::debug!("pipeline: {}", pipeline.stage_names().join(" -> "));
        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_order_is_fixed() {
        let config = PipelineConfig {
            reduce: Some("sum".into()),
            filter: Some("length".into()),
            map: Some("+$".into()),
            json: true,
            ..Default::default()
        };
        let pipeline = config.build().unwrap();
        assert_eq!(pipeline.stage_names(), vec!["ignore-blank", "filter", "map", "reduce", "serialize"]);
    }

    #[test]
    fn conflicting_options_are_rejected() {
        let config = PipelineConfig {
            map: Some("$".into()),
            text: true,
            json_array: true,
            ..Default::default()
        };
        assert!(matches!(config.build(), Err(PipelineError::Config(_))));

        let config = PipelineConfig {
            filter: Some("  ".into()),
            ..Default::default()
        };
        assert!(matches!(config.build(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn snippet_errors_surface_at_build() {
        let config = PipelineConfig {
            map: Some("(".into()),
            ..Default::default()
        };
        assert!(matches!(config.build(), Err(PipelineError::Evaluation(_))));
    }

    #[test]
    fn loads_from_json() {
        let config = PipelineConfig::from_json(r#"{"map": "trim()", "ignore_blanks": true}"#).unwrap();
        assert_eq!(config.map.as_deref(), Some("trim()"));
        assert!(config.ignore_blanks);
        assert!(!config.explicit);
        assert!(PipelineConfig::from_json(r#"{"map": 1}"#).is_err());
    }
}
