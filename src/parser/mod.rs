//! Scenario validator
//!
//! Converts the JSON authoring format into a [`ScenarioDocument`]. Rules are
//! applied in a fixed order and the first failure wins; a document is either
//! accepted whole or rejected.
//!
//! 1. The root is an object with a string `name` and an array `steps`
//! 2. `steps` is not empty
//! 3. Every step has `type` and `text`
//! 4. `photo` and `button_text`, when present, are strings
//! 5. Kind-specific fields are present and consistent
//!
//! Unknown keys are ignored.

use crate::domain::errors::ValidationError;
use crate::types::scenario::{BranchOption, InputOption, ScenarioDocument, Step, StepKind};
use serde_json::{Map, Value};
use std::collections::HashSet;


type Result<T> = std::result::Result<T, ValidationError>;

/// Parse JSON text and validate it as the scenario `id`
pub fn parse(id: &str, json: &str) -> Result<ScenarioDocument> {
    let raw: Value = serde_json::from_str(json).map_err(|e| ValidationError::Syntax {
        line: e.line(),
        column: e.column(),
        message: e.to_string(),
    })?;
    validate(id, &raw)
}

/// Validate an already parsed JSON value as the scenario `id`
pub fn validate(id: &str, raw: &Value) -> Result<ScenarioDocument> {
    if id.trim().is_empty() {
        return Err(ValidationError::invalid(None, "id", "must not be empty"));
    }

    let root = raw
        .as_object()
        .ok_or_else(|| ValidationError::invalid(None, "<root>", "expected an object"))?;

    let scope = Fields::new(root, None);
    let display_name = scope.require_text("name")?;
    let steps = match root.get("steps") {
        None => return Err(ValidationError::missing(None, "steps")),
        Some(Value::Array(steps)) => steps,
        Some(_) => return Err(ValidationError::invalid(None, "steps", "expected an array")),
    };

    if steps.is_empty() {
        return Err(ValidationError::invalid(None, "steps", "must not be empty"));
    }

    let steps = steps
        .iter()
        .enumerate()
        .map(|(index, raw_step)| validate_step(index + 1, raw_step))
        .collect::<Result<Vec<_>>>()?;

    Ok(ScenarioDocument::new(id, display_name, steps))
}

/// Read only the display name, without validating steps
///
/// Used for menu listings where a broken document should still show up.
pub fn display_name(raw: &Value) -> Option<String> {
    raw.get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.trim().is_empty())
        .map(str::to_string)
}

fn validate_step(position: usize, raw: &Value) -> Result<Step> {
    let object = raw
        .as_object()
        .ok_or_else(|| ValidationError::invalid(Some(position), "<step>", "expected an object"))?;
    let fields = Fields::new(object, Some(position));

    // Rule 3: presence first, types afterwards
    if !object.contains_key("type") {
        return Err(fields.missing("type"));
    }
    if !object.contains_key("text") {
        return Err(fields.missing("text"));
    }
    let tag = fields.require_str("type")?;
    let text = fields.require_text("text")?;

    // Rule 4
    let photo_ref = fields.optional_text("photo")?;
    let button_label = fields.optional_text("button_text")?;
    let is_final = fields.optional_bool("is_final")?.unwrap_or(false);

    // Rule 5
    let kind = match tag.as_str() {
        "theory" => StepKind::Theory,
        "practice" => {
            let choices = fields.require_choices("buttons", true)?;
            let correct_choice = fields.require_str("correct_answer")?;
            if !choices.contains(&correct_choice) {
                return Err(fields.invalid(
                    "correct_answer",
                    format!("'{correct_choice}' is not one of the buttons"),
                ));
            }
            StepKind::Practice {
                choices,
                correct_choice,
            }
        }
        "text_answer" => StepKind::TextAnswer {
            placeholder: fields.optional_str("placeholder")?,
        },
        "branch" => {
            let options = fields
                .require_options()?
                .iter()
                .enumerate()
                .map(|(index, raw)| branch_option(&fields, index, raw))
                .collect::<Result<Vec<_>>>()?;
            StepKind::Branch { options }
        }
        "branch_with_input" => {
            let options = fields
                .require_options()?
                .iter()
                .enumerate()
                .map(|(index, raw)| input_option(&fields, index, raw))
                .collect::<Result<Vec<_>>>()?;
            StepKind::BranchWithInput { options }
        }
        "survey" => StepKind::Survey {
            choices: fields.require_choices("buttons", false)?,
        },
        other => {
            return Err(ValidationError::UnknownStepType {
                step: position,
                kind: other.to_string(),
            });
        }
    };

    Ok(Step {
        text,
        photo_ref,
        button_label,
        is_final,
        kind,
    })
}

fn branch_option(step: &Fields<'_>, index: usize, raw: &Value) -> Result<BranchOption> {
    let option = step.nested(index, raw)?;
    Ok(BranchOption {
        label: option.require_text("text")?,
        response: option.require_text("response")?,
        repeat_step: option.optional_bool("repeat_step")?.unwrap_or(false),
        show_continue_button: option.optional_bool("show_continue_button")?.unwrap_or(true),
    })
}

fn input_option(step: &Fields<'_>, index: usize, raw: &Value) -> Result<InputOption> {
    let option = step.nested(index, raw)?;
    Ok(InputOption {
        label: option.require_text("text")?,
        input_prompt: option.require_text("input_prompt")?,
    })
}

/// Field accessors bound to one JSON object and its error location
struct Fields<'a> {
    object: &'a Map<String, Value>,
    step: Option<usize>,
    prefix: String,
}

impl<'a> Fields<'a> {
    fn new(object: &'a Map<String, Value>, step: Option<usize>) -> Self {
        Self {
            object,
            step,
            prefix: String::new(),
        }
    }

    fn nested<'b>(&self, index: usize, raw: &'b Value) -> Result<Fields<'b>> {
        let prefix = format!("options[{index}]");
        let object = raw
            .as_object()
            .ok_or_else(|| ValidationError::invalid(self.step, prefix.clone(), "expected an object"))?;
        Ok(Fields {
            object,
            step: self.step,
            prefix: format!("{prefix}."),
        })
    }

    fn path(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    fn missing(&self, key: &str) -> ValidationError {
        ValidationError::missing(self.step, self.path(key))
    }

    fn invalid(&self, key: &str, reason: impl Into<String>) -> ValidationError {
        ValidationError::invalid(self.step, self.path(key), reason)
    }

    fn require_str(&self, key: &str) -> Result<String> {
        match self.object.get(key) {
            None => Err(self.missing(key)),
            Some(Value::String(value)) => Ok(value.clone()),
            Some(_) => Err(self.invalid(key, "expected a string")),
        }
    }

    /// A string that must contain something besides whitespace
    fn require_text(&self, key: &str) -> Result<String> {
        let value = self.require_str(key)?;
        if value.trim().is_empty() {
            return Err(self.invalid(key, "must not be empty"));
        }
        Ok(value)
    }

    fn optional_str(&self, key: &str) -> Result<Option<String>> {
        match self.object.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.clone())),
            Some(_) => Err(self.invalid(key, "expected a string")),
        }
    }

    fn optional_text(&self, key: &str) -> Result<Option<String>> {
        match self.optional_str(key)? {
            Some(value) if value.trim().is_empty() => Err(self.invalid(key, "must not be empty")),
            other => Ok(other),
        }
    }

    fn optional_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.object.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(value)) => Ok(Some(*value)),
            Some(_) => Err(self.invalid(key, "expected a boolean")),
        }
    }

    fn require_choices(&self, key: &str, unique: bool) -> Result<Vec<String>> {
        let items = match self.object.get(key) {
            None => return Err(self.missing(key)),
            Some(Value::Array(items)) => items,
            Some(_) => return Err(self.invalid(key, "expected an array of strings")),
        };
        if items.is_empty() {
            return Err(self.invalid(key, "must not be empty"));
        }

        let mut seen = HashSet::new();
        let mut choices = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let choice = item
                .as_str()
                .ok_or_else(|| self.invalid(&format!("{key}[{index}]"), "expected a string"))?;
            if unique && !seen.insert(choice) {
                return Err(self.invalid(key, format!("duplicate button '{choice}'")));
            }
            choices.push(choice.to_string());
        }
        Ok(choices)
    }

    fn require_options(&self) -> Result<&'a Vec<Value>> {
        match self.object.get("options") {
            None => Err(self.missing("options")),
            Some(Value::Array(options)) if options.is_empty() => {
                Err(self.invalid("options", "must not be empty"))
            }
            Some(Value::Array(options)) => Ok(options),
            Some(_) => Err(self.invalid("options", "expected an array")),
        }
    }
}
