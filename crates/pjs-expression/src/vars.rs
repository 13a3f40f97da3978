use crate::types::JsValue;
use serde_json::Value;

/// Variable scope for one evaluation.
///
/// Holds borrowed bindings (`$`, `i`, `prev`, ...) and, in implicit mode, the
/// current record as an environment whose own properties shadow them.
pub struct Vars<'a> {
    /// Object record whose properties resolve as free identifiers.
    pub env: Option<&'a JsValue>,
    vars: Vec<(&'static str, &'a JsValue)>,
}

impl<'a> Vars<'a> {
    pub fn new() -> Self {
        Vars {
            env: None,
            vars: Vec::new(),
        }
    }

    /// Scope whose free identifiers first look at `env`'s own properties.
    pub fn with_env(env: &'a JsValue) -> Self {
        Vars {
            env: Some(env),
            vars: Vec::new(),
        }
    }

    /// Binds `name`; a later binding of the same name shadows an earlier one.
    pub fn set(&mut self, name: &'static str, value: &'a JsValue) {
        self.vars.push((name, value));
    }

    /// Resolves a free identifier. Returns `None` if it is not defined.
    pub fn get(&self, name: &str) -> Option<JsValue> {
        if let Some(JsValue::Json(Value::Object(obj))) = self.env {
            if let Some(v) = obj.get(name) {
                return Some(JsValue::Json(v.clone()));
            }
        }
        self.vars
            .iter()
            .rev()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| (*v).clone())
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Short diagnostic listing of the bindings, for error messages.
    pub fn describe(&self) -> String {
        let mut seen: Vec<&str> = Vec::new();
        let mut parts = Vec::new();
        for (name, value) in &self.vars {
            if seen.contains(name) {
                continue;
            }
            seen.push(name);
            parts.push(format!("{} = {}", name, crate::util::inspect(value)));
        }
        parts.join(", ")
    }
}

impl Default for Vars<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn env_properties_shadow_bindings() {
        let record = JsValue::Json(json!({"i": "own", "name": "x"}));
        let index = JsValue::from(4i64);
        let mut vars = Vars::with_env(&record);
        vars.set("$", &record);
        vars.set("i", &index);
        assert_eq!(vars.get("i"), Some(JsValue::from("own")));
        assert_eq!(vars.get("name"), Some(JsValue::from("x")));
        assert_eq!(vars.get("$"), Some(record.clone()));
        assert_eq!(vars.get("nope"), None);
    }

    #[test]
    fn without_env_only_bindings_resolve() {
        let record = JsValue::Json(json!({"name": "x"}));
        let mut vars = Vars::new();
        vars.set("$", &record);
        assert!(!vars.has("name"));
        assert!(vars.has("$"));
        assert_eq!(vars.describe(), "$ = { name: 'x' }");
    }
}
