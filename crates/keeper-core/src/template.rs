//! Variable substitution.

use serde_json::Value;

use crate::error::{KeeperError, Result};
use crate::request::Variables;

/// Renders string content with caller-supplied variables.
pub trait Renderer: Send + Sync {
    /// Substitutes `vars` into `content`.
    fn render(&self, content: &str, vars: &Variables) -> Result<String>;
}

/// Substitutes `{{name}}` placeholders.
///
/// Whitespace inside the braces and a leading dot (`{{ .name }}`) are
/// accepted. Every placeholder must name a supplied variable.
///
/// ```
/// use keeper_core::{PlaceholderRenderer, Renderer};
///
/// let mut vars = serde_json::Map::new();
/// vars.insert("name".into(), "world".into());
/// let text = PlaceholderRenderer.render("hello {{name}}", &vars).unwrap();
/// assert_eq!(text, "hello world");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderRenderer;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

impl Renderer for PlaceholderRenderer {
    fn render(&self, content: &str, vars: &Variables) -> Result<String> {
        let mut out = String::with_capacity(content.len());
        let mut rest = content;

        while let Some(start) = rest.find(OPEN) {
            out.push_str(&rest[..start]);
            let after_open = &rest[start + OPEN.len()..];

            let Some(end) = after_open.find(CLOSE) else {
                return Err(KeeperError::template(format!(
                    "unterminated placeholder at byte {}",
                    content.len() - rest.len() + start
                )));
            };

            let name = after_open[..end].trim();
            let name = name.strip_prefix('.').unwrap_or(name);
            if name.is_empty() {
                return Err(KeeperError::template("empty placeholder name"));
            }

            let value = vars
                .get(name)
                .ok_or_else(|| KeeperError::template(format!("variable '{name}' is not defined")))?;
            push_value(&mut out, value);

            rest = &after_open[end + CLOSE.len()..];
        }

        out.push_str(rest);
        Ok(out)
    }
}

fn push_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => {},
        Value::String(s) => out.push_str(s),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => {
            out.push_str(&value.to_string())
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars(value: Value) -> Variables {
        match value {
            Value::Object(map) => map,
            _ => panic!("vars must be an object"),
        }
    }

    #[test]
    fn test_substitutes_placeholders() {
        let vars = vars(json!({"name": "world", "port": 8080, "debug": true, "none": null}));
        let text = PlaceholderRenderer
            .render("hi {{name}} on {{ port }} debug={{.debug}} [{{ none }}]", &vars)
            .unwrap();
        assert_eq!(text, "hi world on 8080 debug=true []");
    }

    #[test]
    fn test_structured_values_render_as_json() {
        let vars = vars(json!({"hosts": ["a", "b"]}));
        let text = PlaceholderRenderer.render("{{hosts}}", &vars).unwrap();
        assert_eq!(text, r#"["a","b"]"#);
    }

    #[test]
    fn test_text_without_placeholders_is_unchanged() {
        let text = PlaceholderRenderer
            .render("plain } text { here", &Variables::new())
            .unwrap();
        assert_eq!(text, "plain } text { here");
    }

    #[test]
    fn test_unknown_variable_fails() {
        let err = PlaceholderRenderer
            .render("hello {{name}}", &Variables::new())
            .unwrap_err();
        assert!(matches!(err, KeeperError::Template { .. }));
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_unterminated_and_empty_placeholders_fail() {
        let vars = vars(json!({"name": "x"}));
        assert!(PlaceholderRenderer.render("hello {{name", &vars).is_err());
        assert!(PlaceholderRenderer.render("hello {{ }}", &vars).is_err());
    }
}
