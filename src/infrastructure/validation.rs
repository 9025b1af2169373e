use crate::infrastructure::schema::Rule;
use serde_yaml::Value;
use std::fmt;
use thiserror::Error;

/// One schema violation, addressed by its dotted path in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

/// Every violation found in a rejected document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render(.0))]
pub struct ValidationErrors(pub Vec<FieldViolation>);

fn render(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Checks a parsed document against a schema, collecting all violations
pub fn validate(schema: &Rule, document: &Value) -> Result<(), ValidationErrors> {
    let mut violations = Vec::new();
    check(schema, document, "", &mut violations);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(violations))
    }
}

fn check(rule: &Rule, value: &Value, path: &str, violations: &mut Vec<FieldViolation>) {
    let mut violate = |message: String| {
        violations.push(FieldViolation {
            field: path.to_string(),
            message,
        })
    };

    match rule {
        Rule::Any => {}
        Rule::String { allowed } => match value {
            Value::String(text) => {
                if let Some(allowed) = allowed {
                    if !allowed.iter().any(|candidate| candidate == text) {
                        violate(format!("unallowed value {text}"));
                    }
                }
            }
            _ => violate("must be of string type".to_string()),
        },
        Rule::Integer { min, max } => match value.as_i64() {
            Some(number) => {
                if let Some(min) = min.filter(|min| number < *min) {
                    violate(format!("min value is {min}"));
                }
                if let Some(max) = max.filter(|max| number > *max) {
                    violate(format!("max value is {max}"));
                }
            }
            None if value.as_u64().is_some() => {
                if let Some(max) = max {
                    violate(format!("max value is {max}"));
                }
            }
            None => violate("must be of integer type".to_string()),
        },
        Rule::Record {
            fields,
            allow_unknown,
        } => {
            let Value::Mapping(mapping) = value else {
                violate("must be of dict type".to_string());
                return;
            };
            for field in fields {
                let child_path = join(path, field.name);
                match mapping.get(field.name) {
                    None if field.required => violations.push(FieldViolation {
                        field: child_path,
                        message: "required field".to_string(),
                    }),
                    None => {}
                    Some(Value::Null) if field.nullable => {}
                    Some(Value::Null) => violations.push(FieldViolation {
                        field: child_path,
                        message: "null value not allowed".to_string(),
                    }),
                    Some(child) => check(&field.rule, child, &child_path, violations),
                }
            }
            if !allow_unknown {
                for key in mapping.keys() {
                    let known = key
                        .as_str()
                        .is_some_and(|name| fields.iter().any(|field| field.name == name));
                    if !known {
                        violations.push(FieldViolation {
                            field: join(path, &key_label(key)),
                            message: "unknown field".to_string(),
                        });
                    }
                }
            }
        }
        Rule::MappingOf(values) => {
            let Value::Mapping(mapping) = value else {
                violate("must be of dict type".to_string());
                return;
            };
            for (key, child) in mapping {
                let child_path = join(path, &key_label(key));
                if key.as_str().is_none() {
                    violations.push(FieldViolation {
                        field: child_path,
                        message: "key must be of string type".to_string(),
                    });
                    continue;
                }
                check(values, child, &child_path, violations);
            }
        }
        Rule::List(items) => {
            let Value::Sequence(sequence) = value else {
                violate("must be of list type".to_string());
                return;
            };
            for (index, item) in sequence.iter().enumerate() {
                check(items, item, &format!("{path}[{index}]"), violations);
            }
        }
    }
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

fn key_label(key: &Value) -> String {
    match key {
        Value::String(text) => text.clone(),
        other => serde_yaml::to_string(other)
            .map(|text| text.trim_end().to_string())
            .unwrap_or_else(|_| "?".to_string()),
    }
}
