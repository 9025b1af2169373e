use crate::domain::configuration::{DEFAULT_HOST, DEFAULT_PORT};
use crate::domain::entities::Method;
use serde_yaml::{Mapping, Value};

pub const MIN_PORT: i64 = 1024;
pub const MAX_PORT: i64 = 65535;

/// Declarative constraint on one node of the configuration tree
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Any value at all
    Any,
    String {
        allowed: Option<Vec<String>>,
    },
    Integer {
        min: Option<i64>,
        max: Option<i64>,
    },
    /// Mapping with declared fields
    Record {
        fields: Vec<Field>,
        allow_unknown: bool,
    },
    /// Mapping with string keys and uniformly constrained values
    MappingOf(Box<Rule>),
    List(Box<Rule>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub rule: Rule,
    pub required: bool,
    pub nullable: bool,
}

impl Field {
    pub fn optional(name: &'static str, rule: Rule) -> Self {
        Self {
            name,
            rule,
            required: false,
            nullable: false,
        }
    }

    pub fn required(name: &'static str, rule: Rule) -> Self {
        Self {
            required: true,
            ..Self::optional(name, rule)
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// Default configuration tree and the schema documents are checked against
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    defaults: Mapping,
    schema: Rule,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::with_allowed_methods(&Method::ALL)
    }

    /// Restricts the verbs a configured request may use
    pub fn with_allowed_methods(methods: &[Method]) -> Self {
        Self {
            defaults: default_tree(),
            schema: document_schema(methods),
        }
    }

    pub fn defaults(&self) -> &Mapping {
        &self.defaults
    }

    pub fn schema(&self) -> &Rule {
        &self.schema
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn default_tree() -> Mapping {
    let mut general = Mapping::new();
    general.insert("host".into(), DEFAULT_HOST.into());
    general.insert("port".into(), u64::from(DEFAULT_PORT).into());

    let mut root = Mapping::new();
    root.insert("general".into(), Value::Mapping(general));
    root.insert("requests".into(), Value::Sequence(Vec::new()));
    root
}

fn document_schema(methods: &[Method]) -> Rule {
    let general = Rule::Record {
        fields: vec![
            Field::optional("host", Rule::String { allowed: None }),
            Field::optional(
                "port",
                Rule::Integer {
                    min: Some(MIN_PORT),
                    max: Some(MAX_PORT),
                },
            ),
        ],
        allow_unknown: true,
    };

    let request = Rule::Record {
        fields: vec![
            Field::required("title", Rule::String { allowed: None }),
            Field::required(
                "type",
                Rule::String {
                    allowed: Some(methods.iter().map(|m| m.as_str().to_string()).collect()),
                },
            ),
            Field::required("path", Rule::String { allowed: None }),
            Field::optional("body", Rule::MappingOf(Box::new(Rule::Any))).nullable(),
            Field::optional(
                "headers",
                Rule::MappingOf(Box::new(Rule::String { allowed: None })),
            )
            .nullable(),
        ],
        allow_unknown: true,
    };

    Rule::Record {
        fields: vec![
            Field::optional("general", general).nullable(),
            Field::optional("requests", Rule::List(Box::new(request))).nullable(),
        ],
        allow_unknown: true,
    }
}
