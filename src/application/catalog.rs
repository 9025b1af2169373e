use crate::domain::entities::{Request, RequestSpec};

/// Menu-ordered requests, keyed "1", "2", ... by position
///
/// Keys only identify entries within one run; they shift whenever the
/// configured list changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestCatalog {
    entries: Vec<Request>,
}

impl RequestCatalog {
    pub fn build(specs: &[RequestSpec]) -> Self {
        let entries = specs
            .iter()
            .enumerate()
            .map(|(index, spec)| Request {
                key: (index + 1).to_string(),
                title: spec.title.clone(),
                method: spec.method,
                path: spec.path.clone(),
                body: spec.body.clone().unwrap_or_default(),
                headers: spec.headers.clone().unwrap_or_default(),
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&Request> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Request> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
