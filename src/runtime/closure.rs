use std::fmt;

use rustc_hash::FxHashMap;

use crate::runtime::class::ClassInstance;
use crate::runtime::error::RuntimeError;
use crate::runtime::value::Value;

/// Variable scope: globals, method locals, or the fields of an instance.
#[derive(Debug, Clone, Default)]
pub struct Closure {
    vars: FxHashMap<String, Value>,
}

impl Closure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.vars.insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.vars.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Resolves a dotted path such as `a.b.c`.
    ///
    /// The first name is looked up here; every following name is looked up in
    /// the field scope of the instance the previous step produced.
    pub fn lookup(&self, path: &[String]) -> Result<Value, RuntimeError> {
        let (first, rest) = path
            .split_first()
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: String::new(),
            })?;
        let mut current = self
            .get(first)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: first.clone(),
            })?;

        for (index, field) in rest.iter().enumerate() {
            let resolved = &path[..=index];
            let next = expect_instance(&current, resolved)?.fields().get(field).cloned();
            current = next.ok_or_else(|| RuntimeError::UndefinedVariable {
                name: path[..=index + 1].join("."),
            })?;
        }
        Ok(current)
    }
}

pub(crate) fn expect_instance<'v>(
    value: &'v Value,
    path: &[String],
) -> Result<&'v ClassInstance, RuntimeError> {
    value
        .as_instance()
        .ok_or_else(|| RuntimeError::NotAnInstance {
            name: path.join("."),
            type_name: value.type_name().to_string(),
        })
}

/// Dumps the scope as `name: value` lines, sorted by name.
impl fmt::Display for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries = self.iter().collect::<Vec<_>>();
        entries.sort_by(|left, right| left.0.cmp(right.0));
        for (name, value) in entries {
            writeln!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}
