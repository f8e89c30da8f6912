use std::sync::Arc;

use opgraph_core::{Generate, Operation, Result, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    Include,
    Exclude,
}

impl FilterMode {
    fn keeps(&self, verdict: &Value) -> bool {
        match self {
            FilterMode::Include => verdict.is_truthy(),
            FilterMode::Exclude => !verdict.is_truthy(),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            FilterMode::Include => "Filter.include",
            FilterMode::Exclude => "Filter.exclude",
        }
    }
}

/// Keeps the elements of an iterable whose predicate verdict matches the
/// mode, in their original order.
#[derive(Clone)]
pub struct Filter {
    predicate: Operation,
    mode: FilterMode,
}

impl Filter {
    pub fn new(predicate: Operation) -> Self {
        Self {
            predicate,
            mode: FilterMode::Include,
        }
    }

    pub fn with_mode(mut self, mode: FilterMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Selects from `(element, verdict)` pairs.
    pub fn select(mode: FilterMode, pairs: Value) -> Result<Value> {
        let mut kept = Vec::new();
        for pair in pairs.as_slice()? {
            let (element, verdict) = pair.as_pair()?;
            if mode.keeps(verdict) {
                kept.push(element.clone());
            }
        }
        Ok(Value::tuple(kept))
    }
}

impl Generate for Filter {
    fn describe(&self) -> String {
        "Filter".into()
    }

    fn expand(&self, _value: &Value) -> Result<Operation> {
        let mode = self.mode;
        let verdicts = Operation::for_each(Operation::pair(self.predicate.clone())).labelled("Filter");
        let select = Operation::action_fallible(move |pairs| Filter::select(mode, pairs)).labelled(mode.label());
        Ok(verdicts >> select)
    }

    fn instantiate(&self) -> Arc<dyn Generate> {
        Arc::new(Filter::new(self.predicate.instantiate()).with_mode(self.mode))
    }
}

pub fn filter(predicate: Operation) -> Operation {
    Operation::generator(Filter::new(predicate))
}

pub fn exclude(predicate: Operation) -> Operation {
    Operation::generator(Filter::new(predicate).with_mode(FilterMode::Exclude))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdicts() -> Value {
        Value::tuple(vec![
            Value::pair(Value::Int(1), Value::Bool(false)),
            Value::pair(Value::Int(2), Value::Bool(true)),
            Value::pair(Value::Int(3), Value::Int(0)),
            Value::pair(Value::Int(4), Value::from("yes")),
        ])
    }

    #[test]
    fn test_select_include_uses_truthiness() {
        let kept = Filter::select(FilterMode::Include, verdicts()).unwrap();
        assert_eq!(kept, Value::tuple(vec![Value::Int(2), Value::Int(4)]));
    }

    #[test]
    fn test_select_exclude() {
        let kept = Filter::select(FilterMode::Exclude, verdicts()).unwrap();
        assert_eq!(kept, Value::tuple(vec![Value::Int(1), Value::Int(3)]));
    }

    #[test]
    fn test_default_mode_is_include() {
        assert_eq!(Filter::new(Operation::noop()).mode(), FilterMode::Include);
    }
}
