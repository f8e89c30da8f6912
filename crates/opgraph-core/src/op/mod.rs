mod action;
mod compose;
mod generator;

pub use action::{Action, ActionFn, PoisonedState, StatefulAction};
pub use generator::Generate;

use std::fmt;
use std::sync::Arc;

use crate::error::{OpgraphError, Result};
use crate::value::Value;

/// A node in a workflow tree.
///
/// Trees are plain data: building one never runs anything. The interpreter
/// is the only consumer that matches on the variants.
#[derive(Clone)]
pub enum Operation {
    Action(Action),

    /// Ignores its input and yields the value.
    Constant(Value),

    /// Identity. Leaves no trace.
    NoOp,

    /// Sub-operations applied left to right, each feeding the next.
    Sequence {
        ops: Vec<Operation>,
        label: Option<String>,
    },

    /// Sub-operations all applied to the same input; yields a tuple in
    /// list order.
    Parallel {
        ops: Vec<Operation>,
        label: Option<String>,
    },

    /// A fresh instance of `template` per element of an iterable input;
    /// yields a tuple in iteration order.
    ForEach {
        template: Box<Operation>,
        label: Option<String>,
    },

    /// Runs exactly one branch, chosen by the truthiness of `predicate`.
    Conditional {
        predicate: Box<Operation>,
        if_true: Box<Operation>,
        if_false: Box<Operation>,
        label: Option<String>,
    },

    /// `op` evaluated against `value`, whatever the incoming input is.
    Bound { op: Box<Operation>, value: Value },

    /// Expanded against each input it receives.
    Generator {
        generator: Arc<dyn Generate>,
        label: Option<String>,
    },

    /// Yields `(input, op(input))`. Leaves no trace of its own.
    Pair(Box<Operation>),
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Action(a) => a.fmt(f),
            Operation::Constant(v) => write!(f, "Constant({v:?})"),
            Operation::NoOp => write!(f, "NoOp"),
            Operation::Sequence { ops, label } => f
                .debug_struct("Sequence")
                .field("ops", ops)
                .field("label", label)
                .finish(),
            Operation::Parallel { ops, label } => f
                .debug_struct("Parallel")
                .field("ops", ops)
                .field("label", label)
                .finish(),
            Operation::ForEach { template, label } => f
                .debug_struct("ForEach")
                .field("template", template)
                .field("label", label)
                .finish(),
            Operation::Conditional {
                predicate,
                if_true,
                if_false,
                label,
            } => f
                .debug_struct("Conditional")
                .field("predicate", predicate)
                .field("if_true", if_true)
                .field("if_false", if_false)
                .field("label", label)
                .finish(),
            Operation::Bound { op, value } => f
                .debug_struct("Bound")
                .field("op", op)
                .field("value", value)
                .finish(),
            Operation::Generator { generator, .. } => write!(f, "Generator({})", generator.describe()),
            Operation::Pair(op) => f.debug_tuple("Pair").field(op).finish(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl From<Action> for Operation {
    fn from(action: Action) -> Self {
        Operation::Action(action)
    }
}

impl Operation {
    pub fn action<F>(f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Operation::Action(Action::new(f))
    }

    pub fn action_fallible<F>(f: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        Operation::Action(Action::fallible(f))
    }

    pub fn stateful<S, F>(init: S, f: F) -> Self
    where
        S: Clone + Send + Sync + 'static,
        F: Fn(&mut S, Value) -> Result<Value> + Send + Sync + 'static,
    {
        Operation::Action(Action::stateful(init, f))
    }

    pub fn constant(value: impl Into<Value>) -> Self {
        Operation::Constant(value.into())
    }

    pub fn noop() -> Self {
        Operation::NoOp
    }

    /// Fails with `EmptyOperands` on an empty list; a sequence of nothing
    /// has no meaningful output.
    pub fn sequence(ops: Vec<Operation>) -> Result<Self> {
        if ops.is_empty() {
            return Err(OpgraphError::EmptyOperands {
                kind: "Sequence".into(),
            });
        }
        Ok(Operation::Sequence { ops, label: None })
    }

    /// An empty list is accepted and evaluates to the empty tuple.
    pub fn parallel(ops: Vec<Operation>) -> Self {
        Operation::Parallel { ops, label: None }
    }

    pub fn for_each(template: Operation) -> Self {
        Operation::ForEach {
            template: Box::new(template),
            label: None,
        }
    }

    pub fn conditional(predicate: Operation, if_true: Operation, if_false: Operation) -> Self {
        Operation::Conditional {
            predicate: Box::new(predicate),
            if_true: Box::new(if_true),
            if_false: Box::new(if_false),
            label: None,
        }
    }

    /// Conditional whose false branch is a no-op.
    pub fn when(predicate: Operation, if_true: Operation) -> Self {
        Self::conditional(predicate, if_true, Operation::NoOp)
    }

    /// Conditional whose true branch is a no-op.
    pub fn unless(predicate: Operation, if_false: Operation) -> Self {
        Self::conditional(predicate, Operation::NoOp, if_false)
    }

    pub fn bound(op: Operation, value: impl Into<Value>) -> Self {
        Operation::Bound {
            op: Box::new(op),
            value: value.into(),
        }
    }

    pub fn generator<G: Generate + 'static>(generator: G) -> Self {
        Operation::Generator {
            generator: Arc::new(generator),
            label: None,
        }
    }

    pub fn pair(op: Operation) -> Self {
        Operation::Pair(Box::new(op))
    }

    /// Sets the display label.
    ///
    /// Constants and bound operations always describe themselves by their
    /// value, and `NoOp` and `Pair` record no node to label, so those four
    /// variants are returned unchanged.
    pub fn labelled(self, new_label: impl Into<String>) -> Self {
        let new_label = new_label.into();
        match self {
            Operation::Action(a) => Operation::Action(a.with_label(new_label)),
            Operation::Sequence { ops, .. } => Operation::Sequence {
                ops,
                label: Some(new_label),
            },
            Operation::Parallel { ops, .. } => Operation::Parallel {
                ops,
                label: Some(new_label),
            },
            Operation::ForEach { template, .. } => Operation::ForEach {
                template,
                label: Some(new_label),
            },
            Operation::Conditional {
                predicate,
                if_true,
                if_false,
                ..
            } => Operation::Conditional {
                predicate,
                if_true,
                if_false,
                label: Some(new_label),
            },
            Operation::Generator { generator, .. } => Operation::Generator {
                generator,
                label: Some(new_label),
            },
            other @ (Operation::Constant(_)
            | Operation::NoOp
            | Operation::Bound { .. }
            | Operation::Pair(_)) => other,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Operation::Action(_) => "Action",
            Operation::Constant(_) => "Constant",
            Operation::NoOp => "NoOp",
            Operation::Sequence { .. } => "Sequence",
            Operation::Parallel { .. } => "Parallel",
            Operation::ForEach { .. } => "ForEach",
            Operation::Conditional { .. } => "Conditional",
            Operation::Bound { .. } => "Bound",
            Operation::Generator { .. } => "Generator",
            Operation::Pair(_) => "Pair",
        }
    }

    /// Stable display string, used as the trace label.
    pub fn describe(&self) -> String {
        match self {
            Operation::Action(a) => a.describe(),
            Operation::Constant(v) => v.to_display_string(),
            Operation::Bound { value, .. } => value.to_display_string(),
            Operation::Generator { generator, label } => {
                label.clone().unwrap_or_else(|| generator.describe())
            }
            Operation::Sequence { label, .. }
            | Operation::Parallel { label, .. }
            | Operation::ForEach { label, .. }
            | Operation::Conditional { label, .. } => {
                label.clone().unwrap_or_else(|| self.kind_name().into())
            }
            Operation::NoOp | Operation::Pair(_) => self.kind_name().into(),
        }
    }

    /// Whether evaluating this operation adds a node to the trace.
    pub fn is_traced(&self) -> bool {
        !matches!(self, Operation::NoOp | Operation::Pair(_))
    }

    /// A structurally identical tree in which every stateful action has
    /// fresh state seeded from its initial configuration.
    pub fn instantiate(&self) -> Operation {
        match self {
            Operation::Action(a) => Operation::Action(a.instantiate()),
            Operation::Constant(v) => Operation::Constant(v.clone()),
            Operation::NoOp => Operation::NoOp,
            Operation::Sequence { ops, label } => Operation::Sequence {
                ops: ops.iter().map(Operation::instantiate).collect(),
                label: label.clone(),
            },
            Operation::Parallel { ops, label } => Operation::Parallel {
                ops: ops.iter().map(Operation::instantiate).collect(),
                label: label.clone(),
            },
            Operation::ForEach { template, label } => Operation::ForEach {
                template: Box::new(template.instantiate()),
                label: label.clone(),
            },
            Operation::Conditional {
                predicate,
                if_true,
                if_false,
                label,
            } => Operation::Conditional {
                predicate: Box::new(predicate.instantiate()),
                if_true: Box::new(if_true.instantiate()),
                if_false: Box::new(if_false.instantiate()),
                label: label.clone(),
            },
            Operation::Bound { op, value } => Operation::Bound {
                op: Box::new(op.instantiate()),
                value: value.clone(),
            },
            Operation::Generator { generator, label } => Operation::Generator {
                generator: generator.instantiate(),
                label: label.clone(),
            },
            Operation::Pair(op) => Operation::Pair(Box::new(op.instantiate())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sequence_is_rejected() {
        let err = Operation::sequence(vec![]).unwrap_err();
        assert!(matches!(err, OpgraphError::EmptyOperands { ref kind } if kind == "Sequence"));
    }

    #[test]
    fn test_empty_parallel_is_allowed() {
        let op = Operation::parallel(vec![]);
        assert!(matches!(op, Operation::Parallel { ref ops, .. } if ops.is_empty()));
    }

    #[test]
    fn test_describe() {
        assert_eq!(Operation::action(|v| v).describe(), "Action");
        assert_eq!(Operation::action(|v| v).labelled("double").describe(), "double");
        assert_eq!(Operation::constant(5).describe(), "5");
        assert_eq!(Operation::noop().describe(), "NoOp");
        assert_eq!(Operation::bound(Operation::noop(), "x").describe(), "x");
        assert_eq!(Operation::for_each(Operation::noop()).describe(), "ForEach");
        assert_eq!(
            Operation::for_each(Operation::noop()).labelled("each").describe(),
            "each"
        );
    }

    #[test]
    fn test_labelled_keeps_value_descriptions() {
        let op = Operation::constant(3).labelled("three");
        assert_eq!(op.describe(), "3");
        assert_eq!(Operation::noop().labelled("idle").describe(), "NoOp");
        assert_eq!(Operation::pair(Operation::noop()).labelled("p").describe(), "Pair");
    }

    struct Echo;

    impl Generate for Echo {
        fn describe(&self) -> String {
            "Echo".into()
        }

        fn expand(&self, value: &Value) -> Result<Operation> {
            Ok(Operation::constant(value.clone()))
        }

        fn instantiate(&self) -> Arc<dyn Generate> {
            Arc::new(Echo)
        }
    }

    #[test]
    fn test_labelled_generator() {
        assert_eq!(Operation::generator(Echo).describe(), "Echo");

        let op = Operation::generator(Echo).labelled("bucket");
        assert_eq!(op.describe(), "bucket");
        assert_eq!(op.instantiate().describe(), "bucket");
    }

    #[test]
    fn test_instantiate_isolates_nested_state() {
        let template = Operation::for_each(Operation::stateful(0i64, |n, _| {
            *n += 1;
            Ok(Value::Int(*n))
        }));
        let copy = template.instantiate();

        let (Operation::ForEach { template: a, .. }, Operation::ForEach { template: b, .. }) =
            (&template, &copy)
        else {
            panic!("expected for-each");
        };
        let (Operation::Action(a), Operation::Action(b)) = (a.as_ref(), b.as_ref()) else {
            panic!("expected actions");
        };

        a.call(Value::None).unwrap();
        a.call(Value::None).unwrap();
        assert_eq!(b.call(Value::None).unwrap(), Value::Int(1));
    }
}
