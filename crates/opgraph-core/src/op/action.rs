use std::fmt;
use std::sync::{Arc, Mutex};

use crate::error::{OpgraphError, Result};
use crate::value::Value;

pub type ActionFn = Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>;

/// An action that owns mutable state between calls.
///
/// `fresh` builds an independent instance seeded from the configured initial
/// state, never from whatever the current instance has accumulated.
pub trait StatefulAction: Send + Sync {
    fn call(&self, value: Value) -> std::result::Result<Result<Value>, PoisonedState>;
    fn fresh(&self) -> Arc<dyn StatefulAction>;
}

#[derive(Debug)]
pub struct PoisonedState;

struct StateCell<S, F> {
    init: S,
    state: Mutex<S>,
    func: Arc<F>,
}

impl<S, F> StatefulAction for StateCell<S, F>
where
    S: Clone + Send + Sync + 'static,
    F: Fn(&mut S, Value) -> Result<Value> + Send + Sync + 'static,
{
    fn call(&self, value: Value) -> std::result::Result<Result<Value>, PoisonedState> {
        let mut state = self.state.lock().map_err(|_| PoisonedState)?;
        Ok((self.func)(&mut *state, value))
    }

    fn fresh(&self) -> Arc<dyn StatefulAction> {
        Arc::new(StateCell {
            init: self.init.clone(),
            state: Mutex::new(self.init.clone()),
            func: self.func.clone(),
        })
    }
}

#[derive(Clone)]
enum ActionBody {
    Pure(ActionFn),
    Stateful(Arc<dyn StatefulAction>),
}

/// Leaf operation wrapping a function from one value to another.
#[derive(Clone)]
pub struct Action {
    label: Option<String>,
    body: ActionBody,
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("label", &self.label)
            .field("stateful", &self.is_stateful())
            .finish()
    }
}

impl Action {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Self::fallible(move |v| Ok(f(v)))
    }

    pub fn fallible<F>(f: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        Action {
            label: None,
            body: ActionBody::Pure(Arc::new(f)),
        }
    }

    pub fn stateful<S, F>(init: S, f: F) -> Self
    where
        S: Clone + Send + Sync + 'static,
        F: Fn(&mut S, Value) -> Result<Value> + Send + Sync + 'static,
    {
        Action {
            label: None,
            body: ActionBody::Stateful(Arc::new(StateCell {
                state: Mutex::new(init.clone()),
                init,
                func: Arc::new(f),
            })),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn is_stateful(&self) -> bool {
        matches!(self.body, ActionBody::Stateful(_))
    }

    pub fn describe(&self) -> String {
        self.label.clone().unwrap_or_else(|| "Action".into())
    }

    /// Applies the wrapped function. Failures raised by the function are
    /// reported as `ActionFailed` carrying this action's description, unless
    /// they already are action or expansion failures from a nested run.
    pub fn call(&self, value: Value) -> Result<Value> {
        let result = match &self.body {
            ActionBody::Pure(f) => f(value),
            ActionBody::Stateful(cell) => cell
                .call(value)
                .map_err(|_| OpgraphError::StatePoisoned {
                    label: self.describe(),
                })?,
        };
        result.map_err(|e| {
            if e.is_action_failure() {
                e
            } else {
                OpgraphError::ActionFailed {
                    label: self.describe(),
                    message: e.to_string(),
                }
            }
        })
    }

    /// A copy with its own state. Pure actions share their function.
    pub fn instantiate(&self) -> Action {
        let body = match &self.body {
            ActionBody::Pure(f) => ActionBody::Pure(f.clone()),
            ActionBody::Stateful(cell) => ActionBody::Stateful(cell.fresh()),
        };
        Action {
            label: self.label.clone(),
            body,
        }
    }
}
