use std::sync::Arc;

use crate::error::Result;
use crate::value::Value;

use super::Operation;

/// An operation defined only through the operation it produces for a given
/// input.
///
/// `expand` must be a pure function of the generator's configuration and
/// the value: the interpreter calls it once per invocation and runs the
/// result against that same value.
pub trait Generate: Send + Sync {
    fn describe(&self) -> String;

    fn expand(&self, value: &Value) -> Result<Operation>;

    /// A copy of this generator whose configured operations carry fresh
    /// state. Called whenever the enclosing tree is instantiated, so every
    /// stateful action the generator holds must go through
    /// [`Operation::instantiate`].
    fn instantiate(&self) -> Arc<dyn Generate>;
}
