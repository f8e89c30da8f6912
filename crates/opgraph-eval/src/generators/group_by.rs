use std::sync::Arc;

use indexmap::IndexMap;
use opgraph_core::{Generate, Operation, Result, Value};

/// Buckets the elements of an iterable by the key `partitioner` assigns
/// them. Keys and the elements in each bucket keep first-seen order.
#[derive(Clone)]
pub struct GroupBy {
    partitioner: Operation,
}

impl GroupBy {
    pub fn new(partitioner: Operation) -> Self {
        Self { partitioner }
    }

    /// Folds `(element, key)` pairs into `{key: [element, ...]}`.
    pub fn aggregate(pairs: Value) -> Result<Value> {
        let mut buckets: IndexMap<Value, Vec<Value>> = IndexMap::new();
        for pair in pairs.as_slice()? {
            let (element, key) = pair.as_pair()?;
            buckets.entry(key.clone()).or_default().push(element.clone());
        }
        Ok(Value::dict(
            buckets
                .into_iter()
                .map(|(key, elements)| (key, Value::list(elements)))
                .collect(),
        ))
    }
}

impl Generate for GroupBy {
    fn describe(&self) -> String {
        "GroupBy".into()
    }

    fn expand(&self, _value: &Value) -> Result<Operation> {
        let keying = Operation::for_each(Operation::pair(self.partitioner.clone())).labelled("GroupBy");
        let aggregate = Operation::action_fallible(GroupBy::aggregate).labelled("GroupBy.aggregate");
        Ok(keying >> aggregate)
    }

    fn instantiate(&self) -> Arc<dyn Generate> {
        Arc::new(GroupBy::new(self.partitioner.instantiate()))
    }
}

pub fn group_by(partitioner: Operation) -> Operation {
    Operation::generator(GroupBy::new(partitioner))
}
