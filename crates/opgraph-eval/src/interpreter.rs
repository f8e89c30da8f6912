use opgraph_core::{Cursor, NodeId, NodeKind, OpgraphError, Operation, Result, TraceGraph, Value};
use tracing::{debug, trace};

use crate::config::InterpreterConfig;

/// Evaluates operation trees and records what ran into a [`TraceGraph`].
///
/// Every evaluation step takes the cursor it starts from and returns the
/// cursor it ends at. Fan-out branches each get their own cursor seeded from
/// the same head, and only the merge step joins them again.
pub struct Interpreter {
    config: InterpreterConfig,
    graph: TraceGraph,
    cursor: Option<Cursor>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_config(InterpreterConfig::default())
    }

    pub fn with_config(config: InterpreterConfig) -> Self {
        Self {
            graph: TraceGraph::new(config.graph_name.clone()),
            config,
            cursor: None,
        }
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn graph(&self) -> &TraceGraph {
        &self.graph
    }

    pub fn into_graph(self) -> TraceGraph {
        self.graph
    }

    /// Runs `op` against `value`. Repeated calls continue the same trace
    /// from where the previous one ended.
    pub fn interpret(&mut self, op: &Operation, value: Value) -> Result<Value> {
        let start = match self.cursor {
            Some(cursor) => cursor,
            None => {
                let label = self
                    .config
                    .input_label
                    .clone()
                    .unwrap_or_else(|| value.to_display_string());
                self.graph.seed(label)
            }
        };
        self.cursor = Some(start);

        let (value, end) = self.eval(op, value, start)?;
        self.cursor = Some(end);
        Ok(value)
    }

    fn eval(&mut self, op: &Operation, value: Value, at: Cursor) -> Result<(Value, Cursor)> {
        debug!(kind = op.kind_name(), label = %op.describe(), "evaluating operation");

        match op {
            Operation::NoOp => Ok((value, at)),

            Operation::Pair(inner) => {
                let (result, at) = self.eval(inner, value.clone(), at)?;
                Ok((Value::pair(value, result), at))
            }

            Operation::Action(action) => {
                let output = action.call(value)?;
                let at = self.record(at, op.describe(), &output);
                Ok((output, at))
            }

            Operation::Constant(constant) => {
                let at = self.record(at, op.describe(), constant);
                Ok((constant.clone(), at))
            }

            Operation::Sequence { ops, .. } => {
                if ops.is_empty() {
                    return Err(OpgraphError::EmptyOperands {
                        kind: op.kind_name().into(),
                    });
                }
                let at = self.record(at, op.describe(), &value);
                let mut inner = self.graph.open_frame(at, op.describe());
                let mut value = value;
                for step in ops {
                    let (next, cursor) = self.eval(step, value, inner)?;
                    value = next;
                    inner = cursor;
                }
                Ok((value, self.graph.close_frame(inner)))
            }

            Operation::Bound { op: bound, value: bound_value } => {
                let at = self.record(at, op.describe(), &value);
                self.eval(bound, bound_value.clone(), at)
            }

            Operation::Parallel { ops, .. } => {
                let at = self.record(at, op.describe(), &value);
                let mut branches = Vec::with_capacity(ops.len());
                for branch in ops {
                    let start = self.graph.open_frame(at, branch.describe());
                    let (result, end) = self.eval(branch, value.clone(), start)?;
                    let end = self.graph.close_frame(end);
                    branches.push((result, end.head));
                }
                Ok(self.merge(at, branches))
            }

            Operation::ForEach { template, .. } => {
                let at = self.record(at, op.describe(), &value);
                let items = value.iter_items()?;
                let outer = self.graph.open_frame(at, op.describe());
                let mut branches = Vec::with_capacity(items.len());
                for item in items {
                    let instance = template.instantiate();
                    let start = self.graph.open_frame(outer, instance.describe());
                    let (result, end) = self.eval(&instance, item, start)?;
                    let end = self.graph.close_frame(end);
                    branches.push((result, end.head));
                }
                let (results, merged) = self.merge(outer, branches);
                Ok((results, self.graph.close_frame(merged)))
            }

            Operation::Conditional {
                predicate,
                if_true,
                if_false,
                ..
            } => {
                let at = self.record(at, op.describe(), &value);
                let (verdict, at) = self.eval(predicate, value.clone(), at)?;
                let branch = if verdict.is_truthy() { if_true } else { if_false };
                self.eval(branch, value, at)
            }

            Operation::Generator { generator, .. } => {
                let at = self.record(at, op.describe(), &value);
                let expanded = generator.expand(&value).map_err(|e| {
                    if e.is_action_failure() {
                        e
                    } else {
                        OpgraphError::ExpansionFailed {
                            generator: generator.describe(),
                            message: e.to_string(),
                        }
                    }
                })?;
                debug!(generator = %generator.describe(), expanded = %expanded.describe(), "expanded generator");
                self.eval(&expanded, value, at)
            }
        }
    }

    /// Adds a step node in the cursor's frame, linked from its head by an
    /// edge carrying `value`, and moves the head onto it.
    fn record(&mut self, at: Cursor, label: String, value: &Value) -> Cursor {
        let node = self.graph.add_node(at.frame, label, NodeKind::Step);
        let edge_label = self.config.edge_label(value.to_display_string());
        trace!(from = %at.head, to = %node, label = %edge_label, "trace edge");
        self.graph.add_edge(at.head, node, edge_label);
        Cursor {
            frame: at.frame,
            head: node,
        }
    }

    /// Joins branch heads into one merge node, with edges in branch order.
    fn merge(&mut self, at: Cursor, branches: Vec<(Value, NodeId)>) -> (Value, Cursor) {
        let node = self
            .graph
            .add_node(at.frame, TraceGraph::MERGE_LABEL, NodeKind::Merge);
        let mut results = Vec::with_capacity(branches.len());
        for (result, head) in branches {
            let label = self.config.edge_label(result.to_display_string());
            self.graph.add_edge(head, node, label);
            results.push(result);
        }
        trace!(node = %node, branches = results.len(), "merged branches");
        (
            Value::tuple(results),
            Cursor {
                frame: at.frame,
                head: node,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(n: i64) -> Operation {
        Operation::action_fallible(move |v| Ok(Value::Int(v.as_int()? + n))).labelled(format!("add {n}"))
    }

    #[test]
    fn test_action_records_output_on_edge() {
        let mut interp = Interpreter::new();
        let result = interp.interpret(&add(2), Value::Int(1)).unwrap();
        assert_eq!(result, Value::Int(3));

        let graph = interp.graph();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[0].kind, NodeKind::Input);
        assert_eq!(graph.nodes[0].label, "1");
        assert_eq!(graph.edges[0].label, "3");
    }

    #[test]
    fn test_repeated_interpret_continues_trace() {
        let mut interp = Interpreter::new();
        interp.interpret(&add(1), Value::Int(0)).unwrap();
        interp.interpret(&add(1), Value::Int(5)).unwrap();

        let graph = interp.graph();
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.edges[1].from, graph.edges[0].to);
    }

    #[test]
    fn test_input_label_override() {
        let config = InterpreterConfig {
            input_label: Some("start".into()),
            ..InterpreterConfig::default()
        };
        let mut interp = Interpreter::with_config(config);
        interp.interpret(&Operation::noop(), Value::Int(9)).unwrap();
        assert_eq!(interp.graph().nodes[0].label, "start");
    }

    #[test]
    fn test_hand_built_empty_sequence_fails_before_recording() {
        let op = Operation::Sequence {
            ops: vec![],
            label: None,
        };
        let mut interp = Interpreter::new();
        let err = interp.interpret(&op, Value::Int(1)).unwrap_err();

        assert!(matches!(err, OpgraphError::EmptyOperands { ref kind } if kind == "Sequence"));
        assert_eq!(interp.graph().nodes.len(), 1);
        assert!(interp.graph().edges.is_empty());
    }
}
