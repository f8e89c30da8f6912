use std::ops::{BitOr, Shr};

use super::Operation;

impl Operation {
    /// Runs `self` and then `next`.
    ///
    /// Sequences on either side are spliced rather than nested, so
    /// `(a >> b) >> c`, `a >> (b >> c)` and `[a, b, c]` are the same flat
    /// sequence. Labels of spliced sequences are dropped.
    pub fn then(self, next: Operation) -> Operation {
        let mut ops = Vec::new();
        for op in [self, next] {
            match op {
                Operation::Sequence { ops: inner, .. } => ops.extend(inner),
                other => ops.push(other),
            }
        }
        Operation::Sequence { ops, label: None }
    }

    /// Runs `self` and `other` on the same input. Always binary: chaining
    /// nests, so `a | b | c` yields `((a, b), c)`.
    pub fn par(self, other: Operation) -> Operation {
        Operation::Parallel {
            ops: vec![self, other],
            label: None,
        }
    }
}

impl Shr for Operation {
    type Output = Operation;

    fn shr(self, rhs: Operation) -> Operation {
        self.then(rhs)
    }
}

impl BitOr for Operation {
    type Output = Operation;

    fn bitor(self, rhs: Operation) -> Operation {
        self.par(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(op: &Operation) -> Vec<String> {
        match op {
            Operation::Sequence { ops, .. } | Operation::Parallel { ops, .. } => {
                ops.iter().map(Operation::describe).collect()
            }
            other => vec![other.describe()],
        }
    }

    fn named(name: &str) -> Operation {
        Operation::action(|v| v).labelled(name)
    }

    #[test]
    fn test_then_is_associative() {
        let left = (named("a") >> named("b")) >> named("c");
        let right = named("a") >> (named("b") >> named("c"));
        let direct = Operation::sequence(vec![named("a"), named("b"), named("c")]).unwrap();

        assert_eq!(labels(&left), vec!["a", "b", "c"]);
        assert_eq!(labels(&left), labels(&right));
        assert_eq!(labels(&left), labels(&direct));
    }

    #[test]
    fn test_then_splices_direct_sequences() {
        let seq = Operation::sequence(vec![named("a"), named("b")]).unwrap();
        let op = named("x").then(seq);
        assert_eq!(labels(&op), vec!["x", "a", "b"]);
    }

    #[test]
    fn test_labelled_sequence_is_spliced() {
        let seq = (named("a") >> named("b")).labelled("inner");
        let op = named("x") >> seq;
        assert_eq!(labels(&op), vec!["x", "a", "b"]);
        assert_eq!(op.describe(), "Sequence");
    }

    #[test]
    fn test_par_nests() {
        let op = named("a") | named("b") | named("c");
        let Operation::Parallel { ops, .. } = &op else {
            panic!("expected parallel");
        };
        assert_eq!(ops.len(), 2);
        assert_eq!(labels(&ops[0]), vec!["a", "b"]);
        assert_eq!(ops[1].describe(), "c");
    }
}
