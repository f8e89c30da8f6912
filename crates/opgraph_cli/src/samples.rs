use opgraph_core::{OpgraphError, Operation, Result, Value};
use opgraph_eval::{filter, group_by};

fn range() -> Operation {
    Operation::action_fallible(|v| Ok(Value::range(0, v.as_int()?))).labelled("fetch parameters")
}

fn multiple_of(k: i64) -> Operation {
    Operation::action_fallible(move |v| Ok(Value::Bool(v.as_int()? % k == 0)))
        .labelled(format!("Multiple of {k}"))
}

/// Numbers below `n` divisible by both 2 and 3, formatted as a list.
pub fn divisibility() -> Operation {
    let both = Operation::action_fallible(|v| {
        let (_, verdicts) = v.as_pair()?;
        let (by_two, by_three) = verdicts.as_pair()?;
        Ok(Value::Bool(by_two.is_truthy() && by_three.is_truthy()))
    })
    .labelled("both");
    let first = Operation::action_fallible(|v| Ok(v.as_pair()?.0.clone())).labelled("first");
    let to_str = Operation::action(|v| Value::from(v.to_display_string())).labelled("str");
    let format = Operation::action_fallible(|v| {
        let parts = v
            .as_slice()?
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::from(parts.join(", ")))
    })
    .labelled("format");

    range()
        >> Operation::for_each(Operation::pair(multiple_of(2) | multiple_of(3)))
        >> filter(both)
        >> Operation::for_each(first)
        >> Operation::for_each(to_str).labelled("str")
        >> format
}

/// Numbers below `n`, doubled when small and shifted down otherwise, then
/// bucketed by their remainder modulo 3.
pub fn buckets() -> Operation {
    let small = Operation::action_fallible(|v| Ok(Value::Bool(v.as_int()? < 5))).labelled("is small");
    let double = Operation::action_fallible(|v| Ok(Value::Int(v.as_int()? * 2))).labelled("double");
    let shrink =
        Operation::action_fallible(|v| Ok(Value::Int(v.as_int()? - 5))).labelled("make smaller");
    let mod3 = Operation::action_fallible(|v| {
        let x = v.as_int()?;
        if x < 0 {
            return Err(OpgraphError::value_error(format!("negative input {x}")));
        }
        Ok(Value::Int(x % 3))
    })
    .labelled("mod3");

    range()
        >> Operation::for_each(Operation::conditional(small, double, shrink))
        >> group_by(mod3)
}
