//! Selector evaluation.
//!
//! Navigation works on sequences: each step is applied to every item of the
//! current sequence, arrays are mapped over, and array values found by a step
//! are flattened one level into the next sequence. The final sequence is
//! undefined when empty, the lone value when it has one item, and an array
//! otherwise.

use crate::parse::{Expr, Step, StepKind};
use serde_json::Value;

impl Expr {
    /// Evaluate against `input`. `None` means no match.
    pub fn evaluate(&self, input: &Value) -> Option<Value> {
        match self {
            Expr::Path(steps) => evaluate_steps(steps, input),
            Expr::Literal(name) => evaluate_steps(&[Step::name(name.as_str())], input),
        }
    }
}

fn evaluate_steps(steps: &[Step], input: &Value) -> Option<Value> {
    let mut sequence = vec![input];
    for step in steps {
        let mut next = Vec::new();
        for item in sequence {
            let mut matched = Vec::new();
            step.collect(item, &mut matched);
            next.extend(apply_stages(matched, &step.stages));
        }
        if next.is_empty() {
            return None;
        }
        sequence = next;
    }
    match sequence.as_slice() {
        [] => None,
        [one] => Some((*one).clone()),
        many => Some(Value::Array(many.iter().map(|v| (*v).clone()).collect())),
    }
}

impl Step {
    fn collect<'a>(&self, item: &'a Value, out: &mut Vec<&'a Value>) {
        match item {
            Value::Array(items) => {
                for item in items {
                    self.collect(item, out);
                }
            }
            Value::Object(map) => match &self.kind {
                StepKind::Name(name) => {
                    if let Some(value) = map.get(name) {
                        flatten_into(value, out);
                    }
                }
                StepKind::Wildcard => {
                    for value in map.values() {
                        flatten_into(value, out);
                    }
                }
            },
            _ => {}
        }
    }
}

fn flatten_into<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    match value {
        Value::Array(items) => out.extend(items.iter()),
        other => out.push(other),
    }
}

fn apply_stages<'a>(mut matched: Vec<&'a Value>, stages: &[i64]) -> Vec<&'a Value> {
    for &index in stages {
        let len = matched.len() as i64;
        let at = if index < 0 { len + index } else { index };
        matched = if (0..len).contains(&at) {
            vec![matched[at as usize]]
        } else {
            Vec::new()
        };
    }
    matched
}
