use crate::builtins;
use crate::exec;
use crate::runtime::Runtime;
use crate::signal::Signal;
use kavun_errors::{Result, RuntimeError};
use kavun_parser::ast::{BinaryOp, Expr, UnaryOp};
use kavun_value::Value;
use std::cmp::Ordering;

/// Walks a parsed [`Expr`] against live runtime state, resolving identifiers
/// through the frame stack and dispatching calls to either the built-in or
/// user-function registry (spec.md §4.3).
pub fn evaluate(rt: &mut Runtime, expr: &Expr) -> Result<Value> {
    match expr {
        Expr::Int(n) => Ok(Value::Integer(*n)),
        Expr::Float(f) => Ok(Value::Float(*f)),
        Expr::Bool(b) => Ok(Value::Boolean(*b)),
        Expr::Str(s) => Ok(Value::String(s.clone())),
        Expr::Nil => Ok(Value::Nil),
        Expr::Ident(name) => rt
            .frames
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedVariable(name.clone())),
        Expr::List(items) => {
            let values = items.iter().map(|item| evaluate(rt, item)).collect::<Result<Vec<_>>>()?;
            Ok(Value::new_list(values))
        }
        Expr::Unary(op, operand) => evaluate_unary(rt, *op, operand),
        Expr::Binary(BinaryOp::And, left, right) => {
            let l = evaluate(rt, left)?;
            if !l.is_truthy() {
                Ok(l)
            } else {
                evaluate(rt, right)
            }
        }
        Expr::Binary(BinaryOp::Or, left, right) => {
            let l = evaluate(rt, left)?;
            if l.is_truthy() {
                Ok(l)
            } else {
                evaluate(rt, right)
            }
        }
        Expr::Binary(op, left, right) => {
            let l = evaluate(rt, left)?;
            let r = evaluate(rt, right)?;
            evaluate_binary(*op, l, r)
        }
        Expr::Index(container, index) => {
            let container = evaluate(rt, container)?;
            let index = evaluate(rt, index)?;
            evaluate_index(&container, &index)
        }
        Expr::Call(name, args) => {
            let values = args.iter().map(|a| evaluate(rt, a)).collect::<Result<Vec<_>>>()?;
            builtins::call(rt, name, &values)
        }
        Expr::UserCall(name, args) => {
            let values = args.iter().map(|a| evaluate(rt, a)).collect::<Result<Vec<_>>>()?;
            call_user_function(rt, name, values)
        }
    }
}

fn evaluate_unary(rt: &mut Runtime, op: UnaryOp, operand: &Expr) -> Result<Value> {
    let value = evaluate(rt, operand)?;
    match op {
        UnaryOp::Not => Ok(Value::Boolean(!value.is_truthy())),
        UnaryOp::Neg => match value {
            Value::Integer(i) => Ok(Value::Integer(-i)),
            Value::Float(f) => Ok(Value::Float(-f)),
            other => Err(RuntimeError::Other(format!(
                "{} üzerinde eksi işlemi yapılamaz",
                other.type_name()
            ))),
        },
    }
}

/// `+` is the one operator the reference implementation special-cases (via
/// its `kv_add` AST transform): numeric addition when both sides are
/// numbers, concatenation when both are strings, and a stringify-then-concat
/// fallback for anything else rather than raising a type error.
fn add(left: Value, right: Value) -> Value {
    match (&left, &right) {
        (Value::Integer(a), Value::Integer(b)) => Value::Integer(a + b),
        (Value::String(a), Value::String(b)) => Value::String(format!("{a}{b}")),
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => Value::Float(a + b),
            _ => Value::String(format!("{left}{right}")),
        },
    }
}

fn evaluate_binary(op: BinaryOp, left: Value, right: Value) -> Result<Value> {
    match op {
        BinaryOp::Add => Ok(add(left, right)),
        BinaryOp::Sub => numeric_op(left, right, "-", |a, b| a - b, |a, b| a - b),
        BinaryOp::Mul => numeric_op(left, right, "*", |a, b| a * b, |a, b| a * b),
        BinaryOp::Div => {
            let a = require_f64(&left)?;
            let b = require_f64(&right)?;
            if b == 0.0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Ok(Value::Float(a / b))
        }
        BinaryOp::FloorDiv => {
            if let (Value::Integer(a), Value::Integer(b)) = (&left, &right) {
                if *b == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                return Ok(Value::Integer(a.div_euclid(*b)));
            }
            let a = require_f64(&left)?;
            let b = require_f64(&right)?;
            if b == 0.0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Ok(Value::Float((a / b).floor()))
        }
        BinaryOp::Mod => {
            if let (Value::Integer(a), Value::Integer(b)) = (&left, &right) {
                if *b == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                return Ok(Value::Integer(a.rem_euclid(*b)));
            }
            let a = require_f64(&left)?;
            let b = require_f64(&right)?;
            if b == 0.0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Ok(Value::Float(a - b * (a / b).floor()))
        }
        BinaryOp::Pow => match (&left, &right) {
            (Value::Integer(a), Value::Integer(b)) if *b >= 0 => {
                match u32::try_from(*b).ok().and_then(|exp| a.checked_pow(exp)) {
                    Some(result) => Ok(Value::Integer(result)),
                    None => Ok(Value::Float((*a as f64).powf(*b as f64))),
                }
            }
            _ => {
                let a = require_f64(&left)?;
                let b = require_f64(&right)?;
                Ok(Value::Float(a.powf(b)))
            }
        },
        BinaryOp::Eq => Ok(Value::Boolean(left == right)),
        BinaryOp::NotEq => Ok(Value::Boolean(left != right)),
        BinaryOp::Lt => compare(&left, &right).map(|o| Value::Boolean(o == Ordering::Less)),
        BinaryOp::Gt => compare(&left, &right).map(|o| Value::Boolean(o == Ordering::Greater)),
        BinaryOp::Le => compare(&left, &right).map(|o| Value::Boolean(o != Ordering::Greater)),
        BinaryOp::Ge => compare(&left, &right).map(|o| Value::Boolean(o != Ordering::Less)),
        BinaryOp::And | BinaryOp::Or => unreachable!("short-circuited in evaluate()"),
    }
}

fn numeric_op(
    left: Value,
    right: Value,
    symbol: &str,
    int_op: fn(i64, i64) -> i64,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value> {
    match (&left, &right) {
        (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(int_op(*a, *b))),
        _ => {
            let a = require_f64(&left).map_err(|_| type_error(symbol, &left))?;
            let b = require_f64(&right).map_err(|_| type_error(symbol, &right))?;
            Ok(Value::Float(float_op(a, b)))
        }
    }
}

fn type_error(symbol: &str, value: &Value) -> RuntimeError {
    RuntimeError::Other(format!("'{symbol}' işlemi {} üzerinde yapılamaz", value.type_name()))
}

fn require_f64(value: &Value) -> Result<f64> {
    value.as_f64().ok_or_else(|| type_error("sayısal işlem", value))
}

fn compare(left: &Value, right: &Value) -> Result<Ordering> {
    if let (Some(a), Some(b)) = (left.as_f64(), right.as_f64()) {
        return a.partial_cmp(&b).ok_or_else(|| RuntimeError::Other("karşılaştırma NaN içeriyor".into()));
    }
    if let (Value::String(a), Value::String(b)) = (left, right) {
        return Ok(a.cmp(b));
    }
    Err(RuntimeError::Other(format!(
        "{} ile {} karşılaştırılamaz",
        left.type_name(),
        right.type_name()
    )))
}

fn evaluate_index(container: &Value, index: &Value) -> Result<Value> {
    match container {
        Value::List(list) => {
            let i = index.as_i64().ok_or_else(|| type_error("indeks", index))?;
            let list = list.borrow();
            if i < 0 || i as usize >= list.len() {
                return Err(RuntimeError::InvalidIndex(i));
            }
            Ok(list[i as usize].clone())
        }
        Value::Dict(dict) => {
            let key = match index {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Ok(dict.borrow().get(&key).cloned().unwrap_or(Value::Nil))
        }
        Value::String(s) => {
            let i = index.as_i64().ok_or_else(|| type_error("indeks", index))?;
            match s.chars().nth(i.max(0) as usize) {
                Some(c) if i >= 0 => Ok(Value::String(c.to_string())),
                _ => Err(RuntimeError::InvalidIndex(i)),
            }
        }
        other => Err(RuntimeError::NotAList(other.type_name().to_string())),
    }
}

/// Calls a user-defined function: pushes a fresh frame, binds parameters
/// (missing trailing arguments default to `Yok`/Nil, matching the reference
/// implementation's None-padding), runs the body, and unwinds the `Return`
/// signal into the call's result.
pub fn call_user_function(rt: &mut Runtime, name: &str, args: Vec<Value>) -> Result<Value> {
    let def = rt
        .functions
        .get(name)
        .cloned()
        .ok_or_else(|| RuntimeError::UndefinedFunction(name.to_string()))?;

    rt.frames.push();
    rt.call_trace.push(name.to_string());

    for (i, param) in def.params.iter().enumerate() {
        let value = args.get(i).cloned().unwrap_or(Value::Nil);
        rt.frames.set(param.clone(), value);
    }

    let result = exec::run_block(rt, &def.body);

    rt.call_trace.pop();
    rt.frames.pop();

    match result? {
        Signal::Return(value) => Ok(value),
        Signal::Normal => Ok(Value::Nil),
        Signal::Break => Err(RuntimeError::UnconsumedSignal("kır")),
        Signal::Continue => Err(RuntimeError::UnconsumedSignal("devam")),
    }
}
