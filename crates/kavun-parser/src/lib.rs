//! Turns Kavun source text into [`Expr`] trees: source reading, block
//! structuring, string shielding, Turkish-operator translation, tokenizing
//! and precedence-climbing parsing all live here. Walking the resulting
//! tree against a live `Runtime` is `kavun-interpreter`'s job.

pub mod ast;
pub mod block;
pub mod cache;
pub mod lexer;
pub mod shield;
pub mod source;
pub mod token;

mod parser;

pub use ast::Expr;
pub use cache::ExpressionCache;

use kavun_errors::Result;
use kavun_value::Value;
use once_cell::sync::Lazy;
use regex::Regex;

static USER_CALL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<args>.+?)\s+ile\s+(?P<fname>\w+)\s+işi$").unwrap());
static USER_CALL_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^iş\s+(?P<fname>\w+)\s*\((?P<args>.*)\)\s*$").unwrap());

/// Splits top-level comma-separated arguments, respecting parenthesis and
/// bracket nesting so `f(a, b), c` splits into `["f(a, b)", "c"]` rather
/// than three pieces.
pub fn split_top_level_args(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut buf = String::new();
    let mut depth: i32 = 0;

    for ch in s.chars() {
        match ch {
            '(' | '[' => {
                depth += 1;
                buf.push(ch);
            }
            ')' | ']' => {
                depth -= 1;
                buf.push(ch);
            }
            ',' if depth <= 0 => {
                parts.push(buf.trim().to_string());
                buf.clear();
            }
            _ => buf.push(ch),
        }
    }
    if !buf.trim().is_empty() {
        parts.push(buf.trim().to_string());
    }
    parts.into_iter().filter(|p| !p.is_empty()).collect()
}

/// Compiles (and caches) one expression. Handles the two user-function
/// call syntaxes (`args ile fname işi`, `iş fname(args)`) as a textual
/// pre-pass, since they resolve against the function registry rather than
/// the builtin registry and aren't ordinary infix/prefix syntax; everything
/// else goes through shielding, postfix-relational translation, tokenizing
/// and the precedence-climbing parser.
pub fn compile_expression(raw: &str, cache: &mut ExpressionCache) -> Result<Expr> {
    let trimmed = raw.trim();
    if let Some(expr) = cache.get(trimmed) {
        return Ok(expr.clone());
    }

    let expr = compile_uncached(trimmed, cache)?;
    cache.insert(trimmed.to_string(), expr.clone());
    Ok(expr)
}

fn compile_uncached(trimmed: &str, cache: &mut ExpressionCache) -> Result<Expr> {
    let shielded = shield::shield_strings(trimmed);

    if let Some(caps) = USER_CALL_SUFFIX.captures(&shielded.text) {
        let fname = caps["fname"].to_string();
        let args = compile_args(&caps["args"], &shielded.placeholders, cache)?;
        return Ok(Expr::UserCall(fname, args));
    }
    if let Some(caps) = USER_CALL_PREFIX.captures(&shielded.text) {
        let fname = caps["fname"].to_string();
        let raw_args = caps["args"].trim();
        let args = if raw_args.is_empty() {
            Vec::new()
        } else {
            compile_args(raw_args, &shielded.placeholders, cache)?
        };
        return Ok(Expr::UserCall(fname, args));
    }

    let translated = translate::translate_postfix_relational(&shielded.text);
    let tokens = lexer::Lexer::tokenize(&translated)?;
    let parser = parser::Parser::new(&tokens, &shielded.placeholders, trimmed);
    parser.parse_expression()
}

fn compile_args(raw_args: &str, placeholders: &[String], cache: &mut ExpressionCache) -> Result<Vec<Expr>> {
    split_top_level_args(raw_args)
        .into_iter()
        .map(|arg| unshield_and_compile(&arg, placeholders, cache))
        .collect()
}

/// Splitting args operates on shielded text; before recursively compiling
/// each argument we need its real text back, since the nested compile
/// starts shielding from scratch.
fn unshield_and_compile(arg: &str, placeholders: &[String], cache: &mut ExpressionCache) -> Result<Expr> {
    let restored = shield::restore(arg, placeholders);
    compile_expression(&restored, cache)
}

mod translate;

/// Parses user input entered at a `cevap()` prompt into the most specific
/// `Value` it matches (spec.md §4.5): Turkish/English boolean literals,
/// then integers, then floats, falling back to a plain string.
pub fn parse_input_value(raw: &str) -> Value {
    let s = raw.trim();
    match s.to_lowercase().as_str() {
        "true" | "doğru" => return Value::Boolean(true),
        "false" | "yanlış" => return Value::Boolean(false),
        _ => {}
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        if s.contains('.') {
            return Value::Float(f);
        }
    }
    Value::String(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_and_caches_arithmetic() {
        let mut cache = ExpressionCache::new();
        let expr = compile_expression("1 + 2 * 3", &mut cache).unwrap();
        assert_eq!(expr, Expr::Binary(
            ast::BinaryOp::Add,
            Box::new(Expr::Int(1)),
            Box::new(Expr::Binary(ast::BinaryOp::Mul, Box::new(Expr::Int(2)), Box::new(Expr::Int(3)))),
        ));
        assert_eq!(cache.len(), 1);
        compile_expression("1 + 2 * 3", &mut cache).unwrap();
        assert_eq!(cache.len(), 1, "second compile should hit the cache");
    }

    #[test]
    fn compiles_user_call_suffix_syntax() {
        let mut cache = ExpressionCache::new();
        let expr = compile_expression("5, 3 ile topla işi", &mut cache).unwrap();
        assert_eq!(expr, Expr::UserCall("topla".into(), vec![Expr::Int(5), Expr::Int(3)]));
    }

    #[test]
    fn compiles_user_call_prefix_syntax() {
        let mut cache = ExpressionCache::new();
        let expr = compile_expression("iş selamla(\"Ada\")", &mut cache).unwrap();
        assert_eq!(expr, Expr::UserCall("selamla".into(), vec![Expr::Str("Ada".into())]));
    }

    #[test]
    fn parses_input_values() {
        assert_eq!(parse_input_value("doğru"), Value::Boolean(true));
        assert_eq!(parse_input_value("42"), Value::Integer(42));
        assert_eq!(parse_input_value("3.5"), Value::Float(3.5));
        assert_eq!(parse_input_value("merhaba"), Value::String("merhaba".into()));
    }
}
