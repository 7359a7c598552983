//! Error taxonomy and diagnostics for the Kavun interpreter.
//!
//! `RuntimeError` is the seven-member taxonomy from the language
//! specification (§7): lexical/parse, resolution, type, bounds, I/O, user and
//! internal errors all land in one enum because the executor treats them
//! identically for propagation purposes (caught at `yaz`/void-call sites,
//! otherwise bubbled to the top-level report in `print_runtime_error`).

mod trace;

pub use trace::{CallTrace, CallTraceEntry};

use std::fmt;
use std::io::Write;

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// The error taxonomy described in spec.md §7.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Lexical/parse: malformed expression after translation.
    #[error("Geçersiz ifade [{expr}]: {reason}")]
    InvalidExpression { expr: String, reason: String },

    /// Resolution: undefined variable.
    #[error("Tanınmayan değişken: {0}")]
    UndefinedVariable(String),

    /// Resolution: undefined function (user or built-in).
    #[error("Tanınmayan fonksiyon: {0}")]
    UndefinedFunction(String),

    /// Type: wrong operand type for a builtin or list statement.
    #[error("{0} bir liste değil")]
    NotAList(String),

    /// Type: wrong operand type for a dict statement.
    #[error("{0} bir sözlük değil")]
    NotADict(String),

    /// Type: a builtin received a value it can't act on.
    #[error("{builtin} hatası: {reason}")]
    BuiltinTypeError { builtin: String, reason: String },

    /// Bounds: invalid list index.
    #[error("Geçersiz indeks: {0}")]
    InvalidIndex(i64),

    /// User: division by zero.
    #[error("Sıfıra bölme hatası")]
    DivisionByZero,

    /// I/O: file not found, permission denied, etc.
    #[error("{context}: {source}")]
    Io { context: String, #[source] source: std::io::Error },

    /// Internal: an unconsumed control-flow signal escaped its construct.
    #[error("İç hata: yakalanmamış kontrol akışı sinyali ({0})")]
    UnconsumedSignal(&'static str),

    /// Anything that doesn't need its own variant (wraps a formatted message,
    /// matching the Python reference's habit of raising bare `RuntimeError(str)`).
    #[error("{0}")]
    Other(String),
}

impl RuntimeError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        RuntimeError::Io { context: context.into(), source }
    }

    pub fn other(message: impl Into<String>) -> Self {
        RuntimeError::Other(message.into())
    }
}

/// Wraps a `RuntimeError` with a captured (but not yet symbolicated)
/// backtrace, the idiomatic analogue of the Python reference's
/// `traceback.print_exc()` gated behind `KAVUN_DEBUG=1`.
pub struct KavunError {
    pub error: RuntimeError,
    backtrace: backtrace::Backtrace,
}

impl KavunError {
    pub fn new(error: RuntimeError) -> Self {
        Self { error, backtrace: backtrace::Backtrace::new_unresolved() }
    }
}

impl From<RuntimeError> for KavunError {
    fn from(error: RuntimeError) -> Self {
        KavunError::new(error)
    }
}

impl fmt::Debug for KavunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.error, f)
    }
}

impl fmt::Display for KavunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

/// Name of the env var that enables full internal traces on uncaught errors
/// (spec.md §6).
pub const DEBUG_ENV_VAR: &str = "KAVUN_DEBUG";

pub fn debug_enabled() -> bool {
    std::env::var(DEBUG_ENV_VAR).map(|v| v == "1").unwrap_or(false)
}

/// Renders the user-visible runtime-error report (spec.md §7):
/// `Çalışma zamanı hatası: <message>` followed by the call-stack dump, then
/// a hint about `KAVUN_DEBUG`. Writes to `out` so tests can capture it.
pub fn print_runtime_error(out: &mut impl Write, error: &KavunError, trace: &CallTrace) {
    let _ = writeln!(out, "Çalışma zamanı hatası: {}", error.error);
    if !trace.is_empty() {
        let _ = write!(out, "{}", trace.render());
    }
    let _ = writeln!(out, "Hata detaylarını görmek için ortam değişkeni {DEBUG_ENV_VAR}=1 ile tekrar çalıştırın.");

    if debug_enabled() {
        let mut bt = error.backtrace.clone();
        bt.resolve();
        let _ = writeln!(out, "{bt:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_call_trace_most_recent_on_top() {
        let mut trace = CallTrace::new();
        trace.push("<main>");
        trace.set_current_line(3);
        trace.push("fact");
        trace.set_current_line(7);

        let rendered = trace.render();
        let main_pos = rendered.find("<main>").unwrap();
        let fact_pos = rendered.find("fact").unwrap();
        assert!(fact_pos < main_pos, "most recent call should render first");
        assert!(rendered.contains("satır 7"));
    }

    #[test]
    fn print_runtime_error_matches_format() {
        let mut trace = CallTrace::new();
        trace.push("<main>");
        let err = KavunError::new(RuntimeError::DivisionByZero);
        let mut buf = Vec::new();
        print_runtime_error(&mut buf, &err, &trace);
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Çalışma zamanı hatası: Sıfıra bölme hatası"));
        assert!(text.contains("KAVUN_DEBUG=1"));
    }
}
