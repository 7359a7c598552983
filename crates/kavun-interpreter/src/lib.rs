//! Walks structured Kavun source against a live [`Runtime`]: expression
//! evaluation, the builtin registry, statement dispatch and all runtime-only
//! state (frames, functions, the animation thread, the call trace).

pub mod animation;
pub mod builtins;
pub mod color;
pub mod draw;
pub mod eval;
pub mod exec;
pub mod runtime;
pub mod signal;

pub use runtime::Runtime;
pub use signal::Signal;

use kavun_errors::{Result, RuntimeError};
use kavun_parser::source;

/// Runs a complete program: reads it into lines, bails out early (with the
/// empty-program hint spec.md §6 asks for) if there's no real content, then
/// executes it top to bottom. A `Break`/`Continue`/`Return` reaching here
/// (a `kır`/`devam`/`dön` outside any loop or function) never had anything
/// to consume it, so it is a program error, not a quiet success.
pub fn run_program(rt: &mut Runtime, contents: &str) -> Result<()> {
    let lines = source::read_lines(contents);
    if source::is_effectively_empty(&lines) {
        rt.println("Program boş. Örnek: \"Merhaba Dünya\" yaz");
        return Ok(());
    }

    rt.call_trace.push("<program>");
    let result = exec::run_block(rt, &lines);
    rt.call_trace.pop();

    match result? {
        Signal::Normal => Ok(()),
        Signal::Break => Err(RuntimeError::UnconsumedSignal("kır")),
        Signal::Continue => Err(RuntimeError::UnconsumedSignal("devam")),
        Signal::Return(_) => Err(RuntimeError::UnconsumedSignal("dön")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn empty_program_prints_hint() {
        let mut buf = Vec::new();
        {
            let mut rt = Runtime::new(Box::new(&mut buf));
            run_program(&mut rt, "// just a comment\n").unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Merhaba Dünya"));
    }

    #[test]
    fn prints_expression_value() {
        let mut buf = Vec::new();
        {
            let mut rt = Runtime::new(Box::new(&mut buf));
            run_program(&mut rt, "1 + 2 yaz\n").unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "3\n");
    }

    #[test]
    fn runs_a_while_loop_with_break() {
        let mut buf = Vec::new();
        {
            let mut rt = Runtime::new(Box::new(&mut buf));
            let src = "sayac eşittir 0\n\
                       sayac küçüktür 5 iken:\n\
                       sayac yaz\n\
                       sayac eşittir sayac + 1\n\
                       bitir\n";
            run_program(&mut rt, src).unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "0\n1\n2\n3\n4\n");
    }

    #[test]
    fn calls_a_user_defined_function() {
        let mut buf = Vec::new();
        {
            let mut rt = Runtime::new(Box::new(&mut buf));
            let src = "a, b ile topla işi:\n\
                       a + b dön\n\
                       bitir\n\
                       5, 3 ile topla işi yaz\n";
            run_program(&mut rt, src).unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "8\n");
    }
}
