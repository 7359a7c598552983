//! End-to-end scenarios, ported verbatim from the scenario set a Kavun
//! program's runtime behavior is judged against: arithmetic, string
//! concatenation, if/elif/else chains, loop control flow, recursion, and
//! list aliasing.

use kavun_errors::RuntimeError;
use kavun_interpreter::{run_program, Runtime};

fn run(src: &str) -> String {
    let mut buf = Vec::new();
    {
        let mut rt = Runtime::new(Box::new(&mut buf));
        run_program(&mut rt, src).expect("program should run to completion");
    }
    String::from_utf8(buf).expect("output should be valid utf-8")
}

fn run_err(src: &str) -> RuntimeError {
    let mut buf = Vec::new();
    let mut rt = Runtime::new(Box::new(&mut buf));
    run_program(&mut rt, src).expect_err("program should fail to run")
}

#[test]
fn s1_arithmetic() {
    let out = run("x eşittir 3 + 4\nx yaz\n");
    assert_eq!(out, "7\n");
}

#[test]
fn s2_string_plus_number() {
    let out = run("\"değer: \" + 42 yaz\n");
    assert_eq!(out, "değer: 42\n");
}

#[test]
fn s3_if_elif_else() {
    let src = "\
x eşittir 10
x 10 eşit ise:
  \"on\" yaz
yoksa x 5 büyüktür ise:
  \"büyük\" yaz
yoksa:
  \"küçük\" yaz
bitir
";
    assert_eq!(run(src), "on\n");
}

#[test]
fn s3_elif_branch_taken_when_first_condition_fails() {
    let src = "\
x eşittir 8
x 10 eşit ise:
  \"on\" yaz
yoksa x 5 büyüktür ise:
  \"büyük\" yaz
yoksa:
  \"küçük\" yaz
bitir
";
    assert_eq!(run(src), "büyük\n");
}

#[test]
fn s3_else_branch_taken_when_no_condition_matches() {
    let src = "\
x eşittir 2
x 10 eşit ise:
  \"on\" yaz
yoksa x 5 büyüktür ise:
  \"büyük\" yaz
yoksa:
  \"küçük\" yaz
bitir
";
    assert_eq!(run(src), "küçük\n");
}

#[test]
fn s4_for_with_continue_and_break() {
    let src = "\
i için 1 den 5 kadar:
  i 3 eşit ise:
    devam
  bitir
  i 4 eşit ise:
    kır
  bitir
  i yaz
bitir
";
    assert_eq!(run(src), "1\n2\n");
}

#[test]
fn s5_recursive_factorial() {
    let src = "\
n ile fact işi:
  n 1 küçüktür ise:
    1 dön
  bitir
  n * (n - 1 ile fact işi) dön
bitir
5 ile fact işi yaz
";
    assert_eq!(run(src), "120\n");
}

#[test]
fn s6_list_mutation_aliasing() {
    let src = "\
a eşittir [1, 2, 3]
b eşittir a
b.ekle(4)
a yaz
";
    assert_eq!(run(src), "[1, 2, 3, 4]\n");
}

/// Property 3: break/continue raised inside an if-clause nested directly in
/// a loop body must still reach that loop, not stop at the if-chain.
#[test]
fn break_inside_nested_if_reaches_enclosing_while() {
    let src = "\
sayac eşittir 0
doğru iken:
  sayac eşittir sayac + 1
  sayac 3 eşit ise:
    kır
  bitir
bitir
sayac yaz
";
    assert_eq!(run(src), "3\n");
}

/// Property 2: missing call arguments are padded with Nil rather than
/// raising an arity error.
#[test]
fn missing_arguments_are_padded_with_nil() {
    let src = "\
a, b ile goster işi:
  b dön
bitir
5 ile goster işi yaz
";
    assert_eq!(run(src), "Nil\n");
}

/// Property 7: comments and blank lines carry no semantic weight.
#[test]
fn comments_and_blank_lines_do_not_change_output() {
    let src = "\
// a leading comment
x eşittir 1

// another one
x eşittir x + 1
x yaz
";
    assert_eq!(run(src), "2\n");
}

/// Property 3: break/continue must not cross a function-call boundary —
/// a `kır`/`devam` inside a function with no enclosing loop in that same
/// body is a program error, not a silent Nil return.
#[test]
fn break_escaping_a_function_body_is_a_program_error() {
    let src = "\
ad ile dene işi:
  kır
bitir
sonuc eşittir iş dene()
";
    assert!(matches!(run_err(src), RuntimeError::UnconsumedSignal("kır")));
}

#[test]
fn continue_escaping_a_function_body_is_a_program_error() {
    let src = "\
ad ile dene işi:
  devam
bitir
sonuc eşittir iş dene()
";
    assert!(matches!(run_err(src), RuntimeError::UnconsumedSignal("devam")));
}

/// A bare `kır`/`devam`/`dön` at the top level, outside any loop or
/// function, has nothing to consume it either.
#[test]
fn bare_break_at_top_level_is_a_program_error() {
    assert!(matches!(run_err("kır\n"), RuntimeError::UnconsumedSignal("kır")));
}

#[test]
fn bare_continue_at_top_level_is_a_program_error() {
    assert!(matches!(run_err("devam\n"), RuntimeError::UnconsumedSignal("devam")));
}

#[test]
fn bare_return_at_top_level_is_a_program_error() {
    assert!(matches!(run_err("dön\n"), RuntimeError::UnconsumedSignal("dön")));
}
