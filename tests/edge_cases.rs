use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use keiyaku::interpreter::{parse_and_run, parse_program, run_source, Interpreter, Limits};
use keiyaku::Value;

#[test]
fn test_integer_overflow_wraps() {
    let source = "\
xは 9223372036854775807 とする。
xに 1 を加えた数を y とする。
yを出力する。";
    assert_eq!(
        parse_and_run(source).unwrap(),
        vec![Value::Int(i64::MIN)]
    );
}

#[test]
fn test_multiplication_overflow_wraps() {
    let source = "\
xは 9223372036854775807 とする。
xと 2 の積を y とする。
yを出力する。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(-2)]);
}

#[test]
fn test_oversized_literal_does_not_panic() {
    // Far beyond i64; the digits wrap instead of aborting the process.
    let source = "99999999999999999999999999を出力する。";
    assert!(parse_and_run(source).is_ok());
}

#[test]
fn test_negative_division_stays_integer_when_even() {
    let source = "\
xは 0 とする。
xから 9 を減じた数を x とする。
xを 3 で除した数を y とする。
yを出力する。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(-3)]);
}

#[test]
fn test_real_values_flow_through_arithmetic() {
    let source = "\
7を 2 で除した数を x とする。
xに 1 を加えた数を y とする。
yを出力する。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Real(4.5)]);
}

#[test]
fn test_computed_zero_divisor_is_error() {
    let source = "\
0を 3 で除した数を d とする。
1を d で除した数を x とする。";
    assert!(parse_and_run(source).is_err());
}

#[test]
fn test_conditional_on_real_zero() {
    // 0 divided by anything nonzero is the integer 0, which is zero.
    let source = "\
0を 7 で除した数を x とする。
もし x が 0 なら、以下を行う。
1を出力する。
以上。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(1)]);
}

#[test]
fn test_ideographic_and_ascii_whitespace_mix() {
    let source = "xは\u{3000}5\u{3000}とする。\r\nxを出力する。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(5)]);
}

#[test]
fn test_fullwidth_parentheses_in_call() {
    let source = "\
f（a） を定義する。
aに 1 を加えた数を r とする。
以上。
f（41）を出力する。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(42)]);
}

#[test]
fn test_comments_between_statements() {
    let source = "\
※ 第一条
xは 1 とする。
（注）第二条は省略
xを出力する。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(1)]);
}

#[test]
fn test_long_identifier_names() {
    let source = "\
違約金合計額は 300 とする。
違約金合計額を出力する。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(300)]);
}

#[test]
fn test_deep_but_legal_recursion() {
    let source = "\
数える(n) を定義する。
もし n が 0 でなければ、以下を行う。
nから 1 を減じた数を m とする。
数える(m)に 0 を加えた数を r とする。
以上。
以上。
数える(150)。";
    assert!(parse_and_run(source).is_ok());
}

#[test]
fn test_custom_depth_limit() {
    let source = "\
f(n) を定義する。
f(n)。
以上。
f(1)。";
    let stmts = parse_program(source).expect("parse failed");
    let mut out: Vec<Value> = Vec::new();
    let mut interp = Interpreter::new(&mut out).with_limits(Limits { max_call_depth: 5 });
    let err = interp.run(&stmts).expect_err("should hit the limit");
    assert!(err.to_string().contains("5"));
}

#[test]
fn test_cancellation_flag() {
    let source = "\
1000000 回、以下を行う。
xは 1 とする。
以上。";
    let flag = Arc::new(AtomicBool::new(true));
    let mut out: Vec<Value> = Vec::new();
    let result = run_source(source, &mut out, Limits::default(), Some(flag));
    assert!(result.is_err());
}

#[test]
fn test_unset_cancellation_flag_is_harmless() {
    let source = "5を出力する。";
    let flag = Arc::new(AtomicBool::new(false));
    let mut out: Vec<Value> = Vec::new();
    run_source(source, &mut out, Limits::default(), Some(flag)).expect("should run");
    assert_eq!(out, vec![Value::Int(5)]);
}

#[test]
fn test_statement_priority_define_beats_arithmetic() {
    // A definition sentence whose body mentions arithmetic keywords must
    // still be classified as a definition.
    let source = "\
加えた結果(a) を定義する。
aに 1 を加えた数を r とする。
以上。
加えた結果(1)を出力する。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(2)]);
}

#[test]
fn test_alias_inside_block() {
    let source = "\
1 回、以下を行う。
500（以下「保証金」という。）
以上。
保証金を出力する。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(500)]);
}

#[test]
fn test_whitespace_free_sentence() {
    let source = "xは5とする。xを出力する。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(5)]);
}
