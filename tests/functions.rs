use keiyaku::interpreter::parse_and_run;
use keiyaku::Value;

#[test]
fn test_define_and_call() {
    let source = "\
加算(a, b) を定義する。
aに b を加えた数を c とする。
以上。
加算(2, 5)を出力する。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(7)]);
}

#[test]
fn test_function_keyword_prefix_form() {
    let source = "\
関数 二倍(a) を関数として定義する。
aと 2 の積を b とする。
以上。
二倍(21)を出力する。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(42)]);
}

#[test]
fn test_implicit_return_is_last_assignment() {
    let source = "\
f(a) を定義する。
xは 1 とする。
yは 2 とする。
aに y を加えた数を z とする。
以上。
f(10)を出力する。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(12)]);
}

#[test]
fn test_body_without_assignment_returns_zero() {
    let source = "\
f() を定義する。
5を出力する。
以上。
f()を出力する。";
    assert_eq!(
        parse_and_run(source).unwrap(),
        vec![Value::Int(5), Value::Int(0)]
    );
}

#[test]
fn test_zero_parameter_function() {
    let source = "\
七() を定義する。
結果は 7 とする。
以上。
七()を出力する。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(7)]);
}

#[test]
fn test_call_as_statement_discards_value() {
    let source = "\
f() を定義する。
1を出力する。
結果は 99 とする。
以上。
f()。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(1)]);
}

#[test]
fn test_nested_calls_in_arguments() {
    let source = "\
二倍(a) を定義する。
aと 2 の積を b とする。
以上。
二倍(二倍(3))を出力する。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(12)]);
}

#[test]
fn test_call_in_arithmetic_operand() {
    let source = "\
五() を定義する。
rは 5 とする。
以上。
五()に 3 を加えた数を x とする。
xを出力する。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(8)]);
}

#[test]
fn test_fresh_environment_per_call() {
    let source = "\
xは 1 とする。
上書き() を定義する。
xは 999 とする。
以上。
上書き()。
xを出力する。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(1)]);
}

#[test]
fn test_parameters_shadow_nothing() {
    // The callee sees only its own parameters, never caller bindings.
    let source = "\
aは 100 とする。
f(b) を定義する。
bに 1 を加えた数を c とする。
以上。
f(7)を出力する。
aを出力する。";
    assert_eq!(
        parse_and_run(source).unwrap(),
        vec![Value::Int(8), Value::Int(100)]
    );
}

#[test]
fn test_recursive_factorial() {
    let source = "\
階乗(n) を定義する。
もし n が 0 なら、以下を行う。
結果は 1 とする。
以上。
そうでなければ、以下を行う。
nから 1 を減じた数を m とする。
nと 階乗(m) の積を 結果 とする。
以上。
以上。
階乗(6)を出力する。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(720)]);
}

#[test]
fn test_mutual_recursion() {
    let source = "\
偶数か(n) を定義する。
もし n が 0 なら、以下を行う。
結果は 1 とする。
以上。
そうでなければ、以下を行う。
nから 1 を減じた数を m とする。
奇数か(m)に 0 を加えた数を 結果 とする。
以上。
以上。
奇数か(n) を定義する。
もし n が 0 なら、以下を行う。
結果は 0 とする。
以上。
そうでなければ、以下を行う。
nから 1 を減じた数を m とする。
偶数か(m)に 0 を加えた数を 結果 とする。
以上。
以上。
偶数か(10)を出力する。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(1)]);
}

#[test]
fn test_redefinition_uses_latest_body() {
    let source = "\
f() を定義する。
結果は 1 とする。
以上。
f() を定義する。
結果は 2 とする。
以上。
f()を出力する。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(2)]);
}

#[test]
fn test_main_clause_runs_when_program_only_defines() {
    let source = "\
主文() を定義する。
11を出力する。
以上。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(11)]);
}

#[test]
fn test_main_clause_skipped_when_toplevel_acts() {
    let source = "\
主文() を定義する。
11を出力する。
以上。
主文()。
主文()。";
    // Called twice explicitly, never a third time automatically.
    assert_eq!(
        parse_and_run(source).unwrap(),
        vec![Value::Int(11), Value::Int(11)]
    );
}

#[test]
fn test_main_clause_skipped_when_toplevel_assigns() {
    let source = "\
主文() を定義する。
11を出力する。
以上。
xは 1 とする。";
    assert_eq!(parse_and_run(source).unwrap(), Vec::<Value>::new());
}

#[test]
fn test_helper_functions_calling_each_other() {
    let source = "\
倍(a) を定義する。
aと 2 の積を r とする。
以上。
四倍(a) を定義する。
倍(a)に 0 を加えた数を t とする。
倍(t)に 0 を加えた数を r とする。
以上。
四倍(5)を出力する。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(20)]);
}
