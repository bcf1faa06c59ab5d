use keiyaku::interpreter::parse_and_run;
use keiyaku::Value;

#[test]
fn test_loop_repeats_body() {
    let source = "\
3 回、以下を行う。
7を出力する。
以上。";
    assert_eq!(
        parse_and_run(source).unwrap(),
        vec![Value::Int(7), Value::Int(7), Value::Int(7)]
    );
}

#[test]
fn test_loop_with_variable_count() {
    let source = "\
nは 4 とする。
合計は 0 とする。
n 回、以下を行う。
合計に 2 を加えた数を 合計 とする。
以上。
合計を出力する。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(8)]);
}

#[test]
fn test_loop_count_is_snapshot() {
    // Reassigning the count variable inside the body must not extend
    // or shorten the loop.
    let source = "\
nは 2 とする。
n 回、以下を行う。
nは 100 とする。
nを出力する。
以上。";
    assert_eq!(
        parse_and_run(source).unwrap(),
        vec![Value::Int(100), Value::Int(100)]
    );
}

#[test]
fn test_zero_count_loop_skips_body() {
    let source = "\
0 回、以下を行う。
1を出力する。
以上。
2を出力する。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(2)]);
}

#[test]
fn test_negative_count_loop_skips_body() {
    let source = "\
xは 0 とする。
xから 3 を減じた数を x とする。
x 回、以下を行う。
1を出力する。
以上。";
    assert_eq!(parse_and_run(source).unwrap(), Vec::<Value>::new());
}

#[test]
fn test_nested_loops() {
    let source = "\
合計は 0 とする。
3 回、以下を行う。
4 回、以下を行う。
合計に 1 を加えた数を 合計 とする。
以上。
以上。
合計を出力する。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(12)]);
}

#[test]
fn test_conditional_true_branch() {
    let source = "\
xは 0 とする。
もし x が 0 なら、以下を行う。
1を出力する。
以上。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(1)]);
}

#[test]
fn test_conditional_false_skips_body() {
    let source = "\
xは 5 とする。
もし x が 0 なら、以下を行う。
1を出力する。
以上。
2を出力する。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(2)]);
}

#[test]
fn test_conditional_naraba_spelling() {
    let source = "\
xは 0 とする。
もし x が 0 ならば、以下を行う。
1を出力する。
以上。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(1)]);
}

#[test]
fn test_negated_conditional() {
    let source = "\
xは 5 とする。
もし x が 0 でなければ、以下を行う。
xを出力する。
以上。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(5)]);
}

#[test]
fn test_else_branch_taken() {
    let source = "\
xは 9 とする。
もし x が 0 なら、以下を行う。
1を出力する。
以上。
そうでなければ、以下を行う。
2を出力する。
以上。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(2)]);
}

#[test]
fn test_else_branch_skipped() {
    let source = "\
xは 0 とする。
もし x が 0 なら、以下を行う。
1を出力する。
以上。
そうでなければ、以下を行う。
2を出力する。
以上。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(1)]);
}

#[test]
fn test_branches_share_enclosing_environment() {
    // A variable first assigned inside a conditional is visible after it.
    let source = "\
xは 0 とする。
もし x が 0 なら、以下を行う。
yは 10 とする。
以上。
yを出力する。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(10)]);
}

#[test]
fn test_loop_body_shares_enclosing_environment() {
    let source = "\
1 回、以下を行う。
zは 3 とする。
以上。
zを出力する。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(3)]);
}

#[test]
fn test_conditional_inside_loop() {
    // Emits once, on the iteration where the counter reaches zero.
    let source = "\
iは 3 とする。
4 回、以下を行う。
もし i が 0 なら、以下を行う。
7を出力する。
以上。
iから 1 を減じた数を i とする。
以上。";
    assert_eq!(parse_and_run(source).unwrap(), vec![Value::Int(7)]);
}

#[test]
fn test_countdown_loop() {
    let source = "\
nは 3 とする。
3 回、以下を行う。
nを出力する。
nから 1 を減じた数を n とする。
以上。";
    assert_eq!(
        parse_and_run(source).unwrap(),
        vec![Value::Int(3), Value::Int(2), Value::Int(1)]
    );
}
