use std::io::Write;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chumsky::Parser;
use indexmap::IndexMap;

use crate::ast::{BinaryOp, Expr, ExprKind, Function, Stmt};
use crate::diagnostic::{Diagnostic, Label, Span};
use crate::value::Value;

use super::environment::Environment;
use super::error::RuntimeError;
use super::parser::TokenParser;

/// Name of the function that is auto-called when a program consists of
/// nothing but definitions.
pub const MAIN_CLAUSE: &str = "主文";

/// Where output sentences deliver their values. The interpreter never
/// prints on its own; the host decides what 出力する means.
pub trait Emit {
    fn emit(&mut self, value: Value);
}

impl Emit for Vec<Value> {
    fn emit(&mut self, value: Value) {
        self.push(value);
    }
}

/// Writes each emitted value on its own line.
pub struct WriteEmit<W: Write> {
    writer: W,
}

impl<W: Write> WriteEmit<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> Emit for WriteEmit<W> {
    fn emit(&mut self, value: Value) {
        let _ = writeln!(self.writer, "{}", value);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub max_call_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_call_depth: 200,
        }
    }
}

/// Per-activation state. A function's result is the value of the last
/// assignment executed in its own frame, so each frame tracks that value
/// independently of the environment.
struct Frame {
    last_assigned: Option<Value>,
}

impl Frame {
    fn new() -> Self {
        Self {
            last_assigned: None,
        }
    }
}

pub struct Interpreter<'e> {
    env: Environment,
    functions: IndexMap<Rc<str>, Rc<Function>>,
    emitter: &'e mut dyn Emit,
    limits: Limits,
    cancel: Option<Arc<AtomicBool>>,
    depth: usize,
    had_toplevel_effect: bool,
}

impl<'e> Interpreter<'e> {
    pub fn new(emitter: &'e mut dyn Emit) -> Self {
        Self {
            env: Environment::new(),
            functions: IndexMap::new(),
            emitter,
            limits: Limits::default(),
            cancel: None,
            depth: 0,
            had_toplevel_effect: false,
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// The top-level environment as it stands after (or during) a run.
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Execute a whole program. If no top-level statement had an effect
    /// (everything was a definition or control structure that ran zero
    /// statements at the top level) and a zero-parameter 主文 exists, it
    /// is called automatically, contract-style.
    pub fn run(&mut self, stmts: &[Stmt]) -> Result<(), RuntimeError> {
        let mut frame = Frame::new();
        for stmt in stmts {
            if matches!(
                stmt,
                Stmt::Assign { .. }
                    | Stmt::Output { .. }
                    | Stmt::Arith { .. }
                    | Stmt::Alias { .. }
                    | Stmt::Call(_)
            ) {
                self.had_toplevel_effect = true;
            }
            self.execute_statement(stmt, &mut frame)?;
        }

        if !self.had_toplevel_effect {
            if let Some(function) = self.functions.get(MAIN_CLAUSE).cloned() {
                if !function.params.is_empty() {
                    return Err(RuntimeError::ArityMismatch {
                        name: MAIN_CLAUSE.to_string(),
                        expected: function.params.len(),
                        found: 0,
                        span: Span::dummy(),
                    });
                }
                self.invoke(&function, Vec::new(), Span::dummy())?;
            }
        }

        Ok(())
    }

    fn check_cancelled(&self) -> Result<(), RuntimeError> {
        if let Some(flag) = &self.cancel {
            if flag.load(Ordering::Relaxed) {
                return Err(RuntimeError::Cancelled);
            }
        }
        Ok(())
    }

    fn execute_statement(&mut self, stmt: &Stmt, frame: &mut Frame) -> Result<(), RuntimeError> {
        self.check_cancelled()?;
        match stmt {
            Stmt::Assign { name, value } | Stmt::Alias { value, name } => {
                let val = self.evaluate(value)?;
                self.env.set(name.as_ref(), val);
                frame.last_assigned = Some(val);
                Ok(())
            }
            Stmt::Output { value } => {
                let val = self.evaluate(value)?;
                self.emitter.emit(val);
                Ok(())
            }
            Stmt::Arith {
                left,
                right,
                op,
                target,
            } => {
                let lhs = self.evaluate(left)?;
                let rhs = self.evaluate(right)?;
                let result = match op {
                    BinaryOp::Add => lhs.add(rhs),
                    BinaryOp::Sub => lhs.sub(rhs),
                    BinaryOp::Mul => lhs.mul(rhs),
                    BinaryOp::Div => lhs
                        .div(rhs)
                        .ok_or(RuntimeError::DivisionByZero { span: right.span })?,
                };
                self.env.set(target.as_ref(), result);
                frame.last_assigned = Some(result);
                Ok(())
            }
            Stmt::Loop { count, body } => {
                // The count is evaluated exactly once, before the first
                // iteration; a negative count runs the body zero times.
                let n = self.evaluate(count)?.as_int().max(0);
                for _ in 0..n {
                    for stmt in body {
                        self.execute_statement(stmt, frame)?;
                    }
                }
                Ok(())
            }
            Stmt::FunctionDef { name, params, body } => {
                // Redefinition silently replaces the earlier body.
                self.functions.insert(
                    name.clone(),
                    Rc::new(Function {
                        params: params.clone(),
                        body: body.clone(),
                    }),
                );
                Ok(())
            }
            Stmt::Call(expr) => {
                self.evaluate(expr)?;
                Ok(())
            }
            Stmt::Conditional {
                condition,
                compares_to_zero,
                negated,
                then_body,
                else_body,
            } => {
                let val = self.evaluate(condition)?;
                let mut take = val.is_zero() == *compares_to_zero;
                if *negated {
                    take = !take;
                }
                let branch = if take {
                    Some(then_body)
                } else {
                    else_body.as_ref()
                };
                if let Some(body) = branch {
                    for stmt in body {
                        self.execute_statement(stmt, frame)?;
                    }
                }
                Ok(())
            }
        }
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match &expr.kind {
            ExprKind::Number(n) => Ok(Value::Int(*n)),
            ExprKind::Ident(name) => {
                self.env
                    .get(name)
                    .ok_or_else(|| RuntimeError::UndefinedVariable {
                        name: name.to_string(),
                        span: expr.span,
                    })
            }
            ExprKind::Call { name, args } => {
                let function = self.functions.get(name.as_ref()).cloned().ok_or_else(|| {
                    RuntimeError::UndefinedFunction {
                        name: name.to_string(),
                        span: expr.span,
                    }
                })?;
                if args.len() != function.params.len() {
                    return Err(RuntimeError::ArityMismatch {
                        name: name.to_string(),
                        expected: function.params.len(),
                        found: args.len(),
                        span: expr.span,
                    });
                }
                // Arguments are evaluated in the caller's environment,
                // left to right, before the callee's frame exists.
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.evaluate(arg)?);
                }
                self.invoke(&function, values, expr.span)
            }
        }
    }

    fn invoke(
        &mut self,
        function: &Function,
        args: Vec<Value>,
        span: Span,
    ) -> Result<Value, RuntimeError> {
        if self.depth >= self.limits.max_call_depth {
            return Err(RuntimeError::RecursionLimitExceeded {
                limit: self.limits.max_call_depth,
                span,
            });
        }
        self.depth += 1;

        let mut callee_env = Environment::new();
        for (param, value) in function.params.iter().zip(args) {
            callee_env.set(param.as_ref(), value);
        }
        let caller_env = std::mem::replace(&mut self.env, callee_env);

        let mut frame = Frame::new();
        let mut result = Ok(());
        for stmt in &function.body {
            result = self.execute_statement(stmt, &mut frame);
            if result.is_err() {
                break;
            }
        }

        self.env = caller_env;
        self.depth -= 1;
        result?;

        // No explicit return form exists: a call yields the last value
        // assigned inside the callee, or zero if nothing was assigned.
        Ok(frame.last_assigned.unwrap_or(Value::Int(0)))
    }
}

/// Tokenize and parse a source text, converting any failure into
/// renderable diagnostics. Parsing stops at the first malformed sentence.
pub fn parse_program(source: &str) -> Result<Vec<Stmt>, Vec<Diagnostic>> {
    let (output, errors) = crate::lexer::lexer().parse(source).into_output_errors();

    if !errors.is_empty() {
        return Err(errors
            .into_iter()
            .map(|e| {
                let span = e.span();
                let message = match e.found() {
                    Some(c) => format!("unrecognized character `{}`", c),
                    None => "unexpected end of input".to_string(),
                };
                Diagnostic::error(message)
                    .with_code("E0001")
                    .with_label(Label::primary(
                        Span::new(span.start, span.end),
                        "not part of any token",
                    ))
            })
            .collect());
    }

    let tokens = output.unwrap_or_default();
    let mut parser = TokenParser::from_lexer_output(tokens, source.len());
    parser.parse().map_err(|e| vec![e.to_diagnostic()])
}

/// Parse and execute, collecting every emitted value. Errors are flattened
/// to strings; use [`parse_and_run_with_diagnostics`] for structured ones.
pub fn parse_and_run(source: &str) -> Result<Vec<Value>, String> {
    parse_and_run_with_diagnostics(source).map_err(|diags| {
        diags
            .iter()
            .map(|d| d.message.clone())
            .collect::<Vec<_>>()
            .join("; ")
    })
}

pub fn parse_and_run_with_diagnostics(source: &str) -> Result<Vec<Value>, Vec<Diagnostic>> {
    let stmts = parse_program(source)?;
    let mut emitted = Vec::new();
    let mut interpreter = Interpreter::new(&mut emitted);
    match interpreter.run(&stmts) {
        Ok(()) => Ok(emitted),
        Err(e) => Err(vec![e.to_diagnostic()]),
    }
}

/// Full pipeline for the command line: emitted values go straight to the
/// given emitter, failures come back as diagnostics.
pub fn run_source(
    source: &str,
    emitter: &mut dyn Emit,
    limits: Limits,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<(), Vec<Diagnostic>> {
    let stmts = parse_program(source)?;
    let mut interpreter = Interpreter::new(emitter).with_limits(limits);
    if let Some(flag) = cancel {
        interpreter = interpreter.with_cancel(flag);
    }
    interpreter.run(&stmts).map_err(|e| vec![e.to_diagnostic()])
}
