pub mod environment;
pub mod error;
pub mod evaluator;
pub mod parser;

pub use environment::Environment;
pub use error::RuntimeError;
pub use evaluator::{
    parse_and_run, parse_and_run_with_diagnostics, parse_program, run_source, Emit, Interpreter,
    Limits, WriteEmit, MAIN_CLAUSE,
};
pub use parser::{ParseError, SpannedToken, TokenParser};
