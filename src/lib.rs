//! This crate provides the core logic for a deterministic k-tape Turing Machine interpreter.
//! It includes modules for parsing machine definitions, simulating their execution on batches
//! of input strings, and formatting the resulting step-by-step trace.

pub mod loader;
pub mod machine;
pub mod parser;
pub mod report;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `MachineLoader` struct and the tape-file splitter from the loader module.
pub use loader::{problems, MachineLoader};
/// Re-exports the `Execution` struct from the machine module.
pub use machine::Execution;
/// Re-exports the parsing entry points from the parser module.
pub use parser::{parse, parse_with};
/// Re-exports various types related to machine definition and execution from the types module.
pub use types::{
    Direction, ExecutionError, Halt, Machine, MachineError, Problem, ReadPattern, Run, Step,
    Symbol, TraceRecord, Transition, WriteAction, BLANK_SYMBOL, MAX_DEFINITION_SIZE,
    WILDCARD_SYMBOL,
};
