//! This module defines the core data structures and types used throughout the k-tape
//! Turing Machine interpreter, including the machine definition, transitions, trace records,
//! execution outcomes, and error types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

use crate::Rule;

/// The blank symbol, as written in definitions, tape files and trace output.
pub const BLANK_SYMBOL: char = '_';
/// Matches any symbol in a read field, keeps the current symbol in a write field.
pub const WILDCARD_SYMBOL: &str = "*";
/// Rule lines starting with this marker are ignored.
pub const COMMENT_MARKER: char = '#';
/// Number of fixed lines preceding the per-tape alphabet lines.
pub const HEADER_LINES: usize = 5;
/// A definition shorter than this is rejected before anything else is parsed.
pub const MIN_DEFINITION_LINES: usize = 6;
/// The maximum allowed size for a machine definition file in bytes.
pub const MAX_DEFINITION_SIZE: usize = 1 << 20; // 1MB

/// A single tape cell value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Symbol {
    /// An empty cell.
    Blank,
    /// Any other symbol, kept verbatim.
    Glyph(String),
}

impl Symbol {
    /// Interprets a definition token. `_` denotes the blank.
    pub fn parse(token: &str) -> Self {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(BLANK_SYMBOL), None) => Symbol::Blank,
            _ => Symbol::Glyph(token.to_string()),
        }
    }

    /// True for an empty cell.
    pub fn is_blank(&self) -> bool {
        matches!(self, Symbol::Blank)
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        if c == BLANK_SYMBOL {
            Symbol::Blank
        } else {
            Symbol::Glyph(c.to_string())
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Blank => write!(f, "{BLANK_SYMBOL}"),
            Symbol::Glyph(glyph) => f.write_str(glyph),
        }
    }
}

/// What a transition expects to read from one tape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadPattern {
    /// Matches any symbol, including the blank.
    Any,
    /// Matches exactly this symbol.
    Exact(Symbol),
}

impl ReadPattern {
    /// Interprets a read field; `*` is the wildcard.
    pub fn parse(token: &str) -> Self {
        if token == WILDCARD_SYMBOL {
            ReadPattern::Any
        } else {
            ReadPattern::Exact(Symbol::parse(token))
        }
    }

    /// Checks whether `symbol` satisfies this pattern.
    pub fn matches(&self, symbol: &Symbol) -> bool {
        match self {
            ReadPattern::Any => true,
            ReadPattern::Exact(expected) => expected == symbol,
        }
    }
}

/// What a transition writes to one tape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WriteAction {
    /// Leave the symbol that was read in place.
    Keep,
    /// Overwrite the cell with this symbol.
    Put(Symbol),
}

impl WriteAction {
    /// Interprets a write field; `*` keeps the symbol that was read.
    pub fn parse(token: &str) -> Self {
        if token == WILDCARD_SYMBOL {
            WriteAction::Keep
        } else {
            WriteAction::Put(Symbol::parse(token))
        }
    }

    /// Returns the symbol that ends up in the cell, given the symbol that was read from it.
    pub fn resolve(&self, read: &Symbol) -> Symbol {
        match self {
            WriteAction::Keep => read.clone(),
            WriteAction::Put(symbol) => symbol.clone(),
        }
    }
}

/// Represents the possible directions a Turing Machine head can move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
    /// Any other token. The rule still parses; firing it ends the run with an error.
    Other(String),
}

impl Direction {
    /// Parses `L`, `R` or `S`; anything else is kept verbatim.
    pub fn parse(token: &str) -> Self {
        match token {
            "L" => Direction::Left,
            "R" => Direction::Right,
            "S" => Direction::Stay,
            other => Direction::Other(other.to_string()),
        }
    }

    /// The change in head position, or `None` for an unknown direction.
    pub fn offset(&self) -> Option<isize> {
        match self {
            Direction::Left => Some(-1),
            Direction::Right => Some(1),
            Direction::Stay => Some(0),
            Direction::Other(_) => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Left => "L",
            Direction::Right => "R",
            Direction::Stay => "S",
            Direction::Other(token) => token,
        })
    }
}

/// A single transition rule.
///
/// Every per-tape list (`read`, `write`, `directions`) holds exactly one entry per tape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// 1-based position among the rule lines of the definition.
    pub rule_number: usize,
    /// The state this rule applies in.
    pub from_state: String,
    /// Symbols expected under each head.
    pub read: Vec<ReadPattern>,
    /// The state the machine moves to.
    pub to_state: String,
    /// Symbols written under each head.
    pub write: Vec<WriteAction>,
    /// Head movement for each tape, applied after writing.
    pub directions: Vec<Direction>,
    /// The trimmed rule line as it appeared in the definition.
    pub source: String,
}

impl Transition {
    /// Checks whether this rule fires for the given state and symbols under the heads.
    pub fn matches(&self, state: &str, symbols: &[Symbol]) -> bool {
        self.from_state == state
            && self.read.len() == symbols.len()
            && self
                .read
                .iter()
                .zip(symbols)
                .all(|(pattern, symbol)| pattern.matches(symbol))
    }
}

/// A parsed k-tape machine definition. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    pub name: String,
    /// The number of tapes (k).
    pub tape_count: usize,
    /// Number of cells allocated for every tape.
    pub max_tape_length: usize,
    /// Upper bound on executed transitions per run.
    pub max_steps: usize,
    /// Declared input alphabet of tape 1. Parsed, but execution only consults `tape_alphabets`.
    pub tape1_alphabet: BTreeSet<Symbol>,
    /// One alphabet per tape, each including the blank.
    pub tape_alphabets: Vec<BTreeSet<Symbol>>,
    pub states: Vec<String>,
    pub start_state: String,
    pub accept_state: String,
    pub reject_state: String,
    /// Rules in declaration order; the first match wins.
    pub transitions: Vec<Transition>,
}

/// One executed step, captured before the transition is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRecord {
    /// 1-based step number.
    pub step: usize,
    pub rule_number: usize,
    /// Head positions before the move.
    pub heads: Vec<usize>,
    pub from_state: String,
    pub read: Vec<Symbol>,
    pub to_state: String,
    /// Symbols that are written, with keep-markers already resolved.
    pub write: Vec<Symbol>,
    pub directions: Vec<Direction>,
}

/// Represents the outcome of a single call to `Execution::step`.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A transition fired.
    Fired(TraceRecord),
    /// The run is over.
    Halt(Halt),
}

/// The terminal outcome of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum Halt {
    Accepted,
    Rejected,
    Err(ExecutionError),
}

/// Everything a single problem instance produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    /// Tape contents right after initialization, trailing blanks removed.
    pub initial_tapes: Vec<String>,
    pub trace: Vec<TraceRecord>,
    pub halt: Halt,
    /// Tape contents when the run ended, trailing blanks removed.
    pub final_tapes: Vec<String>,
}

/// A problem instance: one initial string per tape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    /// 1-based position in the tape file.
    pub index: usize,
    pub tapes: Vec<String>,
}

/// Faults that end a single run with an `Error` outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// The step ceiling was reached before an accept or reject state.
    #[error("Step limit of {0} reached before halting")]
    StepLimit(usize),
    /// A non-blank symbol under a head is missing from that tape's alphabet.
    #[error("Symbol '{symbol}' on tape {tape} is not in the tape alphabet")]
    InvalidSymbol { tape: usize, symbol: Symbol },
    /// No rule covers the current state and symbols.
    #[error("No rule defined for state {0} and symbols {1:?}")]
    NoApplicableRule(String, Vec<Symbol>),
    /// A fired rule names a direction other than `L`, `R` or `S`.
    #[error("Unsupported direction '{direction}' for tape {tape}")]
    InvalidDirection { tape: usize, direction: String },
    /// A head left the tape. `tape` is 1-based.
    #[error("Head of tape {tape} moved to position {position}, outside the tape")]
    TapeBoundary { tape: usize, position: isize },
}

/// Errors raised while loading or parsing a machine definition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    /// The definition has fewer lines than the fixed header needs.
    #[error("Machine definition too short: expected at least {expected} lines, found {found}")]
    DefinitionTooShort { expected: usize, found: usize },
    /// A rule line does not have `2 + 3k` fields.
    #[error("Bad rule line (expected {expected} fields, found {found}): {line}")]
    FieldCount {
        line: String,
        expected: usize,
        found: usize,
    },
    /// The first line is not `name, k, max_tape_length, max_steps`.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
    /// A fixed line of the definition is missing or malformed.
    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),
    /// The line tokenizer rejected the input.
    #[error("Definition parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Reading a definition or tape file failed.
    #[error("File error: {0}")]
    FileError(String),
}
