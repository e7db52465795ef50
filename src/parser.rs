//! This module provides the parser for k-tape machine definitions, utilizing the `pest` crate
//! to split each line into comma-separated fields. The fixed line layout is:
//!
//! 1. `name, k, max_tape_length, max_steps`
//! 2. the input alphabet of tape 1
//! 3. the declared states
//! 4. the start state
//! 5. `accept, reject`
//! 6. one alphabet line per tape (k lines)
//!
//! Every following non-empty, non-comment line is a transition rule with `2 + 3k` fields.

use crate::types::{
    Direction, Machine, MachineError, ReadPattern, Symbol, Transition, WriteAction,
    COMMENT_MARKER, HEADER_LINES, MIN_DEFINITION_LINES,
};
use pest::Parser as PestParser;
use pest_derive::Parser as PestParser;
use std::collections::BTreeSet;

/// Derives a `PestParser` for the definition line grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct DefinitionParser;

/// Parses a machine definition without reporting rules as they are read.
pub fn parse(input: &str) -> Result<Machine, MachineError> {
    parse_with(input, |_| {})
}

/// Parses a machine definition into a `Machine`.
///
/// `on_rule` is invoked for each transition the moment its line is accepted, so rules read
/// before a malformed rule line have already been reported when the error is returned.
///
/// # Returns
///
/// * `Ok(Machine)` if the definition is well formed.
/// * `Err(MachineError::DefinitionTooShort)` if it has fewer than six lines.
/// * `Err(MachineError::FieldCount)` if a rule line has the wrong number of fields.
/// * `Err(MachineError::InvalidHeader)` / `Err(MachineError::InvalidDefinition)` if a fixed
///   line is malformed.
pub fn parse_with<F>(input: &str, mut on_rule: F) -> Result<Machine, MachineError>
where
    F: FnMut(&Transition),
{
    let lines: Vec<&str> = input.lines().collect();
    if lines.len() < MIN_DEFINITION_LINES {
        return Err(MachineError::DefinitionTooShort {
            expected: MIN_DEFINITION_LINES,
            found: lines.len(),
        });
    }

    let (name, tape_count, max_tape_length, max_steps) = parse_header(lines[0])?;
    let tape1_alphabet = parse_alphabet(lines[1])?;
    let states = tokens(lines[2])?
        .into_iter()
        .map(String::from)
        .collect::<Vec<_>>();
    let start_state = lines[3].trim().to_string();
    let (accept_state, reject_state) = parse_halting_states(lines[4])?;

    let tape_alphabets = (0..tape_count)
        .map(|i| {
            let line = lines.get(HEADER_LINES + i).ok_or_else(|| {
                MachineError::InvalidDefinition(format!(
                    "Missing alphabet line for tape {} of {}",
                    i + 1,
                    tape_count
                ))
            })?;

            let mut alphabet = parse_alphabet(line)?;
            alphabet.insert(Symbol::Blank);
            Ok(alphabet)
        })
        .collect::<Result<Vec<_>, MachineError>>()?;

    let mut transitions = Vec::new();
    for line in rule_lines(&lines[HEADER_LINES + tape_count..]) {
        let transition = parse_transition(line, transitions.len() + 1, tape_count)?;
        on_rule(&transition);
        transitions.push(transition);
    }

    Ok(Machine {
        name,
        tape_count,
        max_tape_length,
        max_steps,
        tape1_alphabet,
        tape_alphabets,
        states,
        start_state,
        accept_state,
        reject_state,
        transitions,
    })
}

/// Splits a line into its trimmed, comma-separated fields. Empty fields are kept.
pub fn fields(line: &str) -> Result<Vec<&str>, MachineError> {
    let record = DefinitionParser::parse(Rule::record, line)
        .map_err(|e| MachineError::ParseError(Box::new(e)))?
        .next()
        .ok_or_else(|| MachineError::InvalidDefinition(format!("Unreadable line: {line}")))?;

    Ok(record
        .into_inner()
        .filter(|pair| pair.as_rule() == Rule::field)
        .map(|pair| pair.as_str().trim())
        .collect())
}

/// Like `fields`, with empty fields dropped. Used for lists of symbols and states.
fn tokens(line: &str) -> Result<Vec<&str>, MachineError> {
    Ok(fields(line)?
        .into_iter()
        .filter(|field| !field.is_empty())
        .collect())
}

/// Rule lines with surrounding whitespace removed, skipping blank lines and comments.
fn rule_lines<'a, 'b>(lines: &'b [&'a str]) -> impl Iterator<Item = &'a str> + 'b {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_MARKER))
}

/// Parses `name, k, max_tape_length, max_steps`.
fn parse_header(line: &str) -> Result<(String, usize, usize, usize), MachineError> {
    let parts = tokens(line)?;
    if parts.len() < 4 {
        return Err(MachineError::InvalidHeader(format!(
            "expected 'name, tapes, max_tape_length, max_steps', found: {}",
            line.trim()
        )));
    }

    Ok((
        parts[0].to_string(),
        parse_count(parts[1], "tape count")?,
        parse_count(parts[2], "maximum tape length")?,
        parse_count(parts[3], "maximum step count")?,
    ))
}

/// Parses a positive integer header field.
fn parse_count(field: &str, what: &str) -> Result<usize, MachineError> {
    match field.parse::<usize>() {
        Ok(0) => Err(MachineError::InvalidHeader(format!(
            "{what} must be positive"
        ))),
        Ok(n) => Ok(n),
        Err(e) => Err(MachineError::InvalidHeader(format!(
            "{what} '{field}' is not a number: {e}"
        ))),
    }
}

fn parse_alphabet(line: &str) -> Result<BTreeSet<Symbol>, MachineError> {
    Ok(tokens(line)?.into_iter().map(Symbol::parse).collect())
}

/// Parses `accept, reject`.
fn parse_halting_states(line: &str) -> Result<(String, String), MachineError> {
    match tokens(line)?.as_slice() {
        [accept, reject, ..] => Ok((accept.to_string(), reject.to_string())),
        _ => Err(MachineError::InvalidDefinition(format!(
            "Expected 'accept, reject' states, found: {}",
            line.trim()
        ))),
    }
}

/// Parses one rule line: from_state, k reads, to_state, k writes, k directions.
fn parse_transition(
    line: &str,
    rule_number: usize,
    tape_count: usize,
) -> Result<Transition, MachineError> {
    let parts = fields(line)?;
    let expected = 2 + 3 * tape_count;
    if parts.len() != expected {
        return Err(MachineError::FieldCount {
            line: line.to_string(),
            expected,
            found: parts.len(),
        });
    }

    let k = tape_count;
    let read = parts[1..=k].iter().map(|p| ReadPattern::parse(p)).collect();
    let write = parts[k + 2..2 * k + 2]
        .iter()
        .map(|p| WriteAction::parse(p))
        .collect();
    let directions = parts[2 * k + 2..]
        .iter()
        .map(|p| Direction::parse(p))
        .collect();

    Ok(Transition {
        rule_number,
        from_state: parts[0].to_string(),
        read,
        to_state: parts[k + 1].to_string(),
        write,
        directions,
        source: line.to_string(),
    })
}
