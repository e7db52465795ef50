//! This module provides the `MachineLoader` struct, responsible for reading machine definitions
//! and tape files from disk and slicing tape files into problem instances.

use crate::parser::parse_with;
use crate::types::{Machine, MachineError, Problem, Transition, MAX_DEFINITION_SIZE};
use std::fs;
use std::path::Path;

/// `MachineLoader` is a utility struct for loading machine definitions and problem batches.
pub struct MachineLoader;

impl MachineLoader {
    /// Loads a machine definition from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Machine)` if the file is read and parsed successfully.
    /// * `Err(MachineError::FileError)` if the file cannot be read or is too large.
    /// * Any structural `MachineError` raised by the parser.
    pub fn load_machine(path: &Path) -> Result<Machine, MachineError> {
        Self::load_machine_with(path, |_| {})
    }

    /// Loads a machine definition, reporting each rule as the parser accepts it.
    pub fn load_machine_with<F>(path: &Path, on_rule: F) -> Result<Machine, MachineError>
    where
        F: FnMut(&Transition),
    {
        let content = read(path)?;
        if content.len() > MAX_DEFINITION_SIZE {
            return Err(MachineError::FileError(format!(
                "Definition {} exceeds {} bytes",
                path.display(),
                MAX_DEFINITION_SIZE
            )));
        }

        parse_with(&content, on_rule)
    }

    /// Loads a tape file and groups its lines into problems of `tape_count` lines each.
    pub fn load_problems(path: &Path, tape_count: usize) -> Result<Vec<Problem>, MachineError> {
        Ok(problems(&read(path)?, tape_count))
    }
}

/// Groups lines into problems of `tape_count` consecutive lines, in tape order.
///
/// A trailing group with fewer than `tape_count` lines is dropped.
pub fn problems(content: &str, tape_count: usize) -> Vec<Problem> {
    if tape_count == 0 {
        return Vec::new();
    }

    let lines: Vec<&str> = content.lines().collect();
    lines
        .chunks_exact(tape_count)
        .enumerate()
        .map(|(i, chunk)| Problem {
            index: i + 1,
            tapes: chunk.iter().map(|line| line.to_string()).collect(),
        })
        .collect()
}

fn read(path: &Path) -> Result<String, MachineError> {
    fs::read_to_string(path).map_err(|e| {
        MachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
    })
}
