//! Textual output of a run: rule echo lines, `Tape N:` lines, comma-separated trace lines
//! and the outcome line.

use crate::types::{Halt, Run, TraceRecord, Transition};
use std::fmt;
use std::io::{self, Write};

/// The echo line printed when a rule is read: `<rule_number>:<rule text>`.
pub fn rule_line(transition: &Transition) -> String {
    format!("{}:{}", transition.rule_number, transition.source)
}

/// `Tape <n>: <content>` for every tape, numbered from 1.
pub fn tape_lines(tapes: &[String]) -> Vec<String> {
    tapes
        .iter()
        .enumerate()
        .map(|(i, content)| format!("Tape {}: {}", i + 1, content))
        .collect()
}

/// Every output line of one problem instance, in order: initial tapes, trace, outcome,
/// final tapes.
pub fn run_lines(run: &Run) -> Vec<String> {
    let mut lines = tape_lines(&run.initial_tapes);
    lines.extend(run.trace.iter().map(ToString::to_string));
    lines.push(run.halt.to_string());
    lines.extend(tape_lines(&run.final_tapes));
    lines
}

/// Writes the output of one problem instance, one line each.
pub fn write_run<W: Write>(out: &mut W, run: &Run) -> io::Result<()> {
    for line in run_lines(run) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// step, rule, k heads, from state, k read symbols, to state, k written symbols, k directions.
impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields = vec![self.step.to_string(), self.rule_number.to_string()];
        fields.extend(self.heads.iter().map(ToString::to_string));
        fields.push(self.from_state.clone());
        fields.extend(self.read.iter().map(ToString::to_string));
        fields.push(self.to_state.clone());
        fields.extend(self.write.iter().map(ToString::to_string));
        fields.extend(self.directions.iter().map(ToString::to_string));

        f.write_str(&fields.join(","))
    }
}

/// The outcome line. The cause of an error is not part of it.
impl fmt::Display for Halt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Halt::Accepted => "Accepted",
            Halt::Rejected => "Rejected",
            Halt::Err(_) => "Error",
        })
    }
}
