//! This module defines the `Execution` struct, which simulates a k-tape Turing Machine on one
//! problem instance. Tapes are fixed-length arrays; a head leaving them ends the run with an
//! error, as do an exhausted step budget, a symbol outside the tape alphabet and a missing rule.

use crate::types::{ExecutionError, Halt, Machine, Run, Step, Symbol, TraceRecord, Transition};

/// The mutable run state of a machine working on one problem instance.
///
/// An `Execution` borrows the immutable `Machine`; nothing survives from one instance to the
/// next.
pub struct Execution<'m> {
    machine: &'m Machine,
    state: &'m str,
    tapes: Vec<Vec<Symbol>>,
    heads: Vec<usize>,
    step_count: usize,
    halt: Option<Halt>,
}

impl<'m> Execution<'m> {
    /// Creates a run of `machine` with one initial string per tape.
    ///
    /// Each tape is `max_tape_length` blanks with its string copied in from position 0.
    /// Characters beyond the tape length are dropped, missing strings leave the tape blank.
    pub fn new<S: AsRef<str>>(machine: &'m Machine, inputs: &[S]) -> Self {
        let tapes = (0..machine.tape_count)
            .map(|i| {
                let mut tape = vec![Symbol::Blank; machine.max_tape_length];
                let input = inputs.get(i).map_or("", |s| s.as_ref());
                for (cell, c) in tape.iter_mut().zip(input.chars()) {
                    *cell = Symbol::from(c);
                }
                tape
            })
            .collect();

        Self {
            machine,
            state: &machine.start_state,
            tapes,
            heads: vec![0; machine.tape_count],
            step_count: 0,
            halt: None,
        }
    }

    /// Executes a single step of the machine.
    ///
    /// # Returns
    ///
    /// * `Step::Fired(record)` if a transition was applied. When that transition ended the run
    ///   (accept/reject state reached, head pushed off a tape) the next call reports the halt.
    /// * `Step::Halt(halt)` once the run is over. Further calls keep returning the same halt.
    pub fn step(&mut self) -> Step {
        if let Some(halt) = &self.halt {
            return Step::Halt(halt.clone());
        }

        match self.fire() {
            Ok(record) => Step::Fired(record),
            Err(halt) => {
                self.halt = Some(halt.clone());
                Step::Halt(halt)
            }
        }
    }

    /// Runs until the machine halts, collecting the trace.
    pub fn run(&mut self) -> (Vec<TraceRecord>, Halt) {
        let mut trace = Vec::new();
        loop {
            match self.step() {
                Step::Fired(record) => trace.push(record),
                Step::Halt(halt) => return (trace, halt),
            }
        }
    }

    /// Performs the checks that precede a transition, then applies it.
    fn fire(&mut self) -> Result<TraceRecord, Halt> {
        let machine = self.machine;

        if self.step_count >= machine.max_steps {
            return Err(Halt::Err(ExecutionError::StepLimit(machine.max_steps)));
        }

        let symbols = self.symbols().map_err(Halt::Err)?;
        self.validate(&symbols).map_err(Halt::Err)?;

        if let Some(halt) = self.terminal() {
            return Err(halt);
        }

        let transition = machine.transition(self.state, &symbols).ok_or_else(|| {
            Halt::Err(ExecutionError::NoApplicableRule(
                self.state.to_string(),
                symbols.clone(),
            ))
        })?;

        self.step_count += 1;

        let written: Vec<Symbol> = transition
            .write
            .iter()
            .zip(&symbols)
            .map(|(action, read)| action.resolve(read))
            .collect();

        let record = TraceRecord {
            step: self.step_count,
            rule_number: transition.rule_number,
            heads: self.heads.clone(),
            from_state: self.state.to_string(),
            read: symbols,
            to_state: transition.to_state.clone(),
            write: written.clone(),
            directions: transition.directions.clone(),
        };

        self.halt = match self.apply(transition, written) {
            Ok(()) => {
                self.state = transition.to_state.as_str();
                self.terminal()
            }
            Err(e) => Some(Halt::Err(e)),
        };

        Ok(record)
    }

    /// Writes the resolved symbols, then moves the heads one tape at a time.
    ///
    /// The first head that leaves its tape, or whose direction is unknown, stops the update;
    /// later heads stay where they are.
    fn apply(
        &mut self,
        transition: &Transition,
        written: Vec<Symbol>,
    ) -> Result<(), ExecutionError> {
        for (i, symbol) in written.into_iter().enumerate() {
            let head = self.heads[i];
            let cell = self.tapes[i]
                .get_mut(head)
                .ok_or(ExecutionError::TapeBoundary {
                    tape: i + 1,
                    position: head as isize,
                })?;
            *cell = symbol;
        }

        let length = self.machine.max_tape_length;
        for (i, direction) in transition.directions.iter().enumerate() {
            let offset = direction
                .offset()
                .ok_or_else(|| ExecutionError::InvalidDirection {
                    tape: i + 1,
                    direction: direction.to_string(),
                })?;

            let head = self.heads[i];
            self.heads[i] = head
                .checked_add_signed(offset)
                .filter(|&position| position < length)
                .ok_or(ExecutionError::TapeBoundary {
                    tape: i + 1,
                    position: head as isize + offset,
                })?;
        }

        Ok(())
    }

    /// Rejects any non-blank symbol that is missing from its tape's alphabet.
    fn validate(&self, symbols: &[Symbol]) -> Result<(), ExecutionError> {
        let invalid = symbols
            .iter()
            .zip(&self.machine.tape_alphabets)
            .position(|(symbol, alphabet)| !symbol.is_blank() && !alphabet.contains(symbol));

        match invalid {
            Some(i) => Err(ExecutionError::InvalidSymbol {
                tape: i + 1,
                symbol: symbols[i].clone(),
            }),
            None => Ok(()),
        }
    }

    /// Accept or reject, if the current state is one of the halting states.
    fn terminal(&self) -> Option<Halt> {
        if self.state == self.machine.accept_state {
            Some(Halt::Accepted)
        } else if self.state == self.machine.reject_state {
            Some(Halt::Rejected)
        } else {
            None
        }
    }

    /// Returns the symbol under each head.
    ///
    /// | a | b | c | tape 1
    /// | d | _ | _ | tape 2
    ///   0   1   2   index
    ///
    /// heads [0, 2] will return ['a', '_']
    pub fn symbols(&self) -> Result<Vec<Symbol>, ExecutionError> {
        self.heads
            .iter()
            .zip(&self.tapes)
            .enumerate()
            .map(|(i, (&head, tape))| {
                tape.get(head).cloned().ok_or(ExecutionError::TapeBoundary {
                    tape: i + 1,
                    position: head as isize,
                })
            })
            .collect()
    }

    /// Returns the current state of the machine.
    pub fn state(&self) -> &str {
        self.state
    }

    /// Returns the number of transitions executed so far.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Returns the head position of every tape.
    pub fn heads(&self) -> &[usize] {
        &self.heads
    }

    /// Returns every tape, including trailing blanks.
    pub fn tapes(&self) -> &[Vec<Symbol>] {
        &self.tapes
    }

    /// The outcome, once the run is over.
    pub fn halt(&self) -> Option<&Halt> {
        self.halt.as_ref()
    }

    pub fn is_halted(&self) -> bool {
        self.halt.is_some()
    }

    /// Renders every tape with its trailing run of blanks removed.
    pub fn tape_contents(&self) -> Vec<String> {
        self.tapes.iter().map(|tape| render_tape(tape)).collect()
    }
}

impl Machine {
    /// Runs the machine on one problem instance.
    pub fn run<S: AsRef<str>>(&self, inputs: &[S]) -> Run {
        let mut execution = Execution::new(self, inputs);
        let initial_tapes = execution.tape_contents();
        let (trace, halt) = execution.run();

        Run {
            initial_tapes,
            trace,
            halt,
            final_tapes: execution.tape_contents(),
        }
    }

    /// Finds the first rule, in declaration order, that fires for `state` and `symbols`.
    pub fn transition(&self, state: &str, symbols: &[Symbol]) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.matches(state, symbols))
    }
}

/// Joins a tape's symbols, dropping only the trailing run of blanks.
fn render_tape(tape: &[Symbol]) -> String {
    let end = tape
        .iter()
        .rposition(|symbol| !symbol.is_blank())
        .map_or(0, |i| i + 1);

    tape[..end].iter().map(ToString::to_string).collect()
}
