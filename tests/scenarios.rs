//! End-to-end runs: definition text in, output lines out, as the command line prints them.

use ktm::{parse_with, problems, report, Halt};

/// Parses `definition`, runs every problem in `tapes`, and collects every output line.
fn transcript(definition: &str, tapes: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let machine = parse_with(definition, |rule| lines.push(report::rule_line(rule))).unwrap();

    for problem in problems(tapes, machine.tape_count) {
        lines.extend(report::run_lines(&machine.run(&problem.tapes)));
    }

    lines
}

const FLIP: &str = "flip, 1, 10, 5
0,1
q0,qA,qR
q0
qA,qR
0,1
q0,0,q0,1,R
";

const COPY: &str = "copy, 2, 8, 50
a,b
c0,acc,rej
c0
acc,rej
a,b
a,b
# copy tape 1 onto tape 2
c0,a,_,c0,*,a,R,R
c0,b,_,c0,*,b,R,R
c0,_,_,acc,_,_,S,S
c0,*,*,rej,*,*,S,S
";

#[test]
fn missing_rule_for_blank_is_an_error() {
    assert_eq!(
        transcript(FLIP, "0\n"),
        vec![
            "1:q0,0,q0,1,R",
            "Tape 1: 0",
            "1,1,0,q0,0,q0,1,R",
            "Error",
            "Tape 1: 1",
        ]
    );
}

#[test]
fn empty_input_accepts_after_one_step() {
    let definition = format!("{FLIP}q0,_,qA,_,S\n");

    assert_eq!(
        transcript(&definition, "\n"),
        vec![
            "1:q0,0,q0,1,R",
            "2:q0,_,qA,_,S",
            "Tape 1: ",
            "1,2,0,q0,_,qA,_,S",
            "Accepted",
            "Tape 1: ",
        ]
    );
}

#[test]
fn two_tape_copy() {
    let lines = transcript(COPY, "ab\n\nba\nb\n");

    assert_eq!(
        lines,
        vec![
            "1:c0,a,_,c0,*,a,R,R",
            "2:c0,b,_,c0,*,b,R,R",
            "3:c0,_,_,acc,_,_,S,S",
            "4:c0,*,*,rej,*,*,S,S",
            // problem 1
            "Tape 1: ab",
            "Tape 2: ",
            "1,1,0,0,c0,a,_,c0,a,a,R,R",
            "2,2,1,1,c0,b,_,c0,b,b,R,R",
            "3,3,2,2,c0,_,_,acc,_,_,S,S",
            "Accepted",
            "Tape 1: ab",
            "Tape 2: ab",
            // problem 2: tape 2 is not blank, so the catch-all rule rejects
            "Tape 1: ba",
            "Tape 2: b",
            "1,4,0,0,c0,b,b,rej,b,b,S,S",
            "Rejected",
            "Tape 1: ba",
            "Tape 2: b",
        ]
    );
}

#[test]
fn trailing_partial_problem_is_ignored() {
    let lines = transcript(COPY, "a\n\nb\n");
    let outcomes = lines
        .iter()
        .filter(|line| ["Accepted", "Rejected", "Error"].contains(&line.as_str()))
        .count();

    assert_eq!(outcomes, 1);
}

#[test]
fn exactly_one_outcome_before_final_tapes() {
    let machine = ktm::parse(COPY).unwrap();

    for input in [["ab", ""], ["ba", "b"], ["c", ""], ["aaaaaaaaaa", ""]] {
        let run = machine.run(&input);
        let lines = report::run_lines(&run);

        let outcome = &lines[lines.len() - machine.tape_count - 1];
        assert!(["Accepted", "Rejected", "Error"].contains(&outcome.as_str()));

        let steps: Vec<usize> = run.trace.iter().map(|r| r.step).collect();
        assert_eq!(steps, (1..=run.trace.len()).collect::<Vec<_>>());
    }
}

#[test]
fn head_running_off_the_tape() {
    // Eight cells, eight a's: the ninth move leaves the tape.
    let run = ktm::parse(COPY).unwrap().run(&["aaaaaaaaaa", ""]);

    assert_eq!(run.initial_tapes[0], "aaaaaaaa");
    assert_eq!(run.trace.len(), 8);
    assert!(matches!(run.halt, Halt::Err(_)));
    assert_eq!(run.final_tapes, vec!["aaaaaaaa", "aaaaaaaa"]);
}

#[test]
fn output_is_deterministic() {
    assert_eq!(transcript(COPY, "ab\n\n"), transcript(COPY, "ab\n\n"));
}

#[test]
fn unreachable_rule_with_unknown_direction_still_runs() {
    let definition = FLIP.replacen("q0,0,q0,1,R\n", "q0,_,qA,_,S\nq9,0,q0,1,N\n", 1);

    assert_eq!(
        transcript(&definition, "\n"),
        vec![
            "1:q0,_,qA,_,S",
            "2:q9,0,q0,1,N",
            "Tape 1: ",
            "1,1,0,q0,_,qA,_,S",
            "Accepted",
            "Tape 1: ",
        ]
    );
}

#[test]
fn firing_rule_with_unknown_direction_is_an_error() {
    let definition = FLIP.replacen("q0,0,q0,1,R\n", "q0,0,q0,1,N\n", 1);

    assert_eq!(
        transcript(&definition, "0\n"),
        vec![
            "1:q0,0,q0,1,N",
            "Tape 1: 0",
            "1,1,0,q0,0,q0,1,N",
            "Error",
            "Tape 1: 1",
        ]
    );
}

#[test]
fn empty_start_state_is_an_error_at_run_time() {
    let definition = FLIP.replacen("\nq0\n", "\n\n", 1);

    assert_eq!(
        transcript(&definition, "0\n"),
        vec!["1:q0,0,q0,1,R", "Tape 1: 0", "Error", "Tape 1: 0"]
    );
}
