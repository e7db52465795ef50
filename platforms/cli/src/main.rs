use anyhow::{Context, Result};
use clap::Parser;
use ktm::{report, Halt, MachineLoader};
use std::io::{self, Write};
use std::path::PathBuf;

/// Runs a k-tape Turing machine definition against every problem in a tape file.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  ktm-cli copy.tm copy-tapes.txt")]
struct Cli {
    /// The machine definition file
    machine_file: PathBuf,

    /// The tape file: k lines per problem, one line per tape
    tape_file: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let machine = MachineLoader::load_machine_with(&cli.machine_file, |rule| {
        println!("{}", report::rule_line(rule));
    })
    .with_context(|| format!("loading machine {}", cli.machine_file.display()))?;

    let problems = MachineLoader::load_problems(&cli.tape_file, machine.tape_count)
        .with_context(|| format!("loading tapes {}", cli.tape_file.display()))?;

    let mut out = io::stdout().lock();
    writeln!(out, "Tape file: {}", cli.tape_file.display())?;

    for problem in &problems {
        let run = machine.run(&problem.tapes);
        report::write_run(&mut out, &run)?;

        if let Halt::Err(e) = &run.halt {
            eprintln!("problem {}: {}", problem.index, e);
        }
    }

    out.flush()?;
    Ok(())
}
