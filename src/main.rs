use std::env;
use std::fs::{self, File};
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use log::info;
use regex_dfa::{table, Dfa, Error, Nfa};

const USAGE: &str = "usage: regex-dfa [<descriptionFile> <outputFile> [testString...]]";

enum Mode {
    /// Read patterns from stdin and print each stage.
    Interactive,
    /// Build from a description file, write the table, and try each test string.
    Batch {
        input: PathBuf,
        output: PathBuf,
        tests: Vec<String>,
    },
}

impl Mode {
    fn from_args<I: Iterator<Item = String>>(mut args: I) -> Option<Mode> {
        let _program = args.next();
        let input = match args.next() {
            Some(input) => PathBuf::from(input),
            None => return Some(Mode::Interactive),
        };
        let output = PathBuf::from(args.next()?);
        Some(Mode::Batch { input, output, tests: args.collect() })
    }
}

fn interactive() -> Result<(), Error> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    write!(stdout, "Enter a regular expression: ")?;
    stdout.flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let nfa: Nfa = line.parse()?;
        println!("NFA:\n{}", nfa);
        let dfa = Dfa::from_nfa(&nfa);
        println!("DFA:\n{}", dfa);
        let min = dfa.minimize();
        println!("Minimized DFA:\n{}", min);
        let dead: Vec<String> = min.dead_states().iter().map(|s| s.to_string()).collect();
        println!("Dead states: {{{}}}\n", dead.join(", "));
        write!(stdout, "Enter a regular expression: ")?;
        stdout.flush()?;
    }
    Ok(())
}

fn batch(input: &Path, output: &Path, tests: &[String]) -> Result<(), Error> {
    let text = fs::read_to_string(input)?;
    let table = BufWriter::new(File::create(output)?);
    build_and_test(&text, tests, table, io::stdout().lock())
}

/// Builds the minimized DFA for a description, writes its table to `out`
/// and one verdict per test string to `report`.
fn build_and_test<T: Write, R: Write>(
    text: &str,
    tests: &[String],
    out: T,
    mut report: R,
) -> Result<(), Error> {
    if text.trim().is_empty() {
        return Err(Error::EmptyInput);
    }
    let description = Nfa::from_description(text)?;
    let dfa = Dfa::from_nfa(&description.nfa).minimize();
    info!(
        "{} NFA states minimized to {} DFA states",
        description.nfa.len(),
        dfa.len()
    );

    let columns = description.alphabet.columns(&description.declared);
    table::write_table(&dfa, &columns, out)?;

    for test in tests {
        writeln!(report, "{:?}: {}", test, dfa.run(test))?;
    }
    report.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let result = match Mode::from_args(env::args()) {
        Some(Mode::Interactive) => interactive(),
        Some(Mode::Batch { input, output, tests }) => batch(&input, &output, &tests),
        None => {
            eprintln!("{}", USAGE);
            return ExitCode::from(2);
        }
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            if let Error::Syntax(_) = e {
                eprintln!("Terminating parser");
            }
            ExitCode::FAILURE
        }
    }
}
