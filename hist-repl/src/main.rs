use hist_expr::{translate, Source};
use rustyline::{error::ReadlineError, DefaultEditor};
use std::{fs, io::{self, IsTerminal, Read}, process::ExitCode};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Chooses how to translate the input: sources starting with `def` or `lambda` are functions,
/// anything else is a one-line expression.
fn source(input: &str) -> Source {
    let trimmed = input.trim_start();
    if trimmed.starts_with("def ") || trimmed.starts_with("lambda") {
        Source::Function(input)
    } else {
        Source::Text(input)
    }
}

/// Translates the input, printing the resulting [`Dim`](hist_expr::Dim) or reporting the error
/// to stderr. Returns true if translation succeeded.
fn translate_print(input: &str) -> bool {
    let source = source(input);
    debug!(?source, "read source");

    match translate(source) {
        Ok(dim) => {
            println!("{}", dim.with_names());
            true
        },
        Err(err) => {
            if let Err(io_err) = err.report_to_stderr("input", input) {
                eprintln!("{}", err);
                eprintln!("failed to render report: {}", io_err);
            }
            false
        },
    }
}

/// Runs the interactive mode, translating each line as it is entered.
fn repl() -> Result<(), ReadlineError> {
    let mut rl = DefaultEditor::new()?;

    fn process_line(rl: &mut DefaultEditor) -> Result<(), ReadlineError> {
        let input = rl.readline("> ")?;
        if input.trim().is_empty() {
            return Ok(());
        }

        rl.add_history_entry(&input)?;

        translate_print(&input);
        Ok(())
    }

    loop {
        if let Err(err) = process_line(&mut rl) {
            return match err {
                ReadlineError::Eof | ReadlineError::Interrupted => Ok(()),
                err => Err(err),
            };
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args();
    args.next();

    let input = if let Some(filename) = args.next() {
        // translate source file
        fs::read_to_string(&filename).map_err(|err| format!("{}: {}", filename, err))
    } else if !io::stdin().is_terminal() {
        // read source from stdin
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .map(|_| input)
            .map_err(|err| format!("stdin: {}", err))
    } else {
        // run the repl / interactive mode
        return match repl() {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{}", err);
                ExitCode::FAILURE
            },
        };
    };

    match input {
        Ok(input) if translate_print(&input) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_kind() {
        assert_eq!(source("x > 1"), Source::Text("x > 1"));
        assert_eq!(source("  def cut(x): return x > 1"), Source::Function("  def cut(x): return x > 1"));
        assert_eq!(source("lambda x: x > 1"), Source::Function("lambda x: x > 1"));
        assert_eq!(source("define > 1"), Source::Text("define > 1"));
    }
}
