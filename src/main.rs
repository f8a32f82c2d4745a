use std::{
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use prosa::{Diagnostics, Registry, Session};

/// prosa ist ein Interpreter für eine deutschsprachige
/// Programmiersprache.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Die auszuführende Skriptdatei. Ohne Datei startet die interaktive
    /// Eingabe.
    skript: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match args.skript {
        Some(path) => run_file(&path),
        None => run_prompt(),
    }
}

/// Runs one script file; exit code 65 after compile-stage errors, 70
/// after a runtime error.
fn run_file(path: &Path) -> ExitCode {
    let source = fs::read_to_string(path).unwrap_or_else(|_| {
        eprintln!("Die Datei '{}' konnte nicht gelesen werden. Existiert sie?",
                  path.display());
        std::process::exit(1);
    });

    let mut session = Session::new(Registry::standard());
    let mut diagnostics = Diagnostics::new();

    let directory = path.parent().map(Path::to_path_buf);
    session.run(&source, directory, &mut diagnostics);

    for entry in diagnostics.entries() {
        eprintln!("{entry}");
    }

    if diagnostics.had_error() {
        ExitCode::from(65)
    } else if diagnostics.had_runtime_error() {
        ExitCode::from(70)
    } else {
        ExitCode::SUCCESS
    }
}

/// The interactive prompt: one shared session, one line at a time.
fn run_prompt() -> ExitCode {
    let mut session = Session::new(Registry::standard());
    let mut diagnostics = Diagnostics::new();
    let stdin = io::stdin();

    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {},
        }

        session.run(&line, None, &mut diagnostics);
        for entry in diagnostics.entries() {
            eprintln!("{entry}");
        }
        diagnostics.reset();
    }

    ExitCode::SUCCESS
}
