use clap::{App, Arg, ErrorKind};
use std::fs;
use std::io::{self, Write};

use zbornik::ast::AstPrinter;
use zbornik::interpreter::Interpreter;
use zbornik::parser;
use zbornik::scanner;
use zbornik::session::Session;

enum Mode {
    Evaluate,
    Tree,
    Tokens,
}

fn main() {
    let app = App::new("zbornik")
        .about("Tolmač za jezik zbornik")
        .arg(
            Arg::with_name("skripta")
                .help("pot do izvorne datoteke")
                .index(1),
        )
        .arg(
            Arg::with_name("zetoni")
                .long("zetoni")
                .help("izpiše žetone namesto vrednotenja"),
        )
        .arg(
            Arg::with_name("drevo")
                .long("drevo")
                .help("izpiše sintaksno drevo namesto vrednotenja"),
        );
    let matches = match app.get_matches_safe() {
        Ok(matches) => matches,
        Err(error) => match error.kind {
            ErrorKind::HelpDisplayed | ErrorKind::VersionDisplayed => error.exit(),
            _ => {
                eprintln!("Uporaba: zbornik [--zetoni] [--drevo] [skripta]");
                std::process::exit(64);
            }
        },
    };
    let mode = if matches.is_present("zetoni") {
        Mode::Tokens
    } else if matches.is_present("drevo") {
        Mode::Tree
    } else {
        Mode::Evaluate
    };
    match matches.value_of("skripta") {
        Some(path) => run_file(path, &mode),
        None => run_prompt(&mode),
    }
}

fn run_file(path: &str, mode: &Mode) {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(_) => {
            eprintln!("Datoteka '{}' ne obstaja.", path);
            std::process::exit(1);
        }
    };
    let mut session = Session::new();
    run(&contents, mode, &mut session);
    if session.had_error {
        std::process::exit(65);
    }
}

fn run_prompt(mode: &Mode) {
    let mut session = Session::new();
    loop {
        print!("> ");
        io::stdout().flush().unwrap();
        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => (),
        }
        run(&line, mode, &mut session);
        // One bad line must not poison the next.
        session.reset();
    }
    println!();
}

fn run(source: &str, mode: &Mode, session: &mut Session) {
    let tokens = scanner::scan_tokens(source, session);
    if let Mode::Tokens = mode {
        for token in &tokens {
            println!("{}", token);
        }
        return;
    }
    let expression = match parser::parse(&tokens, session) {
        Some(expression) => expression,
        None => return,
    };
    if session.had_error {
        return;
    }
    match mode {
        Mode::Tree => {
            let mut printer = AstPrinter {};
            println!("{}", expression.accept(&mut printer));
        }
        _ => Interpreter::new().interpret(&expression, session),
    }
}
