use crate::interpreter::RuntimeError;
use crate::token::{Token, TokenType};

/// Per-run error sink. Each file run or REPL line gets its flag reset,
/// so one bad line does not poison the next.
pub struct Session {
    pub had_error: bool,
}

impl Session {
    pub fn new() -> Session {
        Session { had_error: false }
    }

    pub fn error(&mut self, line: i32, message: &str) {
        self.report(line, "", message);
    }

    pub fn parse_error(&mut self, token: &Token, message: &str) {
        match token.tokentype {
            TokenType::Eof => self.report(token.line, " na koncu", message),
            _ => {
                let location = format!(" pri '{}'", token.lexeme);
                self.report(token.line, &location, message)
            }
        }
    }

    pub fn runtime_error(&mut self, error: &RuntimeError) {
        eprintln!("{}\n[line {}]", error.message, error.token.line);
        self.had_error = true;
    }

    pub fn reset(&mut self) {
        self.had_error = false;
    }

    fn report(&mut self, line: i32, location: &str, message: &str) {
        eprintln!("[line {}] Error{}: {}", line, location, message);
        self.had_error = true;
    }
}
