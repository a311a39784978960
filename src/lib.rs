pub mod ast;
pub mod interpreter;
pub mod parser;
pub mod scanner;
pub mod session;
pub mod token;
