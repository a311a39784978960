use std::fmt;
use strum_macros::Display;

#[rustfmt::skip]
#[derive(Debug, Clone, Display)]
pub enum TokenType {
    // Single-character tokens.
    LeftParen, RightParen, LeftBrace, RightBrace,
    Comma, Dot, Minus, Plus, Semicolon, Slash, Star,

    // Comparison and equality keywords: ni, ni enak, enak,
    // vecji od, vecji ali enak, manjsi od, manjsi ali enak.
    Ni, NiEnak, Enak,
    Vecji, VecjiAliEnak,
    Manjsi, ManjsiAliEnak,

    // Literals.
    Identifier(String), Str(String), Number(f64),

    // Keywords.
    In, Razred, Drugace, Neresnicno, ZaVsak, Preslikava, Ce, Prazno,
    Ali, Izpisi, Vrni, Stars, Tukaj, Resnicno, NajIma, Dokler, Vrednost,

    Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub tokentype: TokenType,
    pub lexeme: String,
    pub line: i32,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.tokentype, self.lexeme)
    }
}
