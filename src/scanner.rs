use crate::session::Session;
use crate::token::{Token, TokenType};
use phf::phf_map;
use std::iter::Peekable;
use std::str::CharIndices;

// Note: current becomes self.iter.peek()?.0
struct Scanner<'a, 's> {
    source: &'a str,
    iter: Peekable<CharIndices<'a>>,
    start: usize,
    line: i32,
    session: &'s mut Session,
}

/// Scans the whole source. Lexical errors go to the session and scanning
/// continues; the returned sequence always ends with an Eof token.
pub fn scan_tokens(source: &str, session: &mut Session) -> Vec<Token> {
    let mut scanner = Scanner {
        source,
        iter: source.char_indices().peekable(),
        start: 0,
        line: 1,
        session,
    };
    let mut tokens: Vec<Token> = Vec::new();

    while let Some((idx, _)) = scanner.iter.peek() {
        scanner.start = *idx;
        if let Some(token) = scanner.scan_token() {
            tokens.push(token);
        }
    }
    tokens.push(Token {
        tokentype: TokenType::Eof,
        lexeme: String::from(""),
        line: scanner.line,
    });
    tokens
}

impl<'a, 's> Scanner<'a, 's> {
    fn scan_token(&mut self) -> Option<Token> {
        let c = match self.iter.next() {
            Some((_, c)) => c,
            None => return None,
        };
        match c {
            '(' => Some(self.token(TokenType::LeftParen)),
            ')' => Some(self.token(TokenType::RightParen)),
            '{' => Some(self.token(TokenType::LeftBrace)),
            '}' => Some(self.token(TokenType::RightBrace)),
            ',' => Some(self.token(TokenType::Comma)),
            '.' => Some(self.token(TokenType::Dot)),
            '-' => Some(self.token(TokenType::Minus)),
            '+' => Some(self.token(TokenType::Plus)),
            ';' => Some(self.token(TokenType::Semicolon)),
            '*' => Some(self.token(TokenType::Star)),
            '/' => {
                if self.next_if('/') {
                    // Comment runs to the end of the line or of the input.
                    while let Some((_, c)) = self.iter.peek() {
                        match c {
                            '\n' => break,
                            _ => {
                                self.iter.next();
                            }
                        }
                    }
                    None
                } else {
                    Some(self.token(TokenType::Slash))
                }
            }
            ' ' | '\r' | '\t' => None,
            '\n' => {
                self.line += 1;
                None
            }
            '"' => self.string(),
            '0'..='9' => self.number(),
            'a'..='z' | 'A'..='Z' | '_' => self.identifier(),
            _ => {
                self.error("Nepričakovan znak.");
                None
            }
        }
    }

    fn current(&mut self) -> usize {
        match self.iter.peek() {
            None => self.source.len(),
            Some((idx, _)) => *idx,
        }
    }

    fn token(&mut self, tokentype: TokenType) -> Token {
        let current = self.current();
        Token {
            tokentype,
            lexeme: self.source[self.start..current].to_string(),
            line: self.line,
        }
    }

    fn error(&mut self, message: &str) {
        self.session.error(self.line, message);
    }

    fn next_if(&mut self, expected: char) -> bool {
        if let Some((_, c)) = self.iter.peek() {
            if *c == expected {
                self.iter.next();
                return true;
            }
        }
        false
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.iter.clone();
        iter.next();
        iter.peek().map(|(_, c)| *c)
    }

    fn string(&mut self) -> Option<Token> {
        loop {
            match self.iter.peek() {
                Some((_, '"')) => break,
                Some((_, '\n')) => {
                    self.line += 1;
                    self.iter.next();
                }
                Some(_) => {
                    self.iter.next();
                }
                None => {
                    self.error("Nezaključen niz.");
                    return None;
                }
            }
        }
        self.iter.next();
        let current = self.current();
        let value = self.source[self.start + 1..current - 1].to_string();
        Some(self.token(TokenType::Str(value)))
    }

    fn number(&mut self) -> Option<Token> {
        self.digits();
        // Consume a '.' only when a digit follows it.
        if let Some((_, '.')) = self.iter.peek() {
            if let Some('0'..='9') = self.peek_next() {
                self.iter.next();
                self.digits();
            }
        }
        let current = self.current();
        match self.source[self.start..current].parse() {
            Ok(value) => Some(self.token(TokenType::Number(value))),
            Err(_) => {
                self.error("Neveljavno število.");
                None
            }
        }
    }

    fn digits(&mut self) {
        while let Some((_, '0'..='9')) = self.iter.peek() {
            self.iter.next();
        }
    }

    fn identifier(&mut self) -> Option<Token> {
        while let Some((_, c)) = self.iter.peek() {
            match c {
                '0'..='9' | 'a'..='z' | 'A'..='Z' | '_' => {
                    self.iter.next();
                }
                _ => break,
            }
        }
        let source = self.source;
        let current = self.current();
        let text = &source[self.start..current];

        // Some keywords span two or three words. The prefix alone decides
        // which continuation has to follow.
        let continuation = match text {
            "naj" => Some(" ima"),
            "za" => Some(" vsak"),
            "vecji" | "manjsi" => match self.peek_next() {
                Some('o') => Some(" od"),
                _ => Some(" ali enak"),
            },
            "ni" => Some(" enak"),
            _ => None,
        };

        if let Some(expected) = continuation {
            let checkpoint = self.iter.clone();
            if self.matches_continuation(expected) {
                let current = self.current();
                let lexeme = &source[self.start..current];
                let tokentype = match KEYWORDS.get(lexeme) {
                    Some(tokentype) => tokentype.clone(),
                    None => TokenType::Identifier(lexeme.to_string()),
                };
                return Some(self.token(tokentype));
            }
            // The continuation is not there. Restore the checkpoint so the
            // partially matched characters are re-lexed, then fall back to
            // the prefix on its own: "ni" is a keyword in its own right,
            // the other prefixes are not.
            self.iter = checkpoint;
            return match KEYWORDS.get(text) {
                Some(tokentype) => Some(self.token(tokentype.clone())),
                None => {
                    self.error("Nepričakovan niz.");
                    Some(self.token(TokenType::Identifier(text.to_string())))
                }
            };
        }

        match KEYWORDS.get(text) {
            Some(tokentype) => Some(self.token(tokentype.clone())),
            None => Some(self.token(TokenType::Identifier(text.to_string()))),
        }
    }

    fn matches_continuation(&mut self, expected: &str) -> bool {
        for c in expected.chars() {
            if !self.next_if(c) {
                return false;
            }
        }
        true
    }
}

static KEYWORDS: phf::Map<&'static str, TokenType> = phf_map! {
    "in" => TokenType::In,
    "razred" => TokenType::Razred,
    "drugace" => TokenType::Drugace,
    "neresnicno" => TokenType::Neresnicno,
    "za vsak" => TokenType::ZaVsak,
    "preslikava" => TokenType::Preslikava,
    "ce" => TokenType::Ce,
    "prazno" => TokenType::Prazno,
    "ali" => TokenType::Ali,
    "izpisi" => TokenType::Izpisi,
    "vrni" => TokenType::Vrni,
    "stars" => TokenType::Stars,
    "tukaj" => TokenType::Tukaj,
    "resnicno" => TokenType::Resnicno,
    "naj ima" => TokenType::NajIma,
    "vrednost" => TokenType::Vrednost,
    "dokler" => TokenType::Dokler,
    "ni" => TokenType::Ni,
    "vecji od" => TokenType::Vecji,
    "vecji ali enak" => TokenType::VecjiAliEnak,
    "manjsi od" => TokenType::Manjsi,
    "manjsi ali enak" => TokenType::ManjsiAliEnak,
    "ni enak" => TokenType::NiEnak,
    "enak" => TokenType::Enak,
};

#[cfg(test)]
mod scanner_tests {
    use crate::scanner::scan_tokens;
    use crate::session::Session;
    use crate::token::{Token, TokenType};

    fn scan(source: &str) -> (Vec<Token>, bool) {
        let mut session = Session::new();
        let tokens = scan_tokens(source, &mut session);
        (tokens, session.had_error)
    }

    #[test]
    fn basic_scanner_test() {
        let (tokens, had_error) = scan("1 + 2");
        assert!(!had_error);
        assert_eq!(tokens.len(), 4);
        assert!(matches!(tokens[0].tokentype, TokenType::Number(x) if x == 1.0));
        assert!(matches!(tokens[1].tokentype, TokenType::Plus));
        assert!(matches!(tokens[2].tokentype, TokenType::Number(x) if x == 2.0));
        assert!(matches!(tokens[3].tokentype, TokenType::Eof));
    }

    #[test]
    fn multiword_naj_ima() {
        let (tokens, had_error) = scan("naj ima");
        assert!(!had_error);
        assert_eq!(tokens.len(), 2);
        assert!(matches!(tokens[0].tokentype, TokenType::NajIma));
        assert_eq!(tokens[0].lexeme, "naj ima");
    }

    #[test]
    fn multiword_za_vsak() {
        let (tokens, had_error) = scan("za vsak");
        assert!(!had_error);
        assert!(matches!(tokens[0].tokentype, TokenType::ZaVsak));
        assert_eq!(tokens[0].lexeme, "za vsak");
    }

    #[test]
    fn multiword_comparison_forms() {
        let (tokens, _) = scan("vecji od");
        assert!(matches!(tokens[0].tokentype, TokenType::Vecji));
        assert_eq!(tokens[0].lexeme, "vecji od");

        let (tokens, _) = scan("vecji ali enak");
        assert!(matches!(tokens[0].tokentype, TokenType::VecjiAliEnak));

        let (tokens, _) = scan("manjsi od");
        assert!(matches!(tokens[0].tokentype, TokenType::Manjsi));

        let (tokens, _) = scan("manjsi ali enak");
        assert!(matches!(tokens[0].tokentype, TokenType::ManjsiAliEnak));

        let (tokens, _) = scan("ni enak");
        assert!(matches!(tokens[0].tokentype, TokenType::NiEnak));
    }

    #[test]
    fn bare_ni_is_negation_keyword() {
        let (tokens, had_error) = scan("ni resnicno");
        assert!(!had_error);
        assert_eq!(tokens.len(), 3);
        assert!(matches!(tokens[0].tokentype, TokenType::Ni));
        assert_eq!(tokens[0].lexeme, "ni");
        assert!(matches!(tokens[1].tokentype, TokenType::Resnicno));
    }

    #[test]
    fn failed_continuation_relexes_prefix() {
        let (tokens, had_error) = scan("naj x");
        assert!(had_error);
        assert_eq!(tokens.len(), 3);
        assert!(matches!(&tokens[0].tokentype, TokenType::Identifier(n) if n == "naj"));
        assert!(matches!(&tokens[1].tokentype, TokenType::Identifier(n) if n == "x"));
    }

    #[test]
    fn string_literal() {
        let (tokens, had_error) = scan("\"zivjo svet\"");
        assert!(!had_error);
        assert!(matches!(&tokens[0].tokentype, TokenType::Str(s) if s == "zivjo svet"));
        assert_eq!(tokens[0].lexeme, "\"zivjo svet\"");
    }

    #[test]
    fn string_tracks_embedded_newlines() {
        let (tokens, had_error) = scan("\"a\nb\" 1");
        assert!(!had_error);
        assert!(matches!(&tokens[0].tokentype, TokenType::Str(s) if s == "a\nb"));
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn unterminated_string_reports_one_error() {
        let (tokens, had_error) = scan("\"abc");
        assert!(had_error);
        assert_eq!(tokens.len(), 1);
        assert!(matches!(tokens[0].tokentype, TokenType::Eof));
    }

    #[test]
    fn comment_runs_to_end_of_input() {
        let (tokens, had_error) = scan("1 // komentar brez nove vrstice");
        assert!(!had_error);
        assert_eq!(tokens.len(), 2);
        assert!(matches!(tokens[0].tokentype, TokenType::Number(_)));
    }

    #[test]
    fn number_parsing() {
        let (tokens, had_error) = scan("3.14");
        assert!(!had_error);
        assert!(matches!(tokens[0].tokentype, TokenType::Number(x) if x == 3.14));
    }

    #[test]
    fn trailing_dot_is_not_part_of_number() {
        let (tokens, had_error) = scan("12.");
        assert!(!had_error);
        assert_eq!(tokens.len(), 3);
        assert!(matches!(tokens[0].tokentype, TokenType::Number(x) if x == 12.0));
        assert!(matches!(tokens[1].tokentype, TokenType::Dot));
    }

    #[test]
    fn unexpected_character_is_skipped() {
        let (tokens, had_error) = scan("@ 1");
        assert!(had_error);
        assert_eq!(tokens.len(), 2);
        assert!(matches!(tokens[0].tokentype, TokenType::Number(_)));
    }

    #[test]
    fn eof_carries_final_line() {
        let (tokens, _) = scan("1\n2\n");
        let eof = tokens.last().unwrap();
        assert!(matches!(eof.tokentype, TokenType::Eof));
        assert_eq!(eof.line, 3);
    }
}
