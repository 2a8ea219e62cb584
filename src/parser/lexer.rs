//! Splits declaration source into tokens, tracking 1-based line/column.
use super::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum Tok {
    Ident(String),
    Str(String),
    Num(f64),
    /// Raw text between backticks, `${..}` placeholders left in place.
    Template(String),
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Lt,
    Gt,
    Comma,
    Semi,
    Colon,
    Question,
    Pipe,
    Amp,
    Eq,
    Dot,
    Ellipsis,
    Arrow,
    Minus,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub tok: Tok,
    pub line: usize,
    pub column: usize,
}

struct Cursor<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError { line: self.line, column: self.column, message: message.into() }
    }
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut cur = Cursor { chars: source.chars().peekable(), line: 1, column: 1 };
    let mut out = Vec::new();

    loop {
        skip_trivia(&mut cur)?;
        let (line, column) = (cur.line, cur.column);
        let Some(c) = cur.bump() else {
            out.push(Token { tok: Tok::Eof, line, column });
            return Ok(out);
        };
        let tok = match c {
            '{' => Tok::LBrace,
            '}' => Tok::RBrace,
            '(' => Tok::LParen,
            ')' => Tok::RParen,
            '[' => Tok::LBracket,
            ']' => Tok::RBracket,
            '<' => Tok::Lt,
            '>' => Tok::Gt,
            ',' => Tok::Comma,
            ';' => Tok::Semi,
            ':' => Tok::Colon,
            '?' => Tok::Question,
            '|' => Tok::Pipe,
            '&' => Tok::Amp,
            '-' => Tok::Minus,
            '=' => {
                if cur.peek() == Some('>') {
                    cur.bump();
                    Tok::Arrow
                } else {
                    Tok::Eq
                }
            }
            '.' => {
                if cur.peek() == Some('.') {
                    cur.bump();
                    if cur.bump() != Some('.') {
                        return Err(cur.error("expected `...`"));
                    }
                    Tok::Ellipsis
                } else {
                    Tok::Dot
                }
            }
            '\'' | '"' => Tok::Str(lex_string(&mut cur, c)?),
            '`' => Tok::Template(lex_template(&mut cur)?),
            c if c.is_ascii_digit() => Tok::Num(lex_number(&mut cur, c)?),
            c if is_ident_start(c) => {
                let mut ident = String::from(c);
                while let Some(c) = cur.peek() {
                    if !is_ident_continue(c) {
                        break;
                    }
                    ident.push(c);
                    cur.bump();
                }
                Tok::Ident(ident)
            }
            other => {
                return Err(ParseError { line, column, message: format!("unexpected character `{other}`") });
            }
        };
        out.push(Token { tok, line, column });
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn skip_trivia(cur: &mut Cursor) -> Result<(), ParseError> {
    loop {
        match cur.peek() {
            Some(c) if c.is_whitespace() => {
                cur.bump();
            }
            Some('/') => {
                let mut ahead = cur.chars.clone();
                ahead.next();
                match ahead.peek() {
                    Some('/') => {
                        while let Some(c) = cur.bump() {
                            if c == '\n' {
                                break;
                            }
                        }
                    }
                    Some('*') => {
                        cur.bump();
                        cur.bump();
                        let mut prev = '\0';
                        loop {
                            let Some(c) = cur.bump() else {
                                return Err(cur.error("unterminated block comment"));
                            };
                            if prev == '*' && c == '/' {
                                break;
                            }
                            prev = c;
                        }
                    }
                    _ => return Ok(()),
                }
            }
            _ => return Ok(()),
        }
    }
}

fn lex_string(cur: &mut Cursor, quote: char) -> Result<String, ParseError> {
    let mut out = String::new();
    loop {
        match cur.bump() {
            None | Some('\n') => return Err(cur.error("unterminated string literal")),
            Some(c) if c == quote => return Ok(out),
            Some('\\') => match cur.bump() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(c) => out.push(c),
                None => return Err(cur.error("unterminated string literal")),
            },
            Some(c) => out.push(c),
        }
    }
}

fn lex_template(cur: &mut Cursor) -> Result<String, ParseError> {
    let mut out = String::new();
    let mut depth = 0usize;
    loop {
        let Some(c) = cur.bump() else {
            return Err(cur.error("unterminated template literal"));
        };
        match c {
            '`' if depth == 0 => return Ok(out),
            '\\' => {
                if let Some(next) = cur.bump() {
                    out.push(next);
                }
                continue;
            }
            '$' if cur.peek() == Some('{') => {
                depth += 1;
                out.push('$');
                out.push('{');
                cur.bump();
                continue;
            }
            '{' if depth > 0 => depth += 1,
            '}' if depth > 0 => depth -= 1,
            _ => {}
        }
        out.push(c);
    }
}

fn lex_number(cur: &mut Cursor, first: char) -> Result<f64, ParseError> {
    let mut text = String::from(first);
    while let Some(c) = cur.peek() {
        if c.is_ascii_alphanumeric() || c == '.' || c == '_' {
            if c != '_' {
                text.push(c);
            }
            cur.bump();
            let hex = text.starts_with("0x") || text.starts_with("0X");
            if matches!(c, 'e' | 'E') && !hex && matches!(cur.peek(), Some('+' | '-')) {
                text.extend(cur.bump());
            }
        } else {
            break;
        }
    }
    let parsed = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok().map(|n| n as f64)
    } else {
        text.parse::<f64>().ok()
    };
    parsed.ok_or_else(|| cur.error(format!("invalid number literal `{text}`")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<Tok> {
        tokenize(src).unwrap().into_iter().map(|t| t.tok).collect()
    }

    #[test]
    fn comments_are_skipped_and_positions_tracked() {
        let toks = tokenize("// head\ninterface /* x */ A {}").unwrap();
        assert_eq!(toks[0].tok, Tok::Ident("interface".into()));
        assert_eq!((toks[0].line, toks[0].column), (2, 1));
        assert_eq!(toks[1].tok, Tok::Ident("A".into()));
        assert_eq!(toks[1].column, 19);
    }

    #[test]
    fn template_keeps_placeholders_raw() {
        assert_eq!(
            kinds("`${Category}-${number}`"),
            vec![Tok::Template("${Category}-${number}".into()), Tok::Eof]
        );
    }

    #[test]
    fn arrow_and_ellipsis() {
        assert_eq!(
            kinds("=> ... = ."),
            vec![Tok::Arrow, Tok::Ellipsis, Tok::Eq, Tok::Dot, Tok::Eof]
        );
    }

    #[test]
    fn signed_exponents_stay_in_the_number() {
        assert_eq!(
            kinds("1e-5 2E+3 0x1e-1"),
            vec![Tok::Num(1e-5), Tok::Num(2000.0), Tok::Num(30.0), Tok::Minus, Tok::Num(1.0), Tok::Eof]
        );
    }

    #[test]
    fn unterminated_string_reports_location() {
        let err = tokenize("type A = 'abc\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("unterminated"));
    }
}
