//! Comment stripping and lexical analysis for Jack source.

use crate::error::CompileError;
use crate::token::{KEYWORDS, SYMBOLS, Token, TokenKind};

/// Strip `/* ... */` block comments and `// ...` line comments from `source`.
///
/// Runs before tokenization, not during it, and — matching the reference
/// implementation this crate is faithful to — does not special-case quoted
/// strings. A `/*` or `//` inside a string literal is still treated as a
/// comment opener. No test in this crate exercises that case.
pub fn strip_comments(source: &str) -> Result<String, CompileError> {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len());
    let mut i = 0;
    let mut line = 1usize;
    let mut column = 1usize;

    while i < chars.len() {
        let c = chars[i];
        if c == '/' && chars.get(i + 1) == Some(&'*') {
            let (start_line, start_col) = (line, column);
            let mut j = i + 2;
            let mut closed = false;
            while j + 1 < chars.len() {
                if chars[j] == '*' && chars[j + 1] == '/' {
                    closed = true;
                    j += 2;
                    break;
                }
                j += 1;
            }
            if !closed {
                return Err(CompileError::lexical(
                    "unterminated block comment",
                    start_line,
                    start_col,
                ));
            }
            for k in i..j {
                if chars[k] == '\n' {
                    out.push('\n');
                    line += 1;
                    column = 1;
                } else {
                    out.push(' ');
                    column += 1;
                }
            }
            i = j;
            continue;
        }

        if c == '/' && chars.get(i + 1) == Some(&'/') {
            let mut j = i;
            while j < chars.len() && chars[j] != '\n' {
                out.push(' ');
                column += 1;
                j += 1;
            }
            i = j;
            continue;
        }

        out.push(c);
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
        i += 1;
    }

    Ok(out)
}

/// Tokenize already-comment-stripped Jack source.
pub fn tokenize(source: &str) -> Result<Vec<Token>, CompileError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    let mut line = 1usize;
    let mut column = 1usize;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
            i += 1;
            continue;
        }

        let (start_line, start_col) = (line, column);

        if c == '"' {
            let mut j = i + 1;
            let mut text = String::new();
            let mut closed = false;
            while j < chars.len() {
                if chars[j] == '\n' {
                    break;
                }
                if chars[j] == '"' {
                    closed = true;
                    j += 1;
                    break;
                }
                text.push(chars[j]);
                j += 1;
            }
            if !closed {
                return Err(CompileError::lexical(
                    "unterminated string literal",
                    start_line,
                    start_col,
                ));
            }
            column += j - i;
            tokens.push(Token::new(TokenKind::StringConst, text, start_line, start_col));
            i = j;
            continue;
        }

        if c.is_ascii_digit() {
            let mut j = i;
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            let text: String = chars[i..j].iter().collect();
            let value: u32 = text.parse().unwrap_or(u32::MAX);
            if value > 32767 {
                return Err(CompileError::lexical(
                    format!("integer constant {text} out of range 0..32767"),
                    start_line,
                    start_col,
                ));
            }
            column += j - i;
            tokens.push(Token::new(TokenKind::IntConst, text, start_line, start_col));
            i = j;
            continue;
        }

        if c.is_ascii_alphabetic() || c == '_' {
            let mut j = i;
            while j < chars.len() && (chars[j].is_ascii_alphanumeric() || chars[j] == '_') {
                j += 1;
            }
            let text: String = chars[i..j].iter().collect();
            let kind = if KEYWORDS.contains(&text.as_str()) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            };
            column += j - i;
            tokens.push(Token::new(kind, text, start_line, start_col));
            i = j;
            continue;
        }

        if SYMBOLS.contains(c) {
            tokens.push(Token::new(TokenKind::Symbol, c.to_string(), start_line, start_col));
            column += 1;
            i += 1;
            continue;
        }

        return Err(CompileError::lexical(
            format!("unexpected character '{c}'"),
            start_line,
            start_col,
        ));
    }

    Ok(tokens)
}

/// An ordered, restartable token sequence with a cursor.
///
/// The cursor starts *before* the first token; [`TokenStream::advance`]
/// must be called once before [`TokenStream::current`] returns anything.
pub struct TokenStream {
    tokens: Vec<Token>,
    pos: Option<usize>,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        TokenStream { tokens, pos: None }
    }

    /// True if there is a token after the current cursor position.
    pub fn has_more(&self) -> bool {
        match self.pos {
            None => !self.tokens.is_empty(),
            Some(p) => p + 1 < self.tokens.len(),
        }
    }

    /// Move the cursor forward one token. Returns `None` once the cursor
    /// has moved past the last token (a legitimate end-of-stream state,
    /// not a panic) rather than indexing out of bounds.
    pub fn advance(&mut self) -> Option<&Token> {
        let next = self.pos.map_or(0, |p| p + 1);
        self.pos = Some(next);
        self.tokens.get(next)
    }

    /// The token at the current cursor position, if the cursor has moved
    /// past the start and not yet past the end.
    pub fn current(&self) -> Option<&Token> {
        self.pos.and_then(|p| self.tokens.get(p))
    }

    /// Non-destructive one-token lookahead.
    pub fn peek_next(&self) -> Option<&Token> {
        let next = self.pos.map_or(0, |p| p + 1);
        self.tokens.get(next)
    }

    /// Position to report when the cursor has run past the end of input.
    pub fn eof_position(&self) -> (usize, usize) {
        self.tokens
            .last()
            .map(|t| (t.line, t.column + t.text.chars().count()))
            .unwrap_or((1, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    #[test]
    fn strips_line_and_block_comments() {
        let src = "class Foo { // trailing\n/* block\ncomment */ field int x; }";
        let stripped = strip_comments(src).unwrap();
        assert!(!stripped.contains("trailing"));
        assert!(!stripped.contains("block"));
        assert_eq!(stripped.lines().count(), src.lines().count());
    }

    #[test]
    fn unterminated_block_comment_is_lexical_error() {
        let err = strip_comments("class X { /* never closed").unwrap_err();
        assert!(matches!(err, CompileError::Lexical { .. }));
    }

    #[test]
    fn tokenizes_keywords_symbols_and_identifiers() {
        let tokens = tokenize("class Main { }").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[0].text, "class");
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].text, "Main");
        assert_eq!(tokens[2].kind, TokenKind::Symbol);
        assert_eq!(tokens[2].text, "{");
    }

    #[test]
    fn string_constant_strips_quotes() {
        let tokens = tokenize(r#""hello world""#).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::StringConst);
        assert_eq!(tokens[0].text, "hello world");
    }

    #[test]
    fn unterminated_string_is_lexical_error() {
        let err = tokenize("\"never closed").unwrap_err();
        assert!(matches!(err, CompileError::Lexical { .. }));
    }

    #[test]
    fn integer_out_of_range_is_lexical_error() {
        let err = tokenize("32768").unwrap_err();
        assert!(matches!(err, CompileError::Lexical { .. }));
        assert!(tokenize("32767").is_ok());
    }

    #[test]
    fn identifier_not_mistaken_for_keyword_prefix() {
        let tokens = tokenize("classroom").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].text, "classroom");
    }

    #[test]
    fn token_stream_cursor_starts_before_first_token() {
        let tokens = tokenize("a b").unwrap();
        let mut stream = TokenStream::new(tokens);
        assert!(stream.current().is_none());
        assert!(stream.has_more());
        assert_eq!(stream.peek_next().unwrap().text, "a");
        assert_eq!(stream.advance().unwrap().text, "a");
        assert_eq!(stream.current().unwrap().text, "a");
        assert_eq!(stream.peek_next().unwrap().text, "b");
        assert!(stream.has_more());
        assert_eq!(stream.advance().unwrap().text, "b");
        assert!(!stream.has_more());
        assert!(stream.advance().is_none());
        assert!(stream.current().is_none());
    }
}
