use crate::lexer::{Lexer, Token, TokenKind};

/// Turns one input line into its argument vector.
///
/// The first element is the command name, the rest are its arguments. A line
/// that is empty or holds only whitespace yields no arguments at all.
pub struct Parser {
    input: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(input: &str) -> Self {
        Self {
            input: Lexer::new(input).lex(),
            position: 0,
        }
    }

    pub fn parse(&mut self) -> Vec<String> {
        let mut output: Vec<String> = Vec::new();

        while !self.is_eof() {
            if let Some(arg) = self.next_argument() {
                output.push(arg);
            }
        }

        output
    }

    fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    fn next_argument(&mut self) -> Option<String> {
        let token = &mut self.input[self.position];
        self.position += 1;

        match token.kind {
            TokenKind::Word => Some(std::mem::take(&mut token.lexeme)),
            TokenKind::Whitespace | TokenKind::EOF => None,
        }
    }
}

/// Shorthand for `Parser::new(line).parse()`.
pub fn tokenize(line: &str) -> Vec<String> {
    Parser::new(line).parse()
}
