pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    pub fn lex(&mut self) -> Vec<Token> {
        let mut tokens: Vec<Token> = Vec::new();
        while !self.is_eof() {
            tokens.push(self.next_token());
        }
        tokens.push(Token::eof());
        tokens
    }

    fn next_token(&mut self) -> Token {
        if self.input[self.position].is_ascii_whitespace() {
            self.take_while(TokenKind::Whitespace, |c| c.is_ascii_whitespace())
        } else {
            // Quotes and backslashes are ordinary word characters here.
            self.take_while(TokenKind::Word, |c| !c.is_ascii_whitespace())
        }
    }

    fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    fn take_while(&mut self, kind: TokenKind, accept: impl Fn(char) -> bool) -> Token {
        let mut end_position = self.position;
        while end_position < self.input.len() && accept(self.input[end_position]) {
            end_position += 1;
        }
        let lexeme: String = self.input[self.position..end_position].iter().collect();
        self.position = end_position;

        Token { kind, lexeme }
    }
}

#[derive(PartialEq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
}

impl Token {
    fn eof() -> Self {
        Self {
            kind: TokenKind::EOF,
            lexeme: String::new(),
        }
    }
}

#[derive(PartialEq, Debug)]
pub enum TokenKind {
    Word,
    Whitespace,
    EOF,
}
