use std::iter::Peekable;
use std::str::Chars;

use super::ast::{Word, WordPart};

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Word(Word),
    Pipe,      // |
    Or,        // ||
    Parallel,  // &
    And,       // &&
    Semi,      // ;
    Redirect(RedirectOp),
    Unterminated(char),
    EOF,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum RedirectOp {
    Input,           // <
    Output,          // >
    Append,          // >>
    Error,           // 2>
    ErrorAppend,     // 2>>
    OutputBoth,      // &>
    AppendBoth,      // &>>
}

pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.chars().peekable(),
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        match self.peek_char() {
            None => Token::EOF,
            Some(c) => match c {
                '|' => {
                    self.read_char();
                    if self.eat('|') {
                        Token::Or
                    } else {
                        Token::Pipe
                    }
                }
                ';' => {
                    self.read_char();
                    Token::Semi
                }
                '&' => {
                    self.read_char();
                    if self.eat('&') {
                        Token::And
                    } else if self.eat('>') {
                        if self.eat('>') {
                            Token::Redirect(RedirectOp::AppendBoth)
                        } else {
                            Token::Redirect(RedirectOp::OutputBoth)
                        }
                    } else {
                        Token::Parallel
                    }
                }
                '<' => {
                    self.read_char();
                    Token::Redirect(RedirectOp::Input)
                }
                '>' => {
                    self.read_char();
                    if self.eat('>') {
                        Token::Redirect(RedirectOp::Append)
                    } else {
                        Token::Redirect(RedirectOp::Output)
                    }
                }
                _ => self.read_word(),
            },
        }
    }

    fn read_char(&mut self) -> Option<char> {
        self.input.next()
    }

    fn peek_char(&mut self) -> Option<char> {
        self.input.peek().copied()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.read_char();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if !c.is_whitespace() {
                break;
            }
            self.read_char();
        }
    }

    fn read_word(&mut self) -> Token {
        let mut builder = WordBuilder::default();

        while let Some(c) = self.peek_char() {
            if c.is_whitespace() || ";<>|&".contains(c) {
                break;
            }
            self.read_char();
            match c {
                '\'' => {
                    if !self.read_single_quoted(&mut builder) {
                        return Token::Unterminated('\'');
                    }
                }
                '"' => {
                    if !self.read_double_quoted(&mut builder) {
                        return Token::Unterminated('"');
                    }
                }
                '\\' => {
                    if let Some(escaped) = self.read_char() {
                        builder.push_char(escaped);
                    }
                }
                '$' => self.read_variable(&mut builder),
                c => builder.push_char(c),
            }
        }

        // 单独的 "2" 紧跟 '>' 时是标准错误重定向
        if builder.is_bare("2") && self.peek_char() == Some('>') {
            self.read_char();
            return if self.eat('>') {
                Token::Redirect(RedirectOp::ErrorAppend)
            } else {
                Token::Redirect(RedirectOp::Error)
            };
        }

        Token::Word(builder.finish())
    }

    fn read_single_quoted(&mut self, builder: &mut WordBuilder) -> bool {
        builder.quoted = true;
        while let Some(c) = self.read_char() {
            if c == '\'' {
                return true;
            }
            builder.push_char(c);
        }
        false
    }

    fn read_double_quoted(&mut self, builder: &mut WordBuilder) -> bool {
        builder.quoted = true;
        while let Some(c) = self.read_char() {
            match c {
                '"' => return true,
                '\\' => match self.read_char() {
                    Some(escaped @ ('"' | '\\' | '$')) => builder.push_char(escaped),
                    Some(other) => {
                        builder.push_char('\\');
                        builder.push_char(other);
                    }
                    None => return false,
                },
                '$' => self.read_variable(builder),
                c => builder.push_char(c),
            }
        }
        false
    }

    fn read_variable(&mut self, builder: &mut WordBuilder) {
        let braced = self.eat('{');
        let mut name = String::new();
        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphanumeric() || c == '_' {
                name.push(c);
                self.read_char();
            } else {
                break;
            }
        }
        if braced {
            self.eat('}');
        }

        if name.is_empty() {
            builder.push_char('$');
        } else {
            builder.push_variable(name);
        }
    }
}

#[derive(Default)]
struct WordBuilder {
    parts: Vec<WordPart>,
    literal: String,
    quoted: bool,
}

impl WordBuilder {
    fn push_char(&mut self, c: char) {
        self.literal.push(c);
    }

    fn push_variable(&mut self, name: String) {
        self.flush_literal();
        self.parts.push(WordPart::Variable(name));
    }

    fn flush_literal(&mut self) {
        if !self.literal.is_empty() {
            self.parts
                .push(WordPart::Literal(std::mem::take(&mut self.literal)));
        }
    }

    fn is_bare(&self, text: &str) -> bool {
        !self.quoted && self.parts.is_empty() && self.literal == text
    }

    fn finish(mut self) -> Word {
        self.flush_literal();
        // 引号包裹的空串仍是一个合法参数
        if self.parts.is_empty() && self.quoted {
            self.parts.push(WordPart::Literal(String::new()));
        }
        Word::new(self.parts)
    }
}
