use thiserror::Error;

use super::ast::{CommandNode, Operator, OutputRedirect, SimpleCommand, Word};
use super::lexer::{Lexer, RedirectOp, Token};

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("expected a command {0}")]
    ExpectedCommand(&'static str),
    #[error("expected a file name after redirection")]
    MissingRedirectTarget,
    #[error("unterminated {0} quote")]
    Unterminated(char),
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current_token: Token,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current_token = lexer.next_token();
        Parser {
            lexer,
            current_token,
        }
    }

    fn next_token(&mut self) {
        self.current_token = self.lexer.next_token();
    }

    /// 解析整行输入；空行返回 None
    pub fn parse_command(&mut self) -> Result<Option<CommandNode>, ParseError> {
        if self.current_token == Token::EOF {
            return Ok(None);
        }

        let mut node = self.parse_parallel()?;
        while self.current_token == Token::Semi {
            self.next_token();
            if self.current_token == Token::EOF {
                break;
            }
            let right = self.parse_parallel()?;
            node = CommandNode::binary(Operator::Sequential, node, right);
        }

        match &self.current_token {
            Token::EOF => Ok(Some(node)),
            Token::Unterminated(quote) => Err(ParseError::Unterminated(*quote)),
            _ => Err(ParseError::ExpectedCommand("before operator")),
        }
    }

    fn parse_parallel(&mut self) -> Result<CommandNode, ParseError> {
        let mut node = self.parse_conditional()?;
        while self.current_token == Token::Parallel {
            self.next_token();
            let right = self.parse_conditional()?;
            node = CommandNode::binary(Operator::Parallel, node, right);
        }
        Ok(node)
    }

    fn parse_conditional(&mut self) -> Result<CommandNode, ParseError> {
        let mut node = self.parse_pipeline()?;
        loop {
            let op = match self.current_token {
                Token::And => Operator::And,
                Token::Or => Operator::Or,
                _ => break,
            };
            self.next_token();
            let right = self.parse_pipeline()?;
            node = CommandNode::binary(op, node, right);
        }
        Ok(node)
    }

    fn parse_pipeline(&mut self) -> Result<CommandNode, ParseError> {
        let mut node = CommandNode::Leaf(self.parse_simple_command()?);
        while self.current_token == Token::Pipe {
            self.next_token();
            let right = CommandNode::Leaf(self.parse_simple_command()?);
            node = CommandNode::binary(Operator::Pipe, node, right);
        }
        Ok(node)
    }

    fn parse_simple_command(&mut self) -> Result<SimpleCommand, ParseError> {
        // 解析命令名
        let mut command = match &self.current_token {
            Token::Word(word) => {
                let command = SimpleCommand::new(word.clone());
                self.next_token();
                command
            }
            Token::Unterminated(quote) => return Err(ParseError::Unterminated(*quote)),
            Token::EOF => return Err(ParseError::ExpectedCommand("after operator")),
            _ => return Err(ParseError::ExpectedCommand("before operator")),
        };

        // 解析参数和重定向
        loop {
            match &self.current_token {
                Token::Word(word) => {
                    command.arguments.push(word.clone());
                    self.next_token();
                }
                Token::Redirect(op) => {
                    let op = *op;
                    self.next_token();
                    let target = self.parse_redirect_target()?;
                    Self::apply_redirection(&mut command, op, target);
                }
                Token::Unterminated(quote) => return Err(ParseError::Unterminated(*quote)),
                _ => break,
            }
        }

        Ok(command)
    }

    fn parse_redirect_target(&mut self) -> Result<Word, ParseError> {
        match &self.current_token {
            Token::Word(word) => {
                let target = word.clone();
                self.next_token();
                Ok(target)
            }
            Token::Unterminated(quote) => Err(ParseError::Unterminated(*quote)),
            _ => Err(ParseError::MissingRedirectTarget),
        }
    }

    fn apply_redirection(command: &mut SimpleCommand, op: RedirectOp, target: Word) {
        let redirect = |append| OutputRedirect {
            target: target.clone(),
            append,
        };
        match op {
            RedirectOp::Input => command.input = Some(target.clone()),
            RedirectOp::Output => command.output = Some(redirect(false)),
            RedirectOp::Append => command.output = Some(redirect(true)),
            RedirectOp::Error => command.error = Some(redirect(false)),
            RedirectOp::ErrorAppend => command.error = Some(redirect(true)),
            RedirectOp::OutputBoth => {
                command.output = Some(redirect(false));
                command.error = Some(redirect(false));
            }
            RedirectOp::AppendBoth => {
                command.output = Some(redirect(true));
                command.error = Some(redirect(true));
            }
        }
    }
}
