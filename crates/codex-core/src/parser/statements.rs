//! Statement-level parsing: dispatch on the leading token

use super::token::TokenKind;
use super::{ParseResult, Parser};
use crate::ast::{FunctionDef, Node};

impl Parser {
    pub(super) fn parse_statement(&mut self) -> ParseResult<Node> {
        self.skip_newlines();
        match self.current().kind {
            TokenKind::Let => self.parse_assignment(),
            TokenKind::Func => self.parse_function_def(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Print => self.parse_print(),
            TokenKind::Identifier if self.peek().kind == TokenKind::Assign => {
                self.parse_assignment()
            }
            _ => {
                let expr = self.parse_expression()?;
                self.skip_optional(TokenKind::Semicolon);
                Ok(expr)
            }
        }
    }

    /// `let name = expr` or `name = expr`
    fn parse_assignment(&mut self) -> ParseResult<Node> {
        self.skip_optional(TokenKind::Let);
        let name = self.expect(TokenKind::Identifier)?.lexeme;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expression()?;
        self.skip_optional(TokenKind::Semicolon);
        Ok(Node::Assignment {
            name,
            value: Box::new(value),
        })
    }

    fn parse_function_def(&mut self) -> ParseResult<Node> {
        self.expect(TokenKind::Func)?;
        let name = self.expect(TokenKind::Identifier)?.lexeme;
        self.expect(TokenKind::LParen)?;
        let mut parameters = Vec::new();
        while !self.check(TokenKind::RParen) {
            parameters.push(self.expect(TokenKind::Identifier)?.lexeme);
            self.skip_optional(TokenKind::Comma);
        }
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;
        Ok(Node::FunctionDef(FunctionDef {
            name,
            parameters,
            body,
        }))
    }

    fn parse_if(&mut self) -> ParseResult<Node> {
        self.expect(TokenKind::If)?;
        let condition = self.parse_condition()?;
        let then_body = self.parse_block()?;
        // `else` must follow the closing brace on the same line
        let else_body = if self.check(TokenKind::Else) {
            self.advance();
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(Node::If {
            condition: Box::new(condition),
            then_body,
            else_body,
        })
    }

    fn parse_while(&mut self) -> ParseResult<Node> {
        self.expect(TokenKind::While)?;
        let condition = self.parse_condition()?;
        let body = self.parse_block()?;
        Ok(Node::While {
            condition: Box::new(condition),
            body,
        })
    }

    fn parse_return(&mut self) -> ParseResult<Node> {
        self.expect(TokenKind::Return)?;
        let value = match self.current().kind {
            TokenKind::Semicolon | TokenKind::Newline | TokenKind::RBrace | TokenKind::Eof => None,
            _ => Some(Box::new(self.parse_expression()?)),
        };
        self.skip_optional(TokenKind::Semicolon);
        Ok(Node::Return(value))
    }

    fn parse_print(&mut self) -> ParseResult<Node> {
        self.expect(TokenKind::Print)?;
        self.expect(TokenKind::LParen)?;
        let value = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        self.skip_optional(TokenKind::Semicolon);
        Ok(Node::Print(Box::new(value)))
    }

    /// `( expr )` as used by `if` and `while`
    fn parse_condition(&mut self) -> ParseResult<Node> {
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        Ok(condition)
    }

    /// `{ stmt* }` with newlines allowed anywhere between statements
    fn parse_block(&mut self) -> ParseResult<Vec<Node>> {
        self.expect(TokenKind::LBrace)?;
        self.skip_newlines();
        let mut body = Vec::new();
        while !self.check(TokenKind::RBrace) {
            body.push(self.parse_statement()?);
            self.skip_newlines();
        }
        self.expect(TokenKind::RBrace)?;
        Ok(body)
    }
}
