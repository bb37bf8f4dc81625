//! Expression parsing, one method per precedence level
//!
//! comparison (`== != < >`) < additive (`+ -`) < multiplicative (`* /`)
//! < unary (`+ -`) < primary

use super::errors::{Expected, ParseError};
use super::token::TokenKind;
use super::{ParseResult, Parser};
use crate::ast::{BinaryOp, Node, UnaryOp};

impl Parser {
    pub(super) fn parse_expression(&mut self) -> ParseResult<Node> {
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> ParseResult<Node> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.current().kind {
                TokenKind::EqualEqual => BinaryOp::Eq,
                TokenKind::BangEqual => BinaryOp::NotEq,
                TokenKind::Less => BinaryOp::Less,
                TokenKind::Greater => BinaryOp::Greater,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_additive()?;
            left = binary(left, op, right);
        }
    }

    fn parse_additive(&mut self) -> ParseResult<Node> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = binary(left, op, right);
        }
    }

    fn parse_multiplicative(&mut self) -> ParseResult<Node> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_unary()?;
            left = binary(left, op, right);
        }
    }

    fn parse_unary(&mut self) -> ParseResult<Node> {
        let op = match self.current().kind {
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Minus => UnaryOp::Minus,
            _ => return self.parse_primary(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        Ok(Node::UnaryOp {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_primary(&mut self) -> ParseResult<Node> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Number => {
                self.advance();
                token
                    .lexeme
                    .parse::<f64>()
                    .map(Node::Number)
                    .map_err(|_| ParseError::InvalidNumber {
                        lexeme: token.lexeme.clone(),
                        line: token.line,
                        column: token.column,
                    })
            }
            TokenKind::String => {
                self.advance();
                Ok(Node::String(token.lexeme))
            }
            TokenKind::Identifier => {
                self.advance();
                if !self.check(TokenKind::LParen) {
                    return Ok(Node::Identifier(token.lexeme));
                }
                self.advance();
                let mut arguments = Vec::new();
                while !self.check(TokenKind::RParen) {
                    arguments.push(self.parse_expression()?);
                    self.skip_optional(TokenKind::Comma);
                }
                self.expect(TokenKind::RParen)?;
                Ok(Node::Call {
                    name: token.lexeme,
                    arguments,
                })
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            found => Err(ParseError::UnexpectedToken {
                expected: Expected::Expression,
                found,
                line: token.line,
                column: token.column,
            }),
        }
    }
}

fn binary(left: Node, op: BinaryOp, right: Node) -> Node {
    Node::BinaryOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}
