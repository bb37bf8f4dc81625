//! Recursive-descent parser for Codex
//!
//! The parser works on the fully materialized token sequence produced by the
//! [`lexer`]. It uses one token of lookahead plus an explicit [`Parser::peek`]
//! to tell assignments (`name = ...`) from expression statements.
//!
//! There is no error recovery: the first mismatch aborts the parse with a
//! [`ParseError`].

use crate::ast::Program;

pub mod errors;
mod expressions;
pub mod lexer;
mod statements;
pub mod token;

pub use errors::{Expected, LexError, ParseError};
pub use lexer::{LexMode, Lexer};
pub use token::{Token, TokenKind};

pub type ParseResult<T> = Result<T, ParseError>;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let (line, column) = tokens
                .last()
                .map(|t| (t.line, t.column + t.lexeme.chars().count()))
                .unwrap_or((1, 1));
            tokens.push(Token::new(TokenKind::Eof, "", line, column));
        }
        Parser { tokens, pos: 0 }
    }

    /// Parse the whole token sequence into a [`Program`]
    pub fn parse(mut self) -> ParseResult<Program> {
        let mut statements = Vec::new();
        self.skip_newlines();
        while !self.check(TokenKind::Eof) {
            statements.push(self.parse_statement()?);
            self.skip_newlines();
        }
        Ok(Program { statements })
    }

    fn current(&self) -> &Token {
        // `new` guarantees a trailing EOF token
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &Token {
        &self.tokens[(self.pos + 1).min(self.tokens.len() - 1)]
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Consume a token of `kind` or fail with the token actually found
    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        let token = self.current().clone();
        if token.kind != kind {
            return Err(ParseError::UnexpectedToken {
                expected: Expected::Token(kind),
                found: token.kind,
                line: token.line,
                column: token.column,
            });
        }
        self.advance();
        Ok(token)
    }

    fn skip_optional(&mut self, kind: TokenKind) {
        if self.check(kind) {
            self.advance();
        }
    }

    fn skip_newlines(&mut self) {
        while self.check(TokenKind::Newline) {
            self.advance();
        }
    }
}

/// Parse an already tokenized program
pub fn parse(tokens: Vec<Token>) -> ParseResult<Program> {
    Parser::new(tokens).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, FunctionDef, Node, UnaryOp};

    fn parse_str(source: &str) -> ParseResult<Program> {
        parse(lexer::tokenize(source, LexMode::Lenient).unwrap())
    }

    fn num(n: f64) -> Box<Node> {
        Box::new(Node::Number(n))
    }

    fn ident(name: &str) -> Box<Node> {
        Box::new(Node::Identifier(name.to_string()))
    }

    #[test]
    fn test_let_assignment() {
        let program = parse_str("let x = 10").unwrap();
        assert_eq!(
            program.statements,
            vec![Node::Assignment {
                name: "x".to_string(),
                value: num(10.0)
            }]
        );
    }

    #[test]
    fn test_bare_assignment_uses_peek() {
        let program = parse_str("x = 1\nx").unwrap();
        assert!(matches!(program.statements[0], Node::Assignment { .. }));
        assert_eq!(program.statements[1], Node::Identifier("x".to_string()));
    }

    #[test]
    fn test_precedence_multiplicative_binds_tighter() {
        let program = parse_str("1 + 2 * 3").unwrap();
        assert_eq!(
            program.statements[0],
            Node::BinaryOp {
                left: num(1.0),
                op: BinaryOp::Add,
                right: Box::new(Node::BinaryOp {
                    left: num(2.0),
                    op: BinaryOp::Mul,
                    right: num(3.0),
                }),
            }
        );
    }

    #[test]
    fn test_comparison_is_lowest_and_left_associative() {
        let program = parse_str("a - b - c < d").unwrap();
        let Node::BinaryOp { left, op, right } = &program.statements[0] else {
            panic!("expected binary op");
        };
        assert_eq!(*op, BinaryOp::Less);
        assert_eq!(right, &ident("d"));
        assert_eq!(
            **left,
            Node::BinaryOp {
                left: Box::new(Node::BinaryOp {
                    left: ident("a"),
                    op: BinaryOp::Sub,
                    right: ident("b"),
                }),
                op: BinaryOp::Sub,
                right: ident("c"),
            }
        );
    }

    #[test]
    fn test_nested_unary() {
        let program = parse_str("- -x").unwrap();
        assert_eq!(
            program.statements[0],
            Node::UnaryOp {
                op: UnaryOp::Minus,
                operand: Box::new(Node::UnaryOp {
                    op: UnaryOp::Minus,
                    operand: ident("x"),
                }),
            }
        );
    }

    #[test]
    fn test_parenthesized_expression() {
        let program = parse_str("(1 + 2) * 3").unwrap();
        let Node::BinaryOp { left, op, .. } = &program.statements[0] else {
            panic!("expected binary op");
        };
        assert_eq!(*op, BinaryOp::Mul);
        assert!(matches!(**left, Node::BinaryOp { op: BinaryOp::Add, .. }));
    }

    #[test]
    fn test_function_definition() {
        let program = parse_str("func add(a, b) {\n  return a + b\n}").unwrap();
        assert_eq!(
            program.statements[0],
            Node::FunctionDef(FunctionDef {
                name: "add".to_string(),
                parameters: vec!["a".to_string(), "b".to_string()],
                body: vec![Node::Return(Some(Box::new(Node::BinaryOp {
                    left: ident("a"),
                    op: BinaryOp::Add,
                    right: ident("b"),
                })))],
            })
        );
    }

    #[test]
    fn test_call_with_arguments() {
        let program = parse_str("f(1, \"two\", x)").unwrap();
        assert_eq!(
            program.statements[0],
            Node::Call {
                name: "f".to_string(),
                arguments: vec![
                    Node::Number(1.0),
                    Node::String("two".to_string()),
                    Node::Identifier("x".to_string()),
                ],
            }
        );
    }

    #[test]
    fn test_if_else() {
        let program = parse_str("if (x > 1) { print(1) } else { print(2) }").unwrap();
        let Node::If { then_body, else_body, .. } = &program.statements[0] else {
            panic!("expected if");
        };
        assert_eq!(then_body.len(), 1);
        assert_eq!(else_body.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_if_without_else() {
        let program = parse_str("if (x) {\n}\n").unwrap();
        assert!(matches!(
            &program.statements[0],
            Node::If { else_body: None, then_body, .. } if then_body.is_empty()
        ));
    }

    #[test]
    fn test_while_loop() {
        let program = parse_str("while (i < 3) {\n  i = i + 1\n}").unwrap();
        assert!(matches!(&program.statements[0], Node::While { body, .. } if body.len() == 1));
    }

    #[test]
    fn test_bare_return() {
        let program = parse_str("func f() { return }").unwrap();
        let Node::FunctionDef(def) = &program.statements[0] else {
            panic!("expected function");
        };
        assert_eq!(def.body, vec![Node::Return(None)]);
    }

    #[test]
    fn test_semicolons_separate_statements() {
        let program = parse_str("let a = 1; let b = 2; print(a);").unwrap();
        assert_eq!(program.statements.len(), 3);
    }

    #[test]
    fn test_statement_count_matches_top_level() {
        let source = "\n\nlet x = 1\n\nfunc f() {\n  let y = 2\n  y\n}\nprint(f())\n\n";
        assert_eq!(parse_str(source).unwrap().statements.len(), 3);
    }

    #[test]
    fn test_missing_paren_reports_expected_and_found() {
        let err = parse_str("print(1").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: Expected::Token(TokenKind::RParen),
                found: TokenKind::Eof,
                line: 1,
                column: 8,
            }
        );
    }

    #[test]
    fn test_else_on_next_line_is_rejected() {
        let err = parse_str("if (x) { 1 }\nelse { 2 }").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: Expected::Expression,
                found: TokenKind::Else,
                line: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_number() {
        let err = parse_str("let x = 1.2.3").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { ref lexeme, .. } if lexeme == "1.2.3"));
    }

    #[test]
    fn test_dangling_operator() {
        assert!(parse_str("1 +").is_err());
    }

    #[test]
    fn test_empty_program() {
        assert!(parse_str("").unwrap().statements.is_empty());
        assert!(parse(Vec::new()).unwrap().statements.is_empty());
    }
}
