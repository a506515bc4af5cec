use lazy_static::lazy_static;

use crate::{
    config::CompileOptions,
    error::{ParseErrorKind, Production, ProtoError},
    symbols::SymbolTable,
    tokenizer::{Token, TokenKind},
    types::{Element, ElementKind, Message, Schema},
};

lazy_static! {
    static ref END_OF_INPUT: Token = Token::end_of_input();
}

/// Recursive descent over a token slice with one token of lookahead.
///
/// Messages enter the symbol table as soon as their closing brace is
/// consumed, so a field can only name a message declared above it.
struct Parser<'a> {
    tokens:  &'a [Token],
    index:   usize,
    options: &'a CompileOptions,
    symbols: SymbolTable,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], options: &'a CompileOptions) -> Self {
        Parser {
            tokens,
            index: 0,
            options,
            symbols: SymbolTable::new(),
        }
    }

    /// Past the end of the slice the lookahead is a synthetic end-of-input token.
    fn peek(&self) -> &'a Token {
        self.tokens.get(self.index).unwrap_or(&*END_OF_INPUT)
    }

    fn advance(&mut self) -> &'a Token {
        let token = self.peek();
        self.index += 1;
        token
    }

    fn unexpected(&self, production: Production) -> ProtoError {
        let token = self.peek();
        let reason = if token.kind == TokenKind::EndOfInput {
            ParseErrorKind::UnexpectedEof
        } else {
            ParseErrorKind::UnexpectedToken
        };
        ProtoError::parse(reason, token, production)
    }

    fn eat_reserved(&mut self, word: &str) -> bool {
        if self.peek().is_reserved(word) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn expect_reserved(&mut self, word: &str, production: Production) -> Result<(), ProtoError> {
        if self.eat_reserved(word) {
            Ok(())
        } else {
            Err(self.unexpected(production))
        }
    }

    fn eat_end_of_input(&mut self) -> bool {
        if self.peek().kind == TokenKind::EndOfInput {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn expect_identifier(&mut self, production: Production) -> Result<&'a Token, ProtoError> {
        if self.peek().kind == TokenKind::Identifier {
            Ok(self.advance())
        } else {
            Err(self.unexpected(production))
        }
    }

    fn expect_number(&mut self, production: Production) -> Result<&'a Token, ProtoError> {
        if self.peek().kind == TokenKind::Number {
            Ok(self.advance())
        } else {
            Err(self.unexpected(production))
        }
    }

    /// package := "package" IDENT ";"
    fn parse_package(&mut self) -> Result<String, ProtoError> {
        self.expect_reserved("package", Production::Package)?;
        let name = self.expect_identifier(Production::Package)?;
        self.expect_reserved(";", Production::Package)?;
        Ok(name.content.clone())
    }

    /// type := IDENT (already defined message) | primitive keyword
    fn parse_type(&mut self) -> Result<ElementKind, ProtoError> {
        let token = self.peek();
        let kind = match token.kind {
            TokenKind::Identifier if self.symbols.contains(&token.content) => {
                Some(ElementKind::Custom(token.content.clone()))
            }
            TokenKind::Reserved => ElementKind::from_primitive(&token.content),
            _ => None,
        };
        match kind {
            Some(kind) => {
                self.index += 1;
                Ok(kind)
            }
            None if token.kind == TokenKind::EndOfInput => Err(self.unexpected(Production::Type)),
            None => Err(ProtoError::parse(ParseErrorKind::UnknownType, token, Production::Type)),
        }
    }

    /// element := "repeated"? type IDENT ( "=" NUMBER )? ";"
    fn parse_element(&mut self) -> Result<Element, ProtoError> {
        let repeated = self.eat_reserved("repeated");
        let kind = self.parse_type()?;
        let identifier = self.expect_identifier(Production::Element)?;
        // The tag is accepted for compatibility and otherwise ignored.
        if self.eat_reserved("=") {
            self.expect_number(Production::Element)?;
        }
        self.expect_reserved(";", Production::Element)?;
        Ok(Element::new(identifier.content.clone(), kind, repeated))
    }

    /// message := "message" IDENT "{" element* "}"
    fn parse_message(&mut self) -> Result<(), ProtoError> {
        self.expect_reserved("message", Production::Message)?;
        let name = self.expect_identifier(Production::Message)?;
        if !self.options.allow_redefinition && self.symbols.contains(&name.content) {
            return Err(ProtoError::parse(
                ParseErrorKind::DuplicateMessage,
                name,
                Production::Message,
            ));
        }
        self.expect_reserved("{", Production::Message)?;

        let mut elements = Vec::new();
        while !self.eat_reserved("}") {
            elements.push(self.parse_element()?);
        }

        tracing::debug!(name = %name.content, elements = elements.len(), "parsed message");
        let message = Message {
            identifier: name.content.clone(),
            elements,
        };
        if self.symbols.insert(message).is_some() {
            tracing::warn!(name = %name.content, line = name.line, "message redefined; keeping the later definition");
        }
        Ok(())
    }

    /// schema := package message+ EOF
    fn parse_schema(mut self) -> Result<Schema, ProtoError> {
        let package = self.parse_package()?;
        self.parse_message()?;
        while !self.eat_end_of_input() {
            if !self.peek().is_reserved("message") {
                return Err(self.unexpected(Production::Schema));
            }
            self.parse_message()?;
        }
        Ok(Schema {
            package,
            messages: self.symbols,
        })
    }
}

/// Parses a token sequence with default options.
pub fn parse_schema(tokens: &[Token]) -> Result<Schema, ProtoError> {
    parse_schema_with(tokens, &CompileOptions::default())
}

pub fn parse_schema_with(tokens: &[Token], options: &CompileOptions) -> Result<Schema, ProtoError> {
    Parser::new(tokens, options).parse_schema()
}
