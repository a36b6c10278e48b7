//! Syntax-directed translator for pseudocode
//!
//! A recursive descent parser that writes target code as each production is
//! recognised. There is no AST: expressions are translated to strings on the
//! way up and statements go straight into the [`EmitBuffer`]. The symbol
//! table is checked and updated in the same pass.

use std::io::Write;

use tracing::{debug, trace};

use crate::analysis::{ScopeStack, Symbol, SymbolKind, VarType};
use crate::codegen::{Backend, EmitBuffer, ForLoop};
use crate::config::CompileOptions;
use crate::errors::{CompileError, CompileResult, SourceSpan};
use crate::lexer::{Keyword, Lexer, Token, TokenKind};

/// A translated expression
#[derive(Debug)]
struct Expr {
    code: String,
    ty: VarType,
    span: SourceSpan,
}

/// Translates one program for one backend
pub struct Translator<'src, B: Backend> {
    lexer: Lexer<'src>,
    /// Token being looked at
    current: Token<'src>,
    /// One token of lookahead
    peek: Token<'src>,
    backend: B,
    out: EmitBuffer,
    scopes: ScopeStack,
    max_depth: usize,
}

impl<'src, B: Backend> Translator<'src, B> {
    /// Create a translator and prime the two-token window
    pub fn new(source: &'src str, backend: B, options: &CompileOptions) -> CompileResult<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        let peek = lexer.next_token()?;

        Ok(Self {
            lexer,
            current,
            peek,
            backend,
            out: EmitBuffer::new(options.indent_width),
            scopes: ScopeStack::new(),
            max_depth: options.max_depth,
        })
    }

    /// Translate the whole program, returning the generated source
    pub fn translate(mut self) -> CompileResult<String> {
        debug!(target_language = self.backend.language_name(), "translation started");
        self.program()?;
        debug!(
            header_bytes = self.out.header().len(),
            body_bytes = self.out.body().len(),
            "translation finished"
        );
        Ok(self.out.into_string())
    }

    /// Translate the whole program and write it to `sink` in one piece
    ///
    /// Nothing is written if translation fails.
    pub fn translate_to<W: Write>(mut self, sink: &mut W) -> CompileResult<()> {
        debug!(target_language = self.backend.language_name(), "translation started");
        self.program()?;
        self.out.flush(sink)?;
        Ok(())
    }

    // ==================== Helpers ====================

    /// Move the window forward, returning the token that was current
    fn advance(&mut self) -> CompileResult<Token<'src>> {
        let next = self.lexer.next_token()?;
        let consumed = self.current;
        self.current = std::mem::replace(&mut self.peek, next);
        Ok(consumed)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn check_keyword(&self, kw: Keyword) -> bool {
        self.current.kind == TokenKind::Keyword(kw)
    }

    fn unexpected(&self, msg: &str) -> CompileError {
        CompileError::parser(format!("{}, found {}", msg, self.current), self.current.span)
    }

    /// Consume a token of the given kind, otherwise error
    fn expect(&mut self, kind: TokenKind, msg: &str) -> CompileResult<Token<'src>> {
        if self.check(kind) {
            self.advance()
        } else {
            Err(self.unexpected(msg))
        }
    }

    fn expect_keyword(&mut self, kw: Keyword, msg: &str) -> CompileResult<Token<'src>> {
        self.expect(TokenKind::Keyword(kw), msg)
    }

    fn expect_ident(&mut self, msg: &str) -> CompileResult<Token<'src>> {
        self.expect(TokenKind::Ident, msg)
    }

    /// One or more line breaks
    fn nl(&mut self) -> CompileResult<()> {
        self.expect(TokenKind::Newline, "expected end of line")?;
        while self.check(TokenKind::Newline) {
            self.advance()?;
        }
        Ok(())
    }

    /// Run `f` inside a fresh block scope
    ///
    /// The scope is popped whether or not `f` succeeds.
    fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> CompileResult<T>) -> CompileResult<T> {
        if self.scopes.depth() >= self.max_depth {
            return Err(CompileError::parser(
                format!("block nesting too deep (limit is {})", self.max_depth),
                self.current.span,
            ));
        }
        self.scopes.push();
        let result = f(self);
        self.scopes.pop();
        result
    }

    /// Statements up to (not including) one of `terminators`, one level deeper
    fn block(&mut self, opener: Keyword, terminators: &[Keyword]) -> CompileResult<()> {
        self.out.indent += 1;
        let result = self.block_statements(opener, terminators);
        self.out.indent -= 1;
        result
    }

    fn block_statements(&mut self, opener: Keyword, terminators: &[Keyword]) -> CompileResult<()> {
        let mut count = 0usize;
        while !terminators.iter().any(|kw| self.check_keyword(*kw)) {
            if self.check(TokenKind::Eof) {
                let expected: Vec<String> = terminators.iter().map(|kw| format!("'{}'", kw)).collect();
                return Err(self.unexpected(&format!(
                    "expected {} to close {}",
                    expected.join(" or "),
                    opener
                )));
            }
            self.statement()?;
            count += 1;
        }
        if count == 0 {
            self.backend.empty_block(&mut self.out);
        }
        Ok(())
    }

    // ==================== Program & statements ====================

    fn program(&mut self) -> CompileResult<()> {
        self.backend.prologue(&mut self.out);
        self.out.indent += 1;

        while self.check(TokenKind::Newline) {
            self.advance()?;
        }
        while !self.check(TokenKind::Eof) {
            self.statement()?;
        }

        self.backend.exit_statement(&mut self.out);
        self.out.indent -= 1;
        self.backend.close_program(&mut self.out);
        Ok(())
    }

    fn statement(&mut self) -> CompileResult<()> {
        trace!(token = self.current.text, depth = self.scopes.depth(), "statement");

        match self.current.kind {
            TokenKind::Keyword(Keyword::Output) => self.output_stmt()?,
            TokenKind::Keyword(Keyword::Input) => self.input_stmt()?,
            TokenKind::Keyword(Keyword::If) => self.if_stmt()?,
            TokenKind::Keyword(Keyword::While) => self.while_stmt()?,
            TokenKind::Keyword(Keyword::For) => self.for_stmt()?,
            TokenKind::Keyword(Keyword::Repeat) => self.repeat_stmt()?,
            TokenKind::Keyword(Keyword::Declare) => self.declare_stmt()?,
            TokenKind::Keyword(Keyword::Constant) => self.constant_stmt()?,
            TokenKind::Ident => self.assignment()?,
            _ => {
                return Err(CompileError::parser(
                    format!("Invalid statement at {}", self.current),
                    self.current.span,
                ));
            }
        }

        self.nl()
    }

    /// `OUTPUT (STRING | expression)`
    fn output_stmt(&mut self) -> CompileResult<()> {
        self.advance()?;

        if self.check(TokenKind::String) {
            let text = self.advance()?.text;
            self.backend.output_text(&mut self.out, text);
        } else {
            let expr = self.expression()?;
            self.backend.output_expr(&mut self.out, &expr.code);
        }
        Ok(())
    }

    /// `INPUT IDENT`; an unknown name becomes a STRING variable
    fn input_stmt(&mut self) -> CompileResult<()> {
        self.advance()?;
        let target = self.expect_ident("expected identifier after INPUT")?;

        match self.scopes.lookup(target.text).map(|sym| sym.kind) {
            None => {
                self.scopes
                    .define(Symbol::declared(target.text, VarType::String, target.span))?;
                self.backend
                    .input(&mut self.out, target.text, VarType::String, true);
            }
            Some(SymbolKind::Constant(_)) => {
                return Err(CompileError::constant_mutation(target.text, target.span));
            }
            Some(SymbolKind::Declared(ty)) if self.backend.can_read(ty) => {
                self.backend.input(&mut self.out, target.text, ty, false);
            }
            Some(SymbolKind::Declared(ty)) => {
                return Err(CompileError::type_error(
                    format!("Undefined type conversion from STRING to {}", ty),
                    target.span,
                ));
            }
        }
        Ok(())
    }

    /// `IF cmp THEN nl block { ELSE IF cmp THEN nl block } [ ELSE nl block ] ENDIF`
    ///
    /// Every branch is its own scope. `ELSE IF` chains are walked in a loop
    /// so their length does not count against the nesting limit.
    fn if_stmt(&mut self) -> CompileResult<()> {
        self.advance()?;
        let cond = self.comparison()?;
        self.expect_keyword(Keyword::Then, "expected 'THEN' after IF condition")?;
        self.nl()?;

        debug!(depth = self.scopes.depth(), "IF block");
        self.backend.open_if(&mut self.out, &cond);
        self.scoped(|t| t.block(Keyword::If, &[Keyword::Else, Keyword::Endif]))?;

        while self.check_keyword(Keyword::Else) {
            self.advance()?;

            if self.check_keyword(Keyword::If) {
                self.advance()?;
                let cond = self.comparison()?;
                self.expect_keyword(Keyword::Then, "expected 'THEN' after ELSE IF condition")?;
                self.nl()?;

                self.backend.open_else_if(&mut self.out, &cond);
                self.scoped(|t| t.block(Keyword::If, &[Keyword::Else, Keyword::Endif]))?;
            } else {
                self.nl()?;

                self.backend.open_else(&mut self.out);
                self.scoped(|t| t.block(Keyword::Else, &[Keyword::Endif]))?;
                break;
            }
        }

        self.expect_keyword(Keyword::Endif, "expected 'ENDIF' to close IF")?;
        self.backend.close_if(&mut self.out);
        Ok(())
    }

    /// `WHILE cmp nl block ENDWHILE`
    fn while_stmt(&mut self) -> CompileResult<()> {
        self.advance()?;
        let cond = self.comparison()?;
        self.nl()?;

        debug!(depth = self.scopes.depth(), "WHILE block");
        self.backend.open_while(&mut self.out, &cond);
        self.scoped(|t| t.block(Keyword::While, &[Keyword::Endwhile]))?;

        self.expect_keyword(Keyword::Endwhile, "expected 'ENDWHILE' to close WHILE")?;
        self.backend.close_while(&mut self.out);
        Ok(())
    }

    /// `FOR IDENT = expr TO expr [STEP expr] nl block NEXT [IDENT]`
    ///
    /// An undeclared loop variable is declared INTEGER for the loop body
    /// only. The bounds are translated before it becomes visible and, like
    /// the step, must be INTEGER expressions.
    fn for_stmt(&mut self) -> CompileResult<()> {
        self.advance()?;
        let var = self.expect_ident("expected loop variable after FOR")?;

        let declares_var = match self.scopes.lookup(var.text).map(|sym| sym.kind) {
            None => true,
            Some(SymbolKind::Declared(VarType::Integer)) => false,
            Some(SymbolKind::Constant(_)) => {
                return Err(CompileError::constant_mutation(var.text, var.span));
            }
            Some(SymbolKind::Declared(ty)) => {
                return Err(CompileError::type_error(
                    format!("Unable to iterate using type {} ('{}')", ty, var.text),
                    var.span,
                ));
            }
        };

        self.expect(TokenKind::Eq, "expected '=' after loop variable")?;
        let start = self.integer_expression("FOR loop start")?;
        self.expect_keyword(Keyword::To, "expected 'TO' in FOR loop")?;
        let end = self.integer_expression("FOR loop bound")?;
        let step = if self.check_keyword(Keyword::Step) {
            self.advance()?;
            Some(self.integer_expression("FOR loop step")?)
        } else {
            None
        };
        self.nl()?;

        debug!(depth = self.scopes.depth(), var = var.text, "FOR block");
        let header = ForLoop {
            var: var.text,
            start: &start,
            end: &end,
            step: step.as_deref(),
            declares_var,
        };
        self.backend.open_for(&mut self.out, &header);

        self.scoped(|t| {
            if declares_var {
                t.scopes
                    .define(Symbol::declared(var.text, VarType::Integer, var.span))?;
            }
            t.block(Keyword::For, &[Keyword::Next])
        })?;

        self.expect_keyword(Keyword::Next, "expected 'NEXT' to close FOR")?;
        if self.check(TokenKind::Ident) {
            if self.current.text != var.text {
                return Err(CompileError::parser(
                    format!(
                        "NEXT '{}' does not match loop variable '{}'",
                        self.current.text, var.text
                    ),
                    self.current.span,
                ));
            }
            self.advance()?;
        }

        self.backend.close_for(&mut self.out);
        Ok(())
    }

    /// `REPEAT nl block UNTIL cmp`
    ///
    /// The body's scope ends at UNTIL, so the condition only sees names
    /// declared outside the loop.
    fn repeat_stmt(&mut self) -> CompileResult<()> {
        self.advance()?;
        self.nl()?;

        debug!(depth = self.scopes.depth(), "REPEAT block");
        self.backend.open_repeat(&mut self.out);
        self.scoped(|t| t.block(Keyword::Repeat, &[Keyword::Until]))?;

        self.expect_keyword(Keyword::Until, "expected 'UNTIL' to close REPEAT")?;
        let cond = self.comparison()?;
        self.backend.close_repeat(&mut self.out, &cond);
        Ok(())
    }

    /// `DECLARE IDENT : TYPE`
    fn declare_stmt(&mut self) -> CompileResult<()> {
        self.advance()?;
        let name = self.expect_ident("expected identifier after DECLARE")?;
        self.expect(TokenKind::Colon, "expected ':' after declared name")?;

        let type_name = self.expect_ident("expected type name after ':'")?;
        let ty = VarType::parse(type_name.text)
            .ok_or_else(|| CompileError::unknown_type(type_name.text, type_name.span))?;

        self.scopes.define(Symbol::declared(name.text, ty, name.span))?;
        self.backend.declare(&mut self.out, name.text, ty);
        Ok(())
    }

    /// `CONSTANT IDENT = expression`
    fn constant_stmt(&mut self) -> CompileResult<()> {
        self.advance()?;
        let name = self.expect_ident("expected identifier after CONSTANT")?;
        if let Some(existing) = self.scopes.lookup(name.text) {
            return Err(CompileError::redeclaration(name.text, name.span, existing.span));
        }

        self.expect(TokenKind::Eq, "expected '=' after constant name")?;
        let value = self.expression()?;

        self.scopes
            .define(Symbol::constant(name.text, value.ty, name.span))?;
        self.backend.constant(&mut self.out, name.text, &value.code);
        Ok(())
    }

    /// `IDENT = expression`
    fn assignment(&mut self) -> CompileResult<()> {
        let target = self.current;
        match self.scopes.lookup(target.text) {
            None => return Err(CompileError::undeclared(target.text, target.span)),
            Some(sym) if sym.is_constant() => {
                return Err(CompileError::constant_mutation(target.text, target.span));
            }
            Some(_) => {}
        }

        self.advance()?;
        self.expect(TokenKind::Eq, "expected '=' in assignment")?;
        let value = self.expression()?;
        self.backend.assign(&mut self.out, target.text, &value.code);
        Ok(())
    }

    // ==================== Expressions ====================

    /// `expression comparisonOp expression`, exactly one operator
    fn comparison(&mut self) -> CompileResult<String> {
        let left = self.expression()?;

        if !self.current.kind.is_comparison() {
            return Err(self.unexpected("Expected comparison operator"));
        }
        let op = self.advance()?.text;
        let right = self.expression()?;

        if self.current.kind.is_comparison() {
            return Err(self.unexpected("comparison operators cannot be chained"));
        }

        Ok(format!("{} {} {}", left.code, op, right.code))
    }

    /// An expression that has to evaluate to INTEGER
    fn integer_expression(&mut self, what: &str) -> CompileResult<String> {
        let expr = self.expression()?;
        if expr.ty != VarType::Integer {
            return Err(CompileError::type_error(
                format!("{} must be INTEGER, found {}", what, expr.ty),
                expr.span,
            ));
        }
        Ok(expr.code)
    }

    /// `term { ('+' | '-') term }`
    fn expression(&mut self) -> CompileResult<Expr> {
        let mut expr = self.term()?;

        while self.check(TokenKind::Plus) || self.check(TokenKind::Minus) {
            let op = self.advance()?;
            let rhs = self.term()?;
            expr = binary(expr, op, rhs);
        }
        Ok(expr)
    }

    /// `unary { ('*' | '/') unary }`
    fn term(&mut self) -> CompileResult<Expr> {
        let mut expr = self.unary()?;

        while self.check(TokenKind::Star) || self.check(TokenKind::Slash) {
            let op = self.advance()?;
            let rhs = self.unary()?;
            expr = binary(expr, op, rhs);
        }
        Ok(expr)
    }

    /// `['+' | '-'] primary`
    fn unary(&mut self) -> CompileResult<Expr> {
        if self.check(TokenKind::Plus) || self.check(TokenKind::Minus) {
            let sign = self.advance()?;
            let operand = self.primary()?;
            return Ok(Expr {
                code: format!("{}{}", sign.text, operand.code),
                ty: operand.ty,
                span: SourceSpan::new(sign.span.start, operand.span.end),
            });
        }
        self.primary()
    }

    /// `NUMBER | IDENT`; TRUE and FALSE are always boolean literals
    fn primary(&mut self) -> CompileResult<Expr> {
        let token = self.current;
        let (code, ty) = match token.kind {
            TokenKind::Number => {
                let ty = if token.text.contains('.') {
                    VarType::Real
                } else {
                    VarType::Integer
                };
                (number_literal(token.text), ty)
            }
            TokenKind::Ident => match token.text {
                "TRUE" => (self.backend.bool_literal(true).to_string(), VarType::Boolean),
                "FALSE" => (self.backend.bool_literal(false).to_string(), VarType::Boolean),
                name => match self.scopes.lookup(name) {
                    Some(sym) => (name.to_string(), sym.var_type()),
                    None => return Err(CompileError::undeclared(name, token.span)),
                },
            },
            _ => return Err(self.unexpected("Unexpected token in expression")),
        };
        self.advance()?;
        Ok(Expr {
            code,
            ty,
            span: token.span,
        })
    }
}

/// Join two operands; `/` always yields REAL, other numeric operators stay
/// INTEGER only when both sides are
fn binary(lhs: Expr, op: Token<'_>, rhs: Expr) -> Expr {
    let ty = match (lhs.ty, rhs.ty) {
        (VarType::Integer, VarType::Integer) if op.kind != TokenKind::Slash => VarType::Integer,
        (VarType::Integer | VarType::Real, VarType::Integer | VarType::Real) => VarType::Real,
        (other, _) => other,
    };
    Expr {
        code: format!("{} {} {}", lhs.code, op.text, rhs.code),
        ty,
        span: SourceSpan::new(lhs.span.start, rhs.span.end),
    }
}

/// Drop redundant leading zeros so `007` is neither a Python syntax error
/// nor a C++ octal literal
fn number_literal(text: &str) -> String {
    let (int_part, frac) = match text.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (text, None),
    };
    let trimmed = int_part.trim_start_matches('0');
    let int_part = if trimmed.is_empty() { "0" } else { trimmed };
    match frac {
        Some(frac) => format!("{}.{}", int_part, frac),
        None => int_part.to_string(),
    }
}
