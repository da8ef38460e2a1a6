// Hand-rolled recursive descent parser for date expressions.
//
// prog     = { def [";"] } ["aprox"] body [";"]
// def      = "def" IDENT ":" body
// body     = logic | expr
// logic    = "si" expr "es" cmp expr "entonces" expr "si no" expr
// expr     = term { ("y" | ",") term }
// term     = period | relative | primary
// period   = ("de" | "desde") term ("a" | "hasta") term
// relative = ["dia"] [days] [quals | unit] ("de" | "antes de" | "despues de" | "proximo a") term
// primary  = month | anchor | IDENT | "(" expr ")"

use jiff::civil::Weekday;

use crate::anchor::AnchorKind;
use crate::ast::*;
use crate::dateset::{CompareOp, TimeUnit};
use crate::error::{ExprError, Span};
use crate::lexer::{Token, TokenKind};

/// Parser state: consumes a slice of tokens.
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    input: &'a str,
}

/// What sits between the day list and the connective of a relative term.
enum Head {
    Weekdays(Vec<Weekday>),
    Weekend,
    Week,
    Fortnight,
    DayUnit,
    MonthUnit,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], input: &'a str) -> Self {
        Self {
            tokens,
            pos: 0,
            input,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn peek_kind_at(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn current_span(&self) -> Span {
        if let Some(tok) = self.peek() {
            tok.span
        } else if let Some(last) = self.tokens.last() {
            Span::new(last.span.end, last.span.end)
        } else {
            Span::new(0, 0)
        }
    }

    fn error(&self, message: String, span: Span) -> ExprError {
        ExprError::parse(message, span, self.input)
    }

    fn error_at_end(&self, message: String) -> ExprError {
        let span = if let Some(last) = self.tokens.last() {
            Span::new(last.span.end, last.span.end)
        } else {
            Span::new(0, 0)
        };
        ExprError::parse(message, span, self.input)
    }

    fn consume_kind(
        &mut self,
        expected: &str,
        check: impl Fn(&TokenKind) -> bool,
    ) -> Result<&Token, ExprError> {
        let span = self.current_span();
        match self.peek() {
            Some(tok) if check(&tok.kind) => {
                let idx = self.pos;
                self.pos += 1;
                Ok(&self.tokens[idx])
            }
            Some(tok) => Err(self.error(format!("expected {expected}, got {:?}", tok.kind), span)),
            None => Err(self.error_at_end(format!("expected {expected}"))),
        }
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    // --- Grammar productions ---

    fn parse_program(&mut self) -> Result<Program, ExprError> {
        let mut approximate = self.eat(&TokenKind::Approx);

        let mut defs = Vec::new();
        while matches!(self.peek_kind(), Some(TokenKind::Def)) {
            defs.push(self.parse_def()?);
            self.eat(&TokenKind::Semicolon);
        }

        if self.eat(&TokenKind::Approx) {
            approximate = true;
        }
        let body = self.parse_body()?;
        self.eat(&TokenKind::Semicolon);

        Ok(Program {
            defs,
            body,
            approximate,
        })
    }

    // def = "def" IDENT ":" body
    fn parse_def(&mut self) -> Result<Definition, ExprError> {
        self.advance();
        let span = self.current_span();
        let name = match self.peek_kind() {
            Some(TokenKind::Ident(name)) => name.clone(),
            Some(other) => {
                return Err(self.error(format!("expected a name after 'def', got {other:?}"), span))
            }
            None => return Err(self.error_at_end("expected a name after 'def'".into())),
        };
        self.advance();
        self.consume_kind("':'", |k| matches!(k, TokenKind::Colon))?;
        let body = self.parse_body()?;
        Ok(Definition { name, body })
    }

    fn parse_body(&mut self) -> Result<Body, ExprError> {
        if matches!(self.peek_kind(), Some(TokenKind::If)) {
            Ok(Body::Logic(Box::new(self.parse_logic()?)))
        } else {
            Ok(Body::Expr(self.parse_expr()?))
        }
    }

    // logic = "si" expr "es" cmp expr "entonces" expr "si no" expr
    fn parse_logic(&mut self) -> Result<Logic, ExprError> {
        self.advance();
        let left = self.parse_expr()?;
        self.consume_kind("'es'", |k| matches!(k, TokenKind::Is))?;
        let op = self.parse_cmp()?;
        let right = self.parse_expr()?;
        self.consume_kind("'entonces'", |k| matches!(k, TokenKind::Then))?;
        let then = self.parse_expr()?;
        self.consume_kind("'si no'", |k| matches!(k, TokenKind::Else))?;
        let otherwise = self.parse_expr()?;
        Ok(Logic {
            left,
            op,
            right,
            then,
            otherwise,
        })
    }

    // cmp = "igual" ["a"]
    //     | ("mayor" | "posterior") ["que" | "a"]
    //     | ("menor" | "anterior") ["que" | "a"]
    fn parse_cmp(&mut self) -> Result<CompareOp, ExprError> {
        let tok = self.consume_kind("'igual', 'mayor' or 'menor'", |k| {
            matches!(k, TokenKind::Equal | TokenKind::Greater | TokenKind::Lesser)
        })?;
        let op = match tok.kind {
            TokenKind::Equal => CompareOp::Equals,
            TokenKind::Greater => CompareOp::Greater,
            _ => CompareOp::Lesser,
        };
        if !self.eat(&TokenKind::To) {
            self.eat(&TokenKind::That);
        }
        Ok(op)
    }

    // expr = term { ("y" | ",") term }
    fn parse_expr(&mut self) -> Result<Expr, ExprError> {
        let mut items = vec![self.parse_term()?];
        while matches!(self.peek_kind(), Some(TokenKind::And | TokenKind::Comma)) {
            self.advance();
            items.push(self.parse_term()?);
        }
        if items.len() == 1 {
            Ok(items.remove(0))
        } else {
            Ok(Expr::Union(items))
        }
    }

    fn parse_term(&mut self) -> Result<Expr, ExprError> {
        match self.peek_kind() {
            Some(TokenKind::Of | TokenKind::From) => self.parse_period(),
            Some(
                TokenKind::LParen
                | TokenKind::MonthName(_)
                | TokenKind::Anchor(_)
                | TokenKind::Ident(_),
            ) => self.parse_primary(),
            _ => self.parse_relative(),
        }
    }

    // period = ("de" | "desde") term ("a" | "hasta") term
    fn parse_period(&mut self) -> Result<Expr, ExprError> {
        self.advance();
        let from = self.parse_term()?;
        self.consume_kind("'a' or 'hasta'", |k| matches!(k, TokenKind::To))?;
        let to = self.parse_term()?;
        Ok(Expr::Period {
            from: Box::new(from),
            to: Box::new(to),
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, ExprError> {
        let span = self.current_span();
        let Some(kind) = self.advance().map(|t| t.kind.clone()) else {
            return Err(self.error_at_end("expected a date expression".into()));
        };
        match kind {
            TokenKind::MonthName(m) => Ok(Expr::Anchor(AnchorKind::Month(m))),
            TokenKind::Anchor(a) => Ok(Expr::Anchor(a)),
            TokenKind::Ident(name) => Ok(Expr::Ident { name, span }),
            TokenKind::LParen => {
                let inner = self.parse_expr()?;
                self.consume_kind("')'", |k| matches!(k, TokenKind::RParen))?;
                Ok(inner)
            }
            other => Err(self.error(format!("expected a date expression, got {other:?}"), span)),
        }
    }

    // relative = ["dia"] [days] [quals | unit] connective term
    fn parse_relative(&mut self) -> Result<Expr, ExprError> {
        let start = self.current_span();

        // "dia 5 de mayo"
        if matches!(self.peek_kind(), Some(TokenKind::Day))
            && self.peek_kind_at(1).is_some_and(is_day_literal)
        {
            self.advance();
        }

        let days = self.parse_day_list()?;
        let head = self.parse_head();

        let span = self.current_span();
        match self.peek_kind() {
            Some(TokenKind::Of) => {
                self.advance();
                let target = Box::new(self.parse_term()?);
                self.build_at(days, head, target, start)
            }
            Some(TokenKind::Before | TokenKind::After) => {
                let direction = if matches!(self.peek_kind(), Some(TokenKind::Before)) {
                    Direction::Before
                } else {
                    Direction::After
                };
                self.advance();
                self.consume_kind("'de'", |k| matches!(k, TokenKind::Of))?;
                let target = Box::new(self.parse_term()?);
                self.build_shift(direction, days, head, target, start)
            }
            Some(TokenKind::Near) => {
                self.advance();
                self.consume_kind("'a' or 'de'", |k| {
                    matches!(k, TokenKind::To | TokenKind::Of)
                })?;
                let target = Box::new(self.parse_term()?);
                self.build_near(days, head, target, start)
            }
            Some(other) => Err(self.error(
                format!("expected 'de', 'antes', 'despues' or 'proximo', got {other:?}"),
                span,
            )),
            None => Err(self.error_at_end("expected 'de', 'antes', 'despues' or 'proximo'".into())),
        }
    }

    // days = day { ("y" | ",") day }
    fn parse_day_list(&mut self) -> Result<Vec<DayIndex>, ExprError> {
        let mut days = Vec::new();
        while let Some(kind) = self.peek_kind() {
            let span = self.current_span();
            let day = match kind {
                TokenKind::Number(n) => i32::try_from(*n)
                    .map_err(|_| self.error(format!("day number {n} is too large"), span))?,
                TokenKind::Ordinal(n) => i32::from(*n),
                TokenKind::Last | TokenKind::Yesterday => -1,
                TokenKind::Prelast => -2,
                _ => break,
            };
            self.advance();
            days.push(day);

            if matches!(self.peek_kind(), Some(TokenKind::And | TokenKind::Comma))
                && self.peek_kind_at(1).is_some_and(is_day_literal)
            {
                self.advance();
            } else {
                break;
            }
        }
        Ok(days)
    }

    fn parse_head(&mut self) -> Option<Head> {
        if matches!(self.peek_kind(), Some(TokenKind::Weekday(_))) {
            return Some(Head::Weekdays(self.parse_weekday_list()));
        }
        let head = match self.peek_kind()? {
            TokenKind::WeekEnd => Head::Weekend,
            TokenKind::Week => Head::Week,
            TokenKind::Fortnight => Head::Fortnight,
            TokenKind::Day => Head::DayUnit,
            TokenKind::Month => Head::MonthUnit,
            _ => return None,
        };
        self.advance();
        Some(head)
    }

    fn parse_weekday_list(&mut self) -> Vec<Weekday> {
        let mut weekdays = Vec::new();
        while let Some(TokenKind::Weekday(wd)) = self.peek_kind() {
            weekdays.push(*wd);
            self.advance();
            if matches!(self.peek_kind(), Some(TokenKind::And | TokenKind::Comma))
                && matches!(self.peek_kind_at(1), Some(TokenKind::Weekday(_)))
            {
                self.advance();
            } else {
                break;
            }
        }
        weekdays
    }

    fn build_at(
        &self,
        days: Vec<DayIndex>,
        head: Option<Head>,
        target: Box<Expr>,
        start: Span,
    ) -> Result<Expr, ExprError> {
        let qualifiers = match head {
            None | Some(Head::DayUnit) if days.is_empty() => {
                return Err(self.error(
                    "expected a day or a day qualifier before 'de'".into(),
                    start,
                ))
            }
            None | Some(Head::DayUnit) => Vec::new(),
            Some(Head::MonthUnit) => {
                return Err(self.error(
                    "'mes' cannot select dates; name the month instead".into(),
                    start,
                ))
            }
            Some(Head::Weekdays(wds)) => wds.into_iter().map(DayQualifier::Weekday).collect(),
            Some(Head::Weekend) => vec![DayQualifier::Weekend],
            Some(Head::Week) => vec![DayQualifier::Week],
            Some(Head::Fortnight) => vec![DayQualifier::Fortnight],
        };
        Ok(Expr::At {
            days,
            qualifiers,
            target,
        })
    }

    fn build_shift(
        &self,
        direction: Direction,
        days: Vec<DayIndex>,
        head: Option<Head>,
        target: Box<Expr>,
        start: Span,
    ) -> Result<Expr, ExprError> {
        if days.len() > 1 {
            return Err(self.error(
                "expected a single amount before 'antes' or 'despues'".into(),
                start,
            ));
        }
        let amount = days.first().copied();
        let step = match head {
            None | Some(Head::DayUnit) => Step::Unit(TimeUnit::Days),
            Some(Head::Week) => Step::Unit(TimeUnit::Weeks),
            Some(Head::MonthUnit) => Step::Unit(TimeUnit::Months),
            Some(Head::Weekend) => Step::Weekend,
            Some(Head::Weekdays(wds)) if wds.len() == 1 => Step::Weekday(wds[0]),
            Some(Head::Weekdays(_)) => {
                return Err(self.error(
                    "expected a single weekday before 'antes' or 'despues'".into(),
                    start,
                ))
            }
            Some(Head::Fortnight) => {
                return Err(self.error(
                    "'quincena' cannot be used with 'antes' or 'despues'".into(),
                    start,
                ))
            }
        };
        Ok(Expr::Shift {
            direction,
            amount,
            step,
            target,
        })
    }

    fn build_near(
        &self,
        days: Vec<DayIndex>,
        head: Option<Head>,
        target: Box<Expr>,
        start: Span,
    ) -> Result<Expr, ExprError> {
        if !days.is_empty() {
            return Err(self.error("'proximo' does not take an ordinal".into(), start));
        }
        let to = match head {
            Some(Head::Weekdays(wds)) if wds.len() == 1 => NearTo::Weekday(wds[0]),
            Some(Head::Weekend) => NearTo::Weekend,
            _ => {
                return Err(self.error(
                    "expected a single weekday or 'fin de semana' before 'proximo'".into(),
                    start,
                ))
            }
        };
        Ok(Expr::Near { to, target })
    }
}

fn is_day_literal(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Number(_)
            | TokenKind::Ordinal(_)
            | TokenKind::Last
            | TokenKind::Yesterday
            | TokenKind::Prelast
    )
}

/// Parse a date expression into its syntax tree.
pub fn parse(input: &str) -> Result<Program, ExprError> {
    let mut lexer = crate::lexer::Lexer::new(input);
    let tokens = lexer.tokenize()?;

    if tokens.is_empty() {
        return Err(ExprError::parse("empty expression", Span::new(0, 0), input));
    }

    let mut parser = Parser::new(&tokens, input);
    let program = parser.parse_program()?;

    // Ensure all tokens consumed
    if parser.peek().is_some() {
        let span = parser.current_span();
        return Err(ExprError::parse(
            "unexpected tokens after expression",
            span,
            input,
        ));
    }

    Ok(program)
}
