use jiff::civil::Weekday;

use crate::anchor::AnchorKind;
use crate::dateset::{CompareOp, TimeUnit};
use crate::error::Span;

/// A parsed date expression: definitions followed by the expression whose
/// value is the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub defs: Vec<Definition>,
    pub body: Body,
    /// `aprox` prefix on the result.
    pub approximate: bool,
}

/// `def nombre: cuerpo`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub name: String,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Expr(Expr),
    Logic(Box<Logic>),
}

/// `si A es igual a B entonces P si no Q`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logic {
    pub left: Expr,
    pub op: CompareOp,
    pub right: Expr,
    pub then: Expr,
    pub otherwise: Expr,
}

/// Day literal inside an ordinal list. Negative values count from the end.
pub type DayIndex = i32;

/// What an ordinal list counts over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayQualifier {
    Weekday(Weekday),
    Weekend,
    Week,
    Fortnight,
}

/// Step of a relative shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// `3 dias antes de`, `2 semanas despues de`
    Unit(TimeUnit),
    /// `lunes antes de`
    Weekday(Weekday),
    /// `fin de semana despues de`
    Weekend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Before,
    After,
}

/// Target of `proximo a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NearTo {
    Weekday(Weekday),
    Weekend,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Month or movable feast.
    Anchor(AnchorKind),
    /// Reference to a `def`.
    Ident { name: String, span: Span },
    /// `A y B y C`
    Union(Vec<Expr>),
    /// `de A a B`
    Period { from: Box<Expr>, to: Box<Expr> },
    /// `primer y tercer lunes de X`, `ultima semana de X`, `15 de X`
    At {
        days: Vec<DayIndex>,
        qualifiers: Vec<DayQualifier>,
        target: Box<Expr>,
    },
    /// `3 dias antes de X`, `segundo lunes despues de X`
    Shift {
        direction: Direction,
        /// Explicit amount; one when absent.
        amount: Option<DayIndex>,
        step: Step,
        target: Box<Expr>,
    },
    /// `jueves proximo a X`
    Near { to: NearTo, target: Box<Expr> },
}

impl Expr {
    /// Whether this expression must be parenthesized when it appears as
    /// the operand of another one.
    pub fn needs_parens(&self) -> bool {
        matches!(self, Expr::Union(_) | Expr::Period { .. })
    }
}
