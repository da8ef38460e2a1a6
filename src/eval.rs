use std::collections::HashMap;

use jiff::civil::Weekday;
use tracing::{debug, trace};

use crate::ast::*;
use crate::dateset::DateSet;
use crate::error::ExprError;

/// Evaluation settings shared by every anchor in one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    pub first_year: i16,
    pub years: u16,
    pub full_weeks: bool,
    pub week_start: Weekday,
}

/// Reduces a [`Program`] to a [`DateSet`], one node at a time.
///
/// Every expression node yields exactly one set to its parent. Scalars
/// (day indices, qualifiers, amounts) never leave the node that owns them.
pub struct Interpreter<'a> {
    ctx: Context,
    input: &'a str,
    bindings: HashMap<String, DateSet>,
}

impl<'a> Interpreter<'a> {
    /// `input` is the source text, used to point errors at the offending
    /// identifier. It may be empty.
    pub fn new(ctx: Context, input: &'a str) -> Self {
        Self {
            ctx,
            input,
            bindings: HashMap::new(),
        }
    }

    pub fn run(mut self, program: &Program) -> Result<DateSet, ExprError> {
        for def in &program.defs {
            self.eval_def(def)?;
        }
        let result = self.eval_body(&program.body)?;
        Ok(result.with_approximate(program.approximate))
    }

    fn eval_def(&mut self, def: &Definition) -> Result<(), ExprError> {
        let value = self.eval_body(&def.body)?;
        debug!(name = %def.name, dates = value.len(), "bound definition");
        self.bindings.insert(def.name.clone(), value);
        Ok(())
    }

    fn eval_body(&self, body: &Body) -> Result<DateSet, ExprError> {
        match body {
            Body::Expr(e) => self.eval(e),
            Body::Logic(logic) => self.eval_logic(logic),
        }
    }

    fn eval_logic(&self, logic: &Logic) -> Result<DateSet, ExprError> {
        let left = self.eval(&logic.left)?;
        let right = self.eval(&logic.right)?;
        let then = self.eval(&logic.then)?;
        let otherwise = self.eval(&logic.otherwise)?;
        Ok(left.compare(&right, logic.op, &then, &otherwise))
    }

    fn eval(&self, expr: &Expr) -> Result<DateSet, ExprError> {
        let value = match expr {
            Expr::Anchor(anchor) => anchor.resolve(
                self.ctx.first_year,
                self.ctx.years,
                self.ctx.full_weeks,
                self.ctx.week_start,
            ),
            Expr::Ident { name, span } => self
                .bindings
                .get(name)
                .cloned()
                .ok_or_else(|| ExprError::unbound(name, *span, self.input))?,
            Expr::Union(items) => {
                let mut acc: Option<DateSet> = None;
                for item in items {
                    let value = self.eval(item)?;
                    acc = Some(match acc {
                        Some(prev) => prev.and(&value),
                        None => value,
                    });
                }
                acc.unwrap_or_else(|| self.empty())
            }
            Expr::Period { from, to } => self.eval(from)?.to(&self.eval(to)?),
            Expr::At {
                days,
                qualifiers,
                target,
            } => eval_at(&self.eval(target)?, days, qualifiers),
            Expr::Shift {
                direction,
                amount,
                step,
                target,
            } => eval_shift(&self.eval(target)?, *direction, amount.unwrap_or(1), *step),
            Expr::Near { to, target } => {
                let target = self.eval(target)?;
                match to {
                    NearTo::Weekday(wd) => target.near(*wd),
                    NearTo::Weekend => target.near_weekend(),
                }
            }
        };
        trace!(node = %expr, dates = value.len(), "evaluated");
        Ok(value)
    }

    fn empty(&self) -> DateSet {
        DateSet::empty(self.ctx.week_start, self.ctx.full_weeks)
    }
}

/// Ordinal selection; the qualifier decides what is being counted.
fn eval_at(target: &DateSet, days: &[DayIndex], qualifiers: &[DayQualifier]) -> DateSet {
    let has = |q: DayQualifier| qualifiers.contains(&q);
    if has(DayQualifier::Week) {
        return target.at_week(days);
    }
    if has(DayQualifier::Weekend) {
        return target.at_weekend(days);
    }
    if has(DayQualifier::Fortnight) {
        return target.at_fortnight(days);
    }
    let weekdays: Vec<Weekday> = qualifiers
        .iter()
        .filter_map(|q| match q {
            DayQualifier::Weekday(wd) => Some(*wd),
            _ => None,
        })
        .collect();
    if weekdays.is_empty() {
        target.at(days)
    } else {
        target.at_weekdays(&weekdays, days)
    }
}

fn eval_shift(target: &DateSet, direction: Direction, amount: DayIndex, step: Step) -> DateSet {
    match (direction, step) {
        (Direction::Before, Step::Unit(unit)) => target.before(amount, unit),
        (Direction::After, Step::Unit(unit)) => target.after(amount, unit),
        (Direction::Before, Step::Weekday(wd)) => target.before_weekday(wd, amount),
        (Direction::After, Step::Weekday(wd)) => target.after_weekday(wd, amount),
        (Direction::Before, Step::Weekend) => target.before_weekend(amount),
        (Direction::After, Step::Weekend) => target.after_weekend(amount),
    }
}
