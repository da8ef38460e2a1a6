use std::fmt;

use jiff::civil::Weekday;

use crate::anchor::{AnchorKind, Month};
use crate::ast::*;
use crate::dateset::{CompareOp, TimeUnit};

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for def in &self.defs {
            write!(f, "{def}; ")?;
        }
        if self.approximate {
            write!(f, "aprox ")?;
        }
        write!(f, "{}", self.body)
    }
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "def {}: {}", self.name, self.body)
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Expr(e) => write!(f, "{e}"),
            Body::Logic(l) => write!(f, "{l}"),
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "si {} es {} {} entonces {} si no {}",
            self.left,
            compare_str(self.op),
            self.right,
            self.then,
            self.otherwise
        )
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Anchor(a) => write!(f, "{}", anchor_str(*a)),
            Expr::Ident { name, .. } => write!(f, "{name}"),
            Expr::Union(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " y ")?;
                    }
                    write_operand(f, item)?;
                }
                Ok(())
            }
            Expr::Period { from, to } => {
                write!(f, "de ")?;
                write_operand(f, from)?;
                write!(f, " a ")?;
                write_operand(f, to)
            }
            Expr::At {
                days,
                qualifiers,
                target,
            } => {
                let ordinal = !qualifiers.is_empty();
                write_days(f, days, ordinal)?;
                if !days.is_empty() && ordinal {
                    write!(f, " ")?;
                }
                for (i, q) in qualifiers.iter().enumerate() {
                    if i > 0 {
                        write!(f, " y ")?;
                    }
                    write!(f, "{}", qualifier_str(*q))?;
                }
                if !ordinal && days.iter().any(|d| *d < 0) {
                    write!(f, " dia")?;
                }
                write!(f, " de ")?;
                write_operand(f, target)
            }
            Expr::Shift {
                direction,
                amount,
                step,
                target,
            } => {
                if let Some(n) = amount {
                    let ordinal = !matches!(step, Step::Unit(_));
                    write!(f, "{} ", day_str(*n, ordinal))?;
                }
                let plural = amount.is_some_and(|n| n != 1);
                match step {
                    Step::Unit(unit) => write!(f, "{}", unit_str(*unit, plural))?,
                    Step::Weekday(wd) => write!(f, "{}", weekday_str(*wd))?,
                    Step::Weekend => write!(f, "fin de semana")?,
                }
                match direction {
                    Direction::Before => write!(f, " antes de ")?,
                    Direction::After => write!(f, " despues de ")?,
                }
                write_operand(f, target)
            }
            Expr::Near { to, target } => {
                match to {
                    NearTo::Weekday(wd) => write!(f, "{}", weekday_str(*wd))?,
                    NearTo::Weekend => write!(f, "fin de semana")?,
                }
                write!(f, " proximo a ")?;
                write_operand(f, target)
            }
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr) -> fmt::Result {
    if expr.needs_parens() {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

fn write_days(f: &mut fmt::Formatter<'_>, days: &[DayIndex], ordinal: bool) -> fmt::Result {
    for (i, d) in days.iter().enumerate() {
        if i > 0 {
            write!(f, " y ")?;
        }
        write!(f, "{}", day_str(*d, ordinal))?;
    }
    Ok(())
}

/// Day literals before a qualifier read as ordinals ("tercer lunes");
/// plain days of a month stay numeric ("3 de mayo").
fn day_str(day: DayIndex, ordinal: bool) -> String {
    let word = match day {
        -1 => "ultimo",
        -2 => "penultimo",
        1 if ordinal => "primer",
        2 if ordinal => "segundo",
        3 if ordinal => "tercer",
        4 if ordinal => "cuarto",
        5 if ordinal => "quinto",
        6 if ordinal => "sexto",
        7 if ordinal => "septimo",
        8 if ordinal => "octavo",
        9 if ordinal => "noveno",
        10 if ordinal => "decimo",
        n => return n.to_string(),
    };
    word.to_string()
}

fn qualifier_str(q: DayQualifier) -> &'static str {
    match q {
        DayQualifier::Weekday(wd) => weekday_str(wd),
        DayQualifier::Weekend => "fin de semana",
        DayQualifier::Week => "semana",
        DayQualifier::Fortnight => "quincena",
    }
}

fn unit_str(unit: TimeUnit, plural: bool) -> &'static str {
    match (unit, plural) {
        (TimeUnit::Days, false) => "dia",
        (TimeUnit::Days, true) => "dias",
        (TimeUnit::Weeks, false) => "semana",
        (TimeUnit::Weeks, true) => "semanas",
        (TimeUnit::Months, false) => "mes",
        (TimeUnit::Months, true) => "meses",
    }
}

fn compare_str(op: CompareOp) -> &'static str {
    match op {
        CompareOp::Equals => "igual a",
        CompareOp::Lesser => "menor que",
        CompareOp::Greater => "mayor que",
    }
}

pub fn weekday_str(wd: Weekday) -> &'static str {
    match wd {
        Weekday::Monday => "lunes",
        Weekday::Tuesday => "martes",
        Weekday::Wednesday => "miercoles",
        Weekday::Thursday => "jueves",
        Weekday::Friday => "viernes",
        Weekday::Saturday => "sabado",
        Weekday::Sunday => "domingo",
    }
}

pub fn month_str(m: Month) -> &'static str {
    match m {
        Month::January => "enero",
        Month::February => "febrero",
        Month::March => "marzo",
        Month::April => "abril",
        Month::May => "mayo",
        Month::June => "junio",
        Month::July => "julio",
        Month::August => "agosto",
        Month::September => "septiembre",
        Month::October => "octubre",
        Month::November => "noviembre",
        Month::December => "diciembre",
    }
}

pub fn anchor_str(a: AnchorKind) -> &'static str {
    match a {
        AnchorKind::Month(m) => month_str(m),
        AnchorKind::EasterOctave => "pascua",
        AnchorKind::HolyWeek => "semana santa",
        AnchorKind::AshWednesday => "miercoles de ceniza",
        AnchorKind::Carnival => "carnaval",
        AnchorKind::CorpusChristi => "corpus christi",
        AnchorKind::Ascension => "ascension",
        AnchorKind::Pentecost => "pentecostes",
    }
}
