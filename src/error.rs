use std::fmt;

/// Byte range within the input string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Self {
        Self::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// All errors produced by fechas.
///
/// An expression that is well formed but selects no dates is not an error;
/// it evaluates to an empty [`DateSet`](crate::DateSet).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ExprError {
    /// The input contains a character or number the lexer cannot read.
    #[error("{message}")]
    Lex {
        message: String,
        span: Span,
        input: String,
    },

    /// The token stream does not match the grammar.
    #[error("{message}")]
    Parse {
        message: String,
        span: Span,
        input: String,
    },

    /// A name was referenced without a preceding `def`.
    #[error("unbound identifier '{name}'")]
    UnboundIdentifier {
        name: String,
        span: Span,
        input: String,
    },

    /// The zone used to derive the current year could not be loaded.
    #[error("invalid time zone '{name}': {reason}")]
    InvalidTimeZone { name: String, reason: String },

    /// The locale tag is not of the form `language[-REGION]`.
    #[error("invalid locale '{locale}'")]
    InvalidLocale { locale: String },
}

impl ExprError {
    pub fn lex(message: impl Into<String>, span: Span, input: impl Into<String>) -> Self {
        Self::Lex {
            message: message.into(),
            span,
            input: input.into(),
        }
    }

    pub fn parse(message: impl Into<String>, span: Span, input: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            span,
            input: input.into(),
        }
    }

    pub fn unbound(name: impl Into<String>, span: Span, input: impl Into<String>) -> Self {
        Self::UnboundIdentifier {
            name: name.into(),
            span,
            input: input.into(),
        }
    }

    pub fn time_zone(name: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::InvalidTimeZone {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    pub fn locale(locale: impl Into<String>) -> Self {
        Self::InvalidLocale {
            locale: locale.into(),
        }
    }

    /// True for failures caused by the expression text itself, as opposed
    /// to the evaluation options.
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            Self::Lex { .. } | Self::Parse { .. } | Self::UnboundIdentifier { .. }
        )
    }

    /// Location of the failure in the input, if it has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Lex { span, .. }
            | Self::Parse { span, .. }
            | Self::UnboundIdentifier { span, .. } => Some(*span),
            _ => None,
        }
    }

    /// The slice of the original input the failure points at.
    pub fn fragment(&self) -> Option<&str> {
        let (span, input) = match self {
            Self::Lex { span, input, .. }
            | Self::Parse { span, input, .. }
            | Self::UnboundIdentifier { span, input, .. } => (span, input),
            _ => return None,
        };
        input.get(span.start..span.end)
    }

    /// Format a rich error with the input and an underline.
    pub fn display_rich(&self) -> String {
        match self {
            Self::Lex {
                message,
                span,
                input,
            }
            | Self::Parse {
                message,
                span,
                input,
            } => format_span_error("error", message, span, input),
            Self::UnboundIdentifier { span, input, .. } => {
                format_span_error("error", &self.to_string(), span, input)
            }
            _ => format!("error: {self}"),
        }
    }
}

fn format_span_error(prefix: &str, message: &str, span: &Span, input: &str) -> String {
    if input.is_empty() {
        return format!("{prefix}: {message}");
    }
    let mut out = format!("{prefix}: {message}\n");
    out.push_str(&format!("  {input}\n"));
    // Columns are counted in chars so accented input lines up.
    let column = input
        .get(..span.start)
        .map(|s| s.chars().count())
        .unwrap_or(span.start);
    let width = input
        .get(span.start..span.end)
        .map(|s| s.chars().count())
        .unwrap_or(span.end - span.start);
    out.push_str(&" ".repeat(column + 2));
    out.push_str(&"^".repeat(width.max(1)));
    out
}
