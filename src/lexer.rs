use jiff::civil::Weekday;

use crate::anchor::{AnchorKind, Month};
use crate::error::{ExprError, Span};

/// Token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Statement keywords
    Def,
    If,
    Then,
    Else,
    Is,
    Approx,

    // Connectives
    Of,
    From,
    To,
    And,
    Before,
    After,
    Near,

    // Comparisons
    Equal,
    Greater,
    Lesser,
    That,

    // Day literals
    Number(u32),
    Ordinal(u8), // "uno", "primer", ..., "treinta y uno"
    Last,
    Yesterday,
    Prelast,

    // Units and qualifiers
    Day,
    Week,
    Month,
    WeekEnd,
    Fortnight,
    Weekday(Weekday),

    // Named dates
    MonthName(Month),
    Anchor(AnchorKind),

    Ident(String),

    // Punctuation
    Colon,
    Semicolon,
    Comma,
    LParen,
    RParen,
}

/// Multi-word phrases, matched longest first against folded words.
const PHRASES: &[(&[&str], Phrase)] = &[
    (&["miercoles", "de", "ceniza"], Phrase::Anchor(AnchorKind::AshWednesday)),
    (&["fin", "de", "semana"], Phrase::WeekEnd),
    (&["fines", "de", "semana"], Phrase::WeekEnd),
    (&["treinta", "y", "uno"], Phrase::Ordinal(31)),
    (&["treinta", "y", "una"], Phrase::Ordinal(31)),
    (&["treinta", "y", "un"], Phrase::Ordinal(31)),
    (&["semana", "santa"], Phrase::Anchor(AnchorKind::HolyWeek)),
    (&["corpus", "christi"], Phrase::Anchor(AnchorKind::CorpusChristi)),
    (&["si", "no"], Phrase::Else),
];

#[derive(Clone, Copy)]
enum Phrase {
    Anchor(AnchorKind),
    WeekEnd,
    Ordinal(u8),
    Else,
}

impl Phrase {
    fn kind(self) -> TokenKind {
        match self {
            Self::Anchor(a) => TokenKind::Anchor(a),
            Self::WeekEnd => TokenKind::WeekEnd,
            Self::Ordinal(n) => TokenKind::Ordinal(n),
            Self::Else => TokenKind::Else,
        }
    }
}

/// First pass output: words are already lowercased and accent folded.
enum Raw {
    Word(String),
    Number(u32),
    Punct(TokenKind),
}

struct Lexeme {
    raw: Raw,
    span: Span,
}

pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, ExprError> {
        let lexemes = self.scan()?;
        let mut tokens = Vec::with_capacity(lexemes.len());
        let mut i = 0;
        while i < lexemes.len() {
            let lexeme = &lexemes[i];
            let word = match &lexeme.raw {
                Raw::Number(n) => {
                    tokens.push(Token {
                        kind: TokenKind::Number(*n),
                        span: lexeme.span,
                    });
                    i += 1;
                    continue;
                }
                Raw::Punct(kind) => {
                    tokens.push(Token {
                        kind: kind.clone(),
                        span: lexeme.span,
                    });
                    i += 1;
                    continue;
                }
                Raw::Word(w) => w.as_str(),
            };

            if let Some((len, phrase)) = match_phrase(&lexemes[i..]) {
                tokens.push(Token {
                    kind: phrase.kind(),
                    span: lexeme.span.to(lexemes[i + len - 1].span),
                });
                i += len;
                continue;
            }

            if let Some(kind) = keyword(word) {
                tokens.push(Token {
                    kind,
                    span: lexeme.span,
                });
            } else if !is_article(word) {
                tokens.push(Token {
                    kind: TokenKind::Ident(word.to_string()),
                    span: lexeme.span,
                });
            }
            i += 1;
        }
        Ok(tokens)
    }

    fn scan(&mut self) -> Result<Vec<Lexeme>, ExprError> {
        let mut lexemes = Vec::new();
        while let Some(ch) = self.peek_char() {
            let start = self.pos;
            if ch.is_whitespace() {
                self.pos += ch.len_utf8();
                continue;
            }
            if ch.is_ascii_digit() {
                lexemes.push(self.lex_number()?);
                continue;
            }
            if ch.is_alphabetic() || ch == '_' {
                lexemes.push(self.lex_word());
                continue;
            }
            let punct = match ch {
                ':' => TokenKind::Colon,
                ';' => TokenKind::Semicolon,
                ',' => TokenKind::Comma,
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                _ => {
                    return Err(ExprError::lex(
                        format!("unexpected character '{ch}'"),
                        Span::new(start, start + ch.len_utf8()),
                        self.input,
                    ));
                }
            };
            self.pos += ch.len_utf8();
            lexemes.push(Lexeme {
                raw: Raw::Punct(punct),
                span: Span::new(start, self.pos),
            });
        }
        Ok(lexemes)
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn lex_number(&mut self) -> Result<Lexeme, ExprError> {
        let start = self.pos;
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        let digits = &self.input[start..self.pos];
        let n: u32 = digits.parse().map_err(|_| {
            ExprError::lex("number too large", Span::new(start, self.pos), self.input)
        })?;

        // Ordinal indicator: 1º, 2ª
        if let Some(c @ ('º' | 'ª' | '°')) = self.peek_char() {
            self.pos += c.len_utf8();
        }

        Ok(Lexeme {
            raw: Raw::Number(n),
            span: Span::new(start, self.pos),
        })
    }

    fn lex_word(&mut self) -> Lexeme {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if !(c.is_alphanumeric() || c == '_') {
                break;
            }
            self.pos += c.len_utf8();
        }
        Lexeme {
            raw: Raw::Word(fold(&self.input[start..self.pos])),
            span: Span::new(start, self.pos),
        }
    }
}

fn match_phrase(lexemes: &[Lexeme]) -> Option<(usize, Phrase)> {
    PHRASES
        .iter()
        .filter(|(words, _)| {
            words.len() <= lexemes.len()
                && words.iter().zip(lexemes).all(|(w, lx)| match &lx.raw {
                    Raw::Word(actual) => actual == w,
                    _ => false,
                })
        })
        .max_by_key(|(words, _)| words.len())
        .map(|(words, phrase)| (words.len(), *phrase))
}

/// Lowercase and strip Spanish diacritics.
pub fn fold(word: &str) -> String {
    word.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            c => c,
        })
        .collect()
}

fn is_article(word: &str) -> bool {
    matches!(word, "el" | "la" | "los" | "las" | "lo")
}

fn keyword(word: &str) -> Option<TokenKind> {
    use TokenKind as T;
    let kind = match word {
        "def" => T::Def,
        "si" => T::If,
        "entonces" => T::Then,
        "sino" => T::Else,
        "es" => T::Is,
        "aprox" | "aproximadamente" => T::Approx,

        "de" | "del" => T::Of,
        "desde" => T::From,
        "a" | "al" | "hasta" => T::To,
        "y" => T::And,
        "antes" => T::Before,
        "despues" => T::After,
        "proximo" | "proxima" | "cercano" | "cercana" => T::Near,

        "igual" | "iguales" => T::Equal,
        "mayor" | "posterior" => T::Greater,
        "menor" | "anterior" => T::Lesser,
        "que" => T::That,

        "ultimo" | "ultima" => T::Last,
        "ayer" => T::Yesterday,
        "penultimo" | "penultima" => T::Prelast,

        "dia" | "dias" => T::Day,
        "semana" | "semanas" => T::Week,
        "mes" | "meses" => T::Month,
        "finde" | "findes" => T::WeekEnd,
        "quincena" | "quincenas" => T::Fortnight,

        "lunes" => T::Weekday(Weekday::Monday),
        "martes" => T::Weekday(Weekday::Tuesday),
        "miercoles" => T::Weekday(Weekday::Wednesday),
        "jueves" => T::Weekday(Weekday::Thursday),
        "viernes" => T::Weekday(Weekday::Friday),
        "sabado" | "sabados" => T::Weekday(Weekday::Saturday),
        "domingo" | "domingos" => T::Weekday(Weekday::Sunday),

        "enero" => T::MonthName(Month::January),
        "febrero" => T::MonthName(Month::February),
        "marzo" => T::MonthName(Month::March),
        "abril" => T::MonthName(Month::April),
        "mayo" => T::MonthName(Month::May),
        "junio" => T::MonthName(Month::June),
        "julio" => T::MonthName(Month::July),
        "agosto" => T::MonthName(Month::August),
        "septiembre" | "setiembre" => T::MonthName(Month::September),
        "octubre" => T::MonthName(Month::October),
        "noviembre" => T::MonthName(Month::November),
        "diciembre" => T::MonthName(Month::December),

        "pascua" | "pascuas" => T::Anchor(AnchorKind::EasterOctave),
        "carnaval" | "carnavales" => T::Anchor(AnchorKind::Carnival),
        "corpus" => T::Anchor(AnchorKind::CorpusChristi),
        "ascension" => T::Anchor(AnchorKind::Ascension),
        "pentecostes" => T::Anchor(AnchorKind::Pentecost),

        _ => return ordinal(word).map(T::Ordinal),
    };
    Some(kind)
}

fn ordinal(word: &str) -> Option<u8> {
    let n = match word {
        "uno" | "un" | "una" | "primero" | "primer" | "primera" => 1,
        "dos" | "segundo" | "segunda" => 2,
        "tres" | "tercero" | "tercer" | "tercera" => 3,
        "cuatro" | "cuarto" | "cuarta" => 4,
        "cinco" | "quinto" | "quinta" => 5,
        "seis" | "sexto" | "sexta" => 6,
        "siete" | "septimo" | "septima" | "setimo" | "setima" => 7,
        "ocho" | "octavo" | "octava" => 8,
        "nueve" | "noveno" | "novena" => 9,
        "diez" | "decimo" | "decima" => 10,
        "once" => 11,
        "doce" => 12,
        "trece" => 13,
        "catorce" => 14,
        "quince" => 15,
        "dieciseis" => 16,
        "diecisiete" => 17,
        "dieciocho" => 18,
        "diecinueve" => 19,
        "veinte" => 20,
        "veintiuno" | "veintiun" | "veintiuna" => 21,
        "veintidos" => 22,
        "veintitres" => 23,
        "veinticuatro" => 24,
        "veinticinco" => 25,
        "veintiseis" => 26,
        "veintisiete" => 27,
        "veintiocho" => 28,
        "veintinueve" => 29,
        "treinta" => 30,
        "treintaiuno" => 31,
        _ => return None,
    };
    Some(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_at() {
        assert_eq!(
            kinds("uno de enero"),
            vec![
                TokenKind::Ordinal(1),
                TokenKind::Of,
                TokenKind::MonthName(Month::January),
            ]
        );
    }

    #[test]
    fn test_accents_and_case_fold() {
        assert_eq!(kinds("Después"), vec![TokenKind::After]);
        assert_eq!(kinds("PENÚLTIMO"), vec![TokenKind::Prelast]);
        assert_eq!(kinds("sábado"), vec![TokenKind::Weekday(Weekday::Saturday)]);
        assert_eq!(kinds("Ascensión"), vec![TokenKind::Anchor(AnchorKind::Ascension)]);
    }

    #[test]
    fn test_articles_are_dropped() {
        assert_eq!(
            kinds("después de la ascensión"),
            vec![
                TokenKind::After,
                TokenKind::Of,
                TokenKind::Anchor(AnchorKind::Ascension),
            ]
        );
    }

    #[test]
    fn test_phrases() {
        assert_eq!(
            kinds("tercer fin de semana de agosto"),
            vec![
                TokenKind::Ordinal(3),
                TokenKind::WeekEnd,
                TokenKind::Of,
                TokenKind::MonthName(Month::August),
            ]
        );
        assert_eq!(
            kinds("miércoles de ceniza"),
            vec![TokenKind::Anchor(AnchorKind::AshWednesday)]
        );
        assert_eq!(
            kinds("miércoles de marzo"),
            vec![
                TokenKind::Weekday(Weekday::Wednesday),
                TokenKind::Of,
                TokenKind::MonthName(Month::March),
            ]
        );
        assert_eq!(
            kinds("semana santa"),
            vec![TokenKind::Anchor(AnchorKind::HolyWeek)]
        );
        assert_eq!(kinds("si no"), vec![TokenKind::Else]);
        assert_eq!(kinds("treinta y uno"), vec![TokenKind::Ordinal(31)]);
    }

    #[test]
    fn test_phrase_span_covers_all_words() {
        let tokens = Lexer::new("el fin de semana").tokenize().unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].span, Span::new(3, 16));
    }

    #[test]
    fn test_numbers_and_ordinal_indicator() {
        assert_eq!(
            kinds("1º y 2ª"),
            vec![TokenKind::Number(1), TokenKind::And, TokenKind::Number(2)]
        );
    }

    #[test]
    fn test_definition_tokens() {
        assert_eq!(
            kinds("def navidad: 25 de diciembre;\r\nnavidad"),
            vec![
                TokenKind::Def,
                TokenKind::Ident("navidad".into()),
                TokenKind::Colon,
                TokenKind::Number(25),
                TokenKind::Of,
                TokenKind::MonthName(Month::December),
                TokenKind::Semicolon,
                TokenKind::Ident("navidad".into()),
            ]
        );
    }

    #[test]
    fn test_identifiers_are_folded() {
        assert_eq!(kinds("Resurrección"), vec![TokenKind::Ident("resurreccion".into())]);
    }

    #[test]
    fn test_unexpected_character() {
        let err = Lexer::new("lunes & martes").tokenize().unwrap_err();
        assert_eq!(err.span(), Some(Span::new(6, 7)));
    }

    #[test]
    fn test_number_overflow() {
        assert!(Lexer::new("99999999999 dias antes de enero").tokenize().is_err());
    }
}
