use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::error::CalendarError;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Year4,
    Year2,
    Month2,
    Day2,
    Month,
    Day,
    Literal(String),
}

impl Token {
    fn regex(&self) -> String {
        match self {
            Self::Year4 => r"\d{4}".to_owned(),
            Self::Year2 | Self::Month2 | Self::Day2 => r"\d{2}".to_owned(),
            Self::Month | Self::Day => r"\d{1,2}".to_owned(),
            Self::Literal(text) => regex::escape(text),
        }
    }
}

// Longest tokens first so "YYYY" is never read as two "YY".
const TOKENS: [(&str, Token); 6] = [
    ("YYYY", Token::Year4),
    ("YY", Token::Year2),
    ("MM", Token::Month2),
    ("DD", Token::Day2),
    ("M", Token::Month),
    ("D", Token::Day),
];

/// A daily-note date pattern such as `YYYY-MM-DD`, usable both to format a
/// date into a note key and to recognise note filenames.
#[derive(Clone, Debug)]
pub struct DateFormat {
    source: String,
    tokens: Vec<Token>,
    matcher: Regex,
}

impl DateFormat {
    pub fn parse(format: &str) -> Result<Self, CalendarError> {
        let invalid = |reason: &str| CalendarError::InvalidDateFormat {
            format: format.to_owned(),
            reason: reason.to_owned(),
        };

        if format.trim().is_empty() {
            return Err(invalid("format is empty"));
        }

        let tokens = tokenize(format);
        let has = |wanted: &[Token]| tokens.iter().any(|token| wanted.contains(token));
        if !has(&[Token::Year4, Token::Year2]) {
            return Err(invalid("missing a year token (YYYY or YY)"));
        }
        if !has(&[Token::Month2, Token::Month]) {
            return Err(invalid("missing a month token (MM or M)"));
        }
        if !has(&[Token::Day2, Token::Day]) {
            return Err(invalid("missing a day token (DD or D)"));
        }

        let body = tokens.iter().map(Token::regex).collect::<String>();
        let matcher =
            Regex::new(&format!("^{body}$")).map_err(|error| invalid(&error.to_string()))?;

        Ok(Self {
            source: format.to_owned(),
            tokens,
            matcher,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn format(&self, date: NaiveDate) -> String {
        let mut out = String::with_capacity(self.source.len() + 2);
        for token in &self.tokens {
            match token {
                Token::Year4 => out.push_str(&format!("{:04}", date.year())),
                Token::Year2 => out.push_str(&format!("{:02}", date.year().rem_euclid(100))),
                Token::Month2 => out.push_str(&format!("{:02}", date.month())),
                Token::Day2 => out.push_str(&format!("{:02}", date.day())),
                Token::Month => out.push_str(&date.month().to_string()),
                Token::Day => out.push_str(&date.day().to_string()),
                Token::Literal(text) => out.push_str(text),
            }
        }
        out
    }

    pub fn matches(&self, candidate: &str) -> bool {
        self.matcher.is_match(candidate)
    }
}

fn tokenize(format: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut rest = format;

    'outer: while !rest.is_empty() {
        for (text, token) in &TOKENS {
            if let Some(after) = rest.strip_prefix(text) {
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(token.clone());
                rest = after;
                continue 'outer;
            }
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            literal.push(c);
        }
        rest = chars.as_str();
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    tokens
}
