//! Token definitions for the interior of a candidate citation marker.
//!
//! The region scanner hands the content between marker delimiters to this
//! lexer; the classifier then decides whether the token stream forms a
//! numeric id list or an author-year citation. Tokens are defined with the
//! logos derive macro. Name tokens accept the Unicode dash and apostrophe
//! variants word processors substitute into surnames (en dash for hyphen,
//! curly apostrophe for straight).

use logos::Logos;

/// All tokens that can appear inside a citation marker region.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\r\n]+")]
pub enum MarkerToken {
    /// Four digits plus a letter disambiguator, e.g. `2020a`.
    #[regex(r"[0-9]{4}[a-z]", |lex| lex.slice()[..4].parse().ok())]
    YearSuffixed(i32),

    /// Any bare integer; the classifier decides whether it is a year or a
    /// numeric reference id.
    #[regex(r"[0-9]+", |lex| lex.slice().parse().ok(), priority = 2)]
    Number(u64),

    /// Capitalized name token: hyphenated (Ancoli-Israel) and apostrophe
    /// (O'Connor) forms included.
    #[regex(r"[A-ZÀ-Þ][\p{L}'’ʼ‐‑–—\-]*")]
    Name,

    /// "et al." continuation, with or without the period.
    #[regex(r"et[ \t]+al\.?")]
    EtAl,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token("&")]
    Amp,

    #[token("and")]
    And,

    /// Range dash between numeric ids; Unicode dash variants accepted.
    #[regex(r"[-‐‑–—]")]
    Dash,

    /// Period outside an "et al." (e.g. stray initials).
    #[token(".")]
    Period,
}

impl MarkerToken {
    /// True for tokens that may separate two author names.
    pub fn is_author_separator(&self) -> bool {
        matches!(
            self,
            MarkerToken::Comma | MarkerToken::Amp | MarkerToken::And
        )
    }

    /// True when the token is a plausible 4-digit publication year.
    pub fn year_value(&self) -> Option<i32> {
        match self {
            MarkerToken::YearSuffixed(year) => Some(*year),
            MarkerToken::Number(n) => {
                let n = *n;
                if (1000..=2999).contains(&n) {
                    Some(n as i32)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}
