//! Placeholder token translation.
//!
//! Suite strings may embed `@[tag:payload]` tokens for characters and
//! constructs that are awkward to write in JSON. The same token grammar has
//! two targets:
//!
//! | Token                  | Pattern form                | Data form        |
//! |------------------------|-----------------------------|------------------|
//! | `@[unicode:1F600]`     | `\x{0001F600}`              | the character    |
//! | `@[hex:41]`            | `\x41`                      | `A`              |
//! | `@[octal:101]`         | `\x{41}`                    | `A`              |
//! | `@[control:J]`         | raw U+000A                  | raw U+000A       |
//! | `@[named:year,\d{4}]`  | `(?P<year>\d{4})`           | left as-is       |
//! | `@[backref:year]`      | `\k<year>`                  | left as-is       |
//!
//! Translation rewrites every token in one pass and repeats until a pass
//! changes nothing. A `named` body can hold tokens of its own, and a
//! rewrite can splice text into a token-like prefix, so one pass is not
//! enough. Each substitution is strictly shorter than the token it replaces,
//! so the loop always reaches a fixed point.
//!
//! Malformed or unknown tokens are never reported here. They stay in the
//! text as literal `@[...]` and show up later as a compile failure or a
//! mismatch.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Target of a translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    /// Regex syntax, applied to a case's `pattern`.
    Pattern,
    /// Literal characters, applied to `input`, `match` and `groups`.
    Data,
}

/// A recognized placeholder token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Unicode(u32),
    Hex(u8),
    Octal(u32),
    /// Control letter `A`..=`Z`, denoting `letter - 64`.
    Control(u8),
    Named { name: &'a str, body: &'a str },
    Backref(&'a str),
}

const NAME: &str = r"[A-Za-z_][A-Za-z0-9_]*";
/// A `named` body: escapes, plain characters, or one level of `[...]`.
const BODY: &str = r"(?:\\.|[^\[\]\\]|\[(?:\\.|[^\[\]\\])*\])*";

static PATTERN_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"@\[(?:unicode:(?P<unicode>[0-9A-Fa-f]{{4,6}})|hex:(?P<hex>[0-9A-Fa-f]{{2}})|octal:(?P<octal>[0-7]{{1,3}})|control:(?P<control>[A-Z])|named:(?P<name>{NAME}),(?P<body>{BODY})|backref:(?P<backref>{NAME}))\]"
    ))
    .unwrap()
});

static DATA_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"@\[(?:unicode:(?P<unicode>[0-9A-Fa-f]{4,6})|hex:(?P<hex>[0-9A-Fa-f]{2})|octal:(?P<octal>[0-7]{1,3})|control:(?P<control>[A-Z]))\]",
    )
    .unwrap()
});

impl<'a> Token<'a> {
    fn from_captures(caps: &Captures<'a>) -> Option<Token<'a>> {
        if let Some(m) = caps.name("unicode") {
            return u32::from_str_radix(m.as_str(), 16).ok().map(Token::Unicode);
        }
        if let Some(m) = caps.name("hex") {
            return u8::from_str_radix(m.as_str(), 16).ok().map(Token::Hex);
        }
        if let Some(m) = caps.name("octal") {
            return u32::from_str_radix(m.as_str(), 8).ok().map(Token::Octal);
        }
        if let Some(m) = caps.name("control") {
            return m.as_str().bytes().next().map(Token::Control);
        }
        if let (Some(name), Some(body)) = (caps.name("name"), caps.name("body")) {
            return Some(Token::Named {
                name: name.as_str(),
                body: body.as_str(),
            });
        }
        caps.name("backref").map(|m| Token::Backref(m.as_str()))
    }

    /// Regex syntax for this token.
    pub fn pattern_form(&self) -> String {
        match *self {
            Token::Unicode(code) if code <= 0xFFFF => format!(r"\x{{{code:04X}}}"),
            Token::Unicode(code) => format!(r"\x{{{code:08X}}}"),
            Token::Hex(byte) => format!(r"\x{byte:02X}"),
            Token::Octal(value) => format!(r"\x{{{value:02X}}}"),
            Token::Control(letter) => char::from(letter.wrapping_sub(b'@')).to_string(),
            Token::Named { name, body } => format!("(?P<{name}>{body})"),
            Token::Backref(name) => format!(r"\k<{name}>"),
        }
    }

    /// The literal character this token denotes, if it has a data form.
    ///
    /// Code points that are not Unicode scalar values (surrogates, values
    /// above U+10FFFF) have no data form and are left untranslated.
    pub fn data_form(&self) -> Option<String> {
        let code = match *self {
            Token::Unicode(code) | Token::Octal(code) => code,
            Token::Hex(byte) => u32::from(byte),
            Token::Control(letter) => u32::from(letter.wrapping_sub(b'@')),
            Token::Named { .. } | Token::Backref(_) => return None,
        };
        char::from_u32(code).map(String::from)
    }
}

/// Translate every placeholder token in `text` to the given form.
pub fn translate(text: &str, form: Form) -> String {
    let mut current = text.to_string();
    loop {
        let next = match rewrite_pass(&current, form) {
            Cow::Borrowed(_) => None,
            Cow::Owned(next) => Some(next),
        };
        match next {
            Some(next) if next != current => current = next,
            _ => return current,
        }
    }
}

/// Translate a case pattern into regex syntax.
pub fn to_pattern(text: &str) -> String {
    translate(text, Form::Pattern)
}

/// Translate input or expected text into literal characters.
pub fn to_data(text: &str) -> String {
    translate(text, Form::Data)
}

/// Rewrite each token occurrence once, left to right.
fn rewrite_pass(text: &str, form: Form) -> Cow<'_, str> {
    let re = match form {
        Form::Pattern => &*PATTERN_TOKEN_RE,
        Form::Data => &*DATA_TOKEN_RE,
    };
    re.replace_all(text, |caps: &Captures| {
        let replacement = Token::from_captures(caps).and_then(|token| match form {
            Form::Pattern => Some(token.pattern_form()),
            Form::Data => token.data_form(),
        });
        replacement.unwrap_or_else(|| caps[0].to_string())
    })
}
