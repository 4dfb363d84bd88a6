//! Selector text to selector structure.

use super::SelectorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Combinator {
    /// `a b`
    Descendant,
    /// `a > b`
    Child,
    /// `a + b`
    Adjacent,
    /// `a ~ b`
    Sibling,
}

/// Compounds joined by combinators, left to right.
/// `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ComplexSelector {
    pub compounds: Vec<Compound>,
    pub combinators: Vec<Combinator>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct Compound {
    /// Lowercased tag name; `None` for `*` or an implied universal.
    pub tag: Option<String>,
    pub simples: Vec<Simple>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Simple {
    Id(String),
    Class(String),
    Attr(AttrSelector),
    Pseudo(Pseudo),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AttrSelector {
    pub name: String,
    pub op: AttrOp,
    pub value: String,
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AttrOp {
    Exists,
    /// `=`
    Equals,
    /// `~=`
    Includes,
    /// `|=`
    DashMatch,
    /// `^=`
    Prefix,
    /// `$=`
    Suffix,
    /// `*=`
    Substring,
}

/// `An+B`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Nth {
    pub a: i32,
    pub b: i32,
}

impl Nth {
    /// Whether the 1-based `position` is `a*k + b` for some `k >= 0`.
    pub fn matches(&self, position: usize) -> bool {
        let n = position as i64;
        let (a, b) = (self.a as i64, self.b as i64);
        if a == 0 {
            return n == b;
        }
        let diff = n - b;
        diff % a == 0 && diff / a >= 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Pseudo {
    NthChild(Nth),
    NthLastChild(Nth),
    NthOfType(Nth),
    NthLastOfType(Nth),
    FirstChild,
    LastChild,
    OnlyChild,
    FirstOfType,
    LastOfType,
    OnlyOfType,
    Root,
    Empty,
    Not(Vec<ComplexSelector>),
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_name(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-'
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{c}')
}

pub(crate) struct Parser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    pub fn parse_top_level(&mut self) -> Result<Vec<ComplexSelector>, SelectorError> {
        self.parse_list(false)
    }

    fn error(&self, message: impl Into<String>) -> SelectorError {
        SelectorError::Parse {
            selector: self.source.to_string(),
            offset: self.pos,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn expect(&mut self, c: char) -> Result<(), SelectorError> {
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected '{c}'")))
        }
    }

    fn parse_list(&mut self, nested: bool) -> Result<Vec<ComplexSelector>, SelectorError> {
        let mut list = Vec::new();
        loop {
            self.skip_whitespace();
            list.push(self.parse_complex()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(')') if nested => return Ok(list),
                None if !nested => return Ok(list),
                None => return Err(self.error("unclosed parenthesis")),
                Some(c) => return Err(self.error(format!("unexpected '{c}'"))),
            }
        }
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_space = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') | Some(')') => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::Adjacent,
                Some('~') => Combinator::Sibling,
                Some(_) if had_space => {
                    combinators.push(Combinator::Descendant);
                    compounds.push(self.parse_compound()?);
                    continue;
                }
                Some(c) => return Err(self.error(format!("unexpected '{c}'"))),
            };
            self.pos += 1;
            self.skip_whitespace();
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }

        Ok(ComplexSelector {
            compounds,
            combinators,
        })
    }

    fn parse_compound(&mut self) -> Result<Compound, SelectorError> {
        let start = self.pos;
        let mut compound = Compound::default();

        if self.peek() == Some('*') {
            self.pos += 1;
        } else if self.starts_ident() {
            compound.tag = Some(self.ident()?.to_ascii_lowercase());
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    compound.simples.push(Simple::Id(self.ident()?));
                }
                Some('.') => {
                    self.pos += 1;
                    compound.simples.push(Simple::Class(self.ident()?));
                }
                Some('[') => {
                    self.pos += 1;
                    compound.simples.push(Simple::Attr(self.attribute()?));
                }
                Some(':') => {
                    self.pos += 1;
                    compound.simples.push(Simple::Pseudo(self.pseudo()?));
                }
                _ => break,
            }
        }

        if self.pos == start {
            return Err(self.error("expected selector"));
        }
        Ok(compound)
    }

    fn starts_ident(&self) -> bool {
        let valid_escape = |c: Option<char>| c.is_some_and(|c| c != '\n');
        match self.peek() {
            Some('-') => match self.peek_at(1) {
                Some('\\') => valid_escape(self.peek_at(2)),
                Some(c) => is_name_start(c) || c == '-',
                None => false,
            },
            Some('\\') => valid_escape(self.peek_at(1)),
            Some(c) => is_name_start(c),
            None => false,
        }
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        if !self.starts_ident() {
            return Err(self.error("expected identifier"));
        }
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                out.push(self.escape()?);
            } else if is_name(c) {
                out.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        Ok(out)
    }

    /// Consume a backslash escape and return the character it stands for.
    fn escape(&mut self) -> Result<char, SelectorError> {
        self.pos += 1;
        let Some(c) = self.peek() else {
            return Ok('\u{FFFD}');
        };
        if c == '\n' {
            return Err(self.error("newline cannot be escaped"));
        }
        if !c.is_ascii_hexdigit() {
            self.pos += 1;
            return Ok(c);
        }

        let mut value: u32 = 0;
        let mut digits = 0;
        while digits < 6 {
            let Some(d) = self.peek().and_then(|h| h.to_digit(16)) else {
                break;
            };
            value = value * 16 + d;
            self.pos += 1;
            digits += 1;
        }
        if self.peek().is_some_and(is_whitespace) {
            self.pos += 1;
        }
        Ok(match value {
            0 => '\u{FFFD}',
            v => char::from_u32(v).unwrap_or('\u{FFFD}'),
        })
    }

    fn string(&mut self) -> Result<String, SelectorError> {
        let Some(quote) = self.peek() else {
            return Err(self.error("expected string"));
        };
        self.pos += 1;
        let mut out = String::new();
        loop {
            match self.peek() {
                None | Some('\n') => return Err(self.error("unterminated string")),
                Some(c) if c == quote => {
                    self.pos += 1;
                    return Ok(out);
                }
                Some('\\') if self.peek_at(1) == Some('\n') => self.pos += 2,
                Some('\\') => out.push(self.escape()?),
                Some(c) => {
                    out.push(c);
                    self.pos += 1;
                }
            }
        }
    }

    fn attribute(&mut self) -> Result<AttrSelector, SelectorError> {
        self.skip_whitespace();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        let op = match (self.peek(), self.peek_at(1)) {
            (Some(']'), _) => {
                self.pos += 1;
                return Ok(AttrSelector {
                    name,
                    op: AttrOp::Exists,
                    value: String::new(),
                    case_insensitive: false,
                });
            }
            (Some('='), _) => AttrOp::Equals,
            (Some('~'), Some('=')) => AttrOp::Includes,
            (Some('|'), Some('=')) => AttrOp::DashMatch,
            (Some('^'), Some('=')) => AttrOp::Prefix,
            (Some('$'), Some('=')) => AttrOp::Suffix,
            (Some('*'), Some('=')) => AttrOp::Substring,
            _ => return Err(self.error("expected attribute operator")),
        };
        self.pos += if op == AttrOp::Equals { 1 } else { 2 };
        self.skip_whitespace();

        let value = match self.peek() {
            Some('"') | Some('\'') => self.string()?,
            _ => self.ident()?,
        };
        self.skip_whitespace();

        let mut case_insensitive = false;
        match self.peek() {
            Some('i') | Some('I') => {
                case_insensitive = true;
                self.pos += 1;
                self.skip_whitespace();
            }
            Some('s') | Some('S') => {
                self.pos += 1;
                self.skip_whitespace();
            }
            _ => {}
        }
        self.expect(']')?;

        Ok(AttrSelector {
            name,
            op,
            value,
            case_insensitive,
        })
    }

    fn pseudo(&mut self) -> Result<Pseudo, SelectorError> {
        if self.peek() == Some(':') {
            return Err(SelectorError::Unsupported(format!(
                "pseudo-element in '{}'",
                self.source
            )));
        }
        let name = self.ident()?.to_ascii_lowercase();

        if self.peek() != Some('(') {
            return match name.as_str() {
                "first-child" => Ok(Pseudo::FirstChild),
                "last-child" => Ok(Pseudo::LastChild),
                "only-child" => Ok(Pseudo::OnlyChild),
                "first-of-type" => Ok(Pseudo::FirstOfType),
                "last-of-type" => Ok(Pseudo::LastOfType),
                "only-of-type" => Ok(Pseudo::OnlyOfType),
                "root" => Ok(Pseudo::Root),
                "empty" => Ok(Pseudo::Empty),
                _ => Err(SelectorError::Unsupported(format!(":{name}"))),
            };
        }
        self.pos += 1;

        let pseudo = match name.as_str() {
            "not" => {
                let inner = self.parse_list(true)?;
                Pseudo::Not(inner)
            }
            "nth-child" => Pseudo::NthChild(self.nth()?),
            "nth-last-child" => Pseudo::NthLastChild(self.nth()?),
            "nth-of-type" => Pseudo::NthOfType(self.nth()?),
            "nth-last-of-type" => Pseudo::NthLastOfType(self.nth()?),
            _ => return Err(SelectorError::Unsupported(format!(":{name}()"))),
        };
        self.expect(')')?;
        Ok(pseudo)
    }

    /// Parse an `An+B` argument up to, not including, the closing paren.
    fn nth(&mut self) -> Result<Nth, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c != ')') {
            self.pos += 1;
        }
        let raw: String = self.chars[start..self.pos]
            .iter()
            .filter(|c| !is_whitespace(**c))
            .collect::<String>()
            .to_ascii_lowercase();

        parse_nth(&raw).ok_or_else(|| self.error(format!("invalid An+B expression '{raw}'")))
    }
}

fn parse_nth(raw: &str) -> Option<Nth> {
    match raw {
        "odd" => return Some(Nth { a: 2, b: 1 }),
        "even" => return Some(Nth { a: 2, b: 0 }),
        "" => return None,
        _ => {}
    }

    let Some((a_part, b_part)) = raw.split_once('n') else {
        return raw.parse().ok().map(|b| Nth { a: 0, b });
    };
    let a = match a_part {
        "" | "+" => 1,
        "-" => -1,
        other => other.parse().ok()?,
    };
    let b = match b_part {
        "" => 0,
        other if other.starts_with('+') || other.starts_with('-') => other.parse().ok()?,
        _ => return None,
    };
    Some(Nth { a, b })
}
