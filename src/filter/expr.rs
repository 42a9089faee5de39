//! Built-in filter expression language.
//!
//! ```text
//! expr     := and_expr ( "or" and_expr )*
//! and_expr := term ( "and" term )*
//! term     := "(" expr ")" | ATTRIBUTE OP VALUE
//! OP       := "==" | "=" | "!=" | "=~" | "!~" | "<" | ">" | "<=" | ">=" | "#" | "!#"
//! VALUE    := '"' chars '"' | integer
//! ```
//!
//! Attribute names are resolved when a feed is evaluated, not when the text is
//! parsed, so `nosuch = "x"` parses fine and fails per feed.

use regex::{Regex, RegexBuilder};
use std::borrow::Cow;
use std::sync::Arc;

use super::{EvalError, FilterParseError, Predicate, PredicateParser};
use crate::feed::Feed;

// ============================================================================
// Lexer
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    NotEq,
    Match,
    NotMatch,
    Lt,
    Gt,
    Le,
    Ge,
    Contains,
    NotContains,
}

impl Op {
    fn is_ordering(self) -> bool {
        matches!(self, Op::Lt | Op::Gt | Op::Le | Op::Ge)
    }

    fn is_regex(self) -> bool {
        matches!(self, Op::Match | Op::NotMatch)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    LParen,
    RParen,
    And,
    Or,
    Ident(String),
    Op(Op),
    Str(String),
    Int(i64),
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::LParen => "`(`".to_string(),
            Token::RParen => "`)`".to_string(),
            Token::And => "`and`".to_string(),
            Token::Or => "`or`".to_string(),
            Token::Ident(name) => format!("`{}`", name),
            Token::Op(_) => "operator".to_string(),
            Token::Str(_) => "string".to_string(),
            Token::Int(n) => format!("`{}`", n),
        }
    }
}

/// Two-character operators must come before their one-character prefixes.
const OPERATORS: &[(&str, Op)] = &[
    ("==", Op::Eq),
    ("!=", Op::NotEq),
    ("=~", Op::Match),
    ("!~", Op::NotMatch),
    ("<=", Op::Le),
    (">=", Op::Ge),
    ("!#", Op::NotContains),
    ("=", Op::Eq),
    ("<", Op::Lt),
    (">", Op::Gt),
    ("#", Op::Contains),
];

fn tokenize(text: &str) -> Result<Vec<(usize, Token)>, FilterParseError> {
    let mut tokens = Vec::new();
    let bytes = text.as_bytes();
    let mut pos = 0;

    'outer: while pos < text.len() {
        let rest = &text[pos..];
        let Some(c) = rest.chars().next() else {
            break;
        };

        if c.is_whitespace() {
            pos += c.len_utf8();
            continue;
        }

        match c {
            '(' => {
                tokens.push((pos, Token::LParen));
                pos += 1;
                continue;
            }
            ')' => {
                tokens.push((pos, Token::RParen));
                pos += 1;
                continue;
            }
            '"' => {
                let (value, consumed) = lex_string(text, pos)?;
                tokens.push((pos, Token::Str(value)));
                pos += consumed;
                continue;
            }
            _ => {}
        }

        for (symbol, op) in OPERATORS {
            if rest.starts_with(symbol) {
                tokens.push((pos, Token::Op(*op)));
                pos += symbol.len();
                continue 'outer;
            }
        }

        let starts_number = c.is_ascii_digit()
            || (c == '-' && bytes.get(pos + 1).is_some_and(|b| b.is_ascii_digit()));
        if starts_number {
            let len = 1 + rest[1..]
                .find(|ch: char| !ch.is_ascii_digit())
                .unwrap_or(rest.len() - 1);
            let literal = &rest[..len];
            let value = literal
                .parse::<i64>()
                .map_err(|_| FilterParseError::new(pos, format!("integer `{}` out of range", literal)))?;
            tokens.push((pos, Token::Int(value)));
            pos += len;
            continue;
        }

        if c.is_ascii_alphabetic() || c == '_' {
            let len = rest
                .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_'))
                .unwrap_or(rest.len());
            let word = &rest[..len];
            let token = match word {
                "and" => Token::And,
                "or" => Token::Or,
                _ => Token::Ident(word.to_string()),
            };
            tokens.push((pos, token));
            pos += len;
            continue;
        }

        return Err(FilterParseError::new(
            pos,
            format!("unexpected character `{}`", c),
        ));
    }

    Ok(tokens)
}

/// Lex a quoted string starting at `start`. Returns the unescaped value and the
/// number of bytes consumed, quotes included.
fn lex_string(text: &str, start: usize) -> Result<(String, usize), FilterParseError> {
    let mut value = String::new();
    let mut chars = text[start + 1..].char_indices();

    while let Some((offset, c)) = chars.next() {
        match c {
            '"' => return Ok((value, offset + 2)),
            '\\' => match chars.next() {
                Some((_, escaped)) => value.push(escaped),
                None => break,
            },
            _ => value.push(c),
        }
    }

    Err(FilterParseError::new(start, "unterminated string"))
}

// ============================================================================
// Syntax Tree
// ============================================================================

#[derive(Debug)]
enum Node {
    And(Box<Node>, Box<Node>),
    Or(Box<Node>, Box<Node>),
    Compare(Comparison),
}

#[derive(Debug)]
struct Comparison {
    attribute: String,
    op: Op,
    literal: String,
    number: Option<i64>,
    regex: Option<Regex>,
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    index: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index).map(|(_, t)| t)
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.index)
            .map(|(p, _)| *p)
            .unwrap_or(self.end)
    }

    fn advance(&mut self) -> Option<(usize, Token)> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn expected(&self, what: &str) -> FilterParseError {
        let found = match self.peek() {
            Some(token) => token.describe(),
            None => "end of input".to_string(),
        };
        FilterParseError::new(self.position(), format!("expected {}, found {}", what, found))
    }

    fn parse_or(&mut self) -> Result<Node, FilterParseError> {
        let mut node = self.parse_and()?;
        while self.peek() == Some(&Token::Or) {
            self.advance();
            let rhs = self.parse_and()?;
            node = Node::Or(Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    fn parse_and(&mut self) -> Result<Node, FilterParseError> {
        let mut node = self.parse_term()?;
        while self.peek() == Some(&Token::And) {
            self.advance();
            let rhs = self.parse_term()?;
            node = Node::And(Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    fn parse_term(&mut self) -> Result<Node, FilterParseError> {
        match self.peek() {
            Some(Token::LParen) => {
                self.advance();
                let inner = self.parse_or()?;
                if self.peek() != Some(&Token::RParen) {
                    return Err(self.expected("`)`"));
                }
                self.advance();
                Ok(inner)
            }
            Some(Token::Ident(_)) => self.parse_comparison(),
            _ => Err(self.expected("attribute or `(`")),
        }
    }

    fn parse_comparison(&mut self) -> Result<Node, FilterParseError> {
        let Some((_, Token::Ident(attribute))) = self.advance() else {
            return Err(self.expected("attribute"));
        };

        let op = match self.peek() {
            Some(Token::Op(op)) => *op,
            _ => return Err(self.expected("operator")),
        };
        self.advance();

        let value_pos = self.position();
        let (literal, number) = match self.peek() {
            Some(Token::Str(s)) => (s.clone(), s.trim().parse::<i64>().ok()),
            Some(Token::Int(n)) => (n.to_string(), Some(*n)),
            _ => return Err(self.expected("value")),
        };
        self.advance();

        if op.is_ordering() && number.is_none() {
            return Err(FilterParseError::new(
                value_pos,
                format!("expected integer for numeric comparison, found `{}`", literal),
            ));
        }

        let regex = if op.is_regex() {
            let compiled = RegexBuilder::new(&literal)
                .case_insensitive(true)
                .build()
                .map_err(|e| {
                    FilterParseError::new(value_pos, format!("invalid regular expression: {}", e))
                })?;
            Some(compiled)
        } else {
            None
        };

        Ok(Node::Compare(Comparison {
            attribute,
            op,
            literal,
            number,
            regex,
        }))
    }
}

// ============================================================================
// Evaluation
// ============================================================================

enum Attr<'a> {
    Text(&'a str),
    Count(u32),
    Tags(&'a [String]),
}

impl Attr<'_> {
    fn as_text(&self) -> Cow<'_, str> {
        match self {
            Attr::Text(s) => Cow::Borrowed(s),
            Attr::Count(n) => Cow::Owned(n.to_string()),
            Attr::Tags(tags) => Cow::Owned(tags.join(" ")),
        }
    }
}

fn lookup<'a>(feed: &'a Feed, name: &str) -> Result<Attr<'a>, EvalError> {
    let attr = match name {
        "title" => Attr::Text(&feed.title),
        "link" | "feedlink" => Attr::Text(&feed.link),
        "rssurl" => Attr::Text(&feed.source_url),
        "description" => Attr::Text(&feed.description),
        "tags" => Attr::Tags(&feed.tags),
        "unread_count" => Attr::Count(feed.unread_count),
        "total_count" => Attr::Count(feed.total_count),
        _ => return Err(EvalError::UnknownAttribute(name.to_string())),
    };
    Ok(attr)
}

impl Comparison {
    fn evaluate(&self, feed: &Feed) -> Result<bool, EvalError> {
        let attr = lookup(feed, &self.attribute)?;

        let result = match self.op {
            Op::Eq => attr.as_text() == self.literal,
            Op::NotEq => attr.as_text() != self.literal,
            Op::Match | Op::NotMatch => {
                let matched = self
                    .regex
                    .as_ref()
                    .is_some_and(|re| re.is_match(&attr.as_text()));
                matched == (self.op == Op::Match)
            }
            Op::Lt | Op::Gt | Op::Le | Op::Ge => {
                let lhs = self.numeric(&attr)?;
                let rhs = self.number.unwrap_or_default();
                match self.op {
                    Op::Lt => lhs < rhs,
                    Op::Gt => lhs > rhs,
                    Op::Le => lhs <= rhs,
                    _ => lhs >= rhs,
                }
            }
            Op::Contains | Op::NotContains => {
                let contained = match &attr {
                    Attr::Tags(tags) => tags.iter().any(|t| *t == self.literal),
                    other => other
                        .as_text()
                        .split_whitespace()
                        .any(|word| word == self.literal),
                };
                contained == (self.op == Op::Contains)
            }
        };

        Ok(result)
    }

    fn numeric(&self, attr: &Attr<'_>) -> Result<i64, EvalError> {
        match attr {
            Attr::Count(n) => Ok(i64::from(*n)),
            other => {
                let text = other.as_text();
                text.trim().parse::<i64>().map_err(|_| EvalError::NotNumeric {
                    attribute: self.attribute.clone(),
                    value: text.into_owned(),
                })
            }
        }
    }
}

impl Node {
    fn evaluate(&self, feed: &Feed) -> Result<bool, EvalError> {
        match self {
            Node::And(lhs, rhs) => Ok(lhs.evaluate(feed)? && rhs.evaluate(feed)?),
            Node::Or(lhs, rhs) => Ok(lhs.evaluate(feed)? || rhs.evaluate(feed)?),
            Node::Compare(cmp) => cmp.evaluate(feed),
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// A parsed filter expression.
#[derive(Debug)]
pub struct FilterExpr {
    source: String,
    root: Node,
}

impl FilterExpr {
    pub fn parse(text: &str) -> Result<Self, FilterParseError> {
        let tokens = tokenize(text)?;
        if tokens.is_empty() {
            return Err(FilterParseError::new(0, "empty filter expression"));
        }

        let mut parser = Parser {
            tokens,
            index: 0,
            end: text.len(),
        };
        let root = parser.parse_or()?;
        if parser.peek().is_some() {
            return Err(parser.expected("`and`, `or` or end of input"));
        }

        Ok(Self {
            source: text.trim().to_string(),
            root,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Predicate for FilterExpr {
    fn evaluate(&self, feed: &Feed) -> Result<bool, EvalError> {
        self.root.evaluate(feed)
    }

    fn describe(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.source)
    }
}

/// [`PredicateParser`] for the built-in expression language.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExprParser;

impl PredicateParser for ExprParser {
    fn parse(&self, text: &str) -> Result<Arc<dyn Predicate>, FilterParseError> {
        let expr = FilterExpr::parse(text)?;
        Ok(Arc::new(expr))
    }
}
