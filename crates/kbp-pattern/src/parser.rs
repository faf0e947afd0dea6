//! Recursive-descent parser for single patterns
//!
//! ```text
//! chain   := primary edge*
//! primary := node | '(' chain ')'
//! edge    := ['!'] ('>' | '<' | '>>' | '<<') [label] primary
//! node    := ['!'] '{' [ '$' | attr (';' attr)* ] '}' ['=' name]
//! attr    := key (':' | '!:') ['!'] value
//! ```

use regex::Regex;

use crate::ast::{Attr, AttrConstraint, EdgeKind, EdgePattern, NodePattern, StringMatcher};
use crate::error::PatternError;

type Result<T> = std::result::Result<T, PatternError>;

pub(crate) fn parse(src: &str) -> Result<NodePattern> {
    let mut parser = Parser { src, pos: 0 };
    parser.skip_ws();
    if parser.at_end() {
        return Err(PatternError::syntax(0, "empty pattern"));
    }
    let node = parser.parse_chain()?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(PatternError::syntax(parser.pos, "unexpected trailing input"));
    }
    Ok(node)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.src.as_bytes().get(self.pos + ahead).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn eat(&mut self, c: u8) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: u8) -> Result<()> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(PatternError::syntax(
                self.pos,
                format!("expected '{}'", c as char),
            ))
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let src = self.src;
        let start = self.pos;
        while matches!(self.peek(), Some(c) if pred(c)) {
            self.pos += 1;
        }
        &src[start..self.pos]
    }

    fn parse_chain(&mut self) -> Result<NodePattern> {
        let mut node = self.parse_primary()?;
        loop {
            self.skip_ws();
            let starts_edge = match self.peek() {
                Some(b'>') | Some(b'<') => true,
                Some(b'!') => matches!(self.peek_at(1), Some(b'>') | Some(b'<')),
                _ => false,
            };
            if !starts_edge {
                break;
            }
            let edge = self.parse_edge()?;
            node.edges.push(edge);
        }
        Ok(node)
    }

    fn parse_primary(&mut self) -> Result<NodePattern> {
        self.skip_ws();
        match self.peek() {
            Some(b'(') => {
                self.pos += 1;
                let node = self.parse_chain()?;
                self.skip_ws();
                self.expect(b')')?;
                Ok(node)
            }
            Some(b'{') | Some(b'!') => self.parse_node(),
            _ => Err(PatternError::syntax(self.pos, "expected node")),
        }
    }

    fn parse_edge(&mut self) -> Result<EdgePattern> {
        let negated = self.eat(b'!');
        let kind = if self.eat(b'>') {
            if self.eat(b'>') {
                EdgeKind::Descendant
            } else {
                EdgeKind::Governs
            }
        } else if self.eat(b'<') {
            if self.eat(b'<') {
                EdgeKind::Ancestor
            } else {
                EdgeKind::GovernedBy
            }
        } else {
            return Err(PatternError::syntax(self.pos, "expected '>' or '<'"));
        };

        let label_pos = self.pos;
        let label = match self.peek() {
            Some(b'/') => Some(self.parse_regex()?),
            Some(c) if is_label_char(c) => {
                Some(StringMatcher::Exact(self.take_while(is_label_char).to_string()))
            }
            _ => None,
        };
        if label.is_some() && matches!(kind, EdgeKind::Descendant | EdgeKind::Ancestor) {
            return Err(PatternError::syntax(
                label_pos,
                "transitive edges take no relation name",
            ));
        }

        let target = self.parse_primary()?;
        Ok(EdgePattern {
            kind,
            label,
            negated,
            target,
        })
    }

    fn parse_node(&mut self) -> Result<NodePattern> {
        let mut node = NodePattern {
            negated: self.eat(b'!'),
            ..NodePattern::default()
        };
        self.expect(b'{')?;
        self.skip_ws();

        if self.eat(b'$') {
            node.root = true;
            self.skip_ws();
            if !self.eat(b';') {
                self.expect(b'}')?;
                return self.parse_name(node);
            }
            self.skip_ws();
        } else if self.eat(b'}') {
            return self.parse_name(node);
        }

        loop {
            node.constraints.push(self.parse_attr()?);
            self.skip_ws();
            if self.eat(b';') {
                self.skip_ws();
                continue;
            }
            self.expect(b'}')?;
            break;
        }
        self.parse_name(node)
    }

    fn parse_name(&mut self, mut node: NodePattern) -> Result<NodePattern> {
        let save = self.pos;
        self.skip_ws();
        if self.eat(b'=') {
            let name = self.take_while(|c| c.is_ascii_alphanumeric() || c == b'_');
            if name.is_empty() {
                return Err(PatternError::syntax(self.pos, "expected node name"));
            }
            node.name = Some(name.to_string());
        } else {
            self.pos = save;
        }
        Ok(node)
    }

    fn parse_attr(&mut self) -> Result<AttrConstraint> {
        let key_pos = self.pos;
        let key = self.take_while(|c| c.is_ascii_alphabetic());
        let attr = Attr::from_key(key).ok_or_else(|| {
            PatternError::syntax(key_pos, format!("unknown attribute '{}'", key))
        })?;
        self.skip_ws();
        let mut negated = self.eat(b'!');
        self.expect(b':')?;
        self.skip_ws();
        // `key:!value` is accepted as a synonym for `key!:value`
        if self.eat(b'!') {
            negated = !negated;
            self.skip_ws();
        }

        let value = if self.peek() == Some(b'/') {
            self.parse_regex()?
        } else {
            let value_pos = self.pos;
            let raw = self.take_while(|c| c != b';' && c != b'}').trim();
            if raw.is_empty() {
                return Err(PatternError::syntax(value_pos, "expected attribute value"));
            }
            StringMatcher::Exact(raw.to_string())
        };

        Ok(AttrConstraint {
            attr,
            value,
            negated,
        })
    }

    /// `/.../`, anchored to the whole value; `\/` is a literal slash
    fn parse_regex(&mut self) -> Result<StringMatcher> {
        let start = self.pos;
        self.expect(b'/')?;
        let body_start = self.pos;
        loop {
            match self.peek() {
                None => return Err(PatternError::syntax(start, "unterminated regex")),
                Some(b'\\') => self.pos += 2,
                Some(b'/') => break,
                Some(_) => self.pos += 1,
            }
        }
        let body = self.src[body_start..self.pos].replace("\\/", "/");
        self.pos += 1;

        Regex::new(&format!("^(?:{})$", body))
            .map(StringMatcher::Regex)
            .map_err(|source| PatternError::InvalidRegex {
                offset: start,
                source,
            })
    }
}

fn is_label_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b':' | b'_' | b'-' | b'.' | b'\'')
}
