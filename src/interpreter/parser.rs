//! Turns command lines into [`Intent`]s.
//!
//! Keywords are case- and accent-insensitive (`nó`/`no`, `não`/`nao`,
//! `contém`/`contem`, `básico`/`basico`). Node ids are taken verbatim.
//!
//! Text arguments go between `"..."` or `“...”`. Inside them, `\"` (or `\”`)
//! and `\\` are the only escapes; any other backslash is kept as written, so
//! `"C:\dados"` reads as `C:\dados`.

use super::intent::{Guard, Intent, LgpdText, NewNode};
use super::lexer::{Token, tokenize};
use crate::error::SyntaxError;
use itertools::Itertools;

/// Whether a line carries no command (blank, `#` or `//` comment).
pub fn is_blank_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//")
}

/// Every command line of `text` with its 1-based line number, parsed lazily.
pub fn parse_lines(text: &str) -> impl Iterator<Item = (usize, Result<Intent, SyntaxError>)> + '_ {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !is_blank_line(line))
        .map(|(index, line)| (index + 1, parse_line(line)))
}

/// Parses a single non-blank line.
pub fn parse_line(line: &str) -> Result<Intent, SyntaxError> {
    let tokens = tokenize(line)?;
    let mut parser = LineParser { tokens, pos: 0 };
    let intent = parser.statement()?;
    parser.finish()?;
    Ok(intent)
}

struct LineParser {
    tokens: Vec<Token>,
    pos: usize,
}

const NODE: &[&str] = &["no"];

impl LineParser {
    fn statement(&mut self) -> Result<Intent, SyntaxError> {
        let first = self.peek_keyword();
        match first.as_deref() {
            Some("criar") => {
                self.pos += 1;
                self.create()
            }
            Some("inserir") => {
                self.pos += 1;
                self.expect_keyword(&["lgpd"], "'lgpd'")?;
                self.lgpd()
            }
            Some("start") | Some("inicio") => {
                self.pos += 1;
                self.expect_arrow()?;
                Ok(Intent::SetStart(self.expect_id("a node id")?))
            }
            Some("no") => {
                self.pos += 1;
                self.node_statement()
            }
            Some("renomear") => {
                self.pos += 1;
                self.expect_keyword(NODE, "'nó'")?;
                let from = self.expect_id("a node id")?;
                self.expect_keyword(&["para"], "'para'")?;
                let to = self.expect_id("the new node id")?;
                Ok(Intent::Rename { from, to })
            }
            Some("remover") | Some("apagar") => {
                self.pos += 1;
                self.expect_keyword(NODE, "'nó'")?;
                Ok(Intent::Remove(self.expect_id("a node id")?))
            }
            _ => Err(SyntaxError::UnknownCommand(
                self.tokens
                    .first()
                    .map(|t| match t {
                        Token::Word(w) => w.clone(),
                        other => other.to_string(),
                    })
                    .unwrap_or_default(),
            )),
        }
    }

    fn create(&mut self) -> Result<Intent, SyntaxError> {
        match self.expect_keyword(&["no", "fluxo"], "'nó' or 'fluxo'")?.as_str() {
            "fluxo" => {
                self.expect_keyword(&["basico"], "'básico'")?;
                Ok(Intent::BasicFlow)
            }
            _ => {
                let id = self.expect_id("a node id")?;
                let kind = match self
                    .expect_keyword(&["prompt", "mensagem", "fim"], "'prompt', 'mensagem' or 'fim'")?
                    .as_str()
                {
                    "fim" => NewNode::End,
                    _ => NewNode::Message(self.expect_quoted()?),
                };
                Ok(Intent::CreateNode { id, kind })
            }
        }
    }

    fn lgpd(&mut self) -> Result<Intent, SyntaxError> {
        let text = match self.tokens.get(self.pos) {
            None => LgpdText::Short,
            Some(Token::Quoted(text)) => {
                let text = text.clone();
                self.pos += 1;
                LgpdText::Custom(text)
            }
            Some(_) => match self
                .expect_keyword(&["curto", "completo"], "'curto', 'completo' or quoted text")?
                .as_str()
            {
                "completo" => LgpdText::Full,
                _ => LgpdText::Short,
            },
        };
        Ok(Intent::InsertLgpd(text))
    }

    fn node_statement(&mut self) -> Result<Intent, SyntaxError> {
        let id = self.expect_id("a node id")?;
        if matches!(self.tokens.get(self.pos), Some(Token::Arrow)) {
            self.pos += 1;
            let to = self.expect_id("a target node id")?;
            let guard = self.guard()?;
            return Ok(Intent::Connect { from: id, to, guard });
        }
        match self
            .expect_keyword(
                &["tipo", "prompt", "mensagem", "handler"],
                "'->', 'tipo', 'prompt' or 'handler'",
            )?
            .as_str()
        {
            "tipo" => Ok(Intent::SetType {
                id,
                node_type: self.expect_id("a node type")?,
            }),
            "handler" => Ok(Intent::SetHandler {
                id,
                handler: self.expect_id("a handler name")?,
            }),
            _ => Ok(Intent::SetPrompt {
                id,
                prompt: self.expect_quoted()?,
            }),
        }
    }

    /// The guard suffix of a transition. A missing suffix means `default`.
    fn guard(&mut self) -> Result<Guard, SyntaxError> {
        if self.pos >= self.tokens.len() {
            return Ok(Guard::Default);
        }
        match self
            .expect_keyword(
                &["default", "padrao", "contem", "se", "agendar"],
                "'default', 'contém', 'se sim', 'se não' or 'agendar'",
            )?
            .as_str()
        {
            "contem" => {
                let text = self.expect_quoted()?;
                let words: Vec<String> = text
                    .split(',')
                    .map(|w| w.trim().to_string())
                    .filter(|w| !w.is_empty())
                    .collect();
                if words.is_empty() {
                    return Err(SyntaxError::Unexpected {
                        expected: "at least one keyword".to_string(),
                        found: Token::Quoted(text).to_string(),
                    });
                }
                Ok(Guard::ContainsAny(words))
            }
            "se" => match self.expect_keyword(&["sim", "nao"], "'sim' or 'não'")?.as_str() {
                "sim" => Ok(Guard::YesNo(true)),
                _ => Ok(Guard::YesNo(false)),
            },
            "agendar" => Ok(Guard::Schedule),
            _ => Ok(Guard::Default),
        }
    }

    fn peek_keyword(&self) -> Option<String> {
        self.tokens.get(self.pos).and_then(Token::keyword)
    }

    /// Consumes a word matching one of `accepted` (already folded) and returns its folded form.
    fn expect_keyword(&mut self, accepted: &[&str], expected: &str) -> Result<String, SyntaxError> {
        match self.tokens.get(self.pos) {
            None => Err(SyntaxError::UnexpectedEnd(expected.to_string())),
            Some(token) => match token.keyword() {
                Some(kw) if accepted.contains(&kw.as_str()) => {
                    self.pos += 1;
                    Ok(kw)
                }
                _ => Err(SyntaxError::Unexpected {
                    expected: expected.to_string(),
                    found: token.to_string(),
                }),
            },
        }
    }

    fn expect_id(&mut self, expected: &str) -> Result<String, SyntaxError> {
        match self.tokens.get(self.pos) {
            Some(Token::Word(word)) => {
                let word = word.clone();
                self.pos += 1;
                Ok(word)
            }
            Some(other) => Err(SyntaxError::Unexpected {
                expected: expected.to_string(),
                found: other.to_string(),
            }),
            None => Err(SyntaxError::UnexpectedEnd(expected.to_string())),
        }
    }

    fn expect_quoted(&mut self) -> Result<String, SyntaxError> {
        match self.tokens.get(self.pos) {
            Some(Token::Quoted(text)) => {
                let text = text.clone();
                self.pos += 1;
                Ok(text)
            }
            Some(other) => Err(SyntaxError::Unexpected {
                expected: "quoted text".to_string(),
                found: other.to_string(),
            }),
            None => Err(SyntaxError::UnexpectedEnd("quoted text".to_string())),
        }
    }

    fn expect_arrow(&mut self) -> Result<(), SyntaxError> {
        match self.tokens.get(self.pos) {
            Some(Token::Arrow) => {
                self.pos += 1;
                Ok(())
            }
            Some(other) => Err(SyntaxError::Unexpected {
                expected: "'->'".to_string(),
                found: other.to_string(),
            }),
            None => Err(SyntaxError::UnexpectedEnd("'->'".to_string())),
        }
    }

    fn finish(&self) -> Result<(), SyntaxError> {
        match self.tokens.get(self.pos) {
            None => Ok(()),
            Some(_) => Err(SyntaxError::TrailingInput(
                self.tokens[self.pos..].iter().join(" "),
            )),
        }
    }
}
