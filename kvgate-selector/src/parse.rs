//! Selector syntax.
//!
//! ```text
//! expr   := step ( "." step )*
//! step   := ( name | `name` | "name" | "*" ) ( "[" int "]" )*
//! name   := ( letter | digit | "_" | "$" )+
//! ```
//!
//! Whitespace between tokens is ignored. An expression that is nothing but
//! one double-quoted string is a string literal.

/// What a step selects from an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepKind {
    /// The value under one key.
    Name(String),
    /// Every value of the object.
    Wildcard,
}

/// One navigation step with its index stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// What to select.
    pub kind: StepKind,
    /// Index stages applied to the step's matches, in order.
    pub stages: Vec<i64>,
}

impl Step {
    pub(crate) fn name(name: impl Into<String>) -> Self {
        Self {
            kind: StepKind::Name(name.into()),
            stages: Vec::new(),
        }
    }
}

/// A parsed selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A navigation path.
    Path(Vec<Step>),
    /// A lone double-quoted string; resolves like a one-step field reference.
    Literal(String),
}

impl Expr {
    /// Parse selector text.
    pub fn parse(text: &str) -> Result<Expr, String> {
        Parser { src: text, pos: 0 }.expr()
    }

    /// A single field step or a string literal.
    ///
    /// Only these shapes qualify for the `data.` re-prefix fallback.
    pub fn is_simple(&self) -> bool {
        match self {
            Expr::Literal(_) => true,
            Expr::Path(steps) => {
                steps.len() == 1 && matches!(steps[0].kind, StepKind::Name(_))
            }
        }
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expr(mut self) -> Result<Expr, String> {
        self.skip_ws();
        if self.peek().is_none() {
            return Err("empty selector".into());
        }
        let first_quoted = self.peek() == Some('"');
        let mut steps = vec![self.step()?];
        loop {
            self.skip_ws();
            if !self.eat('.') {
                break;
            }
            self.skip_ws();
            steps.push(self.step()?);
        }
        self.skip_ws();
        if let Some(c) = self.peek() {
            return Err(format!("unexpected `{c}` at offset {}", self.pos));
        }
        if first_quoted && steps.len() == 1 && steps[0].stages.is_empty() {
            if let Some(Step {
                kind: StepKind::Name(name),
                ..
            }) = steps.pop()
            {
                return Ok(Expr::Literal(name));
            }
        }
        Ok(Expr::Path(steps))
    }

    fn step(&mut self) -> Result<Step, String> {
        let kind = match self.peek() {
            Some('`') => StepKind::Name(self.backtick_name()?),
            Some('"') => StepKind::Name(self.quoted_name()?),
            Some('*') => {
                self.bump();
                StepKind::Wildcard
            }
            Some(c) if is_name_char(c) => StepKind::Name(self.bare_name()),
            Some(c) => return Err(format!("unexpected `{c}` at offset {}", self.pos)),
            None => return Err("expected a field name after `.`".into()),
        };
        let mut stages = Vec::new();
        loop {
            self.skip_ws();
            if !self.eat('[') {
                break;
            }
            self.skip_ws();
            stages.push(self.index()?);
            self.skip_ws();
            if !self.eat(']') {
                return Err(format!("expected `]` at offset {}", self.pos));
            }
        }
        Ok(Step { kind, stages })
    }

    fn bare_name(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(is_name_char) {
            self.bump();
        }
        self.src[start..self.pos].to_owned()
    }

    fn backtick_name(&mut self) -> Result<String, String> {
        let open = self.pos;
        self.bump();
        let start = self.pos;
        while let Some(c) = self.bump() {
            if c == '`' {
                return Ok(self.src[start..self.pos - 1].to_owned());
            }
        }
        Err(format!("unterminated backtick name starting at offset {open}"))
    }

    fn quoted_name(&mut self) -> Result<String, String> {
        let start = self.pos;
        self.bump();
        while let Some(c) = self.bump() {
            match c {
                '\\' => {
                    self.bump();
                }
                '"' => {
                    let raw = &self.src[start..self.pos];
                    return serde_json::from_str::<String>(raw)
                        .map_err(|e| format!("invalid string {raw}: {e}"));
                }
                _ => {}
            }
        }
        Err(format!("unterminated string starting at offset {start}"))
    }

    fn index(&mut self) -> Result<i64, String> {
        let start = self.pos;
        self.eat('-');
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        let text = &self.src[start..self.pos];
        text.parse::<i64>()
            .map_err(|_| format!("expected an integer index at offset {start}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(steps: &[&str]) -> Expr {
        Expr::Path(steps.iter().map(|s| Step::name(*s)).collect())
    }

    #[test]
    fn bare_path() {
        assert_eq!(Expr::parse("data.password").unwrap(), path(&["data", "password"]));
        assert_eq!(Expr::parse("  token ").unwrap(), path(&["token"]));
        assert_eq!(Expr::parse("data . user").unwrap(), path(&["data", "user"]));
    }

    #[test]
    fn quoted_and_backtick_steps() {
        assert_eq!(
            Expr::parse("data.\"my-key\"").unwrap(),
            path(&["data", "my-key"])
        );
        assert_eq!(
            Expr::parse("data.data.`tls.crt`").unwrap(),
            path(&["data", "data", "tls.crt"])
        );
        assert_eq!(
            Expr::parse(r#"data."say \"hi\"""#).unwrap(),
            path(&["data", "say \"hi\""])
        );
    }

    #[test]
    fn lone_string_is_literal() {
        assert_eq!(Expr::parse("\"my-key\"").unwrap(), Expr::Literal("my-key".into()));
        assert!(Expr::parse("\"my-key\"").unwrap().is_simple());
        assert!(matches!(Expr::parse("\"a\"[0]").unwrap(), Expr::Path(_)));
    }

    #[test]
    fn wildcard_and_stages() {
        let expr = Expr::parse("data.*[0]").unwrap();
        assert_eq!(
            expr,
            Expr::Path(vec![
                Step::name("data"),
                Step {
                    kind: StepKind::Wildcard,
                    stages: vec![0]
                }
            ])
        );
        let expr = Expr::parse("list[-1][ 2 ]").unwrap();
        assert_eq!(
            expr,
            Expr::Path(vec![Step {
                kind: StepKind::Name("list".into()),
                stages: vec![-1, 2]
            }])
        );
    }

    #[test]
    fn simple_shapes() {
        assert!(Expr::parse("foo").unwrap().is_simple());
        assert!(Expr::parse("foo[0]").unwrap().is_simple());
        assert!(!Expr::parse("foo.bar").unwrap().is_simple());
        assert!(!Expr::parse("*").unwrap().is_simple());
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["", "   ", "a.", "a..b", "my-key", "a[", "a[x]", "`open", "\"open", "a b", "$.a!"] {
            assert!(Expr::parse(bad).is_err(), "expected error for {bad:?}");
        }
    }
}
