//! Recursive-descent parser over manifest tokens.

use super::lexer::{Lexer, Token, TokenKind};
use super::{Directive, Manifest, ParseError, Value};

/// Parse manifest source text into its directives.
///
/// # Example
///
/// ```
/// use pantry::manifest::{parse_manifest, Value};
///
/// let manifest = parse_manifest(r#"
/// version "1.0.0"
/// attribute "vim/sucks",
///   :display_name => "VIM sucks?",
///   :default => "true"
/// "#).unwrap();
///
/// assert_eq!(manifest.directives.len(), 2);
/// let attribute = &manifest.directives[1];
/// assert_eq!(attribute.args, vec![Value::Str("vim/sucks".into())]);
/// assert_eq!(attribute.option("default"), Some(&Value::Str("true".into())));
/// ```
pub fn parse_manifest(source: &str) -> Result<Manifest, ParseError> {
    let tokens = Lexer::new(source).tokenize()?;
    Parser {
        tokens,
        pos: 0,
        depth: 0,
    }
    .manifest()
}

/// Call expression tree, evaluated into a [`Value::FileRef`].
#[derive(Debug)]
enum Expr {
    Str(String),
    CurrentFile,
    Call {
        receiver: String,
        method: String,
        args: Vec<Expr>,
    },
}

impl Expr {
    fn render(&self) -> String {
        match self {
            Expr::Str(s) => format!("'{}'", s),
            Expr::CurrentFile => "__FILE__".to_string(),
            Expr::Call {
                receiver,
                method,
                args,
            } => {
                let args: Vec<String> = args.iter().map(Expr::render).collect();
                format!("{}.{}({})", receiver, method, args.join(", "))
            }
        }
    }

    fn is_call(&self, receiver: &str, method: &str) -> bool {
        matches!(self, Expr::Call { receiver: r, method: m, .. } if r == receiver && m == method)
    }

    fn args(&self) -> &[Expr] {
        match self {
            Expr::Call { args, .. } => args,
            _ => &[],
        }
    }

    /// `File.dirname(__FILE__)`
    fn is_manifest_dir(&self) -> bool {
        self.is_call("File", "dirname") && matches!(self.args(), [Expr::CurrentFile])
    }

    /// `File.join(File.dirname(__FILE__), 'a', 'b')` yields `a/b`.
    fn relative_path(&self) -> Option<String> {
        if !self.is_call("File", "join") {
            return None;
        }
        let (first, rest) = self.args().split_first()?;
        if !first.is_manifest_dir() || rest.is_empty() {
            return None;
        }
        let segments: Option<Vec<&str>> = rest
            .iter()
            .map(|e| match e {
                Expr::Str(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        Some(segments?.join("/"))
    }

    /// `IO.read(<relative path>)` or `File.read(<relative path>)`.
    fn file_ref(&self) -> Option<String> {
        if !(self.is_call("IO", "read") || self.is_call("File", "read")) {
            return None;
        }
        match self.args() {
            [path] => path.relative_path(),
            _ => None,
        }
    }
}

/// Maximum nesting of arrays and calls inside one value.
pub const MAX_NESTING: usize = 64;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // The token stream always ends with Eof, which is never consumed.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    /// Step back over a token taken with [`advance`](Self::advance).
    fn retreat(&mut self, token: &Token) {
        if token.kind != TokenKind::Eof {
            self.pos -= 1;
        }
    }

    fn at(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_newlines(&mut self) {
        while self.eat(&TokenKind::Newline) {}
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        let token = self.peek();
        ParseError::UnexpectedToken {
            found: token.kind.to_string(),
            expected,
            line: token.line,
            column: token.column,
        }
    }

    /// Run `parse` one nesting level deeper, failing past [`MAX_NESTING`].
    fn nested<T>(
        &mut self,
        at: &Token,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::TooDeep {
                limit: MAX_NESTING,
                line: at.line,
                column: at.column,
            });
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token, ParseError> {
        if self.at(&kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn manifest(mut self) -> Result<Manifest, ParseError> {
        let mut directives = Vec::new();
        loop {
            self.skip_newlines();
            if self.at(&TokenKind::Eof) {
                return Ok(Manifest { directives });
            }
            directives.push(self.directive()?);
        }
    }

    fn directive(&mut self) -> Result<Directive, ParseError> {
        let token = self.advance();
        let TokenKind::Ident(name) = token.kind.clone() else {
            self.retreat(&token);
            return Err(self.unexpected("directive name"));
        };

        let mut directive = Directive {
            name,
            args: Vec::new(),
            options: Vec::new(),
            line: token.line,
        };

        if self.eat(&TokenKind::LParen) {
            self.skip_newlines();
            if !self.eat(&TokenKind::RParen) {
                self.arguments(&mut directive, true)?;
                self.skip_newlines();
                self.expect(TokenKind::RParen, "`)`")?;
            }
        } else if !self.at_statement_end() {
            self.arguments(&mut directive, false)?;
        }

        if !self.at_statement_end() {
            return Err(self.unexpected("end of line"));
        }
        Ok(directive)
    }

    fn at_statement_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Newline | TokenKind::Eof)
    }

    /// Comma-separated arguments: positional values first, then options.
    /// A trailing comma carries the list onto the next line.
    fn arguments(&mut self, directive: &mut Directive, in_parens: bool) -> Result<(), ParseError> {
        loop {
            if in_parens {
                self.skip_newlines();
            }
            match self.option_key() {
                Some(key) => {
                    let value = self.value()?;
                    directive.options.push((key, value));
                }
                None if directive.options.is_empty() => {
                    let value = self.value()?;
                    directive.args.push(value);
                }
                None => return Err(self.unexpected("option")),
            }

            if !self.eat(&TokenKind::Comma) {
                return Ok(());
            }
            self.skip_newlines();
        }
    }

    /// Consume `:key =>`, `"key" =>` or `key:` when present.
    fn option_key(&mut self) -> Option<String> {
        if let TokenKind::Label(name) = &self.peek().kind {
            let name = name.clone();
            self.advance();
            return Some(name);
        }
        let key = match &self.peek().kind {
            TokenKind::Symbol(name) | TokenKind::Str(name) => name.clone(),
            _ => return None,
        };
        let rocket = self.tokens.get(self.pos + 1).map(|t| &t.kind);
        if rocket == Some(&TokenKind::Rocket) {
            self.pos += 2;
            Some(key)
        } else {
            None
        }
    }

    fn value(&mut self) -> Result<Value, ParseError> {
        let token = self.advance();
        match token.kind.clone() {
            TokenKind::Str(s) => Ok(Value::Str(s)),
            TokenKind::Symbol(s) => Ok(Value::Symbol(s)),
            TokenKind::Number(n) => Ok(Value::Number(n)),
            TokenKind::LBracket => self.nested(&token, Self::array),
            TokenKind::Ident(name) => match name.as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                "nil" => Ok(Value::Nil),
                _ => {
                    let expr = self.nested(&token, |p| p.call(name, token.line, token.column))?;
                    expr.file_ref()
                        .map(Value::FileRef)
                        .ok_or_else(|| ParseError::UnsupportedExpression {
                            expr: expr.render(),
                            line: token.line,
                            column: token.column,
                        })
                }
            },
            _ => {
                self.retreat(&token);
                Err(self.unexpected("value"))
            }
        }
    }

    fn array(&mut self) -> Result<Value, ParseError> {
        let mut items = Vec::new();
        loop {
            self.skip_newlines();
            if self.eat(&TokenKind::RBracket) {
                return Ok(Value::Array(items));
            }
            items.push(self.value()?);
            self.skip_newlines();
            if !self.eat(&TokenKind::Comma) {
                self.skip_newlines();
                self.expect(TokenKind::RBracket, "`]` or `,`")?;
                return Ok(Value::Array(items));
            }
        }
    }

    /// `Receiver.method(args...)` where the receiver identifier is already
    /// consumed.
    fn call(&mut self, receiver: String, line: usize, column: usize) -> Result<Expr, ParseError> {
        if receiver == "__FILE__" {
            return Ok(Expr::CurrentFile);
        }
        if !self.eat(&TokenKind::Dot) {
            return Err(ParseError::UnsupportedExpression {
                expr: receiver,
                line,
                column,
            });
        }
        let token = self.advance();
        let method = match token.kind.clone() {
            TokenKind::Ident(method) => method,
            _ => {
                self.retreat(&token);
                return Err(self.unexpected("method name"));
            }
        };
        self.expect(TokenKind::LParen, "`(`")?;

        let mut args = Vec::new();
        loop {
            self.skip_newlines();
            if self.eat(&TokenKind::RParen) {
                break;
            }
            let token = self.advance();
            let arg = match token.kind.clone() {
                TokenKind::Str(s) => Expr::Str(s),
                TokenKind::Ident(name) => {
                    self.nested(&token, |p| p.call(name, token.line, token.column))?
                }
                _ => {
                    self.retreat(&token);
                    return Err(self.unexpected("call argument"));
                }
            };
            args.push(arg);
            self.skip_newlines();
            if !self.eat(&TokenKind::Comma) {
                self.skip_newlines();
                self.expect(TokenKind::RParen, "`)` or `,`")?;
                break;
            }
        }

        Ok(Expr::Call {
            receiver,
            method,
            args,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIM_MANIFEST: &str = r#"maintainer       "Opscode, Inc."
maintainer_email "cookbooks@opscode.com"
license          "Apache 2.0"
description      "Installs vim and optional extra packages."
long_description IO.read(File.join(File.dirname(__FILE__), 'README.md'))
version          "1.0.0"

attribute "vim/sucks",
  :display_name => "VIM sucks?",
  :description => "Describes whether VIM sucks",
  :default => "true"
"#;

    fn single(source: &str) -> Directive {
        let mut manifest = parse_manifest(source).unwrap();
        assert_eq!(manifest.directives.len(), 1);
        manifest.directives.remove(0)
    }

    #[test]
    fn test_parses_reference_manifest() {
        let manifest = parse_manifest(VIM_MANIFEST).unwrap();
        let names: Vec<&str> = manifest.directives.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "maintainer",
                "maintainer_email",
                "license",
                "description",
                "long_description",
                "version",
                "attribute",
            ]
        );
    }

    #[test]
    fn test_long_description_becomes_file_ref() {
        let manifest = parse_manifest(VIM_MANIFEST).unwrap();
        let long = manifest.directives_named("long_description").next().unwrap();
        assert_eq!(long.args, vec![Value::FileRef("README.md".into())]);
    }

    #[test]
    fn test_attribute_options_keep_order() {
        let manifest = parse_manifest(VIM_MANIFEST).unwrap();
        let attribute = manifest.directives_named("attribute").next().unwrap();

        assert_eq!(attribute.line, 8);
        assert_eq!(attribute.args, vec![Value::Str("vim/sucks".into())]);
        let keys: Vec<&str> = attribute.options.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["display_name", "description", "default"]);
        assert_eq!(attribute.option("default"), Some(&Value::Str("true".into())));
    }

    #[test]
    fn test_label_style_options() {
        let d = single(r#"attribute "a/b", display_name: "A", required: "optional""#);
        assert_eq!(d.option("display_name"), Some(&Value::Str("A".into())));
        assert_eq!(d.option("required"), Some(&Value::Str("optional".into())));
    }

    #[test]
    fn test_parenthesised_arguments_span_lines() {
        let d = single("depends(\n  \"apt\",\n  \">= 1.0\"\n)");
        assert_eq!(
            d.args,
            vec![Value::Str("apt".into()), Value::Str(">= 1.0".into())]
        );
    }

    #[test]
    fn test_arrays_and_literals() {
        let d = single(r#"attribute "x", :choice => ["a", "b"], :calculated => false, :default => nil"#);
        assert_eq!(
            d.option("choice"),
            Some(&Value::Array(vec![
                Value::Str("a".into()),
                Value::Str("b".into())
            ]))
        );
        assert_eq!(d.option("calculated"), Some(&Value::Bool(false)));
        assert_eq!(d.option("default"), Some(&Value::Nil));
    }

    #[test]
    fn test_file_read_with_nested_path() {
        let d = single("long_description File.read(File.join(File.dirname(__FILE__), 'docs', 'README.md'))");
        assert_eq!(d.args, vec![Value::FileRef("docs/README.md".into())]);
    }

    #[test]
    fn test_directive_without_arguments() {
        let d = single("name");
        assert!(d.args.is_empty());
        assert!(d.options.is_empty());
    }

    #[test]
    fn test_rejects_arbitrary_calls() {
        let err = parse_manifest("version Chef.version(1)").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));

        let err = parse_manifest("long_description IO.read('README.md')").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnsupportedExpression {
                expr: "IO.read('README.md')".into(),
                line: 1,
                column: 18,
            }
        );
    }

    #[test]
    fn test_rejects_bare_identifier_value() {
        let err = parse_manifest("license apache").unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedExpression { .. }));
    }

    #[test]
    fn test_positional_after_option_is_rejected() {
        let err = parse_manifest(r#"attribute :default => "1", "x""#).unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: "option",
                ..
            }
        ));
    }

    #[test]
    fn test_missing_comma_between_arguments() {
        let err = parse_manifest(r#"depends "apt" "1.0""#).unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: "end of line",
                ..
            }
        ));
    }

    #[test]
    fn test_statement_must_start_with_identifier() {
        let err = parse_manifest("\n\n\"orphan\"").unwrap_err();
        assert_eq!(err.line(), 3);
    }

    #[test]
    fn test_empty_manifest() {
        assert_eq!(parse_manifest("# nothing here\n\n").unwrap(), Manifest::default());
    }

    #[test]
    fn test_glued_label_option() {
        let directive = single("attribute 'vim/sucks', default:true, display_name:'VIM sucks?'");
        assert_eq!(directive.option("default"), Some(&Value::Bool(true)));
        assert_eq!(
            directive.option("display_name"),
            Some(&Value::Str("VIM sucks?".into()))
        );
    }

    #[test]
    fn test_nesting_at_limit_is_accepted() {
        let source = format!(
            "version {}{}",
            "[".repeat(MAX_NESTING),
            "]".repeat(MAX_NESTING)
        );
        assert!(parse_manifest(&source).is_ok());
    }

    #[test]
    fn test_deep_array_nesting_is_rejected() {
        let source = format!("version {}", "[".repeat(100_000));
        let err = parse_manifest(&source).unwrap_err();

        assert_eq!(
            err,
            ParseError::TooDeep {
                limit: MAX_NESTING,
                line: 1,
                column: 9 + MAX_NESTING,
            }
        );
    }

    #[test]
    fn test_deep_call_nesting_is_rejected() {
        let source = format!("long_description {}", "File.read(".repeat(100_000));
        let err = parse_manifest(&source).unwrap_err();

        assert!(matches!(err, ParseError::TooDeep { line: 1, .. }));
        assert!(err.to_string().contains("nesting deeper than 64 levels"));
    }


    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_never_panics(source in "\\PC{0,200}") {
                let _ = parse_manifest(&source);
            }

            #[test]
            fn test_never_panics_on_manifest_like_input(
                source in "[a-z_ \"':=>,.()\\[\\]\\n#0-9-]{0,120}"
            ) {
                let _ = parse_manifest(&source);
            }

            #[test]
            fn test_attribute_key_and_default_survive(
                key in "[a-z]{1,8}(/[a-z_]{1,8}){0,2}",
                default in "[A-Za-z0-9 .]{0,16}"
            ) {
                let source = format!("attribute \"{}\", :default => \"{}\"\n", key, default);
                let directive = single(&source);

                prop_assert_eq!(&directive.args, &vec![Value::Str(key)]);
                prop_assert_eq!(directive.option("default"), Some(&Value::Str(default)));
            }
        }
    }
}
