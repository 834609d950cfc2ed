//! Artifact templates: parsing, rendering and coverage checking.
//!
//! ## Syntax
//!
//! ```text
//! {{NAME}}                       substitute a context variable
//! {{#if variant == postgresql}}  open a block on the variant tag
//! {{#if network_service}}        open a block on a flag (also `!flag`)
//! {{#elif ...}} {{#else}}        further branches, tested in order
//! {{/if}}                        close the block
//! ```
//!
//! A block tag alone on its line swallows that line, newline included, so
//! templates can put tags on their own lines without leaving blank lines
//! behind. Every other byte of the template is copied verbatim. In
//! particular, text meant for a later templating stage (`<%= ... %>`,
//! `${VAR:-x}`) passes through untouched.
//!
//! ## Two phases
//!
//! [`Template::parse`] compiles the source once and rejects malformed
//! templates. [`Template::render`] is then pure and total: it cannot fail for
//! any [`RenderContext`]. Templates that would silently lose output for some
//! variant are found by [`Template::check_coverage`], which runs in tests and
//! when a catalog is loaded.

use std::collections::BTreeSet;

use crate::domain::context::RenderContext;
use crate::domain::error::DomainError;
use crate::domain::parameters::VariantParameters;
use crate::domain::registry::parameters_for;
use crate::domain::variant::Variant;

/// A parsed artifact template.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    name: String,
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Variable(String),
    Block(Block),
}

#[derive(Debug, Clone, PartialEq)]
struct Block {
    branches: Vec<Branch>,
    otherwise: Option<Vec<Node>>,
}

#[derive(Debug, Clone, PartialEq)]
struct Branch {
    condition: Condition,
    body: Vec<Node>,
}

/// Branch guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// `variant == TAG`
    VariantIs(String),
    /// `FLAG` or `!FLAG`
    Flag { name: String, negated: bool },
}

impl Condition {
    fn holds(&self, params: &VariantParameters) -> bool {
        match self {
            Self::VariantIs(tag) => params.variant.as_str() == tag,
            Self::Flag { name, negated } => params.flag(name).unwrap_or(false) != *negated,
        }
    }
}

impl Block {
    /// Body of the first branch whose condition holds, else the `else` body.
    fn select(&self, params: &VariantParameters) -> Option<&[Node]> {
        self.branches
            .iter()
            .find(|b| b.condition.holds(params))
            .map(|b| b.body.as_slice())
            .or(self.otherwise.as_deref())
    }

    /// A block dispatching purely on the variant tag, without a fallback.
    fn is_variant_switch(&self) -> bool {
        self.otherwise.is_none()
            && self
                .branches
                .iter()
                .all(|b| matches!(b.condition, Condition::VariantIs(_)))
    }
}

impl Template {
    /// Compile template source.
    pub fn parse(name: impl Into<String>, source: &str) -> Result<Self, DomainError> {
        let name = name.into();
        let tokens = tokenize(&name, source)?;
        let nodes = build_tree(&name, tokens)?;
        Ok(Self { name, nodes })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render against a run's context.
    ///
    /// Variables missing from the context are left in place as `{{NAME}}`.
    pub fn render(&self, ctx: &RenderContext) -> String {
        let mut out = String::new();
        render_nodes(&self.nodes, ctx, &mut out);
        out
    }

    /// Every variable name the template references, in any branch.
    pub fn variables(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        collect_variables(&self.nodes, &mut names);
        names
    }

    /// Check the template renders completely for every registered variant.
    ///
    /// Reports a [`DomainError::TemplateCoverageGap`] when the template
    /// - tests a variant tag or flag the registry does not know,
    /// - reaches a variant-only block (no `else`) that names no branch for
    ///   the variant being rendered, or
    /// - reaches a variable the context does not define for that variant.
    pub fn check_coverage(&self) -> Result<(), DomainError> {
        self.check_conditions(&self.nodes)?;

        for variant in Variant::ALL {
            let ctx = RenderContext::new("coverage-probe", parameters_for(variant));
            self.check_reachable(&self.nodes, &ctx)?;
        }

        Ok(())
    }

    fn check_conditions(&self, nodes: &[Node]) -> Result<(), DomainError> {
        for node in nodes {
            let Node::Block(block) = node else { continue };

            for branch in &block.branches {
                match &branch.condition {
                    Condition::VariantIs(tag) => {
                        if !Variant::ALL.iter().any(|v| v.as_str() == tag) {
                            return Err(self.gap(format!("unknown variant tag '{tag}'")));
                        }
                    }
                    Condition::Flag { name, .. } => {
                        if !VariantParameters::FLAGS.contains(&name.as_str()) {
                            return Err(self.gap(format!("unknown flag '{name}'")));
                        }
                    }
                }
                self.check_conditions(&branch.body)?;
            }

            if let Some(body) = &block.otherwise {
                self.check_conditions(body)?;
            }
        }
        Ok(())
    }

    fn check_reachable(&self, nodes: &[Node], ctx: &RenderContext) -> Result<(), DomainError> {
        for node in nodes {
            match node {
                Node::Text(_) => {}
                Node::Variable(name) => {
                    if ctx.get(name).is_none() {
                        return Err(self.gap(format!(
                            "variable '{name}' is undefined for {}",
                            ctx.variant()
                        )));
                    }
                }
                Node::Block(block) => match block.select(ctx.parameters()) {
                    Some(body) => self.check_reachable(body, ctx)?,
                    None if block.is_variant_switch() => {
                        return Err(self.gap(format!("no branch for {}", ctx.variant())));
                    }
                    None => {}
                },
            }
        }
        Ok(())
    }

    fn gap(&self, reason: String) -> DomainError {
        DomainError::TemplateCoverageGap {
            template: self.name.clone(),
            reason,
        }
    }
}

fn render_nodes(nodes: &[Node], ctx: &RenderContext, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Variable(name) => match ctx.get(name) {
                Some(value) => out.push_str(value),
                None => {
                    out.push_str("{{");
                    out.push_str(name);
                    out.push_str("}}");
                }
            },
            Node::Block(block) => {
                if let Some(body) = block.select(ctx.parameters()) {
                    render_nodes(body, ctx, out);
                }
            }
        }
    }
}

fn collect_variables(nodes: &[Node], names: &mut BTreeSet<String>) {
    for node in nodes {
        match node {
            Node::Text(_) => {}
            Node::Variable(name) => {
                names.insert(name.clone());
            }
            Node::Block(block) => {
                for branch in &block.branches {
                    collect_variables(&branch.body, names);
                }
                if let Some(body) = &block.otherwise {
                    collect_variables(body, names);
                }
            }
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

#[derive(Debug, PartialEq)]
enum Token {
    Text(String),
    Variable(String),
    If(Condition),
    Elif(Condition),
    Else,
    EndIf,
}

impl Token {
    fn is_block_tag(&self) -> bool {
        !matches!(self, Self::Text(_) | Self::Variable(_))
    }
}

fn malformed(template: &str, reason: impl Into<String>) -> DomainError {
    DomainError::MalformedTemplate {
        template: template.to_string(),
        reason: reason.into(),
    }
}

fn is_inline_space(s: &str) -> bool {
    s.chars().all(|c| c == ' ' || c == '\t' || c == '\r')
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn tokenize(name: &str, source: &str) -> Result<Vec<Token>, DomainError> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut pos = 0;

    while let Some(found) = source[pos..].find("{{") {
        // `{{{NAME}}}` and `${{{NAME}}:-x}`: extra leading braces are text.
        let mut open = pos + found;
        while source[open + 2..].starts_with('{') {
            open += 1;
        }
        text.push_str(&source[pos..open]);

        let inner_start = open + 2;
        let close = source[inner_start..]
            .find("}}")
            .map(|i| inner_start + i)
            .ok_or_else(|| malformed(name, format!("unterminated tag at byte {open}")))?;
        let token = classify(name, source[inner_start..close].trim())?;
        let mut end = close + 2;

        if token.is_block_tag() {
            let line_start = source[..open].rfind('\n').map_or(0, |i| i + 1);
            let line_end = source[end..].find('\n').map(|i| end + i);
            let after = &source[end..line_end.unwrap_or(source.len())];
            let before = &source[line_start..open];

            if is_inline_space(before) && is_inline_space(after) {
                text.truncate(text.len() - before.len());
                end = line_end.map_or(source.len(), |i| i + 1);
            }
        }

        if !text.is_empty() {
            tokens.push(Token::Text(std::mem::take(&mut text)));
        }
        tokens.push(token);
        pos = end;
    }

    text.push_str(&source[pos..]);
    if !text.is_empty() {
        tokens.push(Token::Text(text));
    }

    Ok(tokens)
}

fn classify(name: &str, inner: &str) -> Result<Token, DomainError> {
    if let Some(rest) = inner.strip_prefix('#') {
        let (keyword, argument) = match rest.split_once(char::is_whitespace) {
            Some((keyword, argument)) => (keyword, argument.trim()),
            None => (rest, ""),
        };
        return match (keyword, argument) {
            ("if", arg) if !arg.is_empty() => Ok(Token::If(parse_condition(name, arg)?)),
            ("elif", arg) if !arg.is_empty() => Ok(Token::Elif(parse_condition(name, arg)?)),
            ("else", "") => Ok(Token::Else),
            _ => Err(malformed(name, format!("unknown block tag '{{{{{inner}}}}}'"))),
        };
    }

    if let Some(rest) = inner.strip_prefix('/') {
        return match rest.trim() {
            "if" => Ok(Token::EndIf),
            _ => Err(malformed(name, format!("unknown closing tag '{{{{{inner}}}}}'"))),
        };
    }

    if inner.is_empty() {
        return Err(malformed(name, "empty tag"));
    }
    if !is_identifier(inner) {
        return Err(malformed(name, format!("invalid variable name '{inner}'")));
    }
    Ok(Token::Variable(inner.to_string()))
}

fn parse_condition(name: &str, argument: &str) -> Result<Condition, DomainError> {
    if let Some((lhs, rhs)) = argument.split_once("==") {
        let (lhs, rhs) = (lhs.trim(), rhs.trim());
        if lhs != "variant" || !is_identifier(rhs) {
            return Err(malformed(name, format!("bad comparison '{argument}'")));
        }
        return Ok(Condition::VariantIs(rhs.to_ascii_lowercase()));
    }

    let (flag, negated) = match argument.strip_prefix('!') {
        Some(flag) => (flag.trim(), true),
        None => (argument, false),
    };
    if !is_identifier(flag) {
        return Err(malformed(name, format!("bad condition '{argument}'")));
    }
    Ok(Condition::Flag {
        name: flag.to_string(),
        negated,
    })
}

/// An open `{{#if}}` while its body is being collected.
struct Frame {
    branches: Vec<Branch>,
    /// `None` once inside `{{#else}}`.
    condition: Option<Condition>,
    body: Vec<Node>,
}

impl Frame {
    fn close_branch(&mut self) {
        if let Some(condition) = self.condition.take() {
            self.branches.push(Branch {
                condition,
                body: std::mem::take(&mut self.body),
            });
        }
    }
}

fn build_tree(name: &str, tokens: Vec<Token>) -> Result<Vec<Node>, DomainError> {
    let mut root = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    for token in tokens {
        let node = match token {
            Token::Text(text) => Node::Text(text),
            Token::Variable(var) => Node::Variable(var),
            Token::If(condition) => {
                stack.push(Frame {
                    branches: Vec::new(),
                    condition: Some(condition),
                    body: Vec::new(),
                });
                continue;
            }
            Token::Elif(condition) => {
                let frame = stack
                    .last_mut()
                    .ok_or_else(|| malformed(name, "{{#elif}} outside a block"))?;
                if frame.condition.is_none() {
                    return Err(malformed(name, "{{#elif}} after {{#else}}"));
                }
                frame.close_branch();
                frame.condition = Some(condition);
                continue;
            }
            Token::Else => {
                let frame = stack
                    .last_mut()
                    .ok_or_else(|| malformed(name, "{{#else}} outside a block"))?;
                if frame.condition.is_none() {
                    return Err(malformed(name, "duplicate {{#else}}"));
                }
                frame.close_branch();
                continue;
            }
            Token::EndIf => {
                let mut frame = stack
                    .pop()
                    .ok_or_else(|| malformed(name, "{{/if}} without {{#if}}"))?;
                let otherwise = if frame.condition.is_none() {
                    Some(std::mem::take(&mut frame.body))
                } else {
                    frame.close_branch();
                    None
                };
                Node::Block(Block {
                    branches: frame.branches,
                    otherwise,
                })
            }
        };

        match stack.last_mut() {
            Some(frame) => frame.body.push(node),
            None => root.push(node),
        }
    }

    if !stack.is_empty() {
        return Err(malformed(name, format!("{} unclosed {{{{#if}}}}", stack.len())));
    }

    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(variant: Variant) -> RenderContext {
        RenderContext::new("Demo App", parameters_for(variant)).with_secret("s")
    }

    fn render(source: &str, variant: Variant) -> String {
        Template::parse("test", source).unwrap().render(&ctx(variant))
    }

    #[test]
    fn substitutes_variables() {
        assert_eq!(
            render("name={{PROJECT_NAME_SNAKE}} db={{ DATABASE_ADAPTER }}", Variant::Mysql),
            "name=demo_app db=mysql2"
        );
    }

    #[test]
    fn text_without_tags_is_verbatim() {
        let source = "  a: <%= ENV.fetch(\"X\") { 5 } %>\n\tb: ${Y:-z}\r\n}} trailing";
        assert_eq!(render(source, Variant::Sqlite), source);
    }

    #[test]
    fn extra_leading_braces_stay_literal() {
        assert_eq!(
            render("${{{DATABASE_USERNAME_ENV}}:-x}", Variant::Postgresql),
            "${POSTGRES_USER:-x}"
        );
        assert_eq!(render("{{{PROJECT_NAME}}}", Variant::Sqlite), "{Demo App}");
    }

    #[test]
    fn unknown_variable_is_left_in_place() {
        assert_eq!(render("x {{NOPE}} y", Variant::Sqlite), "x {{NOPE}} y");
    }

    #[test]
    fn variant_branches_pick_first_match_in_order() {
        let source = "{{#if variant == postgresql}}pg{{#elif variant == mysql}}my{{#else}}file{{/if}}";
        assert_eq!(render(source, Variant::Postgresql), "pg");
        assert_eq!(render(source, Variant::Mysql), "my");
        assert_eq!(render(source, Variant::Sqlite), "file");
    }

    #[test]
    fn first_matching_branch_wins() {
        let source = "{{#if network_service}}a{{#elif variant == mysql}}b{{/if}}";
        assert_eq!(render(source, Variant::Mysql), "a");
    }

    #[test]
    fn no_match_without_else_emits_nothing() {
        assert_eq!(render("[{{#if network_service}}x{{/if}}]", Variant::Sqlite), "[]");
    }

    #[test]
    fn negated_flags() {
        let source = "{{#if !network_service}}local{{/if}}";
        assert_eq!(render(source, Variant::Sqlite), "local");
        assert_eq!(render(source, Variant::Mysql), "");
    }

    #[test]
    fn standalone_tags_consume_their_lines() {
        let source = "a:\n  {{#if file_based}}\n  path: x\n  {{#else}}\n  host: y\n  {{/if}}\nb: 1\n";
        assert_eq!(render(source, Variant::Sqlite), "a:\n  path: x\nb: 1\n");
        assert_eq!(render(source, Variant::Postgresql), "a:\n  host: y\nb: 1\n");
    }

    #[test]
    fn standalone_tag_on_last_line_without_newline() {
        assert_eq!(render("x\n{{#if file_based}}\ny\n{{/if}}", Variant::Sqlite), "x\ny\n");
    }

    #[test]
    fn crlf_lines_are_consumed_whole() {
        let source = "a\r\n{{#if file_based}}\r\nb\r\n{{/if}}\r\nc";
        assert_eq!(render(source, Variant::Sqlite), "a\r\nb\r\nc");
    }

    #[test]
    fn inline_block_keeps_surrounding_whitespace() {
        let source = "  encoding: {{#if variant == mysql}}utf8mb4{{#else}}unicode{{/if}}\n";
        assert_eq!(render(source, Variant::Mysql), "  encoding: utf8mb4\n");
    }

    #[test]
    fn nested_blocks() {
        let source = "{{#if network_service}}\n{{#if variant == mysql}}\nmy\n{{#else}}\npg\n{{/if}}\n{{/if}}\n";
        assert_eq!(render(source, Variant::Mysql), "my\n");
        assert_eq!(render(source, Variant::Postgresql), "pg\n");
        assert_eq!(render(source, Variant::Sqlite), "");
    }

    #[test]
    fn rendering_is_repeatable() {
        let template = Template::parse(
            "t",
            "{{PROJECT_NAME}} {{SECRET_KEY_BASE}}\n{{#if network_service}}{{DATABASE_IMAGE}}{{/if}}",
        )
        .unwrap();
        let ctx = RenderContext::new("x", parameters_for(Variant::Postgresql));
        assert_eq!(template.render(&ctx), template.render(&ctx));
    }

    #[test]
    fn rejects_malformed_templates() {
        for source in [
            "{{#if file_based}}open",
            "{{/if}}",
            "{{#else}}",
            "{{#elif file_based}}",
            "{{#if file_based}}a{{#else}}b{{#else}}c{{/if}}",
            "{{#if file_based}}a{{#else}}b{{#elif network_service}}c{{/if}}",
            "{{PROJECT_NAME",
            "{{}}",
            "{{not a name}}",
            "{{#if}}x{{/if}}",
            "{{#if variant = mysql}}x{{/if}}",
            "{{#unless file_based}}x{{/if}}",
            "{{/endif}}",
        ] {
            assert!(
                matches!(
                    Template::parse("bad", source),
                    Err(DomainError::MalformedTemplate { .. })
                ),
                "{source:?} should be rejected"
            );
        }
    }

    #[test]
    fn lists_referenced_variables() {
        let template = Template::parse(
            "t",
            "{{PROJECT_NAME}}{{#if network_service}}{{DATABASE_IMAGE}}{{#else}}{{YEAR}}{{/if}}",
        )
        .unwrap();
        let vars: Vec<_> = template.variables().into_iter().collect();
        assert_eq!(vars, ["DATABASE_IMAGE", "PROJECT_NAME", "YEAR"]);
    }

    // ========================================================================
    // Coverage
    // ========================================================================

    fn coverage(source: &str) -> Result<(), DomainError> {
        Template::parse("t", source).unwrap().check_coverage()
    }

    #[test]
    fn exhaustive_switch_is_covered() {
        coverage("{{#if variant == sqlite3}}a{{#elif variant == postgresql}}b{{#elif variant == mysql}}c{{/if}}")
            .unwrap();
    }

    #[test]
    fn switch_with_else_is_covered() {
        coverage("{{#if variant == mysql}}a{{#else}}{{/if}}").unwrap();
    }

    #[test]
    fn partial_switch_is_a_gap() {
        let err = coverage("{{#if variant == mysql}}a{{/if}}").unwrap_err();
        assert!(matches!(err, DomainError::TemplateCoverageGap { .. }));
    }

    #[test]
    fn unreachable_partial_switch_is_fine() {
        coverage("{{#if network_service}}{{#if variant == postgresql}}a{{#elif variant == mysql}}b{{/if}}{{/if}}")
            .unwrap();
    }

    #[test]
    fn unknown_tag_and_flag_are_gaps() {
        assert!(coverage("{{#if variant == oracle}}a{{#else}}b{{/if}}").is_err());
        assert!(coverage("{{#if has_cache}}a{{/if}}").is_err());
    }

    #[test]
    fn service_variable_outside_network_block_is_a_gap() {
        assert!(coverage("image: {{DATABASE_IMAGE}}").is_err());
        coverage("{{#if network_service}}image: {{DATABASE_IMAGE}}{{/if}}").unwrap();
    }

    #[test]
    fn unknown_variable_is_a_gap() {
        assert!(coverage("{{AUTHOR}}").is_err());
    }
}
