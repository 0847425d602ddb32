use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tree_sitter::Node;

use super::{LanguageParser, ParsedFile};
use crate::analysis::method::CAUGHT_EXCEPTION_MARKER;
use crate::error::{GuardError, Result};
use crate::ir::signature::{self, DEFAULT_METHOD};
use crate::ir::{Call, Language, Method, Position, Statement};

/// ArkTS / TypeScript provider built on the tree-sitter TypeScript grammar.
pub struct ArkTsParser;

// `@Entry @Component export struct Index {` → `... export class  Index {`
static STRUCT_DECL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^([ \t]*(?:@\w+(?:\([^)\n]*\))?[ \t]+)*(?:export[ \t]+)?(?:default[ \t]+)?)struct([ \t])",
    )
    .unwrap()
});

// ── Node classes ────────────────────────────────────────────────

const SIMPLE_STATEMENTS: &[&str] = &[
    "expression_statement",
    "lexical_declaration",
    "variable_declaration",
    "return_statement",
    "throw_statement",
    "break_statement",
    "continue_statement",
    "debugger_statement",
];

const COMPOUND_STATEMENTS: &[&str] = &[
    "program",
    "statement_block",
    "if_statement",
    "else_clause",
    "for_statement",
    "for_in_statement",
    "while_statement",
    "do_statement",
    "try_statement",
    "finally_clause",
    "switch_statement",
    "switch_body",
    "switch_case",
    "switch_default",
    "labeled_statement",
    "export_statement",
];

const SKIPPED: &[&str] = &[
    "comment",
    "empty_statement",
    "import_statement",
    "interface_declaration",
    "type_alias_declaration",
    "ambient_declaration",
    "enum_declaration",
];

/// Nodes lowered into methods of their own.
const SCOPES: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "class_declaration",
    "abstract_class_declaration",
    "class",
    "method_definition",
    "method_signature",
    "abstract_method_signature",
    "function_signature",
];

const FUNCTION_VALUES: &[&str] = &[
    "arrow_function",
    "function_expression",
    "function",
    "generator_function",
];

/// Rewrite ArkTS `struct` component declarations to `class`. The rewrite
/// keeps every byte offset, so positions reported by the tree stay exact.
pub fn rewrite_structs(content: &str) -> Cow<'_, str> {
    STRUCT_DECL_RE.replace_all(content, "${1}class ${2}")
}

impl LanguageParser for ArkTsParser {
    fn language(&self) -> Language {
        Language::ArkTs
    }

    fn parse_file(&self, path: &Path, content: &str) -> Result<ParsedFile> {
        let mut parser = tree_sitter::Parser::new();
        let is_tsx = path
            .extension()
            .is_some_and(|ext| ext == "tsx" || ext == "jsx");

        let lang = if is_tsx {
            tree_sitter_typescript::LANGUAGE_TSX
        } else {
            tree_sitter_typescript::LANGUAGE_TYPESCRIPT
        };

        parser
            .set_language(&lang.into())
            .map_err(|e| GuardError::Parse {
                file: path.display().to_string(),
                message: format!("Failed to load TypeScript grammar: {e}"),
            })?;

        let source = rewrite_structs(content);
        let tree = parser
            .parse(source.as_bytes(), None)
            .ok_or_else(|| GuardError::Parse {
                file: path.display().to_string(),
                message: "tree-sitter failed to parse source".into(),
            })?;

        let root = tree.root_node();
        if root.has_error() {
            tracing::debug!(
                file = %path.display(),
                "syntax errors in source, lowering is best-effort"
            );
        }

        let file = path.to_string_lossy().replace('\\', "/");
        let mut lowering = Lowering {
            source: source.as_bytes(),
            file: &file,
            methods: Vec::new(),
            ordinals: HashMap::new(),
        };

        let mut top_level = Vec::new();
        lowering.lower(root, &mut top_level);
        if !top_level.is_empty() {
            let signature = lowering.unique_signature(None, DEFAULT_METHOD);
            lowering.methods.push(Method {
                signature,
                body: Some(top_level),
            });
        }
        lowering.collect_methods(root, None);

        tracing::debug!(file = %file, methods = lowering.methods.len(), "parsed source file");

        Ok(ParsedFile {
            methods: lowering.methods,
        })
    }
}

struct Lowering<'a> {
    source: &'a [u8],
    file: &'a str,
    methods: Vec<Method>,
    ordinals: HashMap<String, usize>,
}

impl<'a> Lowering<'a> {
    /// Find every function-like node below `node` and lower it to a method.
    fn collect_methods(&mut self, node: Node, owner: Option<&str>) {
        for child in named_children(node) {
            match child.kind() {
                "class_declaration" | "abstract_class_declaration" | "class"
                | "interface_declaration" => {
                    let name = field_text(child, "name", self.source);
                    if let Some(body) = child.child_by_field_name("body") {
                        self.collect_methods(body, name.or(owner));
                    }
                }
                "method_definition" | "function_declaration" | "generator_function_declaration" => {
                    let owner = if child.kind() == "method_definition" {
                        owner
                    } else {
                        None
                    };
                    let name = field_text(child, "name", self.source).unwrap_or("anonymous");
                    self.push_method(owner, name, child);
                    if let Some(body) = child.child_by_field_name("body") {
                        self.collect_methods(body, owner);
                    }
                }
                "method_signature" | "abstract_method_signature" | "function_signature" => {
                    let owner = if child.kind() == "function_signature" {
                        None
                    } else {
                        owner
                    };
                    let name = field_text(child, "name", self.source).unwrap_or("anonymous");
                    let signature = self.unique_signature(owner, name);
                    self.methods.push(Method::bodiless(signature));
                }
                "variable_declarator" | "public_field_definition" => {
                    match (
                        child.child_by_field_name("name"),
                        child.child_by_field_name("value"),
                    ) {
                        (Some(name), Some(value)) if FUNCTION_VALUES.contains(&value.kind()) => {
                            let owner = if child.kind() == "public_field_definition" {
                                owner
                            } else {
                                None
                            };
                            self.push_method(owner, node_text(name, self.source), value);
                            if let Some(body) = value.child_by_field_name("body") {
                                self.collect_methods(body, owner);
                            }
                        }
                        _ => self.collect_methods(child, owner),
                    }
                }
                _ => self.collect_methods(child, owner),
            }
        }
    }

    fn push_method(&mut self, owner: Option<&str>, name: &str, function: Node) {
        let body = function.child_by_field_name("body").map(|body| {
            let mut statements = Vec::new();
            if body.kind() == "statement_block" {
                self.lower(body, &mut statements);
            } else {
                // expression-bodied arrow function
                statements.push(self.statement(body));
                self.inline_handlers(body, &mut statements);
            }
            statements
        });
        let signature = self.unique_signature(owner, name);
        self.methods.push(Method { signature, body });
    }

    fn unique_signature(&mut self, owner: Option<&str>, name: &str) -> String {
        let base = signature::format(self.file, owner, name);
        let ordinal = self.ordinals.entry(base.clone()).or_insert(0);
        *ordinal += 1;
        if *ordinal == 1 {
            base
        } else {
            format!("{base}[{ordinal}]")
        }
    }

    /// Flatten `node` into statements. Compound statements contribute their
    /// headers (conditions, loop clauses) as statements of their own.
    fn lower(&self, node: Node, out: &mut Vec<Statement>) {
        let kind = node.kind();
        if SKIPPED.contains(&kind) || is_nested_scope(node) {
            return;
        }

        if kind == "catch_clause" {
            out.push(self.caught(node));
            if let Some(body) = node.child_by_field_name("body") {
                self.lower(body, out);
            }
            return;
        }

        if COMPOUND_STATEMENTS.contains(&kind) {
            for child in named_children(node) {
                if is_statement_like(child.kind()) {
                    self.lower(child, out);
                } else {
                    let header = self.statement(child);
                    if !header.calls.is_empty() {
                        out.push(header);
                    }
                    self.inline_handlers(child, out);
                }
            }
            return;
        }

        out.push(self.statement(node));
        self.inline_handlers(node, out);
    }

    /// Exception handling inside inline callbacks below `node`. The callback
    /// body is folded into the enclosing statement's text, so its `catch`
    /// clauses and `throw` statements are emitted as statements of their own.
    fn inline_handlers(&self, node: Node, out: &mut Vec<Statement>) {
        for child in named_children(node) {
            if is_nested_scope(child) {
                continue;
            }
            match child.kind() {
                "catch_clause" => out.push(self.caught(child)),
                "throw_statement" => out.push(Statement {
                    text: collapse_whitespace(node_text(child, self.source)),
                    calls: Vec::new(),
                    position: Some(position(child)),
                }),
                _ => {}
            }
            self.inline_handlers(child, out);
        }
    }

    /// `<param> = caughtexception` for a catch clause.
    fn caught(&self, node: Node) -> Statement {
        let param = field_text(node, "parameter", self.source).unwrap_or("_");
        Statement {
            text: format!("{param} = {CAUGHT_EXCEPTION_MARKER}"),
            calls: Vec::new(),
            position: Some(position(node)),
        }
    }

    fn statement(&self, node: Node) -> Statement {
        let mut calls = Vec::new();
        self.collect_calls(node, &mut calls);
        Statement {
            text: collapse_whitespace(node_text(node, self.source)),
            calls,
            position: Some(position(node)),
        }
    }

    fn collect_calls(&self, node: Node, out: &mut Vec<Call>) {
        if is_nested_scope(node) {
            return;
        }
        if node.kind() == "call_expression" {
            out.push(self.call(node));
        }
        for child in named_children(node) {
            self.collect_calls(child, out);
        }
    }

    fn call(&self, node: Node) -> Call {
        let callee = node
            .child_by_field_name("function")
            .and_then(|f| callee_name(f, self.source))
            .map(str::to_string);
        let arguments = node
            .child_by_field_name("arguments")
            .map(|args| {
                named_children(args)
                    .filter(|a| a.kind() != "comment")
                    .map(|a| node_text(a, self.source).to_string())
                    .collect()
            })
            .unwrap_or_default();

        Call {
            callee,
            arguments,
            text: collapse_whitespace(node_text(node, self.source)),
            position: Some(position(node)),
        }
    }
}

/// Resolve a callee to its bare name: `foo` → `foo`, `a.b.foo` → `foo`.
/// Computed callees (`handlers[i]()`, `make()()`) stay unresolved.
fn callee_name<'s>(node: Node, source: &'s [u8]) -> Option<&'s str> {
    match node.kind() {
        "identifier" => Some(node_text(node, source)),
        "member_expression" => node
            .child_by_field_name("property")
            .map(|p| node_text(p, source)),
        "non_null_expression" => node
            .named_child(0)
            .and_then(|inner| callee_name(inner, source)),
        _ => None,
    }
}

fn is_nested_scope(node: Node) -> bool {
    let kind = node.kind();
    if SCOPES.contains(&kind) {
        return true;
    }
    FUNCTION_VALUES.contains(&kind)
        && node
            .parent()
            .is_some_and(|p| matches!(p.kind(), "variable_declarator" | "public_field_definition"))
}

fn is_statement_like(kind: &str) -> bool {
    SIMPLE_STATEMENTS.contains(&kind)
        || COMPOUND_STATEMENTS.contains(&kind)
        || SKIPPED.contains(&kind)
        || SCOPES.contains(&kind)
        || kind == "catch_clause"
}

fn named_children<'t>(node: Node<'t>) -> impl Iterator<Item = Node<'t>> {
    (0..node.named_child_count()).filter_map(move |i| node.named_child(i))
}

fn field_text<'s>(node: Node, field: &str, source: &'s [u8]) -> Option<&'s str> {
    node.child_by_field_name(field)
        .map(|n| node_text(n, source))
}

/// Get the text of a tree-sitter node.
fn node_text<'s>(node: Node, source: &'s [u8]) -> &'s str {
    node.utf8_text(source).unwrap_or("")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 1-based position of a node's start.
fn position(node: Node) -> Position {
    let start = node.start_position();
    Position {
        line: start.row + 1,
        column: start.column + 1,
    }
}
