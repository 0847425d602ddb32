//! Owned, in-memory program representation.
//!
//! Produced by the tree-sitter provider and used directly as test fixtures.

use serde::{Deserialize, Serialize};

use super::{CallExpression, HasCallees, HasStatements, Position, ProgramRepresentation};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Program {
    pub methods: Vec<Method>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Method {
    pub signature: String,
    /// `None` for abstract methods, overload signatures and declarations.
    pub body: Option<Vec<Statement>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statement {
    pub text: String,
    pub calls: Vec<Call>,
    pub position: Option<Position>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Call {
    pub callee: Option<String>,
    pub arguments: Vec<String>,
    pub text: String,
    pub position: Option<Position>,
}

impl Program {
    pub fn new(methods: Vec<Method>) -> Self {
        Self { methods }
    }
}

impl Method {
    pub fn new(signature: impl Into<String>, body: Vec<Statement>) -> Self {
        Self {
            signature: signature.into(),
            body: Some(body),
        }
    }

    pub fn bodiless(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
            body: None,
        }
    }
}

impl Statement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            calls: Vec::new(),
            position: None,
        }
    }

    pub fn with_call(mut self, call: Call) -> Self {
        self.calls.push(call);
        self
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.position = Some(Position { line, column });
        self
    }
}

impl Call {
    /// A call whose callee resolved to `name`.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            text: format!("{name}()"),
            callee: Some(name),
            arguments: Vec::new(),
            position: None,
        }
    }

    /// A call the provider could not resolve to a name.
    pub fn unresolved(text: impl Into<String>) -> Self {
        Self {
            callee: None,
            arguments: Vec::new(),
            text: text.into(),
            position: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.arguments.push(arg.into());
        if let Some(name) = &self.callee {
            self.text = format!("{}({})", name, self.arguments.join(", "));
        }
        self
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.position = Some(Position { line, column });
        self
    }
}

impl ProgramRepresentation for Program {
    type Method = Method;

    fn methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter()
    }
}

impl HasStatements for Method {
    type Statement = Statement;

    fn signature(&self) -> &str {
        &self.signature
    }

    fn statements(&self) -> Option<&[Statement]> {
        self.body.as_deref()
    }
}

impl HasCallees for Statement {
    type Call = Call;

    fn text(&self) -> &str {
        &self.text
    }

    fn calls(&self) -> &[Call] {
        &self.calls
    }

    fn position(&self) -> Option<Position> {
        self.position
    }
}

impl CallExpression for Call {
    fn callee_name(&self) -> Option<&str> {
        self.callee.as_deref()
    }

    fn arguments(&self) -> &[String] {
        &self.arguments
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn position(&self) -> Option<Position> {
        self.position
    }
}
