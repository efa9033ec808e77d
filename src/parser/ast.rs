//! Abstract Syntax Tree types for the relay course notation

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// AST node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Control code or course name (alphanumeric, underscore, hyphen)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Root AST node - a complete course file
#[derive(Debug, Clone, PartialEq)]
pub struct CourseFile {
    pub courses: Vec<Spanned<CourseDecl>>,
}

/// One named course declaration
#[derive(Debug, Clone, PartialEq)]
pub struct CourseDecl {
    pub name: Spanned<Identifier>,
    pub elements: Vec<Spanned<Element>>,
}

/// One element of a course sequence
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// A single control the course visits
    Control(Identifier),
    /// `fork { seq | seq ... }` - each leg takes exactly one branch
    Fork(Vec<Vec<Spanned<Element>>>),
    /// `loop { seq | seq ... }` - every branch is run, in some order,
    /// returning to the preceding control after each one
    Loop(Vec<Vec<Spanned<Element>>>),
}
