use super::{AstNode, AstVisitor, Span};
use std::fmt;

// Package and Import Declarations

#[derive(Debug, Clone)]
pub struct PackageDecl {
    pub annotations: Vec<Annotation>,
    /// Dotted qualified name, flattened at parse time.
    pub name: String,
    pub span: Span,
}

impl AstNode for PackageDecl {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<V: AstVisitor>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_package_decl(self)
    }
}

impl fmt::Display for PackageDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "package {};", self.name)
    }
}

#[derive(Debug, Clone)]
pub struct ImportDecl {
    pub name: String,
    pub is_static: bool,
    pub is_wildcard: bool,
    pub span: Span,
}

impl AstNode for ImportDecl {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<V: AstVisitor>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_import_decl(self)
    }
}

impl fmt::Display for ImportDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_static {
            write!(f, "import static ")?;
        } else {
            write!(f, "import ")?;
        }
        if self.is_wildcard {
            write!(f, "{}.*;", self.name)
        } else {
            write!(f, "{};", self.name)
        }
    }
}

// Type Declarations

#[derive(Debug, Clone)]
pub enum TypeDecl {
    Class(ClassDecl),
    Interface(InterfaceDecl),
    Enum(EnumDecl),
    Annotation(AnnotationDecl),
}

impl TypeDecl {
    pub fn name(&self) -> &str {
        match self {
            TypeDecl::Class(c) => &c.name,
            TypeDecl::Interface(i) => &i.name,
            TypeDecl::Enum(e) => &e.name,
            TypeDecl::Annotation(a) => &a.name,
        }
    }

    pub fn is_malformed(&self) -> bool {
        match self {
            TypeDecl::Class(c) => c.malformed,
            TypeDecl::Interface(i) => i.malformed,
            TypeDecl::Enum(e) => e.malformed,
            TypeDecl::Annotation(a) => a.malformed,
        }
    }
}

impl AstNode for TypeDecl {
    fn span(&self) -> Span {
        match self {
            TypeDecl::Class(c) => c.span(),
            TypeDecl::Interface(i) => i.span(),
            TypeDecl::Enum(e) => e.span(),
            TypeDecl::Annotation(a) => a.span(),
        }
    }

    fn accept<V: AstVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            TypeDecl::Class(c) => c.accept(visitor),
            TypeDecl::Interface(i) => i.accept(visitor),
            TypeDecl::Enum(e) => e.accept(visitor),
            TypeDecl::Annotation(a) => a.accept(visitor),
        }
    }
}

impl fmt::Display for TypeDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDecl::Class(c) => write!(f, "{}", c),
            TypeDecl::Interface(i) => write!(f, "{}", i),
            TypeDecl::Enum(e) => write!(f, "{}", e),
            TypeDecl::Annotation(a) => write!(f, "{}", a),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub extends: Option<TypeRef>,
    pub implements: Vec<TypeRef>,
    pub body: Vec<ClassMember>,
    /// Set when error recovery rebuilt part of this declaration.
    pub malformed: bool,
    pub span: Span,
}

impl AstNode for ClassDecl {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<V: AstVisitor>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_class_decl(self)
    }
}

impl fmt::Display for ClassDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {}", self.name)
    }
}

#[derive(Debug, Clone)]
pub struct InterfaceDecl {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub extends: Vec<TypeRef>,
    pub body: Vec<ClassMember>,
    pub malformed: bool,
    pub span: Span,
}

impl AstNode for InterfaceDecl {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<V: AstVisitor>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_interface_decl(self)
    }
}

impl fmt::Display for InterfaceDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "interface {}", self.name)
    }
}

#[derive(Debug, Clone)]
pub struct EnumDecl {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub name: String,
    pub implements: Vec<TypeRef>,
    pub constants: Vec<EnumConstant>,
    pub body: Vec<ClassMember>,
    pub malformed: bool,
    pub span: Span,
}

impl AstNode for EnumDecl {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<V: AstVisitor>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_enum_decl(self)
    }
}

impl fmt::Display for EnumDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "enum {}", self.name)
    }
}

#[derive(Debug, Clone)]
pub struct EnumConstant {
    pub annotations: Vec<Annotation>,
    pub name: String,
    pub arguments: Vec<Expr>,
    pub body: Option<Vec<ClassMember>>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct AnnotationDecl {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub name: String,
    pub body: Vec<AnnotationMember>,
    pub malformed: bool,
    pub span: Span,
}

impl AstNode for AnnotationDecl {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<V: AstVisitor>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_annotation_decl(self)
    }
}

impl fmt::Display for AnnotationDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@interface {}", self.name)
    }
}

#[derive(Debug, Clone)]
pub enum AnnotationMember {
    /// Element declaration: `Type name() default value;`
    Element {
        modifiers: Vec<Modifier>,
        type_ref: TypeRef,
        name: String,
        default_value: Option<ElementValue>,
        span: Span,
    },
    Field(FieldDecl),
    TypeDecl(TypeDecl),
}

// Modifiers and Annotations

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Static,
    Final,
    Native,
    Synchronized,
    Transient,
    Volatile,
    Strictfp,
    /// Java 8: default interface method
    Default,
}

impl Modifier {
    /// Bit used by the parser's modifier accumulator.
    pub const fn flag(self) -> u32 {
        match self {
            Modifier::Public => 1 << 0,
            Modifier::Protected => 1 << 1,
            Modifier::Private => 1 << 2,
            Modifier::Abstract => 1 << 3,
            Modifier::Static => 1 << 4,
            Modifier::Final => 1 << 5,
            Modifier::Native => 1 << 6,
            Modifier::Synchronized => 1 << 7,
            Modifier::Transient => 1 << 8,
            Modifier::Volatile => 1 << 9,
            Modifier::Strictfp => 1 << 10,
            Modifier::Default => 1 << 11,
        }
    }

    const ALL: [Modifier; 12] = [
        Modifier::Public,
        Modifier::Protected,
        Modifier::Private,
        Modifier::Abstract,
        Modifier::Static,
        Modifier::Final,
        Modifier::Native,
        Modifier::Synchronized,
        Modifier::Transient,
        Modifier::Volatile,
        Modifier::Strictfp,
        Modifier::Default,
    ];

    /// Expand an accumulator bitset back into declaration order.
    pub fn from_flags(flags: u32) -> Vec<Modifier> {
        Modifier::ALL
            .iter()
            .copied()
            .filter(|m| flags & m.flag() != 0)
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct Annotation {
    pub name: String,
    pub arguments: Vec<AnnotationArg>,
    /// Marker/single-value/normal distinction matters for printing only.
    pub is_marker: bool,
    pub span: Span,
}

impl AstNode for Annotation {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<V: AstVisitor>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_annotation(self)
    }
}

#[derive(Debug, Clone)]
pub enum AnnotationArg {
    Value(ElementValue),
    Named(String, ElementValue),
}

/// An annotation element value: a (conditional) expression, a nested
/// annotation, or an array of values.
#[derive(Debug, Clone)]
pub enum ElementValue {
    Expr(Expr),
    Annotation(Box<Annotation>),
    Array(Vec<ElementValue>),
}

// Type References

#[derive(Debug, Clone)]
pub struct TypeRef {
    /// Dotted qualified name; primitive types keep their keyword spelling.
    pub name: String,
    pub type_args: Vec<TypeArg>,
    pub annotations: Vec<Annotation>,
    pub array_dims: usize,
    /// `new List<>()` style inference marker.
    pub diamond: bool,
    pub span: Span,
}

impl TypeRef {
    pub fn named(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            type_args: Vec::new(),
            annotations: Vec::new(),
            array_dims: 0,
            diamond: false,
            span,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(
            self.name.as_str(),
            "boolean" | "byte" | "short" | "int" | "long" | "char" | "float" | "double" | "void"
        ) && self.array_dims == 0
    }
}

impl AstNode for TypeRef {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<V: AstVisitor>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_type_ref(self)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.diamond {
            write!(f, "<>")?;
        }
        for _ in 0..self.array_dims {
            write!(f, "[]")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum TypeArg {
    Type(TypeRef),
    Wildcard(WildcardType),
}

#[derive(Debug, Clone)]
pub struct WildcardType {
    pub bound: Option<(BoundKind, TypeRef)>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    Extends,
    Super,
}

#[derive(Debug, Clone)]
pub struct TypeParam {
    pub annotations: Vec<Annotation>,
    pub name: String,
    pub bounds: Vec<TypeRef>,
    pub span: Span,
}

impl AstNode for TypeParam {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<V: AstVisitor>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_type_param(self)
    }
}

// Class Members

#[derive(Debug, Clone)]
pub enum ClassMember {
    Field(FieldDecl),
    Method(MethodDecl),
    Constructor(ConstructorDecl),
    Initializer(InitializerBlock),
    TypeDecl(TypeDecl),
}

impl ClassMember {
    pub fn span(&self) -> Span {
        match self {
            ClassMember::Field(f) => f.span,
            ClassMember::Method(m) => m.span,
            ClassMember::Constructor(c) => c.span,
            ClassMember::Initializer(i) => i.span,
            ClassMember::TypeDecl(t) => t.span(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub type_ref: TypeRef,
    pub variables: Vec<VariableDeclarator>,
    pub malformed: bool,
    pub span: Span,
}

impl AstNode for FieldDecl {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<V: AstVisitor>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_field_decl(self)
    }
}

#[derive(Debug, Clone)]
pub struct VariableDeclarator {
    pub name: String,
    pub array_dims: usize,
    pub initializer: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub type_params: Vec<TypeParam>,
    /// `None` for void methods.
    pub return_type: Option<TypeRef>,
    pub name: String,
    pub parameters: Vec<Parameter>,
    /// Trailing `[]` pairs after the parameter list (legacy array syntax).
    pub extra_dims: usize,
    pub throws: Vec<TypeRef>,
    /// `None` for abstract/native methods and for diet-parsed bodies.
    pub body: Option<Block>,
    /// Byte range of a body skipped in diet mode, available for re-parsing.
    pub body_range: Option<Span>,
    /// Annotation type elements only: the `default` clause value.
    pub default_value: Option<ElementValue>,
    pub malformed: bool,
    pub span: Span,
}

impl AstNode for MethodDecl {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<V: AstVisitor>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_method_decl(self)
    }
}

#[derive(Debug, Clone)]
pub struct ConstructorDecl {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub type_params: Vec<TypeParam>,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub throws: Vec<TypeRef>,
    pub explicit_invocation: Option<ExplicitCtorInvocation>,
    pub body: Option<Block>,
    pub body_range: Option<Span>,
    pub malformed: bool,
    pub span: Span,
}

impl AstNode for ConstructorDecl {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<V: AstVisitor>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_constructor_decl(self)
    }
}

#[derive(Debug, Clone)]
pub struct ExplicitCtorInvocation {
    pub kind: CtorCallKind,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum CtorCallKind {
    This,
    Super,
    /// `expr.super(...)` for inner class construction.
    QualifiedSuper(Box<Expr>),
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub type_ref: TypeRef,
    pub name: String,
    pub varargs: bool,
    pub span: Span,
}

impl AstNode for Parameter {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<V: AstVisitor>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_parameter(self)
    }
}

#[derive(Debug, Clone)]
pub struct InitializerBlock {
    pub is_static: bool,
    pub body: Option<Block>,
    pub body_range: Option<Span>,
    pub span: Span,
}

// Statements

#[derive(Debug, Clone)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

impl AstNode for Block {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<V: AstVisitor>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_block(self)
    }
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Expression(ExprStmt),
    Declaration(VarDeclStmt),
    TypeDecl(TypeDecl),
    If(IfStmt),
    While(WhileStmt),
    DoWhile(DoWhileStmt),
    For(ForStmt),
    ForEach(ForEachStmt),
    Switch(SwitchStmt),
    Return(ReturnStmt),
    Break(BreakStmt),
    Continue(ContinueStmt),
    Try(TryStmt),
    Throw(ThrowStmt),
    Assert(AssertStmt),
    Synchronized(SynchronizedStmt),
    Labeled(LabeledStmt),
    Block(Block),
    Empty,
}

#[derive(Debug, Clone)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct VarDeclStmt {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub type_ref: TypeRef,
    pub variables: Vec<VariableDeclarator>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct DoWhileStmt {
    pub body: Box<Stmt>,
    pub condition: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ForStmt {
    pub init: Vec<Stmt>,
    pub condition: Option<Expr>,
    pub update: Vec<ExprStmt>,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ForEachStmt {
    pub variable: Parameter,
    pub iterable: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct SwitchStmt {
    pub expression: Expr,
    pub cases: Vec<SwitchCase>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct SwitchCase {
    /// Empty labels indicates default.
    pub labels: Vec<Expr>,
    pub statements: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct BreakStmt {
    pub label: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ContinueStmt {
    pub label: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TryStmt {
    pub resources: Vec<TryResource>,
    pub try_block: Block,
    pub catch_clauses: Vec<CatchClause>,
    pub finally_block: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum TryResource {
    Var {
        modifiers: Vec<Modifier>,
        type_ref: TypeRef,
        name: String,
        initializer: Expr,
        span: Span,
    },
    Expr {
        expr: Expr,
        span: Span,
    },
}

#[derive(Debug, Clone)]
pub struct CatchClause {
    pub parameter: Parameter,
    /// Additional alternatives for multi-catch: catch (A | B e)
    pub alt_types: Vec<TypeRef>,
    pub block: Block,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ThrowStmt {
    pub expr: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct AssertStmt {
    pub condition: Expr,
    pub message: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct SynchronizedStmt {
    pub lock: Expr,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct LabeledStmt {
    pub label: String,
    pub statement: Box<Stmt>,
    pub span: Span,
}

// Expressions

#[derive(Debug, Clone)]
pub enum Expr {
    Literal(LiteralExpr),
    /// Simple or dotted name; resolution decides what it denotes.
    Identifier(IdentifierExpr),
    This(ThisExpr),
    Super(SuperExpr),
    Binary(BinaryExpr),
    /// Flattened `+` chain kept as one node to bound tree depth.
    CombinedBinary(CombinedBinaryExpr),
    Unary(UnaryExpr),
    Assignment(AssignmentExpr),
    MethodCall(MethodCallExpr),
    FieldAccess(FieldAccessExpr),
    ArrayAccess(ArrayAccessExpr),
    Cast(CastExpr),
    InstanceOf(InstanceOfExpr),
    Conditional(ConditionalExpr),
    New(NewExpr),
    NewArray(NewArrayExpr),
    ArrayInitializer(ArrayInitializerExpr),
    Lambda(LambdaExpr),
    MethodRef(MethodRefExpr),
    ClassLiteral(ClassLiteralExpr),
    Parenthesized(Box<Expr>),
    /// Placeholder the recovery pass leaves where an expression was lost.
    Empty(Span),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal(e) => e.span,
            Expr::Identifier(e) => e.span,
            Expr::This(e) => e.span,
            Expr::Super(e) => e.span,
            Expr::Binary(e) => e.span,
            Expr::CombinedBinary(e) => e.span,
            Expr::Unary(e) => e.span,
            Expr::Assignment(e) => e.span,
            Expr::MethodCall(e) => e.span,
            Expr::FieldAccess(e) => e.span,
            Expr::ArrayAccess(e) => e.span,
            Expr::Cast(e) => e.span,
            Expr::InstanceOf(e) => e.span,
            Expr::Conditional(e) => e.span,
            Expr::New(e) => e.span,
            Expr::NewArray(e) => e.span,
            Expr::ArrayInitializer(e) => e.span,
            Expr::Lambda(e) => e.span,
            Expr::MethodRef(e) => e.span,
            Expr::ClassLiteral(e) => e.span,
            Expr::Parenthesized(e) => e.span(),
            Expr::Empty(span) => *span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LiteralExpr {
    pub value: Literal,
    pub span: Span,
}

/// Integer values are kept wide: `2147483648` is only meaningful under a
/// unary minus, which is folded during parsing, and range checking is a
/// downstream concern.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    Char(char),
    String(String),
    Null,
}

#[derive(Debug, Clone)]
pub struct IdentifierExpr {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ThisExpr {
    /// `Outer.this` qualification.
    pub qualifier: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct SuperExpr {
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: BinaryOp,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    BitAnd,
    BitOr,
    BitXor,
    LShift,
    RShift,
    URShift,
    And,
    Or,
}

#[derive(Debug, Clone)]
pub struct CombinedBinaryExpr {
    pub operator: BinaryOp,
    /// At least two operands, in source order.
    pub operands: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub operator: UnaryOp,
    pub operand: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
    BitNot,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    LShiftAssign,
    RShiftAssign,
    URShiftAssign,
}

#[derive(Debug, Clone)]
pub struct AssignmentExpr {
    pub target: Box<Expr>,
    pub operator: AssignmentOp,
    pub value: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct MethodCallExpr {
    pub target: Option<Box<Expr>>,
    pub type_args: Vec<TypeArg>,
    pub name: String,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FieldAccessExpr {
    pub target: Option<Box<Expr>>,
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ArrayAccessExpr {
    pub array: Box<Expr>,
    pub index: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct CastExpr {
    pub target_type: TypeRef,
    pub expr: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct InstanceOfExpr {
    pub expr: Box<Expr>,
    pub target_type: TypeRef,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ConditionalExpr {
    pub condition: Box<Expr>,
    pub then_expr: Box<Expr>,
    pub else_expr: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct NewExpr {
    /// `expr.new Inner()` qualification.
    pub qualifier: Option<Box<Expr>>,
    pub target_type: TypeRef,
    pub type_args: Vec<TypeArg>,
    pub arguments: Vec<Expr>,
    pub anonymous_body: Option<Vec<ClassMember>>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct NewArrayExpr {
    pub element_type: TypeRef,
    /// Sized dimensions, e.g. the `[3][4]` of `new int[3][4][]`.
    pub dim_exprs: Vec<Expr>,
    /// Unsized trailing dimensions.
    pub extra_dims: usize,
    pub initializer: Option<ArrayInitializerExpr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ArrayInitializerExpr {
    pub values: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct LambdaExpr {
    pub parameters: Vec<LambdaParam>,
    /// Parenthesized vs. bare single identifier form.
    pub parenthesized: bool,
    pub body: LambdaBody,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct LambdaParam {
    pub modifiers: Vec<Modifier>,
    pub type_ref: Option<TypeRef>,
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum LambdaBody {
    Expr(Box<Expr>),
    Block(Block),
}

#[derive(Debug, Clone)]
pub struct MethodRefExpr {
    pub target: MethodRefTarget,
    pub type_args: Vec<TypeArg>,
    /// `None` stands for a constructor reference (`Type::new`).
    pub name: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum MethodRefTarget {
    Expr(Box<Expr>),
    Type(TypeRef),
    Super,
}

#[derive(Debug, Clone)]
pub struct ClassLiteralExpr {
    pub type_ref: TypeRef,
    pub span: Span,
}
