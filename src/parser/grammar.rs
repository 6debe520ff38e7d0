//! The grammar the parser tables are generated from.
//!
//! Productions follow the classic LALR(1) shape of the language reference:
//! a stratified expression ladder, left-recursive lists, and the
//! `( Expression )` cast form that is reinterpreted as a type by its semantic
//! action. Every construct whose first token is genuinely ambiguous under one
//! lookahead (type arguments vs. less-than, lambda parameter lists vs.
//! parenthesized expressions, type annotations vs. declaration annotations)
//! enters the grammar through a synthetic terminal that the driver substitutes
//! after consulting the lookahead oracle, so the productions themselves stay
//! conflict-clean.
//!
//! Rule order is load-bearing: reduce/reduce ties are resolved toward the
//! lowest rule number.

use crate::ast::{AssignmentOp, BinaryOp, Modifier, UnaryOp};
use crate::parser::diagnostics::LevelCell;
use crate::parser::lexer::Term;

/// Nonterminal alphabet. Discriminant order indexes the goto table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum NonTerm {
    Goal,
    LambdaParamsProbe,

    CompilationUnit,
    PackageDeclarationOpt,
    PackageDeclaration,
    ImportDeclarationsOpt,
    ImportDeclarations,
    ImportDeclaration,
    TypeDeclarationsOpt,
    TypeDeclarations,
    TypeDeclaration,

    Name,

    ModifiersOpt,
    Modifiers,
    Modifier,

    Annotation,
    ElementValuePairList,
    ElementValuePair,
    ElementValue,
    ElementValueList,
    ElementValueArrayInitializer,
    TypeAnnotation,
    TypeAnnotations,

    PrimitiveType,
    Type,
    ReferenceType,
    ClassOrInterfaceType,
    ArrayType,
    TypeArguments,
    TypeArgumentList,
    TypeArgument,
    TypeParameters,
    TypeParametersOpt,
    TypeParameterList,
    TypeParameter,
    TypeBound,

    ClassDeclaration,
    SuperOpt,
    InterfacesOpt,
    InterfaceTypeList,
    ClassBody,
    ClassBodyDeclarationsOpt,
    ClassBodyDeclarations,
    ClassBodyDeclaration,
    ClassMemberDeclaration,
    StaticInitializer,

    FieldDeclaration,
    VariableDeclarators,
    VariableDeclarator,
    VariableDeclaratorId,
    VariableInitializer,
    VariableInitializers,
    ArrayInitializer,

    MethodDeclaration,
    MethodHeader,
    MethodDeclarator,
    FormalParameterListOpt,
    FormalParameterList,
    FormalParameter,
    ThrowsOpt,
    ClassTypeList,
    MethodBody,

    ConstructorDeclaration,
    ConstructorBody,
    ExplicitConstructorInvocation,

    InterfaceDeclaration,
    ExtendsInterfacesOpt,

    EnumDeclaration,
    EnumBody,
    EnumConstantsOpt,
    EnumConstants,
    EnumConstant,
    EnumBodyDeclarationsOpt,

    AnnotationTypeDeclaration,

    Block,
    BlockStatementsOpt,
    BlockStatements,
    BlockStatement,
    LocalVariableDeclarationStatement,
    LocalVariableDeclaration,
    Statement,
    StatementExpression,
    ForInitOpt,
    ExpressionOpt,
    ForUpdateOpt,
    StatementExpressionList,
    SwitchBlock,
    SwitchBlockStatementGroups,
    SwitchBlockStatementGroup,
    SwitchLabels,
    SwitchLabel,
    Catches,
    CatchesOpt,
    FinallyOpt,
    CatchClause,
    CatchFormalParameter,
    CatchType,
    ResourceSpecification,
    Resources,
    Resource,
    Dims,
    DimsOpt,
    DimExprs,
    DimExpr,

    Expression,
    AssignmentExpression,
    Assignment,
    LeftHandSide,
    AssignmentOperator,
    ConditionalExpression,
    ConditionalOrExpression,
    ConditionalAndExpression,
    InclusiveOrExpression,
    ExclusiveOrExpression,
    AndExpression,
    EqualityExpression,
    RelationalExpression,
    ShiftExpression,
    AdditiveExpression,
    MultiplicativeExpression,
    UnaryExpression,
    PreIncrementExpression,
    PreDecrementExpression,
    UnaryExpressionNotPlusMinus,
    PostfixExpression,
    PostIncrementExpression,
    PostDecrementExpression,
    CastExpression,
    Primary,
    PrimaryNoNewArray,
    Literal,
    ClassInstanceCreationExpression,
    ArrayCreationExpression,
    FieldAccess,
    MethodInvocation,
    ArrayAccess,
    ArgumentListOpt,
    ArgumentList,
    MethodReference,
    LambdaExpression,
    LambdaParameterList,
    LambdaParameter,
    LambdaBody,
}

impl NonTerm {
    pub const COUNT: usize = NonTerm::LambdaBody as usize + 1;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> NonTerm {
        ALL_NONTERMS[index]
    }
}

pub(crate) static ALL_NONTERMS: [NonTerm; NonTerm::COUNT] = [
    NonTerm::Goal,
    NonTerm::LambdaParamsProbe,
    NonTerm::CompilationUnit,
    NonTerm::PackageDeclarationOpt,
    NonTerm::PackageDeclaration,
    NonTerm::ImportDeclarationsOpt,
    NonTerm::ImportDeclarations,
    NonTerm::ImportDeclaration,
    NonTerm::TypeDeclarationsOpt,
    NonTerm::TypeDeclarations,
    NonTerm::TypeDeclaration,
    NonTerm::Name,
    NonTerm::ModifiersOpt,
    NonTerm::Modifiers,
    NonTerm::Modifier,
    NonTerm::Annotation,
    NonTerm::ElementValuePairList,
    NonTerm::ElementValuePair,
    NonTerm::ElementValue,
    NonTerm::ElementValueList,
    NonTerm::ElementValueArrayInitializer,
    NonTerm::TypeAnnotation,
    NonTerm::TypeAnnotations,
    NonTerm::PrimitiveType,
    NonTerm::Type,
    NonTerm::ReferenceType,
    NonTerm::ClassOrInterfaceType,
    NonTerm::ArrayType,
    NonTerm::TypeArguments,
    NonTerm::TypeArgumentList,
    NonTerm::TypeArgument,
    NonTerm::TypeParameters,
    NonTerm::TypeParametersOpt,
    NonTerm::TypeParameterList,
    NonTerm::TypeParameter,
    NonTerm::TypeBound,
    NonTerm::ClassDeclaration,
    NonTerm::SuperOpt,
    NonTerm::InterfacesOpt,
    NonTerm::InterfaceTypeList,
    NonTerm::ClassBody,
    NonTerm::ClassBodyDeclarationsOpt,
    NonTerm::ClassBodyDeclarations,
    NonTerm::ClassBodyDeclaration,
    NonTerm::ClassMemberDeclaration,
    NonTerm::StaticInitializer,
    NonTerm::FieldDeclaration,
    NonTerm::VariableDeclarators,
    NonTerm::VariableDeclarator,
    NonTerm::VariableDeclaratorId,
    NonTerm::VariableInitializer,
    NonTerm::VariableInitializers,
    NonTerm::ArrayInitializer,
    NonTerm::MethodDeclaration,
    NonTerm::MethodHeader,
    NonTerm::MethodDeclarator,
    NonTerm::FormalParameterListOpt,
    NonTerm::FormalParameterList,
    NonTerm::FormalParameter,
    NonTerm::ThrowsOpt,
    NonTerm::ClassTypeList,
    NonTerm::MethodBody,
    NonTerm::ConstructorDeclaration,
    NonTerm::ConstructorBody,
    NonTerm::ExplicitConstructorInvocation,
    NonTerm::InterfaceDeclaration,
    NonTerm::ExtendsInterfacesOpt,
    NonTerm::EnumDeclaration,
    NonTerm::EnumBody,
    NonTerm::EnumConstantsOpt,
    NonTerm::EnumConstants,
    NonTerm::EnumConstant,
    NonTerm::EnumBodyDeclarationsOpt,
    NonTerm::AnnotationTypeDeclaration,
    NonTerm::Block,
    NonTerm::BlockStatementsOpt,
    NonTerm::BlockStatements,
    NonTerm::BlockStatement,
    NonTerm::LocalVariableDeclarationStatement,
    NonTerm::LocalVariableDeclaration,
    NonTerm::Statement,
    NonTerm::StatementExpression,
    NonTerm::ForInitOpt,
    NonTerm::ExpressionOpt,
    NonTerm::ForUpdateOpt,
    NonTerm::StatementExpressionList,
    NonTerm::SwitchBlock,
    NonTerm::SwitchBlockStatementGroups,
    NonTerm::SwitchBlockStatementGroup,
    NonTerm::SwitchLabels,
    NonTerm::SwitchLabel,
    NonTerm::Catches,
    NonTerm::CatchesOpt,
    NonTerm::FinallyOpt,
    NonTerm::CatchClause,
    NonTerm::CatchFormalParameter,
    NonTerm::CatchType,
    NonTerm::ResourceSpecification,
    NonTerm::Resources,
    NonTerm::Resource,
    NonTerm::Dims,
    NonTerm::DimsOpt,
    NonTerm::DimExprs,
    NonTerm::DimExpr,
    NonTerm::Expression,
    NonTerm::AssignmentExpression,
    NonTerm::Assignment,
    NonTerm::LeftHandSide,
    NonTerm::AssignmentOperator,
    NonTerm::ConditionalExpression,
    NonTerm::ConditionalOrExpression,
    NonTerm::ConditionalAndExpression,
    NonTerm::InclusiveOrExpression,
    NonTerm::ExclusiveOrExpression,
    NonTerm::AndExpression,
    NonTerm::EqualityExpression,
    NonTerm::RelationalExpression,
    NonTerm::ShiftExpression,
    NonTerm::AdditiveExpression,
    NonTerm::MultiplicativeExpression,
    NonTerm::UnaryExpression,
    NonTerm::PreIncrementExpression,
    NonTerm::PreDecrementExpression,
    NonTerm::UnaryExpressionNotPlusMinus,
    NonTerm::PostfixExpression,
    NonTerm::PostIncrementExpression,
    NonTerm::PostDecrementExpression,
    NonTerm::CastExpression,
    NonTerm::Primary,
    NonTerm::PrimaryNoNewArray,
    NonTerm::Literal,
    NonTerm::ClassInstanceCreationExpression,
    NonTerm::ArrayCreationExpression,
    NonTerm::FieldAccess,
    NonTerm::MethodInvocation,
    NonTerm::ArrayAccess,
    NonTerm::ArgumentListOpt,
    NonTerm::ArgumentList,
    NonTerm::MethodReference,
    NonTerm::LambdaExpression,
    NonTerm::LambdaParameterList,
    NonTerm::LambdaParameter,
    NonTerm::LambdaBody,
];

/// A grammar symbol: terminal or nonterminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sym {
    T(Term),
    N(NonTerm),
}

/// Which explicit constructor call form a rule builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtorKind {
    This,
    Super,
    QualifiedSuper,
}

/// Semantic action attached to a production, dispatched after each reduce.
///
/// `None` marks pass-through rules whose value is already in place on the
/// value stacks. List-building rules use the concat actions, mirroring the
/// length-stack discipline of the value stacks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RuleAction {
    None,
    ConcatAst,
    ConcatExpr,
    ConcatIdents,
    PushEmptyAst,
    PushEmptyExpr,

    CompilationUnit,
    NoPackage,
    PackageDeclaration,
    ImportDeclaration { is_static: bool, on_demand: bool },

    QualifiedName,

    ModifierKeyword(Modifier),
    MarkerAnnotation,
    NormalAnnotation,
    SingleValueAnnotation,
    EmptyArgsAnnotation,
    ElementValuePair,
    ElementValueFromExpr,
    ElementValueFromAnnotation,
    ElementValueArray,
    EmptyElementValueArray,
    MarkerTypeAnnotation,

    PrimitiveType(&'static str),
    TypeFromName,
    GenericType,
    ArrayTypeDim,
    NameArrayType,
    GenericArrayType,
    DimsOne,
    DimsBump,
    DimsZero,
    TypeArguments,
    Diamond,
    TypeArgFromType,
    AnnotatedTypeArg,
    WildcardAny,
    WildcardExtends,
    WildcardSuper,
    TypeParameter { bounds: bool },

    ClassDeclaration,
    InterfaceDeclaration,
    EnumDeclaration,
    AnnotationTypeDeclaration { has_modifiers: bool },
    EnumConstant { args: bool, body: bool },
    InstanceInitializer,
    StaticInitializer,
    MemberFromType,
    FieldDeclaration,
    DeclaratorNoInit,
    DeclaratorWithInit,
    DeclaratorId,
    DeclaratorIdDim,
    ArrayInitializer,
    EmptyArrayInitializer,
    MethodDeclaration,
    AnnotationElementDefault,
    NoMethodBody,
    MethodHeader { void: bool },
    MethodDeclarator,
    MethodDeclaratorDim,
    FormalParameter { varargs: bool },
    ConstructorDeclaration,
    ConstructorBody,
    ExplicitCtorCall(CtorKind),

    LocalClassStatement,
    LocalVariableDeclaration { has_modifiers: bool },
    StatementFromBlock,
    Block,
    EmptyStatement,
    ExpressionStatement,
    IfStatement { has_else: bool },
    WhileStatement,
    DoStatement,
    ForStatement,
    EnhancedForStatement { has_modifiers: bool },
    ForInitExprs,
    SwitchStatement,
    SwitchGroup,
    SwitchLabelsGroup,
    SwitchLabelsGroupConcat,
    CaseLabel,
    DefaultLabel,
    BreakStatement { label: bool },
    ContinueStatement { label: bool },
    ReturnStatement,
    ThrowStatement,
    SynchronizedStatement,
    TryStatement { catches: bool, has_finally: bool },
    TryWithResources,
    CatchClause,
    CatchParameter { has_modifiers: bool },
    MultiCatchType,
    Resource { has_modifiers: bool },
    AssertStatement { message: bool },
    LabeledStatement,

    Assignment,
    AssignOp(AssignmentOp),
    ConditionalExpr,
    Binary(BinaryOp),
    BinaryAdd,
    InstanceOfExpr,
    Unary(UnaryOp),
    UnaryMinus,
    CastPrimitive,
    CastFromExpr,
    CastArray,
    CastGeneric,
    NameToExpr,
    ThisExpr,
    QualifiedThisExpr,
    Parenthesized,
    ClassLiteralName { dims: bool },
    ClassLiteralPrimitive { dims: bool },
    ClassLiteralVoid,
    NewExpr { body: bool },
    QualifiedNew { body: bool, from_name: bool },
    NewArray { init: bool },
    FieldAccessExpr,
    SuperFieldAccess,
    MethodInvocationName,
    MethodInvocationPrimary { generic: bool },
    MethodInvocationGenericName,
    SuperMethodInvocation,
    ArrayAccessName,
    ArrayAccessPrimary,
    MethodRefName { ctor: bool },
    MethodRefPrimary,
    MethodRefSuper,
    LambdaSimple,
    Lambda { params: bool },
    InferredLambdaParam,
    TypedLambdaParam { has_modifiers: bool },
    LambdaBodyExpr,
    LambdaBodyBlock,
}

/// One production.
#[derive(Debug, Clone)]
pub struct Rule {
    pub lhs: NonTerm,
    pub rhs: Vec<Sym>,
    pub action: RuleAction,
    /// Minimum source level; reducing this rule below it reports a
    /// version-gated problem without invalidating the parse.
    pub min_level: LevelCell,
}

/// The full grammar plus per-nonterminal rule indices.
pub struct Grammar {
    pub rules: Vec<Rule>,
    by_lhs: Vec<Vec<u16>>,
    /// Rule index of the lambda-parameter-list probe goal.
    pub lambda_probe_rule: u16,
}

impl Grammar {
    pub fn rules_for(&self, nt: NonTerm) -> &[u16] {
        &self.by_lhs[nt.index()]
    }
}

const J4: LevelCell = 4;
const J5: LevelCell = 5;
const J7: LevelCell = 7;
const J8: LevelCell = 8;

struct Builder {
    rules: Vec<Rule>,
}

impl Builder {
    fn r(&mut self, lhs: NonTerm, rhs: Vec<Sym>, action: RuleAction) {
        self.rl(lhs, rhs, action, 0);
    }

    fn rl(&mut self, lhs: NonTerm, rhs: Vec<Sym>, action: RuleAction, min_level: LevelCell) {
        self.rules.push(Rule { lhs, rhs, action, min_level });
    }

    fn finish(self) -> Grammar {
        let mut by_lhs = vec![Vec::new(); NonTerm::COUNT];
        let mut lambda_probe_rule = 0u16;
        for (i, rule) in self.rules.iter().enumerate() {
            by_lhs[rule.lhs.index()].push(i as u16);
            if rule.lhs == NonTerm::Goal && rule.rhs.first() == Some(&Sym::T(Term::Arrow)) {
                lambda_probe_rule = i as u16;
            }
        }
        Grammar { rules: self.rules, by_lhs, lambda_probe_rule }
    }
}

/// Build the grammar. Called once; the generated tables are cached process-wide.
pub fn build_grammar() -> Grammar {
    use crate::ast::Modifier as Kw;
    use NonTerm::*;
    use RuleAction as A;
    use Sym::{N, T};
    use Term::{
        Abstract, Amp, AndAnd, Arrow, Assert, Assign, At, AtType, Bang, BeginLambda, Boolean,
        Break, Byte, CaretAssign as TCaretAssign, Case, Catch, Char, Class, Colon, ColonColon,
        Comma, Continue, Dec, Default, DefaultModifier, Do, Dot, Double, Ellipsis, Else, Enum,
        EqEq, Extends,
        Final, Finally, Float, For, Ge, Gt, Identifier, If, Implements, Import, Inc, Instanceof,
        Int, Interface, LBrace, LBracket, LParen, LShift, Le, Long, Lt, Minus, Native, Ne, New,
        Null, OrOr, Package, Percent, Pipe, Plus, Private, Protected, Public, Question, RBrace,
        RBracket, RParen, RShift, Return, Semicolon, Short, Slash, Star, Static, Strictfp, Super,
        Switch, Synchronized, This, Throw, Throws, Tilde, Transient, Try, TypeArgLt, URShift,
        Void, Volatile, While,
    };

    let mut g = Builder { rules: Vec::with_capacity(320) };

    // ===== Goals =====
    // Each entry point injects its selector pseudo-token as the first symbol,
    // so one table set serves every goal.
    g.r(Goal, vec![T(Term::GoalCompilationUnit), N(CompilationUnit)], A::None);
    g.r(Goal, vec![T(Term::GoalClassBodyDeclarations), N(ClassBodyDeclarationsOpt)], A::None);
    g.r(Goal, vec![T(Term::GoalBlockStatements), N(BlockStatementsOpt)], A::None);
    g.r(Goal, vec![T(Term::GoalExpression), N(Expression)], A::None);
    g.r(Goal, vec![T(Term::GoalHeaders), N(ClassBodyDeclarationsOpt)], A::None);
    // Speculative goal for the lambda oracle; Arrow doubles as its selector.
    g.r(Goal, vec![T(Arrow), N(LambdaParamsProbe)], A::None);
    g.r(LambdaParamsProbe, vec![T(LParen), T(RParen)], A::None);
    g.r(LambdaParamsProbe, vec![T(LParen), N(LambdaParameterList), T(RParen)], A::None);

    // ===== Compilation unit =====
    g.r(
        CompilationUnit,
        vec![N(PackageDeclarationOpt), N(ImportDeclarationsOpt), N(TypeDeclarationsOpt)],
        A::CompilationUnit,
    );
    g.r(PackageDeclarationOpt, vec![], A::NoPackage);
    g.r(PackageDeclarationOpt, vec![N(PackageDeclaration)], A::None);
    g.r(PackageDeclaration, vec![T(Package), N(Name), T(Semicolon)], A::PackageDeclaration);
    g.r(ImportDeclarationsOpt, vec![], A::PushEmptyAst);
    g.r(ImportDeclarationsOpt, vec![N(ImportDeclarations)], A::None);
    g.r(ImportDeclarations, vec![N(ImportDeclaration)], A::None);
    g.r(ImportDeclarations, vec![N(ImportDeclarations), N(ImportDeclaration)], A::ConcatAst);
    g.r(
        ImportDeclaration,
        vec![T(Import), N(Name), T(Semicolon)],
        A::ImportDeclaration { is_static: false, on_demand: false },
    );
    g.r(
        ImportDeclaration,
        vec![T(Import), N(Name), T(Dot), T(Star), T(Semicolon)],
        A::ImportDeclaration { is_static: false, on_demand: true },
    );
    g.rl(
        ImportDeclaration,
        vec![T(Import), T(Static), N(Name), T(Semicolon)],
        A::ImportDeclaration { is_static: true, on_demand: false },
        J5,
    );
    g.rl(
        ImportDeclaration,
        vec![T(Import), T(Static), N(Name), T(Dot), T(Star), T(Semicolon)],
        A::ImportDeclaration { is_static: true, on_demand: true },
        J5,
    );
    g.r(TypeDeclarationsOpt, vec![], A::PushEmptyAst);
    g.r(TypeDeclarationsOpt, vec![N(TypeDeclarations)], A::None);
    g.r(TypeDeclarations, vec![N(TypeDeclaration)], A::None);
    g.r(TypeDeclarations, vec![N(TypeDeclarations), N(TypeDeclaration)], A::ConcatAst);
    g.r(TypeDeclaration, vec![N(ClassDeclaration)], A::None);
    g.r(TypeDeclaration, vec![N(InterfaceDeclaration)], A::None);
    g.r(TypeDeclaration, vec![N(EnumDeclaration)], A::None);
    g.r(TypeDeclaration, vec![N(AnnotationTypeDeclaration)], A::None);
    g.r(TypeDeclaration, vec![T(Semicolon)], A::PushEmptyAst);

    // ===== Names =====
    // Segments accumulate on the identifier stack; consumers join them.
    g.r(Name, vec![T(Identifier)], A::None);
    g.r(Name, vec![N(Name), T(Dot), T(Identifier)], A::QualifiedName);

    // ===== Modifiers =====
    // Keyword modifiers and annotations interleave in one ast-stack list.
    g.r(ModifiersOpt, vec![], A::PushEmptyAst);
    g.r(ModifiersOpt, vec![N(Modifiers)], A::None);
    g.r(Modifiers, vec![N(Modifier)], A::None);
    g.r(Modifiers, vec![N(Modifiers), N(Modifier)], A::ConcatAst);
    g.r(Modifier, vec![T(Public)], A::ModifierKeyword(Kw::Public));
    g.r(Modifier, vec![T(Protected)], A::ModifierKeyword(Kw::Protected));
    g.r(Modifier, vec![T(Private)], A::ModifierKeyword(Kw::Private));
    g.r(Modifier, vec![T(Abstract)], A::ModifierKeyword(Kw::Abstract));
    g.r(Modifier, vec![T(Static)], A::ModifierKeyword(Kw::Static));
    g.r(Modifier, vec![T(Final)], A::ModifierKeyword(Kw::Final));
    g.r(Modifier, vec![T(Native)], A::ModifierKeyword(Kw::Native));
    g.r(Modifier, vec![T(Synchronized)], A::ModifierKeyword(Kw::Synchronized));
    g.r(Modifier, vec![T(Transient)], A::ModifierKeyword(Kw::Transient));
    g.r(Modifier, vec![T(Volatile)], A::ModifierKeyword(Kw::Volatile));
    g.r(Modifier, vec![T(Strictfp)], A::ModifierKeyword(Kw::Strictfp));
    // `default` reaches the tables as the rewritten modifier marker; the raw
    // keyword is reserved for switch labels so the two uses never collide in
    // one lookahead.
    g.rl(Modifier, vec![T(DefaultModifier)], A::ModifierKeyword(Kw::Default), J8);
    g.rl(Modifier, vec![N(Annotation)], A::None, J5);

    // ===== Annotations =====
    g.rl(Annotation, vec![T(At), N(Name)], A::MarkerAnnotation, J5);
    g.rl(Annotation, vec![T(At), N(Name), T(LParen), T(RParen)], A::EmptyArgsAnnotation, J5);
    g.rl(
        Annotation,
        vec![T(At), N(Name), T(LParen), N(ElementValuePairList), T(RParen)],
        A::NormalAnnotation,
        J5,
    );
    g.rl(
        Annotation,
        vec![T(At), N(Name), T(LParen), N(ElementValue), T(RParen)],
        A::SingleValueAnnotation,
        J5,
    );
    g.r(ElementValuePairList, vec![N(ElementValuePair)], A::None);
    g.r(
        ElementValuePairList,
        vec![N(ElementValuePairList), T(Comma), N(ElementValuePair)],
        A::ConcatAst,
    );
    g.r(
        ElementValuePair,
        vec![T(Identifier), T(Assign), N(ElementValue)],
        A::ElementValuePair,
    );
    g.r(ElementValue, vec![N(ConditionalExpression)], A::ElementValueFromExpr);
    g.r(ElementValue, vec![N(Annotation)], A::ElementValueFromAnnotation);
    g.r(ElementValue, vec![N(ElementValueArrayInitializer)], A::None);
    g.r(ElementValueArrayInitializer, vec![T(LBrace), T(RBrace)], A::EmptyElementValueArray);
    g.r(
        ElementValueArrayInitializer,
        vec![T(LBrace), N(ElementValueList), T(RBrace)],
        A::ElementValueArray,
    );
    g.r(
        ElementValueArrayInitializer,
        vec![T(LBrace), N(ElementValueList), T(Comma), T(RBrace)],
        A::ElementValueArray,
    );
    g.r(ElementValueList, vec![N(ElementValue)], A::None);
    g.r(ElementValueList, vec![N(ElementValueList), T(Comma), N(ElementValue)], A::ConcatAst);

    // Type annotations reach the grammar only through the AtType marker.
    g.rl(TypeAnnotation, vec![T(AtType), N(Name)], A::MarkerTypeAnnotation, J8);
    g.r(TypeAnnotations, vec![N(TypeAnnotation)], A::None);
    g.r(TypeAnnotations, vec![N(TypeAnnotations), N(TypeAnnotation)], A::ConcatAst);

    // ===== Types =====
    g.r(PrimitiveType, vec![T(Boolean)], A::PrimitiveType("boolean"));
    g.r(PrimitiveType, vec![T(Byte)], A::PrimitiveType("byte"));
    g.r(PrimitiveType, vec![T(Short)], A::PrimitiveType("short"));
    g.r(PrimitiveType, vec![T(Int)], A::PrimitiveType("int"));
    g.r(PrimitiveType, vec![T(Long)], A::PrimitiveType("long"));
    g.r(PrimitiveType, vec![T(Char)], A::PrimitiveType("char"));
    g.r(PrimitiveType, vec![T(Float)], A::PrimitiveType("float"));
    g.r(PrimitiveType, vec![T(Double)], A::PrimitiveType("double"));
    g.r(Type, vec![N(PrimitiveType)], A::None);
    g.r(Type, vec![N(ReferenceType)], A::None);
    g.r(ReferenceType, vec![N(ClassOrInterfaceType)], A::None);
    g.r(ReferenceType, vec![N(ArrayType)], A::None);
    g.r(ClassOrInterfaceType, vec![N(Name)], A::TypeFromName);
    g.rl(ClassOrInterfaceType, vec![N(Name), N(TypeArguments)], A::GenericType, J5);
    g.r(ArrayType, vec![N(PrimitiveType), T(LBracket), T(RBracket)], A::ArrayTypeDim);
    g.r(ArrayType, vec![N(Name), T(LBracket), T(RBracket)], A::NameArrayType);
    g.rl(
        ArrayType,
        vec![N(Name), N(TypeArguments), T(LBracket), T(RBracket)],
        A::GenericArrayType,
        J5,
    );
    g.r(ArrayType, vec![N(ArrayType), T(LBracket), T(RBracket)], A::ArrayTypeDim);

    g.rl(TypeArguments, vec![T(TypeArgLt), N(TypeArgumentList), T(Gt)], A::TypeArguments, J5);
    g.rl(TypeArguments, vec![T(TypeArgLt), T(Gt)], A::Diamond, J7);
    g.r(TypeArgumentList, vec![N(TypeArgument)], A::None);
    g.r(TypeArgumentList, vec![N(TypeArgumentList), T(Comma), N(TypeArgument)], A::ConcatAst);
    g.r(TypeArgument, vec![N(ReferenceType)], A::TypeArgFromType);
    g.rl(TypeArgument, vec![N(TypeAnnotations), N(ReferenceType)], A::AnnotatedTypeArg, J8);
    g.r(TypeArgument, vec![T(Question)], A::WildcardAny);
    g.r(TypeArgument, vec![T(Question), T(Extends), N(ReferenceType)], A::WildcardExtends);
    g.r(TypeArgument, vec![T(Question), T(Super), N(ReferenceType)], A::WildcardSuper);

    g.rl(TypeParameters, vec![T(TypeArgLt), N(TypeParameterList), T(Gt)], A::None, J5);
    g.r(TypeParameterList, vec![N(TypeParameter)], A::None);
    g.r(TypeParameterList, vec![N(TypeParameterList), T(Comma), N(TypeParameter)], A::ConcatAst);
    g.r(TypeParameter, vec![T(Identifier)], A::TypeParameter { bounds: false });
    g.r(TypeParameter, vec![T(Identifier), N(TypeBound)], A::TypeParameter { bounds: true });
    g.r(TypeBound, vec![T(Extends), N(ClassOrInterfaceType)], A::None);
    g.r(TypeBound, vec![N(TypeBound), T(Amp), N(ClassOrInterfaceType)], A::ConcatAst);
    g.r(TypeParametersOpt, vec![], A::PushEmptyAst);
    g.r(TypeParametersOpt, vec![N(TypeParameters)], A::None);

    // ===== Class declaration =====
    g.r(
        ClassDeclaration,
        vec![
            N(ModifiersOpt),
            T(Class),
            T(Identifier),
            N(TypeParametersOpt),
            N(SuperOpt),
            N(InterfacesOpt),
            N(ClassBody),
        ],
        A::ClassDeclaration,
    );
    g.r(SuperOpt, vec![], A::PushEmptyAst);
    g.r(SuperOpt, vec![T(Extends), N(ClassOrInterfaceType)], A::None);
    g.r(InterfacesOpt, vec![], A::PushEmptyAst);
    g.r(InterfacesOpt, vec![T(Implements), N(InterfaceTypeList)], A::None);
    g.r(InterfaceTypeList, vec![N(ClassOrInterfaceType)], A::None);
    g.r(InterfaceTypeList, vec![N(InterfaceTypeList), T(Comma), N(ClassOrInterfaceType)], A::ConcatAst);
    g.r(ClassBody, vec![T(LBrace), N(ClassBodyDeclarationsOpt), T(RBrace)], A::None);
    g.r(ClassBodyDeclarationsOpt, vec![], A::PushEmptyAst);
    g.r(ClassBodyDeclarationsOpt, vec![N(ClassBodyDeclarations)], A::None);
    g.r(ClassBodyDeclarations, vec![N(ClassBodyDeclaration)], A::None);
    g.r(
        ClassBodyDeclarations,
        vec![N(ClassBodyDeclarations), N(ClassBodyDeclaration)],
        A::ConcatAst,
    );
    g.r(ClassBodyDeclaration, vec![N(ClassMemberDeclaration)], A::None);
    g.r(ClassBodyDeclaration, vec![N(StaticInitializer)], A::None);
    g.r(ClassBodyDeclaration, vec![N(ConstructorDeclaration)], A::None);
    g.r(ClassBodyDeclaration, vec![N(Block)], A::InstanceInitializer);
    g.r(ClassMemberDeclaration, vec![N(FieldDeclaration)], A::None);
    g.r(ClassMemberDeclaration, vec![N(MethodDeclaration)], A::None);
    g.r(ClassMemberDeclaration, vec![N(ClassDeclaration)], A::MemberFromType);
    g.r(ClassMemberDeclaration, vec![N(InterfaceDeclaration)], A::MemberFromType);
    g.rl(ClassMemberDeclaration, vec![N(EnumDeclaration)], A::MemberFromType, J5);
    g.rl(ClassMemberDeclaration, vec![N(AnnotationTypeDeclaration)], A::MemberFromType, J5);
    g.r(ClassMemberDeclaration, vec![T(Semicolon)], A::PushEmptyAst);
    g.r(StaticInitializer, vec![T(Static), N(Block)], A::StaticInitializer);

    // ===== Fields =====
    // Shares the ModifiersOpt TypeParametersOpt prefix with method and
    // constructor headers; type parameters on a field mark it malformed.
    g.r(
        FieldDeclaration,
        vec![
            N(ModifiersOpt),
            N(TypeParametersOpt),
            N(Type),
            N(VariableDeclarators),
            T(Semicolon),
        ],
        A::FieldDeclaration,
    );
    g.r(VariableDeclarators, vec![N(VariableDeclarator)], A::None);
    g.r(
        VariableDeclarators,
        vec![N(VariableDeclarators), T(Comma), N(VariableDeclarator)],
        A::ConcatAst,
    );
    g.r(VariableDeclarator, vec![N(VariableDeclaratorId)], A::DeclaratorNoInit);
    g.r(
        VariableDeclarator,
        vec![N(VariableDeclaratorId), T(Assign), N(VariableInitializer)],
        A::DeclaratorWithInit,
    );
    g.r(VariableDeclaratorId, vec![T(Identifier)], A::DeclaratorId);
    g.r(
        VariableDeclaratorId,
        vec![N(VariableDeclaratorId), T(LBracket), T(RBracket)],
        A::DeclaratorIdDim,
    );
    g.r(VariableInitializer, vec![N(Expression)], A::None);
    g.r(VariableInitializer, vec![N(ArrayInitializer)], A::None);
    g.r(ArrayInitializer, vec![T(LBrace), T(RBrace)], A::EmptyArrayInitializer);
    g.r(ArrayInitializer, vec![T(LBrace), T(Comma), T(RBrace)], A::EmptyArrayInitializer);
    g.r(
        ArrayInitializer,
        vec![T(LBrace), N(VariableInitializers), T(RBrace)],
        A::ArrayInitializer,
    );
    g.r(
        ArrayInitializer,
        vec![T(LBrace), N(VariableInitializers), T(Comma), T(RBrace)],
        A::ArrayInitializer,
    );
    g.r(VariableInitializers, vec![N(VariableInitializer)], A::None);
    g.r(
        VariableInitializers,
        vec![N(VariableInitializers), T(Comma), N(VariableInitializer)],
        A::ConcatExpr,
    );

    // ===== Methods =====
    g.r(MethodDeclaration, vec![N(MethodHeader), N(MethodBody)], A::MethodDeclaration);
    // Annotation type elements reuse the method header shape.
    g.rl(
        MethodDeclaration,
        vec![N(MethodHeader), T(DefaultModifier), N(ElementValue), T(Semicolon)],
        A::AnnotationElementDefault,
        J5,
    );
    g.r(MethodBody, vec![N(Block)], A::None);
    g.r(MethodBody, vec![T(Semicolon)], A::NoMethodBody);
    g.r(
        MethodHeader,
        vec![N(ModifiersOpt), N(TypeParametersOpt), N(Type), N(MethodDeclarator), N(ThrowsOpt)],
        A::MethodHeader { void: false },
    );
    g.r(
        MethodHeader,
        vec![N(ModifiersOpt), N(TypeParametersOpt), T(Void), N(MethodDeclarator), N(ThrowsOpt)],
        A::MethodHeader { void: true },
    );
    g.r(
        MethodDeclarator,
        vec![T(Identifier), T(LParen), N(FormalParameterListOpt), T(RParen)],
        A::MethodDeclarator,
    );
    g.r(
        MethodDeclarator,
        vec![N(MethodDeclarator), T(LBracket), T(RBracket)],
        A::MethodDeclaratorDim,
    );
    g.r(FormalParameterListOpt, vec![], A::PushEmptyAst);
    g.r(FormalParameterListOpt, vec![N(FormalParameterList)], A::None);
    g.r(FormalParameterList, vec![N(FormalParameter)], A::None);
    g.r(
        FormalParameterList,
        vec![N(FormalParameterList), T(Comma), N(FormalParameter)],
        A::ConcatAst,
    );
    g.r(
        FormalParameter,
        vec![N(ModifiersOpt), N(Type), N(VariableDeclaratorId)],
        A::FormalParameter { varargs: false },
    );
    g.rl(
        FormalParameter,
        vec![N(ModifiersOpt), N(Type), T(Ellipsis), N(VariableDeclaratorId)],
        A::FormalParameter { varargs: true },
        J5,
    );
    g.r(ThrowsOpt, vec![], A::PushEmptyAst);
    g.r(ThrowsOpt, vec![T(Throws), N(ClassTypeList)], A::None);
    g.r(ClassTypeList, vec![N(ClassOrInterfaceType)], A::None);
    g.r(ClassTypeList, vec![N(ClassTypeList), T(Comma), N(ClassOrInterfaceType)], A::ConcatAst);

    // ===== Constructors =====
    g.r(
        ConstructorDeclaration,
        vec![
            N(ModifiersOpt),
            N(TypeParametersOpt),
            T(Identifier),
            T(LParen),
            N(FormalParameterListOpt),
            T(RParen),
            N(ThrowsOpt),
            N(ConstructorBody),
        ],
        A::ConstructorDeclaration,
    );
    // A leading explicit constructor call parses as an ordinary block
    // statement; the constructor action pulls it off the front of the list.
    g.r(
        ConstructorBody,
        vec![T(LBrace), N(BlockStatementsOpt), T(RBrace)],
        A::ConstructorBody,
    );
    g.r(
        ExplicitConstructorInvocation,
        vec![T(This), T(LParen), N(ArgumentListOpt), T(RParen), T(Semicolon)],
        A::ExplicitCtorCall(CtorKind::This),
    );
    g.r(
        ExplicitConstructorInvocation,
        vec![T(Super), T(LParen), N(ArgumentListOpt), T(RParen), T(Semicolon)],
        A::ExplicitCtorCall(CtorKind::Super),
    );
    g.r(
        ExplicitConstructorInvocation,
        vec![
            N(Primary),
            T(Dot),
            T(Super),
            T(LParen),
            N(ArgumentListOpt),
            T(RParen),
            T(Semicolon),
        ],
        A::ExplicitCtorCall(CtorKind::QualifiedSuper),
    );

    // ===== Interfaces =====
    g.r(
        InterfaceDeclaration,
        vec![
            N(ModifiersOpt),
            T(Interface),
            T(Identifier),
            N(TypeParametersOpt),
            N(ExtendsInterfacesOpt),
            N(ClassBody),
        ],
        A::InterfaceDeclaration,
    );
    g.r(ExtendsInterfacesOpt, vec![], A::PushEmptyAst);
    g.r(ExtendsInterfacesOpt, vec![T(Extends), N(InterfaceTypeList)], A::None);

    // ===== Enums =====
    g.rl(
        EnumDeclaration,
        vec![N(ModifiersOpt), T(Enum), T(Identifier), N(InterfacesOpt), N(EnumBody)],
        A::EnumDeclaration,
        J5,
    );
    g.r(
        EnumBody,
        vec![T(LBrace), N(EnumConstantsOpt), N(EnumBodyDeclarationsOpt), T(RBrace)],
        A::None,
    );
    g.r(EnumConstantsOpt, vec![], A::PushEmptyAst);
    g.r(EnumConstantsOpt, vec![N(EnumConstants)], A::None);
    g.r(EnumConstantsOpt, vec![N(EnumConstants), T(Comma)], A::None);
    g.r(EnumConstants, vec![N(EnumConstant)], A::None);
    g.r(EnumConstants, vec![N(EnumConstants), T(Comma), N(EnumConstant)], A::ConcatAst);
    g.r(
        EnumConstant,
        vec![N(ModifiersOpt), T(Identifier)],
        A::EnumConstant { args: false, body: false },
    );
    g.r(
        EnumConstant,
        vec![N(ModifiersOpt), T(Identifier), T(LParen), N(ArgumentListOpt), T(RParen)],
        A::EnumConstant { args: true, body: false },
    );
    g.r(
        EnumConstant,
        vec![N(ModifiersOpt), T(Identifier), N(ClassBody)],
        A::EnumConstant { args: false, body: true },
    );
    g.r(
        EnumConstant,
        vec![
            N(ModifiersOpt),
            T(Identifier),
            T(LParen),
            N(ArgumentListOpt),
            T(RParen),
            N(ClassBody),
        ],
        A::EnumConstant { args: true, body: true },
    );
    g.r(EnumBodyDeclarationsOpt, vec![], A::PushEmptyAst);
    g.r(EnumBodyDeclarationsOpt, vec![T(Semicolon), N(ClassBodyDeclarationsOpt)], A::None);

    // ===== Annotation type declarations =====
    // No ModifiersOpt here: the leading `@` must be shiftable both as an
    // annotation start and as the `@interface` introducer.
    g.rl(
        AnnotationTypeDeclaration,
        vec![N(Modifiers), T(At), T(Interface), T(Identifier), N(ClassBody)],
        A::AnnotationTypeDeclaration { has_modifiers: true },
        J5,
    );
    g.rl(
        AnnotationTypeDeclaration,
        vec![T(At), T(Interface), T(Identifier), N(ClassBody)],
        A::AnnotationTypeDeclaration { has_modifiers: false },
        J5,
    );

    // ===== Blocks and statements =====
    g.r(Block, vec![T(LBrace), N(BlockStatementsOpt), T(RBrace)], A::Block);
    g.r(BlockStatementsOpt, vec![], A::PushEmptyAst);
    g.r(BlockStatementsOpt, vec![N(BlockStatements)], A::None);
    g.r(BlockStatements, vec![N(BlockStatement)], A::None);
    g.r(BlockStatements, vec![N(BlockStatements), N(BlockStatement)], A::ConcatAst);
    g.r(BlockStatement, vec![N(LocalVariableDeclarationStatement)], A::None);
    g.r(BlockStatement, vec![N(ClassDeclaration)], A::LocalClassStatement);
    g.r(BlockStatement, vec![N(Statement)], A::None);
    g.r(BlockStatement, vec![N(ExplicitConstructorInvocation)], A::None);
    g.r(
        LocalVariableDeclarationStatement,
        vec![N(LocalVariableDeclaration), T(Semicolon)],
        A::None,
    );
    // Duplicated with explicit Modifiers: an optional-modifiers form would
    // collide with expression statements at block-statement starts.
    g.r(
        LocalVariableDeclaration,
        vec![N(Type), N(VariableDeclarators)],
        A::LocalVariableDeclaration { has_modifiers: false },
    );
    g.r(
        LocalVariableDeclaration,
        vec![N(Modifiers), N(Type), N(VariableDeclarators)],
        A::LocalVariableDeclaration { has_modifiers: true },
    );

    g.r(Statement, vec![N(Block)], A::StatementFromBlock);
    g.r(Statement, vec![T(Semicolon)], A::EmptyStatement);
    g.r(Statement, vec![N(StatementExpression), T(Semicolon)], A::ExpressionStatement);
    g.r(
        Statement,
        vec![T(If), T(LParen), N(Expression), T(RParen), N(Statement)],
        A::IfStatement { has_else: false },
    );
    g.r(
        Statement,
        vec![
            T(If),
            T(LParen),
            N(Expression),
            T(RParen),
            N(Statement),
            T(Else),
            N(Statement),
        ],
        A::IfStatement { has_else: true },
    );
    g.r(
        Statement,
        vec![T(While), T(LParen), N(Expression), T(RParen), N(Statement)],
        A::WhileStatement,
    );
    g.r(
        Statement,
        vec![
            T(Do),
            N(Statement),
            T(While),
            T(LParen),
            N(Expression),
            T(RParen),
            T(Semicolon),
        ],
        A::DoStatement,
    );
    g.r(
        Statement,
        vec![
            T(For),
            T(LParen),
            N(ForInitOpt),
            T(Semicolon),
            N(ExpressionOpt),
            T(Semicolon),
            N(ForUpdateOpt),
            T(RParen),
            N(Statement),
        ],
        A::ForStatement,
    );
    g.rl(
        Statement,
        vec![
            T(For),
            T(LParen),
            N(Type),
            N(VariableDeclaratorId),
            T(Colon),
            N(Expression),
            T(RParen),
            N(Statement),
        ],
        A::EnhancedForStatement { has_modifiers: false },
        J5,
    );
    g.rl(
        Statement,
        vec![
            T(For),
            T(LParen),
            N(Modifiers),
            N(Type),
            N(VariableDeclaratorId),
            T(Colon),
            N(Expression),
            T(RParen),
            N(Statement),
        ],
        A::EnhancedForStatement { has_modifiers: true },
        J5,
    );
    g.r(
        Statement,
        vec![T(Switch), T(LParen), N(Expression), T(RParen), N(SwitchBlock)],
        A::SwitchStatement,
    );
    g.r(Statement, vec![T(Break), T(Semicolon)], A::BreakStatement { label: false });
    g.r(
        Statement,
        vec![T(Break), T(Identifier), T(Semicolon)],
        A::BreakStatement { label: true },
    );
    g.r(Statement, vec![T(Continue), T(Semicolon)], A::ContinueStatement { label: false });
    g.r(
        Statement,
        vec![T(Continue), T(Identifier), T(Semicolon)],
        A::ContinueStatement { label: true },
    );
    g.r(Statement, vec![T(Return), N(ExpressionOpt), T(Semicolon)], A::ReturnStatement);
    g.r(Statement, vec![T(Throw), N(Expression), T(Semicolon)], A::ThrowStatement);
    g.r(
        Statement,
        vec![T(Synchronized), T(LParen), N(Expression), T(RParen), N(Block)],
        A::SynchronizedStatement,
    );
    g.r(
        Statement,
        vec![T(Try), N(Block), N(Catches)],
        A::TryStatement { catches: true, has_finally: false },
    );
    g.r(
        Statement,
        vec![T(Try), N(Block), N(Catches), T(Finally), N(Block)],
        A::TryStatement { catches: true, has_finally: true },
    );
    g.r(
        Statement,
        vec![T(Try), N(Block), T(Finally), N(Block)],
        A::TryStatement { catches: false, has_finally: true },
    );
    g.rl(
        Statement,
        vec![
            T(Try),
            N(ResourceSpecification),
            N(Block),
            N(CatchesOpt),
            N(FinallyOpt),
        ],
        A::TryWithResources,
        J7,
    );
    g.rl(
        Statement,
        vec![T(Assert), N(Expression), T(Semicolon)],
        A::AssertStatement { message: false },
        J4,
    );
    g.rl(
        Statement,
        vec![T(Assert), N(Expression), T(Colon), N(Expression), T(Semicolon)],
        A::AssertStatement { message: true },
        J4,
    );
    g.r(Statement, vec![T(Identifier), T(Colon), N(Statement)], A::LabeledStatement);

    g.r(ForInitOpt, vec![], A::PushEmptyAst);
    g.r(ForInitOpt, vec![N(StatementExpressionList)], A::ForInitExprs);
    g.r(ForInitOpt, vec![N(LocalVariableDeclaration)], A::None);
    g.r(ExpressionOpt, vec![], A::PushEmptyExpr);
    g.r(ExpressionOpt, vec![N(Expression)], A::None);
    g.r(ForUpdateOpt, vec![], A::PushEmptyExpr);
    g.r(ForUpdateOpt, vec![N(StatementExpressionList)], A::None);
    g.r(StatementExpressionList, vec![N(StatementExpression)], A::None);
    g.r(
        StatementExpressionList,
        vec![N(StatementExpressionList), T(Comma), N(StatementExpression)],
        A::ConcatExpr,
    );

    g.r(SwitchBlock, vec![T(LBrace), T(RBrace)], A::PushEmptyAst);
    g.r(SwitchBlock, vec![T(LBrace), N(SwitchBlockStatementGroups), T(RBrace)], A::None);
    g.r(
        SwitchBlock,
        vec![T(LBrace), N(SwitchBlockStatementGroups), N(SwitchLabels), T(RBrace)],
        A::SwitchLabelsGroupConcat,
    );
    g.r(SwitchBlock, vec![T(LBrace), N(SwitchLabels), T(RBrace)], A::SwitchLabelsGroup);
    g.r(SwitchBlockStatementGroups, vec![N(SwitchBlockStatementGroup)], A::None);
    g.r(
        SwitchBlockStatementGroups,
        vec![N(SwitchBlockStatementGroups), N(SwitchBlockStatementGroup)],
        A::ConcatAst,
    );
    g.r(
        SwitchBlockStatementGroup,
        vec![N(SwitchLabels), N(BlockStatements)],
        A::SwitchGroup,
    );
    g.r(SwitchLabels, vec![N(SwitchLabel)], A::None);
    g.r(SwitchLabels, vec![N(SwitchLabels), N(SwitchLabel)], A::ConcatAst);
    g.r(SwitchLabel, vec![T(Case), N(Expression), T(Colon)], A::CaseLabel);
    g.r(SwitchLabel, vec![T(Default), T(Colon)], A::DefaultLabel);

    g.r(Catches, vec![N(CatchClause)], A::None);
    g.r(Catches, vec![N(Catches), N(CatchClause)], A::ConcatAst);
    g.r(CatchesOpt, vec![], A::PushEmptyAst);
    g.r(CatchesOpt, vec![N(Catches)], A::None);
    g.r(FinallyOpt, vec![], A::PushEmptyAst);
    g.r(FinallyOpt, vec![T(Finally), N(Block)], A::None);
    g.r(
        CatchClause,
        vec![T(Catch), T(LParen), N(CatchFormalParameter), T(RParen), N(Block)],
        A::CatchClause,
    );
    g.r(
        CatchFormalParameter,
        vec![N(CatchType), N(VariableDeclaratorId)],
        A::CatchParameter { has_modifiers: false },
    );
    g.r(
        CatchFormalParameter,
        vec![N(Modifiers), N(CatchType), N(VariableDeclaratorId)],
        A::CatchParameter { has_modifiers: true },
    );
    g.r(CatchType, vec![N(ClassOrInterfaceType)], A::None);
    g.rl(CatchType, vec![N(CatchType), T(Pipe), N(ClassOrInterfaceType)], A::MultiCatchType, J7);
    g.rl(ResourceSpecification, vec![T(LParen), N(Resources), T(RParen)], A::None, J7);
    g.rl(
        ResourceSpecification,
        vec![T(LParen), N(Resources), T(Semicolon), T(RParen)],
        A::None,
        J7,
    );
    g.r(Resources, vec![N(Resource)], A::None);
    g.r(Resources, vec![N(Resources), T(Semicolon), N(Resource)], A::ConcatAst);
    g.rl(
        Resource,
        vec![N(Type), N(VariableDeclaratorId), T(Assign), N(Expression)],
        A::Resource { has_modifiers: false },
        J7,
    );
    g.rl(
        Resource,
        vec![N(Modifiers), N(Type), N(VariableDeclaratorId), T(Assign), N(Expression)],
        A::Resource { has_modifiers: true },
        J7,
    );

    g.r(Dims, vec![T(LBracket), T(RBracket)], A::DimsOne);
    g.r(Dims, vec![N(Dims), T(LBracket), T(RBracket)], A::DimsBump);
    g.r(DimsOpt, vec![], A::DimsZero);
    g.r(DimsOpt, vec![N(Dims)], A::None);
    g.r(DimExprs, vec![N(DimExpr)], A::None);
    g.r(DimExprs, vec![N(DimExprs), N(DimExpr)], A::ConcatExpr);
    g.r(DimExpr, vec![T(LBracket), N(Expression), T(RBracket)], A::None);

    // ===== Statement expressions =====
    g.r(StatementExpression, vec![N(Assignment)], A::None);
    g.r(StatementExpression, vec![N(PreIncrementExpression)], A::None);
    g.r(StatementExpression, vec![N(PreDecrementExpression)], A::None);
    g.r(StatementExpression, vec![N(PostIncrementExpression)], A::None);
    g.r(StatementExpression, vec![N(PostDecrementExpression)], A::None);
    g.r(StatementExpression, vec![N(MethodInvocation)], A::None);
    g.r(StatementExpression, vec![N(ClassInstanceCreationExpression)], A::None);

    // ===== Expression ladder =====
    g.r(Expression, vec![N(AssignmentExpression)], A::None);
    g.r(AssignmentExpression, vec![N(ConditionalExpression)], A::None);
    g.r(AssignmentExpression, vec![N(Assignment)], A::None);
    g.rl(AssignmentExpression, vec![N(LambdaExpression)], A::None, J8);
    g.r(
        Assignment,
        vec![N(LeftHandSide), N(AssignmentOperator), N(AssignmentExpression)],
        A::Assignment,
    );
    g.r(LeftHandSide, vec![N(Name)], A::NameToExpr);
    g.r(LeftHandSide, vec![N(FieldAccess)], A::None);
    g.r(LeftHandSide, vec![N(ArrayAccess)], A::None);
    g.r(AssignmentOperator, vec![T(Assign)], A::AssignOp(AssignmentOp::Assign));
    g.r(AssignmentOperator, vec![T(Term::PlusAssign)], A::AssignOp(AssignmentOp::AddAssign));
    g.r(AssignmentOperator, vec![T(Term::MinusAssign)], A::AssignOp(AssignmentOp::SubAssign));
    g.r(AssignmentOperator, vec![T(Term::StarAssign)], A::AssignOp(AssignmentOp::MulAssign));
    g.r(AssignmentOperator, vec![T(Term::SlashAssign)], A::AssignOp(AssignmentOp::DivAssign));
    g.r(AssignmentOperator, vec![T(Term::PercentAssign)], A::AssignOp(AssignmentOp::ModAssign));
    g.r(AssignmentOperator, vec![T(Term::AmpAssign)], A::AssignOp(AssignmentOp::AndAssign));
    g.r(AssignmentOperator, vec![T(Term::PipeAssign)], A::AssignOp(AssignmentOp::OrAssign));
    g.r(AssignmentOperator, vec![T(TCaretAssign)], A::AssignOp(AssignmentOp::XorAssign));
    g.r(
        AssignmentOperator,
        vec![T(Term::LShiftAssign)],
        A::AssignOp(AssignmentOp::LShiftAssign),
    );
    g.r(
        AssignmentOperator,
        vec![T(Term::RShiftAssign)],
        A::AssignOp(AssignmentOp::RShiftAssign),
    );
    g.r(
        AssignmentOperator,
        vec![T(Term::URShiftAssign)],
        A::AssignOp(AssignmentOp::URShiftAssign),
    );

    g.r(ConditionalExpression, vec![N(ConditionalOrExpression)], A::None);
    g.r(
        ConditionalExpression,
        vec![
            N(ConditionalOrExpression),
            T(Question),
            N(Expression),
            T(Colon),
            N(ConditionalExpression),
        ],
        A::ConditionalExpr,
    );
    g.r(ConditionalOrExpression, vec![N(ConditionalAndExpression)], A::None);
    g.r(
        ConditionalOrExpression,
        vec![N(ConditionalOrExpression), T(OrOr), N(ConditionalAndExpression)],
        A::Binary(BinaryOp::Or),
    );
    g.r(ConditionalAndExpression, vec![N(InclusiveOrExpression)], A::None);
    g.r(
        ConditionalAndExpression,
        vec![N(ConditionalAndExpression), T(AndAnd), N(InclusiveOrExpression)],
        A::Binary(BinaryOp::And),
    );
    g.r(InclusiveOrExpression, vec![N(ExclusiveOrExpression)], A::None);
    g.r(
        InclusiveOrExpression,
        vec![N(InclusiveOrExpression), T(Pipe), N(ExclusiveOrExpression)],
        A::Binary(BinaryOp::BitOr),
    );
    g.r(ExclusiveOrExpression, vec![N(AndExpression)], A::None);
    g.r(
        ExclusiveOrExpression,
        vec![N(ExclusiveOrExpression), T(Term::Caret), N(AndExpression)],
        A::Binary(BinaryOp::BitXor),
    );
    g.r(AndExpression, vec![N(EqualityExpression)], A::None);
    g.r(
        AndExpression,
        vec![N(AndExpression), T(Amp), N(EqualityExpression)],
        A::Binary(BinaryOp::BitAnd),
    );
    g.r(EqualityExpression, vec![N(RelationalExpression)], A::None);
    g.r(
        EqualityExpression,
        vec![N(EqualityExpression), T(EqEq), N(RelationalExpression)],
        A::Binary(BinaryOp::Eq),
    );
    g.r(
        EqualityExpression,
        vec![N(EqualityExpression), T(Ne), N(RelationalExpression)],
        A::Binary(BinaryOp::Ne),
    );
    g.r(RelationalExpression, vec![N(ShiftExpression)], A::None);
    g.r(
        RelationalExpression,
        vec![N(RelationalExpression), T(Lt), N(ShiftExpression)],
        A::Binary(BinaryOp::Lt),
    );
    g.r(
        RelationalExpression,
        vec![N(RelationalExpression), T(Gt), N(ShiftExpression)],
        A::Binary(BinaryOp::Gt),
    );
    g.r(
        RelationalExpression,
        vec![N(RelationalExpression), T(Le), N(ShiftExpression)],
        A::Binary(BinaryOp::Le),
    );
    g.r(
        RelationalExpression,
        vec![N(RelationalExpression), T(Ge), N(ShiftExpression)],
        A::Binary(BinaryOp::Ge),
    );
    g.r(
        RelationalExpression,
        vec![N(RelationalExpression), T(Instanceof), N(ReferenceType)],
        A::InstanceOfExpr,
    );
    g.r(ShiftExpression, vec![N(AdditiveExpression)], A::None);
    g.r(
        ShiftExpression,
        vec![N(ShiftExpression), T(LShift), N(AdditiveExpression)],
        A::Binary(BinaryOp::LShift),
    );
    g.r(
        ShiftExpression,
        vec![N(ShiftExpression), T(RShift), N(AdditiveExpression)],
        A::Binary(BinaryOp::RShift),
    );
    g.r(
        ShiftExpression,
        vec![N(ShiftExpression), T(URShift), N(AdditiveExpression)],
        A::Binary(BinaryOp::URShift),
    );
    g.r(AdditiveExpression, vec![N(MultiplicativeExpression)], A::None);
    g.r(
        AdditiveExpression,
        vec![N(AdditiveExpression), T(Plus), N(MultiplicativeExpression)],
        A::BinaryAdd,
    );
    g.r(
        AdditiveExpression,
        vec![N(AdditiveExpression), T(Minus), N(MultiplicativeExpression)],
        A::Binary(BinaryOp::Sub),
    );
    g.r(MultiplicativeExpression, vec![N(UnaryExpression)], A::None);
    g.r(
        MultiplicativeExpression,
        vec![N(MultiplicativeExpression), T(Star), N(UnaryExpression)],
        A::Binary(BinaryOp::Mul),
    );
    g.r(
        MultiplicativeExpression,
        vec![N(MultiplicativeExpression), T(Slash), N(UnaryExpression)],
        A::Binary(BinaryOp::Div),
    );
    g.r(
        MultiplicativeExpression,
        vec![N(MultiplicativeExpression), T(Percent), N(UnaryExpression)],
        A::Binary(BinaryOp::Mod),
    );
    g.r(UnaryExpression, vec![N(PreIncrementExpression)], A::None);
    g.r(UnaryExpression, vec![N(PreDecrementExpression)], A::None);
    g.r(UnaryExpression, vec![T(Plus), N(UnaryExpression)], A::Unary(UnaryOp::Plus));
    g.r(UnaryExpression, vec![T(Minus), N(UnaryExpression)], A::UnaryMinus);
    g.r(UnaryExpression, vec![N(UnaryExpressionNotPlusMinus)], A::None);
    g.r(PreIncrementExpression, vec![T(Inc), N(UnaryExpression)], A::Unary(UnaryOp::PreInc));
    g.r(PreDecrementExpression, vec![T(Dec), N(UnaryExpression)], A::Unary(UnaryOp::PreDec));
    g.r(UnaryExpressionNotPlusMinus, vec![N(PostfixExpression)], A::None);
    g.r(
        UnaryExpressionNotPlusMinus,
        vec![T(Tilde), N(UnaryExpression)],
        A::Unary(UnaryOp::BitNot),
    );
    g.r(
        UnaryExpressionNotPlusMinus,
        vec![T(Bang), N(UnaryExpression)],
        A::Unary(UnaryOp::Not),
    );
    g.r(UnaryExpressionNotPlusMinus, vec![N(CastExpression)], A::None);
    g.r(PostfixExpression, vec![N(Primary)], A::None);
    g.r(PostfixExpression, vec![N(Name)], A::NameToExpr);
    g.r(PostfixExpression, vec![N(PostIncrementExpression)], A::None);
    g.r(PostfixExpression, vec![N(PostDecrementExpression)], A::None);
    g.r(
        PostIncrementExpression,
        vec![N(PostfixExpression), T(Inc)],
        A::Unary(UnaryOp::PostInc),
    );
    g.r(
        PostDecrementExpression,
        vec![N(PostfixExpression), T(Dec)],
        A::Unary(UnaryOp::PostDec),
    );

    // ===== Casts =====
    g.r(
        CastExpression,
        vec![T(LParen), N(PrimitiveType), N(DimsOpt), T(RParen), N(UnaryExpression)],
        A::CastPrimitive,
    );
    // `( Expression )` reinterpreted as a type by the action.
    g.r(
        CastExpression,
        vec![T(LParen), N(Expression), T(RParen), N(UnaryExpressionNotPlusMinus)],
        A::CastFromExpr,
    );
    g.r(
        CastExpression,
        vec![T(LParen), N(Name), N(Dims), T(RParen), N(UnaryExpressionNotPlusMinus)],
        A::CastArray,
    );
    g.rl(
        CastExpression,
        vec![
            T(LParen),
            N(Name),
            N(TypeArguments),
            N(DimsOpt),
            T(RParen),
            N(UnaryExpressionNotPlusMinus),
        ],
        A::CastGeneric,
        J5,
    );

    // ===== Primaries =====
    g.r(Primary, vec![N(PrimaryNoNewArray)], A::None);
    g.r(Primary, vec![N(ArrayCreationExpression)], A::None);
    g.r(PrimaryNoNewArray, vec![N(Literal)], A::None);
    g.r(PrimaryNoNewArray, vec![T(This)], A::ThisExpr);
    g.r(PrimaryNoNewArray, vec![N(Name), T(Dot), T(This)], A::QualifiedThisExpr);
    g.r(PrimaryNoNewArray, vec![T(LParen), N(Expression), T(RParen)], A::Parenthesized);
    g.r(PrimaryNoNewArray, vec![N(ClassInstanceCreationExpression)], A::None);
    g.r(PrimaryNoNewArray, vec![N(FieldAccess)], A::None);
    g.r(PrimaryNoNewArray, vec![N(MethodInvocation)], A::None);
    g.r(PrimaryNoNewArray, vec![N(ArrayAccess)], A::None);
    g.rl(PrimaryNoNewArray, vec![N(MethodReference)], A::None, J8);
    g.r(
        PrimaryNoNewArray,
        vec![N(Name), T(Dot), T(Class)],
        A::ClassLiteralName { dims: false },
    );
    g.r(
        PrimaryNoNewArray,
        vec![N(Name), N(Dims), T(Dot), T(Class)],
        A::ClassLiteralName { dims: true },
    );
    g.r(
        PrimaryNoNewArray,
        vec![N(PrimitiveType), T(Dot), T(Class)],
        A::ClassLiteralPrimitive { dims: false },
    );
    g.r(
        PrimaryNoNewArray,
        vec![N(PrimitiveType), N(Dims), T(Dot), T(Class)],
        A::ClassLiteralPrimitive { dims: true },
    );
    g.r(PrimaryNoNewArray, vec![T(Void), T(Dot), T(Class)], A::ClassLiteralVoid);

    g.r(Literal, vec![T(Term::IntLiteral)], A::None);
    g.r(Literal, vec![T(Term::LongLiteral)], A::None);
    g.r(Literal, vec![T(Term::FloatLiteral)], A::None);
    g.r(Literal, vec![T(Term::DoubleLiteral)], A::None);
    g.r(Literal, vec![T(Term::CharLiteral)], A::None);
    g.r(Literal, vec![T(Term::StringLiteral)], A::None);
    g.r(Literal, vec![T(Term::True)], A::None);
    g.r(Literal, vec![T(Term::False)], A::None);
    g.r(Literal, vec![T(Null)], A::None);

    // ===== Instance creation =====
    g.r(
        ClassInstanceCreationExpression,
        vec![T(New), N(ClassOrInterfaceType), T(LParen), N(ArgumentListOpt), T(RParen)],
        A::NewExpr { body: false },
    );
    g.r(
        ClassInstanceCreationExpression,
        vec![
            T(New),
            N(ClassOrInterfaceType),
            T(LParen),
            N(ArgumentListOpt),
            T(RParen),
            N(ClassBody),
        ],
        A::NewExpr { body: true },
    );
    g.r(
        ClassInstanceCreationExpression,
        vec![
            N(Primary),
            T(Dot),
            T(New),
            T(Identifier),
            T(LParen),
            N(ArgumentListOpt),
            T(RParen),
        ],
        A::QualifiedNew { body: false, from_name: false },
    );
    g.r(
        ClassInstanceCreationExpression,
        vec![
            N(Primary),
            T(Dot),
            T(New),
            T(Identifier),
            T(LParen),
            N(ArgumentListOpt),
            T(RParen),
            N(ClassBody),
        ],
        A::QualifiedNew { body: true, from_name: false },
    );
    g.r(
        ClassInstanceCreationExpression,
        vec![
            N(Name),
            T(Dot),
            T(New),
            T(Identifier),
            T(LParen),
            N(ArgumentListOpt),
            T(RParen),
        ],
        A::QualifiedNew { body: false, from_name: true },
    );
    g.r(
        ClassInstanceCreationExpression,
        vec![
            N(Name),
            T(Dot),
            T(New),
            T(Identifier),
            T(LParen),
            N(ArgumentListOpt),
            T(RParen),
            N(ClassBody),
        ],
        A::QualifiedNew { body: true, from_name: true },
    );

    // ===== Array creation =====
    g.r(
        ArrayCreationExpression,
        vec![T(New), N(PrimitiveType), N(DimExprs), N(DimsOpt)],
        A::NewArray { init: false },
    );
    g.r(
        ArrayCreationExpression,
        vec![T(New), N(ClassOrInterfaceType), N(DimExprs), N(DimsOpt)],
        A::NewArray { init: false },
    );
    g.r(
        ArrayCreationExpression,
        vec![T(New), N(PrimitiveType), N(Dims), N(ArrayInitializer)],
        A::NewArray { init: true },
    );
    g.r(
        ArrayCreationExpression,
        vec![T(New), N(ClassOrInterfaceType), N(Dims), N(ArrayInitializer)],
        A::NewArray { init: true },
    );

    // ===== Field access / invocation / indexing =====
    g.r(FieldAccess, vec![N(Primary), T(Dot), T(Identifier)], A::FieldAccessExpr);
    g.r(FieldAccess, vec![T(Super), T(Dot), T(Identifier)], A::SuperFieldAccess);
    g.r(
        MethodInvocation,
        vec![N(Name), T(LParen), N(ArgumentListOpt), T(RParen)],
        A::MethodInvocationName,
    );
    g.r(
        MethodInvocation,
        vec![
            N(Primary),
            T(Dot),
            T(Identifier),
            T(LParen),
            N(ArgumentListOpt),
            T(RParen),
        ],
        A::MethodInvocationPrimary { generic: false },
    );
    g.rl(
        MethodInvocation,
        vec![
            N(Primary),
            T(Dot),
            N(TypeArguments),
            T(Identifier),
            T(LParen),
            N(ArgumentListOpt),
            T(RParen),
        ],
        A::MethodInvocationPrimary { generic: true },
        J5,
    );
    g.rl(
        MethodInvocation,
        vec![
            N(Name),
            T(Dot),
            N(TypeArguments),
            T(Identifier),
            T(LParen),
            N(ArgumentListOpt),
            T(RParen),
        ],
        A::MethodInvocationGenericName,
        J5,
    );
    g.r(
        MethodInvocation,
        vec![
            T(Super),
            T(Dot),
            T(Identifier),
            T(LParen),
            N(ArgumentListOpt),
            T(RParen),
        ],
        A::SuperMethodInvocation,
    );
    g.r(
        ArrayAccess,
        vec![N(Name), T(LBracket), N(Expression), T(RBracket)],
        A::ArrayAccessName,
    );
    g.r(
        ArrayAccess,
        vec![N(PrimaryNoNewArray), T(LBracket), N(Expression), T(RBracket)],
        A::ArrayAccessPrimary,
    );
    g.r(ArgumentListOpt, vec![], A::PushEmptyExpr);
    g.r(ArgumentListOpt, vec![N(ArgumentList)], A::None);
    g.r(ArgumentList, vec![N(Expression)], A::None);
    g.r(ArgumentList, vec![N(ArgumentList), T(Comma), N(Expression)], A::ConcatExpr);

    // ===== Method references =====
    g.rl(
        MethodReference,
        vec![N(Name), T(ColonColon), T(Identifier)],
        A::MethodRefName { ctor: false },
        J8,
    );
    g.rl(
        MethodReference,
        vec![N(Name), T(ColonColon), T(New)],
        A::MethodRefName { ctor: true },
        J8,
    );
    g.rl(
        MethodReference,
        vec![N(Primary), T(ColonColon), T(Identifier)],
        A::MethodRefPrimary,
        J8,
    );
    g.rl(
        MethodReference,
        vec![T(Super), T(ColonColon), T(Identifier)],
        A::MethodRefSuper,
        J8,
    );

    // ===== Lambdas =====
    g.rl(
        LambdaExpression,
        vec![T(Identifier), T(Arrow), N(LambdaBody)],
        A::LambdaSimple,
        J8,
    );
    g.rl(
        LambdaExpression,
        vec![T(BeginLambda), T(LParen), T(RParen), T(Arrow), N(LambdaBody)],
        A::Lambda { params: false },
        J8,
    );
    g.rl(
        LambdaExpression,
        vec![
            T(BeginLambda),
            T(LParen),
            N(LambdaParameterList),
            T(RParen),
            T(Arrow),
            N(LambdaBody),
        ],
        A::Lambda { params: true },
        J8,
    );
    g.r(LambdaParameterList, vec![N(LambdaParameter)], A::None);
    g.r(
        LambdaParameterList,
        vec![N(LambdaParameterList), T(Comma), N(LambdaParameter)],
        A::ConcatAst,
    );
    g.r(LambdaParameter, vec![T(Identifier)], A::InferredLambdaParam);
    g.r(
        LambdaParameter,
        vec![N(Type), N(VariableDeclaratorId)],
        A::TypedLambdaParam { has_modifiers: false },
    );
    g.r(
        LambdaParameter,
        vec![N(Modifiers), N(Type), N(VariableDeclaratorId)],
        A::TypedLambdaParam { has_modifiers: true },
    );
    g.r(LambdaBody, vec![N(Expression)], A::LambdaBodyExpr);
    g.r(LambdaBody, vec![N(Block)], A::LambdaBodyBlock);

    g.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grammar_builds() {
        let g = build_grammar();
        assert!(g.rules.len() > 250, "expected a full grammar, got {} rules", g.rules.len());
        // every nonterminal must be reachable as a lhs
        for nt_rules in 0..NonTerm::COUNT {
            let nt_has_rule = g.rules.iter().any(|r| r.lhs.index() == nt_rules);
            assert!(nt_has_rule, "nonterminal index {} has no productions", nt_rules);
        }
    }

    #[test]
    fn test_goal_rules_have_distinct_selectors() {
        let g = build_grammar();
        let mut selectors = Vec::new();
        for rule in g.rules.iter().filter(|r| r.lhs == NonTerm::Goal) {
            match rule.rhs.first() {
                Some(Sym::T(t)) => selectors.push(*t),
                other => panic!("goal rule must start with a terminal, got {:?}", other),
            }
        }
        let mut dedup = selectors.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), selectors.len());
    }

    #[test]
    fn test_lambda_probe_rule_found() {
        let g = build_grammar();
        let rule = &g.rules[g.lambda_probe_rule as usize];
        assert_eq!(rule.lhs, NonTerm::Goal);
        assert_eq!(rule.rhs.first(), Some(&Sym::T(Term::Arrow)));
    }

    #[test]
    fn test_version_gates() {
        let g = build_grammar();
        assert!(g.rules.iter().any(|r| r.min_level == J8
            && matches!(r.action, RuleAction::Lambda { .. })));
        assert!(g.rules.iter().any(|r| r.min_level == J7
            && matches!(r.action, RuleAction::Diamond)));
        assert!(g
            .rules
            .iter()
            .any(|r| r.min_level == J7 && matches!(r.action, RuleAction::Resource { .. })));
    }
}
