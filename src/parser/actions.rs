//! Semantic actions executed on reduce.
//!
//! Every production carries a [`RuleAction`]; `execute` pops the rule's
//! values off the stacks in reverse rhs order and pushes the finished node.
//! The actions also own the parse-time folds: string literal concatenation,
//! the `-2147483648` unary-minus fold, flattening of long `+` chains into a
//! single combined node, and the reinterpretation of `( Expression )` as a
//! cast target type.
//!
//! Pop discipline is strict: a mismatch between a rule's rhs and what its
//! action pops is a driver bug and surfaces as an internal error, never a
//! panic.

use crate::ast::{
    Annotation, AnnotationArg, AnnotationDecl, AnnotationMember, ArrayAccessExpr,
    ArrayInitializerExpr, AssertStmt, AssignmentExpr, AssignmentOp, BinaryExpr, BinaryOp, Block,
    BoundKind, BreakStmt, CastExpr, CatchClause, ClassDecl, ClassLiteralExpr, ClassMember,
    CombinedBinaryExpr, CompilationUnit, ConditionalExpr, ConstructorDecl, ContinueStmt,
    CtorCallKind, DoWhileStmt, ElementValue, EnumConstant, EnumDecl, ExplicitCtorInvocation, Expr,
    ExprStmt, FieldAccessExpr, FieldDecl, ForEachStmt, ForStmt, IdentifierExpr, IfStmt, ImportDecl,
    InitializerBlock, InstanceOfExpr, InterfaceDecl, LabeledStmt, LambdaBody, LambdaExpr,
    LambdaParam, Literal, LiteralExpr, MethodCallExpr, MethodDecl, MethodRefExpr, MethodRefTarget,
    NewArrayExpr, NewExpr, PackageDecl, Parameter, ReturnStmt, Stmt, SuperExpr, SwitchCase,
    SwitchStmt, SynchronizedStmt, ThisExpr, ThrowStmt, TryResource, TryStmt, TypeArg, TypeDecl,
    TypeParam, TypeRef, UnaryExpr, UnaryOp, VarDeclStmt, VariableDeclarator, WhileStmt,
    WildcardType,
};
use crate::error::{Error, Result};
use crate::parser::diagnostics::{
    DiagnosticSink, LevelCell, Problem, ProblemCollector, ProblemKind, SourceLevel,
};
use crate::parser::grammar::{CtorKind, RuleAction};
use crate::parser::lexer::{self, Term};
use crate::parser::span::Span;
use crate::parser::stacks::{split_modifiers, AstValue, MethodHeaderParts, ValueStacks};

/// Left-spine length at which a `+` chain is flattened into one node.
const COMBINE_THRESHOLD: usize = 16;

/// Everything a reduce action may touch, borrowed from the driver for the
/// duration of one reduce.
pub(crate) struct ActionCtx<'a> {
    pub stacks: &'a mut ValueStacks,
    /// Spans of the rhs symbols, in rhs order.
    pub rhs_spans: &'a [Span],
    /// Covering span of the whole production.
    pub span: Span,
    pub problems: &'a mut ProblemCollector,
    /// Body range recorded by a diet-mode skip, consumed by the declaration
    /// that owns the body.
    pub pending_body_range: &'a mut Option<Span>,
    /// Receives the finished unit on the compilation-unit reduce.
    pub unit_out: &'a mut Option<CompilationUnit>,
}

fn underflow() -> Error {
    Error::internal("value stack underflow")
}

fn mismatch(wanted: &str, got: &AstValue) -> Error {
    Error::internal(format!("expected {wanted} on value stack, found {got:?}"))
}

impl ActionCtx<'_> {
    fn rhs_span(&self, i: usize) -> Span {
        self.rhs_spans.get(i).copied().unwrap_or(self.span)
    }

    fn pop_ast(&mut self) -> Result<Vec<AstValue>> {
        self.stacks.ast.pop_list().ok_or_else(underflow)
    }

    fn pop_ast_one(&mut self) -> Result<AstValue> {
        self.stacks.ast.pop_one().ok_or_else(underflow)
    }

    fn pop_exprs(&mut self) -> Result<Vec<Expr>> {
        self.stacks.exprs.pop_list().ok_or_else(underflow)
    }

    fn pop_expr(&mut self) -> Result<Expr> {
        self.stacks.exprs.pop_one().ok_or_else(underflow)
    }

    /// Pop an optional-expression list (zero or one element).
    fn pop_opt_expr(&mut self) -> Result<Option<Expr>> {
        Ok(self.pop_exprs()?.into_iter().next())
    }

    fn pop_int(&mut self) -> Result<i64> {
        self.stacks.ints.pop().ok_or_else(underflow)
    }

    fn pop_ident(&mut self) -> Result<(String, Span)> {
        self.stacks.idents.pop_single().ok_or_else(underflow)
    }

    fn pop_name(&mut self) -> Result<(String, Span)> {
        self.stacks.idents.pop_name().ok_or_else(underflow)
    }

    fn pop_modifiers(&mut self) -> Result<(Vec<crate::ast::Modifier>, Vec<Annotation>)> {
        Ok(split_modifiers(self.pop_ast()?))
    }

    fn pop_type(&mut self) -> Result<TypeRef> {
        as_type(self.pop_ast_one()?)
    }

    fn pop_block(&mut self) -> Result<Block> {
        as_block(self.pop_ast_one()?)
    }

    fn pop_stmt(&mut self) -> Result<Stmt> {
        as_stmt(self.pop_ast_one()?)
    }

    fn pop_declarator_id(&mut self) -> Result<(String, usize, Span)> {
        match self.pop_ast_one()? {
            AstValue::DeclaratorId { name, dims, span } => Ok((name, dims, span)),
            other => Err(mismatch("declarator id", &other)),
        }
    }
}

// ---- stack value extractors ------------------------------------------------

fn unwrap_each<T>(
    list: Vec<AstValue>,
    f: impl Fn(AstValue) -> Result<T>,
) -> Result<Vec<T>> {
    list.into_iter().map(f).collect()
}

fn as_type(v: AstValue) -> Result<TypeRef> {
    match v {
        AstValue::TypeRef(t) => Ok(t),
        other => Err(mismatch("type", &other)),
    }
}

fn as_type_arg(v: AstValue) -> Result<TypeArg> {
    match v {
        AstValue::TypeArg(a) => Ok(a),
        other => Err(mismatch("type argument", &other)),
    }
}

fn as_type_param(v: AstValue) -> Result<TypeParam> {
    match v {
        AstValue::TypeParam(p) => Ok(p),
        other => Err(mismatch("type parameter", &other)),
    }
}

fn as_annotation(v: AstValue) -> Result<Annotation> {
    match v {
        AstValue::Annotation(a) => Ok(a),
        other => Err(mismatch("annotation", &other)),
    }
}

fn as_annotation_arg(v: AstValue) -> Result<AnnotationArg> {
    match v {
        AstValue::AnnotationArg(a) => Ok(a),
        other => Err(mismatch("annotation argument", &other)),
    }
}

fn as_element_value(v: AstValue) -> Result<ElementValue> {
    match v {
        AstValue::ElementValue(e) => Ok(e),
        other => Err(mismatch("element value", &other)),
    }
}

fn as_member(v: AstValue) -> Result<ClassMember> {
    match v {
        AstValue::Member(m) => Ok(m),
        other => Err(mismatch("class member", &other)),
    }
}

fn as_typedecl(v: AstValue) -> Result<TypeDecl> {
    match v {
        AstValue::Type(t) => Ok(t),
        other => Err(mismatch("type declaration", &other)),
    }
}

fn as_import(v: AstValue) -> Result<ImportDecl> {
    match v {
        AstValue::Import(i) => Ok(i),
        other => Err(mismatch("import", &other)),
    }
}

fn as_block(v: AstValue) -> Result<Block> {
    match v {
        AstValue::Block(b) => Ok(b),
        other => Err(mismatch("block", &other)),
    }
}

fn as_stmt(v: AstValue) -> Result<Stmt> {
    match v {
        AstValue::Stmt(s) => Ok(s),
        // An explicit constructor call outside a constructor prologue is
        // kept as a plain call statement named `this`/`super`.
        AstValue::CtorCall(call) => Ok(ctor_call_stmt(call)),
        other => Err(mismatch("statement", &other)),
    }
}

fn as_param(v: AstValue) -> Result<Parameter> {
    match v {
        AstValue::Param(p) => Ok(p),
        other => Err(mismatch("parameter", &other)),
    }
}

fn as_lambda_param(v: AstValue) -> Result<LambdaParam> {
    match v {
        AstValue::LambdaParam(p) => Ok(p),
        other => Err(mismatch("lambda parameter", &other)),
    }
}

fn as_lambda_body(v: AstValue) -> Result<LambdaBody> {
    match v {
        AstValue::LambdaBody(b) => Ok(b),
        other => Err(mismatch("lambda body", &other)),
    }
}

fn as_declarator(v: AstValue) -> Result<VariableDeclarator> {
    match v {
        AstValue::Declarator(d) => Ok(d),
        other => Err(mismatch("variable declarator", &other)),
    }
}

fn as_enum_const(v: AstValue) -> Result<EnumConstant> {
    match v {
        AstValue::EnumConst(c) => Ok(c),
        other => Err(mismatch("enum constant", &other)),
    }
}

fn as_catch(v: AstValue) -> Result<CatchClause> {
    match v {
        AstValue::Catch(c) => Ok(c),
        other => Err(mismatch("catch clause", &other)),
    }
}

fn as_resource(v: AstValue) -> Result<TryResource> {
    match v {
        AstValue::Resource(r) => Ok(r),
        other => Err(mismatch("resource", &other)),
    }
}

fn as_case(v: AstValue) -> Result<SwitchCase> {
    match v {
        AstValue::Case(c) => Ok(c),
        other => Err(mismatch("switch case", &other)),
    }
}

fn as_case_label(v: AstValue) -> Result<(Option<Expr>, Span)> {
    match v {
        AstValue::CaseLabel { expr, span } => Ok((expr, span)),
        other => Err(mismatch("switch label", &other)),
    }
}

fn as_header(v: AstValue) -> Result<Box<MethodHeaderParts>> {
    match v {
        AstValue::Header(h) => Ok(h),
        other => Err(mismatch("method header", &other)),
    }
}

fn as_array_init(e: Expr) -> Result<ArrayInitializerExpr> {
    match e {
        Expr::ArrayInitializer(a) => Ok(a),
        _ => Err(Error::internal("expected array initializer on expression stack")),
    }
}

// ---- node helpers ----------------------------------------------------------

fn with_dims(mut t: TypeRef, dims: usize, span: Span) -> TypeRef {
    if dims > 0 {
        t.array_dims += dims;
        t.span = t.span.cover(span);
    }
    t
}

fn ctor_call_stmt(call: ExplicitCtorInvocation) -> Stmt {
    let (name, target) = match call.kind {
        CtorCallKind::This => ("this", None),
        CtorCallKind::Super => ("super", None),
        CtorCallKind::QualifiedSuper(q) => ("super", Some(q)),
    };
    Stmt::Expression(ExprStmt {
        expr: Expr::MethodCall(MethodCallExpr {
            target,
            type_args: Vec::new(),
            name: name.to_string(),
            arguments: call.arguments,
            span: call.span,
        }),
        span: call.span,
    })
}

/// Split a constructor body's statement list into the leading explicit
/// invocation (if any) and the remaining block.
fn split_ctor_body(
    list: Vec<AstValue>,
    span: Span,
) -> Result<(Option<ExplicitCtorInvocation>, Block)> {
    let mut invocation = None;
    let mut statements = Vec::with_capacity(list.len());
    for (i, value) in list.into_iter().enumerate() {
        match value {
            AstValue::CtorCall(call) if i == 0 => invocation = Some(call),
            other => statements.push(as_stmt(other)?),
        }
    }
    Ok((invocation, Block { statements, span }))
}

/// Convert class-body members into annotation type members. Constructors and
/// initializers have no annotation-type counterpart; they are dropped and the
/// declaration marked malformed.
fn annotation_members(body: Vec<ClassMember>, malformed: &mut bool) -> Vec<AnnotationMember> {
    body.into_iter()
        .filter_map(|member| match member {
            ClassMember::Method(m) => {
                let type_ref =
                    m.return_type.unwrap_or_else(|| TypeRef::named("void", m.span));
                Some(AnnotationMember::Element {
                    modifiers: m.modifiers,
                    type_ref,
                    name: m.name,
                    default_value: m.default_value,
                    span: m.span,
                })
            }
            ClassMember::Field(f) => Some(AnnotationMember::Field(f)),
            ClassMember::TypeDecl(t) => Some(AnnotationMember::TypeDecl(t)),
            ClassMember::Constructor(_) | ClassMember::Initializer(_) => {
                *malformed = true;
                None
            }
        })
        .collect()
}

fn join_segments(segments: Vec<(String, Span)>) -> Option<(String, Span)> {
    let first = segments.first()?.1;
    let last = segments.last()?.1;
    let mut name = String::new();
    for (i, (segment, _)) in segments.iter().enumerate() {
        if i > 0 {
            name.push('.');
        }
        name.push_str(segment);
    }
    Some((name, first.cover(last)))
}

/// Reinterpret a parenthesized expression as a cast target type. Only name
/// shapes qualify; anything else is a syntax error at this position.
fn expr_as_type(expr: &Expr) -> Option<TypeRef> {
    match expr {
        Expr::Identifier(id) => Some(TypeRef::named(id.name.clone(), id.span)),
        Expr::Parenthesized(inner) => expr_as_type(inner),
        _ => None,
    }
}

fn add_spine_len(expr: &Expr) -> usize {
    let mut n = 1;
    let mut cur = expr;
    while let Expr::Binary(b) = cur {
        if b.operator != BinaryOp::Add {
            break;
        }
        n += 1;
        cur = &b.left;
    }
    n
}

fn collect_add_operands(expr: Expr, out: &mut Vec<Expr>) {
    match expr {
        Expr::Binary(b) if b.operator == BinaryOp::Add => {
            collect_add_operands(*b.left, out);
            out.push(*b.right);
        }
        other => out.push(other),
    }
}

/// `a + b` with the parse-time folds: adjacent string literals concatenate,
/// and long `+` chains collapse into one combined node so deeply concatenated
/// sources do not build pathological trees.
fn binary_add(left: Expr, right: Expr, span: Span) -> Expr {
    if let (Expr::Literal(l), Expr::Literal(r)) = (&left, &right) {
        if let (Literal::String(a), Literal::String(b)) = (&l.value, &r.value) {
            let mut folded = String::with_capacity(a.len() + b.len());
            folded.push_str(a);
            folded.push_str(b);
            return Expr::Literal(LiteralExpr { value: Literal::String(folded), span });
        }
    }
    match left {
        Expr::CombinedBinary(mut c) if c.operator == BinaryOp::Add => {
            c.operands.push(right);
            c.span = span;
            Expr::CombinedBinary(c)
        }
        left if add_spine_len(&left) >= COMBINE_THRESHOLD => {
            let mut operands = Vec::new();
            collect_add_operands(left, &mut operands);
            operands.push(right);
            Expr::CombinedBinary(CombinedBinaryExpr { operator: BinaryOp::Add, operands, span })
        }
        left => Expr::Binary(BinaryExpr {
            left: Box::new(left),
            operator: BinaryOp::Add,
            right: Box::new(right),
            span,
        }),
    }
}

/// Unary minus, folding integer literals so `-2147483648` stays in range.
fn unary_minus(operand: Expr, span: Span) -> Expr {
    if let Expr::Literal(lit) = &operand {
        match lit.value {
            Literal::Int(v) => {
                return Expr::Literal(LiteralExpr { value: Literal::Int(v.wrapping_neg()), span })
            }
            Literal::Long(v) => {
                return Expr::Literal(LiteralExpr { value: Literal::Long(v.wrapping_neg()), span })
            }
            _ => {}
        }
    }
    Expr::Unary(UnaryExpr { operator: UnaryOp::Minus, operand: Box::new(operand), span })
}

/// Assignment operators ride the integer stack between the operator reduce
/// and the assignment reduce; declaration order is the code.
const ASSIGN_OPS: [AssignmentOp; 12] = [
    AssignmentOp::Assign,
    AssignmentOp::AddAssign,
    AssignmentOp::SubAssign,
    AssignmentOp::MulAssign,
    AssignmentOp::DivAssign,
    AssignmentOp::ModAssign,
    AssignmentOp::AndAssign,
    AssignmentOp::OrAssign,
    AssignmentOp::XorAssign,
    AssignmentOp::LShiftAssign,
    AssignmentOp::RShiftAssign,
    AssignmentOp::URShiftAssign,
];

fn assign_op_from_code(code: i64) -> Result<AssignmentOp> {
    usize::try_from(code)
        .ok()
        .and_then(|i| ASSIGN_OPS.get(i).copied())
        .ok_or_else(|| Error::internal("bad assignment operator code"))
}

// ---- literal decoding ------------------------------------------------------

fn strip_long_suffix(text: &str) -> &str {
    text.strip_suffix(['l', 'L']).unwrap_or(text)
}

/// Build the literal expression for a shifted literal token.
pub(crate) fn literal_expr(term: Term, text: &str, span: Span) -> Expr {
    let value = match term {
        Term::IntLiteral => {
            Literal::Int(lexer::parse_integer_literal(text).magnitude as i64)
        }
        Term::LongLiteral => {
            Literal::Long(lexer::parse_integer_literal(strip_long_suffix(text)).magnitude as i64)
        }
        Term::FloatLiteral => {
            let body = text.strip_suffix(['f', 'F']).unwrap_or(text).replace('_', "");
            Literal::Float(body.parse().unwrap_or(0.0))
        }
        Term::DoubleLiteral => {
            let body = text.strip_suffix(['d', 'D']).unwrap_or(text).replace('_', "");
            Literal::Double(body.parse().unwrap_or(0.0))
        }
        Term::CharLiteral => {
            let body = text.get(1..text.len().saturating_sub(1)).unwrap_or("");
            Literal::Char(lexer::unescape(body).chars().next().unwrap_or('\0'))
        }
        Term::StringLiteral => {
            let body = text.get(1..text.len().saturating_sub(1)).unwrap_or("");
            Literal::String(lexer::unescape(body))
        }
        Term::True => Literal::Boolean(true),
        Term::False => Literal::Boolean(false),
        _ => Literal::Null,
    };
    Expr::Literal(LiteralExpr { value, span })
}

/// Version-gate check for literal spellings (binary form, underscores).
pub(crate) fn literal_problem(term: Term, text: &str, level: SourceLevel) -> Option<ProblemKind> {
    if level.supports(7) {
        return None;
    }
    match term {
        Term::IntLiteral | Term::LongLiteral => {
            let lit = lexer::parse_integer_literal(strip_long_suffix(text));
            if lit.is_binary {
                Some(ProblemKind::BinaryLiteralBelowSource { required: 7 })
            } else if lit.has_underscores {
                Some(ProblemKind::UnderscoresInLiteralBelowSource { required: 7 })
            } else {
                None
            }
        }
        Term::FloatLiteral | Term::DoubleLiteral if text.contains('_') => {
            Some(ProblemKind::UnderscoresInLiteralBelowSource { required: 7 })
        }
        _ => None,
    }
}

/// Map a gated rule to its dedicated problem kind where one exists.
pub(crate) fn version_problem(
    action: RuleAction,
    construct: String,
    required: LevelCell,
) -> ProblemKind {
    match action {
        RuleAction::Diamond => ProblemKind::DiamondBelowSource { required },
        RuleAction::LambdaSimple | RuleAction::Lambda { .. } => {
            ProblemKind::LambdaBelowSource { required }
        }
        RuleAction::MethodRefName { .. }
        | RuleAction::MethodRefPrimary
        | RuleAction::MethodRefSuper => ProblemKind::MethodReferenceBelowSource { required },
        RuleAction::MarkerTypeAnnotation | RuleAction::AnnotatedTypeArg => {
            ProblemKind::TypeAnnotationBelowSource { required }
        }
        RuleAction::ModifierKeyword(crate::ast::Modifier::Default) => {
            ProblemKind::DefaultMethodBelowSource { required }
        }
        RuleAction::MultiCatchType => ProblemKind::MultiCatchBelowSource { required },
        RuleAction::TryWithResources | RuleAction::Resource { .. } => {
            ProblemKind::TryWithResourcesBelowSource { required }
        }
        _ => ProblemKind::VersionGated { construct, required },
    }
}

// ---- dispatch --------------------------------------------------------------

/// Run the action for one reduce.
pub(crate) fn execute(action: RuleAction, mut ctx: ActionCtx<'_>) -> Result<()> {
    use RuleAction as A;
    let span = ctx.span;
    match action {
        A::None => {}
        A::ConcatAst => ctx.stacks.ast.concat().ok_or_else(underflow)?,
        A::ConcatExpr => ctx.stacks.exprs.concat().ok_or_else(underflow)?,
        A::ConcatIdents => ctx.stacks.idents.concat().ok_or_else(underflow)?,
        A::PushEmptyAst => ctx.stacks.ast.push_empty(),
        A::PushEmptyExpr => ctx.stacks.exprs.push_empty(),

        // ---- compilation unit ----
        A::CompilationUnit => {
            let types = unwrap_each(ctx.pop_ast()?, as_typedecl)?;
            let imports = unwrap_each(ctx.pop_ast()?, as_import)?;
            let package = match ctx.pop_ast()?.into_iter().next() {
                Some(AstValue::Package(p)) => Some(p),
                Some(other) => return Err(mismatch("package declaration", &other)),
                None => None,
            };
            *ctx.unit_out = Some(CompilationUnit {
                package,
                imports,
                types,
                comments: Vec::new(),
                recovered: false,
                span,
            });
        }
        A::NoPackage => ctx.stacks.ast.push_empty(),
        A::PackageDeclaration => {
            let (name, _) = ctx.pop_name()?;
            ctx.stacks.ast.push_one(AstValue::Package(PackageDecl {
                annotations: Vec::new(),
                name,
                span,
            }));
        }
        A::ImportDeclaration { is_static, on_demand } => {
            let (name, _) = ctx.pop_name()?;
            ctx.stacks.ast.push_one(AstValue::Import(ImportDecl {
                name,
                is_static,
                is_wildcard: on_demand,
                span,
            }));
        }

        A::QualifiedName => ctx.stacks.idents.concat().ok_or_else(underflow)?,

        // ---- modifiers and annotations ----
        A::ModifierKeyword(modifier) => {
            ctx.stacks.ast.push_one(AstValue::ModifierKw { modifier, span });
        }
        A::MarkerAnnotation | A::MarkerTypeAnnotation => {
            let (name, _) = ctx.pop_name()?;
            ctx.stacks.ast.push_one(AstValue::Annotation(Annotation {
                name,
                arguments: Vec::new(),
                is_marker: true,
                span,
            }));
        }
        A::EmptyArgsAnnotation => {
            let (name, _) = ctx.pop_name()?;
            ctx.stacks.ast.push_one(AstValue::Annotation(Annotation {
                name,
                arguments: Vec::new(),
                is_marker: false,
                span,
            }));
        }
        A::NormalAnnotation => {
            let arguments = unwrap_each(ctx.pop_ast()?, as_annotation_arg)?;
            let (name, _) = ctx.pop_name()?;
            ctx.stacks.ast.push_one(AstValue::Annotation(Annotation {
                name,
                arguments,
                is_marker: false,
                span,
            }));
        }
        A::SingleValueAnnotation => {
            let value = as_element_value(ctx.pop_ast_one()?)?;
            let (name, _) = ctx.pop_name()?;
            ctx.stacks.ast.push_one(AstValue::Annotation(Annotation {
                name,
                arguments: vec![AnnotationArg::Value(value)],
                is_marker: false,
                span,
            }));
        }
        A::ElementValuePair => {
            let value = as_element_value(ctx.pop_ast_one()?)?;
            let (name, _) = ctx.pop_ident()?;
            ctx.stacks.ast.push_one(AstValue::AnnotationArg(AnnotationArg::Named(name, value)));
        }
        A::ElementValueFromExpr => {
            let expr = ctx.pop_expr()?;
            ctx.stacks.ast.push_one(AstValue::ElementValue(ElementValue::Expr(expr)));
        }
        A::ElementValueFromAnnotation => {
            let annotation = as_annotation(ctx.pop_ast_one()?)?;
            ctx.stacks
                .ast
                .push_one(AstValue::ElementValue(ElementValue::Annotation(Box::new(annotation))));
        }
        A::ElementValueArray => {
            let values = unwrap_each(ctx.pop_ast()?, as_element_value)?;
            ctx.stacks.ast.push_one(AstValue::ElementValue(ElementValue::Array(values)));
        }
        A::EmptyElementValueArray => {
            ctx.stacks.ast.push_one(AstValue::ElementValue(ElementValue::Array(Vec::new())));
        }

        // ---- types ----
        A::PrimitiveType(name) => {
            ctx.stacks.ast.push_one(AstValue::TypeRef(TypeRef::named(name, span)));
        }
        A::TypeFromName => {
            let (name, name_span) = ctx.pop_name()?;
            ctx.stacks.ast.push_one(AstValue::TypeRef(TypeRef::named(name, name_span)));
        }
        A::GenericType | A::GenericArrayType => {
            let diamond = ctx.pop_int()? != 0;
            let type_args = unwrap_each(ctx.pop_ast()?, as_type_arg)?;
            let (name, _) = ctx.pop_name()?;
            let array_dims = usize::from(action == A::GenericArrayType);
            ctx.stacks.ast.push_one(AstValue::TypeRef(TypeRef {
                name,
                type_args,
                annotations: Vec::new(),
                array_dims,
                diamond,
                span,
            }));
        }
        A::ArrayTypeDim => {
            let t = ctx.pop_type()?;
            ctx.stacks.ast.push_one(AstValue::TypeRef(with_dims(t, 1, span)));
        }
        A::NameArrayType => {
            let (name, _) = ctx.pop_name()?;
            let mut t = TypeRef::named(name, span);
            t.array_dims = 1;
            ctx.stacks.ast.push_one(AstValue::TypeRef(t));
        }
        A::DimsOne => ctx.stacks.ints.push(1),
        A::DimsBump => *ctx.stacks.ints.last_mut().ok_or_else(underflow)? += 1,
        A::DimsZero => ctx.stacks.ints.push(0),
        A::TypeArguments => ctx.stacks.ints.push(0),
        A::Diamond => {
            ctx.stacks.ast.push_empty();
            ctx.stacks.ints.push(1);
        }
        A::TypeArgFromType => {
            let t = ctx.pop_type()?;
            ctx.stacks.ast.push_one(AstValue::TypeArg(TypeArg::Type(t)));
        }
        A::AnnotatedTypeArg => {
            let mut t = ctx.pop_type()?;
            t.annotations = unwrap_each(ctx.pop_ast()?, as_annotation)?;
            ctx.stacks.ast.push_one(AstValue::TypeArg(TypeArg::Type(t)));
        }
        A::WildcardAny => {
            ctx.stacks
                .ast
                .push_one(AstValue::TypeArg(TypeArg::Wildcard(WildcardType { bound: None, span })));
        }
        A::WildcardExtends | A::WildcardSuper => {
            let t = ctx.pop_type()?;
            let kind =
                if action == A::WildcardExtends { BoundKind::Extends } else { BoundKind::Super };
            ctx.stacks.ast.push_one(AstValue::TypeArg(TypeArg::Wildcard(WildcardType {
                bound: Some((kind, t)),
                span,
            })));
        }
        A::TypeParameter { bounds } => {
            let bounds = if bounds {
                unwrap_each(ctx.pop_ast()?, as_type)?
            } else {
                Vec::new()
            };
            let (name, _) = ctx.pop_ident()?;
            ctx.stacks.ast.push_one(AstValue::TypeParam(TypeParam {
                annotations: Vec::new(),
                name,
                bounds,
                span,
            }));
        }

        // ---- type declarations ----
        A::ClassDeclaration => {
            let body = unwrap_each(ctx.pop_ast()?, as_member)?;
            let implements = unwrap_each(ctx.pop_ast()?, as_type)?;
            let extends = unwrap_each(ctx.pop_ast()?, as_type)?.into_iter().next();
            let type_params = unwrap_each(ctx.pop_ast()?, as_type_param)?;
            let (name, _) = ctx.pop_ident()?;
            let (modifiers, annotations) = ctx.pop_modifiers()?;
            ctx.stacks.ast.push_one(AstValue::Type(TypeDecl::Class(ClassDecl {
                modifiers,
                annotations,
                name,
                type_params,
                extends,
                implements,
                body,
                malformed: false,
                span,
            })));
        }
        A::InterfaceDeclaration => {
            let body = unwrap_each(ctx.pop_ast()?, as_member)?;
            let extends = unwrap_each(ctx.pop_ast()?, as_type)?;
            let type_params = unwrap_each(ctx.pop_ast()?, as_type_param)?;
            let (name, _) = ctx.pop_ident()?;
            let (modifiers, annotations) = ctx.pop_modifiers()?;
            ctx.stacks.ast.push_one(AstValue::Type(TypeDecl::Interface(InterfaceDecl {
                modifiers,
                annotations,
                name,
                type_params,
                extends,
                body,
                malformed: false,
                span,
            })));
        }
        A::EnumDeclaration => {
            let body = unwrap_each(ctx.pop_ast()?, as_member)?;
            let constants = unwrap_each(ctx.pop_ast()?, as_enum_const)?;
            let implements = unwrap_each(ctx.pop_ast()?, as_type)?;
            let (name, _) = ctx.pop_ident()?;
            let (modifiers, annotations) = ctx.pop_modifiers()?;
            ctx.stacks.ast.push_one(AstValue::Type(TypeDecl::Enum(EnumDecl {
                modifiers,
                annotations,
                name,
                implements,
                constants,
                body,
                malformed: false,
                span,
            })));
        }
        A::AnnotationTypeDeclaration { has_modifiers } => {
            let members = unwrap_each(ctx.pop_ast()?, as_member)?;
            let (name, _) = ctx.pop_ident()?;
            let (modifiers, annotations) = if has_modifiers {
                ctx.pop_modifiers()?
            } else {
                (Vec::new(), Vec::new())
            };
            let mut malformed = false;
            let body = annotation_members(members, &mut malformed);
            ctx.stacks.ast.push_one(AstValue::Type(TypeDecl::Annotation(AnnotationDecl {
                modifiers,
                annotations,
                name,
                body,
                malformed,
                span,
            })));
        }
        A::EnumConstant { args, body } => {
            let body = if body { Some(unwrap_each(ctx.pop_ast()?, as_member)?) } else { None };
            let arguments = if args { ctx.pop_exprs()? } else { Vec::new() };
            let (name, _) = ctx.pop_ident()?;
            // Keyword modifiers are meaningless on a constant; only the
            // annotations are kept.
            let (_, annotations) = ctx.pop_modifiers()?;
            ctx.stacks.ast.push_one(AstValue::EnumConst(EnumConstant {
                annotations,
                name,
                arguments,
                body,
                span,
            }));
        }
        A::InstanceInitializer => {
            let block = ctx.pop_block()?;
            ctx.stacks.ast.push_one(AstValue::Member(ClassMember::Initializer(InitializerBlock {
                is_static: false,
                body: Some(block),
                body_range: None,
                span,
            })));
        }
        A::StaticInitializer => {
            let block = ctx.pop_block()?;
            let body_range = ctx.pending_body_range.take();
            let body = if body_range.is_some() { None } else { Some(block) };
            ctx.stacks.ast.push_one(AstValue::Member(ClassMember::Initializer(InitializerBlock {
                is_static: true,
                body,
                body_range,
                span,
            })));
        }
        A::MemberFromType => {
            let t = as_typedecl(ctx.pop_ast_one()?)?;
            ctx.stacks.ast.push_one(AstValue::Member(ClassMember::TypeDecl(t)));
        }

        // ---- fields ----
        A::FieldDeclaration => {
            let variables = unwrap_each(ctx.pop_ast()?, as_declarator)?;
            let type_ref = ctx.pop_type()?;
            // The header-sharing prefix admits type parameters here; a field
            // cannot carry them, so their presence marks the node.
            let malformed = !ctx.pop_ast()?.is_empty();
            let (modifiers, annotations) = ctx.pop_modifiers()?;
            ctx.stacks.ast.push_one(AstValue::Member(ClassMember::Field(FieldDecl {
                modifiers,
                annotations,
                type_ref,
                variables,
                malformed,
                span,
            })));
        }
        A::DeclaratorNoInit => {
            let (name, dims, id_span) = ctx.pop_declarator_id()?;
            ctx.stacks.ast.push_one(AstValue::Declarator(VariableDeclarator {
                name,
                array_dims: dims,
                initializer: None,
                span: id_span,
            }));
        }
        A::DeclaratorWithInit => {
            let initializer = ctx.pop_expr()?;
            let (name, dims, _) = ctx.pop_declarator_id()?;
            ctx.stacks.ast.push_one(AstValue::Declarator(VariableDeclarator {
                name,
                array_dims: dims,
                initializer: Some(initializer),
                span,
            }));
        }
        A::DeclaratorId => {
            let (name, id_span) = ctx.pop_ident()?;
            ctx.stacks.ast.push_one(AstValue::DeclaratorId { name, dims: 0, span: id_span });
        }
        A::DeclaratorIdDim => {
            let (name, dims, _) = ctx.pop_declarator_id()?;
            ctx.stacks.ast.push_one(AstValue::DeclaratorId { name, dims: dims + 1, span });
        }
        A::ArrayInitializer => {
            let values = ctx.pop_exprs()?;
            ctx.stacks
                .exprs
                .push_one(Expr::ArrayInitializer(ArrayInitializerExpr { values, span }));
        }
        A::EmptyArrayInitializer => {
            ctx.stacks
                .exprs
                .push_one(Expr::ArrayInitializer(ArrayInitializerExpr { values: Vec::new(), span }));
        }

        // ---- methods ----
        A::MethodDeclaration => {
            let body_value = ctx.pop_ast_one()?;
            let header = as_header(ctx.pop_ast_one()?)?;
            let body_range = ctx.pending_body_range.take();
            let body = match body_value {
                AstValue::Block(b) if body_range.is_none() => Some(b),
                AstValue::Block(_) | AstValue::NoBody => None,
                other => return Err(mismatch("method body", &other)),
            };
            ctx.stacks.ast.push_one(AstValue::Member(ClassMember::Method(MethodDecl {
                modifiers: header.modifiers,
                annotations: header.annotations,
                type_params: header.type_params,
                return_type: header.return_type,
                name: header.name,
                parameters: header.parameters,
                extra_dims: header.extra_dims,
                throws: header.throws,
                body,
                body_range,
                default_value: None,
                malformed: header.malformed,
                span,
            })));
        }
        A::AnnotationElementDefault => {
            let default_value = as_element_value(ctx.pop_ast_one()?)?;
            let header = as_header(ctx.pop_ast_one()?)?;
            ctx.stacks.ast.push_one(AstValue::Member(ClassMember::Method(MethodDecl {
                modifiers: header.modifiers,
                annotations: header.annotations,
                type_params: header.type_params,
                return_type: header.return_type,
                name: header.name,
                parameters: header.parameters,
                extra_dims: header.extra_dims,
                throws: header.throws,
                body: None,
                body_range: None,
                default_value: Some(default_value),
                malformed: header.malformed,
                span,
            })));
        }
        A::NoMethodBody => ctx.stacks.ast.push_one(AstValue::NoBody),
        A::MethodHeader { void } => {
            let throws = unwrap_each(ctx.pop_ast()?, as_type)?;
            let (name, name_span, parameters, extra_dims) = match ctx.pop_ast_one()? {
                AstValue::MethodDeclarator { name, name_span, parameters, extra_dims, .. } => {
                    (name, name_span, parameters, extra_dims)
                }
                other => return Err(mismatch("method declarator", &other)),
            };
            let return_type = if void { None } else { Some(ctx.pop_type()?) };
            let type_params = unwrap_each(ctx.pop_ast()?, as_type_param)?;
            let (modifiers, annotations) = ctx.pop_modifiers()?;
            ctx.stacks.ast.push_one(AstValue::Header(Box::new(MethodHeaderParts {
                modifiers,
                annotations,
                type_params,
                return_type,
                name,
                name_span,
                parameters,
                extra_dims,
                throws,
                malformed: false,
                span,
            })));
        }
        A::MethodDeclarator => {
            let parameters = unwrap_each(ctx.pop_ast()?, as_param)?;
            let (name, name_span) = ctx.pop_ident()?;
            ctx.stacks.ast.push_one(AstValue::MethodDeclarator {
                name,
                name_span,
                parameters,
                extra_dims: 0,
                span,
            });
        }
        A::MethodDeclaratorDim => match ctx.pop_ast_one()? {
            AstValue::MethodDeclarator { name, name_span, parameters, extra_dims, .. } => {
                ctx.stacks.ast.push_one(AstValue::MethodDeclarator {
                    name,
                    name_span,
                    parameters,
                    extra_dims: extra_dims + 1,
                    span,
                });
            }
            other => return Err(mismatch("method declarator", &other)),
        },
        A::FormalParameter { varargs } => {
            let (name, dims, id_span) = ctx.pop_declarator_id()?;
            let type_ref = with_dims(ctx.pop_type()?, dims, id_span);
            let (modifiers, annotations) = ctx.pop_modifiers()?;
            ctx.stacks.ast.push_one(AstValue::Param(Parameter {
                modifiers,
                annotations,
                type_ref,
                name,
                varargs,
                span,
            }));
        }

        // ---- constructors ----
        A::ConstructorDeclaration => {
            let (invocation, block) = match ctx.pop_ast_one()? {
                AstValue::CtorBody { invocation, block } => (invocation, block),
                other => return Err(mismatch("constructor body", &other)),
            };
            let throws = unwrap_each(ctx.pop_ast()?, as_type)?;
            let parameters = unwrap_each(ctx.pop_ast()?, as_param)?;
            let (name, _) = ctx.pop_ident()?;
            let type_params = unwrap_each(ctx.pop_ast()?, as_type_param)?;
            let (modifiers, annotations) = ctx.pop_modifiers()?;
            let body_range = ctx.pending_body_range.take();
            let body = if body_range.is_some() { None } else { Some(block) };
            ctx.stacks.ast.push_one(AstValue::Member(ClassMember::Constructor(ConstructorDecl {
                modifiers,
                annotations,
                type_params,
                name,
                parameters,
                throws,
                explicit_invocation: invocation,
                body,
                body_range,
                malformed: false,
                span,
            })));
        }
        A::ConstructorBody => {
            let statements = ctx.pop_ast()?;
            let (invocation, block) = split_ctor_body(statements, span)?;
            ctx.stacks.ast.push_one(AstValue::CtorBody { invocation, block });
        }
        A::ExplicitCtorCall(kind) => {
            let arguments = ctx.pop_exprs()?;
            let kind = match kind {
                CtorKind::This => CtorCallKind::This,
                CtorKind::Super => CtorCallKind::Super,
                CtorKind::QualifiedSuper => CtorCallKind::QualifiedSuper(Box::new(ctx.pop_expr()?)),
            };
            ctx.stacks.ast.push_one(AstValue::CtorCall(ExplicitCtorInvocation {
                kind,
                arguments,
                span,
            }));
        }

        // ---- statements ----
        A::LocalClassStatement => {
            let t = as_typedecl(ctx.pop_ast_one()?)?;
            ctx.stacks.ast.push_one(AstValue::Stmt(Stmt::TypeDecl(t)));
        }
        A::LocalVariableDeclaration { has_modifiers } => {
            let variables = unwrap_each(ctx.pop_ast()?, as_declarator)?;
            let type_ref = ctx.pop_type()?;
            let (modifiers, annotations) = if has_modifiers {
                ctx.pop_modifiers()?
            } else {
                (Vec::new(), Vec::new())
            };
            ctx.stacks.ast.push_one(AstValue::Stmt(Stmt::Declaration(VarDeclStmt {
                modifiers,
                annotations,
                type_ref,
                variables,
                span,
            })));
        }
        A::StatementFromBlock => {
            let block = ctx.pop_block()?;
            ctx.stacks.ast.push_one(AstValue::Stmt(Stmt::Block(block)));
        }
        A::Block => {
            let statements = unwrap_each(ctx.pop_ast()?, as_stmt)?;
            ctx.stacks.ast.push_one(AstValue::Block(Block { statements, span }));
        }
        A::EmptyStatement => ctx.stacks.ast.push_one(AstValue::Stmt(Stmt::Empty)),
        A::ExpressionStatement => {
            let expr = ctx.pop_expr()?;
            ctx.stacks.ast.push_one(AstValue::Stmt(Stmt::Expression(ExprStmt { expr, span })));
        }
        A::IfStatement { has_else } => {
            let else_branch =
                if has_else { Some(Box::new(ctx.pop_stmt()?)) } else { None };
            let then_branch = Box::new(ctx.pop_stmt()?);
            let condition = ctx.pop_expr()?;
            ctx.stacks.ast.push_one(AstValue::Stmt(Stmt::If(IfStmt {
                condition,
                then_branch,
                else_branch,
                span,
            })));
        }
        A::WhileStatement => {
            let body = Box::new(ctx.pop_stmt()?);
            let condition = ctx.pop_expr()?;
            ctx.stacks
                .ast
                .push_one(AstValue::Stmt(Stmt::While(WhileStmt { condition, body, span })));
        }
        A::DoStatement => {
            let condition = ctx.pop_expr()?;
            let body = Box::new(ctx.pop_stmt()?);
            ctx.stacks
                .ast
                .push_one(AstValue::Stmt(Stmt::DoWhile(DoWhileStmt { body, condition, span })));
        }
        A::ForStatement => {
            let body = Box::new(ctx.pop_stmt()?);
            let update = ctx
                .pop_exprs()?
                .into_iter()
                .map(|expr| {
                    let expr_span = expr.span();
                    ExprStmt { expr, span: expr_span }
                })
                .collect();
            let condition = ctx.pop_opt_expr()?;
            let init = unwrap_each(ctx.pop_ast()?, as_stmt)?;
            ctx.stacks.ast.push_one(AstValue::Stmt(Stmt::For(ForStmt {
                init,
                condition,
                update,
                body,
                span,
            })));
        }
        A::EnhancedForStatement { has_modifiers } => {
            let body = Box::new(ctx.pop_stmt()?);
            let iterable = ctx.pop_expr()?;
            let (name, dims, id_span) = ctx.pop_declarator_id()?;
            let type_ref = with_dims(ctx.pop_type()?, dims, id_span);
            let (modifiers, annotations) = if has_modifiers {
                ctx.pop_modifiers()?
            } else {
                (Vec::new(), Vec::new())
            };
            let var_span = type_ref.span.cover(id_span);
            let variable = Parameter {
                modifiers,
                annotations,
                type_ref,
                name,
                varargs: false,
                span: var_span,
            };
            ctx.stacks.ast.push_one(AstValue::Stmt(Stmt::ForEach(ForEachStmt {
                variable,
                iterable,
                body,
                span,
            })));
        }
        A::ForInitExprs => {
            let exprs = ctx.pop_exprs()?;
            let stmts: Vec<AstValue> = exprs
                .into_iter()
                .map(|expr| {
                    let expr_span = expr.span();
                    AstValue::Stmt(Stmt::Expression(ExprStmt { expr, span: expr_span }))
                })
                .collect();
            ctx.stacks.ast.push_list(stmts);
        }
        A::SwitchStatement => {
            let cases = unwrap_each(ctx.pop_ast()?, as_case)?;
            let expression = ctx.pop_expr()?;
            ctx.stacks
                .ast
                .push_one(AstValue::Stmt(Stmt::Switch(SwitchStmt { expression, cases, span })));
        }
        A::SwitchGroup => {
            let statements = unwrap_each(ctx.pop_ast()?, as_stmt)?;
            let labels = unwrap_each(ctx.pop_ast()?, as_case_label)?;
            ctx.stacks.ast.push_one(AstValue::Case(build_case(labels, statements, span)));
        }
        A::SwitchLabelsGroup => {
            let labels = unwrap_each(ctx.pop_ast()?, as_case_label)?;
            ctx.stacks.ast.push_one(AstValue::Case(build_case(labels, Vec::new(), span)));
        }
        A::SwitchLabelsGroupConcat => {
            let labels = unwrap_each(ctx.pop_ast()?, as_case_label)?;
            ctx.stacks.ast.push_one(AstValue::Case(build_case(labels, Vec::new(), span)));
            ctx.stacks.ast.concat().ok_or_else(underflow)?;
        }
        A::CaseLabel => {
            let expr = ctx.pop_expr()?;
            ctx.stacks.ast.push_one(AstValue::CaseLabel { expr: Some(expr), span });
        }
        A::DefaultLabel => {
            ctx.stacks.ast.push_one(AstValue::CaseLabel { expr: None, span });
        }
        A::BreakStatement { label } => {
            let label = if label { Some(ctx.pop_ident()?.0) } else { None };
            ctx.stacks.ast.push_one(AstValue::Stmt(Stmt::Break(BreakStmt { label, span })));
        }
        A::ContinueStatement { label } => {
            let label = if label { Some(ctx.pop_ident()?.0) } else { None };
            ctx.stacks.ast.push_one(AstValue::Stmt(Stmt::Continue(ContinueStmt { label, span })));
        }
        A::ReturnStatement => {
            let value = ctx.pop_opt_expr()?;
            ctx.stacks.ast.push_one(AstValue::Stmt(Stmt::Return(ReturnStmt { value, span })));
        }
        A::ThrowStatement => {
            let expr = ctx.pop_expr()?;
            ctx.stacks.ast.push_one(AstValue::Stmt(Stmt::Throw(ThrowStmt { expr, span })));
        }
        A::SynchronizedStatement => {
            let body = ctx.pop_block()?;
            let lock = ctx.pop_expr()?;
            ctx.stacks.ast.push_one(AstValue::Stmt(Stmt::Synchronized(SynchronizedStmt {
                lock,
                body,
                span,
            })));
        }
        A::TryStatement { catches, has_finally } => {
            let finally_block = if has_finally { Some(ctx.pop_block()?) } else { None };
            let catch_clauses =
                if catches { unwrap_each(ctx.pop_ast()?, as_catch)? } else { Vec::new() };
            let try_block = ctx.pop_block()?;
            ctx.stacks.ast.push_one(AstValue::Stmt(Stmt::Try(TryStmt {
                resources: Vec::new(),
                try_block,
                catch_clauses,
                finally_block,
                span,
            })));
        }
        A::TryWithResources => {
            let finally_block = match ctx.pop_ast()?.into_iter().next() {
                Some(v) => Some(as_block(v)?),
                None => None,
            };
            let catch_clauses = unwrap_each(ctx.pop_ast()?, as_catch)?;
            let try_block = ctx.pop_block()?;
            let resources = unwrap_each(ctx.pop_ast()?, as_resource)?;
            ctx.stacks.ast.push_one(AstValue::Stmt(Stmt::Try(TryStmt {
                resources,
                try_block,
                catch_clauses,
                finally_block,
                span,
            })));
        }
        A::CatchClause => {
            let block = ctx.pop_block()?;
            let (parameter, alt_types) = match ctx.pop_ast_one()? {
                AstValue::CatchParam { parameter, alt_types } => (parameter, alt_types),
                other => return Err(mismatch("catch parameter", &other)),
            };
            ctx.stacks.ast.push_one(AstValue::Catch(CatchClause {
                parameter,
                alt_types,
                block,
                span,
            }));
        }
        A::CatchParameter { has_modifiers } => {
            let (name, dims, id_span) = ctx.pop_declarator_id()?;
            let mut types = unwrap_each(ctx.pop_ast()?, as_type)?;
            let (modifiers, annotations) = if has_modifiers {
                ctx.pop_modifiers()?
            } else {
                (Vec::new(), Vec::new())
            };
            if types.is_empty() {
                return Err(Error::internal("catch parameter without a type"));
            }
            let type_ref = with_dims(types.remove(0), dims, id_span);
            let parameter =
                Parameter { modifiers, annotations, type_ref, name, varargs: false, span };
            ctx.stacks.ast.push_one(AstValue::CatchParam { parameter, alt_types: types });
        }
        A::MultiCatchType => ctx.stacks.ast.concat().ok_or_else(underflow)?,
        A::Resource { has_modifiers } => {
            let initializer = ctx.pop_expr()?;
            let (name, dims, id_span) = ctx.pop_declarator_id()?;
            let type_ref = with_dims(ctx.pop_type()?, dims, id_span);
            let modifiers = if has_modifiers { ctx.pop_modifiers()?.0 } else { Vec::new() };
            ctx.stacks.ast.push_one(AstValue::Resource(TryResource::Var {
                modifiers,
                type_ref,
                name,
                initializer,
                span,
            }));
        }
        A::AssertStatement { message } => {
            let message = if message { Some(ctx.pop_expr()?) } else { None };
            let condition = ctx.pop_expr()?;
            ctx.stacks
                .ast
                .push_one(AstValue::Stmt(Stmt::Assert(AssertStmt { condition, message, span })));
        }
        A::LabeledStatement => {
            let statement = Box::new(ctx.pop_stmt()?);
            let (label, _) = ctx.pop_ident()?;
            ctx.stacks
                .ast
                .push_one(AstValue::Stmt(Stmt::Labeled(LabeledStmt { label, statement, span })));
        }

        // ---- expressions ----
        A::Assignment => {
            let value = Box::new(ctx.pop_expr()?);
            let operator = assign_op_from_code(ctx.pop_int()?)?;
            let target = Box::new(ctx.pop_expr()?);
            ctx.stacks.exprs.push_one(Expr::Assignment(AssignmentExpr {
                target,
                operator,
                value,
                span,
            }));
        }
        A::AssignOp(op) => ctx.stacks.ints.push(op as i64),
        A::ConditionalExpr => {
            let else_expr = Box::new(ctx.pop_expr()?);
            let then_expr = Box::new(ctx.pop_expr()?);
            let condition = Box::new(ctx.pop_expr()?);
            ctx.stacks.exprs.push_one(Expr::Conditional(ConditionalExpr {
                condition,
                then_expr,
                else_expr,
                span,
            }));
        }
        A::Binary(operator) => {
            let right = Box::new(ctx.pop_expr()?);
            let left = Box::new(ctx.pop_expr()?);
            ctx.stacks.exprs.push_one(Expr::Binary(BinaryExpr { left, operator, right, span }));
        }
        A::BinaryAdd => {
            let right = ctx.pop_expr()?;
            let left = ctx.pop_expr()?;
            ctx.stacks.exprs.push_one(binary_add(left, right, span));
        }
        A::InstanceOfExpr => {
            let target_type = ctx.pop_type()?;
            let expr = Box::new(ctx.pop_expr()?);
            ctx.stacks
                .exprs
                .push_one(Expr::InstanceOf(InstanceOfExpr { expr, target_type, span }));
        }
        A::Unary(operator) => {
            let operand = Box::new(ctx.pop_expr()?);
            ctx.stacks.exprs.push_one(Expr::Unary(UnaryExpr { operator, operand, span }));
        }
        A::UnaryMinus => {
            let operand = ctx.pop_expr()?;
            ctx.stacks.exprs.push_one(unary_minus(operand, span));
        }
        A::CastPrimitive => {
            let expr = Box::new(ctx.pop_expr()?);
            let dims = ctx.pop_int()? as usize;
            let target_type = with_dims(ctx.pop_type()?, dims, span);
            ctx.stacks.exprs.push_one(Expr::Cast(CastExpr { target_type, expr, span }));
        }
        A::CastFromExpr => {
            let expr = Box::new(ctx.pop_expr()?);
            let inner = ctx.pop_expr()?;
            let target_type = match expr_as_type(&inner) {
                Some(t) => t,
                None => {
                    let inner_span = inner.span();
                    ctx.problems.report(Problem::new(
                        ProblemKind::ParseError {
                            expected: vec!["Type".to_string()],
                            found: "Expression".to_string(),
                        },
                        inner_span,
                    ));
                    TypeRef::named("", inner_span)
                }
            };
            ctx.stacks.exprs.push_one(Expr::Cast(CastExpr { target_type, expr, span }));
        }
        A::CastArray => {
            let expr = Box::new(ctx.pop_expr()?);
            let dims = ctx.pop_int()? as usize;
            let (name, name_span) = ctx.pop_name()?;
            let target_type = with_dims(TypeRef::named(name, name_span), dims, span);
            ctx.stacks.exprs.push_one(Expr::Cast(CastExpr { target_type, expr, span }));
        }
        A::CastGeneric => {
            let expr = Box::new(ctx.pop_expr()?);
            let dims = ctx.pop_int()? as usize;
            let diamond = ctx.pop_int()? != 0;
            let type_args = unwrap_each(ctx.pop_ast()?, as_type_arg)?;
            let (name, name_span) = ctx.pop_name()?;
            let target_type = TypeRef {
                name,
                type_args,
                annotations: Vec::new(),
                array_dims: dims,
                diamond,
                span: name_span,
            };
            ctx.stacks.exprs.push_one(Expr::Cast(CastExpr { target_type, expr, span }));
        }
        A::NameToExpr => {
            let (name, name_span) = ctx.pop_name()?;
            ctx.stacks.exprs.push_one(Expr::Identifier(IdentifierExpr { name, span: name_span }));
        }
        A::ThisExpr => {
            ctx.stacks.exprs.push_one(Expr::This(ThisExpr { qualifier: None, span }));
        }
        A::QualifiedThisExpr => {
            let (name, _) = ctx.pop_name()?;
            ctx.stacks.exprs.push_one(Expr::This(ThisExpr { qualifier: Some(name), span }));
        }
        A::Parenthesized => {
            let inner = ctx.pop_expr()?;
            ctx.stacks.exprs.push_one(Expr::Parenthesized(Box::new(inner)));
        }
        A::ClassLiteralName { dims } => {
            let dims = if dims { ctx.pop_int()? as usize } else { 0 };
            let (name, name_span) = ctx.pop_name()?;
            let type_ref = with_dims(TypeRef::named(name, name_span), dims, span);
            ctx.stacks.exprs.push_one(Expr::ClassLiteral(ClassLiteralExpr { type_ref, span }));
        }
        A::ClassLiteralPrimitive { dims } => {
            let dims = if dims { ctx.pop_int()? as usize } else { 0 };
            let type_ref = with_dims(ctx.pop_type()?, dims, span);
            ctx.stacks.exprs.push_one(Expr::ClassLiteral(ClassLiteralExpr { type_ref, span }));
        }
        A::ClassLiteralVoid => {
            let type_ref = TypeRef::named("void", ctx.rhs_span(0));
            ctx.stacks.exprs.push_one(Expr::ClassLiteral(ClassLiteralExpr { type_ref, span }));
        }
        A::NewExpr { body } => {
            let anonymous_body =
                if body { Some(unwrap_each(ctx.pop_ast()?, as_member)?) } else { None };
            let arguments = ctx.pop_exprs()?;
            let target_type = ctx.pop_type()?;
            ctx.stacks.exprs.push_one(Expr::New(NewExpr {
                qualifier: None,
                target_type,
                type_args: Vec::new(),
                arguments,
                anonymous_body,
                span,
            }));
        }
        A::QualifiedNew { body, from_name } => {
            let anonymous_body =
                if body { Some(unwrap_each(ctx.pop_ast()?, as_member)?) } else { None };
            let arguments = ctx.pop_exprs()?;
            let (type_name, type_span) = ctx.pop_ident()?;
            let qualifier = if from_name {
                let (name, name_span) = ctx.pop_name()?;
                Expr::Identifier(IdentifierExpr { name, span: name_span })
            } else {
                ctx.pop_expr()?
            };
            ctx.stacks.exprs.push_one(Expr::New(NewExpr {
                qualifier: Some(Box::new(qualifier)),
                target_type: TypeRef::named(type_name, type_span),
                type_args: Vec::new(),
                arguments,
                anonymous_body,
                span,
            }));
        }
        A::NewArray { init } => {
            if init {
                let initializer = as_array_init(ctx.pop_expr()?)?;
                let extra_dims = ctx.pop_int()? as usize;
                let element_type = ctx.pop_type()?;
                ctx.stacks.exprs.push_one(Expr::NewArray(NewArrayExpr {
                    element_type,
                    dim_exprs: Vec::new(),
                    extra_dims,
                    initializer: Some(initializer),
                    span,
                }));
            } else {
                let extra_dims = ctx.pop_int()? as usize;
                let dim_exprs = ctx.pop_exprs()?;
                let element_type = ctx.pop_type()?;
                ctx.stacks.exprs.push_one(Expr::NewArray(NewArrayExpr {
                    element_type,
                    dim_exprs,
                    extra_dims,
                    initializer: None,
                    span,
                }));
            }
        }
        A::FieldAccessExpr => {
            let (name, _) = ctx.pop_ident()?;
            let target = Some(Box::new(ctx.pop_expr()?));
            ctx.stacks.exprs.push_one(Expr::FieldAccess(FieldAccessExpr { target, name, span }));
        }
        A::SuperFieldAccess => {
            let (name, _) = ctx.pop_ident()?;
            let target = Some(Box::new(Expr::Super(SuperExpr { span: ctx.rhs_span(0) })));
            ctx.stacks.exprs.push_one(Expr::FieldAccess(FieldAccessExpr { target, name, span }));
        }
        A::MethodInvocationName => {
            let arguments = ctx.pop_exprs()?;
            let mut segments = ctx.stacks.idents.pop_list().ok_or_else(underflow)?;
            let (name, _) = segments.pop().ok_or_else(underflow)?;
            let target = join_segments(segments)
                .map(|(n, s)| Box::new(Expr::Identifier(IdentifierExpr { name: n, span: s })));
            ctx.stacks.exprs.push_one(Expr::MethodCall(MethodCallExpr {
                target,
                type_args: Vec::new(),
                name,
                arguments,
                span,
            }));
        }
        A::MethodInvocationPrimary { generic } => {
            let arguments = ctx.pop_exprs()?;
            let (name, _) = ctx.pop_ident()?;
            let type_args = if generic {
                ctx.pop_int()?;
                unwrap_each(ctx.pop_ast()?, as_type_arg)?
            } else {
                Vec::new()
            };
            let target = Some(Box::new(ctx.pop_expr()?));
            ctx.stacks.exprs.push_one(Expr::MethodCall(MethodCallExpr {
                target,
                type_args,
                name,
                arguments,
                span,
            }));
        }
        A::MethodInvocationGenericName => {
            let arguments = ctx.pop_exprs()?;
            let (name, _) = ctx.pop_ident()?;
            ctx.pop_int()?;
            let type_args = unwrap_each(ctx.pop_ast()?, as_type_arg)?;
            let (target_name, target_span) = ctx.pop_name()?;
            let target = Some(Box::new(Expr::Identifier(IdentifierExpr {
                name: target_name,
                span: target_span,
            })));
            ctx.stacks.exprs.push_one(Expr::MethodCall(MethodCallExpr {
                target,
                type_args,
                name,
                arguments,
                span,
            }));
        }
        A::SuperMethodInvocation => {
            let arguments = ctx.pop_exprs()?;
            let (name, _) = ctx.pop_ident()?;
            let target = Some(Box::new(Expr::Super(SuperExpr { span: ctx.rhs_span(0) })));
            ctx.stacks.exprs.push_one(Expr::MethodCall(MethodCallExpr {
                target,
                type_args: Vec::new(),
                name,
                arguments,
                span,
            }));
        }
        A::ArrayAccessName => {
            let index = Box::new(ctx.pop_expr()?);
            let (name, name_span) = ctx.pop_name()?;
            let array = Box::new(Expr::Identifier(IdentifierExpr { name, span: name_span }));
            ctx.stacks.exprs.push_one(Expr::ArrayAccess(ArrayAccessExpr { array, index, span }));
        }
        A::ArrayAccessPrimary => {
            let index = Box::new(ctx.pop_expr()?);
            let array = Box::new(ctx.pop_expr()?);
            ctx.stacks.exprs.push_one(Expr::ArrayAccess(ArrayAccessExpr { array, index, span }));
        }
        A::MethodRefName { ctor } => {
            let name = if ctor { None } else { Some(ctx.pop_ident()?.0) };
            let (type_name, type_span) = ctx.pop_name()?;
            ctx.stacks.exprs.push_one(Expr::MethodRef(MethodRefExpr {
                target: MethodRefTarget::Type(TypeRef::named(type_name, type_span)),
                type_args: Vec::new(),
                name,
                span,
            }));
        }
        A::MethodRefPrimary => {
            let (name, _) = ctx.pop_ident()?;
            let target = MethodRefTarget::Expr(Box::new(ctx.pop_expr()?));
            ctx.stacks.exprs.push_one(Expr::MethodRef(MethodRefExpr {
                target,
                type_args: Vec::new(),
                name: Some(name),
                span,
            }));
        }
        A::MethodRefSuper => {
            let (name, _) = ctx.pop_ident()?;
            ctx.stacks.exprs.push_one(Expr::MethodRef(MethodRefExpr {
                target: MethodRefTarget::Super,
                type_args: Vec::new(),
                name: Some(name),
                span,
            }));
        }
        A::LambdaSimple => {
            let body = as_lambda_body(ctx.pop_ast_one()?)?;
            let (name, name_span) = ctx.pop_ident()?;
            let parameter =
                LambdaParam { modifiers: Vec::new(), type_ref: None, name, span: name_span };
            ctx.stacks.exprs.push_one(Expr::Lambda(LambdaExpr {
                parameters: vec![parameter],
                parenthesized: false,
                body,
                span,
            }));
        }
        A::Lambda { params } => {
            let body = as_lambda_body(ctx.pop_ast_one()?)?;
            let parameters =
                if params { unwrap_each(ctx.pop_ast()?, as_lambda_param)? } else { Vec::new() };
            ctx.stacks.exprs.push_one(Expr::Lambda(LambdaExpr {
                parameters,
                parenthesized: true,
                body,
                span,
            }));
        }
        A::InferredLambdaParam => {
            let (name, name_span) = ctx.pop_ident()?;
            ctx.stacks.ast.push_one(AstValue::LambdaParam(LambdaParam {
                modifiers: Vec::new(),
                type_ref: None,
                name,
                span: name_span,
            }));
        }
        A::TypedLambdaParam { has_modifiers } => {
            let (name, dims, id_span) = ctx.pop_declarator_id()?;
            let type_ref = with_dims(ctx.pop_type()?, dims, id_span);
            let modifiers = if has_modifiers { ctx.pop_modifiers()?.0 } else { Vec::new() };
            ctx.stacks.ast.push_one(AstValue::LambdaParam(LambdaParam {
                modifiers,
                type_ref: Some(type_ref),
                name,
                span,
            }));
        }
        A::LambdaBodyExpr => {
            let expr = ctx.pop_expr()?;
            ctx.stacks.ast.push_one(AstValue::LambdaBody(LambdaBody::Expr(Box::new(expr))));
        }
        A::LambdaBodyBlock => {
            let block = ctx.pop_block()?;
            ctx.stacks.ast.push_one(AstValue::LambdaBody(LambdaBody::Block(block)));
        }
    }
    Ok(())
}

/// Case labels flatten into the node's expression list; a `default` label is
/// the empty-list marker.
fn build_case(labels: Vec<(Option<Expr>, Span)>, statements: Vec<Stmt>, span: Span) -> SwitchCase {
    let labels = labels.into_iter().filter_map(|(expr, _)| expr).collect();
    SwitchCase { labels, statements, span }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: i64, span: Span) -> Expr {
        Expr::Literal(LiteralExpr { value: Literal::Int(v), span })
    }

    fn string(s: &str, span: Span) -> Expr {
        Expr::Literal(LiteralExpr { value: Literal::String(s.into()), span })
    }

    #[test]
    fn test_binary_add_folds_string_literals() {
        let folded = binary_add(string("foo", Span::new(0, 5)), string("bar", Span::new(8, 13)), Span::new(0, 13));
        match folded {
            Expr::Literal(LiteralExpr { value: Literal::String(s), span }) => {
                assert_eq!(s, "foobar");
                assert_eq!(span, Span::new(0, 13));
            }
            other => panic!("expected folded string literal, got {:?}", other),
        }
    }

    #[test]
    fn test_binary_add_flattens_long_chains() {
        let mut expr = int(0, Span::new(0, 1));
        for i in 1..COMBINE_THRESHOLD as i64 + 4 {
            let span = Span::new(0, (i as u32 + 1) * 2);
            expr = binary_add(expr, int(i, Span::new(i as u32 * 2, i as u32 * 2 + 1)), span);
        }
        match expr {
            Expr::CombinedBinary(c) => {
                assert_eq!(c.operator, BinaryOp::Add);
                assert!(c.operands.len() >= COMBINE_THRESHOLD);
            }
            other => panic!("expected combined node, got {:?}", other),
        }
    }

    #[test]
    fn test_binary_add_keeps_short_chains_as_trees() {
        let expr = binary_add(int(1, Span::new(0, 1)), int(2, Span::new(4, 5)), Span::new(0, 5));
        assert!(matches!(expr, Expr::Binary(_)));
    }

    #[test]
    fn test_unary_minus_folds_int_min() {
        // 2147483648 only fits once the minus is applied
        let operand = int(2147483648, Span::new(1, 11));
        match unary_minus(operand, Span::new(0, 11)) {
            Expr::Literal(LiteralExpr { value: Literal::Int(v), .. }) => {
                assert_eq!(v, -2147483648);
            }
            other => panic!("expected folded literal, got {:?}", other),
        }
    }

    #[test]
    fn test_unary_minus_keeps_non_literals() {
        let operand = Expr::Identifier(IdentifierExpr { name: "x".into(), span: Span::new(1, 2) });
        assert!(matches!(unary_minus(operand, Span::new(0, 2)), Expr::Unary(_)));
    }

    #[test]
    fn test_assign_op_codes_round_trip() {
        for op in ASSIGN_OPS {
            assert_eq!(assign_op_from_code(op as i64).unwrap(), op);
        }
        assert!(assign_op_from_code(99).is_err());
        assert!(assign_op_from_code(-1).is_err());
    }

    #[test]
    fn test_literal_expr_decodes_escapes() {
        let span = Span::new(0, 4);
        match literal_expr(Term::CharLiteral, "'\\n'", span) {
            Expr::Literal(LiteralExpr { value: Literal::Char(c), .. }) => assert_eq!(c, '\n'),
            other => panic!("bad char literal: {:?}", other),
        }
        match literal_expr(Term::StringLiteral, "\"a\\tb\"", Span::new(0, 6)) {
            Expr::Literal(LiteralExpr { value: Literal::String(s), .. }) => assert_eq!(s, "a\tb"),
            other => panic!("bad string literal: {:?}", other),
        }
    }

    #[test]
    fn test_literal_expr_strips_long_suffix() {
        match literal_expr(Term::LongLiteral, "42L", Span::new(0, 3)) {
            Expr::Literal(LiteralExpr { value: Literal::Long(v), .. }) => assert_eq!(v, 42),
            other => panic!("bad long literal: {:?}", other),
        }
    }

    #[test]
    fn test_literal_problem_gates_spellings() {
        let below = SourceLevel::JAVA_5;
        assert!(matches!(
            literal_problem(Term::IntLiteral, "0b1010", below),
            Some(ProblemKind::BinaryLiteralBelowSource { required: 7 })
        ));
        assert!(matches!(
            literal_problem(Term::IntLiteral, "1_000_000", below),
            Some(ProblemKind::UnderscoresInLiteralBelowSource { required: 7 })
        ));
        assert_eq!(literal_problem(Term::IntLiteral, "1000", below), None);
        assert_eq!(literal_problem(Term::IntLiteral, "0b1010", SourceLevel::JAVA_8), None);
    }

    #[test]
    fn test_version_problem_mapping() {
        assert!(matches!(
            version_problem(RuleAction::Diamond, "type arguments".into(), 7),
            ProblemKind::DiamondBelowSource { required: 7 }
        ));
        assert!(matches!(
            version_problem(RuleAction::MultiCatchType, "catch type".into(), 7),
            ProblemKind::MultiCatchBelowSource { required: 7 }
        ));
        match version_problem(RuleAction::EnumDeclaration, "enum declaration".into(), 5) {
            ProblemKind::VersionGated { construct, required: 5 } => {
                assert_eq!(construct, "enum declaration");
            }
            other => panic!("expected the catch-all kind, got {:?}", other),
        }
    }

    #[test]
    fn test_expr_as_type_accepts_names_only() {
        let name = Expr::Identifier(IdentifierExpr { name: "java.util.List".into(), span: Span::new(1, 15) });
        let t = expr_as_type(&name).unwrap();
        assert_eq!(t.name, "java.util.List");
        let sum = binary_add(int(1, Span::new(0, 1)), int(2, Span::new(2, 3)), Span::new(0, 3));
        assert!(expr_as_type(&sum).is_none());
    }
}
