//! Segmented value stacks driven by the reduce actions.
//!
//! Each stack pairs a flat value vector with a length vector describing how
//! the tail of the value vector is partitioned into lists. A rule that
//! produces a single element pushes a one-element list; left-recursive list
//! rules merge the two topmost lists in place, so building an n-element list
//! never reallocates per element. Reduce actions pop whole lists.
//!
//! Underflow is a driver bug, not a user error: accessors return `Option` and
//! the action layer converts `None` into an internal error instead of
//! panicking.

use crate::ast::{
    Annotation, AnnotationArg, Block, CatchClause, ElementValue, EnumConstant, ExplicitCtorInvocation,
    Expr, LambdaParam, ClassMember, Modifier, Parameter, Stmt, SwitchCase, TryResource, TypeArg,
    TypeDecl, TypeParam, TypeRef, VariableDeclarator,
};
use crate::parser::span::Span;

/// A stack of lists over a flat value vector.
#[derive(Debug)]
pub struct ListStack<T> {
    values: Vec<T>,
    lengths: Vec<usize>,
}

impl<T> ListStack<T> {
    pub fn new() -> Self {
        ListStack { values: Vec::new(), lengths: Vec::new() }
    }

    /// Push a one-element list.
    pub fn push_one(&mut self, value: T) {
        self.values.push(value);
        self.lengths.push(1);
    }

    /// Push an empty list (optional clauses that matched nothing).
    pub fn push_empty(&mut self) {
        self.lengths.push(0);
    }

    pub fn push_list(&mut self, list: Vec<T>) {
        self.lengths.push(list.len());
        self.values.extend(list);
    }

    /// Merge the two topmost lists into one. The values are already adjacent
    /// in the flat vector, so only the length bookkeeping changes.
    pub fn concat(&mut self) -> Option<()> {
        let tail = self.lengths.pop()?;
        let head = self.lengths.last_mut()?;
        *head += tail;
        Some(())
    }

    /// Pop the topmost list.
    pub fn pop_list(&mut self) -> Option<Vec<T>> {
        let len = self.lengths.pop()?;
        if self.values.len() < len {
            return None;
        }
        let at = self.values.len() - len;
        Some(self.values.split_off(at))
    }

    /// Pop a list expected to hold exactly one element.
    pub fn pop_one(&mut self) -> Option<T> {
        let mut list = self.pop_list()?;
        if list.len() != 1 {
            return None;
        }
        list.pop()
    }

    pub fn list_count(&self) -> usize {
        self.lengths.len()
    }

    /// Snapshot for recovery checkpoints.
    pub fn mark(&self) -> (usize, usize) {
        (self.values.len(), self.lengths.len())
    }

    /// Unwind to a checkpoint taken with [`mark`](Self::mark).
    pub fn truncate(&mut self, mark: (usize, usize)) {
        self.values.truncate(mark.0);
        self.lengths.truncate(mark.1);
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }
}

impl<T> Default for ListStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier segments with their spans, in list form.
///
/// Every shifted identifier lands here as a one-element list; qualified-name
/// rules merge adjacent lists, so a dotted name ends up as one list of
/// segments that a consumer joins in a single pass.
#[derive(Debug, Default)]
pub struct IdentStack {
    names: Vec<String>,
    spans: Vec<Span>,
    lengths: Vec<usize>,
}

impl IdentStack {
    pub fn new() -> Self {
        IdentStack::default()
    }

    pub fn push(&mut self, name: String, span: Span) {
        self.names.push(name);
        self.spans.push(span);
        self.lengths.push(1);
    }

    pub fn concat(&mut self) -> Option<()> {
        let tail = self.lengths.pop()?;
        let head = self.lengths.last_mut()?;
        *head += tail;
        Some(())
    }

    /// Pop one segment list as `(name, span)` pairs in source order.
    pub fn pop_list(&mut self) -> Option<Vec<(String, Span)>> {
        let len = self.lengths.pop()?;
        if self.names.len() < len {
            return None;
        }
        let at = self.names.len() - len;
        let names = self.names.split_off(at);
        let spans = self.spans.split_off(at);
        Some(names.into_iter().zip(spans).collect())
    }

    /// Pop a single identifier.
    pub fn pop_single(&mut self) -> Option<(String, Span)> {
        let mut list = self.pop_list()?;
        if list.len() != 1 {
            return None;
        }
        list.pop()
    }

    /// Pop a segment list joined into a dotted name with its covering span.
    pub fn pop_name(&mut self) -> Option<(String, Span)> {
        let segments = self.pop_list()?;
        let (first, last) = (segments.first()?.1, segments.last()?.1);
        let mut name = String::new();
        for (i, (segment, _)) in segments.iter().enumerate() {
            if i > 0 {
                name.push('.');
            }
            name.push_str(segment);
        }
        Some((name, first.cover(last)))
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    pub fn mark(&self) -> (usize, usize) {
        (self.names.len(), self.lengths.len())
    }

    pub fn truncate(&mut self, mark: (usize, usize)) {
        self.names.truncate(mark.0);
        self.spans.truncate(mark.0);
        self.lengths.truncate(mark.1);
    }
}

/// Everything a method header rule gathers before the body is known.
#[derive(Debug, Clone)]
pub struct MethodHeaderParts {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub type_params: Vec<TypeParam>,
    pub return_type: Option<TypeRef>,
    pub name: String,
    pub name_span: Span,
    pub parameters: Vec<Parameter>,
    pub extra_dims: usize,
    pub throws: Vec<TypeRef>,
    pub malformed: bool,
    pub span: Span,
}

/// Intermediate values living on the declaration stack between reduces.
#[derive(Debug, Clone)]
pub enum AstValue {
    Package(crate::ast::PackageDecl),
    Import(crate::ast::ImportDecl),
    Type(TypeDecl),
    Member(ClassMember),
    Stmt(Stmt),
    Case(SwitchCase),
    CaseLabel { expr: Option<Expr>, span: Span },
    Catch(CatchClause),
    Resource(TryResource),
    Param(Parameter),
    LambdaParam(LambdaParam),
    TypeParam(TypeParam),
    TypeRef(TypeRef),
    TypeArg(TypeArg),
    Annotation(Annotation),
    ModifierKw { modifier: Modifier, span: Span },
    AnnotationArg(AnnotationArg),
    ElementValue(ElementValue),
    EnumConst(EnumConstant),
    Declarator(VariableDeclarator),
    DeclaratorId { name: String, dims: usize, span: Span },
    MethodDeclarator {
        name: String,
        name_span: Span,
        parameters: Vec<Parameter>,
        extra_dims: usize,
        span: Span,
    },
    Header(Box<MethodHeaderParts>),
    CtorCall(ExplicitCtorInvocation),
    CtorBody { invocation: Option<ExplicitCtorInvocation>, block: Block },
    CatchParam { parameter: Parameter, alt_types: Vec<TypeRef> },
    LambdaBody(crate::ast::LambdaBody),
    Block(Block),
    /// Marker for `;` in place of a method body.
    NoBody,
}

/// Split an interleaved modifiers-and-annotations list into its parts.
///
/// Duplicated keywords are kept (the flag set dedupes); the caller decides
/// whether a non-modifier element in a modifier position marks the node.
pub fn split_modifiers(items: Vec<AstValue>) -> (Vec<Modifier>, Vec<Annotation>) {
    let mut modifiers = Vec::new();
    let mut annotations = Vec::new();
    for item in items {
        match item {
            AstValue::ModifierKw { modifier, .. } => modifiers.push(modifier),
            AstValue::Annotation(annotation) => annotations.push(annotation),
            _ => {}
        }
    }
    (modifiers, annotations)
}

/// The full set of value stacks the reduce actions operate on.
#[derive(Debug, Default)]
pub struct ValueStacks {
    pub ast: ListStack<AstValue>,
    pub exprs: ListStack<Expr>,
    pub idents: IdentStack,
    /// Small integers: dimension counts and option flags.
    pub ints: Vec<i64>,
}

impl ValueStacks {
    pub fn new() -> Self {
        ValueStacks::default()
    }

    /// Checkpoint of every stack, for error-recovery unwinding.
    pub fn mark(&self) -> StackMark {
        StackMark {
            ast: self.ast.mark(),
            exprs: self.exprs.mark(),
            idents: self.idents.mark(),
            ints: self.ints.len(),
        }
    }

    pub fn unwind(&mut self, mark: &StackMark) {
        self.ast.truncate(mark.ast);
        self.exprs.truncate(mark.exprs);
        self.idents.truncate(mark.idents);
        self.ints.truncate(mark.ints);
    }

    pub fn clear(&mut self) {
        *self = ValueStacks::new();
    }

    /// True when every stack is back at its pre-parse depth. A clean parse
    /// must consume everything it pushes; the entry points assert this in
    /// debug builds.
    pub fn is_drained(&self) -> bool {
        self.ast.is_empty() && self.exprs.is_empty() && self.idents.is_empty() && self.ints.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StackMark {
    ast: (usize, usize),
    exprs: (usize, usize),
    idents: (usize, usize),
    ints: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_stack_concat() {
        let mut stack: ListStack<u32> = ListStack::new();
        stack.push_one(1);
        stack.push_one(2);
        stack.concat().unwrap();
        stack.push_one(3);
        stack.concat().unwrap();
        assert_eq!(stack.pop_list().unwrap(), vec![1, 2, 3]);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_list_stack_empty_list() {
        let mut stack: ListStack<u32> = ListStack::new();
        stack.push_empty();
        stack.push_one(9);
        assert_eq!(stack.pop_list().unwrap(), vec![9]);
        assert_eq!(stack.pop_list().unwrap(), Vec::<u32>::new());
        assert!(stack.pop_list().is_none());
    }

    #[test]
    fn test_ident_stack_qualified_name() {
        let mut idents = IdentStack::new();
        idents.push("java".into(), Span::new(0, 4));
        idents.push("util".into(), Span::new(5, 9));
        idents.concat().unwrap();
        idents.push("List".into(), Span::new(10, 14));
        idents.concat().unwrap();
        let (name, span) = idents.pop_name().unwrap();
        assert_eq!(name, "java.util.List");
        assert_eq!(span, Span::new(0, 14));
    }

    #[test]
    fn test_drained_only_when_every_stack_is_back_to_empty() {
        let mut stacks = ValueStacks::new();
        assert!(stacks.is_drained());
        stacks.exprs.push_one(Expr::Empty(Span::new(0, 0)));
        stacks.idents.push("x".into(), Span::new(0, 1));
        stacks.ints.push(1);
        assert!(!stacks.is_drained());
        stacks.exprs.pop_one().unwrap();
        stacks.idents.pop_single().unwrap();
        assert!(!stacks.is_drained());
        stacks.ints.pop();
        assert!(stacks.is_drained());
    }

    #[test]
    fn test_unwind_restores_marks() {
        let mut stacks = ValueStacks::new();
        stacks.exprs.push_one(Expr::Empty(Span::new(0, 0)));
        let mark = stacks.mark();
        stacks.exprs.push_one(Expr::Empty(Span::new(1, 2)));
        stacks.ints.push(7);
        stacks.unwind(&mark);
        assert_eq!(stacks.exprs.list_count(), 1);
        assert!(stacks.ints.is_empty());
    }
}
