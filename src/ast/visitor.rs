use super::*;

/// Visitor over the AST.
///
/// Every method has a default body that recurses into children and returns
/// `Output::default()`, so an implementation only overrides the nodes it cares
/// about.
pub trait AstVisitor: Sized {
    type Output: Default;

    fn visit_compilation_unit(&mut self, unit: &CompilationUnit) -> Self::Output {
        if let Some(ref package) = unit.package {
            self.visit_package_decl(package);
        }
        for import in &unit.imports {
            self.visit_import_decl(import);
        }
        for type_decl in &unit.types {
            type_decl.accept(self);
        }
        Self::Output::default()
    }

    fn visit_package_decl(&mut self, _package: &PackageDecl) -> Self::Output {
        Self::Output::default()
    }

    fn visit_import_decl(&mut self, _import: &ImportDecl) -> Self::Output {
        Self::Output::default()
    }

    fn visit_class_decl(&mut self, class: &ClassDecl) -> Self::Output {
        for annotation in &class.annotations {
            self.visit_annotation(annotation);
        }
        for type_param in &class.type_params {
            self.visit_type_param(type_param);
        }
        if let Some(ref extends) = class.extends {
            self.visit_type_ref(extends);
        }
        for implements in &class.implements {
            self.visit_type_ref(implements);
        }
        for member in &class.body {
            self.visit_class_member(member);
        }
        Self::Output::default()
    }

    fn visit_interface_decl(&mut self, interface: &InterfaceDecl) -> Self::Output {
        for annotation in &interface.annotations {
            self.visit_annotation(annotation);
        }
        for type_param in &interface.type_params {
            self.visit_type_param(type_param);
        }
        for extends in &interface.extends {
            self.visit_type_ref(extends);
        }
        for member in &interface.body {
            self.visit_class_member(member);
        }
        Self::Output::default()
    }

    fn visit_enum_decl(&mut self, enum_decl: &EnumDecl) -> Self::Output {
        for annotation in &enum_decl.annotations {
            self.visit_annotation(annotation);
        }
        for implements in &enum_decl.implements {
            self.visit_type_ref(implements);
        }
        for constant in &enum_decl.constants {
            for argument in &constant.arguments {
                self.visit_expr(argument);
            }
            if let Some(ref body) = constant.body {
                for member in body {
                    self.visit_class_member(member);
                }
            }
        }
        for member in &enum_decl.body {
            self.visit_class_member(member);
        }
        Self::Output::default()
    }

    fn visit_annotation_decl(&mut self, annotation_decl: &AnnotationDecl) -> Self::Output {
        for member in &annotation_decl.body {
            match member {
                AnnotationMember::Element { type_ref, default_value, .. } => {
                    self.visit_type_ref(type_ref);
                    if let Some(value) = default_value {
                        self.visit_element_value(value);
                    }
                }
                AnnotationMember::Field(field) => {
                    self.visit_field_decl(field);
                }
                AnnotationMember::TypeDecl(type_decl) => {
                    type_decl.accept(self);
                }
            }
        }
        Self::Output::default()
    }

    fn visit_class_member(&mut self, member: &ClassMember) -> Self::Output {
        match member {
            ClassMember::Field(f) => self.visit_field_decl(f),
            ClassMember::Method(m) => self.visit_method_decl(m),
            ClassMember::Constructor(c) => self.visit_constructor_decl(c),
            ClassMember::Initializer(i) => {
                if let Some(ref body) = i.body {
                    self.visit_block(body)
                } else {
                    Self::Output::default()
                }
            }
            ClassMember::TypeDecl(t) => t.accept(self),
        }
    }

    fn visit_field_decl(&mut self, field: &FieldDecl) -> Self::Output {
        self.visit_type_ref(&field.type_ref);
        for variable in &field.variables {
            if let Some(ref init) = variable.initializer {
                self.visit_expr(init);
            }
        }
        Self::Output::default()
    }

    fn visit_method_decl(&mut self, method: &MethodDecl) -> Self::Output {
        for type_param in &method.type_params {
            self.visit_type_param(type_param);
        }
        if let Some(ref return_type) = method.return_type {
            self.visit_type_ref(return_type);
        }
        for parameter in &method.parameters {
            self.visit_parameter(parameter);
        }
        for thrown in &method.throws {
            self.visit_type_ref(thrown);
        }
        if let Some(ref body) = method.body {
            self.visit_block(body);
        }
        Self::Output::default()
    }

    fn visit_constructor_decl(&mut self, constructor: &ConstructorDecl) -> Self::Output {
        for parameter in &constructor.parameters {
            self.visit_parameter(parameter);
        }
        for thrown in &constructor.throws {
            self.visit_type_ref(thrown);
        }
        if let Some(ref invocation) = constructor.explicit_invocation {
            for argument in &invocation.arguments {
                self.visit_expr(argument);
            }
        }
        if let Some(ref body) = constructor.body {
            self.visit_block(body);
        }
        Self::Output::default()
    }

    fn visit_parameter(&mut self, parameter: &Parameter) -> Self::Output {
        self.visit_type_ref(&parameter.type_ref);
        Self::Output::default()
    }

    fn visit_block(&mut self, block: &Block) -> Self::Output {
        for stmt in &block.statements {
            self.visit_stmt(stmt);
        }
        Self::Output::default()
    }

    fn visit_stmt(&mut self, stmt: &Stmt) -> Self::Output {
        match stmt {
            Stmt::Expression(s) => {
                self.visit_expr(&s.expr);
            }
            Stmt::Declaration(s) => {
                self.visit_type_ref(&s.type_ref);
                for variable in &s.variables {
                    if let Some(ref init) = variable.initializer {
                        self.visit_expr(init);
                    }
                }
            }
            Stmt::TypeDecl(t) => {
                t.accept(self);
            }
            Stmt::If(s) => {
                self.visit_expr(&s.condition);
                self.visit_stmt(&s.then_branch);
                if let Some(ref else_branch) = s.else_branch {
                    self.visit_stmt(else_branch);
                }
            }
            Stmt::While(s) => {
                self.visit_expr(&s.condition);
                self.visit_stmt(&s.body);
            }
            Stmt::DoWhile(s) => {
                self.visit_stmt(&s.body);
                self.visit_expr(&s.condition);
            }
            Stmt::For(s) => {
                for init in &s.init {
                    self.visit_stmt(init);
                }
                if let Some(ref condition) = s.condition {
                    self.visit_expr(condition);
                }
                for update in &s.update {
                    self.visit_expr(&update.expr);
                }
                self.visit_stmt(&s.body);
            }
            Stmt::ForEach(s) => {
                self.visit_parameter(&s.variable);
                self.visit_expr(&s.iterable);
                self.visit_stmt(&s.body);
            }
            Stmt::Switch(s) => {
                self.visit_expr(&s.expression);
                for case in &s.cases {
                    for label in &case.labels {
                        self.visit_expr(label);
                    }
                    for stmt in &case.statements {
                        self.visit_stmt(stmt);
                    }
                }
            }
            Stmt::Return(s) => {
                if let Some(ref value) = s.value {
                    self.visit_expr(value);
                }
            }
            Stmt::Break(_) | Stmt::Continue(_) | Stmt::Empty => {}
            Stmt::Try(s) => {
                for resource in &s.resources {
                    match resource {
                        TryResource::Var { type_ref, initializer, .. } => {
                            self.visit_type_ref(type_ref);
                            self.visit_expr(initializer);
                        }
                        TryResource::Expr { expr, .. } => {
                            self.visit_expr(expr);
                        }
                    }
                }
                self.visit_block(&s.try_block);
                for clause in &s.catch_clauses {
                    self.visit_parameter(&clause.parameter);
                    for alt in &clause.alt_types {
                        self.visit_type_ref(alt);
                    }
                    self.visit_block(&clause.block);
                }
                if let Some(ref finally_block) = s.finally_block {
                    self.visit_block(finally_block);
                }
            }
            Stmt::Throw(s) => {
                self.visit_expr(&s.expr);
            }
            Stmt::Assert(s) => {
                self.visit_expr(&s.condition);
                if let Some(ref message) = s.message {
                    self.visit_expr(message);
                }
            }
            Stmt::Synchronized(s) => {
                self.visit_expr(&s.lock);
                self.visit_block(&s.body);
            }
            Stmt::Labeled(s) => {
                self.visit_stmt(&s.statement);
            }
            Stmt::Block(b) => {
                self.visit_block(b);
            }
        }
        Self::Output::default()
    }

    fn visit_expr(&mut self, expr: &Expr) -> Self::Output {
        match expr {
            Expr::Literal(_) | Expr::Identifier(_) | Expr::This(_) | Expr::Super(_) | Expr::Empty(_) => {}
            Expr::Binary(e) => {
                self.visit_expr(&e.left);
                self.visit_expr(&e.right);
            }
            Expr::CombinedBinary(e) => {
                for operand in &e.operands {
                    self.visit_expr(operand);
                }
            }
            Expr::Unary(e) => {
                self.visit_expr(&e.operand);
            }
            Expr::Assignment(e) => {
                self.visit_expr(&e.target);
                self.visit_expr(&e.value);
            }
            Expr::MethodCall(e) => {
                if let Some(ref target) = e.target {
                    self.visit_expr(target);
                }
                for argument in &e.arguments {
                    self.visit_expr(argument);
                }
            }
            Expr::FieldAccess(e) => {
                if let Some(ref target) = e.target {
                    self.visit_expr(target);
                }
            }
            Expr::ArrayAccess(e) => {
                self.visit_expr(&e.array);
                self.visit_expr(&e.index);
            }
            Expr::Cast(e) => {
                self.visit_type_ref(&e.target_type);
                self.visit_expr(&e.expr);
            }
            Expr::InstanceOf(e) => {
                self.visit_expr(&e.expr);
                self.visit_type_ref(&e.target_type);
            }
            Expr::Conditional(e) => {
                self.visit_expr(&e.condition);
                self.visit_expr(&e.then_expr);
                self.visit_expr(&e.else_expr);
            }
            Expr::New(e) => {
                if let Some(ref qualifier) = e.qualifier {
                    self.visit_expr(qualifier);
                }
                self.visit_type_ref(&e.target_type);
                for argument in &e.arguments {
                    self.visit_expr(argument);
                }
                if let Some(ref body) = e.anonymous_body {
                    for member in body {
                        self.visit_class_member(member);
                    }
                }
            }
            Expr::NewArray(e) => {
                self.visit_type_ref(&e.element_type);
                for dim in &e.dim_exprs {
                    self.visit_expr(dim);
                }
                if let Some(ref init) = e.initializer {
                    for value in &init.values {
                        self.visit_expr(value);
                    }
                }
            }
            Expr::ArrayInitializer(e) => {
                for value in &e.values {
                    self.visit_expr(value);
                }
            }
            Expr::Lambda(e) => {
                for parameter in &e.parameters {
                    if let Some(ref type_ref) = parameter.type_ref {
                        self.visit_type_ref(type_ref);
                    }
                }
                match &e.body {
                    LambdaBody::Expr(body) => {
                        self.visit_expr(body);
                    }
                    LambdaBody::Block(block) => {
                        self.visit_block(block);
                    }
                }
            }
            Expr::MethodRef(e) => {
                match &e.target {
                    MethodRefTarget::Expr(target) => {
                        self.visit_expr(target);
                    }
                    MethodRefTarget::Type(type_ref) => {
                        self.visit_type_ref(type_ref);
                    }
                    MethodRefTarget::Super => {}
                }
            }
            Expr::ClassLiteral(e) => {
                self.visit_type_ref(&e.type_ref);
            }
            Expr::Parenthesized(inner) => {
                self.visit_expr(inner);
            }
        }
        Self::Output::default()
    }

    fn visit_type_ref(&mut self, type_ref: &TypeRef) -> Self::Output {
        for arg in &type_ref.type_args {
            match arg {
                TypeArg::Type(t) => {
                    self.visit_type_ref(t);
                }
                TypeArg::Wildcard(w) => {
                    if let Some((_, ref bound)) = w.bound {
                        self.visit_type_ref(bound);
                    }
                }
            }
        }
        Self::Output::default()
    }

    fn visit_type_param(&mut self, type_param: &TypeParam) -> Self::Output {
        for bound in &type_param.bounds {
            self.visit_type_ref(bound);
        }
        Self::Output::default()
    }

    fn visit_annotation(&mut self, annotation: &Annotation) -> Self::Output {
        for argument in &annotation.arguments {
            match argument {
                AnnotationArg::Value(value) | AnnotationArg::Named(_, value) => {
                    self.visit_element_value(value);
                }
            }
        }
        Self::Output::default()
    }

    fn visit_element_value(&mut self, value: &ElementValue) -> Self::Output {
        match value {
            ElementValue::Expr(expr) => {
                self.visit_expr(expr);
            }
            ElementValue::Annotation(annotation) => {
                self.visit_annotation(annotation);
            }
            ElementValue::Array(values) => {
                for value in values {
                    self.visit_element_value(value);
                }
            }
        }
        Self::Output::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts identifier expressions, exercising the default traversal.
    #[derive(Default)]
    struct IdentCounter {
        count: usize,
    }

    impl AstVisitor for IdentCounter {
        type Output = ();

        fn visit_expr(&mut self, expr: &Expr) {
            if let Expr::Identifier(_) = expr {
                self.count += 1;
            }
            // keep walking nested expressions
            match expr {
                Expr::Binary(e) => {
                    self.visit_expr(&e.left);
                    self.visit_expr(&e.right);
                }
                _ => {}
            }
        }
    }

    #[test]
    fn test_visitor_counts_identifiers() {
        let span = Span::new(0, 1);
        let expr = Expr::Binary(BinaryExpr {
            left: Box::new(Expr::Identifier(IdentifierExpr { name: "a".into(), span })),
            operator: BinaryOp::Add,
            right: Box::new(Expr::Identifier(IdentifierExpr { name: "b".into(), span })),
            span,
        });
        let mut counter = IdentCounter::default();
        counter.visit_expr(&expr);
        assert_eq!(counter.count, 2);
    }
}
