use jparse::ast::{
    AssignmentOp, BinaryOp, Expr, LambdaBody, Literal, MethodRefTarget, Stmt, UnaryOp,
};
use jparse::Parser;

fn expr(src: &str) -> Expr {
    let parsed = Parser::new().parse_expression(src).expect("parse failed");
    assert!(!parsed.has_syntax_error(), "{:?}", parsed.problems);
    parsed.value
}

fn stmts(src: &str) -> Vec<Stmt> {
    let parsed = Parser::new().parse_block_statements(src).expect("parse failed");
    assert!(!parsed.has_syntax_error(), "{:?}", parsed.problems);
    parsed.value
}

fn tree_depth(e: &Expr) -> usize {
    match e {
        Expr::Binary(b) => 1 + tree_depth(&b.left).max(tree_depth(&b.right)),
        Expr::CombinedBinary(c) => 1 + c.operands.iter().map(tree_depth).max().unwrap_or(0),
        _ => 1,
    }
}

#[test]
fn multiplicative_binds_tighter_than_additive() {
    match expr("a + b * c") {
        Expr::Binary(add) => {
            assert_eq!(add.operator, BinaryOp::Add);
            match *add.right {
                Expr::Binary(mul) => assert_eq!(mul.operator, BinaryOp::Mul),
                other => panic!("expected multiplication on the right, got {:?}", other),
            }
        }
        other => panic!("expected addition, got {:?}", other),
    }
}

#[test]
fn shift_and_relational_operators() {
    match expr("a >> 2 >= b") {
        Expr::Binary(ge) => {
            assert_eq!(ge.operator, BinaryOp::Ge);
            match *ge.left {
                Expr::Binary(sh) => assert_eq!(sh.operator, BinaryOp::RShift),
                other => panic!("expected shift on the left, got {:?}", other),
            }
        }
        other => panic!("expected comparison, got {:?}", other),
    }
}

#[test]
fn adjacent_string_literals_fold() {
    match expr("\"foo\" + \"bar\"") {
        Expr::Literal(l) => assert_eq!(l.value, Literal::String("foobar".into())),
        other => panic!("expected folded literal, got {:?}", other),
    }
}

#[test]
fn string_fold_stops_at_non_literal() {
    match expr("\"a\" + \"b\" + x") {
        Expr::Binary(b) => {
            assert_eq!(b.operator, BinaryOp::Add);
            match *b.left {
                Expr::Literal(l) => assert_eq!(l.value, Literal::String("ab".into())),
                other => panic!("expected folded left operand, got {:?}", other),
            }
        }
        other => panic!("expected addition, got {:?}", other),
    }
}

#[test]
fn long_addition_chain_flattens() {
    let src = (0..500).map(|i| format!("a{i}")).collect::<Vec<_>>().join(" + ");
    let e = expr(&src);
    match &e {
        Expr::CombinedBinary(c) => {
            assert_eq!(c.operator, BinaryOp::Add);
            assert_eq!(c.operands.len(), 500);
        }
        other => panic!("expected combined node, got {:?}", other),
    }
    // The whole point of the combined node: no 500-deep tree.
    assert!(tree_depth(&e) <= 3);
}

#[test]
fn minimum_int_literal_folds_under_minus() {
    match expr("-2147483648") {
        Expr::Literal(l) => assert_eq!(l.value, Literal::Int(-2147483648)),
        other => panic!("expected folded literal, got {:?}", other),
    }
    match expr("-9223372036854775808L") {
        Expr::Literal(l) => assert_eq!(l.value, Literal::Long(i64::MIN)),
        other => panic!("expected folded literal, got {:?}", other),
    }
}

#[test]
fn unary_minus_on_identifier_stays_unary() {
    match expr("-x") {
        Expr::Unary(u) => assert_eq!(u.operator, UnaryOp::Minus),
        other => panic!("expected unary node, got {:?}", other),
    }
}

#[test]
fn conditional_and_assignment() {
    match expr("x = a < b ? a : b") {
        Expr::Assignment(a) => {
            assert_eq!(a.operator, AssignmentOp::Assign);
            assert!(matches!(*a.value, Expr::Conditional(_)));
        }
        other => panic!("expected assignment, got {:?}", other),
    }
    match expr("total += 1") {
        Expr::Assignment(a) => assert_eq!(a.operator, AssignmentOp::AddAssign),
        other => panic!("expected assignment, got {:?}", other),
    }
}

#[test]
fn method_calls_and_field_access() {
    match expr("obj.list.get(0)") {
        Expr::MethodCall(call) => {
            assert_eq!(call.name, "get");
            assert_eq!(call.arguments.len(), 1);
            assert!(call.target.is_some());
        }
        other => panic!("expected call, got {:?}", other),
    }
    match expr("a.b().c") {
        Expr::FieldAccess(f) => {
            assert_eq!(f.name, "c");
            assert!(matches!(f.target.as_deref(), Some(Expr::MethodCall(_))));
        }
        other => panic!("expected field access, got {:?}", other),
    }
}

#[test]
fn array_creation_and_access() {
    match expr("new int[3][]") {
        Expr::NewArray(n) => {
            assert_eq!(n.element_type.name, "int");
            assert_eq!(n.dim_exprs.len(), 1);
            assert_eq!(n.extra_dims, 1);
            assert!(n.initializer.is_none());
        }
        other => panic!("expected array allocation, got {:?}", other),
    }
    match expr("new int[] { 1, 2, 3 }") {
        Expr::NewArray(n) => {
            assert_eq!(n.initializer.as_ref().map(|i| i.values.len()), Some(3));
        }
        other => panic!("expected array allocation, got {:?}", other),
    }
    match expr("data[i]") {
        Expr::ArrayAccess(_) => {}
        other => panic!("expected array access, got {:?}", other),
    }
}

#[test]
fn casts() {
    match expr("(int) x") {
        Expr::Cast(c) => assert_eq!(c.target_type.name, "int"),
        other => panic!("expected cast, got {:?}", other),
    }
    match expr("(Number) value") {
        Expr::Cast(c) => assert_eq!(c.target_type.name, "Number"),
        other => panic!("expected cast, got {:?}", other),
    }
    match expr("(java.util.List<String>) xs") {
        Expr::Cast(c) => {
            assert_eq!(c.target_type.name, "java.util.List");
            assert_eq!(c.target_type.type_args.len(), 1);
        }
        other => panic!("expected cast, got {:?}", other),
    }
}

#[test]
fn instanceof_and_class_literal() {
    match expr("x instanceof String") {
        Expr::InstanceOf(i) => assert_eq!(i.target_type.name, "String"),
        other => panic!("expected instanceof, got {:?}", other),
    }
    match expr("String.class") {
        Expr::ClassLiteral(c) => assert_eq!(c.type_ref.name, "String"),
        other => panic!("expected class literal, got {:?}", other),
    }
}

#[test]
fn lambda_expressions() {
    match expr("x -> x + 1") {
        Expr::Lambda(l) => {
            assert_eq!(l.parameters.len(), 1);
            assert!(!l.parenthesized);
            assert!(matches!(l.body, LambdaBody::Expr(_)));
        }
        other => panic!("expected lambda, got {:?}", other),
    }
    match expr("(a, b) -> { return a; }") {
        Expr::Lambda(l) => {
            assert_eq!(l.parameters.len(), 2);
            assert!(l.parenthesized);
            assert!(matches!(l.body, LambdaBody::Block(_)));
        }
        other => panic!("expected lambda, got {:?}", other),
    }
    match expr("() -> 0") {
        Expr::Lambda(l) => assert!(l.parameters.is_empty()),
        other => panic!("expected lambda, got {:?}", other),
    }
    match expr("(int a) -> a") {
        Expr::Lambda(l) => {
            assert_eq!(l.parameters[0].type_ref.as_ref().map(|t| t.name.as_str()), Some("int"));
        }
        other => panic!("expected lambda, got {:?}", other),
    }
}

#[test]
fn parenthesized_expression_is_not_a_lambda() {
    match expr("(a + b) * c") {
        Expr::Binary(b) => assert_eq!(b.operator, BinaryOp::Mul),
        other => panic!("expected multiplication, got {:?}", other),
    }
}

#[test]
fn method_references() {
    match expr("String::valueOf") {
        Expr::MethodRef(r) => {
            assert_eq!(r.name.as_deref(), Some("valueOf"));
            assert!(matches!(r.target, MethodRefTarget::Type(_)));
        }
        other => panic!("expected method reference, got {:?}", other),
    }
    match expr("String::new") {
        Expr::MethodRef(r) => assert!(r.name.is_none()),
        other => panic!("expected constructor reference, got {:?}", other),
    }
}

#[test]
fn generic_allocation_with_diamond() {
    match expr("new java.util.ArrayList<>()") {
        Expr::New(n) => assert!(n.target_type.diamond),
        other => panic!("expected allocation, got {:?}", other),
    }
    match expr("new java.util.ArrayList<String>(16)") {
        Expr::New(n) => {
            assert!(!n.target_type.diamond);
            assert_eq!(n.target_type.type_args.len(), 1);
            assert_eq!(n.arguments.len(), 1);
        }
        other => panic!("expected allocation, got {:?}", other),
    }
}

#[test]
fn relational_less_than_is_not_a_type_argument() {
    match expr("a < b") {
        Expr::Binary(b) => assert_eq!(b.operator, BinaryOp::Lt),
        other => panic!("expected comparison, got {:?}", other),
    }
}

#[test]
fn nested_generics_split_the_shift_operator() {
    let list = stmts("java.util.Map<String, java.util.List<Integer>> m = null;");
    match &list[0] {
        Stmt::Declaration(d) => {
            assert_eq!(d.type_ref.type_args.len(), 2);
        }
        other => panic!("expected declaration, got {:?}", other),
    }
}

#[test]
fn control_flow_statements() {
    let list = stmts(
        r#"
int total = 0;
for (int i = 0; i < 10; i++) {
    if (i % 2 == 0) { total += i; } else { continue; }
}
while (total > 0) total--;
do { total++; } while (total < 5);
"#,
    );
    assert_eq!(list.len(), 4);
    assert!(matches!(list[1], Stmt::For(_)));
    assert!(matches!(list[2], Stmt::While(_)));
    assert!(matches!(list[3], Stmt::DoWhile(_)));
}

#[test]
fn enhanced_for_statement() {
    let list = stmts("for (String name : names) { use(name); }");
    match &list[0] {
        Stmt::ForEach(f) => {
            assert_eq!(f.variable.name, "name");
            assert_eq!(f.variable.type_ref.name, "String");
        }
        other => panic!("expected for-each, got {:?}", other),
    }
}

#[test]
fn switch_statement_groups() {
    let list = stmts(
        r#"
switch (k) {
    case 1:
    case 2: a(); break;
    default: b();
}
"#,
    );
    match &list[0] {
        Stmt::Switch(s) => {
            assert_eq!(s.cases.len(), 2);
            assert_eq!(s.cases[0].labels.len(), 2);
            assert!(s.cases[1].labels.is_empty());
        }
        other => panic!("expected switch, got {:?}", other),
    }
}

#[test]
fn try_catch_finally() {
    let list = stmts(
        r#"
try {
    risky();
} catch (java.io.IOException e) {
    handle(e);
} finally {
    cleanup();
}
"#,
    );
    match &list[0] {
        Stmt::Try(t) => {
            assert!(t.resources.is_empty());
            assert_eq!(t.catch_clauses.len(), 1);
            assert_eq!(t.catch_clauses[0].parameter.type_ref.name, "java.io.IOException");
            assert!(t.finally_block.is_some());
        }
        other => panic!("expected try, got {:?}", other),
    }
}

#[test]
fn try_with_resources_and_multi_catch() {
    let list = stmts(
        r#"
try (Reader r = open()) {
    read(r);
} catch (FooException | BarException e) {
    handle(e);
}
"#,
    );
    match &list[0] {
        Stmt::Try(t) => {
            assert_eq!(t.resources.len(), 1);
            let clause = &t.catch_clauses[0];
            assert_eq!(clause.parameter.type_ref.name, "FooException");
            assert_eq!(clause.alt_types.len(), 1);
            assert_eq!(clause.alt_types[0].name, "BarException");
        }
        other => panic!("expected try, got {:?}", other),
    }
}

#[test]
fn labeled_break_and_continue() {
    let list = stmts(
        r#"
outer:
for (int i = 0; i < 3; i++) {
    if (i == 1) continue outer;
    break outer;
}
"#,
    );
    match &list[0] {
        Stmt::Labeled(l) => assert_eq!(l.label, "outer"),
        other => panic!("expected labeled statement, got {:?}", other),
    }
}

#[test]
fn assert_synchronized_throw() {
    let list = stmts(
        r#"
assert x > 0 : "positive";
synchronized (lock) { go(); }
throw new IllegalStateException();
"#,
    );
    assert!(matches!(list[0], Stmt::Assert(_)));
    assert!(matches!(list[1], Stmt::Synchronized(_)));
    assert!(matches!(list[2], Stmt::Throw(_)));
}

#[test]
fn char_and_string_escapes() {
    match expr("'\\n'") {
        Expr::Literal(l) => assert_eq!(l.value, Literal::Char('\n')),
        other => panic!("expected char literal, got {:?}", other),
    }
    match expr("\"tab\\there\"") {
        Expr::Literal(l) => assert_eq!(l.value, Literal::String("tab\there".into())),
        other => panic!("expected string literal, got {:?}", other),
    }
}

#[test]
fn qualified_this_and_super_access() {
    match expr("Outer.this") {
        Expr::This(t) => assert_eq!(t.qualifier.as_deref(), Some("Outer")),
        other => panic!("expected qualified this, got {:?}", other),
    }
    let list = stmts("super.m(1); int x = super.f;");
    assert_eq!(list.len(), 2);
}
