use jparse::ast::{
    ClassMember, Expr, Literal, Modifier, Stmt, TypeArg, TypeDecl,
};
use jparse::{parse, Parser};

fn unit(src: &str) -> jparse::ast::CompilationUnit {
    let parsed = parse(src).expect("parse failed");
    assert!(
        !parsed.has_syntax_error(),
        "unexpected syntax errors: {:?}",
        parsed.problems
    );
    parsed.value
}

fn first_class(src: &str) -> jparse::ast::ClassDecl {
    let unit = unit(src);
    match unit.types.into_iter().next() {
        Some(TypeDecl::Class(c)) => c,
        other => panic!("expected a class, got {:?}", other),
    }
}

#[test]
fn package_and_imports() {
    let unit = unit(
        r#"
package com.example.app;

import java.util.List;
import java.util.*;
import static java.util.Collections.emptyList;

class A { }
"#,
    );
    assert_eq!(unit.package.as_ref().map(|p| p.name.as_str()), Some("com.example.app"));
    assert_eq!(unit.imports.len(), 3);
    assert_eq!(unit.imports[0].name, "java.util.List");
    assert!(!unit.imports[0].is_wildcard);
    assert!(unit.imports[1].is_wildcard);
    assert!(unit.imports[2].is_static);
    assert_eq!(unit.imports[2].name, "java.util.Collections.emptyList");
}

#[test]
fn class_with_field_method_and_constructor() {
    let class = first_class(
        r#"
class Point {
    private int x;
    private int y;

    Point(int x, int y) {
        this.x = x;
        this.y = y;
    }

    public int getX() { return x; }
}
"#,
    );
    assert_eq!(class.name, "Point");
    assert_eq!(class.body.len(), 4);
    match &class.body[0] {
        ClassMember::Field(f) => {
            assert_eq!(f.modifiers, vec![Modifier::Private]);
            assert_eq!(f.type_ref.name, "int");
            assert_eq!(f.variables[0].name, "x");
        }
        other => panic!("expected field, got {:?}", other),
    }
    match &class.body[2] {
        ClassMember::Constructor(c) => {
            assert_eq!(c.name, "Point");
            assert_eq!(c.parameters.len(), 2);
            assert!(c.explicit_invocation.is_none());
            assert_eq!(c.body.as_ref().map(|b| b.statements.len()), Some(2));
        }
        other => panic!("expected constructor, got {:?}", other),
    }
    match &class.body[3] {
        ClassMember::Method(m) => {
            assert_eq!(m.name, "getX");
            assert_eq!(m.modifiers, vec![Modifier::Public]);
            assert_eq!(m.return_type.as_ref().map(|t| t.name.as_str()), Some("int"));
        }
        other => panic!("expected method, got {:?}", other),
    }
}

#[test]
fn constructor_explicit_invocation_is_lifted() {
    let class = first_class(
        r#"
class A extends B {
    A(int v) {
        super(v);
        init();
    }
}
"#,
    );
    match &class.body[0] {
        ClassMember::Constructor(c) => {
            let inv = c.explicit_invocation.as_ref().expect("explicit invocation");
            assert_eq!(inv.arguments.len(), 1);
            // Only the remaining statements stay in the body.
            assert_eq!(c.body.as_ref().map(|b| b.statements.len()), Some(1));
        }
        other => panic!("expected constructor, got {:?}", other),
    }
}

#[test]
fn interface_with_default_and_abstract_methods() {
    let unit = unit(
        r#"
interface Shape extends Named, Comparable {
    double area();
    default String describe() { return "shape"; }
}
"#,
    );
    match &unit.types[0] {
        TypeDecl::Interface(i) => {
            assert_eq!(i.name, "Shape");
            assert_eq!(i.extends.len(), 2);
            match (&i.body[0], &i.body[1]) {
                (ClassMember::Method(a), ClassMember::Method(d)) => {
                    assert!(a.body.is_none());
                    assert!(d.modifiers.contains(&Modifier::Default));
                    assert!(d.body.is_some());
                }
                other => panic!("expected two methods, got {:?}", other),
            }
        }
        other => panic!("expected interface, got {:?}", other),
    }
}

#[test]
fn enum_with_arguments_and_trailing_members() {
    let unit = unit(
        r#"
enum Planet {
    MERCURY(3), VENUS(4);

    Planet(int order) { }
    int order;
}
"#,
    );
    match &unit.types[0] {
        TypeDecl::Enum(e) => {
            assert_eq!(e.name, "Planet");
            assert_eq!(e.constants.len(), 2);
            assert_eq!(e.constants[0].name, "MERCURY");
            assert_eq!(e.constants[0].arguments.len(), 1);
            assert!(e.constants[0].body.is_none());
            assert_eq!(e.body.len(), 2);
        }
        other => panic!("expected enum, got {:?}", other),
    }
}

#[test]
fn annotation_type_with_default() {
    let unit = unit(
        r#"
@interface Timeout {
    int millis() default 1000;
}
"#,
    );
    match &unit.types[0] {
        TypeDecl::Annotation(a) => {
            assert_eq!(a.name, "Timeout");
            assert_eq!(a.body.len(), 1);
            match &a.body[0] {
                jparse::ast::AnnotationMember::Element { name, default_value, .. } => {
                    assert_eq!(name, "millis");
                    assert!(default_value.is_some());
                }
                other => panic!("expected element, got {:?}", other),
            }
        }
        other => panic!("expected annotation type, got {:?}", other),
    }
}

#[test]
fn annotations_on_declarations() {
    let class = first_class(
        r#"
@Deprecated
@SuppressWarnings("unchecked")
class Old {
    @Override
    public String toString() { return ""; }
}
"#,
    );
    assert_eq!(class.annotations.len(), 2);
    assert!(class.annotations[0].is_marker);
    assert_eq!(class.annotations[1].name, "SuppressWarnings");
    assert_eq!(class.annotations[1].arguments.len(), 1);
    match &class.body[0] {
        ClassMember::Method(m) => assert_eq!(m.annotations[0].name, "Override"),
        other => panic!("expected method, got {:?}", other),
    }
}

#[test]
fn generic_class_and_bounded_type_parameter() {
    let class = first_class(
        r#"
class Box<T extends Comparable> {
    java.util.List<T> items;
    <U> U pick(U value) { return value; }
}
"#,
    );
    assert_eq!(class.type_params.len(), 1);
    assert_eq!(class.type_params[0].name, "T");
    assert_eq!(class.type_params[0].bounds.len(), 1);
    match &class.body[0] {
        ClassMember::Field(f) => {
            assert_eq!(f.type_ref.name, "java.util.List");
            assert_eq!(f.type_ref.type_args.len(), 1);
        }
        other => panic!("expected field, got {:?}", other),
    }
    match &class.body[1] {
        ClassMember::Method(m) => assert_eq!(m.type_params[0].name, "U"),
        other => panic!("expected method, got {:?}", other),
    }
}

#[test]
fn wildcard_type_arguments() {
    let class = first_class(
        "class A { java.util.List<? extends Number> up; java.util.List<? super Integer> down; java.util.List<?> any; }",
    );
    let arg = |i: usize| match &class.body[i] {
        ClassMember::Field(f) => f.type_ref.type_args[0].clone(),
        other => panic!("expected field, got {:?}", other),
    };
    assert!(matches!(arg(0), TypeArg::Wildcard(w) if w.bound.is_some()));
    assert!(matches!(arg(1), TypeArg::Wildcard(w) if w.bound.is_some()));
    assert!(matches!(arg(2), TypeArg::Wildcard(w) if w.bound.is_none()));
}

#[test]
fn arrays_and_extra_dimensions() {
    let class = first_class("class A { int[] a; int b[][]; int[] c()[] { return null; } }");
    match (&class.body[0], &class.body[1]) {
        (ClassMember::Field(a), ClassMember::Field(b)) => {
            assert_eq!(a.type_ref.array_dims, 1);
            // Trailing dims live on the declarator.
            assert_eq!(b.type_ref.array_dims, 0);
            assert_eq!(b.variables[0].array_dims, 2);
        }
        other => panic!("expected fields, got {:?}", other),
    }
    match &class.body[2] {
        ClassMember::Method(m) => {
            assert_eq!(m.return_type.as_ref().map(|t| t.array_dims), Some(1));
            assert_eq!(m.extra_dims, 1);
        }
        other => panic!("expected method, got {:?}", other),
    }
}

#[test]
fn varargs_parameter() {
    let class = first_class("class A { void log(String fmt, Object... args) { } }");
    match &class.body[0] {
        ClassMember::Method(m) => {
            assert!(!m.parameters[0].varargs);
            assert!(m.parameters[1].varargs);
        }
        other => panic!("expected method, got {:?}", other),
    }
}

#[test]
fn initializer_blocks() {
    let class = first_class("class A { static { setup(); } { count = 0; } }");
    match (&class.body[0], &class.body[1]) {
        (ClassMember::Initializer(s), ClassMember::Initializer(i)) => {
            assert!(s.is_static);
            assert!(!i.is_static);
            assert!(s.body.is_some());
        }
        other => panic!("expected initializers, got {:?}", other),
    }
}

#[test]
fn nested_and_local_types() {
    let class = first_class(
        r#"
class Outer {
    static class Nested { }
    void m() {
        class Local { }
        new Local();
    }
}
"#,
    );
    assert!(matches!(class.body[0], ClassMember::TypeDecl(TypeDecl::Class(_))));
    match &class.body[1] {
        ClassMember::Method(m) => {
            let body = m.body.as_ref().expect("body");
            assert!(matches!(body.statements[0], Stmt::TypeDecl(TypeDecl::Class(_))));
        }
        other => panic!("expected method, got {:?}", other),
    }
}

#[test]
fn field_initializer_literal_value() {
    let class = first_class("class A { int answer = 42; String s = \"x\"; }");
    match &class.body[0] {
        ClassMember::Field(f) => match f.variables[0].initializer.as_ref() {
            Some(Expr::Literal(l)) => assert_eq!(l.value, Literal::Int(42)),
            other => panic!("expected literal initializer, got {:?}", other),
        },
        other => panic!("expected field, got {:?}", other),
    }
}

#[test]
fn throws_clause() {
    let class = first_class("class A { void m() throws java.io.IOException, RuntimeException { } }");
    match &class.body[0] {
        ClassMember::Method(m) => {
            assert_eq!(m.throws.len(), 2);
            assert_eq!(m.throws[0].name, "java.io.IOException");
        }
        other => panic!("expected method, got {:?}", other),
    }
}

#[test]
fn anonymous_class_body() {
    let parsed = Parser::new()
        .parse_expression("new Runnable() { public void run() { } }")
        .unwrap();
    assert!(!parsed.has_syntax_error(), "{:?}", parsed.problems);
    match parsed.value {
        Expr::New(n) => {
            assert_eq!(n.target_type.name, "Runnable");
            assert_eq!(n.anonymous_body.as_ref().map(Vec::len), Some(1));
        }
        other => panic!("expected allocation, got {:?}", other),
    }
}
