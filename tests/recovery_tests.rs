use jparse::ast::{ClassMember, Stmt, TypeDecl};
use jparse::parse;
use jparse::parser::ProblemKind;

#[test]
fn error_after_committed_member_keeps_the_member() {
    let parsed = parse("class A { void m() { } int f = ; }").unwrap();
    assert!(parsed.recovered);
    assert!(parsed.has_syntax_error(), "{:?}", parsed.problems);
    match &parsed.value.types[0] {
        TypeDecl::Class(c) => {
            // The finished method survives; the damaged field does not.
            assert!(c
                .body
                .iter()
                .any(|m| matches!(m, ClassMember::Method(m) if m.name == "m")));
        }
        other => panic!("expected a class, got {:?}", other),
    }
}

#[test]
fn damaged_first_type_does_not_take_down_the_second() {
    let parsed = parse("class A { int = 5; } class B { int ok; }").unwrap();
    assert!(parsed.recovered);
    assert!(parsed.has_syntax_error());
    assert!(!parsed.skipped.is_empty());
    let names: Vec<&str> = parsed
        .value
        .types
        .iter()
        .map(|t| match t {
            TypeDecl::Class(c) => c.name.as_str(),
            _ => "",
        })
        .collect();
    assert!(names.contains(&"B"), "salvaged types: {:?}", names);
}

#[test]
fn statement_error_resynchronizes_inside_a_body() {
    let parsed = parse(
        r#"
class A {
    void m() {
        int a = 1;
        int b = = 2;
        int c = 3;
    }
}
"#,
    )
    .unwrap();
    assert!(parsed.recovered);
    assert!(parsed.has_syntax_error());
    match &parsed.value.types[0] {
        TypeDecl::Class(c) => match &c.body[0] {
            ClassMember::Method(m) => {
                let body = m.body.as_ref().expect("body");
                // The statements before the damage survive.
                assert!(!body.statements.is_empty());
            }
            other => panic!("expected method, got {:?}", other),
        },
        other => panic!("expected class, got {:?}", other),
    }
}

#[test]
fn missing_semicolon_keeps_the_return_statement() {
    let parsed = parse("class A { void m() { return } }").unwrap();
    assert!(parsed.recovered);
    assert!(parsed.has_syntax_error(), "{:?}", parsed.problems);
    match &parsed.value.types[0] {
        TypeDecl::Class(c) => {
            assert_eq!(c.name, "A");
            match &c.body[0] {
                ClassMember::Method(m) => {
                    assert_eq!(m.name, "m");
                    let body = m.body.as_ref().expect("body");
                    // The return survives with an empty value slot.
                    assert!(
                        matches!(&body.statements[0], Stmt::Return(r) if r.value.is_none()),
                        "{:?}",
                        body.statements
                    );
                }
                other => panic!("expected method, got {:?}", other),
            }
        }
        other => panic!("expected class, got {:?}", other),
    }
}

#[test]
fn class_without_a_name_still_yields_a_declaration() {
    let parsed = parse("class {").unwrap();
    assert!(parsed.recovered);
    assert!(parsed.has_syntax_error());
    assert_eq!(parsed.value.types.len(), 1, "{:?}", parsed.value.types);
    match &parsed.value.types[0] {
        TypeDecl::Class(c) => assert!(c.name.is_empty(), "name: {:?}", c.name),
        other => panic!("expected class, got {:?}", other),
    }
}

#[test]
fn unterminated_class_keeps_the_declaration() {
    let parsed = parse("class A {").unwrap();
    assert!(parsed.recovered);
    assert!(parsed.has_syntax_error());
    assert!(parsed
        .problems
        .iter()
        .any(|p| matches!(p.kind, ProblemKind::UnexpectedEof { .. })));
    // The missing close brace is filled in, not fatal.
    match &parsed.value.types[0] {
        TypeDecl::Class(c) => assert_eq!(c.name, "A"),
        other => panic!("expected class, got {:?}", other),
    }
}

#[test]
fn parse_error_reports_expected_terminals() {
    let parsed = parse("class A { void m( { } }").unwrap();
    assert!(parsed.has_syntax_error());
    let has_expected_set = parsed.problems.iter().any(|p| match &p.kind {
        ProblemKind::ParseError { expected, .. } => !expected.is_empty(),
        _ => false,
    });
    assert!(has_expected_set, "{:?}", parsed.problems);
}

#[test]
fn lexical_problems_are_reported() {
    let parsed = parse("class A { String s = \"unterminated; }").unwrap();
    assert!(parsed
        .problems
        .iter()
        .any(|p| matches!(p.kind, ProblemKind::UnterminatedString | ProblemKind::InvalidToken { .. })),
        "{:?}", parsed.problems);
}

#[test]
fn clean_parse_reports_nothing() {
    let parsed = parse("class A { int f; }").unwrap();
    assert!(!parsed.recovered);
    assert!(parsed.problems.is_empty());
    assert!(parsed.skipped.is_empty());
}

#[test]
fn skipped_regions_carry_spans() {
    let source = "class A { int = 5; } class B { }";
    let parsed = parse(source).unwrap();
    for element in &parsed.skipped {
        assert!(!element.span.is_empty());
        assert!((element.span.end as usize) <= source.len());
    }
}
