use jparse::ast::{ClassMember, Stmt, TypeDecl};
use jparse::Parser;

const SOURCE: &str = r#"
class Service {
    int requests;

    Service(int n) {
        requests = n;
    }

    void handle(String path) {
        if (path == null) {
            return;
        }
        requests++;
    }

    int requests() { return requests; }

    static {
        register();
    }
}
"#;

fn diet_members() -> Vec<ClassMember> {
    let parsed = Parser::new().diet(true).parse_compilation_unit(SOURCE).unwrap();
    assert!(!parsed.has_syntax_error(), "{:?}", parsed.problems);
    match parsed.value.types.into_iter().next() {
        Some(TypeDecl::Class(c)) => c.body,
        other => panic!("expected class, got {:?}", other),
    }
}

#[test]
fn diet_parse_skips_method_bodies() {
    let members = diet_members();
    for member in &members {
        match member {
            ClassMember::Method(m) => {
                assert!(m.body.is_none(), "{} should have no body", m.name);
                assert!(m.body_range.is_some(), "{} should record a range", m.name);
            }
            ClassMember::Constructor(c) => {
                assert!(c.body.is_none());
                assert!(c.body_range.is_some());
            }
            ClassMember::Initializer(i) if i.is_static => {
                assert!(i.body.is_none());
                assert!(i.body_range.is_some());
            }
            _ => {}
        }
    }
}

#[test]
fn diet_parse_keeps_signatures_intact() {
    let members = diet_members();
    let handle = members
        .iter()
        .find_map(|m| match m {
            ClassMember::Method(m) if m.name == "handle" => Some(m),
            _ => None,
        })
        .expect("handle method");
    assert_eq!(handle.parameters.len(), 1);
    assert_eq!(handle.parameters[0].type_ref.name, "String");
    assert!(handle.return_type.is_none());
}

#[test]
fn body_range_reparses_to_the_same_statements() {
    let members = diet_members();
    let handle = members
        .iter()
        .find_map(|m| match m {
            ClassMember::Method(m) if m.name == "handle" => Some(m),
            _ => None,
        })
        .expect("handle method");
    let range = handle.body_range.expect("range");
    let reparsed = Parser::new().reparse_body(SOURCE, range).unwrap();
    assert!(!reparsed.has_syntax_error(), "{:?}", reparsed.problems);
    assert_eq!(reparsed.value.len(), 2);
    assert!(matches!(reparsed.value[0], Stmt::If(_)));
}

#[test]
fn body_range_covers_only_the_body_text() {
    let members = diet_members();
    for member in &members {
        if let ClassMember::Method(m) = member {
            let range = m.body_range.expect("range");
            let text = &SOURCE[range.start as usize..range.end as usize];
            assert!(!text.contains("class"));
            assert_eq!(text.matches('{').count(), text.matches('}').count());
        }
    }
}

#[test]
fn full_parse_of_the_same_source_keeps_bodies() {
    let parsed = Parser::new().parse_compilation_unit(SOURCE).unwrap();
    assert!(!parsed.has_syntax_error());
    match &parsed.value.types[0] {
        TypeDecl::Class(c) => {
            for member in &c.body {
                if let ClassMember::Method(m) = member {
                    assert!(m.body.is_some());
                    assert!(m.body_range.is_none());
                }
            }
        }
        other => panic!("expected class, got {:?}", other),
    }
}

#[test]
fn diet_class_body_declarations_goal() {
    let parsed = Parser::new()
        .diet(true)
        .parse_class_body_declarations("void m() { work(); } int f;")
        .unwrap();
    assert!(!parsed.has_syntax_error(), "{:?}", parsed.problems);
    assert_eq!(parsed.value.len(), 2);
    match &parsed.value[0] {
        ClassMember::Method(m) => assert!(m.body_range.is_some()),
        other => panic!("expected method, got {:?}", other),
    }
}
