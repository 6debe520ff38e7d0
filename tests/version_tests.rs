use jparse::parser::ProblemKind;
use jparse::{Parser, SourceLevel};

fn problems_at(level: SourceLevel, src: &str) -> Vec<ProblemKind> {
    let parsed = Parser::with_level(level)
        .parse_compilation_unit(src)
        .unwrap();
    assert!(
        !parsed.has_syntax_error(),
        "gated constructs must still parse: {:?}",
        parsed.problems
    );
    parsed.problems.into_iter().map(|p| p.kind).collect()
}

#[test]
fn diamond_below_java7() {
    let src = "class A { java.util.List<String> l = new java.util.ArrayList<>(); }";
    let kinds = problems_at(SourceLevel::JAVA_5, src);
    assert!(
        kinds.iter().any(|k| matches!(k, ProblemKind::DiamondBelowSource { required: 7 })),
        "{:?}",
        kinds
    );
    assert!(problems_at(SourceLevel::JAVA_7, src).is_empty());
}

#[test]
fn lambda_below_java8() {
    let src = "class A { Runnable r = () -> { }; }";
    let kinds = problems_at(SourceLevel::JAVA_7, src);
    assert!(
        kinds.iter().any(|k| matches!(k, ProblemKind::LambdaBelowSource { required: 8 })),
        "{:?}",
        kinds
    );
    assert!(problems_at(SourceLevel::JAVA_8, src).is_empty());
}

#[test]
fn method_reference_below_java8() {
    let src = "class A { Object f = String::valueOf; }";
    let kinds = problems_at(SourceLevel::JAVA_7, src);
    assert!(
        kinds
            .iter()
            .any(|k| matches!(k, ProblemKind::MethodReferenceBelowSource { required: 8 })),
        "{:?}",
        kinds
    );
}

#[test]
fn multi_catch_below_java7() {
    let src = "class A { void m() { try { go(); } catch (E1 | E2 e) { } } }";
    let kinds = problems_at(SourceLevel::JAVA_5, src);
    assert!(
        kinds.iter().any(|k| matches!(k, ProblemKind::MultiCatchBelowSource { required: 7 })),
        "{:?}",
        kinds
    );
}

#[test]
fn try_with_resources_below_java7() {
    let src = "class A { void m() { try (R r = open()) { use(r); } catch (E e) { } } }";
    let kinds = problems_at(SourceLevel::JAVA_5, src);
    assert!(
        kinds
            .iter()
            .any(|k| matches!(k, ProblemKind::TryWithResourcesBelowSource { required: 7 })),
        "{:?}",
        kinds
    );
}

#[test]
fn binary_and_underscore_literals_below_java7() {
    let src = "class A { int a = 0b1010; int b = 1_000_000; }";
    let kinds = problems_at(SourceLevel::JAVA_5, src);
    assert!(
        kinds.iter().any(|k| matches!(k, ProblemKind::BinaryLiteralBelowSource { required: 7 })),
        "{:?}",
        kinds
    );
    assert!(
        kinds
            .iter()
            .any(|k| matches!(k, ProblemKind::UnderscoresInLiteralBelowSource { required: 7 })),
        "{:?}",
        kinds
    );
    assert!(problems_at(SourceLevel::JAVA_7, src).is_empty());
}

#[test]
fn default_method_below_java8() {
    let src = "interface I { default int f() { return 0; } }";
    let kinds = problems_at(SourceLevel::JAVA_7, src);
    assert!(
        kinds
            .iter()
            .any(|k| matches!(k, ProblemKind::DefaultMethodBelowSource { required: 8 })),
        "{:?}",
        kinds
    );
}

#[test]
fn generics_below_java5_are_flagged_but_kept() {
    let src = "class A { java.util.List<String> l; }";
    let parsed = Parser::with_level(SourceLevel::JAVA_1_4)
        .parse_compilation_unit(src)
        .unwrap();
    assert!(!parsed.has_syntax_error());
    assert!(
        parsed.problems.iter().any(|p| p.kind.is_version_gated()),
        "{:?}",
        parsed.problems
    );
    // The construct itself still landed in the tree.
    match &parsed.value.types[0] {
        jparse::ast::TypeDecl::Class(c) => assert_eq!(c.body.len(), 1),
        other => panic!("expected class, got {:?}", other),
    }
}

#[test]
fn gated_problems_are_not_syntax_errors() {
    let parsed = Parser::with_level(SourceLevel::JAVA_5)
        .parse_compilation_unit("class A { Object f = new java.util.ArrayList<>(); }")
        .unwrap();
    assert!(!parsed.problems.is_empty());
    assert!(!parsed.has_syntax_error());
}
