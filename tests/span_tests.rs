use jparse::ast::{AstNode, ClassMember, Expr, Stmt, TypeDecl};
use jparse::parser::{LineIndex, Span};
use jparse::{parse, Parser};

fn text(source: &str, span: Span) -> &str {
    &source[span.start as usize..span.end as usize]
}

#[test]
fn type_declaration_spans_cover_their_text() {
    let source = "package p;\n\nclass A { int f; }\n\ninterface B { }\n";
    let parsed = parse(source).unwrap();
    assert!(parsed.problems.is_empty());
    match &parsed.value.types[0] {
        TypeDecl::Class(c) => assert_eq!(text(source, c.span), "class A { int f; }"),
        other => panic!("expected class, got {:?}", other),
    }
    match &parsed.value.types[1] {
        TypeDecl::Interface(i) => assert_eq!(text(source, i.span), "interface B { }"),
        other => panic!("expected interface, got {:?}", other),
    }
}

#[test]
fn member_spans_include_modifiers() {
    let source = "class A { public static int f = 1; }";
    let parsed = parse(source).unwrap();
    match &parsed.value.types[0] {
        TypeDecl::Class(c) => match &c.body[0] {
            ClassMember::Field(f) => {
                assert_eq!(text(source, f.span), "public static int f = 1;");
            }
            other => panic!("expected field, got {:?}", other),
        },
        other => panic!("expected class, got {:?}", other),
    }
}

#[test]
fn expression_spans_nest() {
    let source = "f(a + b, c)";
    let parsed = Parser::new().parse_expression(source).unwrap();
    match parsed.value {
        Expr::MethodCall(call) => {
            assert_eq!(text(source, call.span), source);
            assert_eq!(text(source, call.arguments[0].span()), "a + b");
            assert_eq!(text(source, call.arguments[1].span()), "c");
        }
        other => panic!("expected call, got {:?}", other),
    }
}

#[test]
fn statement_spans_cover_terminators() {
    let source = "return x;";
    let parsed = Parser::new().parse_block_statements(source).unwrap();
    match &parsed.value[0] {
        Stmt::Return(r) => assert_eq!(text(source, r.span), "return x;"),
        other => panic!("expected return, got {:?}", other),
    }
}

#[test]
fn problem_spans_point_at_the_offending_token() {
    let source = "class A { int f = ; }";
    let parsed = parse(source).unwrap();
    let problem = parsed
        .problems
        .iter()
        .find(|p| p.is_syntax_error())
        .expect("syntax error");
    assert_eq!(text(source, problem.span), ";");
}

#[test]
fn comment_ranges_slice_back_to_comments() {
    let source = "// one\nclass A { /* two */ int f; }\n";
    let parsed = parse(source).unwrap();
    let comments: Vec<&str> =
        parsed.value.comments.iter().map(|s| text(source, *s)).collect();
    assert_eq!(comments, vec!["// one", "/* two */"]);
}

#[test]
fn line_index_maps_offsets() {
    let source = "class A {\n  int f;\n}\n";
    let index = LineIndex::new(source);
    let f_offset = source.find("int").unwrap() as u32;
    let lc = index.line_col(f_offset);
    assert_eq!(lc.line, 2);
    assert_eq!(lc.column, 3);
}

#[test]
fn unit_span_covers_the_buffer_contents() {
    let source = "class A { }\n";
    let parsed = parse(source).unwrap();
    let span = parsed.value.span();
    assert!((span.end as usize) <= source.len());
    assert!(text(source, span).contains("class A"));
}
