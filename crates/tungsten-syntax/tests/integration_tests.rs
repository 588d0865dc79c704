use tungsten_source::{CompilerConfig, Diagnostic, FileId, LexerConfig, ParserConfig};
use tungsten_syntax::ast::{ItemKind, Program, StmtKind};
use tungsten_syntax::visitor::count_error_nodes;
use tungsten_syntax::{parse, parse_source, tokenize, TokenKind};

const SAMPLE: &str = include_str!("sample.tg");

fn parse_str(source: &str) -> (Program, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let program = parse_source(source, FileId::default(), &CompilerConfig::default(), &mut diagnostics);
    (program, diagnostics)
}

#[test]
fn test_sample_program_parses_cleanly() {
    let (program, diagnostics) = parse_str(SAMPLE);
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
    assert_eq!(count_error_nodes(&program), 0);

    let kinds: Vec<_> = program
        .items
        .iter()
        .map(|item| match &item.kind {
            ItemKind::Function(f) => format!("fn {}", f.name.name),
            ItemKind::Struct(s) => format!("struct {}", s.name.name),
            ItemKind::Import(_) => "import".to_string(),
            ItemKind::Stmt(_) => "stmt".to_string(),
            ItemKind::Error(_) => "error".to_string(),
        })
        .collect();
    assert_eq!(kinds, vec!["import", "struct Point", "fn distance", "fn main"]);

    let ItemKind::Function(main) = &program.items[3].kind else {
        panic!("expected main");
    };
    assert_eq!(main.body.stmts.len(), 6);
    assert!(matches!(main.body.stmts[3].kind, StmtKind::For { .. }));
}

#[test]
fn test_sample_round_trips_through_lexer() {
    let mut diagnostics = Vec::new();
    let tokens = tokenize(SAMPLE, FileId::default(), &LexerConfig::default(), &mut diagnostics);
    assert_eq!(tokens.reconstruct(), SAMPLE);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_token_stream_is_reusable() {
    let mut diagnostics = Vec::new();
    let tokens = tokenize(SAMPLE, FileId::default(), &LexerConfig::default(), &mut diagnostics);
    let first = parse(&tokens, &ParserConfig::default(), &mut diagnostics);
    let second = parse(&tokens, &ParserConfig::default(), &mut diagnostics);
    assert_eq!(first, second);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_every_input_yields_one_program() {
    let inputs = [
        "",
        "}}}}",
        "{{{{",
        "fn",
        "fn f(",
        "struct S { x: }",
        "import ;",
        "let let let",
        "if { } else",
        "for in { }",
        "((((",
        "))))",
        "\"unterminated",
        "/* unterminated",
        "@#$%^",
        "1 + + + ;",
        "else else else",
        "while true { break continue }",
    ];
    for input in inputs {
        let (program, _) = parse_str(input);
        // The walk terminates and every item is positioned inside the input.
        for item in &program.items {
            assert!(item.position.offset as usize <= input.len(), "input {input:?}");
        }
    }
}

#[test]
fn test_errors_are_ordered_by_position() {
    let source = "let a = ;\nfn f() {\n    let b = );\n}\nlet c = 1 +;\n";
    let (program, diagnostics) = parse_str(source);
    let lines: Vec<_> = diagnostics.iter().map(|d| d.position.unwrap().line).collect();
    assert_eq!(lines, vec![1, 3, 5]);
    assert_eq!(count_error_nodes(&program), 3);
}

#[test]
fn test_diagnostics_carry_file_id() {
    let file = FileId::from_raw(3);
    let mut diagnostics = Vec::new();
    let tokens = tokenize("let x = $;", file, &LexerConfig::default(), &mut diagnostics);
    let program = parse(&tokens, &ParserConfig::default(), &mut diagnostics);
    assert_eq!(program.position.file, file);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].position.unwrap().file, file);
    assert!(tokens.iter().any(|t| t.kind == TokenKind::Invalid('$')));
}
