use imp_compiler::lexer::{tokenize, Token, TokenKind};

fn lex(s: &str) -> Vec<Token> {
    tokenize(s, "test.imp").expect("tokenize failed")
}

#[test]
fn keywords_and_punctuation() {
    let kinds: Vec<TokenKind> = lex("var x = 1;").into_iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Var,
            TokenKind::Name,
            TokenKind::Assign,
            TokenKind::Integer,
            TokenKind::Semi,
        ]
    );
}

#[test]
fn two_char_operators_win_over_prefixes() {
    let kinds: Vec<TokenKind> = lex("a <= b == c >= d != e < f")
        .into_iter()
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Name,
            TokenKind::Lte,
            TokenKind::Name,
            TokenKind::Eq,
            TokenKind::Name,
            TokenKind::Gte,
            TokenKind::Name,
            TokenKind::NotEq,
            TokenKind::Name,
            TokenKind::Lt,
            TokenKind::Name,
        ]
    );
}

#[test]
fn positions_are_one_based() {
    let tokens = lex("var x = 1;\nprint x;");
    assert_eq!(tokens[0].line, 1);
    assert_eq!(tokens[0].column, 1);
    // `x` sits after "var "
    assert_eq!(tokens[1].column, 5);
    // `print` opens the second line
    let print = tokens.iter().find(|t| t.kind == TokenKind::Print).unwrap();
    assert_eq!(print.line, 2);
    assert_eq!(print.column, 1);
}

#[test]
fn comments_run_to_end_of_line() {
    let kinds: Vec<TokenKind> = lex("print 1; // trailing words = ignored\nprint 2;")
        .into_iter()
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Print,
            TokenKind::Integer,
            TokenKind::Semi,
            TokenKind::Print,
            TokenKind::Integer,
            TokenKind::Semi,
        ]
    );
}

#[test]
fn float_literal_lexes_as_parts() {
    let kinds: Vec<TokenKind> = lex("3.14").into_iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TokenKind::Integer, TokenKind::Dot, TokenKind::Integer]);
}

#[test]
fn type_keywords_are_distinct_from_names() {
    let kinds: Vec<TokenKind> = lex("int float char bool ints")
        .into_iter()
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::IntType,
            TokenKind::FloatType,
            TokenKind::CharType,
            TokenKind::BoolType,
            TokenKind::Name,
        ]
    );
}

#[test]
fn tokenizing_twice_is_deterministic() {
    let source = "func f(n int) int {\n  return n * 2; // double\n}\nprint f(21);";
    assert_eq!(lex(source), lex(source));
}

#[test]
fn unexpected_character_is_an_error() {
    let err = tokenize("var x @ 1;", "test.imp").unwrap_err();
    assert!(err.message.contains("Unexpected character"));
    assert_eq!(err.line, 1);
    assert_eq!(err.start, 7);
}
