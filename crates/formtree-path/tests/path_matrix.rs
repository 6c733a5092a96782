use formtree_path::{parse_path, Accessor, Path, PathError, PathLimits, PathParser};
use proptest::prelude::*;

fn acc(path: &str) -> Vec<Accessor> {
    parse_path(path)
        .unwrap_or_else(|e| panic!("parse failed for '{path}': {e}"))
        .accessors
}

fn k(key: &str) -> Accessor {
    Accessor::Key(key.to_string())
}

fn i(index: usize) -> Accessor {
    Accessor::Index(index)
}

#[test]
fn valid_path_matrix() {
    let cases: Vec<(&str, Vec<Accessor>)> = vec![
        ("a", vec![k("a")]),
        ("a.b.c", vec![k("a"), k("b"), k("c")]),
        (".a.b", vec![k("a"), k("b")]),
        ("a[0]", vec![k("a"), i(0)]),
        ("a[0][12]", vec![k("a"), i(0), i(12)]),
        ("a[007]", vec![k("a"), i(7)]),
        ("a[\"b\"]", vec![k("a"), k("b")]),
        ("a['b']", vec![k("a"), k("b")]),
        ("['a b'].c", vec![k("a b"), k("c")]),
        ("a.[1]", vec![k("a"), i(1)]),
        ("a b.c d", vec![k("a b"), k("c d")]),
        (
            "user2.child2.books[1].author[\"info\"]['names'][0]",
            vec![
                k("user2"),
                k("child2"),
                k("books"),
                i(1),
                k("author"),
                k("info"),
                k("names"),
                i(0),
            ],
        ),
        ("a['[0]']", vec![k("a"), k("[0]")]),
        ("a[10000]", vec![k("a"), i(10_000)]),
    ];

    for (input, expected) in cases {
        assert_eq!(acc(input), expected, "input: {input}");
    }
}

#[test]
fn invalid_path_matrix() {
    let cases = [
        "",
        ".",
        "a.",
        "a..b",
        "[0]",
        "[0].a",
        "a[",
        "a[]",
        "a[-1]",
        "a[1.5]",
        "a[10001]",
        "a['b",
        "a['']",
        "a[\"\"]",
        "a]",
        "a[0]b",
        "a[0]]",
        "a['b\\x']",
    ];

    for input in cases {
        assert!(parse_path(input).is_err(), "expected error for '{input}'");
    }
}

#[test]
fn error_positions_matrix() {
    assert_eq!(
        parse_path("ab[0]x"),
        Err(PathError::UnexpectedChar {
            ch: 'x',
            position: 5
        })
    );
    assert_eq!(
        parse_path("ab[x]"),
        Err(PathError::InvalidIndex {
            ch: 'x',
            position: 3
        })
    );
    assert_eq!(
        parse_path("ab.cd['"),
        Err(PathError::UnterminatedQuote { position: 6 })
    );
    assert_eq!(parse_path("ab."), Err(PathError::UnexpectedEnd { position: 3 }));
}

#[test]
fn long_simple_key_is_not_limited() {
    let key = "x".repeat(2_000);
    assert_eq!(acc(&key), vec![k(&key)]);

    let dotted = format!("{key}.y");
    assert!(matches!(
        parse_path(&dotted),
        Err(PathError::TooLong { max: 512, .. })
    ));
}

#[test]
fn custom_limits_matrix() {
    let limits = PathLimits {
        max_path_length: 2_048,
        max_array_index: 20_000,
    };
    assert!(PathParser::parse_with_limits("a[15000]", limits).is_ok());
    assert!(parse_path("a[15000]").is_err());
}

#[test]
fn unicode_keys() {
    assert_eq!(acc("café.naïve['日本']"), vec![k("café"), k("naïve"), k("日本")]);
}

fn key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z_][a-zA-Z0-9_ ]{0,8}",
        "[a-z.\\[\\]'\" \\\\]{1,8}",
    ]
}

fn path_strategy() -> impl Strategy<Value = Path> {
    (
        key_strategy(),
        prop::collection::vec(
            prop_oneof![
                key_strategy().prop_map(Accessor::Key),
                (0usize..=10_000).prop_map(Accessor::Index),
            ],
            0..6,
        ),
    )
        .prop_map(|(first, rest)| {
            let mut accessors = vec![Accessor::Key(first)];
            accessors.extend(rest);
            Path::new(accessors)
        })
}

proptest! {
    #[test]
    fn display_then_parse_is_identity(path in path_strategy()) {
        let text = path.to_string();
        prop_assume!(text.len() <= 512);
        let reparsed = parse_path(&text);
        prop_assert_eq!(reparsed, Ok(path), "text: {}", text);
    }

    #[test]
    fn plain_keys_parse_to_single_accessor(key in "[a-zA-Z0-9 _-]{1,64}") {
        prop_assert_eq!(acc(&key), vec![Accessor::Key(key.clone())]);
    }
}
