#[cfg(test)]
mod test_selector_tokenizer {
    use super::super::{tokenize_selector, TokenKind, TokenKind::*};

    fn ast(input: &str, expected_token_kinds: Vec<TokenKind>) {
        let tokens = tokenize_selector(input, 0);
        println!(
            "tokens: {}",
            tokens
                .iter()
                .map(|t| format!("{:?}", t.kind))
                .collect::<Vec<std::string::String>>()
                .join(" > ")
        );
        let mut tokens = tokens.into_iter();
        for expected in expected_token_kinds {
            let received = tokens.next();
            assert!(received.is_some(), "less tokens than expected on input `{input}`, expecting token `{expected:?}`");
            let received = received.unwrap().kind;
            assert_eq!(expected, received, "expected token `{expected:?}` but encountered `{received:?}`");
        }
        assert!(tokens.next().is_none());
    }

    #[test]
    fn whitespace() {
        ast(" ", vec![Space]);
        ast(" \t\n ", vec![Space]);
        ast(" a", vec![Space, Text]);
        ast(" /* comment*/ \n/*comment*/a", vec![Space, MultiComment, Space, MultiComment, Text]);
        ast("a /**/ b", vec![Text, Space, MultiComment, Space, Text]);
    }

    #[test]
    fn text() {
        ast("div", vec![Text]);
        ast("über", vec![Text]);
        ast("-bo", vec![Text]);
        ast("--100", vec![Text]);
        ast("2n-1", vec![Text]);
        ast("a\\.b", vec![Text]);
        ast("a\\ b", vec![Text]);
        ast("\\E9motion", vec![Text]);
        ast("a/b", vec![Text]);
        ast("a/*c*/b", vec![Text, MultiComment, Text]);
    }

    #[test]
    fn delimiters() {
        ast(
            ".:#*|()[],>~+{}&",
            vec![
                Dot, Colon, Hash, Star, Pipe, OpenParen, CloseParen, OpenBracket, CloseBracket,
                Comma, GreaterThan, Tilde, Plus, OpenCurly, CloseCurly, Ampersand,
            ],
        );
        ast(".a#b", vec![Dot, Text, Hash, Text]);
        ast("a::before", vec![Text, Colon, Colon, Text]);
        ast("ns|*", vec![Text, Pipe, Star]);
        ast("[a=b]", vec![OpenBracket, Text, CloseBracket]);
        ast("[a|=b]", vec![OpenBracket, Text, Pipe, Text, CloseBracket]);
    }

    #[test]
    fn strings() {
        ast("\"a\"", vec![String]);
        ast("'a'", vec![String]);
        ast("'a\\'b'", vec![String]);
        ast("'a\"b'", vec![String]);
        ast("[a='b c']", vec![OpenBracket, Text, String, CloseBracket]);
        ast("'abc", vec![UnclosedString]);
        ast("'abc\\'", vec![UnclosedString]);
    }

    #[test]
    fn comments() {
        ast("/**/", vec![MultiComment]);
        ast("/***/", vec![MultiComment]);
        ast("/* a */", vec![MultiComment]);
        ast("/*/", vec![UnclosedComment]);
        ast("/* a", vec![UnclosedComment]);
        ast("a/*bad", vec![Text, UnclosedComment]);
    }

    #[test]
    fn offsets() {
        let source = "a > .b";
        let tokens = tokenize_selector(source, 10);
        assert_eq!(tokens.len(), 6);
        assert_eq!((tokens[0].start, tokens[0].end), (10, 11));
        assert_eq!((tokens[1].start, tokens[1].end), (11, 12));
        assert_eq!(tokens[2].value, ">");
        assert_eq!((tokens[5].start, tokens[5].end), (15, 16));
        let joined: std::string::String = tokens.iter().map(|t| t.value).collect();
        assert_eq!(joined, source);
    }

    #[test]
    fn multibyte_offsets_are_bytes() {
        let tokens = tokenize_selector(".ü b", 0);
        assert_eq!(tokens[1].value, "ü");
        assert_eq!((tokens[1].start, tokens[1].end), (1, 3));
        assert_eq!(tokens[3].start, 4);
    }
}
