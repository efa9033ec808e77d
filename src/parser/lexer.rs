//! Lexer for the relay course notation using logos

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    // Structure keywords
    #[token("course")]
    Course,
    #[token("fork")]
    Fork,
    #[token("loop")]
    Loop,

    // Delimiters
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,
    #[token("|")]
    Pipe,

    // Control codes and course names - must come after keywords
    #[regex(r"[a-zA-Z0-9_][a-zA-Z0-9_-]*", |lex| lex.slice().to_string(), priority = 1)]
    Ident(String),

    // Comments (skip)
    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    #[regex(r"/\*([^*]|\*[^/])*\*/", logos::skip)]
    BlockComment,
}

/// Lex input string into tokens with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .filter_map(|(tok, span)| tok.ok().map(|t| (t, span)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_keywords() {
        let tokens: Vec<_> = lex("course fork loop").map(|(t, _)| t).collect();
        assert_eq!(tokens, vec![Token::Course, Token::Fork, Token::Loop]);
    }

    #[test]
    fn test_delimiters() {
        let tokens: Vec<_> = lex("{ | }").map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![Token::BraceOpen, Token::Pipe, Token::BraceClose]
        );
    }

    #[test]
    fn test_numeric_controls() {
        let tokens: Vec<_> = lex("31 100 36").map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("31".to_string()),
                Token::Ident("100".to_string()),
                Token::Ident("36".to_string())
            ]
        );
    }

    #[test]
    fn test_named_controls() {
        let tokens: Vec<_> = lex("start F1 finish").map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("start".to_string()),
                Token::Ident("F1".to_string()),
                Token::Ident("finish".to_string())
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        // Longest match wins: "forks" is a control name, not the keyword
        let tokens: Vec<_> = lex("forks loop3").map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("forks".to_string()),
                Token::Ident("loop3".to_string())
            ]
        );
    }

    #[test]
    fn test_comments_skipped() {
        let tokens: Vec<_> = lex("31 // out-and-back leg\n32").map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("31".to_string()),
                Token::Ident("32".to_string())
            ]
        );
    }

    #[test]
    fn test_block_comments_skipped() {
        let tokens: Vec<_> = lex("31 /* map exchange */ 32").map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("31".to_string()),
                Token::Ident("32".to_string())
            ]
        );
    }

    #[test]
    fn test_complete_course() {
        let input = "course relay3 { start 31 fork { 32 33 | 34 } 36 finish }";
        let tokens: Vec<_> = lex(input).map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Course,
                Token::Ident("relay3".to_string()),
                Token::BraceOpen,
                Token::Ident("start".to_string()),
                Token::Ident("31".to_string()),
                Token::Fork,
                Token::BraceOpen,
                Token::Ident("32".to_string()),
                Token::Ident("33".to_string()),
                Token::Pipe,
                Token::Ident("34".to_string()),
                Token::BraceClose,
                Token::Ident("36".to_string()),
                Token::Ident("finish".to_string()),
                Token::BraceClose,
            ]
        );
    }
}
