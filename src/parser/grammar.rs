//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::parser::ast::*;
use crate::parser::lexer::Token;

/// Parse course notation source into an AST
pub fn parse(input: &str) -> Result<CourseFile, Vec<crate::ParseError>> {
    let len = input.len();

    // Create a logos lexer and convert to token stream
    let token_iter = crate::parser::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    file_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn file_parser<'a, I>() -> impl Parser<'a, I, CourseFile, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let identifier = select! {
        Token::Ident(s) => Identifier::new(s),
    }
    .map_with(|id, e| Spanned::new(id, span_range(&e.span())));

    let element = recursive(|element| {
        // A branch body is a non-empty sequence of elements
        let sequence = element.repeated().at_least(1).collect::<Vec<_>>();

        // `{ seq | seq | ... }` shared by fork and loop
        let branches = sequence
            .separated_by(just(Token::Pipe))
            .at_least(1)
            .collect::<Vec<_>>()
            .delimited_by(just(Token::BraceOpen), just(Token::BraceClose));

        let fork = just(Token::Fork)
            .ignore_then(branches.clone())
            .map_with(|b, e| Spanned::new(Element::Fork(b), span_range(&e.span())));

        let loop_ = just(Token::Loop)
            .ignore_then(branches)
            .map_with(|b, e| Spanned::new(Element::Loop(b), span_range(&e.span())));

        let control = identifier.clone().map(|id| {
            let span = id.span.clone();
            Spanned::new(Element::Control(id.node), span)
        });

        choice((fork, loop_, control))
    });

    let course = just(Token::Course)
        .ignore_then(identifier)
        .then(
            element
                .repeated()
                .at_least(1)
                .collect::<Vec<_>>()
                .delimited_by(just(Token::BraceOpen), just(Token::BraceClose)),
        )
        .map_with(|(name, elements), e| {
            Spanned::new(CourseDecl { name, elements }, span_range(&e.span()))
        });

    course
        .repeated()
        .at_least(1)
        .collect::<Vec<_>>()
        .map(|courses| CourseFile { courses })
        .then_ignore(end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control(name: &str) -> Element {
        Element::Control(Identifier::new(name))
    }

    #[test]
    fn test_parse_linear_course() {
        let file = parse("course straight { start 31 32 finish }").unwrap();
        assert_eq!(file.courses.len(), 1);
        let course = &file.courses[0].node;
        assert_eq!(course.name.node.as_str(), "straight");
        let elements: Vec<_> = course.elements.iter().map(|e| e.node.clone()).collect();
        assert_eq!(
            elements,
            vec![
                control("start"),
                control("31"),
                control("32"),
                control("finish")
            ]
        );
    }

    #[test]
    fn test_parse_fork() {
        let file = parse("course relay { start fork { 32 33 | 34 } finish }").unwrap();
        let course = &file.courses[0].node;
        match &course.elements[1].node {
            Element::Fork(branches) => {
                assert_eq!(branches.len(), 2);
                assert_eq!(branches[0].len(), 2);
                assert_eq!(branches[1].len(), 1);
            }
            other => panic!("expected fork, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_loop() {
        let file = parse("course loops { start 31 loop { 32 | 33 | 34 } finish }").unwrap();
        let course = &file.courses[0].node;
        match &course.elements[2].node {
            Element::Loop(branches) => assert_eq!(branches.len(), 3),
            other => panic!("expected loop, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_nested_fork() {
        let file = parse("course nested { start fork { 40 fork { 41 | 42 } | 50 } finish }")
            .unwrap();
        let course = &file.courses[0].node;
        let Element::Fork(branches) = &course.elements[1].node else {
            panic!("expected outer fork");
        };
        assert!(matches!(branches[0][1].node, Element::Fork(_)));
    }

    #[test]
    fn test_parse_multiple_courses() {
        let file = parse("course one { 31 } course two { 32 }").unwrap();
        assert_eq!(file.courses.len(), 2);
        assert_eq!(file.courses[1].node.name.node.as_str(), "two");
    }

    #[test]
    fn test_parse_empty_branch_is_error() {
        let result = parse("course bad { fork { 31 | } }");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_missing_brace_is_error() {
        let result = parse("course bad { start 31");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_empty_input_is_error() {
        assert!(parse("").is_err());
    }
}
