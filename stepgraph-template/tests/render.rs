//! End-to-end rendering tests.

use proptest::prelude::*;
use stepgraph_template::{render, Limits, Syntax, Template, TemplateError};

#[test]
fn test_template_shared_across_threads() {
    let template = std::sync::Arc::new(Template::new(Syntax::default(), Limits::default()).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let template = template.clone();
            std::thread::spawn(move || template.render("worker {0}", &[i.to_string()]).unwrap())
        })
        .collect();

    let mut outputs: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    outputs.sort();
    assert_eq!(
        outputs,
        vec!["worker 0", "worker 1", "worker 2", "worker 3"]
    );
}

#[test]
fn test_invalid_syntax_rejected() {
    let result = Template::new(
        Syntax {
            escape: '{',
            ..Syntax::default()
        },
        Limits::default(),
    );
    assert!(matches!(result, Err(TemplateError::InvalidSyntax { .. })));
}

#[test]
fn test_error_codes() {
    let err = render("{x}", &["a"]).unwrap_err();
    assert_eq!(err.error_code(), "SYNTAX_ERROR");
    assert_eq!(
        err.to_string(),
        "syntax error at byte 1: unexpected character 'x'"
    );
}

proptest! {
    #[test]
    fn prop_plain_text_is_unchanged(text in "[^{}\\\\]*") {
        let out = render(&text, &[] as &[&str]).unwrap();
        prop_assert_eq!(out, text);
    }

    #[test]
    fn prop_argument_is_substituted(
        prefix in "[a-z ]{0,12}",
        suffix in "[a-z ]{0,12}",
        args in prop::collection::vec("[A-Za-z]{1,8}", 1..6),
        pick in 0usize..6,
    ) {
        let index = pick % args.len();
        let text = format!("{}{{{}}}{}", prefix, index, suffix);

        let out = render(&text, &args).unwrap();
        prop_assert_eq!(out, format!("{}{}{}", prefix, args[index], suffix));
    }
}
