use super::*;
use pretty_assertions::assert_eq;

#[test]
fn builder_collects_parts() {
    let diag = Diagnostic::error(ErrorCode::E2001)
        .with_message("type mismatch (expected value of type 'Int', got 'Bool')")
        .with_secondary_label(Span::new(0, 3), "declared here")
        .with_label(Span::new(4, 8), "here")
        .with_note("note text")
        .with_suggestion("add explicit cast (as Int) to fix");

    assert!(diag.is_error());
    assert_eq!(diag.primary_span(), Some(Span::new(4, 8)));
    assert_eq!(diag.labels.len(), 2);
    assert_eq!(diag.labels[0].style, LabelStyle::Primary);
    assert_eq!(diag.notes, vec!["note text".to_string()]);
    assert_eq!(diag.suggestions.len(), 1);
}

#[test]
fn second_primary_label_replaces_the_first() {
    let diag = Diagnostic::error(ErrorCode::E2001)
        .with_label(Span::new(1, 2), "first")
        .with_label(Span::new(5, 6), "second");
    assert_eq!(diag.labels.len(), 1);
    assert_eq!(diag.primary_span(), Some(Span::new(5, 6)));
}

#[test]
fn warnings_have_no_primary_span_without_a_label() {
    let diag = Diagnostic::warning(ErrorCode::E2001)
        .with_secondary_label(Span::new(1, 2), "context");
    assert_eq!(diag.primary_span(), None);
    assert!(!diag.is_error());
}

#[test]
fn display_lists_labels_notes_and_help() {
    let diag = Diagnostic::error(ErrorCode::E2009)
        .with_message("cannot downcast from Any to type 'Int'")
        .with_label(Span::new(2, 5), "assigned here")
        .with_secondary_label(Span::new(9, 12), "")
        .with_suggestion("add explicit cast (as Int) to fix");

    assert_eq!(
        diag.to_string(),
        "error[E2009]: cannot downcast from Any to type 'Int'\n  \
         at 2..5: assigned here\n  \
         see 9..12\n  \
         help: add explicit cast (as Int) to fix"
    );
}

#[test]
fn severity_names() {
    assert_eq!(Severity::Error.to_string(), "error");
    assert_eq!(Severity::Warning.as_str(), "warning");
}
