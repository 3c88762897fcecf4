use super::*;
use pretty_assertions::assert_eq;

fn error_at(code: ErrorCode, start: u32, msg: &str) -> Diagnostic {
    Diagnostic::error(code)
        .with_message(msg)
        .with_label(Span::new(start, start + 1), "here")
}

#[test]
fn flush_sorts_by_position() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.emit(error_at(ErrorCode::E2001, 20, "second")));
    assert!(queue.emit(error_at(ErrorCode::E2002, 3, "first")));

    let flushed = queue.flush();
    let messages: Vec<_> = flushed.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, vec!["first", "second"]);
    assert_eq!(queue.error_count(), 0);
    assert!(queue.has_errors().is_none());
}

#[test]
fn duplicates_are_dropped() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.emit(error_at(ErrorCode::E2001, 5, "a")));
    assert!(!queue.emit(error_at(ErrorCode::E2001, 5, "a again")));
    // Same span, different code: kept.
    assert!(queue.emit(error_at(ErrorCode::E2011, 5, "b")));
    assert_eq!(queue.error_count(), 2);
}

#[test]
fn unlimited_config_keeps_everything() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    for _ in 0..20 {
        assert!(queue.emit(error_at(ErrorCode::E2001, 1, "same")));
    }
    assert_eq!(queue.error_count(), 20);
    assert!(!queue.limit_reached());
}

#[test]
fn error_limit_stops_accepting_errors() {
    let mut queue = DiagnosticQueue::new();
    for i in 0..15 {
        queue.emit(error_at(ErrorCode::E2001, i, "err"));
    }
    assert_eq!(queue.error_count(), 10);
    assert!(queue.limit_reached());

    // Warnings are not limited.
    let warning = Diagnostic::warning(ErrorCode::E2001).with_message("w");
    assert!(queue.emit(warning));
    assert_eq!(queue.peek().count(), 11);
}

#[test]
fn emit_error_returns_proof() {
    let mut queue = DiagnosticQueue::new();
    let proof = queue.emit_error(error_at(ErrorCode::E2015, 0, "infinite type"));
    assert_eq!(queue.has_errors(), Some(proof));
}

#[test]
fn spanless_diagnostics_sort_first() {
    let mut queue = DiagnosticQueue::new();
    queue.emit(error_at(ErrorCode::E2001, 9, "spanned"));
    queue.emit(Diagnostic::error(ErrorCode::E9001).with_message("internal"));
    let flushed = queue.flush();
    assert_eq!(flushed[0].message, "internal");
}
