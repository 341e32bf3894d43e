use super::*;
use crate::issue::ScanIssueKind;
use crate::state::FrameKind;
use pretty_assertions::assert_eq;

const TERMINATOR: ValidSymbols = ValidSymbols::single(TokenKind::AutoTerminator);

#[test]
fn token_moves_resume_offset() {
    let source = SourceBuffer::new("a  \nb");
    let mut scanner = Scanner::new();
    let token = scanner.next(TERMINATOR, &source, 1);
    assert_eq!(token, Some(ScanToken::new(TokenKind::AutoTerminator, 2, 1)));
    assert_eq!(scanner.state().resume_offset(), 4);
}

#[test]
fn no_token_consumes_nothing() {
    let source = SourceBuffer::new("f(a + b");
    let mut scanner = Scanner::new();
    assert_eq!(scanner.next(ValidSymbols::ALL.without(TokenKind::ErrorSentinel), &source, 3), None);
    // Only the replay moved.
    assert_eq!(scanner.state().bracket_depth(), 1);
    assert_eq!(scanner.state().resume_offset(), 3);
}

#[test]
fn empty_valid_set_yields_nothing() {
    let source = SourceBuffer::new("x\n");
    let mut scanner = Scanner::new();
    assert_eq!(scanner.next(ValidSymbols::new(), &source, 1), None);
}

#[test]
fn failed_opener_falls_through_to_terminator() {
    let source = SourceBuffer::new("x := y\nz");
    let mut scanner = Scanner::new();
    let valid = TERMINATOR.with(TokenKind::OpenIndentBlock);
    let token = scanner.next(valid, &source, 6);
    assert_eq!(token.map(|t| t.kind), Some(TokenKind::AutoTerminator));
    assert!(scanner.state().frames().is_empty());
}

#[test]
fn failed_trial_leaves_state_untouched() {
    let source = SourceBuffer::new("x :=\n  a < b\n");
    let mut scanner = Scanner::new();
    let open = scanner.next(ValidSymbols::single(TokenKind::OpenIndentBlock), &source, 4);
    assert!(open.is_some());
    let before = scanner.state().to_bytes();
    let attr = scanner.next(ValidSymbols::single(TokenKind::BestGuessAttrStart), &source, 8);
    assert_eq!(attr, None);
    // Replaying `  a` moved nothing but the resume offset.
    let mut after = scanner.state().clone();
    after.resume = 5;
    assert_eq!(after.to_bytes(), before);
}

#[test]
fn issues_are_deduplicated() {
    let source = SourceBuffer::new("x :=\n  a\n   b");
    let mut state = ScannerState::new();
    assert!(state.push_frame(FrameKind::Indent(2)));
    state.resume = 9;
    let mut scanner = Scanner::new();
    scanner.restore(state);

    let valid = ValidSymbols::single(TokenKind::Indent);
    assert_eq!(scanner.next(valid, &source, 9), None);
    assert_eq!(scanner.next(valid, &source, 9), None);
    assert_eq!(scanner.issues().len(), 1);
    assert!(matches!(
        scanner.issues()[0].kind,
        ScanIssueKind::MismatchedIndentation { column: 3, block: 2 }
    ));

    assert_eq!(scanner.take_issues().len(), 1);
    assert!(scanner.issues().is_empty());
}

#[test]
fn interleaved_branches_do_not_repeat_issues() {
    let source = SourceBuffer::new("x :=\n  a\n   b\n   c");
    let mut state = ScannerState::new();
    assert!(state.push_frame(FrameKind::Indent(2)));
    let mut scanner = Scanner::new();

    let valid = ValidSymbols::single(TokenKind::Indent);
    for pos in [9, 13, 9, 13] {
        let mut branch = state.clone();
        branch.resume = pos;
        scanner.restore(branch);
        assert_eq!(scanner.next(valid, &source, pos), None);
    }
    let starts: Vec<_> = scanner.issues().iter().map(|i| i.span.start).collect();
    assert_eq!(starts, vec![9, 14]);
}

#[test]
fn error_recovery_cycle() {
    let source = SourceBuffer::new("x :=\n  f(( ?\ny\n");
    let mut scanner = Scanner::new();
    assert!(scanner.next(ValidSymbols::single(TokenKind::OpenIndentBlock), &source, 4).is_some());

    let token = scanner.next(ValidSymbols::ALL, &source, 11);
    assert_eq!(token, Some(ScanToken::new(TokenKind::ErrorSentinel, 0, 0)));
    assert_eq!(scanner.state().mode(), ScanMode::Normal);
    assert!(scanner.state().sentinel_emitted());
    assert!(scanner.state().frames().is_empty());
    assert_eq!(scanner.state().bracket_depth(), 0);

    // No second sentinel at the same offset.
    assert_eq!(scanner.next(ValidSymbols::ALL, &source, 11), None);

    // Recovery ends with the first ordinary call.
    let token = scanner.next(TERMINATOR, &source, 12);
    assert_eq!(token.map(|t| t.kind), Some(TokenKind::AutoTerminator));
    assert_eq!(scanner.state().mode(), ScanMode::Normal);
    assert!(!scanner.state().sentinel_emitted());
}

#[test]
fn error_recovery_resyncs_on_line_break() {
    let source = SourceBuffer::new("x :=
  a
  b
");
    let mut scanner = Scanner::new();
    assert!(scanner.next(ValidSymbols::single(TokenKind::OpenIndentBlock), &source, 4).is_some());
    let frames = scanner.state().frames().to_vec();

    let token = scanner.next(ValidSymbols::ALL, &source, 8);
    assert_eq!(token, Some(ScanToken::new(TokenKind::AutoTerminator, 0, 1)));
    assert_eq!(scanner.state().frames(), frames.as_slice());
    assert_eq!(scanner.state().mode(), ScanMode::ErrorRecovery);
    assert!(!scanner.state().sentinel_emitted());

    assert!(scanner.next(ValidSymbols::single(TokenKind::Indent), &source, 9).is_some());
    assert_eq!(scanner.state().mode(), ScanMode::Normal);
}

#[test]
fn error_recovery_resyncs_on_brace() {
    let source = SourceBuffer::new("f() { g(");
    let mut scanner = Scanner::new();
    let token = scanner.next(ValidSymbols::ALL, &source, 3);
    assert_eq!(token, Some(ScanToken::new(TokenKind::OpenBracedBlock, 1, 1)));
    assert_eq!(scanner.state().frames().len(), 1);
}

#[test]
fn zero_width_boundary_falls_back_to_sentinel() {
    // At end of input a terminator would consume nothing.
    let source = SourceBuffer::new("x :=
  a");
    let mut scanner = Scanner::new();
    assert!(scanner.next(ValidSymbols::single(TokenKind::OpenIndentBlock), &source, 4).is_some());
    let token = scanner.next(ValidSymbols::ALL, &source, 8);
    assert_eq!(token, Some(ScanToken::new(TokenKind::ErrorSentinel, 0, 0)));
    assert!(scanner.state().frames().is_empty());
}

#[test]
fn string_body_without_recovery_token_yields_nothing() {
    let source = SourceBuffer::new("\"abc\n");
    let mut scanner = Scanner::new();
    assert_eq!(scanner.next(TERMINATOR, &source, 1), None);
    assert_eq!(scanner.state().mode(), ScanMode::StringBody);

    let valid = TERMINATOR.with(TokenKind::IncompleteString);
    let token = scanner.next(valid, &source, 1);
    assert_eq!(token, Some(ScanToken::new(TokenKind::IncompleteString, 0, 3)));
    assert_eq!(scanner.state().mode(), ScanMode::Normal);
}

#[test]
fn serialize_round_trip_through_scanner() {
    let source = SourceBuffer::new("x :=\n  {\n");
    let mut scanner = Scanner::new();
    assert!(scanner.next(ValidSymbols::single(TokenKind::OpenIndentBlock), &source, 4).is_some());
    assert!(scanner.next(ValidSymbols::single(TokenKind::OpenBracedBlock), &source, 7).is_some());

    let mut buf = [0u8; crate::SERIALIZATION_BUFFER_SIZE];
    let written = scanner.serialize(&mut buf).unwrap_or_else(|e| panic!("{e}"));

    let mut restored = Scanner::new();
    restored
        .deserialize(&buf[..written])
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(restored.state(), scanner.state());

    restored
        .deserialize(&[])
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(restored.state(), &ScannerState::new());
}

#[test]
fn bad_buffer_keeps_current_state() {
    let source = SourceBuffer::new("{");
    let mut scanner = Scanner::new();
    assert!(scanner.next(ValidSymbols::single(TokenKind::OpenBracedBlock), &source, 0).is_some());
    let before = scanner.state().clone();
    assert_eq!(scanner.deserialize(&[7]), Err(StateError::Truncated { needed: 9, found: 1 }));
    assert_eq!(scanner.state(), &before);
}

#[test]
fn config_is_kept() {
    let config = ScanConfig::default().with_tab_width(8);
    let scanner = Scanner::with_config(config);
    assert_eq!(scanner.config(), &config);
}
