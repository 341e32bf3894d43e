use super::*;
use pretty_assertions::assert_eq;

fn replayed(source: &str, mut state: ScannerState) -> ScannerState {
    let buf = SourceBuffer::new(source);
    state.resume = 0;
    catch_up(&mut state, &buf, buf.len());
    state
}

#[test]
fn brackets_change_depth() {
    let state = replayed("f(a, [b", ScannerState::new());
    assert_eq!(state.bracket_depth(), 2);
    assert_eq!(state.resume_offset(), 7);

    let state = replayed("f(a, [b])", ScannerState::new());
    assert_eq!(state.bracket_depth(), 0);
}

#[test]
fn unbalanced_closers_saturate() {
    let state = replayed("))]", ScannerState::new());
    assert_eq!(state.bracket_depth(), 0);
    assert!(state.frames().is_empty());
}

#[test]
fn brackets_inside_strings_are_ignored() {
    let state = replayed(r#"x := "(\"[""#, ScannerState::new());
    assert_eq!(state.bracket_depth(), 0);
    assert_eq!(state.mode(), ScanMode::Normal);
}

#[test]
fn open_quote_enters_string_body() {
    let state = replayed("x := \"abc", ScannerState::new());
    assert_eq!(state.mode(), ScanMode::StringBody);
}

#[test]
fn newline_ends_string_body() {
    let state = replayed("\"abc\n(", ScannerState::new());
    assert_eq!(state.mode(), ScanMode::Normal);
    assert_eq!(state.bracket_depth(), 1);
}

#[test]
fn backslash_before_line_break_still_ends_string_body() {
    let state = replayed("\"abc\\\n(", ScannerState::new());
    assert_eq!(state.mode(), ScanMode::Normal);
    assert_eq!(state.bracket_depth(), 1);

    let state = replayed("\"a\\\r\n(", ScannerState::new());
    assert_eq!(state.mode(), ScanMode::Normal);
    assert_eq!(state.bracket_depth(), 1);
}

#[test]
fn char_literals_are_skipped() {
    let state = replayed("c := '(' + '\"'", ScannerState::new());
    assert_eq!(state.bracket_depth(), 0);
    assert_eq!(state.mode(), ScanMode::Normal);
}

#[test]
fn splice_round_trip() {
    let state = replayed("\"a{f(", ScannerState::new());
    assert_eq!(state.mode(), ScanMode::Normal);
    assert_eq!(state.frames().len(), 1);
    assert_eq!(state.bracket_depth(), 1);

    let state = replayed("\"a{f(x)}b", ScannerState::new());
    assert_eq!(state.mode(), ScanMode::StringBody);
    assert!(state.frames().is_empty());
}

#[test]
fn escaped_brace_is_not_a_splice() {
    let state = replayed(r#""a\{b"#, ScannerState::new());
    assert_eq!(state.mode(), ScanMode::StringBody);
    assert!(state.frames().is_empty());
}

#[test]
fn literal_brace_inside_braced_block_only_counts_depth() {
    let mut state = ScannerState::new();
    assert!(state.push_frame(FrameKind::Braced));
    let state = replayed("{x}", state);
    assert_eq!(state.frames().len(), 1);

    let state = replayed("}", state);
    assert!(state.frames().is_empty());
}

#[test]
fn closing_brace_closes_nested_indent_blocks() {
    let mut state = ScannerState::new();
    state.bracket_depth = 2;
    assert!(state.push_frame(FrameKind::Braced));
    assert!(state.push_frame(FrameKind::Indent(4)));
    let state = replayed("}", state);
    assert!(state.frames().is_empty());
    assert_eq!(state.bracket_depth(), 2);
}

#[test]
fn rewinding_only_moves_resume() {
    let buf = SourceBuffer::new("(((");
    let mut state = ScannerState::new();
    catch_up(&mut state, &buf, 3);
    catch_up(&mut state, &buf, 1);
    assert_eq!(state.bracket_depth(), 3);
    assert_eq!(state.resume_offset(), 1);
}

#[test]
fn incremental_replay_matches_single_pass() {
    let source = "a := \"x{(y)}z\" + f([1, '}'])";
    let buf = SourceBuffer::new(source);
    let mut stepped = ScannerState::new();
    // Token boundaries, as a parser would stop at them.
    for pos in [0, 2, 5, 6, 7, 8, 10, 12, 14, 17, 19, 22, 23, 26, 28] {
        catch_up(&mut stepped, &buf, pos);
    }
    assert_eq!(stepped, replayed(source, ScannerState::new()));
}
