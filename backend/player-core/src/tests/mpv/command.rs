use crate::mpv::command::CommandInput;

/// **VALUE**: A free-form command line is split on whitespace, however much of it there is.
#[test]
fn given_line_when_normalized_then_split_on_whitespace() {
    let input = CommandInput::from("  set_property \t time-pos   0 \n");

    assert_eq!(input.into_tokens(), vec!["set_property", "time-pos", "0"]);
}

/// **VALUE**: Pre-split tokens are never split again.
///
/// **WHY THIS MATTERS**: Episode paths routinely contain spaces. If a `loadfile` path were
/// re-split, mpv would receive `loadfile /media/The` plus stray arguments and fail to load.
///
/// **BUG THIS CATCHES**: Would catch a normalisation that joins and re-splits tokens.
#[test]
fn given_tokens_with_spaces_when_normalized_then_kept_verbatim() {
    let path = "/media/The Simpsons/S03E01_Stark Raving Dad.mkv";

    let from_array = CommandInput::from(["loadfile", path, "replace"]).into_tokens();
    let from_vec = CommandInput::from(vec!["loadfile".to_string(), path.to_string()]).into_tokens();

    assert_eq!(from_array, vec!["loadfile", path, "replace"]);
    assert_eq!(from_vec[1], path);
}

#[test]
fn given_empty_line_when_normalized_then_no_tokens() {
    assert!(CommandInput::from("   ").into_tokens().is_empty());
    assert!(CommandInput::from(String::new()).into_tokens().is_empty());
}
