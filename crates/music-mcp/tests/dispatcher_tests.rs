//! Dispatcher behavior against a recorded bridge.
//!
//! Each test drives [`Dispatcher::invoke`] end to end (name lookup,
//! argument validation, script generation, rendering) with a
//! [`RecordingExecutor`] standing in for `osascript`.

use music_mcp::{Dispatcher, Tool, get_tool_definitions};
use music_test_utils::RecordingExecutor;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use serde_json::{Value, json};

fn dispatcher() -> (Dispatcher<RecordingExecutor>, RecordingExecutor) {
    let executor = RecordingExecutor::new();
    (Dispatcher::new(executor.clone()), executor)
}

/// Arguments that satisfy every tool's required parameters
fn minimal_args(name: &str) -> Value {
    match name {
        "set_volume" => json!({"volume": 50}),
        "set_position" => json!({"position": 10}),
        "set_shuffle" => json!({"enabled": true}),
        "set_repeat" => json!({"mode": "all"}),
        "get_playlist_tracks" | "play_playlist" => json!({"playlist": "Chill"}),
        "search_library" => json!({"query": "Test"}),
        "play_song" | "add_to_queue" => json!({"song": "Yesterday"}),
        "play_album" => json!({"album": "Abbey Road"}),
        "play_artist" => json!({"artist": "Queen"}),
        _ => json!({}),
    }
}

// ==========================================================================
// Registry / dispatcher lockstep
// ==========================================================================

#[test]
fn every_registered_tool_is_dispatchable() {
    let (dispatcher, _) = dispatcher();
    for definition in get_tool_definitions() {
        let result = dispatcher.invoke(&definition.name, minimal_args(&definition.name));
        assert!(
            !result.text_body().starts_with("Unknown tool"),
            "{} fell through to the unknown-tool branch",
            definition.name
        );
        assert!(!result.is_error(), "{}: {}", definition.name, result.text_body());
    }
}

#[test]
fn every_dispatchable_tool_is_registered_once() {
    let definitions = get_tool_definitions();
    for tool in Tool::ALL {
        let count = definitions.iter().filter(|d| d.name == tool.name()).count();
        assert_eq!(count, 1, "{} registered {count} times", tool.name());
    }
    assert_eq!(definitions.len(), Tool::ALL.len());
}

#[test]
fn list_tools_is_stable() {
    let first = serde_json::to_string(&get_tool_definitions()).unwrap();
    for _ in 0..3 {
        assert_eq!(serde_json::to_string(&get_tool_definitions()).unwrap(), first);
    }
}

// ==========================================================================
// Unknown operation and validation rejections
// ==========================================================================

#[rstest]
#[case("rewind")]
#[case("")]
#[case("Play")]
#[case("play; rm -rf ~")]
fn unknown_tool_is_an_error_without_running_anything(#[case] name: &str) {
    let (dispatcher, executor) = dispatcher();
    let result = dispatcher.invoke(name, json!({}));
    assert!(result.is_error());
    assert_eq!(result.text_body(), format!("Unknown tool: {name}"));
    assert!(executor.commands().is_empty());
}

#[test]
fn invalid_search_type_is_rejected_before_execution() {
    let (dispatcher, executor) = dispatcher();
    let result = dispatcher.invoke(
        "search_library",
        json!({"query": "Test", "searchType": "invalid"}),
    );
    assert!(result.is_error());
    assert_eq!(result.text_body(), "Invalid search type");
    assert!(executor.commands().is_empty());
}

#[test]
fn invalid_repeat_mode_is_rejected_before_execution() {
    let (dispatcher, executor) = dispatcher();
    let result = dispatcher.invoke("set_repeat", json!({"mode": "shuffle"}));
    assert!(result.is_error());
    assert!(result.text_body().starts_with("Invalid repeat mode: shuffle"));
    assert!(executor.commands().is_empty());
}

#[test]
fn missing_required_argument_is_rejected() {
    let (dispatcher, executor) = dispatcher();
    let result = dispatcher.invoke("play_song", json!({"artist": "Queen"}));
    assert!(result.is_error());
    assert!(result.text_body().contains("song"));
    assert!(executor.commands().is_empty());
}

// ==========================================================================
// Volume, repeat, shuffle
// ==========================================================================

#[rstest]
#[case(-10, "Volume set to 0%", "set sound volume to 0")]
#[case(150, "Volume set to 100%", "set sound volume to 100")]
#[case(35, "Volume set to 35%", "set sound volume to 35")]
fn set_volume_clamps(#[case] volume: i64, #[case] text: &str, #[case] script: &str) {
    let (dispatcher, executor) = dispatcher();
    let result = dispatcher.invoke("set_volume", json!({"volume": volume}));
    assert!(!result.is_error());
    assert_eq!(result.text_body(), text);
    assert!(executor.last_command().unwrap().contains(script));
}

#[test]
fn set_repeat_one() {
    let (dispatcher, executor) = dispatcher();
    let result = dispatcher.invoke("set_repeat", json!({"mode": "one"}));
    assert_eq!(result.text_body(), "Repeat mode set to one");
    assert_eq!(
        executor.last_command().unwrap(),
        "osascript -e 'tell application \"Music\" to set song repeat to one'"
    );
}

#[test]
fn get_shuffle_renders_on_off() {
    let (dispatcher, executor) = dispatcher();
    executor.respond("false");
    assert_eq!(dispatcher.invoke("get_shuffle", json!({})).text_body(), "Shuffle: off");
}

#[test]
fn no_arg_tools_ignore_extra_arguments() {
    let (dispatcher, executor) = dispatcher();
    let result = dispatcher.invoke("pause", json!({"volume": 10, "mode": "bogus"}));
    assert_eq!(result.text_body(), "Playback paused");
    assert_eq!(
        executor.last_command().unwrap(),
        "osascript -e 'tell application \"Music\" to pause'"
    );
}

// ==========================================================================
// Injection safety
// ==========================================================================

#[test]
fn quoted_playlist_name_is_escaped() {
    let (dispatcher, executor) = dispatcher();
    executor.respond("OK");
    dispatcher.invoke("play_playlist", json!({"playlist": "Test \"Playlist\""}));
    let command = executor.last_command().unwrap();
    assert!(!command.contains("Test \"Playlist\""), "{command}");
    assert!(command.contains("Test \\\\\\\"Playlist\\\\\\\""), "{command}");
}

#[test]
fn shell_expansion_in_search_query_is_escaped() {
    let (dispatcher, executor) = dispatcher();
    dispatcher.invoke("search_library", json!({"query": "$(touch /tmp/pwned) `id`"}));
    let command = executor.last_command().unwrap();
    assert!(command.contains("\\$(touch /tmp/pwned) \\`id\\`"), "{command}");
}

// ==========================================================================
// Playback by name and not-found outcomes
// ==========================================================================

#[test]
fn play_artist_without_shuffle() {
    let (dispatcher, executor) = dispatcher();
    executor.respond("OK");
    let result = dispatcher.invoke(
        "play_artist",
        json!({"artist": "Test Artist", "shuffle": false}),
    );
    assert!(!result.is_error());
    assert_eq!(result.text_body(), "Playing songs by: Test Artist");
    assert!(!executor.last_command().unwrap().contains("set shuffle enabled to true"));
}

#[test]
fn play_artist_shuffles_by_default() {
    let (dispatcher, executor) = dispatcher();
    executor.respond("OK");
    let result = dispatcher.invoke("play_artist", json!({"artist": "Test Artist"}));
    assert_eq!(result.text_body(), "Playing songs by: Test Artist (shuffled)");
    assert!(executor.last_command().unwrap().contains("set shuffle enabled to true"));
}

#[rstest]
#[case("play_song", json!({"song": "Nope"}), "Song not found: Nope")]
#[case(
    "play_album",
    json!({"album": "Nope", "artist": "Nobody"}),
    "Album not found: Nope by Nobody"
)]
#[case("play_artist", json!({"artist": "Nobody"}), "No songs found by: Nobody")]
#[case("play_playlist", json!({"playlist": "Nope"}), "Playlist not found: Nope")]
#[case("get_playlist_tracks", json!({"playlist": "Nope"}), "Playlist not found: Nope")]
#[case("add_to_queue", json!({"song": "Nope"}), "Song not found: Nope")]
fn not_found_is_not_an_error(#[case] tool: &str, #[case] args: Value, #[case] text: &str) {
    let (dispatcher, executor) = dispatcher();
    executor.respond("__NOT_FOUND__");
    let result = dispatcher.invoke(tool, args);
    assert!(!result.is_error());
    assert_eq!(result.text_body(), text);
}

#[rstest]
#[case("get_current_track")]
#[case("get_position")]
#[case("favorite_track")]
#[case("dislike_track")]
fn stopped_player_is_not_an_error(#[case] tool: &str) {
    let (dispatcher, executor) = dispatcher();
    executor.respond("__NO_TRACK__");
    let result = dispatcher.invoke(tool, json!({}));
    assert!(!result.is_error());
    assert_eq!(result.text_body(), "No track is currently playing");
}

#[test]
fn search_by_songs_lists_matches() {
    let (dispatcher, executor) = dispatcher();
    executor.respond("Test Song\tTest Artist\tTest Album\nTest Two\tOther\tB Sides\n");
    let result = dispatcher.invoke(
        "search_library",
        json!({"query": "Test", "searchType": "songs", "limit": 5}),
    );
    assert_eq!(
        result.text_body(),
        "Found 2 songs for \"Test\":\n1. Test Song - Test Artist (Test Album)\n2. Test Two - Other (B Sides)"
    );
    let command = executor.last_command().unwrap();
    assert!(command.contains("only songs"));
    assert!(command.contains("if found is 5 then exit repeat"));
}

#[test]
fn empty_playlist_listing_is_spelled_out() {
    let (dispatcher, executor) = dispatcher();
    executor.respond("");
    assert_eq!(
        dispatcher.invoke("list_playlists", json!({})).text_body(),
        "No playlists found"
    );
}

#[test]
fn add_to_queue_only_reports() {
    let (dispatcher, executor) = dispatcher();
    executor.respond("Yesterday\tThe Beatles");
    let result = dispatcher.invoke("add_to_queue", json!({"song": "yesterday"}));
    assert!(!result.is_error());
    assert!(result.text_body().starts_with("Found \"Yesterday\" by The Beatles."));
    assert!(!executor.last_command().unwrap().contains("play t"));
}

// ==========================================================================
// External execution failures
// ==========================================================================

#[test]
fn bridge_stderr_becomes_error_result() {
    let (dispatcher, executor) = dispatcher();
    executor.fail_with_stderr("Music is not running");
    let result = dispatcher.invoke("play", json!({}));
    assert!(result.is_error());
    assert_eq!(result.text_body(), "Error: AppleScript error: Music is not running");
}

#[test]
fn silent_bridge_failure_uses_generic_message() {
    let (dispatcher, executor) = dispatcher();
    executor.fail_with_exit(1);
    let result = dispatcher.invoke("get_volume", json!({}));
    assert!(result.is_error());
    assert_eq!(result.text_body(), "Error: Command failed with exit code 1");
}

proptest! {
    #[test]
    fn volume_always_lands_in_range(v in -1_000i64..1_000) {
        let (dispatcher, _) = dispatcher();
        let result = dispatcher.invoke("set_volume", json!({"volume": v}));
        let expected = v.clamp(0, 100);
        prop_assert_eq!(result.text_body(), format!("Volume set to {expected}%"));
    }

    #[test]
    fn unknown_names_never_run_scripts(name in "[a-z_]{1,20}") {
        prop_assume!(Tool::from_name(&name).is_none());
        let (dispatcher, executor) = dispatcher();
        let result = dispatcher.invoke(&name, json!({}));
        prop_assert!(result.is_error());
        prop_assert_eq!(result.text_body(), format!("Unknown tool: {name}"));
        prop_assert!(executor.commands().is_empty());
    }
}
