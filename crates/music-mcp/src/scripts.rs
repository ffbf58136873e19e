//! AppleScript templates for each tool call
//!
//! Scripts that only issue one command are single statements. Anything
//! that has to branch, loop or report "nothing found" is a procedure and
//! answers with either a sentinel or tab/linefeed separated records,
//! which [`crate::render`] turns into text.

use music_bridge::{Script, applescript_string};

use crate::handlers::ToolCall;
use crate::tools::SearchScope;

/// Returned by a procedure when the player has no current track
pub const NO_TRACK: &str = "__NO_TRACK__";

/// Returned by a procedure when a lookup matched nothing
pub const NOT_FOUND: &str = "__NOT_FOUND__";

fn return_sentinel(sentinel: &str) -> String {
    format!("return {}", applescript_string(sentinel))
}

fn stopped_guard() -> String {
    format!("if player state is stopped then {}", return_sentinel(NO_TRACK))
}

fn not_found_guard() -> String {
    format!("if (count of matches) is 0 then {}", return_sentinel(NOT_FOUND))
}

/// `every track of library playlist 1 whose <field> contains <value> [and artist contains <artist>]`
fn library_matches(field: &str, value: &str, artist: Option<&str>) -> String {
    let mut filter = format!("{field} contains {}", applescript_string(value));
    if let Some(artist) = artist {
        filter.push_str(&format!(" and artist contains {}", applescript_string(artist)));
    }
    format!("set matches to (every track of library playlist 1 whose {filter})")
}

fn current_track_info() -> Script {
    Script::tell_block([
        stopped_guard(),
        "set t to current track".to_string(),
        "return (name of t) & tab & (artist of t) & tab & (album of t) & tab & (duration of t) & tab & player position".to_string(),
    ])
}

fn rate_current_track(property: &str) -> Script {
    Script::tell_block([
        stopped_guard(),
        "set t to current track".to_string(),
        format!("set {property} of t to true"),
        "return (name of t) & tab & (artist of t)".to_string(),
    ])
}

fn list_playlists() -> Script {
    Script::tell_block([
        "set output to \"\"",
        "repeat with p in user playlists",
        "    set output to output & (name of p) & linefeed",
        "end repeat",
        "return output",
    ])
}

fn playlist_tracks(playlist: &str, limit: usize) -> Script {
    Script::tell_block([
        format!("set playlistName to {}", applescript_string(playlist)),
        format!("if not (exists playlist playlistName) then {}", return_sentinel(NOT_FOUND)),
        "set p to playlist playlistName".to_string(),
        "set total to count of tracks of p".to_string(),
        format!("if total > {limit} then set total to {limit}"),
        "set output to \"\"".to_string(),
        "repeat with i from 1 to total".to_string(),
        "    set t to track i of p".to_string(),
        "    set output to output & (name of t) & tab & (artist of t) & tab & (album of t) & linefeed".to_string(),
        "end repeat".to_string(),
        "return output".to_string(),
    ])
}

fn play_playlist(playlist: &str, shuffle: bool) -> Script {
    let mut lines = vec![
        format!("set playlistName to {}", applescript_string(playlist)),
        format!("if not (exists playlist playlistName) then {}", return_sentinel(NOT_FOUND)),
    ];
    if shuffle {
        lines.push("set shuffle enabled to true".to_string());
    }
    lines.push("play playlist playlistName".to_string());
    lines.push("return \"OK\"".to_string());
    Script::tell_block(lines)
}

fn search(query: &str, scope: SearchScope, limit: usize) -> Script {
    let only = match scope {
        SearchScope::Songs => " only songs",
        SearchScope::Albums => " only albums",
        SearchScope::Artists => " only artists",
        SearchScope::All => "",
    };

    let mut lines = vec![
        format!(
            "set searchResults to (search library playlist 1 for {}{only})",
            applescript_string(query)
        ),
        "set output to \"\"".to_string(),
        "set found to 0".to_string(),
        "set seen to {}".to_string(),
        "repeat with t in searchResults".to_string(),
        format!("    if found is {limit} then exit repeat"),
    ];

    // Songs are listed as-is; albums and artists collapse duplicates.
    let record: &[&str] = match scope {
        SearchScope::Songs | SearchScope::All => &[
            "    set output to output & (name of t) & tab & (artist of t) & tab & (album of t) & linefeed",
            "    set found to found + 1",
        ],
        SearchScope::Albums => &[
            "    set recordKey to (album of t) & tab & (album artist of t)",
            "    if seen does not contain {recordKey} then",
            "        set end of seen to recordKey",
            "        set output to output & recordKey & linefeed",
            "        set found to found + 1",
            "    end if",
        ],
        SearchScope::Artists => &[
            "    set recordKey to (artist of t) as text",
            "    if seen does not contain {recordKey} then",
            "        set end of seen to recordKey",
            "        set output to output & recordKey & linefeed",
            "        set found to found + 1",
            "    end if",
        ],
    };
    lines.extend(record.iter().map(|line| line.to_string()));
    lines.push("end repeat".to_string());
    lines.push("return output".to_string());
    Script::tell_block(lines)
}

fn find_song(song: &str, artist: Option<&str>, play: bool) -> Script {
    let mut lines = vec![
        library_matches("name", song, artist),
        not_found_guard(),
        "set t to item 1 of matches".to_string(),
    ];
    if play {
        lines.push("play t".to_string());
    }
    lines.push("return (name of t) & tab & (artist of t)".to_string());
    Script::tell_block(lines)
}

fn play_album(album: &str, artist: Option<&str>) -> Script {
    Script::tell_block([
        library_matches("album", album, artist),
        not_found_guard(),
        "set t to item 1 of matches".to_string(),
        "play t".to_string(),
        "return album of t".to_string(),
    ])
}

fn play_artist(artist: &str, shuffle: bool) -> Script {
    let mut lines = vec![library_matches("artist", artist, None), not_found_guard()];
    if shuffle {
        lines.push("set shuffle enabled to true".to_string());
        lines.push("play some item of matches".to_string());
    } else {
        lines.push("play item 1 of matches".to_string());
    }
    lines.push("return \"OK\"".to_string());
    Script::tell_block(lines)
}

impl ToolCall {
    /// The AppleScript that carries out this call
    pub fn script(&self) -> Script {
        match self {
            Self::Play => Script::tell("play"),
            Self::Pause => Script::tell("pause"),
            Self::PlayPause => Script::tell("playpause"),
            Self::Stop => Script::tell("stop"),
            Self::NextTrack => Script::tell("next track"),
            Self::PreviousTrack => Script::tell("previous track"),
            Self::GetCurrentTrack => current_track_info(),
            Self::GetPlayerState => Script::tell("get player state"),
            Self::SetVolume { volume } => Script::tell(format!("set sound volume to {volume}")),
            Self::GetVolume => Script::tell("get sound volume"),
            Self::SetPosition { seconds } => {
                Script::tell(format!("set player position to {seconds}"))
            }
            Self::GetPosition => {
                Script::tell_block([stopped_guard(), "return player position".to_string()])
            }
            Self::SetShuffle { enabled } => {
                Script::tell(format!("set shuffle enabled to {enabled}"))
            }
            Self::GetShuffle => Script::tell("get shuffle enabled"),
            Self::SetRepeat { mode } => {
                Script::tell(format!("set song repeat to {}", mode.as_str()))
            }
            Self::GetRepeat => Script::tell("get song repeat"),
            Self::ListPlaylists => list_playlists(),
            Self::GetPlaylistTracks { playlist, limit } => playlist_tracks(playlist, *limit),
            Self::PlayPlaylist { playlist, shuffle } => play_playlist(playlist, *shuffle),
            Self::SearchLibrary {
                query,
                scope,
                limit,
            } => search(query, *scope, *limit),
            Self::PlaySong { song, artist } => find_song(song, artist.as_deref(), true),
            Self::PlayAlbum { album, artist } => play_album(album, artist.as_deref()),
            Self::PlayArtist { artist, shuffle } => play_artist(artist, *shuffle),
            Self::AddToQueue { song, artist } => find_song(song, artist.as_deref(), false),
            Self::FavoriteTrack => rate_current_track("favorited"),
            Self::DislikeTrack => rate_current_track("disliked"),
            Self::OpenMusic => Script::tell("activate"),
            Self::QuitMusic => Script::tell("quit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::RepeatMode;
    use music_bridge::ScriptMode;

    #[test]
    fn transport_controls_are_statements() {
        for call in [
            ToolCall::Play,
            ToolCall::Pause,
            ToolCall::PlayPause,
            ToolCall::Stop,
            ToolCall::NextTrack,
            ToolCall::PreviousTrack,
            ToolCall::OpenMusic,
            ToolCall::QuitMusic,
        ] {
            assert_eq!(call.script().mode(), ScriptMode::Statement, "{call:?}");
        }
    }

    #[test]
    fn set_volume_statement() {
        let script = ToolCall::SetVolume { volume: 35 }.script();
        assert_eq!(script.source(), "tell application \"Music\" to set sound volume to 35");
    }

    #[test]
    fn set_position_passes_fraction_through() {
        let script = ToolCall::SetPosition { seconds: 12.5 }.script();
        assert!(script.source().ends_with("set player position to 12.5"));
    }

    #[test]
    fn set_repeat_uses_music_vocabulary() {
        let script = ToolCall::SetRepeat {
            mode: RepeatMode::One,
        }
        .script();
        assert!(script.source().ends_with("set song repeat to one"));
    }

    #[test]
    fn current_track_guards_stopped_player() {
        let script = ToolCall::GetCurrentTrack.script();
        assert_eq!(script.mode(), ScriptMode::Procedure);
        assert!(script
            .source()
            .contains("if player state is stopped then return \"__NO_TRACK__\""));
    }

    #[test]
    fn song_match_without_artist_filters_on_name_only() {
        let script = ToolCall::PlaySong {
            song: "Yesterday".to_string(),
            artist: None,
        }
        .script();
        assert!(script.source().contains("whose name contains \"Yesterday\")"));
        assert!(!script.source().contains("artist contains"));
        assert!(script.source().contains("play t"));
    }

    #[test]
    fn song_match_with_artist_uses_conjunction() {
        let script = ToolCall::PlaySong {
            song: "Yesterday".to_string(),
            artist: Some("The Beatles".to_string()),
        }
        .script();
        assert!(script
            .source()
            .contains("whose name contains \"Yesterday\" and artist contains \"The Beatles\")"));
    }

    #[test]
    fn add_to_queue_does_not_play() {
        let script = ToolCall::AddToQueue {
            song: "Yesterday".to_string(),
            artist: None,
        }
        .script();
        assert!(!script.source().contains("play t"));
    }

    #[test]
    fn play_artist_without_shuffle_leaves_shuffle_alone() {
        let script = ToolCall::PlayArtist {
            artist: "Test Artist".to_string(),
            shuffle: false,
        }
        .script();
        assert!(!script.source().contains("set shuffle enabled to true"));
        assert!(script.source().contains("play item 1 of matches"));
    }

    #[test]
    fn play_artist_with_shuffle_enables_it() {
        let script = ToolCall::PlayArtist {
            artist: "Test Artist".to_string(),
            shuffle: true,
        }
        .script();
        assert!(script.source().contains("set shuffle enabled to true"));
        assert!(script.source().contains("play some item of matches"));
    }

    #[test]
    fn play_playlist_shuffle_is_opt_in() {
        let plain = ToolCall::PlayPlaylist {
            playlist: "Chill".to_string(),
            shuffle: false,
        }
        .script();
        assert!(!plain.source().contains("shuffle"));

        let shuffled = ToolCall::PlayPlaylist {
            playlist: "Chill".to_string(),
            shuffle: true,
        }
        .script();
        assert!(shuffled.source().contains("set shuffle enabled to true"));
    }

    #[test]
    fn playlist_tracks_caps_at_limit() {
        let script = ToolCall::GetPlaylistTracks {
            playlist: "Chill".to_string(),
            limit: 5,
        }
        .script();
        assert!(script.source().contains("if total > 5 then set total to 5"));
    }

    #[test]
    fn search_shapes_differ_by_scope() {
        let build = |scope| {
            ToolCall::SearchLibrary {
                query: "Test".to_string(),
                scope,
                limit: 20,
            }
            .script()
            .source()
            .to_string()
        };

        let songs = build(SearchScope::Songs);
        assert!(songs.contains("for \"Test\" only songs)"));
        assert!(!songs.contains("recordKey"));

        let albums = build(SearchScope::Albums);
        assert!(albums.contains("only albums"));
        assert!(albums.contains("(album of t) & tab & (album artist of t)"));

        let artists = build(SearchScope::Artists);
        assert!(artists.contains("only artists"));
        assert!(artists.contains("set recordKey to (artist of t) as text"));

        let all = build(SearchScope::All);
        assert!(all.contains("for \"Test\")"));
        assert!(all.contains("if found is 20 then exit repeat"));
    }

    #[test]
    fn favorite_and_dislike_set_their_property() {
        assert!(ToolCall::FavoriteTrack
            .script()
            .source()
            .contains("set favorited of t to true"));
        assert!(ToolCall::DislikeTrack
            .script()
            .source()
            .contains("set disliked of t to true"));
    }

    #[test]
    fn free_text_is_quoted_as_applescript_literal() {
        let script = ToolCall::PlayAlbum {
            album: "Say \"Hi\"".to_string(),
            artist: None,
        }
        .script();
        assert!(script.source().contains("album contains \"Say \\\"Hi\\\"\""));
    }
}
