//! MCP Tool registry
//!
//! The static catalog advertised on `tools/list`. Every entry is backed
//! by a [`Tool`] variant, and [`Tool::definition`] is an exhaustive match,
//! so the catalog and the dispatcher cannot drift apart.
//!
//! # Tool Categories
//!
//! ## Transport
//! - `play`, `pause`, `play_pause`, `stop`, `next_track`, `previous_track`
//!
//! ## Player State
//! - `get_current_track`, `get_player_state`
//! - `set_volume` / `get_volume` - volume 0-100
//! - `set_position` / `get_position` - seek within the current track
//! - `set_shuffle` / `get_shuffle`
//! - `set_repeat` / `get_repeat` - off, one or all
//!
//! ## Library
//! - `list_playlists`, `get_playlist_tracks`, `play_playlist`
//! - `search_library` - songs, albums, artists or all
//! - `play_song`, `play_album`, `play_artist`
//! - `add_to_queue` - find a song (the queue itself is not scriptable)
//!
//! ## Track Rating
//! - `favorite_track`, `dislike_track`
//!
//! ## Application
//! - `open_music`, `quit_music`

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Default cap for `get_playlist_tracks`
pub const DEFAULT_PLAYLIST_TRACK_LIMIT: usize = 50;

/// Default cap for `search_library`
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Every tool this server exposes, in catalog order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Play,
    Pause,
    PlayPause,
    Stop,
    NextTrack,
    PreviousTrack,
    GetCurrentTrack,
    GetPlayerState,
    SetVolume,
    GetVolume,
    SetPosition,
    GetPosition,
    SetShuffle,
    GetShuffle,
    SetRepeat,
    GetRepeat,
    ListPlaylists,
    GetPlaylistTracks,
    PlayPlaylist,
    SearchLibrary,
    PlaySong,
    PlayAlbum,
    PlayArtist,
    AddToQueue,
    FavoriteTrack,
    DislikeTrack,
    OpenMusic,
    QuitMusic,
}

impl Tool {
    pub const ALL: [Tool; 28] = [
        Tool::Play,
        Tool::Pause,
        Tool::PlayPause,
        Tool::Stop,
        Tool::NextTrack,
        Tool::PreviousTrack,
        Tool::GetCurrentTrack,
        Tool::GetPlayerState,
        Tool::SetVolume,
        Tool::GetVolume,
        Tool::SetPosition,
        Tool::GetPosition,
        Tool::SetShuffle,
        Tool::GetShuffle,
        Tool::SetRepeat,
        Tool::GetRepeat,
        Tool::ListPlaylists,
        Tool::GetPlaylistTracks,
        Tool::PlayPlaylist,
        Tool::SearchLibrary,
        Tool::PlaySong,
        Tool::PlayAlbum,
        Tool::PlayArtist,
        Tool::AddToQueue,
        Tool::FavoriteTrack,
        Tool::DislikeTrack,
        Tool::OpenMusic,
        Tool::QuitMusic,
    ];

    /// Wire name of the tool
    pub fn name(self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::PlayPause => "play_pause",
            Self::Stop => "stop",
            Self::NextTrack => "next_track",
            Self::PreviousTrack => "previous_track",
            Self::GetCurrentTrack => "get_current_track",
            Self::GetPlayerState => "get_player_state",
            Self::SetVolume => "set_volume",
            Self::GetVolume => "get_volume",
            Self::SetPosition => "set_position",
            Self::GetPosition => "get_position",
            Self::SetShuffle => "set_shuffle",
            Self::GetShuffle => "get_shuffle",
            Self::SetRepeat => "set_repeat",
            Self::GetRepeat => "get_repeat",
            Self::ListPlaylists => "list_playlists",
            Self::GetPlaylistTracks => "get_playlist_tracks",
            Self::PlayPlaylist => "play_playlist",
            Self::SearchLibrary => "search_library",
            Self::PlaySong => "play_song",
            Self::PlayAlbum => "play_album",
            Self::PlayArtist => "play_artist",
            Self::AddToQueue => "add_to_queue",
            Self::FavoriteTrack => "favorite_track",
            Self::DislikeTrack => "dislike_track",
            Self::OpenMusic => "open_music",
            Self::QuitMusic => "quit_music",
        }
    }

    /// Look a tool up by its wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|tool| tool.name() == name)
    }

    /// The descriptor advertised for this tool
    pub fn definition(self) -> ToolDefinition {
        let (description, params): (&str, Vec<ParamSpec>) = match self {
            Self::Play => ("Start or resume playback in Apple Music", vec![]),
            Self::Pause => ("Pause playback in Apple Music", vec![]),
            Self::PlayPause => ("Toggle between play and pause", vec![]),
            Self::Stop => ("Stop playback in Apple Music", vec![]),
            Self::NextTrack => ("Skip to the next track", vec![]),
            Self::PreviousTrack => ("Go back to the previous track", vec![]),
            Self::GetCurrentTrack => (
                "Get information about the currently playing track",
                vec![],
            ),
            Self::GetPlayerState => (
                "Get the player state (playing, paused, stopped)",
                vec![],
            ),
            Self::SetVolume => (
                "Set the Apple Music volume",
                vec![
                    ParamSpec::number("volume", "Volume level (0-100)")
                        .required()
                        .range(0, 100),
                ],
            ),
            Self::GetVolume => ("Get the current Apple Music volume", vec![]),
            Self::SetPosition => (
                "Seek to a position in the current track",
                vec![ParamSpec::number("position", "Position in seconds").required()],
            ),
            Self::GetPosition => (
                "Get the playback position in the current track",
                vec![],
            ),
            Self::SetShuffle => (
                "Turn shuffle on or off",
                vec![ParamSpec::boolean("enabled", "Whether shuffle is enabled").required()],
            ),
            Self::GetShuffle => ("Get the current shuffle setting", vec![]),
            Self::SetRepeat => (
                "Set the repeat mode",
                vec![
                    ParamSpec::string("mode", "Repeat mode")
                        .required()
                        .one_of(RepeatMode::NAMES),
                ],
            ),
            Self::GetRepeat => ("Get the current repeat mode", vec![]),
            Self::ListPlaylists => ("List all user playlists", vec![]),
            Self::GetPlaylistTracks => (
                "List the tracks in a playlist",
                vec![
                    ParamSpec::string("playlist", "Playlist name").required(),
                    ParamSpec::number("limit", "Maximum number of tracks to return")
                        .default_value(json!(DEFAULT_PLAYLIST_TRACK_LIMIT)),
                ],
            ),
            Self::PlayPlaylist => (
                "Play a playlist by name",
                vec![
                    ParamSpec::string("playlist", "Playlist name").required(),
                    ParamSpec::boolean("shuffle", "Shuffle the playlist")
                        .default_value(json!(false)),
                ],
            ),
            Self::SearchLibrary => (
                "Search the music library",
                vec![
                    ParamSpec::string("query", "Search text").required(),
                    ParamSpec::string("searchType", "What to search for")
                        .one_of(SearchScope::NAMES)
                        .default_value(json!("all")),
                    ParamSpec::number("limit", "Maximum number of results")
                        .default_value(json!(DEFAULT_SEARCH_LIMIT)),
                ],
            ),
            Self::PlaySong => (
                "Play a song from the library",
                vec![
                    ParamSpec::string("song", "Song name").required(),
                    ParamSpec::string("artist", "Artist name to narrow the match"),
                ],
            ),
            Self::PlayAlbum => (
                "Play an album from the library",
                vec![
                    ParamSpec::string("album", "Album name").required(),
                    ParamSpec::string("artist", "Artist name to narrow the match"),
                ],
            ),
            Self::PlayArtist => (
                "Play songs by an artist",
                vec![
                    ParamSpec::string("artist", "Artist name").required(),
                    ParamSpec::boolean("shuffle", "Shuffle the artist's songs")
                        .default_value(json!(true)),
                ],
            ),
            Self::AddToQueue => (
                "Find a song to add to the Up Next queue",
                vec![
                    ParamSpec::string("song", "Song name").required(),
                    ParamSpec::string("artist", "Artist name to narrow the match"),
                ],
            ),
            Self::FavoriteTrack => ("Mark the current track as a favorite", vec![]),
            Self::DislikeTrack => ("Mark the current track as disliked", vec![]),
            Self::OpenMusic => ("Open the Apple Music app", vec![]),
            Self::QuitMusic => ("Quit the Apple Music app", vec![]),
        };

        ToolDefinition::new(self.name(), description, params)
    }
}

/// Repeat modes accepted by `set_repeat`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatMode {
    Off,
    One,
    All,
}

impl RepeatMode {
    pub const NAMES: &'static [&'static str] = &["off", "one", "all"];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "off" => Some(Self::Off),
            "one" => Some(Self::One),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::One => "one",
            Self::All => "all",
        }
    }
}

/// Scopes accepted by `search_library`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    Songs,
    Albums,
    Artists,
    All,
}

impl SearchScope {
    pub const NAMES: &'static [&'static str] = &["songs", "albums", "artists", "all"];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "songs" => Some(Self::Songs),
            "albums" => Some(Self::Albums),
            "artists" => Some(Self::Artists),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Songs => "songs",
            Self::Albums => "albums",
            Self::Artists => "artists",
            Self::All => "all",
        }
    }
}

/// JSON type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Number,
    String,
    Boolean,
}

impl ParamKind {
    fn json_type(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
        }
    }
}

/// One parameter of a tool schema
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub description: &'static str,
    pub required: bool,
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
    pub allowed: Option<&'static [&'static str]>,
    pub default: Option<Value>,
}

impl ParamSpec {
    fn new(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: false,
            minimum: None,
            maximum: None,
            allowed: None,
            default: None,
        }
    }

    pub fn number(name: &'static str, description: &'static str) -> Self {
        Self::new(name, ParamKind::Number, description)
    }

    pub fn string(name: &'static str, description: &'static str) -> Self {
        Self::new(name, ParamKind::String, description)
    }

    pub fn boolean(name: &'static str, description: &'static str) -> Self {
        Self::new(name, ParamKind::Boolean, description)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn range(mut self, minimum: i64, maximum: i64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    pub fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed = Some(allowed);
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    fn schema(&self) -> Value {
        let mut property = Map::new();
        property.insert("type".to_string(), json!(self.kind.json_type()));
        property.insert("description".to_string(), json!(self.description));
        if let Some(allowed) = self.allowed {
            property.insert("enum".to_string(), json!(allowed));
        }
        if let Some(minimum) = self.minimum {
            property.insert("minimum".to_string(), json!(minimum));
        }
        if let Some(maximum) = self.maximum {
            property.insert("maximum".to_string(), json!(maximum));
        }
        if let Some(default) = &self.default {
            property.insert("default".to_string(), default.clone());
        }
        Value::Object(property)
    }
}

/// Tool definition for MCP protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl ToolDefinition {
    fn new(name: &str, description: &str, params: Vec<ParamSpec>) -> Self {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for param in &params {
            properties.insert(param.name.to_string(), param.schema());
            if param.required {
                required.push(json!(param.name));
            }
        }

        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".to_string(), Value::Array(required));
        }

        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema: Value::Object(schema),
        }
    }
}

/// Result from a tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// Content types for tool results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl ToolResult {
    /// Create a successful text result
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: content.into(),
            }],
            is_error: None,
        }
    }

    /// Create an error result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: Some(true),
        }
    }

    /// Whether this result reports a failure
    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    /// The text body, concatenating every text block
    pub fn text_body(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                ToolContent::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Get all available tool definitions
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    Tool::ALL.iter().map(|tool| tool.definition()).collect()
}
