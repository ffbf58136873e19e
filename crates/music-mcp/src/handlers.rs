//! MCP Tool Handlers
//!
//! Turns a `tools/call` request into a typed [`ToolCall`], runs its
//! script through the bridge and renders the reply. [`Dispatcher::invoke`]
//! never fails: every error, and any panic along the way, comes back as a
//! [`ToolResult`] with `isError` set.

use std::panic::{self, AssertUnwindSafe};

use music_bridge::ScriptExecutor;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::tools::{
    DEFAULT_PLAYLIST_TRACK_LIMIT, DEFAULT_SEARCH_LIMIT, RepeatMode, SearchScope, Tool, ToolResult,
};
use crate::{Error, Result};

/// A tool invocation with validated, defaulted arguments
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    Play,
    Pause,
    PlayPause,
    Stop,
    NextTrack,
    PreviousTrack,
    GetCurrentTrack,
    GetPlayerState,
    SetVolume { volume: u8 },
    GetVolume,
    SetPosition { seconds: f64 },
    GetPosition,
    SetShuffle { enabled: bool },
    GetShuffle,
    SetRepeat { mode: RepeatMode },
    GetRepeat,
    ListPlaylists,
    GetPlaylistTracks { playlist: String, limit: usize },
    PlayPlaylist { playlist: String, shuffle: bool },
    SearchLibrary { query: String, scope: SearchScope, limit: usize },
    PlaySong { song: String, artist: Option<String> },
    PlayAlbum { album: String, artist: Option<String> },
    PlayArtist { artist: String, shuffle: bool },
    AddToQueue { song: String, artist: Option<String> },
    FavoriteTrack,
    DislikeTrack,
    OpenMusic,
    QuitMusic,
}

#[derive(Debug, Deserialize)]
struct VolumeArgs {
    volume: f64,
}

#[derive(Debug, Deserialize)]
struct PositionArgs {
    position: f64,
}

#[derive(Debug, Deserialize)]
struct ShuffleArgs {
    enabled: bool,
}

#[derive(Debug, Deserialize)]
struct RepeatArgs {
    mode: String,
}

#[derive(Debug, Deserialize)]
struct PlaylistTracksArgs {
    playlist: String,
    #[serde(default)]
    limit: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct PlayPlaylistArgs {
    playlist: String,
    #[serde(default)]
    shuffle: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchArgs {
    query: String,
    #[serde(default)]
    search_type: Option<String>,
    #[serde(default)]
    limit: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SongArgs {
    song: String,
    #[serde(default)]
    artist: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AlbumArgs {
    album: String,
    #[serde(default)]
    artist: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArtistArgs {
    artist: String,
    #[serde(default)]
    shuffle: Option<bool>,
}

/// Deserialize tool arguments, treating a missing object as empty
fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    let arguments = match arguments {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    serde_json::from_value(arguments)
        .map_err(|e| Error::InvalidArgument(format!("Invalid arguments: {e}")))
}

/// Clamp a requested volume into 0..=100
pub fn clamp_volume(volume: f64) -> u8 {
    volume.clamp(0.0, 100.0).round() as u8
}

/// Apply a declared default to a result cap; caps below one become one
fn result_limit(limit: Option<f64>, default: usize) -> usize {
    match limit {
        Some(limit) if limit >= 1.0 => limit.floor() as usize,
        Some(_) => 1,
        None => default,
    }
}

/// An optional filter counts as absent when blank
fn filter(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ToolCall {
    /// Validate and default `arguments` for `tool`.
    ///
    /// Tools without parameters ignore whatever arguments were sent.
    pub fn parse(tool: Tool, arguments: Value) -> Result<Self> {
        let call = match tool {
            Tool::Play => Self::Play,
            Tool::Pause => Self::Pause,
            Tool::PlayPause => Self::PlayPause,
            Tool::Stop => Self::Stop,
            Tool::NextTrack => Self::NextTrack,
            Tool::PreviousTrack => Self::PreviousTrack,
            Tool::GetCurrentTrack => Self::GetCurrentTrack,
            Tool::GetPlayerState => Self::GetPlayerState,
            Tool::SetVolume => {
                let args: VolumeArgs = parse_args(arguments)?;
                Self::SetVolume {
                    volume: clamp_volume(args.volume),
                }
            }
            Tool::GetVolume => Self::GetVolume,
            Tool::SetPosition => {
                let args: PositionArgs = parse_args(arguments)?;
                Self::SetPosition {
                    seconds: args.position,
                }
            }
            Tool::GetPosition => Self::GetPosition,
            Tool::SetShuffle => {
                let args: ShuffleArgs = parse_args(arguments)?;
                Self::SetShuffle {
                    enabled: args.enabled,
                }
            }
            Tool::GetShuffle => Self::GetShuffle,
            Tool::SetRepeat => {
                let args: RepeatArgs = parse_args(arguments)?;
                let mode = RepeatMode::parse(&args.mode).ok_or_else(|| {
                    Error::InvalidArgument(format!(
                        "Invalid repeat mode: {}. Expected one of: {}",
                        args.mode,
                        RepeatMode::NAMES.join(", ")
                    ))
                })?;
                Self::SetRepeat { mode }
            }
            Tool::GetRepeat => Self::GetRepeat,
            Tool::ListPlaylists => Self::ListPlaylists,
            Tool::GetPlaylistTracks => {
                let args: PlaylistTracksArgs = parse_args(arguments)?;
                Self::GetPlaylistTracks {
                    playlist: args.playlist,
                    limit: result_limit(args.limit, DEFAULT_PLAYLIST_TRACK_LIMIT),
                }
            }
            Tool::PlayPlaylist => {
                let args: PlayPlaylistArgs = parse_args(arguments)?;
                Self::PlayPlaylist {
                    playlist: args.playlist,
                    shuffle: args.shuffle.unwrap_or(false),
                }
            }
            Tool::SearchLibrary => {
                let args: SearchArgs = parse_args(arguments)?;
                let scope = match args.search_type.as_deref() {
                    None => SearchScope::All,
                    Some(name) => SearchScope::parse(name)
                        .ok_or_else(|| Error::InvalidArgument("Invalid search type".to_string()))?,
                };
                Self::SearchLibrary {
                    query: args.query,
                    scope,
                    limit: result_limit(args.limit, DEFAULT_SEARCH_LIMIT),
                }
            }
            Tool::PlaySong => {
                let args: SongArgs = parse_args(arguments)?;
                Self::PlaySong {
                    song: args.song,
                    artist: filter(args.artist),
                }
            }
            Tool::PlayAlbum => {
                let args: AlbumArgs = parse_args(arguments)?;
                Self::PlayAlbum {
                    album: args.album,
                    artist: filter(args.artist),
                }
            }
            Tool::PlayArtist => {
                let args: ArtistArgs = parse_args(arguments)?;
                Self::PlayArtist {
                    artist: args.artist,
                    shuffle: args.shuffle.unwrap_or(true),
                }
            }
            Tool::AddToQueue => {
                let args: SongArgs = parse_args(arguments)?;
                Self::AddToQueue {
                    song: args.song,
                    artist: filter(args.artist),
                }
            }
            Tool::FavoriteTrack => Self::FavoriteTrack,
            Tool::DislikeTrack => Self::DislikeTrack,
            Tool::OpenMusic => Self::OpenMusic,
            Tool::QuitMusic => Self::QuitMusic,
        };
        Ok(call)
    }

    /// The tool this call belongs to
    pub fn tool(&self) -> Tool {
        match self {
            Self::Play => Tool::Play,
            Self::Pause => Tool::Pause,
            Self::PlayPause => Tool::PlayPause,
            Self::Stop => Tool::Stop,
            Self::NextTrack => Tool::NextTrack,
            Self::PreviousTrack => Tool::PreviousTrack,
            Self::GetCurrentTrack => Tool::GetCurrentTrack,
            Self::GetPlayerState => Tool::GetPlayerState,
            Self::SetVolume { .. } => Tool::SetVolume,
            Self::GetVolume => Tool::GetVolume,
            Self::SetPosition { .. } => Tool::SetPosition,
            Self::GetPosition => Tool::GetPosition,
            Self::SetShuffle { .. } => Tool::SetShuffle,
            Self::GetShuffle => Tool::GetShuffle,
            Self::SetRepeat { .. } => Tool::SetRepeat,
            Self::GetRepeat => Tool::GetRepeat,
            Self::ListPlaylists => Tool::ListPlaylists,
            Self::GetPlaylistTracks { .. } => Tool::GetPlaylistTracks,
            Self::PlayPlaylist { .. } => Tool::PlayPlaylist,
            Self::SearchLibrary { .. } => Tool::SearchLibrary,
            Self::PlaySong { .. } => Tool::PlaySong,
            Self::PlayAlbum { .. } => Tool::PlayAlbum,
            Self::PlayArtist { .. } => Tool::PlayArtist,
            Self::AddToQueue { .. } => Tool::AddToQueue,
            Self::FavoriteTrack => Tool::FavoriteTrack,
            Self::DislikeTrack => Tool::DislikeTrack,
            Self::OpenMusic => Tool::OpenMusic,
            Self::QuitMusic => Tool::QuitMusic,
        }
    }
}

/// Runs tool calls against the Music app through a [`ScriptExecutor`]
pub struct Dispatcher<E> {
    executor: E,
}

impl<E: ScriptExecutor> Dispatcher<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Invoke `tool_name` with `arguments`, always producing a result.
    pub fn invoke(&self, tool_name: &str, arguments: Value) -> ToolResult {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.handle_tool_call(tool_name, arguments)
        }));

        match outcome {
            Ok(Ok(text)) => ToolResult::text(text),
            Ok(Err(e)) => {
                tracing::warn!(tool = tool_name, error = %e, "Tool call failed");
                ToolResult::error(e.tool_message())
            }
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unexpected failure".to_string());
                tracing::error!(tool = tool_name, %message, "Tool call panicked");
                ToolResult::error(format!("Error: {message}"))
            }
        }
    }

    /// Resolve, validate, run and render a single call
    pub fn handle_tool_call(&self, tool_name: &str, arguments: Value) -> Result<String> {
        let tool =
            Tool::from_name(tool_name).ok_or_else(|| Error::UnknownTool(tool_name.to_string()))?;
        let call = ToolCall::parse(tool, arguments)?;

        tracing::info!(tool = tool.name(), "Dispatching tool call");
        let output = self.executor.run(&call.script())?;
        Ok(call.render(&output))
    }
}
