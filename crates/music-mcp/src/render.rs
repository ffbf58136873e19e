//! Result normalization
//!
//! Raw script output is never handed to the client directly: it is
//! parsed, labelled, and empty answers are spelled out.

use crate::handlers::ToolCall;
use crate::scripts::{NO_TRACK, NOT_FOUND};
use crate::tools::SearchScope;

const NO_TRACK_MESSAGE: &str = "No track is currently playing";

/// Split one tab-separated record, padding missing fields with ""
fn fields<const N: usize>(record: &str) -> [&str; N] {
    let mut out = [""; N];
    for (slot, field) in out.iter_mut().zip(record.split('\t')) {
        *slot = field.trim();
    }
    out
}

fn records(output: &str) -> impl Iterator<Item = &str> {
    output.lines().filter(|line| !line.trim().is_empty())
}

/// Parse a number printed by AppleScript, which may use a decimal comma
fn parse_seconds(raw: &str) -> Option<f64> {
    raw.trim().replace(',', ".").parse().ok()
}

/// Format seconds as `m:ss`
pub fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

fn format_time_raw(raw: &str) -> String {
    parse_seconds(raw).map(format_time).unwrap_or_else(|| raw.to_string())
}

/// Render a boolean-like token as on/off
pub fn on_off(raw: &str) -> &str {
    match raw.trim() {
        "true" => "on",
        "false" => "off",
        other => other,
    }
}

fn by_artist(subject: &str, artist: Option<&str>) -> String {
    match artist {
        Some(artist) => format!("{subject} by {artist}"),
        None => subject.to_string(),
    }
}

fn shuffled_suffix(shuffle: bool) -> &'static str {
    if shuffle { " (shuffled)" } else { "" }
}

fn song_line(index: usize, record: &str) -> String {
    let [name, artist, album] = fields::<3>(record);
    if album.is_empty() {
        format!("{}. {name} - {artist}", index + 1)
    } else {
        format!("{}. {name} - {artist} ({album})", index + 1)
    }
}

fn current_track(output: &str) -> String {
    let [name, artist, album, duration, position] = fields::<5>(output);
    format!(
        "Now playing: {name}\nArtist: {artist}\nAlbum: {album}\nPosition: {} / {}",
        format_time_raw(position),
        format_time_raw(duration)
    )
}

fn playlist_tracks(playlist: &str, output: &str) -> String {
    let lines: Vec<String> = records(output)
        .enumerate()
        .map(|(i, record)| song_line(i, record))
        .collect();
    if lines.is_empty() {
        return format!("Playlist \"{playlist}\" is empty");
    }
    format!("Tracks in {playlist}:\n{}", lines.join("\n"))
}

fn search_results(query: &str, scope: SearchScope, output: &str) -> String {
    let lines: Vec<String> = records(output)
        .enumerate()
        .map(|(i, record)| match scope {
            SearchScope::Songs | SearchScope::All => song_line(i, record),
            SearchScope::Albums => {
                let [album, album_artist] = fields::<2>(record);
                if album_artist.is_empty() {
                    format!("{}. {album}", i + 1)
                } else {
                    format!("{}. {album} - {album_artist}", i + 1)
                }
            }
            SearchScope::Artists => format!("{}. {}", i + 1, record.trim()),
        })
        .collect();

    if lines.is_empty() {
        return format!("No results found for \"{query}\"");
    }

    let (singular, plural) = match scope {
        SearchScope::Songs => ("song", "songs"),
        SearchScope::Albums => ("album", "albums"),
        SearchScope::Artists => ("artist", "artists"),
        SearchScope::All => ("result", "results"),
    };
    let noun = if lines.len() == 1 { singular } else { plural };
    format!(
        "Found {} {noun} for \"{query}\":\n{}",
        lines.len(),
        lines.join("\n")
    )
}

impl ToolCall {
    /// Turn raw script output into the text returned to the client
    pub fn render(&self, output: &str) -> String {
        let output = output.trim();
        match self {
            Self::Play => "Playback started".to_string(),
            Self::Pause => "Playback paused".to_string(),
            Self::PlayPause => "Playback toggled".to_string(),
            Self::Stop => "Playback stopped".to_string(),
            Self::NextTrack => "Skipped to next track".to_string(),
            Self::PreviousTrack => "Returned to previous track".to_string(),
            Self::GetCurrentTrack if output == NO_TRACK => NO_TRACK_MESSAGE.to_string(),
            Self::GetCurrentTrack => current_track(output),
            Self::GetPlayerState => format!("Player state: {output}"),
            Self::SetVolume { volume } => format!("Volume set to {volume}%"),
            Self::GetVolume => format!("Volume: {output}%"),
            Self::SetPosition { seconds } => format!("Position set to {seconds} seconds"),
            Self::GetPosition if output == NO_TRACK => NO_TRACK_MESSAGE.to_string(),
            Self::GetPosition => format!("Position: {}", format_time_raw(output)),
            Self::SetShuffle { enabled: true } => "Shuffle enabled".to_string(),
            Self::SetShuffle { enabled: false } => "Shuffle disabled".to_string(),
            Self::GetShuffle => format!("Shuffle: {}", on_off(output)),
            Self::SetRepeat { mode } => format!("Repeat mode set to {}", mode.as_str()),
            Self::GetRepeat => format!("Repeat mode: {output}"),
            Self::ListPlaylists => {
                let names: Vec<&str> = records(output).map(str::trim).collect();
                if names.is_empty() {
                    "No playlists found".to_string()
                } else {
                    format!("Playlists:\n{}", names.join("\n"))
                }
            }
            Self::GetPlaylistTracks { playlist, .. } | Self::PlayPlaylist { playlist, .. }
                if output == NOT_FOUND =>
            {
                format!("Playlist not found: {playlist}")
            }
            Self::GetPlaylistTracks { playlist, .. } => playlist_tracks(playlist, output),
            Self::PlayPlaylist { playlist, shuffle } => {
                format!("Playing playlist: {playlist}{}", shuffled_suffix(*shuffle))
            }
            Self::SearchLibrary { query, scope, .. } => search_results(query, *scope, output),
            Self::PlaySong { song, artist } | Self::AddToQueue { song, artist }
                if output == NOT_FOUND =>
            {
                format!("Song not found: {}", by_artist(song, artist.as_deref()))
            }
            Self::PlaySong { .. } => {
                let [name, artist] = fields::<2>(output);
                format!("Now playing: {name} by {artist}")
            }
            Self::AddToQueue { .. } => {
                let [name, artist] = fields::<2>(output);
                format!(
                    "Found \"{name}\" by {artist}. The Music app does not let scripts edit the Up Next queue; add it from the Music app."
                )
            }
            Self::PlayAlbum { album, artist } if output == NOT_FOUND => {
                format!("Album not found: {}", by_artist(album, artist.as_deref()))
            }
            Self::PlayAlbum { .. } => format!("Playing album: {output}"),
            Self::PlayArtist { artist, .. } if output == NOT_FOUND => {
                format!("No songs found by: {artist}")
            }
            Self::PlayArtist { artist, shuffle } => {
                format!("Playing songs by: {artist}{}", shuffled_suffix(*shuffle))
            }
            Self::FavoriteTrack | Self::DislikeTrack if output == NO_TRACK => {
                NO_TRACK_MESSAGE.to_string()
            }
            Self::FavoriteTrack => {
                let [name, artist] = fields::<2>(output);
                format!("Added to favorites: {name} by {artist}")
            }
            Self::DislikeTrack => {
                let [name, artist] = fields::<2>(output);
                format!("Marked as disliked: {name} by {artist}")
            }
            Self::OpenMusic => "Music app opened".to_string(),
            Self::QuitMusic => "Music app closed".to_string(),
        }
    }
}
