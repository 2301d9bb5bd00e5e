use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt},
};
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use crate::shared::AppState;

/// Open-ended ranges are served in slices of at most this many bytes
pub const OPEN_RANGE_CAP: u64 = 5 * 1024 * 1024;
const READ_CHUNK: usize = 128 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeRequest {
    /// No usable Range header; serve the whole file
    Full,
    /// Inclusive byte span
    Partial { start: u64, end: u64 },
    Unsatisfiable,
}

/// Resolves a `Range` header value against a file size.
/// Malformed or multi-range headers fall back to the full file.
pub fn parse_range(value: Option<&str>, size: u64) -> RangeRequest {
    let Some(spec) = value.and_then(|v| v.trim().strip_prefix("bytes=")) else {
        return RangeRequest::Full;
    };
    if spec.contains(',') {
        return RangeRequest::Full;
    }
    let Some((start, end)) = spec.split_once('-') else {
        return RangeRequest::Full;
    };
    let (start, end) = (start.trim(), end.trim());

    if start.is_empty() {
        // Suffix form: last N bytes
        return match end.parse::<u64>() {
            Ok(0) => RangeRequest::Unsatisfiable,
            Ok(_) if size == 0 => RangeRequest::Unsatisfiable,
            Ok(n) => RangeRequest::Partial {
                start: size.saturating_sub(n),
                end: size - 1,
            },
            Err(_) => RangeRequest::Full,
        };
    }

    let Ok(start) = start.parse::<u64>() else {
        return RangeRequest::Full;
    };
    if start >= size {
        return RangeRequest::Unsatisfiable;
    }

    let last = size - 1;
    let end = if end.is_empty() {
        (start + OPEN_RANGE_CAP - 1).min(last)
    } else {
        match end.parse::<u64>() {
            Ok(end) if end >= start => end.min(last),
            Ok(_) => return RangeRequest::Unsatisfiable,
            Err(_) => return RangeRequest::Full,
        }
    };

    RangeRequest::Partial { start, end }
}

/// GET|HEAD /stream-audio
pub async fn stream_audio(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let path = &state.config.music_file_path;

    let mut file = match File::open(path).await {
        Ok(file) => file,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Music file not found");
            return (StatusCode::NOT_FOUND, "Music file not found").into_response();
        }
    };
    let size = match file.metadata().await {
        Ok(metadata) => metadata.len(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to stat music file");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let range = parse_range(
        headers.get(header::RANGE).and_then(|v| v.to_str().ok()),
        size,
    );
    debug!(size = size, range = ?range, "Streaming audio");

    let builder = Response::builder()
        .header(header::CONTENT_TYPE, "audio/mpeg")
        .header(header::ACCEPT_RANGES, "bytes");

    let response = match range {
        RangeRequest::Full => builder
            .status(StatusCode::OK)
            .header(header::CONTENT_LENGTH, size)
            .body(Body::from_stream(ReaderStream::with_capacity(file, READ_CHUNK))),
        RangeRequest::Partial { start, end } => {
            if let Err(e) = file.seek(std::io::SeekFrom::Start(start)).await {
                warn!(error = %e, start = start, "Failed to seek music file");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
            let length = end - start + 1;
            builder
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_RANGE, format!("bytes {}-{}/{}", start, end, size))
                .header(header::CONTENT_LENGTH, length)
                .body(Body::from_stream(ReaderStream::with_capacity(
                    file.take(length),
                    READ_CHUNK,
                )))
        }
        RangeRequest::Unsatisfiable => builder
            .status(StatusCode::RANGE_NOT_SATISFIABLE)
            .header(header::CONTENT_RANGE, format!("bytes */{}", size))
            .body(Body::empty()),
    };

    response.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to build audio response");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })
}
