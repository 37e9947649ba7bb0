// SPDX-FileCopyrightText: 2026 The Boardsmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base64 data URLs, the in-memory representation of tile and background images.

use std::sync::OnceLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use regex::Regex;

const DEFAULT_EXTENSION: &str = "png";
const FALLBACK_MIME: &str = "application/octet-stream";

static DATA_URL: OnceLock<Option<Regex>> = OnceLock::new();

fn data_url_regex() -> Option<&'static Regex> {
    DATA_URL
        .get_or_init(|| Regex::new(r"^data:(.+);base64,(.+)$").ok())
        .as_ref()
}

/// Borrowed view of a `data:<mime>;base64,<payload>` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUrl<'a> {
    mime: &'a str,
    payload: &'a str,
}

impl<'a> DataUrl<'a> {
    pub fn parse(value: &'a str) -> Option<Self> {
        let captures = data_url_regex()?.captures(value)?;
        let mime = captures.get(1)?.as_str();
        let payload = captures.get(2)?.as_str();
        Some(Self { mime, payload })
    }

    pub fn mime(&self) -> &'a str {
        self.mime
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(self.payload)
    }

    /// File extension for the image, from the MIME subtype.
    ///
    /// Only plain `image/<word>` types are honored; anything else is stored as png.
    pub fn extension(&self) -> String {
        extension_for_mime(self.mime)
    }
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

fn extension_for_mime(mime: &str) -> String {
    let Some(subtype) = mime.strip_prefix("image/") else {
        return DEFAULT_EXTENSION.to_owned();
    };
    let is_word = !subtype.is_empty()
        && subtype
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
    if !is_word {
        return DEFAULT_EXTENSION.to_owned();
    }

    let subtype = subtype.to_ascii_lowercase();
    if subtype == "jpeg" {
        "jpg".to_owned()
    } else {
        subtype
    }
}

pub fn mime_for_extension(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => FALLBACK_MIME,
    }
}
