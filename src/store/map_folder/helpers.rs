// SPDX-FileCopyrightText: 2026 The Boardsmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// `manifest.json`. Field names follow the archive format; older files used
/// `locations`, `markers`, `spawn` and `hasDoor`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct ManifestJson {
    version: u32,
    #[serde(default, alias = "locations")]
    rooms: Vec<RoomJson>,
    #[serde(default)]
    paths: Vec<PathJson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    background_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct RoomJson {
    id: String,
    #[serde(default)]
    name: String,
    x: f64,
    y: f64,
    #[serde(default, alias = "markers")]
    prop_tiles: std::collections::BTreeMap<String, u32>,
    #[serde(default, alias = "spawn")]
    initial_placement: Option<u8>,
    #[serde(default)]
    color: TileColor,
    #[serde(default)]
    size: TileSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct PathJson {
    id: String,
    from: String,
    to: String,
    color: PathKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exit_port: Option<PortJson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    entry_port: Option<PortJson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    via_point: Option<PointJson>,
    #[serde(default, alias = "hasDoor", skip_serializing_if = "is_false")]
    has_breakable_wall: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
struct PortJson {
    side: Side,
    offset: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
struct PointJson {
    x: f64,
    y: f64,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn room_to_json(tile: &Tile, image: Option<String>) -> RoomJson {
    RoomJson {
        id: tile.tile_id().to_string(),
        name: tile.name().to_owned(),
        x: tile.position().x,
        y: tile.position().y,
        prop_tiles: tile
            .resources()
            .iter()
            .map(|(category, count)| (category.to_owned(), count))
            .collect(),
        initial_placement: tile.spawn().map(SpawnSlot::value),
        color: tile.color(),
        size: tile.size(),
        image,
    }
}

fn port_to_json(port: PortPosition) -> PortJson {
    PortJson {
        side: port.side(),
        offset: port.offset(),
    }
}

fn path_to_json(connection: &Connection) -> PathJson {
    PathJson {
        id: connection.connection_id().to_string(),
        from: connection.from_tile_id().to_string(),
        to: connection.to_tile_id().to_string(),
        color: connection.kind(),
        exit_port: connection.exit_port().map(port_to_json),
        entry_port: connection.entry_port().map(port_to_json),
        via_point: connection
            .via_point()
            .map(|point| PointJson { x: point.x, y: point.y }),
        has_breakable_wall: connection.breakable(),
    }
}

fn parse_tile_id(field: &'static str, value: String) -> Result<TileId, StoreError> {
    TileId::new(value.clone()).map_err(|source| StoreError::InvalidId {
        field,
        value,
        source: Box::new(source),
    })
}

fn board_from_manifest(folder: &Path, manifest: ManifestJson) -> Result<Board, StoreError> {
    let mut tiles = Vec::with_capacity(manifest.rooms.len());
    for room in manifest.rooms {
        let tile_id = parse_tile_id("rooms[].id", room.id)?;
        let image = match room.image {
            Some(image) => read_image(folder, "rooms[].image", &image)?,
            None => None,
        };

        let mut tile = Tile::new(tile_id, room.name, Point::new(room.x, room.y));
        tile.set_size(room.size);
        tile.set_color(room.color);
        tile.set_spawn(room.initial_placement.map(SpawnSlot::new));
        *tile.resources_mut() = room.prop_tiles.into_iter().collect::<ResourceCounts>();
        tile.set_image(image);
        tiles.push(tile);
    }

    let mut connections = Vec::with_capacity(manifest.paths.len());
    for path in manifest.paths {
        let connection_id =
            ConnectionId::new(path.id.clone()).map_err(|source| StoreError::InvalidId {
                field: "paths[].id",
                value: path.id,
                source: Box::new(source),
            })?;
        let from = parse_tile_id("paths[].from", path.from)?;
        let to = parse_tile_id("paths[].to", path.to)?;

        let mut connection = Connection::new(connection_id, from, to, path.color);
        connection.set_exit_port(
            path.exit_port
                .map(|port| PortPosition::new(port.side, port.offset)),
        );
        connection.set_entry_port(
            path.entry_port
                .map(|port| PortPosition::new(port.side, port.offset)),
        );
        connection.set_via_point(path.via_point.map(|point| Point::new(point.x, point.y)));
        connection.set_breakable(path.has_breakable_wall);
        connections.push(connection);
    }

    let background_image = match manifest.background_image {
        Some(image) => read_image(folder, "backgroundImage", &image)?,
        None => None,
    };

    let mut board = Board::from_parts(tiles, connections);
    board.set_background_image(background_image);
    Ok(board)
}

/// Loads an image referenced by the manifest as a data URL.
///
/// An unreadable file is not fatal: the reference is dropped and logged.
fn read_image(
    folder: &Path,
    field: &'static str,
    relative: &str,
) -> Result<Option<String>, StoreError> {
    let relative = Path::new(relative);
    validate_relative_path(field, relative)?;

    let path = folder.join(relative);
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(err) => {
            log::warn!("skipping unreadable image {}: {err}", path.display());
            return Ok(None);
        }
    };

    let extension = relative
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Some(encode_data_url(mime_for_extension(&extension), &bytes)))
}

/// Hex-encodes ids that are not portable file names (reserved characters,
/// Windows device names, trailing dots or spaces). Encoded stems start with `~`.
fn encode_persisted_id_segment(segment: &str) -> String {
    if is_portable_file_stem(segment) {
        return segment.to_owned();
    }

    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(1 + segment.len().saturating_mul(2));
    out.push('~');
    for &b in segment.as_bytes() {
        out.push(HEX[(b >> 4) as usize] as char);
        out.push(HEX[(b & 0x0f) as usize] as char);
    }
    out
}

fn is_portable_file_stem(segment: &str) -> bool {
    if segment.is_empty() || segment.starts_with('~') {
        return false;
    }
    if segment.ends_with([' ', '.']) {
        return false;
    }

    let has_reserved_char = segment.chars().any(|ch| {
        matches!(ch, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*')
            || ch <= '\u{1f}'
            || ch == '\u{7f}'
    });
    if has_reserved_char {
        return false;
    }

    let base = segment.split('.').next().unwrap_or(segment);
    !is_windows_device_name(base)
}

fn is_windows_device_name(base: &str) -> bool {
    let base = base.to_ascii_uppercase();
    if matches!(base.as_str(), "CON" | "PRN" | "AUX" | "NUL") {
        return true;
    }
    ["COM", "LPT"].iter().any(|prefix| {
        base.strip_prefix(prefix)
            .map_or(false, |num| matches!(num.as_bytes(), [b'1'..=b'9']))
    })
}

fn validate_relative_path(field: &'static str, path: &Path) -> Result<(), StoreError> {
    let invalid = || StoreError::InvalidRelativePath {
        field,
        value: path.to_path_buf(),
    };

    if path.as_os_str().is_empty() || path.is_absolute() {
        return Err(invalid());
    }

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::ParentDir => {
                return Err(invalid());
            }
            Component::CurDir | Component::Normal(_) => {}
        }
    }

    Ok(())
}

fn to_relative_path(
    folder: &Path,
    path: &Path,
    field: &'static str,
) -> Result<PathBuf, StoreError> {
    let relative = if path.is_absolute() {
        path.strip_prefix(folder)
            .map(PathBuf::from)
            .map_err(|_| StoreError::PathOutsideFolder {
                folder: folder.to_path_buf(),
                path: path.to_path_buf(),
            })?
    } else {
        path.to_path_buf()
    };

    validate_relative_path(field, &relative)?;
    Ok(relative)
}

fn create_dir_all_safe(folder: &Path, relative: &Path) -> Result<(), StoreError> {
    if relative.as_os_str().is_empty() {
        return Ok(());
    }

    validate_relative_path("dir", relative)?;

    let mut current = folder.to_path_buf();
    for component in relative.components() {
        let Component::Normal(part) = component else {
            continue;
        };

        current.push(part);

        match fs::symlink_metadata(&current) {
            Ok(md) => {
                if md.file_type().is_symlink() {
                    return Err(StoreError::SymlinkRefused { path: current });
                }
                if !md.is_dir() {
                    return Err(StoreError::Io {
                        path: current,
                        source: io::Error::new(io::ErrorKind::AlreadyExists, "expected directory"),
                    });
                }
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                fs::create_dir(&current).map_err(|source| StoreError::Io {
                    path: current.clone(),
                    source,
                })?;
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: current,
                    source,
                })
            }
        }
    }

    Ok(())
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

/// Writes `contents` to `path` (inside `folder`) via a sibling temp file and a rename.
fn write_atomic_in_folder(
    folder: &Path,
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), StoreError> {
    fs::create_dir_all(folder).map_err(|source| StoreError::Io {
        path: folder.to_path_buf(),
        source,
    })?;

    let relative = to_relative_path(folder, path, "path")?;
    let parent_rel = relative.parent().unwrap_or_else(|| Path::new(""));
    create_dir_all_safe(folder, parent_rel)?;

    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let (Some(parent), Some(file_name)) = (path.parent(), path.file_name()) else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::Other, "path has no parent or file name"),
        });
    };

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".boardsmith.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;

    file.write_all(contents).map_err(|source| StoreError::Io {
        path: tmp_path.clone(),
        source,
    })?;

    if durability == WriteDurability::Durable {
        file.sync_all().map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
    }
    drop(file);

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
            dir.sync_all().map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}
