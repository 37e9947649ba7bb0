// SPDX-FileCopyrightText: 2026 The Boardsmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Tile/connection mutation helpers used by `apply_ops`.
/// Keeps `ops::mod` focused on public op types and orchestration.
type OpOutcome = Result<(), Refusal>;

fn tile_ref(tile_id: &TileId) -> EntityRef {
    EntityRef::Tile(tile_id.clone())
}

fn connection_ref(connection_id: &ConnectionId) -> EntityRef {
    EntityRef::Connection(connection_id.clone())
}

fn tile_not_found(tile_id: &TileId) -> ApplyError {
    ApplyError::NotFound {
        kind: ObjectKind::Tile,
        object_id: tile_id.to_string(),
    }
}

fn connection_not_found(connection_id: &ConnectionId) -> ApplyError {
    ApplyError::NotFound {
        kind: ObjectKind::Connection,
        object_id: connection_id.to_string(),
    }
}

/// Keeps a tile of `size` with its top-left at `position` inside the board.
fn clamp_into_board(position: Point, size: TileSize, config: &BoardConfig) -> Point {
    let (width, height) = config.tile_dims(size);
    Point::new(
        position.x.min(config.board_width - width).max(0.0),
        position.y.min(config.board_height - height).max(0.0),
    )
}

fn resource_total(board: &Board, category: &str) -> u64 {
    board
        .tiles()
        .iter()
        .map(|tile| u64::from(tile.resources().get(category)))
        .sum()
}

fn breakable_count(board: &Board) -> usize {
    board.connections().iter().filter(|connection| connection.breakable()).count()
}

fn find_duplicate(
    board: &Board,
    skip: Option<&ConnectionId>,
    from_tile_id: &TileId,
    to_tile_id: &TileId,
    kind: PathKind,
    config: &BoardConfig,
) -> bool {
    board
        .connections()
        .iter()
        .filter(|existing| Some(existing.connection_id()) != skip)
        .any(|existing| {
            existing.duplicates(from_tile_id, to_tile_id, kind, config.directional_kind)
        })
}

fn apply_tile_op(
    board: &mut Board,
    op: &TileOp,
    config: &BoardConfig,
    delta: &mut DeltaBuilder,
) -> Result<OpOutcome, ApplyError> {
    match op {
        TileOp::Add {
            tile_id,
            name,
            center,
        } => {
            if board.tile(tile_id).is_some() {
                return Err(ApplyError::AlreadyExists {
                    kind: ObjectKind::Tile,
                    object_id: tile_id.to_string(),
                });
            }
            let (width, height) = config.tile_dims(TileSize::Small);
            let corner = center.offset(-width / 2.0, -height / 2.0);
            let mut tile = Tile::new(
                tile_id.clone(),
                name.clone(),
                clamp_into_board(corner, TileSize::Small, config),
            );
            for category in config.resource_categories() {
                if resource_total(board, &category.name) < u64::from(category.quota) {
                    tile.resources_mut().set(category.name.clone(), 1);
                }
            }
            board.tiles_mut().push(tile);
            delta.record_added(tile_ref(tile_id));
            Ok(Ok(()))
        }
        TileOp::Remove { tile_id } => {
            if board.tile(tile_id).is_none() {
                return Err(tile_not_found(tile_id));
            }
            board.tiles_mut().retain(|tile| tile.tile_id() != tile_id);
            let mut removed = Vec::new();
            board.connections_mut().retain(|connection| {
                if connection.touches(tile_id) {
                    removed.push(connection.connection_id().clone());
                    false
                } else {
                    true
                }
            });
            for connection_id in &removed {
                delta.record_removed(connection_ref(connection_id));
            }
            delta.record_removed(tile_ref(tile_id));
            Ok(Ok(()))
        }
        TileOp::Move { tile_id, position } => {
            let tile = board.tile_mut(tile_id).ok_or_else(|| tile_not_found(tile_id))?;
            let clamped = clamp_into_board(*position, tile.size(), config);
            tile.set_position(clamped);
            delta.record_updated(tile_ref(tile_id));

            // Stale via-points would drag routes away from the moved tile.
            for connection in board.connections_mut() {
                if connection.touches(tile_id) && connection.via_point().is_some() {
                    connection.set_via_point(None);
                    delta.record_updated(connection_ref(connection.connection_id()));
                }
            }
            Ok(Ok(()))
        }
        TileOp::Rename { tile_id, name } => {
            let tile = board.tile_mut(tile_id).ok_or_else(|| tile_not_found(tile_id))?;
            tile.set_name(name.clone());
            delta.record_updated(tile_ref(tile_id));
            Ok(Ok(()))
        }
        TileOp::SetColor { tile_id, color } => {
            let tile = board.tile_mut(tile_id).ok_or_else(|| tile_not_found(tile_id))?;
            tile.set_color(*color);
            delta.record_updated(tile_ref(tile_id));
            Ok(Ok(()))
        }
        TileOp::SetSize { tile_id, size } => {
            let tile = board.tile_mut(tile_id).ok_or_else(|| tile_not_found(tile_id))?;
            tile.set_size(*size);
            tile.set_position(clamp_into_board(tile.position(), *size, config));
            delta.record_updated(tile_ref(tile_id));
            Ok(Ok(()))
        }
        TileOp::SetImage { tile_id, image } => {
            let tile = board.tile_mut(tile_id).ok_or_else(|| tile_not_found(tile_id))?;
            tile.set_image(image.clone());
            delta.record_updated(tile_ref(tile_id));
            Ok(Ok(()))
        }
        TileOp::SetSpawn { tile_id, spawn } => {
            if board.tile(tile_id).is_none() {
                return Err(tile_not_found(tile_id));
            }
            if let Some(slot) = spawn {
                if !config.is_valid_spawn(*slot) {
                    return Err(ApplyError::InvalidSpawn {
                        slot: *slot,
                        slots: config.spawn_slots,
                    });
                }
                for other in board.tiles_mut() {
                    if other.tile_id() != tile_id && other.spawn() == Some(*slot) {
                        other.set_spawn(None);
                        delta.record_updated(tile_ref(other.tile_id()));
                    }
                }
            }
            if let Some(tile) = board.tile_mut(tile_id) {
                tile.set_spawn(*spawn);
            }
            delta.record_updated(tile_ref(tile_id));
            Ok(Ok(()))
        }
        TileOp::AdjustResource {
            tile_id,
            category,
            delta: change,
        } => {
            let Some(quota) = config.quota_for(category) else {
                return Err(ApplyError::UnknownResource {
                    category: category.clone(),
                });
            };
            let total = resource_total(board, category);
            let tile = board.tile_mut(tile_id).ok_or_else(|| tile_not_found(tile_id))?;
            let underflow = || Refusal::ResourceUnderflow {
                category: category.clone(),
            };
            let quota_reached = || Refusal::ResourceQuotaReached {
                category: category.clone(),
                quota,
            };

            let Some(next) = i64::from(tile.resources().get(category)).checked_add(*change) else {
                return Ok(Err(if *change > 0 { quota_reached() } else { underflow() }));
            };
            if next < 0 {
                return Ok(Err(underflow()));
            }
            if *change > 0 {
                let over_quota = i64::try_from(total)
                    .ok()
                    .and_then(|total| total.checked_add(*change))
                    .map_or(true, |sum| sum > i64::from(quota));
                if over_quota {
                    return Ok(Err(quota_reached()));
                }
            }
            let next = u32::try_from(next).unwrap_or(u32::MAX);
            tile.resources_mut().set(category.clone(), next);
            delta.record_updated(tile_ref(tile_id));
            Ok(Ok(()))
        }
    }
}

fn apply_connection_op(
    board: &mut Board,
    op: &ConnectionOp,
    config: &BoardConfig,
    delta: &mut DeltaBuilder,
) -> Result<OpOutcome, ApplyError> {
    match op {
        ConnectionOp::Add {
            connection_id,
            from_tile_id,
            to_tile_id,
            kind,
        } => {
            if board.connection(connection_id).is_some() {
                return Err(ApplyError::AlreadyExists {
                    kind: ObjectKind::Connection,
                    object_id: connection_id.to_string(),
                });
            }
            for tile_id in [from_tile_id, to_tile_id] {
                if board.tile(tile_id).is_none() {
                    return Err(tile_not_found(tile_id));
                }
            }
            if from_tile_id == to_tile_id {
                return Ok(Err(Refusal::SelfConnection {
                    tile_id: from_tile_id.clone(),
                }));
            }
            if find_duplicate(board, None, from_tile_id, to_tile_id, *kind, config) {
                return Ok(Err(Refusal::DuplicateConnection {
                    from_tile_id: from_tile_id.clone(),
                    to_tile_id: to_tile_id.clone(),
                    kind: *kind,
                }));
            }
            board.connections_mut().push(Connection::new(
                connection_id.clone(),
                from_tile_id.clone(),
                to_tile_id.clone(),
                *kind,
            ));
            delta.record_added(connection_ref(connection_id));
            Ok(Ok(()))
        }
        ConnectionOp::Remove { connection_id } => {
            if board.connection(connection_id).is_none() {
                return Err(connection_not_found(connection_id));
            }
            board
                .connections_mut()
                .retain(|connection| connection.connection_id() != connection_id);
            delta.record_removed(connection_ref(connection_id));
            Ok(Ok(()))
        }
        ConnectionOp::SetKind {
            connection_id,
            kind,
        } => {
            let existing = board
                .connection(connection_id)
                .ok_or_else(|| connection_not_found(connection_id))?;
            let (from_tile_id, to_tile_id) =
                (existing.from_tile_id().clone(), existing.to_tile_id().clone());
            if find_duplicate(board, Some(connection_id), &from_tile_id, &to_tile_id, *kind, config)
            {
                return Ok(Err(Refusal::DuplicateConnection {
                    from_tile_id,
                    to_tile_id,
                    kind: *kind,
                }));
            }
            if let Some(connection) = board.connection_mut(connection_id) {
                connection.set_kind(*kind);
            }
            delta.record_updated(connection_ref(connection_id));
            Ok(Ok(()))
        }
        ConnectionOp::ToggleBreakable { connection_id } => {
            let placed = breakable_count(board);
            let connection = board
                .connection_mut(connection_id)
                .ok_or_else(|| connection_not_found(connection_id))?;
            let enable = !connection.breakable();
            if enable && placed >= config.breakable_quota {
                return Ok(Err(Refusal::BreakableQuotaReached {
                    quota: config.breakable_quota,
                }));
            }
            connection.set_breakable(enable);
            delta.record_updated(connection_ref(connection_id));
            Ok(Ok(()))
        }
        ConnectionOp::SetViaPoint {
            connection_id,
            via_point,
        } => {
            let connection = board
                .connection_mut(connection_id)
                .ok_or_else(|| connection_not_found(connection_id))?;
            connection.set_via_point(*via_point);
            delta.record_updated(connection_ref(connection_id));
            Ok(Ok(()))
        }
        ConnectionOp::SetExitPort {
            connection_id,
            port,
        } => set_port(board, connection_id, PortEnd::Exit, *port, delta),
        ConnectionOp::SetEntryPort {
            connection_id,
            port,
        } => set_port(board, connection_id, PortEnd::Entry, *port, delta),
        ConnectionOp::DragPort {
            connection_id,
            end,
            point,
        } => {
            let connection = board
                .connection(connection_id)
                .ok_or_else(|| connection_not_found(connection_id))?;
            let tile_id = connection.tile_at(*end);
            let tile = board.tile(tile_id).ok_or_else(|| tile_not_found(tile_id))?;
            let frame = TileFrame::of(tile, config);
            let hit = closest_perimeter_point(&frame, *point, config.port_margin);
            set_port(board, connection_id, *end, Some(hit.port()), delta)
        }
        ConnectionOp::ResetRoute { connection_id } => {
            let connection = board
                .connection_mut(connection_id)
                .ok_or_else(|| connection_not_found(connection_id))?;
            connection.set_exit_port(None);
            connection.set_entry_port(None);
            connection.set_via_point(None);
            delta.record_updated(connection_ref(connection_id));
            Ok(Ok(()))
        }
    }
}

fn set_port(
    board: &mut Board,
    connection_id: &ConnectionId,
    end: PortEnd,
    port: Option<PortPosition>,
    delta: &mut DeltaBuilder,
) -> Result<OpOutcome, ApplyError> {
    let connection = board
        .connection_mut(connection_id)
        .ok_or_else(|| connection_not_found(connection_id))?;
    connection.set_port(end, port);
    delta.record_updated(connection_ref(connection_id));
    Ok(Ok(()))
}
