// SPDX-FileCopyrightText: 2026 The Boardsmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rstest::{fixture, rstest};

use super::{manifest_schema, MapFolder, StoreError, WriteDurability};
use crate::config::BoardConfig;
use crate::model::fixtures::{cid, tid, tile_at, valid_board};
use crate::model::{Board, Point, PortPosition, Side, SpawnSlot, TileSize};
use crate::ops::Adjustment;
use crate::store::encode_data_url;

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: std::path::PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("boardsmith-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

struct MapFolderTestCtx {
    _tmp: TempDir,
    map_dir: std::path::PathBuf,
    folder: MapFolder,
    config: BoardConfig,
}

impl MapFolderTestCtx {
    fn new(prefix: &str) -> Self {
        let tmp = TempDir::new(prefix);
        let map_dir = tmp.path().join("my-map");
        let folder = MapFolder::new(&map_dir);
        Self {
            _tmp: tmp,
            map_dir,
            folder,
            config: BoardConfig::default(),
        }
    }

    fn write_manifest(&self, contents: &str) {
        std::fs::create_dir_all(&self.map_dir).unwrap();
        std::fs::write(self.folder.manifest_path(), contents).unwrap();
    }
}

#[fixture]
fn ctx() -> MapFolderTestCtx {
    MapFolderTestCtx::new("map-folder")
}

fn decorated_board(config: &BoardConfig) -> Board {
    let mut board = valid_board(config);

    let tile = board.tile_mut(&tid("t0")).unwrap();
    tile.set_image(Some(encode_data_url("image/png", b"\x89PNG\r\n\x1a\nroom")));
    tile.set_size(TileSize::Large);

    let connection = board.connection_mut(&cid("p1")).unwrap();
    connection.set_exit_port(Some(PortPosition::new(Side::Right, 0.25)));
    connection.set_entry_port(Some(PortPosition::new(Side::Left, 0.75)));
    connection.set_via_point(Some(Point::new(1500.5, 900.0)));

    board.set_background_image(Some(encode_data_url("image/jpeg", b"\xff\xd8\xffbackground")));
    board
}

#[rstest]
fn save_then_load_preserves_the_board(ctx: MapFolderTestCtx) {
    let board = decorated_board(&ctx.config);

    ctx.folder.save_board(&board).unwrap();
    let loaded = ctx.folder.load_board(&ctx.config).unwrap();

    assert!(loaded.adjustments.is_empty(), "{:?}", loaded.adjustments);
    assert_eq!(loaded.board, board);
}

#[rstest]
fn manifest_uses_archive_field_names(ctx: MapFolderTestCtx) {
    let board = decorated_board(&ctx.config);
    ctx.folder.save_board(&board).unwrap();

    let manifest_str = std::fs::read_to_string(ctx.folder.manifest_path()).unwrap();
    let manifest: serde_json::Value = serde_json::from_str(&manifest_str).unwrap();

    assert_eq!(manifest["version"], 1);
    assert_eq!(manifest["backgroundImage"], "background.jpg");

    let room = &manifest["rooms"][0];
    assert_eq!(room["id"], "t0");
    assert_eq!(room["image"], "rooms/t0.png");
    assert_eq!(room["initialPlacement"], 0);
    assert_eq!(room["size"], "large");
    assert!(room["propTiles"]["objective"].is_u64());
    assert!(manifest["rooms"][1].get("image").is_none());

    let path = &manifest["paths"][1];
    assert_eq!(path["color"], "blue");
    assert_eq!(path["exitPort"]["side"], "right");
    assert_eq!(path["entryPort"]["offset"], 0.75);
    assert_eq!(path["viaPoint"]["x"], 1500.5);
    assert_eq!(path["hasBreakableWall"], true);
    assert!(manifest["paths"][5].get("hasBreakableWall").is_none());

    assert!(ctx.map_dir.join("rooms/t0.png").is_file());
    assert!(ctx.map_dir.join("background.jpg").is_file());
}

#[rstest]
fn save_leaves_no_temp_files(ctx: MapFolderTestCtx) {
    let folder = ctx.folder.clone().with_durability(WriteDurability::Durable);
    folder.save_board(&decorated_board(&ctx.config)).unwrap();
    folder.save_board(&decorated_board(&ctx.config)).unwrap();

    for dir in [ctx.map_dir.clone(), ctx.map_dir.join("rooms")] {
        for entry in std::fs::read_dir(&dir).unwrap() {
            let name = entry.unwrap().file_name().to_string_lossy().into_owned();
            assert!(!name.starts_with(".boardsmith.tmp."), "leftover {name}");
        }
    }
}

#[rstest]
fn load_accepts_legacy_field_names(ctx: MapFolderTestCtx) {
    ctx.write_manifest(
        r#"{
  "version": 1,
  "locations": [
    {
      "id": "a", "name": "Hall", "x": 10, "y": 20,
      "markers": { "objective": 2 }, "spawn": 3, "color": "teal"
    },
    { "id": "b", "name": "Cellar", "x": 2000, "y": 20 }
  ],
  "paths": [
    { "id": "p1", "from": "a", "to": "b", "color": "red", "hasDoor": true }
  ]
}"#,
    );

    let loaded = ctx.folder.load_board(&ctx.config).unwrap();
    assert!(loaded.adjustments.is_empty());

    let hall = loaded.board.tile(&tid("a")).unwrap();
    assert_eq!(hall.name(), "Hall");
    assert_eq!(hall.resources().get("objective"), 2);
    assert_eq!(hall.spawn(), Some(SpawnSlot::new(3)));
    assert_eq!(hall.size(), TileSize::Small);

    let cellar = loaded.board.tile(&tid("b")).unwrap();
    assert_eq!(cellar.spawn(), None);
    assert_eq!(cellar.resources().total(), 0);

    assert!(loaded.board.connection(&cid("p1")).unwrap().breakable());
}

#[rstest]
fn load_rejects_newer_versions(ctx: MapFolderTestCtx) {
    ctx.write_manifest(r#"{ "version": 2, "rooms": [], "paths": [] }"#);

    let err = ctx.folder.load_board(&ctx.config).unwrap_err();
    match err {
        StoreError::UnsupportedVersion { version, .. } => assert_eq!(version, 2),
        other => panic!("expected UnsupportedVersion, got: {other:?}"),
    }
}

#[rstest]
#[case("../escape.png")]
#[case("/etc/passwd")]
fn load_rejects_image_paths_outside_the_folder(ctx: MapFolderTestCtx, #[case] image: &str) {
    let manifest = serde_json::json!({
        "version": 1,
        "rooms": [{ "id": "a", "name": "A", "x": 0, "y": 0, "image": image }],
        "paths": [],
    });
    ctx.write_manifest(&manifest.to_string());

    let err = ctx.folder.load_board(&ctx.config).unwrap_err();
    match err {
        StoreError::InvalidRelativePath { field, .. } => assert_eq!(field, "rooms[].image"),
        other => panic!("expected InvalidRelativePath, got: {other:?}"),
    }
}

#[rstest]
fn load_drops_missing_images(ctx: MapFolderTestCtx) {
    ctx.write_manifest(
        r#"{
  "version": 1,
  "rooms": [{ "id": "a", "name": "A", "x": 0, "y": 0, "image": "rooms/a.png" }],
  "paths": [],
  "backgroundImage": "background.png"
}"#,
    );

    let loaded = ctx.folder.load_board(&ctx.config).unwrap();
    assert_eq!(loaded.board.tile(&tid("a")).unwrap().image(), None);
    assert_eq!(loaded.board.background_image(), None);
}

#[rstest]
fn load_reports_malformed_json(ctx: MapFolderTestCtx) {
    ctx.write_manifest("{ \"version\": 1, \"rooms\": [");

    let err = ctx.folder.load_board(&ctx.config).unwrap_err();
    assert!(matches!(err, StoreError::Json { .. }), "{err:?}");
}

#[rstest]
fn load_of_missing_folder_is_an_io_error(ctx: MapFolderTestCtx) {
    assert!(!ctx.folder.exists());
    let err = ctx.folder.load_board(&ctx.config).unwrap_err();
    match err {
        StoreError::Io { source, .. } => assert_eq!(source.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected Io, got: {other:?}"),
    }
}

#[rstest]
fn load_normalizes_imported_boards(ctx: MapFolderTestCtx) {
    ctx.write_manifest(
        r#"{
  "version": 1,
  "rooms": [
    { "id": "a", "name": "A", "x": 0, "y": 0, "initialPlacement": 1 },
    { "id": "b", "name": "B", "x": 2000, "y": 0, "initialPlacement": 1 }
  ],
  "paths": [
    { "id": "p1", "from": "a", "to": "ghost", "color": "blue" },
    { "id": "p2", "from": "a", "to": "b", "color": "blue" }
  ]
}"#,
    );

    let loaded = ctx.folder.load_board(&ctx.config).unwrap();
    assert_eq!(
        loaded.adjustments,
        vec![
            Adjustment::ClearedDuplicateSpawn {
                tile_id: tid("b"),
                slot: SpawnSlot::new(1),
                kept_by: tid("a"),
            },
            Adjustment::DroppedDanglingConnection {
                connection_id: cid("p1"),
            },
        ]
    );
    assert_eq!(loaded.board.connections().len(), 1);
    assert_eq!(loaded.board.tile(&tid("b")).unwrap().spawn(), None);
}

#[rstest]
fn save_rejects_images_that_are_not_data_urls(ctx: MapFolderTestCtx) {
    let mut tile = tile_at("a", 0.0, 0.0);
    tile.set_image(Some("https://example.invalid/a.png"));
    let board = Board::from_parts(vec![tile], Vec::new());

    let err = ctx.folder.save_board(&board).unwrap_err();
    match err {
        StoreError::InvalidDataUrl { owner } => assert_eq!(owner, "tile a"),
        other => panic!("expected InvalidDataUrl, got: {other:?}"),
    }
    assert!(!ctx.folder.manifest_path().exists());
}

#[rstest]
fn image_names_for_unportable_ids_are_hex_encoded(ctx: MapFolderTestCtx) {
    let mut tile = tile_at("a:b", 0.0, 0.0);
    tile.set_image(Some(encode_data_url("image/png", b"img")));
    ctx.folder
        .save_board(&Board::from_parts(vec![tile], Vec::new()))
        .unwrap();

    assert!(ctx.map_dir.join("rooms/~613a62.png").is_file());
    let loaded = ctx.folder.load_board(&ctx.config).unwrap();
    assert!(loaded.board.tile(&tid("a:b")).unwrap().image().is_some());
}

#[test]
fn plain_ids_keep_their_file_name() {
    assert_eq!(
        MapFolder::room_image_path(&tid("room-1"), "jpg"),
        std::path::Path::new("rooms").join("room-1.jpg")
    );
    assert_eq!(
        MapFolder::room_image_path(&tid("COM1"), "png"),
        std::path::Path::new("rooms").join("~434f4d31.png")
    );
}

#[cfg(unix)]
#[rstest]
fn save_refuses_writing_through_symlinked_rooms_dir(ctx: MapFolderTestCtx) {
    use std::os::unix::fs::symlink;

    let outside = ctx._tmp.path().join("outside");
    std::fs::create_dir_all(&outside).unwrap();
    std::fs::create_dir_all(&ctx.map_dir).unwrap();
    symlink(&outside, ctx.map_dir.join("rooms")).unwrap();

    let board = decorated_board(&ctx.config);
    let err = ctx.folder.save_board(&board).unwrap_err();
    match err {
        StoreError::SymlinkRefused { .. } => {}
        other => panic!("expected SymlinkRefused, got: {other:?}"),
    }
    assert!(std::fs::read_dir(&outside).unwrap().next().is_none());
}

#[test]
fn schema_describes_the_manifest() {
    let schema = serde_json::to_value(manifest_schema()).unwrap();
    let properties = schema["properties"].as_object().expect("properties");
    for key in ["version", "rooms", "paths", "backgroundImage"] {
        assert!(properties.contains_key(key), "missing {key}");
    }
    let required = schema["required"].as_array().expect("required");
    assert!(required.iter().any(|value| value == "version"));
}
