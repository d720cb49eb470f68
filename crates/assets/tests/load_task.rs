//! Background load task against real files on disk.

use std::time::Duration;

use sceneview_assets::{AssetError, AssetLoader, LoadEvent};
use sceneview_testkit::{scratch_dir, GltfFixture, PrimitiveSpec};

fn write_fixture(label: &str) -> std::path::PathBuf {
    let mut fixture = GltfFixture::new();
    let material = fixture.add_material([1.0, 1.0, 1.0, 1.0], false);
    let mesh = fixture.add_mesh(&[
        PrimitiveSpec::quad().with_material(material),
        PrimitiveSpec::quad(),
    ]);
    let node = fixture.add_node("house", Some(mesh), [0.0, 0.0, 0.0], &[]);
    let dir = scratch_dir(label).expect("scratch dir");
    fixture
        .write_gltf(&dir, "scene", &[node])
        .expect("fixture written")
}

#[test]
fn progress_then_single_terminal_event() {
    let path = write_fixture("load-progress");
    let size = std::fs::metadata(&path).expect("fixture exists").len();
    let mut handle = AssetLoader::with_chunk_size(64).start(&path);

    let mut progress = Vec::new();
    let asset = loop {
        match handle.next_event(Duration::from_secs(10)) {
            Some(LoadEvent::Progress(p)) => progress.push(p),
            Some(LoadEvent::Loaded(asset)) => break asset,
            Some(other) => panic!("unexpected event {other:?}"),
            None => panic!("load timed out"),
        }
    };

    assert!(progress.len() > 1, "small chunks report several steps");
    assert!(progress.windows(2).all(|w| w[0].loaded < w[1].loaded));
    let last = progress.last().expect("at least one progress event");
    assert_eq!(last.loaded, size);
    assert_eq!(last.total, size);
    assert_eq!(last.percent(), 100.0);

    assert_eq!(asset.surfaces, 2);
    assert_eq!(asset.source, path);
    assert!(handle.is_finished());
    assert!(handle.next_event(Duration::from_millis(10)).is_none());
}

#[test]
fn cancelled_load_never_delivers_scene() {
    let path = write_fixture("load-cancel");
    let handle = AssetLoader::with_chunk_size(16).start(&path);
    handle.cancel();
    assert!(matches!(handle.wait(), Err(AssetError::Cancelled)));
}

#[test]
fn invalid_document_fails() {
    let dir = scratch_dir("load-invalid").expect("scratch dir");
    let path = dir.join("scene.gltf");
    std::fs::write(&path, b"{ \"asset\": ").expect("write");
    let handle = AssetLoader::spawn(&path);
    assert!(matches!(handle.wait(), Err(AssetError::Gltf(_))));
}
