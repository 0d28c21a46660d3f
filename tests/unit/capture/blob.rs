use super::*;

#[test]
fn chunks_concatenate_in_arrival_order() {
    let blob = VideoBlob::from_chunks("video/webm", vec![vec![1, 2], vec![], vec![3]]);
    assert_eq!(blob.bytes(), &[1, 2, 3]);
    assert_eq!(blob.len(), 3);
    assert_eq!(blob.mime_type(), "video/webm");
    assert!(VideoBlob::from_chunks("video/webm", Vec::new()).is_empty());
}

#[test]
fn minted_urls_are_unique_and_revocable_once() {
    let mut store = BlobStore::new();
    let a = store.mint(VideoBlob::from_chunks("video/webm", vec![vec![1]]));
    let b = store.mint(VideoBlob::from_chunks("video/webm", vec![vec![2]]));
    assert_ne!(a, b);
    assert!(a.as_str().starts_with("blob:taman/"));
    assert_eq!(store.live_count(), 2);

    assert_eq!(store.resolve(&a).unwrap().bytes(), &[1]);
    assert!(store.revoke(&a));
    assert!(!store.revoke(&a));
    assert!(store.resolve(&a).is_none());
    assert_eq!(store.live_count(), 1);
}

#[test]
fn urls_are_not_reused_after_revoke() {
    let mut store = BlobStore::new();
    let a = store.mint(VideoBlob::from_chunks("video/webm", vec![]));
    store.revoke(&a);
    let b = store.mint(VideoBlob::from_chunks("video/webm", vec![]));
    assert_ne!(a, b);
}

#[test]
fn save_to_dir_uses_download_name() {
    let dir = std::env::temp_dir().join(format!("taman-blob-{}", std::process::id()));
    let blob = VideoBlob::from_chunks("video/webm", vec![vec![0x1a, 0x45, 0xdf, 0xa3]]);
    let path = blob.save_to_dir(&dir).unwrap();
    assert_eq!(path.file_name().unwrap(), DOWNLOAD_FILE_NAME);
    assert_eq!(std::fs::read(&path).unwrap(), blob.bytes());
    let _ = std::fs::remove_dir_all(&dir);
}
