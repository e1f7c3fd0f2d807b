use merch_hub_lib::storage::{FileStorage, StorageError, UploadKind, UploadedFile, validate_upload};

fn upload(name: Option<&str>, mime: Option<&str>, len: usize) -> UploadedFile {
    UploadedFile {
        file_name: name.map(str::to_string),
        content_type: mime.map(str::to_string),
        bytes: vec![7u8; len],
    }
}

#[test]
fn test_extension_from_name_or_mime() {
    let by_name = upload(Some("Hoodie.PNG"), None, 10);
    assert_eq!(validate_upload(&by_name, UploadKind::ListingImage).unwrap(), "png");

    let by_mime = upload(Some("blob"), Some("image/webp"), 10);
    assert_eq!(validate_upload(&by_mime, UploadKind::ListingImage).unwrap(), "webp");
}

#[test]
fn test_non_images_are_rejected() {
    let pdf = upload(Some("receipt.pdf"), Some("application/pdf"), 10);

    assert!(matches!(
        validate_upload(&pdf, UploadKind::PaymentReceipt),
        Err(StorageError::UnsupportedType("receipt"))
    ));
}

#[test]
fn test_size_limits_per_kind() {
    let three_mib = upload(Some("photo.jpg"), None, 3 * 1024 * 1024);

    assert!(validate_upload(&three_mib, UploadKind::ListingImage).is_ok());
    assert!(matches!(
        validate_upload(&three_mib, UploadKind::DepartmentLogo),
        Err(StorageError::TooLarge { limit_mb: 2, .. })
    ));
}

#[test]
fn test_empty_upload_is_rejected() {
    let empty = upload(Some("photo.jpg"), None, 0);

    assert!(matches!(
        validate_upload(&empty, UploadKind::GcashQr),
        Err(StorageError::Empty(_))
    ));
}

#[tokio::test]
async fn test_store_and_remove() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::with_root(dir.path());

    let relative = storage
        .store(&upload(Some("qr.png"), None, 32), UploadKind::GcashQr)
        .await
        .unwrap();

    assert!(relative.starts_with("gcash_qr_codes/"));
    assert!(relative.ends_with(".png"));
    let stored = dir.path().join(&relative);
    assert_eq!(std::fs::read(&stored).unwrap().len(), 32);

    storage.remove(&relative).await;
    assert!(!stored.exists());

    // Missing files are ignored.
    storage.remove(&relative).await;
}

#[tokio::test]
async fn test_remove_refuses_paths_outside_root() {
    let root = tempfile::tempdir().unwrap();
    let outside = tempfile::NamedTempFile::new().unwrap();

    let storage = FileStorage::with_root(root.path());
    storage
        .remove(&format!("../{}", outside.path().display()))
        .await;
    storage.remove(&outside.path().display().to_string()).await;

    assert!(outside.path().exists());
}
