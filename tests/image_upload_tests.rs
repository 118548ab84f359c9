
use std::path::PathBuf;

use portfolio_site::{
    errors::AppError,
    storage::images::{ImageStorage, ImageUpload, UploadError},
};
use tempfile::TempDir;

const MB: u64 = 1024 * 1024;

fn storage(root: &TempDir) -> ImageStorage {
    ImageStorage::new(root.path(), 5 * MB)
}

fn upload(file_name: &str, content_type: Option<&str>, size: u64) -> ImageUpload {
    ImageUpload {
        file_name: file_name.to_string(),
        content_type: content_type.map(str::to_string),
        size,
        source: PathBuf::from("/nonexistent"),
    }
}

/// Writes `bytes` to a temp file and describes it as an upload.
fn real_upload(dir: &TempDir, file_name: &str, content_type: &str, bytes: &[u8]) -> ImageUpload {
    let source = dir.path().join("incoming.tmp");
    std::fs::write(&source, bytes).expect("Failed to write upload fixture");
    ImageUpload {
        file_name: file_name.to_string(),
        content_type: Some(content_type.to_string()),
        size: bytes.len() as u64,
        source,
    }
}

#[test]
fn missing_or_empty_upload_is_accepted() {
    let root = TempDir::new().unwrap();
    let images = storage(&root);

    assert_eq!(images.validate(None), Ok(()));
    assert_eq!(images.validate(Some(&upload("", None, 0))), Ok(()));
}

#[test]
fn oversized_file_is_rejected_first() {
    let root = TempDir::new().unwrap();
    let images = storage(&root);

    let too_big = upload("photo.exe", Some("text/plain"), 6 * MB);
    assert_eq!(images.validate(Some(&too_big)), Err(UploadError::TooLarge(5)));
    assert_eq!(
        UploadError::TooLarge(5).to_string(),
        "File size cannot exceed 5 MB."
    );
}

#[test]
fn exactly_the_limit_is_accepted() {
    let root = TempDir::new().unwrap();
    let images = storage(&root);

    assert_eq!(images.validate(Some(&upload("photo.png", Some("image/png"), 5 * MB))), Ok(()));
}

#[test]
fn extension_is_checked_case_insensitively() {
    let root = TempDir::new().unwrap();
    let images = storage(&root);

    for name in ["a.jpg", "b.JPEG", "c.Png", "d.gif", "e.webp"] {
        assert_eq!(images.validate(Some(&upload(name, Some("image/png"), MB))), Ok(()), "{name}");
    }

    for name in ["notes.txt", "archive.png.zip", "no_extension"] {
        assert_eq!(
            images.validate(Some(&upload(name, Some("image/png"), MB))),
            Err(UploadError::UnsupportedExtension),
            "{name}"
        );
    }
}

#[test]
fn content_type_must_be_an_allowed_image_type() {
    let root = TempDir::new().unwrap();
    let images = storage(&root);

    let generic = upload("photo.png", Some("application/octet-stream"), 3 * MB);
    assert_eq!(images.validate(Some(&generic)), Err(UploadError::UnsupportedContentType));

    let missing = upload("photo.png", None, MB);
    assert_eq!(images.validate(Some(&missing)), Err(UploadError::UnsupportedContentType));

    let upper = upload("photo.jpg", Some("IMAGE/JPEG"), MB);
    assert_eq!(images.validate(Some(&upper)), Ok(()));
}

#[test]
fn file_names_with_reserved_characters_are_rejected() {
    let root = TempDir::new().unwrap();
    let images = storage(&root);

    for name in ["../evil.png", "dir\\evil.png", "what?.png", "pipe|d.png", "tab\t.png"] {
        assert_eq!(
            images.validate(Some(&upload(name, Some("image/png"), MB))),
            Err(UploadError::InvalidFileName),
            "{name}"
        );
    }
}

#[test]
fn upload_errors_surface_as_image_field_errors() {
    match AppError::from(UploadError::UnsupportedContentType) {
        AppError::ValidationError(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "image_file");
            assert_eq!(errors[0].message, "Invalid file type.");
        }
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn save_stores_the_file_under_a_unique_name() {
    let root = TempDir::new().unwrap();
    let incoming = TempDir::new().unwrap();
    let images = storage(&root);

    let bytes = vec![7u8; MB as usize];
    let photo = real_upload(&incoming, "photo.png", "image/png", &bytes);

    let url = images.save(Some(&photo)).await.unwrap().expect("an image url");

    let name = url.strip_prefix("/images/projects/").expect("project images prefix");
    let (prefix, original) = name.split_once('_').expect("uuid prefix");
    assert!(uuid::Uuid::parse_str(prefix).is_ok());
    assert_eq!(original, "photo.png");

    let stored = images.path_for(&url).unwrap();
    assert!(stored.starts_with(root.path().join("images/projects")));
    assert_eq!(std::fs::read(stored).unwrap(), bytes);
}

#[tokio::test]
async fn saving_the_same_file_twice_never_collides() {
    let root = TempDir::new().unwrap();
    let incoming = TempDir::new().unwrap();
    let images = storage(&root);
    let photo = real_upload(&incoming, "photo.png", "image/png", b"png-bytes");

    let first = images.save(Some(&photo)).await.unwrap();
    let second = images.save(Some(&photo)).await.unwrap();

    assert_ne!(first, second);
}

#[tokio::test]
async fn save_without_an_upload_stores_nothing() {
    let root = TempDir::new().unwrap();
    let images = storage(&root);

    assert_eq!(images.save(None).await.unwrap(), None);
    assert!(!images.images_dir().exists());
}

#[tokio::test]
async fn save_rejects_invalid_uploads_without_writing() {
    let root = TempDir::new().unwrap();
    let incoming = TempDir::new().unwrap();
    let images = storage(&root);
    let text = real_upload(&incoming, "notes.txt", "text/plain", b"hello");

    let result = images.save(Some(&text)).await;

    assert!(matches!(result, Err(AppError::ValidationError(_))));
    assert!(!images.images_dir().exists());
}

#[tokio::test]
async fn remove_deletes_the_file_and_tolerates_missing_ones() {
    let root = TempDir::new().unwrap();
    let incoming = TempDir::new().unwrap();
    let images = storage(&root);
    let photo = real_upload(&incoming, "photo.gif", "image/gif", b"gif-bytes");

    let url = images.save(Some(&photo)).await.unwrap().unwrap();
    let path = images.path_for(&url).unwrap();
    assert!(path.exists());

    images.remove(&url).await.unwrap();
    assert!(!path.exists());

    images.remove(&url).await.unwrap();
    images.remove("https://cdn.example.com/elsewhere.png").await.unwrap();
    images.remove_best_effort("/images/projects/never-existed.png").await;
}

#[test]
fn path_for_ignores_foreign_and_traversing_urls() {
    let root = TempDir::new().unwrap();
    let images = storage(&root);

    assert!(images.path_for("/images/other/photo.png").is_none());
    assert!(images.path_for("/images/projects/../secret.txt").is_none());
    assert!(images.path_for("/images/projects/").is_none());
    assert!(images.path_for("/images/projects/ok.png").is_some());
}
