//! Profile service behavior against a file-backed store.

use std::sync::Arc;

use catalog::{CatalogConfig, Error, ProfileService, SocialLinks};
use catalog_file::{FileStore, LocalUploadUrls};
use tempfile::TempDir;

fn profile(dir: &TempDir, config: CatalogConfig) -> ProfileService<FileStore, LocalUploadUrls> {
    ProfileService::new(
        FileStore::new(dir.path()),
        LocalUploadUrls::new(dir.path()),
        Arc::new(config),
    )
}

fn links(github: Option<&str>, linkedin: Option<&str>) -> SocialLinks {
    SocialLinks {
        github: github.map(str::to_string),
        linkedin: linkedin.map(str::to_string),
    }
}

#[tokio::test]
async fn empty_profile_has_no_links_or_message() {
    let dir = TempDir::new().unwrap();
    let service = profile(&dir, CatalogConfig::default());

    assert_eq!(service.social_links().await.unwrap(), SocialLinks::default());
    assert_eq!(service.site_message().await.unwrap(), None);
}

#[tokio::test]
async fn saved_links_round_trip() {
    let dir = TempDir::new().unwrap();
    let service = profile(&dir, CatalogConfig::default());

    let saved = service
        .save_social_links(links(Some("https://github.com/octocat"), None))
        .await
        .unwrap();
    assert!(!saved.updated_at.is_empty());

    service
        .save_social_links(links(None, Some("linkedin.com/in/octo-cat")))
        .await
        .unwrap();

    let read = service.social_links().await.unwrap();
    assert_eq!(
        read,
        links(Some("https://github.com/octocat"), Some("linkedin.com/in/octo-cat"))
    );
}

#[tokio::test]
async fn empty_link_clears_stored_value() {
    let dir = TempDir::new().unwrap();
    let service = profile(&dir, CatalogConfig::default());

    service
        .save_social_links(links(Some("github.com/a"), Some("linkedin.com/in/b")))
        .await
        .unwrap();
    service
        .save_social_links(links(Some(""), Some("linkedin.com/in/c")))
        .await
        .unwrap();

    let read = service.social_links().await.unwrap();
    assert_eq!(read, links(Some(""), Some("linkedin.com/in/c")));
}

#[tokio::test]
async fn links_need_one_non_blank_value() {
    let dir = TempDir::new().unwrap();
    let service = profile(&dir, CatalogConfig::default());

    for attempt in [links(None, None), links(Some(""), Some("  "))] {
        let err = service.save_social_links(attempt).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}

#[tokio::test]
async fn malformed_link_is_rejected() {
    let dir = TempDir::new().unwrap();
    let service = profile(&dir, CatalogConfig::default());

    let err = service
        .save_social_links(links(Some("https://example.com/octocat"), None))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert_eq!(service.social_links().await.unwrap(), SocialLinks::default());
}

#[tokio::test]
async fn site_message_is_trimmed_and_truncated() {
    let dir = TempDir::new().unwrap();
    let config = CatalogConfig {
        max_message_length: 5,
        ..Default::default()
    };
    let service = profile(&dir, config);

    let saved = service.save_site_message("  hello world ").await.unwrap();
    assert_eq!(saved.message, "hello");
    assert_eq!(service.site_message().await.unwrap().as_deref(), Some("hello"));
}

#[tokio::test]
async fn blank_site_message_is_rejected() {
    let dir = TempDir::new().unwrap();
    let service = profile(&dir, CatalogConfig::default());

    let err = service.save_site_message(" \n ").await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[tokio::test]
async fn message_and_links_share_one_entry() {
    let dir = TempDir::new().unwrap();
    let service = profile(&dir, CatalogConfig::default());

    service.save_site_message("Welcome").await.unwrap();
    service
        .save_social_links(links(Some("github.com/a"), None))
        .await
        .unwrap();

    assert_eq!(service.site_message().await.unwrap().as_deref(), Some("Welcome"));
    assert_eq!(service.social_links().await.unwrap().github.as_deref(), Some("github.com/a"));
}

#[tokio::test]
async fn asset_urls() {
    let dir = TempDir::new().unwrap();
    let service = profile(&dir, CatalogConfig::default());

    assert_eq!(
        service.selfie_url(),
        "https://d3bjrjf10s3vbi.cloudfront.net/profile/selfie.jpg"
    );
    assert_eq!(
        service.resume_url(),
        "https://d3bjrjf10s3vbi.cloudfront.net/profile/resume.pdf"
    );

    let upload = service.selfie_upload_url("image/webp").await.unwrap();
    assert_eq!(upload.key, "profile/selfie.jpg");
    assert_eq!(upload.expires_in_minutes, 5);
    assert!(upload.url.contains("/uploads/generic-jin/profile/selfie.jpg"));

    let upload = service.resume_upload_url().await.unwrap();
    assert!(upload.url.contains("contentType=application%2Fpdf"));

    let err = service.selfie_upload_url("image/gif").await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}
