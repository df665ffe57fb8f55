//! Slugs, frontmatter checks and file output

use prospector::discovery::phase3_write::write_files;
use prospector::discovery::{slugify, FileManifest, GeneratedFile};
use prospector::ProspectorError;

fn manifest(files: &[(&str, &str)]) -> FileManifest {
    FileManifest {
        company_slug: slugify("Shopify, Inc."),
        files: files
            .iter()
            .map(|(path, content)| GeneratedFile {
                path: path.to_string(),
                content: content.to_string(),
            })
            .collect(),
    }
}

#[test]
fn test_slugify_examples() {
    assert_eq!(slugify("Shopify, Inc."), "shopify-inc");
    assert_eq!(slugify("  stripe.com "), "stripecom");
    assert_eq!(slugify("A--B__C"), "a-b-c");
    assert_eq!(slugify("Acme Corp."), "acme-corp");
}

#[test]
fn test_slugify_is_stable() {
    let once = slugify("  Big  Co_ Holdings -- EU ");
    assert_eq!(once, "big-co-holdings-eu");
    assert_eq!(slugify(&once), once);
}

#[tokio::test]
async fn test_files_land_in_slug_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let m = manifest(&[
        ("01_account_brief.md", "---\ntitle: Brief\n---\n# Brief\n"),
        ("02_org_and_contacts.md", "---\ntitle: Org\n---\n# Org\n"),
    ]);

    let dir = write_files(&m, None, tmp.path()).await.unwrap();

    assert_eq!(dir, tmp.path().join("shopify-inc"));
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 2);
}

#[tokio::test]
async fn test_missing_header_fails_before_any_write() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("out");
    let m = manifest(&[
        ("01_account_brief.md", "---\ntitle: Brief\n---\n# Brief\n"),
        ("02_org_and_contacts.md", "# Org\n"),
    ]);

    let err = write_files(&m, Some(&out), tmp.path()).await.unwrap_err();

    assert!(matches!(
        err,
        ProspectorError::Frontmatter { ref path, .. } if path == "02_org_and_contacts.md"
    ));
    assert!(!out.join("01_account_brief.md").exists());
}

#[tokio::test]
async fn test_escaping_path_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let m = manifest(&[("../outside.md", "---\ntitle: x\n---\n")]);

    let err = write_files(&m, None, tmp.path()).await.unwrap_err();

    assert!(matches!(err, ProspectorError::UnsafePath { .. }));
    assert!(!tmp.path().join("outside.md").exists());
}
