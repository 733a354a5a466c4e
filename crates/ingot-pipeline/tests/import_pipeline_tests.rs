//! Integration tests for ImportPipeline
//!
//! Each test imports a small in-memory vault into a MemoryStore and checks
//! the records left behind.

mod common;

use common::{entry, link_to, page, pipeline, vault};
use ingot_config::ImportSettings;
use ingot_core::test_support::{RecordingAssetStorage, RecordingFormatter};
use ingot_core::{identity, page_identity, MemoryStore, Namespace, VaultFile};
use ingot_pipeline::{AssetStats, ImportPipeline};
use std::sync::Arc;
use tempfile::TempDir;

fn setup() -> (Arc<MemoryStore>, Arc<RecordingAssetStorage>) {
    (
        Arc::new(MemoryStore::new()),
        Arc::new(RecordingAssetStorage::new()),
    )
}

// ============================================================================
// Records and identities
// ============================================================================

#[tokio::test]
async fn test_records_keyed_by_identity() {
    let (store, assets) = setup();
    let files = vault(&[("a/Note A.md", "Alpha"), ("Top.md", "Top level")]);

    let summary = pipeline(&store, &assets, ImportSettings::default())
        .import(files)
        .await
        .unwrap();

    assert_eq!(summary.containers, 2);
    assert_eq!(summary.entries, 2);
    assert_eq!(summary.pages_created, 2);

    let root = store
        .containers()
        .into_iter()
        .find(|c| c.parent.is_none())
        .unwrap();
    assert_eq!(root.id, identity(Namespace::Folder, ""));
    assert_eq!(root.name, "Vault Import");

    let note = page(&store, "Note A");
    assert_eq!(note.id, page_identity("a/Note A.md", None));
    assert_eq!(note.entry, identity(Namespace::Journal, "a/Note A.md"));
    assert_eq!(
        entry(&store, "Note A").container,
        Some(identity(Namespace::Folder, "a"))
    );
    assert_eq!(entry(&store, "Top").container, Some(root.id));
}

#[tokio::test]
async fn test_frontmatter_sets_visibility() {
    let (store, assets) = setup();
    let files = vault(&[
        ("Open.md", "---\npublic: true\n---\nBody"),
        ("Closed.md", "---\nvisibility: private\n---\nBody"),
        ("Plain.md", "Body"),
    ]);
    let settings = ImportSettings {
        default_public: true,
        ..Default::default()
    };

    pipeline(&store, &assets, settings)
        .import(files)
        .await
        .unwrap();

    assert_eq!(page(&store, "Open").body, "Body");
    assert!(entry(&store, "Open").public);
    assert!(!entry(&store, "Closed").public);
    assert!(entry(&store, "Plain").public);
}

#[tokio::test]
async fn test_disk_backed_vault() {
    let dir = TempDir::new().unwrap();
    let note_path = dir.path().join("Disk.md");
    tokio::fs::write(&note_path, "# Title\n#tag line").await.unwrap();

    let (store, assets) = setup();
    let files = vec![VaultFile::on_disk("vault/Disk.md", &note_path)];
    pipeline(&store, &assets, ImportSettings::default())
        .import(files)
        .await
        .unwrap();

    assert_eq!(page(&store, "Disk").body, "# Title\n #tag line");
}

// ============================================================================
// Re-imports
// ============================================================================

#[tokio::test]
async fn test_reimport_is_idempotent() {
    let (store, assets) = setup();
    let files = || vault(&[("A.md", "Alpha"), ("B.md", "See [[A]]"), ("c/C.md", "Gamma")]);

    pipeline(&store, &assets, ImportSettings::default())
        .import(files())
        .await
        .unwrap();
    let first = store.snapshot();

    let summary = pipeline(&store, &assets, ImportSettings::default())
        .import(files())
        .await
        .unwrap();

    assert_eq!(summary.pages_created, 0);
    assert_eq!(summary.entries, 0);
    assert_eq!(summary.containers, 0);
    assert_eq!(summary.notes_skipped, 3);
    assert_eq!(summary.links_rewritten, 0);
    assert_eq!(summary.backlinks_appended, 0);
    assert_eq!(store.snapshot(), first);
}

#[tokio::test]
async fn test_overwrite_rewrites_bodies() {
    let (store, assets) = setup();
    pipeline(&store, &assets, ImportSettings::default())
        .import(vault(&[("A.md", "Old text")]))
        .await
        .unwrap();

    let settings = ImportSettings {
        overwrite: true,
        ..Default::default()
    };
    let summary = pipeline(&store, &assets, settings)
        .import(vault(&[("A.md", "New text")]))
        .await
        .unwrap();

    assert_eq!(summary.pages_updated, 1);
    assert_eq!(store.page_count(), 1);
    assert_eq!(page(&store, "A").body, "New text");
}

#[tokio::test]
async fn test_overwrite_twice_gives_same_bodies() {
    let (store, assets) = setup();
    let settings = ImportSettings {
        overwrite: true,
        ..Default::default()
    };
    let files = || vault(&[("A.md", "Alpha"), ("B.md", "See [[A]]")]);

    pipeline(&store, &assets, settings.clone())
        .import(files())
        .await
        .unwrap();
    let first: Vec<_> = store.pages().into_iter().map(|p| p.body).collect();

    pipeline(&store, &assets, settings)
        .import(files())
        .await
        .unwrap();
    let second: Vec<_> = store.pages().into_iter().map(|p| p.body).collect();

    assert_eq!(store.page_count(), 2);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_new_note_links_to_previously_imported_note() {
    let (store, assets) = setup();
    pipeline(&store, &assets, ImportSettings::default())
        .import(vault(&[("A.md", "Alpha")]))
        .await
        .unwrap();

    pipeline(&store, &assets, ImportSettings::default())
        .import(vault(&[("A.md", "Alpha"), ("B.md", "See [[A]]")]))
        .await
        .unwrap();

    let expected = format!("See {}", link_to(&store, "A", "A"));
    assert_eq!(page(&store, "B").body, expected);
    // A was not written by the second run, so it gets no References section
    assert_eq!(page(&store, "A").body, "Alpha");
}

// ============================================================================
// Links and backlinks
// ============================================================================

#[tokio::test]
async fn test_link_alias_rewrite() {
    let (store, assets) = setup();
    let files = vault(&[("Note A.md", "Alpha"), ("B.md", "[[Note A|See This]] and [[Nowhere]]")]);

    let summary = pipeline(&store, &assets, ImportSettings::default())
        .import(files)
        .await
        .unwrap();

    let expected = format!("{} and [[Nowhere]]", link_to(&store, "Note A", "See This"));
    assert_eq!(page(&store, "B").body, expected);
    assert_eq!(summary.links_rewritten, 1);
}

#[tokio::test]
async fn test_backlinks_only_on_linked_page() {
    let (store, assets) = setup();
    let files = vault(&[("A.md", "Alpha"), ("B.md", "See [[A]]")]);

    let summary = pipeline(&store, &assets, ImportSettings::default())
        .import(files)
        .await
        .unwrap();

    let expected = format!("Alpha\n\n## References\n\n- {}", link_to(&store, "B", "B"));
    assert_eq!(page(&store, "A").body, expected);
    assert!(!page(&store, "B").body.contains("## References"));
    assert_eq!(summary.backlinks_appended, 1);
}

#[tokio::test]
async fn test_backlinks_sorted_by_name() {
    let (store, assets) = setup();
    let files = vault(&[
        ("Target.md", "T"),
        ("zeta.md", "[[Target]]"),
        ("Alpha.md", "[[Target]]"),
        ("beta.md", "[[Target]]"),
    ]);

    pipeline(&store, &assets, ImportSettings::default())
        .import(files)
        .await
        .unwrap();

    let body = page(&store, "Target").body;
    let references = body.split("## References\n\n").nth(1).unwrap();
    let names: Vec<_> = references
        .lines()
        .map(|line| line.rsplit('{').next().unwrap().trim_end_matches('}'))
        .collect();
    assert_eq!(names, vec!["Alpha", "beta", "zeta"]);
}

#[tokio::test]
async fn test_backlinks_can_be_disabled() {
    let (store, assets) = setup();
    let settings = ImportSettings {
        create_backlinks: false,
        ..Default::default()
    };

    let summary = pipeline(&store, &assets, settings)
        .import(vault(&[("A.md", "Alpha"), ("B.md", "See [[A]]")]))
        .await
        .unwrap();

    assert_eq!(summary.backlinks_appended, 0);
    assert_eq!(page(&store, "A").body, "Alpha");
}

// ============================================================================
// Assets
// ============================================================================

fn asset_settings() -> ImportSettings {
    ImportSettings {
        import_non_markdown: true,
        ..Default::default()
    }
}

fn with_image(note: &str) -> Vec<VaultFile> {
    let mut files = vault(&[("a/Map.md", note)]);
    files.push(VaultFile::from_bytes("v/a/img.png", vec![1, 2, 3]));
    files
}

#[tokio::test]
async fn test_asset_embed_with_size() {
    let (store, assets) = setup();

    let summary = pipeline(&store, &assets, asset_settings())
        .import(with_image("![[img.png|300x200]] ![[img.png|300]]"))
        .await
        .unwrap();

    assert_eq!(
        page(&store, "Map").body,
        "![img.png](vault-assets/a/img.png =300x200) ![img.png](vault-assets/a/img.png =300x*)"
    );
    assert_eq!(summary.assets, AssetStats { total: 1, skipped: 0 });

    let uploads = assets.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].location, "vault-assets/a");
    assert_eq!(uploads[0].size, 3);
    assert_eq!(assets.ensured(), vec!["vault-assets/a".to_string()]);
}

#[tokio::test]
async fn test_asset_directory_checked_once() {
    let (store, assets) = setup();
    let mut files = with_image("![[img.png]]");
    files.push(VaultFile::from_bytes("v/a/other.png", vec![4]));

    pipeline(&store, &assets, asset_settings())
        .import(files)
        .await
        .unwrap();

    assert_eq!(assets.uploads().len(), 2);
    assert_eq!(assets.list_calls(), 1);
    assert_eq!(assets.ensured().len(), 1);
}

#[tokio::test]
async fn test_duplicate_asset_reused() {
    let store = Arc::new(MemoryStore::new());
    let assets = Arc::new(
        RecordingAssetStorage::new().with_existing("vault-assets", ["vault-assets/photo.png"]),
    );
    let settings = ImportSettings {
        import_non_markdown: true,
        skip_duplicate_assets: true,
        ..Default::default()
    };
    let mut files = vault(&[("Trip.md", "![[photo.png]]")]);
    files.push(VaultFile::from_bytes("v/photo.png", vec![9]));

    let summary = pipeline(&store, &assets, settings)
        .import(files)
        .await
        .unwrap();

    assert!(assets.uploads().is_empty());
    assert_eq!(summary.assets, AssetStats { total: 1, skipped: 1 });
    assert_eq!(page(&store, "Trip").body, "![photo.png](vault-assets/photo.png)");
}

#[tokio::test]
async fn test_assets_ignored_unless_enabled() {
    let (store, assets) = setup();

    let summary = pipeline(&store, &assets, ImportSettings::default())
        .import(with_image("![[img.png]]"))
        .await
        .unwrap();

    assert!(assets.uploads().is_empty());
    assert_eq!(summary.assets, AssetStats::default());
    assert_eq!(page(&store, "Map").body, "![[img.png]]");
}

// ============================================================================
// Combining
// ============================================================================

fn nested_vault() -> Vec<VaultFile> {
    vault(&[("a/x.md", "X"), ("a/y.md", "Y"), ("a/sub/z.md", "Z")])
}

#[tokio::test]
async fn test_combine_every_folder() {
    let (store, assets) = setup();
    let settings = ImportSettings {
        combine_notes: true,
        ..Default::default()
    };

    pipeline(&store, &assets, settings)
        .import(nested_vault())
        .await
        .unwrap();

    // root, plus `a` because its child holds notes
    assert_eq!(store.container_count(), 2);
    assert_eq!(store.entry_count(), 2);
    assert_eq!(store.page_count(), 3);

    let a = entry(&store, "a");
    assert_eq!(a.id, identity(Namespace::Journal, "a"));
    assert_eq!(a.container, Some(identity(Namespace::Folder, "")));
    assert_eq!(page(&store, "x").id, page_identity("a", Some("x")));
    assert_eq!(page(&store, "x").entry, a.id);

    let sub = entry(&store, "sub");
    assert_eq!(sub.container, Some(identity(Namespace::Folder, "a")));
    assert_eq!(page(&store, "z").entry, sub.id);
}

#[tokio::test]
async fn test_combine_leaves_only() {
    let (store, assets) = setup();
    let settings = ImportSettings {
        combine_notes: true,
        combine_leaves_only: true,
        ..Default::default()
    };

    pipeline(&store, &assets, settings)
        .import(nested_vault())
        .await
        .unwrap();

    assert_eq!(store.container_count(), 2);
    // x and y get their own entries, sub is combined
    assert_eq!(store.entry_count(), 3);
    assert_eq!(
        entry(&store, "x").id,
        identity(Namespace::Journal, "a/x.md")
    );
    assert_eq!(
        entry(&store, "sub").container,
        Some(identity(Namespace::Folder, "a"))
    );
}

#[tokio::test]
async fn test_same_combined_page_id_keeps_first_note() {
    let (store, assets) = setup();
    let settings = ImportSettings {
        combine_notes: true,
        ..Default::default()
    };

    // Both stems are `n`, so both notes derive the same page identity
    let summary = pipeline(&store, &assets, settings)
        .import(vault(&[("a/n.md", "first"), ("a/n.MD", "second")]))
        .await
        .unwrap();

    assert_eq!(summary.containers, 1);
    assert_eq!(summary.entries, 1);
    assert_eq!(summary.pages_created, 1);
    assert_eq!(summary.notes_skipped, 1);
    assert_eq!(store.page_count(), 1);

    let n = page(&store, "n");
    assert_eq!(n.id, page_identity("a", Some("n")));
    assert_eq!(n.body, "first");
}

#[tokio::test]
async fn test_combined_root_named_after_root_container() {
    let (store, assets) = setup();
    let settings = ImportSettings {
        combine_notes: true,
        root_name: "Campaign".to_string(),
        ..Default::default()
    };

    pipeline(&store, &assets, settings)
        .import(vault(&[("One.md", "1"), ("Two.md", "2 [[One]]")]))
        .await
        .unwrap();

    assert_eq!(store.entry_count(), 1);
    let shared = entry(&store, "Campaign");
    assert_eq!(shared.id, identity(Namespace::Journal, ""));
    assert_eq!(page(&store, "One").entry, shared.id);
    assert_eq!(page(&store, "Two").body, format!("2 {}", link_to(&store, "One", "One")));
}

// ============================================================================
// Index and formatting
// ============================================================================

#[tokio::test]
async fn test_index_groups_notes() {
    let (store, assets) = setup();
    let settings = ImportSettings {
        create_index: true,
        root_name: "Lore".to_string(),
        ..Default::default()
    };

    pipeline(&store, &assets, settings.clone())
        .import(vault(&[("Home.md", "h"), ("People/Ann.md", "a")]))
        .await
        .unwrap();

    let index = page(&store, "Index");
    assert_eq!(index.id, identity(Namespace::Page, "#index"));
    assert_eq!(
        index.body,
        format!(
            "## Lore\n\n- {}\n\n## People\n\n- {}",
            link_to(&store, "Home", "Home"),
            link_to(&store, "Ann", "Ann")
        )
    );

    // A second run keeps a single index
    pipeline(&store, &assets, settings)
        .import(vault(&[("Home.md", "h"), ("People/Ann.md", "a")]))
        .await
        .unwrap();
    assert_eq!(store.pages().iter().filter(|p| p.name == "Index").count(), 1);
}

#[tokio::test]
async fn test_index_note_added_later_gets_its_own_records() {
    let (store, assets) = setup();
    let settings = ImportSettings {
        create_index: true,
        ..Default::default()
    };

    pipeline(&store, &assets, settings.clone())
        .import(vault(&[("A.md", "a")]))
        .await
        .unwrap();

    let summary = pipeline(&store, &assets, settings)
        .import(vault(&[("A.md", "a"), ("Index.md", "My own index")]))
        .await
        .unwrap();

    assert_eq!(summary.entries, 1);
    assert_eq!(summary.pages_created, 1);
    assert_eq!(summary.notes_skipped, 1);
    assert_eq!(summary.pages_updated, 1);
    assert_eq!(store.page_count(), 3);

    let note_entry = identity(Namespace::Journal, "Index.md");
    let note_page = page_identity("Index.md", None);
    let pages = store.pages();
    let note = pages.iter().find(|p| p.id == note_page).unwrap();
    assert_eq!(note.entry, note_entry);
    assert_eq!(note.body, "My own index");

    let index = pages
        .iter()
        .find(|p| p.id == identity(Namespace::Page, "#index"))
        .unwrap();
    assert_eq!(
        index.body,
        format!(
            "## Vault Import\n\n- {}\n- @Doc[{note_entry}.{note_page}]{{Index}}",
            link_to(&store, "A", "A")
        )
    );
}

#[tokio::test]
async fn test_formatter_sees_every_written_page() {
    let (store, assets) = setup();
    let formatter = Arc::new(RecordingFormatter::new());
    let settings = ImportSettings {
        create_index: true,
        ..Default::default()
    };

    pipeline(&store, &assets, settings)
        .with_formatter(formatter.clone())
        .import(vault(&[("A.md", "a"), ("b/B.md", "b")]))
        .await
        .unwrap();

    let mut names: Vec<_> = formatter.formatted().into_iter().map(|p| p.name).collect();
    names.sort();
    assert_eq!(names, vec!["A", "B", "Index"]);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_formatter_failure_aborts() {
    let (store, assets) = setup();
    let formatter = Arc::new(RecordingFormatter::failing_on("B"));

    let err = pipeline(&store, &assets, ImportSettings::default())
        .with_formatter(formatter)
        .import(vault(&[("A.md", "a"), ("B.md", "b")]))
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("Failed to format page 'B'"));
}

#[tokio::test]
async fn test_upload_failure_aborts() {
    let store = Arc::new(MemoryStore::new());
    let assets = Arc::new(RecordingAssetStorage::new().failing_uploads());

    let err = pipeline(&store, &assets, asset_settings())
        .import(with_image("![[img.png]]"))
        .await
        .unwrap_err();

    let message = format!("{err:#}");
    assert!(message.contains("Failed to upload asset 'a/img.png'"));
    assert!(message.contains("rejected"));
}

#[tokio::test]
async fn test_invalid_settings_rejected_before_import() {
    let (store, assets) = setup();
    let mut settings = ImportSettings::default();
    settings.remote_storage.enabled = true;

    let err = ImportPipeline::new(store.clone(), store.clone(), assets.clone(), settings)
        .import(vault(&[("A.md", "a")]))
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("Invalid import settings"));
    assert_eq!(store.container_count(), 0);
    assert_eq!(store.page_count(), 0);
}
