//! Classifies local repository files against fetched Avrae state.
//!
//! Comparison is pure filesystem work — all remote state is fetched up
//! front by the caller. Each tracked file resolves to exactly one
//! [`ItemComparison`] / [`GvarComparison`] per aspect (code and docs are
//! classified separately), so a report can drive pull, push, status and
//! diff alike.
//!
//! Gvars present on Avrae but absent from the config are never reported:
//! multiple repositories may feed a single Avrae account, so visible gvars
//! cannot be assumed to belong here.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use avrae_core::config::GvarsConfig;
use avrae_core::types::{Alias, Collection, CollectionId, Gvar, GvarKey, ItemKind, Snippet};

use crate::error::{io_err, SyncError};
use crate::layout;

// ---------------------------------------------------------------------------
// Workshop items
// ---------------------------------------------------------------------------

/// The parts of an alias or snippet the sync engine acts on.
///
/// Aliases and snippets share everything but their filesystem layout, so
/// comparisons flatten both into this one shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkshopItem {
    pub kind: ItemKind,
    pub id: String,
    pub name: String,
    pub code: String,
    pub docs: String,
}

impl WorkshopItem {
    fn from_alias(alias: &Alias) -> Self {
        Self {
            kind: ItemKind::Alias,
            id: alias.id.clone(),
            name: alias.name.clone(),
            code: alias.code.clone(),
            docs: alias.docs.clone(),
        }
    }

    fn from_snippet(snippet: &Snippet) -> Self {
        Self {
            kind: ItemKind::Snippet,
            id: snippet.id.clone(),
            name: snippet.name.clone(),
            code: snippet.code.clone(),
            docs: snippet.docs.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Comparison results
// ---------------------------------------------------------------------------

/// Outcome of comparing one aspect of a workshop item with the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemComparison {
    /// The local code file matches the item's active code on Avrae.
    CodeMatches { path: PathBuf, item: WorkshopItem },
    /// The local code file exists but its content differs from Avrae.
    CodeModified { path: PathBuf, item: WorkshopItem },
    /// The item exists on Avrae but its code file is absent locally.
    CodeMissing { path: PathBuf, item: WorkshopItem },
    /// The local doc file matches the item's docs on Avrae.
    DocsMatch { path: PathBuf, item: WorkshopItem },
    /// The local doc file exists but its content differs from Avrae.
    DocsModified { path: PathBuf, item: WorkshopItem },
    /// No doc file was found for the item at its expected location.
    DocsMissing { path: PathBuf, item: WorkshopItem },
    /// A local source file has no counterpart in the Avrae collection.
    Untracked { path: PathBuf, kind: ItemKind },
}

impl ItemComparison {
    /// The local file this comparison refers to.
    pub fn path(&self) -> &Path {
        match self {
            ItemComparison::CodeMatches { path, .. }
            | ItemComparison::CodeModified { path, .. }
            | ItemComparison::CodeMissing { path, .. }
            | ItemComparison::DocsMatch { path, .. }
            | ItemComparison::DocsModified { path, .. }
            | ItemComparison::DocsMissing { path, .. }
            | ItemComparison::Untracked { path, .. } => path,
        }
    }

    /// Whether pull should overwrite the local file with remote content.
    pub fn needs_pull(&self) -> bool {
        matches!(
            self,
            ItemComparison::CodeModified { .. }
                | ItemComparison::CodeMissing { .. }
                | ItemComparison::DocsModified { .. }
                | ItemComparison::DocsMissing { .. }
        )
    }

    /// One-line description of the difference, suitable for CLI output.
    pub fn summary(&self) -> String {
        match self {
            ItemComparison::CodeMatches { path, item } => {
                format!("{} '{}' matches avrae ({})", item.kind, item.name, path.display())
            }
            ItemComparison::CodeModified { path, item } => {
                format!("{} '{}' differs from avrae ({})", item.kind, item.name, path.display())
            }
            ItemComparison::CodeMissing { path, item } => {
                format!("{} '{}' has no local file ({})", item.kind, item.name, path.display())
            }
            ItemComparison::DocsMatch { path, item } => {
                format!("docs for {} '{}' match avrae ({})", item.kind, item.name, path.display())
            }
            ItemComparison::DocsModified { path, item } => {
                format!("docs for {} '{}' differ from avrae ({})", item.kind, item.name, path.display())
            }
            ItemComparison::DocsMissing { path, item } => {
                format!("docs for {} '{}' have no local file ({})", item.kind, item.name, path.display())
            }
            ItemComparison::Untracked { path, kind } => {
                format!("local {kind} file not found in the avrae collection ({})", path.display())
            }
        }
    }
}

/// Outcome of comparing one configured gvar with the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GvarComparison {
    /// The local file matches the gvar's value on Avrae.
    Matches { path: PathBuf, gvar: Gvar },
    /// The local file exists but its content differs from Avrae.
    Modified { path: PathBuf, gvar: Gvar },
    /// The gvar exists on Avrae but the local file is absent.
    MissingLocally { path: PathBuf, gvar: Gvar },
    /// The configured key was not among the gvars the account can edit.
    NotOnAvrae { path: PathBuf, key: GvarKey },
}

impl GvarComparison {
    /// The local file this comparison refers to.
    pub fn path(&self) -> &Path {
        match self {
            GvarComparison::Matches { path, .. }
            | GvarComparison::Modified { path, .. }
            | GvarComparison::MissingLocally { path, .. }
            | GvarComparison::NotOnAvrae { path, .. } => path,
        }
    }

    /// Whether pull should overwrite the local file with the remote value.
    pub fn needs_pull(&self) -> bool {
        matches!(
            self,
            GvarComparison::Modified { .. } | GvarComparison::MissingLocally { .. }
        )
    }

    /// One-line description of the difference, suitable for CLI output.
    pub fn summary(&self) -> String {
        match self {
            GvarComparison::Matches { path, gvar } => {
                format!("gvar '{}' matches avrae ({})", gvar.key, path.display())
            }
            GvarComparison::Modified { path, gvar } => {
                format!("gvar '{}' differs from avrae ({})", gvar.key, path.display())
            }
            GvarComparison::MissingLocally { path, gvar } => {
                format!("gvar '{}' has no local file ({})", gvar.key, path.display())
            }
            GvarComparison::NotOnAvrae { path, key } => {
                format!("gvar '{key}' is not editable by this account ({})", path.display())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// All comparisons for one configured collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionReport {
    pub collection_id: CollectionId,
    pub collection_name: String,
    /// Resolved local directory the collection syncs into.
    pub dir: PathBuf,
    pub items: Vec<ItemComparison>,
}

/// Full comparison of the repository against fetched Avrae state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub collections: Vec<CollectionReport>,
    pub gvars: Vec<GvarComparison>,
}

impl SyncReport {
    /// True when nothing differs in either direction.
    pub fn is_clean(&self) -> bool {
        self.collections.iter().all(|c| {
            c.items.iter().all(|i| {
                matches!(
                    i,
                    ItemComparison::CodeMatches { .. } | ItemComparison::DocsMatch { .. }
                )
            })
        }) && self
            .gvars
            .iter()
            .all(|g| matches!(g, GvarComparison::Matches { .. }))
    }
}

// ---------------------------------------------------------------------------
// Comparison functions
// ---------------------------------------------------------------------------

/// Compare every fetched collection and configured gvar with the local tree.
///
/// `collections` pairs each fetched collection with its resolved local
/// directory; `base_path` anchors the relative paths in `gvar_config`.
pub fn compare_all(
    collections: &[(Collection, PathBuf)],
    gvars: &[Gvar],
    gvar_config: &GvarsConfig,
    base_path: &Path,
) -> Result<SyncReport, SyncError> {
    let mut reports = Vec::new();
    for (collection, dir) in collections {
        reports.push(CollectionReport {
            collection_id: collection.id.clone(),
            collection_name: collection.name.clone(),
            dir: dir.clone(),
            items: compare_collection(collection, dir)?,
        });
    }
    Ok(SyncReport {
        collections: reports,
        gvars: compare_gvars(gvars, gvar_config, base_path)?,
    })
}

/// Compare one collection's aliases and snippets with its local directory.
///
/// Result order: alias comparisons (collection order, parents before
/// subcommands), untracked `.alias` files, snippet comparisons, untracked
/// `.snippet` files.
pub fn compare_collection(
    collection: &Collection,
    dir: &Path,
) -> Result<Vec<ItemComparison>, SyncError> {
    let mut results = Vec::new();

    // Aliases: one directory level per subcommand.
    let mut aliases = Vec::new();
    for alias in &collection.aliases {
        collect_alias_bases(dir, alias, &mut aliases);
    }
    let expected: BTreeSet<PathBuf> = aliases
        .iter()
        .map(|(base, item)| layout::with_suffix(base, item.kind.extension()))
        .collect();
    for (base, item) in &aliases {
        compare_item(base, item, &mut results)?;
    }
    for path in layout::find_files_with_suffix(dir, ItemKind::Alias.extension())? {
        if !expected.contains(&path) {
            results.push(ItemComparison::Untracked {
                path,
                kind: ItemKind::Alias,
            });
        }
    }

    // Snippets: flat under `<dir>/snippets/`.
    let snippets_dir = layout::snippets_dir(dir);
    let snippets: Vec<(PathBuf, WorkshopItem)> = collection
        .snippets
        .iter()
        .map(|s| (snippets_dir.join(&s.name), WorkshopItem::from_snippet(s)))
        .collect();
    let expected: BTreeSet<PathBuf> = snippets
        .iter()
        .map(|(base, item)| layout::with_suffix(base, item.kind.extension()))
        .collect();
    for (base, item) in &snippets {
        compare_item(base, item, &mut results)?;
    }
    for path in layout::find_files_with_suffix(&snippets_dir, ItemKind::Snippet.extension())? {
        if !expected.contains(&path) {
            results.push(ItemComparison::Untracked {
                path,
                kind: ItemKind::Snippet,
            });
        }
    }

    Ok(results)
}

/// Compare every configured gvar with its local file.
pub fn compare_gvars(
    gvars: &[Gvar],
    config: &GvarsConfig,
    base_path: &Path,
) -> Result<Vec<GvarComparison>, SyncError> {
    let mut results = Vec::new();
    for (key, relative_path) in &config.0 {
        let path = base_path.join(relative_path);
        let Some(gvar) = gvars.iter().find(|g| &g.key == key) else {
            results.push(GvarComparison::NotOnAvrae {
                path,
                key: key.clone(),
            });
            continue;
        };
        if !path.exists() {
            results.push(GvarComparison::MissingLocally {
                path,
                gvar: gvar.clone(),
            });
            continue;
        }
        let local = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        if local == gvar.value {
            results.push(GvarComparison::Matches {
                path,
                gvar: gvar.clone(),
            });
        } else {
            results.push(GvarComparison::Modified {
                path,
                gvar: gvar.clone(),
            });
        }
    }
    Ok(results)
}

/// Base file paths (no extension) for an alias and its subcommand tree.
fn collect_alias_bases(prefix: &Path, alias: &Alias, out: &mut Vec<(PathBuf, WorkshopItem)>) {
    let own_dir = prefix.join(&alias.name);
    out.push((own_dir.join(&alias.name), WorkshopItem::from_alias(alias)));
    for sub in &alias.subcommands {
        collect_alias_bases(&own_dir, sub, out);
    }
}

/// Classify one item's code file and doc file.
fn compare_item(
    base: &Path,
    item: &WorkshopItem,
    results: &mut Vec<ItemComparison>,
) -> Result<(), SyncError> {
    let code_path = layout::with_suffix(base, item.kind.extension());
    if !code_path.exists() {
        results.push(ItemComparison::CodeMissing {
            path: code_path,
            item: item.clone(),
        });
    } else {
        let local = std::fs::read_to_string(&code_path).map_err(|e| io_err(&code_path, e))?;
        if local == item.code {
            results.push(ItemComparison::CodeMatches {
                path: code_path,
                item: item.clone(),
            });
        } else {
            results.push(ItemComparison::CodeModified {
                path: code_path,
                item: item.clone(),
            });
        }
    }

    match layout::existing_doc(base) {
        None => results.push(ItemComparison::DocsMissing {
            path: layout::with_suffix(base, layout::DOC_EXTENSIONS[0]),
            item: item.clone(),
        }),
        Some(doc_path) => {
            let local = std::fs::read_to_string(&doc_path).map_err(|e| io_err(&doc_path, e))?;
            if local == item.docs {
                results.push(ItemComparison::DocsMatch {
                    path: doc_path,
                    item: item.clone(),
                });
            } else {
                results.push(ItemComparison::DocsModified {
                    path: doc_path,
                    item: item.clone(),
                });
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    pub(crate) fn fixture_alias(
        name: &str,
        id: &str,
        code: &str,
        docs: &str,
        subcommands: Vec<Alias>,
    ) -> Alias {
        Alias {
            name: name.to_string(),
            code: code.to_string(),
            docs: docs.to_string(),
            entitlements: vec![],
            collection_id: CollectionId::from("5fa19a98"),
            id: id.to_string(),
            subcommand_ids: subcommands.iter().map(|s| s.id.clone()).collect(),
            parent_id: None,
            subcommands,
        }
    }

    pub(crate) fn fixture_snippet(name: &str, id: &str, code: &str, docs: &str) -> Snippet {
        Snippet {
            name: name.to_string(),
            code: code.to_string(),
            docs: docs.to_string(),
            entitlements: vec![],
            collection_id: CollectionId::from("5fa19a98"),
            id: id.to_string(),
        }
    }

    pub(crate) fn fixture_collection() -> Collection {
        let subsub = fixture_alias("test-subsub", "eee555", "subsub code", "subsub docs", vec![]);
        let sub = fixture_alias("test-subalias", "bbb222", "sub code", "sub docs", vec![subsub]);
        let alias = fixture_alias("test-alias", "aaa111", "alias code", "alias docs", vec![sub]);
        Collection {
            name: "API Collection Test".to_string(),
            description: "fixture".to_string(),
            image: None,
            owner: "999".to_string(),
            alias_ids: vec!["aaa111".to_string()],
            snippet_ids: vec!["ccc333".to_string()],
            publish_state: avrae_core::types::PublishState::Private,
            num_subscribers: 0,
            num_guild_subscribers: 0,
            last_edited: "2020-11-03T19:43:53.676000".to_string(),
            created_at: "2020-11-03T19:36:40.123000".to_string(),
            tags: vec![],
            id: CollectionId::from("5fa19a98"),
            aliases: vec![alias],
            snippets: vec![fixture_snippet("test123", "ccc333", "snippet code", "snippet docs")],
        }
    }

    pub(crate) fn fixture_gvar(key: &str, value: &str) -> Gvar {
        Gvar {
            owner: "999".to_string(),
            key: GvarKey::from(key),
            owner_name: "my name".to_string(),
            value: value.to_string(),
            editors: vec![],
        }
    }

    #[test]
    fn alias_comparison_matrix() {
        let tmp = TempDir::new().expect("tempdir");
        let dir = tmp.path().join("API Collection Test");
        let collection = fixture_collection();

        // test-alias in sync, test-subalias edited locally, test-subsub
        // absent, plus one alias avrae does not know about.
        let alias_dir = dir.join("test-alias");
        fs::create_dir_all(alias_dir.join("test-subalias")).expect("mkdir");
        fs::write(alias_dir.join("test-alias.alias"), "alias code").expect("write");
        fs::write(alias_dir.join("test-alias.md"), "alias docs").expect("write");
        fs::write(
            alias_dir.join("test-subalias/test-subalias.alias"),
            "changed",
        )
        .expect("write");
        fs::write(alias_dir.join("test-subalias/test-subalias.md"), "changed").expect("write");
        fs::create_dir_all(dir.join("new-alias")).expect("mkdir");
        fs::write(dir.join("new-alias/new-alias.alias"), "new addition").expect("write");

        let results = compare_collection(
            &Collection {
                snippets: vec![],
                ..collection
            },
            &dir,
        )
        .expect("compare");

        let fixture = fixture_collection();
        let sub = &fixture.aliases[0].subcommands[0];
        let expected_states = vec![
            ("CodeMatches", alias_dir.join("test-alias.alias")),
            ("DocsMatch", alias_dir.join("test-alias.md")),
            ("CodeModified", alias_dir.join("test-subalias/test-subalias.alias")),
            ("DocsModified", alias_dir.join("test-subalias/test-subalias.md")),
            (
                "CodeMissing",
                alias_dir.join("test-subalias/test-subsub/test-subsub.alias"),
            ),
            (
                "DocsMissing",
                alias_dir.join("test-subalias/test-subsub/test-subsub.md"),
            ),
            ("Untracked", dir.join("new-alias/new-alias.alias")),
        ];
        assert_eq!(results.len(), expected_states.len());
        for (result, (state, path)) in results.iter().zip(&expected_states) {
            assert_eq!(result.path(), path.as_path(), "path mismatch for {state}");
            let actual = match result {
                ItemComparison::CodeMatches { .. } => "CodeMatches",
                ItemComparison::CodeModified { .. } => "CodeModified",
                ItemComparison::CodeMissing { .. } => "CodeMissing",
                ItemComparison::DocsMatch { .. } => "DocsMatch",
                ItemComparison::DocsModified { .. } => "DocsModified",
                ItemComparison::DocsMissing { .. } => "DocsMissing",
                ItemComparison::Untracked { .. } => "Untracked",
            };
            assert_eq!(&actual, state);
        }

        // Modified subalias result carries the remote item it differs from.
        match &results[2] {
            ItemComparison::CodeModified { item, .. } => {
                assert_eq!(item.id, sub.id);
                assert_eq!(item.code, sub.code);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn snippet_comparison_matrix() {
        let tmp = TempDir::new().expect("tempdir");
        let dir = tmp.path().join("API Collection Test");
        let snippets = dir.join("snippets");
        fs::create_dir_all(&snippets).expect("mkdir");
        let collection = Collection {
            aliases: vec![],
            ..fixture_collection()
        };

        // In sync.
        fs::write(snippets.join("test123.snippet"), "snippet code").expect("write");
        fs::write(snippets.join("test123.md"), "snippet docs").expect("write");
        let results = compare_collection(&collection, &dir).expect("compare");
        assert!(matches!(results[0], ItemComparison::CodeMatches { .. }));
        assert!(matches!(results[1], ItemComparison::DocsMatch { .. }));

        // Edited locally.
        fs::write(snippets.join("test123.snippet"), "modified").expect("write");
        fs::write(snippets.join("test123.md"), "modified").expect("write");
        let results = compare_collection(&collection, &dir).expect("compare");
        assert!(matches!(results[0], ItemComparison::CodeModified { .. }));
        assert!(matches!(results[1], ItemComparison::DocsModified { .. }));

        // Absent locally, plus a snippet avrae does not know about.
        fs::remove_file(snippets.join("test123.snippet")).expect("rm");
        fs::remove_file(snippets.join("test123.md")).expect("rm");
        fs::write(snippets.join("new.snippet"), "new addition").expect("write");
        let results = compare_collection(&collection, &dir).expect("compare");
        assert_eq!(results.len(), 3);
        assert!(matches!(results[0], ItemComparison::CodeMissing { .. }));
        assert!(matches!(results[1], ItemComparison::DocsMissing { .. }));
        assert_eq!(
            results[2],
            ItemComparison::Untracked {
                path: snippets.join("new.snippet"),
                kind: ItemKind::Snippet,
            }
        );
    }

    #[test]
    fn markdown_doc_variants_are_accepted() {
        let tmp = TempDir::new().expect("tempdir");
        let dir = tmp.path().join("API Collection Test");
        let snippets = dir.join("snippets");
        fs::create_dir_all(&snippets).expect("mkdir");
        fs::write(snippets.join("test123.snippet"), "snippet code").expect("write");
        fs::write(snippets.join("test123.markdown"), "snippet docs").expect("write");

        let collection = Collection {
            aliases: vec![],
            ..fixture_collection()
        };
        let results = compare_collection(&collection, &dir).expect("compare");
        assert_eq!(
            results[1],
            ItemComparison::DocsMatch {
                path: snippets.join("test123.markdown"),
                item: WorkshopItem::from_snippet(&collection.snippets[0]),
            }
        );
    }

    #[test]
    fn gvar_comparison_matrix() {
        let tmp = TempDir::new().expect("tempdir");
        fs::write(tmp.path().join("up-to-date.gvar"), "gvar content").expect("write");
        fs::create_dir_all(tmp.path().join("gvars")).expect("mkdir");
        fs::write(tmp.path().join("gvars/modified-var.gvar"), "more gvar content")
            .expect("write");
        fs::write(tmp.path().join("gvars/new-var.gvar"), "more gvar content").expect("write");

        let config: GvarsConfig = serde_json::from_str(
            r#"{
                "abc123": "up-to-date.gvar",
                "def456": "gvars/modified-var.gvar",
                "cba789": "gvars/new-var.gvar",
                "fed321": "gvars/not-found.gvar"
            }"#,
        )
        .expect("config");
        let gvars = vec![
            fixture_gvar("abc123", "gvar content"),
            fixture_gvar("def456", "current gvar content"),
            fixture_gvar("fed321", "current gvar content"),
        ];

        let results = compare_gvars(&gvars, &config, tmp.path()).expect("compare");
        // BTreeMap iteration: abc123, cba789, def456, fed321.
        assert_eq!(
            results,
            vec![
                GvarComparison::Matches {
                    path: tmp.path().join("up-to-date.gvar"),
                    gvar: gvars[0].clone(),
                },
                GvarComparison::NotOnAvrae {
                    path: tmp.path().join("gvars/new-var.gvar"),
                    key: GvarKey::from("cba789"),
                },
                GvarComparison::Modified {
                    path: tmp.path().join("gvars/modified-var.gvar"),
                    gvar: gvars[1].clone(),
                },
                GvarComparison::MissingLocally {
                    path: tmp.path().join("gvars/not-found.gvar"),
                    gvar: gvars[2].clone(),
                },
            ]
        );
    }

    #[test]
    fn every_configured_gvar_is_classified_exactly_once() {
        let tmp = TempDir::new().expect("tempdir");
        let config: GvarsConfig =
            serde_json::from_str(r#"{"a": "a.gvar", "b": "b.gvar", "c": "c.gvar"}"#)
                .expect("config");
        let results = compare_gvars(&[], &config, tmp.path()).expect("compare");
        assert_eq!(results.len(), 3);
        assert!(results
            .iter()
            .all(|r| matches!(r, GvarComparison::NotOnAvrae { .. })));
    }

    #[test]
    fn clean_report_detection() {
        let tmp = TempDir::new().expect("tempdir");
        let dir = tmp.path().join("c");
        let snippets = dir.join("snippets");
        fs::create_dir_all(&snippets).expect("mkdir");
        let collection = Collection {
            aliases: vec![],
            ..fixture_collection()
        };
        fs::write(snippets.join("test123.snippet"), "snippet code").expect("write");
        fs::write(snippets.join("test123.md"), "snippet docs").expect("write");

        let config = GvarsConfig::default();
        let report = compare_all(
            &[(collection, dir)],
            &[],
            &config,
            tmp.path(),
        )
        .expect("compare");
        assert!(report.is_clean());
    }
}
