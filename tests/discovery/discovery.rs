use packdoc::core::error::PackdocError;
use packdoc::{Finder, Namespace, NamespaceLike, Package};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::{TempDir, tempdir};

/// Builds a fixture tree. Entries ending in `/` are directories, the rest files.
fn fixture(entries: &[&str]) -> TempDir {
    let tmp = tempdir().expect("tempdir");
    for entry in entries {
        let path = tmp.path().join(entry.trim_end_matches('/'));
        if entry.ends_with('/') {
            fs::create_dir_all(&path).expect("create fixture dir");
        } else {
            fs::create_dir_all(path.parent().expect("fixture parent")).expect("create parent");
            fs::write(&path, format!("{}\n", entry)).expect("write fixture file");
        }
    }
    tmp
}

fn real(root: &Path, rel: &str) -> PathBuf {
    fs::canonicalize(root.join(rel)).expect("canonical fixture path")
}

fn find(namespaces: Vec<Namespace>, roots: &[&str]) -> Vec<Package> {
    Finder::new(namespaces, roots.iter().map(|r| r.to_string()).collect())
        .find_all()
        .expect("finder")
}

fn ids(packages: &[Package]) -> Vec<&str> {
    packages.iter().map(|p| p.id()).collect()
}

fn assert_child_of(child: &Package, parent: &Package) {
    assert!(child.is_sub_package(), "{} should be a sub-package", child.id());
    assert_eq!(child.parent(), Some(parent));
}

// ===== Namespace =====

#[test]
fn namespace_creation_canonicalises_and_dedups_paths() {
    let tmp = fixture(&["root1/"]);
    let root = tmp.path();
    let ns = Namespace::new(
        "Id",
        [
            root.to_path_buf(),
            root.join("root1/../root1"),
            root.to_path_buf(),
        ],
    )
    .expect("namespace");

    assert_eq!(ns.id(), "Id");
    assert_eq!(ns.paths(), &[real(root, "."), real(root, "root1")]);
}

#[test]
fn namespace_creation_rejects_bad_identifier_and_paths() {
    let tmp = fixture(&[]);
    let err = Namespace::new("A\\Name-Space", [tmp.path()]).unwrap_err();
    assert!(matches!(err, PackdocError::InvalidIdentifier(_)));

    let err = Namespace::new("A\\Namespace", ["this/path/isnt/real"]).unwrap_err();
    assert!(matches!(err, PackdocError::InvalidPath(_)));

    let err = Namespace::new(
        "A\\Namespace",
        [
            tmp.path().to_path_buf(),
            PathBuf::from("this/path/isnt/real"),
        ],
    )
    .unwrap_err();
    assert!(matches!(err, PackdocError::InvalidPath(_)));
}

#[test]
fn namespace_parent_ids() {
    let tmp = fixture(&[]);
    let cases = [
        ("Root", None),
        ("One\\Tier", Some("One")),
        ("Two\\Tier\\s", Some("Two\\Tier")),
    ];
    for (id, expected) in cases {
        let ns = Namespace::new(id, [tmp.path()]).expect("namespace");
        assert_eq!(ns.parent_id(), expected, "parent of {}", id);
    }
}

fn split_roots() -> TempDir {
    fixture(&[
        "root1/Package1/A/",
        "root1/Package3/",
        "root2/Package2/",
        "root2/Package3/",
    ])
}

#[test]
fn find_namespace_misses() {
    let tmp = split_roots();
    let root = tmp.path();
    let ns = Namespace::new("Test", [root.join("root1")]).expect("namespace");
    assert!(ns.find_namespace("Test\\Illegal-Namespace").is_none());
    assert!(ns.find_namespace("Test\\Package1\\C").is_none());

    let package1 =
        Namespace::new("Test\\Package1", [root.join("root1/Package1")]).expect("namespace");
    assert!(package1.find_namespace("Test\\Package3\\A").is_none());
}

#[test]
fn find_namespace_hits() {
    let tmp = split_roots();
    let root = tmp.path();
    let single = Namespace::new("Test", [root.join("root1")]).expect("namespace");
    let found = single.find_namespace("Test\\Package1\\A").expect("found");
    assert_eq!(found.id(), "Test\\Package1\\A");
    assert_eq!(found.paths(), &[real(root, "root1/Package1/A")]);

    let split = Namespace::new("Test", [root.join("root1"), root.join("root2")]).expect("namespace");
    let found = split.find_namespace("Test\\Package3").expect("found");
    assert_eq!(
        found.paths(),
        &[real(root, "root1/Package3"), real(root, "root2/Package3")]
    );

    let found = split.find_namespace("Test\\Package2").expect("found");
    assert_eq!(found.paths(), &[real(root, "root2/Package2")]);
}

#[test]
fn iterate_single_and_split_namespace() {
    let tmp = split_roots();
    let root = tmp.path();

    let single = Namespace::new("Test", [root.join("root1")]).expect("namespace");
    let children: Vec<Namespace> = single.iter_namespaces().expect("children").collect();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].id(), "Test\\Package1");
    assert_eq!(children[1].id(), "Test\\Package3");

    let split = Namespace::new("Test", [root.join("root1"), root.join("root2")]).expect("namespace");
    let children: Vec<Namespace> = split.iter_namespaces().expect("children").collect();
    assert_eq!(children.len(), 3);
    assert_eq!(children[0].paths(), &[real(root, "root1/Package1")]);
    assert_eq!(children[1].id(), "Test\\Package2");
    assert_eq!(children[1].paths(), &[real(root, "root2/Package2")]);
    assert_eq!(children[2].id(), "Test\\Package3");
    assert_eq!(
        children[2].paths(),
        &[real(root, "root1/Package3"), real(root, "root2/Package3")]
    );
}

// ===== Finder =====

#[test]
fn finder_on_empty_namespace_finds_nothing() {
    let tmp = fixture(&[]);
    let packages = find(vec![Namespace::new("Test", [tmp.path()]).unwrap()], &["Test"]);
    assert!(packages.is_empty());
}

#[test]
fn finder_with_single_package() {
    let tmp = fixture(&["A/readme.md", "A/Thing.php"]);
    let packages = find(vec![Namespace::new("Test", [tmp.path()]).unwrap()], &["Test"]);
    assert_eq!(ids(&packages), vec!["Test\\A"]);
    assert!(!packages[0].is_sub_package());
}

#[test]
fn finder_with_multiple_packages() {
    let tmp = fixture(&["C/", "A/", "B/"]);
    let packages = find(vec![Namespace::new("Test", [tmp.path()]).unwrap()], &["Test"]);
    assert_eq!(ids(&packages), vec!["Test\\A", "Test\\B", "Test\\C"]);
}

#[test]
fn finder_with_sub_packages() {
    let tmp = fixture(&["A/1/readme.md", "A/2/readme.md"]);
    let packages = find(vec![Namespace::new("Test", [tmp.path()]).unwrap()], &["Test"]);

    assert_eq!(ids(&packages), vec!["Test\\A", "Test\\A\\1", "Test\\A\\2"]);
    assert!(!packages[0].is_sub_package());
    assert!(packages[0].parent().is_none());
    assert_child_of(&packages[1], &packages[0]);
    assert_child_of(&packages[2], &packages[0]);
}

#[test]
fn finder_shares_one_parent_handle() {
    let tmp = fixture(&["A/1/readme.md", "A/2/"]);
    let packages = find(vec![Namespace::new("Test", [tmp.path()]).unwrap()], &["Test"]);

    let first = packages[1].parent_handle().expect("parent");
    let second = packages[2].parent_handle().expect("parent");
    assert!(Arc::ptr_eq(first, second));
}

#[test]
fn finder_infers_every_directory_as_sub_package() {
    let tmp = fixture(&["A/1/readme.md", "A/2/Thing.php", "A/3/", "A/Loose.php"]);
    let packages = find(vec![Namespace::new("Test", [tmp.path()]).unwrap()], &["Test"]);

    assert_eq!(
        ids(&packages),
        vec!["Test\\A", "Test\\A\\1", "Test\\A\\2", "Test\\A\\3"]
    );
    for sub in &packages[1..] {
        assert_child_of(sub, &packages[0]);
    }
}

#[test]
fn finder_does_not_nest_deeper_than_one_tier() {
    let tmp = fixture(&["A/1/readme.md", "A/1/x/readme.md", "A/1/x/y/"]);
    let packages = find(vec![Namespace::new("Test", [tmp.path()]).unwrap()], &["Test"]);
    assert_eq!(ids(&packages), vec!["Test\\A", "Test\\A\\1"]);
}

#[test]
fn finder_where_namespace_is_package() {
    let tmp = fixture(&["1/readme.md", "2/"]);
    let packages = find(vec![Namespace::new("Test\\A", [tmp.path()]).unwrap()], &["Test"]);

    assert_eq!(ids(&packages), vec!["Test\\A", "Test\\A\\1", "Test\\A\\2"]);
    assert!(!packages[0].is_sub_package());
    assert_child_of(&packages[1], &packages[0]);
    assert_child_of(&packages[2], &packages[0]);
}

#[test]
fn finder_merges_direct_packages_sharing_an_identifier() {
    let tmp = fixture(&["one/1/readme.md", "two/2/"]);
    let root = tmp.path();
    let packages = find(
        vec![
            Namespace::new("Test\\A", [root.join("one")]).unwrap(),
            Namespace::new("Test\\A", [root.join("two")]).unwrap(),
        ],
        &["Test"],
    );

    assert_eq!(ids(&packages), vec!["Test\\A", "Test\\A\\1", "Test\\A\\2"]);
    assert_eq!(packages[0].paths(), &[real(root, "one"), real(root, "two")]);
    assert_eq!(packages[2].paths(), &[real(root, "two/2")]);
}

#[test]
fn finder_across_split_namespace() {
    let tmp = fixture(&[
        "split_a/A/",
        "split_a/C/1/readme.md",
        "split_b/B/",
        "split_b/C/2/Thing.php",
    ]);
    let root = tmp.path();
    let packages = find(
        vec![
            Namespace::new("Test", [root.join("split_a")]).unwrap(),
            Namespace::new("Test", [root.join("split_b")]).unwrap(),
        ],
        &["Test"],
    );

    assert_eq!(
        ids(&packages),
        vec!["Test\\A", "Test\\B", "Test\\C", "Test\\C\\1", "Test\\C\\2"]
    );

    let (a, b, c, c1, c2) = (
        &packages[0],
        &packages[1],
        &packages[2],
        &packages[3],
        &packages[4],
    );
    assert_eq!(a.paths(), &[real(root, "split_a/A")]);
    assert!(!a.is_sub_package());
    assert_eq!(b.paths(), &[real(root, "split_b/B")]);
    assert!(!b.is_sub_package());
    assert_eq!(c.paths(), &[real(root, "split_a/C"), real(root, "split_b/C")]);
    assert!(!c.is_sub_package());

    assert_child_of(c1, c);
    assert_eq!(c1.paths(), &[real(root, "split_a/C/1")]);
    assert_child_of(c2, c);
    assert_eq!(c2.paths(), &[real(root, "split_b/C/2")]);
}

#[test]
fn finder_walks_roots_in_supplied_order() {
    let tmp = fixture(&["Root1/A/1/readme.md", "Root2/B/", "Root2/C/"]);
    let namespaces = vec![Namespace::new("Test", [tmp.path()]).unwrap()];

    let packages = find(namespaces.clone(), &["Test\\Root1", "Test\\Root2"]);
    assert_eq!(
        ids(&packages),
        vec!["Test\\Root1\\A", "Test\\Root1\\A\\1", "Test\\Root2\\B", "Test\\Root2\\C"]
    );

    let packages = find(namespaces, &["Test\\Root2", "Test\\Root1"]);
    assert_eq!(
        ids(&packages),
        vec!["Test\\Root2\\B", "Test\\Root2\\C", "Test\\Root1\\A", "Test\\Root1\\A\\1"]
    );
}

#[test]
fn finder_emits_scanned_packages_before_direct_ones() {
    let tmp = fixture(&["lib/Z/", "direct/"]);
    let root = tmp.path();
    let packages = find(
        vec![
            Namespace::new("Test\\A", [root.join("direct")]).unwrap(),
            Namespace::new("Test", [root.join("lib")]).unwrap(),
        ],
        &["Test"],
    );
    assert_eq!(ids(&packages), vec!["Test\\Z", "Test\\A"]);
}

#[test]
fn finder_ignores_unknown_and_malformed_roots() {
    let tmp = fixture(&["A/"]);
    let packages = find(
        vec![Namespace::new("Test", [tmp.path()]).unwrap()],
        &["Other", "Test\\Bad-Root", "Test"],
    );
    assert_eq!(ids(&packages), vec!["Test\\A"]);
}

#[test]
fn finder_is_restartable() {
    let tmp = fixture(&["A/1/readme.md", "B/"]);
    let finder = Finder::new(
        vec![Namespace::new("Test", [tmp.path()]).unwrap()],
        vec!["Test".to_string()],
    );

    let first: Vec<Package> = finder.iter().collect::<Result<_, _>>().unwrap();
    let second: Vec<Package> = (&finder).into_iter().collect::<Result<_, _>>().unwrap();
    assert_eq!(first, second);
    assert_eq!(finder.find_all_parallel().unwrap(), first);
}
