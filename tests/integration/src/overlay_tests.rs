//! Overlay resolution scenarios.
//!
//! Three services in precedence order `[service3, service2, service1]`
//! (ascending — service1 wins conflicts), with service1 and service2
//! injecting resources into service3's resolved tree.

use env_core::ResourceRepository;
use env_fs::{checksum, props, walk};
use env_model::Module;
use env_test_utils::{BundleFixture, module};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

fn services() -> Vec<Module> {
    vec![
        module("service3", "service3"),
        module("service2", "service3"),
        module("service1", "service3"),
    ]
}

fn repository(fixture: &BundleFixture) -> ResourceRepository {
    ResourceRepository::new(fixture.resources_root(), vec!["env.properties".to_string()])
}

fn extract_and_resolve(fixture: &BundleFixture, modules: &[Module]) -> ResourceRepository {
    let repo = repository(fixture);
    repo.extract(modules, &fixture.loader()).unwrap();
    repo.resolve_overlays(modules).unwrap();
    repo
}

#[test]
fn whole_file_override_follows_precedence() {
    let fixture = BundleFixture::new();
    // service3's own contributions
    fixture.write("service3", "files/injected.by.service3", "service3");
    fixture.write("service3", "files/overridden.by.service1", "service3");
    fixture.write("service3", "files/overridden.by.service2", "service3");
    // service2 injects into service3
    fixture.write("service2", "service3/files/injected.by.service2", "service2");
    fixture.write("service2", "service3/files/overridden.by.service2", "service2");
    fixture.write(
        "service2",
        "service3/files/injected.by.service2.and.overridden.by.service1",
        "service2",
    );
    // service1 injects into service3, highest precedence
    fixture.write("service1", "service3/files/injected.by.service1", "service1");
    fixture.write("service1", "service3/files/overridden.by.service1", "service1");
    fixture.write(
        "service1",
        "service3/files/injected.by.service2.and.overridden.by.service1",
        "service1",
    );
    fixture.write(
        "service1",
        "service3/files/subfolder/subfolder.injected.by.service1",
        "service1",
    );

    extract_and_resolve(&fixture, &services());

    assert_eq!(
        fixture.read_resolved("resolved/service3/files/injected.by.service1"),
        "service1"
    );
    assert_eq!(
        fixture.read_resolved("resolved/service3/files/injected.by.service2"),
        "service2"
    );
    assert_eq!(
        fixture.read_resolved("resolved/service3/files/injected.by.service3"),
        "service3"
    );
    assert_eq!(
        fixture.read_resolved("resolved/service3/files/overridden.by.service1"),
        "service1"
    );
    assert_eq!(
        fixture.read_resolved("resolved/service3/files/overridden.by.service2"),
        "service2"
    );
    assert_eq!(
        fixture.read_resolved(
            "resolved/service3/files/injected.by.service2.and.overridden.by.service1"
        ),
        "service1"
    );
    assert_eq!(
        fixture.read_resolved("resolved/service3/files/subfolder/subfolder.injected.by.service1"),
        "service1"
    );
}

#[test]
fn merge_kind_files_union_keys_and_highest_index_wins() {
    let fixture = BundleFixture::new();
    fixture.props(
        "service3",
        "files/config.properties",
        &[
            ("overridden.from.service1", "service3value"),
            ("overridden.from.service2", "service3value"),
            ("added.from.service3", "service3value"),
        ],
    );
    fixture.props(
        "service2",
        "service3/files/config.properties",
        &[
            ("overridden.from.service2", "service2value"),
            ("added.from.service2", "service2value"),
            ("added.from.service2.and.overridden.from.service1", "service2value"),
        ],
    );
    fixture.props(
        "service1",
        "service3/files/config.properties",
        &[
            ("overridden.from.service1", "service1value"),
            ("added.from.service1", "service1value"),
            ("added.from.service2.and.overridden.from.service1", "service1value"),
        ],
    );
    // The recognised configuration file at the bundle root merges too
    fixture.props(
        "service3",
        "env.properties",
        &[("docker.image", "service3")],
    );
    fixture.props(
        "service1",
        "service3/env.properties",
        &[("network.aliases", "my-service3")],
    );

    let repo = extract_and_resolve(&fixture, &services());

    let config =
        props::read_file(&repo.resolved_path("service3").join("files/config.properties")).unwrap();
    assert_eq!(config["overridden.from.service2"], "service2value");
    assert_eq!(config["overridden.from.service1"], "service1value");
    assert_eq!(config["added.from.service3"], "service3value");
    assert_eq!(config["added.from.service2"], "service2value");
    assert_eq!(config["added.from.service1"], "service1value");
    assert_eq!(
        config["added.from.service2.and.overridden.from.service1"],
        "service1value"
    );

    let env_props = props::read_file(&repo.resolved_path("service3").join("env.properties")).unwrap();
    assert_eq!(env_props["docker.image"], "service3");
    assert_eq!(env_props["network.aliases"], "my-service3");
}

#[test]
fn env_contributions_override_whole_file_like_files() {
    let fixture = BundleFixture::new();
    fixture.write("service3", "env/service3.env", "SOURCE=self");
    fixture.write("service2", "service3/env/service3.env", "SOURCE=service2");
    fixture.write("service1", "service3/env/extra.env", "EXTRA=1");

    extract_and_resolve(&fixture, &services());

    assert_eq!(
        fixture.read_resolved("resolved/service3/env/service3.env"),
        "SOURCE=service2"
    );
    assert_eq!(
        fixture.read_resolved("resolved/service3/env/extra.env"),
        "EXTRA=1"
    );
}

#[test]
fn contributions_do_not_leak_into_other_destinations() {
    let fixture = BundleFixture::new();
    fixture.write("service1", "service3/files/only.for.service3", "service1");
    fixture.write("service1", "files/own.file", "service1");

    extract_and_resolve(&fixture, &services());

    fixture.assert_resolved_exists("resolved/service3/files/only.for.service3");
    fixture.assert_resolved_not_exists("resolved/service2/files/only.for.service3");
    fixture.assert_resolved_not_exists("resolved/service1/files/only.for.service3");
    // A contributor's own files stay in its own tree
    fixture.assert_resolved_exists("resolved/service1/files/own.file");
    // The contribution directory itself is not part of service1's tree
    fixture.assert_resolved_not_exists("resolved/service1/service3");
}

/// Checksum every file in a resolved tree, keyed by relative path.
fn tree_checksums(repo: &ResourceRepository, short: &str) -> BTreeMap<String, String> {
    let root = repo.resolved_path(short);
    walk::walk_relative(&root)
        .unwrap()
        .into_iter()
        .map(|rel| {
            let sum = checksum::file_checksum(&root.join(&rel)).unwrap();
            (rel.to_string_lossy().into_owned(), sum)
        })
        .collect()
}

#[test]
fn resolving_twice_is_byte_identical() {
    let fixture = BundleFixture::new();
    fixture.write("service3", "files/app.conf", "port=80");
    fixture.props(
        "service3",
        "files/config.properties",
        &[("b", "2"), ("a", "1")],
    );
    fixture.props("service2", "service3/files/config.properties", &[("c", "3")]);
    fixture.write("service1", "service3/env/svc.env", "X=1");

    let modules = services();
    let repo = extract_and_resolve(&fixture, &modules);
    let first = tree_checksums(&repo, "service3");
    assert!(!first.is_empty());

    repo.extract(&modules, &fixture.loader()).unwrap();
    repo.resolve_overlays(&modules).unwrap();
    let second = tree_checksums(&repo, "service3");

    assert_eq!(first, second);
}
