//! Façade scenarios: lazy exactly-once composition, descriptor
//! derivation through the full pipeline, extensions, and fail-fast
//! validation.

use env_core::{Environment, EnvironmentConfig, Error, Extension, Result};
use env_model::{Module, ModuleId, Volume};
use env_test_utils::{BundleFixture, FixedResolver, module};
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::Ordering;

fn top_level_id() -> ModuleId {
    ModuleId::new("com.example", "service3-env", "1.0.0")
}

fn services() -> Vec<Module> {
    vec![
        module("service3", "service3"),
        module("service2", "service3"),
        module("service1", "service3"),
    ]
}

fn environment(fixture: &BundleFixture, modules: Vec<Module>) -> Environment {
    environment_with(fixture, modules, EnvironmentConfig::builder(top_level_id()))
}

fn environment_with(
    fixture: &BundleFixture,
    modules: Vec<Module>,
    builder: env_core::EnvironmentConfigBuilder,
) -> Environment {
    Environment::new(
        builder.resources_root(fixture.resources_root()).build(),
        Box::new(FixedResolver::new(modules)),
        Box::new(fixture.loader()),
    )
    .unwrap()
}

#[test]
fn descriptors_are_derived_from_the_resolved_trees() {
    let fixture = BundleFixture::new();
    fixture.write("service3", "files/etc/motd", "hello");
    fixture.write("service3", "env/service3.env", "A=1");
    fixture.props(
        "service3",
        "env.properties",
        &[("docker.entrypoint", "/entry.sh"), ("docker.cmd", "serve")],
    );

    let env = environment(&fixture, services());
    let modules = env.modules().unwrap();

    let service3 = &modules[0];
    assert_eq!(service3.image.as_deref(), Some("docker.io/service3:1.0.0"));
    assert_eq!(service3.entrypoint.as_deref(), Some("/entry.sh"));
    assert_eq!(service3.command.as_deref(), Some("serve"));

    let resolved = env.module_resolved_path(service3);
    assert_eq!(
        service3.volumes.iter().collect::<Vec<_>>(),
        vec![&Volume::new(
            resolved.join("files/etc/motd"),
            PathBuf::from("/etc/motd"),
        )]
    );
    assert_eq!(
        service3.env_files.iter().collect::<Vec<_>>(),
        vec![&resolved.join("env/service3.env")]
    );

    // Config-only modules with no bundle still get the default image
    let service2 = &modules[1];
    assert_eq!(service2.image.as_deref(), Some("docker.io/service2:1.0.0"));
    assert!(service2.volumes.is_empty());
    assert!(service2.env_files.is_empty());
}

#[test]
fn image_sentinel_none_wins_over_other_image_keys() {
    let fixture = BundleFixture::new();
    fixture.props(
        "service3",
        "env.properties",
        &[("docker.image", "none"), ("docker.cmd", "serve")],
    );

    let env = environment(&fixture, services());
    let modules = env.modules().unwrap();

    assert_eq!(modules[0].image, None);
    assert_eq!(modules[0].command.as_deref(), Some("serve"));
}

#[test]
fn cross_module_override_reaches_the_configurator() {
    let fixture = BundleFixture::new();
    fixture.props("service3", "env.properties", &[("docker.image", "base")]);
    // service1 has the highest precedence and retargets service3's image
    fixture.props(
        "service1",
        "service3/env.properties",
        &[("docker.image", "registry.example.com/patched:7")],
    );

    let env = environment(&fixture, services());
    let modules = env.modules().unwrap();

    assert_eq!(
        modules[0].image.as_deref(),
        Some("registry.example.com/patched:7")
    );
    assert_eq!(
        modules[0].properties["docker.image"],
        "registry.example.com/patched:7"
    );
}

#[test]
fn module_list_is_computed_exactly_once() {
    let fixture = BundleFixture::new();
    let resolver = FixedResolver::new(services());
    let calls = resolver.call_counter();
    let env = Environment::new(
        EnvironmentConfig::builder(top_level_id())
            .resources_root(fixture.resources_root())
            .build(),
        Box::new(resolver),
        Box::new(fixture.loader()),
    )
    .unwrap();

    let first = env.modules().unwrap();
    let second = env.modules().unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn concurrent_first_access_still_computes_once() {
    let fixture = BundleFixture::new();
    let resolver = FixedResolver::new(services());
    let calls = resolver.call_counter();
    let env = Arc::new(
        Environment::new(
            EnvironmentConfig::builder(top_level_id())
                .resources_root(fixture.resources_root())
                .build(),
            Box::new(resolver),
            Box::new(fixture.loader()),
        )
        .unwrap(),
    );

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let env = Arc::clone(&env);
            std::thread::spawn(move || env.modules().unwrap())
        })
        .collect();
    let lists: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    for list in &lists[1..] {
        assert!(Arc::ptr_eq(&lists[0], list));
    }
}

#[test]
fn invalid_filter_pattern_fails_before_any_resolution() {
    let fixture = BundleFixture::new();
    let resolver = FixedResolver::new(services());
    let calls = resolver.call_counter();

    let err = Environment::new(
        EnvironmentConfig::builder(top_level_id())
            .module_filter_pattern("(two)(groups)")
            .resources_root(fixture.resources_root())
            .build(),
        Box::new(resolver),
        Box::new(fixture.loader()),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        Error::Model(env_model::Error::FilterPattern { .. })
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

struct TagExtension {
    tag: &'static str,
}

impl Extension for TagExtension {
    fn name(&self) -> &str {
        self.tag
    }

    fn apply(&self, environment: &Environment, modules: Vec<Module>) -> Result<Vec<Module>> {
        modules
            .into_iter()
            .map(|m| {
                // Extensions may inspect the resolved trees
                assert!(
                    environment
                        .module_resolved_path(&m)
                        .starts_with(environment.resources_root())
                );
                let mut properties = m.properties.clone();
                let trail = properties.get("extension.trail").cloned().unwrap_or_default();
                properties.insert("extension.trail".into(), format!("{trail}{}", self.tag));
                Ok(m.to_builder().properties(properties).build())
            })
            .collect()
    }
}

struct FailingExtension;

impl Extension for FailingExtension {
    fn name(&self) -> &str {
        "failing"
    }

    fn apply(&self, _environment: &Environment, _modules: Vec<Module>) -> Result<Vec<Module>> {
        Err(Error::Extension {
            name: "failing".into(),
            message: "boom".into(),
        })
    }
}

#[test]
fn extensions_run_in_registration_order() {
    let fixture = BundleFixture::new();
    let env = environment_with(
        &fixture,
        services(),
        EnvironmentConfig::builder(top_level_id())
            .extension(Arc::new(TagExtension { tag: "a" }))
            .extension(Arc::new(TagExtension { tag: "b" })),
    );

    let modules = env.modules().unwrap();
    assert_eq!(modules[0].properties["extension.trail"], "ab");
}

#[test]
fn extension_failure_aborts_the_pipeline() {
    let fixture = BundleFixture::new();
    let env = environment_with(
        &fixture,
        services(),
        EnvironmentConfig::builder(top_level_id())
            .extension(Arc::new(FailingExtension)),
    );

    let err = env.modules().unwrap_err();
    assert!(matches!(err, Error::Extension { .. }));
}

#[test]
fn final_list_serialises_for_the_orchestration_backend() {
    let fixture = BundleFixture::new();
    fixture.props("service3", "env.properties", &[("docker.image", "none")]);

    let env = environment(&fixture, services());
    let modules = env.modules().unwrap();

    let json = serde_json::to_value(&*modules).unwrap();
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 3);
    assert_eq!(list[0]["short_name"], "service3");
    assert_eq!(list[0]["image"], serde_json::Value::Null);
    assert_eq!(list[1]["image"], "docker.io/service2:1.0.0");
}
