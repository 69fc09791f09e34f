use std::sync::Arc;

use pretty_assertions::assert_eq;

use strata_classpath::LocationSet;
use strata_config::{ImportConfig, MissingDependencies};
use strata_importer::{
    ClassFileImporter, DependencyResolver, DependencyType, ImportError, InvariantViolation,
};
use strata_model::{
    Diagnostic, MemberDecl, MemberDeclaration, MemberKind, MemberOrigin, Modifiers, TypeDecl,
    TypeOrigin,
};
use strata_test_utils::{write_class_dir, write_class_jar, ClassFileBuilder, MethodBuilder};

fn dependency_jar(root: &std::path::Path) -> std::path::PathBuf {
    let jar = root.join("lib.jar");
    write_class_jar(
        &jar,
        &[
            (
                "lib/Base",
                ClassFileBuilder::class("lib/Base")
                    .method(MethodBuilder::new("helper", "()V"))
                    .default_constructor()
                    .build(),
            ),
            (
                "lib/Api",
                ClassFileBuilder::interface("lib/Api")
                    .method(MethodBuilder::abstract_method("call", "()V"))
                    .build(),
            ),
        ],
    )
    .unwrap();
    jar
}

fn app_classes(root: &std::path::Path, caller: MethodBuilder) -> LocationSet {
    let dir = root.join("app");
    write_class_dir(
        &dir,
        &[
            (
                "app/Child",
                ClassFileBuilder::class("app/Child")
                    .super_class("lib/Base")
                    .implements("lib/Api")
                    .build(),
            ),
            (
                "app/Caller",
                ClassFileBuilder::class("app/Caller").method(caller).build(),
            ),
        ],
    )
    .unwrap();
    LocationSet::from_paths([dir]).unwrap()
}

#[test]
fn dependency_classpath_supplies_inherited_members() {
    let tmp = tempfile::tempdir().unwrap();
    let jar = dependency_jar(tmp.path());
    let locations = app_classes(
        tmp.path(),
        MethodBuilder::new("go", "()V")
            .invoke_virtual("app/Child", "helper", "()V")
            .invoke_interface("app/Child", "call", "()V"),
    );

    let config = ImportConfig {
        dependency_classpath: vec![jar],
        ..ImportConfig::default()
    };
    let model = ClassFileImporter::new(config)
        .import_locations(&locations)
        .unwrap();

    let base = model.get("lib.Base").unwrap();
    assert_eq!(base.origin(), TypeOrigin::Dependency);
    assert!(base.method("helper", "()V").unwrap().declaration().is_ok());

    let targets: Vec<_> = model
        .get("app.Caller")
        .unwrap()
        .method_calls_from_self()
        .iter()
        .map(|call| (call.target().full_name(), call.target().origin()))
        .collect();
    assert_eq!(
        targets,
        vec![
            ("lib.Base.helper()V".to_string(), MemberOrigin::Dependency),
            ("lib.Api.call()V".to_string(), MemberOrigin::Dependency),
        ]
    );

    let child = model.get("app.Child").unwrap();
    assert!(child.is_assignable_to("lib.Api"));
    assert_eq!(child.super_class().unwrap().name(), "lib.Base");
    // `lib.Base` extends `java.lang.Object`, which no location provides.
    assert_eq!(
        model.get("java.lang.Object").unwrap().origin(),
        TypeOrigin::Synthesized
    );
}

#[test]
fn dependency_types_have_known_constructors() {
    let tmp = tempfile::tempdir().unwrap();
    let jar = dependency_jar(tmp.path());
    let locations = app_classes(
        tmp.path(),
        MethodBuilder::new("make", "()V").construct("lib/Base", "(J)V"),
    );

    let config = ImportConfig {
        dependency_classpath: vec![jar],
        missing_dependencies: MissingDependencies::Drop,
        ..ImportConfig::default()
    };
    let err = ClassFileImporter::new(config)
        .import_locations(&locations)
        .unwrap_err();
    assert!(matches!(
        err,
        ImportError::ResolutionInvariantViolation(InvariantViolation::MissingConstructor { .. })
    ));
}

/// Knows exactly one type, `ext.Tool`.
struct Fixed;

impl DependencyResolver for Fixed {
    fn find_type(&self, binary_name: &str) -> Option<DependencyType> {
        if binary_name != "ext.Tool" {
            return None;
        }
        let provided = MemberDecl::declared(
            MemberKind::Method,
            "provided",
            "()V",
            Modifiers::PUBLIC | Modifiers::STATIC,
            MemberOrigin::Dependency,
            MemberDeclaration::default(),
        )
        .ok()?;
        Some(DependencyType {
            decl: TypeDecl::new("ext/Tool", Modifiers::PUBLIC, TypeOrigin::Dependency),
            members: vec![provided],
        })
    }
}

#[test]
fn custom_resolvers_can_be_plugged_in() {
    let tmp = tempfile::tempdir().unwrap();
    let locations = app_classes(
        tmp.path(),
        MethodBuilder::new("go", "()V").invoke_static("ext/Tool", "provided", "()V"),
    );

    let model = ClassFileImporter::with_dependencies(ImportConfig::default(), Arc::new(Fixed))
        .import_locations(&locations)
        .unwrap();

    let tool = model.get("ext.Tool").unwrap();
    assert_eq!(tool.origin(), TypeOrigin::Dependency);
    assert_eq!(
        tool.method("provided", "()V").unwrap().origin(),
        MemberOrigin::Dependency
    );
}

#[test]
fn misplaced_dependency_class_falls_back_to_a_stub() {
    let tmp = tempfile::tempdir().unwrap();
    let deps = tmp.path().join("deps");
    write_class_dir(
        &deps,
        &[(
            "lib/Gone",
            ClassFileBuilder::class("other/Moved")
                .method(MethodBuilder::new("run", "()V"))
                .build(),
        )],
    )
    .unwrap();
    let locations = app_classes(
        tmp.path(),
        MethodBuilder::new("a", "()V").invoke_static("lib/Gone", "run", "()V"),
    );
    let extra = tmp.path().join("more");
    write_class_dir(
        &extra,
        &[(
            "app/Other",
            ClassFileBuilder::class("app/Other")
                .method(MethodBuilder::new("b", "()V").invoke_static("lib/Gone", "run", "()V"))
                .build(),
        )],
    )
    .unwrap();
    let locations = LocationSet::new(
        locations
            .iter()
            .cloned()
            .chain(LocationSet::from_paths([extra]).unwrap().iter().cloned()),
    )
    .unwrap();

    let config = ImportConfig {
        dependency_classpath: vec![deps],
        ..ImportConfig::default()
    };
    let model = ClassFileImporter::new(config)
        .import_locations(&locations)
        .unwrap();

    assert!(!model.contains("other.Moved"));
    assert_eq!(model.get("lib.Gone").unwrap().origin(), TypeOrigin::Synthesized);
    let targets: Vec<_> = ["app.Caller", "app.Other"]
        .into_iter()
        .flat_map(|name| model.get(name).unwrap().method_calls_from_self())
        .map(|call| call.target().full_name())
        .collect();
    assert_eq!(targets, vec!["lib.Gone.run()V", "lib.Gone.run()V"]);
    assert!(!model
        .diagnostics()
        .iter()
        .any(|d| matches!(d, Diagnostic::MissingDependency { .. })));
}

/// Answers every lookup with `ext.Tool`.
struct Confused;

impl DependencyResolver for Confused {
    fn find_type(&self, _binary_name: &str) -> Option<DependencyType> {
        Fixed.find_type("ext.Tool")
    }
}

#[test]
fn resolver_answers_for_other_names_are_ignored() {
    let tmp = tempfile::tempdir().unwrap();
    let locations = app_classes(
        tmp.path(),
        MethodBuilder::new("go", "()V")
            .invoke_static("ext/Wanted", "provided", "()V")
            .invoke_static("ext/Tool", "provided", "()V"),
    );

    let config = ImportConfig {
        missing_dependencies: MissingDependencies::Drop,
        ..ImportConfig::default()
    };
    let model = ClassFileImporter::with_dependencies(config, Arc::new(Confused))
        .import_locations(&locations)
        .unwrap();

    assert!(!model.contains("ext.Wanted"));
    let targets: Vec<_> = model
        .get("app.Caller")
        .unwrap()
        .method_calls_from_self()
        .iter()
        .map(|call| call.target().full_name())
        .collect();
    assert_eq!(targets, vec!["ext.Tool.provided()V"]);
}
