use pretty_assertions::assert_eq;

use strata_classpath::LocationSet;
use strata_config::{ImportConfig, MissingDependencies};
use strata_importer::{ClassFileImporter, ImportError, InvariantViolation};
use strata_model::{CodeUnitId, Diagnostic, TargetDescriptor, TargetKind};
use strata_test_utils::{write_class_dir, ClassFileBuilder, MethodBuilder};

use super::{config, import_dir};

#[test]
fn missing_dependency_drops_the_reference_without_failing() {
    let tmp = tempfile::tempdir().unwrap();
    let model = import_dir(
        tmp.path(),
        &[(
            "app/Caller",
            ClassFileBuilder::class("app/Caller")
                .method(
                    MethodBuilder::new("call", "()V")
                        .invoke_static("lib/Gone", "run", "()V")
                        .invoke_virtual("app/Caller", "call", "()V"),
                )
                .build(),
        )],
        config(MissingDependencies::Drop),
    )
    .unwrap();

    assert!(!model.contains("lib.Gone"));
    let calls = model.get("app.Caller").unwrap().method_calls_from_self();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].target().full_name(), "app.Caller.call()V");

    let missing: Vec<_> = model
        .diagnostics()
        .iter()
        .filter_map(|d| match d {
            Diagnostic::MissingDependency { target, .. } => Some(target.owner.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(missing, vec!["lib.Gone"]);
}

#[test]
fn constructor_missing_from_an_imported_type_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let err = import_dir(
        tmp.path(),
        &[
            (
                "app/Target",
                ClassFileBuilder::class("app/Target").default_constructor().build(),
            ),
            (
                "app/Caller",
                ClassFileBuilder::class("app/Caller")
                    .method(MethodBuilder::new("make", "()V").construct("app/Target", "(I)V"))
                    .build(),
            ),
        ],
        ImportConfig::default(),
    )
    .unwrap_err();

    assert_eq!(
        err,
        ImportError::ResolutionInvariantViolation(InvariantViolation::MissingConstructor {
            caller: CodeUnitId::new("app.Caller", "make", "()V"),
            target: TargetDescriptor {
                owner: "app.Target".into(),
                name: "<init>".into(),
                descriptor: "(I)V".into(),
                kind: TargetKind::Constructor,
            },
        })
    );
}

#[test]
fn malformed_class_files_are_skipped_with_a_diagnostic() {
    let tmp = tempfile::tempdir().unwrap();
    let model = import_dir(
        tmp.path(),
        &[
            ("app/Good", ClassFileBuilder::class("app/Good").build()),
            ("app/Bad", b"not a class file".to_vec()),
        ],
        ImportConfig::default(),
    )
    .unwrap();

    assert!(model.contains("app.Good"));
    assert!(!model.contains("app.Bad"));
    assert!(model.diagnostics().iter().any(|d| matches!(
        d,
        Diagnostic::MalformedBinary { entry, .. } if entry == "app/Bad.class"
    )));
}

#[test]
fn invalid_target_descriptor_is_dropped() {
    let tmp = tempfile::tempdir().unwrap();
    let model = import_dir(
        tmp.path(),
        &[(
            "app/Caller",
            ClassFileBuilder::class("app/Caller")
                .method(MethodBuilder::new("call", "()V").invoke_static("lib/Util", "run", "(X)V"))
                .build(),
        )],
        ImportConfig::default(),
    )
    .unwrap();

    assert!(model
        .get("app.Caller")
        .unwrap()
        .method_calls_from_self()
        .is_empty());
    assert!(!model.contains("lib.Util"));
    assert!(model
        .diagnostics()
        .iter()
        .any(|d| matches!(d, Diagnostic::InvalidDescriptor { .. })));
}

#[test]
fn first_location_wins_for_duplicate_types() {
    let tmp = tempfile::tempdir().unwrap();
    let a = tmp.path().join("a");
    let b = tmp.path().join("b");
    write_class_dir(
        &a,
        &[(
            "app/Dup",
            ClassFileBuilder::class("app/Dup")
                .method(MethodBuilder::new("fromA", "()V"))
                .build(),
        )],
    )
    .unwrap();
    write_class_dir(
        &b,
        &[(
            "app/Dup",
            ClassFileBuilder::class("app/Dup")
                .method(MethodBuilder::new("fromB", "()V"))
                .build(),
        )],
    )
    .unwrap();

    let locations = LocationSet::from_paths([b, a]).unwrap();
    let model = ClassFileImporter::new(ImportConfig::default())
        .import_locations(&locations)
        .unwrap();

    let dup = model.get("app.Dup").unwrap();
    assert!(dup.method("fromA", "()V").is_ok());
    assert!(dup.method("fromB", "()V").is_err());
    let duplicates: Vec<_> = model
        .diagnostics()
        .iter()
        .filter(|d| matches!(d, Diagnostic::DuplicateType { .. }))
        .collect();
    assert_eq!(duplicates.len(), 1);
}

#[test]
fn unreadable_location_is_reported() {
    let tmp = tempfile::tempdir().unwrap();
    let locations = LocationSet::from_paths([tmp.path().join("missing.jar")]).unwrap();
    let model = ClassFileImporter::new(ImportConfig::default())
        .import_locations(&locations)
        .unwrap();

    assert!(model.is_empty());
    assert!(matches!(
        model.diagnostics(),
        [Diagnostic::UnreadableLocation { .. }]
    ));
}
