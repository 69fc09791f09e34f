use pretty_assertions::assert_eq;

use strata_classpath::LocationSet;
use strata_config::{ImportConfig, MissingDependencies};
use strata_importer::ClassFileImporter;
use strata_model::{AccessType, MemberOrigin, Modifiers, ModelError, TypeOrigin};
use strata_test_utils::{write_class_dir, ClassFileBuilder, MethodBuilder};

use super::{config, import_dir, method_calls};

#[test]
fn resolves_inherited_members_through_the_declared_owner() {
    let tmp = tempfile::tempdir().unwrap();
    let model = import_dir(
        tmp.path(),
        &[
            (
                "app/Base",
                ClassFileBuilder::class("app/Base")
                    .field(0x0001, "count", "I")
                    .method(MethodBuilder::new("run", "()V"))
                    .default_constructor()
                    .build(),
            ),
            (
                "app/Child",
                ClassFileBuilder::class("app/Child")
                    .super_class("app/Base")
                    .default_constructor()
                    .build(),
            ),
            (
                "app/Caller",
                ClassFileBuilder::class("app/Caller")
                    .method(
                        MethodBuilder::new("go", "()V")
                            .line(10)
                            .construct("app/Child", "()V")
                            .invoke_virtual("app/Child", "run", "()V")
                            .put_field("app/Child", "count", "I"),
                    )
                    .build(),
            ),
        ],
        ImportConfig::default(),
    )
    .unwrap();

    let caller = model.get("app.Caller").unwrap();
    let calls = caller.method_calls_from_self();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].target().full_name(), "app.Base.run()V");
    assert_eq!(calls[0].line(), Some(10));

    let accesses = caller.field_accesses_from_self();
    assert_eq!(accesses.len(), 1);
    assert_eq!(accesses[0].target().owner().name(), "app.Base");
    assert_eq!(accesses[0].access_type(), AccessType::Set);

    let constructors = caller.constructor_calls_from_self();
    assert_eq!(constructors.len(), 1);
    assert_eq!(constructors[0].target().full_name(), "app.Child.<init>()V");
    assert_eq!(constructors[0].target().origin(), MemberOrigin::Imported);
}

#[test]
fn diamond_reference_gets_a_synthesized_member_on_the_declared_owner() {
    let tmp = tempfile::tempdir().unwrap();
    let model = import_dir(
        tmp.path(),
        &[
            ("d/I", ClassFileBuilder::interface("d/I").build()),
            (
                "d/A",
                ClassFileBuilder::interface("d/A")
                    .implements("d/I")
                    .method(MethodBuilder::abstract_method("m", "()V"))
                    .build(),
            ),
            (
                "d/B",
                ClassFileBuilder::interface("d/B")
                    .implements("d/I")
                    .method(MethodBuilder::abstract_method("m", "()V"))
                    .build(),
            ),
            (
                "d/C",
                ClassFileBuilder::class("d/C")
                    .implements("d/A")
                    .implements("d/B")
                    .build(),
            ),
            (
                "d/Caller",
                ClassFileBuilder::class("d/Caller")
                    .method(MethodBuilder::new("call", "()V").invoke_interface("d/I", "m", "()V"))
                    .build(),
            ),
        ],
        ImportConfig::default(),
    )
    .unwrap();

    let calls = model.get("d.Caller").unwrap().method_calls_from_self();
    assert_eq!(calls.len(), 1);
    let target = calls[0].target();
    assert_eq!(target.owner().name(), "d.I");
    assert_eq!(target.origin(), MemberOrigin::Synthesized);
    assert_eq!(target.modifiers(), Modifiers::PUBLIC | Modifiers::ABSTRACT);
    assert!(matches!(
        target.declaration(),
        Err(ModelError::ReflectionUnavailable { .. })
    ));
}

#[test]
fn single_subtype_declaration_resolves_downward() {
    let tmp = tempfile::tempdir().unwrap();
    let model = import_dir(
        tmp.path(),
        &[
            ("d/I", ClassFileBuilder::interface("d/I").build()),
            (
                "d/Impl",
                ClassFileBuilder::class("d/Impl")
                    .implements("d/I")
                    .method(MethodBuilder::new("m", "()V"))
                    .build(),
            ),
            (
                "d/Caller",
                ClassFileBuilder::class("d/Caller")
                    .method(MethodBuilder::new("call", "()V").invoke_interface("d/I", "m", "()V"))
                    .build(),
            ),
        ],
        ImportConfig::default(),
    )
    .unwrap();

    let calls = model.get("d.Caller").unwrap().method_calls_from_self();
    assert_eq!(calls[0].target().full_name(), "d.Impl.m()V");
}

#[test]
fn classes_in_different_locations_share_one_stub() {
    let tmp = tempfile::tempdir().unwrap();
    let first = tmp.path().join("first");
    let second = tmp.path().join("second");
    for (dir, name) in [(&first, "one/User"), (&second, "two/User")] {
        write_class_dir(
            dir,
            &[(
                name,
                ClassFileBuilder::class(name)
                    .method(
                        MethodBuilder::new("use", "()V")
                            .invoke_static("lib/SharedClass", "method", "()V"),
                    )
                    .build(),
            )],
        )
        .unwrap();
    }

    let locations = LocationSet::from_paths([first, second]).unwrap();
    let model = ClassFileImporter::new(ImportConfig::default())
        .import_locations(&locations)
        .unwrap();

    let shared = model.get("lib.SharedClass").unwrap();
    assert_eq!(shared.origin(), TypeOrigin::Synthesized);
    assert_eq!(shared.methods().count(), 1);
    assert_eq!(
        method_calls(&model),
        vec![
            (
                "one.User.use()V".to_string(),
                "lib.SharedClass.method()V".to_string(),
                None
            ),
            (
                "two.User.use()V".to_string(),
                "lib.SharedClass.method()V".to_string(),
                None
            ),
        ]
    );
}

#[test]
fn unmatched_field_is_synthesized_on_the_imported_owner() {
    let tmp = tempfile::tempdir().unwrap();
    let model = import_dir(
        tmp.path(),
        &[
            ("app/Target", ClassFileBuilder::class("app/Target").build()),
            (
                "app/Caller",
                ClassFileBuilder::class("app/Caller")
                    .method(MethodBuilder::new("read", "()V").get_static("app/Target", "GONE", "J"))
                    .build(),
            ),
        ],
        config(MissingDependencies::Synthesize),
    )
    .unwrap();

    let gone = model.get("app.Target").unwrap().field("GONE").unwrap();
    assert_eq!(gone.origin(), MemberOrigin::Synthesized);
    assert_eq!(gone.modifiers(), Modifiers::PUBLIC);
}

#[test]
fn repeated_imports_produce_equal_records() {
    let classes = [
        (
            "app/Service",
            ClassFileBuilder::class("app/Service")
                .method(MethodBuilder::new("work", "()V"))
                .method(
                    MethodBuilder::new("loop", "()V")
                        .line(3)
                        .invoke_virtual("app/Service", "work", "()V")
                        .invoke_static("ext/Util", "help", "(I)V"),
                )
                .build(),
        ),
        (
            "app/Main",
            ClassFileBuilder::class("app/Main")
                .method(
                    MethodBuilder::new("main", "([Ljava/lang/String;)V")
                        .line(1)
                        .invoke_virtual("app/Service", "loop", "()V")
                        .invoke_static("ext/Util", "help", "(I)V"),
                )
                .build(),
        ),
    ];

    let first_dir = tempfile::tempdir().unwrap();
    let second_dir = tempfile::tempdir().unwrap();
    let first = import_dir(first_dir.path(), &classes, ImportConfig::default()).unwrap();
    let sequential = ImportConfig {
        parallel: false,
        ..ImportConfig::default()
    };
    let second = import_dir(second_dir.path(), &classes, sequential).unwrap();

    assert_eq!(method_calls(&first), method_calls(&second));
    assert_eq!(method_calls(&first).len(), 4);
}

#[test]
fn every_caller_is_a_member_of_the_model() {
    let tmp = tempfile::tempdir().unwrap();
    let model = import_dir(
        tmp.path(),
        &[(
            "app/Caller",
            ClassFileBuilder::class("app/Caller")
                .method(
                    MethodBuilder::new("<clinit>", "()V")
                        .access_flags(0x0008)
                        .put_static("app/Caller", "INSTANCE", "Lapp/Caller;"),
                )
                .default_constructor()
                .build(),
        )],
        ImportConfig::default(),
    )
    .unwrap();

    for class in model.classes() {
        for access in class.field_accesses_from_self() {
            let caller = access.caller();
            assert_eq!(model.member(caller.id()).full_name(), caller.full_name());
        }
        for call in class.constructor_calls_from_self() {
            let caller = call.caller();
            assert_eq!(caller.owner().id(), class.id());
            assert_eq!(class.constructor(caller.descriptor()).unwrap(), caller);
        }
    }
    let clinit = model.get("app.Caller").unwrap().static_initializer().unwrap();
    assert_eq!(clinit.field_accesses().count(), 1);
}
