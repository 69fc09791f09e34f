use strata_classpath::Location;
use strata_test_utils::{write_class_dir, write_class_jar, write_jar, ClassFileBuilder};
use tempfile::TempDir;

fn class(name: &str) -> Vec<u8> {
    ClassFileBuilder::class(name).build()
}

fn entries(location: &Location) -> Vec<String> {
    location
        .class_files()
        .unwrap()
        .into_iter()
        .map(|source| source.entry)
        .collect()
}

#[test]
fn class_dir_lists_classes_sorted_and_skips_metadata() {
    let tmp = TempDir::new().unwrap();
    write_class_dir(
        tmp.path(),
        &[
            ("com/example/b/Second", class("com/example/b/Second")),
            ("com/example/First", class("com/example/First")),
            ("com/example/package-info", class("com/example/package-info")),
            ("module-info", class("module-info")),
        ],
    )
    .unwrap();
    std::fs::write(tmp.path().join("com/example/notes.txt"), b"not a class").unwrap();

    let location = Location::from_path(tmp.path());
    assert!(matches!(location, Location::ClassDir(_)));
    assert_eq!(
        entries(&location),
        vec![
            "com/example/First.class".to_string(),
            "com/example/b/Second.class".to_string()
        ]
    );
}

#[test]
fn jar_skips_meta_inf_and_non_class_entries() {
    let tmp = TempDir::new().unwrap();
    let jar = tmp.path().join("lib.jar");
    write_jar(
        &jar,
        &[
            ("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\n".to_vec()),
            ("META-INF/versions/11/a/Only.class", class("a/Only")),
            ("a/Base.class", class("a/Base")),
            ("a/readme.txt", b"hello".to_vec()),
        ],
    )
    .unwrap();

    let location = Location::from_path(&jar);
    assert!(matches!(location, Location::Jar(_)));
    assert_eq!(entries(&location), vec!["a/Base.class".to_string()]);
}

#[test]
fn multi_release_jar_prefers_base_then_highest_version() {
    let tmp = TempDir::new().unwrap();
    let jar = tmp.path().join("mr.jar");
    write_jar(
        &jar,
        &[
            (
                "META-INF/MANIFEST.MF",
                b"Manifest-Version: 1.0\nMulti-Release: true\n".to_vec(),
            ),
            ("a/Base.class", class("a/Base")),
            ("META-INF/versions/11/a/Base.class", class("a/Base")),
            ("META-INF/versions/9/a/Gap.class", class("a/Gap")),
            ("META-INF/versions/17/a/Gap.class", class("a/Gap")),
            ("META-INF/versions/11/a/Gap.class", class("a/Gap")),
        ],
    )
    .unwrap();

    let location = Location::Jar(jar);
    assert_eq!(
        entries(&location),
        vec![
            "a/Base.class".to_string(),
            "META-INF/versions/17/a/Gap.class".to_string()
        ]
    );

    let gap = location
        .class_files()
        .unwrap()
        .into_iter()
        .find(|source| source.entry.ends_with("Gap.class"))
        .unwrap();
    assert_eq!(gap.internal_name_hint(), Some("a/Gap"));
}

#[test]
fn name_hints_come_from_entry_paths_except_for_single_files() {
    let tmp = TempDir::new().unwrap();
    let written = write_class_dir(
        tmp.path(),
        &[("pkg/Widget", class("pkg/Widget"))],
    )
    .unwrap();

    let dir = Location::from_path(tmp.path());
    let found = &dir.class_files().unwrap()[0];
    assert_eq!(found.entry, "pkg/Widget.class");
    assert_eq!(found.internal_name_hint(), Some("pkg/Widget"));

    let single = Location::from_path(&written[0]);
    assert!(matches!(single, Location::ClassFile(_)));
    assert_eq!(entries(&single), vec!["Widget.class".to_string()]);
    assert_eq!(single.class_files().unwrap()[0].internal_name_hint(), None);
}

#[test]
fn class_jar_helper_round_trips_bytes() {
    let tmp = TempDir::new().unwrap();
    let jar = tmp.path().join("classes.jar");
    let bytes = class("x/Y");
    write_class_jar(&jar, &[("x/Y", bytes.clone())]).unwrap();

    let sources = Location::Jar(jar).class_files().unwrap();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].bytes, bytes);
}

#[test]
fn missing_jar_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let location = Location::Jar(tmp.path().join("absent.jar"));
    assert!(location.class_files().is_err());
}
