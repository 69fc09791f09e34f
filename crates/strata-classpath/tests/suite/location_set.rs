use strata_classpath::{Location, LocationSet};
use tempfile::TempDir;

#[test]
fn order_and_duplicates_do_not_matter() {
    let tmp = TempDir::new().unwrap();
    let a = tmp.path().join("a");
    let b = tmp.path().join("b");
    std::fs::create_dir_all(&a).unwrap();
    std::fs::create_dir_all(&b).unwrap();

    let first = LocationSet::from_paths([a.clone(), b.clone()]).unwrap();
    let second = LocationSet::from_paths([b.clone(), a.clone(), a.clone()]).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn paths_are_canonicalized() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("classes");
    std::fs::create_dir_all(&dir).unwrap();
    let dotted = tmp.path().join(".").join("classes");

    let plain = LocationSet::from_paths([dir]).unwrap();
    let spelled = LocationSet::from_paths([dotted]).unwrap();
    assert_eq!(plain, spelled);
}

#[test]
fn missing_paths_are_kept_verbatim() {
    let tmp = TempDir::new().unwrap();
    let jar = tmp.path().join("not-there.jar");
    let set = LocationSet::new([Location::Jar(jar.clone())]).unwrap();
    assert!(set.contains(&Location::Jar(jar)));
}
