//! Filesystem locations holding compiled classes: class directories, jars and
//! single class files.
//!
//! A [`LocationSet`] is the unit of import. It is normalized on construction
//! (canonical paths, duplicates collapsed, stable order) so it can be used as a
//! cache key regardless of how callers spelled or ordered the paths.

use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsStr;
use std::fs;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClasspathError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Location {
    ClassDir(PathBuf),
    Jar(PathBuf),
    ClassFile(PathBuf),
}

/// Raw bytes of one class file together with where they came from.
#[derive(Clone, Debug)]
pub struct ClassFileSource {
    pub location: Location,
    /// Path of the class file relative to its location (`a/b/C.class`,
    /// `META-INF/versions/11/a/b/C.class`), or the file name for
    /// [`Location::ClassFile`].
    pub entry: String,
    pub bytes: Vec<u8>,
}

impl ClassFileSource {
    /// The internal class name implied by the entry path (`a/b/C`), with any
    /// multi-release version prefix removed. `None` for single class files,
    /// whose file name need not match the declared class.
    pub fn internal_name_hint(&self) -> Option<&str> {
        if matches!(self.location, Location::ClassFile(_)) {
            return None;
        }
        let path = match self.entry.strip_prefix("META-INF/versions/") {
            Some(rest) => rest.split_once('/').map(|(_, path)| path)?,
            None => self.entry.as_str(),
        };
        path.strip_suffix(".class")
    }
}

impl Location {
    /// Infers the location kind from the path: directories are class dirs,
    /// `.class` files are single class files, anything else is treated as a jar.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.is_dir() {
            Location::ClassDir(path)
        } else if path.extension() == Some(OsStr::new("class")) {
            Location::ClassFile(path)
        } else {
            Location::Jar(path)
        }
    }

    pub fn normalize(&self) -> std::io::Result<Self> {
        Ok(match self {
            Location::ClassDir(p) => Location::ClassDir(canonicalize_if_possible(p)?),
            Location::Jar(p) => Location::Jar(canonicalize_if_possible(p)?),
            Location::ClassFile(p) => Location::ClassFile(canonicalize_if_possible(p)?),
        })
    }

    pub fn path(&self) -> &Path {
        match self {
            Location::ClassDir(p) | Location::Jar(p) | Location::ClassFile(p) => p,
        }
    }

    /// Reads every class file of this location.
    ///
    /// `module-info` and `package-info` are skipped. For multi-release jars the
    /// base entry of a class wins; versioned entries only fill gaps, preferring
    /// the highest version.
    pub fn class_files(&self) -> Result<Vec<ClassFileSource>, ClasspathError> {
        match self {
            Location::ClassDir(dir) => {
                let mut out = Vec::new();
                for (entry, path) in class_dir_entries(dir) {
                    out.push(ClassFileSource {
                        location: self.clone(),
                        entry,
                        bytes: fs::read(path)?,
                    });
                }
                Ok(out)
            }
            Location::Jar(path) => {
                let file = fs::File::open(path)?;
                let mut archive = zip::ZipArchive::new(file)?;
                let entries = jar_class_entries(&mut archive)?;
                let mut out = Vec::with_capacity(entries.len());
                for entry in entries.into_values() {
                    let bytes = read_zip_entry(&mut archive, &entry)?;
                    out.push(ClassFileSource {
                        location: self.clone(),
                        entry,
                        bytes,
                    });
                }
                Ok(out)
            }
            Location::ClassFile(path) => {
                let entry = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                if is_ignored_entry(&entry) {
                    return Ok(Vec::new());
                }
                Ok(vec![ClassFileSource {
                    location: self.clone(),
                    entry,
                    bytes: fs::read(path)?,
                }])
            }
        }
    }
}

fn canonicalize_if_possible(path: &Path) -> std::io::Result<PathBuf> {
    match fs::canonicalize(path) {
        Ok(p) => Ok(p),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(e) => Err(e),
    }
}

/// An order-independent, duplicate-free set of normalized locations.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocationSet(BTreeSet<Location>);

impl LocationSet {
    pub fn new<I>(locations: I) -> std::io::Result<Self>
    where
        I: IntoIterator<Item = Location>,
    {
        let mut set = BTreeSet::new();
        for location in locations {
            set.insert(location.normalize()?);
        }
        Ok(Self(set))
    }

    /// Builds a set from paths, inferring each location kind with
    /// [`Location::from_path`].
    pub fn from_paths<I, P>(paths: I) -> std::io::Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::new(paths.into_iter().map(Location::from_path))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, location: &Location) -> bool {
        self.0.contains(location)
    }
}

impl<'a> IntoIterator for &'a LocationSet {
    type Item = &'a Location;
    type IntoIter = std::collections::btree_set::Iter<'a, Location>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn is_ignored_entry(entry: &str) -> bool {
    let file_name = entry.rsplit('/').next().unwrap_or(entry);
    file_name == "module-info.class" || file_name == "package-info.class"
}

/// `(relative entry, absolute path)` of every class file under `dir`, sorted.
fn class_dir_entries(dir: &Path) -> Vec<(String, PathBuf)> {
    let mut out = Vec::new();
    for entry in walkdir::WalkDir::new(dir).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(
                    target: "strata.classpath",
                    dir = %dir.display(),
                    error = %err,
                    "skipping unreadable directory entry"
                );
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension() != Some(OsStr::new("class")) {
            continue;
        }
        let rel = entry.path().strip_prefix(dir).unwrap_or(entry.path());
        let rel = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if is_ignored_entry(&rel) {
            continue;
        }
        out.push((rel, entry.into_path()));
    }
    out.sort();
    out
}

/// Maps each class path (`a/b/C.class`) to the jar entry that provides it.
fn jar_class_entries<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> Result<BTreeMap<String, String>, ClasspathError> {
    let is_multi_release = jar_is_multi_release(archive);

    // (version, entry name); version 0 is the base entry.
    let mut best: BTreeMap<String, (u32, String)> = BTreeMap::new();
    for i in 0..archive.len() {
        let file = archive.by_index(i)?;
        if !file.is_file() {
            continue;
        }
        let name = file.name().to_owned();
        if !name.ends_with(".class") || is_ignored_entry(&name) {
            continue;
        }

        let (version, key) = if let Some(rest) = name.strip_prefix("META-INF/versions/") {
            if !is_multi_release {
                continue;
            }
            let Some((version, path)) = rest.split_once('/') else {
                continue;
            };
            match version.parse::<u32>() {
                Ok(v) => (v, path.to_string()),
                Err(_) => continue,
            }
        } else if name.starts_with("META-INF/") {
            continue;
        } else {
            (0, name.clone())
        };

        match best.get(&key) {
            Some((0, _)) => {}
            Some((existing, _)) if version != 0 && version <= *existing => {}
            _ => {
                best.insert(key, (version, name));
            }
        }
    }

    Ok(best
        .into_iter()
        .map(|(key, (_, entry))| (key, entry))
        .collect())
}

fn read_zip_entry<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
    name: &str,
) -> Result<Vec<u8>, ClasspathError> {
    let mut file = archive.by_name(name)?;
    let mut bytes = Vec::with_capacity(file.size() as usize);
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

fn jar_is_multi_release<R: Read + Seek>(archive: &mut zip::ZipArchive<R>) -> bool {
    let mut file = match archive.by_name("META-INF/MANIFEST.MF") {
        Ok(file) => file,
        Err(_) => return false,
    };

    let mut manifest = String::new();
    if file.read_to_string(&mut manifest).is_err() {
        return false;
    }

    manifest_is_multi_release(&manifest)
}

fn manifest_is_multi_release(manifest: &str) -> bool {
    for line in manifest.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        if key.trim().eq_ignore_ascii_case("Multi-Release") {
            return value.trim().eq_ignore_ascii_case("true");
        }
    }
    false
}
