use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Writes `(internal_name, bytes)` pairs as `<root>/<internal_name>.class`,
/// creating package directories as needed. Returns the written paths.
pub fn write_class_dir(root: &Path, classes: &[(&str, Vec<u8>)]) -> io::Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(classes.len());
    for (name, bytes) in classes {
        let path = root.join(format!("{name}.class"));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, bytes)?;
        written.push(path);
    }
    Ok(written)
}

/// Writes a jar containing `(entry_name, bytes)` pairs verbatim.
///
/// Entry names are taken as-is so tests can produce `META-INF/MANIFEST.MF`,
/// `META-INF/versions/<n>/...` or non-class resources.
pub fn write_jar<N: AsRef<str>>(path: &Path, entries: &[(N, Vec<u8>)]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::FileOptions::default();
    for (name, bytes) in entries {
        zip.start_file(name.as_ref(), options).map_err(zip_to_io)?;
        zip.write_all(bytes)?;
    }
    zip.finish().map_err(zip_to_io)?;
    Ok(())
}

/// Convenience for class-only jars: entry names get the `.class` suffix.
pub fn write_class_jar(path: &Path, classes: &[(&str, Vec<u8>)]) -> io::Result<()> {
    let entries: Vec<(String, Vec<u8>)> = classes
        .iter()
        .map(|(name, bytes)| (format!("{name}.class"), bytes.clone()))
        .collect();
    write_jar(path, &entries)
}

fn zip_to_io(err: zip::result::ZipError) -> io::Error {
    match err {
        zip::result::ZipError::Io(err) => err,
        other => io::Error::new(io::ErrorKind::Other, other),
    }
}
