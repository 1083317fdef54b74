use super::ImageSource;
use crate::degradation::Image;
use crate::error::{Error, Result};
use crate::image_io::load_image;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

const EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "tif", "tiff"];

/// Reads every image file of a directory, in file name order
///
/// Each image is named by its file stem. When several files share a stem
/// (`a.png`, `a.bmp`) their names keep the extension (`a_png`, `a_bmp`)
/// so every pair written downstream is distinct.
pub struct DirectorySource {
    pending: VecDeque<(PathBuf, String)>,
}

impl DirectorySource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        tracing::info!("Scanning {} for images", dir.display());

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && is_image(&path) {
                files.push(path);
            }
        }
        files.sort();

        tracing::info!("Found {} image(s)", files.len());

        Ok(Self {
            pending: pair_names(files)?.into(),
        })
    }
}

fn pair_names(files: Vec<PathBuf>) -> Result<Vec<(PathBuf, String)>> {
    let stem = |path: &Path| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    };

    let mut stem_counts: HashMap<String, usize> = HashMap::new();
    for path in &files {
        *stem_counts.entry(stem(path)).or_default() += 1;
    }

    let mut seen = HashSet::new();
    let mut named = Vec::with_capacity(files.len());
    for path in files {
        let mut name = stem(&path);
        if stem_counts[&name] > 1 {
            let ext = path.extension().map(|e| e.to_string_lossy()).unwrap_or_default();
            name = format!("{name}_{ext}");
        }
        if !seen.insert(name.clone()) {
            return Err(Error::invalid(
                "input",
                format!("{} maps to pair name '{name}', which is already taken", path.display()),
            ));
        }
        named.push((path, name));
    }

    Ok(named)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

impl ImageSource for DirectorySource {
    fn next_image(&mut self) -> Result<Option<(String, Image)>> {
        let Some((path, name)) = self.pending.pop_front() else {
            return Ok(None);
        };

        let image = load_image(&path)?;

        Ok(Some((name, image)))
    }

    fn len_hint(&self) -> Option<usize> {
        Some(self.pending.len())
    }
}
