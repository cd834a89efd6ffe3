//! Local persistence for recipe files.
//!
//! Each recipe is one pretty-printed JSON document. New recipes land in the
//! recipes directory under a name derived from the recipe name:
//!
//! ```text
//! <root>/
//!   My_Roast.json
//!   Ethiopia_Light.json
//! ```

mod filename;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::model::Recipe;

pub use filename::format_filename;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("recipe has no steps: {}", .0.display())]
    NoSteps(PathBuf),

    #[error("recipe name '{0}' does not produce a usable file name")]
    EmptyFileName(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// Reads and parses a recipe file, recording `path` as its associated file.
///
/// Fails on malformed JSON, missing required keys, invalid steps, or an
/// empty step list.
pub fn load(path: &Path) -> Result<Recipe> {
    let json = fs::read_to_string(path)?;
    let mut recipe: Recipe = serde_json::from_str(&json)?;
    if recipe.steps.is_empty() {
        return Err(StorageError::NoSteps(path.to_path_buf()));
    }
    recipe.file = Some(path.to_path_buf());
    debug!(path = %path.display(), steps = recipe.steps.len(), "loaded recipe");
    Ok(recipe)
}

/// Writes a recipe to `path`, replacing any existing file.
///
/// The parent directory is created if missing.
pub fn write(recipe: &Recipe, path: &Path) -> Result<()> {
    let json = to_json(recipe)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    fs::write(path, json)?;
    info!(path = %path.display(), "saved recipe");
    Ok(())
}

/// Serializes a recipe as JSON indented with four spaces.
pub fn to_json(recipe: &Recipe) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    recipe.serialize(&mut serializer)?;
    // serde_json only emits valid UTF-8.
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

/// Creates `dir` and its parents if missing.
///
/// Another writer creating the directory first counts as success.
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    match fs::create_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(e) => Err(e),
    }
}

/// A recipe found in the recipes directory.
#[derive(Debug, Clone)]
pub struct RecipeEntry {
    pub path: PathBuf,
    pub roast_name: String,
    pub creator: String,
    pub steps: usize,
    pub total_time: u64,
}

/// The directory new recipes are saved into.
pub struct RecipeStore {
    root: PathBuf,
}

impl RecipeStore {
    /// Creates a store rooted at the given directory.
    ///
    /// Nothing is created on disk until the first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the default recipes directory:
    /// `<documents>/Openroast/Recipes/My Recipes/`.
    pub fn default_root() -> Option<PathBuf> {
        dirs::document_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join("Documents")))
            .map(|d| d.join("Openroast").join("Recipes").join("My Recipes"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Picks the file for a recipe that has never been saved.
    ///
    /// Uses `<root>/<sanitized name>.json`; if that file already exists a
    /// numeric suffix is added rather than overwriting it.
    pub fn path_for_new(&self, roast_name: &str) -> Result<PathBuf> {
        let stem = format_filename(roast_name);
        if stem.is_empty() {
            return Err(StorageError::EmptyFileName(roast_name.to_string()));
        }

        let mut path = self.root.join(format!("{stem}.json"));
        let mut n = 2;
        while path.exists() {
            path = self.root.join(format!("{stem}_{n}.json"));
            n += 1;
        }
        Ok(path)
    }

    /// Lists every readable recipe in the root, sorted by name.
    ///
    /// Files that fail to parse are skipped.
    pub fn list(&self) -> Result<Vec<RecipeEntry>> {
        let mut recipes = Vec::new();
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(recipes),
            Err(e) => return Err(e.into()),
        };
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") || !path.is_file() {
                continue;
            }
            match load(&path) {
                Ok(recipe) => recipes.push(RecipeEntry {
                    total_time: recipe.computed_total_time(),
                    steps: recipe.steps.len(),
                    roast_name: recipe.roast_name,
                    creator: recipe.creator,
                    path,
                }),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable recipe"),
            }
        }
        recipes.sort_by(|a, b| {
            a.roast_name
                .to_lowercase()
                .cmp(&b.roast_name.to_lowercase())
                .then_with(|| a.path.cmp(&b.path))
        });
        Ok(recipes)
    }
}
