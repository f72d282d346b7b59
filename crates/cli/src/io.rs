//! Font and axis setup file I/O.

use std::{
    fs::{create_dir_all, read_to_string, write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use typerig_core::{
    Font,
    xml::{read_font, write_font},
};
use typerig_delta::AxisSetup;

/// A font XML file handle.
#[derive(Debug, Clone)]
pub struct FontFile {
    path: PathBuf,
}

impl FontFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<Font> {
        let text = read_to_string(&self.path)
            .with_context(|| format!("Failed to read font: {}", self.path.display()))?;
        read_font(&text).with_context(|| format!("Failed to parse font: {}", self.path.display()))
    }

    /// Write the font, creating the parent directory if needed.
    pub fn write(&self, font: &Font) -> Result<()> {
        ensure_parent_dir(&self.path)?;
        write(&self.path, write_font(font))
            .with_context(|| format!("Failed to write font: {}", self.path.display()))
    }
}

impl AsRef<Path> for FontFile {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

pub fn read_setup(path: &Path) -> Result<AxisSetup> {
    let text = read_to_string(path)
        .with_context(|| format!("Failed to read axis setup: {}", path.display()))?;
    AxisSetup::from_json(&text).with_context(|| format!("Invalid axis setup: {}", path.display()))
}

pub fn write_setup(path: &Path, setup: &AxisSetup) -> Result<()> {
    ensure_parent_dir(path)?;
    write(path, setup.to_json()?)
        .with_context(|| format!("Failed to write axis setup: {}", path.display()))
}

/// The setup from `path` if given, otherwise the one stored in the font lib.
pub fn resolve_setup(path: Option<&Path>, font: &Font) -> Result<AxisSetup> {
    match path {
        Some(path) => read_setup(path),
        None => AxisSetup::load(font)?
            .with_context(|| format!("Font '{}' has no stored axis setup; pass --axis", font.name)),
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    Ok(())
}
