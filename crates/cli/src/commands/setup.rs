use std::{io::Write, path::Path};

use anyhow::{Context, Result};
use log::info;
use typerig_delta::AxisSetup;

use crate::io::{FontFile, read_setup, write_setup};

/// Without `store`, write the font's axis setup (or a fresh one listing its
/// masters) as JSON to `output` or stdout. With `store`, save that setup
/// into the font lib and write the font to `output` or back in place.
pub fn setup(font_path: &Path, store: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let mut font = FontFile::new(font_path).read()?;

    if let Some(store) = store {
        let setup = read_setup(store)?;
        setup.store(&mut font)?;
        let target = output.unwrap_or(font_path);
        FontFile::new(target).write(&font)?;
        info!("Stored axis setup from {} in {}", store.display(), target.display());
        return Ok(());
    }

    let setup = AxisSetup::load(&font)?.unwrap_or_else(|| AxisSetup::for_font(&font));
    match output {
        Some(path) => write_setup(path, &setup),
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", setup.to_json()?).context("Failed to write to stdout")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{env::temp_dir, fs::remove_file};

    use pretty_assertions::assert_eq;
    use typerig_core::Font;
    use typerig_delta::AxisEntry;

    use super::*;

    #[test]
    fn template_then_store() {
        let scratch = |name: &str| temp_dir().join(format!("typerig-setup-{}-{name}", std::process::id()));
        let (font_path, json_path) = (scratch("font.xml"), scratch("setup.json"));
        let mut font = Font::new("Setup");
        font.masters = vec!["Light".into(), "Bold".into()];
        FontFile::new(&font_path).write(&font).unwrap();

        setup(&font_path, None, Some(&json_path)).unwrap();
        let mut template = read_setup(&json_path).unwrap();
        assert_eq!(template, AxisSetup::for_font(&font));

        template.axis = vec![
            AxisEntry::new("Light").with_stems(40.0, 30.0),
            AxisEntry::new("Bold").with_stems(160.0, 60.0),
        ];
        write_setup(&json_path, &template).unwrap();
        setup(&font_path, Some(&json_path), None).unwrap();

        let stored = FontFile::new(&font_path).read().unwrap();
        assert_eq!(AxisSetup::load(&stored).unwrap(), Some(template));
        remove_file(font_path).unwrap();
        remove_file(json_path).unwrap();
    }
}
