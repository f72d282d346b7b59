//! CLI command implementations.

mod blend;
mod info;
mod setup;

pub use blend::{BlendRequest, blend};
pub use info::info;
pub use setup::setup;

use log::warn;
use typerig_core::{Diagnostics, Font};

/// The named glyphs, or every glyph of the font when none are named.
pub(crate) fn select_glyphs(font: &Font, names: &[String]) -> Vec<String> {
    if names.is_empty() {
        font.glyph_names().map(str::to_string).collect()
    } else {
        names.to_vec()
    }
}

pub(crate) fn report(glyph: &str, diagnostics: &Diagnostics) {
    for diagnostic in diagnostics {
        warn!("'{glyph}': {diagnostic}");
    }
}
