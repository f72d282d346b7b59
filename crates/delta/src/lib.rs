//! TypeRig Delta - stem-weight interpolation and compensated scaling.
//!
//! Master layers become [`PointArray`]s; a [`DeltaArray`] interpolates them
//! anisotropically over vertical and horizontal stem weights. On top of
//! that, compensated scaling resizes a glyph while keeping its stems at a
//! requested weight, optionally undoing and re-applying an italic slant.
//!
//! ```no_run
//! use typerig_core::Stems;
//! use typerig_delta::{GlyphDeltas, ScaleOptions};
//! # fn run(glyph: &typerig_core::Glyph) -> typerig_delta::Result<()> {
//! let deltas = GlyphDeltas::build(glyph, &["Light", "Bold"])?;
//! let options = ScaleOptions::default().with_scale(0.8, 0.8).with_intensity(1.0);
//! let result = deltas.blend(glyph, Stems::new(90.0, 40.0), &options, true)?;
//! for diagnostic in &result.diagnostics {
//!     eprintln!("{diagnostic}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod array;
pub mod axis_setup;
pub mod blend;
pub mod delta;
pub mod error;
pub mod glyph;
pub mod layer;
pub mod scale;
pub mod session;
pub mod sidecar;

pub use array::PointArray;
pub use axis_setup::{AxisEntry, AxisSetup, LIB_KEY, Target};
pub use blend::Blend;
pub use delta::DeltaArray;
pub use error::{Error, Result};
pub use glyph::GlyphDeltas;
pub use layer::{ContourDeltas, DeltaScale};
pub use scale::{SCALE_SEARCH_LIMIT, ScaleOptions, SizedScale};
pub use session::{Preferences, Session};
pub use sidecar::{AnchorDelta, MetricDelta};
