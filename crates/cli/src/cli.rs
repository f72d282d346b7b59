//! CLI definitions and command dispatch.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use typerig_core::TransformOrigin;
use typerig_delta::Preferences;

use crate::commands::{BlendRequest, blend, info, setup};

#[derive(Parser)]
#[command(name = "typerig-delta")]
#[command(about = "Blend stem-compensated target layers from master layers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Blending preferences shared by every target.
#[derive(Debug, Clone, clap::Args)]
pub struct PreferenceArgs {
    /// Clamp target stems to the axis range instead of extrapolating.
    #[arg(long)]
    pub no_extrapolate: bool,
    /// How much of the scale is kept in the stems, from 0 to 1.
    #[arg(long, default_value_t = 0.0)]
    pub intensity: f64,
    /// Stem compensation added to the target, as X,Y.
    #[arg(long, value_parser = parse_pair)]
    pub compensation: Option<(f64, f64)>,
    /// Transform origin: baseline, bottom-left, bottom-right, top-left, top-right or center.
    #[arg(long, default_value_t = TransformOrigin::Baseline)]
    pub origin: TransformOrigin,
    /// Leave advance widths and anchors untouched.
    #[arg(long)]
    pub outline_only: bool,
}

impl PreferenceArgs {
    pub fn preferences(&self) -> Preferences {
        Preferences {
            extrapolate: !self.no_extrapolate,
            intensity: self.intensity,
            compensation: self.compensation.unwrap_or((0.0, 0.0)),
            origin: self.origin,
            blend_metrics: !self.outline_only,
        }
    }
}

fn parse_pair(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
    let number = |v: &str| v.trim().parse::<f64>().map_err(|e| format!("'{v}': {e}"));
    Ok((number(x)?, number(y)?))
}

#[derive(Subcommand)]
pub enum Commands {
    /// Blend every target layer for the selected glyphs and write the font.
    Blend {
        /// Font XML file.
        font: PathBuf,
        /// Glyphs to process; all glyphs when omitted.
        #[arg(short, long)]
        glyph: Vec<String>,
        /// Axis setup JSON; defaults to the setup stored in the font.
        #[arg(long)]
        axis: Option<PathBuf>,
        /// Output font; the input is rewritten when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        preferences: PreferenceArgs,
    },
    /// Show the blend space of the selected glyphs.
    Info {
        font: PathBuf,
        #[arg(short, long)]
        glyph: Vec<String>,
        #[arg(long)]
        axis: Option<PathBuf>,
    },
    /// Print the axis setup of a font, or store one into it.
    Setup {
        font: PathBuf,
        /// Setup JSON to store in the font lib.
        #[arg(long)]
        store: Option<PathBuf>,
        /// Where to write the setup JSON (or the font, with --store).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Commands {
    pub fn run(self) -> Result<()> {
        match self {
            Commands::Blend {
                font,
                glyph,
                axis,
                output,
                preferences,
            } => {
                blend(&BlendRequest {
                    output: output.unwrap_or_else(|| font.clone()),
                    font,
                    glyphs: glyph,
                    axis,
                    preferences: preferences.preferences(),
                })?;
            }
            Commands::Info { font, glyph, axis } => {
                info(&font, &glyph, axis.as_deref())?;
            }
            Commands::Setup { font, store, output } => {
                setup(&font, store.as_deref(), output.as_deref())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_preferences() {
        let cli = Cli::try_parse_from([
            "typerig-delta",
            "blend",
            "font.xml",
            "-g",
            "a",
            "-g",
            "b",
            "--no-extrapolate",
            "--intensity",
            "0.5",
            "--compensation",
            "4,2",
            "--origin",
            "center",
        ])
        .unwrap();
        let Commands::Blend { glyph, preferences, output, .. } = cli.command else {
            panic!("expected blend");
        };
        assert_eq!(glyph, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(output, None);
        assert_eq!(
            preferences.preferences(),
            Preferences {
                extrapolate: false,
                intensity: 0.5,
                compensation: (4.0, 2.0),
                origin: TransformOrigin::Center,
                blend_metrics: true,
            }
        );
    }

    #[test]
    fn rejects_malformed_compensation() {
        assert!(Cli::try_parse_from(["typerig-delta", "blend", "font.xml", "--compensation", "4"]).is_err());
        assert_eq!(parse_pair(" 1.5, -2 "), Ok((1.5, -2.0)));
    }

    #[test]
    fn defaults_match_session_preferences() {
        let cli = Cli::try_parse_from(["typerig-delta", "blend", "font.xml"]).unwrap();
        let Commands::Blend { preferences, .. } = cli.command else {
            panic!("expected blend");
        };
        assert_eq!(preferences.preferences(), Preferences::default());
    }
}
