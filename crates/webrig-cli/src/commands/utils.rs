//! Shared helpers for command implementations.

use webrig_config::{ConfigSynthesizer, Flags, Overrides, SynthesizerOptions};

use crate::cli::ProjectArgs;
use crate::error::Result;

/// Load options for the project and resolve them into a synthesizer.
pub fn load_synthesizer(
    project: &ProjectArgs,
    flags: &Flags,
    overrides: &Overrides,
) -> Result<ConfigSynthesizer> {
    let options =
        SynthesizerOptions::load(&project.project, project.config.as_deref(), overrides)?;
    Ok(ConfigSynthesizer::new(&options, flags)?)
}
