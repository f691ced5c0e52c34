//! Ready-made model systems built from the projector and lifter.
//!
//! Each system is described by a plain parameters struct that can be read
//! from a TOML table, with every field optional.

use std::{ fs, path::Path };
use serde::de::DeserializeOwned;
use crate::error::SimResult;

pub mod double_well;
pub mod kicked_top;

/// Loading and validation shared by all system parameter structs.
pub trait SystemParams: DeserializeOwned {
    /// Return an error describing the first invalid parameter, if any.
    fn check(&self) -> SimResult<()>;

    /// Parse and validate parameters from a TOML string.
    fn from_toml_str(raw: &str) -> SimResult<Self> {
        let params: Self = toml::from_str(raw)?;
        params.check()?;
        Ok(params)
    }

    /// Parse and validate parameters from a TOML file.
    fn from_file<P>(path: P) -> SimResult<Self>
    where P: AsRef<Path>
    {
        log::info!("reading parameters from {:?}", path.as_ref());
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }
}
