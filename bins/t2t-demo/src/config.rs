use clap::{Args, Parser, Subcommand};
use t2t::Transformer;

use crate::error::DemoError;

#[derive(Parser)]
#[command(name = "t2t-demo", about = "Walk-through of tag-driven value transfer")]
pub struct Cli {
    /// Path to a TOML transformer configuration.
    #[arg(long, global = true, env = "T2T_CONFIG")]
    pub config: Option<String>,

    /// Allow lossy number and string conversions.
    #[arg(long, global = true)]
    pub weak: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fill a record from a dynamic map
    Data,
    /// Decode a JSON document and pick records out of it
    Json(JsonArgs),
    /// Copy a record into a record of another type
    Record,
}

#[derive(Args, Clone, Debug)]
pub struct JsonArgs {
    /// JSON file to read; a built-in sample is used when absent.
    pub file: Option<String>,
}

impl Cli {
    /// Transformer from `--config`, with `--weak` layered on top.
    pub fn transformer(&self) -> Result<Transformer, DemoError> {
        let mut transformer = match &self.config {
            Some(path) => {
                let t = Transformer::load(path)?;
                tracing::info!(config = %path, tag_name = %t.tag_name, "loaded transformer config");
                t
            }
            None => Transformer::new(),
        };
        if self.weak {
            transformer.enable_weak_type_transfer();
        }
        Ok(transformer)
    }
}
