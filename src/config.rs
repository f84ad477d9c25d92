use std::path::PathBuf;

use clap::{ArgEnum, Parser, Subcommand};
use node_patch::PatchFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Parser)]
#[clap(author, version, about)]
pub struct Config {
    #[clap(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Serialize, Deserialize, Subcommand)]
pub enum Command {
    /// Apply a patch to a JSON document and print the result
    Apply {
        document: PathBuf,
        patch: PathBuf,
        #[clap(long, arg_enum, default_value = "json-patch")]
        format: WireFormat,
        #[clap(long)]
        pretty: bool,
    },
    /// Rewrite a patch in another wire format
    Convert {
        patch: PathBuf,
        #[clap(long, arg_enum, default_value = "json-patch")]
        from: WireFormat,
        #[clap(long, arg_enum, default_value = "typed")]
        to: WireFormat,
        #[clap(long)]
        pretty: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ArgEnum)]
#[serde(rename_all = "kebab-case")]
pub enum WireFormat {
    JsonPatch,
    Typed,
}

impl From<WireFormat> for PatchFormat {
    fn from(format: WireFormat) -> Self {
        match format {
            WireFormat::JsonPatch => PatchFormat::JsonPatch,
            WireFormat::Typed => PatchFormat::TypePreserving,
        }
    }
}

impl Config {
    pub fn parse() -> Self {
        Parser::parse()
    }
}
