use anyhow::anyhow;
use clap::{Parser, ValueEnum};
use serde::Deserialize;

use crate::engine::SearchLimits;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "logic-maze",
    about = "Breadth-first solver for logic maze puzzles.",
    version = "0.1"
)]
pub struct Cli {
    #[arg(long, help = "Path to the YAML puzzle description")]
    pub puzzle: String,

    #[arg(long, help = "Path to a YAML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Stop after expanding this many states")]
    pub max_nodes: Option<usize>,

    #[arg(long, help = "Do not expand states this many moves from the start")]
    pub max_depth: Option<usize>,

    #[arg(long, value_enum, help = "How to print the result")]
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub max_nodes: Option<usize>,
    pub max_depth: Option<usize>,
    pub format: OutputFormat,
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Command line flags win over the config file.
    pub fn override_from_command_line(mut self, cli: &Cli) -> anyhow::Result<Self> {
        if cli.max_nodes.is_some() {
            self.max_nodes = cli.max_nodes;
        }
        if cli.max_depth.is_some() {
            self.max_depth = cli.max_depth;
        }
        if let Some(format) = cli.format {
            self.format = format;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_nodes == Some(0) {
            return Err(anyhow!("max_nodes must be positive, got 0"));
        }
        Ok(())
    }

    pub fn limits(&self) -> SearchLimits {
        SearchLimits {
            max_nodes: self.max_nodes,
            max_depth: self.max_depth,
        }
    }
}
