//! Built-in chain sets.

use std::fmt;
use std::str::FromStr;

use rchain_core::{BeamToken, ChainError, ChainSpec, LinkSpec};
use serde::{Deserialize, Serialize};

/// Live time of the published measurement, in seconds.
pub const ARTICLE_LIVE_TIME: f64 = 1_433_000.0;

/// Named chain set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// The seven chains of the published analysis.
    Article,
    /// One five-link chain touching every rate.
    Test,
}

impl Preset {
    /// Chains of the preset, in publication order.
    pub fn chains(&self) -> Vec<ChainSpec> {
        match self {
            Preset::Article => vec![
                chain("article-1", &[("a", 0, 2.0), ("f", 0, 10.0)]),
                chain("article-2", &[("e", 0, 2.0), ("f", 0, 10.0)]),
                chain("article-3", &[("a", 1, 2.0), ("a", 0, 10.0), ("f", 0, 50.0)]),
                chain("article-4", &[("a", 1, 2.0), ("a", 0, 10.0), ("f", 0, 50.0)]),
                chain("article-5", &[("a", 0, 2.0), ("a", 0, 10.0), ("f", 0, 50.0)]),
                chain("article-6", &[("a", 0, 2.0), ("a", 0, 10.0), ("f", 0, 50.0)]),
                chain("article-7", &[("e", 0, 2.0), ("e", 1, 10.0), ("f", 0, 50.0)]),
            ],
            Preset::Test => vec![chain(
                "test",
                &[
                    ("a", 1, 1.0),
                    ("e", 0, 2.0),
                    ("a", 0, 3.0),
                    ("e", 1, 4.0),
                    ("f", 1, 5.0),
                ],
            )],
        }
    }

    /// File name the original tooling used when dumping the preset.
    pub fn dump_name(&self) -> &'static str {
        match self {
            Preset::Article => "dump_article.txt",
            Preset::Test => "dump_test.txt",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preset::Article => f.write_str("article"),
            Preset::Test => f.write_str("test"),
        }
    }
}

impl FromStr for Preset {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "article" => Ok(Preset::Article),
            "test" => Ok(Preset::Test),
            other => Err(ChainError::config("unknown-preset", "unknown chain preset")
                .with_context("preset", other)
                .with_hint("use article or test")),
        }
    }
}

fn chain(label: &str, links: &[(&str, u8, f64)]) -> ChainSpec {
    ChainSpec {
        label: Some(label.to_string()),
        links: links
            .iter()
            .map(|&(decay_type, beam, time_span)| LinkSpec {
                decay_type: decay_type.to_string(),
                beam: Some(BeamToken::Flag(beam)),
                time_span,
            })
            .collect(),
    }
}
