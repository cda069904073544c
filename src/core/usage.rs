use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named category of usage tracked per session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Capability {
    #[serde(rename = "reasoning")]
    Reasoning,
    #[serde(rename = "superSearch")]
    SuperSearch,
    #[serde(rename = "codeGen")]
    CodeGen,
    #[serde(rename = "imageGen")]
    ImageGen,
    #[serde(rename = "orchestration")]
    Orchestration,
}

impl Capability {
    pub const ALL: [Capability; 5] = [
        Capability::Reasoning,
        Capability::SuperSearch,
        Capability::CodeGen,
        Capability::ImageGen,
        Capability::Orchestration,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Capability::Reasoning => "reasoning",
            Capability::SuperSearch => "superSearch",
            Capability::CodeGen => "codeGen",
            Capability::ImageGen => "imageGen",
            Capability::Orchestration => "orchestration",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Capability::Reasoning => "Reasoning",
            Capability::SuperSearch => "Super Search",
            Capability::CodeGen => "Code Gen",
            Capability::ImageGen => "Image Gen",
            Capability::Orchestration => "Orchestration",
        }
    }
}

/// Per-capability dispatch counters. Counts only ever go up.
#[derive(Debug, Clone, Default)]
pub struct UsageCounters {
    counts: BTreeMap<Capability, u64>,
}

impl UsageCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(seed: &BTreeMap<Capability, u64>) -> Self {
        Self {
            counts: seed.clone(),
        }
    }

    pub(crate) fn increment(&mut self, capability: Capability) {
        *self.counts.entry(capability).or_insert(0) += 1;
    }

    pub fn get(&self, capability: Capability) -> u64 {
        self.counts.get(&capability).copied().unwrap_or(0)
    }

    /// Every capability with its count, zero included
    pub fn snapshot(&self) -> BTreeMap<Capability, u64> {
        Capability::ALL.iter().map(|&c| (c, self.get(c))).collect()
    }
}
