//! Stage — the single external input that shapes the cluster.

use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::Error;

/// Discrete density level of the visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Single,
    #[default]
    Cluster,
    Hive,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Single, Stage::Cluster, Stage::Hive];

    /// Hex rings around the origin node.
    pub fn layers(self) -> i32 {
        match self {
            Stage::Single => 0,
            Stage::Cluster => 1,
            Stage::Hive => 2,
        }
    }

    /// Hex circumradius in pixels. Hive is tighter to keep 19 nodes in frame.
    pub fn radius(self) -> f64 {
        match self {
            Stage::Single => 0.0,
            Stage::Cluster => 140.0,
            Stage::Hive => 90.0,
        }
    }

    /// Pairs at or beyond this distance are not linked.
    pub fn max_link_distance(self) -> f64 {
        match self {
            Stage::Single => 0.0,
            Stage::Cluster => 160.0,
            Stage::Hive => 100.0,
        }
    }

    /// Concurrent pulse chains.
    pub fn chain_count(self) -> usize {
        match self {
            Stage::Single => 0,
            Stage::Cluster => 1,
            Stage::Hive => 2,
        }
    }

    /// Base draw scale for every node.
    pub fn node_scale(self) -> f64 {
        match self {
            Stage::Single => 1.8,
            Stage::Cluster => 1.0,
            Stage::Hive => 0.65,
        }
    }

    /// Number of nodes the layout produces: `1 + 3·L·(L+1)`.
    pub fn node_count(self) -> usize {
        let l = self.layers() as usize;
        1 + 3 * l * (l + 1)
    }

    pub fn code(self) -> &'static str {
        match self {
            Stage::Single => "01",
            Stage::Cluster => "02",
            Stage::Hive => "03",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Single => "SINGLE CELL",
            Stage::Cluster => "CLUSTER",
            Stage::Hive => "HIVE MIND",
        }
    }

    pub fn kind(self) -> &'static str {
        match self {
            Stage::Single => "NANO_UNIT",
            Stage::Cluster => "SWARM_NODE",
            Stage::Hive => "GLOBAL_ARRAY",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Stage::Single => "Basic autonomous unit. Capable of local data processing and simple code execution.",
            Stage::Cluster => "Multiple cells linked via local mesh network. Parallel processing and specialized roles enabled.",
            Stage::Hive => "Planetary scale integration. Infinite compute context and self-improving architecture.",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Single => "single",
            Stage::Cluster => "cluster",
            Stage::Hive => "hive",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Stage::Single),
            "cluster" => Ok(Stage::Cluster),
            "hive" => Ok(Stage::Hive),
            other => Err(Error::UnknownStage(other.to_string())),
        }
    }
}
