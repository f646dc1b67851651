//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Icosphere registry and path query tool.
///
/// Values given here override those loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "icosa", about = "Geodesic icosphere tile registry and path search")]
pub struct CliArgs {
    /// Subdivision depth to precompute.
    #[arg(long)]
    pub depth: Option<u8>,

    /// Samples per tile edge.
    #[arg(long)]
    pub resolution: Option<u32>,

    /// Sphere radius.
    #[arg(long)]
    pub radius: Option<f64>,

    /// Longest path, in nodes, a query may return.
    #[arg(long)]
    pub buffer_capacity: Option<usize>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Topology RON file to search instead of the registry tile graph.
    #[arg(long)]
    pub topology: Option<PathBuf>,

    /// Write the registry tile graph for `--depth` to this RON file.
    #[arg(long)]
    pub export_topology: Option<PathBuf>,

    /// External id of the path start node.
    #[arg(long, requires = "to", allow_negative_numbers = true)]
    pub from: Option<i64>,

    /// External id of the path goal node.
    #[arg(long, requires = "from", allow_negative_numbers = true)]
    pub to: Option<i64>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(depth) = args.depth {
            self.registry.default_depth = depth;
        }
        if let Some(resolution) = args.resolution {
            self.mesh.resolution = resolution;
        }
        if let Some(radius) = args.radius {
            self.registry.base_radius = radius;
        }
        if let Some(capacity) = args.buffer_capacity {
            self.path.buffer_capacity = capacity;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            depth: Some(5),
            radius: Some(6_371.0),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.registry.default_depth, 5);
        assert_eq!(config.registry.base_radius, 6_371.0);
        // Untouched fields keep their defaults
        assert_eq!(config.mesh.resolution, 8);
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_cli_no_override() {
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_path_query() {
        let args = CliArgs::try_parse_from([
            "icosa", "--depth", "2", "--from", "-4", "--to", "17", "--log-level", "debug",
        ])
        .unwrap();
        assert_eq!(args.depth, Some(2));
        assert_eq!(args.from, Some(-4));
        assert_eq!(args.to, Some(17));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_from_requires_to() {
        assert!(CliArgs::try_parse_from(["icosa", "--from", "1"]).is_err());
    }
}
