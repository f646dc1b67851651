//! Command-line front end: precomputes a tile depth, reports on it, and
//! optionally runs a path query over the tile graph or a topology file.
//!
//! Run with `cargo run -p icosa-cli -- --depth 4 --from 17179869184 --to 85899345920`
//! to search between the first tiles of faces 0 and 1.

use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use glam::DVec3;
use icosa_config::{CliArgs, Config};
use icosa_geo::{
    AdjacencyError, BaryError, IcosahedronGeometry, MIN_RESOLUTION, RegistryError,
    RegistrySettings, TileAdjacency, TileRegistry, tile_vertex_count,
};
use icosa_path::{
    PathBuffer, Pathfinder, SparseIndex, TopologyConfig, TopologyError, build_topology,
    tile_topology_config,
};
use tracing::{error, info, warn};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Adjacency(#[from] AdjacencyError),
    #[error(transparent)]
    Topology(#[from] TopologyError),
    #[error(transparent)]
    Resolution(#[from] BaryError),
    #[error("node {0} is not in the topology")]
    UnknownNode(i64),
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = match args.config.clone().map_or_else(Config::default_dir, Ok) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("{e}; pass --config <dir>");
            return ExitCode::FAILURE;
        }
    };

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    icosa_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs, config: &Config) -> Result<(), CliError> {
    if config.mesh.resolution < MIN_RESOLUTION {
        return Err(BaryError::Resolution(config.mesh.resolution).into());
    }

    let registry = TileRegistry::new(
        IcosahedronGeometry::unit(),
        RegistrySettings {
            base_radius: config.registry.base_radius,
            center: DVec3::from_array(config.registry.center),
            max_tiles: config.registry.max_tiles,
        },
    );

    let depth = config.registry.default_depth;
    let started = Instant::now();
    let tiles = registry.ensure_depth(depth)?;
    let mean_radius = tiles
        .iter()
        .map(|e| e.centroid().distance(registry.settings().center))
        .sum::<f64>()
        / tiles.len() as f64;
    info!(
        depth,
        tiles = tiles.len(),
        samples = tiles.len() * tile_vertex_count(config.mesh.resolution),
        mean_centroid_radius = mean_radius,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "registry ready"
    );

    let needs_tile_graph =
        args.export_topology.is_some() || (args.from.is_some() && args.topology.is_none());
    let tile_graph = if needs_tile_graph {
        let adjacency = TileAdjacency::from_tiles(registry.geometry(), &tiles)?;
        Some(tile_topology_config(&tiles, &adjacency))
    } else {
        None
    };

    if let (Some(path), Some(graph)) = (&args.export_topology, &tile_graph) {
        graph.save(path)?;
        info!(path = %path.display(), tiles = graph.tiles.len(), "exported tile topology");
    }

    let (Some(from), Some(to)) = (args.from, args.to) else {
        return Ok(());
    };

    let topology_config = match (&args.topology, tile_graph) {
        (Some(path), _) => TopologyConfig::load(path)?,
        (None, Some(graph)) => graph,
        (None, None) => return Ok(()),
    };

    let mut index = SparseIndex::new();
    let topology = build_topology(&topology_config, &mut index)?;
    let start = index.get(from).ok_or(CliError::UnknownNode(from))?;
    let goal = index.get(to).ok_or(CliError::UnknownNode(to))?;

    let mut finder = Pathfinder::with_node_capacity(topology.node_count());
    let mut buffer = PathBuffer::with_capacity(config.path.buffer_capacity);
    if finder.try_find_path(&topology, start, goal, &mut buffer) {
        let ids: Vec<i64> = buffer.as_slice().iter().map(|&i| topology.nodes()[i]).collect();
        info!(from, to, nodes = ids.len(), path = ?ids, "path found");
    } else {
        warn!(
            from,
            to,
            capacity = buffer.capacity(),
            "no path within buffer capacity"
        );
    }
    Ok(())
}
