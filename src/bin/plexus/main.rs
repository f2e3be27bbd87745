//! Plexus CLI - point cloud connectivity and planar cells.
//!
//! Usage: plexus <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `plexus --help` for available commands.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use plexus::algo::faces::{AspectFilter, CellConstraints, FaceEnumerator};
use plexus::algo::probe::{
    ConeProbe, ConeVariant, DensityProbe, GradientProbe, LevelSetProbe, ProbeContext,
    ProbeOrchestrator, ScalarAttribute, SpannerProbe,
};
use plexus::algo::Progress;
use plexus::geometry::Projection;
use plexus::graph::{EdgeSet, HalfEdgeGraph};
use plexus::io::{self, PointCloud};
use plexus::spatial::{Aabb, HashGrid};

#[derive(Parser)]
#[command(name = "plexus")]
#[command(author, version, about = "Point cloud connectivity CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display point cloud and graph information
    Info {
        /// Input file (.xyz or .ply)
        input: PathBuf,
    },

    /// Connect points with one or more probes
    Connect {
        /// Input point file
        input: PathBuf,

        /// Output graph file (.ply)
        output: PathBuf,

        /// Probes to run, in order
        #[arg(short, long, value_enum, num_args = 1.., default_value = "density")]
        probe: Vec<ProbeKind>,

        /// Search radius
        #[arg(short, long, default_value = "1.0")]
        radius: f64,

        /// Neighbors needed for a density core point
        #[arg(long, default_value = "4")]
        min_points: usize,

        /// Spanner stretch factor
        #[arg(long, default_value = "2.0")]
        stretch: f64,

        /// Number of cones
        #[arg(long, default_value = "6")]
        cones: usize,

        /// Use Theta graphs instead of Yao graphs for cone probes
        #[arg(long)]
        theta: bool,

        /// Scalar field for gradient and level set probes
        #[arg(long)]
        field: Option<String>,

        /// Level set value tolerance
        #[arg(long, default_value = "0.05")]
        tolerance: f64,

        /// Level set links per point
        #[arg(long, default_value = "4")]
        max_connections: usize,

        /// Flatten points onto their best-fit plane before probing
        #[arg(long)]
        project: bool,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },

    /// Enumerate the planar cells of a graph
    Cells {
        /// Input graph file (.ply with an edge element)
        input: PathBuf,

        /// Minimum cell area
        #[arg(long, default_value = "0.0")]
        min_area: f64,

        /// Maximum cell area
        #[arg(long)]
        max_area: Option<f64>,

        /// Keep convex cells only
        #[arg(long)]
        convex_only: bool,

        /// List the unbounded face with the other cells
        #[arg(long)]
        keep_wrapper: bool,

        /// Also drop cells whose area is within this fraction of the unbounded face's
        #[arg(long, default_value = "0.0")]
        wrapper_tolerance: f64,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ProbeKind {
    /// DBSCAN-style density connectivity
    Density,
    /// Steepest ascent along a scalar field
    Gradient,
    /// Points with similar field values
    LevelSet,
    /// Greedy t-spanner
    Spanner,
    /// Yao or Theta cones
    Cone,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }

        Commands::Connect {
            input,
            output,
            probe,
            radius,
            min_points,
            stretch,
            cones,
            theta,
            field,
            tolerance,
            max_connections,
            project,
            sequential,
        } => {
            let cloud = io::load_points(&input)?;
            println!("Loaded: {} points", cloud.len());

            let mut orchestrator = ProbeOrchestrator::new().with_progress(create_progress());
            for kind in probe {
                orchestrator = match kind {
                    ProbeKind::Density => {
                        orchestrator.with_probe(DensityProbe::new(radius).with_min_points(min_points))
                    }
                    ProbeKind::Gradient => {
                        let mut p = GradientProbe::new(radius);
                        p.field = field_attribute(&cloud, field.as_deref())?;
                        orchestrator.with_probe(p)
                    }
                    ProbeKind::LevelSet => {
                        let mut p = LevelSetProbe::new(radius)
                            .with_tolerance(tolerance)
                            .with_max_connections(max_connections);
                        p.field = field_attribute(&cloud, field.as_deref())?;
                        orchestrator.with_probe(p)
                    }
                    ProbeKind::Spanner => {
                        orchestrator.with_probe(SpannerProbe::new(radius).with_stretch_factor(stretch))
                    }
                    ProbeKind::Cone => {
                        let variant = if theta { ConeVariant::Theta } else { ConeVariant::Yao };
                        orchestrator
                            .with_probe(ConeProbe::new(radius).with_num_cones(cones).with_variant(variant))
                    }
                };
            }

            cmd_connect(&cloud, &output, &mut orchestrator, project, sequential)?;
        }

        Commands::Cells {
            input,
            min_area,
            max_area,
            convex_only,
            keep_wrapper,
            wrapper_tolerance,
        } => {
            let aspect = if convex_only {
                AspectFilter::ConvexOnly
            } else {
                AspectFilter::Both
            };
            let constraints = CellConstraints::default()
                .with_area(min_area, max_area.unwrap_or(f64::INFINITY))
                .with_aspect(aspect)
                .with_omit_wrapper(!keep_wrapper)
                .with_wrapper_tolerance(wrapper_tolerance);
            cmd_cells(&input, &constraints)?;
        }
    }

    Ok(())
}

/// Create a progress reporter that prints one line per step.
fn create_progress() -> Progress {
    let last = Arc::new(AtomicUsize::new(0));

    Progress::new(move |current, total, message| {
        if total == 0 || last.fetch_max(current, Ordering::Relaxed) >= current {
            return;
        }
        eprint!("\r[{}/{}] {:<24}", current, total, message);
        let _ = std::io::stderr().flush();
        if current >= total {
            eprintln!();
        }
    })
}

fn field_attribute(
    cloud: &PointCloud,
    field: Option<&str>,
) -> Result<Option<ScalarAttribute>, Box<dyn std::error::Error>> {
    match field {
        None => Ok(None),
        Some(name) => match cloud.attribute(name) {
            Some(attr) => Ok(Some(attr)),
            None => {
                let known: Vec<&str> = cloud.scalar_names().collect();
                Err(format!("no field `{}` (available: {})", name, known.join(", ")).into())
            }
        },
    }
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (cloud, edges) = io::load_graph(input)?;

    println!("File: {}", input.display());
    println!("Points: {}", cloud.len());
    println!("Edges: {}", edges.len());

    for name in cloud.scalar_names() {
        let values = cloud.scalar(name).unwrap_or_default();
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        println!("Field {}: [{:.6}, {:.6}]", name, min, max);
    }

    if let Some(bounds) = Aabb::from_points(&cloud.positions) {
        let (min, max) = (bounds.min, bounds.max);
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }

    if edges.is_empty() {
        return Ok(());
    }

    let total: f64 = edges
        .iter()
        .map(|e| (cloud.positions[e.end as usize] - cloud.positions[e.start as usize]).norm())
        .sum();
    println!("Average edge length: {:.6}", total / edges.len() as f64);

    let mut degree = vec![0usize; cloud.len()];
    for e in edges.iter() {
        degree[e.start as usize] += 1;
        degree[e.end as usize] += 1;
    }
    let isolated = degree.iter().filter(|&&d| d == 0).count();
    let leaves = degree.iter().filter(|&&d| d == 1).count();
    let max_degree = degree.iter().copied().max().unwrap_or(0);
    println!(
        "Degree: max {}, {} leaves, {} isolated points",
        max_degree, leaves, isolated
    );

    Ok(())
}

fn cmd_connect(
    cloud: &PointCloud,
    output: &Path,
    orchestrator: &mut ProbeOrchestrator,
    project: bool,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let positions = if project {
        let plane = Projection::best_fit(&cloud.positions)?;
        println!("Projecting onto plane with normal {:?}", plane.normal().as_slice());
        plane.flatten_all(&cloud.positions)
    } else {
        cloud.positions.clone()
    };

    let cell_size = orchestrator.shared_radius().unwrap_or(1.0);
    let grid = HashGrid::from_points(&positions, cell_size)?;
    let ctx = ProbeContext::new(&positions, &grid).with_parallel(!sequential);

    let mode = if sequential { "sequential" } else { "parallel" };
    println!("Running {} probes ({})...", orchestrator.probes().len(), mode);

    let start = Instant::now();
    let report = orchestrator.run(&ctx);
    let elapsed = start.elapsed();

    for (name, count) in &report.applied {
        println!("  {}: {} edges", name, count);
    }
    for (name, err) in &report.skipped {
        println!("  {}: skipped ({})", name, err);
    }

    io::save_graph(output, cloud, &report.edges)?;
    println!(
        "Saved: {} ({} edges, {:.2?})",
        output.display(),
        report.edges.len(),
        elapsed
    );

    Ok(())
}

fn cmd_cells(input: &Path, constraints: &CellConstraints) -> Result<(), Box<dyn std::error::Error>> {
    let (cloud, edges): (PointCloud, EdgeSet) = io::load_graph(input)?;
    println!("Loaded: {} points, {} edges", cloud.len(), edges.len());

    let plane = Projection::best_fit(&cloud.positions)?;
    let graph = HalfEdgeGraph::from_edge_set(&edges, plane.project_all(&cloud.positions))?;
    let mut enumerator = FaceEnumerator::new(graph);

    let start = Instant::now();
    let faces = enumerator.enumerate_all_faces(constraints, true);
    let elapsed = start.elapsed();

    println!(
        "Faces: {} ({} cells, {} rejected, {:.2?})",
        enumerator.num_faces(),
        faces.cells.len(),
        faces.failed.len(),
        elapsed
    );
    if let Some(wrapper) = &faces.wrapper {
        println!(
            "Wrapper: face {:?}, {} points, area {:.6}",
            wrapper.face,
            wrapper.len(),
            wrapper.data.area
        );
    }

    for cell in &faces.cells {
        println!(
            "  {:?}: {} points, area {:.6}, perimeter {:.6}, compactness {:.3}{}",
            cell.face,
            cell.len(),
            cell.data.area,
            cell.data.perimeter,
            cell.data.compactness,
            if cell.data.is_convex { ", convex" } else { "" }
        );
    }

    Ok(())
}
