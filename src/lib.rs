//! Voxpaint: painted slice annotations to voxel label volumes.
//!
//! Annotators paint closed regions on 2D slices of a 3D image volume. Each
//! save produces a checkpoint of polygons; voxpaint turns a task's ordered
//! checkpoints into a dense, resolution-scaled label grid and hands that grid
//! to sinks: an image stack, a remote volumetric array, or surface meshes.
//!
//! # Modules
//!
//! - [`model`]: tasks, polygons, checkpoints and their JSON forms
//! - [`raster`]: coordinate mapping and scanline polygon fill
//! - [`volume`]: grid accumulation and the [`volume::materialize`] entry point
//! - [`export`]: image stack, remote array and mesh sinks
//! - [`store`]: task and checkpoint persistence
//! - [`error`]: error types for voxpaint operations

pub mod error;
pub mod export;
pub mod model;
pub mod raster;
pub mod store;
pub mod volume;

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

pub use error::VoxpaintError;

use export::{InMemoryArray, Mesher, RemoteArrayWriter, SliceExporter, SliceFormat, VoxelRegion};
use model::{Checkpoint, TaskId, TaskRecord};
use store::{
    CheckpointStore, JsonFileCheckpointStore, JsonFileTaskStore, RetentionPolicy, TaskStore,
};

/// The voxpaint CLI application.
#[derive(Parser)]
#[command(name = "voxpaint")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Task store file.
    #[arg(long, global = true, env = "VOXPAINT_TASKS", default_value = "tasks.json")]
    tasks: PathBuf,

    /// Checkpoint store file.
    #[arg(
        long,
        global = true,
        env = "VOXPAINT_CHECKPOINTS",
        default_value = "checkpoints.json"
    )]
    checkpoints: PathBuf,

    /// Directory that receives rendered output, one subdirectory per task.
    #[arg(long, global = true, env = "VOXPAINT_EXPORTS", default_value = "exports")]
    exports: PathBuf,

    /// Raise log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Store a new task from a JSON file and print its id.
    CreateTask(CreateTaskArgs),
    /// List stored tasks.
    ListTasks(ListTasksArgs),
    /// Show the highest-priority task assigned to a user.
    NextTask(NextTaskArgs),
    /// Assign a task to a user.
    Assign(AssignArgs),
    /// Save a polygon list as a checkpoint of a task.
    Save(SaveArgs),
    /// Materialize a task and report skipped annotations and label counts.
    Inspect(InspectArgs),
    /// Materialize a task and write its image stack and optional meshes.
    Render(RenderArgs),
}

#[derive(clap::Args)]
struct CreateTaskArgs {
    /// JSON file holding the task definition.
    input: PathBuf,
}

#[derive(clap::Args)]
struct ListTasksArgs {
    /// Only tasks assigned to this user.
    #[arg(long)]
    user: Option<String>,

    /// Only tasks nobody is assigned to.
    #[arg(long, conflicts_with = "user")]
    unassigned: bool,
}

#[derive(clap::Args)]
struct NextTaskArgs {
    #[arg(long)]
    user: String,
}

#[derive(clap::Args)]
struct AssignArgs {
    task_id: String,
    user: String,
}

#[derive(clap::Args)]
struct SaveArgs {
    task_id: String,

    /// JSON polygon list, bare or wrapped as {"checkpoint": [...]}.
    polygons: PathBuf,

    /// Whether the new checkpoint replaces or extends the stored ones.
    #[arg(long, default_value = "replace")]
    retention: RetentionPolicy,
}

#[derive(clap::Args)]
struct InspectArgs {
    task_id: String,

    /// Split the grid into one channel per segment.
    #[arg(long)]
    channels: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

#[derive(clap::Args)]
struct RenderArgs {
    task_id: String,

    /// Slice image format ('tif' or 'png').
    #[arg(long, default_value = "tif")]
    format: SliceFormat,

    /// Also write one OBJ surface mesh per segment.
    #[arg(long)]
    mesh: bool,

    /// Voxel size used to scale mesh vertices, as x,y,z.
    #[arg(long, value_delimiter = ',', default_value = "1,1,1")]
    voxel_size: Vec<f64>,

    /// Exercise the remote array writer against a local in-memory array.
    #[arg(long)]
    remote_dry_run: bool,
}

/// Run the voxpaint CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), VoxpaintError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut tasks = JsonFileTaskStore::new(&cli.tasks);

    match cli.command {
        Some(Commands::CreateTask(args)) => {
            let task = model::io_json::read_task_json(&args.input)?;
            task.dims()?;
            let id = tasks.put(task)?;
            println!("{}", id);
            Ok(())
        }
        Some(Commands::ListTasks(args)) => {
            let records = match (&args.user, args.unassigned) {
                (Some(user), _) => tasks.list_for_user(user)?,
                (None, true) => tasks.unassigned()?,
                (None, false) => tasks.list()?,
            };
            for record in &records {
                println!("{}", task_line(record));
            }
            Ok(())
        }
        Some(Commands::NextTask(args)) => {
            match tasks.next_for_user(&args.user)? {
                Some(record) => println!("{}", task_line(&record)),
                None => println!("No tasks assigned to {}", args.user),
            }
            Ok(())
        }
        Some(Commands::Assign(args)) => {
            let id = TaskId::new(args.task_id);
            tasks.assign(&id, &args.user)?;
            println!("Task {} assigned to {}", id, args.user);
            Ok(())
        }
        Some(Commands::Save(args)) => {
            let id = TaskId::new(args.task_id);
            tasks.get(&id)?;
            let polygons = model::io_json::read_polygons_json(&args.polygons)?;
            let count = polygons.len();
            let mut store = JsonFileCheckpointStore::new(&cli.checkpoints, args.retention);
            store.save(Checkpoint::new(id.clone(), polygons))?;
            println!("Saved checkpoint with {} polygon(s) for task {}", count, id);
            Ok(())
        }
        Some(Commands::Inspect(args)) => {
            let (record, checkpoints) = load_task(&tasks, &cli.checkpoints, args.task_id.clone())?;
            run_inspect(&record, &checkpoints, &args)
        }
        Some(Commands::Render(args)) => {
            let (record, checkpoints) = load_task(&tasks, &cli.checkpoints, args.task_id.clone())?;
            let out_dir = cli.exports.join(record.id.as_str());
            run_render(&record, &checkpoints, &args, out_dir)
        }
        None => {
            println!("voxpaint {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Materialize painted slice annotations into voxel label volumes.");
            println!();
            println!("Run 'voxpaint --help' for usage information.");
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();
}

fn task_line(record: &TaskRecord) -> String {
    let t = &record.task;
    format!(
        "{}\t{}/{}/{}\tr{}\tx {}..{} y {}..{} z {}..{}\tpriority {}\t{}",
        record.id,
        t.collection,
        t.experiment,
        t.channel,
        t.resolution,
        t.x_min,
        t.x_max,
        t.y_min,
        t.y_max,
        t.z_min,
        t.z_max,
        t.priority,
        t.assigned_to.as_deref().unwrap_or("-")
    )
}

fn load_task(
    tasks: &JsonFileTaskStore,
    checkpoints_path: &std::path::Path,
    task_id: String,
) -> Result<(TaskRecord, Vec<Checkpoint>), VoxpaintError> {
    let id = TaskId::new(task_id);
    let record = tasks.get(&id)?;
    let checkpoints =
        JsonFileCheckpointStore::new(checkpoints_path, RetentionPolicy::default()).for_task(&id)?;
    log::info!("task {} has {} checkpoint(s)", id, checkpoints.len());
    Ok((record, checkpoints))
}

#[derive(Serialize)]
struct InspectSummary<'a> {
    task_id: &'a TaskId,
    shape: Vec<usize>,
    voxel_counts: std::collections::BTreeMap<u64, usize>,
    report: &'a volume::RenderReport,
}

/// Execute the inspect subcommand.
fn run_inspect(
    record: &TaskRecord,
    checkpoints: &[Checkpoint],
    args: &InspectArgs,
) -> Result<(), VoxpaintError> {
    let (grid, report) = volume::materialize_with_report(&record.task, checkpoints, args.channels)?;
    let summary = InspectSummary {
        task_id: &record.id,
        shape: grid.shape(),
        voxel_counts: grid.voxel_counts(),
        report: &report,
    };

    match args.output.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&summary).map_err(|source| {
                VoxpaintError::JsonWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                }
            })?;
            println!("{}", json);
        }
        "text" => {
            println!("Task {} grid shape {:?}", summary.task_id, summary.shape);
            for (label, count) in &summary.voxel_counts {
                println!("  segment {}: {} voxel(s)", label, count);
            }
            print!("{}", report);
        }
        other => {
            return Err(VoxpaintError::UnsupportedFormat(format!(
                "'{}' (supported: text, json)",
                other
            )));
        }
    }
    Ok(())
}

/// Execute the render subcommand.
fn run_render(
    record: &TaskRecord,
    checkpoints: &[Checkpoint],
    args: &RenderArgs,
    out_dir: PathBuf,
) -> Result<(), VoxpaintError> {
    let task = &record.task;
    let (grid, report) = volume::materialize_with_report(task, checkpoints, false)?;
    if !report.is_clean() {
        eprint!("{}", report);
    }

    let exporter = SliceExporter::new(&out_dir, args.format);
    let written = exporter.export(task, &grid)?;
    println!(
        "Wrote {} slice image(s) to {}",
        written.len(),
        out_dir.display()
    );

    if args.remote_dry_run {
        let mut writer = RemoteArrayWriter::new(InMemoryArray::new(VoxelRegion::for_task(task)));
        let region = writer.write(&record.id, task, &grid)?;
        println!(
            "Dry run: {} voxel(s) would be written to {} at [{}]",
            region.len(),
            export::remote::destination_uri(task).unwrap_or_default(),
            region
        );
    }

    if args.mesh {
        let &[sx, sy, sz] = args.voxel_size.as_slice() else {
            return Err(VoxpaintError::InvalidArgument(
                "--voxel-size takes exactly three values".to_string(),
            ));
        };
        let channels = volume::materialize(task, checkpoints, true)?;
        let meshes = Mesher::new([sx, sy, sz]).mesh_channels(&channels);
        fs::create_dir_all(&out_dir)?;
        for mesh in &meshes {
            fs::write(out_dir.join(format!("{}.obj", mesh.segment)), mesh.to_obj())?;
        }
        println!("Wrote {} mesh(es) to {}", meshes.len(), out_dir.display());
    }

    Ok(())
}
