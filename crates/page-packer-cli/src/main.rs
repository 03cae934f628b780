use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use globset::{Glob, GlobSetBuilder};
use page_packer_core::config::{FreeRectChoice, PackerConfig, PageSize, SortOrder};
use page_packer_core::export::YAxis;
use page_packer_core::{Item, Plan, pack_items, trimmed_item};
use serde::Deserialize;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "page-packer",
    about = "Lay out images onto fixed-size pages",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --no-progress or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read image sizes from a file or directory and write a placement plan
    Plan(PlanArgs),
    /// Read item sizes from a JSON/YAML manifest and write a placement plan
    Layout(LayoutArgs),
}

#[derive(Parser, Debug, Clone)]
struct PlanArgs {
    /// Input image file or directory
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,
    /// Measure each image by its alpha bounding box instead of its full size
    #[arg(long, default_value_t = false, help_heading = "Input/Output")]
    trim: bool,
    /// Alpha at or below this value counts as transparent when trimming
    #[arg(long, default_value_t = 0, help_heading = "Input/Output")]
    trim_threshold: u8,
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Parser, Debug, Clone)]
struct LayoutArgs {
    /// Manifest file: a list of `{id, width, height}` in JSON or YAML
    #[arg(help_heading = "Input/Output")]
    manifest: PathBuf,
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args, Debug, Clone)]
struct CommonArgs {
    // Input/Output
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// Plan base name (file will be name.json)
    #[arg(short, long, default_value = "plan", help_heading = "Input/Output")]
    name: String,
    /// YAML config file path (keys present in the file override flags)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,

    // Page
    /// Page size preset: a3 | a4 | a5 | letter | legal
    #[arg(long, default_value = "a4", help_heading = "Page")]
    page_size: String,
    /// Page width (overrides --page-size)
    #[arg(long, help_heading = "Page")]
    page_width: Option<u32>,
    /// Page height (overrides --page-size)
    #[arg(long, help_heading = "Page")]
    page_height: Option<u32>,
    /// Gap between items and around the page border
    #[arg(long, default_value_t = 20, help_heading = "Page")]
    margin: u32,

    // Packing
    /// Sort order: area_desc|max_side_desc|height_desc|width_desc|none
    #[arg(long, default_value = "area_desc", help_heading = "Packing")]
    sort_order: String,
    /// Free-rect choice: baf|bssf|blsf
    #[arg(long, default_value = "baf", help_heading = "Packing")]
    choice: String,

    // Export
    /// Metadata format: json-pages | json (alias) | json-hash
    #[arg(long, default_value = "json-pages", help_heading = "Export")]
    metadata: String,
    /// Direction of exported y: down (top-left origin) | up (bottom-left origin, PDF-style)
    #[arg(long, default_value = "down", value_parser = ["down", "up"], help_heading = "Export")]
    y_axis: String,
    /// Export plan stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: compute the plan and stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Plan(args) => run_plan(args, cli.progress && !cli.quiet),
        Commands::Layout(args) => run_layout(args),
    }
}

fn run_plan(args: &PlanArgs, show_progress: bool) -> anyhow::Result<()> {
    let cfg = build_config(&args.common)?;
    if print_config_requested(&args.common, &cfg)? {
        return Ok(());
    }
    let paths = gather_paths(&args.input, &args.include, &args.exclude)?;
    let trim = args.trim.then_some(args.trim_threshold);
    let items = read_sizes_with_progress(&paths, trim, show_progress);
    info!(count = items.len(), "read image sizes");
    let plan = pack_items(items, &cfg)?;
    write_outputs(&plan, &args.common)
}

fn run_layout(args: &LayoutArgs) -> anyhow::Result<()> {
    let cfg = build_config(&args.common)?;
    if print_config_requested(&args.common, &cfg)? {
        return Ok(());
    }
    let items = read_manifest(&args.manifest)?;
    info!(count = items.len(), "read manifest");
    let plan = pack_items(items, &cfg)?;
    write_outputs(&plan, &args.common)
}

fn build_config(cli: &CommonArgs) -> anyhow::Result<PackerConfig> {
    let page_size: PageSize = cli.page_size.parse()?;
    let (default_w, default_h) = page_size.dimensions();
    let cfg = PackerConfig {
        page_width: cli.page_width.unwrap_or(default_w),
        page_height: cli.page_height.unwrap_or(default_h),
        margin: cli.margin,
        sort_order: cli.sort_order.parse()?,
        choice: cli.choice.parse()?,
    };

    // Load config file if provided; present keys override the flags
    let cfg = if let Some(path) = &cli.config {
        let file =
            fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)
            .with_context(|| format!("parse config {}", path.display()))?;
        y.into_packer_config(cfg)?
    } else {
        cfg
    };
    cfg.validate()?;
    Ok(cfg)
}

fn print_config_requested(cli: &CommonArgs, cfg: &PackerConfig) -> anyhow::Result<bool> {
    if !cli.print_config {
        return Ok(false);
    }
    match cli.print_config_format.as_str() {
        "yaml" => println!("{}", serde_yaml::to_string(cfg)?),
        _ => println!("{}", serde_json::to_string_pretty(cfg)?),
    }
    Ok(true)
}

fn write_outputs(plan: &Plan, cli: &CommonArgs) -> anyhow::Result<()> {
    let stats = plan.stats();
    info!(
        pages = stats.num_pages,
        placed = stats.num_placed,
        scaled = stats.num_scaled,
        dropped = stats.num_dropped,
        occupancy = format!("{:.2}%", stats.occupancy * 100.0),
        "stats"
    );
    for r in plan.dropped() {
        warn!(key = %r.key, outcome = ?r.outcome, "item not placed");
    }

    let y_axis = match cli.y_axis.as_str() {
        "up" => YAxis::Up,
        _ => YAxis::Down,
    };
    let value = match cli.metadata.as_str() {
        // Accept "json" as an alias of "json-pages"
        "json-pages" | "json" => page_packer_core::to_json_pages(plan, y_axis),
        "json-hash" => page_packer_core::to_json_hash(plan, y_axis),
        other => anyhow::bail!("unknown metadata format: {}", other),
    };

    if cli.dry_run {
        println!("{}", stats.summary());
        return Ok(());
    }

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("create out_dir {}", cli.out_dir.display()))?;
    let json_path = cli.out_dir.join(format!("{}.json", cli.name));
    fs::write(&json_path, serde_json::to_string_pretty(&value)?)
        .with_context(|| format!("write {}", json_path.display()))?;
    info!(?json_path, pages = plan.pages.len(), "plan written");

    if let Some(stats_path) = &cli.export_stats {
        fs::write(stats_path, serde_json::to_string_pretty(&stats)?)
            .with_context(|| format!("write {}", stats_path.display()))?;
        info!(?stats_path, "stats exported");
    }
    Ok(())
}

fn gather_paths(
    path: &Path,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    let inc_set = build_globset(include)?;
    let exc_set = build_globset(exclude)?;
    let mut list: Vec<PathBuf> = Vec::new();
    if path.is_file() {
        if !should_skip(path, inc_set.as_ref(), exc_set.as_ref()) && is_image(path) {
            list.push(path.to_path_buf());
        }
    } else {
        for entry in WalkDir::new(path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && !should_skip(p, inc_set.as_ref(), exc_set.as_ref()) && is_image(p) {
                list.push(p.to_path_buf());
            }
        }
    }
    Ok(list)
}

fn build_globset(patterns: &[String]) -> anyhow::Result<Option<globset::GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut b = GlobSetBuilder::new();
    for pat in patterns {
        b.add(Glob::new(pat).with_context(|| format!("bad glob {pat}"))?);
    }
    Ok(Some(b.build()?))
}

fn should_skip(
    p: &Path,
    include: Option<&globset::GlobSet>,
    exclude: Option<&globset::GlobSet>,
) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    if let Some(ex) = exclude {
        if ex.is_match(&s) {
            return true;
        }
    }
    if let Some(inc) = include {
        if !inc.is_match(&s) {
            return true;
        }
    }
    false
}

fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "bmp" | "gif")
    )
}

/// Measures one image: header dimensions, or the alpha bounding box of the
/// decoded pixels when `trim` carries a threshold.
fn measure_image(path: &Path, trim: Option<u8>) -> anyhow::Result<Item<String>> {
    let key = path.to_string_lossy().replace('\\', "/");
    match trim {
        None => {
            let (w, h) = image::image_dimensions(path)?;
            Ok(Item::new(key, w as f64, h as f64))
        }
        Some(threshold) => {
            let img = image::ImageReader::open(path)?
                .with_guessed_format()?
                .decode()?;
            let item = trimmed_item(key, &img, threshold);
            debug!(?path, w = item.width, h = item.height, "trimmed");
            Ok(item)
        }
    }
}

/// Reads image sizes; unreadable files are logged and skipped.
fn read_sizes_with_progress(
    paths: &[PathBuf],
    trim: Option<u8>,
    progress: bool,
) -> Vec<Item<String>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} reading {pos}/{len} [{elapsed_precise}] {wide_msg}",
        ) {
            b.set_style(style);
        }
        Some(b)
    } else {
        None
    };
    let mut list = Vec::with_capacity(paths.len());
    for p in paths {
        let msg = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if let Some(b) = &bar {
            b.set_message(msg.to_string());
        }
        match measure_image(p, trim) {
            Ok(item) => list.push(item),
            Err(e) => {
                error!(?p, error = %e, "skip image");
            }
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    list
}

#[derive(Debug, Deserialize)]
struct ManifestItem {
    #[serde(alias = "key")]
    id: String,
    width: f64,
    height: f64,
}

fn read_manifest(path: &Path) -> anyhow::Result<Vec<Item<String>>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read manifest {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    let entries: Vec<ManifestItem> = if is_yaml {
        serde_yaml::from_str(&text).with_context(|| format!("parse {}", path.display()))?
    } else {
        serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))?
    };
    Ok(entries
        .into_iter()
        .map(|e| Item::new(e.id, e.width, e.height))
        .collect())
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    page_size: Option<String>,
    page_width: Option<u32>,
    page_height: Option<u32>,
    margin: Option<u32>,
    sort_order: Option<String>,
    choice: Option<String>,
}

impl YamlConfig {
    fn into_packer_config(self, mut cfg: PackerConfig) -> anyhow::Result<PackerConfig> {
        if let Some(v) = self.page_size {
            let (w, h) = v.parse::<PageSize>()?.dimensions();
            cfg.page_width = w;
            cfg.page_height = h;
        }
        if let Some(v) = self.page_width {
            cfg.page_width = v;
        }
        if let Some(v) = self.page_height {
            cfg.page_height = v;
        }
        if let Some(v) = self.margin {
            cfg.margin = v;
        }
        if let Some(v) = self.sort_order {
            cfg.sort_order = v.parse::<SortOrder>()?;
        }
        if let Some(v) = self.choice {
            cfg.choice = v.parse::<FreeRectChoice>()?;
        }
        Ok(cfg)
    }
}
