use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use lipsig::io::{format_feature_line, object_stem, read_lip_matrix, write_feature_line};
use lipsig::pipeline::orientation_merit;
use lipsig::{
    AggregationMode, FeatureInput, FeatureWorkflow, MirrorMode, PipelineConfig, SignatureWorkflow,
    StatisticSet,
};

#[derive(Parser)]
#[command(name = "lipsig")]
#[command(about = "Orientation-normalised LIP signatures and shape features from projection images")]
#[command(version)]
struct Cli {
    /// JSON pipeline configuration; command-line flags take precedence.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build aligned LIP signatures from the m, s and t projection images.
    Signature(SignatureArgs),

    /// Turn stored LIP signatures into one feature line.
    Features(FeatureArgs),

    /// Print the orientation merit of each stored direction.
    Merit {
        /// LIP csv files in m, s, t order.
        #[arg(num_args = 3, required = true)]
        csv: Vec<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct SignatureArgs {
    /// Projection images in m, s, t order.
    #[arg(num_args = 3, required = true)]
    images: Vec<PathBuf>,

    /// Directory receiving `<stem>_m.csv`, `<stem>_s.csv` and `<stem>_t.csv`.
    #[arg(long, short)]
    out_dir: PathBuf,

    /// Output stem; defaults to the first image name without its direction tag.
    #[arg(long)]
    stem: Option<String>,

    #[arg(long)]
    angle_count: Option<usize>,

    /// Reflect about the anchor instead of reversing when mirroring.
    #[arg(long)]
    reflect: bool,
}

#[derive(Debug, Args)]
struct FeatureArgs {
    /// LIP csv files in m, s, t order.
    #[arg(num_args = 3, required = true)]
    csv: Vec<PathBuf>,

    /// Projection images in m, s, t order, needed for circularity.
    #[arg(long, num_args = 3)]
    profiles: Option<Vec<PathBuf>>,

    #[arg(long)]
    use_circularity: bool,

    #[arg(long)]
    use_orientation_merit: bool,

    /// default, ref_by_LIP0 or ref_by_LIP0_fft
    #[arg(long)]
    mode: Option<AggregationMode>,

    /// Comma separated subset of max,min,median,mean,std.
    #[arg(long)]
    stats: Option<String>,

    #[arg(long)]
    n_representatives: Option<usize>,

    /// Write the feature line here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::from_json_path(path),
        None => Ok(PipelineConfig::default()),
    }
}

fn triple(paths: &[PathBuf]) -> Result<[&Path; 3]> {
    match paths {
        [m, s, t] => Ok([m.as_path(), s.as_path(), t.as_path()]),
        other => anyhow::bail!("expected 3 paths in m, s, t order, got {}", other.len()),
    }
}

fn run_signature(mut config: PipelineConfig, args: SignatureArgs) -> Result<()> {
    if let Some(count) = args.angle_count {
        config.angle_count = count;
    }
    if args.reflect {
        config.mirror = MirrorMode::Reflect;
    }
    config.validate().context("validate signature configuration")?;

    let images = triple(&args.images)?;
    let stem = args.stem.unwrap_or_else(|| object_stem(images[0]));
    let files = SignatureWorkflow::new(config).execute_files(images, &args.out_dir, &stem)?;
    for path in &files.paths {
        info!("Signature written to {:?}", path);
    }
    Ok(())
}

fn run_features(mut config: PipelineConfig, args: FeatureArgs) -> Result<()> {
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(stats) = &args.stats {
        let set = StatisticSet::parse_list(stats).context("parse --stats")?;
        config.stats = lipsig::Statistic::ALL
            .into_iter()
            .filter(|stat| set.contains(*stat))
            .collect();
    }
    if let Some(n) = args.n_representatives {
        config.n_representatives = n;
    }
    config.use_circularity |= args.use_circularity;
    config.use_orientation_merit |= args.use_orientation_merit;

    let csv = triple(&args.csv)?;
    let profiles = args.profiles.as_deref().map(triple).transpose()?;
    let input = FeatureInput::from_paths(csv, profiles)?;
    let decimals = config.decimals;
    let summary = FeatureWorkflow::new(config)?.execute(&input)?;

    match args.out {
        Some(path) => {
            write_feature_line(&path, &summary.features, decimals)?;
            info!("Feature line written to {:?}", path);
        }
        None => println!("{}", format_feature_line(&summary.features, decimals)),
    }
    Ok(())
}

fn run_merit(csv: &[PathBuf]) -> Result<()> {
    let mut merits = Vec::with_capacity(3);
    for path in triple(csv)? {
        let matrix = read_lip_matrix(path)?;
        let merit = orientation_merit(matrix.view())
            .with_context(|| format!("orientation merit of {:?}", path))?;
        merits.push(format!("{:.4}", merit));
    }
    println!("{}", merits.join(" "));
    Ok(())
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Signature(args) => run_signature(config, args),
        Commands::Features(args) => run_features(config, args),
        Commands::Merit { csv } => run_merit(&csv),
    }
}
