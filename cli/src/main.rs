use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use fatimg_core::{ClusterMode, FatImgError, ParseOptions, SectorBasis};
use fatimg_filesystems::{
    dump_inventory, parse_completeness_list, parse_image, render_report, verify_completeness,
};
use log::info;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fatimg")]
#[command(about = "Decode FAT16 disk images, verify and extract their files", long_about = None)]
struct Cli {
    /// Disk image to decode
    #[arg(short, long)]
    file: PathBuf,
    /// File listing the identifiers that must be present, whitespace separated
    #[arg(short = 'c', long)]
    compverify: Option<PathBuf>,
    /// Directory to write every file into (created if missing)
    #[arg(short, long)]
    dump: Option<PathBuf>,
    /// Print header and directory entry reports
    #[arg(short, long)]
    verbose: bool,
    /// Print the directory and file listing as JSON
    #[arg(long)]
    json: bool,
    /// JSON parse configuration, overridden by the flags below
    #[arg(long)]
    config: Option<PathBuf>,
    /// How file and directory clusters are located
    #[arg(long, value_enum)]
    cluster_mode: Option<ClusterModeArg>,
    /// Sector size used to turn cluster sectors into byte offsets
    #[arg(long, value_enum)]
    sector_basis: Option<SectorBasisArg>,
    /// Maximum subdirectory nesting
    #[arg(long)]
    max_depth: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ClusterModeArg {
    Contiguous,
    FatChain,
}

#[derive(Clone, Copy, ValueEnum)]
enum SectorBasisArg {
    Fixed512,
    HeaderDerived,
}

impl Cli {
    fn parse_options(&self) -> anyhow::Result<ParseOptions> {
        let mut options = match &self.config {
            Some(path) => ParseOptions::from_json_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ParseOptions::default(),
        };

        if self.verbose {
            options.verbose = true;
        }
        if let Some(mode) = self.cluster_mode {
            options.cluster_mode = match mode {
                ClusterModeArg::Contiguous => ClusterMode::Contiguous,
                ClusterModeArg::FatChain => ClusterMode::FatChain,
            };
        }
        if let Some(basis) = self.sector_basis {
            options.sector_basis = match basis {
                SectorBasisArg::Fixed512 => SectorBasis::Fixed512,
                SectorBasisArg::HeaderDerived => SectorBasis::HeaderDerived,
            };
        }
        if let Some(depth) = self.max_depth {
            options.max_depth = depth;
        }

        Ok(options)
    }

    fn needs_inventory(&self) -> bool {
        self.compverify.is_some() || self.dump.is_some() || self.json
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    run(&cli)
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let options = cli.parse_options()?;

    let image = fs::read(&cli.file).with_context(|| format!("Failed to read image {}", cli.file.display()))?;
    info!("Read {} bytes from {}", image.len(), cli.file.display());

    let parsed = parse_image(&image, &options)?;

    if options.verbose {
        print!("{}", render_report(&parsed));
    }

    let inventory = match parsed.inventory() {
        Ok(inventory) => inventory,
        Err(FatImgError::UnsupportedVariant(fs_type)) if !cli.needs_inventory() => {
            println!("Filesystem type {:?} is not supported, only FAT16 images are decoded.", fs_type);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&inventory.summary())?);
    }

    // A failed check is reported only after the dump has run
    let mut incomplete = None;
    if let Some(list_path) = &cli.compverify {
        let text = fs::read_to_string(list_path)
            .with_context(|| format!("Failed to read completeness list {}", list_path.display()))?;
        let expected = parse_completeness_list(&text);
        if expected.is_empty() {
            return Err(FatImgError::InvalidInput(format!(
                "Completeness list {} contains no file names",
                list_path.display()
            ))
            .into());
        }

        let report = verify_completeness(inventory, &expected);
        if report.is_complete() {
            println!("All files matched.");
        } else {
            println!("Missing files:");
            for name in &report.missing {
                println!("  {}", name);
            }
            incomplete = Some(report);
        }
    }

    if let Some(dir) = &cli.dump {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create dump directory {}", dir.display()))?;
        dump_inventory(inventory, dir).context("Failed to dump file!")?;
        println!("All files dumped.");
    }

    if let Some(report) = incomplete {
        bail!("{} of {} expected files are missing", report.missing.len(), report.expected);
    }

    Ok(())
}
