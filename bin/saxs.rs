//! Command line tool to hydrate, histogram and fit SAXS profiles of PDB structures.
//! say `saxs -h` to see options.

use std::env;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{error, info};

use saxs_fitter::{format_fit_report, read_dataset, EnabledParameters, Minimizer, ModelParameters, SmartFitter};
use saxs_grid::{default_culling_for, target_water_count, CullingStrategy, Grid, HydrationStrategy};
use saxs_hist::{assign_effective_weights, debye_transform_for_model, ExcludedVolumeModel, FullHistogramManager};
use saxs_io::out_writer;
use saxs_pdb::{Deposit, Molecule, STANDARD_WATER_RESIDUE_NAMES};
use saxs_settings::{read_settings_file, Configuration};

mod error;
use error::SaxsError;

/// Which excluded-volume correction to apply, named after the tool that
/// popularised it (spec.md §4.5). `Simple` is the only one that tolerates
/// atoms whose element couldn't be resolved to a form factor.
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ExvModelArg {
    Simple,
    Crysol,
    Fraser,
    Foxs,
    Pepsi,
    Grid,
}

impl ExvModelArg {
    fn to_model(self, c_exv: f64, volume: f64) -> ExcludedVolumeModel {
        match self {
            ExvModelArg::Simple => ExcludedVolumeModel::Simple { c_exv, volume },
            ExvModelArg::Crysol => ExcludedVolumeModel::Crysol { c_exv, volume, scale: 1.0 },
            ExvModelArg::Fraser => ExcludedVolumeModel::Fraser { c_exv, atomic_volume: volume },
            ExvModelArg::Foxs => ExcludedVolumeModel::FoXS { c_exv, volume },
            ExvModelArg::Pepsi => ExcludedVolumeModel::Pepsi { c_exv, volume, contrast: 1.0 },
            ExvModelArg::Grid => ExcludedVolumeModel::Grid { voxel_volume: volume },
        }
    }
}

#[derive(Parser, Debug)]
#[clap(author, version, about = "Computes and fits small-angle X-ray scattering profiles", arg_required_else_help = true)]
struct Args {
    #[command(subcommand)]
    command: Command,
    /// settings file to load before applying any other option (spec.md §6 "Settings")
    #[clap(long, global = true)]
    settings: Option<String>,
    /// be more verbose and log program actions on the screen
    #[clap(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// build a hydration shell around a structure and write it back out as PDB
    Hydrate {
        /// input PDB file
        #[clap(short, long)]
        infile: String,
        /// output PDB path, or "stdout"
        #[clap(short, long, default_value = "stdout")]
        out_pdb: String,
        /// RNG seed for deterministic placement
        #[clap(long, default_value_t = 0)]
        seed: u64,
    },
    /// compute the composite distance histogram of a structure and its Debye transform
    Histogram {
        /// input PDB file
        #[clap(short, long)]
        infile: String,
        /// output path for the (q, I(q)) curve, or "stdout"
        #[clap(short, long, default_value = "stdout")]
        out: String,
        /// excluded-volume model to validate the structure's form factors against
        #[clap(long, value_enum, default_value_t = ExvModelArg::Simple)]
        exv_model: ExvModelArg,
        /// excluded-volume scale factor, `c_exv`
        #[clap(long, default_value_t = 1.0)]
        c_exv: f64,
        /// excluded-volume per-atom volume (ų)
        #[clap(long, default_value_t = 100.0)]
        exv_volume: f64,
    },
    /// fit a structure's scattering profile to a measured dataset
    Fit {
        /// input PDB file
        #[clap(short, long)]
        infile: String,
        /// measured dataset: whitespace-separated (q, I, sigma_I[, sigma_q])
        #[clap(short, long)]
        dataset: String,
        /// report output path, or "stdout"
        #[clap(long, default_value = "stdout")]
        out_report: String,
        /// fit-curve output path, or "stdout"
        #[clap(long, default_value = "stdout")]
        out_curve: String,
        /// excluded-volume model fit against
        #[clap(long, value_enum, default_value_t = ExvModelArg::Simple)]
        exv_model: ExvModelArg,
        /// starting excluded-volume scale factor, `c_exv`
        #[clap(long, default_value_t = 1.0)]
        c_exv: f64,
        /// excluded-volume per-atom volume (ų)
        #[clap(long, default_value_t = 100.0)]
        exv_volume: f64,
    },
    /// parse a PDB file and immediately write it back out, for round-trip checks
    Pdb2Pdb {
        /// input PDB file
        #[clap(short, long)]
        infile: String,
        /// output PDB path, or "stdout"
        #[clap(short, long, default_value = "stdout")]
        out_pdb: String,
    },
}

fn load_configuration(args: &Args) -> Configuration {
    match &args.settings {
        Some(path) => match read_settings_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("failed to read settings file '{}': {}", path, e);
                Configuration::new()
            }
        },
        None => Configuration::new(),
    }
}

fn molecule_from_pdb(infile: &str, cfg: &Configuration) -> Result<Molecule, Box<dyn std::error::Error>> {
    let deposit = Deposit::from_file(infile)?;
    let water_names = if cfg.molecule.water_residue_names.is_empty() {
        STANDARD_WATER_RESIDUE_NAMES.iter().map(|s| s.to_string()).collect()
    } else {
        cfg.molecule.water_residue_names.clone()
    };
    let (atoms, waters) = deposit.structure().partition_waters(&water_names);
    let mut molecule = Molecule::from_bodies(vec![atoms]);
    molecule.bodies_mut()[0].set_waters(waters);
    assign_effective_weights(&mut molecule);
    Ok(molecule)
}

fn hydrate_molecule(molecule: &mut Molecule, cfg: &Configuration, seed: u64) {
    let centers: Vec<(f64, f64, f64)> = molecule.bodies()[0].atoms().iter().map(|a| (a.atom.x, a.atom.y, a.atom.z)).collect();
    let mut grid = Grid::new(&centers, cfg.grid.width, cfg.grid.min_bins_per_axis, cfg.grid.padding);
    for &c in &centers { grid.add_atom(c); }
    grid.expand_volume();

    let strategy = HydrationStrategy::Axes { min_separation: cfg.grid.width };
    let waters = strategy.generate(&grid, &centers, 1.5, seed);
    let target = target_water_count(grid.get_volume(), 1.0);
    let culling = default_culling_for(&strategy, CullingStrategy::Counter);
    let culled = culling.cull(waters, target, seed);
    info!("generated {} hydration waters (target was {})", culled.len(), target);
    molecule.bodies_mut()[0].set_waters(culled);
}

fn run_hydrate(infile: &str, out_pdb: &str, seed: u64, cfg: &Configuration) -> Result<(), Box<dyn std::error::Error>> {
    let mut molecule = molecule_from_pdb(infile, cfg)?;
    hydrate_molecule(&mut molecule, cfg, seed);
    molecule.write_pdb(out_writer(out_pdb, false))?;
    Ok(())
}

fn run_histogram(
    infile: &str,
    out: &str,
    exv_model: ExvModelArg,
    c_exv: f64,
    exv_volume: f64,
    cfg: &Configuration,
) -> Result<(), Box<dyn std::error::Error>> {
    let molecule = molecule_from_pdb(infile, cfg)?;
    let histogram = FullHistogramManager::new(cfg.histogram.bin_width, cfg.histogram.n_bins).calculate_all(&molecule);
    let q_axis = cfg.default_q_axis();
    let model = exv_model.to_model(c_exv, exv_volume);
    let intensities = debye_transform_for_model(&molecule, &model, &histogram, &q_axis, 1.0)?;

    let mut writer = out_writer(out, false);
    use std::io::Write;
    writeln!(writer, "# q I(q)")?;
    for (q, i) in q_axis.iter().zip(intensities.iter()) {
        writeln!(writer, "{:.6} {:.6e}", q, i)?;
    }
    Ok(())
}

fn run_fit(
    infile: &str,
    dataset_path: &str,
    out_report: &str,
    out_curve: &str,
    exv_model: ExvModelArg,
    c_exv: f64,
    exv_volume: f64,
    cfg: &Configuration,
) -> Result<(), Box<dyn std::error::Error>> {
    let molecule = molecule_from_pdb(infile, cfg)?;
    let histogram = FullHistogramManager::new(cfg.histogram.bin_width, cfg.histogram.n_bins).calculate_all(&molecule);
    let dataset = read_dataset(dataset_path, cfg.axes.q_unit_is_nm)?;

    let enabled = EnabledParameters {
        hydration: cfg.fit.enable_hydration,
        excluded_volume: cfg.fit.enable_excluded_volume,
        solvent_density: cfg.fit.enable_solvent_density,
        atomic_debye_waller: cfg.fit.enable_atomic_debye_waller,
        exv_debye_waller: cfg.fit.enable_exv_debye_waller,
    };
    let model = exv_model.to_model(c_exv, exv_volume);
    let fitter = SmartFitter::new(
        enabled,
        ModelParameters::default(),
        exv_volume,
        model,
        Minimizer::GoldenSection { tol: 1e-6, max_sweeps: 40 },
    );
    let result = fitter.fit(&molecule, &histogram, &dataset)?;
    info!("fit converged: {}, chi^2/dof = {:.4}", result.converged, result.reduced_chi_square());

    use std::io::Write;
    writeln!(out_writer(out_report, false), "{}", format_fit_report(&result))?;

    let mut curve_writer = out_writer(out_curve, false);
    writeln!(curve_writer, "# q I_data I_err I_fit residual")?;
    for p in &result.curve {
        writeln!(curve_writer, "{:.6} {:.6e} {:.6e} {:.6e} {:.4}", p.q, p.i_data, p.i_err, p.i_model, p.residual)?;
    }
    Ok(())
}

fn run_pdb2pdb(infile: &str, out_pdb: &str, cfg: &Configuration) -> Result<(), Box<dyn std::error::Error>> {
    let molecule = molecule_from_pdb(infile, cfg)?;
    molecule.write_pdb(out_writer(out_pdb, false))?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    unsafe {
        if env::var("RUST_LOG").is_err() { env::set_var("RUST_LOG", "info") }
        if args.verbose { env::set_var("RUST_LOG", "debug"); }
    }
    env_logger::init();

    let build_time = env!("BUILD_TIME");
    let git_commit_md5 = env!("GIT_COMMIT_MD5");
    info!("Build time: {}", build_time);
    info!("Git commit MD5 sum: {}", git_commit_md5);

    let cfg = load_configuration(&args);

    let result = match &args.command {
        Command::Hydrate { infile, out_pdb, seed } => run_hydrate(infile, out_pdb, *seed, &cfg),
        Command::Histogram { infile, out, exv_model, c_exv, exv_volume } => {
            run_histogram(infile, out, *exv_model, *c_exv, *exv_volume, &cfg)
        }
        Command::Fit { infile, dataset, out_report, out_curve, exv_model, c_exv, exv_volume } => {
            run_fit(infile, dataset, out_report, out_curve, *exv_model, *c_exv, *exv_volume, &cfg)
        }
        Command::Pdb2Pdb { infile, out_pdb } => run_pdb2pdb(infile, out_pdb, &cfg),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
