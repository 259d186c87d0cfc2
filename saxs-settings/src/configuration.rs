use std::io::Write;

use log::warn;

/// General/process-wide options: worker-pool size, output location, verbosity.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneralSettings {
    /// worker-pool thread count; `0` means "hardware concurrency minus one"
    /// (spec.md §5 "Scheduling"), resolved by the caller, not by this crate.
    pub n_threads: usize,
    pub output_folder: String,
    pub verbose: bool,
}

impl Default for GeneralSettings {
    fn default() -> Self { GeneralSettings { n_threads: 0, output_folder: ".".to_string(), verbose: false } }
}

/// The default q-axis a Debye transform is evaluated on, absent a measured dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct AxesSettings {
    pub q_min: f64,
    pub q_max: f64,
    pub q_points: usize,
    /// q-unit of a parsed dataset column: `true` for nm^-1, `false` for the
    /// default Å^-1 (spec.md §6 "Measured SAXS data").
    pub q_unit_is_nm: bool,
}

impl Default for AxesSettings {
    fn default() -> Self { AxesSettings { q_min: 0.0, q_max: 0.5, q_points: 100, q_unit_is_nm: false } }
}

/// Distance-histogram bin width/extent and the multi-threaded kernel's job size.
#[derive(Clone, Debug, PartialEq)]
pub struct HistogramSettings {
    pub bin_width: f64,
    pub n_bins: usize,
    pub weighted_bins: bool,
    /// outer-loop job size the distance kernels partition into (spec.md §4.3).
    pub job_size: usize,
}

impl Default for HistogramSettings {
    fn default() -> Self { HistogramSettings { bin_width: 0.5, n_bins: 400, weighted_bins: false, job_size: 64 } }
}

/// Water-residue recognition and the unknown-atom policy a molecule is built under.
#[derive(Clone, Debug, PartialEq)]
pub struct MoleculeSettings {
    pub water_residue_names: Vec<String>,
    /// if true, an unresolved element/form-factor only warns (once) and falls
    /// back to [`saxs_pdb::FormFactorType::Unknown`]; if false, it is a hard
    /// `UnknownAtom` error (spec.md §7).
    pub warn_on_unknown_atom: bool,
}

impl Default for MoleculeSettings {
    fn default() -> Self {
        MoleculeSettings {
            water_residue_names: vec!["HOH".to_string(), "WAT".to_string(), "DOD".to_string(), "H2O".to_string()],
            warn_on_unknown_atom: true,
        }
    }
}

/// Voxel-grid sizing (spec.md §4.1).
#[derive(Clone, Debug, PartialEq)]
pub struct GridSettings {
    pub width: f64,
    pub min_bins_per_axis: i32,
    pub padding: i32,
}

impl Default for GridSettings {
    fn default() -> Self { GridSettings { width: 1.0, min_bins_per_axis: 20, padding: 6 } }
}

/// Which SmartFitter parameters are enabled and which minimiser drives them
/// (spec.md §4.6).
#[derive(Clone, Debug, PartialEq)]
pub struct FitSettings {
    pub enable_hydration: bool,
    pub enable_excluded_volume: bool,
    pub enable_solvent_density: bool,
    pub enable_atomic_debye_waller: bool,
    pub enable_exv_debye_waller: bool,
    pub max_evaluations: usize,
}

impl Default for FitSettings {
    fn default() -> Self {
        FitSettings {
            enable_hydration: true,
            enable_excluded_volume: true,
            enable_solvent_density: false,
            enable_atomic_debye_waller: false,
            enable_exv_debye_waller: false,
            max_evaluations: 200,
        }
    }
}

/// `RigidBody` and `Crystal` sections are accepted and round-tripped (spec.md §6)
/// but have no executable behaviour in this crate (rigid-body conformational
/// search and crystal-scattering are Non-goals, §1); unrecognised keys are kept
/// verbatim so a settings file written by a fuller tool doesn't fail to parse here.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PassthroughSettings {
    pub entries: Vec<(String, Vec<String>)>,
}

/// A single parsed `Configuration`, threaded through constructors instead of any
/// free-function global settings (spec.md §9 Design Notes).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Configuration {
    pub general: GeneralSettings,
    pub axes: AxesSettings,
    pub histogram: HistogramSettings,
    pub molecule: MoleculeSettings,
    pub grid: GridSettings,
    pub fit: FitSettings,
    pub rigid_body: PassthroughSettings,
    pub crystal: PassthroughSettings,
}

impl Configuration {
    pub fn new() -> Self { Configuration::default() }

    /// Default q-axis implied by [`AxesSettings`], as a `Vec<f64>` of
    /// `q_points` evenly spaced samples in `[q_min, q_max]`.
    pub fn default_q_axis(&self) -> Vec<f64> {
        let a = &self.axes;
        if a.q_points <= 1 { return vec![a.q_min]; }
        let step = (a.q_max - a.q_min) / (a.q_points - 1) as f64;
        (0..a.q_points).map(|i| a.q_min + i as f64 * step).collect()
    }

    /// Applies one `section key value...` token line parsed from a settings file.
    /// Unknown keys within `rigid_body`/`crystal` are stored verbatim; unknown keys
    /// elsewhere warn once and are otherwise ignored (spec.md §7 "Warnings").
    pub(crate) fn apply_line(&mut self, section: &str, key: &str, values: &[String]) {
        let first = values.first().map(|s| s.as_str()).unwrap_or("");
        match section {
            "General" => match key {
                "n_threads" | "threads" => self.general.n_threads = first.parse().unwrap_or(self.general.n_threads),
                "output_folder" => self.general.output_folder = first.to_string(),
                "verbose" => self.general.verbose = parse_bool(first, self.general.verbose),
                _ => warn_unknown_key("General", key),
            },
            "Axes" => match key {
                "q_min" => self.axes.q_min = first.parse().unwrap_or(self.axes.q_min),
                "q_max" => self.axes.q_max = first.parse().unwrap_or(self.axes.q_max),
                "q_points" => self.axes.q_points = first.parse().unwrap_or(self.axes.q_points),
                "q_unit" => self.axes.q_unit_is_nm = first.eq_ignore_ascii_case("nm"),
                _ => warn_unknown_key("Axes", key),
            },
            "Histogram" => match key {
                "bin_width" => self.histogram.bin_width = first.parse().unwrap_or(self.histogram.bin_width),
                "n_bins" => self.histogram.n_bins = first.parse().unwrap_or(self.histogram.n_bins),
                "weighted_bins" => self.histogram.weighted_bins = parse_bool(first, self.histogram.weighted_bins),
                "job_size" => self.histogram.job_size = first.parse().unwrap_or(self.histogram.job_size),
                _ => warn_unknown_key("Histogram", key),
            },
            "Molecule" => match key {
                "water_residues" => self.molecule.water_residue_names = values.to_vec(),
                "warn_on_unknown_atom" => self.molecule.warn_on_unknown_atom = parse_bool(first, self.molecule.warn_on_unknown_atom),
                _ => warn_unknown_key("Molecule", key),
            },
            "Grid" => match key {
                "width" => self.grid.width = first.parse().unwrap_or(self.grid.width),
                "min_bins_per_axis" => self.grid.min_bins_per_axis = first.parse().unwrap_or(self.grid.min_bins_per_axis),
                "padding" => self.grid.padding = first.parse().unwrap_or(self.grid.padding),
                _ => warn_unknown_key("Grid", key),
            },
            "Fit" => match key {
                "hydration" => self.fit.enable_hydration = parse_bool(first, self.fit.enable_hydration),
                "excluded_volume" => self.fit.enable_excluded_volume = parse_bool(first, self.fit.enable_excluded_volume),
                "solvent_density" => self.fit.enable_solvent_density = parse_bool(first, self.fit.enable_solvent_density),
                "atomic_debye_waller" => self.fit.enable_atomic_debye_waller = parse_bool(first, self.fit.enable_atomic_debye_waller),
                "exv_debye_waller" => self.fit.enable_exv_debye_waller = parse_bool(first, self.fit.enable_exv_debye_waller),
                "max_evaluations" => self.fit.max_evaluations = first.parse().unwrap_or(self.fit.max_evaluations),
                _ => warn_unknown_key("Fit", key),
            },
            "RigidBody" => self.rigid_body.entries.push((key.to_string(), values.to_vec())),
            "Crystal" => self.crystal.entries.push((key.to_string(), values.to_vec())),
            _ => warn!("ignoring settings line with unrecognised section '{}'", section),
        }
    }

    /// Writes this configuration back out, one `section key value...` line per
    /// option, so a round trip through [`crate::read_settings_file`] and this
    /// function reproduces every value a fuller tool's settings file carried.
    pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writeln!(writer, "// saxs settings file")?;
        writeln!(writer, "General n_threads {}", self.general.n_threads)?;
        writeln!(writer, "General output_folder {}", self.general.output_folder)?;
        writeln!(writer, "General verbose {}", self.general.verbose)?;
        writeln!(writer, "Axes q_min {}", self.axes.q_min)?;
        writeln!(writer, "Axes q_max {}", self.axes.q_max)?;
        writeln!(writer, "Axes q_points {}", self.axes.q_points)?;
        writeln!(writer, "Histogram bin_width {}", self.histogram.bin_width)?;
        writeln!(writer, "Histogram n_bins {}", self.histogram.n_bins)?;
        writeln!(writer, "Histogram weighted_bins {}", self.histogram.weighted_bins)?;
        writeln!(writer, "Histogram job_size {}", self.histogram.job_size)?;
        writeln!(writer, "Molecule water_residues {}", self.molecule.water_residue_names.join(" "))?;
        writeln!(writer, "Grid width {}", self.grid.width)?;
        writeln!(writer, "Grid min_bins_per_axis {}", self.grid.min_bins_per_axis)?;
        writeln!(writer, "Grid padding {}", self.grid.padding)?;
        writeln!(writer, "Fit hydration {}", self.fit.enable_hydration)?;
        writeln!(writer, "Fit excluded_volume {}", self.fit.enable_excluded_volume)?;
        writeln!(writer, "Fit max_evaluations {}", self.fit.max_evaluations)?;
        for (key, values) in &self.rigid_body.entries {
            writeln!(writer, "RigidBody {} {}", key, values.join(" "))?;
        }
        for (key, values) in &self.crystal.entries {
            writeln!(writer, "Crystal {} {}", key, values.join(" "))?;
        }
        Ok(())
    }
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => true,
        "false" | "no" | "0" | "off" => false,
        _ => default,
    }
}

static WARNED_KEYS: std::sync::Mutex<Vec<String>> = std::sync::Mutex::new(Vec::new());

/// Emits one warning per (section, key) pair per process, per spec.md §7's
/// "one message the first time ... suppressed thereafter" warning policy.
fn warn_unknown_key(section: &str, key: &str) {
    let id = format!("{}.{}", section, key);
    let mut warned = WARNED_KEYS.lock().unwrap();
    if !warned.contains(&id) {
        warn!("unrecognised settings key '{}' in section '{}'", key, section);
        warned.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_q_axis_spans_min_to_max() {
        let cfg = Configuration::new();
        let axis = cfg.default_q_axis();
        assert_eq!(axis.len(), cfg.axes.q_points);
        assert!((axis[0] - cfg.axes.q_min).abs() < 1e-12);
        assert!((axis.last().unwrap() - cfg.axes.q_max).abs() < 1e-12);
    }

    #[test]
    fn test_apply_line_updates_known_keys() {
        let mut cfg = Configuration::new();
        cfg.apply_line("Grid", "width", &["2.5".to_string()]);
        assert_eq!(cfg.grid.width, 2.5);
    }

    #[test]
    fn test_apply_line_stores_passthrough_rigidbody_entries() {
        let mut cfg = Configuration::new();
        cfg.apply_line("RigidBody", "sequencer", &["genetic".to_string()]);
        assert_eq!(cfg.rigid_body.entries.len(), 1);
    }

    #[test]
    fn test_write_to_round_trips_grid_width() {
        let mut cfg = Configuration::new();
        cfg.grid.width = 3.0;
        let mut buf = Vec::new();
        cfg.write_to(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Grid width 3"));
    }
}
