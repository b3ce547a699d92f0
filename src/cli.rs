//! Command line front end
//!
//! `list` prints the template and board catalogs, `build` generates a
//! dieline and writes the requested exports, `preflight` prints the checks
//! and exits with status 2 when one fails.

use anyhow::{anyhow, bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use dielinekit_core::units::parse_length;
use dielinekit_core::{init_standard_catalog, DimensionMode, Material, MeasurementSystem};
use dielinekit_designer::{save_bundle, svg_string, write_dxf, DesignSnapshot, DesignState, StatePatch};
use dielinekit_settings::Config;
use dielinekit_templates::{Features, TemplateStyle, ThumbNotch, Window};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Exit status of `preflight` when a check fails.
pub const PREFLIGHT_FAILURE_STATUS: i32 = 2;

#[derive(Debug, Parser)]
#[command(name = "dielinekit", version, about = "Parametric packaging dieline generator")]
pub struct Cli {
    /// Configuration file (.toml or .json)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List templates and boards
    List,
    /// Generate a dieline and write exports
    Build {
        #[command(flatten)]
        design: DesignArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Run preflight checks
    Preflight {
        #[command(flatten)]
        design: DesignArgs,
    },
    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Internal,
    External,
    Clearance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UnitsArg {
    Mm,
    In,
}

impl From<UnitsArg> for MeasurementSystem {
    fn from(units: UnitsArg) -> Self {
        match units {
            UnitsArg::Mm => MeasurementSystem::Metric,
            UnitsArg::In => MeasurementSystem::Imperial,
        }
    }
}

#[derive(Debug, Default, Args)]
pub struct DesignArgs {
    /// Start from a saved design
    #[arg(long, value_name = "FILE")]
    pub state: Option<PathBuf>,

    /// Template id, see `list`
    #[arg(long, short)]
    pub template: Option<String>,

    /// Board id from the catalog
    #[arg(long, short, conflicts_with = "caliper")]
    pub material: Option<String>,

    /// Custom board thickness in millimeters
    #[arg(long)]
    pub caliper: Option<f64>,

    /// Override a template parameter, in the chosen units
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Product clearance for `--mode clearance`
    #[arg(long, value_name = "LENGTH", required_if_eq("mode", "clearance"))]
    pub clearance: Option<String>,

    #[arg(long, value_enum)]
    pub units: Option<UnitsArg>,

    #[arg(long, value_name = "LENGTH")]
    pub bleed: Option<String>,

    /// Tear strip across the body panels
    #[arg(long)]
    pub zip_strip: bool,

    /// Display window on a body panel
    #[arg(long, value_name = "PANEL:X:Y:W:H[:R]")]
    pub window: Option<String>,

    /// Thumb notch on the top edge of a body panel
    #[arg(long, value_name = "PANEL:WIDTH:DEPTH")]
    pub thumb_notch: Option<String>,

    /// Extra horizontal perforation at this height
    #[arg(long = "perforation", value_name = "Y")]
    pub perforations: Vec<String>,
}

#[derive(Debug, Default, Args)]
pub struct OutputArgs {
    #[arg(long, value_name = "FILE")]
    pub svg: Option<PathBuf>,

    #[arg(long, value_name = "FILE")]
    pub dxf: Option<PathBuf>,

    /// ZIP production bundle
    #[arg(long, value_name = "FILE")]
    pub bundle: Option<PathBuf>,

    /// Save the design as JSON
    #[arg(long, value_name = "FILE")]
    pub save_state: Option<PathBuf>,

    /// Leave dimension labels out of the SVG
    #[arg(long)]
    pub no_dims: bool,
}

/// Run a parsed command line and return the process exit status.
pub fn run(cli: Cli) -> anyhow::Result<i32> {
    if let Command::InitConfig { force } = cli.command {
        let path = match cli.config {
            Some(path) => path,
            None => Config::default_path()?,
        };
        if path.exists() && !force {
            bail!("{} already exists, use --force to overwrite", path.display());
        }
        Config::default().save_to_file(&path)?;
        info!(path = %path.display(), "configuration written");
        return Ok(0);
    }

    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::List => {
            let mut stdout = std::io::stdout().lock();
            write_catalogs(&mut stdout)?;
            Ok(0)
        }
        Command::Build { design, output } => {
            let state = design_from_args(&design, &config)?;
            write_outputs(&state, &output, &config)?;
            Ok(0)
        }
        Command::Preflight { design } => {
            let state = design_from_args(&design, &config)?;
            let mut stdout = std::io::stdout().lock();
            for message in state.messages() {
                writeln!(stdout, "{}", message)?;
            }
            Ok(if state.has_failures() { PREFLIGHT_FAILURE_STATUS } else { 0 })
        }
        Command::InitConfig { .. } => Ok(0),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = path {
        return Config::load_from_file(path).with_context(|| format!("loading {}", path.display()));
    }
    match Config::default_path() {
        Ok(path) => Ok(Config::load_or_default(&path)?),
        Err(e) => {
            warn!("using default configuration: {}", e);
            Ok(Config::default())
        }
    }
}

pub fn write_catalogs(out: &mut impl Write) -> anyhow::Result<()> {
    writeln!(out, "Templates:")?;
    for style in TemplateStyle::ALL {
        let definition = style.definition();
        let keys: Vec<&str> = definition.schema.iter().map(|spec| spec.key).collect();
        writeln!(
            out,
            "  {:<12} {:<28} {:<16} {}",
            definition.id,
            definition.name,
            definition.category.to_string(),
            keys.join(" ")
        )?;
    }
    writeln!(out, "Boards:")?;
    for material in init_standard_catalog().get_all_materials() {
        writeln!(
            out,
            "  {:<12} {:<28} {:<16} {:.2} mm",
            material.id.to_string(),
            material.name,
            material.category.to_string(),
            material.caliper_mm
        )?;
    }
    Ok(())
}

/// `KEY=VALUE`
pub fn parse_assignment(input: &str) -> anyhow::Result<(String, String)> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=VALUE, got '{}'", input))?;
    let key = key.trim();
    if key.is_empty() {
        bail!("missing parameter name in '{}'", input);
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// Colon separated fields: a panel index followed by lengths.
fn parse_panel_fields(input: &str, units: MeasurementSystem, lengths: std::ops::RangeInclusive<usize>) -> anyhow::Result<(usize, Vec<f64>)> {
    let mut fields = input.split(':');
    let panel = fields
        .next()
        .unwrap_or_default()
        .trim()
        .parse::<usize>()
        .with_context(|| format!("invalid panel index in '{}'", input))?;
    let values = fields
        .map(|field| parse_length(field, units))
        .collect::<Result<Vec<f64>, _>>()?;
    if !lengths.contains(&values.len()) {
        bail!("'{}' needs {} to {} lengths after the panel", input, lengths.start(), lengths.end());
    }
    Ok((panel, values))
}

pub fn parse_window(input: &str, units: MeasurementSystem) -> anyhow::Result<Window> {
    let (panel, v) = parse_panel_fields(input, units, 4..=5)?;
    Ok(Window {
        panel,
        x: v[0],
        y: v[1],
        w: v[2],
        h: v[3],
        r: v.get(4).copied().unwrap_or(0.0),
    })
}

pub fn parse_thumb_notch(input: &str, units: MeasurementSystem) -> anyhow::Result<ThumbNotch> {
    let (panel, v) = parse_panel_fields(input, units, 2..=2)?;
    Ok(ThumbNotch {
        panel,
        width: v[0],
        depth: v[1],
    })
}

fn material_from_args(args: &DesignArgs) -> anyhow::Result<Option<Material>> {
    if let Some(caliper) = args.caliper {
        return Ok(Some(Material::custom("Custom", caliper)?));
    }
    match &args.material {
        Some(id) => init_standard_catalog()
            .get_material(id)
            .cloned()
            .map(Some)
            .ok_or_else(|| anyhow!("unknown material '{}', see `dielinekit list`", id)),
        None => Ok(None),
    }
}

/// Assemble a design from a saved state or the configured defaults, then
/// apply every override given on the command line.
pub fn design_from_args(args: &DesignArgs, config: &Config) -> anyhow::Result<DesignState> {
    let catalog = init_standard_catalog();
    let mut state = match &args.state {
        Some(path) => {
            let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            DesignState::from_snapshot(&DesignSnapshot::from_json(&json)?, &catalog)?
        }
        None => {
            let style = match &args.template {
                Some(id) => id.parse::<TemplateStyle>().map_err(|e| anyhow!(e))?,
                None => config.default_style()?,
            };
            let material = match material_from_args(args)? {
                Some(material) => material,
                None => config.default_material()?,
            };
            let bleed = config.bleed_for(&material);
            DesignState::new(style, material)?
                .update(StatePatch::SetUnits(config.units))?
                .update(StatePatch::SetBleed(bleed))?
        }
    };

    if args.state.is_some() {
        if let Some(id) = &args.template {
            let style = id.parse::<TemplateStyle>().map_err(|e| anyhow!(e))?;
            if style != state.style() {
                state = state.update(StatePatch::SelectTemplate(style))?;
            }
        }
        if let Some(material) = material_from_args(args)? {
            state = state.update(StatePatch::SetMaterial(material))?;
        }
    }

    if let Some(units) = args.units {
        state = state.update(StatePatch::SetUnits(units.into()))?;
    }
    let units = state.units();

    if let Some(mode) = args.mode {
        let mode = match mode {
            ModeArg::Internal => DimensionMode::Internal,
            ModeArg::External => DimensionMode::External,
            ModeArg::Clearance => DimensionMode::ProductClearance {
                clearance: match &args.clearance {
                    Some(value) => parse_length(value, units)?,
                    None => bail!("--mode clearance needs --clearance"),
                },
            },
        };
        state = state.update(StatePatch::SetDimensionMode(mode))?;
    }

    for assignment in &args.set {
        let (key, value) = parse_assignment(assignment)?;
        let value = parse_length(&value, units)?;
        state = state
            .update(StatePatch::SetParameter { key: key.clone(), value })
            .with_context(|| format!("setting {}", key))?;
    }

    if let Some(bleed) = &args.bleed {
        state = state.update(StatePatch::SetBleed(parse_length(bleed, units)?))?;
    }

    let mut features: Features = *state.features();
    features.zip_strip |= args.zip_strip;
    if let Some(window) = &args.window {
        features.window = Some(parse_window(window, units)?);
    }
    if let Some(notch) = &args.thumb_notch {
        features.thumb_notch = Some(parse_thumb_notch(notch, units)?);
    }
    if features != *state.features() {
        state = state.update(StatePatch::SetFeatures(features))?;
    }

    for y in &args.perforations {
        state = state.update(StatePatch::InsertPerforation {
            y: parse_length(y, units)?,
        })?;
    }

    Ok(state)
}

/// Place an output under the configured output directory, creating it.
fn output_path(config: &Config, path: &Path) -> anyhow::Result<PathBuf> {
    let resolved = config.output_path(path);
    if resolved.as_path() != path {
        if let Some(parent) = resolved.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(resolved)
}

fn write_outputs(state: &DesignState, output: &OutputArgs, config: &Config) -> anyhow::Result<()> {
    let mut options = config.export_options();
    if output.no_dims {
        options.include_dims = false;
    }

    let bbox = state.geometry().bbox;
    info!(
        template = state.style().id(),
        material = %state.material().id,
        width = bbox.w,
        height = bbox.h,
        "dieline generated"
    );
    for message in state.messages().iter().filter(|m| !m.passed) {
        warn!("{}", message);
    }

    let wrote_file = output.svg.is_some() || output.dxf.is_some() || output.bundle.is_some() || output.save_state.is_some();
    if let Some(path) = &output.svg {
        let path = output_path(config, path)?;
        std::fs::write(&path, svg_string(state.geometry(), &options))
            .with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &output.dxf {
        let path = output_path(config, path)?;
        let mut buffer = Vec::new();
        write_dxf(state.geometry(), options.dxf_tolerance, &mut buffer)?;
        std::fs::write(&path, buffer).with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &output.bundle {
        save_bundle(state, &options, output_path(config, path)?)?;
    }
    if let Some(path) = &output.save_state {
        let path = output_path(config, path)?;
        std::fs::write(&path, state.snapshot().to_json()?).with_context(|| format!("writing {}", path.display()))?;
    }
    if !wrote_file {
        std::io::stdout().lock().write_all(svg_string(state.geometry(), &options).as_bytes())?;
    }
    Ok(())
}
