//! Shared setup for the `pick-sim` and `pick-plan` binaries: argument
//! parsing, warehouse loading, and planning an order.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pickbot_core::{CellKind, Grid, GridError, Point, layout};
use pickbot_route::layoutgen::{GeneratedLayout, LayoutGen, LayoutParams};
use pickbot_route::scenario::UnknownScenario;
use pickbot_route::{OrderItem, PlanError, Planner, Route, ShelfMap, resolve_items};
use pickbot_sim::SimConfig;
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;

pub const USAGE: &str = "\
usage: pick-sim [OPTIONS] [ITEM...]

Plan a pick route for ITEMs (product names) and play it back.
Without ITEMs a random order is drawn from the stocked shelves.

options:
  --layout <file>    warehouse layout (default: generated)
  --config <file>    JSON simulation settings
  --scenario <name>  normal, black-friday, christmas or holiday
  --seed <n>         seed for generated layouts and orders (default 1)
  --size <n>         side of a generated layout (default 12)
  --picks <n>        size of a random order (default 4)
  --speed <x>        playback speed multiplier, 0.1 to 10
  --json             print the planned route as JSON (pick-plan)
  -h, --help         show this help

layout files hold the grid (. S R P #), optionally followed by a line of
dashes and one `x y product` line per stocked shelf.";

#[derive(Error, Debug)]
pub enum DemoError {
    #[error("{0}")]
    Usage(String),

    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("stock line {line}: {reason}")]
    Stock { line: usize, reason: String },

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Scenario(#[from] UnknownScenario),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub layout: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub scenario: Option<String>,
    pub seed: u64,
    pub size: i32,
    pub picks: usize,
    pub speed: Option<f64>,
    pub json: bool,
    pub help: bool,
    pub items: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            layout: None,
            config: None,
            scenario: None,
            seed: 1,
            size: LayoutParams::default().size,
            picks: 4,
            speed: None,
            json: false,
            help: false,
            items: Vec::new(),
        }
    }
}

impl Options {
    /// Parse command-line arguments, program name excluded.
    pub fn from_args<I>(args: I) -> Result<Self, DemoError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut opts = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => opts.help = true,
                "--json" => opts.json = true,
                "--layout" => opts.layout = Some(value(&arg, args.next())?.into()),
                "--config" => opts.config = Some(value(&arg, args.next())?.into()),
                "--scenario" => opts.scenario = Some(value(&arg, args.next())?),
                "--seed" => opts.seed = number(&arg, args.next())?,
                "--size" => opts.size = number(&arg, args.next())?,
                "--picks" => opts.picks = number(&arg, args.next())?,
                "--speed" => opts.speed = Some(number(&arg, args.next())?),
                flag if flag.starts_with("--") => {
                    return Err(DemoError::Usage(format!("unknown option {flag}")));
                }
                _ => opts.items.push(arg),
            }
        }
        Ok(opts)
    }
}

fn value(flag: &str, v: Option<String>) -> Result<String, DemoError> {
    v.ok_or_else(|| DemoError::Usage(format!("{flag} needs a value")))
}

fn number<T: std::str::FromStr>(flag: &str, v: Option<String>) -> Result<T, DemoError> {
    let v = value(flag, v)?;
    v.parse()
        .map_err(|_| DemoError::Usage(format!("{flag}: \"{v}\" is not a valid number")))
}

/// Settings from `--config`, with `--scenario` and `--speed` applied on top.
pub fn load_config(opts: &Options) -> Result<SimConfig, DemoError> {
    let mut config = match &opts.config {
        Some(path) => {
            let text = read(path)?;
            serde_json::from_str(&text).map_err(|source| DemoError::Config {
                path: path.clone(),
                source,
            })?
        }
        None => SimConfig::default(),
    };
    if let Some(name) = &opts.scenario {
        config.scenario = name.parse()?;
    }
    if let Some(speed) = opts.speed {
        config.speed_multiplier = speed;
    }
    Ok(config)
}

fn read(path: &Path) -> Result<String, DemoError> {
    fs::read_to_string(path).map_err(|source| DemoError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a layout file: the grid, then optionally a line of dashes followed
/// by `x y product` stock lines.
pub fn parse_warehouse(text: &str) -> Result<GeneratedLayout, DemoError> {
    let mut grid_lines = Vec::new();
    let mut stock_lines = Vec::new();
    let mut in_stock = false;
    for (n, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if !in_stock && !trimmed.is_empty() && trimmed.chars().all(|c| c == '-') {
            in_stock = true;
        } else if in_stock {
            stock_lines.push((n + 1, trimmed));
        } else {
            grid_lines.push(line);
        }
    }
    let grid = layout::parse(&grid_lines.join("\n"))?;
    let shelves = parse_stock(&grid, &stock_lines)?;
    Ok(GeneratedLayout { grid, shelves })
}

fn parse_stock(grid: &Grid, lines: &[(usize, &str)]) -> Result<ShelfMap, DemoError> {
    let mut shelves = ShelfMap::new();
    for &(line, text) in lines {
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let mut fields = text.splitn(3, char::is_whitespace);
        let mut coord = || -> Option<i32> { fields.next()?.trim().parse().ok() };
        let (Some(x), Some(y)) = (coord(), coord()) else {
            return Err(DemoError::Stock {
                line,
                reason: format!("expected `x y product`, got \"{text}\""),
            });
        };
        let product = fields.next().map(str::trim).unwrap_or_default();
        if product.is_empty() {
            return Err(DemoError::Stock {
                line,
                reason: "missing product name".into(),
            });
        }
        let pos = Point::new(x, y);
        if grid.at(pos) != Some(CellKind::Shelf) {
            return Err(DemoError::Stock {
                line,
                reason: format!("{pos} is not a shelf"),
            });
        }
        shelves.insert(pos, product);
    }
    Ok(shelves)
}

/// A planned order, ready for playback.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub grid: Grid,
    pub config: SimConfig,
    /// The optimized route.
    pub route: Arc<Route>,
    /// The same picks visited in order-entry sequence.
    pub baseline: Route,
    /// Items with no stocked shelf.
    pub unresolved: Vec<String>,
}

/// Load or generate the warehouse, resolve the order and plan it.
pub fn prepare(opts: &Options) -> Result<Prepared, DemoError> {
    let config = load_config(opts)?;
    let params = LayoutParams {
        size: opts.size,
        ..LayoutParams::default()
    };
    let mut mg = LayoutGen::new(StdRng::seed_from_u64(opts.seed), params);
    let warehouse = match &opts.layout {
        Some(path) => parse_warehouse(&read(path)?)?,
        None => mg.generate()?,
    };

    let items: Vec<OrderItem> = if opts.items.is_empty() {
        mg.order(&warehouse, opts.picks)
    } else {
        opts.items.iter().map(OrderItem::new).collect()
    };
    let resolution = resolve_items(&items, &warehouse.shelves);

    let planner = Planner::new(&warehouse.grid, config.plan_config())?;
    let mode = config.ordering_mode();
    log::info!(
        "planning {} picks, scenario {}, {:?} ordering",
        resolution.waypoints.len(),
        config.scenario,
        mode
    );
    let route = planner.plan(&resolution.waypoints, mode);
    let baseline = planner.plan_in_order(&resolution.waypoints);
    Ok(Prepared {
        grid: warehouse.grid,
        config,
        route: Arc::new(route),
        baseline,
        unresolved: resolution.unresolved,
    })
}
