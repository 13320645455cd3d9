//! PM-JPL CLI - surface parameters for evapotranspiration modelling

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use pmjpl_algorithms::parameters::{
    BiomeParameters, LandCoverClass, NoDataPolicy, ParameterResolver, ResolveParams, Variable,
};
use pmjpl_algorithms::vegetation::{fractional_vegetation_cover, leaf_area_index, LaiParams};
use pmjpl_core::io::{read_geotiff, write_geotiff, GeoTiffOptions};
use pmjpl_core::{Field, Raster, RasterElement};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "pmjpl")]
#[command(author, version, about = "PM-JPL surface parameters", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a raster file
    Info {
        /// Input raster file
        input: PathBuf,
    },
    /// Resolve a land-cover parameter from an IGBP classification raster
    Resolve {
        /// Variable name: rbl_min, rbl_max, vpd_open, vpd_closed, cl, gl_sh,
        /// gl_e_wv, tmin_open, tmin_closed
        variable: String,
        /// IGBP classification raster
        input: PathBuf,
        /// Output file
        output: PathBuf,
        /// Raster whose grid the output is placed on (default: the
        /// classification grid)
        #[arg(short, long)]
        reference: Option<PathBuf>,
        /// Cell size of the intermediate class grid when resampling
        #[arg(short, long)]
        upsampling_resolution: Option<f64>,
        /// Write NaN for unclassified cells instead of the fallback value
        #[arg(short, long)]
        propagate_nodata: bool,
    },
    /// Fractional vegetation cover from NDVI
    Fvc {
        /// Input NDVI raster
        input: PathBuf,
        /// Output file
        output: PathBuf,
    },
    /// Leaf area index from NDVI
    Lai {
        /// Input NDVI raster
        input: PathBuf,
        /// Output file
        output: PathBuf,
        #[arg(long, default_value = "0.0")]
        min_fipar: f64,
        #[arg(long, default_value = "1.0")]
        max_fipar: f64,
        #[arg(long, default_value = "0.0")]
        min_lai: f64,
        #[arg(long, default_value = "10.0")]
        max_lai: f64,
    },
    /// Print parameter rows of the IGBP table
    Table {
        /// IGBP class code (repeatable; default: every class)
        #[arg(short, long = "class")]
        classes: Vec<u8>,
        /// Print JSON instead of a text table
        #[arg(long)]
        json: bool,
    },
}

/// One class row as printed by `table --json`
#[derive(Serialize)]
struct TableRow {
    code: u8,
    abbreviation: &'static str,
    name: &'static str,
    #[serde(flatten)]
    parameters: BiomeParameters,
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_raster<T: RasterElement>(path: &Path) -> Result<Raster<T>> {
    let pb = spinner("Reading raster...");
    let raster: Raster<T> = read_geotiff(path)
        .with_context(|| format!("Failed to read raster {}", path.display()))?;
    pb.finish_and_clear();
    info!("Input: {} x {}", raster.cols(), raster.rows());
    Ok(raster)
}

/// Resolve `variable` from the classification at `input`, on the grid of
/// `reference` when given.
///
/// Class codes are decoded as integers so wide and negative codes survive.
fn resolve_file(
    variable: Variable,
    input: &Path,
    reference: Option<&Path>,
    upsampling_resolution: Option<f64>,
    nodata_policy: NoDataPolicy,
) -> Result<Field<f64>> {
    let igbp: Raster<i64> = read_raster(input)?;
    let target = match reference {
        Some(path) => Some(read_raster::<f64>(path)?.geometry()),
        None => None,
    };

    let params = ResolveParams {
        target_geometry: target,
        classification_upsampling_resolution: upsampling_resolution,
        nodata_policy,
    };

    ParameterResolver::igbp()
        .resolve(variable, &Field::Raster(igbp), &params)
        .with_context(|| format!("Failed to resolve {}", variable))
}

fn write_result(field: Field<f64>, path: &Path) -> Result<()> {
    let raster = field
        .into_raster()
        .context("Result is not a raster")?;
    let pb = spinner("Writing output...");
    write_geotiff(&raster, path, Some(GeoTiffOptions::default()))
        .context("Failed to write output")?;
    pb.finish_and_clear();
    Ok(())
}

fn done(name: &str, path: &Path, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

fn table_rows(resolver: &ParameterResolver, codes: &[u8]) -> Vec<TableRow> {
    let classes: Vec<LandCoverClass> = if codes.is_empty() {
        LandCoverClass::ALL.to_vec()
    } else {
        codes
            .iter()
            .map(|&c| LandCoverClass::from_code(c as i64))
            .collect()
    };
    classes
        .into_iter()
        .map(|class| TableRow {
            code: class.code(),
            abbreviation: class.abbreviation(),
            name: class.name(),
            parameters: *resolver.table().row(class),
        })
        .collect()
}

fn print_table(rows: &[TableRow]) {
    print!("{:>4} {:<4}", "code", "");
    for variable in Variable::ALL {
        print!(" {:>11}", variable.name());
    }
    println!();
    for row in rows {
        print!("{:>4} {:<4}", row.code, row.abbreviation);
        for (_, value) in row.parameters.values() {
            print!(" {:>11}", value);
        }
        println!();
    }
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        // ── Info ─────────────────────────────────────────────────────
        Commands::Info { input } => {
            let raster: Raster<f64> = read_raster(&input)?;
            let (rows, cols) = raster.shape();
            let bounds = raster.bounds();
            let stats = raster.statistics();

            println!("File: {}", input.display());
            println!("Dimensions: {} x {} ({} cells)", cols, rows, raster.len());
            println!("Cell size: {}", raster.cell_size());
            println!(
                "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                bounds.0, bounds.1, bounds.2, bounds.3
            );
            if let Some(crs) = raster.crs() {
                println!("CRS: {}", crs);
            }
            if let Some(nodata) = raster.nodata() {
                println!("NoData: {}", nodata);
            }
            println!("\nStatistics:");
            if let Some(min) = stats.min {
                println!("  Min: {:.4}", min);
            }
            if let Some(max) = stats.max {
                println!("  Max: {:.4}", max);
            }
            if let Some(mean) = stats.mean {
                println!("  Mean: {:.4}", mean);
            }
            println!(
                "  Valid cells: {} ({:.1}%)",
                stats.valid_count,
                100.0 * stats.valid_count as f64 / raster.len().max(1) as f64
            );
        }

        // ── Parameters ───────────────────────────────────────────────
        Commands::Resolve {
            variable,
            input,
            output,
            reference,
            upsampling_resolution,
            propagate_nodata,
        } => {
            let variable: Variable = variable.parse().context("Invalid variable")?;
            let policy = if propagate_nodata {
                NoDataPolicy::Propagate
            } else {
                NoDataPolicy::Fallback
            };

            let start = Instant::now();
            let result = resolve_file(
                variable,
                &input,
                reference.as_deref(),
                upsampling_resolution,
                policy,
            )?;
            let elapsed = start.elapsed();
            write_result(result, &output)?;
            done(variable.name(), &output, elapsed);
        }

        Commands::Table { classes, json } => {
            let rows = table_rows(&ParameterResolver::igbp(), &classes);
            if json {
                let text = serde_json::to_string_pretty(&rows).context("Failed to encode rows")?;
                println!("{}", text);
            } else {
                print_table(&rows);
            }
        }

        // ── Vegetation ───────────────────────────────────────────────
        Commands::Fvc { input, output } => {
            let ndvi: Raster<f64> = read_raster(&input)?;
            let start = Instant::now();
            let result = fractional_vegetation_cover(&ndvi.into());
            let elapsed = start.elapsed();
            write_result(result, &output)?;
            done("FVC", &output, elapsed);
        }

        Commands::Lai {
            input,
            output,
            min_fipar,
            max_fipar,
            min_lai,
            max_lai,
        } => {
            let params = LaiParams {
                min_fipar,
                max_fipar,
                min_lai,
                max_lai,
            };
            let ndvi: Raster<f64> = read_raster(&input)?;
            let start = Instant::now();
            let result = leaf_area_index(&ndvi.into(), &params);
            let elapsed = start.elapsed();
            write_result(result, &output)?;
            done("LAI", &output, elapsed);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pmjpl_core::io::SampleType;
    use pmjpl_core::{GeoTransform, CRS};

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_resolve() {
        let cli = Cli::try_parse_from([
            "pmjpl",
            "resolve",
            "RBL_max",
            "igbp.tif",
            "out.tif",
            "--reference",
            "ndvi.tif",
            "--upsampling-resolution",
            "250",
            "--propagate-nodata",
        ])
        .unwrap();
        match cli.command {
            Commands::Resolve {
                variable,
                reference,
                upsampling_resolution,
                propagate_nodata,
                ..
            } => {
                assert_eq!(variable.parse::<Variable>().unwrap(), Variable::RblMax);
                assert_eq!(reference, Some(PathBuf::from("ndvi.tif")));
                assert_eq!(upsampling_resolution, Some(250.0));
                assert!(propagate_nodata);
            }
            _ => panic!("expected resolve"),
        }
    }

    #[test]
    fn test_table_rows() {
        let resolver = ParameterResolver::igbp();
        assert_eq!(table_rows(&resolver, &[]).len(), LandCoverClass::COUNT);

        let rows = table_rows(&resolver, &[2, 200]);
        assert_eq!(rows[0].abbreviation, "EBF");
        assert_eq!(rows[1].code, 0);

        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["code"], 2);
        assert_eq!(json["vpd_open"], 1000.0);
        assert_eq!(json["rbl_max"], 100.0);
    }

    #[test]
    fn test_resolve_file_reads_integer_codes() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("igbp.tif");
        let igbp = Raster::from_vec(vec![2i32, -1, 12, 70_000], 2, 2)
            .unwrap()
            .with_transform(GeoTransform::new(500_000.0, 4_000_000.0, 500.0, -500.0))
            .with_crs(CRS::utm(11, true));
        let options = GeoTiffOptions {
            sample_type: SampleType::Int32,
        };
        write_geotiff(&igbp, &input, Some(options)).unwrap();

        let out = resolve_file(Variable::RblMax, &input, None, None, NoDataPolicy::Fallback)
            .unwrap()
            .into_raster()
            .unwrap();
        assert_eq!(out.geometry(), igbp.geometry());
        let values: Vec<f64> = out.data().iter().copied().collect();
        assert_eq!(values, vec![100.0, 50.0, 50.0, 50.0]);
    }

    #[test]
    fn test_resolve_file_onto_reference() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("igbp.tif");
        let reference = dir.path().join("ndvi.tif");

        // float classification with a NaN hole and no no-data tag
        let mut igbp = Raster::filled(2, 2, 1.0f64)
            .with_transform(GeoTransform::new(500_000.0, 4_000_000.0, 250.0, -250.0))
            .with_crs(CRS::utm(11, true));
        igbp.set(0, 0, f64::NAN).unwrap();
        write_geotiff(&igbp, &input, None).unwrap();

        let ndvi = Raster::filled(1, 1, 0.5f64)
            .with_transform(GeoTransform::new(500_000.0, 4_000_000.0, 500.0, -500.0))
            .with_crs(CRS::utm(11, true));
        write_geotiff(&ndvi, &reference, None).unwrap();

        let out = resolve_file(
            Variable::RblMax,
            &input,
            Some(reference.as_path()),
            None,
            NoDataPolicy::Propagate,
        )
        .unwrap()
        .into_raster()
        .unwrap();
        assert_eq!(out.geometry(), ndvi.geometry());
        assert!((out.get(0, 0).unwrap() - 95.0).abs() < 1e-9);

        let missing = dir.path().join("missing.tif");
        assert!(
            resolve_file(Variable::RblMax, &missing, None, None, NoDataPolicy::Fallback).is_err()
        );
    }
}
