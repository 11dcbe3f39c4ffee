//! pipeline — end-to-end run of the rust_od toolkit on a toy zone system.
//!
//! Twelve zones in four planning districts: distribute trips with the
//! gravity model, integerize them by planning district, convert the flows to
//! a district-level zone system and write everything to a scratch directory.

use std::io::Cursor;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{LevelFilter, debug, info};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use od_core::{Matrix, SparseZoneIndex, Vector, ZoneNumber};
use od_gravity::{BalancePolicy, GravityConfig, GravityModel, SpatialAggregation};
use od_integerize::{IntegerizeConfig, Integerizer};
use od_io::{load_zone_system_reader, read_matrix_binary, write_matrix_binary, write_od_csv};
use od_remap::{Aggregation, ZoneRemapper};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:           u64 = 12345;
const DISTANCE_DECAY: f32 = 0.35;

// zone,planning_district,region.  Zone numbers are deliberately sparse.
const ZONES_CSV: &str = "\
zone,planning_district,region\n\
101,1,1\n\
102,1,1\n\
105,1,1\n\
201,2,1\n\
202,2,1\n\
210,2,1\n\
301,3,2\n\
302,3,2\n\
303,3,2\n\
401,4,2\n\
402,4,2\n\
450,4,2\n\
";

// Fine zone -> district zone.  Zone 105 straddles districts 1 and 2.
const MAPPING_CSV: &str = "\
OriginalZone,ConvertedZone,Fraction\n\
101,1,1\n\
102,1,1\n\
105,1,0.6\n\
105,2,0.4\n\
201,2,1\n\
202,2,1\n\
210,2,1\n\
301,3,1\n\
302,3,1\n\
303,3,1\n\
401,4,1\n\
402,4,1\n\
450,4,1\n\
";

// ── Synthetic inputs ──────────────────────────────────────────────────────────

/// Pseudo-distance between two zones from their numbers.
fn distance(o: ZoneNumber, d: ZoneNumber) -> f32 {
    let (o, d) = (o.get() as f32, d.get() as f32);
    ((o / 100.0).floor() - (d / 100.0).floor()).abs() * 4.0 + ((o % 100.0) - (d % 100.0)).abs() * 0.5 + 1.0
}

fn marginal(zones: &[ZoneNumber], f: impl Fn(u32) -> f32) -> Vec<f32> {
    zones.iter().map(|z| f(z.get())).collect()
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    TermLogger::init(LevelFilter::Info, Config::default(), TerminalMode::Mixed, ColorChoice::Auto)
        .context("failed to initialize logging")?;

    let out_dir = std::env::temp_dir().join("od_pipeline");
    std::fs::create_dir_all(&out_dir)?;

    // 1. Zone systems.
    let zones = load_zone_system_reader(Cursor::new(ZONES_CSV))?;
    let districts = std::sync::Arc::new(SparseZoneIndex::new((1..=4).map(ZoneNumber))?);
    info!("zone system: {} zones, {} planning districts", zones.len(), districts.len());

    // 2. Friction and marginals.
    let idx = zones.index().clone();
    let friction = Matrix::from_fn(idx.clone(), idx.clone(), |o, d| (-DISTANCE_DECAY * distance(o, d)).exp());
    let keys = idx.keys();
    let production = Vector::from_flat(idx.clone(), marginal(keys, |z| 50.0 + (z % 7) as f32 * 12.5))?;
    let attraction = Vector::from_flat(idx.clone(), marginal(keys, |z| 30.0 + (z % 5) as f32 * 20.0))?;
    info!(
        "production {:.1}, attraction {:.1} before balancing",
        production.total(),
        attraction.total()
    );

    // 3. Gravity model.
    let model = GravityModel::new(GravityConfig {
        max_error:      0.01,
        max_iterations: 200,
        balance:        BalancePolicy::AverageProductionAttraction,
        spatial:        SpatialAggregation::Region,
    })?;
    let t0 = Instant::now();
    let distribution = model.distribute(
        &friction,
        &production,
        &attraction,
        Some(&zones),
        &mut |fraction: f32| debug!("gravity progress {:.0} %", fraction * 100.0),
    )?;
    info!(
        "gravity: {} iteration(s), converged {}, max deviation {:.5}, {:.1} trips in {:.3} s",
        distribution.report.iterations,
        distribution.report.converged,
        distribution.report.max_deviation,
        distribution.flows.total(),
        t0.elapsed().as_secs_f64(),
    );

    // 4. Integerize by planning district.
    let integerized = Integerizer::new(IntegerizeConfig { seed: SEED })
        .integerize_by_planning_district(&distribution.flows, &zones)?;
    info!(
        "integerized: {} extra unit(s) placed over {} block(s), {:.0} whole trips",
        integerized.report.assigned_units,
        integerized.report.blocks,
        integerized.matrix.total(),
    );

    // 5. Convert to districts through a mapping file.
    let mapping_path = out_dir.join("zone_to_district.csv");
    std::fs::write(&mapping_path, MAPPING_CSV)?;
    let remapper = ZoneRemapper::from_mapping_csv(&mapping_path, &idx, &districts)?;
    let district_flows = remapper.convert_matrix(&distribution.flows, Aggregation::Sum)?;
    let district_friction = remapper.convert_matrix(&friction, Aggregation::Average)?;
    info!(
        "district flows total {:.1} (zone flows {:.1})",
        district_flows.total(),
        distribution.flows.total()
    );

    // 6. Write and read back.
    let binary_path = out_dir.join("trips.bin");
    write_matrix_binary(&binary_path, &integerized.matrix)?;
    let reread = read_matrix_binary(&binary_path, &idx, &idx)?;
    anyhow::ensure!(reread.as_slice() == integerized.matrix.as_slice(), "binary round trip changed the matrix");
    write_od_csv(&out_dir.join("district_trips.csv"), &district_flows)?;
    write_od_csv(&out_dir.join("district_friction.csv"), &district_friction)?;

    println!();
    println!("{:<10} {:>12} {:>12}", "District", "Productions", "Attractions");
    println!("{}", "-".repeat(36));
    let attractions = district_flows.column_sums();
    for (d, (p, a)) in district_flows.row_sums().iter().zip(&attractions).enumerate() {
        println!("{:<10} {:>12.1} {:>12.1}", districts.key_at(d), p, a);
    }
    println!();
    println!("Output written to {}", out_dir.display());

    Ok(())
}
