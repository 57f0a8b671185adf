//! Price a block of issue ages from a mortality rate CSV
//!
//! Reads an `age,rate` CSV, prices net premiums and reserves across an
//! issue-age range in parallel, and writes a JSON summary.

use anyhow::{bail, Context};
use clap::Parser;
use lifecon::{
    Annuity, ConstantYield, Insurance, LifeContingency, SingleLife, UltimateMortality,
};
use rayon::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(about = "Net premium pricing across a block of issue ages")]
struct Args {
    /// Mortality CSV with `age,rate` columns
    #[arg(long, default_value = "mortality.csv")]
    table: PathBuf,

    /// Annual effective interest rate
    #[arg(long, default_value_t = 0.05)]
    rate: f64,

    /// First issue age to price
    #[arg(long)]
    from_age: u32,

    /// Last issue age to price (inclusive)
    #[arg(long)]
    to_age: u32,

    /// Term in years (omitted = whole life)
    #[arg(long)]
    term: Option<u32>,

    /// Output JSON path
    #[arg(long, default_value = "premium_block.json")]
    output: PathBuf,
}

#[derive(Debug, serde::Deserialize)]
struct RateRow {
    age: u32,
    rate: f64,
}

/// Pricing results for one issue age
#[derive(Debug, Clone, Serialize)]
struct PricingCell {
    issue_age: u32,
    omega: u32,
    insurance_apv: f64,
    annuity_due_apv: f64,
    net_premium: f64,
    reserve_year_10: Option<f64>,
}

fn load_rates(path: &PathBuf) -> anyhow::Result<UltimateMortality> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening mortality table {}", path.display()))?;

    let mut rows: Vec<RateRow> = Vec::new();
    for result in reader.deserialize() {
        let row: RateRow = result.context("parsing mortality row")?;
        rows.push(row);
    }
    if rows.is_empty() {
        bail!("mortality table {} is empty", path.display());
    }

    rows.sort_by_key(|r| r.age);
    let first_age = rows[0].age;
    for (i, row) in rows.iter().enumerate() {
        if row.age != first_age + i as u32 {
            bail!("mortality table has a gap at age {}", row.age);
        }
    }

    let rates = rows.into_iter().map(|r| r.rate).collect();
    Ok(UltimateMortality::with_first_age(rates, first_age))
}

fn price_cell(
    table: &UltimateMortality,
    issue_age: u32,
    rate: f64,
    term: Option<u32>,
) -> lifecon::Result<PricingCell> {
    let life = SingleLife::new(table.clone(), issue_age)?;
    let lc = LifeContingency::new(life, ConstantYield::new(rate)?);

    let insurance_apv = Insurance::new(lc.clone(), term).present_value();
    let annuity_due_apv = Annuity::due(lc.clone(), term).present_value();
    let net_premium = match term {
        Some(n) => lc.premium_net_term(n)?,
        None => lc.premium_net()?,
    };
    let reserve_year_10 = if lc.omega() >= 10 {
        Some(lc.reserve_premium_net(10)?)
    } else {
        None
    };

    Ok(PricingCell {
        issue_age,
        omega: lc.omega(),
        insurance_apv,
        annuity_due_apv,
        net_premium,
        reserve_year_10,
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.from_age > args.to_age {
        bail!("from_age {} exceeds to_age {}", args.from_age, args.to_age);
    }

    let start = Instant::now();
    let table = load_rates(&args.table)?;
    log::info!(
        "loaded {} rates from {} in {:?}",
        table.len(),
        args.table.display(),
        start.elapsed()
    );

    // Each cell is independent; price the block in parallel
    let pricing_start = Instant::now();
    let cells: Vec<PricingCell> = (args.from_age..=args.to_age)
        .into_par_iter()
        .map(|age| price_cell(&table, age, args.rate, args.term))
        .collect::<lifecon::Result<Vec<_>>>()
        .context("pricing block")?;
    log::info!("priced {} cells in {:?}", cells.len(), pricing_start.elapsed());

    let file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    serde_json::to_writer_pretty(file, &cells)?;

    println!("Priced ages {}..={}", args.from_age, args.to_age);
    for cell in cells.iter().take(5) {
        println!(
            "  age {:>3}: A={:.6} a={:.6} P={:.6}",
            cell.issue_age, cell.insurance_apv, cell.annuity_due_apv, cell.net_premium
        );
    }
    if cells.len() > 5 {
        println!("  ... ({} more)", cells.len() - 5);
    }
    println!("Output written to {}", args.output.display());

    Ok(())
}
