//! Lifecon CLI
//!
//! Worked example: prices whole life and term insurance for a sample life,
//! prints the commutation columns and a net premium reserve ladder.

use lifecon::{
    Annuity, ConstantYield, Insurance, LifeContingency, SingleLife, UltimateMortality,
};

/// Gompertz-Makeham annual rates for the demo: q capped at 1
fn makeham_rates(first_age: u32, last_age: u32) -> Vec<f64> {
    const A: f64 = 0.0002;
    const B: f64 = 0.000027;
    const C: f64 = 1.1;

    (first_age..=last_age)
        .map(|age| {
            let mu = A + B * C.powi(age as i32);
            (1.0 - (-mu).exp()).min(1.0)
        })
        .collect()
}

fn main() {
    env_logger::init();

    println!("Lifecon v0.1.0");
    println!("==============\n");

    let issue_age = 60;
    let rate = 0.05;
    let table = UltimateMortality::with_first_age(makeham_rates(60, 110), 60);
    let life = SingleLife::new(table, issue_age).expect("table covers the issue age");
    let lc = LifeContingency::new(life, ConstantYield::new(rate).expect("valid rate"));

    println!("Sample policy:");
    println!("  Issue Age: {}", issue_age);
    println!("  Interest:  {:.2}%", rate * 100.0);
    println!("  Horizon:   {} years", lc.omega());
    println!();

    // Commutation columns on a radix of 100,000
    println!("Commutation columns (radix 100,000):");
    println!("{:>5} {:>12} {:>12} {:>12} {:>12}", "t", "l", "D", "N", "M");
    println!("{}", "-".repeat(58));
    for t in (0..=lc.omega().min(40)).step_by(5) {
        println!(
            "{:>5} {:>12.1} {:>12.1} {:>12.1} {:>12.4}",
            t,
            lc.l_with_basis(t, 100_000.0).unwrap(),
            lc.D(t).unwrap() * 100_000.0,
            lc.N(t).unwrap() * 100_000.0,
            lc.M(t).unwrap() * 100_000.0,
        );
    }
    println!();

    let whole_life = Insurance::whole_life(lc.clone());
    let annuity_due = Annuity::due(lc.clone(), None);
    println!("Present values (per 1 of benefit):");
    println!("  Whole life insurance A = {:.6}", whole_life.present_value());
    println!("  Annuity due         a = {:.6}", annuity_due.present_value());

    let premium = lc.premium_net().unwrap();
    println!("  Net level premium   P = {:.6}", premium);
    println!();

    // 20-year term cover for comparison
    let term_premium = lc.premium_net_term(20).unwrap();
    println!("20-year term:");
    println!(
        "  Term insurance APV    = {:.6}",
        Insurance::new(lc.clone(), Some(20)).present_value()
    );
    println!("  Term net premium      = {:.6}", term_premium);
    println!();

    // Reserve ladder for the whole life cover
    println!("Net premium reserve ladder (per 1 of benefit):");
    println!("{:>5} {:>12}", "t", "Reserve");
    println!("{}", "-".repeat(18));
    for t in (0..=lc.omega().min(40)).step_by(5) {
        match lc.reserve_premium_net(t) {
            Ok(reserve) => println!("{:>5} {:>12.6}", t, reserve),
            Err(e) => {
                println!("{:>5} {:>12}", t, "-");
                log::debug!("reserve at {} unavailable: {}", t, e);
            }
        }
    }
}
