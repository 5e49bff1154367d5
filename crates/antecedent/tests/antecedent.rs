//! Integration tests for antecedent precipitation sums.

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sam_antecedent::{
    AntecedentConfig, BlockTable, MM_PER_INCH, MonthlyPrecip, PrecipUnit, WeightCalculator,
};

fn calc(n_years: usize, unit: PrecipUnit) -> WeightCalculator {
    let config = AntecedentConfig::new(BlockTable::ogle_default())
        .with_n_years(n_years)
        .with_unit(unit);
    WeightCalculator::new(config).unwrap()
}

#[test]
fn constant_series_in_inches_gives_conversion_factor() {
    let c = calc(30, PrecipUnit::Inches);
    let precip = MonthlyPrecip::constant(1950, 30, 1.0).unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..20 {
        let raw: Vec<f64> = (0..38).map(|_| rng.random::<f64>() + 0.01).collect();
        let series = c.antecedent(&raw, &precip).unwrap();
        assert_eq!(series.values().len(), 26);
        for &v in series.values() {
            assert_relative_eq!(v, MM_PER_INCH, epsilon = 1e-9);
        }
    }
}

#[test]
fn ogle_end_to_end_one_inch_per_month() {
    // 91 years of 25.4 mm every month, all-ones raw weights.
    let c = calc(91, PrecipUnit::Millimeters);
    let precip = MonthlyPrecip::constant(1, 91, 25.4).unwrap();
    let series = c.antecedent(&[1.0; 38], &precip).unwrap();

    assert_eq!(series.first_year(), 5);
    assert_eq!(series.last_year(), 91);
    assert_eq!(series.values().len(), 87);
    for (_, v) in series.iter() {
        assert_relative_eq!(v, 25.4, epsilon = 1e-9);
    }
}

#[test]
fn linear_in_precipitation() {
    let c = calc(12, PrecipUnit::Millimeters);
    let mut rng = StdRng::seed_from_u64(99);
    let rows_a: Vec<[Option<f64>; 12]> = (0..12)
        .map(|_| std::array::from_fn(|_| Some(rng.random::<f64>() * 80.0)))
        .collect();
    let rows_b: Vec<[Option<f64>; 12]> = rows_a
        .iter()
        .map(|r| std::array::from_fn(|m| r[m].map(|v| 2.0 * v + 3.0)))
        .collect();
    let a = MonthlyPrecip::from_rows(1980, &rows_a).unwrap();
    let b = MonthlyPrecip::from_rows(1980, &rows_b).unwrap();

    let raw: Vec<f64> = (0..38).map(|i| 1.0 + (i % 5) as f64).collect();
    let sa = c.antecedent(&raw, &a).unwrap();
    let sb = c.antecedent(&raw, &b).unwrap();
    for (x, y) in sa.values().iter().zip(sb.values()) {
        assert_relative_eq!(*y, 2.0 * x + 3.0, epsilon = 1e-9);
    }
}

#[test]
fn longer_series_only_uses_configured_years() {
    let c = calc(10, PrecipUnit::Millimeters);
    let precip = MonthlyPrecip::constant(1900, 40, 5.0).unwrap();
    let series = c.antecedent(&[1.0; 38], &precip).unwrap();
    assert_eq!(series.values().len(), 6);
    assert_eq!(series.last_year(), 1909);
}

#[test]
fn at_matches_series() {
    let c = calc(15, PrecipUnit::Inches);
    let mut rng = StdRng::seed_from_u64(5);
    let rows: Vec<[Option<f64>; 12]> = (0..15)
        .map(|_| std::array::from_fn(|_| Some(rng.random::<f64>() * 4.0)))
        .collect();
    let precip = MonthlyPrecip::from_rows(1893, &rows).unwrap();
    let raw = [0.5; 38];
    let weights = c.weights(&raw).unwrap();
    let series = c.antecedent(&raw, &precip).unwrap();
    for (year, v) in series.iter() {
        let idx = precip.year_index(year).unwrap();
        assert_relative_eq!(
            c.antecedent_at(&weights, &precip, idx).unwrap(),
            v,
            epsilon = 1e-12
        );
    }
}
