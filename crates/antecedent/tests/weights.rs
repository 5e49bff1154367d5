//! Integration tests for normalized, within-year and ordered weights.

use approx::assert_relative_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Gamma};
use sam_antecedent::{AntecedentConfig, BlockTable, WeightCalculator};

fn ogle_calc() -> WeightCalculator {
    WeightCalculator::new(AntecedentConfig::new(BlockTable::ogle_default()).with_n_years(91))
        .unwrap()
}

fn gamma_draw(rng: &mut StdRng) -> Vec<f64> {
    let g = Gamma::new(1.0, 1.0).unwrap();
    (0..38).map(|_| g.sample(rng)).collect()
}

#[test]
fn global_weights_sum_to_one_for_gamma_draws() {
    let calc = ogle_calc();
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let raw = gamma_draw(&mut rng);
        let w = calc.weights(&raw).unwrap();
        assert_relative_eq!(w.weight().sum(), 1.0, epsilon = 1e-9);
        assert!(w.weight().iter().all(|&x| (0.0..=1.0).contains(&x)));
    }
}

#[test]
fn global_weights_sum_to_one_with_sparse_draw() {
    let calc = ogle_calc();
    let mut raw = [0.0; 38];
    raw[37] = 3.5;
    let w = calc.weights(&raw).unwrap();
    assert_relative_eq!(w.weight().sum(), 1.0, epsilon = 1e-12);
    // Block 38 spans October..December of lag 4.
    for m in 9..12 {
        assert_relative_eq!(w.get(m, 4), 1.0 / 3.0, epsilon = 1e-12);
    }
}

#[test]
fn alpha_columns_sum_to_one() {
    let calc = ogle_calc();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let raw = gamma_draw(&mut rng);
        let alpha = calc.weights(&raw).unwrap().alpha().unwrap();
        for col in alpha.columns() {
            assert_relative_eq!(col.sum(), 1.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn yearly_shares_sum_to_one() {
    let calc = ogle_calc();
    let mut rng = StdRng::seed_from_u64(11);
    let raw = gamma_draw(&mut rng);
    let w = calc.weights(&raw).unwrap();
    let yearly = w.yearly();
    assert_eq!(yearly.len(), 5);
    assert_relative_eq!(yearly.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    for (t, share) in yearly.iter().enumerate() {
        assert_relative_eq!(*share, w.weight().column(t).sum(), epsilon = 1e-12);
    }
}

#[test]
fn post_harvest_months_are_exactly_zero() {
    let calc = ogle_calc();
    // Put all mass on the blocks that map to October..December of lag 0.
    let mut raw = [1e-3; 38];
    raw[9] = 1e6;
    raw[10] = 1e6;
    raw[11] = 1e6;
    let delta = calc.month_weights(&raw).unwrap();
    let w = calc.weights(&raw).unwrap();
    for m in 9..12 {
        assert_eq!(delta[[m, 0]], 0.0);
        assert_eq!(w.get(m, 0), 0.0);
    }
    // Same months one year back are untouched.
    for m in 9..12 {
        assert!(delta[[m, 1]] > 0.0);
    }
}

#[test]
fn uniform_raw_weights_depend_only_on_block_membership() {
    let calc = ogle_calc();
    let blocks = BlockTable::ogle_default();
    let sizes = blocks.block_sizes();
    let mask = calc.mask();
    let n_unmasked = 60 - mask.n_masked(5);
    assert_eq!(n_unmasked, 57);

    for c in [0.01, 1.0, 250.0] {
        let w = calc.weights(&[c; 38]).unwrap();

        // Every unmasked cell carries 1 / n_unmasked.
        for t in 0..5 {
            for m in 0..12 {
                let expected = if mask.is_masked(t, m) {
                    0.0
                } else {
                    1.0 / n_unmasked as f64
                };
                assert_relative_eq!(w.get(m, t), expected, epsilon = 1e-12);
            }
        }

        // Total weight of a block is its unmasked membership count / 57.
        let mut block_mass = vec![0.0; 38];
        for t in 0..5 {
            for m in 0..12 {
                block_mass[blocks.block(t, m)] += w.get(m, t);
            }
        }
        for (b, mass) in block_mass.iter().enumerate() {
            let unmasked = if (9..12).contains(&b) { 0 } else { sizes[b] };
            assert_relative_eq!(*mass, unmasked as f64 / 57.0, epsilon = 1e-12);
        }
    }
}

#[test]
fn uniform_alpha_closed_form() {
    let alpha = ogle_calc().weights(&[1.0; 38]).unwrap().alpha().unwrap();
    for m in 0..9 {
        assert_relative_eq!(alpha[[m, 0]], 1.0 / 9.0, epsilon = 1e-12);
    }
    for t in 1..5 {
        for m in 0..12 {
            assert_relative_eq!(alpha[[m, t]], 1.0 / 12.0, epsilon = 1e-12);
        }
    }
}

#[test]
fn ordered_matches_weight_matrix() {
    let calc = ogle_calc();
    let mut rng = StdRng::seed_from_u64(3);
    let raw = gamma_draw(&mut rng);
    let w = calc.weights(&raw).unwrap();
    for t in 0..5 {
        for m in 0..12 {
            assert_eq!(w.ordered()[t * 12 + (11 - m)], w.get(m, t));
        }
    }
    let cumulative = w.cumulative();
    assert_eq!(cumulative.len(), 60);
    assert!(cumulative.windows(2).all(|p| p[1] >= p[0]));
    assert_relative_eq!(*cumulative.last().unwrap(), 1.0, epsilon = 1e-12);
}

#[test]
fn weights_into_reuses_buffer() {
    let calc = ogle_calc();
    let mut buf = calc.buffer();
    calc.weights_into(&[1.0; 38], &mut buf).unwrap();
    let first = buf.clone();
    let mut raw = [1.0; 38];
    raw[0] = 10.0;
    calc.weights_into(&raw, &mut buf).unwrap();
    assert_ne!(first, buf);
    calc.weights_into(&[1.0; 38], &mut buf).unwrap();
    assert_eq!(first, buf);
}
