extern crate annealers;
extern crate classical_solver;
extern crate proptest;

use annealers::prelude::*;
use classical_solver::sa::SimulatedAnnealer;
use proptest::prelude::*;

fn qubo_entries() -> impl Strategy<Value = Vec<((u8, u8), f64)>> {
	prop::collection::vec(((0u8..5, 0u8..5), -5.0f64..5.0), 1..12)
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(32))]

	#[test]
	fn occurrences_sum_to_num_reads(
		q in qubo_entries(),
		seed in any::<u64>(),
		num_reads in 1usize..20,
	) {
		let model = BinaryQuadraticModel::from_qubo(q);
		let set = SimulatedAnnealer::new()
			.with_num_sweeps(10)
			.with_seed(seed)
			.sample(&model, num_reads)
			.unwrap();
		prop_assert_eq!(set.num_reads(), num_reads);
		prop_assert!(set.len() <= num_reads);
		prop_assert!(set.iter().all(|r| r.num_occurrences >= 1));
		for r in set.iter() {
			prop_assert!((model.energy(&r.sample).unwrap() - r.energy).abs() < 1e-9);
		}
	}

	#[test]
	fn same_seed_gives_the_same_sampleset(q in qubo_entries(), seed in any::<u64>()) {
		let model = BinaryQuadraticModel::from_qubo(q);
		let sampler = SimulatedAnnealer::new().with_num_sweeps(10).with_seed(seed);
		let a = sampler.sample(&model, 8).unwrap();
		let b = sampler.sample(&model, 8).unwrap();
		prop_assert_eq!(a, b);
	}
}
