extern crate proptest;
extern crate qubo_problems;

use proptest::prelude::*;
use qubo_problems::prelude::*;

#[test]
fn square_with_diagonal() {
	let edges = vec![(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)];
	let bqm = maxcut_bqm(&edges);
	let sampleset = SimulatedAnnealer::new()
		.with_seed(17)
		.sample(&bqm, 100)
		.unwrap();
	let best = sampleset.first().unwrap();
	let optimum = max_cut_brute_force(&edges).unwrap();
	assert_eq!(optimum, 4);
	assert_eq!(cut_size(&edges, &best.sample).unwrap(), optimum);
	assert_eq!(best.energy, -(optimum as f64));
	// the only cut of size 4 is {0, 2} | {1, 3}, leaving the diagonal uncut
	assert_eq!(best.sample[&0], best.sample[&2]);
	assert_eq!(best.sample[&1], best.sample[&3]);
	assert_ne!(best.sample[&0], best.sample[&1]);
	let ground = brute_force_minimum(&bqm).unwrap();
	assert_eq!(ground.samples.len(), 2);
	assert!(ground.samples.contains(&best.sample));
}

#[test]
fn spin_form_finds_the_same_cut() {
	let edges = vec![("a", "b"), ("b", "c"), ("c", "d"), ("d", "e"), ("e", "a")];
	let bqm = maxcut_bqm(&edges).change_vartype(Vartype::Spin);
	let sampleset = SimulatedAnnealer::new()
		.with_seed(4)
		.sample(&bqm, 100)
		.unwrap();
	let best = sampleset.first().unwrap();
	let binary = sampleset.clone().change_vartype(Vartype::Binary);
	assert_eq!(
		cut_size(&edges, &binary.first().unwrap().sample).unwrap(),
		max_cut_brute_force(&edges).unwrap()
	);
	assert!((best.energy + 4.0).abs() < 1e-9);
}

fn graphs() -> impl Strategy<Value = Vec<(u8, u8)>> {
	prop::collection::vec((0u8..7, 0u8..7), 1..12)
}

proptest! {
	#[test]
	fn ground_state_is_the_maximum_cut(edges in graphs()) {
		let bqm = maxcut_bqm(&edges);
		let ground = brute_force_minimum(&bqm).unwrap();
		let optimum = max_cut_brute_force(&edges).unwrap();
		prop_assert!((ground.energy + optimum as f64).abs() < 1e-9);
		for sample in ground.samples.iter() {
			prop_assert_eq!(cut_size(&edges, sample).unwrap(), optimum);
		}
	}
}
