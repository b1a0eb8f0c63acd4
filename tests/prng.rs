use galaxy_render::galaxy::prng::{hash_u32, slot_seed, Lcg};
use rand::Rng;

#[test]
fn seed_zero_matches_reference_sequence() {
    let mut lcg = Lcg::new(0);
    assert_eq!(lcg.state(), 408360806);

    let expected = [
        (115509215, 0.05378817021846771_f32),
        (911304891, 0.42435941100120544),
        (843616196, 0.3928394019603729),
        (267878013, 0.12474042177200317),
        (2017792421, 0.9396077990531921),
    ];
    for (state, value) in expected {
        assert_eq!(lcg.next_f32(), value);
        assert_eq!(lcg.state(), state);
    }
}

#[test]
fn seed_42_matches_reference_sequence() {
    let mut lcg = Lcg::new(42);
    assert_eq!(lcg.state(), 408744140);
    assert_eq!(lcg.next_f32(), 0.06285373866558075);
    assert_eq!(lcg.next_f32(), 0.7976703643798828);
    assert_eq!(lcg.state(), 1712984012);
}

#[test]
fn identically_seeded_generators_agree() {
    let mut rng = rand::rng();
    for _ in 0..32 {
        let seed: i32 = rng.random();
        let mut a = Lcg::new(seed);
        let mut b = Lcg::new(seed);
        for _ in 0..1000 {
            assert_eq!(a.next_f32().to_bits(), b.next_f32().to_bits());
        }
    }
}

#[test]
fn reseeding_restarts_the_sequence() {
    let mut lcg = Lcg::new(7);
    let first: Vec<f32> = (0..10).map(|_| lcg.next_f32()).collect();
    lcg.seed(7);
    let second: Vec<f32> = (0..10).map(|_| lcg.next_f32()).collect();
    assert_eq!(first, second);
}

#[test]
fn values_stay_in_unit_interval() {
    let mut rng = rand::rng();
    let mut lcg = Lcg::new(rng.random());
    for _ in 0..100_000 {
        let value = lcg.next_f32();
        assert!((0.0..=1.0).contains(&value), "{value}");
    }
}

#[test]
fn neighbouring_slots_get_unrelated_seeds() {
    assert_ne!(hash_u32(0), 0);
    let seeds: Vec<i32> = (0..1000).map(|slot| slot_seed(0, slot)).collect();
    let mut unique = seeds.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), seeds.len());
    assert_ne!(slot_seed(0, 5), slot_seed(1, 5));
}
