use super::*;

/// Seeded random layout, reproducible for a given seed and config.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMineGenerator {
    seed: u64,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(self, config: BoardConfig) -> BTreeSet<Position> {
        use rand::prelude::*;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        place_mines(config, &mut rng)
    }
}
