mod roster;

pub mod arrangement;
pub mod balance_result;
pub mod balancer;
pub mod zone_histogram;

pub use arrangement::Arrangement;
pub use balance_result::BalanceResult;
pub use balancer::{BalancerConfig, BalancerConfigBuilder, ZoneBalancer};
pub use roster::Roster;
pub use zone_histogram::{shannon_entropy, ZoneHistogram};

use anyhow::Error;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Rebalances the zone order within every match of `arrangement` so that each team
/// plays in each zone as evenly as possible.
///
/// # Arguments
///
/// * `arrangement` - The fixed matches; only the order of teams inside each match changes
/// * `config` - Iteration budget, random seed and optimality tolerance
/// * `on_update` - Callback function called after each iteration with the current iteration number and best entropy
///
/// # Returns
///
/// Returns the best arrangement found together with its mean zone entropy (`BalanceResult`).
/// Runs with the same config over the same input give the same result.
///
/// # Errors
///
/// Returns an error if the arrangement has no matches or no zones
pub fn rezone<F>(arrangement: &Arrangement, config: &BalancerConfig, on_update: F) -> Result<BalanceResult, Error>
where
    F: FnMut(usize, f64),
{
    let rng = StdRng::seed_from_u64(config.seed);
    let balancer = ZoneBalancer::new(arrangement.clone(), config, rng)?;
    Ok(balancer.run(on_update))
}
