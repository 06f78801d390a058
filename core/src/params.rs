use crate::constants::{BASE_SUBSIDY, HALVING_INTERVAL, REGTEST_HALVING_INTERVAL};
use bitcoin::Network;
use serde::{Deserialize, Serialize};

/// Consensus parameters governing satoshi issuance on a given network
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    pub network: Network,
    pub halving_interval: u64,
    pub base_subsidy: u64,
}

pub const MAINNET_PARAMS: Params = Params { network: Network::Bitcoin, halving_interval: HALVING_INTERVAL, base_subsidy: BASE_SUBSIDY };

pub const TESTNET_PARAMS: Params = Params { network: Network::Testnet, halving_interval: HALVING_INTERVAL, base_subsidy: BASE_SUBSIDY };

pub const SIGNET_PARAMS: Params = Params { network: Network::Signet, halving_interval: HALVING_INTERVAL, base_subsidy: BASE_SUBSIDY };

pub const REGTEST_PARAMS: Params =
    Params { network: Network::Regtest, halving_interval: REGTEST_HALVING_INTERVAL, base_subsidy: BASE_SUBSIDY };

impl From<Network> for Params {
    fn from(network: Network) -> Self {
        match network {
            Network::Bitcoin => MAINNET_PARAMS,
            Network::Testnet => TESTNET_PARAMS,
            Network::Signet => SIGNET_PARAMS,
            Network::Regtest => REGTEST_PARAMS,
            other => Params { network: other, halving_interval: HALVING_INTERVAL, base_subsidy: BASE_SUBSIDY },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_from_network() {
        assert_eq!(Params::from(Network::Bitcoin), MAINNET_PARAMS);
        assert_eq!(Params::from(Network::Regtest).halving_interval, 150);
        assert_eq!(Params::from(Network::Testnet).base_subsidy, BASE_SUBSIDY);
    }
}
