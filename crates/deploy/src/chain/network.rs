//! Well-known network names.

/// Networks with a conventional name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum KnownNetwork {
    Mainnet,
    Sepolia,
    Holesky,
    Optimism,
    Base,
    BaseSepolia,
    Arbitrum,
    Polygon,
    Hardhat,
    Localhost,
}

impl KnownNetwork {
    pub fn chain_id(&self) -> u64 {
        match self {
            KnownNetwork::Mainnet => 1,
            KnownNetwork::Sepolia => 11155111,
            KnownNetwork::Holesky => 17000,
            KnownNetwork::Optimism => 10,
            KnownNetwork::Base => 8453,
            KnownNetwork::BaseSepolia => 84532,
            KnownNetwork::Arbitrum => 42161,
            KnownNetwork::Polygon => 137,
            KnownNetwork::Hardhat => 31337,
            KnownNetwork::Localhost => 1337,
        }
    }

    pub fn from_chain_id(chain_id: u64) -> Option<Self> {
        use strum::IntoEnumIterator;

        Self::iter().find(|network| network.chain_id() == chain_id)
    }
}

/// Name a network after its chain id, falling back to `chain-<id>`.
pub fn network_name_for(chain_id: u64) -> String {
    KnownNetwork::from_chain_id(chain_id)
        .map(|network| network.to_string())
        .unwrap_or_else(|| format!("chain-{}", chain_id))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_known_names() {
        assert_eq!(network_name_for(1), "mainnet");
        assert_eq!(network_name_for(31337), "hardhat");
        assert_eq!(network_name_for(84532), "base-sepolia");
        assert_eq!(network_name_for(424242), "chain-424242");
    }

    #[test]
    fn test_parse_network() {
        assert_eq!(KnownNetwork::from_str("sepolia").ok(), Some(KnownNetwork::Sepolia));
        assert_eq!(KnownNetwork::from_str("base-sepolia").map(|n| n.chain_id()).ok(), Some(84532));
        assert!(KnownNetwork::from_str("narnia").is_err());
    }
}
