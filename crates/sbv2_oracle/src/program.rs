//! Deployed addresses of the oracle program.

use core::fmt;
use core::str::FromStr;

use sbv2_layout::Pubkey;

/// Oracle program on mainnet-beta.
pub const MAINNET_PROGRAM_ID: Pubkey =
	solana_pubkey::pubkey!("SW1TCH7qEPTdLsDHRgPuMQjbQxKdH2aBStViMFnt64f");

/// Oracle program on devnet.
pub const DEVNET_PROGRAM_ID: Pubkey =
	solana_pubkey::pubkey!("2TfB33aLaneQb5TNVwyDz3jSZXS6jdW2ARw1Dgf84XCG");

/// A cluster the oracle program is deployed on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cluster {
	#[default]
	Mainnet,
	Devnet,
}

impl Cluster {
	pub const ALL: [Cluster; 2] = [Cluster::Mainnet, Cluster::Devnet];

	pub const fn program_id(self) -> Pubkey {
		match self {
			Self::Mainnet => MAINNET_PROGRAM_ID,
			Self::Devnet => DEVNET_PROGRAM_ID,
		}
	}

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Mainnet => "mainnet-beta",
			Self::Devnet => "devnet",
		}
	}

	/// The cluster a program id belongs to, if it is one of the known
	/// deployments.
	pub fn from_program_id(program_id: &Pubkey) -> Option<Self> {
		Self::ALL
			.into_iter()
			.find(|cluster| cluster.program_id() == *program_id)
	}
}

impl fmt::Display for Cluster {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown cluster `{0}`, expected `mainnet-beta` or `devnet`")]
pub struct UnknownCluster(pub String);

impl FromStr for Cluster {
	type Err = UnknownCluster;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"mainnet" | "mainnet-beta" => Ok(Self::Mainnet),
			"devnet" => Ok(Self::Devnet),
			other => Err(UnknownCluster(other.to_owned())),
		}
	}
}
