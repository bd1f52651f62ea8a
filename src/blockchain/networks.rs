// src/blockchain/networks.rs

/// Blockchains served by the Ankr Advanced API, in the order they are advertised.
pub const SUPPORTED_NETWORKS: &[&str] = &[
    "eth",
    "bsc",
    "polygon",
    "arbitrum",
    "optimism",
    "base",
    "avalanche",
    "fantom",
    "gnosis",
    "linea",
    "scroll",
    "flare",
    "polygon_zkevm",
    "rollux",
    "syscoin",
    "telos",
    "xai",
    "xlayer",
    "eth_sepolia",
    "eth_holesky",
    "base_sepolia",
    "optimism_testnet",
    "polygon_amoy",
    "avalanche_fuji",
];

// Normalize common blockchain aliases users might pass via MCP
pub fn normalize_blockchain(input: &str) -> String {
    let mut s = input.trim().to_lowercase();
    s = s.replace([' ', '-'], "_");
    while s.contains("__") {
        s = s.replace("__", "_");
    }

    match s.as_str() {
        "ethereum" | "mainnet" | "1" => "eth".to_string(),
        "sepolia" | "11155111" => "eth_sepolia".to_string(),
        "holesky" => "eth_holesky".to_string(),
        "binance" | "bnb" | "bnb_chain" | "56" => "bsc".to_string(),
        "matic" | "137" => "polygon".to_string(),
        "arb" | "arbitrum_one" | "42161" => "arbitrum".to_string(),
        "op" | "10" => "optimism".to_string(),
        "avax" | "43114" => "avalanche".to_string(),
        "ftm" => "fantom".to_string(),
        "xdai" => "gnosis".to_string(),
        "8453" => "base".to_string(),
        _ => s,
    }
}

/// Returns the canonical identifier when the input names a supported network.
pub fn resolve(input: &str) -> Option<&'static str> {
    let normalized = normalize_blockchain(input);
    SUPPORTED_NETWORKS
        .iter()
        .copied()
        .find(|network| *network == normalized)
}
