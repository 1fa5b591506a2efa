#![allow(dead_code)]

pub const TEST_ACCOUNT: &str = "account-1";
pub const TEST_DESTINATION_ADDRESS: &str = "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4";
pub const TEST_FEE_SATS: u64 = 10;
pub const TEST_AMOUNT_SATS: u64 = 990;
