//! Address parsing and the table of well-known program addresses.

use base58::FromBase58;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::{pubkey, sysvar};

pub const SYSTEM_PROGRAM_ID: Pubkey = pubkey!("11111111111111111111111111111111");
pub const TOKEN_PROGRAM_ID: Pubkey = pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey = pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

/// Account names filled in automatically when left blank, in both the
/// camelCase and snake_case spellings IDLs use.
const WELL_KNOWN: &[(&str, Pubkey)] = &[
    ("systemProgram", SYSTEM_PROGRAM_ID),
    ("system_program", SYSTEM_PROGRAM_ID),
    ("tokenProgram", TOKEN_PROGRAM_ID),
    ("token_program", TOKEN_PROGRAM_ID),
    ("associatedTokenProgram", ASSOCIATED_TOKEN_PROGRAM_ID),
    ("associated_token_program", ASSOCIATED_TOKEN_PROGRAM_ID),
    ("rent", sysvar::rent::ID),
    ("clock", sysvar::clock::ID),
];

/// Fixed address for a well-known account name, if any.
pub fn well_known_address(account_name: &str) -> Option<Pubkey> {
    WELL_KNOWN
        .iter()
        .find(|(name, _)| *name == account_name)
        .map(|(_, id)| *id)
}

pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

pub fn hex_decode(hex: &str) -> Result<Vec<u8>, String> {
    if hex.len() % 2 != 0 {
        return Err(format!("Hex string has odd length: {}", hex.len()));
    }
    if !hex.is_ascii() {
        return Err("Hex string contains non-ASCII characters".to_string());
    }
    let mut bytes = Vec::with_capacity(hex.len() / 2);
    for i in (0..hex.len()).step_by(2) {
        let byte = u8::from_str_radix(&hex[i..i + 2], 16)
            .map_err(|e| format!("Invalid hex at position {}: {}", i, e))?;
        bytes.push(byte);
    }
    Ok(bytes)
}

/// Decode a 32-byte address from base58 or 64 hex chars (`0x` optional).
///
/// Some 64-digit hex strings are also valid base58; a base58 decode that
/// is not 32 bytes long falls through to hex.
pub fn parse_address(input: &str) -> Result<Pubkey, String> {
    let input = input.trim();
    let base58_len = match input.from_base58() {
        Ok(bytes) => match <[u8; 32]>::try_from(bytes.as_slice()) {
            Ok(array) => return Ok(Pubkey::new_from_array(array)),
            Err(_) => Some(bytes.len()),
        },
        Err(_) => None,
    };

    let hex = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    let bytes = match (hex_decode(hex), base58_len) {
        (Ok(bytes), _) => bytes,
        (Err(_), Some(len)) => return Err(format!("Base58 decoded to {} bytes, expected 32", len)),
        (Err(e), None) => return Err(e),
    };
    <[u8; 32]>::try_from(bytes.as_slice())
        .map(Pubkey::new_from_array)
        .map_err(|_| {
            format!(
                "Expected 32 bytes, got {} (provide base58 or 64 hex chars)",
                bytes.len()
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base58_and_hex_agree() {
        let b58 = parse_address("11111111111111111111111111111111").unwrap();
        let hex = parse_address(&format!("0x{}", "00".repeat(32))).unwrap();
        assert_eq!(b58, hex);
        assert_eq!(b58, SYSTEM_PROGRAM_ID);
    }

    #[test]
    fn test_unprefixed_hex_that_is_also_base58() {
        // No '0' digit, so this decodes as base58 too, to the wrong length.
        let key = parse_address(&"ab".repeat(32)).unwrap();
        assert_eq!(key, Pubkey::new_from_array([0xab; 32]));
        let key = parse_address(&"9f".repeat(32)).unwrap();
        assert_eq!(key, Pubkey::new_from_array([0x9f; 32]));
    }

    #[test]
    fn test_wrong_length_base58_reports_base58() {
        let err = parse_address("9xQe").unwrap_err();
        assert!(err.contains("Base58"), "{}", err);
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(parse_address("abc").is_err());
        assert!(parse_address("").is_err());
        assert!(parse_address("9xQe").is_err());
    }

    #[test]
    fn test_well_known_names() {
        assert_eq!(well_known_address("systemProgram"), Some(SYSTEM_PROGRAM_ID));
        assert_eq!(well_known_address("system_program"), Some(SYSTEM_PROGRAM_ID));
        assert_eq!(well_known_address("tokenProgram"), Some(TOKEN_PROGRAM_ID));
        assert_eq!(well_known_address("admin"), None);
    }
}
