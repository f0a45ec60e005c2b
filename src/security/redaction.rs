// Simple helpers to avoid accidental printing of secrets in logs/tests.

/// Redact a recovery phrase, keeping only its word count.
pub fn redact_mnemonic(phrase: &str) -> String {
    format!("<redacted words={}>", phrase.split_whitespace().count())
}

/// Shorten an address for log lines: `0x9858Ef…Eda94`.
pub fn short_address(address: &str) -> String {
    if address.len() <= 14 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}…{}", &address[..8], &address[address.len() - 5..])
}
