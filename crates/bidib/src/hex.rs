/// Parse loosely formatted hex: whitespace, `:` and `-` separators are
/// accepted, as is an optional `0x` prefix per run of digits.
pub fn parse_hex(input: &str) -> Result<Vec<u8>, String> {
    let cleaned: String = input
        .split(|c: char| c.is_whitespace() || c == ':' || c == '-')
        .map(|chunk| chunk.strip_prefix("0x").unwrap_or(chunk))
        .collect();

    if cleaned.len() % 2 != 0 {
        return Err("odd number of hex digits".to_string());
    }

    (0..cleaned.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&cleaned[i..i + 2], 16)
                .map_err(|_| format!("invalid hex near {:?}", &cleaned[i..i + 2]))
        })
        .collect()
}

/// Format bytes as dash-separated hex, the way log lines show payloads.
pub fn format_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_hex() {
        assert_eq!(parse_hex("fe0102fe").unwrap(), vec![0xfe, 1, 2, 0xfe]);
    }

    #[test]
    fn parses_separated_hex() {
        assert_eq!(parse_hex("fe 01:02-fe").unwrap(), vec![0xfe, 1, 2, 0xfe]);
        assert_eq!(parse_hex("0xfe 0x01").unwrap(), vec![0xfe, 1]);
    }

    #[test]
    fn rejects_odd_length() {
        assert!(parse_hex("abc").is_err());
    }

    #[test]
    fn rejects_non_hex() {
        assert!(parse_hex("zz").is_err());
    }

    #[test]
    fn formats_dashed() {
        assert_eq!(format_hex(&[0xfe, 1, 2]), "fe-01-02");
        assert_eq!(format_hex(&[]), "");
    }
}
