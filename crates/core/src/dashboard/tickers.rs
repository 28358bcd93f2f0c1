/// Splits free-form ticker input on commas and whitespace, uppercases each
/// symbol and drops duplicates, keeping the first occurrence.
pub fn parse_tickers(input: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for raw in input.split(|c: char| c == ',' || c.is_whitespace()) {
        let symbol = raw.trim().to_uppercase();
        if symbol.is_empty() || out.contains(&symbol) {
            continue;
        }
        out.push(symbol);
    }
    out
}

/// Same normalization over already-split input (e.g. repeated CLI args).
pub fn normalize_tickers<S: AsRef<str>>(inputs: &[S]) -> Vec<String> {
    let joined = inputs
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(",");
    parse_tickers(&joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercases_and_splits() {
        assert_eq!(parse_tickers("AAPL, nvda"), vec!["AAPL", "NVDA"]);
        assert_eq!(parse_tickers(" tsla\tmsft\n,,amd "), vec!["TSLA", "MSFT", "AMD"]);
    }

    #[test]
    fn dedups_preserving_order() {
        assert_eq!(parse_tickers("nvda, AAPL, NVDA ,aapl"), vec!["NVDA", "AAPL"]);
    }

    #[test]
    fn blank_input_yields_nothing() {
        assert!(parse_tickers("").is_empty());
        assert!(parse_tickers(" , ,\t").is_empty());
    }

    #[test]
    fn normalizes_arg_lists() {
        assert_eq!(
            normalize_tickers(&["AAPL", "nvda,brk-b", "aapl"]),
            vec!["AAPL", "NVDA", "BRK-B"]
        );
    }
}
