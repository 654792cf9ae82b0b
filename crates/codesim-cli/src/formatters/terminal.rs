use codesim_core::metrics::Similarity;

/// The bare percentage, two decimals. Scripts parse this line, so it is never
/// colored.
pub fn format_terminal(similarity: &Similarity) -> String {
    similarity.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_decimals() {
        let sim = Similarity {
            edit_cost: 1,
            source_size: 4,
            destination_size: 4,
        };
        assert_eq!(format_terminal(&sim), "87.50");
    }
}
