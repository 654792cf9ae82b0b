use codesim_core::metrics::Similarity;
use serde_json::json;

pub fn format_json(similarity: &Similarity) -> String {
    let output = json!({
        "similarity": (similarity.percentage() * 100.0).round() / 100.0,
        "editCost": similarity.edit_cost,
        "totalSize": similarity.total_size(),
        "sourceSize": similarity.source_size,
        "destinationSize": similarity.destination_size,
    });

    serde_json::to_string_pretty(&output).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_fields() {
        let sim = Similarity {
            edit_cost: 1,
            source_size: 4,
            destination_size: 4,
        };
        let value: serde_json::Value = serde_json::from_str(&format_json(&sim)).unwrap();
        assert_eq!(value["similarity"], 87.5);
        assert_eq!(value["editCost"], 1);
        assert_eq!(value["totalSize"], 8);
        assert_eq!(value["sourceSize"], 4);
        assert_eq!(value["destinationSize"], 4);
    }
}
