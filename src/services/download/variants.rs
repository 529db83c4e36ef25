//! URL variant ladder for image downloads.

use super::types::VariantRule;

/// The original URL followed by every applicable rewrite, without repeats.
pub fn variant_ladder(url: &str, rules: &[VariantRule], host_marker: Option<&str>) -> Vec<String> {
    let mut ladder = vec![url.to_string()];
    if host_marker.is_some_and(|marker| !url.contains(marker)) {
        return ladder;
    }
    for rule in rules {
        if rule.from.is_empty() || !url.contains(&rule.from) {
            continue;
        }
        let variant = url.replace(&rule.from, &rule.to);
        if !ladder.contains(&variant) {
            ladder.push(variant);
        }
    }
    ladder
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::download::types::default_variant_rules;

    #[test]
    fn test_thumbnail_ladder() {
        let ladder = variant_ladder(
            "https://m.media-amazon.com/images/I/71abc._SY88.jpg",
            &default_variant_rules(),
            Some("amazon.com"),
        );
        assert_eq!(
            ladder,
            vec![
                "https://m.media-amazon.com/images/I/71abc._SY88.jpg",
                "https://m.media-amazon.com/images/I/71abc._AC_SL1500.jpg",
                "https://m.media-amazon.com/images/I/71abc._AC_SL1000.jpg",
                "https://m.media-amazon.com/images/I/71abc._AC_UL1500.jpg",
                "https://images-na.ssl-images-amazon.com/images/I/71abc._SY88.jpg",
            ]
        );
    }

    #[test]
    fn test_large_rendition_ladder_on_legacy_host() {
        let ladder = variant_ladder(
            "https://images-na.ssl-images-amazon.com/images/I/x._AC_SL1500_.jpg",
            &default_variant_rules(),
            Some("amazon.com"),
        );
        assert_eq!(ladder.len(), 4);
        assert_eq!(
            ladder[3],
            "https://m.media-amazon.com/images/I/x._AC_SL1500_.jpg"
        );
    }

    #[test]
    fn test_marker_gates_rewrites() {
        let url = "https://cdn.example.test/p_SY88.jpg";
        let rules = default_variant_rules();
        assert_eq!(variant_ladder(url, &rules, Some("amazon.com")), vec![url]);
        assert_eq!(variant_ladder(url, &rules, None).len(), 4);
    }
}
