/// Category keyword table. Order matters: the first category with a matching
/// keyword wins.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("lending", &["aave", "compound", "morpho", "euler", "spark"]),
    ("dex", &["uniswap", "curve", "balancer", "velodrome"]),
];

pub const OTHER: &str = "Other";

/// Maps a protocol name to a coarse category label.
pub fn categorize(name: &str) -> String {
    let lower = name.to_lowercase();

    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| capitalize(category))
        .unwrap_or_else(|| OTHER.to_string())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
