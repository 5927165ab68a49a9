use std::collections::HashSet;

use crate::features::sightings::models::Category;

/// Keyword table in priority order; `Objects` is the fallback
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::People,
        &[
            "person", "people", "human", "man", "woman", "child", "face", "portrait", "crowd",
            "group",
        ],
    ),
    (
        Category::Animals,
        &[
            "animal", "dog", "cat", "bird", "pet", "wildlife", "mammal", "fish", "insect",
            "reptile", "horse", "cow", "deer",
        ],
    ),
    (
        Category::Vehicles,
        &[
            "car", "vehicle", "truck", "bus", "motorcycle", "bicycle", "bike", "van",
            "automobile", "transport", "wheel", "tire",
        ],
    ),
    (
        Category::Places,
        &[
            "building", "house", "architecture", "structure", "real estate", "property",
            "landmark", "monument", "temple", "church", "tower", "bridge",
        ],
    ),
    (
        Category::Trash,
        &["trash", "garbage", "litter", "waste", "rubbish", "debris"],
    ),
    (
        Category::Bags,
        &[
            "bag", "backpack", "luggage", "suitcase", "handbag", "purse", "briefcase", "duffle",
        ],
    ),
];

/// Map detected labels to a category
///
/// Labels are compared case-insensitively as whole strings. The first
/// category in priority order with any matching keyword wins.
pub fn categorize<S: AsRef<str>>(labels: &[S]) -> Category {
    let labels: HashSet<String> = labels
        .iter()
        .map(|l| l.as_ref().trim().to_lowercase())
        .collect();

    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| labels.contains(*k)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Objects)
}
