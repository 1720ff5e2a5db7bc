//! Resolution of model tag references into asset URLs.

use crate::types::{BrandAssets, ClassificationAnswer, TagMap};

/// Resolve an answer's tag references against the published map.
///
/// Total over any input. An unknown logo reference resolves to the empty
/// string; unknown references in the image lists are dropped while the
/// model's ordering of survivors is preserved. Text fields and colors pass
/// through untouched.
pub fn resolve_tags(tag_map: &TagMap, answer: ClassificationAnswer) -> BrandAssets {
    BrandAssets {
        brand_name: answer.brand_name,
        tagline: answer.tagline,
        description: answer.description,
        colors: answer.colors,
        logo: tag_map.get(&answer.logo).cloned().unwrap_or_default(),
        product_images: resolve_list(tag_map, answer.product_images),
        banner_images: resolve_list(tag_map, answer.banner_images),
        error: None,
    }
}

fn resolve_list(tag_map: &TagMap, tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .filter_map(|tag| tag_map.get(&tag).cloned())
        .collect()
}
