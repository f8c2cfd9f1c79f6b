//! Shared fixtures.

use std::collections::HashMap;

use super::StubRequestClient;
use crate::models::{GenerationInput, ImageCandidate, ImagesResponse, StoredAsset};

/// Input of the electric bikes scenario.
#[must_use]
pub fn bike_input() -> GenerationInput {
    GenerationInput::new("electric bikes", "en")
}

/// Stub answering the electric bikes scenario with two topics and one FAQ.
#[must_use]
pub fn bike_fixture() -> StubRequestClient {
    StubRequestClient::new()
        .with_title("Top Electric Bikes")
        .with_paragraph("Battery life", "Most bikes ride 60 km per charge.")
        .with_paragraph("Price", "Expect to pay from 1000 EUR.")
        .with_excerpt("A short guide to electric bikes.")
        .with_seo("Electric bikes guide", "Battery life and price explained.")
        .with_faq("How far can I ride?", "Around 60 km.")
        .with_images(ImagesResponse {
            created: 1_700_000_000,
            // "png-bytes" and "seo-bytes" in base64.
            data: vec![
                ImageCandidate::from_base64("cG5nLWJ5dGVz"),
                ImageCandidate::from_base64("c2VvLWJ5dGVz"),
                ImageCandidate::default(),
            ],
        })
        .with_titles(["Best commuter e-bikes", "E-bike maintenance", "Folding e-bikes"])
        .with_assets(vec![StoredAsset {
            id: 7,
            name: "image.png".to_string(),
            url: "/uploads/image.png".to_string(),
            mime: Some("image/png".to_string()),
            size: Some(9.0),
            extra: HashMap::new(),
        }])
}
