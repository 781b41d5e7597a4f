//! Read-only listing content rendered around the booking wizard.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub name: String,
    pub location: String,
    pub max_guests: u32,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub rating: f32,
    pub review_count: u32,
    pub description: Vec<String>,
    pub amenities: Vec<String>,
    pub host: Host,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Host {
    pub name: String,
    pub superhost: bool,
    pub years_hosting: u32,
    pub review_count: u32,
    pub identity_verified: bool,
    pub bio: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub author: String,
    pub rating: u8,
    pub date: String,
    pub text: String,
}

impl Listing {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Mean of the displayed reviews, if any.
    pub fn average_review_rating(&self) -> Option<f32> {
        if self.reviews.is_empty() {
            return None;
        }
        let sum: u32 = self.reviews.iter().map(|r| u32::from(r.rating)).sum();
        Some(sum as f32 / self.reviews.len() as f32)
    }
}

impl Default for Listing {
    fn default() -> Self {
        Self {
            name: "Villa Serenity".into(),
            location: "Costa Brava, Spain".into(),
            max_guests: 8,
            bedrooms: 4,
            bathrooms: 3,
            rating: 4.9,
            review_count: 47,
            description: vec![
                "Escape to this stunning modern villa perched on the Mediterranean coast. \
                 With breathtaking sea views, an infinity pool, and luxurious amenities, \
                 Villa Serenity offers the perfect setting for an unforgettable vacation."
                    .into(),
                "Located just minutes from pristine beaches and charming coastal towns, \
                 you'll have easy access to local restaurants, shops, and attractions while \
                 enjoying complete privacy and tranquility."
                    .into(),
            ],
            amenities: vec![
                "Free WiFi".into(),
                "Free parking".into(),
                "Kitchen".into(),
                "TV".into(),
            ],
            host: Host {
                name: "Maria".into(),
                superhost: true,
                years_hosting: 4,
                review_count: 127,
                identity_verified: true,
                bio: "Welcome to my beautiful villa! I'm passionate about providing \
                      exceptional experiences for my guests. I live nearby and am always \
                      available to help make your stay perfect."
                    .into(),
            },
            reviews: vec![
                Review {
                    author: "Sarah".into(),
                    rating: 5,
                    date: "August 2024".into(),
                    text: "Absolutely stunning villa with incredible views! Maria was an \
                           amazing host and the property exceeded all our expectations."
                        .into(),
                },
                Review {
                    author: "James".into(),
                    rating: 5,
                    date: "July 2024".into(),
                    text: "Perfect location and beautifully designed space. We'll \
                           definitely be back!"
                        .into(),
                },
                Review {
                    author: "Emma".into(),
                    rating: 5,
                    date: "June 2024".into(),
                    text: "This place is a dream! The sunset views from the terrace are \
                           unforgettable."
                        .into(),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_listing_matches_villa() {
        let listing = Listing::default();
        assert_eq!(listing.name, "Villa Serenity");
        assert_eq!(listing.max_guests, 8);
        assert_eq!(listing.average_review_rating(), Some(5.0));
    }

    #[test]
    fn reviews_are_optional_in_json() {
        let mut value = serde_json::to_value(Listing::default()).unwrap();
        value.as_object_mut().unwrap().remove("reviews");
        let listing: Listing = serde_json::from_value(value).unwrap();
        assert!(listing.reviews.is_empty());
        assert_eq!(listing.average_review_rating(), None);
    }
}
