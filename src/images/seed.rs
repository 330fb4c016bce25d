//! Startup seeding of sample destinations and repair of stale image URLs.

use sqlx::PgPool;
use tracing::info;

use crate::destinations::{repo, repo_types::NewDestination};
use crate::images::client::ImageLookup;
use crate::images::services::{is_deprecated, resolve_image, DEPRECATED_IMAGE_HOST};

struct Sample {
    name: &'static str,
    category: &'static str,
    state: &'static str,
    latitude: f64,
    longitude: f64,
    image_url: &'static str,
    rating: f64,
    popularity: i32,
    best_time: &'static str,
    ideal_weather: &'static str,
    description: &'static str,
}

const SAMPLES: &[Sample] = &[
    Sample {
        name: "Taj Mahal",
        category: "Heritage",
        state: "Uttar Pradesh",
        latitude: 27.1751,
        longitude: 78.0421,
        image_url: "https://images.unsplash.com/photo-1564507592333-c60657eea523",
        rating: 4.8,
        popularity: 100,
        best_time: "October to March",
        ideal_weather: "15-30",
        description: "Iconic white marble mausoleum, one of the Seven Wonders of the World",
    },
    Sample {
        name: "Goa Beaches",
        category: "Beach",
        state: "Goa",
        latitude: 15.2993,
        longitude: 74.1240,
        image_url: "https://images.unsplash.com/photo-1512343879784-a960bf40e7f2",
        rating: 4.6,
        popularity: 95,
        best_time: "November to February",
        ideal_weather: "20-30",
        description: "Beautiful beaches, vibrant nightlife, and Portuguese heritage",
    },
    Sample {
        name: "Jaipur",
        category: "Heritage",
        state: "Rajasthan",
        latitude: 26.9124,
        longitude: 75.7873,
        image_url: "",
        rating: 4.5,
        popularity: 90,
        best_time: "October to March",
        ideal_weather: "warm",
        description: "The Pink City of forts, palaces and bustling bazaars",
    },
    Sample {
        name: "Manali",
        category: "Hill Station",
        state: "Himachal Pradesh",
        latitude: 32.2432,
        longitude: 77.1892,
        image_url: "",
        rating: 4.6,
        popularity: 88,
        best_time: "March to June",
        ideal_weather: "cool",
        description: "Snow-capped peaks, apple orchards and adventure sports in the Kullu valley",
    },
    Sample {
        name: "Kerala Backwaters",
        category: "Nature",
        state: "Kerala",
        latitude: 9.4981,
        longitude: 76.3388,
        image_url: "",
        rating: 4.7,
        popularity: 87,
        best_time: "September to March",
        ideal_weather: "rainy",
        description: "Houseboat cruises through palm-fringed lagoons and canals",
    },
    Sample {
        name: "Varanasi",
        category: "Spiritual",
        state: "Uttar Pradesh",
        latitude: 25.3176,
        longitude: 82.9739,
        image_url: "",
        rating: 4.4,
        popularity: 85,
        best_time: "October to March",
        ideal_weather: "15-30",
        description: "Ancient city of ghats and evening aarti on the Ganges",
    },
    Sample {
        name: "Darjeeling",
        category: "Hill Station",
        state: "West Bengal",
        latitude: 27.0360,
        longitude: 88.2627,
        image_url: "",
        rating: 4.5,
        popularity: 80,
        best_time: "April to June",
        ideal_weather: "cool",
        description: "Tea gardens, the toy train and sunrise views of Kanchenjunga",
    },
    Sample {
        name: "Hampi",
        category: "Heritage",
        state: "Karnataka",
        latitude: 15.3350,
        longitude: 76.4600,
        image_url: "",
        rating: 4.6,
        popularity: 75,
        best_time: "October to February",
        ideal_weather: "warm",
        description: "Boulder-strewn ruins of the Vijayanagara empire",
    },
];

fn sample_destinations() -> impl Iterator<Item = &'static Sample> {
    SAMPLES.iter()
}

/// Inserts the sample destinations when the table is empty.
/// Returns how many were inserted.
pub async fn seed_destinations(db: &PgPool, lookup: &dyn ImageLookup) -> anyhow::Result<usize> {
    if repo::count(db).await? > 0 {
        return Ok(0);
    }

    let mut inserted = 0;
    for s in sample_destinations() {
        let image_url = resolve_image(lookup, s.name, Some(s.image_url)).await;
        let id = repo::insert(
            db,
            &NewDestination {
                name: s.name.into(),
                category: s.category.into(),
                state: s.state.into(),
                latitude: s.latitude,
                longitude: s.longitude,
                image_url,
                rating: s.rating,
                popularity: s.popularity,
                best_time: s.best_time.into(),
                ideal_weather: s.ideal_weather.into(),
                description: s.description.into(),
            },
        )
        .await?;
        info!(destination_id = id, name = s.name, "sample destination added");
        inserted += 1;
    }
    Ok(inserted)
}

/// Replaces stored image URLs on the deprecated host. Returns how many changed.
pub async fn refresh_deprecated_images(db: &PgPool, lookup: &dyn ImageLookup) -> anyhow::Result<usize> {
    let stale = repo::list_with_image_host(db, DEPRECATED_IMAGE_HOST).await?;
    let mut updated = 0;
    for d in stale {
        if !d.image_url.as_deref().is_some_and(is_deprecated) {
            continue;
        }
        let url = resolve_image(lookup, &d.name, None).await;
        repo::update_image_url(db, d.id, &url).await?;
        info!(destination_id = d.id, %url, "image url refreshed");
        updated += 1;
    }
    Ok(updated)
}
