use serde::{Deserialize, Serialize};

/// A catalog entry as stored and served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anime {
    pub id: i32,
    pub english_title: String,
    pub japanese_title: Option<String>,
    pub trailer_url: Option<String>,
    pub image_url: String,
    pub synopsis: String,
    #[serde(default = "default_true")]
    pub airing: bool,
    pub episodes: i32,
    pub score: f32,
}

/// Catalog entry fields without an id, used for creates and full updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAnime {
    pub english_title: String,
    pub japanese_title: Option<String>,
    pub trailer_url: Option<String>,
    pub image_url: String,
    pub synopsis: String,
    #[serde(default = "default_true")]
    pub airing: bool,
    #[serde(default)]
    pub episodes: i32,
    #[serde(default)]
    pub score: f32,
}

fn default_true() -> bool {
    true
}
