//! Reference material for the documented APIs.
//!
//! The catalog is static. Base URLs here are the defaults; `Config` may point
//! an API somewhere else at runtime.

use crate::guard::ApiId;

/// Where an API expects its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPlacement {
    /// A named request header, e.g. `x-api-key`.
    Header(&'static str),
    /// A named query parameter, e.g. `key`.
    Query(&'static str),
    /// `Authorization: Bearer <key>`.
    Bearer,
}

impl KeyPlacement {
    pub fn describe(&self) -> String {
        match self {
            KeyPlacement::Header(name) => format!("Header {}: YOUR_API_KEY", name),
            KeyPlacement::Query(name) => format!("Query parameter ?{}=YOUR_API_KEY", name),
            KeyPlacement::Bearer => "Header Authorization: Bearer YOUR_API_KEY".to_string(),
        }
    }
}

/// What an endpoint returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Json,
    Audio,
    Image,
}

#[derive(Debug, Clone, Copy)]
pub struct EndpointDoc {
    pub title: &'static str,
    pub method: &'static str,
    /// Path template relative to the base URL, e.g. `/surah/:surahNumber`.
    pub path: &'static str,
    /// A concrete path for the example request.
    pub example: &'static str,
    /// Example query parameters, excluding the API key.
    pub query: &'static [(&'static str, &'static str)],
    pub response: ResponseKind,
    pub sample_response: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct ApiDoc {
    pub id: ApiId,
    pub title: &'static str,
    pub summary: &'static str,
    pub base_url: &'static str,
    pub key: KeyPlacement,
    pub endpoints: &'static [EndpointDoc],
}

/// All documented APIs in navbar order.
pub fn all() -> [&'static ApiDoc; 5] {
    [&QURAN, &WEATHER, &HADITH, &RECIPE, &GITHUB]
}

pub fn get(id: ApiId) -> &'static ApiDoc {
    match id {
        ApiId::Quran => &QURAN,
        ApiId::Weather => &WEATHER,
        ApiId::Hadith => &HADITH,
        ApiId::Recipe => &RECIPE,
        ApiId::Github => &GITHUB,
    }
}

// ============================================================================
// Quran
// ============================================================================

static QURAN: ApiDoc = ApiDoc {
    id: ApiId::Quran,
    title: "Quran API",
    summary: "Access Quranic verses, translations, and audio recitations.",
    base_url: "https://quran-api-ny11.onrender.com/api/v2/quran",
    key: KeyPlacement::Header("x-api-key"),
    endpoints: &[
        EndpointDoc {
            title: "Get All Surahs",
            method: "GET",
            path: "/surah",
            example: "/surah",
            query: &[],
            response: ResponseKind::Json,
            sample_response: r#"[
  {
    "number": 1,
    "name": "الفاتحة",
    "englishName": "Al-Fatiha",
    "englishNameTranslation": "The Opening",
    "numberOfAyahs": 7,
    "revelationType": "Meccan"
  },
  ...
]"#,
        },
        EndpointDoc {
            title: "Get Surah by Number",
            method: "GET",
            path: "/surah/:surahNumber",
            example: "/surah/1",
            query: &[],
            response: ResponseKind::Json,
            sample_response: r#"{
  "number": 1,
  "name": "الفاتحة",
  "englishName": "Al-Fatiha",
  "englishNameTranslation": "The Opening",
  "numberOfAyahs": 7,
  "revelationType": "Meccan"
}"#,
        },
        EndpointDoc {
            title: "Get Ayah by Surah and Verse Number",
            method: "GET",
            path: "/:surahNumber::verseNumber&lang=:lang",
            example: "/1:1&lang=eng",
            query: &[],
            response: ResponseKind::Json,
            sample_response: r#"{
  "number": 1,
  "text": "In the name of Allah, the Most Gracious, the Most Merciful."
}
lang may be eng, arabic or urdu"#,
        },
        EndpointDoc {
            title: "Get Audio",
            method: "GET",
            path: "/audio/:reciter/:surahNumber::verseNumber",
            example: "/audio/Alafasy_64kbps/1:1",
            query: &[],
            response: ResponseKind::Audio,
            sample_response: "Audio file (MP3 format)",
        },
        EndpointDoc {
            title: "Get Reciters",
            method: "GET",
            path: "/reciters",
            example: "/reciters",
            query: &[],
            response: ResponseKind::Json,
            sample_response: r#"[
  { "name": "Alafasy", "subfolder": "Alafasy_64kbps" },
  { "name": "Minshawy Murattal", "subfolder": "Minshawy_Murattal_128kbps" },
  ...
]"#,
        },
        EndpointDoc {
            title: "Get Para Images",
            method: "GET",
            path: "/para/:paraNumber::pageNumber",
            example: "/para/1:5",
            query: &[],
            response: ResponseKind::Image,
            sample_response: "Image file (PNG format)",
        },
        EndpointDoc {
            title: "Get Surah Images",
            method: "GET",
            path: "/surah/:surahNumber::pageNumber",
            example: "/surah/2:30",
            query: &[],
            response: ResponseKind::Image,
            sample_response: "Image file (PNG format)",
        },
        EndpointDoc {
            title: "Get All Verses in JSON Format",
            method: "GET",
            path: "/",
            example: "/",
            query: &[],
            response: ResponseKind::Json,
            sample_response: "Complete Quran JSON structure with all verses",
        },
    ],
};

// ============================================================================
// Weather
// ============================================================================

static WEATHER: ApiDoc = ApiDoc {
    id: ApiId::Weather,
    title: "Weather API",
    summary: "Current conditions and multi-day forecasts by city.",
    base_url: "https://weather-api-7qxy.onrender.com/api/v2",
    key: KeyPlacement::Query("key"),
    endpoints: &[
        EndpointDoc {
            title: "Get Current Weather",
            method: "GET",
            path: "/current",
            example: "/current",
            query: &[("city", "London")],
            response: ResponseKind::Json,
            sample_response: r#"{
  "location": { "name": "London", "country": "United Kingdom" },
  "current": { "temp_c": 14.0, "condition": { "text": "Partly cloudy" } }
}"#,
        },
        EndpointDoc {
            title: "Get Weather Forecast",
            method: "GET",
            path: "/forecast",
            example: "/forecast",
            query: &[("city", "London"), ("days", "3")],
            response: ResponseKind::Json,
            sample_response: r#"{
  "location": { "name": "London" },
  "forecast": { "forecastday": [ { "date": "2024-05-01", "day": { "maxtemp_c": 17.2 } }, ... ] }
}"#,
        },
    ],
};

// ============================================================================
// Hadith
// ============================================================================

static HADITH: ApiDoc = ApiDoc {
    id: ApiId::Hadith,
    title: "Hadith API",
    summary: "Hadith collections by edition, number and section.",
    base_url: "https://hadith-api.onrender.com/api/v1/hadith",
    key: KeyPlacement::Query("key"),
    endpoints: &[
        EndpointDoc {
            title: "Get Hadith by Number",
            method: "GET",
            path: "/:edition/:hadithNumber",
            example: "/eng-bukhari/1",
            query: &[],
            response: ResponseKind::Json,
            sample_response: r#"{
  "hadithnumber": 1,
  "text": "Actions are judged by intentions...",
  "grades": []
}"#,
        },
        EndpointDoc {
            title: "Get All Editions",
            method: "GET",
            path: "/editions",
            example: "/editions",
            query: &[],
            response: ResponseKind::Json,
            sample_response: r#"{ "bukhari": { "name": "Sahih al Bukhari", "collection": [ ... ] }, ... }"#,
        },
        EndpointDoc {
            title: "Get Section",
            method: "GET",
            path: "/:edition/sections/:sectionNumber",
            example: "/eng-bukhari/sections/1",
            query: &[],
            response: ResponseKind::Json,
            sample_response: r#"{ "metadata": { "name": "Sahih al Bukhari", "section": { "1": "Revelation" } }, "hadiths": [ ... ] }"#,
        },
        EndpointDoc {
            title: "Get Collection Info",
            method: "GET",
            path: "/info",
            example: "/info",
            query: &[],
            response: ResponseKind::Json,
            sample_response: r#"{ "bukhari": { "metadata": { "name": "Sahih al Bukhari" } }, ... }"#,
        },
    ],
};

// ============================================================================
// Recipe
// ============================================================================

static RECIPE: ApiDoc = ApiDoc {
    id: ApiId::Recipe,
    title: "Recipe API",
    summary: "Search recipes by name, category, area or ingredient.",
    base_url: "https://recipe-finder-api-3h6z.onrender.com",
    key: KeyPlacement::Query("key"),
    endpoints: &[
        EndpointDoc {
            title: "Search by Name",
            method: "GET",
            path: "/name/:recipeName",
            example: "/name/Arrabiata",
            query: &[],
            response: ResponseKind::Json,
            sample_response: r#"[ { "id": "52771", "name": "Spicy Arrabiata Penne", "category": "Vegetarian", "area": "Italian" } ]"#,
        },
        EndpointDoc {
            title: "Random Recipe",
            method: "GET",
            path: "/random",
            example: "/random",
            query: &[],
            response: ResponseKind::Json,
            sample_response: r#"{ "id": "52874", "name": "Beef and Mustard Pie", ... }"#,
        },
        EndpointDoc {
            title: "Get by Id",
            method: "GET",
            path: "/:recipeId",
            example: "/52771",
            query: &[],
            response: ResponseKind::Json,
            sample_response: r#"{ "id": "52771", "name": "Spicy Arrabiata Penne", "ingredients": [ ... ] }"#,
        },
        EndpointDoc {
            title: "List Categories",
            method: "GET",
            path: "/categories",
            example: "/categories",
            query: &[],
            response: ResponseKind::Json,
            sample_response: r#"[ "Beef", "Chicken", "Dessert", ... ]"#,
        },
        EndpointDoc {
            title: "Filter by Category",
            method: "GET",
            path: "/category/:category",
            example: "/category/Seafood",
            query: &[],
            response: ResponseKind::Json,
            sample_response: r#"[ { "id": "52959", "name": "Baked salmon with fennel & tomatoes" }, ... ]"#,
        },
        EndpointDoc {
            title: "Filter by Area",
            method: "GET",
            path: "/area/:area",
            example: "/area/Canadian",
            query: &[],
            response: ResponseKind::Json,
            sample_response: r#"[ { "id": "52965", "name": "Breakfast Potatoes" }, ... ]"#,
        },
        EndpointDoc {
            title: "Filter by Ingredient",
            method: "GET",
            path: "/ingredient/:ingredient",
            example: "/ingredient/chicken_breast",
            query: &[],
            response: ResponseKind::Json,
            sample_response: r#"[ { "id": "52940", "name": "Brown Stew Chicken" }, ... ]"#,
        },
        EndpointDoc {
            title: "Recipe Summary",
            method: "GET",
            path: "/:recipeId/summary",
            example: "/52771/summary",
            query: &[],
            response: ResponseKind::Json,
            sample_response: r#"{ "id": "52771", "summary": "..." }"#,
        },
        EndpointDoc {
            title: "Recipe Instructions",
            method: "GET",
            path: "/:recipeId/instructions",
            example: "/52771/instructions",
            query: &[],
            response: ResponseKind::Json,
            sample_response: r#"{ "id": "52771", "instructions": [ "Bring a large pot of water to a boil...", ... ] }"#,
        },
    ],
};

// ============================================================================
// GitHub activity
// ============================================================================

static GITHUB: ApiDoc = ApiDoc {
    id: ApiId::Github,
    title: "GitHub User Activity API",
    summary: "Recent public activity for a GitHub user.",
    base_url: "https://github-user-activity-api.onrender.com/api/v1/github",
    key: KeyPlacement::Bearer,
    endpoints: &[EndpointDoc {
        title: "Get User Activity",
        method: "GET",
        path: "/user/:username",
        example: "/user/octocat",
        query: &[],
        response: ResponseKind::Json,
        sample_response: r#"{
  "status": "success",
  "data": {
    "username": "octocat",
    "activities": [
      { "type": "PushEvent", "repo": "octocat/Hello-World", "timestamp": "2024-05-01T12:00:00Z" }
    ]
  }
}"#,
    }],
};
