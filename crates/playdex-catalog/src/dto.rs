//! Wire shapes of the catalog API and their mapping onto the core read
//! models.
//!
//! The API nests platforms one level deep (`{"platform": {...}}`) and
//! reports developers as full objects; only the names survive the mapping.

use chrono::NaiveDate;
use serde::Deserialize;

use playdex_core::game::{
  GameDetail, GameId, GamePage, GameSummary, Genre, Platform, Screenshot,
};

/// Generic paginated envelope: `{"results": [...], "next": url-or-null}`.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
  #[serde(default = "Vec::new")]
  pub results: Vec<T>,
  pub next:    Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GameDto {
  pub id:               i64,
  pub name:             String,
  pub background_image: Option<String>,
  pub rating:           Option<f64>,
  pub released:         Option<NaiveDate>,
}

impl From<GameDto> for GameSummary {
  fn from(dto: GameDto) -> Self {
    Self {
      id:               GameId::Catalog(dto.id),
      name:             dto.name,
      background_image: dto.background_image,
      rating:           dto.rating,
      released:         dto.released,
    }
  }
}

impl From<Page<GameDto>> for GamePage {
  fn from(page: Page<GameDto>) -> Self {
    Self {
      has_more: page.next.is_some(),
      results:  page.results.into_iter().map(Into::into).collect(),
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct GenreDto {
  pub id:   i64,
  pub name: String,
  pub slug: String,
}

impl From<GenreDto> for Genre {
  fn from(dto: GenreDto) -> Self {
    Self {
      id:   dto.id,
      name: dto.name,
      slug: dto.slug,
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct PlatformDto {
  pub id:   i64,
  pub name: String,
  pub slug: String,
}

impl From<PlatformDto> for Platform {
  fn from(dto: PlatformDto) -> Self {
    Self {
      id:   dto.id,
      name: dto.name,
      slug: dto.slug,
    }
  }
}

/// The listing wraps each platform: `{"platform": {"id": ..., ...}}`.
#[derive(Debug, Deserialize)]
pub struct PlatformWrapperDto {
  pub platform: PlatformDto,
}

#[derive(Debug, Deserialize)]
pub struct NamedDto {
  pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ScreenshotDto {
  pub id:    i64,
  pub image: String,
}

impl From<ScreenshotDto> for Screenshot {
  fn from(dto: ScreenshotDto) -> Self {
    Self {
      id:    dto.id,
      image: dto.image,
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct DetailDto {
  pub id:               i64,
  pub name:             String,
  pub description_raw:  Option<String>,
  pub background_image: Option<String>,
  pub rating:           Option<f64>,
  pub released:         Option<NaiveDate>,
  #[serde(default)]
  pub genres:           Vec<GenreDto>,
  #[serde(default)]
  pub platforms:        Vec<PlatformWrapperDto>,
  #[serde(default)]
  pub developers:       Vec<NamedDto>,
}

impl From<DetailDto> for GameDetail {
  fn from(dto: DetailDto) -> Self {
    Self {
      id:               GameId::Catalog(dto.id),
      name:             dto.name,
      description:      dto.description_raw,
      background_image: dto.background_image,
      rating:           dto.rating,
      released:         dto.released,
      genres:           dto.genres.into_iter().map(Into::into).collect(),
      platforms:        dto.platforms.into_iter().map(|w| w.platform.into()).collect(),
      developers:       dto.developers.into_iter().map(|d| d.name).collect(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn game_page_maps_next_to_has_more() {
    let json = r#"{
      "count": 2,
      "next": "https://api.example/games?page=2",
      "results": [
        {"id": 3498, "name": "Grand Theft Auto V", "background_image": null,
         "rating": 4.47, "released": "2013-09-17"}
      ]
    }"#;
    let page: Page<GameDto> = serde_json::from_str(json).unwrap();
    let mapped = GamePage::from(page);
    assert!(mapped.has_more);
    assert_eq!(mapped.results.len(), 1);
    assert_eq!(mapped.results[0].id, GameId::Catalog(3498));
    assert_eq!(
      mapped.results[0].released,
      NaiveDate::from_ymd_opt(2013, 9, 17)
    );
  }

  #[test]
  fn last_page_has_no_more() {
    let json = r#"{"next": null, "results": []}"#;
    let page: Page<GameDto> = serde_json::from_str(json).unwrap();
    assert!(!GamePage::from(page).has_more);
  }

  #[test]
  fn detail_unwraps_nested_platforms_and_developers() {
    let json = r#"{
      "id": 3498,
      "name": "Grand Theft Auto V",
      "description_raw": "An open world game.",
      "background_image": "https://img.example/gta.jpg",
      "rating": 4.47,
      "released": "2013-09-17",
      "genres": [{"id": 4, "name": "Action", "slug": "action"}],
      "platforms": [{"platform": {"id": 4, "name": "PC", "slug": "pc"}}],
      "developers": [{"id": 10, "name": "Rockstar North", "slug": "rockstar-north"}]
    }"#;
    let detail: GameDetail = serde_json::from_str::<DetailDto>(json).unwrap().into();
    assert_eq!(detail.genres[0].slug, "action");
    assert_eq!(detail.platforms[0].name, "PC");
    assert_eq!(detail.developers, ["Rockstar North"]);
  }

  #[test]
  fn detail_tolerates_sparse_responses() {
    let json = r#"{"id": 1, "name": "Mystery", "released": null}"#;
    let detail: GameDetail = serde_json::from_str::<DetailDto>(json).unwrap().into();
    assert!(detail.description.is_none());
    assert!(detail.genres.is_empty());
    assert!(detail.released.is_none());
  }
}
