//! The `CatalogSource` trait — the contract consumed from the external
//! game-metadata API.
//!
//! Read-only. Reference lists (genres, platforms) are expected to be cached
//! by the implementation for the client's lifetime; everything else is
//! fetched on demand.

use std::future::Future;

use crate::game::{GameDetail, GameId, GamePage, GameQuery, Genre, Platform, Screenshot};

pub trait CatalogSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// One page of a filtered game listing.
  fn list_games<'a>(
    &'a self,
    query: &'a GameQuery,
  ) -> impl Future<Output = Result<GamePage, Self::Error>> + Send + 'a;

  /// The genre taxonomy; fetched once per client.
  fn genres(&self) -> impl Future<Output = Result<Vec<Genre>, Self::Error>> + Send + '_;

  /// The platform taxonomy; fetched once per client.
  fn platforms(
    &self,
  ) -> impl Future<Output = Result<Vec<Platform>, Self::Error>> + Send + '_;

  /// Full detail for one game. Placeholder ids short-circuit to
  /// [`GameDetail::placeholder`] without any network call.
  fn game_detail<'a>(
    &'a self,
    id: &'a GameId,
  ) -> impl Future<Output = Result<GameDetail, Self::Error>> + Send + 'a;

  /// Up to `limit` screenshots for one game. Placeholder ids yield an
  /// empty list.
  fn screenshots<'a>(
    &'a self,
    id: &'a GameId,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Screenshot>, Self::Error>> + Send + 'a;
}
