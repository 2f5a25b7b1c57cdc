//! Subcommand definitions and dispatch.

use std::sync::Arc;

use clap::{Subcommand, ValueEnum};
use playdex_app::{Comments, Favorites, ProfileLimits, SessionStore, build_profile};
use playdex_catalog::CatalogClient;
use playdex_core::{
  catalog::CatalogSource as _,
  comment::CommentId,
  game::{GameId, GameQuery, GameSummary, SortKey},
};
use playdex_store_sqlite::SqliteStore;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum Command {
  /// Create an account and sign in.
  Signup {
    email:    String,
    password: String,
    /// Display name shown on the profile.
    #[arg(long)]
    name:     Option<String>,
  },
  /// Sign in with email and password.
  Login { email: String, password: String },
  /// Sign out of the persisted session.
  Logout,
  /// Show the signed-in identity.
  Whoami,
  /// Request a password-reset message.
  ResetPassword { email: String },
  /// Change the password (verifies the current one first).
  ChangePassword {
    current_password: String,
    new_password:     String,
  },
  /// Delete the account and everything it owns.
  DeleteAccount { password: String },

  /// Browse one page of the game catalog.
  Games {
    #[arg(long, default_value_t = 1)]
    page:      u32,
    #[arg(long, default_value_t = 12)]
    page_size: u32,
    /// Platform id filter (see `playdex platforms`).
    #[arg(long)]
    platform:  Option<i64>,
    /// Genre id or slug filter (see `playdex genres`).
    #[arg(long)]
    genre:     Option<String>,
    #[arg(long, value_enum)]
    sort:      Option<SortArg>,
  },
  /// List the genre taxonomy.
  Genres,
  /// List the platform taxonomy.
  Platforms,
  /// Show full detail and screenshots for one game.
  Game { id: GameId },

  /// Toggle a game in the signed-in user's favorites.
  Favorite { id: GameId },
  /// List the signed-in user's favorites, newest first.
  Favorites,

  #[command(subcommand)]
  Comment(CommentCommand),

  /// Render the signed-in user's profile.
  Profile,
}

#[derive(Subcommand)]
pub enum CommentCommand {
  /// Post a comment on a game.
  Add { game: GameId, text: String },
  /// List comments on a game, newest first.
  List { game: GameId },
  /// Delete one of your own comments.
  Delete { id: Uuid },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
  Name,
  Released,
  Rating,
  Metacritic,
}

impl From<SortArg> for SortKey {
  fn from(arg: SortArg) -> Self {
    match arg {
      SortArg::Name => Self::Name,
      SortArg::Released => Self::Released,
      SortArg::Rating => Self::Rating,
      SortArg::Metacritic => Self::Metacritic,
    }
  }
}

pub async fn run(
  command: Command,
  session: SessionStore<SqliteStore>,
  store: Arc<SqliteStore>,
  catalog: Arc<CatalogClient>,
) -> anyhow::Result<()> {
  let favorites = Favorites::new(Arc::clone(&store), session.subscribe());
  let comments = Comments::new(Arc::clone(&store), session.subscribe());

  match command {
    Command::Signup {
      email,
      password,
      name,
    } => {
      let me = session.sign_up(&email, &password, name.as_deref()).await?;
      println!("signed up as {} <{}>", me.handle(), me.email);
    }
    Command::Login { email, password } => {
      let me = session.sign_in(&email, &password).await?;
      println!("signed in as {} <{}>", me.handle(), me.email);
    }
    Command::Logout => {
      session.sign_out().await?;
      println!("signed out");
    }
    Command::Whoami => match session.current().identity() {
      Some(me) => println!("{} <{}> via {:?}", me.handle(), me.email, me.provider),
      None => println!("not signed in"),
    },
    Command::ResetPassword { email } => {
      session.request_password_reset(&email).await?;
      println!("if an account exists for {email}, a reset was sent");
    }
    Command::ChangePassword {
      current_password,
      new_password,
    } => {
      session.change_password(&current_password, &new_password).await?;
      println!("password changed");
    }
    Command::DeleteAccount { password } => {
      session.delete_account(&password, &*store, &*store).await?;
      println!("account deleted");
    }

    Command::Games {
      page,
      page_size,
      platform,
      genre,
      sort,
    } => {
      let query = GameQuery {
        page,
        page_size,
        platform,
        genre,
        sort: sort.map(Into::into),
      };
      let listing = catalog.list_games(&query).await?;
      for game in &listing.results {
        println!(
          "{:>8}  {:<4}  {}",
          game.id.to_string(),
          game.rating.map(|r| r.to_string()).unwrap_or_default(),
          game.name,
        );
      }
      if listing.has_more {
        println!("(more: --page {})", page + 1);
      }
    }
    Command::Genres => {
      for genre in catalog.genres().await? {
        println!("{:>6}  {:<20}  {}", genre.id, genre.slug, genre.name);
      }
    }
    Command::Platforms => {
      for platform in catalog.platforms().await? {
        println!("{:>6}  {:<20}  {}", platform.id, platform.slug, platform.name);
      }
    }
    Command::Game { id } => {
      let detail = catalog.game_detail(&id).await?;
      let shots = catalog.screenshots(&id, 5).await?;
      println!("{}", serde_json::to_string_pretty(&detail)?);
      for shot in shots {
        println!("screenshot: {}", shot.image);
      }
    }

    Command::Favorite { id } => {
      // Pull the catalog record so the entry is denormalised with real data.
      let detail = catalog.game_detail(&id).await?;
      let summary = GameSummary {
        id:               detail.id.clone(),
        name:             detail.name.clone(),
        background_image: detail.background_image.clone(),
        rating:           detail.rating,
        released:         detail.released,
      };
      let toggle = favorites.toggle(&summary).await?;
      if toggle.is_favorited() {
        println!("added {} to favorites", detail.name);
      } else {
        println!("removed {} from favorites", detail.name);
      }
    }
    Command::Favorites => {
      for entry in favorites.list().await? {
        println!(
          "{:>8}  {}  (added {})",
          entry.game_id.to_string(),
          entry.game_name,
          entry.added_at.format("%Y-%m-%d"),
        );
      }
    }

    Command::Comment(CommentCommand::Add { game, text }) => {
      match comments.add(game, &text).await? {
        Some(comment) => println!("posted comment {}", comment.id),
        None => println!("empty comment, nothing posted"),
      }
    }
    Command::Comment(CommentCommand::List { game }) => {
      for comment in comments.for_game(game).await? {
        println!(
          "{}  [{}] {}: {}",
          comment.created_at.format("%Y-%m-%d %H:%M"),
          comment.id,
          comment.author_handle,
          comment.text,
        );
      }
    }
    Command::Comment(CommentCommand::Delete { id }) => {
      comments.delete(CommentId(id)).await?;
      println!("deleted");
    }

    Command::Profile => {
      let me = session.current().require_identity()?.clone();
      let profile =
        build_profile(me, &*store, &*store, catalog, ProfileLimits::default())
          .await?;

      println!("{} <{}>", profile.identity.handle(), profile.identity.email);
      println!("avatar: {}", profile.identity.avatar_or_default());

      println!("\nrecently added:");
      for card in &profile.recently_added {
        println!("  {}", card.entry.game_name);
      }

      println!("\nfavorites ({}):", profile.favorites.len());
      for card in &profile.favorites {
        let genres = card
          .detail
          .as_ref()
          .map(|d| {
            d.genres
              .iter()
              .map(|g| g.name.as_str())
              .collect::<Vec<_>>()
              .join(", ")
          })
          .unwrap_or_else(|| "catalog unavailable".to_owned());
        println!(
          "  {:>8}  {}  [{}]  {} screenshots",
          card.entry.game_id.to_string(),
          card.entry.game_name,
          genres,
          card.screenshots.len(),
        );
      }

      println!("\ncomments ({}):", profile.comments.len());
      for card in &profile.comments {
        println!(
          "  {}  on {}: {}",
          card.comment.created_at.format("%Y-%m-%d"),
          card.game_name,
          card.comment.text,
        );
      }
    }
  }

  Ok(())
}
