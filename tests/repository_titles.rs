mod common;

use catalog_api::AppError;
use catalog_api::domain::entities::{NewCategory, NewGenre, NewTitle, Role, TitleChanges, TitleFilter};
use catalog_api::domain::repositories::{CategoryRepository, GenreRepository, TitleRepository};
use catalog_api::infrastructure::persistence::{
    PgCategoryRepository, PgGenreRepository, PgTitleRepository,
};
use sqlx::PgPool;
use std::sync::Arc;

struct Fixture {
    category_id: i64,
    crime_id: i64,
    drama_id: i64,
    titles: PgTitleRepository,
    categories: PgCategoryRepository,
    genres: PgGenreRepository,
}

async fn fixture(pool: &PgPool) -> Fixture {
    let pool = Arc::new(pool.clone());
    let categories = PgCategoryRepository::new(pool.clone());
    let genres = PgGenreRepository::new(pool.clone());

    let films = categories
        .create(NewCategory {
            name: "Films".to_string(),
            slug: "films".to_string(),
        })
        .await
        .unwrap();
    let crime = genres
        .create(NewGenre {
            name: "Crime".to_string(),
            slug: "crime".to_string(),
        })
        .await
        .unwrap();
    let drama = genres
        .create(NewGenre {
            name: "Drama".to_string(),
            slug: "drama".to_string(),
        })
        .await
        .unwrap();

    Fixture {
        category_id: films.id,
        crime_id: crime.id,
        drama_id: drama.id,
        titles: PgTitleRepository::new(pool),
        categories,
        genres,
    }
}

fn heat(category_id: Option<i64>, genre_ids: Vec<i64>) -> NewTitle {
    NewTitle {
        name: "Heat".to_string(),
        year: 1995,
        description: Some("Heist".to_string()),
        category_id,
        genre_ids,
    }
}

#[sqlx::test]
async fn test_create_title_keeps_genre_order_and_collapses_duplicates(pool: PgPool) {
    let f = fixture(&pool).await;

    let title = f
        .titles
        .create(heat(Some(f.category_id), vec![f.drama_id, f.crime_id, f.drama_id]))
        .await
        .unwrap();

    assert_eq!(title.category.unwrap().slug, "films");
    let slugs: Vec<&str> = title.genres.iter().map(|g| g.slug.as_str()).collect();
    assert_eq!(slugs, vec!["drama", "crime"]);
    assert!(title.rating.is_none());
    assert_eq!(common::count_rows(&pool, "title_genres").await, 2);
}

#[sqlx::test]
async fn test_find_title_by_id(pool: PgPool) {
    let f = fixture(&pool).await;
    let created = f.titles.create(heat(None, vec![f.crime_id])).await.unwrap();

    let found = f.titles.find_by_id(created.id).await.unwrap().unwrap();

    assert_eq!(found.name, "Heat");
    assert_eq!(found.description.as_deref(), Some("Heist"));
    assert_eq!(found.genres.len(), 1);
    assert!(f.titles.find_by_id(created.id + 1000).await.unwrap().is_none());
}

#[sqlx::test]
async fn test_list_titles_with_filters(pool: PgPool) {
    let f = fixture(&pool).await;

    for (name, year, category_id, genre_ids) in [
        ("Heat", 1995, Some(f.category_id), vec![f.crime_id]),
        ("Amelie", 2001, None, vec![f.drama_id]),
        ("Casino", 1995, None, vec![f.crime_id, f.drama_id]),
    ] {
        f.titles
            .create(NewTitle {
                name: name.to_string(),
                year,
                description: None,
                category_id,
                genre_ids,
            })
            .await
            .unwrap();
    }

    let (all, total) = f.titles.list(TitleFilter::default(), 0, 10).await.unwrap();
    assert_eq!(total, 3);
    assert_eq!(all[2].genres.len(), 2);

    let crime = TitleFilter {
        genre: Some("crime".to_string()),
        ..Default::default()
    };
    let (titles, total) = f.titles.list(crime, 0, 1).await.unwrap();
    assert_eq!(total, 2);
    assert_eq!(titles.len(), 1);
    assert_eq!(titles[0].name, "Heat");

    let films = TitleFilter {
        category: Some("films".to_string()),
        ..Default::default()
    };
    let (_, total) = f.titles.list(films, 0, 10).await.unwrap();
    assert_eq!(total, 1);

    let by_name = TitleFilter {
        name: Some("AMEL".to_string()),
        year: Some(2001),
        ..Default::default()
    };
    let (titles, total) = f.titles.list(by_name, 0, 10).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(titles[0].name, "Amelie");
}

#[sqlx::test]
async fn test_update_title_clears_and_replaces(pool: PgPool) {
    let f = fixture(&pool).await;
    let title = f
        .titles
        .create(heat(Some(f.category_id), vec![f.crime_id]))
        .await
        .unwrap();

    let updated = f
        .titles
        .update(
            title.id,
            TitleChanges {
                description: Some(None),
                category_id: Some(None),
                genre_ids: Some(vec![f.drama_id]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Heat");
    assert_eq!(updated.year, 1995);
    assert!(updated.description.is_none());
    assert!(updated.category.is_none());
    assert_eq!(updated.genres.len(), 1);
    assert_eq!(updated.genres[0].slug, "drama");
}

#[sqlx::test]
async fn test_update_title_without_changes_keeps_everything(pool: PgPool) {
    let f = fixture(&pool).await;
    let title = f
        .titles
        .create(heat(Some(f.category_id), vec![f.crime_id]))
        .await
        .unwrap();

    let updated = f
        .titles
        .update(
            title.id,
            TitleChanges {
                year: Some(1996),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.year, 1996);
    assert_eq!(updated.description.as_deref(), Some("Heist"));
    assert_eq!(updated.category.unwrap().slug, "films");
    assert_eq!(updated.genres[0].slug, "crime");
}

#[sqlx::test]
async fn test_update_missing_title_is_not_found(pool: PgPool) {
    let f = fixture(&pool).await;

    let result = f.titles.update(-1, TitleChanges::default()).await;

    assert!(matches!(result, Err(AppError::NotFound { .. })));
}

#[sqlx::test]
async fn test_deleting_category_keeps_title(pool: PgPool) {
    let f = fixture(&pool).await;
    let title = f
        .titles
        .create(heat(Some(f.category_id), vec![]))
        .await
        .unwrap();

    f.categories.delete(f.category_id).await.unwrap();

    let reloaded = f.titles.find_by_id(title.id).await.unwrap().unwrap();
    assert!(reloaded.category.is_none());
}

#[sqlx::test]
async fn test_deleting_genre_detaches_it(pool: PgPool) {
    let f = fixture(&pool).await;
    let title = f
        .titles
        .create(heat(None, vec![f.crime_id, f.drama_id]))
        .await
        .unwrap();

    f.genres.delete(f.crime_id).await.unwrap();

    let reloaded = f.titles.find_by_id(title.id).await.unwrap().unwrap();
    let slugs: Vec<&str> = reloaded.genres.iter().map(|g| g.slug.as_str()).collect();
    assert_eq!(slugs, vec!["drama"]);
}

#[sqlx::test]
async fn test_rating_is_average_of_review_scores(pool: PgPool) {
    let f = fixture(&pool).await;
    let title = f.titles.create(heat(None, vec![])).await.unwrap();
    let alice = common::create_test_user(&pool, "alice", Role::User).await;
    let bob = common::create_test_user(&pool, "bob", Role::User).await;

    common::create_test_review(&pool, title.id, alice.id, 9).await;
    common::create_test_review(&pool, title.id, bob.id, 4).await;

    let rated = f.titles.find_by_id(title.id).await.unwrap().unwrap();
    assert_eq!(rated.rating, Some(6.5));

    let (listed, _) = f.titles.list(TitleFilter::default(), 0, 10).await.unwrap();
    assert_eq!(listed[0].rating, Some(6.5));
}

#[sqlx::test]
async fn test_delete_title_cascades_reviews(pool: PgPool) {
    let f = fixture(&pool).await;
    let title = f.titles.create(heat(None, vec![f.crime_id])).await.unwrap();
    let alice = common::create_test_user(&pool, "alice", Role::User).await;
    common::create_test_review(&pool, title.id, alice.id, 7).await;

    f.titles.delete(title.id).await.unwrap();

    assert!(f.titles.find_by_id(title.id).await.unwrap().is_none());
    assert_eq!(common::count_rows(&pool, "reviews").await, 0);
    assert_eq!(common::count_rows(&pool, "title_genres").await, 0);
    assert!(matches!(
        f.titles.delete(title.id).await,
        Err(AppError::NotFound { .. })
    ));
}
