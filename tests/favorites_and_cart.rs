mod common;

use axum::{
    body::to_bytes,
    extract::Path,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use common::*;
use foodgram::{db, error::AppError, models::CartLine, routes::recipes};

#[tokio::test]
async fn favorite_twice_is_rejected_and_keeps_one_row() {
    let app = setup().await;
    let (_, author) = create_user(&app, "alice").await;
    let (_, fan) = create_user(&app, "bob").await;
    let tag = create_tag(&app, "Lunch", "lunch").await;
    let egg = create_ingredient(&app, "Egg", "pcs").await;
    let recipe = create_recipe(&app, &author, "Omelette", &[&tag], vec![amount(&egg, 2)]).await;

    let (status, Json(short)) = recipes::add_favorite(app.state(), fan.clone(), Path(recipe.id.clone()))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(short.id, recipe.id);
    assert_eq!(short.name, "Omelette");
    assert_eq!(short.image, recipe.image);
    assert_eq!(short.cooking_time, 10);

    let err = recipes::add_favorite(app.state(), fan, Path(recipe.id.clone()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg == "Recipe is already in favorites"));
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    assert_eq!(count(&app, "favorites").await, 1);
}

#[tokio::test]
async fn removing_a_missing_favorite_is_a_bad_request() {
    let app = setup().await;
    let (_, author) = create_user(&app, "alice").await;
    let tag = create_tag(&app, "Lunch", "lunch").await;
    let egg = create_ingredient(&app, "Egg", "pcs").await;
    let recipe = create_recipe(&app, &author, "Omelette", &[&tag], vec![amount(&egg, 2)]).await;

    let err = recipes::remove_favorite(app.state(), author.clone(), Path(recipe.id.clone()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    recipes::add_favorite(app.state(), author.clone(), Path(recipe.id.clone()))
        .await
        .unwrap();
    let status = recipes::remove_favorite(app.state(), author, Path(recipe.id.clone()))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(count(&app, "favorites").await, 0);
}

#[tokio::test]
async fn favorite_of_unknown_recipe_is_not_found() {
    let app = setup().await;
    let (_, user) = create_user(&app, "alice").await;

    let err = recipes::add_favorite(app.state(), user.clone(), Path("missing".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let err = recipes::remove_from_shopping_cart(app.state(), user, Path("missing".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn shopping_cart_add_and_remove_follow_the_same_rules() {
    let app = setup().await;
    let (_, user) = create_user(&app, "alice").await;
    let tag = create_tag(&app, "Lunch", "lunch").await;
    let egg = create_ingredient(&app, "Egg", "pcs").await;
    let recipe = create_recipe(&app, &user, "Omelette", &[&tag], vec![amount(&egg, 2)]).await;

    let (status, _) = recipes::add_to_shopping_cart(app.state(), user.clone(), Path(recipe.id.clone()))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);

    let err = recipes::add_to_shopping_cart(app.state(), user.clone(), Path(recipe.id.clone()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(count(&app, "shopping_cart").await, 1);

    recipes::remove_from_shopping_cart(app.state(), user.clone(), Path(recipe.id.clone()))
        .await
        .unwrap();
    let err = recipes::remove_from_shopping_cart(app.state(), user, Path(recipe.id.clone()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref msg) if msg == "Recipe is not in the shopping cart"));
}

#[tokio::test]
async fn cart_amounts_are_summed_per_ingredient_and_sorted_by_name() {
    let app = setup().await;
    let (_, user) = create_user(&app, "alice").await;
    let tag = create_tag(&app, "Baking", "baking").await;
    let sugar = create_ingredient(&app, "Sugar", "g").await;
    let flour = create_ingredient(&app, "Flour", "g").await;

    let bread = create_recipe(&app, &user, "Bread", &[&tag], vec![amount(&flour, 200)]).await;
    let cake = create_recipe(
        &app,
        &user,
        "Cake",
        &[&tag],
        vec![amount(&flour, 300), amount(&sugar, 50)],
    )
    .await;
    db::add_to_shopping_cart(app.pool(), &user.user_id, &bread.id).await.unwrap();
    db::add_to_shopping_cart(app.pool(), &user.user_id, &cake.id).await.unwrap();

    let lines = db::aggregate_cart(app.pool(), &user.user_id).await.unwrap();
    assert_eq!(
        lines,
        vec![
            CartLine { name: "Flour".into(), measurement_unit: "g".into(), amount: 500 },
            CartLine { name: "Sugar".into(), measurement_unit: "g".into(), amount: 50 },
        ]
    );

    // Aggregation does not touch the cart
    assert_eq!(count(&app, "shopping_cart").await, 2);
}

#[tokio::test]
async fn download_returns_a_text_attachment() {
    let app = setup().await;
    let (_, user) = create_user(&app, "alice").await;
    let tag = create_tag(&app, "Baking", "baking").await;
    let flour = create_ingredient(&app, "Flour", "g").await;
    let bread = create_recipe(&app, &user, "Bread", &[&tag], vec![amount(&flour, 200)]).await;
    db::add_to_shopping_cart(app.pool(), &user.user_id, &bread.id).await.unwrap();

    let response = recipes::download_shopping_cart(app.state(), user).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"alice_shopping_list.txt\"; filename*=UTF-8''alice_shopping_list.txt"
    );

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.starts_with("Shopping list for: alice\n\nDate: "));
    assert!(text.contains("\n- Flour (g) - 200\n"));
    assert!(text.contains("Foodgram ("));
}

#[tokio::test]
async fn empty_cart_downloads_header_only() {
    let app = setup().await;
    let (_, user) = create_user(&app, "alice").await;

    let lines = db::aggregate_cart(app.pool(), &user.user_id).await.unwrap();
    assert!(lines.is_empty());

    let response = recipes::download_shopping_cart(app.state(), user).await.unwrap();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(!text.contains("- "));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_duplicate_adds_lose_with_conflict() {
    let app = setup_file_backed(8).await;
    let (_, user) = create_user(&app, "alice").await;
    let tag = create_tag(&app, "Lunch", "lunch").await;
    let egg = create_ingredient(&app, "Egg", "pcs").await;
    let recipe = create_recipe(&app, &user, "Omelette", &[&tag], vec![amount(&egg, 2)]).await;

    let mut handles = Vec::new();
    for i in 0..16 {
        let pool = app.pool().clone();
        let user_id = user.user_id.clone();
        let recipe_id = recipe.id.clone();
        handles.push(tokio::spawn(async move {
            if i % 2 == 0 {
                db::add_favorite(&pool, &user_id, &recipe_id).await
            } else {
                db::add_to_shopping_cart(&pool, &user_id, &recipe_id).await
            }
        }));
    }

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => succeeded += 1,
            Err(AppError::Conflict(_)) => {}
            Err(other) => panic!("expected conflict, got {other:?}"),
        }
    }

    assert_eq!(succeeded, 2);
    assert_eq!(count(&app, "favorites").await, 1);
    assert_eq!(count(&app, "shopping_cart").await, 1);
}

#[tokio::test]
async fn large_amounts_sum_without_overflow() {
    let app = setup().await;
    let (_, user) = create_user(&app, "alice").await;
    let tag = create_tag(&app, "Baking", "baking").await;
    let flour = create_ingredient(&app, "Flour", "g").await;
    let max = i64::from(i32::MAX);

    for name in ["Bread", "Cake"] {
        let recipe = create_recipe(&app, &user, name, &[&tag], vec![amount(&flour, max)]).await;
        db::add_to_shopping_cart(app.pool(), &user.user_id, &recipe.id).await.unwrap();
    }

    let response = recipes::download_shopping_cart(app.state(), user).await.unwrap();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains(&format!("- Flour (g) - {}", 2 * max)));
}
