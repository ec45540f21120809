mod common;

use axum::{
    body::{to_bytes, Body},
    extract::{FromRequest, Path, Query},
    http::{header, Request, StatusCode},
    response::IntoResponse,
    Json,
};
use common::*;
use foodgram::{
    db,
    error::AppError,
    middleware::json::AppJson,
    models::*,
    routes::{recipes, users},
};

fn validation_fields(err: AppError) -> foodgram::error::FieldErrors {
    match err {
        AppError::Validation(fields) => fields,
        other => panic!("expected validation error, got {other:?}"),
    }
}

fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
    raw.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn missing_tags_and_ingredients_reports_both_fields() {
    let app = setup().await;
    let (_, author) = create_user(&app, "alice").await;

    let req = CreateRecipeRequest {
        tags: None,
        ingredients: Some(vec![]),
        name: Some("Soup".into()),
        image: Some(PNG_URI.into()),
        text: Some("Boil".into()),
        cooking_time: Some(5),
    };
    let err = recipes::create_recipe(app.state(), author, AppJson(req))
        .await
        .unwrap_err();

    let fields = validation_fields(err);
    assert!(fields.contains_key("tags"));
    assert!(fields.contains_key("ingredients"));
    assert_eq!(count(&app, "recipes").await, 0);
}

#[tokio::test]
async fn duplicate_and_negative_ingredients_are_rejected() {
    let app = setup().await;
    let (_, author) = create_user(&app, "alice").await;
    let tag = create_tag(&app, "Lunch", "lunch").await;
    let flour = create_ingredient(&app, "Flour", "g").await;

    let req = create_request("Bread", &[&tag], vec![amount(&flour, 100), amount(&flour, 200)]);
    let err = recipes::create_recipe(app.state(), author.clone(), AppJson(req))
        .await
        .unwrap_err();
    assert_eq!(
        validation_fields(err).get("ingredients").map(String::as_str),
        Some("Ingredients must be unique")
    );

    let req = create_request("Bread", &[&tag], vec![amount(&flour, -1)]);
    let err = recipes::create_recipe(app.state(), author.clone(), AppJson(req))
        .await
        .unwrap_err();
    assert_eq!(
        validation_fields(err).get("ingredients").map(String::as_str),
        Some("Amount must be non-negative")
    );

    let req = create_request("Bread", &[&tag], vec![amount(&flour, i64::MAX)]);
    let err = recipes::create_recipe(app.state(), author, AppJson(req))
        .await
        .unwrap_err();
    assert_eq!(
        validation_fields(err).get("ingredients").map(String::as_str),
        Some("Amount is too large")
    );

    assert_eq!(count(&app, "recipes").await, 0);
    assert_eq!(count(&app, "recipe_ingredients").await, 0);
}

#[tokio::test]
async fn unknown_ingredient_is_not_found() {
    let app = setup().await;
    let (_, author) = create_user(&app, "alice").await;
    let tag = create_tag(&app, "Lunch", "lunch").await;

    let req = create_request(
        "Ghost",
        &[&tag],
        vec![IngredientAmount { id: "missing".into(), amount: 1 }],
    );
    let err = recipes::create_recipe(app.state(), author, AppJson(req))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn malformed_image_is_a_field_error_and_nothing_is_written() {
    let app = setup().await;
    let (_, author) = create_user(&app, "alice").await;
    let tag = create_tag(&app, "Lunch", "lunch").await;
    let flour = create_ingredient(&app, "Flour", "g").await;

    let mut req = create_request("Bread", &[&tag], vec![amount(&flour, 100)]);
    req.image = Some("not-a-data-uri".into());
    let err = recipes::create_recipe(app.state(), author, AppJson(req))
        .await
        .unwrap_err();

    assert!(validation_fields(err).contains_key("image"));
    assert_eq!(count(&app, "recipes").await, 0);
}

#[tokio::test]
async fn create_stores_image_tags_and_ingredients() {
    let app = setup().await;
    let (_, author) = create_user(&app, "alice").await;
    let tag = create_tag(&app, "Lunch", "lunch").await;
    let flour = create_ingredient(&app, "Flour", "g").await;
    let sugar = create_ingredient(&app, "Sugar", "g").await;

    let recipe = create_recipe(
        &app,
        &author,
        "Cake",
        &[&tag, &tag],
        vec![amount(&sugar, 50), amount(&flour, 200)],
    )
    .await;

    assert_eq!(recipe.tags, vec![tag]);
    assert_eq!(recipe.ingredients.len(), 2);
    assert_eq!(recipe.ingredients[0].name, "Flour");
    assert_eq!(recipe.ingredients[0].amount, 200);
    assert_eq!(recipe.author.username, "alice");
    assert!(!recipe.is_favorited);

    let relative = recipe.image.strip_prefix("/media/").unwrap();
    assert!(relative.starts_with("recipes/images/"));
    assert!(app.media.path().join(relative).exists());
}

#[tokio::test]
async fn update_replaces_ingredients_instead_of_merging() {
    let app = setup().await;
    let (_, author) = create_user(&app, "alice").await;
    let tag = create_tag(&app, "Lunch", "lunch").await;
    let a = create_ingredient(&app, "Apple", "pcs").await;
    let b = create_ingredient(&app, "Butter", "g").await;

    let recipe = create_recipe(&app, &author, "Pie", &[&tag], vec![amount(&a, 2), amount(&b, 3)]).await;

    let req = UpdateRecipeRequest {
        tags: Some(vec![tag.id.clone()]),
        ingredients: Some(vec![amount(&a, 5)]),
        ..Default::default()
    };
    let Json(updated) = recipes::update_recipe(app.state(), author, Path(recipe.id.clone()), AppJson(req))
        .await
        .unwrap();

    assert_eq!(updated.ingredients.len(), 1);
    assert_eq!(updated.ingredients[0].id, a.id);
    assert_eq!(updated.ingredients[0].amount, 5);
    // Scalars not in the payload keep their values
    assert_eq!(updated.name, "Pie");
    assert_eq!(updated.image, recipe.image);
    assert_eq!(count(&app, "recipe_ingredients").await, 1);
}

#[tokio::test]
async fn update_with_new_image_removes_the_old_file() {
    let app = setup().await;
    let (_, author) = create_user(&app, "alice").await;
    let tag = create_tag(&app, "Lunch", "lunch").await;
    let a = create_ingredient(&app, "Apple", "pcs").await;

    let recipe = create_recipe(&app, &author, "Pie", &[&tag], vec![amount(&a, 2)]).await;
    let old_file = app.media.path().join(recipe.image.strip_prefix("/media/").unwrap());
    assert!(old_file.exists());

    let req = UpdateRecipeRequest {
        tags: Some(vec![tag.id.clone()]),
        ingredients: Some(vec![amount(&a, 2)]),
        image: Some(PNG_URI.into()),
        cooking_time: Some(45),
        ..Default::default()
    };
    let Json(updated) = recipes::update_recipe(app.state(), author, Path(recipe.id.clone()), AppJson(req))
        .await
        .unwrap();

    assert_ne!(updated.image, recipe.image);
    assert_eq!(updated.cooking_time, 45);
    assert!(!old_file.exists());
    assert!(app.media.path().join(updated.image.strip_prefix("/media/").unwrap()).exists());
}

#[tokio::test]
async fn update_without_ingredients_is_rejected() {
    let app = setup().await;
    let (_, author) = create_user(&app, "alice").await;
    let tag = create_tag(&app, "Lunch", "lunch").await;
    let a = create_ingredient(&app, "Apple", "pcs").await;
    let recipe = create_recipe(&app, &author, "Pie", &[&tag], vec![amount(&a, 2)]).await;

    let req = UpdateRecipeRequest {
        tags: Some(vec![tag.id.clone()]),
        ..Default::default()
    };
    let err = recipes::update_recipe(app.state(), author, Path(recipe.id.clone()), AppJson(req))
        .await
        .unwrap_err();

    let fields = validation_fields(err);
    assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["ingredients"]);
    assert_eq!(count(&app, "recipe_ingredients").await, 1);
}

#[tokio::test]
async fn only_the_author_may_modify_or_delete() {
    let app = setup().await;
    let (_, author) = create_user(&app, "alice").await;
    let (_, other) = create_user(&app, "bob").await;
    let tag = create_tag(&app, "Lunch", "lunch").await;
    let a = create_ingredient(&app, "Apple", "pcs").await;
    let recipe = create_recipe(&app, &author, "Pie", &[&tag], vec![amount(&a, 2)]).await;

    let req = UpdateRecipeRequest {
        tags: Some(vec![tag.id.clone()]),
        ingredients: Some(vec![amount(&a, 9)]),
        ..Default::default()
    };
    let err = recipes::update_recipe(app.state(), other.clone(), Path(recipe.id.clone()), AppJson(req))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = recipes::delete_recipe(app.state(), other, Path(recipe.id.clone()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let ingredients = db::get_recipe_ingredients(app.pool(), &recipe.id).await.unwrap();
    assert_eq!(ingredients[0].amount, 2);
}

#[tokio::test]
async fn delete_removes_recipe_rows_and_image() {
    let app = setup().await;
    let (_, author) = create_user(&app, "alice").await;
    let (_, fan) = create_user(&app, "bob").await;
    let tag = create_tag(&app, "Lunch", "lunch").await;
    let a = create_ingredient(&app, "Apple", "pcs").await;
    let recipe = create_recipe(&app, &author, "Pie", &[&tag], vec![amount(&a, 2)]).await;
    db::add_favorite(app.pool(), &fan.user_id, &recipe.id).await.unwrap();
    db::add_to_shopping_cart(app.pool(), &fan.user_id, &recipe.id).await.unwrap();
    let image = app.media.path().join(recipe.image.strip_prefix("/media/").unwrap());

    let status = recipes::delete_recipe(app.state(), author, Path(recipe.id.clone()))
        .await
        .unwrap();

    assert_eq!(status, StatusCode::NO_CONTENT);
    for table in ["recipes", "recipe_ingredients", "recipe_tags", "favorites", "shopping_cart"] {
        assert_eq!(count(&app, table).await, 0, "{table} not emptied");
    }
    assert!(!image.exists());
    // Tags and ingredients themselves stay
    assert_eq!(count(&app, "tags").await, 1);
    assert_eq!(count(&app, "ingredients").await, 1);
}

#[tokio::test]
async fn flags_reflect_the_viewer() {
    let app = setup().await;
    let (_, author) = create_user(&app, "alice").await;
    let (_, fan) = create_user(&app, "bob").await;
    let tag = create_tag(&app, "Lunch", "lunch").await;
    let a = create_ingredient(&app, "Apple", "pcs").await;
    let recipe = create_recipe(&app, &author, "Pie", &[&tag], vec![amount(&a, 2)]).await;

    db::add_favorite(app.pool(), &fan.user_id, &recipe.id).await.unwrap();
    db::create_follow(app.pool(), &fan.user_id, &author.user_id).await.unwrap();

    let Json(seen_by_fan) = recipes::get_recipe(app.state(), viewer(&fan), Path(recipe.id.clone()))
        .await
        .unwrap();
    assert!(seen_by_fan.is_favorited);
    assert!(!seen_by_fan.is_in_shopping_cart);
    assert!(seen_by_fan.author.is_subscribed);

    let Json(seen_by_author) = recipes::get_recipe(app.state(), viewer(&author), Path(recipe.id.clone()))
        .await
        .unwrap();
    assert!(!seen_by_author.is_favorited);
    assert!(!seen_by_author.author.is_subscribed);

    let Json(seen_anonymously) = recipes::get_recipe(app.state(), anonymous(), Path(recipe.id.clone()))
        .await
        .unwrap();
    assert!(!seen_anonymously.is_favorited);
    assert!(!seen_anonymously.author.is_subscribed);
}

#[tokio::test]
async fn list_filters_by_tags_author_and_favorites() {
    let app = setup().await;
    let (_, alice) = create_user(&app, "alice").await;
    let (_, bob) = create_user(&app, "bob").await;
    let breakfast = create_tag(&app, "Breakfast", "breakfast").await;
    let dinner = create_tag(&app, "Dinner", "dinner").await;
    let egg = create_ingredient(&app, "Egg", "pcs").await;

    create_recipe(&app, &alice, "Omelette", &[&breakfast], vec![amount(&egg, 2)]).await;
    let stew = create_recipe(&app, &bob, "Stew", &[&dinner], vec![amount(&egg, 1)]).await;
    create_recipe(&app, &bob, "Brunch", &[&breakfast, &dinner], vec![amount(&egg, 3)]).await;

    let names = |recipes: Vec<RecipeResponse>| recipes.into_iter().map(|r| r.name).collect::<Vec<_>>();

    // Newest first
    let Json(all) = recipes::list_recipes(app.state(), anonymous(), Query(vec![]))
        .await
        .unwrap();
    assert_eq!(names(all), vec!["Brunch", "Stew", "Omelette"]);

    let Json(tagged) = recipes::list_recipes(app.state(), anonymous(), Query(pairs(&[("tags", "breakfast")])))
        .await
        .unwrap();
    assert_eq!(names(tagged), vec!["Brunch", "Omelette"]);

    let Json(by_bob) = recipes::list_recipes(
        app.state(),
        anonymous(),
        Query(pairs(&[("author", bob.user_id.as_str()), ("tags", "breakfast,dinner")])),
    )
    .await
    .unwrap();
    assert_eq!(names(by_bob), vec!["Brunch", "Stew"]);

    db::add_favorite(app.pool(), &alice.user_id, &stew.id).await.unwrap();
    let Json(favorites) = recipes::list_recipes(app.state(), viewer(&alice), Query(pairs(&[("is_favorited", "1")])))
        .await
        .unwrap();
    assert_eq!(names(favorites), vec!["Stew"]);

    // Anonymous viewers have no favorites, so the flag filter is ignored
    let Json(ignored) = recipes::list_recipes(app.state(), anonymous(), Query(pairs(&[("is_favorited", "1")])))
        .await
        .unwrap();
    assert_eq!(ignored.len(), 3);
}

#[tokio::test]
async fn unknown_recipe_is_not_found() {
    let app = setup().await;
    let err = recipes::get_recipe(app.state(), anonymous(), Path("nope".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let err = users::get_user(app.state(), anonymous(), Path("nope".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn failed_write_rolls_back_every_step() {
    let app = setup().await;
    let (_, author) = create_user(&app, "alice").await;
    let tag = create_tag(&app, "Lunch", "lunch").await;
    let a = create_ingredient(&app, "Apple", "pcs").await;
    let b = create_ingredient(&app, "Butter", "g").await;
    let recipe = create_recipe(&app, &author, "Pie", &[&tag], vec![amount(&a, 2)]).await;

    // The tag insert runs last and breaks the foreign key
    let bad_tags = vec!["no-such-tag".to_string()];
    let fields = RecipeFields {
        name: Some("Tart".into()),
        image: Some("recipes/images/tart.png".into()),
        text: Some("Bake it".into()),
        cooking_time: Some(30),
    };

    let err = db::create_recipe(app.pool(), &author.user_id, &fields, &bad_tags, &[amount(&b, 1)])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Database(_)));
    assert_eq!(count(&app, "recipes").await, 1);
    assert_eq!(count(&app, "recipe_ingredients").await, 1);

    let err = db::update_recipe(app.pool(), &recipe.id, &fields, &bad_tags, &[amount(&b, 7)])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Database(_)));

    let Json(unchanged) = recipes::get_recipe(app.state(), anonymous(), Path(recipe.id.clone()))
        .await
        .unwrap();
    assert_eq!(unchanged.name, "Pie");
    assert_eq!(unchanged.tags, vec![tag]);
    assert_eq!(unchanged.ingredients.len(), 1);
    assert_eq!(unchanged.ingredients[0].id, a.id);
    assert_eq!(unchanged.ingredients[0].amount, 2);
}

#[tokio::test]
async fn mistyped_body_uses_the_error_response_shape() {
    for body in [
        r#"{"ingredients": [{"id": "x", "amount": "5"}]}"#,
        r#"{"ingredients": [{"id": "x", "amount": 2.5}]}"#,
        r#"{"name": "#,
    ] {
        let request = Request::builder()
            .method("POST")
            .uri("/api/recipes/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();

        let err = AppJson::<CreateRecipeRequest>::from_request(request, &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)), "{body}");

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"]["code"], "bad_request");
    }
}
