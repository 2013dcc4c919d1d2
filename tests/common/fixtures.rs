//! Test fixtures for creating test data
#![allow(dead_code)]

use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};
use blogcraft::orm::{categories, posts};
use blogcraft::photos::NewPhoto;
use sea_orm::{DatabaseConnection, DbErr};

/// Test user fixture
pub struct TestUser {
    pub id: i32,
    pub email: String,
    pub password: String, // Plain text password for testing
}

/// Create a test user with known credentials
pub async fn create_test_user(db: &DatabaseConnection, name: &str) -> Result<TestUser, DbErr> {
    let password = "password123";
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = blogcraft::session::get_argon2()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbErr::Custom(format!("Password hashing failed: {}", e)))?
        .to_string();

    let email = format!("{}@test.com", name);
    let user = blogcraft::user::insert_user(db, &email, &password_hash, name).await?;

    Ok(TestUser {
        id: user.id,
        email,
        password: password.to_string(),
    })
}

pub async fn create_test_category(
    db: &DatabaseConnection,
    user_id: i32,
    name: &str,
) -> Result<categories::Model, DbErr> {
    blogcraft::categories::create_category(db, user_id, name, Some("test category")).await
}

pub async fn create_test_post(
    db: &DatabaseConnection,
    user_id: i32,
    category_id: &str,
) -> Result<posts::Model, DbErr> {
    blogcraft::posts::create_post(
        db,
        user_id,
        category_id,
        "Harbor Noodles",
        "Visited on a rainy Tuesday; the broth was the highlight.",
    )
    .await
}

pub async fn create_test_photo(
    db: &DatabaseConnection,
    user_id: i32,
    post_id: &str,
    n: usize,
) -> Result<blogcraft::orm::photos::Model, DbErr> {
    blogcraft::photos::add_photo(
        db,
        user_id,
        post_id,
        NewPhoto {
            original_file_name: format!("photo_{}.jpg", n),
            stored_file_path: format!("stored_{}.jpg", n),
            memo: format!("memo for photo {}", n),
        },
    )
    .await
}

/// Body text long enough for the learning-sample and version CHECK
/// constraints (>= 200 chars).
pub fn long_text() -> String {
    "The afternoon light through the window made every table glow. ".repeat(5)
}
