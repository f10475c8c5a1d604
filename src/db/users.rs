use sqlx::SqlitePool;

use super::User;

pub async fn create_user(
    db_pool: &SqlitePool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> sqlx::Result<User> {
    sqlx::query_as("INSERT INTO users (username,email,password_hash) VALUES (?,?,?) RETURNING id,username,email,password_hash")
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db_pool)
        .await
}

pub async fn get_user(db_pool: &SqlitePool, id: i64) -> sqlx::Result<Option<User>> {
    sqlx::query_as("SELECT id,username,email,password_hash FROM users WHERE id=?")
        .bind(id)
        .fetch_optional(db_pool)
        .await
}

pub async fn find_user_by_email(db_pool: &SqlitePool, email: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as("SELECT id,username,email,password_hash FROM users WHERE email=?")
        .bind(email)
        .fetch_optional(db_pool)
        .await
}

pub async fn email_taken(db_pool: &SqlitePool, email: &str) -> sqlx::Result<bool> {
    Ok(sqlx::query("SELECT 1 FROM users WHERE email=?")
        .bind(email)
        .fetch_optional(db_pool)
        .await?
        .is_some())
}

pub async fn username_taken(db_pool: &SqlitePool, username: &str) -> sqlx::Result<bool> {
    Ok(sqlx::query("SELECT 1 FROM users WHERE username=?")
        .bind(username)
        .fetch_optional(db_pool)
        .await?
        .is_some())
}
