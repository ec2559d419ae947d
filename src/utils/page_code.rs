use crate::entities::memorial_page_entity as pages;
use crate::error::{AppError, AppResult};
use rand::Rng;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};
use std::future::Future;

pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const DEFAULT_CODE_LENGTH: usize = 6;
/// Candidates tried at one length before widening.
pub const MAX_ATTEMPTS_PER_LENGTH: usize = 10;
/// Width of the `memorial_pages.code` column.
pub const MAX_CODE_LENGTH: usize = 20;

/// Random code of uppercase letters and digits.
pub fn random_code<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Draws candidates until `exists` reports a free one.
///
/// Retries are bounded: after `MAX_ATTEMPTS_PER_LENGTH` collisions the length grows by one,
/// and once `MAX_CODE_LENGTH` is exhausted an internal error is returned.
pub async fn generate_unique_code<C, E, Fut>(
    length: usize,
    mut candidate: C,
    mut exists: E,
) -> AppResult<String>
where
    C: FnMut(usize) -> String,
    E: FnMut(String) -> Fut,
    Fut: Future<Output = AppResult<bool>>,
{
    for len in length..=MAX_CODE_LENGTH {
        for _ in 0..MAX_ATTEMPTS_PER_LENGTH {
            let code = candidate(len);
            if !exists(code.clone()).await? {
                return Ok(code);
            }
        }
        log::warn!("Page code space at length {len} looks crowded, widening");
    }

    Err(AppError::InternalError(
        "Unable to generate a unique page code".to_string(),
    ))
}

pub async fn page_code_exists<C: ConnectionTrait>(conn: &C, code: &str) -> AppResult<bool> {
    let count = pages::Entity::find()
        .filter(pages::Column::Code.eq(code))
        .count(conn)
        .await?;
    Ok(count > 0)
}

/// Unique page code checked against persisted pages.
///
/// This is only a pre-check; the unique index on `memorial_pages.code` is the real guarantee.
pub async fn generate_unique_page_code<C: ConnectionTrait>(conn: &C) -> AppResult<String> {
    generate_unique_code(
        DEFAULT_CODE_LENGTH,
        |len| random_code(&mut rand::thread_rng(), len),
        |code| async move { page_code_exists(conn, &code).await },
    )
    .await
}
