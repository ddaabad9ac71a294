use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{career_page::CareerUrls, company::Company};

#[derive(Debug, PartialEq)]
pub enum CareerUrlUpdate {
    Updated,
    AlreadyUpToDate,
    MissingCompany,
}

pub async fn unprocessed_companies(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<Company>, sqlx::Error> {
    sqlx::query_as::<_, Company>(
        r#"
        select
            id, company_name
        from
            company
        where
            office_in_eu = true
            and (career_website_url is null or career_website_url = '')
        limit $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn set_career_urls(
    pool: &PgPool,
    company_id: Uuid,
    urls: &CareerUrls,
) -> Result<CareerUrlUpdate, sqlx::Error> {
    let updated = sqlx::query(
        r#"
        update
            company
        set
            career_website_url = $2,
            internship_url = $3
        where
            id = $1
            and (
                career_website_url is distinct from $2
                or internship_url is distinct from $3
            )
        "#,
    )
    .bind(company_id)
    .bind(urls.main_career_url.as_deref())
    .bind(urls.internship_url.as_deref())
    .execute(pool)
    .await?;

    if updated.rows_affected() > 0 {
        return Ok(CareerUrlUpdate::Updated);
    }

    // No row changed: either the values were already in place or the id is gone
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        select exists(select 1 from company where id = $1)
        "#,
    )
    .bind(company_id)
    .fetch_one(pool)
    .await?;

    match exists {
        true => Ok(CareerUrlUpdate::AlreadyUpToDate),
        false => Ok(CareerUrlUpdate::MissingCompany),
    }
}
