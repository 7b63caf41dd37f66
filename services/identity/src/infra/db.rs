use std::sync::Arc;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, SqlErr, TransactionTrait, sea_query::Expr,
};

use biovault_identity_schema::{outbox_events, users};

use crate::domain::repository::UserRepository;
use crate::domain::types::{NewUser, OutboxEvent, User};
use crate::error::IdentityServiceError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: Arc<DatabaseConnection>,
}

impl DbUserRepository {
    async fn update(
        &self,
        am: users::ActiveModel,
        what: &'static str,
    ) -> Result<(), IdentityServiceError> {
        am.update(&*self.db).await.context(what)?;
        Ok(())
    }
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, IdentityServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, IdentityServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&*self.db)
            .await
            .context("find user by username")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, IdentityServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&*self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &NewUser) -> Result<User, IdentityServiceError> {
        let result = users::ActiveModel {
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            username: Set(user.username.clone()),
            password_hash: Set(user.password_hash.clone()),
            otp: Set(None),
            otp_expires_at: Set(None),
            face_embedding_path: Set(None),
            voice_profile_id: Set(None),
            created_at: Set(user.created_at),
            updated_at: Set(user.created_at),
            ..Default::default()
        }
        .insert(&*self.db)
        .await;

        match result {
            Ok(model) => Ok(user_from_model(model)),
            Err(err) => Err(map_unique_violation(err, user)),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, IdentityServiceError> {
        let result = users::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected > 0)
    }

    async fn store_otp_with_outbox(
        &self,
        user_id: i64,
        otp: &str,
        expires_at: DateTime<Utc>,
        event: &OutboxEvent,
    ) -> Result<(), IdentityServiceError> {
        self.db
            .transaction::<_, (), DbErr>(move |txn| {
                let otp = otp.to_owned();
                let event = event.clone();
                Box::pin(async move {
                    users::ActiveModel {
                        id: Set(user_id),
                        otp: Set(Some(otp)),
                        otp_expires_at: Set(Some(expires_at)),
                        updated_at: Set(Utc::now()),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;
                    insert_outbox_event(txn, &event).await?;
                    Ok(())
                })
            })
            .await
            .context("store otp with outbox")?;
        Ok(())
    }

    async fn consume_otp(
        &self,
        user_id: i64,
        otp: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, IdentityServiceError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::Otp, Expr::value(Option::<String>::None))
            .col_expr(
                users::Column::OtpExpiresAt,
                Expr::value(Option::<DateTime<Utc>>::None),
            )
            .col_expr(users::Column::UpdatedAt, Expr::value(now))
            .filter(users::Column::Id.eq(user_id))
            .filter(users::Column::Otp.eq(otp))
            .filter(users::Column::OtpExpiresAt.gt(now))
            .exec(&*self.db)
            .await
            .context("consume otp")?;
        Ok(result.rows_affected == 1)
    }

    async fn set_face_embedding_path(
        &self,
        user_id: i64,
        path: &str,
    ) -> Result<(), IdentityServiceError> {
        let am = users::ActiveModel {
            id: Set(user_id),
            face_embedding_path: Set(Some(path.to_owned())),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        self.update(am, "set face embedding path").await
    }

    async fn set_voice_profile_id(
        &self,
        user_id: i64,
        profile_id: &str,
    ) -> Result<(), IdentityServiceError> {
        let am = users::ActiveModel {
            id: Set(user_id),
            voice_profile_id: Set(Some(profile_id.to_owned())),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        self.update(am, "set voice profile id").await
    }
}

/// Which unique key a violation hit, judged from the constraint detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueKey {
    Email,
    Username,
}

pub fn classify_unique_violation(detail: &str) -> UniqueKey {
    if detail.contains("email") {
        UniqueKey::Email
    } else {
        UniqueKey::Username
    }
}

/// Races past the use-case pre-checks end here: the unique index decides.
fn map_unique_violation(err: DbErr, user: &NewUser) -> IdentityServiceError {
    let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() else {
        return IdentityServiceError::Internal(anyhow::Error::new(err).context("create user"));
    };
    match classify_unique_violation(&detail) {
        UniqueKey::Email => IdentityServiceError::EmailTaken(user.email.clone()),
        UniqueKey::Username => IdentityServiceError::UsernameTaken(user.username.clone()),
    }
}

async fn insert_outbox_event(
    txn: &DatabaseTransaction,
    event: &OutboxEvent,
) -> Result<(), DbErr> {
    let now = Utc::now();
    outbox_events::ActiveModel {
        id: Set(event.id),
        user_id: Set(event.user_id),
        kind: Set(event.kind.clone()),
        payload: Set(event.payload.clone()),
        idempotency_key: Set(event.idempotency_key.clone()),
        attempts: Set(0),
        last_error: Set(None),
        created_at: Set(now),
        available_at: Set(now),
        processed_at: Set(None),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        name: model.name,
        email: model.email,
        username: model.username,
        password_hash: model.password_hash,
        otp: model.otp,
        otp_expires_at: model.otp_expires_at,
        face_embedding_path: model.face_embedding_path,
        voice_profile_id: model.voice_profile_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
