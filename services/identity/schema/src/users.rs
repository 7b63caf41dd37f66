use sea_orm::entity::prelude::*;

/// Vault user: identity, credentials and biometric linkage.
///
/// `otp` and `otp_expires_at` are set together on issuance and cleared
/// together on a successful OTP login.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: Option<String>,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: Option<String>,
    pub otp: Option<String>,
    pub otp_expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub face_embedding_path: Option<String>,
    #[sea_orm(unique)]
    pub voice_profile_id: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::outbox_events::Entity")]
    OutboxEvents,
}

impl Related<super::outbox_events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OutboxEvents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
