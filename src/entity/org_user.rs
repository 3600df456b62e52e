use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Organization membership row.
///
/// The composite primary key enforces one row per `(org_id, email)`.
/// The email is opaque to this crate; no foreign key is declared against any
/// external user table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "org_users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub org_id: i32,

    #[sea_orm(primary_key, auto_increment = false)]
    pub email: String,

    /// Elevated privileges within this organization.
    pub is_staff: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
