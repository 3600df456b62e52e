use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A tenant organization.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "organizations")]
pub struct Model {
    /// Store-generated identifier (auto-increment / serial).
    #[sea_orm(primary_key)]
    pub org_id: i32,

    /// Display name, not unique.
    pub org_name: String,

    /// External-facing identifier, globally unique.
    #[sea_orm(unique)]
    pub url_prefix: String,

    /// Email of the user who created the organization.
    pub creator: String,

    /// Unix timestamp (seconds), set at creation, immutable.
    pub ctime: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
