use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Organization/group association row.
///
/// The composite primary key enforces one row per `(org_id, group_id)`.
/// Groups are managed elsewhere and referenced only by id.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "org_groups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub org_id: i32,

    #[sea_orm(primary_key, auto_increment = false)]
    pub group_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
