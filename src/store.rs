//! The organization store.
//!
//! [`OrgStore`] is a stateless façade over a SeaORM connection pool: every
//! operation is a single independent statement sequence, and the two compound
//! operations (`create_org`, `remove_org`) run inside database transactions.

use std::collections::HashMap;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection as DbConn, EntityTrait, NotSet, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use crate::config::StoreConfig;
use crate::entity::{org_group, org_user, organization};
use crate::error::{OrgStoreError, Result};
use crate::pagination::Page;
use crate::utils::current_timestamp;

/// Organization record from the database.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Store-generated identifier.
    pub org_id: i32,
    /// Display name.
    pub org_name: String,
    /// External-facing identifier (unique).
    pub url_prefix: String,
    /// Email of the creating user.
    pub creator: String,
    /// Creation timestamp (Unix seconds).
    pub ctime: i64,
}

/// An organization a user belongs to, with the user's staff flag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgMembership {
    /// The organization.
    pub organization: Organization,
    /// Whether the user is staff in this organization.
    pub is_staff: bool,
}

/// Convert organization model to exported type.
fn model_to_organization(model: organization::Model) -> Organization {
    Organization {
        org_id: model.org_id,
        org_name: model.org_name,
        url_prefix: model.url_prefix,
        creator: model.creator,
        ctime: model.ctime,
    }
}

/// SeaORM-backed store for organizations, their users and their groups.
///
/// Cloning is cheap; the underlying connection pool is shared.
///
/// # Example
///
/// ```rust,ignore
/// let store = OrgStore::connect(&StoreConfig::from_env()?).await?;
///
/// let org_id = store.create_org("Acme", "acme", "alice@acme.com").await?;
/// store.add_org_user(org_id, "bob@acme.com", false).await?;
/// store.add_org_group(org_id, 42).await?;
/// ```
#[derive(Clone, Debug)]
pub struct OrgStore {
    db: DbConn,
}

impl OrgStore {
    /// Create a store over an existing SeaORM connection.
    ///
    /// The caller is responsible for provisioning; see
    /// [`ensure_schema`](crate::schema::ensure_schema).
    #[must_use]
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Connect per `config` and return a ready store.
    ///
    /// Provisions the schema unless `config.auto_provision` is disabled.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let db = crate::database::DatabaseConnection::connect(config).await?;
        Ok(Self::new(db.into_inner()))
    }

    /// Get a reference to the underlying database connection.
    #[must_use]
    pub fn connection(&self) -> &DbConn {
        &self.db
    }

    // =========================================================================
    // Organization CRUD
    // =========================================================================

    /// Create an organization and its creator's staff membership atomically.
    ///
    /// Both rows are inserted in one transaction: if the membership insert
    /// fails, the organization row is rolled back and never observed.
    /// Returns the generated organization id.
    ///
    /// # Errors
    ///
    /// [`OrgStoreError::UrlPrefixTaken`] if `url_prefix` is already in use;
    /// nothing is created in that case.
    pub async fn create_org(&self, org_name: &str, url_prefix: &str, creator: &str) -> Result<i32> {
        tracing::debug!(org_name, url_prefix, creator, "creating organization");

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| OrgStoreError::Database(e.to_string()))?;

        let org = organization::ActiveModel {
            org_id: NotSet,
            org_name: Set(org_name.to_owned()),
            url_prefix: Set(url_prefix.to_owned()),
            creator: Set(creator.to_owned()),
            ctime: Set(current_timestamp()),
        };

        let res = organization::Entity::insert(org)
            .exec(&txn)
            .await
            .map_err(|e| {
                OrgStoreError::from_insert_err(e, OrgStoreError::url_prefix_taken(url_prefix))
            })?;
        let org_id = res.last_insert_id;

        let staff = org_user::ActiveModel {
            org_id: Set(org_id),
            email: Set(creator.to_owned()),
            is_staff: Set(true),
        };

        org_user::Entity::insert(staff)
            .exec(&txn)
            .await
            .map_err(|e| {
                OrgStoreError::from_insert_err(e, OrgStoreError::already_member(org_id, creator))
            })?;

        txn.commit()
            .await
            .map_err(|e| OrgStoreError::Database(e.to_string()))?;

        tracing::info!(org_id, url_prefix, "organization created");
        Ok(org_id)
    }

    /// Delete an organization and all of its user and group associations.
    ///
    /// The three deletes run in one transaction, so no orphaned association
    /// rows can survive. Removing a non-existent organization is not an
    /// error.
    pub async fn remove_org(&self, org_id: i32) -> Result<()> {
        tracing::debug!(org_id, "removing organization");

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| OrgStoreError::Database(e.to_string()))?;

        let res = organization::Entity::delete_many()
            .filter(organization::Column::OrgId.eq(org_id))
            .exec(&txn)
            .await
            .map_err(|e| OrgStoreError::Database(e.to_string()))?;

        org_user::Entity::delete_many()
            .filter(org_user::Column::OrgId.eq(org_id))
            .exec(&txn)
            .await
            .map_err(|e| OrgStoreError::Database(e.to_string()))?;

        org_group::Entity::delete_many()
            .filter(org_group::Column::OrgId.eq(org_id))
            .exec(&txn)
            .await
            .map_err(|e| OrgStoreError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| OrgStoreError::Database(e.to_string()))?;

        tracing::info!(
            org_id,
            removed = res.rows_affected > 0,
            "organization removed"
        );
        Ok(())
    }

    /// Find an organization by its url prefix.
    pub async fn get_org_by_url_prefix(&self, url_prefix: &str) -> Result<Option<Organization>> {
        tracing::debug!(url_prefix, "finding organization by url prefix");

        let org = organization::Entity::find()
            .filter(organization::Column::UrlPrefix.eq(url_prefix))
            .one(&self.db)
            .await
            .map_err(|e| OrgStoreError::Database(e.to_string()))?;

        Ok(org.map(model_to_organization))
    }

    /// Find an organization by its id.
    pub async fn get_org_by_id(&self, org_id: i32) -> Result<Option<Organization>> {
        tracing::debug!(org_id, "finding organization by id");

        let org = organization::Entity::find_by_id(org_id)
            .one(&self.db)
            .await
            .map_err(|e| OrgStoreError::Database(e.to_string()))?;

        Ok(org.map(model_to_organization))
    }

    /// List organizations ordered by ascending id.
    pub async fn get_all_orgs(&self, page: Option<Page>) -> Result<Vec<Organization>> {
        tracing::debug!(?page, "listing organizations");

        let mut query = organization::Entity::find().order_by_asc(organization::Column::OrgId);
        if let Some(page) = page {
            query = query.offset(page.start).limit(page.limit);
        }

        let orgs = query
            .all(&self.db)
            .await
            .map_err(|e| OrgStoreError::Database(e.to_string()))?;

        Ok(orgs.into_iter().map(model_to_organization).collect())
    }

    /// Look up an organization's url prefix by id.
    pub async fn get_url_prefix_by_org_id(&self, org_id: i32) -> Result<Option<String>> {
        tracing::debug!(org_id, "finding url prefix by org id");

        let org = organization::Entity::find_by_id(org_id)
            .one(&self.db)
            .await
            .map_err(|e| OrgStoreError::Database(e.to_string()))?;

        Ok(org.map(|o| o.url_prefix))
    }

    // =========================================================================
    // User associations
    // =========================================================================

    /// Add a user to an organization.
    ///
    /// # Errors
    ///
    /// [`OrgStoreError::AlreadyMember`] if the `(org_id, email)` pair exists.
    pub async fn add_org_user(&self, org_id: i32, email: &str, is_staff: bool) -> Result<()> {
        tracing::debug!(org_id, email, is_staff, "adding organization user");

        let model = org_user::ActiveModel {
            org_id: Set(org_id),
            email: Set(email.to_owned()),
            is_staff: Set(is_staff),
        };

        org_user::Entity::insert(model)
            .exec(&self.db)
            .await
            .map_err(|e| {
                OrgStoreError::from_insert_err(e, OrgStoreError::already_member(org_id, email))
            })?;

        Ok(())
    }

    /// Remove a user from an organization.
    ///
    /// Removing a non-member affects zero rows and is not an error.
    pub async fn remove_org_user(&self, org_id: i32, email: &str) -> Result<()> {
        tracing::debug!(org_id, email, "removing organization user");

        org_user::Entity::delete_many()
            .filter(org_user::Column::OrgId.eq(org_id))
            .filter(org_user::Column::Email.eq(email))
            .exec(&self.db)
            .await
            .map_err(|e| OrgStoreError::Database(e.to_string()))?;

        Ok(())
    }

    /// Check whether a user belongs to an organization.
    pub async fn org_user_exists(&self, org_id: i32, email: &str) -> Result<bool> {
        tracing::debug!(org_id, email, "checking organization membership");

        let row = org_user::Entity::find()
            .filter(org_user::Column::OrgId.eq(org_id))
            .filter(org_user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| OrgStoreError::Database(e.to_string()))?;

        Ok(row.is_some())
    }

    /// Read a user's staff flag.
    ///
    /// A user who is not a member of the organization at all yields `false`.
    pub async fn is_org_staff(&self, org_id: i32, email: &str) -> Result<bool> {
        tracing::debug!(org_id, email, "checking staff flag");

        let row = org_user::Entity::find()
            .filter(org_user::Column::OrgId.eq(org_id))
            .filter(org_user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| OrgStoreError::Database(e.to_string()))?;

        Ok(row.map(|r| r.is_staff).unwrap_or(false))
    }

    /// Grant the staff flag. No-op if the membership does not exist.
    pub async fn set_org_staff(&self, org_id: i32, email: &str) -> Result<()> {
        self.update_staff_flag(org_id, email, true).await
    }

    /// Revoke the staff flag. No-op if the membership does not exist.
    pub async fn unset_org_staff(&self, org_id: i32, email: &str) -> Result<()> {
        self.update_staff_flag(org_id, email, false).await
    }

    async fn update_staff_flag(&self, org_id: i32, email: &str, is_staff: bool) -> Result<()> {
        tracing::debug!(org_id, email, is_staff, "updating staff flag");

        org_user::Entity::update_many()
            .col_expr(org_user::Column::IsStaff, Expr::value(is_staff))
            .filter(org_user::Column::OrgId.eq(org_id))
            .filter(org_user::Column::Email.eq(email))
            .exec(&self.db)
            .await
            .map_err(|e| OrgStoreError::Database(e.to_string()))?;

        Ok(())
    }

    /// List the organizations a user belongs to, with the user's staff flag
    /// in each, ordered by ascending organization id.
    pub async fn get_orgs_by_user(&self, email: &str) -> Result<Vec<OrgMembership>> {
        tracing::debug!(email, "listing organizations for user");

        let links = org_user::Entity::find()
            .filter(org_user::Column::Email.eq(email))
            .all(&self.db)
            .await
            .map_err(|e| OrgStoreError::Database(e.to_string()))?;

        if links.is_empty() {
            return Ok(vec![]);
        }

        let staff_by_org: HashMap<i32, bool> =
            links.iter().map(|l| (l.org_id, l.is_staff)).collect();
        let org_ids: Vec<i32> = links.into_iter().map(|l| l.org_id).collect();

        let orgs = organization::Entity::find()
            .filter(organization::Column::OrgId.is_in(org_ids))
            .order_by_asc(organization::Column::OrgId)
            .all(&self.db)
            .await
            .map_err(|e| OrgStoreError::Database(e.to_string()))?;

        Ok(orgs
            .into_iter()
            .map(|m| OrgMembership {
                is_staff: staff_by_org.get(&m.org_id).copied().unwrap_or(false),
                organization: model_to_organization(m),
            })
            .collect())
    }

    /// List member emails of the organization with the given url prefix,
    /// ordered alphabetically.
    ///
    /// An unknown prefix yields an empty list.
    pub async fn get_org_email_users(
        &self,
        url_prefix: &str,
        page: Option<Page>,
    ) -> Result<Vec<String>> {
        tracing::debug!(url_prefix, ?page, "listing organization member emails");

        let Some(org) = self.get_org_by_url_prefix(url_prefix).await? else {
            return Ok(vec![]);
        };

        let mut query = org_user::Entity::find()
            .filter(org_user::Column::OrgId.eq(org.org_id))
            .order_by_asc(org_user::Column::Email);
        if let Some(page) = page {
            query = query.offset(page.start).limit(page.limit);
        }

        let users = query
            .all(&self.db)
            .await
            .map_err(|e| OrgStoreError::Database(e.to_string()))?;

        Ok(users.into_iter().map(|u| u.email).collect())
    }

    // =========================================================================
    // Group associations
    // =========================================================================

    /// Link a group to an organization.
    ///
    /// # Errors
    ///
    /// [`OrgStoreError::GroupAlreadyLinked`] if the pair exists.
    pub async fn add_org_group(&self, org_id: i32, group_id: i32) -> Result<()> {
        tracing::debug!(org_id, group_id, "adding organization group");

        let model = org_group::ActiveModel {
            org_id: Set(org_id),
            group_id: Set(group_id),
        };

        org_group::Entity::insert(model)
            .exec(&self.db)
            .await
            .map_err(|e| {
                OrgStoreError::from_insert_err(
                    e,
                    OrgStoreError::group_already_linked(org_id, group_id),
                )
            })?;

        Ok(())
    }

    /// Unlink a group from an organization.
    ///
    /// Unlinking an absent pair affects zero rows and is not an error.
    pub async fn remove_org_group(&self, org_id: i32, group_id: i32) -> Result<()> {
        tracing::debug!(org_id, group_id, "removing organization group");

        org_group::Entity::delete_many()
            .filter(org_group::Column::OrgId.eq(org_id))
            .filter(org_group::Column::GroupId.eq(group_id))
            .exec(&self.db)
            .await
            .map_err(|e| OrgStoreError::Database(e.to_string()))?;

        Ok(())
    }

    /// Check whether a group belongs to any organization.
    pub async fn is_org_group(&self, group_id: i32) -> Result<bool> {
        tracing::debug!(group_id, "checking group linkage");

        let row = org_group::Entity::find()
            .filter(org_group::Column::GroupId.eq(group_id))
            .one(&self.db)
            .await
            .map_err(|e| OrgStoreError::Database(e.to_string()))?;

        Ok(row.is_some())
    }

    /// Find the organization a group belongs to.
    ///
    /// A group is expected to belong to at most one organization; if it is
    /// linked to several, the lowest organization id is returned.
    pub async fn get_org_id_by_group(&self, group_id: i32) -> Result<Option<i32>> {
        tracing::debug!(group_id, "finding organization by group");

        let row = org_group::Entity::find()
            .filter(org_group::Column::GroupId.eq(group_id))
            .order_by_asc(org_group::Column::OrgId)
            .one(&self.db)
            .await
            .map_err(|e| OrgStoreError::Database(e.to_string()))?;

        Ok(row.map(|r| r.org_id))
    }

    /// List the groups linked to an organization.
    pub async fn get_org_groups(&self, org_id: i32, page: Option<Page>) -> Result<Vec<i32>> {
        tracing::debug!(org_id, ?page, "listing organization groups");

        let mut query = org_group::Entity::find()
            .filter(org_group::Column::OrgId.eq(org_id))
            .order_by_asc(org_group::Column::GroupId);
        if let Some(page) = page {
            query = query.offset(page.start).limit(page.limit);
        }

        let groups = query
            .all(&self.db)
            .await
            .map_err(|e| OrgStoreError::Database(e.to_string()))?;

        Ok(groups.into_iter().map(|g| g.group_id).collect())
    }
}
