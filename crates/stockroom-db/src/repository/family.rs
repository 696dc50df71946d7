//! SurrealDB implementation of [`FamilyRepository`].

use chrono::{DateTime, Utc};
use stockroom_core::error::StockroomResult;
use stockroom_core::models::family::{Family, FamilyMember};
use stockroom_core::models::family_role::FamilyRole;
use stockroom_core::repository::FamilyRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use super::next_id;
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct FamilyRow {
    name: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct MemberRow {
    record_id: i64,
    user_id: i64,
    role: String,
    joined_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct MemberWrite {
    member_id: i64,
    user_id: i64,
    role: String,
}

impl MemberRow {
    fn try_into_member(self) -> Result<FamilyMember, DbError> {
        let role: FamilyRole = self.role.parse().map_err(|e: stockroom_core::error::DomainError| {
            DbError::Corrupt {
                entity: "family_member",
                id: self.record_id,
                reason: e.to_string(),
            }
        })?;
        Ok(FamilyMember {
            id: self.record_id,
            user_id: self.user_id,
            role,
            joined_at: self.joined_at,
        })
    }
}

#[derive(Clone)]
pub struct SurrealFamilyRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealFamilyRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> FamilyRepository for SurrealFamilyRepository<C> {
    async fn load(&self, family_id: i64) -> StockroomResult<Option<Family>> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('family', $id); \
                 SELECT meta::id(id) AS record_id, * FROM family_member \
                 WHERE family_id = $id ORDER BY record_id ASC;",
            )
            .bind(("id", family_id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<FamilyRow> = result.take(0).map_err(DbError::from)?;
        let Some(row) = rows.into_iter().next() else {
            return Ok(None);
        };

        let members: Vec<MemberRow> = result.take(1).map_err(DbError::from)?;
        let members = members
            .into_iter()
            .map(MemberRow::try_into_member)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(Some(Family::from_parts(
            family_id,
            row.name,
            row.created_at,
            members,
        )))
    }

    async fn save(&self, mut family: Family) -> StockroomResult<Family> {
        if family.id() == 0 {
            let id = next_id(&self.db, "family").await?;
            family.assign_id(id);
        }
        let family_id = family.id();

        let mut members = Vec::with_capacity(family.members().len());
        for member in family.members() {
            let member_id = match member.id {
                0 => next_id(&self.db, "family_member").await?,
                id => id,
            };
            members.push(MemberWrite {
                member_id,
                user_id: member.user_id,
                role: member.role.as_str().to_owned(),
            });
        }
        let keep: Vec<i64> = family
            .members()
            .iter()
            .map(|m| m.id)
            .filter(|id| *id != 0)
            .collect();

        // Departed members go first so a re-added user does not collide
        // with their old membership on the unique index.
        self.db
            .query(
                "BEGIN TRANSACTION; \
                 UPSERT type::record('family', $id) SET name = $name; \
                 DELETE family_member WHERE family_id = $id \
                 AND meta::id(id) NOT IN $keep; \
                 FOR $member IN $members { \
                 UPSERT type::record('family_member', $member.member_id) SET \
                 family_id = $id, user_id = $member.user_id, role = $member.role; \
                 }; \
                 COMMIT TRANSACTION;",
            )
            .bind(("id", family_id))
            .bind(("name", family.name().to_owned()))
            .bind(("keep", keep))
            .bind(("members", members))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        self.load(family_id).await?.ok_or_else(|| {
            DbError::NotFound {
                entity: "family".into(),
                id: family_id.to_string(),
            }
            .into()
        })
    }

    async fn list_for_user(&self, user_id: i64) -> StockroomResult<Vec<Family>> {
        let mut result = self
            .db
            .query("SELECT VALUE family_id FROM family_member WHERE user_id = $user_id")
            .bind(("user_id", user_id))
            .await
            .map_err(DbError::from)?;

        let mut ids: Vec<i64> = result.take(0).map_err(DbError::from)?;
        ids.sort_unstable();
        ids.dedup();

        let mut families = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(family) = self.load(id).await? {
                families.push(family);
            }
        }
        Ok(families)
    }
}
