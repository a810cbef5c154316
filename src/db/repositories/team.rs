//! Team roster and leadership repository

use crate::db::DynDatabasePool;
use crate::models::{Leadership, TeamMember, TeamRole};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use std::sync::Arc;

#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// List members by display order, then name
    async fn list_members(&self, active_only: bool) -> Result<Vec<TeamMember>>;

    /// List leadership by display order, then name
    async fn list_leadership(&self) -> Result<Vec<Leadership>>;
}

pub struct SqlxTeamRepository {
    pool: DynDatabasePool,
}

impl SqlxTeamRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn TeamRepository> {
        Arc::new(Self::new(pool))
    }
}

const MEMBER_COLUMNS: &str = "id, name, role, batch, email, linkedin_url, bio, image, active, sort_order, created_at, updated_at";
const LEADER_COLUMNS: &str = "id, name, position, bio, email, image, sort_order, created_at, updated_at";

#[async_trait]
impl TeamRepository for SqlxTeamRepository {
    async fn list_members(&self, active_only: bool) -> Result<Vec<TeamMember>> {
        let sql = format!(
            "SELECT {} FROM team_members WHERE (? = 0 OR active = 1) ORDER BY sort_order, name",
            MEMBER_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(active_only)
            .fetch_all(self.pool.as_sqlite())
            .await
            .context("Failed to list team members")?;

        rows.iter().map(row_to_member).collect()
    }

    async fn list_leadership(&self) -> Result<Vec<Leadership>> {
        let sql = format!("SELECT {} FROM leadership ORDER BY sort_order, name", LEADER_COLUMNS);
        let rows = sqlx::query(&sql)
            .fetch_all(self.pool.as_sqlite())
            .await
            .context("Failed to list leadership")?;

        rows.iter().map(row_to_leader).collect()
    }
}

pub async fn find_member(conn: &mut SqliteConnection, id: &str) -> Result<Option<TeamMember>> {
    let sql = format!("SELECT {} FROM team_members WHERE id = ?", MEMBER_COLUMNS);
    let row = sqlx::query(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to get team member")?;

    row.map(|row| row_to_member(&row)).transpose()
}

pub async fn insert_member(conn: &mut SqliteConnection, member: &TeamMember) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO team_members (id, name, role, batch, email, linkedin_url, bio, image, active, sort_order, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&member.id)
    .bind(&member.name)
    .bind(member.role.as_str())
    .bind(&member.batch)
    .bind(&member.email)
    .bind(&member.linkedin_url)
    .bind(&member.bio)
    .bind(&member.image)
    .bind(member.active)
    .bind(member.sort_order)
    .bind(member.created_at)
    .bind(member.updated_at)
    .execute(&mut *conn)
    .await
    .with_context(|| format!("Failed to create team member '{}'", member.name))?;

    Ok(())
}

pub async fn update_member(conn: &mut SqliteConnection, member: &TeamMember) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE team_members
        SET name = ?, role = ?, batch = ?, email = ?, linkedin_url = ?, bio = ?, image = ?,
            active = ?, sort_order = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&member.name)
    .bind(member.role.as_str())
    .bind(&member.batch)
    .bind(&member.email)
    .bind(&member.linkedin_url)
    .bind(&member.bio)
    .bind(&member.image)
    .bind(member.active)
    .bind(member.sort_order)
    .bind(member.updated_at)
    .bind(&member.id)
    .execute(&mut *conn)
    .await
    .with_context(|| format!("Failed to update team member '{}'", member.name))?;

    Ok(())
}

pub async fn find_leader(conn: &mut SqliteConnection, id: &str) -> Result<Option<Leadership>> {
    let sql = format!("SELECT {} FROM leadership WHERE id = ?", LEADER_COLUMNS);
    let row = sqlx::query(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to get leadership entry")?;

    row.map(|row| row_to_leader(&row)).transpose()
}

pub async fn insert_leader(conn: &mut SqliteConnection, leader: &Leadership) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO leadership (id, name, position, bio, email, image, sort_order, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&leader.id)
    .bind(&leader.name)
    .bind(&leader.position)
    .bind(&leader.bio)
    .bind(&leader.email)
    .bind(&leader.image)
    .bind(leader.sort_order)
    .bind(leader.created_at)
    .bind(leader.updated_at)
    .execute(&mut *conn)
    .await
    .with_context(|| format!("Failed to create leadership entry '{}'", leader.name))?;

    Ok(())
}

pub async fn update_leader(conn: &mut SqliteConnection, leader: &Leadership) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE leadership
        SET name = ?, position = ?, bio = ?, email = ?, image = ?, sort_order = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&leader.name)
    .bind(&leader.position)
    .bind(&leader.bio)
    .bind(&leader.email)
    .bind(&leader.image)
    .bind(leader.sort_order)
    .bind(leader.updated_at)
    .bind(&leader.id)
    .execute(&mut *conn)
    .await
    .with_context(|| format!("Failed to update leadership entry '{}'", leader.name))?;

    Ok(())
}

fn row_to_member(row: &SqliteRow) -> Result<TeamMember> {
    let role: String = row.get("role");
    let role = TeamRole::from_str(&role).unwrap_or(TeamRole::Member);

    Ok(TeamMember {
        id: row.get("id"),
        name: row.get("name"),
        role,
        batch: row.get("batch"),
        email: row.get("email"),
        linkedin_url: row.get("linkedin_url"),
        bio: row.get("bio"),
        image: row.get("image"),
        active: row.get("active"),
        sort_order: row.get("sort_order"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn row_to_leader(row: &SqliteRow) -> Result<Leadership> {
    Ok(Leadership {
        id: row.get("id"),
        name: row.get("name"),
        position: row.get("position"),
        bio: row.get("bio"),
        email: row.get("email"),
        image: row.get("image"),
        sort_order: row.get("sort_order"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
