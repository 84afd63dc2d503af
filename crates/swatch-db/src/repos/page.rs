//! Color page repository.
//!
//! Pages hold an ordered list of swatches. Positions are 0-based and kept
//! dense: removing a color shifts everything after it down by one.

use chrono::Utc;
use serde_json::json;
use swatch_core::color::normalize_hex;
use swatch_core::entities::{ColorPage, PageColor};
use swatch_core::enums::{AuditAction, EntityType};
use swatch_core::identity::Actor;
use swatch_core::ids::PREFIX_PAGE;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, get_u32, owner_filter, parse_datetime, required_name};
use crate::service::SwatchService;

const PAGE_COLS: &str = "id, owner_id, name, description, created_at, updated_at";

/// A color to add to a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPageColor {
    pub hex: String,
    pub label: Option<String>,
}

impl NewPageColor {
    #[must_use]
    pub fn new(hex: impl Into<String>) -> Self {
        Self {
            hex: hex.into(),
            label: None,
        }
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Normalize every color up front, reporting all malformed entries at once.
fn normalize_colors(colors: &[NewPageColor]) -> Result<Vec<NewPageColor>, DatabaseError> {
    let mut normalized = Vec::with_capacity(colors.len());
    let mut problems = Vec::new();
    for (idx, color) in colors.iter().enumerate() {
        match normalize_hex(&color.hex) {
            Ok(hex) => normalized.push(NewPageColor {
                hex,
                label: color
                    .label
                    .as_deref()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(String::from),
            }),
            Err(e) => problems.push(format!("color {}: {e}", idx + 1)),
        }
    }
    if problems.is_empty() {
        Ok(normalized)
    } else {
        Err(DatabaseError::validation(problems.join(", ")))
    }
}

fn row_to_page(row: &libsql::Row) -> Result<ColorPage, DatabaseError> {
    Ok(ColorPage {
        id: row.get::<String>(0)?,
        owner_id: row.get::<String>(1)?,
        name: row.get::<String>(2)?,
        description: get_opt_string(row, 3)?,
        colors: Vec::new(),
        created_at: parse_datetime(&row.get::<String>(4)?)?,
        updated_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl SwatchService {
    /// Create a page with its initial colors in one transaction.
    ///
    /// # Errors
    ///
    /// A validation error for a blank name or any malformed color.
    pub async fn create_page(
        &self,
        actor: &Actor,
        name: &str,
        description: Option<&str>,
        colors: &[NewPageColor],
    ) -> Result<ColorPage, DatabaseError> {
        let name = required_name(name, "Page name")?;
        let description = description.map(str::trim).filter(|d| !d.is_empty());
        let colors = normalize_colors(colors)?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_PAGE).await?;

        let tx = self.db().conn().transaction().await?;
        let result = async {
            self.db()
                .conn()
                .execute(
                    &format!("INSERT INTO color_pages ({PAGE_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
                    libsql::params![
                        id.as_str(),
                        actor.id.as_str(),
                        name.as_str(),
                        description,
                        now.to_rfc3339(),
                        now.to_rfc3339()
                    ],
                )
                .await?;
            for (position, color) in (0_i64..).zip(&colors) {
                self.insert_page_color(&id, position, color).await?;
            }
            self.record(
                Some(actor),
                EntityType::ColorPage,
                &id,
                AuditAction::Created,
                Some(json!({ "name": name, "colors": colors.len() })),
            )
            .await
        }
        .await;
        Self::finish(tx, result).await?;

        self.get_page(actor, &id).await
    }

    async fn insert_page_color(
        &self,
        page_id: &str,
        position: i64,
        color: &NewPageColor,
    ) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                "INSERT INTO color_page_colors (page_id, position, hex, label)
                 VALUES (?1, ?2, ?3, ?4)",
                libsql::params![page_id, position, color.hex.as_str(), color.label.as_deref()],
            )
            .await?;
        Ok(())
    }

    async fn page_colors(&self, page_id: &str) -> Result<Vec<PageColor>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT position, hex, label FROM color_page_colors
                 WHERE page_id = ?1 ORDER BY position",
                [page_id],
            )
            .await?;
        let mut colors = Vec::new();
        while let Some(row) = rows.next().await? {
            colors.push(PageColor {
                position: get_u32(&row, 0)?,
                hex: row.get::<String>(1)?,
                label: get_opt_string(&row, 2)?,
            });
        }
        Ok(colors)
    }

    pub async fn get_page(&self, actor: &Actor, id: &str) -> Result<ColorPage, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {PAGE_COLS} FROM color_pages WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::ColorPage, id))?;
        let mut page = row_to_page(&row)?;
        if !actor.can_access(&page.owner_id) {
            return Err(DatabaseError::not_found(EntityType::ColorPage, id));
        }
        page.colors = self.page_colors(&page.id).await?;
        Ok(page)
    }

    /// The actor's pages (all pages for admins), newest first, with colors.
    pub async fn list_pages(&self, actor: &Actor, limit: u32) -> Result<Vec<ColorPage>, DatabaseError> {
        let (clause, params) = owner_filter(actor, "owner_id", 1);
        let sql = format!(
            "SELECT {PAGE_COLS} FROM color_pages WHERE 1=1 {clause}
             ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut pages = Vec::new();
        while let Some(row) = rows.next().await? {
            pages.push(row_to_page(&row)?);
        }
        for page in &mut pages {
            page.colors = self.page_colors(&page.id).await?;
        }
        Ok(pages)
    }

    pub async fn rename_page(
        &self,
        actor: &Actor,
        page_id: &str,
        name: &str,
    ) -> Result<ColorPage, DatabaseError> {
        let page = self.get_page(actor, page_id).await?;
        let name = required_name(name, "Page name")?;
        self.db()
            .conn()
            .execute(
                "UPDATE color_pages SET name = ?1, updated_at = ?2 WHERE id = ?3",
                libsql::params![name.as_str(), Utc::now().to_rfc3339(), page_id],
            )
            .await?;
        self.record(
            Some(actor),
            EntityType::ColorPage,
            page_id,
            AuditAction::Updated,
            Some(json!({ "from": page.name, "to": name })),
        )
        .await?;
        self.get_page(actor, page_id).await
    }

    /// Append a color at the end of the page.
    pub async fn add_page_color(
        &self,
        actor: &Actor,
        page_id: &str,
        color: &NewPageColor,
    ) -> Result<ColorPage, DatabaseError> {
        let page = self.get_page(actor, page_id).await?;
        let mut normalized = normalize_colors(std::slice::from_ref(color))?;
        let Some(color) = normalized.pop() else {
            return Err(DatabaseError::NoResult);
        };
        let position = i64::try_from(page.colors.len()).map_err(|e| DatabaseError::Other(e.into()))?;

        self.insert_page_color(page_id, position, &color).await?;
        self.touch_page(page_id).await?;
        self.record(
            Some(actor),
            EntityType::ColorPage,
            page_id,
            AuditAction::Updated,
            Some(json!({ "added": color.hex, "position": position })),
        )
        .await?;
        self.get_page(actor, page_id).await
    }

    /// Remove the color at `position` and close the gap.
    ///
    /// # Errors
    ///
    /// `NotFound` when the page has no color at `position`.
    pub async fn remove_page_color(
        &self,
        actor: &Actor,
        page_id: &str,
        position: u32,
    ) -> Result<ColorPage, DatabaseError> {
        let page = self.get_page(actor, page_id).await?;
        let Some(removed) = page.colors.iter().find(|c| c.position == position) else {
            return Err(DatabaseError::not_found(
                EntityType::ColorPage,
                &format!("{page_id} position {position}"),
            ));
        };

        let tx = self.db().conn().transaction().await?;
        let result = async {
            self.db()
                .conn()
                .execute(
                    "DELETE FROM color_page_colors WHERE page_id = ?1 AND position = ?2",
                    libsql::params![page_id, i64::from(position)],
                )
                .await?;
            self.db()
                .conn()
                .execute(
                    "UPDATE color_page_colors SET position = position - 1
                     WHERE page_id = ?1 AND position > ?2",
                    libsql::params![page_id, i64::from(position)],
                )
                .await?;
            self.touch_page(page_id).await?;
            self.record(
                Some(actor),
                EntityType::ColorPage,
                page_id,
                AuditAction::Updated,
                Some(json!({ "removed": removed.hex, "position": position })),
            )
            .await
        }
        .await;
        Self::finish(tx, result).await?;

        self.get_page(actor, page_id).await
    }

    async fn touch_page(&self, page_id: &str) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                "UPDATE color_pages SET updated_at = ?1 WHERE id = ?2",
                libsql::params![Utc::now().to_rfc3339(), page_id],
            )
            .await?;
        Ok(())
    }

    pub async fn delete_page(&self, actor: &Actor, page_id: &str) -> Result<(), DatabaseError> {
        let page = self.get_page(actor, page_id).await?;
        self.db()
            .conn()
            .execute("DELETE FROM color_pages WHERE id = ?1", [page_id])
            .await?;
        self.record(
            Some(actor),
            EntityType::ColorPage,
            page_id,
            AuditAction::Deleted,
            Some(json!({ "name": page.name })),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{admin_and_user, service_with_owner, test_service};
    use pretty_assertions::assert_eq;

    fn autumn() -> Vec<NewPageColor> {
        vec![
            NewPageColor::new("8b4513").label("Bark"),
            NewPageColor::new("#FF8C00"),
            NewPageColor::new("#DAA520").label("Goldenrod"),
        ]
    }

    fn hexes(page: &ColorPage) -> Vec<(u32, &str)> {
        page.colors
            .iter()
            .map(|c| (c.position, c.hex.as_str()))
            .collect()
    }

    #[tokio::test]
    async fn create_keeps_order_and_normalizes() {
        let (svc, owner) = service_with_owner().await;
        let page = svc
            .create_page(&owner, "Autumn", Some("Leaves"), &autumn())
            .await
            .unwrap();

        assert!(page.id.starts_with("pag-"));
        assert_eq!(page.description.as_deref(), Some("Leaves"));
        assert_eq!(
            hexes(&page),
            vec![(0, "#8B4513"), (1, "#FF8C00"), (2, "#DAA520")]
        );
        assert_eq!(page.colors[0].label.as_deref(), Some("Bark"));
    }

    #[tokio::test]
    async fn malformed_color_writes_nothing() {
        let (svc, owner) = service_with_owner().await;
        let err = svc
            .create_page(
                &owner,
                "Bad",
                None,
                &[NewPageColor::new("#FF0000"), NewPageColor::new("nope")],
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("color 2"), "{err}");
        assert!(svc.list_pages(&owner, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_closes_the_gap() {
        let (svc, owner) = service_with_owner().await;
        let page = svc.create_page(&owner, "Autumn", None, &autumn()).await.unwrap();

        let page = svc.remove_page_color(&owner, &page.id, 0).await.unwrap();
        assert_eq!(hexes(&page), vec![(0, "#FF8C00"), (1, "#DAA520")]);

        let page = svc
            .add_page_color(&owner, &page.id, &NewPageColor::new("#800000"))
            .await
            .unwrap();
        assert_eq!(page.colors.last().map(|c| c.position), Some(2));

        let err = svc.remove_page_color(&owner, &page.id, 9).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn rename_and_delete() {
        let (svc, owner) = service_with_owner().await;
        let page = svc.create_page(&owner, "Autumn", None, &autumn()).await.unwrap();

        let renamed = svc.rename_page(&owner, &page.id, " Fall ").await.unwrap();
        assert_eq!(renamed.name, "Fall");

        svc.delete_page(&owner, &page.id).await.unwrap();
        assert!(svc.get_page(&owner, &page.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn pages_are_private() {
        let svc = test_service().await;
        let (admin, user) = admin_and_user(&svc).await;
        let page = svc.create_page(&user, "Mine", None, &[]).await.unwrap();

        let other = Actor::from(&svc.create_user(Some(&admin), "eve", false).await.unwrap());
        assert!(svc.get_page(&other, &page.id).await.unwrap_err().is_not_found());
        assert!(svc.list_pages(&other, 10).await.unwrap().is_empty());
        assert_eq!(svc.list_pages(&admin, 10).await.unwrap().len(), 1);
    }
}
