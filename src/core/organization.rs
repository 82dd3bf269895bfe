//! Organization business logic.
//!
//! Organizations are immutable after creation. Deleting one does not touch
//! events unless the [`ReferencePolicy::Restrict`] policy is configured.

use crate::{
    config::ReferencePolicy,
    core::form::FormFields,
    entities::{Event, Organization, event, organization},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

/// Fields accepted when adding an organization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationInput {
    /// Organization name
    pub name: String,
    /// Kind of organization
    pub org_type: Option<String>,
    /// Rough size
    pub size: Option<String>,
    /// Contact person
    pub contact_name: Option<String>,
    /// Contact phone
    pub contact_phone: Option<String>,
    /// Contact email
    pub contact_email: Option<String>,
}

impl OrganizationInput {
    /// Reads an organization from submitted form fields.
    pub fn from_form(form: &FormFields) -> Result<Self> {
        Ok(Self {
            name: form.required("name")?,
            org_type: form.text("type"),
            size: form.text("size"),
            contact_name: form.text("contact_name"),
            contact_phone: form.text("contact_phone"),
            contact_email: form.text("contact_email"),
        })
    }
}

/// Retrieves all organizations ordered alphabetically by name.
pub async fn list_organizations(db: &DatabaseConnection) -> Result<Vec<organization::Model>> {
    Organization::find()
        .order_by_asc(organization::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an organization by id, returning None if it does not exist.
pub async fn get_organization_by_id(
    db: &DatabaseConnection,
    organization_id: i64,
) -> Result<Option<organization::Model>> {
    Organization::find_by_id(organization_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Records a new organization.
#[instrument(skip(db, input), fields(name = %input.name))]
pub async fn create_organization(
    db: &DatabaseConnection,
    input: OrganizationInput,
) -> Result<organization::Model> {
    let model = organization::ActiveModel {
        name: Set(input.name),
        org_type: Set(input.org_type),
        size: Set(input.size),
        contact_name: Set(input.contact_name),
        contact_phone: Set(input.contact_phone),
        contact_email: Set(input.contact_email),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    info!("Added organization '{}' (ID: {})", created.name, created.id);
    Ok(created)
}

/// Deletes an organization. Returns whether a row was removed.
///
/// Events pointing at it keep a dangling `organization_id` unless the policy
/// is [`ReferencePolicy::Restrict`], which refuses the delete instead.
#[instrument(skip(db))]
pub async fn delete_organization(
    db: &DatabaseConnection,
    organization_id: i64,
    policy: ReferencePolicy,
) -> Result<bool> {
    if policy == ReferencePolicy::Restrict {
        let count = Event::find()
            .filter(event::Column::OrganizationId.eq(organization_id))
            .count(db)
            .await?;
        if count > 0 {
            return Err(Error::ReferenceInUse {
                entity: "Organization",
                id: organization_id,
                count,
            });
        }
    }

    let result = Organization::delete_by_id(organization_id).exec(db).await?;
    Ok(result.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_from_form() -> Result<()> {
        let db = setup_test_db().await?;
        let form: FormFields = [
            ("name", "Riverside PTA"),
            ("type", "School"),
            ("size", "40"),
            ("contact_email", "pta@example.org"),
        ]
        .into_iter()
        .collect();

        let org = create_organization(&db, OrganizationInput::from_form(&form)?).await?;
        assert_eq!(org.org_type.as_deref(), Some("School"));
        assert_eq!(org.contact_phone, None);

        let fetched = get_organization_by_id(&db, org.id).await?.unwrap();
        assert_eq!(fetched, org);
        Ok(())
    }

    #[test]
    fn test_missing_name_rejected() {
        let form = FormFields::default();
        assert!(matches!(
            OrganizationInput::from_form(&form),
            Err(Error::MissingField { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_organization(&db, "Zion Church").await?;
        create_test_organization(&db, "Acorn Club").await?;
        create_test_organization(&db, "Maple School").await?;

        let names: Vec<String> = list_organizations(&db)
            .await?
            .into_iter()
            .map(|o| o.name)
            .collect();
        assert_eq!(names, vec!["Acorn Club", "Maple School", "Zion Church"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_keeps_event_reference() -> Result<()> {
        let db = setup_test_db().await?;
        let org = create_test_organization(&db, "Acorn Club").await?;
        let ev = create_custom_event(&db, "Cleanup", "2024-06-01", None, Some(org.id)).await?;

        assert!(delete_organization(&db, org.id, ReferencePolicy::Dangle).await?);
        assert!(get_organization_by_id(&db, org.id).await?.is_none());

        let stored = Event::find_by_id(ev.id).one(&db).await?.unwrap();
        assert_eq!(stored.organization_id, Some(org.id));
        Ok(())
    }

    #[tokio::test]
    async fn test_restrict_refuses_referenced_delete() -> Result<()> {
        let db = setup_test_db().await?;
        let org = create_test_organization(&db, "Acorn Club").await?;
        create_custom_event(&db, "Cleanup", "2024-06-01", None, Some(org.id)).await?;

        let err = delete_organization(&db, org.id, ReferencePolicy::Restrict)
            .await
            .unwrap_err();
        assert!(err.is_recoverable());
        assert!(get_organization_by_id(&db, org.id).await?.is_some());
        Ok(())
    }
}
