use crate::domain::models::user::Permission;
use crate::domain::ports::OrganizerRepository;
use crate::error::AppError;
use tracing::warn;

/// Fails with `Forbidden` unless `user_id` is linked to the organizer with a
/// role that carries `permission`.
pub async fn ensure_permission(
    organizers: &dyn OrganizerRepository,
    user_id: i32,
    organizer_id: i32,
    permission: Permission,
) -> Result<(), AppError> {
    let granted = organizers
        .permissions(user_id, organizer_id)
        .await?
        .is_some_and(|perms| perms.allows(permission));

    if granted {
        Ok(())
    } else {
        warn!(user_id, organizer_id, permission = permission.label(), "Permission denied");
        Err(AppError::Forbidden(format!(
            "Missing {} permission for organizer {}",
            permission.label(),
            organizer_id
        )))
    }
}
